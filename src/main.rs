// region:    --- Imports
use auction_items::config::Config;
use auction_items::database::DatabaseManager;
use auction_items::document_store::PostgresDocumentStore;
use auction_items::handlers;
use auction_items::items::ItemService;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 로드 (없어도 무방)
    let dotenv = dotenvy::dotenv();

    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    if let Err(e) = dotenv {
        warn!("{:<12} --> .env 파일 없음: {}", "Main", e);
    }

    // 설정 로드
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{:<12} --> 설정 로드 실패: {}", "Main", e);
            return Err(e.into());
        }
    };

    // DatabaseManager 생성
    let db_manager = Arc::new(
        DatabaseManager::connect(&config.database_url, config.database_max_connections).await?,
    );

    // 스키마 초기화
    if let Err(e) = db_manager.initialize_database().await {
        error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

    // 문서 저장소와 상품 서비스는 한 번만 만들어 라우터에 주입
    let store = Arc::new(PostgresDocumentStore::new(Arc::clone(&db_manager)));
    let service = Arc::new(ItemService::new(
        store,
        config.items_collection.clone(),
        config.sale_number_policy,
    ));
    info!(
        "{:<12} --> 컬렉션: {}, 판매 번호 정책: {:?}",
        "Main",
        service.collection(),
        service.policy()
    );

    let routes_all = handlers::app(service, config.body_limit_bytes);

    let listener = TcpListener::bind(config.listen_addr()?).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
