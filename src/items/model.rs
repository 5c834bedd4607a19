use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Number, Value};
use std::str::FromStr;
use thiserror::Error;

// region:    --- Item Model
/// 추정가
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub low: Number,
    pub high: Number,
}

/// 경매 상품 문서
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consignor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate: Option<Estimate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AuctionItem {
    pub fn from_fields(id: impl Into<String>, fields: ItemFields) -> Self {
        Self {
            id: id.into(),
            sale_number: fields.sale_number,
            title: fields.title,
            description: fields.description,
            consignor: fields.consignor,
            estimate: Some(fields.estimate),
            created_at: None,
            updated_at: None,
        }
    }
}
// endregion: --- Item Model

// region:    --- Sale Number Policy
/// 판매 번호 부여 정책
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaleNumberPolicy {
    /// 요청 값을 그대로 저장 (순번 보장 없음)
    #[default]
    ClientSupplied,
    /// 저장소가 최대값 + 1 을 원자적으로 부여
    AutoIncrement,
}

#[derive(Debug, Error)]
#[error("unknown sale number policy '{0}' (expected 'client' or 'auto')")]
pub struct UnknownPolicy(String);

impl FromStr for SaleNumberPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "client" | "client-supplied" => Ok(Self::ClientSupplied),
            "auto" | "auto-increment" => Ok(Self::AutoIncrement),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}
// endregion: --- Sale Number Policy

// region:    --- Request Payload
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("request body is not a valid item: {0}")]
    MalformedBody(String),

    #[error("estimate is required")]
    MissingEstimate,

    #[error("estimate.{0} is required")]
    MissingEstimateField(&'static str),

    #[error("saleNumber is required")]
    MissingSaleNumber,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EstimatePayload {
    pub low: Option<Number>,
    pub high: Option<Number>,
}

/// 생성/수정 요청 본문
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    pub sale_number: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub consignor: Option<String>,
    pub estimate: Option<EstimatePayload>,
}

/// 검증된 편집 가능 필드
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFields {
    pub sale_number: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub consignor: Option<String>,
    pub estimate: Estimate,
}

impl ItemPayload {
    /// 요청 검증
    pub fn validate(self, policy: SaleNumberPolicy) -> Result<ItemFields, ValidationError> {
        let estimate = self.estimate.ok_or(ValidationError::MissingEstimate)?;
        let low = estimate
            .low
            .ok_or(ValidationError::MissingEstimateField("low"))?;
        let high = estimate
            .high
            .ok_or(ValidationError::MissingEstimateField("high"))?;

        let sale_number = match policy {
            SaleNumberPolicy::ClientSupplied => {
                Some(self.sale_number.ok_or(ValidationError::MissingSaleNumber)?)
            }
            SaleNumberPolicy::AutoIncrement => None,
        };

        Ok(ItemFields {
            sale_number,
            title: self.title,
            description: self.description,
            consignor: self.consignor,
            estimate: Estimate { low, high },
        })
    }
}

impl ItemFields {
    /// 저장용 문서. 생략된 필드는 null 로 기록되어 수정 시 이전 값을 덮어쓴다.
    /// 판매 번호가 없으면 키 자체를 넣지 않는다.
    pub fn to_document(&self) -> Map<String, Value> {
        let mut data = Map::new();
        if let Some(sale_number) = self.sale_number {
            data.insert("saleNumber".to_string(), Value::from(sale_number));
        }
        data.insert("title".to_string(), json!(self.title));
        data.insert("description".to_string(), json!(self.description));
        data.insert("consignor".to_string(), json!(self.consignor));
        data.insert(
            "estimate".to_string(),
            json!({ "high": self.estimate.high, "low": self.estimate.low }),
        );
        data
    }
}
// endregion: --- Request Payload
