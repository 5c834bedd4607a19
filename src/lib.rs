pub mod config;
pub mod database;
pub mod document_store;
pub mod error;
pub mod handlers;
pub mod items;
