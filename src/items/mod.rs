mod model;
mod service;

pub use model::{
    AuctionItem, Estimate, EstimatePayload, ItemFields, ItemPayload, SaleNumberPolicy,
    UnknownPolicy, ValidationError,
};
pub use service::{ItemService, SALE_NUMBER_FIELD};
