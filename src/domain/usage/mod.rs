pub mod dto;
pub mod service;

pub use dto::{LanguageCount, StatsResponse};
pub use service::UsageService;
