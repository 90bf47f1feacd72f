use serde::{Deserialize, Serialize};

/// Response for GET /stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total: i64,
    pub today: i64,
    pub popular_languages: Vec<LanguageCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageCount {
    pub language: String,
    pub count: i64,
}
