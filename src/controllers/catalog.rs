use axum::Json;
use serde_json::{Map, Value};

use crate::domain::tts::catalog::{LANGUAGES, VOICE_TYPES};

fn as_object(entries: &[(&str, &str)]) -> Value {
    let map: Map<String, Value> = entries
        .iter()
        .map(|(code, label)| (code.to_string(), Value::String(label.to_string())))
        .collect();
    Value::Object(map)
}

/// GET /api/languages
pub async fn languages() -> Json<Value> {
    Json(as_object(LANGUAGES))
}

/// GET /api/voice-types
pub async fn voice_types() -> Json<Value> {
    Json(as_object(VOICE_TYPES))
}
