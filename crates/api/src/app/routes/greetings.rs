use axum::{extract::Path, Json};

use crate::app::dto::GreetingMessage;

/// `/name/{name}` → `Hello {name}` as plain text.
pub async fn name_greeting(Path(name): Path<String>) -> String {
    format!("Hello {name}")
}

/// `/json/{name}` → `{"message": "Hello {name}"}`.
pub async fn json_greeting(Path(name): Path<String>) -> Json<GreetingMessage> {
    Json(GreetingMessage {
        message: format!("Hello {name}"),
    })
}
