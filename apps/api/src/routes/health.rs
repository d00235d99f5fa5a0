use axum::Json;
use serde_json::{json, Value};

use crate::models::portfolio::TemplateKind;

/// GET /health
/// Returns a simple status object with service version and available templates.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "folio-api",
        "templates": TemplateKind::ALL.map(|t| t.as_str()),
    }))
}
