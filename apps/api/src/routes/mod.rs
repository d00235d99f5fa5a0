pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::portfolio::handlers;
use crate::state::AppState;

/// Room for multipart framing on top of the image itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_image_bytes + MULTIPART_OVERHEAD;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/render", post(handlers::handle_render))
        // Workspace state
        .route(
            "/api/v1/portfolios/:workspace_id",
            get(handlers::handle_get_portfolio).delete(handlers::handle_reset),
        )
        .route(
            "/api/v1/portfolios/:workspace_id/form",
            patch(handlers::handle_update_form),
        )
        .route(
            "/api/v1/portfolios/:workspace_id/fields/validate",
            post(handlers::handle_validate_field),
        )
        // Skills
        .route(
            "/api/v1/portfolios/:workspace_id/skills",
            post(handlers::handle_add_skill),
        )
        .route(
            "/api/v1/portfolios/:workspace_id/skills/suggestions",
            get(handlers::handle_skill_suggestions),
        )
        .route(
            "/api/v1/portfolios/:workspace_id/skills/:index",
            delete(handlers::handle_remove_skill),
        )
        // List sections
        .route(
            "/api/v1/portfolios/:workspace_id/sections/:section",
            post(handlers::handle_add_entry),
        )
        .route(
            "/api/v1/portfolios/:workspace_id/sections/:section/:index",
            delete(handlers::handle_remove_entry),
        )
        // Settings
        .route(
            "/api/v1/portfolios/:workspace_id/template",
            put(handlers::handle_set_template),
        )
        .route(
            "/api/v1/portfolios/:workspace_id/theme",
            put(handlers::handle_set_theme),
        )
        // Profile image
        .route(
            "/api/v1/portfolios/:workspace_id/image/url",
            put(handlers::handle_set_image_url),
        )
        .route(
            "/api/v1/portfolios/:workspace_id/image",
            post(handlers::handle_upload_image).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Preview, save, transfer
        .route(
            "/api/v1/portfolios/:workspace_id/preview",
            get(handlers::handle_preview),
        )
        .route(
            "/api/v1/portfolios/:workspace_id/save",
            post(handlers::handle_save),
        )
        .route(
            "/api/v1/portfolios/:workspace_id/history",
            get(handlers::handle_history),
        )
        .route(
            "/api/v1/portfolios/:workspace_id/versions/:version",
            get(handlers::handle_get_version),
        )
        .route(
            "/api/v1/portfolios/:workspace_id/export/json",
            get(handlers::handle_export_json),
        )
        .route(
            "/api/v1/portfolios/:workspace_id/export/html",
            get(handlers::handle_export_html),
        )
        .route(
            "/api/v1/portfolios/:workspace_id/import",
            post(handlers::handle_import),
        )
        .with_state(state)
}
