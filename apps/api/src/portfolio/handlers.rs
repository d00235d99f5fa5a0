//! Axum route handlers for the Portfolio API.
//!
//! Every handler follows the same shape: load the workspace (pending draft,
//! stored draft, or defaults), apply one editing operation, persist, and
//! answer with the new state and its validation report. Handlers that write
//! hold the workspace lock across all of it.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::portfolio::{CustomColors, Portfolio, Section, TemplateKind, Theme};
use crate::models::snapshot::{SnapshotMeta, SnapshotRow};
use crate::portfolio::editing::{self, FormInput};
use crate::portfolio::image;
use crate::portfolio::transfer::{download_filename, export_json, import_json};
use crate::portfolio::validation::{validate, validate_field, FieldError, ValidationReport};
use crate::render::{render, render_document};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PortfolioResponse {
    pub portfolio: Portfolio,
    pub validation: ValidationReport,
}

impl From<Portfolio> for PortfolioResponse {
    fn from(portfolio: Portfolio) -> Self {
        let validation = validate(&portfolio);
        PortfolioResponse {
            portfolio,
            validation,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FieldCheckRequest {
    pub field: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct FieldCheckResponse {
    pub valid: bool,
    pub error: Option<FieldError>,
}

#[derive(Debug, Deserialize)]
pub struct AddSkillRequest {
    pub skill: String,
}

#[derive(Debug, Deserialize)]
pub struct TemplateRequest {
    pub template: TemplateKind,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeRequest {
    pub theme: Theme,
    pub custom_colors: Option<CustomColors>,
}

#[derive(Debug, Deserialize)]
pub struct ImageUrlRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TemplateQuery {
    pub template: Option<TemplateKind>,
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub portfolio: Portfolio,
    pub template: Option<TemplateKind>,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Current state of a workspace, with blank rows added to empty sections.
async fn load_workspace(state: &AppState, workspace_id: Uuid) -> Result<Portfolio, AppError> {
    let mut portfolio = state.drafts.load(workspace_id).await?.unwrap_or_default();
    editing::ensure_defaults(&mut portfolio);
    Ok(portfolio)
}

/// Blocks save/export/download until the required fields are filled.
fn require_valid(portfolio: &Portfolio) -> Result<(), AppError> {
    let report = validate(portfolio);
    if report.valid {
        Ok(())
    } else {
        Err(AppError::InvalidForm(report))
    }
}

/// A body cut off by the route's size limit is reported like any other
/// oversized image.
fn upload_error(err: MultipartError, max_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        image::too_large(max_bytes)
    } else {
        AppError::Validation(format!("Error reading image file: {}", err.body_text()))
    }
}

fn attachment(content_type: &'static str, filename: &str, body: String) -> Response {
    let ascii: String = filename
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
        .collect();
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{ascii}\""),
            ),
        ],
        body,
    )
        .into_response()
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/portfolios/:workspace_id
pub async fn handle_get_portfolio(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
) -> Result<Json<PortfolioResponse>, AppError> {
    let portfolio = load_workspace(&state, workspace_id).await?;
    Ok(Json(portfolio.into()))
}

/// DELETE /api/v1/portfolios/:workspace_id
///
/// Drops the stored draft. Snapshot history is kept.
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
) -> Result<Json<PortfolioResponse>, AppError> {
    let _guard = state.drafts.lock_workspace(workspace_id).await;
    state.drafts.discard(workspace_id).await?;
    info!(%workspace_id, "workspace reset");
    let portfolio = load_workspace(&state, workspace_id).await?;
    Ok(Json(portfolio.into()))
}

/// PATCH /api/v1/portfolios/:workspace_id/form
///
/// Typing lands here. The write to the draft store is debounced.
pub async fn handle_update_form(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
    Json(input): Json<FormInput>,
) -> Result<Json<PortfolioResponse>, AppError> {
    let _guard = state.drafts.lock_workspace(workspace_id).await;
    let mut portfolio = load_workspace(&state, workspace_id).await?;
    editing::apply_form(&mut portfolio, input);
    state.drafts.stage(workspace_id, portfolio.clone()).await;
    Ok(Json(portfolio.into()))
}

/// POST /api/v1/portfolios/:workspace_id/fields/validate
pub async fn handle_validate_field(
    Json(req): Json<FieldCheckRequest>,
) -> Json<FieldCheckResponse> {
    let error = validate_field(&req.field, &req.value);
    Json(FieldCheckResponse {
        valid: error.is_none(),
        error,
    })
}

/// POST /api/v1/portfolios/:workspace_id/skills
///
/// Duplicates and blanks are accepted and ignored.
pub async fn handle_add_skill(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
    Json(req): Json<AddSkillRequest>,
) -> Result<Json<PortfolioResponse>, AppError> {
    let _guard = state.drafts.lock_workspace(workspace_id).await;
    let mut portfolio = load_workspace(&state, workspace_id).await?;
    if editing::add_skill(&mut portfolio, &req.skill) {
        state.drafts.persist(workspace_id, &portfolio).await?;
        state
            .drafts
            .store()
            .remember_skill(workspace_id, &req.skill)
            .await?;
    }
    Ok(Json(portfolio.into()))
}

/// DELETE /api/v1/portfolios/:workspace_id/skills/:index
pub async fn handle_remove_skill(
    State(state): State<AppState>,
    Path((workspace_id, index)): Path<(Uuid, usize)>,
) -> Result<Json<PortfolioResponse>, AppError> {
    let _guard = state.drafts.lock_workspace(workspace_id).await;
    let mut portfolio = load_workspace(&state, workspace_id).await?;
    editing::remove_skill(&mut portfolio, index)
        .ok_or_else(|| AppError::NotFound(format!("No skill at index {index}")))?;
    state.drafts.persist(workspace_id, &portfolio).await?;
    Ok(Json(portfolio.into()))
}

/// GET /api/v1/portfolios/:workspace_id/skills/suggestions
pub async fn handle_skill_suggestions(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.drafts.store().suggestions(workspace_id).await?))
}

/// POST /api/v1/portfolios/:workspace_id/sections/:section
pub async fn handle_add_entry(
    State(state): State<AppState>,
    Path((workspace_id, section)): Path<(Uuid, Section)>,
) -> Result<(StatusCode, Json<PortfolioResponse>), AppError> {
    let _guard = state.drafts.lock_workspace(workspace_id).await;
    let mut portfolio = load_workspace(&state, workspace_id).await?;
    editing::add_entry(&mut portfolio, section);
    state.drafts.persist(workspace_id, &portfolio).await?;
    Ok((StatusCode::CREATED, Json(portfolio.into())))
}

/// DELETE /api/v1/portfolios/:workspace_id/sections/:section/:index
pub async fn handle_remove_entry(
    State(state): State<AppState>,
    Path((workspace_id, section, index)): Path<(Uuid, Section, usize)>,
) -> Result<Json<PortfolioResponse>, AppError> {
    let _guard = state.drafts.lock_workspace(workspace_id).await;
    let mut portfolio = load_workspace(&state, workspace_id).await?;
    editing::remove_entry(&mut portfolio, section, index)?;
    state.drafts.persist(workspace_id, &portfolio).await?;
    Ok(Json(portfolio.into()))
}

/// PUT /api/v1/portfolios/:workspace_id/template
pub async fn handle_set_template(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
    Json(req): Json<TemplateRequest>,
) -> Result<Json<PortfolioResponse>, AppError> {
    let _guard = state.drafts.lock_workspace(workspace_id).await;
    let mut portfolio = load_workspace(&state, workspace_id).await?;
    editing::set_template(&mut portfolio, req.template);
    state.drafts.persist(workspace_id, &portfolio).await?;
    Ok(Json(portfolio.into()))
}

/// PUT /api/v1/portfolios/:workspace_id/theme
pub async fn handle_set_theme(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
    Json(req): Json<ThemeRequest>,
) -> Result<Json<PortfolioResponse>, AppError> {
    let _guard = state.drafts.lock_workspace(workspace_id).await;
    let mut portfolio = load_workspace(&state, workspace_id).await?;
    editing::set_theme(&mut portfolio, req.theme, req.custom_colors)?;
    state.drafts.persist(workspace_id, &portfolio).await?;
    Ok(Json(portfolio.into()))
}

/// PUT /api/v1/portfolios/:workspace_id/image/url
pub async fn handle_set_image_url(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
    Json(req): Json<ImageUrlRequest>,
) -> Result<Json<PortfolioResponse>, AppError> {
    let src = image::from_url(&req.url)?;
    let _guard = state.drafts.lock_workspace(workspace_id).await;
    let mut portfolio = load_workspace(&state, workspace_id).await?;
    portfolio.profile_image = src;
    state.drafts.persist(workspace_id, &portfolio).await?;
    Ok(Json(portfolio.into()))
}

/// POST /api/v1/portfolios/:workspace_id/image
///
/// Multipart upload; the file is expected in a field named `image`.
pub async fn handle_upload_image(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<PortfolioResponse>, AppError> {
    let max_bytes = state.config.max_image_bytes;
    let mut upload: Option<(String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error(e, max_bytes))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| upload_error(e, max_bytes))?;
        upload = Some((content_type, data));
        break;
    }

    let (content_type, data) =
        upload.ok_or_else(|| AppError::Validation("Missing 'image' file field".to_string()))?;
    let src = image::from_upload(&content_type, &data, max_bytes)?;

    let _guard = state.drafts.lock_workspace(workspace_id).await;
    let mut portfolio = load_workspace(&state, workspace_id).await?;
    portfolio.profile_image = src;
    state.drafts.persist(workspace_id, &portfolio).await?;
    info!(%workspace_id, bytes = data.len(), "profile image uploaded");
    Ok(Json(portfolio.into()))
}

/// GET /api/v1/portfolios/:workspace_id/preview?template=
///
/// A `template` query parameter previews another layout without changing state.
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
    Query(query): Query<TemplateQuery>,
) -> Result<Html<String>, AppError> {
    let portfolio = load_workspace(&state, workspace_id).await?;
    let template = query.template.unwrap_or(portfolio.settings.template);
    Ok(Html(render(&portfolio, template)))
}

/// POST /api/v1/render
///
/// Stateless: renders the posted portfolio through a template.
pub async fn handle_render(Json(req): Json<RenderRequest>) -> Html<String> {
    let template = req.template.unwrap_or(req.portfolio.settings.template);
    Html(render(&req.portfolio, template))
}

/// POST /api/v1/portfolios/:workspace_id/save
///
/// Persists the draft and appends a snapshot version. The workspace lock is
/// held through the archive commit.
pub async fn handle_save(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
) -> Result<(StatusCode, Json<SnapshotMeta>), AppError> {
    let _guard = state.drafts.lock_workspace(workspace_id).await;
    let portfolio = load_workspace(&state, workspace_id).await?;
    require_valid(&portfolio)?;
    state.drafts.persist(workspace_id, &portfolio).await?;
    let meta = state.archive.commit(workspace_id, &portfolio).await?;
    Ok((StatusCode::CREATED, Json(meta)))
}

/// GET /api/v1/portfolios/:workspace_id/history
pub async fn handle_history(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
) -> Result<Json<Vec<SnapshotMeta>>, AppError> {
    Ok(Json(state.archive.history(workspace_id).await?))
}

/// GET /api/v1/portfolios/:workspace_id/versions/:version
pub async fn handle_get_version(
    State(state): State<AppState>,
    Path((workspace_id, version)): Path<(Uuid, i32)>,
) -> Result<Json<SnapshotRow>, AppError> {
    state
        .archive
        .version(workspace_id, version)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Version {version} not found")))
}

/// GET /api/v1/portfolios/:workspace_id/export/json
pub async fn handle_export_json(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let portfolio = load_workspace(&state, workspace_id).await?;
    require_valid(&portfolio)?;
    let body = export_json(&portfolio)?;
    Ok(attachment(
        "application/json",
        &download_filename(&portfolio, "json"),
        body,
    ))
}

/// POST /api/v1/portfolios/:workspace_id/import
///
/// Body is the raw contents of a previously exported file. On any parse
/// failure the current state is left untouched.
pub async fn handle_import(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
    body: String,
) -> Result<Json<PortfolioResponse>, AppError> {
    let portfolio = import_json(&body)?;
    let _guard = state.drafts.lock_workspace(workspace_id).await;
    state.drafts.persist(workspace_id, &portfolio).await?;
    info!(%workspace_id, "portfolio imported");
    Ok(Json(portfolio.into()))
}

/// GET /api/v1/portfolios/:workspace_id/export/html?template=
pub async fn handle_export_html(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
    Query(query): Query<TemplateQuery>,
) -> Result<Response, AppError> {
    let portfolio = load_workspace(&state, workspace_id).await?;
    require_valid(&portfolio)?;
    let template = query.template.unwrap_or(portfolio.settings.template);
    Ok(attachment(
        "text/html; charset=utf-8",
        &download_filename(&portfolio, "html"),
        render_document(&portfolio, template),
    ))
}
