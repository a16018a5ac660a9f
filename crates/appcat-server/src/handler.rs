//! Request handlers for the `/api` routes.
//!
//! Handlers decode the request, call one store operation, persist on
//! success, and encode the result. All catalog rules live in the store.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use appcat_store::{ApplicationListing, CatalogReader, CatalogWriter};
use appcat_types::{
    download_file_name, AppEntry, ApplicationRecord, CatalogDocument, CatalogStats, Category,
    UploadSummary, FULL_EXPORT_FILE_NAME,
};

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Multipart field carrying the uploaded catalog.
pub const UPLOAD_FIELD: &str = "jsonFile";

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    #[serde(flatten)]
    pub summary: UploadSummary,
}

#[derive(Debug, Deserialize)]
pub struct AddCategoryRequest {
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct AddApplicationRequest {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub app_name: Vec<String>,
    #[serde(default)]
    pub publisher: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateApplicationRequest {
    pub category: String,
    pub old_app_name: String,
    pub old_publisher: String,
    #[serde(default)]
    pub app_name: Vec<String>,
    #[serde(default)]
    pub publisher: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteApplicationQuery {
    pub category: Option<String>,
    pub app_name: Option<String>,
    pub publisher: Option<String>,
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> ServerResult<T> {
    body.map(|Json(v)| v)
        .map_err(|e| ServerError::bad_request(format!("invalid JSON: {}", e.body_text())))
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> ServerResult<T> {
    query
        .map(|Query(v)| v)
        .map_err(|e| ServerError::bad_request(e.body_text()))
}

/// Treats absent and blank parameters alike.
fn required(value: Option<String>, name: &str) -> ServerResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ServerError::bad_request(format!("{name} parameter is required"))),
    }
}

fn attachment(document: CatalogDocument, file_name: &str) -> ServerResult<Response> {
    let disposition = HeaderValue::from_str(&format!("attachment; filename={file_name}"))
        .map_err(|e| ServerError::Internal(e.to_string()))?;
    Ok(([(header::CONTENT_DISPOSITION, disposition)], Json(document)).into_response())
}

/// Health check handler.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "name": "appcat-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn stats(State(state): State<AppState>) -> ServerResult<Json<CatalogStats>> {
    Ok(Json(state.store.stats()?))
}

pub async fn list_categories(State(state): State<AppState>) -> ServerResult<Json<Vec<String>>> {
    Ok(Json(state.store.categories()?))
}

pub async fn add_category(
    State(state): State<AppState>,
    body: Result<Json<AddCategoryRequest>, JsonRejection>,
) -> ServerResult<Json<MessageResponse>> {
    let request = json_body(body)?;
    state.store.add_category(request.category.trim())?;
    state.persist().await;
    Ok(MessageResponse::new("Category added successfully"))
}

pub async fn list_applications(
    State(state): State<AppState>,
    query: Result<Query<CategoryQuery>, QueryRejection>,
) -> ServerResult<Json<ApplicationListing>> {
    let filter = query_params(query)?
        .category
        .filter(|c| !c.trim().is_empty());
    Ok(Json(state.store.applications(filter.as_deref())?))
}

pub async fn add_application(
    State(state): State<AppState>,
    body: Result<Json<AddApplicationRequest>, JsonRejection>,
) -> ServerResult<Json<MessageResponse>> {
    let request = json_body(body)?;
    let category = required(Some(request.category), "category")?;
    let record = ApplicationRecord {
        app_name: request.app_name,
        publisher: request.publisher,
    };
    state.store.add_application(&category, record)?;
    state.persist().await;
    Ok(MessageResponse::new("Application added successfully"))
}

pub async fn search(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ServerResult<Json<Category>> {
    let q = required(query_params(query)?.q, "q")?;
    match state.store.search(&q)? {
        Some(results) => Ok(Json(results)),
        None => Err(ServerError::NotFound(format!("no applications match {q:?}"))),
    }
}

pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ServerResult<Json<UploadResponse>> {
    let mut payload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::bad_request(format!("unable to parse form: {}", e.body_text())))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field.bytes().await.map_err(|e| {
                ServerError::bad_request(format!("unable to read file: {}", e.body_text()))
            })?;
            payload = Some(bytes);
            break;
        }
    }

    let bytes = payload
        .ok_or_else(|| ServerError::bad_request(format!("missing {UPLOAD_FIELD} file field")))?;
    let document: CatalogDocument = serde_json::from_slice(&bytes)
        .map_err(|e| ServerError::bad_request(format!("invalid JSON format: {e}")))?;
    debug!(categories = document.categories.len(), "upload received");

    let summary = state.store.merge(document)?;
    state.persist().await;
    Ok(Json(UploadResponse {
        message: "Data uploaded successfully".into(),
        summary,
    }))
}

pub async fn download_all(State(state): State<AppState>) -> ServerResult<Response> {
    attachment(state.store.export(None)?, FULL_EXPORT_FILE_NAME)
}

pub async fn download_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> ServerResult<Response> {
    let document = state.store.export(Some(&category))?;
    attachment(document, &download_file_name(&category))
}

pub async fn update_application(
    State(state): State<AppState>,
    body: Result<Json<UpdateApplicationRequest>, JsonRejection>,
) -> ServerResult<Json<MessageResponse>> {
    let request = json_body(body)?;
    let old = AppEntry::new(request.old_app_name, request.old_publisher);
    let replacement = ApplicationRecord {
        app_name: request.app_name,
        publisher: request.publisher,
    };
    state
        .store
        .update_application(&request.category, &old, replacement)?;
    state.persist().await;
    Ok(MessageResponse::new("Application updated successfully"))
}

pub async fn delete_application(
    State(state): State<AppState>,
    query: Result<Query<DeleteApplicationQuery>, QueryRejection>,
) -> ServerResult<Json<MessageResponse>> {
    let params = query_params(query)?;
    let category = required(params.category, "category")?;
    let entry = AppEntry::new(
        required(params.app_name, "app_name")?,
        required(params.publisher, "publisher")?,
    );
    state.store.delete_application(&category, &entry)?;
    state.persist().await;
    Ok(MessageResponse::new("Application deleted successfully"))
}

pub async fn delete_category(
    State(state): State<AppState>,
    query: Result<Query<CategoryQuery>, QueryRejection>,
) -> ServerResult<Json<MessageResponse>> {
    let category = required(query_params(query)?.category, "category")?;
    state.store.delete_category(&category)?;
    state.persist().await;
    Ok(MessageResponse::new("Category deleted successfully"))
}
