//! HTTP route handlers.
//!
//! Every handler returns the same envelope:
//!
//! ```json
//! { "success": true, "data": { ... } }
//! { "success": false, "error": "Prompt not found: abc" }
//! ```
//!
//! Store errors map to status codes in [`error_response`]; malformed request
//! bodies are rejected by axum's `Json` extractor before a handler runs.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use promptrepo_core::{Direction, ItemKind, PromptUpdate, StoreError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::SharedState;

type Reply = (StatusCode, Json<ApiResponse>);

/// Response envelope shared by all endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Whether the operation succeeded.
    pub success: bool,
    /// The result data (if any).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Error message (if failed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub(crate) fn api_routes() -> Router<Arc<SharedState>> {
    Router::new()
        .route("/api/data", get(get_data))
        .route("/api/move", post(move_item))
        // Prompts
        .route("/api/prompts", post(create_prompt))
        .route("/api/prompts/search", get(search_prompts))
        .route("/api/prompts/most-used", get(most_used))
        .route("/api/prompts/{id}", put(update_prompt).delete(delete_prompt))
        .route("/api/prompts/{id}/copy", post(copy_prompt))
        .route("/api/prompts/{id}/versions", get(prompt_history))
        .route("/api/prompts/{id}/restore/{version_id}", post(restore_version))
        .route("/api/prompts/{id}/move", post(move_prompt))
        // Folders
        .route("/api/folders", post(create_folder))
        .route("/api/folders/reorder", post(reorder_folders))
        .route("/api/folders/{id}", put(rename_folder).delete(delete_folder))
        .route("/api/folders/{id}/toggle", post(toggle_folder))
        .route("/api/folders/{id}/parent", post(set_folder_parent))
        .route("/api/folders/{id}/up", post(move_folder_up))
        .route("/api/folders/{id}/down", post(move_folder_down))
}

// ============================================================================
// REQUEST BODIES
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromptRequest {
    pub name: String,
    pub text: String,
    #[serde(default)]
    pub folder_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovePromptRequest {
    #[serde(default)]
    pub folder_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenameFolderRequest {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ToggleFolderRequest {
    /// Explicit state; flips the current one when absent.
    #[serde(default)]
    pub expanded: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetParentRequest {
    #[serde(default)]
    pub parent_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderFoldersRequest {
    #[serde(default)]
    pub parent_id: Option<String>,
    pub folder_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveItemRequest {
    pub item_type: ItemKind,
    pub item_id: String,
    /// Destination folder, root when absent.
    #[serde(default)]
    pub target_container: Option<String>,
    /// Destination index, end of the container when absent.
    #[serde(default)]
    pub target_position: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct MostUsedParams {
    #[serde(default)]
    pub limit: Option<usize>,
}

// ============================================================================
// RESPONSE HELPERS
// ============================================================================

fn ok<T: Serialize>(data: T) -> Reply {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data: Some(serde_json::to_value(data).unwrap_or_default()),
            error: None,
        }),
    )
}

fn ok_empty() -> Reply {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data: None,
            error: None,
        }),
    )
}

fn error_response(error: StoreError) -> Reply {
    let status = match &error {
        StoreError::NotFound { .. } | StoreError::VersionNotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::CycleDetected { .. } => StatusCode::CONFLICT,
        StoreError::InvalidReorder(_) => StatusCode::BAD_REQUEST,
        StoreError::Io(_) | StoreError::Json(_) | StoreError::LockPoisoned => {
            log::error!("Store failure: {error}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (
        status,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }),
    )
}

fn reply<T: Serialize>(result: Result<T, StoreError>) -> Reply {
    match result {
        Ok(data) => ok(data),
        Err(e) => error_response(e),
    }
}

fn reply_empty(result: Result<(), StoreError>) -> Reply {
    match result {
        Ok(()) => ok_empty(),
        Err(e) => error_response(e),
    }
}

// ============================================================================
// DOCUMENT & MOVE
// ============================================================================

async fn get_data(State(state): State<Arc<SharedState>>) -> Reply {
    reply(state.store.document())
}

async fn move_item(
    State(state): State<Arc<SharedState>>,
    Json(request): Json<MoveItemRequest>,
) -> Reply {
    log::debug!("HTTP move: {request:?}");
    reply_empty(state.store.move_item(
        request.item_type,
        &request.item_id,
        request.target_container.as_deref(),
        request.target_position,
    ))
}

// ============================================================================
// PROMPT HANDLERS
// ============================================================================

async fn create_prompt(
    State(state): State<Arc<SharedState>>,
    Json(request): Json<CreatePromptRequest>,
) -> Reply {
    reply(
        state
            .store
            .create_prompt(&request.name, &request.text, request.folder_id.as_deref()),
    )
}

async fn update_prompt(
    State(state): State<Arc<SharedState>>,
    Path(id): Path<String>,
    Json(update): Json<PromptUpdate>,
) -> Reply {
    reply(state.store.update_prompt(&id, &update))
}

async fn delete_prompt(State(state): State<Arc<SharedState>>, Path(id): Path<String>) -> Reply {
    reply_empty(state.store.delete_prompt(&id))
}

async fn copy_prompt(State(state): State<Arc<SharedState>>, Path(id): Path<String>) -> Reply {
    reply(
        state
            .store
            .copy_prompt(&id)
            .map(|outcome| serde_json::json!({ "outcome": outcome })),
    )
}

async fn prompt_history(State(state): State<Arc<SharedState>>, Path(id): Path<String>) -> Reply {
    reply(state.store.prompt_history(&id))
}

async fn restore_version(
    State(state): State<Arc<SharedState>>,
    Path((id, version_id)): Path<(String, String)>,
) -> Reply {
    reply(state.store.restore_prompt_version(&id, &version_id))
}

async fn move_prompt(
    State(state): State<Arc<SharedState>>,
    Path(id): Path<String>,
    Json(request): Json<MovePromptRequest>,
) -> Reply {
    reply_empty(
        state
            .store
            .move_prompt_to_folder(&id, request.folder_id.as_deref()),
    )
}

async fn search_prompts(
    State(state): State<Arc<SharedState>>,
    Query(params): Query<SearchParams>,
) -> Reply {
    reply(state.store.search(&params.q))
}

async fn most_used(
    State(state): State<Arc<SharedState>>,
    Query(params): Query<MostUsedParams>,
) -> Reply {
    reply(state.store.most_used(params.limit))
}

// ============================================================================
// FOLDER HANDLERS
// ============================================================================

async fn create_folder(
    State(state): State<Arc<SharedState>>,
    Json(request): Json<CreateFolderRequest>,
) -> Reply {
    reply(
        state
            .store
            .create_folder(&request.name, request.parent_id.as_deref()),
    )
}

async fn rename_folder(
    State(state): State<Arc<SharedState>>,
    Path(id): Path<String>,
    Json(request): Json<RenameFolderRequest>,
) -> Reply {
    reply(state.store.rename_folder(&id, &request.name))
}

async fn delete_folder(State(state): State<Arc<SharedState>>, Path(id): Path<String>) -> Reply {
    reply_empty(state.store.delete_folder(&id))
}

async fn toggle_folder(
    State(state): State<Arc<SharedState>>,
    Path(id): Path<String>,
    request: Option<Json<ToggleFolderRequest>>,
) -> Reply {
    let expanded = request.and_then(|Json(request)| request.expanded);
    reply(
        state
            .store
            .set_folder_expanded(&id, expanded)
            .map(|expanded| serde_json::json!({ "expanded": expanded })),
    )
}

async fn set_folder_parent(
    State(state): State<Arc<SharedState>>,
    Path(id): Path<String>,
    Json(request): Json<SetParentRequest>,
) -> Reply {
    reply_empty(
        state
            .store
            .set_folder_parent(&id, request.parent_id.as_deref()),
    )
}

async fn move_folder_up(State(state): State<Arc<SharedState>>, Path(id): Path<String>) -> Reply {
    nudge_folder(&state, &id, Direction::Up)
}

async fn move_folder_down(State(state): State<Arc<SharedState>>, Path(id): Path<String>) -> Reply {
    nudge_folder(&state, &id, Direction::Down)
}

fn nudge_folder(state: &SharedState, id: &str, direction: Direction) -> Reply {
    reply(
        state
            .store
            .move_folder(id, direction)
            .map(|moved| serde_json::json!({ "moved": moved })),
    )
}

async fn reorder_folders(
    State(state): State<Arc<SharedState>>,
    Json(request): Json<ReorderFoldersRequest>,
) -> Reply {
    reply_empty(
        state
            .store
            .reorder_folders(request.parent_id.as_deref(), &request.folder_ids),
    )
}

// ============================================================================
// TESTS
// ============================================================================
