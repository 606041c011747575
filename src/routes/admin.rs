/**
 * Admin Routes
 * Authenticated CRUD per entity kind, with fetch-after-write: every
 * successful write re-fetches the affected list in full and returns it.
 */
use axum::{
    extract::{Path, Query as UrlQuery},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chatbot::{CHATBOT_KNOWLEDGE, CHAT_HISTORY};
use crate::portfolio::{self, CONTENT_BLOCKS};
use crate::routes::contact::CONTACT_MESSAGES;
use crate::routes::{ErrorResponse, SuccessResponse};
use crate::settings::{self, SITE_SETTINGS};
use crate::store::models::{
    BlockKind, ContentBlock, ContentBlockPatch, ContactMessage, KnowledgeEntry,
    KnowledgeEntryPatch, NewContentBlock, NewKnowledgeEntry, NewProjectRow, Profile,
    ProfileUpsert, ProjectRow, ProjectRowPatch, SiteSetting,
};
use crate::store::query::Query;
use crate::store::{self, Store, StoreError};

pub const PROJECTS: &str = "projects";

// ============================================================================
// Auth guard
// ============================================================================

/// Static bearer-token check. Admin routes are disabled entirely until
/// ADMIN_TOKEN is configured.
fn verify_admin(headers: &HeaderMap) -> Result<(), (StatusCode, Json<ErrorResponse>)> {
    let expected = crate::config::get().and_then(|c| c.admin_token.as_deref());
    let Some(expected) = expected else {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new("Admin access is not configured")),
        ));
    };

    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match token {
        Some(t) if t == expected => Ok(()),
        Some(_) => Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Invalid token")),
        )),
        None => Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Authorization required")),
        )),
    }
}

// ============================================================================
// Shared response shapes
// ============================================================================

/// A refreshed list, returned after every successful write.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> ListResponse<T> {
    fn of(items: Vec<T>) -> Self {
        let total = items.len();
        Self { items, total }
    }
}

fn store_unavailable() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ErrorResponse::new("Store not available")),
    )
        .into_response()
}

/// Write failures surface the backend's message verbatim; the admin UI
/// shows it in a blocking alert.
fn write_failed(error: StoreError) -> Response {
    tracing::error!(error = %error, "admin write failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(error.to_string())),
    )
        .into_response()
}

fn read_failed(error: StoreError) -> Response {
    tracing::error!(error = %error, "admin read failed");
    (
        StatusCode::BAD_GATEWAY,
        Json(ErrorResponse::new(error.to_string())),
    )
        .into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Not found")),
    )
        .into_response()
}

// ============================================================================
// Dashboard statistics
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub knowledge: u64,
    pub skills: u64,
    pub projects: u64,
    pub certificates: u64,
    pub chats: u64,
}

async fn count_or_zero(store: &Store, collection: &str, filters: &[(&str, String)]) -> u64 {
    match store.count(collection, filters).await {
        Ok(n) => n,
        Err(e) => {
            tracing::warn!(collection, error = %e, "count query failed");
            0
        }
    }
}

/// GET /api/admin/stats
pub async fn get_stats(headers: HeaderMap) -> Response {
    if let Err(err) = verify_admin(&headers) {
        return err.into_response();
    }
    let Some(store) = store::get_store() else {
        return store_unavailable();
    };

    let kind_filter = |kind: BlockKind| vec![("type", kind.as_str().to_string())];
    let (knowledge, skills, projects, certificates, chats) = tokio::join!(
        count_or_zero(&store, CHATBOT_KNOWLEDGE, &[]),
        count_or_zero(&store, CONTENT_BLOCKS, &kind_filter(BlockKind::Skill)),
        count_or_zero(&store, CONTENT_BLOCKS, &kind_filter(BlockKind::Project)),
        count_or_zero(&store, CONTENT_BLOCKS, &kind_filter(BlockKind::Certificate)),
        count_or_zero(&store, CHAT_HISTORY, &[]),
    );

    (
        StatusCode::OK,
        Json(StatsResponse {
            knowledge,
            skills,
            projects,
            certificates,
            chats,
        }),
    )
        .into_response()
}

// ============================================================================
// Content blocks (generic CRUD)
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct BlockListQuery {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateBlockRequest {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub url: Option<Value>,
    pub metadata: Option<Value>,
    #[serde(default)]
    pub is_featured: bool,
    pub display_order: Option<i32>,
}

/// Update payload. There is deliberately no `type` field: a block keeps
/// its kind for life.
#[derive(Debug, Deserialize)]
pub struct UpdateBlockRequest {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub url: Option<Value>,
    pub metadata: Option<Value>,
    pub is_featured: Option<bool>,
    pub display_order: Option<i32>,
}

async fn refreshed_blocks(store: &Store, kind: BlockKind) -> Result<Response, StoreError> {
    let items = portfolio::fetch_blocks(store, kind).await?;
    Ok((StatusCode::OK, Json(ListResponse::of(items))).into_response())
}

async fn find_block(store: &Store, id: i64) -> Result<Option<ContentBlock>, StoreError> {
    let rows: Vec<ContentBlock> = store
        .select(CONTENT_BLOCKS, &Query::new().eq("id", id).limit(1))
        .await?;
    Ok(rows.into_iter().next())
}

/// GET /api/admin/blocks?type=...
pub async fn list_blocks(headers: HeaderMap, UrlQuery(query): UrlQuery<BlockListQuery>) -> Response {
    if let Err(err) = verify_admin(&headers) {
        return err.into_response();
    }
    let Some(kind) = BlockKind::parse(&query.kind) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!(
                "Unknown content type '{}'",
                query.kind
            ))),
        )
            .into_response();
    };
    let Some(store) = store::get_store() else {
        return store_unavailable();
    };
    match refreshed_blocks(&store, kind).await {
        Ok(response) => response,
        Err(e) => read_failed(e),
    }
}

/// POST /api/admin/blocks
pub async fn create_block(
    headers: HeaderMap,
    Json(payload): Json<CreateBlockRequest>,
) -> Response {
    if let Err(err) = verify_admin(&headers) {
        return err.into_response();
    }
    if payload.title.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Title is required")),
        )
            .into_response();
    }
    let Some(store) = store::get_store() else {
        return store_unavailable();
    };

    // New blocks land at the end of their kind's display order.
    let display_order = match payload.display_order {
        Some(order) => order,
        None => {
            let existing = store
                .count(
                    CONTENT_BLOCKS,
                    &[("type", payload.kind.as_str().to_string())],
                )
                .await
                .unwrap_or(0);
            existing as i32 + 1
        }
    };

    let row = NewContentBlock {
        kind: payload.kind,
        title: payload.title.trim().to_string(),
        subtitle: payload.subtitle,
        description: payload.description,
        long_description: payload.long_description,
        url: payload.url,
        metadata: payload.metadata,
        is_featured: payload.is_featured,
        display_order,
    };

    let inserted: Result<Vec<ContentBlock>, _> = store.insert(CONTENT_BLOCKS, &[row]).await;
    if let Err(e) = inserted {
        return write_failed(e);
    }
    match refreshed_blocks(&store, payload.kind).await {
        Ok(response) => response,
        Err(e) => read_failed(e),
    }
}

/// PATCH /api/admin/blocks/{id}
pub async fn update_block(
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateBlockRequest>,
) -> Response {
    if let Err(err) = verify_admin(&headers) {
        return err.into_response();
    }
    let Some(store) = store::get_store() else {
        return store_unavailable();
    };

    let existing = match find_block(&store, id).await {
        Ok(Some(block)) => block,
        Ok(None) => return not_found(),
        Err(e) => return read_failed(e),
    };

    let patch = ContentBlockPatch {
        title: payload.title,
        subtitle: payload.subtitle,
        description: payload.description,
        long_description: payload.long_description,
        url: payload.url,
        metadata: payload.metadata,
        is_featured: payload.is_featured,
        display_order: payload.display_order,
    };
    let updated: Result<Vec<ContentBlock>, _> = store.update(CONTENT_BLOCKS, id, &patch).await;
    if let Err(e) = updated {
        return write_failed(e);
    }
    match refreshed_blocks(&store, existing.kind).await {
        Ok(response) => response,
        Err(e) => read_failed(e),
    }
}

/// DELETE /api/admin/blocks/{id}
pub async fn delete_block(headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(err) = verify_admin(&headers) {
        return err.into_response();
    }
    let Some(store) = store::get_store() else {
        return store_unavailable();
    };

    let existing = match find_block(&store, id).await {
        Ok(Some(block)) => block,
        Ok(None) => return not_found(),
        Err(e) => return read_failed(e),
    };
    if let Err(e) = store.delete(CONTENT_BLOCKS, id).await {
        return write_failed(e);
    }
    match refreshed_blocks(&store, existing.kind).await {
        Ok(response) => response,
        Err(e) => read_failed(e),
    }
}

// ============================================================================
// Profile (personal info)
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SaveProfileRequest {
    pub name: String,
    pub display_name: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub resume_url: Option<String>,
}

/// PUT /api/admin/profile
///
/// The profile is a singleton by read pattern: the existing row is updated
/// in place when there is one, otherwise the first row is created.
pub async fn save_profile(
    headers: HeaderMap,
    Json(payload): Json<SaveProfileRequest>,
) -> Response {
    if let Err(err) = verify_admin(&headers) {
        return err.into_response();
    }
    if payload.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Name is required")),
        )
            .into_response();
    }
    let Some(store) = store::get_store() else {
        return store_unavailable();
    };

    let existing = match portfolio::fetch_profile(&store).await {
        Ok(profile) => profile,
        Err(e) => return read_failed(e),
    };

    let row = ProfileUpsert {
        name: payload.name.trim().to_string(),
        display_name: payload.display_name,
        title: payload.title,
        bio: payload.bio,
        email: payload.email,
        phone: payload.phone,
        location: payload.location,
        avatar_url: payload.avatar_url,
        resume_url: payload.resume_url,
    };
    let written = match existing {
        Some(profile) => store
            .update::<Profile, _>(portfolio::PERSONAL_INFO, profile.id, &row)
            .await
            .map(|_| ()),
        None => store.insert_only(portfolio::PERSONAL_INFO, &[row]).await,
    };
    if let Err(e) = written {
        return write_failed(e);
    }

    match portfolio::fetch_profile(&store).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => read_failed(e),
    }
}

// ============================================================================
// Projects (join-table variant, with technology relinking)
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SaveProjectRequest {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub demo_url: Option<String>,
    pub github_url: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    /// Comma-separated technology names, exactly as typed in the admin form.
    #[serde(default)]
    pub technologies: String,
}

async fn refreshed_projects(store: &Store) -> Result<Response, StoreError> {
    let items = portfolio::fetch_projects_with_technologies(store).await?;
    Ok((StatusCode::OK, Json(ListResponse::of(items))).into_response())
}

fn validate_project(payload: &SaveProjectRequest) -> Option<Response> {
    if payload.title.trim().is_empty() || payload.description.trim().is_empty() {
        return Some(
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Title and description are required")),
            )
                .into_response(),
        );
    }
    None
}

/// GET /api/admin/projects
pub async fn list_projects(headers: HeaderMap) -> Response {
    if let Err(err) = verify_admin(&headers) {
        return err.into_response();
    }
    let Some(store) = store::get_store() else {
        return store_unavailable();
    };
    match refreshed_projects(&store).await {
        Ok(response) => response,
        Err(e) => read_failed(e),
    }
}

/// POST /api/admin/projects
pub async fn create_project(
    headers: HeaderMap,
    Json(payload): Json<SaveProjectRequest>,
) -> Response {
    if let Err(err) = verify_admin(&headers) {
        return err.into_response();
    }
    if let Some(invalid) = validate_project(&payload) {
        return invalid;
    }
    let Some(store) = store::get_store() else {
        return store_unavailable();
    };

    let names = portfolio::split_technology_names(&payload.technologies);
    let tech_ids = match portfolio::resolve_technology_ids(&store, &names).await {
        Ok(ids) => ids,
        Err(e) => return write_failed(e),
    };

    let display_order = store.count(PROJECTS, &[]).await.unwrap_or(0) as i32 + 1;
    let row = NewProjectRow {
        title: payload.title.trim().to_string(),
        description: payload.description.trim().to_string(),
        image_url: payload.image_url,
        demo_url: payload.demo_url,
        github_url: payload.github_url,
        status: payload.status.unwrap_or_else(|| "completed".to_string()),
        is_featured: payload.is_featured,
        display_order,
    };
    let inserted: Vec<ProjectRow> = match store.insert(PROJECTS, &[row]).await {
        Ok(rows) => rows,
        Err(e) => return write_failed(e),
    };
    let Some(project) = inserted.into_iter().next() else {
        return write_failed(StoreError::Decode(
            "project insert returned no row".to_string(),
        ));
    };

    if let Err(e) = portfolio::relink_technologies(&store, project.id, &tech_ids).await {
        return write_failed(e);
    }
    match refreshed_projects(&store).await {
        Ok(response) => response,
        Err(e) => read_failed(e),
    }
}

/// PATCH /api/admin/projects/{id}
pub async fn update_project(
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<SaveProjectRequest>,
) -> Response {
    if let Err(err) = verify_admin(&headers) {
        return err.into_response();
    }
    if let Some(invalid) = validate_project(&payload) {
        return invalid;
    }
    let Some(store) = store::get_store() else {
        return store_unavailable();
    };

    let names = portfolio::split_technology_names(&payload.technologies);
    let tech_ids = match portfolio::resolve_technology_ids(&store, &names).await {
        Ok(ids) => ids,
        Err(e) => return write_failed(e),
    };

    let patch = ProjectRowPatch {
        title: Some(payload.title.trim().to_string()),
        description: Some(payload.description.trim().to_string()),
        image_url: payload.image_url,
        demo_url: payload.demo_url,
        github_url: payload.github_url,
        status: payload.status,
        is_featured: Some(payload.is_featured),
    };
    let updated: Vec<ProjectRow> = match store.update(PROJECTS, id, &patch).await {
        Ok(rows) => rows,
        Err(e) => return write_failed(e),
    };
    if updated.is_empty() {
        return not_found();
    }

    if let Err(e) = portfolio::relink_technologies(&store, id, &tech_ids).await {
        return write_failed(e);
    }
    match refreshed_projects(&store).await {
        Ok(response) => response,
        Err(e) => read_failed(e),
    }
}

/// DELETE /api/admin/projects/{id}
pub async fn delete_project(headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(err) = verify_admin(&headers) {
        return err.into_response();
    }
    let Some(store) = store::get_store() else {
        return store_unavailable();
    };

    // Links first so a deleted project never leaves orphan joins behind.
    if let Err(e) = store
        .delete_where(
            portfolio::PROJECT_TECHNOLOGIES,
            &[("project_id", id.to_string())],
        )
        .await
    {
        return write_failed(e);
    }
    if let Err(e) = store.delete(PROJECTS, id).await {
        return write_failed(e);
    }
    match refreshed_projects(&store).await {
        Ok(response) => response,
        Err(e) => read_failed(e),
    }
}

// ============================================================================
// Chatbot knowledge base
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SaveKnowledgeRequest {
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub is_active: Option<bool>,
}

async fn refreshed_knowledge(store: &Store) -> Result<Response, StoreError> {
    let items: Vec<KnowledgeEntry> = store
        .select(CHATBOT_KNOWLEDGE, &Query::new().order_by("id", true))
        .await?;
    Ok((StatusCode::OK, Json(ListResponse::of(items))).into_response())
}

fn validate_knowledge(payload: &SaveKnowledgeRequest) -> Option<Response> {
    if payload.question.trim().is_empty() || payload.answer.trim().is_empty() {
        return Some(
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Question and answer are required")),
            )
                .into_response(),
        );
    }
    None
}

/// GET /api/admin/knowledge
pub async fn list_knowledge(headers: HeaderMap) -> Response {
    if let Err(err) = verify_admin(&headers) {
        return err.into_response();
    }
    let Some(store) = store::get_store() else {
        return store_unavailable();
    };
    match refreshed_knowledge(&store).await {
        Ok(response) => response,
        Err(e) => read_failed(e),
    }
}

/// POST /api/admin/knowledge
pub async fn create_knowledge(
    headers: HeaderMap,
    Json(payload): Json<SaveKnowledgeRequest>,
) -> Response {
    if let Err(err) = verify_admin(&headers) {
        return err.into_response();
    }
    if let Some(invalid) = validate_knowledge(&payload) {
        return invalid;
    }
    let Some(store) = store::get_store() else {
        return store_unavailable();
    };

    let row = NewKnowledgeEntry {
        question: payload.question.trim().to_string(),
        answer: payload.answer.trim().to_string(),
        category: payload.category,
        keywords: payload.keywords,
        is_active: payload.is_active.unwrap_or(true),
    };
    if let Err(e) = store.insert_only(CHATBOT_KNOWLEDGE, &[row]).await {
        return write_failed(e);
    }
    match refreshed_knowledge(&store).await {
        Ok(response) => response,
        Err(e) => read_failed(e),
    }
}

/// PATCH /api/admin/knowledge/{id}
pub async fn update_knowledge(
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<SaveKnowledgeRequest>,
) -> Response {
    if let Err(err) = verify_admin(&headers) {
        return err.into_response();
    }
    if let Some(invalid) = validate_knowledge(&payload) {
        return invalid;
    }
    let Some(store) = store::get_store() else {
        return store_unavailable();
    };

    let patch = KnowledgeEntryPatch {
        question: Some(payload.question.trim().to_string()),
        answer: Some(payload.answer.trim().to_string()),
        category: payload.category,
        keywords: Some(payload.keywords),
        is_active: payload.is_active,
    };
    let updated: Vec<KnowledgeEntry> = match store.update(CHATBOT_KNOWLEDGE, id, &patch).await {
        Ok(rows) => rows,
        Err(e) => return write_failed(e),
    };
    if updated.is_empty() {
        return not_found();
    }
    match refreshed_knowledge(&store).await {
        Ok(response) => response,
        Err(e) => read_failed(e),
    }
}

/// DELETE /api/admin/knowledge/{id}
pub async fn delete_knowledge(headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(err) = verify_admin(&headers) {
        return err.into_response();
    }
    let Some(store) = store::get_store() else {
        return store_unavailable();
    };
    if let Err(e) = store.delete(CHATBOT_KNOWLEDGE, id).await {
        return write_failed(e);
    }
    match refreshed_knowledge(&store).await {
        Ok(response) => response,
        Err(e) => read_failed(e),
    }
}

// ============================================================================
// Contact messages
// ============================================================================

#[derive(Debug, Serialize)]
struct MarkReadPatch {
    is_read: bool,
    replied_at: DateTime<Utc>,
}

async fn refreshed_messages(store: &Store) -> Result<Response, StoreError> {
    let items: Vec<ContactMessage> = store
        .select(
            CONTACT_MESSAGES,
            &Query::new().order_by("created_at", false),
        )
        .await?;
    Ok((StatusCode::OK, Json(ListResponse::of(items))).into_response())
}

/// GET /api/admin/messages
pub async fn list_messages(headers: HeaderMap) -> Response {
    if let Err(err) = verify_admin(&headers) {
        return err.into_response();
    }
    let Some(store) = store::get_store() else {
        return store_unavailable();
    };
    match refreshed_messages(&store).await {
        Ok(response) => response,
        Err(e) => read_failed(e),
    }
}

/// PATCH /api/admin/messages/{id}/read
pub async fn mark_message_read(headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(err) = verify_admin(&headers) {
        return err.into_response();
    }
    let Some(store) = store::get_store() else {
        return store_unavailable();
    };

    let patch = MarkReadPatch {
        is_read: true,
        replied_at: Utc::now(),
    };
    let updated: Vec<ContactMessage> = match store.update(CONTACT_MESSAGES, id, &patch).await {
        Ok(rows) => rows,
        Err(e) => return write_failed(e),
    };
    if updated.is_empty() {
        return not_found();
    }
    match refreshed_messages(&store).await {
        Ok(response) => response,
        Err(e) => read_failed(e),
    }
}

// ============================================================================
// Site settings
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SaveSettingRequest {
    pub value: String,
}

#[derive(Debug, Serialize)]
struct SettingValuePatch {
    setting_value: String,
}

#[derive(Debug, Serialize)]
struct NewSettingRow {
    setting_key: String,
    setting_value: String,
}

/// PUT /api/admin/settings/{key}
///
/// Upsert by key, then refresh the live settings cache so public reads
/// pick the change up immediately.
pub async fn save_setting(
    headers: HeaderMap,
    Path(key): Path<String>,
    Json(payload): Json<SaveSettingRequest>,
) -> Response {
    if let Err(err) = verify_admin(&headers) {
        return err.into_response();
    }
    let key = key.trim().to_string();
    if key.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Setting key is required")),
        )
            .into_response();
    }
    let Some(store) = store::get_store() else {
        return store_unavailable();
    };

    let updated: Vec<SiteSetting> = match store
        .update_where(
            SITE_SETTINGS,
            &[("setting_key", key.clone())],
            &SettingValuePatch {
                setting_value: payload.value.clone(),
            },
        )
        .await
    {
        Ok(rows) => rows,
        Err(e) => return write_failed(e),
    };
    if updated.is_empty() {
        let row = NewSettingRow {
            setting_key: key.clone(),
            setting_value: payload.value.clone(),
        };
        if let Err(e) = store.insert_only(SITE_SETTINGS, &[row]).await {
            return write_failed(e);
        }
    }

    if let Some(cache) = settings::get() {
        cache.refresh(&store).await;
        return (StatusCode::OK, Json(cache.resolved().await)).into_response();
    }
    (StatusCode::OK, Json(SuccessResponse { success: true })).into_response()
}
