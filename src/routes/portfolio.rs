/**
 * Portfolio Routes
 * Public read endpoints consumed by the site pages.
 */
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::routes::ErrorResponse;
use crate::{portfolio, settings, store};

/// Uniform read envelope: data plus an optional inline error message. A
/// failed read keeps whatever the caller already has on screen; the error
/// rides alongside instead of replacing it.
#[derive(Debug, Serialize)]
pub struct ReadResponse<T> {
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn store_unavailable() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ErrorResponse::new("Store not available")),
    )
        .into_response()
}

fn read_failed(context: &'static str, error: store::StoreError) -> Response {
    tracing::error!(error = %error, "failed to fetch {}", context);
    (
        StatusCode::BAD_GATEWAY,
        Json(ReadResponse::<()> {
            data: None,
            error: Some(error.to_string()),
        }),
    )
        .into_response()
}

fn ok<T: Serialize>(data: T) -> Response {
    (
        StatusCode::OK,
        Json(ReadResponse {
            data: Some(data),
            error: None,
        }),
    )
        .into_response()
}

/// GET /api/profile
pub async fn get_profile() -> Response {
    let Some(store) = store::get_store() else {
        return store_unavailable();
    };
    match portfolio::fetch_profile(&store).await {
        Ok(profile) => ok(profile),
        Err(e) => read_failed("profile", e),
    }
}

/// GET /api/projects
pub async fn get_projects() -> Response {
    let Some(store) = store::get_store() else {
        return store_unavailable();
    };
    match portfolio::fetch_projects(&store).await {
        Ok(projects) => ok(projects),
        Err(e) => read_failed("projects", e),
    }
}

/// GET /api/skills
pub async fn get_skills() -> Response {
    let Some(store) = store::get_store() else {
        return store_unavailable();
    };
    match portfolio::fetch_skills(&store).await {
        Ok(skills) => ok(skills),
        Err(e) => read_failed("skills", e),
    }
}

/// GET /api/skills/grouped - category -> skill names, for the About page
pub async fn get_skills_grouped() -> Response {
    let Some(store) = store::get_store() else {
        return store_unavailable();
    };
    match portfolio::fetch_skills(&store).await {
        Ok(skills) => ok(portfolio::group_skills_by_category(&skills)),
        Err(e) => read_failed("skills", e),
    }
}

/// GET /api/certificates
pub async fn get_certificates() -> Response {
    let Some(store) = store::get_store() else {
        return store_unavailable();
    };
    match portfolio::fetch_certificates(&store).await {
        Ok(certificates) => ok(certificates),
        Err(e) => read_failed("certificates", e),
    }
}

/// GET /api/roles
pub async fn get_roles() -> Response {
    let Some(store) = store::get_store() else {
        return store_unavailable();
    };
    match portfolio::fetch_roles(&store).await {
        Ok(roles) => ok(roles),
        Err(e) => read_failed("roles", e),
    }
}

/// GET /api/social-links
pub async fn get_social_links() -> Response {
    let Some(store) = store::get_store() else {
        return store_unavailable();
    };
    match portfolio::fetch_social_links(&store).await {
        Ok(links) => ok(links),
        Err(e) => read_failed("social links", e),
    }
}

/// GET /api/settings - resolved settings map.
///
/// Served from the live cache: when the last refresh failed, the previous
/// values are still returned and the refresh error rides in the envelope.
pub async fn get_settings() -> Response {
    let Some(cache) = settings::get() else {
        // Cache never initialized (tests, partial startup): serve defaults.
        return ok(settings::resolve(&[]));
    };
    let data = cache.resolved().await;
    let error = cache.last_error().await;
    (
        StatusCode::OK,
        Json(ReadResponse {
            data: Some(data),
            error,
        }),
    )
        .into_response()
}
