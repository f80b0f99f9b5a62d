use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{ConversationId, ProfileField, UserProfile};
use super::eligibility::{EligibilityEngine, MatchBasis, RuleCheck};
use super::generation::TextGenerator;
use super::service::{AdvisorService, AdvisorServiceError};
use super::store::{ConversationStore, StoreError};
use crate::catalog::{Scheme, SchemeCatalog};
use crate::error::AppError;

/// Router builder exposing the conversation boundary over HTTP.
pub fn advisor_router<S, G>(service: Arc<AdvisorService<S, G>>) -> Router
where
    S: ConversationStore + 'static,
    G: TextGenerator + 'static,
{
    Router::new()
        .route("/api/v1/conversations", post(create_handler::<S, G>))
        .route(
            "/api/v1/conversations/:conversation_id/profile",
            post(profile_handler::<S, G>),
        )
        .route(
            "/api/v1/conversations/:conversation_id/messages",
            post(message_handler::<S, G>),
        )
        .route(
            "/api/v1/conversations/:conversation_id/reset",
            post(reset_handler::<S, G>),
        )
        .route(
            "/api/v1/conversations/archived",
            axum::routing::get(archived_handler::<S, G>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileFieldPayload {
    pub field: ProfileField,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessagePayload {
    pub message: String,
}

pub(crate) async fn create_handler<S, G>(
    State(service): State<Arc<AdvisorService<S, G>>>,
) -> Response
where
    S: ConversationStore + 'static,
    G: TextGenerator + 'static,
{
    match service.start_conversation() {
        Ok(id) => {
            let payload = json!({ "conversation_id": id.0 });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn profile_handler<S, G>(
    State(service): State<Arc<AdvisorService<S, G>>>,
    Path(conversation_id): Path<String>,
    axum::Json(payload): axum::Json<ProfileFieldPayload>,
) -> Response
where
    S: ConversationStore + 'static,
    G: TextGenerator + 'static,
{
    let id = ConversationId(conversation_id);
    match service.submit_profile_field(&id, payload.field, &payload.value) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(AdvisorServiceError::Profile(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn message_handler<S, G>(
    State(service): State<Arc<AdvisorService<S, G>>>,
    Path(conversation_id): Path<String>,
    axum::Json(payload): axum::Json<MessagePayload>,
) -> Response
where
    S: ConversationStore + 'static,
    G: TextGenerator + 'static,
{
    let id = ConversationId(conversation_id);
    match service.submit_message(&id, &payload.message) {
        Ok(reply) => (StatusCode::OK, axum::Json(reply)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reset_handler<S, G>(
    State(service): State<Arc<AdvisorService<S, G>>>,
    Path(conversation_id): Path<String>,
) -> Response
where
    S: ConversationStore + 'static,
    G: TextGenerator + 'static,
{
    let id = ConversationId(conversation_id);
    match service.reset_conversation(&id) {
        Ok(chat) => {
            let payload = json!({ "archived_title": chat.title });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn archived_handler<S, G>(
    State(service): State<Arc<AdvisorService<S, G>>>,
) -> Response
where
    S: ConversationStore + 'static,
    G: TextGenerator + 'static,
{
    match service.archived_chats() {
        Ok(chats) => (StatusCode::OK, axum::Json(chats)).into_response(),
        Err(error) => error_response(error),
    }
}

/// Router builder for the stateless one-shot recommendation endpoint.
///
/// The catalog is reloaded from the configured path on every request, so
/// edits to the file are picked up without a restart. A file that cannot be
/// read or parsed surfaces as a 503 with a retry hint.
pub fn recommendation_router(catalog_path: PathBuf) -> Router {
    Router::new()
        .route("/api/v1/recommendations", post(recommendation_handler))
        .with_state(Arc::new(catalog_path))
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecommendationPayload {
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    /// Include the per-rule breakdown for every catalog scheme.
    #[serde(default)]
    pub include_checks: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct RecommendationResponse {
    basis: MatchBasis,
    schemes: Vec<Arc<Scheme>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    checks: Option<Vec<SchemeRuleReport>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SchemeRuleReport {
    scheme_name: String,
    checks: Vec<RuleCheck>,
}

pub(crate) async fn recommendation_handler(
    State(catalog_path): State<Arc<PathBuf>>,
    Json(payload): Json<RecommendationPayload>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let catalog = SchemeCatalog::load(catalog_path.as_ref())?;

    let profile = UserProfile {
        age: payload.age,
        education: payload.education,
        gender: payload.gender,
        occupation: payload.occupation,
        state: payload.state,
    };

    let engine = EligibilityEngine::default();
    let outcome = engine.filter(&profile, &catalog);

    let checks = payload.include_checks.then(|| {
        catalog
            .schemes()
            .iter()
            .map(|scheme| SchemeRuleReport {
                scheme_name: scheme.scheme_name.clone(),
                checks: engine.audit(&profile, scheme),
            })
            .collect()
    });

    Ok(Json(RecommendationResponse {
        basis: outcome.basis,
        schemes: outcome.schemes,
        checks,
    }))
}

fn error_response(error: AdvisorServiceError) -> Response {
    let status = match &error {
        AdvisorServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        AdvisorServiceError::Profile(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AdvisorServiceError::Store(StoreError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
