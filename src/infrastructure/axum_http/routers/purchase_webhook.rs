use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    application::usercases::purchase_ingestion::PurchaseIngestionUseCase,
    config::config_model::WebhookSecret,
    domain::value_objects::{
        enums::plan_types::PlanType,
        ingestion::{IngestError, IngestionOutcome},
        purchase_events::PurchaseWebhookBody,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        repositories::{entitlements::EntitlementPostgres, identities::IdentityPostgres},
    },
};

#[derive(Clone)]
pub struct PurchaseWebhookState {
    secret: Arc<WebhookSecret>,
    usecase: Arc<PurchaseIngestionUseCase>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>, secret: WebhookSecret) -> Router {
    let identity_repository = IdentityPostgres::new(Arc::clone(&db_pool));
    let entitlement_repository = EntitlementPostgres::new(Arc::clone(&db_pool));
    let usecase = PurchaseIngestionUseCase::new(
        Arc::new(identity_repository),
        Arc::new(entitlement_repository),
    );

    Router::new()
        .route("/purchases", post(ingest_purchase).options(preflight))
        .with_state(PurchaseWebhookState {
            secret: Arc::new(secret),
            usecase: Arc::new(usecase),
        })
}

#[derive(Debug, Serialize)]
pub struct GrantResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlanType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GrantResponse {
    fn from_outcome(outcome: &IngestionOutcome) -> Self {
        match outcome {
            IngestionOutcome::Granted(granted) => Self {
                success: true,
                user_id: Some(granted.user_id),
                plan: Some(granted.plan),
                end_date: Some(granted.ends_at),
                message: None,
            },
            IngestionOutcome::Rejected(reason) => Self {
                success: true,
                user_id: None,
                plan: None,
                end_date: None,
                message: Some(reason.to_string()),
            },
            IngestionOutcome::Skipped(reason) => Self {
                success: true,
                user_id: None,
                plan: None,
                end_date: None,
                message: Some(reason.to_string()),
            },
        }
    }
}

pub async fn ingest_purchase(
    State(state): State<PurchaseWebhookState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    if let Err(status) = authorize_bearer(&headers, &state.secret.token) {
        return (status, "unauthorized").into_response();
    }

    // Parsed by hand so unreadable bodies answer 400 rather than the
    // extractor's 422.
    let payload: PurchaseWebhookBody = match serde_json::from_str(&body) {
        Ok(payload) => payload,
        Err(err) => {
            return IngestError::Validation(format!("unreadable purchase payload: {err}"))
                .into_response();
        }
    };

    let result = match payload {
        PurchaseWebhookBody::Direct(request) => {
            info!(
                email = %request.email,
                plan = %request.plan,
                "purchase_webhook: direct grant received"
            );
            state.usecase.ingest(request.into_event()).await
        }
        PurchaseWebhookBody::Storefront(webhook) => state.usecase.ingest_storefront(webhook).await,
    };

    match result {
        Ok(outcome) => Json(GrantResponse::from_outcome(&outcome)).into_response(),
        Err(err) => {
            error!(error = %err, "purchase_webhook: ingestion failed");
            err.into_response()
        }
    }
}

// Cross-origin preflight; answered with no body.
pub async fn preflight() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

fn authorize_bearer(headers: &HeaderMap, expected_token: &str) -> Result<(), StatusCode> {
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if token == expected_token {
        Ok(())
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}
