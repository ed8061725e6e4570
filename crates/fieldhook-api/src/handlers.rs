//! API handlers
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use fieldhook_core::{Coordinates, PoiSnapshot, Reporter, ResearchDescriptor, ResearchEvent, ResearchKind, FIELDHOOK_VERSION};
use fieldhook_research::{Determination, ResearchInput};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("missing_fields")]
    MissingFields,

    #[error("invalid_data")]
    InvalidData,

    #[error("match_mode_not_implemented")]
    MatchModeNotImplemented,

    #[error("config_error: {0}")]
    Config(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFields | ApiError::InvalidData => StatusCode::BAD_REQUEST,
            ApiError::MatchModeNotImplemented => StatusCode::NOT_IMPLEMENTED,
            ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code returned to the client
    pub fn reason(&self) -> &'static str {
        match self {
            ApiError::MissingFields => "missing_fields",
            ApiError::InvalidData => "invalid_data",
            ApiError::MatchModeNotImplemented => "match_mode_not_implemented",
            ApiError::Config(_) => "config_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(%status, error = %self);
        }
        (status, Json(json!({ "reason": self.reason() }))).into_response()
    }
}

// ============================================================================
// Research reports
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PoiInput {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
pub struct ResearchReport {
    pub reporter: Reporter,
    pub poi: PoiInput,
    pub objective: ResearchInput,
    pub reward: ResearchInput,
}

fn determine(state: &AppState, kind: ResearchKind, input: &ResearchInput, interactive: bool) -> Result<ResearchDescriptor, ApiError> {
    let descriptor = match state.matcher.determine(kind, input, interactive) {
        Determination::Matched(descriptor) => descriptor,
        Determination::NotDetermined | Determination::NoCandidates => return Err(ApiError::MissingFields),
        Determination::NotImplemented => return Err(ApiError::MatchModeNotImplemented),
    };

    if !state.matcher.is_valid(kind, &descriptor.r#type, &descriptor.params) {
        tracing::debug!(%kind, research_type = %descriptor.r#type, "invalid research submitted");
        return Err(ApiError::InvalidData);
    }
    Ok(descriptor)
}

async fn accept_report(state: &AppState, payload: Result<Json<ResearchReport>, JsonRejection>) -> Result<(), ApiError> {
    let Json(report) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "unreadable research report");
        ApiError::MissingFields
    })?;

    let poi = &report.poi;
    if !(-90.0..=90.0).contains(&poi.latitude) || !(-180.0..=180.0).contains(&poi.longitude) {
        return Err(ApiError::InvalidData);
    }

    let interactive = report.reporter.is_interactive();
    let objective = determine(state, ResearchKind::Objective, &report.objective, interactive)?;
    let reward = determine(state, ResearchKind::Reward, &report.reward, interactive)?;

    let event = ResearchEvent {
        poi: PoiSnapshot {
            id: report.poi.id,
            name: report.poi.name,
            location: Coordinates::new(report.poi.latitude, report.poi.longitude),
            objective,
            reward,
        },
        reporter: report.reporter,
        reported_at: Utc::now(),
    };

    let targets = state
        .targets
        .load_targets()
        .map_err(|e| ApiError::Config(e.to_string()))?;

    let dispatched = state.dispatcher.dispatch(&targets, &event).await;
    state.metrics.record_dispatch(&dispatched);
    tracing::info!(
        poi = %event.poi.name,
        objective = %event.poi.objective.r#type,
        reward = %event.poi.reward.r#type,
        eligible = dispatched.eligible,
        delivered = dispatched.delivered.len(),
        "research reported"
    );
    Ok(())
}

pub async fn report_research(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ResearchReport>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    match accept_report(&state, payload).await {
        Ok(()) => {
            state.metrics.record_report("accepted");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(err) => {
            state.metrics.record_report(err.reason());
            Err(err)
        }
    }
}

// ============================================================================
// Service endpoints
// ============================================================================

pub async fn health() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok", "version": FIELDHOOK_VERSION })))
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let body = state.metrics.encode().map_err(|e| ApiError::Config(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ApiError::MissingFields.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidData.reason(), "invalid_data");
        assert_eq!(ApiError::MatchModeNotImplemented.status(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(ApiError::Config("x".to_string()).reason(), "config_error");
    }
}
