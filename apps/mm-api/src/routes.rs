use axum::{
	Json, Router,
	extract::{State, rejection::JsonRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use mm_service::{Error, MatchRequest, MatchResponse, RecommendResponse};

use crate::state::AppState;

const INTERNAL_MESSAGE: &str = "Internal error.";

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/match", post(match_candidates))
		.route("/recommend", post(recommend))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn match_candidates(
	State(state): State<AppState>,
	payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Json<MatchResponse>, ApiError> {
	let Json(req) = payload?;
	let response = state.service.match_candidates(req).await?;

	Ok(Json(response))
}

async fn recommend(
	State(state): State<AppState>,
	payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Json<RecommendResponse>, ApiError> {
	let Json(req) = payload?;
	let response = state.service.recommend(req).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	error: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } =>
				ApiError::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message),
			Error::NotFound { message } =>
				ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", message),
			err @ (Error::Provider { .. } | Error::Index { .. } | Error::Timeout { .. }) => {
				tracing::error!(error = %err, "Request failed.");

				ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", INTERNAL_MESSAGE)
			},
		}
	}
}

impl From<JsonRejection> for ApiError {
	fn from(err: JsonRejection) -> Self {
		ApiError::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", err.body_text())
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, error: self.message };

		(self.status, Json(body)).into_response()
	}
}
