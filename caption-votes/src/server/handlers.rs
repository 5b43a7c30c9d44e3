// HTTP request handlers
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use caption_votes_service::{ValidationError, VoteError};
use caption_votes_shared::types::{ErrorBody, QueueItem, UserId, VoteAck};
use serde_json::Value;
use tracing::info;

use crate::server::state::AppState;

/// `VoteError` rendered as `(status, {"error": message})`.
#[derive(Debug)]
pub struct ApiError(pub VoteError);

impl From<VoteError> for ApiError {
    fn from(err: VoteError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorBody::new(self.0.to_string()))).into_response()
    }
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "Caption votes server is running")
}

/// `POST /api/caption-votes`
///
/// The session is checked before the body is looked at, so an anonymous
/// request gets 401 whatever it sends.
pub async fn submit_vote(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<VoteAck>, ApiError> {
    let user_id = authenticate(&state, &headers).await?;
    let (caption_id, vote_value) = parse_vote_body(&body)?;

    let vote = state
        .intake
        .submit_vote(&user_id, &caption_id, vote_value)
        .await?;
    info!(vote_id = %vote.id, caption_id = %vote.caption_id, "Vote accepted");

    Ok(Json(VoteAck::default()))
}

/// `GET /api/queue`: the shuffled captions the user may still vote on.
pub async fn eligible_queue(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<QueueItem>>, ApiError> {
    let user_id = authenticate(&state, &headers).await?;
    let queue = state.eligibility.load_eligible_queue(&user_id).await?;
    Ok(Json(queue))
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<UserId, ApiError> {
    state
        .identity
        .authenticate(headers)
        .await
        .ok_or(ApiError(VoteError::Unauthorized))
}

/// Extracts `captionId` and `voteValue` from a raw request body.
///
/// `captionId` must be a non-empty string. `voteValue` must be a JSON number
/// with an integral value; whether that value is 1 or -1 is left to the
/// intake service. `1.0` counts as `1`, `"1"` is rejected.
pub fn parse_vote_body(body: &[u8]) -> Result<(String, i64), ValidationError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| ValidationError::InvalidJson)?;

    let caption_id = match value.get("captionId") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        _ => return Err(ValidationError::CaptionIdRequired),
    };

    let vote_value = value
        .get("voteValue")
        .and_then(integral_number)
        .ok_or(ValidationError::InvalidVoteValue)?;

    Ok((caption_id, vote_value))
}

fn integral_number(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        _ => None,
    }
}
