//! HTTP client for the caption vote endpoints.
use async_trait::async_trait;
use caption_votes_shared::types::{
    CaptionId, ErrorBody, QueueItem, SubmitVoteRequest, UserId, VoteValue,
};
use tracing::debug;

use crate::errors::SubmissionError;
use crate::submitter::SubmitVote;

pub const VOTE_PATH: &str = "/api/caption-votes";
pub const QUEUE_PATH: &str = "/api/queue";
pub const DEFAULT_USER_HEADER: &str = "x-user-id";

/// Talks to the caption votes server on behalf of one user.
///
/// Identity is forwarded in a header, the way the upstream gateway passes
/// the authenticated user to the server.
#[derive(Clone)]
pub struct HttpVoteClient {
    client: reqwest::Client,
    base_url: String,
    user_header: String,
    user_id: UserId,
}

impl HttpVoteClient {
    pub fn new(base_url: impl Into<String>, user_id: impl Into<UserId>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_header: DEFAULT_USER_HEADER.to_string(),
            user_id: user_id.into(),
        }
    }

    pub fn with_user_header(mut self, header: impl Into<String>) -> Self {
        self.user_header = header.into();
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Fetches the session's queue seed.
    pub async fn fetch_queue(&self) -> Result<Vec<QueueItem>, SubmissionError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, QUEUE_PATH))
            .header(self.user_header.as_str(), self.user_id.as_str())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(rejection(response).await);
        }
        Ok(response.json::<Vec<QueueItem>>().await?)
    }
}

async fn rejection(response: reqwest::Response) -> SubmissionError {
    let status = response.status().as_u16();
    let message = response.json::<ErrorBody>().await.ok().map(|body| body.error);
    SubmissionError::rejected(status, message)
}

#[async_trait]
impl SubmitVote for HttpVoteClient {
    async fn submit(
        &self,
        caption_id: &CaptionId,
        vote_value: VoteValue,
    ) -> Result<(), SubmissionError> {
        let body = SubmitVoteRequest {
            caption_id: caption_id.clone(),
            vote_value: i64::from(vote_value.as_i16()),
        };
        let response = self
            .client
            .post(format!("{}{}", self.base_url, VOTE_PATH))
            .header(self.user_header.as_str(), self.user_id.as_str())
            .json(&body)
            .send()
            .await?;

        if response.status().is_success() {
            debug!(caption_id = %caption_id, "Vote submitted");
            return Ok(());
        }
        Err(rejection(response).await)
    }
}
