//! Error types for vote submission from the client.
use caption_votes_shared::messages;
use thiserror::Error;

/// How the deck reacts to a failed submission of the head item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The item is unusable or already resolved: drop it and move on.
    Skip,
    /// Keep the item and let the user try again.
    Retry,
}

/// Represents a failed vote submission as seen by the client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmissionError {
    /// The server answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The request never produced a response.
    #[error("{0}")]
    Network(String),
}

impl SubmissionError {
    pub fn rejected(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| messages::SUBMIT_FAILED_FALLBACK.to_string());
        SubmissionError::Rejected { status, message }
    }

    /// Validation (400), missing caption (404) and duplicate vote (409) are
    /// final for the item; everything else can be retried.
    pub fn disposition(&self) -> Disposition {
        match self {
            SubmissionError::Rejected {
                status: 400 | 404 | 409,
                ..
            } => Disposition::Skip,
            SubmissionError::Rejected { .. } | SubmissionError::Network(_) => Disposition::Retry,
        }
    }

    /// Message for the error banner.
    pub fn banner(&self) -> String {
        let text = self.to_string();
        if text.trim().is_empty() {
            messages::SUBMIT_FAILED_FALLBACK.to_string()
        } else {
            text
        }
    }
}

impl From<reqwest::Error> for SubmissionError {
    fn from(err: reqwest::Error) -> Self {
        SubmissionError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispositions() {
        for status in [400, 404, 409] {
            assert_eq!(
                SubmissionError::rejected(status, None).disposition(),
                Disposition::Skip
            );
        }
        for status in [401, 403, 500, 502, 503] {
            assert_eq!(
                SubmissionError::rejected(status, None).disposition(),
                Disposition::Retry
            );
        }
        assert_eq!(
            SubmissionError::Network("connection refused".into()).disposition(),
            Disposition::Retry
        );
    }

    #[test]
    fn test_banner_falls_back_when_message_is_missing() {
        assert_eq!(
            SubmissionError::rejected(500, Some("  ".into())).banner(),
            "Failed to submit vote"
        );
        assert_eq!(
            SubmissionError::rejected(500, Some("disk full".into())).banner(),
            "disk full"
        );
        assert_eq!(SubmissionError::Network(String::new()).banner(), "Failed to submit vote");
    }
}
