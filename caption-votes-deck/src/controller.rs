//! Queue controller: the client-side state machine of the voting deck.
//!
//! The controller owns the queue seeded for one browsing session. It shows
//! the head item, lets exactly one vote be in flight at a time and applies
//! the outcome through [`Step::for_outcome`]:
//!
//! | Outcome                                  | Step              | Next state                   |
//! |------------------------------------------|-------------------|------------------------------|
//! | success                                  | pop head          | `Idle` / `Exhausted`         |
//! | rejected 400, 404 or 409                 | pop head silently | `Idle` / `Exhausted`         |
//! | any other status, network failure        | keep head, banner | `Idle`                       |
//!
//! When [`DeckOptions::settle_animation`] is set, a pop passes through
//! `Settling` until [`QueueController::settle`] is called.
use std::collections::VecDeque;
use std::sync::Arc;

use caption_votes_shared::types::{CaptionId, QueueItem, VoteValue};
use tokio::sync::Mutex;
use tracing::debug;

use crate::errors::{Disposition, SubmissionError};
use crate::submitter::SubmitVote;

/// Direction the card leaves the screen in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl From<VoteValue> for SwipeDirection {
    fn from(value: VoteValue) -> Self {
        match value {
            VoteValue::Up => SwipeDirection::Right,
            VoteValue::Down => SwipeDirection::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    /// Head item displayed, votes accepted.
    Idle,
    /// A vote for the head item is in flight; new votes are ignored.
    Submitting { direction: SwipeDirection },
    /// The head was just removed and its exit animation is playing.
    Settling { direction: SwipeDirection },
    /// Nothing left to vote on.
    Exhausted,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DeckOptions {
    pub settle_animation: bool,
}

/// A vote that has been started but not yet applied.
///
/// Only the controller creates these, one at a time.
#[derive(Debug)]
pub struct PendingVote {
    caption_id: CaptionId,
    vote_value: VoteValue,
    direction: SwipeDirection,
}

impl PendingVote {
    pub fn caption_id(&self) -> &CaptionId {
        &self.caption_id
    }

    pub fn vote_value(&self) -> VoteValue {
        self.vote_value
    }

    pub fn direction(&self) -> SwipeDirection {
        self.direction
    }
}

/// What to do with the head item after a submission settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Pop,
    Keep { message: String },
}

impl Step {
    pub fn for_outcome(outcome: &Result<(), SubmissionError>) -> Step {
        match outcome {
            Ok(()) => Step::Pop,
            Err(err) => match err.disposition() {
                Disposition::Skip => Step::Pop,
                Disposition::Retry => Step::Keep {
                    message: err.banner(),
                },
            },
        }
    }
}

/// Result of applying a submission outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The vote was stored; the item left the queue.
    Advanced { caption_id: CaptionId },
    /// The item was dropped without a stored vote from this submission.
    Skipped {
        caption_id: CaptionId,
        error: SubmissionError,
    },
    /// The item stays at the head and the error is shown.
    Retained { caption_id: CaptionId, message: String },
    /// The outcome does not belong to the current in-flight vote.
    Stale,
}

/// Render-ready snapshot of the deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckView<'a> {
    /// The session was seeded with nothing to vote on.
    NoItems,
    /// Every seeded item has been handled.
    AllDone,
    Current {
        item: &'a QueueItem,
        caption_text: String,
        position: usize,
        total: usize,
        state: QueueState,
        error: Option<&'a str>,
    },
}

/// Client-held voting queue for one session.
pub struct QueueController {
    queue: VecDeque<QueueItem>,
    total: usize,
    state: QueueState,
    error: Option<String>,
    options: DeckOptions,
}

impl QueueController {
    /// Creates a controller seeded once with the eligible items, head first.
    pub fn new(items: Vec<QueueItem>, options: DeckOptions) -> Self {
        let total = items.len();
        let mut controller = Self {
            queue: items.into(),
            total,
            state: QueueState::Idle,
            error: None,
            options,
        };
        controller.state = controller.resting_state();
        controller
    }

    pub fn state(&self) -> QueueState {
        self.state
    }

    pub fn current(&self) -> Option<&QueueItem> {
        self.queue.front()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn completed(&self) -> usize {
        self.total - self.queue.len()
    }

    /// 1-based position of the head item, as in "Image 3 of 10".
    pub fn position(&self) -> Option<usize> {
        self.current().map(|_| self.completed() + 1)
    }

    pub fn is_exhausted(&self) -> bool {
        self.queue.is_empty()
    }

    /// Starts a vote on the head item.
    ///
    /// Returns `None` while another vote is in flight or settling, or when
    /// the queue is empty. Head items without a caption id cannot be
    /// submitted and are dropped here without a request.
    pub fn begin_vote(&mut self, vote_value: VoteValue) -> Option<PendingVote> {
        if self.state != QueueState::Idle {
            debug!(state = ?self.state, "Vote ignored: deck is busy");
            return None;
        }

        while self
            .queue
            .front()
            .is_some_and(|item| item.caption_id.is_empty())
        {
            self.queue.pop_front();
            debug!("Dropped queue item without a caption id");
        }

        let Some(head) = self.queue.front() else {
            self.state = QueueState::Exhausted;
            return None;
        };

        let direction = SwipeDirection::from(vote_value);
        let pending = PendingVote {
            caption_id: head.caption_id.clone(),
            vote_value,
            direction,
        };
        self.error = None;
        self.state = QueueState::Submitting { direction };
        Some(pending)
    }

    /// Applies the outcome of `pending` to the queue.
    pub fn finish_vote(
        &mut self,
        pending: PendingVote,
        outcome: Result<(), SubmissionError>,
    ) -> Transition {
        let in_flight = matches!(self.state, QueueState::Submitting { .. })
            && self.current().map(|item| &item.caption_id) == Some(&pending.caption_id);
        if !in_flight {
            return Transition::Stale;
        }

        let caption_id = pending.caption_id;
        match Step::for_outcome(&outcome) {
            Step::Pop => {
                self.queue.pop_front();
                self.state = if self.options.settle_animation {
                    QueueState::Settling {
                        direction: pending.direction,
                    }
                } else {
                    self.resting_state()
                };
                debug!(caption_id = %caption_id, remaining = self.queue.len(), "Advanced deck");
                match outcome {
                    Ok(()) => Transition::Advanced { caption_id },
                    Err(error) => Transition::Skipped { caption_id, error },
                }
            }
            Step::Keep { message } => {
                self.error = Some(message.clone());
                self.state = QueueState::Idle;
                debug!(caption_id = %caption_id, error = %message, "Vote failed, item kept");
                Transition::Retained {
                    caption_id,
                    message,
                }
            }
        }
    }

    /// Ends the `Settling` state once the exit animation is over.
    pub fn settle(&mut self) {
        if matches!(self.state, QueueState::Settling { .. }) {
            self.state = self.resting_state();
        }
    }

    /// Begins, submits and finishes a vote on the head item.
    ///
    /// Returns `None` when the vote was not started.
    pub async fn vote(
        &mut self,
        submitter: &dyn SubmitVote,
        vote_value: VoteValue,
    ) -> Option<Transition> {
        let pending = self.begin_vote(vote_value)?;
        let outcome = submitter.submit(&pending.caption_id, pending.vote_value).await;
        Some(self.finish_vote(pending, outcome))
    }

    pub fn view(&self) -> DeckView<'_> {
        match self.current() {
            None if self.total == 0 => DeckView::NoItems,
            None => DeckView::AllDone,
            Some(item) => DeckView::Current {
                item,
                caption_text: item.display_text(),
                position: self.completed() + 1,
                total: self.total,
                state: self.state,
                error: self.error(),
            },
        }
    }

    fn resting_state(&self) -> QueueState {
        if self.queue.is_empty() {
            QueueState::Exhausted
        } else {
            QueueState::Idle
        }
    }
}

/// A controller shared between concurrent UI event handlers.
///
/// The lock is only held to begin and to finish a vote, never across the
/// request, so a second vote action arriving mid-flight is observed as
/// `Submitting` and ignored.
#[derive(Clone)]
pub struct QueueHandle {
    inner: Arc<Mutex<QueueController>>,
}

impl QueueHandle {
    pub fn new(controller: QueueController) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    pub async fn vote(
        &self,
        submitter: &dyn SubmitVote,
        vote_value: VoteValue,
    ) -> Option<Transition> {
        let pending = self.inner.lock().await.begin_vote(vote_value)?;
        let outcome = submitter.submit(&pending.caption_id, pending.vote_value).await;
        Some(self.inner.lock().await.finish_vote(pending, outcome))
    }

    pub async fn settle(&self) {
        self.inner.lock().await.settle();
    }

    pub async fn state(&self) -> QueueState {
        self.inner.lock().await.state()
    }

    pub async fn remaining(&self) -> usize {
        self.inner.lock().await.remaining()
    }

    pub async fn current(&self) -> Option<QueueItem> {
        self.inner.lock().await.current().cloned()
    }

    pub async fn error(&self) -> Option<String> {
        self.inner.lock().await.error().map(str::to_string)
    }
}
