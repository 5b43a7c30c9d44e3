// App state for the axum server
use std::sync::Arc;

use caption_votes_service::{EligibilityFilter, VoteIntakeService};

use crate::server::identity::IdentityProvider;

#[derive(Clone)]
pub struct AppState {
    pub intake: Arc<VoteIntakeService>,
    pub eligibility: Arc<EligibilityFilter>,
    pub identity: Arc<dyn IdentityProvider>,
}
