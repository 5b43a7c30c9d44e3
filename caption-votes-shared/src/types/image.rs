use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ImageId;

/// An image that captions are written for.
///
/// Images are owned by the storage layer; the voting core only reads them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    pub id: ImageId,
    pub url: Option<String>,
    pub image_description: Option<String>,
    pub additional_context: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}
