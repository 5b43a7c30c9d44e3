use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{is_present, CaptionId, Image, ImageId};

/// One candidate caption for an image. Many captions may share an image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Caption {
    pub id: CaptionId,
    pub image_id: ImageId,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Caption {
    /// Whether the caption carries any text worth showing.
    pub fn has_text(&self) -> bool {
        is_present(self.content.as_deref())
    }
}

/// A caption joined with the image attributes needed to display it.
///
/// This is the row shape the store hands to the eligibility filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionWithImage {
    pub caption: Caption,
    pub image: Image,
}
