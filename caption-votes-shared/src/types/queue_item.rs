use serde::{Deserialize, Serialize};

use crate::types::{is_present, CaptionId, CaptionWithImage, ImageId};

/// One entry of the voting queue handed to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    pub caption_id: CaptionId,
    pub caption_content: String,
    pub image_id: ImageId,
    pub image_url: String,
    #[serde(default)]
    pub image_description: Option<String>,
    #[serde(default)]
    pub additional_context: Option<String>,
}

impl QueueItem {
    /// Text to render for the caption, with a placeholder when it is blank.
    pub fn display_text(&self) -> String {
        let text = self.caption_content.trim();
        if text.is_empty() {
            format!("No caption text (caption id: {})", self.caption_id)
        } else {
            text.to_string()
        }
    }
}

impl From<CaptionWithImage> for QueueItem {
    fn from(row: CaptionWithImage) -> Self {
        let CaptionWithImage { caption, image } = row;
        QueueItem {
            caption_id: caption.id,
            caption_content: caption.content.unwrap_or_default(),
            image_id: image.id,
            image_url: image.url.unwrap_or_default(),
            image_description: image
                .image_description
                .filter(|d| is_present(Some(d.as_str()))),
            additional_context: image
                .additional_context
                .filter(|c| is_present(Some(c.as_str()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(content: &str) -> QueueItem {
        QueueItem {
            caption_id: "c-1".into(),
            caption_content: content.into(),
            image_id: "i-1".into(),
            image_url: "https://img.example/1.png".into(),
            image_description: None,
            additional_context: None,
        }
    }

    #[test]
    fn test_queue_item_serializes_camel_case() {
        let json = serde_json::to_value(item("hello")).unwrap();
        assert_eq!(json["captionId"], "c-1");
        assert_eq!(json["imageUrl"], "https://img.example/1.png");
        assert!(json["imageDescription"].is_null());
    }

    #[test]
    fn test_display_text_falls_back_for_blank_caption() {
        assert_eq!(item("  funny  ").display_text(), "funny");
        assert_eq!(
            item("   ").display_text(),
            "No caption text (caption id: c-1)"
        );
    }
}
