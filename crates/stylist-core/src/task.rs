//! AI task requests.
//!
//! [`AiRequest`] is the flat JSON body the proxy accepts. [`AiRequest::validate`]
//! turns it into an [`AiTask`], one variant per task with that task's required
//! fields present, before any network call is made.

use serde::{Deserialize, Serialize};

use crate::data_url::{parse_data_url, InlineImage};
use crate::error::StylistError;

/// Task tag sent in the `task` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskKind {
    /// Classify a photographed clothing item.
    Vision,
    /// Critique a chosen set of items.
    MixExplain,
    /// Suggest an outfit from the closet.
    Stylist,
    /// Distil a note into tags and do/don't lists.
    NoteSummarize,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Vision => "vision",
            TaskKind::MixExplain => "mixExplain",
            TaskKind::Stylist => "stylist",
            TaskKind::NoteSummarize => "noteSummarize",
        }
    }
}

/// An item the user picked for critique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedItem {
    pub name: String,
    pub category: String,
}

/// A closet entry the stylist may choose from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosetEntry {
    pub id: String,
    pub category: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

/// Raw proxy request body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiRequest {
    pub task: Option<TaskKind>,
    /// Overrides the server's default credential.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub image_data_url: Option<String>,
    #[serde(default)]
    pub selected_items: Option<Vec<SelectedItem>>,
    #[serde(default)]
    pub closet: Option<Vec<ClosetEntry>>,
    #[serde(default)]
    pub occasion: Option<String>,
    #[serde(default)]
    pub temp_c: Option<f64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// A validated task.
#[derive(Debug, Clone, PartialEq)]
pub enum AiTask {
    Vision {
        image: InlineImage,
    },
    MixExplain {
        selected_items: Vec<SelectedItem>,
        occasion: String,
        temp_c: f64,
    },
    Stylist {
        closet: Vec<ClosetEntry>,
        occasion: String,
        temp_c: f64,
        location: String,
        style: String,
    },
    NoteSummarize {
        text: Option<String>,
        image: Option<InlineImage>,
    },
}

impl AiRequest {
    /// Check the task's required fields and build the typed task.
    pub fn validate(self) -> Result<AiTask, StylistError> {
        let task = self.task.ok_or(StylistError::MissingField("task"))?;

        match task {
            TaskKind::Vision => {
                let url = non_empty(self.image_data_url)
                    .ok_or(StylistError::MissingField("imageDataUrl"))?;
                Ok(AiTask::Vision {
                    image: parse_data_url(&url),
                })
            }
            TaskKind::MixExplain => {
                let selected_items = self
                    .selected_items
                    .filter(|items| !items.is_empty())
                    .ok_or(StylistError::MissingField("selectedItems"))?;
                Ok(AiTask::MixExplain {
                    selected_items,
                    occasion: required(self.occasion, "occasion")?,
                    temp_c: self.temp_c.ok_or(StylistError::MissingField("tempC"))?,
                })
            }
            TaskKind::Stylist => {
                let closet = self
                    .closet
                    .filter(|closet| !closet.is_empty())
                    .ok_or(StylistError::MissingField("closet"))?;
                Ok(AiTask::Stylist {
                    closet,
                    occasion: required(self.occasion, "occasion")?,
                    temp_c: self.temp_c.ok_or(StylistError::MissingField("tempC"))?,
                    location: required(self.location, "location")?,
                    style: required(self.style, "style")?,
                })
            }
            TaskKind::NoteSummarize => {
                let text = non_empty(self.text);
                let image = non_empty(self.image_data_url).map(|url| parse_data_url(&url));
                if text.is_none() && image.is_none() {
                    return Err(StylistError::MissingField("text"));
                }
                Ok(AiTask::NoteSummarize { text, image })
            }
        }
    }
}

impl AiTask {
    pub fn kind(&self) -> TaskKind {
        match self {
            AiTask::Vision { .. } => TaskKind::Vision,
            AiTask::MixExplain { .. } => TaskKind::MixExplain,
            AiTask::Stylist { .. } => TaskKind::Stylist,
            AiTask::NoteSummarize { .. } => TaskKind::NoteSummarize,
        }
    }

    /// Image to send inline with the prompt, if the task has one.
    pub fn image(&self) -> Option<&InlineImage> {
        match self {
            AiTask::Vision { image } => Some(image),
            AiTask::NoteSummarize { image, .. } => image.as_ref(),
            AiTask::MixExplain { .. } | AiTask::Stylist { .. } => None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required(value: Option<String>, field: &'static str) -> Result<String, StylistError> {
    non_empty(value).ok_or(StylistError::MissingField(field))
}
