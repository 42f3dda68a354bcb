//! Prompt construction and fingerprinting.
//!
//! Every prompt asks for strict JSON with an exact field shape, because the
//! reply goes straight through [`crate::parse_model_json`].

use sha2::{Digest, Sha256};

use crate::task::{AiTask, ClosetEntry, SelectedItem};

const JSON_ONLY: &str =
    "Reply with STRICT JSON only. No markdown, no code fences, no commentary before or after.";

const VISION_SHAPE: &str = r#"{"name": string, "category": "top" | "bottom" | "outer" | "shoes" | "accessory", "style": string, "material": string, "colors": {"dominant": string, "secondary": [string]}, "thickness": integer 1-5, "temp": {"min": number, "max": number}, "notes": string}"#;

const MIX_SHAPE: &str = r#"{"summary": string, "goodPoints": [string], "risks": [string], "tips": [string], "styleName": string, "compatibility": number 0-1}"#;

const STYLIST_SHAPE: &str = r#"{"outfit": {"topId": string | null, "bottomId": string | null, "outerId": string | null, "shoeId": string | null, "accessoryIds": [string]}, "why": [string], "tips": [string], "styleName": string, "confidence": number 0-1}"#;

const NOTE_SHAPE: &str = r#"{"tags": [string], "do": [string], "dont": [string]}"#;

/// Build the instruction text for a task.
pub fn build_prompt(task: &AiTask) -> String {
    match task {
        AiTask::Vision { .. } => format!(
            "You are a wardrobe assistant. Identify the single clothing item in the photo.\n\
             Temperatures are in °C. Thickness 1 is sheer, 5 is heavy winter weight.\n\
             {}\nExact shape:\n{}",
            JSON_ONLY, VISION_SHAPE
        ),
        AiTask::MixExplain {
            selected_items,
            occasion,
            temp_c,
        } => format!(
            "You are a personal stylist. Critique this combination for the occasion \"{}\" at {:.0}°C.\n\
             Items:\n{}\n\
             compatibility is 0 (clashes) to 1 (works perfectly).\n\
             {}\nExact shape:\n{}",
            occasion,
            temp_c,
            list_selected(selected_items),
            JSON_ONLY,
            MIX_SHAPE
        ),
        AiTask::Stylist {
            closet,
            occasion,
            temp_c,
            location,
            style,
        } => format!(
            "You are a personal stylist. Build one outfit for the occasion \"{}\" at {:.0}°C.\n\
             Preferred style: {}. Only use items kept at: {}.\n\
             Choose ONLY ids from this closet; use null when no item fits a slot:\n{}\n\
             confidence is 0 to 1.\n\
             {}\nExact shape:\n{}",
            occasion,
            temp_c,
            style,
            location,
            list_closet(closet),
            JSON_ONLY,
            STYLIST_SHAPE
        ),
        AiTask::NoteSummarize { text, image } => {
            let source = match (text, image) {
                (Some(text), Some(_)) => format!("the attached image and this note:\n{}", text),
                (Some(text), None) => format!("this note:\n{}", text),
                (None, _) => "the attached image".to_string(),
            };
            format!(
                "Summarize {} into short style tags and concrete do / don't advice.\n\
                 {}\nExact shape:\n{}",
                source, JSON_ONLY, NOTE_SHAPE
            )
        }
    }
}

fn list_selected(items: &[SelectedItem]) -> String {
    items
        .iter()
        .map(|item| format!("- {} ({})", item.name, item.category))
        .collect::<Vec<_>>()
        .join("\n")
}

fn list_closet(closet: &[ClosetEntry]) -> String {
    // Compact JSON keeps ids exact
    serde_json::to_string(closet).unwrap_or_else(|_| "[]".to_string())
}

/// SHA-256 of the prompt as lowercase hex. Logged instead of the prompt text.
pub fn hash_prompt(prompt: &str) -> String {
    hex::encode(Sha256::digest(prompt.as_bytes()))
}
