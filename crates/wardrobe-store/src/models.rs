//! Document models.
//!
//! The whole wardrobe lives in a single [`Document`] that is serialized and
//! persisted as one value. Field names are camelCase on the wire.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result as StoreResult, StoreError};
use crate::id::new_id;

/// Current document schema version.
pub const SCHEMA_VERSION: u32 = 2;

/// Filter value that matches every location or category.
pub const FILTER_ALL: &str = "all";

/// The root object persisted by the local store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Schema version tag.
    pub schema: u32,
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub settings: Settings,
    /// Most recently added first.
    #[serde(default)]
    pub items: Vec<ClothingItem>,
    /// Most recently added first.
    #[serde(default)]
    pub outfits: Vec<Outfit>,
    #[serde(default)]
    pub notes: Notes,
    #[serde(default)]
    pub last_ai: LastAi,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            schema: SCHEMA_VERSION,
            profile: Profile::default(),
            settings: Settings::default(),
            items: Vec::new(),
            outfits: Vec::new(),
            notes: Notes::default(),
            last_ai: LastAi::default(),
        }
    }
}

impl Document {
    /// Look up an item by id.
    pub fn item(&self, id: &str) -> Option<&ClothingItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Items matching the current location and category filters.
    pub fn filter_items(&self) -> Vec<&ClothingItem> {
        self.items
            .iter()
            .filter(|item| self.settings.matches(item))
            .collect()
    }

    /// Resolve an outfit's item references, skipping ids that no longer exist.
    pub fn outfit_items<'a>(&'a self, outfit: &Outfit) -> Vec<&'a ClothingItem> {
        outfit
            .item_ids
            .iter()
            .filter_map(|id| self.item(id))
            .collect()
    }

    /// Check that the document serializes to a value that reads back equal.
    ///
    /// JSON has no encoding for NaN or infinity; `serde_json` writes them as
    /// `null`, which no longer deserializes into an `f64`.
    pub fn validate(&self) -> StoreResult<()> {
        finite("profile.height", self.profile.height)?;
        finite("profile.weight", self.profile.weight)?;
        for item in &self.items {
            if let Some(temp) = item.temp {
                finite(&format!("items[{}].temp.min", item.id), temp.min)?;
                finite(&format!("items[{}].temp.max", item.id), temp.max)?;
            }
        }
        Ok(())
    }

    /// Every id that may own a blob: items and outfits.
    pub fn live_ids(&self) -> HashSet<String> {
        self.items
            .iter()
            .map(|item| item.id.clone())
            .chain(self.outfits.iter().map(|outfit| outfit.id.clone()))
            .collect()
    }
}

fn finite(field: &str, value: f64) -> StoreResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(StoreError::InvalidDocument(format!(
            "{} must be a finite number, got {}",
            field, value
        )))
    }
}

/// Body measurements used to tailor suggestions.
///
/// Missing fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    /// Height in centimetres.
    pub height: f64,
    /// Weight in kilograms.
    pub weight: f64,
    /// Body shape label (e.g. "rectangle", "pear").
    pub shape: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            height: 165.0,
            weight: 55.0,
            shape: "rectangle".to_string(),
        }
    }
}

/// View-filter state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub location: String,
    pub category: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            location: FILTER_ALL.to_string(),
            category: FILTER_ALL.to_string(),
        }
    }
}

impl Settings {
    /// Whether an item passes both filters.
    pub fn matches(&self, item: &ClothingItem) -> bool {
        let location_ok =
            self.location == FILTER_ALL || self.location == item.location.as_str();
        let category_ok =
            self.category == FILTER_ALL || self.category == item.category.as_str();
        location_ok && category_ok
    }
}

/// Clothing category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Top,
    Bottom,
    Outer,
    Shoes,
    Accessory,
    /// Anything written by a newer app version.
    #[serde(other)]
    Other,
}

impl Category {
    /// Categories a user can pick.
    pub const ALL: [Category; 5] = [
        Category::Top,
        Category::Bottom,
        Category::Outer,
        Category::Shoes,
        Category::Accessory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Top => "top",
            Category::Bottom => "bottom",
            Category::Outer => "outer",
            Category::Shoes => "shoes",
            Category::Accessory => "accessory",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "top" | "tops" => Ok(Category::Top),
            "bottom" | "bottoms" => Ok(Category::Bottom),
            "outer" | "outerwear" => Ok(Category::Outer),
            "shoes" | "shoe" => Ok(Category::Shoes),
            "accessory" | "accessories" => Ok(Category::Accessory),
            other => Err(format!("unknown category: {}", other)),
        }
    }
}

/// Physical place an item is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Home,
    Dorm,
    Storage,
    Laundry,
    #[serde(other)]
    Other,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Home => "home",
            Location::Dorm => "dorm",
            Location::Storage => "storage",
            Location::Laundry => "laundry",
            Location::Other => "other",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "home" => Ok(Location::Home),
            "dorm" => Ok(Location::Dorm),
            "storage" => Ok(Location::Storage),
            "laundry" => Ok(Location::Laundry),
            other => Err(format!("unknown location: {}", other)),
        }
    }
}

/// Dominant and accent colours detected on an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Colors {
    #[serde(default)]
    pub dominant: String,
    #[serde(default)]
    pub secondary: Vec<String>,
}

/// Comfortable temperature range in °C.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempRange {
    pub min: f64,
    pub max: f64,
}

/// A single piece of clothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClothingItem {
    pub id: String,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub style: String,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Colors>,
    /// 1 (thin) to 5 (heavy).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<TempRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Small preview image as a data URL. The full image lives in the blob store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Creation time in Unix milliseconds.
    #[serde(default)]
    pub created_at: i64,
}

impl ClothingItem {
    /// Create an item with a fresh id.
    pub fn new(name: impl Into<String>, category: Category, location: Location) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            category,
            style: String::new(),
            location,
            material: None,
            colors: None,
            thickness: None,
            temp: None,
            notes: None,
            thumbnail: None,
            created_at: Utc::now().timestamp_millis(),
        }
    }

    /// Set the style label.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }
}

/// Partial update applied to an item. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub colors: Option<Colors>,
    #[serde(default)]
    pub thickness: Option<u8>,
    #[serde(default)]
    pub temp: Option<TempRange>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl ItemPatch {
    /// A patch that only moves the item.
    pub fn location(location: Location) -> Self {
        Self {
            location: Some(location),
            ..Default::default()
        }
    }

    /// Merge this patch into an item.
    pub fn apply(&self, item: &mut ClothingItem) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(style) = &self.style {
            item.style = style.clone();
        }
        if let Some(location) = self.location {
            item.location = location;
        }
        if let Some(material) = &self.material {
            item.material = Some(material.clone());
        }
        if let Some(colors) = &self.colors {
            item.colors = Some(colors.clone());
        }
        if let Some(thickness) = self.thickness {
            item.thickness = Some(thickness.clamp(1, 5));
        }
        if let Some(temp) = self.temp {
            item.temp = Some(temp);
        }
        if let Some(notes) = &self.notes {
            item.notes = Some(notes.clone());
        }
        if let Some(thumbnail) = &self.thumbnail {
            item.thumbnail = Some(thumbnail.clone());
        }
    }
}

/// A saved combination of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outfit {
    pub id: String,
    /// Weak references to [`ClothingItem::id`].
    pub item_ids: Vec<String>,
    #[serde(default)]
    pub occasion: String,
    #[serde(default)]
    pub style: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_name: Option<String>,
    /// Creation time in Unix milliseconds.
    #[serde(default)]
    pub created_at: i64,
}

impl Outfit {
    /// Create an outfit with a fresh id.
    pub fn new(item_ids: Vec<String>, occasion: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            item_ids,
            occasion: occasion.into(),
            style: style.into(),
            style_name: None,
            created_at: Utc::now().timestamp_millis(),
        }
    }
}

/// Which notebook a note belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteMode {
    Inspiration,
    Lesson,
}

/// A free-form note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub mode: NoteMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Note {
    /// Create a note dated today.
    pub fn new(mode: NoteMode, content: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            mode,
            title: None,
            content: content.into(),
            date: Utc::now().format("%Y-%m-%d").to_string(),
            tags: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Notes split by mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notes {
    #[serde(default)]
    pub inspiration: Vec<Note>,
    #[serde(default)]
    pub lessons: Vec<Note>,
}

impl Notes {
    /// The list a note of `mode` lives in.
    pub fn list_mut(&mut self, mode: NoteMode) -> &mut Vec<Note> {
        match mode {
            NoteMode::Inspiration => &mut self.inspiration,
            NoteMode::Lesson => &mut self.lessons,
        }
    }
}

/// Which AI result slot to overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiSlot {
    Vision,
    Stylist,
}

/// Last AI result per task type. Each slot is overwritten, never appended.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LastAi {
    #[serde(default)]
    pub vision: Option<Value>,
    #[serde(default)]
    pub stylist: Option<Value>,
}

impl LastAi {
    pub fn slot_mut(&mut self, slot: AiSlot) -> &mut Option<Value> {
        match slot {
            AiSlot::Vision => &mut self.vision,
            AiSlot::Stylist => &mut self.stylist,
        }
    }
}
