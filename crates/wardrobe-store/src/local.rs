//! Whole-document local store.
//!
//! Every mutation is a read-modify-write of the full [`Document`]: the
//! mutator clones the document it is given, applies the change, persists the
//! result under the store key and returns it. There is exactly one writer.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::kv::KvStore;
use crate::migrate;
use crate::models::{
    AiSlot, ClothingItem, Document, ItemPatch, Location, Note, Outfit, Profile, Settings,
};

/// Key the document is stored under unless another is given.
pub const DEFAULT_KEY: &str = "wardrobe_db_v2";

/// Handle to the persisted document.
#[derive(Clone)]
pub struct LocalStore {
    kv: Arc<dyn KvStore>,
    key: String,
}

impl LocalStore {
    /// Create a store over `kv` using [`DEFAULT_KEY`].
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self::with_key(kv, DEFAULT_KEY)
    }

    /// Create a store over `kv` using a custom key.
    pub fn with_key(kv: Arc<dyn KvStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the persisted document.
    ///
    /// Absent, unparsable, or structurally invalid values are replaced by a
    /// fresh default document, which is persisted. Older schemas are migrated
    /// and re-persisted. This never fails.
    pub fn load(&self) -> Document {
        let raw = match self.kv.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "No stored document; initializing");
                return self.initialize();
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "Failed to read stored document; initializing");
                return self.initialize();
            }
        };

        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(key = %self.key, error = %err, "Stored document is not valid JSON; initializing");
                return self.initialize();
            }
        };

        self.adopt(value)
    }

    /// Bring a raw document value up to date and persist it if it changed.
    ///
    /// Invalid values degrade to a fresh default document.
    pub fn adopt(&self, value: Value) -> Document {
        match migrate::upgrade(value) {
            Ok(upgraded) if upgraded.changed() => {
                info!(
                    key = %self.key,
                    from = upgraded.from_version,
                    "Persisting migrated document"
                );
                self.persist_quietly(upgraded.document)
            }
            Ok(upgraded) => upgraded.document,
            Err(err) => {
                warn!(key = %self.key, error = %err, "Stored document is invalid; initializing");
                self.initialize()
            }
        }
    }

    /// Serialize and persist `doc`, replacing whatever was stored.
    ///
    /// A document that would not read back equal is rejected with
    /// [`StoreError::InvalidDocument`] and nothing is written.
    pub fn save(&self, doc: Document) -> Result<Document> {
        self.write(&doc)?;
        Ok(doc)
    }

    /// Delete the stored document and start over.
    pub fn reset(&self) -> Result<Document> {
        self.kv.remove(&self.key)?;
        info!(key = %self.key, "Local store reset");
        self.save(Document::default())
    }

    /// Insert an item at the head of the list.
    pub fn add_item(&self, doc: &Document, item: ClothingItem) -> Result<Document> {
        let mut next = doc.clone();
        debug!(id = %item.id, "Adding item");
        next.items.insert(0, item);
        self.save(next)
    }

    /// Merge `patch` into the item with `id`.
    pub fn update_item(&self, doc: &Document, id: &str, patch: &ItemPatch) -> Result<Document> {
        let mut next = doc.clone();
        let item = next
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "item",
                id: id.to_string(),
            })?;
        patch.apply(item);
        self.save(next)
    }

    /// Remove an item and every outfit reference to it.
    ///
    /// Removing an id that does not exist is a no-op write. The item's blob
    /// is not touched; see [`crate::BlobStore::retain`].
    pub fn remove_item(&self, doc: &Document, id: &str) -> Result<Document> {
        let mut next = doc.clone();
        next.items.retain(|item| item.id != id);
        for outfit in &mut next.outfits {
            outfit.item_ids.retain(|item_id| item_id != id);
        }
        debug!(id, "Removed item");
        self.save(next)
    }

    /// Change where an item is kept.
    pub fn move_item(&self, doc: &Document, id: &str, location: Location) -> Result<Document> {
        self.update_item(doc, id, &ItemPatch::location(location))
    }

    /// Insert an outfit at the head of the list.
    pub fn add_outfit(&self, doc: &Document, outfit: Outfit) -> Result<Document> {
        let mut next = doc.clone();
        next.outfits.insert(0, outfit);
        self.save(next)
    }

    pub fn remove_outfit(&self, doc: &Document, id: &str) -> Result<Document> {
        let mut next = doc.clone();
        next.outfits.retain(|outfit| outfit.id != id);
        self.save(next)
    }

    /// Insert a note at the head of the list matching its mode.
    pub fn add_note(&self, doc: &Document, note: Note) -> Result<Document> {
        let mut next = doc.clone();
        next.notes.list_mut(note.mode).insert(0, note);
        self.save(next)
    }

    /// Replace a note's title and content, keeping its id, mode and date.
    pub fn update_note(
        &self,
        doc: &Document,
        id: &str,
        title: Option<String>,
        content: impl Into<String>,
    ) -> Result<Document> {
        let mut next = doc.clone();
        let note = next
            .notes
            .inspiration
            .iter_mut()
            .chain(next.notes.lessons.iter_mut())
            .find(|note| note.id == id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "note",
                id: id.to_string(),
            })?;
        note.title = title;
        note.content = content.into();
        self.save(next)
    }

    /// Remove a note from whichever list holds it.
    pub fn remove_note(&self, doc: &Document, id: &str) -> Result<Document> {
        let mut next = doc.clone();
        next.notes.inspiration.retain(|note| note.id != id);
        next.notes.lessons.retain(|note| note.id != id);
        self.save(next)
    }

    pub fn set_profile(&self, doc: &Document, profile: Profile) -> Result<Document> {
        let mut next = doc.clone();
        next.profile = profile;
        self.save(next)
    }

    pub fn set_settings(&self, doc: &Document, settings: Settings) -> Result<Document> {
        let mut next = doc.clone();
        next.settings = settings;
        self.save(next)
    }

    /// Overwrite the cached AI result for `slot`.
    pub fn record_ai_result(&self, doc: &Document, slot: AiSlot, result: Value) -> Result<Document> {
        let mut next = doc.clone();
        *next.last_ai.slot_mut(slot) = Some(result);
        self.save(next)
    }

    fn initialize(&self) -> Document {
        self.persist_quietly(Document::default())
    }

    fn persist_quietly(&self, doc: Document) -> Document {
        if let Err(err) = self.write(&doc) {
            warn!(key = %self.key, error = %err, "Failed to persist document");
        }
        doc
    }

    fn write(&self, doc: &Document) -> Result<()> {
        doc.validate()?;
        let json = serde_json::to_string(doc)?;
        self.kv.set(&self.key, &json)
    }
}

impl std::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore").field("key", &self.key).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{FileKv, MemoryKv};
    use crate::models::{Category, NoteMode, SCHEMA_VERSION};
    use serde_json::json;

    fn memory_store() -> (Arc<MemoryKv>, LocalStore) {
        let kv = Arc::new(MemoryKv::new());
        let store = LocalStore::new(kv.clone());
        (kv, store)
    }

    fn tee() -> ClothingItem {
        ClothingItem::new("White tee", Category::Top, Location::Home).with_style("casual")
    }

    #[test]
    fn test_load_absent_initializes_and_persists() {
        let (kv, store) = memory_store();

        let doc = store.load();
        assert_eq!(doc, Document::default());
        assert!(kv.get(DEFAULT_KEY).unwrap().is_some());
    }

    #[test]
    fn test_load_corrupt_is_idempotent() {
        let (kv, store) = memory_store();
        kv.set(DEFAULT_KEY, "{not json").unwrap();

        let first = store.load();
        let second = store.load();
        assert_eq!(first, Document::default());
        assert_eq!(first, second);
        assert_eq!(first.schema, SCHEMA_VERSION);
        assert!(first.items.is_empty());
        assert!(first.outfits.is_empty());
        assert!(first.notes.inspiration.is_empty());
        assert!(first.notes.lessons.is_empty());
    }

    #[test]
    fn test_load_without_schema_tag_initializes() {
        let (kv, store) = memory_store();
        kv.set(DEFAULT_KEY, r#"{"items":[{"id":"x"}]}"#).unwrap();

        let doc = store.load();
        assert_eq!(doc, Document::default());
    }

    #[test]
    fn test_load_migrates_and_persists_v1() {
        let (kv, store) = memory_store();
        let v1 = json!({
            "schema": 1,
            "notes": [{ "id": "n1", "mode": "lesson", "content": "c", "date": "2024-01-01" }]
        });
        kv.set(DEFAULT_KEY, &v1.to_string()).unwrap();

        let doc = store.load();
        assert_eq!(doc.schema, SCHEMA_VERSION);
        assert_eq!(doc.notes.lessons.len(), 1);

        let stored: Value = serde_json::from_str(&kv.get(DEFAULT_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored["schema"], json!(SCHEMA_VERSION));
        assert!(stored["notes"].is_object());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let (_kv, store) = memory_store();
        let mut doc = Document::default();
        let mut item = tee();
        item.thickness = Some(2);
        item.material = Some("cotton".to_string());
        doc.items.push(item);
        doc.outfits.push(Outfit::new(vec![doc.items[0].id.clone()], "brunch", "casual"));
        doc.last_ai.stylist = Some(json!({ "styleName": "soft minimal" }));

        store.save(doc.clone()).unwrap();
        assert_eq!(store.load(), doc);
    }

    #[test]
    fn test_non_finite_profile_is_rejected_without_losing_items() {
        let (kv, store) = memory_store();
        let doc = store.add_item(&store.load(), tee()).unwrap();
        let stored_before = kv.get(DEFAULT_KEY).unwrap();

        let profile = Profile {
            height: f64::INFINITY,
            ..Profile::default()
        };
        let result = store.set_profile(&doc, profile);

        assert!(matches!(result, Err(StoreError::InvalidDocument(_))));
        assert_eq!(kv.get(DEFAULT_KEY).unwrap(), stored_before);
        assert_eq!(store.load().items.len(), 1);
    }

    #[test]
    fn test_non_finite_item_temp_is_rejected() {
        let (_kv, store) = memory_store();
        let doc = store.load();
        let mut item = tee();
        item.temp = Some(crate::models::TempRange {
            min: f64::NAN,
            max: 20.0,
        });

        assert!(store.add_item(&doc, item).is_err());
        assert!(store.load().items.is_empty());
    }

    #[test]
    fn test_partial_settings_keep_items() {
        let (kv, store) = memory_store();
        let item = tee();
        let raw = json!({
            "schema": SCHEMA_VERSION,
            "settings": { "location": "home" },
            "items": [serde_json::to_value(&item).unwrap()]
        });
        kv.set(DEFAULT_KEY, &raw.to_string()).unwrap();

        let doc = store.load();
        assert_eq!(doc.items, vec![item]);
        assert_eq!(doc.settings.location, "home");
        assert_eq!(doc.settings.category, crate::models::FILTER_ALL);
    }

    #[test]
    fn test_add_inserts_at_head() {
        let (_kv, store) = memory_store();
        let doc = store.load();

        let first = tee();
        let second = ClothingItem::new("Jeans", Category::Bottom, Location::Dorm);
        let second_id = second.id.clone();
        let doc = store.add_item(&doc, first).unwrap();
        let doc = store.add_item(&doc, second).unwrap();
        assert_eq!(store.load().items[0].id, second_id);
        assert_eq!(doc.items.len(), 2);

        let outfit = Outfit::new(vec![second_id.clone()], "class", "casual");
        let outfit_id = outfit.id.clone();
        store.add_outfit(&doc, outfit).unwrap();
        assert_eq!(store.load().outfits[0].id, outfit_id);

        let doc = store.load();
        let lesson = Note::new(NoteMode::Lesson, "wool itches");
        let lesson_id = lesson.id.clone();
        store.add_note(&doc, lesson).unwrap();
        let loaded = store.load();
        assert_eq!(loaded.notes.lessons[0].id, lesson_id);
        assert!(loaded.notes.inspiration.is_empty());
    }

    #[test]
    fn test_mutators_do_not_touch_input() {
        let (_kv, store) = memory_store();
        let doc = store.load();
        let next = store.add_item(&doc, tee()).unwrap();

        assert!(doc.items.is_empty());
        assert_eq!(next.items.len(), 1);
    }

    #[test]
    fn test_remove_item_cascades_to_outfits() {
        let (_kv, store) = memory_store();
        let doc = store.load();
        let shirt = tee();
        let jeans = ClothingItem::new("Jeans", Category::Bottom, Location::Home);
        let shirt_id = shirt.id.clone();
        let jeans_id = jeans.id.clone();

        let doc = store.add_item(&doc, shirt).unwrap();
        let doc = store.add_item(&doc, jeans).unwrap();
        let doc = store
            .add_outfit(&doc, Outfit::new(vec![shirt_id.clone(), jeans_id.clone()], "a", "b"))
            .unwrap();
        let doc = store
            .add_outfit(&doc, Outfit::new(vec![shirt_id.clone()], "c", "d"))
            .unwrap();

        let doc = store.remove_item(&doc, &shirt_id).unwrap();
        assert!(doc.item(&shirt_id).is_none());
        assert!(doc.outfits.iter().all(|o| !o.item_ids.contains(&shirt_id)));
        assert_eq!(doc.outfits[1].item_ids, vec![jeans_id]);
        assert!(doc.outfits[0].item_ids.is_empty());
        assert_eq!(store.load(), doc);
    }

    #[test]
    fn test_update_and_move_item() {
        let (_kv, store) = memory_store();
        let item = tee();
        let id = item.id.clone();
        let doc = store.add_item(&store.load(), item).unwrap();

        let patch = ItemPatch {
            name: Some("Ivory tee".to_string()),
            ..Default::default()
        };
        let doc = store.update_item(&doc, &id, &patch).unwrap();
        let doc = store.move_item(&doc, &id, Location::Storage).unwrap();

        let stored = store.load();
        let item = stored.item(&id).unwrap();
        assert_eq!(item.name, "Ivory tee");
        assert_eq!(item.location, Location::Storage);
        assert_eq!(item.style, "casual");
        assert_eq!(stored, doc);
    }

    #[test]
    fn test_update_missing_item_is_not_found() {
        let (_kv, store) = memory_store();
        let doc = store.load();

        let result = store.move_item(&doc, "nope", Location::Dorm);
        assert!(matches!(result, Err(StoreError::NotFound { entity: "item", .. })));
    }

    #[test]
    fn test_notes_update_and_remove() {
        let (_kv, store) = memory_store();
        let note = Note::new(NoteMode::Inspiration, "linen + denim").with_title("Spring");
        let id = note.id.clone();
        let doc = store.add_note(&store.load(), note).unwrap();

        let doc = store
            .update_note(&doc, &id, Some("Summer".to_string()), "linen + loafers")
            .unwrap();
        assert_eq!(doc.notes.inspiration[0].title.as_deref(), Some("Summer"));
        assert_eq!(doc.notes.inspiration[0].content, "linen + loafers");

        let doc = store.remove_note(&doc, &id).unwrap();
        assert!(doc.notes.inspiration.is_empty());
        assert!(store.load().notes.inspiration.is_empty());
    }

    #[test]
    fn test_record_ai_result_overwrites_slot() {
        let (_kv, store) = memory_store();
        let doc = store.load();

        let doc = store
            .record_ai_result(&doc, AiSlot::Vision, json!({ "name": "first" }))
            .unwrap();
        let doc = store
            .record_ai_result(&doc, AiSlot::Vision, json!({ "name": "second" }))
            .unwrap();

        let stored = store.load();
        assert_eq!(stored.last_ai.vision, Some(json!({ "name": "second" })));
        assert!(stored.last_ai.stylist.is_none());
        assert_eq!(stored, doc);
    }

    #[test]
    fn test_profile_and_settings() {
        let (_kv, store) = memory_store();
        let doc = store.load();
        let doc = store
            .set_profile(
                &doc,
                Profile {
                    height: 180.0,
                    weight: 72.5,
                    shape: "inverted-triangle".to_string(),
                },
            )
            .unwrap();
        store
            .set_settings(
                &doc,
                Settings {
                    location: "dorm".to_string(),
                    category: "all".to_string(),
                },
            )
            .unwrap();

        let stored = store.load();
        assert_eq!(stored.profile.height, 180.0);
        assert_eq!(stored.settings.location, "dorm");
    }

    #[test]
    fn test_reset_discards_everything() {
        let (_kv, store) = memory_store();
        let doc = store.add_item(&store.load(), tee()).unwrap();
        assert_eq!(doc.items.len(), 1);

        let doc = store.reset().unwrap();
        assert_eq!(doc, Document::default());
        assert_eq!(store.load(), Document::default());
    }

    #[test]
    fn test_file_backed_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let item = tee();
        let id = item.id.clone();
        {
            let store = LocalStore::new(Arc::new(FileKv::open(dir.path()).unwrap()));
            store.add_item(&store.load(), item).unwrap();
        }

        let store = LocalStore::new(Arc::new(FileKv::open(dir.path()).unwrap()));
        assert!(store.load().item(&id).is_some());
    }

    #[test]
    fn test_separate_keys_are_isolated() {
        let kv = Arc::new(MemoryKv::new());
        let a = LocalStore::with_key(kv.clone(), "profile_a");
        let b = LocalStore::with_key(kv, "profile_b");

        a.add_item(&a.load(), tee()).unwrap();
        assert_eq!(a.load().items.len(), 1);
        assert!(b.load().items.is_empty());
    }
}
