//! Local persistence for the wardrobe app.
//!
//! Two stores with different shapes:
//!
//! - [`LocalStore`] keeps the whole user state (profile, settings, items,
//!   outfits, notes, last AI results) as one versioned [`Document`] in a
//!   synchronous key-value substrate ([`KvStore`]).
//! - [`BlobStore`] keeps full-resolution images in SQLite, keyed by item or
//!   outfit id, so they never inflate the document's read-modify-write.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use wardrobe_store::{BlobStore, Category, ClothingItem, FileKv, LocalStore, Location};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let local = LocalStore::new(Arc::new(FileKv::open("data/kv")?));
//!     let blobs = BlobStore::connect("sqlite:data/blobs.db?mode=rwc").await?;
//!
//!     let item = ClothingItem::new("Navy blazer", Category::Outer, Location::Home);
//!     blobs.save(&item.id, b"...jpeg...").await?;
//!     let doc = local.add_item(&local.load(), item)?;
//!     println!("{} items", doc.items.len());
//!     Ok(())
//! }
//! ```

pub mod backup;
pub mod blob;
pub mod error;
pub mod id;
pub mod kv;
pub mod local;
pub mod migrate;
pub mod models;

pub use backup::Backup;
pub use blob::BlobStore;
pub use error::{Result, StoreError};
pub use id::new_id;
pub use kv::{FileKv, KvStore, MemoryKv};
pub use local::{LocalStore, DEFAULT_KEY};
pub use models::{
    AiSlot, Category, ClothingItem, Colors, Document, ItemPatch, LastAi, Location, Note,
    NoteMode, Notes, Outfit, Profile, Settings, TempRange, FILTER_ALL, SCHEMA_VERSION,
};
