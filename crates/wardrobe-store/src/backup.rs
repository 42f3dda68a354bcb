//! Export and restore of the whole wardrobe: the document plus every blob.

use std::collections::{BTreeMap, HashMap};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::blob::BlobStore;
use crate::error::{Result, StoreError};
use crate::local::LocalStore;
use crate::migrate;
use crate::models::Document;

/// Backup file format version.
pub const BACKUP_FORMAT: u32 = 1;

/// Serialized backup. Blobs are base64 encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub format: u32,
    /// RFC 3339 export time.
    pub exported_at: String,
    /// Raw document; upgraded on restore.
    pub document: Value,
    #[serde(default)]
    pub blobs: BTreeMap<String, String>,
}

/// Snapshot the current document and every blob.
pub async fn export(local: &LocalStore, blobs: &BlobStore) -> Result<Backup> {
    let document = serde_json::to_value(local.load())?;
    let blobs: BTreeMap<String, String> = blobs
        .get_all()
        .await?
        .into_iter()
        .map(|(id, data)| (id, STANDARD.encode(data)))
        .collect();

    info!(blobs = blobs.len(), "Exported backup");

    Ok(Backup {
        format: BACKUP_FORMAT,
        exported_at: Utc::now().to_rfc3339(),
        document,
        blobs,
    })
}

/// Replace the current document with the backup's and upsert its blobs.
///
/// The backup is validated in full before anything is written: an
/// unsupported format, a document that cannot be migrated, or a blob that is
/// not valid base64 leaves both stores untouched.
pub async fn restore(local: &LocalStore, blobs: &BlobStore, backup: Backup) -> Result<Document> {
    if backup.format != BACKUP_FORMAT {
        return Err(StoreError::InvalidBackup(format!(
            "unsupported backup format {}",
            backup.format
        )));
    }

    let document = migrate::upgrade(backup.document)
        .map_err(|err| StoreError::InvalidBackup(err.to_string()))?
        .document;

    let mut decoded = HashMap::with_capacity(backup.blobs.len());
    for (id, encoded) in backup.blobs {
        let data = STANDARD
            .decode(encoded.as_bytes())
            .map_err(|err| StoreError::InvalidBackup(format!("blob {}: {}", id, err)))?;
        decoded.insert(id, data);
    }

    blobs.put_all(&decoded).await?;
    let document = local.save(document)?;

    info!(
        items = document.items.len(),
        outfits = document.outfits.len(),
        blobs = decoded.len(),
        "Restored backup"
    );
    Ok(document)
}
