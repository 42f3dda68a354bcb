use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use wardrobe_store::backup::{self, Backup};
use wardrobe_store::{BlobStore, Category, Document, FileKv, LocalStore};

#[derive(Debug, Parser)]
#[command(name = "wardrobe")]
#[command(about = "Inspect, back up, restore and prune the local wardrobe stores")]
struct Args {
    /// Data directory holding kv/ and blobs.db
    #[arg(long, env = "WARDROBE_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a summary of the stored document
    Show {
        /// Print the full document as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Write a backup of the document and every blob
    Export {
        #[arg(long)]
        out: PathBuf,
    },
    /// Replace the document with a backup's and load its blobs
    Import {
        #[arg(long)]
        file: PathBuf,
    },
    /// Replace the document with an empty one
    Reset {
        /// Also delete every blob
        #[arg(long)]
        blobs: bool,
    },
    /// Delete blobs whose item or outfit no longer exists
    PruneBlobs,
}

struct Stores {
    local: LocalStore,
    blobs: BlobStore,
}

impl Stores {
    async fn open(data_dir: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let kv = FileKv::open(data_dir.join("kv"))?;
        let blobs = BlobStore::open(data_dir.join("blobs.db")).await?;
        Ok(Self {
            local: LocalStore::new(Arc::new(kv)),
            blobs,
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let stores = Stores::open(&args.data_dir).await?;
    let output = run(&stores, args.command).await;
    stores.blobs.close().await;

    println!("{}", output?);
    Ok(())
}

async fn run(stores: &Stores, command: Command) -> Result<String, Box<dyn std::error::Error>> {
    match command {
        Command::Show { json } => {
            let doc = stores.local.load();
            if json {
                return Ok(serde_json::to_string_pretty(&doc)?);
            }
            let blob_count = stores.blobs.len().await?;
            Ok(summarize(&doc, blob_count))
        }
        Command::Export { out } => {
            let backup = backup::export(&stores.local, &stores.blobs).await?;
            fs::write(&out, serde_json::to_vec_pretty(&backup)?)?;
            info!(path = %out.display(), "Wrote backup");
            Ok(format!(
                "Exported {} items, {} blobs to {}",
                document_len(&backup.document, "items"),
                backup.blobs.len(),
                out.display()
            ))
        }
        Command::Import { file } => {
            let backup: Backup = serde_json::from_slice(&fs::read(&file)?)?;
            let blob_count = backup.blobs.len();
            let doc = backup::restore(&stores.local, &stores.blobs, backup).await?;
            Ok(format!(
                "Imported {} items, {} outfits, {} blobs from {}",
                doc.items.len(),
                doc.outfits.len(),
                blob_count,
                file.display()
            ))
        }
        Command::Reset { blobs } => {
            stores.local.reset()?;
            let removed = if blobs {
                stores.blobs.retain(&Default::default()).await?
            } else {
                0
            };
            Ok(format!("Reset document; removed {} blobs", removed))
        }
        Command::PruneBlobs => {
            let doc = stores.local.load();
            let removed = stores.blobs.retain(&doc.live_ids()).await?;
            Ok(format!("Removed {} orphaned blobs", removed))
        }
    }
}

fn summarize(doc: &Document, blob_count: i64) -> String {
    let mut lines = vec![
        format!("schema:   {}", doc.schema),
        format!(
            "profile:  {} cm, {} kg, {}",
            doc.profile.height, doc.profile.weight, doc.profile.shape
        ),
        format!(
            "filters:  location={}, category={}",
            doc.settings.location, doc.settings.category
        ),
        format!("items:    {}", doc.items.len()),
    ];

    for category in Category::ALL {
        let count = doc.items.iter().filter(|item| item.category == category).count();
        if count > 0 {
            lines.push(format!("  {:<10}{}", category.as_str(), count));
        }
    }

    lines.push(format!("outfits:  {}", doc.outfits.len()));
    lines.push(format!(
        "notes:    {} inspiration, {} lessons",
        doc.notes.inspiration.len(),
        doc.notes.lessons.len()
    ));
    lines.push(format!("blobs:    {}", blob_count));
    lines.join("\n")
}

fn document_len(document: &serde_json::Value, field: &str) -> usize {
    document
        .get(field)
        .and_then(|value| value.as_array())
        .map_or(0, Vec::len)
}
