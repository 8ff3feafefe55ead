//! Pressroom CLI — operational entry points for the ingestion pipeline.
//!
//! `convert` runs a DOCX through the converter against the configured
//! asset store; `verify` exercises the full sign-in → upload → publish →
//! cleanup path for a given identity. Configuration comes from the
//! environment (see `PressroomConfig`), with `.env` loaded on startup.

use anyhow::Context;
use clap::{Parser, Subcommand};
use pressroom_cli::init_tracing;
use pressroom_cli::live::LiveVerifyEnvironment;
use pressroom_convert::{AssetRelocator, DocxConverter, SourceDocument, DOCX_CONTENT_TYPE};
use pressroom_core::config::{PressroomConfig, StorageConfig};
use pressroom_core::constants::ARTICLE_ASSET_PREFIX;
use pressroom_core::models::Credentials;
use pressroom_publish::VerificationHarness;
use pressroom_storage::create_asset_store;
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;

#[derive(Parser)]
#[command(name = "pressroom", about = "Article ingestion and verification CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a DOCX file to article HTML, relocating embedded images
    Convert {
        /// Path to the .docx file
        file: std::path::PathBuf,
        /// Write the HTML here instead of stdout
        #[arg(long)]
        out: Option<std::path::PathBuf>,
    },
    /// Run the end-to-end upload and publish verification for an identity
    Verify {
        /// Account email
        #[arg(long)]
        email: String,
        /// Account password
        #[arg(long)]
        password: String,
        /// Override the storage bucket
        #[arg(long)]
        bucket: Option<String>,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert { file, out } => {
            let storage = StorageConfig::from_env().map_err(anyhow::Error::msg)?;
            let store = create_asset_store(&storage).await?;

            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Read {}", file.display()))?;
            let converter =
                DocxConverter::new(AssetRelocator::new(store, ARTICLE_ASSET_PREFIX));
            let conversion = converter
                .convert(&SourceDocument {
                    bytes: bytes.into(),
                    content_type: DOCX_CONTENT_TYPE.to_string(),
                })
                .await?;

            match out {
                Some(path) => {
                    tokio::fs::write(&path, &conversion.html)
                        .await
                        .with_context(|| format!("Write {}", path.display()))?;
                    print_json(&serde_json::json!({
                        "output": path,
                        "first_image_url": conversion.first_image_url,
                    }))?;
                }
                None => {
                    println!("{}", conversion.html);
                    if let Some(url) = &conversion.first_image_url {
                        eprintln!("first image: {}", url);
                    }
                }
            }
        }
        Commands::Verify {
            email,
            password,
            bucket,
        } => {
            let mut config = PressroomConfig::from_env().map_err(anyhow::Error::msg)?;
            if let Some(bucket) = bucket {
                config.storage.bucket = bucket;
            }

            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(&config.database.url)
                .await
                .context("Connect to database")?;
            let assets = create_asset_store(&config.storage).await?;

            let env = LiveVerifyEnvironment::new(&config.auth, pool, assets);
            let report = VerificationHarness::new(env)
                .verify(&Credentials { email, password })
                .await?;

            print_json(&serde_json::json!({
                "success": true,
                "attempts": report
                    .attempts
                    .iter()
                    .map(|a| serde_json::json!({
                        "label": a.label,
                        "upload_attempts": a.upload_attempts,
                        "used_fallback_upload": a.used_fallback_upload,
                        "used_fallback_insert": a.used_fallback_insert,
                    }))
                    .collect::<Vec<_>>(),
            }))?;
        }
    }

    Ok(())
}
