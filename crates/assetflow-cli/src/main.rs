//! assetflow CLI: upload files or stdin to the configured asset backend.
//!
//! Set CLOUDINARY_URL (or ASSETFLOW_BACKEND=local with LOCAL_STORAGE_PATH and
//! LOCAL_STORAGE_BASE_URL). Upload limits come from ASSETFLOW_* variables and can be overridden
//! per run with flags.

use anyhow::Context;
use assetflow_cli::{init_tracing, parse_meta, BatchReport, LogFormat, OutputFormat};
use assetflow_core::config::parse_extension_list;
use assetflow_core::{BackendSettings, UploadConfig, UploadInput};
use assetflow_processing::AssetUploadManager;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "assetflow", about = "Bounded-concurrency asset uploader")]
struct Cli {
    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload files and/or stdin as one batch
    Upload {
        /// Files to upload
        paths: Vec<PathBuf>,
        /// Also upload whatever arrives on stdin
        #[arg(long)]
        stdin: bool,
        /// Display name for the stdin stream
        #[arg(long, requires = "stdin")]
        stdin_name: Option<String>,
        /// Maximum concurrent uploads
        #[arg(short = 'c', long)]
        concurrency: Option<usize>,
        /// Per-upload timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Maximum asset size in MiB
        #[arg(long)]
        max_size_mb: Option<u64>,
        /// Comma separated extension allow-list, `*` for any
        #[arg(long)]
        extensions: Option<String>,
        /// Metadata attached to every upload (repeatable)
        #[arg(long = "meta", value_name = "KEY=VALUE", value_parser = parse_meta)]
        meta: Vec<(String, JsonValue)>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Delete an asset by public id
    Destroy {
        /// Folder-qualified public id, e.g. images/logo.png
        public_id: String,
    },
    /// Print a delivery URL, optionally transformed
    Url {
        public_id: String,
        /// Transformation descriptor, e.g. w_200,h_200,c_fill
        #[arg(long, default_value = "")]
        transformation: String,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let settings = BackendSettings::from_env().context(
        "Invalid backend configuration. Set CLOUDINARY_URL, or ASSETFLOW_BACKEND=local with LOCAL_STORAGE_PATH and LOCAL_STORAGE_BASE_URL",
    )?;
    let manager = AssetUploadManager::from_settings(&settings)
        .await
        .context("Failed to initialize backend")?;

    match cli.command {
        Commands::Upload {
            paths,
            stdin,
            stdin_name,
            concurrency,
            timeout_secs,
            max_size_mb,
            extensions,
            meta,
            format,
        } => {
            let mut config = UploadConfig::from_env();
            if let Some(n) = concurrency {
                config.max_concurrent_uploads = n;
            }
            if let Some(secs) = timeout_secs {
                config.max_upload_timeout = Duration::from_secs(secs);
            }
            if let Some(mb) = max_size_mb {
                config.max_asset_size_bytes = mb.saturating_mul(1024 * 1024);
            }
            if let Some(list) = extensions {
                config.supported_extensions = parse_extension_list(&list);
            }
            for (key, value) in meta {
                config.metadata.add(&key, value);
            }

            let mut inputs: Vec<UploadInput> = paths.into_iter().map(UploadInput::Path).collect();
            if stdin {
                let name = stdin_name.unwrap_or_else(|| "stdin".to_string());
                inputs.push(UploadInput::from_named_reader(name, tokio::io::stdin()));
            }
            if inputs.is_empty() {
                anyhow::bail!("Nothing to upload: pass file paths and/or --stdin");
            }

            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("Interrupted, cancelling remaining uploads");
                    on_interrupt.cancel();
                }
            });

            let manager = manager.with_config(config);
            let outcomes = manager
                .upload_multiple_files_with_cancel(inputs, cancel)
                .await;

            let report = BatchReport::new(&outcomes);
            match format {
                OutputFormat::Json => print_json(&report)?,
                OutputFormat::Table => print!("{}", report.render_table()),
            }

            if !report.summary.all_succeeded() {
                std::process::exit(1);
            }
        }
        Commands::Destroy { public_id } => {
            let result = manager.destroy_asset(&public_id).await?;
            print_json(&result)?;
            if !result.is_ok() {
                std::process::exit(1);
            }
        }
        Commands::Url {
            public_id,
            transformation,
        } => {
            let url = manager.transform_image(&public_id, &transformation)?;
            println!("{}", url);
        }
    }

    Ok(())
}
