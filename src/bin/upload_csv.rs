use clap::Parser;
use csv_bucket_upload::config::{CredentialSource, UploadConfig};
use csv_bucket_upload::infrastructure::storage;
use csv_bucket_upload::models::{Payload, UploadRequest};
use csv_bucket_upload::services::transfer::TransferService;
use csv_bucket_upload::utils::validation::{sanitize_filename, validate_csv_file};
use dotenvy::dotenv;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Upload one CSV file to an object storage bucket
#[derive(Parser, Debug)]
#[command(name = "upload_csv", version)]
struct Args {
    /// CSV file to upload
    file: PathBuf,

    /// Destination bucket
    #[arg(short, long, env = "DEFAULT_BUCKET")]
    bucket: String,

    /// Write a local copy before uploading
    #[arg(long)]
    stage: bool,

    /// Root directory for the local copy
    #[arg(long)]
    staging_root: Option<PathBuf>,

    /// JSON credential secret file (ambient credentials when omitted)
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// Object name (defaults to the file name)
    #[arg(long)]
    name: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "upload_csv=info,csv_bucket_upload=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = UploadConfig::from_env();
    if args.stage {
        config.local_staging_enabled = true;
    }
    if let Some(root) = args.staging_root {
        config.staging_root = root;
    }
    if let Some(path) = args.credentials {
        config.credentials = CredentialSource::File(path);
    }

    let requested_name = match &args.name {
        Some(name) => name.clone(),
        None => args
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    let object_name = sanitize_filename(&requested_name)?;
    validate_csv_file(&object_name)?;

    let file = tokio::fs::File::open(&args.file).await?;
    let size = file.metadata().await?.len();

    info!("📄 File details: name={}, size={} bytes", object_name, size);

    let connector = storage::setup_storage(&config);
    let service = TransferService::new(connector, config);
    let payload = Payload::new(object_name, Some(mime::TEXT_CSV.to_string()), size, file);

    match service.upload(UploadRequest::new(args.bucket, payload)).await {
        Ok(receipt) => {
            info!(
                "✅ File {} uploaded successfully to bucket: {}.",
                receipt.object_name, receipt.bucket
            );
            if let Some(path) = receipt.local_copy {
                info!("💾 Local copy: {}", path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("❌ [{}] {}", e.code(), e);
            Ok(ExitCode::FAILURE)
        }
    }
}
