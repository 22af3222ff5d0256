//! Seed a running server with users read from a JSON file

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use user_management_api::{
    client::{BulkUploader, load_users},
    config::{DEFAULT_API_TOKEN, LoggingConfig},
    init_tracing,
};

#[derive(Parser, Debug)]
#[command(version, about = "Upload users from a JSON array to the User Management API")]
struct Args {
    /// JSON file containing an array of user objects
    #[arg(short, long, default_value = "demos/sample-users.json")]
    file: PathBuf,

    /// Users endpoint of the running server
    #[arg(long, default_value = "http://localhost:5000/api/users")]
    api_url: String,

    /// Bearer token sent with every request
    #[arg(long, default_value = DEFAULT_API_TOKEN)]
    token: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let logging = LoggingConfig {
        level: "info".to_string(),
        format: "compact".to_string(),
    };
    if let Err(e) = init_tracing(&logging) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let users = match load_users(&args.file) {
        Ok(users) => users,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load users");
            return ExitCode::FAILURE;
        }
    };

    let uploader = match BulkUploader::new(args.api_url, Some(args.token)) {
        Ok(uploader) => uploader,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build HTTP client");
            return ExitCode::FAILURE;
        }
    };

    let summary = uploader.upload_all(&users).await;
    tracing::info!(
        uploaded = summary.uploaded,
        failed = summary.failed,
        "Bulk upload finished"
    );

    if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
