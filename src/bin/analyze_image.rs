use clap::Parser;
use listing_estimator::models::CliError;
use listing_estimator::{EstimatorConfig, ImageAnalysisRequest, ImageAnalyzer, config, telemetry};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

const USAGE: &str = "analyze-image <image_path1> [image_path2] [image_path3] ...";

/// Analyze product photos and print the listing record as JSON.
#[derive(Debug, Parser)]
#[command(name = "analyze-image", version)]
struct Args {
    /// One or more image files, analyzed together
    paths: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    telemetry::init_tracing();
    match run(args).await {
        Ok(code) => code,
        Err(err) => {
            error!(target = "estimator.cli", "analyze-image failed: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Prints the error object on stdout, where callers expect JSON.
fn reject(error: String, usage: Option<&str>) -> eyre::Result<ExitCode> {
    let payload = CliError {
        error,
        usage: usage.map(str::to_string),
    };
    println!("{}", serde_json::to_string(&payload)?);
    Ok(ExitCode::FAILURE)
}

async fn run(args: Args) -> eyre::Result<ExitCode> {
    if args.paths.is_empty() {
        return reject("Missing image path argument".into(), Some(USAGE));
    }
    if let Some(missing) = args.paths.iter().find(|path| !path.exists()) {
        return reject(format!("Image file not found: {}", missing.display()), None);
    }

    config::load_dotenv();
    let config = EstimatorConfig::from_env();
    let analyzer = ImageAnalyzer::new(&config);

    let result = analyzer
        .analyze(&ImageAnalysisRequest::new(args.paths))
        .await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(ExitCode::SUCCESS)
}
