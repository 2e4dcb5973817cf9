use clap::Parser;
use listing_estimator::{EstimationRequest, EstimatorConfig, PricePredictor, config, telemetry};
use std::process::ExitCode;
use tracing::error;

/// Estimate a fair resale price and print it as one line of JSON.
#[derive(Debug, Parser)]
#[command(
    name = "predict-price",
    version,
    after_help = "Example: predict-price Electronics 'Like New' 'iPhone 12' 'Good condition' 25000\n\nSet GEMINI_API_KEY to enable model-backed estimates."
)]
struct Args {
    category: String,
    /// New, Like New, Good, Fair or Poor
    condition: String,
    #[arg(default_value = "")]
    title: String,
    #[arg(default_value = "")]
    description: String,
    /// Seller's asking price in INR; 0 means none
    #[arg(default_value_t = 0.0, value_parser = parse_price)]
    user_price: f64,
}

fn parse_price(raw: &str) -> Result<f64, String> {
    let price: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("`{raw}` is not a number"))?;
    if !price.is_finite() || price < 0.0 {
        return Err(format!("price must be a non-negative number, got {raw}"));
    }
    Ok(price)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    telemetry::init_tracing();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(target = "estimator.cli", "predict-price failed: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> eyre::Result<()> {
    config::load_dotenv();
    let config = EstimatorConfig::from_env();
    let predictor = PricePredictor::new(&config);

    let request = EstimationRequest::new(args.category, &args.condition)
        .with_title(args.title)
        .with_description(args.description)
        .with_user_price(args.user_price);

    let result = predictor.get_price_range(&request).await;
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
