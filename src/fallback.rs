//! Deterministic estimates used whenever the model path is unavailable or
//! its answer cannot be used. Nothing here touches the network.

use crate::models::{Condition, Confidence, EstimationRequest, EstimationResult, ImageAnalysisResult};

pub const AI_UNAVAILABLE_FLAG: &str = "ai_unavailable";

/// Share of the seller's price kept for a given condition, in percent.
pub fn condition_percent(condition: &Condition) -> u32 {
    match condition {
        Condition::New => 95,
        Condition::LikeNew => 80,
        Condition::Good => 60,
        Condition::Fair => 40,
        Condition::Poor => 25,
        Condition::Unrecognized(_) => 60,
    }
}

pub fn fallback_price(request: &EstimationRequest) -> EstimationResult {
    match request.asking_price() {
        Some(price) => from_user_price(price, request),
        None => no_data(),
    }
}

fn from_user_price(price: f64, request: &EstimationRequest) -> EstimationResult {
    let percent = f64::from(condition_percent(&request.condition));
    // `as` saturates, so absurd prices pin to i64::MAX rather than wrap.
    let predicted = (price * percent / 100.0).floor() as i64;
    EstimationResult {
        predicted,
        lower: percent_of(predicted, 85),
        upper: percent_of(predicted, 115),
        confidence: Confidence::Low,
        reasoning: format!(
            "Estimated based on your price input adjusted for {} condition. For accurate market research, please set up Gemini API key.",
            request.condition_text
        ),
    }
}

/// `value * percent / 100` without intermediate overflow, saturating at the i64 range.
fn percent_of(value: i64, percent: i64) -> i64 {
    let scaled = i128::from(value) * i128::from(percent) / 100;
    i64::try_from(scaled).unwrap_or(if scaled < 0 { i64::MIN } else { i64::MAX })
}

fn no_data() -> EstimationResult {
    EstimationResult {
        predicted: 0,
        lower: 0,
        upper: 0,
        confidence: Confidence::None,
        reasoning: "Unable to predict price without market data. Please: 1) Enter your expected price, or 2) Set up Gemini API key at https://aistudio.google.com/app/apikey for AI-powered market research.".into(),
    }
}

/// Placeholder listing that asks for manual review.
pub fn fallback_image() -> ImageAnalysisResult {
    ImageAnalysisResult {
        title: "Product".into(),
        description: "Please add product description manually".into(),
        category: "Other".into(),
        condition: "Good".into(),
        condition_reason: "Manual assessment required".into(),
        suggested_price_inr: 0,
        price_reasoning: "AI unavailable - please set price manually".into(),
        is_legitimate: true,
        legitimacy_score: 50,
        flags: vec![AI_UNAVAILABLE_FLAG.into()],
        flag_reason: "AI service unavailable, manual review recommended".into(),
    }
}
