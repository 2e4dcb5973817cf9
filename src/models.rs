use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf};

/// Declared item condition. Unrecognised strings are kept verbatim so the
/// prompt still carries what the seller typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    New,
    LikeNew,
    Good,
    Fair,
    Poor,
    Unrecognized(String),
}

impl Condition {
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "new" => Condition::New,
            "like new" => Condition::LikeNew,
            "good" => Condition::Good,
            "fair" => Condition::Fair,
            "poor" => Condition::Poor,
            _ => Condition::Unrecognized(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Condition::New => "New",
            Condition::LikeNew => "Like New",
            Condition::Good => "Good",
            Condition::Fair => "Fair",
            Condition::Poor => "Poor",
            Condition::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct EstimationRequest {
    pub category: String,
    pub condition: Condition,
    /// Condition as the seller wrote it, trimmed.
    pub condition_text: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Seller's asking price in INR. `None` and `0` both mean "not given".
    pub user_price: Option<f64>,
}

impl EstimationRequest {
    pub fn new(category: impl Into<String>, condition: &str) -> Self {
        Self {
            category: category.into(),
            condition: Condition::parse(condition),
            condition_text: condition.trim().to_string(),
            title: None,
            description: None,
            user_price: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = non_blank(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = non_blank(description.into());
        self
    }

    pub fn with_user_price(mut self, price: f64) -> Self {
        self.user_price = Some(price);
        self
    }

    /// The asking price when one was actually supplied.
    pub fn asking_price(&self) -> Option<f64> {
        self.user_price
            .filter(|price| price.is_finite() && *price > 0.0)
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Low,
    None,
}

impl Confidence {
    pub fn from_model(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Confidence::Low,
            "none" => Confidence::None,
            _ => Confidence::High,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimationResult {
    pub predicted: i64,
    pub lower: i64,
    pub upper: i64,
    pub confidence: Confidence,
    pub reasoning: String,
}

impl EstimationResult {
    pub fn is_no_data(&self) -> bool {
        self.predicted == 0
    }
}

#[derive(Debug, Clone)]
pub struct ImageAnalysisRequest {
    pub image_paths: Vec<PathBuf>,
}

impl ImageAnalysisRequest {
    /// One path or many; order is kept.
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            image_paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

/// Flat listing record derived from product photos. Nested values are not
/// part of the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAnalysisResult {
    pub title: String,
    pub description: String,
    pub category: String,
    pub condition: String,
    pub condition_reason: String,
    pub suggested_price_inr: u64,
    pub price_reasoning: String,
    pub is_legitimate: bool,
    pub legitimacy_score: u8,
    pub flags: Vec<String>,
    pub flag_reason: String,
}

#[derive(Debug, Serialize)]
pub struct CliError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
}
