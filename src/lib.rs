//! Resale price estimation and photo-based listing analysis backed by a
//! hosted generative model, with deterministic fallbacks when the model
//! cannot be reached or trusted.

pub mod config;
pub mod extract;
pub mod fallback;
pub mod http;
pub mod images;
pub mod llm;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod telemetry;
pub mod validate;

pub use config::EstimatorConfig;
pub use models::{
    Condition, Confidence, EstimationRequest, EstimationResult, ImageAnalysisRequest,
    ImageAnalysisResult,
};
pub use pipeline::{
    Estimate, EstimateSource, EstimationError, EstimationErrorKind, ImageAnalyzer,
    PricePredictor,
};
