use crate::config::EstimatorConfig;
use crate::extract::{ExtractError, extract_json};
use crate::fallback::{fallback_image, fallback_price};
use crate::images::load_image_parts;
use crate::llm::{ContentPart, GeminiClient, GenerativeModel, ModelError};
use crate::models::{EstimationRequest, EstimationResult, ImageAnalysisRequest, ImageAnalysisResult};
use crate::prompts;
use crate::validate::{ValidationError, validate_image, validate_price};
use std::{sync::Arc, time::Instant};
use thiserror::Error;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
#[error("step `{step}` failed: {message}")]
pub struct EstimationError {
    step: &'static str,
    message: String,
    kind: EstimationErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimationErrorKind {
    /// No credential or model client; detected before any network call.
    Configuration,
    Transport,
    Parse,
    Validation,
    /// Nothing usable to send, e.g. every image failed to load.
    Input,
}

impl EstimationErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            EstimationErrorKind::Configuration => "configuration",
            EstimationErrorKind::Transport => "transport",
            EstimationErrorKind::Parse => "parse",
            EstimationErrorKind::Validation => "validation",
            EstimationErrorKind::Input => "input",
        }
    }
}

impl EstimationError {
    fn new(step: &'static str, kind: EstimationErrorKind, message: impl Into<String>) -> Self {
        Self {
            step,
            message: message.into(),
            kind,
        }
    }

    pub fn configuration(step: &'static str, message: impl Into<String>) -> Self {
        Self::new(step, EstimationErrorKind::Configuration, message)
    }

    pub fn input(step: &'static str, message: impl Into<String>) -> Self {
        Self::new(step, EstimationErrorKind::Input, message)
    }

    fn from_model(step: &'static str, err: ModelError) -> Self {
        let kind = match err {
            ModelError::Unavailable => EstimationErrorKind::Configuration,
            ModelError::Http(_) | ModelError::Status { .. } | ModelError::InvalidResponse(_) => {
                EstimationErrorKind::Transport
            }
            ModelError::EmptyResponse(_) => EstimationErrorKind::Parse,
        };
        Self::new(step, kind, err.to_string())
    }

    fn from_extract(step: &'static str, err: ExtractError) -> Self {
        warn!(target = "estimator.pipeline", raw = %err.snippet, "unparsable model response");
        Self::new(step, EstimationErrorKind::Parse, err.to_string())
    }

    fn from_validation(step: &'static str, err: ValidationError) -> Self {
        let kind = if err.is_structural() {
            EstimationErrorKind::Parse
        } else {
            EstimationErrorKind::Validation
        };
        Self::new(step, kind, err.to_string())
    }

    pub fn step(&self) -> &'static str {
        self.step
    }

    pub fn kind(&self) -> EstimationErrorKind {
        self.kind
    }

    pub fn detail(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateSource {
    Model,
    Fallback(EstimationErrorKind),
}

impl EstimateSource {
    /// `model`, or the failure kind that forced the fallback.
    pub fn label(self) -> &'static str {
        match self {
            EstimateSource::Model => "model",
            EstimateSource::Fallback(kind) => kind.label(),
        }
    }
}

/// A result plus where it came from. The value is always well formed.
#[derive(Debug)]
pub struct Estimate<T> {
    pub value: T,
    pub source: EstimateSource,
}

impl<T> Estimate<T> {
    fn model(pipeline: &'static str, value: T) -> Self {
        crate::metrics::estimate_served(pipeline, EstimateSource::Model);
        Self {
            value,
            source: EstimateSource::Model,
        }
    }

    fn fallback(pipeline: &'static str, value: T, kind: EstimationErrorKind) -> Self {
        let source = EstimateSource::Fallback(kind);
        crate::metrics::estimate_served(pipeline, source);
        Self { value, source }
    }
}

fn log_fallback(pipeline: &'static str, err: &EstimationError) {
    match err.kind() {
        EstimationErrorKind::Configuration => info!(
            target = "estimator.pipeline",
            pipeline = pipeline,
            reason = %err,
            "model unavailable; using fallback estimate"
        ),
        _ => warn!(
            target = "estimator.pipeline",
            pipeline = pipeline,
            step = err.step(),
            kind = ?err.kind(),
            error = %err.detail(),
            "model path failed; using fallback estimate"
        ),
    }
}

async fn invoke<M: GenerativeModel>(
    model: &M,
    parts: &[ContentPart],
) -> Result<String, EstimationError> {
    let started = Instant::now();
    let text = model
        .generate(parts)
        .await
        .map_err(|err| EstimationError::from_model("invoke", err));
    crate::metrics::model_round_trip(started.elapsed().as_millis());
    text
}

/// Text-based resale price estimator.
pub struct PricePredictor<M = GeminiClient> {
    model: Arc<M>,
}

impl PricePredictor<GeminiClient> {
    pub fn new(config: &EstimatorConfig) -> Self {
        Self::with_model(Arc::new(GeminiClient::new(config)))
    }
}

impl<M: GenerativeModel> PricePredictor<M> {
    pub fn with_model(model: Arc<M>) -> Self {
        Self { model }
    }

    pub async fn predict(&self, request: &EstimationRequest) -> EstimationResult {
        self.estimate(request).await.value
    }

    /// Same as [`predict`](Self::predict); kept for callers asking for a range.
    pub async fn get_price_range(&self, request: &EstimationRequest) -> EstimationResult {
        self.predict(request).await
    }

    pub async fn estimate(&self, request: &EstimationRequest) -> Estimate<EstimationResult> {
        let span = info_span!("predict_price", request_id = %Uuid::new_v4());
        async move {
            match self.model_estimate(request).await {
                Ok(result) => {
                    info!(
                        target = "estimator.pipeline",
                        predicted = result.predicted,
                        reasoning = %preview(&result.reasoning, 100),
                        "model price estimate"
                    );
                    Estimate::model("price", result)
                }
                Err(err) => {
                    log_fallback("price", &err);
                    Estimate::fallback("price", fallback_price(request), err.kind())
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn model_estimate(
        &self,
        request: &EstimationRequest,
    ) -> Result<EstimationResult, EstimationError> {
        if !self.model.available() {
            return Err(EstimationError::configuration(
                "invoke",
                "no model credential configured",
            ));
        }
        let prompt = prompts::price_prompt(request);
        let text = invoke(self.model.as_ref(), &[ContentPart::text(prompt)]).await?;
        let value = extract_json(&text).map_err(|err| EstimationError::from_extract("extract", err))?;
        validate_price(&value).map_err(|err| EstimationError::from_validation("validate", err))
    }
}

/// Photo-based listing analyzer.
pub struct ImageAnalyzer<M = GeminiClient> {
    model: Arc<M>,
}

impl ImageAnalyzer<GeminiClient> {
    pub fn new(config: &EstimatorConfig) -> Self {
        Self::with_model(Arc::new(GeminiClient::new(config)))
    }
}

impl<M: GenerativeModel> ImageAnalyzer<M> {
    pub fn with_model(model: Arc<M>) -> Self {
        Self { model }
    }

    pub async fn analyze(&self, request: &ImageAnalysisRequest) -> ImageAnalysisResult {
        self.estimate(request).await.value
    }

    pub async fn estimate(&self, request: &ImageAnalysisRequest) -> Estimate<ImageAnalysisResult> {
        let span = info_span!(
            "analyze_images",
            request_id = %Uuid::new_v4(),
            images = request.image_paths.len()
        );
        async move {
            match self.model_analysis(request).await {
                Ok(record) => {
                    info!(
                        target = "estimator.pipeline",
                        title = %record.title,
                        legitimate = record.is_legitimate,
                        "model image analysis complete"
                    );
                    Estimate::model("image", record)
                }
                Err(err) => {
                    log_fallback("image", &err);
                    Estimate::fallback("image", fallback_image(), err.kind())
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn model_analysis(
        &self,
        request: &ImageAnalysisRequest,
    ) -> Result<ImageAnalysisResult, EstimationError> {
        if !self.model.available() {
            return Err(EstimationError::configuration(
                "invoke",
                "no model credential configured",
            ));
        }

        let started = Instant::now();
        let images = load_image_parts(&request.image_paths);
        crate::metrics::images_loaded(
            request.image_paths.len(),
            images.len(),
            started.elapsed().as_millis(),
        );
        if images.is_empty() {
            return Err(EstimationError::input("load_images", "no readable images"));
        }

        let mut parts = Vec::with_capacity(images.len() + 1);
        parts.push(ContentPart::text(prompts::image_prompt(images.len())));
        parts.extend(images);

        let text = invoke(self.model.as_ref(), &parts).await?;
        let value = extract_json(&text).map_err(|err| EstimationError::from_extract("extract", err))?;
        validate_image(value).map_err(|err| EstimationError::from_validation("validate", err))
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}
