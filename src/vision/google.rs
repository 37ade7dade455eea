// Google Cloud Vision implementation.
//
// Each analysis is two HTTP calls: download the image bytes from the feed's
// CDN, then POST them base64-encoded to `images:annotate` asking for labels,
// image properties (dominant colors), and faces. The vendor response is
// mapped onto the crate's own Annotation record so nothing downstream
// depends on the wire format.
//
// API docs: https://cloud.google.com/vision/docs/reference/rest/v1/images/annotate

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rate_limiter::RateLimiter;
use super::traits::VisionClient;
use crate::config::Config;
use crate::models::{Annotation, Color, Corner, FaceAnnotation, Label, Likelihood};

/// Default `images:annotate` endpoint.
pub const DEFAULT_VISION_API_URL: &str = "https://vision.googleapis.com/v1/images:annotate";

/// How many labels to request per image unless configured otherwise.
pub const DEFAULT_LABEL_RESULTS: u32 = 3;

/// Cloud Vision image annotator.
pub struct GoogleVisionClient {
    client: Client,
    endpoint: String,
    api_key: String,
    max_labels: u32,
    rate_limiter: Option<RateLimiter>,
}

impl GoogleVisionClient {
    /// Create a client for the given endpoint and API key.
    pub fn new(api_key: String, endpoint: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent("cordoba/0.1 (feed-summary)")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key,
            max_labels: DEFAULT_LABEL_RESULTS,
            rate_limiter: None,
        })
    }

    /// Build a client from loaded configuration, including the optional throttle.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.require_vision()?;
        let mut client = Self::new(config.google_api_key.clone(), &config.vision_api_url)?
            .with_max_labels(config.label_results);
        if let Some(limiter) = config.rate_limiter()? {
            client = client.with_rate_limiter(limiter);
        }
        Ok(client)
    }

    /// Change the LABEL_DETECTION `maxResults`.
    pub fn with_max_labels(mut self, max_labels: u32) -> Self {
        self.max_labels = max_labels;
        self
    }

    /// Throttle annotate calls through the given limiter.
    pub fn with_rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    async fn download_image(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to download image {url}"))?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Image download returned {status} for {url}");
        }

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read image body from {url}"))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl VisionClient for GoogleVisionClient {
    async fn analyze_image(&self, url: &str) -> Result<Annotation> {
        let image_bytes = self.download_image(url).await?;
        let request = build_request(&image_bytes, self.max_labels);

        if let Some(limiter) = &self.rate_limiter {
            limiter.acquire().await;
        }

        debug!(url = url, bytes = image_bytes.len(), "Cloud Vision annotate request");

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .context("Failed to call Cloud Vision API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Cloud Vision API returned {}: {}", status, body);
        }

        let batch: BatchAnnotateResponse = response
            .json()
            .await
            .context("Failed to parse Cloud Vision response")?;

        let first = batch
            .responses
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("Cloud Vision returned no responses for {url}"))?;

        let annotation = into_annotation(first)?;

        debug!(
            url = url,
            labels = annotation.label_annotations.len(),
            colors = annotation.dominant_colors.len(),
            faces = annotation.face_annotations.as_ref().map_or(0, Vec::len),
            "Annotated image"
        );

        Ok(annotation)
    }
}

/// Build the single-image annotate payload.
fn build_request(image_bytes: &[u8], max_labels: u32) -> AnnotateRequest {
    AnnotateRequest {
        requests: vec![AnnotateImageRequest {
            image: ImageContent {
                content: STANDARD.encode(image_bytes),
            },
            features: vec![
                Feature {
                    kind: "LABEL_DETECTION",
                    max_results: Some(max_labels),
                },
                Feature {
                    kind: "IMAGE_PROPERTIES",
                    max_results: None,
                },
                Feature {
                    kind: "FACE_DETECTION",
                    max_results: None,
                },
            ],
        }],
    }
}

/// Map one vendor response onto an Annotation.
///
/// A missing `imagePropertiesAnnotation` yields an empty palette rather than
/// an error here; the aggregator rejects colorless records itself.
fn into_annotation(response: AnnotateImageResponse) -> Result<Annotation> {
    if let Some(status) = response.error {
        anyhow::bail!(
            "Cloud Vision could not annotate image ({}): {}",
            status.code,
            status.message
        );
    }

    let dominant_colors = response
        .image_properties_annotation
        .and_then(|props| props.dominant_colors)
        .map(|palette| palette.colors.into_iter().map(into_color).collect())
        .unwrap_or_default();

    let label_annotations = response
        .label_annotations
        .into_iter()
        .map(|label| Label {
            mid: label.mid,
            description: label.description,
            score: label.score,
            topicality: label.topicality,
        })
        .collect();

    let face_annotations = response
        .face_annotations
        .map(|faces| faces.into_iter().map(into_face).collect());

    Ok(Annotation {
        face_annotations,
        label_annotations,
        dominant_colors,
    })
}

fn into_color(info: WireColorInfo) -> Color {
    Color {
        red: channel(info.color.red),
        green: channel(info.color.green),
        blue: channel(info.color.blue),
        pixel_fraction: info.pixel_fraction,
        score: info.score,
    }
}

fn channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn into_face(face: WireFace) -> FaceAnnotation {
    // Face boxes normally come back in pixels only. Without decoding the
    // image there is nothing to normalize against, so those stay at zero.
    let mut bounds = [Corner::default(); 4];
    if face.bounding_poly.normalized_vertices.len() == 4 {
        for (corner, vertex) in bounds.iter_mut().zip(&face.bounding_poly.normalized_vertices) {
            corner.x_fraction = vertex.x;
            corner.y_fraction = vertex.y;
        }
    }

    FaceAnnotation {
        anger_likelihood: face.anger_likelihood,
        joy_likelihood: face.joy_likelihood,
        sorrow_likelihood: face.sorrow_likelihood,
        surprise_likelihood: face.surprise_likelihood,
        blurred_likelihood: face.blurred_likelihood,
        headwear_likelihood: face.headwear_likelihood,
        under_exposed_likelihood: face.under_exposed_likelihood,
        detection_confidence: face.detection_confidence,
        pan_angle: face.pan_angle,
        roll_angle: face.roll_angle,
        tilt_angle: face.tilt_angle,
        bounds,
    }
}

// --- Cloud Vision request/response types ---

#[derive(Serialize)]
struct AnnotateRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Serialize)]
struct AnnotateImageRequest {
    image: ImageContent,
    features: Vec<Feature>,
}

#[derive(Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_results: Option<u32>,
}

#[derive(Deserialize)]
struct BatchAnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct AnnotateImageResponse {
    face_annotations: Option<Vec<WireFace>>,
    label_annotations: Vec<WireLabel>,
    image_properties_annotation: Option<ImageProperties>,
    error: Option<WireStatus>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct WireFace {
    bounding_poly: BoundingPoly,
    anger_likelihood: Likelihood,
    joy_likelihood: Likelihood,
    sorrow_likelihood: Likelihood,
    surprise_likelihood: Likelihood,
    blurred_likelihood: Likelihood,
    headwear_likelihood: Likelihood,
    under_exposed_likelihood: Likelihood,
    detection_confidence: f64,
    pan_angle: f64,
    roll_angle: f64,
    tilt_angle: f64,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct BoundingPoly {
    normalized_vertices: Vec<NormalizedVertex>,
}

// proto3 JSON omits zero-valued fields, so every coordinate and channel defaults.
#[derive(Deserialize, Default)]
#[serde(default)]
struct NormalizedVertex {
    x: f64,
    y: f64,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct WireLabel {
    mid: Option<String>,
    description: String,
    score: f64,
    topicality: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageProperties {
    dominant_colors: Option<DominantColors>,
}

#[derive(Deserialize)]
struct DominantColors {
    #[serde(default)]
    colors: Vec<WireColorInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireColorInfo {
    #[serde(default)]
    color: WireRgb,
    score: Option<f64>,
    #[serde(default)]
    pixel_fraction: f64,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct WireRgb {
    red: f64,
    green: f64,
    blue: f64,
}

#[derive(Deserialize)]
struct WireStatus {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> AnnotateImageResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn request_asks_for_labels_colors_and_faces() {
        let request = build_request(b"hello", 3);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["requests"][0]["image"]["content"], "aGVsbG8=");
        let features = json["requests"][0]["features"].as_array().unwrap();
        assert_eq!(features.len(), 3);
        assert_eq!(features[0]["type"], "LABEL_DETECTION");
        assert_eq!(features[0]["maxResults"], 3);
        assert_eq!(features[1]["type"], "IMAGE_PROPERTIES");
        assert!(features[1].get("maxResults").is_none());
        assert_eq!(features[2]["type"], "FACE_DETECTION");
    }

    #[test]
    fn colors_default_missing_channels_to_zero() {
        let response = parse(
            r#"{"imagePropertiesAnnotation": {"dominantColors": {"colors": [
                {"color": {"red": 250.6, "blue": 12}, "score": 0.4, "pixelFraction": 0.25}
            ]}}}"#,
        );
        let annotation = into_annotation(response).unwrap();
        let color = &annotation.dominant_colors[0];
        assert_eq!((color.red, color.green, color.blue), (251, 0, 12));
        assert_eq!(color.pixel_fraction, 0.25);
        assert_eq!(color.score, Some(0.4));
    }

    #[test]
    fn missing_image_properties_yields_empty_palette() {
        let response = parse(r#"{"labelAnnotations": [{"description": "cat", "topicality": 0.9}]}"#);
        let annotation = into_annotation(response).unwrap();
        assert!(annotation.dominant_colors.is_empty());
        assert_eq!(annotation.label_annotations[0].description, "cat");
        assert!(annotation.face_annotations.is_none());
    }

    #[test]
    fn face_uses_normalized_vertices_when_complete() {
        let response = parse(
            r#"{"faceAnnotations": [{
                "boundingPoly": {"normalizedVertices": [
                    {"x": 0.1, "y": 0.2}, {"x": 0.5, "y": 0.2}, {"x": 0.5, "y": 0.6}, {"y": 0.6}
                ]},
                "joyLikelihood": "VERY_LIKELY",
                "detectionConfidence": 0.93,
                "panAngle": -4.5
            }]}"#,
        );
        let annotation = into_annotation(response).unwrap();
        let face = annotation.primary_face().unwrap();
        assert_eq!(face.joy_likelihood, Likelihood::VeryLikely);
        assert_eq!(face.anger_likelihood, Likelihood::Unknown);
        assert_eq!(face.bounds[1].x_fraction, 0.5);
        assert_eq!(face.bounds[3].x_fraction, 0.0);
        assert_eq!(face.bounds[3].y_fraction, 0.6);
        assert_eq!(face.pan_angle, -4.5);
    }

    #[test]
    fn pixel_only_bounding_poly_leaves_corners_at_zero() {
        let response = parse(
            r#"{"faceAnnotations": [{
                "boundingPoly": {"vertices": [{"x": 10, "y": 20}, {"x": 50, "y": 20}, {"x": 50, "y": 60}, {"x": 10, "y": 60}]}
            }]}"#,
        );
        let annotation = into_annotation(response).unwrap();
        let face = annotation.primary_face().unwrap();
        assert!(face.bounds.iter().all(|c| *c == Corner::default()));
    }

    #[test]
    fn per_image_error_is_reported() {
        let response = parse(r#"{"error": {"code": 3, "message": "Bad image data."}}"#);
        let err = into_annotation(response).unwrap_err();
        assert!(err.to_string().contains("Bad image data."));
    }

    #[test]
    fn unknown_likelihood_is_rejected() {
        let result: Result<AnnotateImageResponse, _> =
            serde_json::from_str(r#"{"faceAnnotations": [{"joyLikelihood": "SOMEWHAT"}]}"#);
        assert!(result.is_err());
    }
}
