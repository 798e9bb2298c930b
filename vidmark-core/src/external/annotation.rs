// ============================================================================
// vidmark-core/src/external/annotation.rs
// ============================================================================
//
// VIDEO ANNOTATION SERVICE: ActivityDetector Implementation over HTTP
//
// Submits the raw video content to a Video Intelligence-style REST endpoint
// requesting label detection, and converts the shot label annotations of the
// response into raw `Segment`s (time offsets in seconds). This is the only
// out-of-process wait in a run and it is bounded: the request carries an
// explicit timeout, and any transport, authentication, HTTP, or parse
// failure maps to `CoreError::TimelineUnavailable`, which is fatal — without
// a timeline no overlay pass is attempted.
//
// AI-ASSISTANT-INFO: HTTP client for the activity-detection collaborator

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::timeline::{ActivityDetector, Segment};

/// The annotation feature requested for every video.
const LABEL_DETECTION_FEATURE: &str = "LABEL_DETECTION";

/// HTTP client for the activity-detection collaborator.
pub struct VideoAnnotationClient {
    endpoint: String,
    token: Option<String>,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct AnnotateRequest {
    input_content: String,
    features: Vec<&'static str>,
}

#[derive(Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    annotation_results: Vec<AnnotationResult>,
}

#[derive(Deserialize)]
struct AnnotationResult {
    #[serde(default)]
    shot_label_annotations: Vec<LabelAnnotation>,
}

#[derive(Deserialize)]
struct LabelAnnotation {
    entity: Entity,
    #[serde(default)]
    segments: Vec<LabelSegment>,
}

#[derive(Deserialize)]
struct Entity {
    description: String,
}

#[derive(Deserialize)]
struct LabelSegment {
    segment: TimeInterval,
    confidence: f32,
}

#[derive(Deserialize)]
struct TimeInterval {
    // The service omits zero offsets, hence the defaults.
    #[serde(default)]
    start_time_offset: Option<String>,
    #[serde(default)]
    end_time_offset: Option<String>,
}

impl VideoAnnotationClient {
    /// Creates a client for `endpoint` with a bounded request timeout.
    ///
    /// `credentials_path`, when given, names a file whose (trimmed) contents
    /// are sent as a bearer token with every request.
    pub fn new(
        endpoint: &str,
        credentials_path: Option<&PathBuf>,
        timeout: Duration,
    ) -> CoreResult<Self> {
        let token = match credentials_path {
            Some(path) => Some(
                fs::read_to_string(path)
                    .map_err(|e| {
                        CoreError::Config(format!(
                            "cannot read credential file {}: {e}",
                            path.display()
                        ))
                    })?
                    .trim()
                    .to_string(),
            ),
            None => None,
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token,
            client,
        })
    }
}

impl ActivityDetector for VideoAnnotationClient {
    fn detect_activities(&self, video: &Path) -> CoreResult<Vec<Segment>> {
        let content = fs::read(video).map_err(|e| {
            CoreError::UnreadableInput(format!("cannot read {}: {e}", video.display()))
        })?;

        log::info!(
            "Submitting {} ({} bytes) for label detection",
            video.display(),
            content.len()
        );

        let request = AnnotateRequest {
            input_content: BASE64.encode(&content),
            features: vec![LABEL_DETECTION_FEATURE],
        };

        let url = format!("{}/v1/videos:annotate", self.endpoint);
        let mut builder = self.client.post(&url).json(&request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .map_err(|e| CoreError::TimelineUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CoreError::TimelineUnavailable(format!(
                "annotation service returned {status}: {}",
                body.trim()
            )));
        }

        let body = response
            .text()
            .map_err(|e| CoreError::TimelineUnavailable(e.to_string()))?;
        let segments = parse_annotate_response(&body)?;
        log::info!("Annotation service returned {} raw segments", segments.len());
        Ok(segments)
    }
}

/// Parses the service's JSON body into raw segments, one per label segment,
/// preserving response order. Confidence filtering happens later, at
/// timeline build time.
pub(crate) fn parse_annotate_response(body: &str) -> CoreResult<Vec<Segment>> {
    let response: AnnotateResponse = serde_json::from_str(body)
        .map_err(|e| CoreError::TimelineUnavailable(format!("malformed response: {e}")))?;

    let mut segments = Vec::new();
    for result in response.annotation_results {
        for label in result.shot_label_annotations {
            for s in label.segments {
                segments.push(Segment {
                    description: label.entity.description.clone(),
                    start_time: parse_offset_seconds(s.segment.start_time_offset.as_deref())?,
                    end_time: parse_offset_seconds(s.segment.end_time_offset.as_deref())?,
                    confidence: s.confidence,
                });
            }
        }
    }
    Ok(segments)
}

/// Parses a duration offset like "12.5s" (or "12.5") into seconds. A missing
/// offset means zero.
fn parse_offset_seconds(offset: Option<&str>) -> CoreResult<f64> {
    let Some(raw) = offset else {
        return Ok(0.0);
    };
    raw.trim_end_matches('s').parse::<f64>().map_err(|_| {
        CoreError::TimelineUnavailable(format!("malformed time offset '{raw}'"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_offsets_with_and_without_suffix() {
        assert_eq!(parse_offset_seconds(Some("12.5s")).unwrap(), 12.5);
        assert_eq!(parse_offset_seconds(Some("3")).unwrap(), 3.0);
        assert_eq!(parse_offset_seconds(None).unwrap(), 0.0);
        assert!(parse_offset_seconds(Some("soon")).is_err());
    }

    #[test]
    fn parses_shot_label_annotations() {
        let body = r#"{
            "annotation_results": [{
                "shot_label_annotations": [{
                    "entity": { "description": "running" },
                    "segments": [
                        {
                            "segment": {
                                "start_time_offset": "2s",
                                "end_time_offset": "5.5s"
                            },
                            "confidence": 0.92
                        },
                        {
                            "segment": { "end_time_offset": "1s" },
                            "confidence": 0.41
                        }
                    ]
                }]
            }]
        }"#;
        let segments = parse_annotate_response(body).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].description, "running");
        assert_eq!(segments[0].start_time, 2.0);
        assert_eq!(segments[0].end_time, 5.5);
        assert!((segments[0].confidence - 0.92).abs() < 1e-6);
        // Omitted start offset defaults to zero; low confidence is kept here
        // and filtered at timeline build time.
        assert_eq!(segments[1].start_time, 0.0);
    }

    #[test]
    fn empty_results_yield_no_segments() {
        assert!(parse_annotate_response("{}").unwrap().is_empty());
    }

    #[test]
    fn malformed_body_is_timeline_unavailable() {
        let err = parse_annotate_response("not json").unwrap_err();
        assert!(matches!(err, CoreError::TimelineUnavailable(_)));
    }
}
