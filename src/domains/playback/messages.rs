use crate::domains::coverage::Point;
use serde::{Deserialize, Serialize};

/// Error reason sent when a plan is unknown or has no points.
pub const PLAN_NOT_FOUND: &str = "plan_not_found";

/// Frames sent to a playback client, serialized without a tag:
/// `{x, y, index, total, timestamp}` or `{error}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlaybackMessage {
    Point {
        x: f64,
        y: f64,
        index: usize,
        total: usize,
        timestamp: f64,
    },
    Error {
        error: String,
    },
}

impl PlaybackMessage {
    pub fn point(point: &Point, index: usize, total: usize) -> Self {
        PlaybackMessage::Point {
            x: point.x,
            y: point.y,
            index,
            total,
            timestamp: point.timestamp,
        }
    }

    pub fn error(reason: impl Into<String>) -> Self {
        PlaybackMessage::Error {
            error: reason.into(),
        }
    }

    pub fn plan_not_found() -> Self {
        Self::error(PLAN_NOT_FOUND)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, PlaybackMessage::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shape() {
        let point = Point { x: 1.5, y: 0.25, timestamp: 12.0 };
        let value = serde_json::to_value(PlaybackMessage::point(&point, 3, 10)).unwrap();
        assert_eq!(value, json!({"x": 1.5, "y": 0.25, "index": 3, "total": 10, "timestamp": 12.0}));

        let value = serde_json::to_value(PlaybackMessage::plan_not_found()).unwrap();
        assert_eq!(value, json!({"error": "plan_not_found"}));
    }

    #[test]
    fn test_parse_client_side() {
        let parsed: PlaybackMessage = serde_json::from_str(r#"{"error":"boom"}"#).unwrap();
        assert!(parsed.is_error());
        let parsed: PlaybackMessage =
            serde_json::from_str(r#"{"x":0.0,"y":1.0,"index":0,"total":1,"timestamp":5.0}"#).unwrap();
        assert!(!parsed.is_error());
    }
}
