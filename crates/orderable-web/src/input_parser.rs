#![forbid(unsafe_code)]

//! JSON input parser for host-encoded drag events.
//!
//! Hosts that cannot hand [`DragEvent`] values over directly (a JS shim
//! draining a queue, a recorded session replay) encode each event as
//!
//! ```json
//! {"kind":"dragover","target":7,"x":160.5,"y":12.0}
//! ```
//!
//! where `target` is a host-side element id. [`parse_encoded_drag_event`]
//! maps the id back to a platform handle through a caller-supplied resolver.

use orderable_core::Point;
use serde::Deserialize;

use crate::platform::{DragEvent, DragEventKind};

/// Errors from parsing encoded drag event JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputParseError {
    /// Malformed JSON.
    Json(String),
    /// Missing required field.
    MissingField(&'static str),
    /// `kind` is not a drag lifecycle event.
    UnknownKind(String),
    /// The resolver did not recognise the target id.
    UnknownTarget(u64),
}

impl core::fmt::Display for InputParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
            Self::UnknownKind(kind) => write!(f, "unknown drag event kind: {kind}"),
            Self::UnknownTarget(id) => write!(f, "unknown target id: {id}"),
        }
    }
}

impl std::error::Error for InputParseError {}

#[derive(Debug, Deserialize)]
struct RawDragInput {
    kind: String,
    #[serde(default)]
    target: Option<u64>,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
}

/// Parse one JSON-encoded drag event.
///
/// `x`/`y` are viewport coordinates and default to `0` when absent (some
/// hosts report drag-end without a position).
pub fn parse_encoded_drag_event<H>(
    json: &str,
    mut resolve_target: impl FnMut(u64) -> Option<H>,
) -> Result<DragEvent<H>, InputParseError> {
    let raw: RawDragInput =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;
    let kind =
        DragEventKind::parse(&raw.kind).ok_or_else(|| InputParseError::UnknownKind(raw.kind))?;
    let id = raw.target.ok_or(InputParseError::MissingField("target"))?;
    let target = resolve_target(id).ok_or(InputParseError::UnknownTarget(id))?;
    let client = Point::new(raw.x.unwrap_or(0.0), raw.y.unwrap_or(0.0));
    Ok(DragEvent::new(kind, target, client))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::NodeId;
    use pretty_assertions::assert_eq;

    fn lookup(id: u64) -> Option<NodeId> {
        usize::try_from(id).ok().filter(|id| *id < 4).map(NodeId)
    }

    #[test]
    fn dragover_with_position() {
        let event =
            parse_encoded_drag_event(r#"{"kind":"dragover","target":2,"x":160.5,"y":-4}"#, lookup)
                .unwrap();
        assert_eq!(
            event,
            DragEvent::new(DragEventKind::DragOver, NodeId(2), Point::new(160.5, -4.0))
        );
    }

    #[test]
    fn dragend_without_position_defaults_to_origin() {
        let event = parse_encoded_drag_event(r#"{"kind":"dragend","target":1}"#, lookup).unwrap();
        assert_eq!(event.kind, DragEventKind::DragEnd);
        assert_eq!(event.client, Point::ORIGIN);
    }

    #[test]
    fn kind_is_case_insensitive() {
        let event = parse_encoded_drag_event(r#"{"kind":"DragStart","target":0}"#, lookup).unwrap();
        assert_eq!(event.kind, DragEventKind::DragStart);
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = parse_encoded_drag_event(r#"{"kind":"drop""#, lookup).unwrap_err();
        assert!(matches!(err, InputParseError::Json(_)));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = parse_encoded_drag_event(r#"{"kind":"pointermove","target":1}"#, lookup)
            .unwrap_err();
        assert_eq!(err, InputParseError::UnknownKind("pointermove".to_owned()));
    }

    #[test]
    fn missing_target_is_rejected() {
        let err = parse_encoded_drag_event(r#"{"kind":"drop","x":1,"y":2}"#, lookup).unwrap_err();
        assert_eq!(err, InputParseError::MissingField("target"));
        assert_eq!(err.to_string(), "missing required field: target");
    }

    #[test]
    fn unresolved_target_is_rejected() {
        let err = parse_encoded_drag_event(r#"{"kind":"drop","target":99}"#, lookup).unwrap_err();
        assert_eq!(err, InputParseError::UnknownTarget(99));
    }
}
