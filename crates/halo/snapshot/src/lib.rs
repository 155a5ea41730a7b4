//! Style snapshot schema — the immutable per-element record the evaluation
//! engine consumes, and the diagnostic records it emits.
//!
//! The extractor (browser automation, out of scope here) serializes one
//! snapshot per tested element; every style value arrives as the raw computed
//! CSS string and all parsing happens inside the engine. A snapshot is
//! created once, borrowed for one evaluation, and discarded.

#![forbid(unsafe_code)]

pub mod diagnostic;

pub use diagnostic::{Condition, Diagnostic, Measured, Severity};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Opaque element handle (typically an `XPath`) assigned by the extractor.
/// Never interpreted by the engine; it only rides along into diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementRef(pub String);

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How the tested element receives keyboard focus. Selects the diagnostic
/// code-name prefix only; it never changes evaluation logic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MechanismContext {
    Button,
    Input,
    Tabindex,
    Handler,
}

impl fmt::Display for MechanismContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Button => "Button",
            Self::Input => "Input",
            Self::Tabindex => "Tabindex",
            Self::Handler => "Handler",
        };
        f.write_str(name)
    }
}

/// Border-box edges in CSS pixels, as reported by the extractor's
/// `getBoundingClientRect` equivalent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rect {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// The checked style properties of one state (normal or focused), all raw
/// computed-value strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateStyle {
    pub outline_style: String,
    pub outline_width: String,
    pub outline_color: String,
    pub outline_offset: String,
    pub border_width: String,
    pub border_color: String,
    pub box_shadow: String,
    pub background_color: String,
    /// The full `background` shorthand serialization; gradients and images
    /// are detected here rather than in `background_color`.
    pub full_background: String,
}

/// Focus-state styles: the same checked properties plus the two fields that
/// decide whether the element composites above unrelated content.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusStyle {
    #[serde(flatten)]
    pub style: StateStyle,
    pub position: String,
    pub z_index: String,
}

impl FocusStyle {
    /// Whether the focused element itself establishes a stacking context.
    #[must_use]
    pub fn establishes_stacking_context(&self) -> bool {
        establishes_stacking_context(&self.position, &self.z_index)
    }
}

/// One ancestor's contribution to background resolution, leafmost parent
/// first in [`StyleSnapshot::ancestors`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AncestorStyle {
    pub background_color: String,
    pub full_background: String,
    pub position: String,
    pub z_index: String,
}

impl AncestorStyle {
    /// Whether this ancestor establishes a stacking context, making what is
    /// painted beneath it undecidable from style alone.
    #[must_use]
    pub fn establishes_stacking_context(&self) -> bool {
        establishes_stacking_context(&self.position, &self.z_index)
    }
}

/// `position != static` together with a set `z-index` creates a stacking
/// context. Empty strings behave like the initial values.
#[must_use]
pub fn establishes_stacking_context(position: &str, z_index: &str) -> bool {
    let positioned = {
        let trimmed = position.trim();
        !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("static")
    };
    let layered = {
        let trimmed = z_index.trim();
        !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("auto")
    };
    positioned && layered
}

/// Immutable record of one tested element: identity, normal/focus styles,
/// geometry, the embedded parent chain, cached resolution hints, and the
/// font metrics needed to resolve em/rem lengths.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSnapshot {
    pub element_ref: ElementRef,
    pub mechanism_context: MechanismContext,
    pub normal: StateStyle,
    pub focus: FocusStyle,
    pub element_bounds: Rect,
    pub parent_bounds: Rect,
    /// Parent chain, leafmost parent first. May be empty when the cached
    /// hints below are supplied instead.
    #[serde(default)]
    pub ancestors: Vec<AncestorStyle>,
    /// Cached effective-background hints, produced by a previous resolution
    /// over shared ancestors. Trusted only when all three are present.
    #[serde(default)]
    pub parent_background_color: Option<String>,
    #[serde(default)]
    pub parent_full_background: Option<String>,
    #[serde(default)]
    pub parent_stopped_at_z_index: Option<bool>,
    pub font_size_px: f64,
    pub root_font_size_px: f64,
}

impl StyleSnapshot {
    /// The checked properties of the focused state.
    #[must_use]
    pub fn focus_style(&self) -> &StateStyle {
        &self.focus.style
    }

    /// Check the input contract. A violation is an extractor bug, not a page
    /// finding: the engine refuses to guess defaults that would corrupt its
    /// accuracy guarantees.
    ///
    /// # Errors
    /// Returns the first [`SnapshotError`] encountered.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.element_ref.0.trim().is_empty() {
            return Err(SnapshotError::EmptyElementRef);
        }
        for (field, value) in [
            ("fontSizePx", self.font_size_px),
            ("rootFontSizePx", self.root_font_size_px),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SnapshotError::InvalidFontMetric { field, value });
            }
        }
        for (field, rect) in [
            ("elementBounds", &self.element_bounds),
            ("parentBounds", &self.parent_bounds),
        ] {
            if ![rect.top, rect.right, rect.bottom, rect.left]
                .iter()
                .all(|edge| edge.is_finite())
            {
                return Err(SnapshotError::NonFiniteBounds { field });
            }
        }
        Ok(())
    }
}

/// A snapshot that violates the input contract.
///
/// These are caller/extractor bugs and abort the evaluation of that element
/// with a structured error; malformed *content* (unparseable colors, odd
/// units) never lands here.
#[derive(Debug, Error, PartialEq)]
pub enum SnapshotError {
    #[error("snapshot has an empty element reference")]
    EmptyElementRef,
    #[error("snapshot field {field} is {value}; font metrics must be finite and positive")]
    InvalidFontMetric { field: &'static str, value: f64 },
    #[error("snapshot field {field} contains a non-finite edge")]
    NonFiniteBounds { field: &'static str },
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn snapshot() -> StyleSnapshot {
        StyleSnapshot {
            element_ref: ElementRef("/html/body/button[1]".into()),
            mechanism_context: MechanismContext::Button,
            normal: StateStyle::default(),
            focus: FocusStyle::default(),
            element_bounds: Rect::default(),
            parent_bounds: Rect::default(),
            ancestors: Vec::new(),
            parent_background_color: None,
            parent_full_background: None,
            parent_stopped_at_z_index: None,
            font_size_px: 16.0,
            root_font_size_px: 16.0,
        }
    }

    #[test]
    fn valid_snapshot_passes() {
        assert_eq!(snapshot().validate(), Ok(()));
    }

    #[test]
    fn empty_element_ref_is_a_contract_violation() {
        let mut bad = snapshot();
        bad.element_ref = ElementRef("   ".into());
        assert_eq!(bad.validate(), Err(SnapshotError::EmptyElementRef));
    }

    #[test]
    fn non_positive_font_metrics_are_rejected() {
        let mut bad = snapshot();
        bad.font_size_px = 0.0;
        assert!(matches!(
            bad.validate(),
            Err(SnapshotError::InvalidFontMetric {
                field: "fontSizePx",
                ..
            })
        ));
        let mut nan = snapshot();
        nan.root_font_size_px = f64::NAN;
        assert!(matches!(
            nan.validate(),
            Err(SnapshotError::InvalidFontMetric {
                field: "rootFontSizePx",
                ..
            })
        ));
    }

    #[test]
    fn non_finite_bounds_are_rejected() {
        let mut bad = snapshot();
        bad.parent_bounds.left = f64::INFINITY;
        assert_eq!(
            bad.validate(),
            Err(SnapshotError::NonFiniteBounds {
                field: "parentBounds"
            })
        );
    }

    #[test]
    fn stacking_context_requires_both_position_and_z_index() {
        assert!(establishes_stacking_context("relative", "3"));
        assert!(establishes_stacking_context("absolute", "0"));
        assert!(!establishes_stacking_context("static", "3"));
        assert!(!establishes_stacking_context("relative", "auto"));
        assert!(!establishes_stacking_context("relative", ""));
        assert!(!establishes_stacking_context("", "5"));
    }

    #[test]
    fn wire_names_are_camel_case() {
        let json = serde_json::to_value(snapshot()).unwrap();
        assert!(json.get("elementRef").is_some());
        assert!(json.get("mechanismContext").is_some());
        assert!(json.get("fontSizePx").is_some());
        let focus = json.get("focus").unwrap();
        assert!(focus.get("outlineStyle").is_some());
        assert!(focus.get("zIndex").is_some());
    }

    #[test]
    fn focus_style_flattens_on_the_wire() {
        let json = r#"{
            "outlineStyle": "solid", "outlineWidth": "2px",
            "outlineColor": "rgb(0,0,0)", "outlineOffset": "0px",
            "borderWidth": "1px", "borderColor": "rgb(0,0,0)",
            "boxShadow": "none", "backgroundColor": "rgb(255,255,255)",
            "fullBackground": "rgb(255,255,255) none",
            "position": "static", "zIndex": "auto"
        }"#;
        let focus: FocusStyle = serde_json::from_str(json).unwrap();
        assert_eq!(focus.style.outline_style, "solid");
        assert_eq!(focus.position, "static");
    }
}
