//! Diagnostic records — the ordered findings the engine emits per element.
//!
//! Wire code names follow `{MechanismContext}{Condition}`, e.g.
//! `ButtonContrastFail`, so downstream reporting can group by either half.

use crate::{ElementRef, MechanismContext};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a finding is a definitive failure or needs manual verification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

/// The condition half of a diagnostic code.
///
/// Errors are measured, definitive findings. Warnings are either
/// ambiguous-resolution conditions (gradient, image, stacking context,
/// transparency, bounds) that block automatic verification, or advisory
/// redundancy/default-indicator findings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    NoVisibleFocus,
    ColorChangeOnly,
    OutlineNoneNoBoxShadow,
    OutlineNoneWithBoxShadow,
    BorderChangeInsufficient,
    OutlineWidthInsufficient,
    OutlineOffsetInsufficient,
    SingleSideBoxShadow,
    ContrastFail,
    ZIndexFloating,
    ParentZIndexFloating,
    OutlineExceedsParent,
    ParentGradientBackground,
    ParentImageBackground,
    GradientBackground,
    ImageBackground,
    TransparentFocus,
    DefaultFocus,
    NoBorderOutline,
}

impl Condition {
    /// Intrinsic severity of this condition.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::NoVisibleFocus
            | Self::ColorChangeOnly
            | Self::OutlineNoneNoBoxShadow
            | Self::BorderChangeInsufficient
            | Self::OutlineWidthInsufficient
            | Self::OutlineOffsetInsufficient
            | Self::ContrastFail => Severity::Error,
            Self::OutlineNoneWithBoxShadow
            | Self::SingleSideBoxShadow
            | Self::ZIndexFloating
            | Self::ParentZIndexFloating
            | Self::OutlineExceedsParent
            | Self::ParentGradientBackground
            | Self::ParentImageBackground
            | Self::GradientBackground
            | Self::ImageBackground
            | Self::TransparentFocus
            | Self::DefaultFocus
            | Self::NoBorderOutline => Severity::Warning,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Variant names are the wire fragments.
        write!(f, "{self:?}")
    }
}

/// Measured values backing a finding; omitted from the wire when absent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measured {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_px: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_px: Option<f64>,
}

impl Measured {
    /// No measurement backs this finding.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            ratio: None,
            width_px: None,
            offset_px: None,
        }
    }

    /// A contrast-ratio measurement.
    #[must_use]
    pub const fn ratio(ratio: f64) -> Self {
        Self {
            ratio: Some(ratio),
            width_px: None,
            offset_px: None,
        }
    }

    /// A thickness measurement in device pixels.
    #[must_use]
    pub const fn width(width_px: f64) -> Self {
        Self {
            ratio: None,
            width_px: Some(width_px),
            offset_px: None,
        }
    }

    /// A thickness plus offset measurement in device pixels.
    #[must_use]
    pub const fn width_and_offset(width_px: f64, offset_px: f64) -> Self {
        Self {
            ratio: None,
            width_px: Some(width_px),
            offset_px: Some(offset_px),
        }
    }
}

/// One finding for one element. Diagnostics are plain data: a pure function
/// of a snapshot, never accumulated across elements or pages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// `{MechanismContext}{Condition}`, e.g. `TabindexNoVisibleFocus`.
    pub code: String,
    pub condition: Condition,
    pub severity: Severity,
    pub element_ref: ElementRef,
    #[serde(default)]
    pub measured: Measured,
    pub message: String,
}

impl Diagnostic {
    /// Build a finding; the code string and severity derive from the
    /// mechanism context and condition.
    #[must_use]
    pub fn new(
        context: MechanismContext,
        condition: Condition,
        element_ref: &ElementRef,
        measured: Measured,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: format!("{context}{condition}"),
            condition,
            severity: condition.severity(),
            element_ref: element_ref.clone(),
            measured,
            message: message.into(),
        }
    }
}
