//! Per-mechanism contrast evaluation — picks the comparison target each
//! focus mechanism is judged against and applies the WCAG non-text minimum.
//!
//! Mechanisms never short-circuit one another; each produces exactly one
//! terminal [`MechanismOutcome`]. Ambiguous backdrops (gradients, images,
//! stacking contexts) and translucent indicator colors gate a mechanism out
//! with a named warning instead of a guessed number.
//! Spec: <https://www.w3.org/TR/WCAG21/#non-text-contrast>

#![forbid(unsafe_code)]

use halo_background::{ResolvedBackground, declares_gradient, declares_image};
use halo_bounds::exceeds_parent;
use halo_color::{Rgba, contrast_ratio, parse_css_color};
use halo_indicator::IndicatorSummary;
use halo_snapshot::{Condition, StateStyle, StyleSnapshot};

/// WCAG 1.4.11 minimum contrast for non-text indicators. A ratio below this
/// is a failure; nothing under it is ever silently accepted.
pub const MIN_NON_TEXT_CONTRAST: f64 = 3.0;

/// Which pair a reported ratio was computed against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComparisonTarget {
    /// The element's border color before focus.
    PreviousBorder,
    /// The element's own (opaque) background color.
    OwnBackground,
    /// The background resolved from the ancestor chain.
    ParentBackground,
}

/// Terminal result of one mechanism's gate chain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MechanismOutcome {
    /// Worst-case ratio met the minimum.
    Pass { ratio: f64 },
    /// A computable pair fell below the minimum.
    Fail {
        ratio: f64,
        against: ComparisonTarget,
    },
    /// Automatic verification is blocked; the condition names why.
    Gated { condition: Condition },
    /// A parse failure removed every computable pair. Emits nothing.
    Skipped,
}

impl MechanismOutcome {
    /// Whether this mechanism verified cleanly.
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass { .. })
    }
}

/// What an indicator drawn over the element's own box is composited
/// against: a concrete color, or a condition that blocks resolution.
enum Backdrop {
    Color(Rgba, ComparisonTarget),
    Blocked(Condition),
}

/// Resolve the element's effective own background.
///
/// An opaque own background wins. A transparent, translucent, or
/// unparseable one falls through to the ancestor resolution, whose
/// ambiguity states surface as the matching parent-side conditions —
/// ambiguity never passes silently.
fn own_backdrop(focus: &StateStyle, parent: &ResolvedBackground) -> Backdrop {
    if declares_gradient(&focus.full_background) {
        return Backdrop::Blocked(Condition::GradientBackground);
    }
    if declares_image(&focus.full_background) {
        return Backdrop::Blocked(Condition::ImageBackground);
    }
    if let Some(color) = parse_css_color(&focus.background_color)
        && color.is_opaque()
    {
        return Backdrop::Color(color, ComparisonTarget::OwnBackground);
    }
    if parent.stopped_at_z_index {
        return Backdrop::Blocked(Condition::ParentZIndexFloating);
    }
    if parent.has_gradient {
        return Backdrop::Blocked(Condition::ParentGradientBackground);
    }
    if parent.has_image {
        return Backdrop::Blocked(Condition::ParentImageBackground);
    }
    Backdrop::Color(parent.color, ComparisonTarget::ParentBackground)
}

fn compare(indicator: Rgba, background: Rgba, target: ComparisonTarget) -> MechanismOutcome {
    let ratio = contrast_ratio(&indicator, &background);
    if ratio < MIN_NON_TEXT_CONTRAST {
        MechanismOutcome::Fail {
            ratio,
            against: target,
        }
    } else {
        MechanismOutcome::Pass { ratio }
    }
}

/// Evaluate a border-thickening mechanism.
///
/// The decisive comparison is the new border color against the effective
/// own background. When that backdrop is blocked, the new-vs-previous
/// border pair still counts as evidence: a failing computable pair beats
/// the gate warning, a passing or missing one falls back to it.
#[must_use]
pub fn evaluate_border(snapshot: &StyleSnapshot, parent: &ResolvedBackground) -> MechanismOutcome {
    let focus = snapshot.focus_style();
    let Some(focus_border) = parse_css_color(&focus.border_color) else {
        return MechanismOutcome::Skipped;
    };
    if focus_border.is_translucent() {
        return MechanismOutcome::Gated {
            condition: Condition::TransparentFocus,
        };
    }
    match own_backdrop(focus, parent) {
        Backdrop::Color(background, target) => compare(focus_border, background, target),
        Backdrop::Blocked(condition) => {
            let previous = parse_css_color(&snapshot.normal.border_color)
                .map(|old| contrast_ratio(&focus_border, &old));
            if let Some(ratio) = previous
                && ratio < MIN_NON_TEXT_CONTRAST
            {
                return MechanismOutcome::Fail {
                    ratio,
                    against: ComparisonTarget::PreviousBorder,
                };
            }
            MechanismOutcome::Gated { condition }
        }
    }
}

/// Evaluate an outline mechanism.
///
/// A non-positive offset keeps the outline over the element's own box;
/// a positive offset moves it onto whatever surrounds the element, which
/// first has to survive the ordered floating/bounds/ambiguity gates —
/// only the first triggering gate is reported.
#[must_use]
pub fn evaluate_outline(
    snapshot: &StyleSnapshot,
    summary: &IndicatorSummary,
    parent: &ResolvedBackground,
) -> MechanismOutcome {
    let focus = snapshot.focus_style();

    if summary.outline_offset_px > 0.0 {
        if snapshot.focus.establishes_stacking_context() {
            return MechanismOutcome::Gated {
                condition: Condition::ZIndexFloating,
            };
        }
        if parent.stopped_at_z_index {
            return MechanismOutcome::Gated {
                condition: Condition::ParentZIndexFloating,
            };
        }
        if exceeds_parent(
            &snapshot.element_bounds,
            &snapshot.parent_bounds,
            summary.outline_width_px,
            summary.outline_offset_px,
        ) {
            return MechanismOutcome::Gated {
                condition: Condition::OutlineExceedsParent,
            };
        }
        if parent.has_gradient {
            return MechanismOutcome::Gated {
                condition: Condition::ParentGradientBackground,
            };
        }
        if parent.has_image {
            return MechanismOutcome::Gated {
                condition: Condition::ParentImageBackground,
            };
        }
        let Some(color) = parse_css_color(&focus.outline_color) else {
            return MechanismOutcome::Skipped;
        };
        if color.is_translucent() {
            return MechanismOutcome::Gated {
                condition: Condition::TransparentFocus,
            };
        }
        return compare(color, parent.color, ComparisonTarget::ParentBackground);
    }

    // Offset at or below zero: the outline overlaps the element's own box.
    let Some(color) = parse_css_color(&focus.outline_color) else {
        return MechanismOutcome::Skipped;
    };
    if color.is_translucent() {
        return MechanismOutcome::Gated {
            condition: Condition::TransparentFocus,
        };
    }
    match own_backdrop(focus, parent) {
        Backdrop::Color(background, target) => compare(color, background, target),
        Backdrop::Blocked(condition) => MechanismOutcome::Gated { condition },
    }
}

/// Evaluate a box-shadow mechanism: the first layer with an explicit color
/// is judged against the element's effective own background, under the same
/// gating as a non-offset outline. A list with no parseable color (for
/// instance one inheriting `currentColor`) cannot be verified and is
/// skipped.
#[must_use]
pub fn evaluate_box_shadow(
    snapshot: &StyleSnapshot,
    summary: &IndicatorSummary,
    parent: &ResolvedBackground,
) -> MechanismOutcome {
    let Some(color) = summary.shadows.iter().find_map(|layer| layer.color) else {
        return MechanismOutcome::Skipped;
    };
    if color.is_translucent() {
        return MechanismOutcome::Gated {
            condition: Condition::TransparentFocus,
        };
    }
    match own_backdrop(snapshot.focus_style(), parent) {
        Backdrop::Color(background, target) => compare(color, background, target),
        Backdrop::Blocked(condition) => MechanismOutcome::Gated { condition },
    }
}
