//! Focus-mechanism classification — what a focus style actually changes
//! relative to the normal state: outline, border thickening, box-shadow,
//! or nothing but color.
//! Spec: <https://www.w3.org/TR/WCAG21/#focus-visible>

#![forbid(unsafe_code)]

pub mod shadow;

pub use shadow::{ParsedShadow, parse_box_shadow};

use halo_snapshot::{StateStyle, StyleSnapshot};
use halo_units::resolve_px;

/// Per-mechanism classification of one snapshot, resolved to device pixels
/// once so downstream checks never re-parse raw strings.
#[derive(Clone, Debug, PartialEq)]
#[allow(
    clippy::struct_excessive_bools,
    reason = "independent classification facts, not a state machine"
)]
pub struct IndicatorSummary {
    /// Focus outline has a drawable style and a positive resolved width.
    pub has_outline: bool,
    pub outline_width_px: f64,
    pub outline_offset_px: f64,
    /// Focus outline-style is `auto`: the user-agent default ring rather
    /// than an author-styled indicator.
    pub ua_default_outline: bool,
    /// Focus border width minus normal border width. Only positive deltas
    /// act as a mechanism; a delta under one pixel is too thin to count.
    pub border_delta_px: f64,
    /// At least one focus shadow layer parsed.
    pub has_box_shadow: bool,
    /// No focus shadow layer wraps all four edges on its own.
    pub single_sided: bool,
    /// Focus shadow layers in declaration order.
    pub shadows: Vec<ParsedShadow>,
    /// Only color-valued properties changed, with no structural mechanism
    /// and no border-width movement.
    pub color_only: bool,
    /// Focus and normal are identical in every checked property.
    pub no_change: bool,
}

/// Classify which focus mechanisms a snapshot exhibits.
#[must_use]
pub fn classify(snapshot: &StyleSnapshot) -> IndicatorSummary {
    let normal = &snapshot.normal;
    let focus = snapshot.focus_style();
    let font_size = snapshot.font_size_px;
    let root_font_size = snapshot.root_font_size_px;

    let outline_width_px = resolve_px(&focus.outline_width, font_size, root_font_size);
    let outline_offset_px = resolve_px(&focus.outline_offset, font_size, root_font_size);
    let has_outline = !outline_suppressed(&focus.outline_style) && outline_width_px > 0.0;
    let ua_default_outline = focus.outline_style.trim().eq_ignore_ascii_case("auto");

    let normal_border_px = resolve_px(&normal.border_width, font_size, root_font_size);
    let focus_border_px = resolve_px(&focus.border_width, font_size, root_font_size);
    let border_delta_px = focus_border_px - normal_border_px;

    let shadows = parse_box_shadow(&focus.box_shadow, font_size, root_font_size);
    let has_box_shadow = !shadows.is_empty();
    let single_sided = has_box_shadow && !shadows.iter().any(ParsedShadow::covers_all_sides);

    let no_change = normal == focus;
    let structural = has_outline || border_delta_px >= 1.0 || has_box_shadow;
    let color_only =
        !no_change && !structural && border_delta_px == 0.0 && color_changed(normal, focus);

    IndicatorSummary {
        has_outline,
        outline_width_px,
        outline_offset_px,
        ua_default_outline,
        border_delta_px,
        has_box_shadow,
        single_sided,
        shadows,
        color_only,
        no_change,
    }
}

/// `none` and the empty computed value both mean no outline is drawn.
fn outline_suppressed(outline_style: &str) -> bool {
    let trimmed = outline_style.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none")
}

/// Whether any color-valued property differs between the two states.
fn color_changed(normal: &StateStyle, focus: &StateStyle) -> bool {
    normal.background_color.trim() != focus.background_color.trim()
        || normal.border_color.trim() != focus.border_color.trim()
        || normal.outline_color.trim() != focus.outline_color.trim()
}
