//! Outline geometry — does an offset outline escape its parent's box?
//!
//! An outline is drawn outside the border edge; with a positive
//! `outline-offset` its outer edge sits `offset + width` past the element on
//! every side. When that ring crosses the parent's bounds it is painted over
//! whatever lies beyond the parent, which the snapshot cannot see.
//! Spec: <https://www.w3.org/TR/css-ui-3/#outline-props>

#![forbid(unsafe_code)]

use halo_snapshot::Rect;

/// Whether an outline ring of `offset + width` extends past any side of the
/// parent rect. Viewport coordinates, y growing downward.
#[must_use]
pub fn exceeds_parent(
    element: &Rect,
    parent: &Rect,
    outline_width_px: f64,
    outline_offset_px: f64,
) -> bool {
    let reach = outline_offset_px + outline_width_px;
    element.top - reach < parent.top
        || element.left - reach < parent.left
        || element.bottom + reach > parent.bottom
        || element.right + reach > parent.right
}
