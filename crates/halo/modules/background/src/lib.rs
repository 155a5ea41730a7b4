//! Effective-background resolution — walk the ancestor chain to find what an
//! indicator is actually drawn against.
//!
//! Works over the parent-chain array embedded in the snapshot; no live DOM
//! access. Gradients, images, and stacking contexts make the true backdrop
//! undecidable from style alone, so they end the walk with the matching
//! ambiguity flag instead of a guessed color.
//! Spec: <https://www.w3.org/TR/css-backgrounds-3/#backgrounds>

#![forbid(unsafe_code)]

use halo_color::{Rgba, parse_css_color};
use halo_snapshot::{AncestorStyle, StyleSnapshot};
use log::{debug, warn};

/// Upper bound on the ancestor walk. Malformed or cyclic extractor output
/// must not turn a pure evaluation into unbounded work.
pub const MAX_ANCESTOR_DEPTH: usize = 64;

/// Outcome of one background resolution.
///
/// When any ambiguity flag is set, `color` holds the opaque-white fallback
/// and must not be used for contrast; callers branch on the flags first.
#[derive(Clone, Copy, Debug, PartialEq)]
#[allow(
    clippy::struct_excessive_bools,
    reason = "independent resolution facts, not a state machine"
)]
pub struct ResolvedBackground {
    pub color: Rgba,
    /// A non-opaque stacking context was hit; unrelated content may be
    /// composited beneath it at runtime.
    pub stopped_at_z_index: bool,
    pub has_gradient: bool,
    pub has_image: bool,
    /// The depth cap fired before the chain resolved; the color is the
    /// documented white default, flagged rather than trusted.
    pub truncated: bool,
}

impl ResolvedBackground {
    /// A concrete, fully resolved color.
    #[must_use]
    pub const fn solid(color: Rgba) -> Self {
        Self {
            color,
            stopped_at_z_index: false,
            has_gradient: false,
            has_image: false,
            truncated: false,
        }
    }

    /// Whether automatic contrast verification is blocked.
    #[must_use]
    pub const fn is_ambiguous(&self) -> bool {
        self.stopped_at_z_index || self.has_gradient || self.has_image
    }
}

/// Whether a full `background` serialization declares a CSS gradient.
#[must_use]
pub fn declares_gradient(full_background: &str) -> bool {
    full_background.to_ascii_lowercase().contains("gradient(")
}

/// Whether a full `background` serialization declares an image source.
#[must_use]
pub fn declares_image(full_background: &str) -> bool {
    full_background.to_ascii_lowercase().contains("url(")
}

/// Resolve the effective background behind an element by walking its
/// ancestors, leafmost parent first.
///
/// Stops at the first gradient/image declaration, the first fully opaque
/// background color, or the first non-opaque stacking context; otherwise
/// continues upward. An exhausted chain defaults to opaque white.
/// Unparseable background colors are treated as transparent and the walk
/// continues — best effort, never fatal.
#[must_use]
pub fn resolve(ancestors: &[AncestorStyle]) -> ResolvedBackground {
    for (depth, ancestor) in ancestors.iter().enumerate() {
        if depth >= MAX_ANCESTOR_DEPTH {
            warn!(
                "[BG] ancestor walk truncated at depth {depth}; defaulting to white (unresolved background)"
            );
            return ResolvedBackground {
                truncated: true,
                ..ResolvedBackground::solid(Rgba::WHITE)
            };
        }

        let gradient = declares_gradient(&ancestor.full_background);
        let image = declares_image(&ancestor.full_background);
        if gradient || image {
            debug!("[BG] depth {depth}: gradient={gradient} image={image}; backdrop undecidable");
            return ResolvedBackground {
                has_gradient: gradient,
                has_image: image,
                ..ResolvedBackground::solid(Rgba::WHITE)
            };
        }

        if let Some(color) = parse_css_color(&ancestor.background_color)
            && color.is_opaque()
        {
            debug!("[BG] depth {depth}: opaque {color:?}");
            return ResolvedBackground::solid(color);
        }

        if ancestor.establishes_stacking_context() {
            debug!(
                "[BG] depth {depth}: non-opaque stacking context (position={}, z-index={})",
                ancestor.position, ancestor.z_index
            );
            return ResolvedBackground {
                stopped_at_z_index: true,
                ..ResolvedBackground::solid(Rgba::WHITE)
            };
        }
    }
    // Chain exhausted: the page backdrop, opaque white by convention.
    ResolvedBackground::solid(Rgba::WHITE)
}

/// Rebuild a [`ResolvedBackground`] from the hints a previous resolution
/// cached on the snapshot, skipping the walk.
#[must_use]
pub fn from_hints(
    background_color: &str,
    full_background: &str,
    stopped_at_z_index: bool,
) -> ResolvedBackground {
    ResolvedBackground {
        color: parse_css_color(background_color).unwrap_or(Rgba::WHITE),
        stopped_at_z_index,
        has_gradient: declares_gradient(full_background),
        has_image: declares_image(full_background),
        truncated: false,
    }
}

/// Resolve the parent backdrop for a snapshot: trust the cached hints when
/// the extractor supplied all three, otherwise walk the embedded chain.
#[must_use]
pub fn resolve_for(snapshot: &StyleSnapshot) -> ResolvedBackground {
    if let (Some(color), Some(full), Some(stopped)) = (
        snapshot.parent_background_color.as_deref(),
        snapshot.parent_full_background.as_deref(),
        snapshot.parent_stopped_at_z_index,
    ) {
        return from_hints(color, full, stopped);
    }
    resolve(&snapshot.ancestors)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn ancestor(background_color: &str, full_background: &str) -> AncestorStyle {
        AncestorStyle {
            background_color: background_color.into(),
            full_background: full_background.into(),
            position: "static".into(),
            z_index: "auto".into(),
        }
    }

    #[test]
    fn first_opaque_color_wins() {
        let chain = [
            ancestor("rgb(240, 240, 240)", "rgb(240, 240, 240) none"),
            ancestor("rgb(0, 0, 0)", "rgb(0, 0, 0) none"),
        ];
        let resolved = resolve(&chain);
        assert_eq!(resolved.color, Rgba::opaque(240, 240, 240));
        assert!(!resolved.is_ambiguous());
    }

    #[test]
    fn transparent_layers_are_walked_through() {
        let chain = [
            ancestor("rgba(0, 0, 0, 0)", "rgba(0, 0, 0, 0) none"),
            ancestor("rgba(10, 10, 10, 0.4)", "rgba(10, 10, 10, 0.4) none"),
            ancestor("rgb(20, 30, 40)", "rgb(20, 30, 40) none"),
        ];
        assert_eq!(resolve(&chain).color, Rgba::opaque(20, 30, 40));
    }

    #[test]
    fn gradient_ends_the_walk_even_with_opaque_below() {
        let chain = [
            ancestor(
                "rgba(0, 0, 0, 0)",
                "linear-gradient(rgb(255, 0, 0), rgb(0, 0, 255))",
            ),
            ancestor("rgb(255, 255, 255)", "rgb(255, 255, 255) none"),
        ];
        let resolved = resolve(&chain);
        assert!(resolved.has_gradient);
        assert!(!resolved.has_image);
        assert!(resolved.is_ambiguous());
    }

    #[test]
    fn image_url_ends_the_walk() {
        let chain = [ancestor(
            "rgba(0, 0, 0, 0)",
            "rgba(0, 0, 0, 0) url(\"texture.png\") repeat",
        )];
        let resolved = resolve(&chain);
        assert!(resolved.has_image);
        assert!(!resolved.has_gradient);
    }

    #[test]
    fn non_opaque_stacking_context_stops_the_walk() {
        let mut floating = ancestor("rgba(255, 255, 255, 0.5)", "rgba(255, 255, 255, 0.5) none");
        floating.position = "absolute".into();
        floating.z_index = "10".into();
        let chain = [floating, ancestor("rgb(0, 0, 0)", "rgb(0, 0, 0) none")];
        let resolved = resolve(&chain);
        assert!(resolved.stopped_at_z_index);
    }

    #[test]
    fn opaque_stacking_context_still_resolves() {
        let mut floating = ancestor("rgb(50, 50, 50)", "rgb(50, 50, 50) none");
        floating.position = "fixed".into();
        floating.z_index = "2".into();
        let resolved = resolve(&[floating]);
        assert_eq!(resolved.color, Rgba::opaque(50, 50, 50));
        assert!(!resolved.stopped_at_z_index);
    }

    #[test]
    fn exhausted_chain_defaults_to_white() {
        let resolved = resolve(&[ancestor("rgba(0, 0, 0, 0)", "none")]);
        assert_eq!(resolved.color, Rgba::WHITE);
        assert!(!resolved.truncated);
        let empty = resolve(&[]);
        assert_eq!(empty.color, Rgba::WHITE);
    }

    #[test]
    fn unparseable_colors_are_treated_as_transparent() {
        let chain = [
            ancestor("definitely-not-a-color", "none"),
            ancestor("rgb(9, 9, 9)", "rgb(9, 9, 9) none"),
        ];
        assert_eq!(resolve(&chain).color, Rgba::opaque(9, 9, 9));
    }

    #[test]
    fn depth_cap_flags_truncation() {
        let chain: Vec<AncestorStyle> = (0..MAX_ANCESTOR_DEPTH + 5)
            .map(|_| ancestor("rgba(0, 0, 0, 0)", "none"))
            .collect();
        let resolved = resolve(&chain);
        assert!(resolved.truncated);
        assert_eq!(resolved.color, Rgba::WHITE);
    }

    #[test]
    fn hints_bypass_the_walk() {
        let resolved = from_hints("rgb(1, 2, 3)", "rgb(1, 2, 3) none", false);
        assert_eq!(resolved.color, Rgba::opaque(1, 2, 3));
        let gated = from_hints("rgb(1, 2, 3)", "radial-gradient(red, blue)", false);
        assert!(gated.has_gradient);
        let stopped = from_hints("rgb(1, 2, 3)", "none", true);
        assert!(stopped.stopped_at_z_index);
    }
}
