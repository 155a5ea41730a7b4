//! Color model for focus-indicator analysis — CSS color parsing, WCAG
//! relative luminance, and contrast ratio.
//! Spec: <https://www.w3.org/TR/WCAG21/#dfn-relative-luminance>
//! Spec: <https://www.w3.org/TR/WCAG21/#dfn-contrast-ratio>

#![forbid(unsafe_code)]

use csscolorparser::Color;

/// A fully resolved RGBA color. No `currentColor`/`inherit` reaches this
/// layer; the extractor hands us computed values only.
///
/// Channels are 8-bit; alpha is kept as a float in `[0, 1]` because the
/// transparency gate compares it against 0.5, not against a channel value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: f32,
}

impl Rgba {
    /// Opaque white, the documented fallback when a background chain
    /// exhausts without resolving.
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    /// Construct a fully opaque color.
    #[must_use]
    pub const fn opaque(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    /// Whether this color covers whatever is painted beneath it.
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.alpha >= 1.0
    }

    /// Whether this color is too transparent to verify automatically
    /// (alpha below 0.5 — the manual-verification threshold).
    #[must_use]
    pub fn is_translucent(&self) -> bool {
        self.alpha < 0.5
    }
}

/// Parse a CSS `<color>` into an [`Rgba`].
///
/// Supports named colors, `transparent`, hex forms
/// (`#rgb`/`#rgba`/`#rrggbb`/`#rrggbbaa`), and the `rgb()/rgba()` and
/// `hsl()/hsla()` functional notations.
///
/// Returns `None` on malformed input; callers skip the dependent check
/// rather than abort the evaluation.
///
/// Spec: <https://www.w3.org/TR/css-color-4/#typedef-color>
#[must_use]
pub fn parse_css_color(input: &str) -> Option<Rgba> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed: Color = trimmed.parse().ok()?;
    let channels = parsed.to_rgba8();
    Some(Rgba {
        red: channels[0],
        green: channels[1],
        blue: channels[2],
        alpha: parsed.a.clamp(0.0, 1.0),
    })
}

/// Relative luminance of a color in `[0, 1]`.
///
/// Piecewise sRGB linearization per channel, then the Rec. 709 weighting:
/// `L = 0.2126 R + 0.7152 G + 0.0722 B`. Alpha does not participate;
/// compositing against an unknown backdrop is handled by the gates upstream.
///
/// Spec: <https://www.w3.org/TR/WCAG21/#dfn-relative-luminance>
#[must_use]
pub fn relative_luminance(color: &Rgba) -> f64 {
    let red = linearize(color.red);
    let green = linearize(color.green);
    let blue = linearize(color.blue);
    0.0722f64.mul_add(blue, 0.7152f64.mul_add(green, 0.2126 * red))
}

/// WCAG contrast ratio between two colors, in `[1, 21]`.
///
/// `(Lmax + 0.05) / (Lmin + 0.05)` — commutative by construction, since the
/// larger and smaller luminance are picked after the fact.
///
/// Spec: <https://www.w3.org/TR/WCAG21/#dfn-contrast-ratio>
#[must_use]
pub fn contrast_ratio(first: &Rgba, second: &Rgba) -> f64 {
    let lum_first = relative_luminance(first);
    let lum_second = relative_luminance(second);
    let (lighter, darker) = if lum_first > lum_second {
        (lum_first, lum_second)
    } else {
        (lum_second, lum_first)
    };
    (lighter + 0.05) / (darker + 0.05)
}

/// Gamma-expand one 8-bit sRGB channel to linear light.
fn linearize(channel: u8) -> f64 {
    let srgb = f64::from(channel) / 255.0;
    if srgb <= 0.03928 {
        srgb / 12.92
    } else {
        ((srgb + 0.055) / 1.055).powf(2.4)
    }
}
