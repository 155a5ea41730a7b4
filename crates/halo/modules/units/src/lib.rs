//! CSS length resolution — the px/em/rem subset focus indicators are
//! measured in, converted to device pixels.
//! Spec: <https://www.w3.org/TR/css-values-3/#lengths>

#![forbid(unsafe_code)]

use cssparser::{Parser, ParserInput, Token};

/// Supported subset of CSS `<length>` units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LengthUnit {
    Pixels,
    Ems,
    RootEms,
}

/// A parsed CSS `<length>`. Sign is preserved; outline-offset is allowed to
/// be negative and the offset branch below zero is meaningful.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

impl Length {
    /// Convert to device pixels given the element and root font sizes.
    /// Spec: <https://www.w3.org/TR/css-values-3/#font-relative-lengths>
    #[must_use]
    pub fn to_px(&self, font_size_px: f64, root_font_size_px: f64) -> f64 {
        match self.unit {
            LengthUnit::Pixels => self.value,
            LengthUnit::Ems => self.value * font_size_px,
            LengthUnit::RootEms => self.value * root_font_size_px,
        }
    }
}

/// Parse a CSS `<length>` out of a raw property string.
///
/// Accepts `px`/`em`/`rem` dimensions and unitless zero. Returns `None` for
/// everything else — keywords (`none`, `auto`, `medium`), bare numbers,
/// unsupported units, empty strings — so callers can distinguish "measured
/// zero" from "nothing measurable".
#[must_use]
pub fn parse_length(input: &str) -> Option<Length> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut parser_input = ParserInput::new(trimmed);
    let mut parser = Parser::new(&mut parser_input);
    match parser.next() {
        Ok(&Token::Dimension { value, ref unit, .. }) => {
            let unit_kind = match unit.as_ref().to_ascii_lowercase().as_str() {
                "px" => LengthUnit::Pixels,
                "em" => LengthUnit::Ems,
                "rem" => LengthUnit::RootEms,
                _ => return None,
            };
            Some(Length {
                value: f64::from(value),
                unit: unit_kind,
            })
        }
        // Unitless zero is a valid <length> per spec; any other bare number
        // has no measurable thickness here.
        Ok(&Token::Number { value: 0.0, .. }) => Some(Length {
            value: 0.0,
            unit: LengthUnit::Pixels,
        }),
        _ => None,
    }
}

/// Resolve a raw CSS length string to device pixels.
///
/// Unparseable input resolves to `0.0` with no error — a property that
/// cannot be measured contributes no indicator thickness, and the evaluation
/// must not abort over it.
#[must_use]
pub fn resolve_px(input: &str, font_size_px: f64, root_font_size_px: f64) -> f64 {
    parse_length(input).map_or(0.0, |length| length.to_px(font_size_px, root_font_size_px))
}
