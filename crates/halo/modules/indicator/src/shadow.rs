//! `box-shadow` parsing — enough of the grammar to reason about indicator
//! geometry and color.
//! Spec: <https://www.w3.org/TR/css-backgrounds-3/#box-shadow>

use cssparser::{ParseError, Parser, ParserInput, Token};
use halo_color::{Rgba, parse_css_color};
use log::debug;

/// One shadow layer, lengths resolved to device pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParsedShadow {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub spread: f64,
    pub color: Option<Rgba>,
    pub inset: bool,
}

impl ParsedShadow {
    /// Whether the offset/spread geometry paints a ring on all four edges.
    ///
    /// A side is wrapped only when the spread outgrows the offset component
    /// pushing away from it. Blur is not counted, so a pure blur glow reads
    /// as covering no side; the same arithmetic holds for inset shadows.
    #[must_use]
    pub fn covers_all_sides(&self) -> bool {
        self.spread > self.offset_x.abs() && self.spread > self.offset_y.abs()
    }
}

/// Parse a computed `box-shadow` list.
///
/// Tolerates both serialization orders (color before or after the length
/// run), `inset` anywhere in a layer, and multiple comma-separated layers —
/// commas inside `rgb()` must not split, which is why this tokenizes instead
/// of splitting strings. Returns an empty list for `none`, empty, or
/// malformed input: a shadow that cannot be parsed contributes no mechanism.
#[must_use]
pub fn parse_box_shadow(
    input: &str,
    font_size_px: f64,
    root_font_size_px: f64,
) -> Vec<ParsedShadow> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Vec::new();
    }
    let mut parser_input = ParserInput::new(trimmed);
    let mut parser = Parser::new(&mut parser_input);
    let layers = parser.parse_comma_separated(|layer_parser| {
        parse_shadow_layer(layer_parser, font_size_px, root_font_size_px)
    });
    layers.unwrap_or_else(|_| {
        debug!("[SHADOW] ignoring unparseable box-shadow value: {trimmed:?}");
        Vec::new()
    })
}

/// Parse one `<shadow>`: optional `inset`, two to four lengths
/// (x, y, blur, spread), and at most one color in either position.
fn parse_shadow_layer<'input>(
    parser: &mut Parser<'input, '_>,
    font_size_px: f64,
    root_font_size_px: f64,
) -> Result<ParsedShadow, ParseError<'input, ()>> {
    let mut lengths: Vec<f64> = Vec::new();
    let mut colors: Vec<Rgba> = Vec::new();
    let mut inset = false;

    loop {
        let start = parser.position();
        let token = match parser.next() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        match token {
            Token::Ident(ref name) if name.eq_ignore_ascii_case("inset") => inset = true,
            Token::Ident(ref name) => {
                let color = parse_css_color(name.as_ref())
                    .ok_or_else(|| parser.new_custom_error(()))?;
                colors.push(color);
            }
            Token::Hash(ref digits) | Token::IDHash(ref digits) => {
                let color = parse_css_color(&format!("#{}", digits.as_ref()))
                    .ok_or_else(|| parser.new_custom_error(()))?;
                colors.push(color);
            }
            Token::Function(_) => {
                // Drain the arguments so the raw slice below spans the whole
                // functional notation, e.g. `rgb(21, 156, 228)`.
                parser.parse_nested_block(|block| {
                    while block.next().is_ok() {}
                    Ok::<(), ParseError<'input, ()>>(())
                })?;
                let color = parse_css_color(parser.slice_from(start))
                    .ok_or_else(|| parser.new_custom_error(()))?;
                colors.push(color);
            }
            Token::Dimension {
                value, ref unit, ..
            } => {
                let pixels = match unit.as_ref().to_ascii_lowercase().as_str() {
                    "px" => f64::from(value),
                    "em" => f64::from(value) * font_size_px,
                    "rem" => f64::from(value) * root_font_size_px,
                    // Unknown units have no measurable extent.
                    _ => 0.0,
                };
                lengths.push(pixels);
            }
            Token::Number { value: 0.0, .. } => lengths.push(0.0),
            _ => return Err(parser.new_custom_error(())),
        }
    }

    if !(2..=4).contains(&lengths.len()) || colors.len() > 1 {
        return Err(parser.new_custom_error(()));
    }
    Ok(ParsedShadow {
        offset_x: lengths[0],
        offset_y: lengths[1],
        blur: lengths.get(2).copied().unwrap_or(0.0),
        spread: lengths.get(3).copied().unwrap_or(0.0),
        color: colors.first().copied(),
        inset,
    })
}
