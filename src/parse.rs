//! Attribute micro-syntax parsing.
//!
//! Turns the textual forms of `viewBox`, `preserveAspectRatio`, `orient`
//! and `markerUnits` into structured values, once, at load time. The
//! geometry code never looks at strings.
//!
//! ```
//! use zenviewbox::{Orient, PreserveAspectRatio, ViewBox};
//!
//! let vb: ViewBox = "0,0 24 24".parse().unwrap();
//! assert_eq!(vb, ViewBox::new(0.0, 0.0, 24.0, 24.0));
//!
//! let par: PreserveAspectRatio = "defer xMaxYMid".parse().unwrap();
//! assert_eq!(par.align.keyword(), "xMaxYMid");
//!
//! let orient: Orient = "0.25turn".parse().unwrap();
//! assert_eq!(orient, Orient::Angle(90.0));
//! ```
//!
//! Number syntax follows SVG: optional sign, digits with an optional
//! fraction (`.5`, `2.` are fine) and an optional exponent. Lists are
//! separated by whitespace, a comma, or both.

use core::str::FromStr;

use num_traits::Float;

use crate::aspect::{AlignmentPolicy, AxisAlign, MeetOrSlice, PreserveAspectRatio};
use crate::geometry::ViewBox;
use crate::marker::{MarkerUnits, Orient};

/// Attribute parse failure. Byte offsets refer to the input string.
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// Input was empty or whitespace only where a value is required.
    #[error("empty attribute value")]
    Empty,
    /// Expected a number at this offset.
    #[error("invalid number at byte {at}")]
    InvalidNumber { at: usize },
    /// A number list had the wrong length.
    #[error("expected {expected} numbers, found {found}")]
    WrongNumberCount { expected: usize, found: usize },
    /// A width or height was zero or negative.
    #[error("width and height must be positive, got {value}")]
    InvalidDimension { value: f64 },
    /// Unrecognized keyword starting at this offset.
    #[error("unknown keyword at byte {at}")]
    UnknownKeyword { at: usize },
    /// Valid value followed by unexpected input at this offset.
    #[error("unexpected trailing input at byte {at}")]
    TrailingInput { at: usize },
}

/// Parse a `viewBox` attribute: `"<min-x> <min-y> <width> <height>"`.
pub fn parse_view_box(text: &str) -> Result<ViewBox, ParseError> {
    let mut s = Stream::new(text);
    s.skip_ws();
    if s.at_end() {
        return Err(ParseError::Empty);
    }

    let mut vals = [0.0f64; 4];
    let mut found = 0usize;
    while !s.at_end() {
        let n = s.number()?;
        if found < vals.len() {
            vals[found] = n;
        }
        found += 1;
        s.skip_comma_ws();
    }
    if found != 4 {
        return Err(ParseError::WrongNumberCount { expected: 4, found });
    }

    let [min_x, min_y, width, height] = vals;
    for value in [width, height] {
        if value <= 0.0 {
            return Err(ParseError::InvalidDimension { value });
        }
    }
    Ok(ViewBox::new(min_x, min_y, width, height))
}

/// Parse a `preserveAspectRatio` attribute:
/// `"[defer] <align> [meet | slice]"`.
///
/// Empty input yields the default (`xMidYMid meet`). `defer` is accepted
/// and ignored; it only matters for `<image>` elements.
pub fn parse_preserve_aspect_ratio(text: &str) -> Result<PreserveAspectRatio, ParseError> {
    let mut s = Stream::new(text);
    s.skip_ws();
    if s.at_end() {
        return Ok(PreserveAspectRatio::default());
    }

    let mut start = s.pos;
    let mut word = s.word();
    if word == "defer" {
        s.skip_ws();
        start = s.pos;
        word = s.word();
    }
    let align = parse_align(word).ok_or(ParseError::UnknownKeyword { at: start })?;

    s.skip_ws();
    let mut meet_or_slice = MeetOrSlice::Meet;
    if !s.at_end() {
        let at = s.pos;
        meet_or_slice = match s.word() {
            "meet" => MeetOrSlice::Meet,
            "slice" => MeetOrSlice::Slice,
            _ => return Err(ParseError::UnknownKeyword { at }),
        };
    }

    s.skip_ws();
    if !s.at_end() {
        return Err(ParseError::TrailingInput { at: s.pos });
    }
    Ok(PreserveAspectRatio::new(align, meet_or_slice))
}

/// Parse an `orient` attribute: `auto`, `auto-start-reverse`, or an angle
/// with an optional `deg`, `rad`, `grad` or `turn` unit (degrees if none).
pub fn parse_orient(text: &str) -> Result<Orient, ParseError> {
    let trimmed = text.trim();
    match trimmed {
        "" => return Err(ParseError::Empty),
        "auto" => return Ok(Orient::Auto),
        "auto-start-reverse" => return Ok(Orient::AutoStartReverse),
        _ => {}
    }

    let mut s = Stream::new(text);
    s.skip_ws();
    let value_at = s.pos;
    let value = s.number()?;
    let unit_at = s.pos;
    let unit = s.word();
    let degrees = if unit.is_empty() || unit.eq_ignore_ascii_case("deg") {
        value
    } else if unit.eq_ignore_ascii_case("rad") {
        Float::to_degrees(value)
    } else if unit.eq_ignore_ascii_case("grad") {
        value * 360.0 / 400.0
    } else if unit.eq_ignore_ascii_case("turn") {
        value * 360.0
    } else {
        return Err(ParseError::UnknownKeyword { at: unit_at });
    };
    if !degrees.is_finite() {
        return Err(ParseError::InvalidNumber { at: value_at });
    }

    s.skip_ws();
    if !s.at_end() {
        return Err(ParseError::TrailingInput { at: s.pos });
    }
    Ok(Orient::Angle(degrees))
}

/// Parse a `markerUnits` attribute: `strokeWidth` or `userSpaceOnUse`.
pub fn parse_marker_units(text: &str) -> Result<MarkerUnits, ParseError> {
    match text.trim() {
        "" => Err(ParseError::Empty),
        "strokeWidth" => Ok(MarkerUnits::StrokeWidth),
        "userSpaceOnUse" => Ok(MarkerUnits::UserSpaceOnUse),
        _ => Err(ParseError::UnknownKeyword {
            at: text.len() - text.trim_start().len(),
        }),
    }
}

fn parse_align(word: &str) -> Option<AlignmentPolicy> {
    if word == "none" {
        return Some(AlignmentPolicy::None);
    }
    // x{Min,Mid,Max}Y{Min,Mid,Max}, case-sensitive
    let rest = word.strip_prefix('x')?;
    let (x, rest) = split_axis(rest)?;
    let rest = rest.strip_prefix('Y')?;
    let (y, rest) = split_axis(rest)?;
    rest.is_empty().then_some(AlignmentPolicy::aligned(x, y))
}

fn split_axis(s: &str) -> Option<(AxisAlign, &str)> {
    let token = s.get(..3)?;
    let align = match token {
        "Min" => AxisAlign::Min,
        "Mid" => AxisAlign::Mid,
        "Max" => AxisAlign::Max,
        _ => return None,
    };
    Some((align, &s[3..]))
}

impl FromStr for ViewBox {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_view_box(s)
    }
}

impl FromStr for PreserveAspectRatio {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_preserve_aspect_ratio(s)
    }
}

impl FromStr for Orient {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_orient(s)
    }
}

impl FromStr for MarkerUnits {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_marker_units(s)
    }
}

// ---- Tokenizer ----

/// Byte cursor over ASCII attribute text.
struct Stream<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Stream<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r' | b'\x0C')) {
            self.pos += 1;
        }
    }

    /// Whitespace, then at most one comma, then whitespace.
    fn skip_comma_ws(&mut self) {
        self.skip_ws();
        if self.peek() == Some(b',') {
            self.pos += 1;
            self.skip_ws();
        }
    }

    /// Run of ASCII letters and `-` (keywords, units).
    fn word(&mut self) -> &'a str {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphabetic() || c == b'-') {
            self.pos += 1;
        }
        &self.text[start..self.pos]
    }

    fn digits(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn number(&mut self) -> Result<f64, ParseError> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }

        let int_digits = self.digits();
        let mut frac_digits = 0;
        if self.peek() == Some(b'.') {
            self.pos += 1;
            frac_digits = self.digits();
        }
        if int_digits == 0 && frac_digits == 0 {
            self.pos = start;
            return Err(ParseError::InvalidNumber { at: start });
        }

        // Only consume an exponent if digits follow, so `1em` stays `1` + `em`.
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let mark = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.digits() == 0 {
                self.pos = mark;
            }
        }

        // `1e400` is lexically fine but overflows to infinity.
        match self.text[start..self.pos].parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(ParseError::InvalidNumber { at: start }),
        }
    }
}
