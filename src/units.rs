//! Physical length units.
//!
//! Lengths are given either as bare numbers, interpreted in a caller-chosen
//! "numeric" unit, or as strings with a unit suffix such as `"1.3em"`,
//! `"4pt"` or `"0.2in"`. Font-relative units are resolved against the
//! current `font.size`.

use std::fmt;
use std::str::FromStr;

use crate::error::{PlotError, Result};
use crate::rc::RcValue;

/// Supported length units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Inch,
    Point,
    Pica,
    Centimeter,
    Millimeter,
    Pixel,
    /// Width of the letter "m" at the current font size
    Em,
    /// Half an em
    En,
}

impl Unit {
    /// Whether converting this unit requires font or display context
    pub fn is_relative(&self) -> bool {
        matches!(self, Unit::Em | Unit::En | Unit::Pixel)
    }

    fn inches(&self, ctx: &UnitContext) -> f64 {
        match self {
            Unit::Inch => 1.0,
            Unit::Point => 1.0 / 72.0,
            Unit::Pica => 1.0 / 6.0,
            Unit::Centimeter => 1.0 / 2.54,
            Unit::Millimeter => 1.0 / 25.4,
            Unit::Pixel => 1.0 / ctx.dpi,
            Unit::Em => ctx.fontsize / 72.0,
            Unit::En => 0.5 * ctx.fontsize / 72.0,
        }
    }
}

impl FromStr for Unit {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "in" => Ok(Unit::Inch),
            "pt" => Ok(Unit::Point),
            "pc" => Ok(Unit::Pica),
            "cm" => Ok(Unit::Centimeter),
            "mm" => Ok(Unit::Millimeter),
            "px" => Ok(Unit::Pixel),
            "em" => Ok(Unit::Em),
            "en" => Ok(Unit::En),
            _ => Err(PlotError::InvalidParameter {
                param: "units".to_string(),
                message: format!(
                    "Unknown unit {:?}. Must be one of: in, pt, pc, cm, mm, px, em, en",
                    s
                ),
            }),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self {
            Unit::Inch => "in",
            Unit::Point => "pt",
            Unit::Pica => "pc",
            Unit::Centimeter => "cm",
            Unit::Millimeter => "mm",
            Unit::Pixel => "px",
            Unit::Em => "em",
            Unit::En => "en",
        };
        f.write_str(suffix)
    }
}

/// Context for resolving font- and display-relative units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitContext {
    /// Font size in points
    pub fontsize: f64,
    /// Display resolution in dots per inch
    pub dpi: f64,
}

impl Default for UnitContext {
    fn default() -> Self {
        Self {
            fontsize: 9.0,
            dpi: 100.0,
        }
    }
}

/// Split a length string like `"1.3em"` into its magnitude and unit.
///
/// A bare number string (`"12"`) yields `None` for the unit.
pub fn parse_length(s: &str) -> Result<(f64, Option<Unit>)> {
    let s = s.trim();
    let split = s
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')))
        .unwrap_or(s.len());
    // The exponent marker is ambiguous with the "em"/"en" suffixes.
    let split = match s[..split].rfind(['e', 'E']) {
        Some(pos) if s[pos..].starts_with("em") || s[pos..].starts_with("en") => pos,
        _ => split,
    };
    let (number, suffix) = s.split_at(split);
    let magnitude = if number.is_empty() && !suffix.is_empty() {
        1.0
    } else {
        number.parse::<f64>().map_err(|_| PlotError::InvalidParameter {
            param: "units".to_string(),
            message: format!("Invalid length string {:?}", s),
        })?
    };
    let unit = if suffix.is_empty() {
        None
    } else {
        Some(suffix.trim().parse::<Unit>()?)
    };
    Ok((magnitude, unit))
}

/// Convert a length value to `dest` units.
///
/// Numbers are interpreted in `numeric` units, strings carry their own unit.
pub fn units(value: &RcValue, numeric: Unit, dest: Unit, ctx: &UnitContext) -> Result<f64> {
    let (magnitude, unit) = match value {
        RcValue::Number(n) => (*n, numeric),
        RcValue::Text(s) => {
            let (magnitude, unit) = parse_length(s)?;
            (magnitude, unit.unwrap_or(numeric))
        }
        other => {
            return Err(PlotError::InvalidParameter {
                param: "units".to_string(),
                message: format!("Cannot convert {} value {} to a length", other.kind(), other),
            })
        }
    };
    Ok(convert(magnitude, unit, dest, ctx))
}

/// Convert a magnitude between two units
pub fn convert(magnitude: f64, from: Unit, to: Unit, ctx: &UnitContext) -> f64 {
    if from == to {
        return magnitude;
    }
    magnitude * from.inches(ctx) / to.inches(ctx)
}
