//! Validators for rc settings.
//!
//! Every key in the rc table carries a [`Validator`]. Validators are pure:
//! they either return the normalized value or describe what was expected,
//! so a rejected assignment can simply be retried with a corrected value.

use crate::error::{PlotError, Result};
use crate::rc::RcValue;
use crate::units::{self, Unit};

/// Named relative font sizes accepted wherever a font size is expected
pub const FONT_SIZE_NAMES: &[&str] = &[
    "xx-small", "x-small", "small", "med-small", "medium", "med-large", "large", "x-large",
    "xx-large", "larger", "smaller",
];

/// Font weights accepted by [`Validator::FontWeight`]
pub const FONT_WEIGHTS: &[&str] = &[
    "ultralight", "light", "normal", "regular", "book", "medium", "roman", "semibold",
    "demibold", "demi", "bold", "heavy", "extra bold", "black",
];

/// A validation rule for one rc key
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Validator {
    /// Accept anything
    Any,
    /// Booleans, also from "true"/"false", "yes"/"no", "on"/"off", 0/1
    Bool,
    /// Any finite number, also parsed from strings
    Float,
    /// Finite number >= 0
    NonNegative,
    /// Number between 0 and 1 inclusive
    Fraction,
    /// Absolute size in points, a size with an absolute unit, or a relative size name
    FontSize,
    /// Font weight name or a number between 100 and 900
    FontWeight,
    /// Color name, hex string, grayscale string or RGB(A) tuple in [0, 1]
    Color,
    /// Length: a number or a unit string like "1.3em"
    Units,
    /// Any string
    Text,
    /// Subplot label style: `false` or a pattern containing "a" or "A"
    Abc,
    /// One of a fixed set of strings
    Choice(&'static [&'static str]),
}

impl Validator {
    /// Validate `value` for `key`, returning the normalized value.
    pub fn validate(&self, key: &str, value: RcValue) -> Result<RcValue> {
        self.check(value.clone())
            .map_err(|expected| PlotError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
                expected,
            })
    }

    fn check(&self, value: RcValue) -> std::result::Result<RcValue, String> {
        match self {
            Validator::Any => Ok(value),
            Validator::Bool => to_bool(&value)
                .map(RcValue::Bool)
                .ok_or_else(|| "a boolean".to_string()),
            Validator::Float => to_float(&value)
                .map(RcValue::Number)
                .ok_or_else(|| "a finite number".to_string()),
            Validator::NonNegative => match to_float(&value) {
                Some(n) if n >= 0.0 => Ok(RcValue::Number(n)),
                _ => Err("a non-negative number".to_string()),
            },
            Validator::Fraction => match to_float(&value) {
                Some(n) if (0.0..=1.0).contains(&n) => Ok(RcValue::Number(n)),
                _ => Err("a number between 0 and 1".to_string()),
            },
            Validator::FontSize => validate_fontsize(value),
            Validator::FontWeight => match &value {
                RcValue::Text(s) if FONT_WEIGHTS.contains(&s.as_str()) => Ok(value),
                RcValue::Number(n) if (100.0..=900.0).contains(n) => Ok(value),
                _ => Err(format!("a number in [100, 900] or one of {:?}", FONT_WEIGHTS)),
            },
            Validator::Color => validate_color(value),
            Validator::Units => match &value {
                RcValue::Number(n) if n.is_finite() => Ok(value),
                RcValue::Text(s) if units::parse_length(s).is_ok() => Ok(value),
                _ => Err("a number or a length string like \"1.3em\"".to_string()),
            },
            Validator::Text => match value {
                RcValue::Text(_) => Ok(value),
                _ => Err("a string".to_string()),
            },
            Validator::Abc => match &value {
                RcValue::Bool(_) => Ok(value),
                RcValue::Text(s) if s.contains('a') || s.contains('A') => Ok(value),
                _ => Err("a boolean or a string containing \"a\" or \"A\"".to_string()),
            },
            Validator::Choice(options) => match &value {
                RcValue::Text(s) if options.contains(&s.as_str()) => Ok(value),
                _ => Err(format!("one of {:?}", options)),
            },
        }
    }
}

fn to_bool(value: &RcValue) -> Option<bool> {
    match value {
        RcValue::Bool(b) => Some(*b),
        RcValue::Number(n) if *n == 0.0 || *n == 1.0 => Some(*n == 1.0),
        RcValue::Text(s) => match s.to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" | "t" | "y" => Some(true),
            "false" | "no" | "off" | "0" | "f" | "n" | "none" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn to_float(value: &RcValue) -> Option<f64> {
    let n = match value {
        RcValue::Number(n) => *n,
        RcValue::Text(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn validate_fontsize(value: RcValue) -> std::result::Result<RcValue, String> {
    let expected = || format!("a size in points, an absolute length or one of {:?}", FONT_SIZE_NAMES);
    match &value {
        RcValue::Number(n) if n.is_finite() && *n >= 0.0 => Ok(value),
        RcValue::Text(s) if FONT_SIZE_NAMES.contains(&s.as_str()) => Ok(value),
        RcValue::Text(s) => match units::parse_length(s) {
            Ok((magnitude, unit)) => {
                let unit = unit.unwrap_or(Unit::Point);
                if unit.is_relative() || magnitude < 0.0 {
                    return Err(expected());
                }
                let ctx = units::UnitContext::default();
                Ok(RcValue::Number(units::convert(magnitude, unit, Unit::Point, &ctx)))
            }
            Err(_) => Err(expected()),
        },
        _ => Err(expected()),
    }
}

fn validate_color(value: RcValue) -> std::result::Result<RcValue, String> {
    let expected = || "a color name, hex string or RGB(A) tuple".to_string();
    match &value {
        RcValue::Text(s) if s.starts_with('#') => {
            let digits = &s[1..];
            let valid_len = matches!(digits.len(), 3 | 4 | 6 | 8);
            if valid_len && digits.chars().all(|c| c.is_ascii_hexdigit()) {
                Ok(value)
            } else {
                Err(expected())
            }
        }
        RcValue::Text(s) if s.trim().is_empty() => Err(expected()),
        RcValue::Text(s) => match s.parse::<f64>() {
            // Grayscale strings like "0.5"
            Ok(gray) if !(0.0..=1.0).contains(&gray) => Err(expected()),
            _ => Ok(value),
        },
        RcValue::List(items) if matches!(items.len(), 3 | 4) => {
            let in_range = items
                .iter()
                .all(|item| matches!(item.as_f64(), Some(c) if (0.0..=1.0).contains(&c)));
            if in_range {
                Ok(value)
            } else {
                Err(expected())
            }
        }
        _ => Err(expected()),
    }
}
