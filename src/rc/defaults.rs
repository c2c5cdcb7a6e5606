//! Built-in default rc table and the rules linking extension keys to native keys.

use crate::error::Result;
use crate::rc::params::RcParams;
use crate::rc::table::{Namespace, RcEntry};
use crate::rc::validate::Validator;
use crate::rc::RcValue;
use crate::units::{self, Unit};

/// Colorbar locations drawn in a panel outside the subplot
pub const OUTER_LOCATIONS: &[&str] = &["fill", "left", "right", "top", "bottom"];

/// Colorbar and legend locations drawn inside the subplot
pub const INSET_LOCATIONS: &[&str] = &[
    "best",
    "upper right",
    "upper left",
    "lower left",
    "lower right",
    "center left",
    "center right",
    "lower center",
    "upper center",
    "center",
    "ur",
    "ul",
    "ll",
    "lr",
    "cl",
    "cr",
    "lc",
    "uc",
    "c",
];

/// Accepted tick directions
pub const TICK_DIRECTIONS: &[&str] = &["in", "out", "inout"];
const GRID_WHICH: &[&str] = &["major", "minor", "both"];
/// Every accepted colorbar location
pub const COLORBAR_LOCATIONS: &[&str] = &[
    "fill",
    "left",
    "right",
    "top",
    "bottom",
    "upper right",
    "upper left",
    "lower left",
    "lower right",
    "ur",
    "ul",
    "ll",
    "lr",
];

/// Const-friendly default value
#[derive(Debug, Clone, Copy)]
enum Seed {
    B(bool),
    N(f64),
    S(&'static str),
}

impl From<Seed> for RcValue {
    fn from(value: Seed) -> Self {
        match value {
            Seed::B(b) => RcValue::Bool(b),
            Seed::N(n) => RcValue::Number(n),
            Seed::S(s) => RcValue::Text(s.to_string()),
        }
    }
}

use Seed::{B, N, S};

const NATIVE: &[(&str, Seed, Validator)] = &[
    ("font.size", N(9.0), Validator::NonNegative),
    ("font.family", S("sans-serif"), Validator::Text),
    ("figure.dpi", N(100.0), Validator::NonNegative),
    ("figure.facecolor", S("#f4f4f4"), Validator::Color),
    ("axes.facecolor", S("white"), Validator::Color),
    ("axes.edgecolor", S("black"), Validator::Color),
    ("axes.linewidth", N(0.6), Validator::NonNegative),
    ("axes.labelsize", S("medium"), Validator::FontSize),
    ("axes.labelcolor", S("black"), Validator::Color),
    ("axes.labelweight", S("normal"), Validator::FontWeight),
    ("axes.titlesize", S("med-large"), Validator::FontSize),
    ("axes.grid", B(true), Validator::Bool),
    ("axes.grid.which", S("major"), Validator::Choice(GRID_WHICH)),
    ("grid.color", S("black"), Validator::Color),
    ("grid.alpha", N(0.1), Validator::Fraction),
    ("grid.linewidth", N(0.6), Validator::NonNegative),
    ("grid.linestyle", S("-"), Validator::Text),
    ("xtick.major.size", N(4.0), Validator::NonNegative),
    ("ytick.major.size", N(4.0), Validator::NonNegative),
    ("xtick.minor.size", N(2.0), Validator::NonNegative),
    ("ytick.minor.size", N(2.0), Validator::NonNegative),
    ("xtick.major.width", N(0.6), Validator::NonNegative),
    ("ytick.major.width", N(0.6), Validator::NonNegative),
    ("xtick.minor.width", N(0.48), Validator::NonNegative),
    ("ytick.minor.width", N(0.48), Validator::NonNegative),
    ("xtick.direction", S("out"), Validator::Choice(TICK_DIRECTIONS)),
    ("ytick.direction", S("out"), Validator::Choice(TICK_DIRECTIONS)),
    ("xtick.color", S("black"), Validator::Color),
    ("ytick.color", S("black"), Validator::Color),
    ("xtick.labelsize", S("medium"), Validator::FontSize),
    ("ytick.labelsize", S("medium"), Validator::FontSize),
    ("xtick.labelcolor", S("black"), Validator::Color),
    ("ytick.labelcolor", S("black"), Validator::Color),
    ("xtick.minor.visible", B(true), Validator::Bool),
    ("ytick.minor.visible", B(true), Validator::Bool),
    ("legend.loc", S("best"), Validator::Choice(INSET_LOCATIONS)),
    ("legend.frameon", B(true), Validator::Bool),
    ("legend.fontsize", S("medium"), Validator::FontSize),
    ("legend.framealpha", N(0.8), Validator::Fraction),
    ("legend.facecolor", S("white"), Validator::Color),
    ("legend.edgecolor", S("0.5"), Validator::Color),
    ("formatter.use_locale", B(false), Validator::Bool),
];

const EXTENSION: &[(&str, Seed, Validator)] = &[
    ("abc", B(false), Validator::Abc),
    ("fontsize", N(9.0), Validator::NonNegative),
    ("coastcolor", S("gray"), Validator::Color),
    ("coastlinewidth", N(0.6), Validator::NonNegative),
    ("grid", B(true), Validator::Bool),
    ("gridminor", B(false), Validator::Bool),
    ("tick.len", N(4.0), Validator::Units),
    ("tick.lenratio", N(0.5), Validator::NonNegative),
    ("tick.width", N(0.6), Validator::Units),
    ("tick.widthratio", N(0.8), Validator::NonNegative),
    ("tick.dir", S("out"), Validator::Choice(TICK_DIRECTIONS)),
    ("tick.color", S("black"), Validator::Color),
    ("tick.labelsize", S("medium"), Validator::FontSize),
    ("tick.labelcolor", S("black"), Validator::Color),
    ("tick.labelweight", S("normal"), Validator::FontWeight),
    ("tick.minor", B(true), Validator::Bool),
    ("label.size", S("medium"), Validator::FontSize),
    ("label.color", S("black"), Validator::Color),
    ("label.weight", S("normal"), Validator::FontWeight),
    ("meta.color", S("black"), Validator::Color),
    ("meta.width", N(0.6), Validator::Units),
    ("formatter.zerotrim", B(true), Validator::Bool),
    ("colorbar.loc", S("right"), Validator::Choice(COLORBAR_LOCATIONS)),
    ("colorbar.length", N(1.0), Validator::NonNegative),
    ("colorbar.insetlength", S("8em"), Validator::Units),
    ("colorbar.width", S("0.2in"), Validator::Units),
    ("colorbar.insetwidth", S("1.2em"), Validator::Units),
    ("colorbar.extend", S("1.3em"), Validator::Units),
    ("colorbar.insetextend", S("0.9em"), Validator::Units),
    ("colorbar.grid", B(false), Validator::Bool),
    ("colorbar.rasterized", B(false), Validator::Bool),
    ("colorbar.frameon", B(true), Validator::Bool),
    ("colorbar.framealpha", N(0.8), Validator::Fraction),
];

/// Rows of the built-in table, native keys first
pub fn builtin_entries() -> Vec<RcEntry> {
    let native = NATIVE
        .iter()
        .map(|(key, default, validator)| RcEntry::new(*key, Namespace::Native, *default, *validator));
    let extension = EXTENSION.iter().map(|(key, default, validator)| {
        RcEntry::new(*key, Namespace::Extension, *default, *validator)
    });
    native.chain(extension).collect()
}

fn both_axes(suffix: &str, value: RcValue) -> Vec<(String, RcValue)> {
    vec![
        (format!("xtick.{}", suffix), value.clone()),
        (format!("ytick.{}", suffix), value),
    ]
}

fn points(value: &RcValue, params: &RcParams) -> Result<f64> {
    units::units(value, Unit::Point, Unit::Point, &params.unit_context())
}

fn grid_changes(major: bool, minor: bool, params: &RcParams) -> Result<Vec<(String, RcValue)>> {
    let which = match (major, minor) {
        (true, true) => RcValue::from("both"),
        (true, false) => RcValue::from("major"),
        (false, true) => RcValue::from("minor"),
        (false, false) => params.get("axes.grid.which")?.clone(),
    };
    Ok(vec![
        ("axes.grid".to_string(), RcValue::Bool(major || minor)),
        ("axes.grid.which".to_string(), which),
    ])
}

/// Native (and extension) keys that follow an extension key assignment.
pub fn linked_changes(
    key: &str,
    value: &RcValue,
    params: &RcParams,
) -> Result<Vec<(String, RcValue)>> {
    let flag = || value.as_bool().unwrap_or(false);
    let changes = match key {
        "fontsize" => vec![("font.size".to_string(), value.clone())],
        "grid" => grid_changes(flag(), params.get_bool("gridminor")?, params)?,
        "gridminor" => grid_changes(params.get_bool("grid")?, flag(), params)?,
        "tick.len" => {
            let len = points(value, params)?;
            let ratio = params.get_f64("tick.lenratio")?;
            let mut changes = both_axes("major.size", RcValue::from(len));
            changes.extend(both_axes("minor.size", RcValue::from(len * ratio)));
            changes
        }
        "tick.lenratio" => {
            let len = points(params.get("tick.len")?, params)?;
            let ratio = value.as_f64().unwrap_or(0.0);
            both_axes("minor.size", RcValue::from(len * ratio))
        }
        "tick.width" => {
            let width = points(value, params)?;
            let ratio = params.get_f64("tick.widthratio")?;
            let mut changes = both_axes("major.width", RcValue::from(width));
            changes.extend(both_axes("minor.width", RcValue::from(width * ratio)));
            changes
        }
        "tick.widthratio" => {
            let width = points(params.get("tick.width")?, params)?;
            let ratio = value.as_f64().unwrap_or(0.0);
            both_axes("minor.width", RcValue::from(width * ratio))
        }
        "tick.dir" => both_axes("direction", value.clone()),
        "tick.color" => both_axes("color", value.clone()),
        "tick.labelsize" => both_axes("labelsize", value.clone()),
        "tick.labelcolor" => both_axes("labelcolor", value.clone()),
        "tick.minor" => both_axes("minor.visible", value.clone()),
        "label.size" => vec![("axes.labelsize".to_string(), value.clone())],
        "label.color" => vec![("axes.labelcolor".to_string(), value.clone())],
        "label.weight" => vec![("axes.labelweight".to_string(), value.clone())],
        "meta.color" => {
            let mut changes = vec![
                ("axes.edgecolor".to_string(), value.clone()),
                ("axes.labelcolor".to_string(), value.clone()),
                ("tick.color".to_string(), value.clone()),
                ("label.color".to_string(), value.clone()),
            ];
            changes.extend(both_axes("color", value.clone()));
            changes
        }
        "meta.width" => {
            let width = points(value, params)?;
            let ratio = params.get_f64("tick.widthratio")?;
            let mut changes = vec![
                ("axes.linewidth".to_string(), RcValue::from(width)),
                ("tick.width".to_string(), RcValue::from(width)),
            ];
            changes.extend(both_axes("major.width", RcValue::from(width)));
            changes.extend(both_axes("minor.width", RcValue::from(width * ratio)));
            changes
        }
        _ => Vec::new(),
    };
    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rc::RcTable;

    #[test]
    fn test_namespaces_are_disjoint() {
        for (key, _, _) in NATIVE {
            assert!(
                !EXTENSION.iter().any(|(other, _, _)| other == key),
                "{} is in both namespaces",
                key
            );
        }
    }

    #[test]
    fn test_tick_len_links() {
        let params = RcParams::new(RcTable::builtin());
        let changes = linked_changes("tick.len", &RcValue::from("1em"), &params).unwrap();
        let get = |key: &str| {
            changes
                .iter()
                .find(|(k, _)| k == key)
                .and_then(|(_, v)| v.as_f64())
                .unwrap()
        };
        assert_eq!(get("xtick.major.size"), 9.0);
        assert_eq!(get("ytick.minor.size"), 4.5);
    }

    #[test]
    fn test_grid_which() {
        let params = RcParams::new(RcTable::builtin());
        let changes = linked_changes("gridminor", &RcValue::Bool(true), &params).unwrap();
        assert!(changes.contains(&("axes.grid.which".to_string(), RcValue::from("both"))));
        let changes = linked_changes("grid", &RcValue::Bool(false), &params).unwrap();
        assert!(changes.contains(&("axes.grid".to_string(), RcValue::Bool(false))));
    }
}
