//! Locator and formatter specifications and tick planning.
//!
//! Tick objects belong to the rendering engine, so this module only builds
//! opaque specs describing which locator or formatter to construct.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{PlotError, Result};
use crate::rc::RcValue;

/// Which tick locator to construct
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorSpec {
    /// No ticks at all
    Null,
    /// Ticks at exactly these positions
    Fixed(Vec<f64>),
    /// Ticks drawn from the levels of a discrete norm
    Discrete { ticks: Vec<f64>, minor: bool },
    /// Any other locator, by name
    Named {
        name: String,
        options: IndexMap<String, RcValue>,
    },
}

impl LocatorSpec {
    /// Build a spec from a keyword value plus its option dictionary.
    ///
    /// Accepts a locator name, a tick step, a list of positions, a
    /// dictionary with a `name` entry, or `false` for no ticks.
    pub fn from_value(field: &str, value: &RcValue, options: &IndexMap<String, RcValue>) -> Result<Self> {
        match value {
            RcValue::Bool(false) => Ok(LocatorSpec::Null),
            RcValue::Text(name) if matches!(name.as_str(), "null" | "none") => Ok(LocatorSpec::Null),
            RcValue::Text(name) => Ok(LocatorSpec::Named {
                name: name.clone(),
                options: options.clone(),
            }),
            RcValue::Number(step) => {
                let mut options = options.clone();
                options.insert("base".to_string(), RcValue::Number(*step));
                Ok(LocatorSpec::Named {
                    name: "multiple".to_string(),
                    options,
                })
            }
            RcValue::List(_) => value.as_f64_list().map(LocatorSpec::Fixed).ok_or_else(|| {
                PlotError::invalid_settings(field, "tick positions must all be numbers")
            }),
            RcValue::Map(map) => named_from_map(field, map, options)
                .map(|(name, options)| LocatorSpec::Named { name, options }),
            other => Err(PlotError::invalid_settings(
                field,
                format!("cannot build a locator from {}", other),
            )),
        }
    }

    /// Whether the locator produces no ticks
    pub fn is_empty(&self) -> bool {
        match self {
            LocatorSpec::Null => true,
            LocatorSpec::Fixed(ticks) | LocatorSpec::Discrete { ticks, .. } => ticks.is_empty(),
            LocatorSpec::Named { .. } => false,
        }
    }
}

/// Which tick label formatter to construct
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatterSpec {
    /// Fixed labels, one per tick
    Fixed(Vec<String>),
    Named {
        name: String,
        options: IndexMap<String, RcValue>,
    },
}

impl FormatterSpec {
    pub fn auto(options: IndexMap<String, RcValue>) -> Self {
        FormatterSpec::Named {
            name: "auto".to_string(),
            options,
        }
    }

    /// Build a spec from a keyword value plus its option dictionary.
    ///
    /// A list is taken as fixed tick labels.
    pub fn from_value(field: &str, value: &RcValue, options: &IndexMap<String, RcValue>) -> Result<Self> {
        match value {
            RcValue::Text(name) => Ok(FormatterSpec::Named {
                name: name.clone(),
                options: options.clone(),
            }),
            RcValue::List(items) => Ok(FormatterSpec::Fixed(
                items.iter().map(label_text).collect(),
            )),
            RcValue::Map(map) => named_from_map(field, map, options)
                .map(|(name, options)| FormatterSpec::Named { name, options }),
            other => Err(PlotError::invalid_settings(
                field,
                format!("cannot build a formatter from {}", other),
            )),
        }
    }

    /// Fixed labels mark a categorical colorbar
    pub fn is_categorical(&self) -> bool {
        matches!(self, FormatterSpec::Fixed(_))
    }

    fn set_default_option(&mut self, key: &str, value: RcValue) {
        if let FormatterSpec::Named { options, .. } = self {
            options.entry(key.to_string()).or_insert(value);
        }
    }
}

/// Display text of a label value
pub fn label_text(value: &RcValue) -> String {
    match value {
        RcValue::Text(s) => s.clone(),
        other => other.to_string(),
    }
}

fn named_from_map(
    field: &str,
    map: &IndexMap<String, RcValue>,
    extra: &IndexMap<String, RcValue>,
) -> Result<(String, IndexMap<String, RcValue>)> {
    let name = map
        .get("name")
        .and_then(RcValue::as_str)
        .ok_or_else(|| PlotError::invalid_settings(field, "a dict spec needs a \"name\" entry"))?;
    let mut options: IndexMap<String, RcValue> = map
        .iter()
        .filter(|(key, _)| key.as_str() != "name")
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    options.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    Ok((name.to_string(), options))
}

/// How a colorbar handles out-of-range values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Extend {
    Neither,
    Min,
    Max,
    Both,
}

impl Extend {
    pub const NAMES: &'static [&'static str] = &["neither", "min", "max", "both"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Extend::Neither => "neither",
            Extend::Min => "min",
            Extend::Max => "max",
            Extend::Both => "both",
        }
    }
}

impl FromStr for Extend {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "neither" => Ok(Extend::Neither),
            "min" => Ok(Extend::Min),
            "max" => Ok(Extend::Max),
            "both" => Ok(Extend::Both),
            _ => Err(PlotError::InvalidParameter {
                param: "extend".to_string(),
                message: format!("Unknown extend {:?}. Must be one of: neither, min, max, both", s),
            }),
        }
    }
}

impl fmt::Display for Extend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the colorbar needs to know about the data normalization
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormInfo {
    pub vmin: f64,
    pub vmax: f64,
    /// Level boundaries of a discrete norm
    pub boundaries: Option<Vec<f64>>,
    /// Preferred tick positions of a discrete norm, defaulting to the boundaries
    pub ticks: Option<Vec<f64>>,
    /// Category labels attached to the norm
    pub labels: Option<Vec<String>>,
    /// Discrete norm wrapping a segmented (non-linear) norm
    pub segmented: bool,
    /// Values decrease along the colorbar
    pub descending: bool,
    /// Extend fixed by the data, as for filled contours
    pub extend: Option<Extend>,
}

impl NormInfo {
    pub fn continuous(vmin: f64, vmax: f64) -> Self {
        Self {
            vmin,
            vmax,
            ..Default::default()
        }
    }

    pub fn discrete(boundaries: Vec<f64>) -> Self {
        let vmin = boundaries.iter().copied().fold(f64::INFINITY, f64::min);
        let vmax = boundaries.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let descending = boundaries.first() > boundaries.last();
        Self {
            vmin,
            vmax,
            boundaries: Some(boundaries),
            descending,
            ..Default::default()
        }
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn with_extend(mut self, extend: Extend) -> Self {
        self.extend = Some(extend);
        self
    }

    pub fn is_discrete(&self) -> bool {
        self.boundaries.is_some()
    }
}

/// Final tick configuration of a colorbar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickPlan {
    pub locator: Option<LocatorSpec>,
    pub minor_locator: Option<LocatorSpec>,
    pub formatter: FormatterSpec,
    pub minor_ticks: bool,
    pub inverted: bool,
}

/// The resolved tick keywords a plan is built from
#[derive(Debug, Clone, Copy)]
pub struct TickRequest<'a> {
    pub locator: &'a RcValue,
    pub locator_kw: &'a IndexMap<String, RcValue>,
    pub minorlocator: &'a RcValue,
    pub minorlocator_kw: &'a IndexMap<String, RcValue>,
    pub formatter: &'a RcValue,
    pub formatter_kw: &'a IndexMap<String, RcValue>,
    /// Explicit minor tick switch
    pub tickminor: Option<bool>,
    /// Minor tick visibility from rc for the colorbar's long axis
    pub minor_default: bool,
    pub reverse: bool,
}

impl TickRequest<'_> {
    pub fn plan(&self, norm: &NormInfo) -> Result<TickPlan> {
        let mut formatter = if !self.formatter.is_null() {
            FormatterSpec::from_value("formatter", self.formatter, self.formatter_kw)?
        } else if let Some(labels) = &norm.labels {
            FormatterSpec::Fixed(labels.clone())
        } else {
            FormatterSpec::auto(self.formatter_kw.clone())
        };
        if norm.vmin.is_finite() && norm.vmax.is_finite() {
            formatter.set_default_option(
                "tickrange",
                RcValue::from(vec![norm.vmin, norm.vmax]),
            );
        }
        let categorical = formatter.is_categorical();

        let mut locator = if self.locator.is_null() {
            None
        } else {
            Some(LocatorSpec::from_value("locator", self.locator, self.locator_kw)?)
        };

        // An explicit minor locator overrides the minor tick switch
        let mut minor_locator = if self.minorlocator.is_null() {
            None
        } else {
            Some(LocatorSpec::from_value(
                "minorlocator",
                self.minorlocator,
                self.minorlocator_kw,
            )?)
        };
        let mut minor_ticks = match (&minor_locator, self.tickminor) {
            (Some(_), _) => true,
            (None, Some(explicit)) => explicit,
            (None, None) => !categorical && self.minor_default,
        };

        if let Some(boundaries) = &norm.boundaries {
            let ticks = norm.ticks.clone().unwrap_or_else(|| boundaries.clone());
            if locator.is_none() {
                locator = Some(if categorical || norm.segmented {
                    LocatorSpec::Fixed(ticks.clone())
                } else {
                    LocatorSpec::Discrete {
                        ticks: ticks.clone(),
                        minor: false,
                    }
                });
            }
            if minor_ticks && minor_locator.is_none() {
                minor_locator = Some(LocatorSpec::Discrete { ticks, minor: true });
            }
        }

        if locator.as_ref().is_some_and(LocatorSpec::is_empty) {
            minor_locator = None;
            minor_ticks = false;
        }

        Ok(TickPlan {
            locator,
            minor_locator,
            formatter,
            minor_ticks,
            inverted: norm.descending || self.reverse,
        })
    }
}
