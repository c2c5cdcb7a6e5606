//! The two contracts a rendering engine has to offer.
//!
//! Settings resolution never draws anything itself. It asks a [`Geometry`]
//! how large the constructed guide axes ended up, and pushes resolved style
//! attributes into a [`StyleSink`].

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{PlotError, Result};
use crate::guide::ticker::{FormatterSpec, LocatorSpec};
use crate::rc::RcValue;

/// Physical size of a constructed render target
pub trait Geometry {
    /// Width and height in inches
    fn size_inches(&self) -> (f64, f64);
}

impl Geometry for (f64, f64) {
    fn size_inches(&self) -> (f64, f64) {
        *self
    }
}

/// Receives resolved style attributes for drawable elements
pub trait StyleSink {
    fn apply_style(&mut self, element: Element, attr: StyleAttr);
}

/// Collects every style call, in order
impl StyleSink for Vec<(Element, StyleAttr)> {
    fn apply_style(&mut self, element: Element, attr: StyleAttr) {
        self.push((element, attr));
    }
}

/// Drawable parts of a guide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    /// The axis running along the colorbar
    LongAxis,
    /// The axis across the colorbar
    ShortAxis,
    Outline,
    Dividers,
    Solids,
    /// Legend frame patch
    Frame,
    /// Legend entry labels
    Entries,
}

/// Which ticks a tick attribute applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Which {
    Major,
    Minor,
    Both,
}

/// Text properties such as size, weight, color and rotation
pub type TextStyle = IndexMap<String, RcValue>;

/// One resolved style attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleAttr {
    TickParams {
        which: Which,
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<RcValue>,
        #[serde(skip_serializing_if = "Option::is_none")]
        direction: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        length: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        width: Option<f64>,
    },
    Locator(LocatorSpec),
    MinorLocator(LocatorSpec),
    Formatter(FormatterSpec),
    MinorTicks(bool),
    Inverted(bool),
    LabelText(String),
    LabelPosition(Side),
    LabelStyle(TextStyle),
    TickLabelStyle(TextStyle),
    Edge { color: RcValue, width: f64 },
    Face { color: RcValue, alpha: f64 },
    Visible(bool),
    Rasterized(bool),
}

/// Side of an axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    pub fn is_vertical_edge(&self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
            Side::Top => "top",
            Side::Bottom => "bottom",
        }
    }
}

impl FromStr for Side {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            "top" => Ok(Side::Top),
            "bottom" => Ok(Side::Bottom),
            _ => Err(PlotError::InvalidParameter {
                param: "side".to_string(),
                message: format!("Unknown side {:?}. Must be one of: left, right, top, bottom", s),
            }),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a colorbar's long axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

impl FromStr for Orientation {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "vertical" => Ok(Orientation::Vertical),
            "horizontal" => Ok(Orientation::Horizontal),
            _ => Err(PlotError::InvalidParameter {
                param: "orientation".to_string(),
                message: format!("Unknown orientation {:?}", s),
            }),
        }
    }
}
