//! Legend settings, resolved with the same field tables as colorbars.

use serde::Serialize;
use tracing::debug;

use crate::error::{PlotError, Result};
use crate::guide::kwargs::Kwargs;
use crate::guide::resolver::{resolve, DefaultSource, FieldKind, FieldSpec, ResolvedFields};
use crate::guide::target::{Element, StyleAttr, StyleSink, TextStyle};
use crate::guide::ticker::label_text;
use crate::rc::defaults::{INSET_LOCATIONS, OUTER_LOCATIONS};
use crate::rc::{Configurator, RcValue};

const ORDERS: &[&str] = &["C", "F"];

pub const LEGEND_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "loc",
        &["loc", "location"],
        DefaultSource::Rc("legend.loc"),
        FieldKind::Text,
    ),
    FieldSpec::new("ncols", &["ncols", "ncol"], DefaultSource::Number(1.0), FieldKind::Number),
    FieldSpec::new("title", &["title", "label"], DefaultSource::None, FieldKind::Any),
    FieldSpec::new(
        "frameon",
        &["frame", "frameon"],
        DefaultSource::Rc("legend.frameon"),
        FieldKind::Bool,
    ),
    FieldSpec::new(
        "fontsize",
        &["fontsize", "fs"],
        DefaultSource::Rc("legend.fontsize"),
        FieldKind::Any,
    ),
    FieldSpec::new(
        "facecolor",
        &["fc", "facecolor", "framecolor"],
        DefaultSource::Rc("legend.facecolor"),
        FieldKind::Color,
    ),
    FieldSpec::new(
        "edgecolor",
        &["ec", "edgecolor"],
        DefaultSource::Rc("legend.edgecolor"),
        FieldKind::Color,
    ),
    FieldSpec::new(
        "alpha",
        &["a", "alpha", "framealpha"],
        DefaultSource::Rc("legend.framealpha"),
        FieldKind::Number,
    ),
    FieldSpec::new("order", &[], DefaultSource::Text("C"), FieldKind::Choice(ORDERS)),
];

/// How legend entries fill the grid of columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryOrder {
    /// Fill rows first ("C")
    RowMajor,
    /// Fill columns first ("F")
    ColumnMajor,
}

#[derive(Debug, Clone, Serialize)]
pub struct LegendSettings {
    pub loc: String,
    pub ncols: usize,
    pub title: Option<String>,
    pub frameon: bool,
    pub fontsize: RcValue,
    pub facecolor: RcValue,
    pub edgecolor: RcValue,
    pub alpha: f64,
    pub order: EntryOrder,
    /// Frame edge width in points
    pub linewidth: f64,
    pub extra: Kwargs,
    #[serde(skip)]
    fields: ResolvedFields,
}

impl LegendSettings {
    pub fn resolve(kwargs: &mut Kwargs, rc: &Configurator) -> Result<Self> {
        let fields = resolve(kwargs, LEGEND_FIELDS, &[], rc)?;

        let loc = fields.text("loc").unwrap_or("best").to_string();
        if !INSET_LOCATIONS.contains(&loc.as_str()) && !OUTER_LOCATIONS.contains(&loc.as_str()) {
            return Err(PlotError::invalid_settings(
                "loc",
                format!("unknown legend location {:?}", loc),
            ));
        }

        let ncols = fields.require_number("ncols")?;
        if ncols < 1.0 || ncols.fract() != 0.0 {
            return Err(PlotError::invalid_settings(
                "ncols",
                format!("expected a positive integer, got {}", ncols),
            ));
        }

        let alpha = fields.require_number("alpha")?;
        if !(0.0..=1.0).contains(&alpha) {
            return Err(PlotError::invalid_settings(
                "alpha",
                format!("expected a value between 0 and 1, got {}", alpha),
            ));
        }

        let order = match fields.text("order") {
            Some("F") => EntryOrder::ColumnMajor,
            _ => EntryOrder::RowMajor,
        };
        let title = fields.value("title");

        let settings = Self {
            loc,
            ncols: ncols as usize,
            title: (!title.is_null()).then(|| label_text(title)),
            frameon: fields.require_flag("frameon")?,
            fontsize: fields.value("fontsize").clone(),
            facecolor: fields.value("facecolor").clone(),
            edgecolor: fields.value("edgecolor").clone(),
            alpha,
            order,
            linewidth: rc.get_f64("axes.linewidth")?,
            extra: fields.extra.clone(),
            fields,
        };
        debug!(loc = %settings.loc, ncols = settings.ncols, "Resolved legend settings");
        Ok(settings)
    }

    pub fn fields(&self) -> &ResolvedFields {
        &self.fields
    }

    pub fn apply(&self, sink: &mut dyn StyleSink) {
        sink.apply_style(Element::Frame, StyleAttr::Visible(self.frameon));
        if self.frameon {
            sink.apply_style(
                Element::Frame,
                StyleAttr::Face {
                    color: self.facecolor.clone(),
                    alpha: self.alpha,
                },
            );
            sink.apply_style(
                Element::Frame,
                StyleAttr::Edge {
                    color: self.edgecolor.clone(),
                    width: self.linewidth,
                },
            );
        }
        if let Some(title) = &self.title {
            sink.apply_style(Element::Frame, StyleAttr::LabelText(title.clone()));
        }
        let mut style = TextStyle::new();
        style.insert("size".to_string(), self.fontsize.clone());
        sink.apply_style(Element::Entries, StyleAttr::LabelStyle(style));
    }
}
