//! Colorbar settings.
//!
//! [`ColorbarSettings::resolve`] collapses the many colorbar keyword
//! spellings into one record, with defaults taken from the rc settings.
//! Once the caller has built the colorbar axes, [`ColorbarSettings::finalize`]
//! computes what depends on their size and on the data normalization, and
//! [`ColorbarSettings::apply`] pushes the result into the renderer.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::error::{PlotError, Result};
use crate::guide::derive::{extend_fraction, Derived};
use crate::guide::kwargs::Kwargs;
use crate::guide::resolver::{
    resolve, DefaultSource, DeprecatedAlias, FieldKind, FieldSpec, Provenance, ResolvedFields,
};
use crate::guide::target::{
    Element, Geometry, Orientation, Side, StyleAttr, StyleSink, TextStyle, Which,
};
use crate::guide::ticker::{label_text, Extend, NormInfo, TickPlan, TickRequest};
use crate::rc::defaults::{COLORBAR_LOCATIONS, OUTER_LOCATIONS, TICK_DIRECTIONS};
use crate::rc::{Configurator, RcValue};
use crate::units::{self, Unit, UnitContext};
use crate::warnings::{warn_plot, WarningKind};

const LABEL_LOCATIONS: &[&str] = &["left", "right", "top", "bottom"];
const ORIENTATIONS: &[&str] = &["vertical", "horizontal"];

const POINTS: FieldKind = FieldKind::Length {
    numeric: Unit::Point,
    dest: Unit::Point,
};

const fn outer_or_inset(outer: &'static str, inset: &'static str) -> DefaultSource {
    DefaultSource::Switch {
        field: "loc",
        when: OUTER_LOCATIONS,
        then: outer,
        otherwise: inset,
    }
}

/// Every colorbar field, its keyword spellings and its default.
///
/// Order matters: `extendsize`, `length` and `width` depend on `loc`, and
/// `tickwidth` follows an explicit `linewidth`.
pub const COLORBAR_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "loc",
        &["loc", "location"],
        DefaultSource::Rc("colorbar.loc"),
        FieldKind::Choice(COLORBAR_LOCATIONS),
    ),
    FieldSpec::new("orientation", &[], DefaultSource::None, FieldKind::Choice(ORIENTATIONS)),
    FieldSpec::new(
        "length",
        &["length", "shrink"],
        outer_or_inset("colorbar.length", "colorbar.insetlength"),
        FieldKind::Any,
    ),
    FieldSpec::new(
        "width",
        &[],
        outer_or_inset("colorbar.width", "colorbar.insetwidth"),
        FieldKind::Length {
            numeric: Unit::Inch,
            dest: Unit::Inch,
        },
    ),
    FieldSpec::new("label", &["title", "label"], DefaultSource::None, FieldKind::Any),
    FieldSpec::new(
        "labelloc",
        &["labelloc", "labellocation"],
        DefaultSource::None,
        FieldKind::Choice(LABEL_LOCATIONS),
    ),
    FieldSpec::new("locator", &["ticks", "locator"], DefaultSource::None, FieldKind::Ticker),
    FieldSpec::new("locator_kw", &[], DefaultSource::None, FieldKind::Map),
    FieldSpec::new(
        "formatter",
        &["ticklabels", "formatter", "format"],
        DefaultSource::None,
        FieldKind::Ticker,
    ),
    FieldSpec::new("formatter_kw", &[], DefaultSource::None, FieldKind::Map),
    FieldSpec::new(
        "minorlocator",
        &["minorticks", "minorlocator"],
        DefaultSource::None,
        FieldKind::Ticker,
    ),
    FieldSpec::new("minorlocator_kw", &[], DefaultSource::None, FieldKind::Map),
    FieldSpec::new("tickminor", &[], DefaultSource::None, FieldKind::Bool),
    FieldSpec::new(
        "color",
        &["c", "color"],
        DefaultSource::Rc("axes.edgecolor"),
        FieldKind::Color,
    ),
    FieldSpec::new(
        "linewidth",
        &["lw", "linewidth"],
        DefaultSource::Rc("axes.linewidth"),
        POINTS,
    ),
    FieldSpec::new("ticklen", &[], DefaultSource::Rc("tick.len"), POINTS),
    FieldSpec::new(
        "ticklenratio",
        &[],
        DefaultSource::Rc("tick.lenratio"),
        FieldKind::Number,
    ),
    FieldSpec::new(
        "tickwidth",
        &[],
        DefaultSource::Inherit {
            field: "linewidth",
            otherwise: "tick.width",
        },
        POINTS,
    ),
    FieldSpec::new(
        "tickwidthratio",
        &[],
        DefaultSource::Rc("tick.widthratio"),
        FieldKind::Number,
    ),
    FieldSpec::new(
        "tickdir",
        &["tickdir", "tickdirection"],
        DefaultSource::Rc("tick.dir"),
        FieldKind::Choice(TICK_DIRECTIONS),
    ),
    FieldSpec::new("labelsize", &[], DefaultSource::None, FieldKind::Any),
    FieldSpec::new("labelweight", &[], DefaultSource::None, FieldKind::Any),
    FieldSpec::new("labelcolor", &[], DefaultSource::None, FieldKind::Color),
    FieldSpec::new("ticklabelsize", &[], DefaultSource::None, FieldKind::Any),
    FieldSpec::new("ticklabelweight", &[], DefaultSource::None, FieldKind::Any),
    FieldSpec::new("ticklabelcolor", &[], DefaultSource::None, FieldKind::Color),
    FieldSpec::new("rotation", &[], DefaultSource::None, FieldKind::Number),
    FieldSpec::new(
        "grid",
        &["grid", "edges", "drawedges"],
        DefaultSource::Rc("colorbar.grid"),
        FieldKind::Bool,
    ),
    FieldSpec::new(
        "rasterized",
        &[],
        DefaultSource::Rc("colorbar.rasterized"),
        FieldKind::Bool,
    ),
    FieldSpec::new("reverse", &[], DefaultSource::Bool(false), FieldKind::Bool),
    FieldSpec::new("extend", &[], DefaultSource::None, FieldKind::Choice(Extend::NAMES)),
    FieldSpec::new(
        "extendsize",
        &[],
        outer_or_inset("colorbar.extend", "colorbar.insetextend"),
        FieldKind::Length {
            numeric: Unit::Em,
            dest: Unit::Inch,
        },
    ),
    FieldSpec::new("extendfrac", &[], DefaultSource::None, FieldKind::Number),
];

/// Retired colorbar keywords
pub const COLORBAR_DEPRECATED: &[DeprecatedAlias] = &[
    DeprecatedAlias {
        keyword: "maxn",
        field: "locator_kw",
        entry: "nbins",
    },
    DeprecatedAlias {
        keyword: "maxn_minor",
        field: "minorlocator_kw",
        entry: "nbins",
    },
];

/// Fully resolved colorbar settings
#[derive(Debug, Clone, Serialize)]
pub struct ColorbarSettings {
    pub loc: String,
    pub orientation: Orientation,
    /// Relative length for outer colorbars, a length for inset ones
    pub length: RcValue,
    /// Width in inches
    pub width: Option<f64>,
    pub label: Option<String>,
    pub labelloc: Option<Side>,
    pub locator: RcValue,
    pub locator_kw: IndexMap<String, RcValue>,
    pub formatter: RcValue,
    pub formatter_kw: IndexMap<String, RcValue>,
    pub minorlocator: RcValue,
    pub minorlocator_kw: IndexMap<String, RcValue>,
    pub tickminor: Option<bool>,
    pub color: RcValue,
    /// Outline width in points
    pub linewidth: f64,
    /// Major tick length in points
    pub ticklen: f64,
    pub ticklenratio: f64,
    /// Major tick width in points
    pub tickwidth: f64,
    pub tickwidthratio: f64,
    pub tickdir: String,
    pub label_style: TextStyle,
    pub ticklabel_style: TextStyle,
    pub grid: bool,
    pub rasterized: bool,
    pub reverse: bool,
    /// Extend requested by the caller
    pub extend: Option<Extend>,
    /// Extension length in inches
    pub extendsize: f64,
    /// Relative extension length requested by the caller
    pub requested_extendfrac: Option<f64>,
    /// Keywords for the rendering engine
    pub extra: Kwargs,

    pub extendfrac: Derived<f64>,
    pub extend_mode: Derived<Extend>,
    pub ticks: Derived<TickPlan>,

    #[serde(skip)]
    fields: ResolvedFields,
    #[serde(skip)]
    units: UnitContext,
    #[serde(skip)]
    minor_default: bool,
}

impl ColorbarSettings {
    /// Resolve colorbar keywords against the calling thread's rc view.
    ///
    /// Consumed keywords are removed from `kwargs`.
    pub fn resolve(kwargs: &mut Kwargs, rc: &Configurator) -> Result<Self> {
        let fields = resolve(kwargs, COLORBAR_FIELDS, COLORBAR_DEPRECATED, rc)?;

        let loc = fields
            .text("loc")
            .ok_or_else(|| PlotError::invalid_settings("loc", "a location is required"))?
            .to_string();
        let orientation = match fields.text("orientation") {
            Some(orientation) => orientation.parse()?,
            None => default_orientation(&loc),
        };
        let requested_extendfrac = fields.number("extendfrac");
        if let Some(fraction) = requested_extendfrac {
            if !fraction.is_finite() || fraction < 0.0 {
                return Err(PlotError::invalid_settings(
                    "extendfrac",
                    format!("expected a non-negative fraction, got {}", fraction),
                ));
            }
        }
        let minor_key = match orientation {
            Orientation::Vertical => "ytick.minor.visible",
            Orientation::Horizontal => "xtick.minor.visible",
        };

        let settings = Self {
            orientation,
            length: fields.value("length").clone(),
            width: fields.number("width"),
            label: non_null(fields.value("label")).map(label_text),
            labelloc: fields.text("labelloc").map(str::parse::<Side>).transpose()?,
            locator: fields.value("locator").clone(),
            locator_kw: fields.map("locator_kw"),
            formatter: fields.value("formatter").clone(),
            formatter_kw: fields.map("formatter_kw"),
            minorlocator: fields.value("minorlocator").clone(),
            minorlocator_kw: fields.map("minorlocator_kw"),
            tickminor: fields.flag("tickminor"),
            color: fields.value("color").clone(),
            linewidth: fields.require_number("linewidth")?,
            ticklen: fields.require_number("ticklen")?,
            ticklenratio: fields.require_number("ticklenratio")?,
            tickwidth: fields.require_number("tickwidth")?,
            tickwidthratio: fields.require_number("tickwidthratio")?,
            tickdir: fields.text("tickdir").unwrap_or("out").to_string(),
            label_style: text_style(
                &fields,
                &[("size", "labelsize"), ("weight", "labelweight"), ("color", "labelcolor")],
            ),
            ticklabel_style: text_style(
                &fields,
                &[
                    ("size", "ticklabelsize"),
                    ("weight", "ticklabelweight"),
                    ("color", "ticklabelcolor"),
                    ("rotation", "rotation"),
                ],
            ),
            grid: fields.require_flag("grid")?,
            rasterized: fields.require_flag("rasterized")?,
            reverse: fields.require_flag("reverse")?,
            extend: fields.text("extend").map(str::parse::<Extend>).transpose()?,
            extendsize: fields.require_number("extendsize")?,
            requested_extendfrac,
            extra: fields.extra.clone(),
            extendfrac: Derived::pending("extendfrac"),
            extend_mode: Derived::pending("extend"),
            ticks: Derived::pending("ticks"),
            units: rc.unit_context(),
            minor_default: rc.get_bool(minor_key)?,
            loc,
            fields,
        };

        debug!(
            loc = %settings.loc,
            orientation = ?settings.orientation,
            passthrough = settings.extra.len(),
            "Resolved colorbar settings"
        );
        Ok(settings)
    }

    /// Where a field's value came from
    pub fn provenance(&self, field: &str) -> Option<&Provenance> {
        self.fields.provenance(field)
    }

    pub fn fields(&self) -> &ResolvedFields {
        &self.fields
    }

    /// Side of the parent axes for outer colorbars
    pub fn side(&self) -> Option<Side> {
        self.loc.parse().ok()
    }

    /// Compute the fields that need the colorbar axes and the norm.
    ///
    /// May run once per record.
    pub fn finalize(&mut self, target: &dyn Geometry, norm: &NormInfo) -> Result<()> {
        self.extendfrac.ensure_pending()?;

        let ticks = TickRequest {
            locator: &self.locator,
            locator_kw: &self.locator_kw,
            minorlocator: &self.minorlocator,
            minorlocator_kw: &self.minorlocator_kw,
            formatter: &self.formatter,
            formatter_kw: &self.formatter_kw,
            tickminor: self.tickminor,
            minor_default: self.minor_default,
            reverse: self.reverse,
        }
        .plan(norm)?;

        let extendfrac = match self.requested_extendfrac {
            Some(fraction) => {
                if self.fields.explicit("extendsize") {
                    warn_plot(
                        WarningKind::AmbiguousInput,
                        format!(
                            "You cannot specify both an absolute extendsize and a relative \
                             extendfrac={}. Ignoring 'extendsize'.",
                            fraction
                        ),
                    );
                }
                fraction
            }
            None => {
                let (width, height) = target.size_inches();
                let extent = match self.orientation {
                    Orientation::Vertical => height,
                    Orientation::Horizontal => width,
                };
                let em = units::convert(1.0, Unit::Em, Unit::Inch, &self.units);
                extend_fraction(self.extendsize, extent, em)
            }
        };

        let extend_mode = match (norm.extend, self.extend) {
            (Some(fixed), Some(requested)) if fixed != requested => {
                warn_plot(
                    WarningKind::IgnoredInput,
                    format!(
                        "Ignoring extend={:?}. The data fixes extend={:?}.",
                        requested.as_str(),
                        fixed.as_str()
                    ),
                );
                fixed
            }
            (Some(fixed), _) => fixed,
            (None, requested) => requested.unwrap_or(Extend::Neither),
        };

        debug!(
            extendfrac = extendfrac,
            extend = %extend_mode,
            minor_ticks = ticks.minor_ticks,
            "Finalized colorbar settings"
        );
        self.extendfrac.set(extendfrac)?;
        self.extend_mode.set(extend_mode)?;
        self.ticks.set(ticks)?;
        Ok(())
    }

    /// Axis that carries the label, given `labelloc`
    fn label_axis(&self) -> Result<Element> {
        let Some(labelloc) = self.labelloc else {
            return Ok(Element::LongAxis);
        };
        let long_is_vertical = self.orientation == Orientation::Vertical;
        if labelloc.is_vertical_edge() == long_is_vertical {
            return Ok(Element::LongAxis);
        }
        match self.side() {
            Some(_) => Ok(Element::ShortAxis),
            None => Err(PlotError::invalid_settings(
                "labelloc",
                format!(
                    "cannot place the label at the {} of a {:?} colorbar at {:?}",
                    labelloc, self.orientation, self.loc
                ),
            )),
        }
    }

    /// Push the resolved appearance into the renderer.
    ///
    /// Requires [`finalize`](Self::finalize); nothing is pushed when the
    /// settings are inconsistent.
    pub fn apply(&self, sink: &mut dyn StyleSink) -> Result<()> {
        let ticks = self.ticks.get()?;
        let label_axis = self.label_axis()?;
        let long = Element::LongAxis;

        sink.apply_style(
            long,
            StyleAttr::TickParams {
                which: Which::Both,
                color: Some(self.color.clone()),
                direction: Some(self.tickdir.clone()),
                length: None,
                width: None,
            },
        );
        sink.apply_style(
            long,
            StyleAttr::TickParams {
                which: Which::Major,
                color: None,
                direction: None,
                length: Some(self.ticklen),
                width: Some(self.tickwidth),
            },
        );
        sink.apply_style(
            long,
            StyleAttr::TickParams {
                which: Which::Minor,
                color: None,
                direction: None,
                length: Some(self.ticklen * self.ticklenratio),
                width: Some(self.tickwidth * self.tickwidthratio),
            },
        );

        if let Some(locator) = &ticks.locator {
            sink.apply_style(long, StyleAttr::Locator(locator.clone()));
        }
        sink.apply_style(long, StyleAttr::Formatter(ticks.formatter.clone()));
        if let Some(minor) = &ticks.minor_locator {
            sink.apply_style(long, StyleAttr::MinorLocator(minor.clone()));
        }
        sink.apply_style(long, StyleAttr::MinorTicks(ticks.minor_ticks));
        if ticks.inverted {
            sink.apply_style(long, StyleAttr::Inverted(true));
        }

        if let Some(label) = &self.label {
            sink.apply_style(label_axis, StyleAttr::LabelText(label.clone()));
        }
        if let Some(labelloc) = self.labelloc {
            sink.apply_style(label_axis, StyleAttr::LabelPosition(labelloc));
        }
        if !self.label_style.is_empty() {
            sink.apply_style(label_axis, StyleAttr::LabelStyle(self.label_style.clone()));
        }
        if !self.ticklabel_style.is_empty() {
            sink.apply_style(long, StyleAttr::TickLabelStyle(self.ticklabel_style.clone()));
        }

        let edge = StyleAttr::Edge {
            color: self.color.clone(),
            width: self.linewidth,
        };
        if self.grid {
            sink.apply_style(Element::Dividers, edge.clone());
        }
        sink.apply_style(Element::Outline, edge);
        sink.apply_style(Element::Solids, StyleAttr::Rasterized(self.rasterized));
        Ok(())
    }

    /// Change the label text and/or style after the colorbar was drawn
    pub fn update_label(
        &mut self,
        label: Option<&str>,
        style: TextStyle,
        sink: &mut dyn StyleSink,
    ) -> Result<()> {
        let axis = self.label_axis()?;
        if let Some(label) = label {
            self.label = Some(label.to_string());
            sink.apply_style(axis, StyleAttr::LabelText(label.to_string()));
        }
        if !style.is_empty() {
            self.label_style
                .extend(style.iter().map(|(k, v)| (k.clone(), v.clone())));
            sink.apply_style(axis, StyleAttr::LabelStyle(style));
        }
        Ok(())
    }
}

fn default_orientation(loc: &str) -> Orientation {
    match loc {
        "fill" | "left" | "right" => Orientation::Vertical,
        // Top, bottom and inset colorbars
        _ => Orientation::Horizontal,
    }
}

fn non_null(value: &RcValue) -> Option<&RcValue> {
    (!value.is_null()).then_some(value)
}

fn text_style(fields: &ResolvedFields, keys: &[(&str, &str)]) -> TextStyle {
    keys.iter()
        .filter_map(|(property, field)| {
            non_null(fields.value(field)).map(|value| (property.to_string(), value.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guide::ticker::LocatorSpec;
    use crate::warnings::catch_warnings;
    use pretty_assertions::assert_eq;

    fn settings(kwargs: Kwargs) -> ColorbarSettings {
        let rc = Configurator::new();
        let mut kwargs = kwargs;
        ColorbarSettings::resolve(&mut kwargs, &rc).unwrap()
    }

    #[test]
    fn test_defaults_from_rc() {
        let cb = settings(Kwargs::new());
        assert_eq!(cb.loc, "right");
        assert_eq!(cb.orientation, Orientation::Vertical);
        assert_eq!(cb.length, RcValue::from(1.0));
        assert_eq!(cb.width, Some(0.2));
        assert_eq!(cb.color, RcValue::from("black"));
        assert_eq!(cb.linewidth, 0.6);
        assert_eq!(cb.ticklen, 4.0);
        assert_eq!(cb.ticklenratio, 0.5);
        assert_eq!(cb.tickwidth, 0.6);
        assert_eq!(cb.tickdir, "out");
        assert!(!cb.grid);
        assert!(!cb.reverse);
        assert_eq!(cb.label, None);
        assert!(cb.label_style.is_empty());
        assert_eq!(cb.provenance("loc"), Some(&Provenance::Default));
    }

    #[test]
    fn test_inset_defaults() {
        let cb = settings(Kwargs::new().with("loc", "lower right"));
        assert_eq!(cb.orientation, Orientation::Horizontal);
        assert_eq!(cb.length, RcValue::from("8em"));
        assert!((cb.width.unwrap() - 1.2 * 9.0 / 72.0).abs() < 1e-12);
        assert!((cb.extendsize - 0.9 * 9.0 / 72.0).abs() < 1e-12);
    }

    #[test]
    fn test_ticks_beat_locator() {
        let cb = settings(
            Kwargs::new()
                .with("ticks", vec![1.0, 2.0, 3.0])
                .with("locator", vec![4.0, 5.0, 6.0]),
        );
        assert_eq!(cb.locator, RcValue::from(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_title_beats_label() {
        let cb = settings(Kwargs::new().with("label", "label").with("title", "title"));
        assert_eq!(cb.label.as_deref(), Some("title"));
    }

    #[test]
    fn test_maxn_is_deprecated() {
        let rc = Configurator::new();
        let mut kwargs = Kwargs::new().with("maxn", 4.0).with("maxn_minor", 10.0);
        let (cb, warnings) = catch_warnings(|| ColorbarSettings::resolve(&mut kwargs, &rc));
        let cb = cb.unwrap();
        assert_eq!(cb.locator_kw.get("nbins"), Some(&RcValue::from(4.0)));
        assert_eq!(cb.minorlocator_kw.get("nbins"), Some(&RcValue::from(10.0)));
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| w.kind == WarningKind::Deprecated));
    }

    #[test]
    fn test_extendfrac_from_geometry() {
        let rc = Configurator::new();
        rc.set("colorbar.extend", "0.1in").unwrap();
        let mut cb = ColorbarSettings::resolve(&mut Kwargs::new(), &rc).unwrap();
        assert!(matches!(cb.extendfrac.get(), Err(PlotError::NotFinalized { .. })));

        let (result, warnings) =
            catch_warnings(|| cb.finalize(&(0.2, 1.0), &NormInfo::continuous(0.0, 1.0)));
        result.unwrap();
        assert!((cb.extendfrac.get().unwrap() - 0.125).abs() < 1e-12);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_explicit_extendfrac_wins() {
        let mut cb = settings(Kwargs::new().with("extendfrac", 0.05).with("extendsize", "2em"));
        let (result, warnings) =
            catch_warnings(|| cb.finalize(&(0.2, 1.0), &NormInfo::continuous(0.0, 1.0)));
        result.unwrap();
        assert_eq!(*cb.extendfrac.get().unwrap(), 0.05);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::AmbiguousInput);

        // A default extend size is not ambiguous
        let mut cb = settings(Kwargs::new().with("extendfrac", 0.05));
        let (result, warnings) =
            catch_warnings(|| cb.finalize(&(0.2, 1.0), &NormInfo::continuous(0.0, 1.0)));
        result.unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_degenerate_target() {
        let mut cb = settings(Kwargs::new());
        let (result, warnings) =
            catch_warnings(|| cb.finalize(&(0.2, 0.0), &NormInfo::continuous(0.0, 1.0)));
        result.unwrap();
        assert_eq!(*cb.extendfrac.get().unwrap(), 0.0);
        assert_eq!(warnings[0].kind, WarningKind::DegenerateGeometry);
    }

    #[test]
    fn test_finalize_twice_fails() {
        let mut cb = settings(Kwargs::new());
        let norm = NormInfo::continuous(0.0, 1.0);
        cb.finalize(&(0.2, 3.0), &norm).unwrap();
        let first = *cb.extendfrac.get().unwrap();
        assert!(matches!(
            cb.finalize(&(0.2, 6.0), &norm),
            Err(PlotError::AlreadyFinalized { .. })
        ));
        assert_eq!(*cb.extendfrac.get().unwrap(), first);
    }

    #[test]
    fn test_fixed_extend_ignores_request() {
        let mut cb = settings(Kwargs::new().with("extend", "both"));
        let norm = NormInfo::discrete(vec![0.0, 1.0, 2.0]).with_extend(Extend::Max);
        let (result, warnings) = catch_warnings(|| cb.finalize(&(0.2, 3.0), &norm));
        result.unwrap();
        assert_eq!(*cb.extend_mode.get().unwrap(), Extend::Max);
        assert_eq!(warnings[0].kind, WarningKind::IgnoredInput);
    }

    #[test]
    fn test_minor_ticks_follow_axis_rc() {
        let rc = Configurator::new();
        rc.set("ytick.minor.visible", false).unwrap();
        let norm = NormInfo::continuous(0.0, 1.0);

        let mut vertical = ColorbarSettings::resolve(&mut Kwargs::new(), &rc).unwrap();
        vertical.finalize(&(0.2, 3.0), &norm).unwrap();
        assert!(!vertical.ticks.get().unwrap().minor_ticks);

        let mut kwargs = Kwargs::new().with("loc", "bottom");
        let mut horizontal = ColorbarSettings::resolve(&mut kwargs, &rc).unwrap();
        horizontal.finalize(&(3.0, 0.2), &norm).unwrap();
        assert!(horizontal.ticks.get().unwrap().minor_ticks);
    }

    #[test]
    fn test_apply_requires_finalize() {
        let cb = settings(Kwargs::new());
        let mut sink: Vec<(Element, StyleAttr)> = Vec::new();
        assert!(matches!(cb.apply(&mut sink), Err(PlotError::NotFinalized { .. })));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_apply_pushes_ticks_and_outline() {
        let mut cb = settings(
            Kwargs::new()
                .with("ticks", vec![0.0, 0.5, 1.0])
                .with("lw", 1.0)
                .with("label", "Temperature")
                .with("labelcolor", "red"),
        );
        cb.finalize(&(0.2, 3.0), &NormInfo::continuous(0.0, 1.0)).unwrap();
        let mut sink: Vec<(Element, StyleAttr)> = Vec::new();
        cb.apply(&mut sink).unwrap();

        assert!(sink.contains(&(
            Element::LongAxis,
            StyleAttr::TickParams {
                which: Which::Minor,
                color: None,
                direction: None,
                length: Some(2.0),
                width: Some(0.8),
            }
        )));
        assert!(sink.contains(&(
            Element::LongAxis,
            StyleAttr::Locator(LocatorSpec::Fixed(vec![0.0, 0.5, 1.0]))
        )));
        assert!(sink.contains(&(
            Element::LongAxis,
            StyleAttr::LabelText("Temperature".to_string())
        )));
        assert!(sink.contains(&(
            Element::Outline,
            StyleAttr::Edge {
                color: RcValue::from("black"),
                width: 1.0
            }
        )));
        assert_eq!(
            sink.last(),
            Some(&(Element::Solids, StyleAttr::Rasterized(false)))
        );
    }

    #[test]
    fn test_label_on_short_axis() {
        let mut cb = settings(Kwargs::new().with("loc", "bottom").with("labelloc", "left").with("label", "x"));
        cb.finalize(&(3.0, 0.2), &NormInfo::continuous(0.0, 1.0)).unwrap();
        let mut sink: Vec<(Element, StyleAttr)> = Vec::new();
        cb.apply(&mut sink).unwrap();
        assert!(sink.contains(&(Element::ShortAxis, StyleAttr::LabelPosition(Side::Left))));
    }

    #[test]
    fn test_incompatible_labelloc() {
        let mut cb = settings(Kwargs::new().with("loc", "fill").with("labelloc", "top"));
        cb.finalize(&(0.2, 3.0), &NormInfo::continuous(0.0, 1.0)).unwrap();
        let mut sink: Vec<(Element, StyleAttr)> = Vec::new();
        let err = cb.apply(&mut sink).unwrap_err();
        assert!(matches!(err, PlotError::InvalidSettings { ref field, .. } if field == "labelloc"));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_update_label() {
        let mut cb = settings(Kwargs::new());
        let mut sink: Vec<(Element, StyleAttr)> = Vec::new();
        let mut style = TextStyle::new();
        style.insert("weight".to_string(), RcValue::from("bold"));
        cb.update_label(Some("Depth"), style, &mut sink).unwrap();
        assert_eq!(cb.label.as_deref(), Some("Depth"));
        assert_eq!(cb.label_style.get("weight"), Some(&RcValue::from("bold")));
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_negative_extendfrac_rejected() {
        let rc = Configurator::new();
        let mut kwargs = Kwargs::new().with("extendfrac", -0.5);
        let err = ColorbarSettings::resolve(&mut kwargs, &rc).unwrap_err();
        assert!(matches!(err, PlotError::InvalidSettings { ref field, .. } if field == "extendfrac"));

        let cb = settings(Kwargs::new().with("extendfrac", 0.0));
        assert_eq!(cb.requested_extendfrac, Some(0.0));
    }

    #[test]
    fn test_invalid_color() {
        let rc = Configurator::new();
        let mut kwargs = Kwargs::new().with("color", "#12");
        let err = ColorbarSettings::resolve(&mut kwargs, &rc).unwrap_err();
        assert!(matches!(err, PlotError::InvalidSettings { ref field, .. } if field == "color"));
    }

    #[test]
    fn test_passthrough_keywords() {
        let cb = settings(Kwargs::new().with("pad", 0.1).with("align", "center"));
        assert_eq!(cb.extra.keys().collect::<Vec<_>>(), vec!["pad", "align"]);
    }
}
