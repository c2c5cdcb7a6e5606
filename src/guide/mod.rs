//! Guide settings: keyword resolution for colorbars and legends.

pub mod colorbar;
pub mod derive;
pub mod kwargs;
pub mod legend;
pub mod resolver;
pub mod target;
pub mod ticker;

pub use colorbar::{ColorbarSettings, COLORBAR_DEPRECATED, COLORBAR_FIELDS};
pub use derive::{extend_fraction, Derived};
pub use kwargs::Kwargs;
pub use legend::{EntryOrder, LegendSettings, LEGEND_FIELDS};
pub use resolver::{
    resolve, DefaultSource, DeprecatedAlias, FieldKind, FieldSpec, Provenance, Resolved,
    ResolvedFields,
};
pub use target::{Element, Geometry, Orientation, Side, StyleAttr, StyleSink, TextStyle, Which};
pub use ticker::{Extend, FormatterSpec, LocatorSpec, NormInfo, TickPlan, TickRequest};
