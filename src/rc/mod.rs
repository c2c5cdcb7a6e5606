//! The rc configuration system.
//!
//! [`RcTable`] describes every known key, [`RcParams`] is one validated set
//! of values, and [`Configurator`] combines the process defaults with
//! per-thread views and scoped overrides.

pub mod configurator;
pub mod defaults;
pub mod params;
pub mod table;
pub mod validate;
pub mod value;

pub use configurator::{rc, Configurator, LocalRc, RcContext};
pub use params::{apply_order, RcParams, RcSnapshot};
pub use table::{LinkFn, Namespace, RcEntry, RcTable};
pub use validate::Validator;
pub use value::RcValue;
