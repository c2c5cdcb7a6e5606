//! # plotrc
//!
//! Thread-safe rc configuration and keyword resolution for plot guides.
//!
//! ## Key Features
//!
//! - **Validated rc settings**: a table of named settings with validators and
//!   linked keys, where one change can fan out to several settings
//! - **Thread-local views**: each thread reads and writes its own copy of the
//!   settings, seeded from process-wide defaults
//! - **Scoped overrides**: contexts that restore every touched key on exit,
//!   including early returns and panics
//! - **Guide settings**: colorbar and legend keywords resolved through alias
//!   tables with rc-driven defaults
//!
//! ## Architecture
//!
//! - **rc**: default table, validators, per-thread parameter views
//! - **context**: the generic scoped override guard
//! - **guide**: keyword resolution and the two-phase colorbar record
//! - **units**: physical length conversion

pub mod config;
pub mod context;
pub mod error;
pub mod guide;
pub mod logging;
pub mod rc;
pub mod units;
pub mod warnings;

pub use config::Config;
pub use context::{ContextTarget, StateContext};
pub use error::{PlotError, Result};
pub use guide::{ColorbarSettings, Geometry, Kwargs, LegendSettings, NormInfo, StyleSink};
pub use logging::{
    init_tracing, log_error, log_rc_overrides, log_resolve_end, log_resolve_start,
    log_timed_operation,
};
pub use rc::{rc, Configurator, RcContext, RcValue};
pub use warnings::{catch_warnings, warn_once, warn_plot, PlotWarning, WarningKind};
