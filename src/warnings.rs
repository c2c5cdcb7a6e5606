//! Soft failures.
//!
//! Ambiguous or degenerate inputs do not abort an operation; they pick a
//! documented fallback and report a [`PlotWarning`] through [`warn_plot`].
//! Warnings are logged on the [`WARNING_TARGET`] tracing target, so they can
//! be silenced with a filter such as `RUST_LOG=plotrc::warnings=off`, or
//! collected with [`catch_warnings`].

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

/// Tracing target every warning is logged on
pub const WARNING_TARGET: &str = "plotrc::warnings";

/// What kind of input triggered a warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// Two mutually exclusive settings were both supplied
    AmbiguousInput,
    /// A derived value could not be computed from the target geometry
    DegenerateGeometry,
    /// A deprecated keyword was translated to its replacement
    Deprecated,
    /// A supplied setting was overridden by the data
    IgnoredInput,
}

impl WarningKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningKind::AmbiguousInput => "ambiguous_input",
            WarningKind::DegenerateGeometry => "degenerate_geometry",
            WarningKind::Deprecated => "deprecated",
            WarningKind::IgnoredInput => "ignored_input",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One emitted warning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotWarning {
    pub kind: WarningKind,
    pub message: String,
}

thread_local! {
    static CAPTURED: RefCell<Vec<Vec<PlotWarning>>> = RefCell::new(Vec::new());
}

/// Keys of once-only warnings already logged by this process
static LOGGED_ONCE: Lazy<Mutex<HashSet<String>>> = Lazy::new(|| Mutex::new(HashSet::new()));

/// Emit a warning.
///
/// Inside [`catch_warnings`] on the same thread the warning is recorded
/// instead of logged.
pub fn warn_plot(kind: WarningKind, message: impl Into<String>) {
    if let Some(warning) = capture(kind, message.into()) {
        log_warning(&warning);
    }
}

/// Emit a warning that is logged at most once per process for `key`.
///
/// Capture scopes still record every occurrence.
pub fn warn_once(kind: WarningKind, key: &str, message: impl Into<String>) {
    let Some(warning) = capture(kind, message.into()) else {
        return;
    };
    if LOGGED_ONCE.lock().insert(key.to_string()) {
        log_warning(&warning);
    }
}

/// Record into the innermost capture scope, or hand the warning back
fn capture(kind: WarningKind, message: String) -> Option<PlotWarning> {
    let warning = PlotWarning { kind, message };
    CAPTURED.with(|stack| match stack.borrow_mut().last_mut() {
        Some(scope) => {
            scope.push(warning);
            None
        }
        None => Some(warning),
    })
}

fn log_warning(warning: &PlotWarning) {
    warn!(target: WARNING_TARGET, kind = %warning.kind, "{}", warning.message);
}

struct CaptureScope {
    open: bool,
}

impl CaptureScope {
    fn open() -> Self {
        CAPTURED.with(|stack| stack.borrow_mut().push(Vec::new()));
        Self { open: true }
    }

    fn close(mut self) -> Vec<PlotWarning> {
        self.open = false;
        CAPTURED.with(|stack| stack.borrow_mut().pop().unwrap_or_default())
    }
}

impl Drop for CaptureScope {
    fn drop(&mut self) {
        if self.open {
            CAPTURED.with(|stack| {
                stack.borrow_mut().pop();
            });
        }
    }
}

/// Run `f`, returning every warning it emitted on this thread.
///
/// Scopes nest; a warning goes to the innermost one only.
pub fn catch_warnings<R>(f: impl FnOnce() -> R) -> (R, Vec<PlotWarning>) {
    let scope = CaptureScope::open();
    let result = f();
    (result, scope.close())
}
