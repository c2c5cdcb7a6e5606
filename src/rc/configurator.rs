//! The user-facing rc object.
//!
//! A [`Configurator`] owns a process-wide default store. Each thread that
//! touches it gets a private working copy, cloned from the defaults on first
//! access, so reads and writes from different threads never interfere.
//! Temporary overrides go through [`Configurator::context`], which restores
//! the thread's view when the returned guard is dropped.
//!
//! Direct assignments with [`Configurator::set`] change only the calling
//! thread's view and are not serialized against contexts running in the
//! same thread's call stack; the last write wins.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::context::{lock_contexts, ContextTarget, StateContext};
use crate::error::{PlotError, Result};
use crate::rc::params::{apply_order, RcParams, RcSnapshot};
use crate::rc::table::RcTable;
use crate::rc::RcValue;
use crate::units::UnitContext;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A context still open on the calling thread
#[derive(Debug)]
struct OpenContext {
    id: u64,
    configurator: u64,
    /// Keys already restored by an older context that exited first
    superseded: HashSet<String>,
}

thread_local! {
    static LOCAL_VIEWS: RefCell<HashMap<u64, RcParams>> = RefCell::new(HashMap::new());
    // Entry order of the open contexts
    static OPEN_CONTEXTS: RefCell<Vec<OpenContext>> = RefCell::new(Vec::new());
}

static RC: Lazy<Configurator> = Lazy::new(Configurator::new);

/// The process-wide configurator
pub fn rc() -> &'static Configurator {
    &RC
}

/// Process defaults plus per-thread working views
#[derive(Debug)]
pub struct Configurator {
    id: u64,
    table: Arc<RcTable>,
    defaults: RwLock<RcParams>,
}

impl Configurator {
    /// Create a configurator over the built-in table
    pub fn new() -> Self {
        Self::with_table(RcTable::builtin())
    }

    /// Create a configurator over a custom table
    pub fn with_table(table: Arc<RcTable>) -> Self {
        let defaults = RcParams::new(Arc::clone(&table));
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            table,
            defaults: RwLock::new(defaults),
        }
    }

    /// Run `f` on the calling thread's view, creating it on first touch.
    ///
    /// `f` must not call back into the configurator.
    fn with_local<R>(&self, f: impl FnOnce(&mut RcParams) -> R) -> R {
        LOCAL_VIEWS.with(|views| {
            let mut views = views.borrow_mut();
            let params = views
                .entry(self.id)
                .or_insert_with(|| self.defaults.read().clone());
            f(params)
        })
    }

    pub fn table(&self) -> &Arc<RcTable> {
        &self.table
    }

    /// Look up a key in the calling thread's view
    pub fn get(&self, key: &str) -> Result<RcValue> {
        self.with_local(|params| params.get(key).cloned())
    }

    pub fn get_f64(&self, key: &str) -> Result<f64> {
        self.with_local(|params| params.get_f64(key))
    }

    pub fn get_bool(&self, key: &str) -> Result<bool> {
        self.with_local(|params| params.get_bool(key))
    }

    pub fn get_str(&self, key: &str) -> Result<String> {
        let value = self.get(key)?;
        match value {
            RcValue::Text(s) => Ok(s),
            other => Err(PlotError::InvalidValue {
                key: key.to_string(),
                value: other.to_string(),
                expected: "a string".to_string(),
            }),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.table.contains(key)
    }

    /// Every known key. Call again to restart.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.table.entries().map(|entry| entry.key.as_str())
    }

    /// Every setting below `prefix`, keyed by the remainder of the name.
    ///
    /// `category("tick")` yields `len`, `lenratio`, `dir`, ...
    pub fn category(&self, prefix: &str) -> IndexMap<String, RcValue> {
        let prefix = format!("{}.", prefix.trim_end_matches('.'));
        self.with_local(|params| {
            params
                .iter()
                .filter_map(|(key, value)| {
                    key.strip_prefix(&prefix)
                        .map(|rest| (rest.to_string(), value.clone()))
                })
                .collect()
        })
    }

    /// Assign a key in the calling thread's view
    pub fn set(&self, key: &str, value: impl Into<RcValue>) -> Result<()> {
        let value = value.into();
        debug!(key = key, value = %value, "Setting rc value");
        self.with_local(|params| params.set(key, value))?;
        Ok(())
    }

    /// Assign several keys, minor-grid and minor-tick keys first.
    ///
    /// Each key is validated on its own; keys applied before a rejected one
    /// stay applied.
    pub fn update<I, K, V>(&self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RcValue>,
    {
        for (key, value) in apply_order(items) {
            self.set(&key, value)?;
        }
        Ok(())
    }

    /// Temporarily override settings for the calling thread.
    ///
    /// The overrides (and every key they link to) are checked before
    /// anything is written; the returned guard restores the previous values
    /// when dropped.
    ///
    /// Guards should be dropped in reverse order of creation. If an outer
    /// guard is dropped first, it restores its keys as if every newer guard
    /// had already exited, and those newer guards leave such keys alone.
    pub fn context<I, K, V>(&self, overrides: I) -> Result<RcContext<'_>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RcValue>,
    {
        let planned = self.with_local(|params| params.plan(overrides))?;
        debug!(keys = planned.len(), "Entering rc context");
        StateContext::enter(LocalRc::open(self), planned)
    }

    /// Return the calling thread's view to the process defaults
    pub fn reset(&self) {
        let defaults = self.defaults.read().clone();
        self.with_local(|params| *params = defaults);
    }

    /// Change a process default.
    ///
    /// Applies to the calling thread's view and to every thread that first
    /// touches this configurator afterwards; other existing views keep
    /// their values.
    pub fn update_global(&self, key: &str, value: impl Into<RcValue>) -> Result<()> {
        let value = value.into();
        let _lock = lock_contexts();
        self.defaults.write().set(key, value.clone())?;
        debug!(key = key, value = %value, "Updated rc default");
        self.set(key, value)
    }

    /// Return the process defaults, and the calling thread's view, to the table defaults
    pub fn reset_global(&self) {
        let _lock = lock_contexts();
        *self.defaults.write() = RcParams::new(Arc::clone(&self.table));
        self.reset();
    }

    /// Copy of the calling thread's view
    pub fn params(&self) -> RcParams {
        self.with_local(|params| params.clone())
    }

    pub fn snapshot(&self) -> RcSnapshot {
        self.with_local(|params| params.snapshot())
    }

    pub fn restore(&self, snapshot: RcSnapshot) {
        self.with_local(|params| params.restore(snapshot));
    }

    /// Font and display context of the calling thread's view
    pub fn unit_context(&self) -> UnitContext {
        self.with_local(|params| params.unit_context())
    }
}

impl Default for Configurator {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Configurator {
    fn drop(&mut self) {
        // Views held by other threads are released when those threads exit.
        let _ = LOCAL_VIEWS.try_with(|views| {
            if let Ok(mut views) = views.try_borrow_mut() {
                views.remove(&self.id);
            }
        });
    }
}

/// The calling thread's view of a configurator, as a context target.
///
/// Each value belongs to one open context.
pub struct LocalRc<'a> {
    rc: &'a Configurator,
    id: u64,
}

impl<'a> LocalRc<'a> {
    fn open(rc: &'a Configurator) -> Self {
        let id = NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed);
        OPEN_CONTEXTS.with(|open| {
            open.borrow_mut().push(OpenContext {
                id,
                configurator: rc.id,
                superseded: HashSet::new(),
            })
        });
        Self { rc, id }
    }

    /// Whether `key` still needs restoring by this context.
    ///
    /// A key restored here is settled for every newer context on the same
    /// view that is still open.
    fn claim_restore(&self, key: &str) -> bool {
        OPEN_CONTEXTS.with(|open| {
            let mut open = open.borrow_mut();
            let Some(position) = open.iter().position(|c| c.id == self.id) else {
                return true;
            };
            if open[position].superseded.contains(key) {
                return false;
            }
            for newer in open[position + 1..]
                .iter_mut()
                .filter(|c| c.configurator == self.rc.id)
            {
                newer.superseded.insert(key.to_string());
            }
            true
        })
    }
}

impl Drop for LocalRc<'_> {
    fn drop(&mut self) {
        let _ = OPEN_CONTEXTS.try_with(|open| {
            let Ok(mut open) = open.try_borrow_mut() else {
                return;
            };
            let Some(position) = open.iter().position(|c| c.id == self.id) else {
                return;
            };
            open.remove(position);
            let newer = open[position..]
                .iter()
                .filter(|c| c.configurator == self.rc.id)
                .count();
            if newer > 0 {
                warn!(
                    newer_contexts = newer,
                    "rc context exited before contexts entered after it"
                );
            }
        });
    }
}

impl ContextTarget for LocalRc<'_> {
    type Value = RcValue;

    fn lookup(&self, key: &str) -> Option<RcValue> {
        self.rc.with_local(|params| params.get(key).ok().cloned())
    }

    fn apply(&mut self, key: &str, value: RcValue) -> Result<()> {
        self.rc.with_local(|params| params.assign(key, value))
    }

    fn restore(&mut self, key: &str, previous: Option<RcValue>) {
        // Every rc key always has a value, so there is nothing to remove.
        let Some(value) = previous else {
            return;
        };
        if self.claim_restore(key) {
            self.rc.with_local(|params| params.restore_value(key, value));
        }
    }
}

/// Guard returned by [`Configurator::context`]
pub type RcContext<'a> = StateContext<LocalRc<'a>>;
