//! The validated key/value store behind every rc view.

use indexmap::IndexMap;
use std::sync::Arc;

use crate::error::{PlotError, Result};
use crate::rc::table::{Namespace, RcTable};
use crate::rc::RcValue;
use crate::units::UnitContext;

/// A full set of rc values, split into native and extension keys.
///
/// Every key always has a value; assignments are validated and an
/// assignment that fails validation leaves the store untouched.
#[derive(Debug, Clone)]
pub struct RcParams {
    table: Arc<RcTable>,
    native: IndexMap<String, RcValue>,
    extension: IndexMap<String, RcValue>,
}

/// Saved copy of every value in a store
#[derive(Debug, Clone, PartialEq)]
pub struct RcSnapshot {
    native: IndexMap<String, RcValue>,
    extension: IndexMap<String, RcValue>,
}

impl RcParams {
    /// Create a store holding the table's defaults
    pub fn new(table: Arc<RcTable>) -> Self {
        let mut native = IndexMap::new();
        let mut extension = IndexMap::new();
        for entry in table.entries() {
            let slot = match entry.namespace {
                Namespace::Native => &mut native,
                Namespace::Extension => &mut extension,
            };
            slot.insert(entry.key.clone(), entry.default.clone());
        }
        Self {
            table,
            native,
            extension,
        }
    }

    pub fn table(&self) -> &Arc<RcTable> {
        &self.table
    }

    /// Get a value, failing for unknown keys
    pub fn get(&self, key: &str) -> Result<&RcValue> {
        self.native
            .get(key)
            .or_else(|| self.extension.get(key))
            .ok_or_else(|| PlotError::KeyNotFound {
                key: key.to_string(),
            })
    }

    pub fn get_f64(&self, key: &str) -> Result<f64> {
        let value = self.get(key)?;
        value.as_f64().ok_or_else(|| PlotError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            expected: "a number".to_string(),
        })
    }

    pub fn get_bool(&self, key: &str) -> Result<bool> {
        let value = self.get(key)?;
        value.as_bool().ok_or_else(|| PlotError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            expected: "a boolean".to_string(),
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.table.contains(key)
    }

    /// Every known key, native keys first. Call again to restart.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.native
            .keys()
            .chain(self.extension.keys())
            .map(String::as_str)
    }

    /// Every key/value pair, native keys first
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RcValue)> + '_ {
        self.native
            .iter()
            .chain(self.extension.iter())
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Assign a value, following extension links.
    ///
    /// Returns every key that changed, starting with `key` itself. All values
    /// are validated before the first one is written.
    pub fn set(&mut self, key: &str, value: impl Into<RcValue>) -> Result<Vec<String>> {
        let entry = self.table.get_checked(key)?;
        let value = entry.validator.validate(key, value.into())?;
        let mut changes = Vec::new();
        if entry.namespace == Namespace::Extension {
            if let Some(link) = self.table.linker() {
                for (linked, linked_value) in link(key, &value, self)? {
                    let linked_entry = self.table.get_checked(&linked)?;
                    let linked_value = linked_entry.validator.validate(&linked, linked_value)?;
                    changes.push((linked, linked_value));
                }
            }
        }
        changes.insert(0, (key.to_string(), value));

        let mut touched = Vec::with_capacity(changes.len());
        for (changed, value) in changes {
            self.write(&changed, value);
            if !touched.contains(&changed) {
                touched.push(changed);
            }
        }
        Ok(touched)
    }

    /// Assign one key without following links
    pub fn assign(&mut self, key: &str, value: impl Into<RcValue>) -> Result<()> {
        let entry = self.table.get_checked(key)?;
        let value = entry.validator.validate(key, value.into())?;
        self.write(key, value);
        Ok(())
    }

    /// Put back a value previously read from this store
    pub(crate) fn restore_value(&mut self, key: &str, value: RcValue) {
        if self.table.contains(key) {
            self.write(key, value);
        }
    }

    /// Return every key to its default
    pub fn reset(&mut self) {
        *self = RcParams::new(Arc::clone(&self.table));
    }

    pub fn snapshot(&self) -> RcSnapshot {
        RcSnapshot {
            native: self.native.clone(),
            extension: self.extension.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: RcSnapshot) {
        self.native = snapshot.native;
        self.extension = snapshot.extension;
    }

    /// Work out the concrete key changes a batch of overrides would make.
    ///
    /// The batch runs against a scratch copy, in [`apply_order`] order, so
    /// nothing is written here; the first invalid override fails the whole plan.
    pub fn plan<I, K, V>(&self, overrides: I) -> Result<Vec<(String, RcValue)>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RcValue>,
    {
        let mut scratch = self.clone();
        let mut touched: Vec<String> = Vec::new();
        for (key, value) in apply_order(overrides) {
            for changed in scratch.set(&key, value)? {
                if !touched.contains(&changed) {
                    touched.push(changed);
                }
            }
        }
        touched
            .into_iter()
            .map(|key| {
                let value = scratch.get(&key)?.clone();
                Ok((key, value))
            })
            .collect()
    }

    /// Font and display context for unit conversion
    pub fn unit_context(&self) -> UnitContext {
        let fallback = UnitContext::default();
        UnitContext {
            fontsize: self
                .get("font.size")
                .ok()
                .and_then(RcValue::as_f64)
                .unwrap_or(fallback.fontsize),
            dpi: self
                .get("figure.dpi")
                .ok()
                .and_then(RcValue::as_f64)
                .unwrap_or(fallback.dpi),
        }
    }

    fn write(&mut self, key: &str, value: RcValue) {
        let slot = match self.table.get(key).map(|e| e.namespace) {
            Some(Namespace::Extension) => &mut self.extension,
            _ => &mut self.native,
        };
        slot.insert(key.to_string(), value);
    }
}

impl PartialEq for RcParams {
    fn eq(&self, other: &Self) -> bool {
        self.native == other.native && self.extension == other.extension
    }
}

/// Order a batch so that minor-tick and minor-grid keys are applied before
/// their major counterparts; otherwise the caller's order is kept.
pub fn apply_order<I, K, V>(overrides: I) -> Vec<(String, RcValue)>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<RcValue>,
{
    let mut ordered: Vec<(String, RcValue)> = overrides
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();
    ordered.sort_by_key(|(key, _)| !key.contains("minor"));
    ordered
}
