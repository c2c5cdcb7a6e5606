//! The rc key table: defaults, validators and namespaces.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{PlotError, Result};
use crate::rc::params::RcParams;
use crate::rc::validate::Validator;
use crate::rc::{defaults, RcValue};

/// Which key space a setting belongs to.
///
/// Native keys mirror the rendering engine's own settings; extension keys
/// are owned by this crate and may fan out into native keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Native,
    Extension,
}

/// One row of the table
#[derive(Debug, Clone)]
pub struct RcEntry {
    pub key: String,
    pub namespace: Namespace,
    pub default: RcValue,
    pub validator: Validator,
}

impl RcEntry {
    pub fn new(
        key: impl Into<String>,
        namespace: Namespace,
        default: impl Into<RcValue>,
        validator: Validator,
    ) -> Self {
        Self {
            key: key.into(),
            namespace,
            default: default.into(),
            validator,
        }
    }
}

/// Computes the other keys that change when an extension key is assigned.
///
/// Receives the key, its already validated value and the store as it is
/// before the assignment.
pub type LinkFn = fn(&str, &RcValue, &RcParams) -> Result<Vec<(String, RcValue)>>;

/// Immutable table of every known key
pub struct RcTable {
    entries: IndexMap<String, RcEntry>,
    linker: Option<LinkFn>,
}

impl fmt::Debug for RcTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RcTable")
            .field("entries", &self.entries.len())
            .field("linked", &self.linker.is_some())
            .finish()
    }
}

static BUILTIN: Lazy<Arc<RcTable>> = Lazy::new(|| {
    let table = RcTable::new(defaults::builtin_entries())
        .and_then(|table| table.with_linker(defaults::linked_changes))
        .unwrap_or_else(|e| panic!("built-in rc table is inconsistent: {}", e));
    Arc::new(table)
});

impl RcTable {
    /// Build a table, checking every default against its own validator.
    pub fn new(entries: impl IntoIterator<Item = RcEntry>) -> Result<Self> {
        let mut table = IndexMap::new();
        for mut entry in entries {
            if table.contains_key(&entry.key) {
                return Err(PlotError::DefaultTable {
                    key: entry.key,
                    message: "duplicate key".to_string(),
                });
            }
            entry.default = entry
                .validator
                .validate(&entry.key, entry.default)
                .map_err(|e| PlotError::DefaultTable {
                    key: entry.key.clone(),
                    message: e.to_string(),
                })?;
            table.insert(entry.key.clone(), entry);
        }
        Ok(Self {
            entries: table,
            linker: None,
        })
    }

    /// Build a single-namespace table from a default mapping and a validator mapping.
    ///
    /// Every default needs a registered validator.
    pub fn from_parts(
        namespace: Namespace,
        defaults: IndexMap<String, RcValue>,
        validators: &HashMap<String, Validator>,
    ) -> Result<Self> {
        let mut entries = Vec::with_capacity(defaults.len());
        for (key, default) in defaults {
            let validator = *validators
                .get(&key)
                .ok_or_else(|| PlotError::KeyNotFound { key: key.clone() })?;
            entries.push(RcEntry {
                key,
                namespace,
                default,
                validator,
            });
        }
        Self::new(entries)
    }

    /// Attach a link function; every key it can produce must be in the table.
    pub fn with_linker(mut self, linker: LinkFn) -> Result<Self> {
        // Dry run against the defaults so a link to a missing key fails here
        // rather than on the first user assignment.
        let params = RcParams::new(Arc::new(Self {
            entries: self.entries.clone(),
            linker: None,
        }));
        for entry in self.entries.values() {
            if entry.namespace != Namespace::Extension {
                continue;
            }
            for (key, value) in linker(&entry.key, &entry.default, &params)? {
                let target = self.entries.get(&key).ok_or_else(|| PlotError::DefaultTable {
                    key: entry.key.clone(),
                    message: format!("links to unknown key {:?}", key),
                })?;
                target
                    .validator
                    .validate(&key, value)
                    .map_err(|e| PlotError::DefaultTable {
                        key: entry.key.clone(),
                        message: e.to_string(),
                    })?;
            }
        }
        self.linker = Some(linker);
        Ok(self)
    }

    /// The shared built-in table
    pub fn builtin() -> Arc<Self> {
        Arc::clone(&BUILTIN)
    }

    pub fn get(&self, key: &str) -> Option<&RcEntry> {
        self.entries.get(key)
    }

    pub fn get_checked(&self, key: &str) -> Result<&RcEntry> {
        self.entries.get(key).ok_or_else(|| PlotError::KeyNotFound {
            key: key.to_string(),
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = &RcEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn linker(&self) -> Option<LinkFn> {
        self.linker
    }
}
