//! Table-driven keyword resolution.
//!
//! A guide declares its fields once as a static [`FieldSpec`] table. For each
//! field, [`resolve`] takes every accepted spelling out of the keyword bag,
//! keeps the first non-null one, falls back to the declared default
//! (usually an rc lookup), checks the value's kind and converts lengths.
//! Fields are resolved in table order, so a default may depend on fields
//! declared earlier.

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{PlotError, Result};
use crate::guide::kwargs::Kwargs;
use crate::rc::{Configurator, RcValue, Validator};
use crate::units::{self, Unit, UnitContext};
use crate::warnings::{warn_once, WarningKind};

/// Where a field's value comes from when no keyword supplies it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultSource {
    /// Leave the field unset
    None,
    Bool(bool),
    Number(f64),
    Text(&'static str),
    /// The current value of an rc key
    Rc(&'static str),
    /// Another field's value, but only if a keyword supplied it; else an rc key
    Inherit {
        field: &'static str,
        otherwise: &'static str,
    },
    /// Pick an rc key by the text value of an earlier field
    Switch {
        field: &'static str,
        when: &'static [&'static str],
        then: &'static str,
        otherwise: &'static str,
    },
}

/// Type and range check applied to a resolved value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Any,
    Bool,
    Number,
    Text,
    Choice(&'static [&'static str]),
    /// A length, converted from `numeric` units (for bare numbers) to `dest`
    Length { numeric: Unit, dest: Unit },
    Color,
    /// Locator or formatter specification
    Ticker,
    /// Nested keyword dictionary
    Map,
}

/// One canonical field and the keywords that may supply it
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Accepted spellings in priority order; empty means the name itself
    pub aliases: &'static [&'static str],
    pub default: DefaultSource,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(
        name: &'static str,
        aliases: &'static [&'static str],
        default: DefaultSource,
        kind: FieldKind,
    ) -> Self {
        Self {
            name,
            aliases,
            default,
            kind,
        }
    }

    fn spellings(&self) -> &[&'static str] {
        if self.aliases.is_empty() {
            std::slice::from_ref(&self.name)
        } else {
            self.aliases
        }
    }
}

/// A retired keyword folded into an entry of a dictionary field
#[derive(Debug, Clone, Copy)]
pub struct DeprecatedAlias {
    pub keyword: &'static str,
    pub field: &'static str,
    pub entry: &'static str,
}

/// Where a resolved value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// Supplied by the caller under this spelling
    Keyword(String),
    Default,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub value: RcValue,
    pub provenance: Provenance,
}

impl Resolved {
    /// Whether the caller supplied the value
    pub fn is_explicit(&self) -> bool {
        matches!(self.provenance, Provenance::Keyword(_))
    }
}

static NULL: RcValue = RcValue::Null;

/// Every field of one resolution, plus the keywords nobody consumed
#[derive(Debug, Clone, Default)]
pub struct ResolvedFields {
    fields: IndexMap<&'static str, Resolved>,
    pub extra: Kwargs,
}

impl ResolvedFields {
    pub fn resolved(&self, name: &str) -> Option<&Resolved> {
        self.fields.get(name)
    }

    /// The field's value, `Null` when unset or undeclared
    pub fn value(&self, name: &str) -> &RcValue {
        self.fields.get(name).map_or(&NULL, |r| &r.value)
    }

    pub fn provenance(&self, name: &str) -> Option<&Provenance> {
        self.fields.get(name).map(|r| &r.provenance)
    }

    pub fn explicit(&self, name: &str) -> bool {
        self.fields.get(name).is_some_and(Resolved::is_explicit)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.value(name).as_f64()
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.value(name).as_bool()
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.value(name).as_str()
    }

    /// A dictionary field; unset means empty
    pub fn map(&self, name: &str) -> IndexMap<String, RcValue> {
        self.value(name).as_map().cloned().unwrap_or_default()
    }

    /// A number that must be present after resolution
    pub fn require_number(&self, name: &str) -> Result<f64> {
        self.number(name)
            .ok_or_else(|| PlotError::invalid_settings(name, "a value is required"))
    }

    pub fn require_flag(&self, name: &str) -> Result<bool> {
        self.flag(name)
            .ok_or_else(|| PlotError::invalid_settings(name, "a value is required"))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Resolve `specs` against a keyword bag.
///
/// Consumed keywords are removed from `kwargs`; the rest stay there and are
/// also copied into [`ResolvedFields::extra`].
pub fn resolve(
    kwargs: &mut Kwargs,
    specs: &[FieldSpec],
    deprecated: &[DeprecatedAlias],
    rc: &Configurator,
) -> Result<ResolvedFields> {
    let ctx = rc.unit_context();
    let mut fields: IndexMap<&'static str, Resolved> = IndexMap::with_capacity(specs.len());

    for spec in specs {
        let (value, provenance) = match kwargs.take_first(spec.spellings()) {
            Some((alias, value)) => (value, Provenance::Keyword(alias)),
            None => (default_value(spec, &fields, rc)?, Provenance::Default),
        };
        let value = check_kind(spec, value, &ctx)?;
        fields.insert(spec.name, Resolved { value, provenance });
    }

    for alias in deprecated {
        let value = match kwargs.pop(alias.keyword) {
            Some(value) if !value.is_null() => value,
            _ => continue,
        };
        warn_once(
            WarningKind::Deprecated,
            &format!("deprecated:{}", alias.keyword),
            format!(
                "The keyword {:?} is deprecated. To achieve the same effect, pass {}={{{:?}: {}}}.",
                alias.keyword, alias.field, alias.entry, value
            ),
        );
        let slot = fields.get_mut(alias.field).ok_or_else(|| {
            PlotError::invalid_settings(alias.field, "deprecated keyword targets an undeclared field")
        })?;
        let mut map = slot.value.as_map().cloned().unwrap_or_default();
        map.insert(alias.entry.to_string(), value);
        slot.value = RcValue::Map(map);
    }

    debug!(
        fields = fields.len(),
        passthrough = kwargs.len(),
        "Resolved keyword arguments"
    );

    Ok(ResolvedFields {
        fields,
        extra: kwargs.clone(),
    })
}

fn default_value(
    spec: &FieldSpec,
    fields: &IndexMap<&'static str, Resolved>,
    rc: &Configurator,
) -> Result<RcValue> {
    let value = match spec.default {
        DefaultSource::None => RcValue::Null,
        DefaultSource::Bool(b) => RcValue::Bool(b),
        DefaultSource::Number(n) => RcValue::Number(n),
        DefaultSource::Text(s) => RcValue::from(s),
        DefaultSource::Rc(key) => rc.get(key)?,
        DefaultSource::Inherit { field, otherwise } => match fields.get(field) {
            Some(resolved) if resolved.is_explicit() && !resolved.value.is_null() => {
                resolved.value.clone()
            }
            _ => rc.get(otherwise)?,
        },
        DefaultSource::Switch {
            field,
            when,
            then,
            otherwise,
        } => {
            let matched = fields
                .get(field)
                .and_then(|resolved| resolved.value.as_str())
                .is_some_and(|s| when.contains(&s));
            rc.get(if matched { then } else { otherwise })?
        }
    };
    Ok(value)
}

fn check_kind(spec: &FieldSpec, value: RcValue, ctx: &UnitContext) -> Result<RcValue> {
    if value.is_null() {
        return Ok(value);
    }
    let invalid = |message: String| PlotError::invalid_settings(spec.name, message);
    let via = |validator: Validator, value: RcValue| {
        validator
            .validate(spec.name, value)
            .map_err(|e| match e {
                PlotError::InvalidValue { value, expected, .. } => {
                    invalid(format!("got {}, expected {}", value, expected))
                }
                other => other,
            })
    };
    match spec.kind {
        FieldKind::Any => Ok(value),
        FieldKind::Bool => via(Validator::Bool, value),
        FieldKind::Number => via(Validator::Float, value),
        FieldKind::Text => via(Validator::Text, value),
        FieldKind::Choice(options) => via(Validator::Choice(options), value),
        FieldKind::Color => via(Validator::Color, value),
        FieldKind::Length { numeric, dest } => units::units(&value, numeric, dest, ctx)
            .map(RcValue::Number)
            .map_err(|e| invalid(e.to_string())),
        FieldKind::Ticker => match value {
            RcValue::Bool(true) => Err(invalid("expected a name, a list of values or a dict".into())),
            _ => Ok(value),
        },
        FieldKind::Map => match value {
            RcValue::Map(_) => Ok(value),
            other => Err(invalid(format!("expected a dict, got {}", other.kind()))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warnings::catch_warnings;
    use pretty_assertions::assert_eq;

    const OUTER: &[&str] = &["left", "right"];

    const SPECS: &[FieldSpec] = &[
        FieldSpec::new("loc", &[], DefaultSource::Rc("colorbar.loc"), FieldKind::Text),
        FieldSpec::new(
            "locator",
            &["ticks", "locator"],
            DefaultSource::None,
            FieldKind::Ticker,
        ),
        FieldSpec::new("locator_kw", &[], DefaultSource::None, FieldKind::Map),
        FieldSpec::new(
            "linewidth",
            &["lw", "linewidth"],
            DefaultSource::Rc("axes.linewidth"),
            FieldKind::Length {
                numeric: Unit::Point,
                dest: Unit::Point,
            },
        ),
        FieldSpec::new(
            "tickwidth",
            &[],
            DefaultSource::Inherit {
                field: "linewidth",
                otherwise: "tick.width",
            },
            FieldKind::Length {
                numeric: Unit::Point,
                dest: Unit::Point,
            },
        ),
        FieldSpec::new(
            "extendsize",
            &[],
            DefaultSource::Switch {
                field: "loc",
                when: OUTER,
                then: "colorbar.extend",
                otherwise: "colorbar.insetextend",
            },
            FieldKind::Length {
                numeric: Unit::Em,
                dest: Unit::Inch,
            },
        ),
        FieldSpec::new("reverse", &[], DefaultSource::Bool(false), FieldKind::Bool),
    ];

    const DEPRECATED: &[DeprecatedAlias] = &[DeprecatedAlias {
        keyword: "maxn",
        field: "locator_kw",
        entry: "nbins",
    }];

    #[test]
    fn test_alias_precedence() {
        let rc = Configurator::new();
        let mut kwargs = Kwargs::from([
            ("ticks", RcValue::from(vec![1.0, 2.0, 3.0])),
            ("locator", RcValue::from(vec![4.0, 5.0, 6.0])),
        ]);
        let fields = resolve(&mut kwargs, SPECS, DEPRECATED, &rc).unwrap();
        assert_eq!(fields.value("locator"), &RcValue::from(vec![1.0, 2.0, 3.0]));
        assert_eq!(
            fields.provenance("locator"),
            Some(&Provenance::Keyword("ticks".to_string()))
        );
        assert!(kwargs.is_empty());
    }

    #[test]
    fn test_empty_bag_yields_defaults() {
        let rc = Configurator::new();
        let fields = resolve(&mut Kwargs::new(), SPECS, DEPRECATED, &rc).unwrap();
        assert_eq!(fields.text("loc"), Some("right"));
        assert!(fields.value("locator").is_null());
        assert_eq!(fields.number("linewidth"), Some(0.6));
        assert_eq!(fields.number("tickwidth"), Some(0.6));
        // Outer location: 1.3em at 9pt is 0.1625in
        let extendsize = fields.number("extendsize").unwrap();
        assert!((extendsize - 1.3 * 9.0 / 72.0).abs() < 1e-12);
        assert_eq!(fields.flag("reverse"), Some(false));
        assert!(fields.names().all(|name| !fields.explicit(name)));
    }

    #[test]
    fn test_defaults_follow_rc() {
        let rc = Configurator::new();
        rc.set("tick.width", 1.5).unwrap();
        let fields = resolve(&mut Kwargs::new(), SPECS, &[], &rc).unwrap();
        assert_eq!(fields.number("tickwidth"), Some(1.5));
    }

    #[test]
    fn test_inherit_only_from_explicit_field() {
        let rc = Configurator::new();
        let mut kwargs = Kwargs::new().with("lw", 2.0);
        let fields = resolve(&mut kwargs, SPECS, &[], &rc).unwrap();
        assert_eq!(fields.number("tickwidth"), Some(2.0));
        assert!(!fields.explicit("tickwidth"));
    }

    #[test]
    fn test_switch_default() {
        let rc = Configurator::new();
        let mut kwargs = Kwargs::new().with("loc", "upper right");
        let fields = resolve(&mut kwargs, SPECS, &[], &rc).unwrap();
        let extendsize = fields.number("extendsize").unwrap();
        assert!((extendsize - 0.9 * 9.0 / 72.0).abs() < 1e-12);
    }

    #[test]
    fn test_lengths_converted() {
        let rc = Configurator::new();
        let mut kwargs = Kwargs::new().with("linewidth", "1mm").with("extendsize", 2.0);
        let fields = resolve(&mut kwargs, SPECS, &[], &rc).unwrap();
        assert!((fields.number("linewidth").unwrap() - 72.0 / 25.4).abs() < 1e-9);
        assert!((fields.number("extendsize").unwrap() - 0.25).abs() < 1e-12);
        assert!(fields.explicit("extendsize"));
    }

    #[test]
    fn test_invalid_field() {
        let rc = Configurator::new();
        let mut kwargs = Kwargs::new().with("reverse", "maybe");
        let err = resolve(&mut kwargs, SPECS, &[], &rc).unwrap_err();
        assert!(matches!(err, PlotError::InvalidSettings { ref field, .. } if field == "reverse"));

        let mut kwargs = Kwargs::new().with("locator_kw", 3.0);
        let err = resolve(&mut kwargs, SPECS, &[], &rc).unwrap_err();
        assert!(matches!(err, PlotError::InvalidSettings { ref field, .. } if field == "locator_kw"));
    }

    #[test]
    fn test_deprecated_alias_folded_into_map() {
        let rc = Configurator::new();
        let mut kwargs = Kwargs::new().with("maxn", 5.0);
        let (fields, warnings) = catch_warnings(|| resolve(&mut kwargs, SPECS, DEPRECATED, &rc));
        let fields = fields.unwrap();

        let mut modern = Kwargs::new().with("locator_kw", RcValue::Map(
            [("nbins".to_string(), RcValue::from(5.0))].into_iter().collect(),
        ));
        let expected = resolve(&mut modern, SPECS, DEPRECATED, &rc).unwrap();

        assert_eq!(fields.value("locator_kw"), expected.value("locator_kw"));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::Deprecated);
        assert!(!kwargs.contains("maxn"));
    }

    #[test]
    fn test_unknown_keywords_pass_through() {
        let rc = Configurator::new();
        let mut kwargs = Kwargs::new().with("ticks", vec![0.0]).with("pad", 0.5);
        let fields = resolve(&mut kwargs, SPECS, &[], &rc).unwrap();
        assert_eq!(fields.extra.get("pad"), Some(&RcValue::from(0.5)));
        assert_eq!(kwargs.get("pad"), Some(&RcValue::from(0.5)));
    }
}
