//! Fields computed after the render target exists.

use serde::{Serialize, Serializer};

use crate::error::{PlotError, Result};
use crate::warnings::{warn_plot, WarningKind};

/// A settings field filled in exactly once by a finalize step.
///
/// Reading it earlier fails with [`PlotError::NotFinalized`]; filling it
/// twice fails with [`PlotError::AlreadyFinalized`].
#[derive(Debug, Clone, PartialEq)]
pub struct Derived<T> {
    name: &'static str,
    value: Option<T>,
}

impl<T> Derived<T> {
    pub const fn pending(name: &'static str) -> Self {
        Self { name, value: None }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    pub fn get(&self) -> Result<&T> {
        self.value.as_ref().ok_or_else(|| PlotError::NotFinalized {
            field: self.name.to_string(),
        })
    }

    /// Fail if the value has already been derived
    pub fn ensure_pending(&self) -> Result<()> {
        if self.value.is_some() {
            return Err(PlotError::AlreadyFinalized {
                field: self.name.to_string(),
            });
        }
        Ok(())
    }

    pub fn set(&mut self, value: T) -> Result<()> {
        self.ensure_pending()?;
        self.value = Some(value);
        Ok(())
    }
}

impl<T: Serialize> Serialize for Derived<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

/// Fraction of a colorbar's long axis taken by each extension triangle.
///
/// `size / max(extent - 2 * size, em)`, all in inches. A degenerate extent
/// or size gives no extension and a warning.
pub fn extend_fraction(size: f64, extent: f64, em: f64) -> f64 {
    let denominator = (extent - 2.0 * size).max(em);
    if !extent.is_finite() || extent <= 0.0 || !denominator.is_finite() || denominator <= 0.0 {
        warn_plot(
            WarningKind::DegenerateGeometry,
            format!(
                "Cannot size colorbar extensions for a long axis of {} inches; drawing none.",
                extent
            ),
        );
        return 0.0;
    }
    if !size.is_finite() || size < 0.0 {
        warn_plot(
            WarningKind::DegenerateGeometry,
            format!("Invalid colorbar extension size of {} inches; drawing none.", size),
        );
        return 0.0;
    }
    size / denominator
}
