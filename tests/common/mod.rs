//! Common test utilities for plotrc.
//!
//! This module provides shared helpers for the integration tests.

pub mod assertions;
pub mod recorder;
