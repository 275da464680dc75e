// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Viewer driver contract for the annotation overlay.
//!
//! The overlay floats on top of a third-party volumetric viewer. This crate
//! defines what every such viewer has to expose to the overlay, and nothing
//! else: no host-specific code, no serialization, no DOM.
//!
//! # Design Principles
//!
//! - **One implementing type per host**: New viewers get a new adapter type,
//!   never a branch inside an existing one.
//! - **Empty means not ready**: An empty viewport set is a transient
//!   condition, not "this viewer has no viewports".
//! - **Schema drift is recoverable**: Reads against an unexpected host shape
//!   return [`DriverError`] instead of panicking.

use thiserror::Error;

/// Error type for driver reads against a host viewer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// The host has not settled into a usable state yet.
    #[error("viewer not ready: {0}")]
    NotReady(String),
    /// The host exposes a shape this driver does not understand.
    #[error("unsupported host schema: {0}")]
    UnsupportedSchema(String),
    /// A DOM element the driver relies on could not be found.
    #[error("element not found: {0}")]
    ElementNotFound(String),
    /// An optional capability is not provided by this driver.
    #[error("operation not supported by this driver: {0}")]
    Unsupported(&'static str),
}

pub mod math;
mod port;
mod types;

pub use port::{ViewerDriver, ViewportDriver, ViewportsChangedHandler};
pub use types::{
    CameraPose, ColorRgb8, InjectionParams, NativeView, RefreshViewParams, ViewportGeometry,
};
