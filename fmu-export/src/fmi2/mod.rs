//! ## Architecture
//!
//! [`crate::export_fmu`] defines the `fmi2*` C functions for a model type. Each of them is a thin
//! wrapper around the generic functions in [`export`], which recover the
//! [`ModelInstance`] behind the opaque [`binding::fmi2Component`] pointer and delegate to it.
//!
//! [`ModelInstance`] enforces the FMI 2.0 Co-Simulation state machine and the causality rules for
//! setting variables. Everything model specific lives behind the [`Model`] and [`UserModel`]
//! traits.
//!
//! [`binding::fmi2Component`]: fmu::fmi2::binding::fmi2Component

pub mod export;
mod instance;
mod macros;
mod model_description;
mod traits;

pub use fmu::fmi2::schema::{Causality, Variability};
pub use instance::{LogMessageClosure, ModelInstance};
pub use model_description::model_description;
pub use traits::{Model, ModelError, Start, StepResult, UserModel, Variable};

/// Symbol under which [`crate::export_fmu`] exposes the model description as a C string getter.
pub const MODEL_DESCRIPTION_SYMBOL: &str = "fmu_export_model_description";

/// Log category for calls into the FMI API
pub const LOG_CATEGORY_EVENTS: &str = "logEvents";
/// Log category for failed calls
pub const LOG_CATEGORY_ERROR: &str = "logStatusError";

/// Represents the current state of the model instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelState {
    Instantiated,
    InitializationMode,
    StepComplete,
    /// A step ended with `fmi2Discard`; only status queries and termination are allowed.
    StepDiscarded,
    Terminated,
    Error,
}
