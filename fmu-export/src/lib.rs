#![doc = include_str!("../README.md")]
//! ## Feature flags
#![doc = document_features::document_features!()]
#![deny(clippy::all)]
#![deny(deref_nullptr)]
#![deny(invalid_value)]
#![deny(static_mut_refs)]

pub mod fmi2;
pub mod package;

// Re-exported for the code generated by `export_fmu!`
#[doc(hidden)]
pub use fmu;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Library does not embed a model description: {0}")]
    MissingModelDescription(String),

    #[error("Model description has no CoSimulation element")]
    NotCoSimulation,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Schema(#[from] fmu::schema::Error),

    #[error(transparent)]
    Fmu(#[from] fmu::Error),

    #[error(transparent)]
    LibLoading {
        #[from]
        source: libloading::Error,
    },
}
