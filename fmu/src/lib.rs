#![doc = include_str!("../README.md")]
//!
//! ## Examples
//!
//! ```rust,no_run
//! use fmu::{
//!     fmi2::{import::Fmi2Import, instance::Common},
//!     traits::FmiImport,
//! };
//!
//! let import = Fmi2Import::from_path("path/to/model.fmu").unwrap();
//! assert_eq!(import.model_description().fmi_version, "2.0");
//!
//! let cs = import.instantiate_cs("inst1", false, true).unwrap();
//! assert_eq!(cs.get_version(), "2.0");
//! ```
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
#![deny(clippy::all)]

// Re-export the fmu-schema crate
pub use fmu_schema as schema;

use schema::MajorVersion;

#[cfg(feature = "compile")]
pub mod compile;
mod event_flags;
pub mod fmi2;
pub mod import;
pub mod traits;

pub use event_flags::EventFlags;

pub mod built_info {
    // The file has been placed there by the build script.
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Error instantiating import")]
    Instantiation,

    #[error("Model type {0} not supported by this FMU")]
    UnsupportedFmuType(InterfaceType),

    #[error("Unsupported platform {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("Unsupported FMI version: {0}")]
    UnsupportedFmiVersion(MajorVersion),

    #[error("The shared library does not export the {0} functions")]
    UnsupportedInterface(InterfaceType),

    #[error("FMI version of loaded API ({found}) doesn't match expected ({expected})")]
    FmiVersionMismatch { found: String, expected: String },

    #[error("FMU archive structure is not as expected: {0}")]
    ArchiveStructure(String),

    #[error("No source files found for model identifier {0}")]
    NoSources(String),

    #[error("Linking {0} failed")]
    Link(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Schema(#[from] fmu_schema::Error),

    #[error(transparent)]
    Nul(#[from] std::ffi::NulError),

    #[error(transparent)]
    LibLoading {
        #[from]
        source: libloading::Error,
    },

    #[cfg(feature = "compile")]
    #[error(transparent)]
    Cc(#[from] cc::Error),

    #[error(transparent)]
    Fmi2Error(#[from] fmi2::Fmi2Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceType {
    ModelExchange,
    CoSimulation,
}

impl std::fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterfaceType::ModelExchange => write!(f, "ModelExchange"),
            InterfaceType::CoSimulation => write!(f, "CoSimulation"),
        }
    }
}

/// Tag for Model Exchange
#[derive(Debug)]
pub struct ME;

/// Tag for Co-Simulation
#[derive(Debug)]
pub struct CS;

/// The FMI platform folder name below `binaries/` for the running host.
pub fn platform_folder() -> Result<&'static str, Error> {
    match (std::env::consts::OS, std::env::consts::ARCH) {
        ("windows", "x86_64") => Ok("win64"),
        ("windows", "x86") => Ok("win32"),
        ("linux", "x86_64") => Ok("linux64"),
        ("linux", "x86") => Ok("linux32"),
        ("macos", "x86_64") | ("macos", "aarch64") => Ok("darwin64"),
        (os, arch) => Err(Error::UnsupportedPlatform {
            os: os.to_string(),
            arch: arch.to_string(),
        }),
    }
}
