use fmu_schema::{
    traits::{DefaultExperiment, FmiModelDescription},
    MajorVersion,
};

use crate::{Error, InterfaceType};

pub trait FmiImport: Sized {
    /// The FMI major version handled by this import
    const MAJOR_VERSION: MajorVersion;

    /// The raw parsed XML schema type
    type ModelDescription: DefaultExperiment + FmiModelDescription;

    /// The raw FMI bindings type
    type Binding;

    /// The type of the value reference used by the FMI API.
    type ValueRef;

    /// Create a new FMI import from a directory containing the unzipped FMU
    fn new(dir: tempfile::TempDir, schema_xml: &str) -> Result<Self, Error>;

    /// Return the path to the extracted FMU
    fn archive_path(&self) -> &std::path::Path;

    /// Get the path to the shared library, relative to the archive root
    fn shared_lib_path(&self, model_identifier: &str) -> Result<std::path::PathBuf, Error>;

    /// Return the path to the resources directory
    fn resource_path(&self) -> std::path::PathBuf {
        self.archive_path().join("resources")
    }

    /// The resources directory as a `file://` URL, as passed to `fmi2Instantiate`.
    fn resource_url(&self) -> Result<url::Url, Error> {
        let resource_path = std::path::absolute(self.resource_path())?;
        url::Url::from_directory_path(&resource_path).map_err(|_| {
            Error::ArchiveStructure(format!("Invalid resource location {resource_path:?}"))
        })
    }

    /// Get a reference to the raw-schema model description
    fn model_description(&self) -> &Self::ModelDescription;

    /// Load the plugin shared library and return the raw bindings.
    fn binding(&self, model_identifier: &str) -> Result<Self::Binding, Error>;
}

/// Generic FMI instance trait
pub trait FmiInstance {
    type ModelDescription;

    type ValueRef;

    /// Get the name of the instance
    fn name(&self) -> &str;

    /// Get the version of the FMU
    fn get_version(&self) -> &str;

    /// Whether this is a Model Exchange or Co-Simulation instance
    fn interface_type(&self) -> InterfaceType;

    /// Get the model description of the FMU
    fn model_description(&self) -> &Self::ModelDescription;
}
