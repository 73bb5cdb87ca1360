use std::{
    io::{Read, Seek},
    path::{Path, PathBuf},
    str::FromStr,
};

use super::{
    binding,
    instance::{Instance, CS, ME},
};
use crate::{traits::FmiImport, Error};

use fmu_schema::{fmi2 as schema, MajorVersion};

#[derive(Debug)]
pub struct Fmi2Import {
    /// Path to the unzipped FMU on disk
    dir: tempfile::TempDir,
    /// Parsed raw-schema model description
    model_description: schema::Fmi2ModelDescription,
}

impl FmiImport for Fmi2Import {
    const MAJOR_VERSION: MajorVersion = MajorVersion::FMI2;
    type ModelDescription = schema::Fmi2ModelDescription;
    type Binding = binding::Fmi2Binding;
    type ValueRef = binding::fmi2ValueReference;

    fn new(dir: tempfile::TempDir, schema_xml: &str) -> Result<Self, Error> {
        let schema = schema::Fmi2ModelDescription::from_str(schema_xml)?;
        Ok(Self {
            dir,
            model_description: schema,
        })
    }

    #[inline]
    fn archive_path(&self) -> &Path {
        self.dir.path()
    }

    /// Get the path to the shared library
    fn shared_lib_path(&self, model_identifier: &str) -> Result<PathBuf, Error> {
        let platform_folder = crate::platform_folder()?;
        let fname = format!("{model_identifier}{}", std::env::consts::DLL_SUFFIX);
        Ok(PathBuf::from("binaries").join(platform_folder).join(fname))
    }

    fn model_description(&self) -> &Self::ModelDescription {
        &self.model_description
    }

    /// Load the plugin shared library and return the raw bindings.
    fn binding(&self, model_identifier: &str) -> Result<Self::Binding, Error> {
        let lib_path = self
            .dir
            .path()
            .join(self.shared_lib_path(model_identifier)?);
        if !lib_path.exists() {
            return Err(Error::ArchiveStructure(format!(
                "No binary for this platform: {lib_path:?}"
            )));
        }
        log::trace!("Loading shared library {lib_path:?}");
        let binding = unsafe { binding::Fmi2Binding::new(lib_path) }?;
        let missing = binding.missing_functions(binding::FunctionGroup::Common);
        if !missing.is_empty() {
            return Err(Error::ArchiveStructure(format!(
                "Shared library does not export {}",
                missing.join(", ")
            )));
        }
        Ok(binding)
    }
}

impl Fmi2Import {
    /// Open and extract the FMU at `path`
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        crate::import::from_path(path)
    }

    /// Extract an FMU from any seekable reader
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self, Error> {
        crate::import::new(reader)
    }

    /// Create a new instance of the FMU for Model-Exchange
    pub fn instantiate_me(
        &self,
        instance_name: &str,
        visible: bool,
        logging_on: bool,
    ) -> Result<Instance<'_, ME>, Error> {
        Instance::<'_, ME>::new(self, instance_name, visible, logging_on)
    }

    /// Create a new instance of the FMU for Co-Simulation
    pub fn instantiate_cs(
        &self,
        instance_name: &str,
        visible: bool,
        logging_on: bool,
    ) -> Result<Instance<'_, CS>, Error> {
        Instance::<'_, CS>::new(self, instance_name, visible, logging_on)
    }
}
