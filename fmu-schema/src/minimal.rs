//! Minimal FMI definitions for determining the FMI version.

use std::str::FromStr;

use crate::traits::FmiModelDescription;

/// A minimal model description that only contains the FMI version and model name.
///
/// This is parsed before the full description so that the importer can reject FMUs of an
/// unsupported major version with a useful error instead of a schema mismatch.
#[derive(Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "fmiModelDescription")]
pub struct MinModelDescription {
    #[xml(attr = "fmiVersion")]
    pub fmi_version: String,
    #[xml(attr = "modelName")]
    pub model_name: String,
}

impl FmiModelDescription for MinModelDescription {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn version_string(&self) -> &str {
        &self.fmi_version
    }
}

impl FromStr for MinModelDescription {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::deserialize(s)
    }
}
