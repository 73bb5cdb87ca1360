//! Build description (`sources/buildDescription.xml`).
//!
//! Describes how the C sources shipped in an FMU are compiled into the platform binary. When an
//! FMU carries this file it takes precedence over the `<SourceFiles>` lists in the model
//! description.

use std::str::FromStr;

#[derive(Clone, Default, Debug, PartialEq, hard_xml::XmlRead)]
#[xml(tag = "fmiBuildDescription")]
pub struct Fmi2BuildDescription {
    #[xml(attr = "fmiVersion")]
    pub fmi_version: String,

    /// Build configurations for different platforms and settings
    #[xml(child = "BuildConfiguration")]
    pub build_configurations: Vec<BuildConfiguration>,
}

impl FromStr for Fmi2BuildDescription {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::deserialize(s)
    }
}

impl Fmi2BuildDescription {
    /// The build configuration for `model_identifier`. Configurations pinned to another platform
    /// are skipped.
    pub fn configuration_for(
        &self,
        model_identifier: &str,
        platform: &str,
    ) -> Option<&BuildConfiguration> {
        self.build_configurations.iter().find(|bc| {
            bc.model_identifier == model_identifier
                && bc.platform.as_deref().map_or(true, |p| p == platform)
        })
    }
}

#[derive(Clone, Default, Debug, PartialEq, hard_xml::XmlRead)]
#[xml(tag = "BuildConfiguration")]
pub struct BuildConfiguration {
    #[xml(attr = "modelIdentifier")]
    pub model_identifier: String,

    /// Target platform (e.g., "linux64", "win32", "darwin64")
    #[xml(attr = "platform")]
    pub platform: Option<String>,

    #[xml(attr = "description")]
    pub description: Option<String>,

    #[xml(child = "SourceFileSet")]
    pub source_file_sets: Vec<SourceFileSet>,

    #[xml(child = "Library")]
    pub libraries: Vec<Library>,
}

impl BuildConfiguration {
    pub fn source_files(&self) -> impl Iterator<Item = &str> {
        self.source_file_sets
            .iter()
            .flat_map(|set| set.source_files.iter().map(|f| f.name.as_str()))
    }

    pub fn preprocessor_definitions(&self) -> impl Iterator<Item = &PreprocessorDefinition> {
        self.source_file_sets
            .iter()
            .flat_map(|set| set.preprocessor_definitions.iter())
    }

    pub fn include_directories(&self) -> impl Iterator<Item = &str> {
        self.source_file_sets
            .iter()
            .flat_map(|set| set.include_directories.iter().map(|d| d.name.as_str()))
    }
}

#[derive(Clone, Default, Debug, PartialEq, hard_xml::XmlRead)]
#[xml(tag = "SourceFileSet")]
pub struct SourceFileSet {
    /// Name of the source file set
    #[xml(attr = "name")]
    pub name: Option<String>,

    /// Programming language of the source files (e.g., "C99", "C++11")
    #[xml(attr = "language")]
    pub language: Option<String>,

    #[xml(attr = "compiler")]
    pub compiler: Option<String>,

    /// Additional compiler options, whitespace separated
    #[xml(attr = "compilerOptions")]
    pub compiler_options: Option<String>,

    #[xml(child = "SourceFile")]
    pub source_files: Vec<SourceFile>,

    #[xml(child = "PreprocessorDefinition")]
    pub preprocessor_definitions: Vec<PreprocessorDefinition>,

    #[xml(child = "IncludeDirectory")]
    pub include_directories: Vec<IncludeDirectory>,
}

#[derive(Clone, Default, Debug, PartialEq, hard_xml::XmlRead)]
#[xml(tag = "SourceFile")]
pub struct SourceFile {
    /// Path relative to the `sources/` directory
    #[xml(attr = "name")]
    pub name: String,
}

#[derive(Clone, Default, Debug, PartialEq, hard_xml::XmlRead)]
#[xml(tag = "PreprocessorDefinition")]
pub struct PreprocessorDefinition {
    #[xml(attr = "name")]
    pub name: String,

    #[xml(default, attr = "optional")]
    pub optional: bool,

    #[xml(attr = "value")]
    pub value: Option<String>,

    #[xml(attr = "description")]
    pub description: Option<String>,
}

#[derive(Clone, Default, Debug, PartialEq, hard_xml::XmlRead)]
#[xml(tag = "IncludeDirectory")]
pub struct IncludeDirectory {
    /// Path relative to the `sources/` directory
    #[xml(attr = "name")]
    pub name: String,
}

#[derive(Clone, Default, Debug, PartialEq, hard_xml::XmlRead)]
#[xml(tag = "Library")]
pub struct Library {
    #[xml(attr = "name")]
    pub name: String,

    #[xml(attr = "version")]
    pub version: Option<String>,

    #[xml(default, attr = "external")]
    pub external: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<fmiBuildDescription fmiVersion="2.0">
    <BuildConfiguration modelIdentifier="Rectifier">
        <SourceFileSet language="C99" compilerOptions="-O2">
            <SourceFile name="rectifier.c"/>
            <SourceFile name="util/ring.c"/>
            <PreprocessorDefinition name="FMI_VERSION" value="2"/>
            <PreprocessorDefinition name="NO_FILE_OUTPUT"/>
            <IncludeDirectory name="util"/>
        </SourceFileSet>
    </BuildConfiguration>
    <BuildConfiguration modelIdentifier="Rectifier" platform="win64">
        <SourceFileSet>
            <SourceFile name="rectifier_win.c"/>
        </SourceFileSet>
    </BuildConfiguration>
</fmiBuildDescription>"#;

    #[test]
    fn test_build_description() {
        let bd = Fmi2BuildDescription::from_str(XML).unwrap();
        assert_eq!(bd.fmi_version, "2.0");
        assert_eq!(bd.build_configurations.len(), 2);

        let bc = bd.configuration_for("Rectifier", "linux64").unwrap();
        assert_eq!(
            bc.source_files().collect::<Vec<_>>(),
            vec!["rectifier.c", "util/ring.c"]
        );
        let defs = bc.preprocessor_definitions().collect::<Vec<_>>();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].name, "FMI_VERSION");
        assert_eq!(defs[0].value.as_deref(), Some("2"));
        assert_eq!(defs[1].value, None);
        assert_eq!(bc.include_directories().collect::<Vec<_>>(), vec!["util"]);

        assert!(bd.configuration_for("Other", "linux64").is_none());
    }
}
