#![doc=include_str!( "../README.md")]
#![deny(unsafe_code)]
#![deny(clippy::all)]

use std::io::Write;

use anyhow::Context;
use fmu::{compile::CompileOptions, fmi2::import::Fmi2Import};
use tempfile::{NamedTempFile, TempPath};

const MODEL_DESCRIPTION: &str = include_str!("../fmu/Rectifier/modelDescription.xml");
const RECTIFIER_C: &str = include_str!("../fmu/Rectifier/sources/rectifier.c");
const BUILD_DESCRIPTION: &str = include_str!("../fmu/Rectifier/sources/buildDescription.xml");

/// Peak source voltage compiled into the rectifier when no build description overrides it.
pub const DEFAULT_AMPLITUDE: f64 = 10.0;
/// Peak source voltage set by the `buildDescription.xml` variant.
pub const BUILD_DESCRIPTION_AMPLITUDE: f64 = 5.0;

/// The packed Rectifier source FMU
#[derive(Debug)]
pub struct Rectifier;

impl Rectifier {
    /// Pack the source FMU (model description and `sources/rectifier.c`) into a temporary file.
    pub fn source_fmu() -> anyhow::Result<TempPath> {
        pack(false)
    }

    /// Like [`Rectifier::source_fmu`], with an additional `sources/buildDescription.xml` that sets
    /// the amplitude to [`BUILD_DESCRIPTION_AMPLITUDE`].
    pub fn source_fmu_with_build_description() -> anyhow::Result<TempPath> {
        pack(true)
    }

    /// Pack the source FMU and compile the platform binary into it.
    pub fn compiled_fmu() -> anyhow::Result<TempPath> {
        let source = Self::source_fmu()?;
        let output = tempfile::Builder::new()
            .suffix(".fmu")
            .tempfile()?
            .into_temp_path();
        let options = CompileOptions {
            output: Some(output.to_path_buf()),
            ..Default::default()
        };
        fmu::compile::compile_platform_binary(&source, &options)
            .with_context(|| format!("Compiling {source:?}"))?;
        Ok(output)
    }

    /// Compile and import the rectifier.
    pub fn import() -> anyhow::Result<Fmi2Import> {
        let fmu = Self::compiled_fmu()?;
        Ok(Fmi2Import::from_path(&fmu)?)
    }
}

fn pack(with_build_description: bool) -> anyhow::Result<TempPath> {
    let mut file = tempfile::Builder::new().suffix(".fmu").tempfile()?;
    {
        let mut zip = zip::ZipWriter::new(file.as_file_mut());
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);

        zip.start_file("modelDescription.xml", options)?;
        zip.write_all(MODEL_DESCRIPTION.as_bytes())?;
        zip.add_directory("sources/", options)?;
        zip.start_file("sources/rectifier.c", options)?;
        zip.write_all(RECTIFIER_C.as_bytes())?;
        if with_build_description {
            zip.start_file("sources/buildDescription.xml", options)?;
            zip.write_all(BUILD_DESCRIPTION.as_bytes())?;
        }
        zip.finish().context("Writing FMU archive")?;
    }
    file.flush()?;
    Ok(NamedTempFile::into_temp_path(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fmu::traits::FmiImport;

    #[test]
    fn test_source_fmu_layout() {
        let path = Rectifier::source_fmu().unwrap();
        let archive = zip::ZipArchive::new(std::fs::File::open(&path).unwrap()).unwrap();
        let names: Vec<_> = archive.file_names().collect();
        assert!(names.contains(&"modelDescription.xml"));
        assert!(names.contains(&"sources/rectifier.c"));
        assert!(!names.contains(&"sources/buildDescription.xml"));
        assert!(!names.iter().any(|name| name.starts_with("binaries/")));
    }

    #[test]
    fn test_build_description_variant() {
        let path = Rectifier::source_fmu_with_build_description().unwrap();
        let archive = zip::ZipArchive::new(std::fs::File::open(&path).unwrap()).unwrap();
        assert!(archive
            .file_names()
            .any(|name| name == "sources/buildDescription.xml"));
    }

    #[test]
    fn test_peek() {
        let path = Rectifier::source_fmu().unwrap();
        let descr = fmu::import::peek_descr_path(&path).unwrap();
        assert_eq!(descr.model_name, "Rectifier");
        assert_eq!(descr.fmi_version, "2.0");
    }

    #[test]
    fn test_import() {
        let import = Rectifier::import().unwrap();
        let md = import.model_description();
        assert_eq!(md.model_name, "Rectifier");
        assert_eq!(
            md.co_simulation.as_ref().unwrap().model_identifier,
            "rectifier"
        );
    }
}
