//! Opening FMU archives.

use std::{
    io::{self, Read},
    path::Path,
    str::FromStr,
};

use fmu_schema::{minimal::MinModelDescription, traits::FmiModelDescription};

use crate::{traits::FmiImport, Error};

const MODEL_DESCRIPTION: &str = "modelDescription.xml";

/// Peek at the modelDescription XML without extracting the FMU
pub fn peek_descr_path(path: impl AsRef<Path>) -> Result<MinModelDescription, Error> {
    let file = std::fs::File::open(path.as_ref())?;
    peek_descr(file)
}

/// Peek at the modelDescription XML without extracting the FMU
pub fn peek_descr<R: Read + io::Seek>(reader: R) -> Result<MinModelDescription, Error> {
    let mut archive = zip::ZipArchive::new(reader)?;
    let mut descr_file = archive
        .by_name(MODEL_DESCRIPTION)
        .map_err(|_| Error::ArchiveStructure(format!("{MODEL_DESCRIPTION} not found")))?;
    let mut descr_xml = String::new();
    descr_file.read_to_string(&mut descr_xml)?;
    let descr = MinModelDescription::from_str(&descr_xml)?;
    log::debug!(
        "Found FMI {} named '{}'",
        descr.fmi_version,
        descr.model_name
    );
    Ok(descr)
}

/// Creates a new Import by extracting the FMU and parsing the modelDescription XML
pub fn from_path<Imp: FmiImport>(path: impl AsRef<Path>) -> Result<Imp, Error> {
    let file = std::fs::File::open(path.as_ref())?;
    log::debug!("Opening FMU file {:?}", path.as_ref());
    new(file)
}

/// Creates a new Import by extracting the FMU and parsing the modelDescription XML
pub fn new<R: Read + io::Seek, Imp: FmiImport>(reader: R) -> Result<Imp, Error> {
    let mut archive = zip::ZipArchive::new(reader)?;
    let temp_dir = tempfile::Builder::new().prefix("fmu-rs").tempdir()?;
    log::debug!("Extracting into {temp_dir:?}");
    archive.extract(&temp_dir)?;

    for fname in archive.file_names() {
        log::trace!("  - {}", fname);
    }

    let descr_file_path = temp_dir.path().join(MODEL_DESCRIPTION);
    if !descr_file_path.exists() {
        return Err(Error::ArchiveStructure(format!(
            "{MODEL_DESCRIPTION} not found"
        )));
    }
    let descr_xml = std::fs::read_to_string(descr_file_path)?;

    // Initial non-version-specific model description
    let descr = MinModelDescription::from_str(&descr_xml)?;
    log::debug!(
        "Found FMI {} named '{}'",
        descr.fmi_version,
        descr.model_name
    );

    let major_version = descr.major_version()?;
    if major_version != Imp::MAJOR_VERSION {
        return Err(Error::UnsupportedFmiVersion(major_version));
    }

    Imp::new(temp_dir, &descr_xml)
}
