//! Package a compiled model library into an `.fmu` archive.
//!
//! The archive holds `modelDescription.xml` and the library as
//! `binaries/<platform>/<modelIdentifier><DLL_SUFFIX>` for the host platform.

use std::{
    ffi::{c_char, CStr},
    fs::File,
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};

use fmu::fmi2::schema::Fmi2ModelDescription;

use crate::{fmi2::MODEL_DESCRIPTION_SYMBOL, Error};

/// Load `library` and read the model description embedded by [`crate::export_fmu`].
pub fn extract_model_description(library: &Path) -> Result<String, Error> {
    let missing = || Error::MissingModelDescription(library.display().to_string());
    unsafe {
        let lib = libloading::Library::new(library)?;
        let getter = lib
            .get::<unsafe extern "C" fn() -> *const c_char>(MODEL_DESCRIPTION_SYMBOL.as_bytes())
            .map_err(|_| missing())?;
        let ptr = getter();
        if ptr.is_null() {
            return Err(missing());
        }
        let xml = CStr::from_ptr(ptr).to_string_lossy().into_owned();
        if xml.is_empty() {
            return Err(missing());
        }
        log::debug!("Extracted {} bytes of model description", xml.len());
        Ok(xml)
    }
}

/// Write `<output_dir>/<modelIdentifier>.fmu` from a model description and a compiled library.
///
/// Returns the path of the written FMU.
pub fn package_fmu(
    model_description: &str,
    library: &Path,
    output_dir: &Path,
) -> Result<PathBuf, Error> {
    let md = Fmi2ModelDescription::from_str(model_description)?;
    let identifier = md
        .co_simulation
        .as_ref()
        .map(|cs| cs.model_identifier.as_str())
        .ok_or(Error::NotCoSimulation)?;
    let platform = fmu::platform_folder()?;

    std::fs::create_dir_all(output_dir)?;
    let fmu_path = output_dir.join(format!("{identifier}.fmu"));
    log::debug!("Creating FMU package at: {}", fmu_path.display());

    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);
    let mut zw = zip::ZipWriter::new(File::create(&fmu_path)?);
    zw.set_comment(format!("Created by fmu-export {}", env!("CARGO_PKG_VERSION")));

    zw.start_file("modelDescription.xml", options)?;
    zw.write_all(model_description.as_bytes())?;

    zw.add_directory("binaries/", options)?;
    zw.add_directory(format!("binaries/{platform}/"), options)?;
    zw.start_file(
        format!(
            "binaries/{platform}/{identifier}{}",
            std::env::consts::DLL_SUFFIX
        ),
        options,
    )?;
    std::io::copy(&mut File::open(library)?, &mut zw)?;

    zw.finish()?;
    log::info!("Packaged {} into {}", md.model_name, fmu_path.display());
    Ok(fmu_path)
}

/// [`extract_model_description`] followed by [`package_fmu`].
pub fn package_library(library: &Path, output_dir: &Path) -> Result<PathBuf, Error> {
    let model_description = extract_model_description(library)?;
    package_fmu(&model_description, library, output_dir)
}
