//! Compile the C sources shipped in a source FMU into a platform binary.
//!
//! The sources are taken from `sources/buildDescription.xml` when the FMU has one, otherwise from
//! the `<SourceFiles>` lists of the model description. The resulting shared library is written
//! into the archive as `binaries/<platform>/<modelIdentifier><DLL_SUFFIX>`.
//!
//! The FMI 2.0 standard headers are always on the include path, after the FMU's own `sources/`
//! directory and any user supplied include directories.

use std::{
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
    str::FromStr,
};

use fmu_schema::{
    fmi2::{Fmi2BuildDescription, Fmi2ModelDescription, InterfaceType},
    minimal::MinModelDescription,
    traits::FmiModelDescription,
    MajorVersion,
};
use itertools::Itertools;

use crate::{built_info, fmi2::binding, Error};

const MODEL_DESCRIPTION: &str = "modelDescription.xml";
const BUILD_DESCRIPTION: &str = "sources/buildDescription.xml";

#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Where to write the resulting FMU. `None` rewrites the input in place.
    pub output: Option<PathBuf>,
    /// Additional include directories, e.g. the FMI 2.0 headers if the sources don't ship them.
    pub include_dirs: Vec<PathBuf>,
    /// Optimization level passed to the compiler
    pub opt_level: u32,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            output: None,
            include_dirs: Vec::new(),
            opt_level: 2,
        }
    }
}

/// What to compile for one model identifier
#[derive(Debug, Default, PartialEq)]
struct SourceSet {
    model_identifier: String,
    sources: Vec<String>,
    definitions: Vec<(String, Option<String>)>,
    include_dirs: Vec<String>,
    flags: Vec<String>,
    /// Libraries to link against, without prefix or suffix
    libraries: Vec<String>,
}

/// Compile the platform binary of the source FMU at `fmu_path`.
///
/// Returns the path of the written FMU.
pub fn compile_platform_binary(
    fmu_path: impl AsRef<Path>,
    options: &CompileOptions,
) -> Result<PathBuf, Error> {
    let fmu_path = fmu_path.as_ref();
    let output = options
        .output
        .clone()
        .unwrap_or_else(|| fmu_path.to_path_buf());
    let platform = crate::platform_folder()?;

    log::debug!("Compiling {fmu_path:?} for {platform} ({})", built_info::TARGET);

    let mut archive = zip::ZipArchive::new(File::open(fmu_path)?)?;
    let unzip_dir = tempfile::Builder::new().prefix("fmu-rs-build").tempdir()?;
    archive.extract(&unzip_dir)?;

    let descr_xml = std::fs::read_to_string(unzip_dir.path().join(MODEL_DESCRIPTION))
        .map_err(|_| Error::ArchiveStructure(format!("{MODEL_DESCRIPTION} not found")))?;
    let major_version = MinModelDescription::from_str(&descr_xml)?.major_version()?;
    if major_version != MajorVersion::FMI2 {
        return Err(Error::UnsupportedFmiVersion(major_version));
    }
    let md = Fmi2ModelDescription::from_str(&descr_xml)?;

    let build_description_path = unzip_dir.path().join(BUILD_DESCRIPTION);
    let build_description = if build_description_path.exists() {
        Some(Fmi2BuildDescription::from_str(&std::fs::read_to_string(
            build_description_path,
        )?)?)
    } else {
        None
    };

    let source_sets = collect_source_sets(&md, build_description.as_ref(), platform)?;

    let sources_dir = unzip_dir.path().join("sources");
    let build_dir = unzip_dir.path().join("build");
    let headers_dir = unzip_dir.path().join("fmi2-headers");
    std::fs::create_dir_all(&headers_dir)?;
    binding::write_headers(&headers_dir)?;

    let binaries = source_sets
        .iter()
        .map(|set| {
            let lib_name = format!("{}{}", set.model_identifier, std::env::consts::DLL_SUFFIX);
            let entry = format!("binaries/{platform}/{lib_name}");
            let out_dir = build_dir.join(&set.model_identifier);
            std::fs::create_dir_all(&out_dir)?;
            let lib_path = out_dir.join(&lib_name);
            let dirs = BuildDirs {
                sources: &sources_dir,
                headers: &headers_dir,
                out: &out_dir,
            };
            build_shared_library(set, &dirs, &lib_path, options)?;
            Ok((entry, lib_path))
        })
        .collect::<Result<Vec<_>, Error>>()?;

    rewrite_archive(&mut archive, &binaries, &output)?;
    log::info!(
        "Added {} to {output:?}",
        binaries.iter().map(|(entry, _)| entry).join(", ")
    );

    Ok(output)
}

/// Determine the model identifiers to build and their sources. Co-Simulation comes first, a
/// Model Exchange identifier is only added when it differs.
fn collect_source_sets(
    md: &Fmi2ModelDescription,
    build_description: Option<&Fmi2BuildDescription>,
    platform: &str,
) -> Result<Vec<SourceSet>, Error> {
    let interfaces: Vec<&dyn InterfaceType> = md
        .co_simulation
        .iter()
        .map(|cs| cs as &dyn InterfaceType)
        .chain(md.model_exchange.iter().map(|me| me as &dyn InterfaceType))
        .unique_by(|iface| iface.model_identifier().to_owned())
        .collect();

    if interfaces.is_empty() {
        return Err(Error::ArchiveStructure(
            "Neither CoSimulation nor ModelExchange is defined".to_owned(),
        ));
    }

    interfaces
        .into_iter()
        .map(|iface| {
            let model_identifier = iface.model_identifier().to_owned();
            let set = match build_description
                .and_then(|bd| bd.configuration_for(&model_identifier, platform))
            {
                Some(config) => SourceSet {
                    sources: config.source_files().map(str::to_owned).collect(),
                    definitions: config
                        .preprocessor_definitions()
                        .map(|def| (def.name.clone(), def.value.clone()))
                        .collect(),
                    include_dirs: config.include_directories().map(str::to_owned).collect(),
                    flags: config
                        .source_file_sets
                        .iter()
                        .filter_map(|set| set.compiler_options.as_deref())
                        .flat_map(str::split_whitespace)
                        .map(str::to_owned)
                        .collect(),
                    libraries: config
                        .libraries
                        .iter()
                        .map(|lib| lib.name.clone())
                        .collect(),
                    model_identifier,
                },
                None => SourceSet {
                    sources: iface
                        .source_file_names()
                        .into_iter()
                        .map(str::to_owned)
                        .collect(),
                    model_identifier,
                    ..Default::default()
                },
            };

            if set.sources.is_empty() {
                Err(Error::NoSources(set.model_identifier))
            } else {
                Ok(set)
            }
        })
        .collect()
}

struct BuildDirs<'a> {
    sources: &'a Path,
    /// Holds the FMI 2.0 standard headers
    headers: &'a Path,
    out: &'a Path,
}

/// Linker arguments for the libraries named by a build configuration
fn library_args(libraries: &[String], msvc: bool) -> Vec<String> {
    libraries
        .iter()
        .map(|lib| {
            if msvc {
                format!("{lib}.lib")
            } else {
                format!("-l{lib}")
            }
        })
        .collect()
}

fn build_shared_library(
    set: &SourceSet,
    dirs: &BuildDirs,
    lib_path: &Path,
    options: &CompileOptions,
) -> Result<(), Error> {
    let sources_dir = dirs.sources;
    let mut build = cc::Build::new();
    build
        .target(built_info::TARGET)
        .host(built_info::HOST)
        .opt_level(options.opt_level)
        .out_dir(dirs.out)
        .pic(true)
        .cargo_metadata(false)
        .cargo_warnings(false)
        .warnings(false)
        .include(sources_dir)
        .includes(&options.include_dirs)
        .files(set.sources.iter().map(|src| sources_dir.join(src)));

    for dir in &set.include_dirs {
        build.include(sources_dir.join(dir));
    }
    build.include(dirs.headers);
    for (name, value) in &set.definitions {
        build.define(name, value.as_deref());
    }
    for flag in &set.flags {
        build.flag_if_supported(flag);
    }

    log::debug!(
        "Compiling {} for {}: {}",
        set.model_identifier,
        built_info::TARGET,
        set.sources.join(" ")
    );
    let objects = build.try_compile_intermediates()?;

    let compiler = build.try_get_compiler()?;
    let mut cmd = compiler.to_command();
    if compiler.is_like_msvc() {
        cmd.arg("/LD")
            .args(&objects)
            .arg(format!("/Fe{}", lib_path.display()))
            .arg("/link")
            .args(library_args(&set.libraries, true));
    } else {
        cmd.arg("-shared")
            .args(&objects)
            .arg("-o")
            .arg(lib_path)
            .args(library_args(&set.libraries, false));
        if !cfg!(target_os = "macos") {
            cmd.arg("-lm");
        }
    }

    log::trace!("Linking {cmd:?}");
    let out = cmd.output()?;
    if !out.status.success() {
        log::error!("{}", String::from_utf8_lossy(&out.stderr));
        return Err(Error::Link(lib_path.display().to_string()));
    }

    Ok(())
}

/// Copy every entry of `archive` into `output`, replacing `binaries` by the newly built files.
fn rewrite_archive<R: Read + io::Seek>(
    archive: &mut zip::ZipArchive<R>,
    binaries: &[(String, PathBuf)],
    output: &Path,
) -> Result<(), Error> {
    let out_dir = match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let tmp = tempfile::Builder::new()
        .suffix(".fmu")
        .tempfile_in(out_dir)?;
    let mut writer = zip::ZipWriter::new(tmp.reopen()?);

    for i in 0..archive.len() {
        let file = archive.by_index_raw(i)?;
        if binaries.iter().any(|(entry, _)| entry == file.name()) {
            log::debug!("Replacing {}", file.name());
            continue;
        }
        writer.raw_copy_file(file)?;
    }

    let file_options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o755);
    for (entry, path) in binaries {
        writer.start_file(entry.as_str(), file_options)?;
        io::copy(&mut File::open(path)?, &mut writer)?;
    }
    writer.finish()?;

    tmp.persist(output).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MD: &str = r#"<fmiModelDescription fmiVersion="2.0" modelName="M" guid="{0}">
        <ModelExchange modelIdentifier="m_me"><SourceFiles><File name="me.c"/></SourceFiles></ModelExchange>
        <CoSimulation modelIdentifier="m"><SourceFiles><File name="all.c"/></SourceFiles></CoSimulation>
        <ModelVariables/>
        <ModelStructure/>
    </fmiModelDescription>"#;

    #[test]
    fn test_source_sets_from_model_description() {
        let md = Fmi2ModelDescription::from_str(MD).unwrap();
        let sets = collect_source_sets(&md, None, "linux64").unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].model_identifier, "m");
        assert_eq!(sets[0].sources, vec!["all.c"]);
        assert_eq!(sets[1].model_identifier, "m_me");
        assert_eq!(sets[1].sources, vec!["me.c"]);
    }

    #[test]
    fn test_same_identifier_builds_once() {
        let md = Fmi2ModelDescription::from_str(&MD.replace("m_me", "m")).unwrap();
        let sets = collect_source_sets(&md, None, "linux64").unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].sources, vec!["all.c"]);
    }

    #[test]
    fn test_source_sets_from_build_description() {
        let md = Fmi2ModelDescription::from_str(&MD.replace("m_me", "m")).unwrap();
        let bd = Fmi2BuildDescription::from_str(
            r#"<fmiBuildDescription fmiVersion="2.0">
                <BuildConfiguration modelIdentifier="m">
                    <SourceFileSet compilerOptions="-Wall -O1">
                        <SourceFile name="a.c"/>
                        <SourceFile name="b.c"/>
                        <PreprocessorDefinition name="FOO" value="1"/>
                        <IncludeDirectory name="inc"/>
                    </SourceFileSet>
                    <Library name="z" external="true"/>
                </BuildConfiguration>
            </fmiBuildDescription>"#,
        )
        .unwrap();
        let sets = collect_source_sets(&md, Some(&bd), "linux64").unwrap();
        assert_eq!(
            sets,
            vec![SourceSet {
                model_identifier: "m".to_owned(),
                sources: vec!["a.c".to_owned(), "b.c".to_owned()],
                definitions: vec![("FOO".to_owned(), Some("1".to_owned()))],
                include_dirs: vec!["inc".to_owned()],
                flags: vec!["-Wall".to_owned(), "-O1".to_owned()],
                libraries: vec!["z".to_owned()],
            }]
        );
    }

    #[test]
    fn test_library_args() {
        let libraries = vec!["z".to_owned(), "pthread".to_owned()];
        assert_eq!(library_args(&libraries, false), vec!["-lz", "-lpthread"]);
        assert_eq!(library_args(&libraries, true), vec!["z.lib", "pthread.lib"]);
        assert!(library_args(&[], false).is_empty());
    }

    #[test]
    fn test_no_sources() {
        let md = Fmi2ModelDescription::from_str(
            r#"<fmiModelDescription fmiVersion="2.0" modelName="M" guid="{0}">
                <CoSimulation modelIdentifier="m"/>
                <ModelVariables/>
                <ModelStructure/>
            </fmiModelDescription>"#,
        )
        .unwrap();
        assert!(matches!(
            collect_source_sets(&md, None, "linux64"),
            Err(Error::NoSources(id)) if id == "m"
        ));
    }
}
