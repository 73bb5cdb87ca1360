use std::io::{Cursor, Write};

use fmu::{fmi2::import::Fmi2Import, traits::FmiImport, Error};
use fmu_test_data::Rectifier;

fn zip_with_description(xml: &str) -> Cursor<Vec<u8>> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file(
        "modelDescription.xml",
        zip::write::SimpleFileOptions::default(),
    )
    .unwrap();
    zip.write_all(xml.as_bytes()).unwrap();
    let mut cursor = zip.finish().unwrap();
    cursor.set_position(0);
    cursor
}

#[test_log::test]
fn test_import_source_fmu() {
    let path = Rectifier::source_fmu().unwrap();
    let import = Fmi2Import::from_path(&path).unwrap();
    let md = import.model_description();
    assert_eq!(md.fmi_version, "2.0");
    assert_eq!(md.model_name, "Rectifier");
    assert_eq!(md.num_states(), 1);
    assert_eq!(md.num_event_indicators(), 1);
    assert!(import.archive_path().join("sources/rectifier.c").exists());

    let lib = import.shared_lib_path("rectifier").unwrap();
    assert!(lib.starts_with("binaries"));
    assert!(lib
        .to_string_lossy()
        .ends_with(&format!("rectifier{}", std::env::consts::DLL_SUFFIX)));

    let url = import.resource_url().unwrap();
    assert_eq!(url.scheme(), "file");
    assert!(url.path().ends_with("/resources/"));
}

#[test_log::test]
fn test_source_fmu_has_no_binary() {
    let path = Rectifier::source_fmu().unwrap();
    let import = Fmi2Import::from_path(&path).unwrap();
    assert!(matches!(
        import.instantiate_cs("inst", false, false),
        Err(Error::ArchiveStructure(_))
    ));
}

#[test]
fn test_unsupported_version() {
    let reader = zip_with_description(
        r#"<fmiModelDescription fmiVersion="3.0" modelName="M" instantiationToken="{0}"/>"#,
    );
    assert!(matches!(
        Fmi2Import::from_reader(reader),
        Err(Error::UnsupportedFmiVersion(_))
    ));
}

#[test]
fn test_missing_model_description() {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file("readme.txt", zip::write::SimpleFileOptions::default())
        .unwrap();
    zip.write_all(b"empty").unwrap();
    let mut cursor = zip.finish().unwrap();
    cursor.set_position(0);
    assert!(matches!(
        Fmi2Import::from_reader(cursor),
        Err(Error::ArchiveStructure(_))
    ));
}

#[test]
fn test_peek_descr() {
    let reader = zip_with_description(
        r#"<fmiModelDescription fmiVersion="2.0" modelName="Peeked" guid="{0}"/>"#,
    );
    let descr = fmu::import::peek_descr(reader).unwrap();
    assert_eq!(descr.model_name, "Peeked");
}
