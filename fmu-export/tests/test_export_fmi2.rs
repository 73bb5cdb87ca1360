//! Drive the exported Rust rectifier through its C API, the way an importer would.

use std::{
    ffi::{CStr, CString},
    io::Read,
    str::FromStr,
};

use float_cmp::assert_approx_eq;
use fmu::{
    fmi2::{binding, import::Fmi2Import, schema::Fmi2ModelDescription, CallbackFunctions},
    traits::FmiImport as _,
};
use fmu_export::{fmi2::Model as _, package, Error};

#[path = "../examples/rectifier.rs"]
mod rectifier;

use rectifier::*;

struct Slave {
    c: binding::fmi2Component,
    // Must outlive the instance
    _callbacks: Box<CallbackFunctions>,
}

impl Slave {
    fn instantiate(fmu_type: binding::fmi2Type, guid: &str) -> Option<Self> {
        let callbacks = Box::<CallbackFunctions>::default();
        let guid = CString::new(guid).unwrap();
        let c = unsafe {
            fmi2Instantiate(
                c"slave".as_ptr(),
                fmu_type,
                guid.as_ptr(),
                c"".as_ptr(),
                &*callbacks as *const CallbackFunctions as *const binding::fmi2CallbackFunctions,
                binding::fmi2False,
                binding::fmi2True,
            )
        };
        (!c.is_null()).then_some(Self {
            c,
            _callbacks: callbacks,
        })
    }

    fn cs() -> Self {
        Self::instantiate(binding::fmi2Type_fmi2CoSimulation, Rectifier::GUID).unwrap()
    }

    fn initialize(&self, params: &[(u32, f64)]) {
        for (vr, value) in params {
            assert_eq!(
                unsafe { fmi2SetReal(self.c, vr, 1, value) },
                binding::fmi2Status_fmi2OK
            );
        }
        unsafe {
            assert_eq!(
                fmi2SetupExperiment(self.c, binding::fmi2False, 0.0, 0.0, binding::fmi2False, 0.0),
                binding::fmi2Status_fmi2OK
            );
            assert_eq!(fmi2EnterInitializationMode(self.c), binding::fmi2Status_fmi2OK);
            assert_eq!(fmi2ExitInitializationMode(self.c), binding::fmi2Status_fmi2OK);
        }
    }

    fn real(&self, vr: u32) -> f64 {
        let mut value = 0.0;
        assert_eq!(
            unsafe { fmi2GetReal(self.c, &vr, 1, &mut value) },
            binding::fmi2Status_fmi2OK
        );
        value
    }
}

impl Drop for Slave {
    fn drop(&mut self) {
        unsafe { fmi2FreeInstance(self.c) };
    }
}

#[test]
fn test_version_strings() {
    let platform = unsafe { CStr::from_ptr(fmi2GetTypesPlatform()) };
    let version = unsafe { CStr::from_ptr(fmi2GetVersion()) };
    assert_eq!(platform.to_str().unwrap(), "default");
    assert_eq!(version.to_str().unwrap(), "2.0");
}

#[test]
fn test_embedded_model_description() {
    let embedded = unsafe { CStr::from_ptr(fmu_export_model_description()) };
    let embedded = embedded.to_str().unwrap();
    assert_eq!(embedded, fmu_export::fmi2::model_description::<Rectifier>());

    let md = Fmi2ModelDescription::from_str(embedded).unwrap();
    assert_eq!(md.model_name, "Rectifier");
    assert_eq!(
        md.co_simulation.as_ref().unwrap().model_identifier,
        Rectifier::MODEL_IDENTIFIER
    );
    let outputs = md.outputs().map(|v| v.name.as_str()).collect::<Vec<_>>();
    assert_eq!(outputs, ["outputs", "nSteps"]);
}

#[test_log::test]
fn test_instantiate_checks() {
    assert!(Slave::instantiate(binding::fmi2Type_fmi2CoSimulation, "{wrong}").is_none());
    assert!(Slave::instantiate(binding::fmi2Type_fmi2ModelExchange, Rectifier::GUID).is_none());

    let guid = CString::new(Rectifier::GUID).unwrap();
    let null = unsafe {
        fmi2Instantiate(
            c"slave".as_ptr(),
            binding::fmi2Type_fmi2CoSimulation,
            guid.as_ptr(),
            c"".as_ptr(),
            std::ptr::null(),
            binding::fmi2False,
            binding::fmi2False,
        )
    };
    assert!(null.is_null());

    // A null instance is rejected rather than dereferenced
    let status = unsafe { fmi2DoStep(std::ptr::null_mut(), 0.0, 0.1, binding::fmi2True) };
    assert_eq!(status, binding::fmi2Status_fmi2Error);
}

#[test_log::test]
fn test_simulate() {
    let slave = Slave::cs();
    slave.initialize(&[(VR_AMPLITUDE, 5.0)]);
    assert_eq!(slave.real(VR_AMPLITUDE), 5.0);

    let h = 1e-3;
    for n in 0..5 {
        let status = unsafe { fmi2DoStep(slave.c, n as f64 * h, h, binding::fmi2True) };
        assert_eq!(status, binding::fmi2Status_fmi2OK);
    }

    // Charging during the first quarter period, bounded by the source
    let vc = slave.real(VR_OUTPUTS);
    assert!(vc > 0.0 && vc <= 5.0, "Vc = {vc}");
    assert_approx_eq!(f64, slave.real(VR_VIN), 5.0, epsilon = 1e-9);

    let (mut n_steps, mut conducting) = (0, binding::fmi2False);
    unsafe {
        assert_eq!(
            fmi2GetInteger(slave.c, &VR_NSTEPS, 1, &mut n_steps),
            binding::fmi2Status_fmi2OK
        );
        assert_eq!(
            fmi2GetBoolean(slave.c, &VR_CONDUCTING, 1, &mut conducting),
            binding::fmi2Status_fmi2OK
        );
    }
    assert_eq!(n_steps, 5);
    assert_eq!(conducting, binding::fmi2True);

    let mut last = 0.0;
    unsafe {
        assert_eq!(
            fmi2GetRealStatus(
                slave.c,
                binding::fmi2StatusKind_fmi2LastSuccessfulTime,
                &mut last
            ),
            binding::fmi2Status_fmi2OK
        );
    }
    assert_approx_eq!(f64, last, 5e-3, epsilon = 1e-12);

    // Fixed parameters cannot change after initialization
    let status = unsafe { fmi2SetReal(slave.c, &VR_AMPLITUDE, 1, &1.0) };
    assert_eq!(status, binding::fmi2Status_fmi2Error);
    assert_eq!(slave.real(VR_AMPLITUDE), 5.0);

    assert_eq!(unsafe { fmi2Terminate(slave.c) }, binding::fmi2Status_fmi2OK);
}

#[test_log::test]
fn test_terminated_by_model() {
    let slave = Slave::cs();
    slave.initialize(&[(VR_TTERMINATE, 0.0025)]);

    let h = 1e-3;
    unsafe {
        assert_eq!(
            fmi2DoStep(slave.c, 0.0, h, binding::fmi2True),
            binding::fmi2Status_fmi2OK
        );
        assert_eq!(
            fmi2DoStep(slave.c, h, h, binding::fmi2True),
            binding::fmi2Status_fmi2OK
        );
        assert_eq!(
            fmi2DoStep(slave.c, 2.0 * h, h, binding::fmi2True),
            binding::fmi2Status_fmi2Discard
        );

        let mut terminated = binding::fmi2False;
        assert_eq!(
            fmi2GetBooleanStatus(slave.c, binding::fmi2StatusKind_fmi2Terminated, &mut terminated),
            binding::fmi2Status_fmi2OK
        );
        assert_eq!(terminated, binding::fmi2True);

        let mut last = 0.0;
        assert_eq!(
            fmi2GetRealStatus(
                slave.c,
                binding::fmi2StatusKind_fmi2LastSuccessfulTime,
                &mut last
            ),
            binding::fmi2Status_fmi2OK
        );
        assert_approx_eq!(f64, last, 0.0025, epsilon = 1e-12);

        // The slave does not continue after a discarded step
        assert_eq!(
            fmi2DoStep(slave.c, last, h, binding::fmi2True),
            binding::fmi2Status_fmi2Error
        );
        assert_eq!(fmi2Terminate(slave.c), binding::fmi2Status_fmi2OK);
    }
}

#[test_log::test]
fn test_unsupported_functions() {
    let slave = Slave::cs();
    slave.initialize(&[]);
    unsafe {
        let mut state: binding::fmi2FMUstate = std::ptr::null_mut();
        assert_eq!(
            fmi2GetFMUstate(slave.c, &mut state),
            binding::fmi2Status_fmi2Error
        );
        let mut value: binding::fmi2String = std::ptr::null();
        assert_eq!(
            fmi2GetString(slave.c, &0, 1, &mut value),
            binding::fmi2Status_fmi2Error
        );
        assert_eq!(fmi2CancelStep(slave.c), binding::fmi2Status_fmi2Error);
        let mut status = binding::fmi2Status_fmi2OK;
        assert_eq!(
            fmi2GetStatus(slave.c, binding::fmi2StatusKind_fmi2DoStepStatus, &mut status),
            binding::fmi2Status_fmi2Error
        );
    }
}

#[test_log::test]
fn test_package_fmu() {
    let dir = tempfile::tempdir().unwrap();
    let library = dir.path().join("librectifier.so");
    std::fs::write(&library, b"not really a library").unwrap();

    let xml = fmu_export::fmi2::model_description::<Rectifier>();
    let fmu_path = package::package_fmu(&xml, &library, &dir.path().join("out")).unwrap();
    assert_eq!(fmu_path.file_name().unwrap(), "rust_rectifier.fmu");

    let binary = format!(
        "binaries/{}/rust_rectifier{}",
        fmu::platform_folder().unwrap(),
        std::env::consts::DLL_SUFFIX
    );
    let mut archive = zip::ZipArchive::new(std::fs::File::open(&fmu_path).unwrap()).unwrap();
    let mut contents = Vec::new();
    archive
        .by_name(&binary)
        .unwrap()
        .read_to_end(&mut contents)
        .unwrap();
    assert_eq!(contents, b"not really a library");

    let import = Fmi2Import::from_path(&fmu_path).unwrap();
    assert_eq!(import.model_description().guid, Rectifier::GUID);
    assert_eq!(import.model_description().num_variables(), 6);
}

#[test]
fn test_package_errors() {
    let dir = tempfile::tempdir().unwrap();
    let library = dir.path().join("librectifier.so");
    std::fs::write(&library, b"not really a library").unwrap();

    assert!(matches!(
        package::package_library(&library, dir.path()),
        Err(Error::LibLoading { .. })
    ));

    let me_only = r#"<fmiModelDescription fmiVersion="2.0" modelName="m" guid="{0}">
        <ModelExchange modelIdentifier="m"/>
        <ModelVariables/>
        <ModelStructure/>
    </fmiModelDescription>"#;
    assert!(matches!(
        package::package_fmu(me_only, &library, dir.path()),
        Err(Error::NotCoSimulation)
    ));
}
