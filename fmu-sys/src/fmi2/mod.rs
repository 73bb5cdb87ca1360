//! FMI 2.0 bindings generated from the standard headers, plus a few helpers on top.
#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(clippy::all)]

use std::{fs, io, path::Path};

include!(concat!(env!("OUT_DIR"), "/fmi2_bindings.rs"));

pub mod logger;

pub const fmi2True: fmi2Boolean = 1;
pub const fmi2False: fmi2Boolean = 0;

/// The FMI 2.0 standard headers as `(file name, contents)` pairs.
///
/// FMUs shipped as sources expect these on the include path.
pub const HEADERS: &[(&str, &str)] = &[
    (
        "fmi2Functions.h",
        include_str!("../../fmi-standard2/headers/fmi2Functions.h"),
    ),
    (
        "fmi2FunctionTypes.h",
        include_str!("../../fmi-standard2/headers/fmi2FunctionTypes.h"),
    ),
    (
        "fmi2TypesPlatform.h",
        include_str!("../../fmi-standard2/headers/fmi2TypesPlatform.h"),
    ),
];

/// Write [`HEADERS`] into `dir`, which must exist.
pub fn write_headers(dir: &Path) -> io::Result<()> {
    for (name, contents) in HEADERS {
        fs::write(dir.join(name), contents)?;
    }
    Ok(())
}

impl Default for fmi2EventInfo {
    fn default() -> Self {
        Self {
            newDiscreteStatesNeeded: fmi2False,
            terminateSimulation: fmi2False,
            nominalsOfContinuousStatesChanged: fmi2False,
            valuesOfContinuousStatesChanged: fmi2False,
            nextEventTimeDefined: fmi2False,
            nextEventTime: 0.0,
        }
    }
}

/// The function groups of the FMI 2.0 API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionGroup {
    /// Functions every FMU exports.
    Common,
    ModelExchange,
    CoSimulation,
}

macro_rules! group_symbols {
    ($($group:ident => [$($name:ident),+ $(,)?]),+ $(,)?) => {
        impl Fmi2Binding {
            /// Names of the functions of `group` that could not be resolved from the library.
            pub fn missing_functions(&self, group: FunctionGroup) -> Vec<&'static str> {
                match group {
                    $(FunctionGroup::$group => {
                        let mut missing = Vec::new();
                        $(if self.$name.is_err() {
                            missing.push(stringify!($name));
                        })+
                        missing
                    })+
                }
            }
        }
    };
}

group_symbols! {
    Common => [
        fmi2GetTypesPlatform,
        fmi2GetVersion,
        fmi2SetDebugLogging,
        fmi2Instantiate,
        fmi2FreeInstance,
        fmi2SetupExperiment,
        fmi2EnterInitializationMode,
        fmi2ExitInitializationMode,
        fmi2Terminate,
        fmi2Reset,
        fmi2GetReal,
        fmi2GetInteger,
        fmi2GetBoolean,
        fmi2GetString,
        fmi2SetReal,
        fmi2SetInteger,
        fmi2SetBoolean,
        fmi2SetString,
    ],
    ModelExchange => [
        fmi2EnterEventMode,
        fmi2NewDiscreteStates,
        fmi2EnterContinuousTimeMode,
        fmi2CompletedIntegratorStep,
        fmi2SetTime,
        fmi2SetContinuousStates,
        fmi2GetDerivatives,
        fmi2GetEventIndicators,
        fmi2GetContinuousStates,
        fmi2GetNominalsOfContinuousStates,
    ],
    CoSimulation => [
        fmi2DoStep,
        fmi2CancelStep,
        fmi2GetStatus,
        fmi2GetRealStatus,
        fmi2GetIntegerStatus,
        fmi2GetBooleanStatus,
        fmi2GetStringStatus,
    ],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_headers() {
        let dir = tempfile::tempdir().unwrap();
        write_headers(dir.path()).unwrap();
        for (name, _) in HEADERS {
            assert!(dir.path().join(name).is_file(), "{name} not written");
        }
        let functions = fs::read_to_string(dir.path().join("fmi2Functions.h")).unwrap();
        assert!(functions.contains("#include \"fmi2FunctionTypes.h\""));
    }

    #[test]
    fn test_event_info_default() {
        let info = fmi2EventInfo::default();
        assert_eq!(info.terminateSimulation, fmi2False);
        assert_eq!(info.nextEventTime, 0.0);
    }
}
