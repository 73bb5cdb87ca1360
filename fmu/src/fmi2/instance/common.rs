use std::ffi::{CStr, CString};

use crate::fmi2::{binding, Fmi2Error, Fmi2Res, Fmi2Status};

use super::{traits, Instance, InstanceTag};

impl<'a, Tag: InstanceTag> traits::Common for Instance<'a, Tag> {
    fn get_version(&self) -> &str {
        unsafe { CStr::from_ptr(self.binding.fmi2GetVersion()) }
            .to_str()
            .unwrap_or_default()
    }

    fn get_types_platform(&self) -> &str {
        unsafe { CStr::from_ptr(self.binding.fmi2GetTypesPlatform()) }
            .to_str()
            .unwrap_or_default()
    }

    fn set_debug_logging(
        &mut self,
        logging_on: bool,
        categories: &[&str],
    ) -> Result<Fmi2Res, Fmi2Error> {
        let category_cstr = categories
            .iter()
            .map(|c| CString::new(*c).unwrap_or_default())
            .collect::<Vec<_>>();

        let category_ptrs: Vec<_> = category_cstr.iter().map(|c| c.as_ptr()).collect();

        Fmi2Status::from(unsafe {
            self.binding.fmi2SetDebugLogging(
                self.component,
                logging_on as binding::fmi2Boolean,
                category_ptrs.len(),
                category_ptrs.as_ptr(),
            )
        })
        .ok()
    }

    fn setup_experiment(
        &mut self,
        tolerance: Option<f64>,
        start_time: f64,
        stop_time: Option<f64>,
    ) -> Result<Fmi2Res, Fmi2Error> {
        Fmi2Status::from(unsafe {
            self.binding.fmi2SetupExperiment(
                self.component,
                tolerance.is_some() as binding::fmi2Boolean,
                tolerance.unwrap_or(0.0),
                start_time,
                stop_time.is_some() as binding::fmi2Boolean,
                stop_time.unwrap_or(0.0),
            )
        })
        .ok()
    }

    fn enter_initialization_mode(&mut self) -> Result<Fmi2Res, Fmi2Error> {
        Fmi2Status::from(unsafe { self.binding.fmi2EnterInitializationMode(self.component) })
            .ok()
    }

    fn exit_initialization_mode(&mut self) -> Result<Fmi2Res, Fmi2Error> {
        Fmi2Status::from(unsafe { self.binding.fmi2ExitInitializationMode(self.component) })
            .ok()
    }

    fn terminate(&mut self) -> Result<Fmi2Res, Fmi2Error> {
        Fmi2Status::from(unsafe { self.binding.fmi2Terminate(self.component) }).ok()
    }

    fn reset(&mut self) -> Result<Fmi2Res, Fmi2Error> {
        Fmi2Status::from(unsafe { self.binding.fmi2Reset(self.component) }).ok()
    }

    fn get_real(
        &mut self,
        sv: &[binding::fmi2ValueReference],
        v: &mut [binding::fmi2Real],
    ) -> Result<Fmi2Res, Fmi2Error> {
        assert_eq!(sv.len(), v.len());
        Fmi2Status::from(unsafe {
            self.binding.fmi2GetReal(self.component, sv.as_ptr(), sv.len(), v.as_mut_ptr())
        })
        .ok()
    }

    fn get_integer(
        &mut self,
        sv: &[binding::fmi2ValueReference],
        v: &mut [binding::fmi2Integer],
    ) -> Result<Fmi2Res, Fmi2Error> {
        assert_eq!(sv.len(), v.len());
        Fmi2Status::from(unsafe {
            self.binding.fmi2GetInteger(
                self.component,
                sv.as_ptr(),
                sv.len(),
                v.as_mut_ptr(),
            )
        })
        .ok()
    }

    fn get_boolean(
        &mut self,
        sv: &[binding::fmi2ValueReference],
        v: &mut [binding::fmi2Boolean],
    ) -> Result<Fmi2Res, Fmi2Error> {
        assert_eq!(sv.len(), v.len());
        Fmi2Status::from(unsafe {
            self.binding.fmi2GetBoolean(
                self.component,
                sv.as_ptr(),
                sv.len(),
                v.as_mut_ptr(),
            )
        })
        .ok()
    }

    fn get_string(
        &mut self,
        sv: &[binding::fmi2ValueReference],
        v: &mut [String],
    ) -> Result<Fmi2Res, Fmi2Error> {
        assert_eq!(sv.len(), v.len());
        let mut ptrs: Vec<binding::fmi2String> = vec![std::ptr::null(); sv.len()];
        let res = Fmi2Status::from(unsafe {
            self.binding.fmi2GetString(
                self.component,
                sv.as_ptr(),
                sv.len(),
                ptrs.as_mut_ptr(),
            )
        })
        .ok()?;

        for (value, ptr) in v.iter_mut().zip(ptrs) {
            *value = if ptr.is_null() {
                String::new()
            } else {
                unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
            };
        }
        Ok(res)
    }

    fn set_real(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        values: &[binding::fmi2Real],
    ) -> Result<Fmi2Res, Fmi2Error> {
        assert_eq!(vrs.len(), values.len());
        Fmi2Status::from(unsafe {
            self.binding.fmi2SetReal(
                self.component,
                vrs.as_ptr(),
                vrs.len(),
                values.as_ptr(),
            )
        })
        .ok()
    }

    fn set_integer(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        values: &[binding::fmi2Integer],
    ) -> Result<Fmi2Res, Fmi2Error> {
        assert_eq!(vrs.len(), values.len());
        Fmi2Status::from(unsafe {
            self.binding.fmi2SetInteger(
                self.component,
                vrs.as_ptr(),
                vrs.len(),
                values.as_ptr(),
            )
        })
        .ok()
    }

    fn set_boolean(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        values: &[binding::fmi2Boolean],
    ) -> Result<Fmi2Res, Fmi2Error> {
        assert_eq!(vrs.len(), values.len());
        Fmi2Status::from(unsafe {
            self.binding.fmi2SetBoolean(
                self.component,
                vrs.as_ptr(),
                vrs.len(),
                values.as_ptr(),
            )
        })
        .ok()
    }

    fn set_string(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        values: &[CString],
    ) -> Result<Fmi2Res, Fmi2Error> {
        assert_eq!(vrs.len(), values.len());
        let ptrs = values.iter().map(|s| s.as_ptr()).collect::<Vec<_>>();
        Fmi2Status::from(unsafe {
            self.binding.fmi2SetString(
                self.component,
                vrs.as_ptr(),
                vrs.len(),
                ptrs.as_ptr(),
            )
        })
        .ok()
    }
}
