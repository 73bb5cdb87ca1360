use std::ffi::CStr;

use super::{traits::CoSimulation, Instance, CS};
use crate::fmi2::{binding, Fmi2Error, Fmi2Res, Fmi2Status, StatusKind};

impl<'a> CoSimulation for Instance<'a, CS> {
    fn do_step(
        &mut self,
        current_communication_point: f64,
        communication_step_size: f64,
        new_step: bool,
    ) -> Result<Fmi2Res, Fmi2Error> {
        Fmi2Status::from(unsafe {
            self.binding.fmi2DoStep(
                self.component,
                current_communication_point,
                communication_step_size,
                new_step as _,
            )
        })
        .ok()
    }

    fn cancel_step(&mut self) -> Result<Fmi2Res, Fmi2Error> {
        Fmi2Status::from(unsafe { self.binding.fmi2CancelStep(self.component) }).ok()
    }

    fn do_step_status(&mut self) -> Result<Fmi2Status, Fmi2Error> {
        let mut ret = binding::fmi2Status_fmi2OK;
        Fmi2Status(unsafe {
            self.binding.fmi2GetStatus(
                self.component,
                StatusKind::DoStepStatus.into(),
                &mut ret,
            )
        })
        .ok()
        .map(|_| Fmi2Status(ret))
    }

    fn pending_status(&mut self) -> Result<String, Fmi2Error> {
        let mut ret: binding::fmi2String = std::ptr::null();
        Fmi2Status(unsafe {
            self.binding.fmi2GetStringStatus(
                self.component,
                StatusKind::PendingStatus.into(),
                &mut ret,
            )
        })
        .ok()?;
        if ret.is_null() {
            Ok(String::new())
        } else {
            Ok(unsafe { CStr::from_ptr(ret) }.to_string_lossy().into_owned())
        }
    }

    fn last_successful_time(&mut self) -> Result<f64, Fmi2Error> {
        let mut ret = 0.0;
        Fmi2Status(unsafe {
            self.binding.fmi2GetRealStatus(
                self.component,
                StatusKind::LastSuccessfulTime.into(),
                &mut ret,
            )
        })
        .ok()
        .map(|_| ret)
    }

    fn terminated(&mut self) -> Result<bool, Fmi2Error> {
        let mut ret = binding::fmi2False;
        Fmi2Status(unsafe {
            self.binding.fmi2GetBooleanStatus(
                self.component,
                StatusKind::Terminated.into(),
                &mut ret,
            )
        })
        .ok()
        .map(|_| ret != 0)
    }
}
