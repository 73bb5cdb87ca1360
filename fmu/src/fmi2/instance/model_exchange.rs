use super::{traits::ModelExchange, Instance, ME};
use crate::{
    fmi2::{binding, Fmi2Error, Fmi2Res, Fmi2Status},
    EventFlags,
};

impl<'a> ModelExchange for Instance<'a, ME> {
    fn enter_event_mode(&mut self) -> Result<Fmi2Res, Fmi2Error> {
        Fmi2Status::from(unsafe { self.binding.fmi2EnterEventMode(self.component) }).ok()
    }

    fn new_discrete_states(&mut self, event_flags: &mut EventFlags) -> Result<Fmi2Res, Fmi2Error> {
        let mut event_info = binding::fmi2EventInfo::default();
        let result = Fmi2Status::from(unsafe {
            self.binding.fmi2NewDiscreteStates(self.component, &mut event_info)
        })
        .ok()?;
        event_flags.update_from_fmi2_event_info(event_info);
        Ok(result)
    }

    fn enter_continuous_time_mode(&mut self) -> Result<Fmi2Res, Fmi2Error> {
        Fmi2Status::from(unsafe { self.binding.fmi2EnterContinuousTimeMode(self.component) })
            .ok()
    }

    fn completed_integrator_step(
        &mut self,
        no_set_fmu_state_prior: bool,
    ) -> Result<(bool, bool), Fmi2Error> {
        let mut enter_event_mode = binding::fmi2False;
        let mut terminate_simulation = binding::fmi2False;
        Fmi2Status::from(unsafe {
            self.binding.fmi2CompletedIntegratorStep(
                self.component,
                no_set_fmu_state_prior as _,
                &mut enter_event_mode,
                &mut terminate_simulation,
            )
        })
        .ok()?;
        Ok((enter_event_mode != 0, terminate_simulation != 0))
    }

    fn set_time(&mut self, time: f64) -> Result<Fmi2Res, Fmi2Error> {
        Fmi2Status::from(unsafe { self.binding.fmi2SetTime(self.component, time) }).ok()
    }

    fn set_continuous_states(&mut self, states: &[f64]) -> Result<Fmi2Res, Fmi2Error> {
        Fmi2Status::from(unsafe {
            self.binding.fmi2SetContinuousStates(self.component, states.as_ptr(), states.len())
        })
        .ok()
    }

    fn get_derivatives(&mut self, dx: &mut [f64]) -> Result<Fmi2Res, Fmi2Error> {
        Fmi2Status::from(unsafe {
            self.binding.fmi2GetDerivatives(self.component, dx.as_mut_ptr(), dx.len())
        })
        .ok()
    }

    fn get_event_indicators(&mut self, events: &mut [f64]) -> Result<Fmi2Res, Fmi2Error> {
        Fmi2Status::from(unsafe {
            self.binding.fmi2GetEventIndicators(self.component, events.as_mut_ptr(), events.len())
        })
        .ok()
    }

    fn get_continuous_states(&mut self, x: &mut [f64]) -> Result<Fmi2Res, Fmi2Error> {
        Fmi2Status::from(unsafe {
            self.binding.fmi2GetContinuousStates(self.component, x.as_mut_ptr(), x.len())
        })
        .ok()
    }

    fn get_nominals_of_continuous_states(
        &mut self,
        x_nominal: &mut [f64],
    ) -> Result<Fmi2Res, Fmi2Error> {
        Fmi2Status::from(unsafe {
            self.binding.fmi2GetNominalsOfContinuousStates(
                self.component,
                x_nominal.as_mut_ptr(),
                x_nominal.len(),
            )
        })
        .ok()
    }
}
