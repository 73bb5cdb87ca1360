use std::fmt::Display;

use fmu::fmi2::{
    schema::{Causality, Variability},
    Fmi2Error, Fmi2Res, Fmi2Status,
};

use super::{
    traits::{Model, ModelError, StepResult, UserModel, Variable},
    ModelState, LOG_CATEGORY_ERROR, LOG_CATEGORY_EVENTS,
};

/// Forwards a message to the importer's `fmi2CallbackLogger`.
pub type LogMessageClosure = Box<dyn Fn(Fmi2Status, &str, std::fmt::Arguments<'_>)>;

/// One instantiated Co-Simulation slave.
pub struct ModelInstance<M> {
    instance_name: String,
    state: ModelState,
    logging_on: bool,
    log_message: LogMessageClosure,
    variables: Vec<Variable>,
    start_time: f64,
    time: f64,
    last_successful_time: f64,
    terminated: bool,
    model: M,
}

impl<M> std::fmt::Debug for ModelInstance<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelInstance")
            .field("instance_name", &self.instance_name)
            .field("state", &self.state)
            .field("time", &self.time)
            .finish()
    }
}

impl<M: UserModel> ModelInstance<M> {
    /// Fails if `guid` does not match [`Model::GUID`].
    pub fn new(
        instance_name: String,
        guid: &str,
        logging_on: bool,
        log_message: LogMessageClosure,
    ) -> Result<Self, Fmi2Error> {
        let instance = Self {
            instance_name,
            state: ModelState::Instantiated,
            logging_on,
            log_message,
            variables: M::variables(),
            start_time: 0.0,
            time: 0.0,
            last_successful_time: 0.0,
            terminated: false,
            model: M::default(),
        };

        if guid != M::GUID {
            instance.log_error(
                "fmi2Instantiate",
                format_args!("GUID {guid} does not match {}", M::GUID),
            );
            return Err(Fmi2Error::Error);
        }

        instance.log_event(format_args!("fmi2Instantiate: {}", M::MODEL_NAME));
        Ok(instance)
    }

    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    pub fn state(&self) -> ModelState {
        self.state
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn last_successful_time(&self) -> f64 {
        self.last_successful_time
    }

    /// Whether the model asked to end the simulation.
    pub fn terminated(&self) -> bool {
        self.terminated
    }

    fn log_event(&self, args: std::fmt::Arguments<'_>) {
        if self.logging_on {
            (self.log_message)(Fmi2Res::OK.into(), LOG_CATEGORY_EVENTS, args);
        }
        #[cfg(feature = "log-mirror")]
        log::trace!("{}: {args}", self.instance_name);
    }

    /// Errors are reported whether or not debug logging is on.
    fn log_error(&self, function: &str, args: std::fmt::Arguments<'_>) {
        (self.log_message)(
            Fmi2Error::Error.into(),
            LOG_CATEGORY_ERROR,
            format_args!("{function}: {args}"),
        );
        #[cfg(feature = "log-mirror")]
        log::error!("{}: {function}: {args}", self.instance_name);
    }

    fn fail(&self, function: &str, err: impl Display) -> Fmi2Error {
        self.log_error(function, format_args!("{err}"));
        Fmi2Error::Error
    }

    fn check_state(&self, function: &str, allowed: &[ModelState]) -> Result<(), Fmi2Error> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            let state = self.state;
            Err(self.fail(function, format_args!("Illegal call sequence in state {state:?}")))
        }
    }

    pub fn set_debug_logging(
        &mut self,
        logging_on: bool,
        categories: &[&str],
    ) -> Result<Fmi2Res, Fmi2Error> {
        if let Some(unknown) = categories
            .iter()
            .find(|c| **c != LOG_CATEGORY_EVENTS && **c != LOG_CATEGORY_ERROR)
        {
            return Err(self.fail(
                "fmi2SetDebugLogging",
                format_args!("Unknown log category {unknown}"),
            ));
        }
        self.logging_on = logging_on;
        self.log_event(format_args!("fmi2SetDebugLogging: {logging_on}"));
        Ok(Fmi2Res::OK)
    }

    pub fn setup_experiment(
        &mut self,
        start_time: f64,
        stop_time: Option<f64>,
    ) -> Result<Fmi2Res, Fmi2Error> {
        self.check_state("fmi2SetupExperiment", &[ModelState::Instantiated])?;
        if stop_time.is_some_and(|stop| stop < start_time) {
            return Err(self.fail(
                "fmi2SetupExperiment",
                format_args!("Stop time is before start time {start_time}"),
            ));
        }
        self.start_time = start_time;
        self.time = start_time;
        self.log_event(format_args!("fmi2SetupExperiment: start = {start_time}"));
        Ok(Fmi2Res::OK)
    }

    pub fn enter_initialization_mode(&mut self) -> Result<Fmi2Res, Fmi2Error> {
        self.check_state("fmi2EnterInitializationMode", &[ModelState::Instantiated])?;
        self.state = ModelState::InitializationMode;
        self.log_event(format_args!("fmi2EnterInitializationMode"));
        Ok(Fmi2Res::OK)
    }

    pub fn exit_initialization_mode(&mut self) -> Result<Fmi2Res, Fmi2Error> {
        self.check_state(
            "fmi2ExitInitializationMode",
            &[ModelState::InitializationMode],
        )?;
        if let Err(err) = self.model.initialize(self.start_time) {
            self.state = ModelState::Error;
            return Err(self.fail("fmi2ExitInitializationMode", err));
        }
        self.last_successful_time = self.start_time;
        self.state = ModelState::StepComplete;
        self.log_event(format_args!("fmi2ExitInitializationMode"));
        Ok(Fmi2Res::OK)
    }

    pub fn terminate(&mut self) -> Result<Fmi2Res, Fmi2Error> {
        self.check_state(
            "fmi2Terminate",
            &[ModelState::StepComplete, ModelState::StepDiscarded],
        )?;
        self.state = ModelState::Terminated;
        self.log_event(format_args!("fmi2Terminate"));
        Ok(Fmi2Res::OK)
    }

    /// Back to the freshly instantiated state with default values.
    pub fn reset(&mut self) -> Result<Fmi2Res, Fmi2Error> {
        self.model = M::default();
        self.state = ModelState::Instantiated;
        self.start_time = 0.0;
        self.time = 0.0;
        self.last_successful_time = 0.0;
        self.terminated = false;
        self.log_event(format_args!("fmi2Reset"));
        Ok(Fmi2Res::OK)
    }

    fn variable(&self, vr: u32, type_name: &str) -> Result<&Variable, ModelError> {
        self.variables
            .iter()
            .find(|v| v.value_reference == vr && v.start.type_name() == type_name)
            .ok_or(ModelError::UnknownValueReference(vr))
    }

    /// Causality rules for setting a variable in the current state.
    fn check_settable(&self, vr: u32, type_name: &str) -> Result<(), ModelError> {
        let var = self.variable(vr, type_name)?;
        let before_init_end = matches!(
            self.state,
            ModelState::Instantiated | ModelState::InitializationMode
        );
        let settable = match (var.causality, var.variability) {
            (_, Variability::Constant) => false,
            (Causality::Parameter, Variability::Tunable) | (Causality::Input, _) => {
                before_init_end || self.state == ModelState::StepComplete
            }
            (Causality::Parameter, _) => before_init_end,
            _ => false,
        };
        if settable {
            Ok(())
        } else {
            Err(ModelError::NotSettable {
                name: var.name,
                vr,
                when: if before_init_end {
                    "at all"
                } else {
                    "after initialization"
                },
            })
        }
    }

    fn get_values<T>(
        &mut self,
        function: &str,
        vrs: &[u32],
        values: &mut [T],
        get: impl Fn(&M, u32) -> Option<T>,
    ) -> Result<Fmi2Res, Fmi2Error> {
        self.check_state(
            function,
            &[
                ModelState::InitializationMode,
                ModelState::StepComplete,
                ModelState::StepDiscarded,
                ModelState::Terminated,
                ModelState::Error,
            ],
        )?;
        for (vr, value) in vrs.iter().zip(values.iter_mut()) {
            match get(&self.model, *vr) {
                Some(v) => *value = v,
                None => {
                    return Err(self.fail(function, ModelError::UnknownValueReference(*vr)));
                }
            }
        }
        Ok(Fmi2Res::OK)
    }

    fn set_values<T: Copy>(
        &mut self,
        function: &str,
        type_name: &str,
        vrs: &[u32],
        values: &[T],
        set: impl Fn(&mut M, u32, T) -> Result<(), ModelError>,
    ) -> Result<Fmi2Res, Fmi2Error> {
        self.check_state(
            function,
            &[
                ModelState::Instantiated,
                ModelState::InitializationMode,
                ModelState::StepComplete,
            ],
        )?;
        for (vr, value) in vrs.iter().zip(values) {
            if let Err(err) = self
                .check_settable(*vr, type_name)
                .and_then(|_| set(&mut self.model, *vr, *value))
            {
                return Err(self.fail(function, err));
            }
        }
        Ok(Fmi2Res::OK)
    }

    pub fn get_real(&mut self, vrs: &[u32], values: &mut [f64]) -> Result<Fmi2Res, Fmi2Error> {
        self.get_values("fmi2GetReal", vrs, values, M::get_real)
    }

    pub fn get_integer(&mut self, vrs: &[u32], values: &mut [i32]) -> Result<Fmi2Res, Fmi2Error> {
        self.get_values("fmi2GetInteger", vrs, values, M::get_integer)
    }

    pub fn get_boolean(&mut self, vrs: &[u32], values: &mut [bool]) -> Result<Fmi2Res, Fmi2Error> {
        self.get_values("fmi2GetBoolean", vrs, values, M::get_boolean)
    }

    pub fn set_real(&mut self, vrs: &[u32], values: &[f64]) -> Result<Fmi2Res, Fmi2Error> {
        self.set_values("fmi2SetReal", "Real", vrs, values, M::set_real)
    }

    pub fn set_integer(&mut self, vrs: &[u32], values: &[i32]) -> Result<Fmi2Res, Fmi2Error> {
        self.set_values("fmi2SetInteger", "Integer", vrs, values, M::set_integer)
    }

    pub fn set_boolean(&mut self, vrs: &[u32], values: &[bool]) -> Result<Fmi2Res, Fmi2Error> {
        self.set_values("fmi2SetBoolean", "Boolean", vrs, values, M::set_boolean)
    }

    /// String variables are not supported; any value reference is unknown.
    pub fn reject_strings(&mut self, function: &str, vrs: &[u32]) -> Result<Fmi2Res, Fmi2Error> {
        match vrs.first() {
            Some(vr) => Err(self.fail(function, ModelError::UnknownValueReference(*vr))),
            None => Ok(Fmi2Res::OK),
        }
    }

    pub fn do_step(
        &mut self,
        current_communication_point: f64,
        step_size: f64,
    ) -> Result<Fmi2Res, Fmi2Error> {
        self.check_state("fmi2DoStep", &[ModelState::StepComplete])?;
        if step_size.is_nan() || step_size <= 0.0 {
            return Err(self.fail(
                "fmi2DoStep",
                format_args!("Communication step size {step_size} must be positive"),
            ));
        }

        match self.model.do_step(current_communication_point, step_size) {
            Ok(StepResult::Completed) => {
                self.time = current_communication_point + step_size;
                self.last_successful_time = self.time;
                Ok(Fmi2Res::OK)
            }
            Ok(StepResult::Terminated { time }) => {
                self.time = time;
                self.last_successful_time = time;
                self.terminated = true;
                self.state = ModelState::StepDiscarded;
                self.log_event(format_args!("fmi2DoStep: terminated at t = {time}"));
                Err(Fmi2Error::Discard)
            }
            Err(err) => {
                self.state = ModelState::Error;
                Err(self.fail("fmi2DoStep", err))
            }
        }
    }

    fn check_status_query(&self, function: &str) -> Result<(), Fmi2Error> {
        self.check_state(
            function,
            &[
                ModelState::StepComplete,
                ModelState::StepDiscarded,
                ModelState::Terminated,
            ],
        )
    }

    /// `fmi2LastSuccessfulTime`
    pub fn real_status_last_successful_time(&mut self) -> Result<f64, Fmi2Error> {
        self.check_status_query("fmi2GetRealStatus")?;
        Ok(self.last_successful_time)
    }

    /// `fmi2Terminated`
    pub fn boolean_status_terminated(&mut self) -> Result<bool, Fmi2Error> {
        self.check_status_query("fmi2GetBooleanStatus")?;
        Ok(self.terminated)
    }

    /// Steps never run asynchronously, so there is nothing to cancel or query.
    pub fn no_pending_step(&self, function: &str) -> Fmi2Error {
        self.fail(function, "No asynchronous step is pending")
    }

    pub fn unsupported(&self, function: &str) -> Fmi2Error {
        self.fail(function, "Not supported by this FMU")
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::fmi2::Start;

    /// y = k * u, integrating u into x
    #[derive(Default)]
    struct Gain {
        k: f64,
        u: f64,
        x: f64,
        steps: i32,
        stop_at: Option<f64>,
    }

    impl Model for Gain {
        const MODEL_NAME: &'static str = "Gain";
        const MODEL_IDENTIFIER: &'static str = "gain";
        const GUID: &'static str = "{gain}";

        fn variables() -> Vec<Variable> {
            vec![
                Variable::real("k", 0)
                    .causality(Causality::Parameter)
                    .variability(Variability::Fixed)
                    .start(Start::Real(Some(0.0))),
                Variable::real("u", 1)
                    .causality(Causality::Input)
                    .start(Start::Real(Some(0.0))),
                Variable::real("x", 2).causality(Causality::Output),
                Variable::integer("steps", 0).causality(Causality::Output),
            ]
        }

        fn get_real(&self, vr: u32) -> Option<f64> {
            match vr {
                0 => Some(self.k),
                1 => Some(self.u),
                2 => Some(self.x),
                _ => None,
            }
        }

        fn get_integer(&self, vr: u32) -> Option<i32> {
            (vr == 0).then_some(self.steps)
        }

        fn set_real(&mut self, vr: u32, value: f64) -> Result<(), ModelError> {
            match vr {
                0 => self.k = value,
                1 => self.u = value,
                _ => return Err(ModelError::UnknownValueReference(vr)),
            }
            Ok(())
        }
    }

    impl UserModel for Gain {
        fn do_step(&mut self, time: f64, step_size: f64) -> Result<StepResult, ModelError> {
            if let Some(stop) = self.stop_at.filter(|stop| *stop < time + step_size) {
                return Ok(StepResult::Terminated { time: stop });
            }
            self.x += self.k * self.u * step_size;
            self.steps += 1;
            Ok(StepResult::Completed)
        }
    }

    type Messages = Rc<RefCell<Vec<(Fmi2Status, String, String)>>>;

    fn instance(logging_on: bool) -> (ModelInstance<Gain>, Messages) {
        let messages = Messages::default();
        let sink = messages.clone();
        let log: LogMessageClosure = Box::new(move |status, category, args| {
            sink.borrow_mut()
                .push((status, category.to_owned(), args.to_string()));
        });
        let inst = ModelInstance::<Gain>::new("inst".to_owned(), Gain::GUID, logging_on, log)
            .unwrap();
        (inst, messages)
    }

    fn initialized() -> ModelInstance<Gain> {
        let (mut inst, _) = instance(false);
        inst.setup_experiment(0.0, None).unwrap();
        inst.enter_initialization_mode().unwrap();
        inst.exit_initialization_mode().unwrap();
        inst
    }

    #[test]
    fn test_guid_mismatch() {
        let messages = Messages::default();
        let sink = messages.clone();
        let log: LogMessageClosure = Box::new(move |status, category, args| {
            sink.borrow_mut()
                .push((status, category.to_owned(), args.to_string()));
        });
        let res = ModelInstance::<Gain>::new("inst".to_owned(), "{other}", false, log);
        assert_eq!(res.unwrap_err(), Fmi2Error::Error);
        let messages = messages.borrow();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].1, LOG_CATEGORY_ERROR);
        assert!(messages[0].2.contains("{other}"));
    }

    #[test]
    fn test_event_logging_follows_debug_flag() {
        let (mut inst, messages) = instance(false);
        inst.setup_experiment(0.0, None).unwrap();
        assert!(messages.borrow().is_empty());

        inst.set_debug_logging(true, &[LOG_CATEGORY_EVENTS]).unwrap();
        inst.enter_initialization_mode().unwrap();
        assert!(messages
            .borrow()
            .iter()
            .any(|(_, cat, msg)| cat == LOG_CATEGORY_EVENTS && msg == "fmi2EnterInitializationMode"));

        assert_eq!(
            inst.set_debug_logging(true, &["logEverything"]),
            Err(Fmi2Error::Error)
        );
    }

    #[test]
    fn test_call_sequence() {
        let (mut inst, _) = instance(false);
        assert_eq!(inst.do_step(0.0, 0.1), Err(Fmi2Error::Error));
        assert_eq!(inst.exit_initialization_mode(), Err(Fmi2Error::Error));
        let mut x = [0.0];
        assert_eq!(inst.get_real(&[2], &mut x), Err(Fmi2Error::Error));
        assert_eq!(inst.state(), ModelState::Instantiated);

        let mut inst = initialized();
        assert_eq!(inst.state(), ModelState::StepComplete);
        assert_eq!(inst.setup_experiment(0.0, None), Err(Fmi2Error::Error));
        inst.terminate().unwrap();
        assert_eq!(inst.do_step(0.0, 0.1), Err(Fmi2Error::Error));
        inst.reset().unwrap();
        assert_eq!(inst.state(), ModelState::Instantiated);
    }

    #[test]
    fn test_set_rules() {
        let (mut inst, _) = instance(false);
        inst.set_real(&[0, 1], &[2.0, 3.0]).unwrap();
        assert_eq!(inst.set_real(&[2], &[1.0]), Err(Fmi2Error::Error));
        assert_eq!(inst.set_real(&[7], &[1.0]), Err(Fmi2Error::Error));
        // vr 0 is an Integer output, not the Real parameter
        assert_eq!(inst.set_integer(&[0], &[1]), Err(Fmi2Error::Error));

        inst.setup_experiment(0.0, None).unwrap();
        inst.enter_initialization_mode().unwrap();
        inst.exit_initialization_mode().unwrap();

        // Fixed parameters are frozen, inputs are not
        assert_eq!(inst.set_real(&[0], &[5.0]), Err(Fmi2Error::Error));
        inst.set_real(&[1], &[4.0]).unwrap();
        assert_eq!(inst.model().k, 2.0);
        assert_eq!(inst.model().u, 4.0);
    }

    #[test]
    fn test_step() {
        let (mut inst, _) = instance(false);
        // k is fixed after initialization
        inst.set_real(&[0], &[2.0]).unwrap();
        inst.setup_experiment(1.0, None).unwrap();
        inst.enter_initialization_mode().unwrap();
        inst.exit_initialization_mode().unwrap();
        inst.set_real(&[1], &[1.0]).unwrap();
        assert_eq!(inst.real_status_last_successful_time(), Ok(1.0));

        inst.do_step(1.0, 0.5).unwrap();
        inst.do_step(1.5, 0.5).unwrap();
        let (mut x, mut steps) = ([0.0], [0]);
        inst.get_real(&[2], &mut x).unwrap();
        inst.get_integer(&[0], &mut steps).unwrap();
        assert_eq!(x[0], 2.0);
        assert_eq!(steps[0], 2);
        assert_eq!(inst.time(), 2.0);
        assert_eq!(inst.do_step(2.0, 0.0), Err(Fmi2Error::Error));
        assert_eq!(inst.do_step(2.0, f64::NAN), Err(Fmi2Error::Error));
    }

    #[test]
    fn test_step_terminated() {
        let mut inst = initialized();
        inst.model.stop_at = Some(0.15);
        inst.do_step(0.0, 0.1).unwrap();
        assert_eq!(inst.do_step(0.1, 0.1), Err(Fmi2Error::Discard));
        assert_eq!(inst.state(), ModelState::StepDiscarded);
        assert_eq!(inst.boolean_status_terminated(), Ok(true));
        assert_eq!(inst.real_status_last_successful_time(), Ok(0.15));

        // No further steps, but outputs stay readable until terminated
        assert_eq!(inst.do_step(0.15, 0.1), Err(Fmi2Error::Error));
        let mut x = [0.0];
        inst.get_real(&[2], &mut x).unwrap();
        inst.terminate().unwrap();
    }

    #[test]
    fn test_strings_rejected() {
        let mut inst = initialized();
        assert_eq!(inst.reject_strings("fmi2GetString", &[]), Ok(Fmi2Res::OK));
        assert_eq!(
            inst.reject_strings("fmi2GetString", &[0]),
            Err(Fmi2Error::Error)
        );
    }
}
