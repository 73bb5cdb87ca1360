//! Traits for different instance types ([ModelExchange], [CoSimulation]).

use crate::{
    fmi2::{Fmi2Error, Fmi2Res},
    traits::FmiInstance,
    EventFlags,
};

use crate::fmi2::{binding, Fmi2Status};

/// Interface common to both ModelExchange and CoSimulation
pub trait Common: FmiInstance {
    /// The FMI-standard version string
    fn get_version(&self) -> &str;

    fn get_types_platform(&self) -> &str;

    fn set_debug_logging(
        &mut self,
        logging_on: bool,
        categories: &[&str],
    ) -> Result<Fmi2Res, Fmi2Error>;

    /// Informs the FMU to setup the experiment. This function can be called after `instantiate()`
    /// and before `enter_initialization_mode()` is called.
    ///
    /// ## Tolerance control
    /// * Under ModelExchange: If tolerance = Some(..) then the model is called with a numerical
    ///   integration scheme where the step size is controlled by using `tolerance` for error
    ///   estimation (usually as relative tolerance).
    /// * Under CoSimulation: If tolerance = Some(..) then the communication interval of the slave
    ///   is controlled by error estimation. An FMU for Co-Simulation might ignore this argument.
    ///
    /// ## Start and Stop times
    /// The arguments `start_time` and `stop_time` can be used to check whether the model is valid
    /// within the given boundaries. If `stop_time` is `Some(..)`, and the environment tries to
    /// compute past `stop_time` the FMU has to return `Error`. If `stop_time` is `None()`, then no
    /// final value of the independent variable is defined.
    fn setup_experiment(
        &mut self,
        tolerance: Option<f64>,
        start_time: f64,
        stop_time: Option<f64>,
    ) -> Result<Fmi2Res, Fmi2Error>;

    /// Informs the FMU to enter Initialization Mode.
    ///
    /// Before calling this function, all variables with attribute
    /// `<ScalarVariable initial = "exact" or "approx">` can be set with the `set()` function.
    /// *Setting other variables is not allowed*. Furthermore, `setup_experiment()` must be called
    /// at least once before calling `enter_initialization_mode()`, in order that `start_time` is
    /// defined.
    fn enter_initialization_mode(&mut self) -> Result<Fmi2Res, Fmi2Error>;

    /// Informs the FMU to exit Initialization Mode.
    ///
    /// Under ModelExchange this function switches off all initialization equations and the FMU
    /// enters implicitely Event Mode, that is all continuous-time and active discrete-time
    /// equations are available.
    fn exit_initialization_mode(&mut self) -> Result<Fmi2Res, Fmi2Error>;

    /// Informs the FMU that the simulation run is terminated.
    ///
    /// After calling this function, the final values of all variables can be inquired with the
    /// fmi2GetXXX(..) functions. It is not allowed to call this function after one of the
    /// functions returned with a status flag of fmi2Error or fmi2Fatal.
    fn terminate(&mut self) -> Result<Fmi2Res, Fmi2Error>;

    /// Is called by the environment to reset the FMU after a simulation run.
    ///
    /// The FMU goes into the same state as if fmi2Instantiate would have been called.
    fn reset(&mut self) -> Result<Fmi2Res, Fmi2Error>;

    fn get_real(
        &mut self,
        sv: &[binding::fmi2ValueReference],
        v: &mut [binding::fmi2Real],
    ) -> Result<Fmi2Res, Fmi2Error>;

    fn get_integer(
        &mut self,
        sv: &[binding::fmi2ValueReference],
        v: &mut [binding::fmi2Integer],
    ) -> Result<Fmi2Res, Fmi2Error>;

    fn get_boolean(
        &mut self,
        sv: &[binding::fmi2ValueReference],
        v: &mut [binding::fmi2Boolean],
    ) -> Result<Fmi2Res, Fmi2Error>;

    /// Get string values. The strings are copied out of FMU-owned memory.
    fn get_string(
        &mut self,
        sv: &[binding::fmi2ValueReference],
        v: &mut [String],
    ) -> Result<Fmi2Res, Fmi2Error>;

    /// Set real values
    ///
    /// # Arguments
    /// * `vrs` - a slice of `fmi2ValueReference` ValueReferences
    /// * `values` - a slice of `fmi2Real` values to set
    fn set_real(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        values: &[binding::fmi2Real],
    ) -> Result<Fmi2Res, Fmi2Error>;

    /// Set integer values
    ///
    /// # Arguments
    /// * `vrs` - a slice of `fmi2ValueReference` ValueReferences
    /// * `values` - a slice of `fmi2Integer` values to set
    fn set_integer(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        values: &[binding::fmi2Integer],
    ) -> Result<Fmi2Res, Fmi2Error>;

    fn set_boolean(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        values: &[binding::fmi2Boolean],
    ) -> Result<Fmi2Res, Fmi2Error>;

    fn set_string(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        values: &[std::ffi::CString],
    ) -> Result<Fmi2Res, Fmi2Error>;
}

pub trait ModelExchange: Common {
    /// The model enters Event Mode from the Continuous-Time Mode and discrete-time equations may
    /// become active (and relations are not “frozen”).
    fn enter_event_mode(&mut self) -> Result<Fmi2Res, Fmi2Error>;

    /// The FMU is in Event Mode and the super dense time is incremented by this call. If the
    /// super dense time before a call to `new_discrete_states` was (tR, tI), then the time
    /// instant after the call is (tR, tI + 1).
    ///
    /// If `event_flags.discrete_states_need_update` comes back true, the FMU should stay in
    /// Event Mode and the function should be called again.
    fn new_discrete_states(&mut self, event_flags: &mut EventFlags) -> Result<Fmi2Res, Fmi2Error>;

    /// The model enters Continuous-Time Mode and all discrete-time equations become inactive and
    /// all relations are “frozen”.
    fn enter_continuous_time_mode(&mut self) -> Result<Fmi2Res, Fmi2Error>;

    /// This function must be called by the environment after every completed step of the
    /// integrator provided the capability flag `completedIntegratorStepNotNeeded = false`.
    ///
    /// Returns `(enter_event_mode, terminate_simulation)`.
    fn completed_integrator_step(
        &mut self,
        no_set_fmu_state_prior: bool,
    ) -> Result<(bool, bool), Fmi2Error>;

    /// Set a new time instant and re-initialize caching of variables that depend on time,
    /// provided the newly provided time value is different to the previously set time value
    /// (variables that depend solely on constants or parameters need not to be newly computed in
    /// the sequel, but the previously computed values can be reused).
    fn set_time(&mut self, time: f64) -> Result<Fmi2Res, Fmi2Error>;

    /// Set a new (continuous) state vector and re-initialize caching of variables that depend on
    /// the states. Argument nx is the length of vector x and is provided for checking purposes
    fn set_continuous_states(&mut self, states: &[f64]) -> Result<Fmi2Res, Fmi2Error>;

    /// Compute state derivatives and event indicators at the current time instant and for the
    /// current states.
    fn get_derivatives(&mut self, dx: &mut [f64]) -> Result<Fmi2Res, Fmi2Error>;

    /// A state event is triggered when the domain of an event indicator changes from zj > 0 to
    /// zj ≤ 0 or vice versa.
    fn get_event_indicators(&mut self, events: &mut [f64]) -> Result<Fmi2Res, Fmi2Error>;

    /// Return the new (continuous) state vector x.
    fn get_continuous_states(&mut self, x: &mut [f64]) -> Result<Fmi2Res, Fmi2Error>;

    /// Return the nominal values of the continuous states.
    fn get_nominals_of_continuous_states(
        &mut self,
        x_nominal: &mut [f64],
    ) -> Result<Fmi2Res, Fmi2Error>;
}

pub trait CoSimulation: Common {
    /// The computation of a time step is started.
    ///
    /// Depending on the internal state of the slave and the last call of `do_step(...)`, the slave
    /// has to decide which action is to be done before the step is computed.
    fn do_step(
        &mut self,
        current_communication_point: f64,
        communication_step_size: f64,
        new_step: bool,
    ) -> Result<Fmi2Res, Fmi2Error>;

    /// Can be called if `do_step` returned `Pending` in order to stop the current asynchronous
    /// execution.
    fn cancel_step(&mut self) -> Result<Fmi2Res, Fmi2Error>;

    /// Informs about the status of the currently running asynchronous `do_step` computation.
    fn do_step_status(&mut self) -> Result<Fmi2Status, Fmi2Error>;

    /// Returns a string which informs about the status of the currently running asynchronous
    /// `do_step` computation.
    fn pending_status(&mut self) -> Result<String, Fmi2Error>;

    /// Returns the end time of the last successfully completed communication step. Can be called
    /// after `do_step(...)` returned `Discard`.
    fn last_successful_time(&mut self) -> Result<f64, Fmi2Error>;

    /// Returns `true`, if the slave wants to terminate the simulation. Can be called after
    /// `do_step(...)` returned `Discard`. Use `last_successful_time()` to determine the time
    /// instant at which the slave terminated.
    fn terminated(&mut self) -> Result<bool, Fmi2Error>;
}
