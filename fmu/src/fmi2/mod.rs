//! FMI 2.0 API

pub mod import;
pub mod instance;
// Re-export
pub use fmu_schema::fmi2 as schema;
pub use fmu_sys::fmi2 as binding;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct CallbackFunctions {
    pub logger: binding::fmi2CallbackLogger,
    pub allocate_memory: binding::fmi2CallbackAllocateMemory,
    pub free_memory: binding::fmi2CallbackFreeMemory,
    pub step_finished: binding::fmi2StepFinished,
    pub component_environment: binding::fmi2ComponentEnvironment,
}

impl Default for CallbackFunctions {
    fn default() -> Self {
        CallbackFunctions {
            logger: Some(binding::logger::callback_logger_handler as _),
            allocate_memory: Some(libc::calloc),
            free_memory: Some(libc::free),
            step_finished: None,
            component_environment: std::ptr::null_mut::<std::os::raw::c_void>(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Can be called when the fmi2DoStep function returned fmi2Pending. The function delivers
    /// fmi2Pending if the computation is not finished. Otherwise the function returns the result
    /// of the asynchronously executed fmi2DoStep call
    DoStepStatus = binding::fmi2StatusKind_fmi2DoStepStatus as _,
    /// Can be called when the fmi2DoStep function returned fmi2Pending. The function delivers a
    /// string which informs about the status of the currently running asynchronous fmi2DoStep
    /// computation.
    PendingStatus = binding::fmi2StatusKind_fmi2PendingStatus as _,
    /// Returns the end time of the last successfully completed communication step. Can be called
    /// after fmi2DoStep(...) returned fmi2Discard.
    LastSuccessfulTime = binding::fmi2StatusKind_fmi2LastSuccessfulTime as _,
    /// Returns true, if the slave wants to terminate the simulation. Can be called after
    /// fmi2DoStep(...) returned fmi2Discard. Use fmi2LastSuccessfulTime to determine the time
    /// instant at which the slave terminated
    Terminated = binding::fmi2StatusKind_fmi2Terminated as _,
}

impl From<StatusKind> for binding::fmi2StatusKind {
    fn from(kind: StatusKind) -> Self {
        kind as binding::fmi2StatusKind
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fmi2Res {
    /// All well
    OK,
    /// Things are not quite right, but the computation can continue. Function “logger” was called
    /// in the model, and it is expected that this function has shown the prepared information
    /// message to the user.
    Warning,
    /// This status is returned only from the co-simulation interface, if the slave executes the
    /// function in an asynchronous way. That means the slave starts to compute but returns
    /// immediately.
    ///
    /// The master has to call [`instance::CoSimulation::do_step_status`] to determine if the slave
    /// has finished the computation.
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Fmi2Error {
    #[error("TypesPlatform of loaded API ({0}) doesn't match expected (default)")]
    TypesPlatformMismatch(String),

    /// For “model exchange”: It is recommended to perform a smaller step size and evaluate the
    /// model equations again. For “co-simulation”: the slave could not complete the step, or is
    /// not able to return the required status information. The master has to decide if the
    /// simulation run can be continued.
    #[error("Discard")]
    Discard,
    /// The FMU encountered an error. The simulation cannot be continued with this FMU instance.
    #[error("Error")]
    Error,
    /// The model computations are irreparably corrupted for all FMU instances.
    #[error("Fatal")]
    Fatal,
    /// The FMU returned a value outside of the `fmi2Status` enumeration.
    #[error("Invalid status {0}")]
    InvalidStatus(binding::fmi2Status),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fmi2Status(pub(crate) binding::fmi2Status);

impl Fmi2Status {
    /// Convert to [`Result<Fmi2Res, Fmi2Error>`]
    #[inline]
    pub fn ok(self) -> Result<Fmi2Res, Fmi2Error> {
        self.into()
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.0 == binding::fmi2Status_fmi2Error || self.0 == binding::fmi2Status_fmi2Fatal
    }
}

impl From<binding::fmi2Status> for Fmi2Status {
    fn from(status: binding::fmi2Status) -> Self {
        Self(status)
    }
}

impl From<Fmi2Status> for Result<Fmi2Res, Fmi2Error> {
    fn from(Fmi2Status(status): Fmi2Status) -> Self {
        match status {
            binding::fmi2Status_fmi2OK => Ok(Fmi2Res::OK),
            binding::fmi2Status_fmi2Warning => {
                log::warn!("FMU returned fmi2Warning");
                Ok(Fmi2Res::Warning)
            }
            binding::fmi2Status_fmi2Pending => Ok(Fmi2Res::Pending),
            binding::fmi2Status_fmi2Discard => Err(Fmi2Error::Discard),
            binding::fmi2Status_fmi2Error => Err(Fmi2Error::Error),
            binding::fmi2Status_fmi2Fatal => Err(Fmi2Error::Fatal),
            other => Err(Fmi2Error::InvalidStatus(other)),
        }
    }
}

impl From<Fmi2Res> for Fmi2Status {
    fn from(res: Fmi2Res) -> Self {
        Self(match res {
            Fmi2Res::OK => binding::fmi2Status_fmi2OK,
            Fmi2Res::Warning => binding::fmi2Status_fmi2Warning,
            Fmi2Res::Pending => binding::fmi2Status_fmi2Pending,
        })
    }
}

impl From<Fmi2Error> for Fmi2Status {
    fn from(err: Fmi2Error) -> Self {
        Self(match err {
            Fmi2Error::Discard => binding::fmi2Status_fmi2Discard,
            Fmi2Error::Fatal => binding::fmi2Status_fmi2Fatal,
            Fmi2Error::InvalidStatus(status) => status,
            Fmi2Error::TypesPlatformMismatch(_) | Fmi2Error::Error => binding::fmi2Status_fmi2Error,
        })
    }
}

impl From<Result<Fmi2Res, Fmi2Error>> for Fmi2Status {
    fn from(res: Result<Fmi2Res, Fmi2Error>) -> Self {
        match res {
            Ok(res) => res.into(),
            Err(err) => err.into(),
        }
    }
}

impl From<Fmi2Status> for binding::fmi2Status {
    fn from(Fmi2Status(status): Fmi2Status) -> Self {
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(Fmi2Status(binding::fmi2Status_fmi2OK).ok(), Ok(Fmi2Res::OK));
        assert_eq!(
            Fmi2Status(binding::fmi2Status_fmi2Warning).ok(),
            Ok(Fmi2Res::Warning)
        );
        assert_eq!(
            Fmi2Status(binding::fmi2Status_fmi2Pending).ok(),
            Ok(Fmi2Res::Pending)
        );
        assert_eq!(
            Fmi2Status(binding::fmi2Status_fmi2Discard).ok(),
            Err(Fmi2Error::Discard)
        );
        assert_eq!(
            Fmi2Status(binding::fmi2Status_fmi2Fatal).ok(),
            Err(Fmi2Error::Fatal)
        );
        assert_eq!(Fmi2Status(42).ok(), Err(Fmi2Error::InvalidStatus(42)));
        assert!(Fmi2Status(binding::fmi2Status_fmi2Error).is_error());
        assert!(!Fmi2Status(binding::fmi2Status_fmi2Discard).is_error());
    }

    #[test]
    fn test_status_from_result() {
        for res in [Ok(Fmi2Res::OK), Ok(Fmi2Res::Warning), Err(Fmi2Error::Discard)] {
            assert_eq!(Fmi2Status::from(res.clone()).ok(), res);
        }
        let status: binding::fmi2Status = Fmi2Status::from(Err(Fmi2Error::Error)).into();
        assert_eq!(status, binding::fmi2Status_fmi2Error);
    }
}
