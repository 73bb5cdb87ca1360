//! Generic implementations of the `fmi2*` C functions.
//!
//! [`crate::export_fmu`] instantiates these for a concrete model type. They are public so the
//! generated code can reach them, and are not meant to be called directly.

use std::{
    ffi::{c_char, CStr, CString},
    slice,
    sync::OnceLock,
};

use fmu::fmi2::{binding, Fmi2Error, Fmi2Res, Fmi2Status};

use super::{instance::LogMessageClosure, Model, ModelInstance, UserModel};

type Status = binding::fmi2Status;

fn status(res: Result<Fmi2Res, Fmi2Error>) -> Status {
    Fmi2Status::from(res).into()
}

/// Recover the instance behind `c`, or bail out with `fmi2Error`.
macro_rules! checked_deref {
    ($c:expr) => {{
        match unsafe { ($c as *mut ModelInstance<M>).as_mut() } {
            Some(instance) => instance,
            None => {
                log::error!("Invalid FMU instance");
                return binding::fmi2Status_fmi2Error;
            }
        }
    }};
}

/// A slice view of a C array; null or empty arrays become `&[]`.
unsafe fn c_slice<'a, T>(ptr: *const T, len: usize) -> &'a [T] {
    if ptr.is_null() || len == 0 {
        &[]
    } else {
        unsafe { slice::from_raw_parts(ptr, len) }
    }
}

unsafe fn c_slice_mut<'a, T>(ptr: *mut T, len: usize) -> &'a mut [T] {
    if ptr.is_null() || len == 0 {
        &mut []
    } else {
        unsafe { slice::from_raw_parts_mut(ptr, len) }
    }
}

unsafe fn c_str<'a>(ptr: binding::fmi2String) -> Option<&'a str> {
    if ptr.is_null() {
        None
    } else {
        unsafe { CStr::from_ptr(ptr) }.to_str().ok()
    }
}

pub fn get_types_platform() -> *const c_char {
    binding::fmi2TypesPlatform.as_ptr() as *const c_char
}

pub fn get_version() -> *const c_char {
    binding::fmi2Version.as_ptr() as *const c_char
}

/// Wrap the importer's variadic logger. Messages are passed through a `"%s"` format so that `%`
/// in them is printed verbatim.
fn log_closure(
    logger: binding::fmi2CallbackLogger,
    environment: binding::fmi2ComponentEnvironment,
    instance_name: &str,
) -> LogMessageClosure {
    let name = CString::new(instance_name).unwrap_or_default();
    Box::new(move |status: Fmi2Status, category: &str, args| {
        let Some(logger) = logger else {
            return;
        };
        let category = CString::new(category).unwrap_or_default();
        let message = CString::new(args.to_string()).unwrap_or_default();
        unsafe {
            logger(
                environment,
                name.as_ptr(),
                status.into(),
                category.as_ptr(),
                c"%s".as_ptr(),
                message.as_ptr(),
            )
        };
    })
}

/// # Safety
/// The string arguments must be null or valid C strings, `functions` null or valid for the
/// lifetime of the instance.
pub unsafe fn instantiate<M: UserModel>(
    instance_name: binding::fmi2String,
    fmu_type: binding::fmi2Type,
    fmu_guid: binding::fmi2String,
    logging_on: binding::fmi2Boolean,
    functions: *const binding::fmi2CallbackFunctions,
) -> binding::fmi2Component {
    let Some(functions) = (unsafe { functions.as_ref() }) else {
        log::error!("fmi2Instantiate: no callback functions");
        return std::ptr::null_mut();
    };
    let (Some(name), Some(guid)) = (unsafe { c_str(instance_name) }, unsafe { c_str(fmu_guid) })
    else {
        log::error!("fmi2Instantiate: missing instance name or GUID");
        return std::ptr::null_mut();
    };

    let log_message = log_closure(functions.logger, functions.componentEnvironment, name);
    if fmu_type != binding::fmi2Type_fmi2CoSimulation {
        log_message(
            Fmi2Error::Error.into(),
            super::LOG_CATEGORY_ERROR,
            format_args!("fmi2Instantiate: {} only supports Co-Simulation", M::MODEL_NAME),
        );
        return std::ptr::null_mut();
    }

    match ModelInstance::<M>::new(
        name.to_owned(),
        guid,
        logging_on != binding::fmi2False,
        log_message,
    ) {
        Ok(instance) => Box::into_raw(Box::new(instance)) as binding::fmi2Component,
        Err(_) => std::ptr::null_mut(),
    }
}

/// # Safety
/// `c` must be null or a pointer returned by [`instantiate`] for the same `M`.
pub unsafe fn free_instance<M: UserModel>(c: binding::fmi2Component) {
    if !c.is_null() {
        drop(unsafe { Box::from_raw(c as *mut ModelInstance<M>) });
    }
}

/// # Safety
/// `c` as for [`free_instance`]; `categories` must hold `n_categories` C strings.
pub unsafe fn set_debug_logging<M: UserModel>(
    c: binding::fmi2Component,
    logging_on: binding::fmi2Boolean,
    n_categories: usize,
    categories: *const binding::fmi2String,
) -> Status {
    let instance = checked_deref!(c);
    let categories = unsafe { c_slice(categories, n_categories) }
        .iter()
        .filter_map(|cat| unsafe { c_str(*cat) })
        .collect::<Vec<_>>();
    status(instance.set_debug_logging(logging_on != binding::fmi2False, &categories))
}

/// # Safety
/// `c` as for [`free_instance`].
pub unsafe fn setup_experiment<M: UserModel>(
    c: binding::fmi2Component,
    _tolerance_defined: binding::fmi2Boolean,
    _tolerance: binding::fmi2Real,
    start_time: binding::fmi2Real,
    stop_time_defined: binding::fmi2Boolean,
    stop_time: binding::fmi2Real,
) -> Status {
    let instance = checked_deref!(c);
    let stop_time = (stop_time_defined != binding::fmi2False).then_some(stop_time);
    status(instance.setup_experiment(start_time, stop_time))
}

/// # Safety
/// `c` as for [`free_instance`].
pub unsafe fn enter_initialization_mode<M: UserModel>(c: binding::fmi2Component) -> Status {
    status(checked_deref!(c).enter_initialization_mode())
}

/// # Safety
/// `c` as for [`free_instance`].
pub unsafe fn exit_initialization_mode<M: UserModel>(c: binding::fmi2Component) -> Status {
    status(checked_deref!(c).exit_initialization_mode())
}

/// # Safety
/// `c` as for [`free_instance`].
pub unsafe fn terminate<M: UserModel>(c: binding::fmi2Component) -> Status {
    status(checked_deref!(c).terminate())
}

/// # Safety
/// `c` as for [`free_instance`].
pub unsafe fn reset<M: UserModel>(c: binding::fmi2Component) -> Status {
    status(checked_deref!(c).reset())
}

/// # Safety
/// `c` as for [`free_instance`]; `vr` and `value` must hold `nvr` elements.
pub unsafe fn get_real<M: UserModel>(
    c: binding::fmi2Component,
    vr: *const binding::fmi2ValueReference,
    nvr: usize,
    value: *mut binding::fmi2Real,
) -> Status {
    let instance = checked_deref!(c);
    let (vrs, values) = unsafe { (c_slice(vr, nvr), c_slice_mut(value, nvr)) };
    status(instance.get_real(vrs, values))
}

/// # Safety
/// As for [`get_real`].
pub unsafe fn get_integer<M: UserModel>(
    c: binding::fmi2Component,
    vr: *const binding::fmi2ValueReference,
    nvr: usize,
    value: *mut binding::fmi2Integer,
) -> Status {
    let instance = checked_deref!(c);
    let (vrs, values) = unsafe { (c_slice(vr, nvr), c_slice_mut(value, nvr)) };
    status(instance.get_integer(vrs, values))
}

/// # Safety
/// As for [`get_real`].
pub unsafe fn get_boolean<M: UserModel>(
    c: binding::fmi2Component,
    vr: *const binding::fmi2ValueReference,
    nvr: usize,
    value: *mut binding::fmi2Boolean,
) -> Status {
    let instance = checked_deref!(c);
    let (vrs, values) = unsafe { (c_slice(vr, nvr), c_slice_mut(value, nvr)) };
    let mut flags = vec![false; values.len()];
    let res = instance.get_boolean(vrs, &mut flags);
    if res.is_ok() {
        for (value, flag) in values.iter_mut().zip(flags) {
            *value = if flag {
                binding::fmi2True
            } else {
                binding::fmi2False
            };
        }
    }
    status(res)
}

/// # Safety
/// As for [`get_real`].
pub unsafe fn get_string<M: UserModel>(
    c: binding::fmi2Component,
    vr: *const binding::fmi2ValueReference,
    nvr: usize,
) -> Status {
    let instance = checked_deref!(c);
    status(instance.reject_strings("fmi2GetString", unsafe { c_slice(vr, nvr) }))
}

/// # Safety
/// `c` as for [`free_instance`]; `vr` and `value` must hold `nvr` elements.
pub unsafe fn set_real<M: UserModel>(
    c: binding::fmi2Component,
    vr: *const binding::fmi2ValueReference,
    nvr: usize,
    value: *const binding::fmi2Real,
) -> Status {
    let instance = checked_deref!(c);
    let (vrs, values) = unsafe { (c_slice(vr, nvr), c_slice(value, nvr)) };
    status(instance.set_real(vrs, values))
}

/// # Safety
/// As for [`set_real`].
pub unsafe fn set_integer<M: UserModel>(
    c: binding::fmi2Component,
    vr: *const binding::fmi2ValueReference,
    nvr: usize,
    value: *const binding::fmi2Integer,
) -> Status {
    let instance = checked_deref!(c);
    let (vrs, values) = unsafe { (c_slice(vr, nvr), c_slice(value, nvr)) };
    status(instance.set_integer(vrs, values))
}

/// # Safety
/// As for [`set_real`].
pub unsafe fn set_boolean<M: UserModel>(
    c: binding::fmi2Component,
    vr: *const binding::fmi2ValueReference,
    nvr: usize,
    value: *const binding::fmi2Boolean,
) -> Status {
    let instance = checked_deref!(c);
    let (vrs, values) = unsafe { (c_slice(vr, nvr), c_slice(value, nvr)) };
    let flags = values
        .iter()
        .map(|v| *v != binding::fmi2False)
        .collect::<Vec<_>>();
    status(instance.set_boolean(vrs, &flags))
}

/// # Safety
/// As for [`set_real`].
pub unsafe fn set_string<M: UserModel>(
    c: binding::fmi2Component,
    vr: *const binding::fmi2ValueReference,
    nvr: usize,
) -> Status {
    let instance = checked_deref!(c);
    status(instance.reject_strings("fmi2SetString", unsafe { c_slice(vr, nvr) }))
}

/// # Safety
/// `c` as for [`free_instance`].
pub unsafe fn do_step<M: UserModel>(
    c: binding::fmi2Component,
    current_communication_point: binding::fmi2Real,
    communication_step_size: binding::fmi2Real,
    _no_set_fmu_state_prior: binding::fmi2Boolean,
) -> Status {
    let instance = checked_deref!(c);
    status(instance.do_step(current_communication_point, communication_step_size))
}

/// # Safety
/// `c` as for [`free_instance`].
pub unsafe fn cancel_step<M: UserModel>(c: binding::fmi2Component) -> Status {
    let instance = checked_deref!(c);
    status(Err(instance.no_pending_step("fmi2CancelStep")))
}

/// `fmi2DoStepStatus` and `fmi2PendingStatus` only make sense for asynchronous steps.
///
/// # Safety
/// `c` as for [`free_instance`].
pub unsafe fn get_status<M: UserModel>(
    c: binding::fmi2Component,
    _kind: binding::fmi2StatusKind,
) -> Status {
    let instance = checked_deref!(c);
    status(Err(instance.no_pending_step("fmi2GetStatus")))
}

/// # Safety
/// `c` as for [`free_instance`]; `value` must be valid for writes.
pub unsafe fn get_real_status<M: UserModel>(
    c: binding::fmi2Component,
    kind: binding::fmi2StatusKind,
    value: *mut binding::fmi2Real,
) -> Status {
    let instance = checked_deref!(c);
    if kind != binding::fmi2StatusKind_fmi2LastSuccessfulTime {
        return status(Err(instance.no_pending_step("fmi2GetRealStatus")));
    }
    match (instance.real_status_last_successful_time(), unsafe { value.as_mut() }) {
        (Ok(time), Some(value)) => {
            *value = time;
            binding::fmi2Status_fmi2OK
        }
        (Err(err), _) => status(Err(err)),
        (Ok(_), None) => binding::fmi2Status_fmi2Error,
    }
}

/// # Safety
/// `c` as for [`free_instance`]; `value` must be valid for writes.
pub unsafe fn get_boolean_status<M: UserModel>(
    c: binding::fmi2Component,
    kind: binding::fmi2StatusKind,
    value: *mut binding::fmi2Boolean,
) -> Status {
    let instance = checked_deref!(c);
    if kind != binding::fmi2StatusKind_fmi2Terminated {
        return status(Err(instance.no_pending_step("fmi2GetBooleanStatus")));
    }
    match (instance.boolean_status_terminated(), unsafe { value.as_mut() }) {
        (Ok(terminated), Some(value)) => {
            *value = if terminated {
                binding::fmi2True
            } else {
                binding::fmi2False
            };
            binding::fmi2Status_fmi2OK
        }
        (Err(err), _) => status(Err(err)),
        (Ok(_), None) => binding::fmi2Status_fmi2Error,
    }
}

/// Functions behind capability flags this FMU does not declare.
///
/// # Safety
/// `c` as for [`free_instance`].
pub unsafe fn unsupported<M: UserModel>(c: binding::fmi2Component, function: &str) -> Status {
    let instance = checked_deref!(c);
    status(Err(instance.unsupported(function)))
}

/// Pointer to the model description, created on first use and kept in `cell`.
pub fn model_description_ptr<M: Model>(cell: &'static OnceLock<CString>) -> *const c_char {
    cell.get_or_init(|| CString::new(super::model_description::<M>()).unwrap_or_default())
        .as_ptr()
}
