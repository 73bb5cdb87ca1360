/// Defines `fmi2*` functions that are declared by the standard but not supported by the exported
/// model: they log an error and return `fmi2Error`.
#[doc(hidden)]
#[macro_export]
macro_rules! export_unsupported {
    ($ty:ty, $($name:ident($($arg:ident: $arg_ty:ty),* $(,)?)),+ $(,)?) => {
        $(
            #[no_mangle]
            #[allow(non_snake_case)]
            pub unsafe extern "C" fn $name(
                c: $crate::fmu::fmi2::binding::fmi2Component,
                $($arg: $arg_ty),*
            ) -> $crate::fmu::fmi2::binding::fmi2Status {
                $(let _ = $arg;)*
                unsafe { $crate::fmi2::export::unsupported::<$ty>(c, stringify!($name)) }
            }
        )+
    };
}

/// Export a model as an FMI 2.0 Co-Simulation FMU.
///
/// Defines every function of the FMI 2.0 Common and Co-Simulation API for `$ty`, which must
/// implement [`Model`](crate::fmi2::Model) and [`UserModel`](crate::fmi2::UserModel), plus the
/// `fmu_export_model_description` symbol that [`crate::package`] reads the model description from.
/// Invoke it once, at the root of a `cdylib` crate.
///
/// FMU state, directional derivatives and input/output derivatives are not supported; those
/// functions return `fmi2Error`.
#[macro_export]
macro_rules! export_fmu {
    ($ty:ty) => {
        /// The generated `modelDescription.xml` as a C string.
        #[no_mangle]
        pub extern "C" fn fmu_export_model_description() -> *const ::std::ffi::c_char {
            static DESCRIPTION: ::std::sync::OnceLock<::std::ffi::CString> =
                ::std::sync::OnceLock::new();
            $crate::fmi2::export::model_description_ptr::<$ty>(&DESCRIPTION)
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub extern "C" fn fmi2GetTypesPlatform() -> *const ::std::ffi::c_char {
            $crate::fmi2::export::get_types_platform()
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub extern "C" fn fmi2GetVersion() -> *const ::std::ffi::c_char {
            $crate::fmi2::export::get_version()
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn fmi2SetDebugLogging(
            c: $crate::fmu::fmi2::binding::fmi2Component,
            logging_on: $crate::fmu::fmi2::binding::fmi2Boolean,
            n_categories: usize,
            categories: *const $crate::fmu::fmi2::binding::fmi2String,
        ) -> $crate::fmu::fmi2::binding::fmi2Status {
            unsafe {
                $crate::fmi2::export::set_debug_logging::<$ty>(
                    c,
                    logging_on,
                    n_categories,
                    categories,
                )
            }
        }

        /* Creation and destruction of FMU instances */
        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn fmi2Instantiate(
            instance_name: $crate::fmu::fmi2::binding::fmi2String,
            fmu_type: $crate::fmu::fmi2::binding::fmi2Type,
            fmu_guid: $crate::fmu::fmi2::binding::fmi2String,
            _fmu_resource_location: $crate::fmu::fmi2::binding::fmi2String,
            functions: *const $crate::fmu::fmi2::binding::fmi2CallbackFunctions,
            _visible: $crate::fmu::fmi2::binding::fmi2Boolean,
            logging_on: $crate::fmu::fmi2::binding::fmi2Boolean,
        ) -> $crate::fmu::fmi2::binding::fmi2Component {
            unsafe {
                $crate::fmi2::export::instantiate::<$ty>(
                    instance_name,
                    fmu_type,
                    fmu_guid,
                    logging_on,
                    functions,
                )
            }
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn fmi2FreeInstance(c: $crate::fmu::fmi2::binding::fmi2Component) {
            unsafe { $crate::fmi2::export::free_instance::<$ty>(c) }
        }

        /* Enter and exit initialization mode, terminate and reset */
        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn fmi2SetupExperiment(
            c: $crate::fmu::fmi2::binding::fmi2Component,
            tolerance_defined: $crate::fmu::fmi2::binding::fmi2Boolean,
            tolerance: $crate::fmu::fmi2::binding::fmi2Real,
            start_time: $crate::fmu::fmi2::binding::fmi2Real,
            stop_time_defined: $crate::fmu::fmi2::binding::fmi2Boolean,
            stop_time: $crate::fmu::fmi2::binding::fmi2Real,
        ) -> $crate::fmu::fmi2::binding::fmi2Status {
            unsafe {
                $crate::fmi2::export::setup_experiment::<$ty>(
                    c,
                    tolerance_defined,
                    tolerance,
                    start_time,
                    stop_time_defined,
                    stop_time,
                )
            }
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn fmi2EnterInitializationMode(
            c: $crate::fmu::fmi2::binding::fmi2Component,
        ) -> $crate::fmu::fmi2::binding::fmi2Status {
            unsafe { $crate::fmi2::export::enter_initialization_mode::<$ty>(c) }
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn fmi2ExitInitializationMode(
            c: $crate::fmu::fmi2::binding::fmi2Component,
        ) -> $crate::fmu::fmi2::binding::fmi2Status {
            unsafe { $crate::fmi2::export::exit_initialization_mode::<$ty>(c) }
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn fmi2Terminate(
            c: $crate::fmu::fmi2::binding::fmi2Component,
        ) -> $crate::fmu::fmi2::binding::fmi2Status {
            unsafe { $crate::fmi2::export::terminate::<$ty>(c) }
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn fmi2Reset(
            c: $crate::fmu::fmi2::binding::fmi2Component,
        ) -> $crate::fmu::fmi2::binding::fmi2Status {
            unsafe { $crate::fmi2::export::reset::<$ty>(c) }
        }

        /* Getting and setting variable values */
        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn fmi2GetReal(
            c: $crate::fmu::fmi2::binding::fmi2Component,
            vr: *const $crate::fmu::fmi2::binding::fmi2ValueReference,
            nvr: usize,
            value: *mut $crate::fmu::fmi2::binding::fmi2Real,
        ) -> $crate::fmu::fmi2::binding::fmi2Status {
            unsafe { $crate::fmi2::export::get_real::<$ty>(c, vr, nvr, value) }
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn fmi2GetInteger(
            c: $crate::fmu::fmi2::binding::fmi2Component,
            vr: *const $crate::fmu::fmi2::binding::fmi2ValueReference,
            nvr: usize,
            value: *mut $crate::fmu::fmi2::binding::fmi2Integer,
        ) -> $crate::fmu::fmi2::binding::fmi2Status {
            unsafe { $crate::fmi2::export::get_integer::<$ty>(c, vr, nvr, value) }
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn fmi2GetBoolean(
            c: $crate::fmu::fmi2::binding::fmi2Component,
            vr: *const $crate::fmu::fmi2::binding::fmi2ValueReference,
            nvr: usize,
            value: *mut $crate::fmu::fmi2::binding::fmi2Boolean,
        ) -> $crate::fmu::fmi2::binding::fmi2Status {
            unsafe { $crate::fmi2::export::get_boolean::<$ty>(c, vr, nvr, value) }
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn fmi2GetString(
            c: $crate::fmu::fmi2::binding::fmi2Component,
            vr: *const $crate::fmu::fmi2::binding::fmi2ValueReference,
            nvr: usize,
            _value: *mut $crate::fmu::fmi2::binding::fmi2String,
        ) -> $crate::fmu::fmi2::binding::fmi2Status {
            unsafe { $crate::fmi2::export::get_string::<$ty>(c, vr, nvr) }
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn fmi2SetReal(
            c: $crate::fmu::fmi2::binding::fmi2Component,
            vr: *const $crate::fmu::fmi2::binding::fmi2ValueReference,
            nvr: usize,
            value: *const $crate::fmu::fmi2::binding::fmi2Real,
        ) -> $crate::fmu::fmi2::binding::fmi2Status {
            unsafe { $crate::fmi2::export::set_real::<$ty>(c, vr, nvr, value) }
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn fmi2SetInteger(
            c: $crate::fmu::fmi2::binding::fmi2Component,
            vr: *const $crate::fmu::fmi2::binding::fmi2ValueReference,
            nvr: usize,
            value: *const $crate::fmu::fmi2::binding::fmi2Integer,
        ) -> $crate::fmu::fmi2::binding::fmi2Status {
            unsafe { $crate::fmi2::export::set_integer::<$ty>(c, vr, nvr, value) }
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn fmi2SetBoolean(
            c: $crate::fmu::fmi2::binding::fmi2Component,
            vr: *const $crate::fmu::fmi2::binding::fmi2ValueReference,
            nvr: usize,
            value: *const $crate::fmu::fmi2::binding::fmi2Boolean,
        ) -> $crate::fmu::fmi2::binding::fmi2Status {
            unsafe { $crate::fmi2::export::set_boolean::<$ty>(c, vr, nvr, value) }
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn fmi2SetString(
            c: $crate::fmu::fmi2::binding::fmi2Component,
            vr: *const $crate::fmu::fmi2::binding::fmi2ValueReference,
            nvr: usize,
            _value: *const $crate::fmu::fmi2::binding::fmi2String,
        ) -> $crate::fmu::fmi2::binding::fmi2Status {
            unsafe { $crate::fmi2::export::set_string::<$ty>(c, vr, nvr) }
        }

        /* Co-Simulation */
        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn fmi2DoStep(
            c: $crate::fmu::fmi2::binding::fmi2Component,
            current_communication_point: $crate::fmu::fmi2::binding::fmi2Real,
            communication_step_size: $crate::fmu::fmi2::binding::fmi2Real,
            no_set_fmu_state_prior: $crate::fmu::fmi2::binding::fmi2Boolean,
        ) -> $crate::fmu::fmi2::binding::fmi2Status {
            unsafe {
                $crate::fmi2::export::do_step::<$ty>(
                    c,
                    current_communication_point,
                    communication_step_size,
                    no_set_fmu_state_prior,
                )
            }
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn fmi2CancelStep(
            c: $crate::fmu::fmi2::binding::fmi2Component,
        ) -> $crate::fmu::fmi2::binding::fmi2Status {
            unsafe { $crate::fmi2::export::cancel_step::<$ty>(c) }
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn fmi2GetStatus(
            c: $crate::fmu::fmi2::binding::fmi2Component,
            kind: $crate::fmu::fmi2::binding::fmi2StatusKind,
            _value: *mut $crate::fmu::fmi2::binding::fmi2Status,
        ) -> $crate::fmu::fmi2::binding::fmi2Status {
            unsafe { $crate::fmi2::export::get_status::<$ty>(c, kind) }
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn fmi2GetRealStatus(
            c: $crate::fmu::fmi2::binding::fmi2Component,
            kind: $crate::fmu::fmi2::binding::fmi2StatusKind,
            value: *mut $crate::fmu::fmi2::binding::fmi2Real,
        ) -> $crate::fmu::fmi2::binding::fmi2Status {
            unsafe { $crate::fmi2::export::get_real_status::<$ty>(c, kind, value) }
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn fmi2GetBooleanStatus(
            c: $crate::fmu::fmi2::binding::fmi2Component,
            kind: $crate::fmu::fmi2::binding::fmi2StatusKind,
            value: *mut $crate::fmu::fmi2::binding::fmi2Boolean,
        ) -> $crate::fmu::fmi2::binding::fmi2Status {
            unsafe { $crate::fmi2::export::get_boolean_status::<$ty>(c, kind, value) }
        }

        $crate::export_unsupported! {
            $ty,
            fmi2GetIntegerStatus(
                kind: $crate::fmu::fmi2::binding::fmi2StatusKind,
                value: *mut $crate::fmu::fmi2::binding::fmi2Integer,
            ),
            fmi2GetStringStatus(
                kind: $crate::fmu::fmi2::binding::fmi2StatusKind,
                value: *mut $crate::fmu::fmi2::binding::fmi2String,
            ),
            fmi2SetRealInputDerivatives(
                vr: *const $crate::fmu::fmi2::binding::fmi2ValueReference,
                nvr: usize,
                order: *const $crate::fmu::fmi2::binding::fmi2Integer,
                value: *const $crate::fmu::fmi2::binding::fmi2Real,
            ),
            fmi2GetRealOutputDerivatives(
                vr: *const $crate::fmu::fmi2::binding::fmi2ValueReference,
                nvr: usize,
                order: *const $crate::fmu::fmi2::binding::fmi2Integer,
                value: *mut $crate::fmu::fmi2::binding::fmi2Real,
            ),
            fmi2GetFMUstate(state: *mut $crate::fmu::fmi2::binding::fmi2FMUstate),
            fmi2SetFMUstate(state: $crate::fmu::fmi2::binding::fmi2FMUstate),
            fmi2FreeFMUstate(state: *mut $crate::fmu::fmi2::binding::fmi2FMUstate),
            fmi2SerializedFMUstateSize(
                state: $crate::fmu::fmi2::binding::fmi2FMUstate,
                size: *mut usize,
            ),
            fmi2SerializeFMUstate(
                state: $crate::fmu::fmi2::binding::fmi2FMUstate,
                serialized_state: *mut $crate::fmu::fmi2::binding::fmi2Byte,
                size: usize,
            ),
            fmi2DeSerializeFMUstate(
                serialized_state: *const $crate::fmu::fmi2::binding::fmi2Byte,
                size: usize,
                state: *mut $crate::fmu::fmi2::binding::fmi2FMUstate,
            ),
            fmi2GetDirectionalDerivative(
                v_unknown_ref: *const $crate::fmu::fmi2::binding::fmi2ValueReference,
                n_unknown: usize,
                v_known_ref: *const $crate::fmu::fmi2::binding::fmi2ValueReference,
                n_known: usize,
                dv_known: *const $crate::fmu::fmi2::binding::fmi2Real,
                dv_unknown: *mut $crate::fmu::fmi2::binding::fmi2Real,
            ),
        }
    };
}
