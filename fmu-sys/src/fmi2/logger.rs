use std::ffi::CStr;

use crate::fmi2 as binding;

unsafe fn str_or_null<'a>(s: binding::fmi2String) -> &'a str {
    if s.is_null() {
        "NULL"
    } else {
        CStr::from_ptr(s).to_str().unwrap_or("NULL")
    }
}

/// This function gets called from logger.c
#[no_mangle]
extern "C" fn callback_log(
    _component_environment: binding::fmi2ComponentEnvironment,
    instance_name: binding::fmi2String,
    status: binding::fmi2Status,
    category: binding::fmi2String,
    message: binding::fmi2String,
) {
    let instance_name = unsafe { str_or_null(instance_name) };
    let category = unsafe { str_or_null(category) };
    let message = unsafe { str_or_null(message) };

    let level = match status {
        binding::fmi2Status_fmi2OK => log::Level::Info,
        binding::fmi2Status_fmi2Warning => log::Level::Warn,
        binding::fmi2Status_fmi2Discard => log::Level::Trace,
        binding::fmi2Status_fmi2Error | binding::fmi2Status_fmi2Fatal => log::Level::Error,
        _ => log::Level::Debug,
    };

    log::logger().log(
        &log::Record::builder()
            .args(format_args!("[{category}] {message}"))
            .level(level)
            .module_path(Some("logger"))
            .target(instance_name)
            .build(),
    );
}

extern "C" {
    /// This function is implemented in logger.c
    /// Note: This can be re-implemented in pure Rust once the `c_variadic` feature stabilizes.
    /// See: https://doc.rust-lang.org/beta/unstable-book/language-features/c-variadic.html
    pub fn callback_logger_handler(
        componentEnvironment: binding::fmi2ComponentEnvironment,
        instanceName: binding::fmi2String,
        status: binding::fmi2Status,
        category: binding::fmi2String,
        message: binding::fmi2String,
        ...
    );
}
