//! Logging macros
//!
//! Each macro captures `file!()`, `line!()` and the enclosing function where it
//! is written, then hands the formatted message to a logger.

/// Path of the function the macro is expanded in
#[doc(hidden)]
#[macro_export]
macro_rules! __function_path {
    () => {{
        fn __daylog_here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = __type_name_of(__daylog_here);
        match name.strip_suffix("::__daylog_here") {
            Some(outer) => outer,
            None => name,
        }
    }};
}

/// Call site of the macro invocation
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite::new(::std::file!(), ::std::line!(), $crate::__function_path!())
    };
}

/// Log an informational line through a [`Logger`](crate::Logger)
///
/// ```no_run
/// let logger = daylog::Logger::configure(daylog::LoggerConfig::new(2, "logs", 7))?;
/// daylog::info!(logger, "listening on {}", 8080);
/// # Ok::<(), daylog::LoggerError>(())
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info($crate::call_site!(), ::std::format_args!($($arg)+))
    };
}

/// Log an error line through a [`Logger`](crate::Logger)
///
/// This also switches the logger's level to `Error` unless the logger was
/// configured with `sticky_error_level(false)`.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error($crate::call_site!(), ::std::format_args!($($arg)+))
    };
}

/// Log an informational line through the process-wide logger
#[macro_export]
macro_rules! infof {
    ($($arg:tt)+) => {
        $crate::logging::log_info($crate::call_site!(), ::std::format_args!($($arg)+))
    };
}

/// Log an error line through the process-wide logger
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)+) => {
        $crate::logging::log_error($crate::call_site!(), ::std::format_args!($($arg)+))
    };
}
