//! Diagnostics that reach the `log` crate only with the `logging` feature.
//!
//! Without it the macros still evaluate a reference to each argument, so
//! values computed only for a log line do not trigger unused warnings.

macro_rules! log_at {
    ($level:ident, $fmt:literal $(, $($arg:expr),* $(,)?)?) => {{
        #[cfg(feature = "logging")]
        ::log::$level!(target: "zendepth", $fmt $(, $($arg),*)?);
        #[cfg(not(feature = "logging"))]
        {
            $($(let _ = &$arg;)*)?
        }
    }};
}

macro_rules! ldebug {
    ($($t:tt)*) => { log_at!(debug, $($t)*) };
}

macro_rules! ltrace {
    ($($t:tt)*) => { log_at!(trace, $($t)*) };
}

macro_rules! lwarn {
    ($($t:tt)*) => { log_at!(warn, $($t)*) };
}
