#[cfg(feature = "log")]
macro_rules! lock_log {
    (trace, $($arg:expr),*) => { log::trace!($($arg),*) };
    (error, $($arg:expr),*) => { log::error!($($arg),*) };
}

#[cfg(not(feature = "log"))]
macro_rules! lock_log {
    ($level:ident, $($arg:expr),*) => {{ $( let _ = $arg; )* }}
}

macro_rules! lock_trace {
    ($($arg:expr),*) => (lock_log!(trace, $($arg),*));
}

macro_rules! lock_error {
    ($($arg:expr),*) => (lock_log!(error, $($arg),*));
}
