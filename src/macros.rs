//! Call-site macros
//!
//! The `slog*!` macros accept anything with `enabled(level)` and
//! `emit(level, location, args)` methods: a [`Tag`](crate::api::Tag), an
//! [`Engine`](crate::Engine) or an `Arc<Engine>`. The message is only
//! formatted when the level passes both the target and
//! [`STATIC_MAX_LEVEL`](crate::STATIC_MAX_LEVEL), and the call site
//! (`file!()`, `module_path!()`, `line!()`) is captured automatically.
//!
//! The assertion macros (`slog_assert!`, `slog_warn_unless!`, `slog_fail!`,
//! `slog_return!`, `slog_check!`, `slog_check_val!`) report a failure as two
//! Panic records on the target. Without feature `assertions` they report
//! nothing, but `slog_return!`, `slog_check!` and `slog_check_val!` still
//! evaluate their expression (and `slog_return!` still returns).
//!
//! # Examples
//!
//! ```
//! use simplelog::prelude::*;
//! use simplelog::{slog, slog_info};
//!
//! let engine = Engine::builder("Server").sink(ConsoleSink::stdout()).build();
//!
//! slog_info!(engine, "Server started");
//! let port = 8080;
//! slog!(engine, LogLevel::Debug, "Listening on port {}", port);
//! ```

/// Declare a static [`Tag`](crate::api::Tag) bound to the global registry.
///
/// The optional second argument lists sink names to use instead of the
/// configured routing.
///
/// ```
/// use simplelog::declare_tag;
///
/// declare_tag!(NETWORK, "Network");
/// declare_tag!(pub AUDIT, "Audit", "AuditFile,Console");
///
/// assert_eq!(NETWORK.name(), "Network");
/// ```
#[macro_export]
macro_rules! declare_tag {
    ($vis:vis $name:ident, $tag:expr) => {
        $vis static $name: $crate::api::Tag = $crate::api::Tag::new($tag, "");
    };
    ($vis:vis $name:ident, $tag:expr, $sinks:expr) => {
        $vis static $name: $crate::api::Tag = $crate::api::Tag::new($tag, $sinks);
    };
}

/// Log a formatted message at an explicit level.
///
/// ```
/// # use simplelog::prelude::*;
/// # let engine = Engine::builder("Doc").build();
/// use simplelog::slog;
/// slog!(engine, LogLevel::Info, "Simple message");
/// slog!(engine, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! slog {
    ($target:expr, $level:expr, $($arg:tt)+) => {{
        let level: $crate::LogLevel = $level;
        let target = &$target;
        if level.passes($crate::STATIC_MAX_LEVEL) && target.enabled(level) {
            target.emit(level, $crate::location!(), format_args!($($arg)+));
        }
    }};
}

#[macro_export]
macro_rules! slog_panic {
    ($target:expr, $($arg:tt)+) => {
        $crate::slog!($target, $crate::LogLevel::Panic, $($arg)+)
    };
}

#[macro_export]
macro_rules! slog_error {
    ($target:expr, $($arg:tt)+) => {
        $crate::slog!($target, $crate::LogLevel::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! slog_warning {
    ($target:expr, $($arg:tt)+) => {
        $crate::slog!($target, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log an info-level message.
///
/// ```
/// # use simplelog::prelude::*;
/// # let engine = Engine::builder("Doc").build();
/// use simplelog::slog_info;
/// slog_info!(engine, "Application started");
/// slog_info!(engine, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! slog_info {
    ($target:expr, $($arg:tt)+) => {
        $crate::slog!($target, $crate::LogLevel::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! slog_debug {
    ($target:expr, $($arg:tt)+) => {
        $crate::slog!($target, $crate::LogLevel::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! slog_verbose {
    ($target:expr, $($arg:tt)+) => {
        $crate::slog!($target, $crate::LogLevel::Verbose, $($arg)+)
    };
}

/// Report a failed assertion on `target`. Not part of the public API.
#[doc(hidden)]
#[macro_export]
macro_rules! __slog_assert_failed {
    (@finish $target:ident, $mode:expr, $location:ident) => {{
        $target.emit(
            $crate::LogLevel::Panic,
            $location,
            format_args!(
                "file \"{}\" function \"{}\" line {}",
                $location.file, $location.function, $location.line
            ),
        );
        if $mode == $crate::AssertMode::Abort {
            $target.flush();
            ::std::process::abort();
        }
    }};
    ($target:expr, $mode:expr, $condition:expr) => {{
        let target = &$target;
        let location = $crate::location!();
        target.emit(
            $crate::LogLevel::Panic,
            location,
            format_args!("Assert failed: {}", $condition),
        );
        $crate::__slog_assert_failed!(@finish target, $mode, location)
    }};
    ($target:expr, $mode:expr, $condition:expr, $($arg:tt)+) => {{
        let target = &$target;
        let location = $crate::location!();
        target.emit(
            $crate::LogLevel::Panic,
            location,
            format_args!("Assert failed: {}: {}", $condition, format_args!($($arg)+)),
        );
        $crate::__slog_assert_failed!(@finish target, $mode, location)
    }};
}

/// Abort unless `condition` holds, after logging it and flushing `target`.
///
/// The condition is not evaluated without feature `assertions`.
///
/// ```
/// # use simplelog::prelude::*;
/// # let engine = Engine::builder("Doc").build();
/// use simplelog::slog_assert;
/// let items = [1, 2, 3];
/// slog_assert!(engine, !items.is_empty());
/// slog_assert!(engine, items.len() < 10, "too many items: {}", items.len());
/// ```
#[macro_export]
macro_rules! slog_assert {
    ($target:expr, $condition:expr $(,)?) => {
        if $crate::ASSERTIONS_ENABLED && !($condition) {
            $crate::__slog_assert_failed!($target, $crate::AssertMode::Abort, stringify!($condition));
        }
    };
    ($target:expr, $condition:expr, $($arg:tt)+) => {
        if $crate::ASSERTIONS_ENABLED && !($condition) {
            $crate::__slog_assert_failed!(
                $target,
                $crate::AssertMode::Abort,
                stringify!($condition),
                $($arg)+
            );
        }
    };
}

/// Log a failed `condition` without aborting
#[macro_export]
macro_rules! slog_warn_unless {
    ($target:expr, $condition:expr $(,)?) => {
        if $crate::ASSERTIONS_ENABLED && !($condition) {
            $crate::__slog_assert_failed!($target, $crate::AssertMode::Print, stringify!($condition));
        }
    };
    ($target:expr, $condition:expr, $($arg:tt)+) => {
        if $crate::ASSERTIONS_ENABLED && !($condition) {
            $crate::__slog_assert_failed!(
                $target,
                $crate::AssertMode::Print,
                stringify!($condition),
                $($arg)+
            );
        }
    };
}

/// Unconditional failure: log, flush and abort
#[macro_export]
macro_rules! slog_fail {
    ($target:expr $(,)?) => {
        if $crate::ASSERTIONS_ENABLED {
            $crate::__slog_assert_failed!($target, $crate::AssertMode::Abort, "false");
        }
    };
    ($target:expr, $($arg:tt)+) => {
        if $crate::ASSERTIONS_ENABLED {
            $crate::__slog_assert_failed!($target, $crate::AssertMode::Abort, "false", $($arg)+);
        }
    };
}

/// Return from the enclosing function (with `retval` if given) when
/// `condition` is false. With feature `assertions` the failure aborts
/// first; without it the early return still happens.
///
/// ```
/// # use simplelog::prelude::*;
/// use simplelog::slog_return;
/// fn checked_len(engine: &Engine, s: Option<&str>) -> usize {
///     slog_return!(engine, s.is_some(), 0);
///     s.map_or(0, str::len)
/// }
/// # let engine = Engine::builder("Doc").build();
/// assert_eq!(checked_len(&engine, Some("abc")), 3);
/// ```
#[macro_export]
macro_rules! slog_return {
    ($target:expr, $condition:expr $(,)?) => {
        if !($condition) {
            if $crate::ASSERTIONS_ENABLED {
                $crate::__slog_assert_failed!(
                    $target,
                    $crate::AssertMode::Abort,
                    stringify!($condition)
                );
            }
            return;
        }
    };
    ($target:expr, $condition:expr, $retval:expr $(,)?) => {
        if !($condition) {
            if $crate::ASSERTIONS_ENABLED {
                $crate::__slog_assert_failed!(
                    $target,
                    $crate::AssertMode::Abort,
                    stringify!($condition)
                );
            }
            return $retval;
        }
    };
}

/// Abort when `expression` is false. The expression is always evaluated.
#[macro_export]
macro_rules! slog_check {
    ($target:expr, $expression:expr $(,)?) => {
        if !($expression) && $crate::ASSERTIONS_ENABLED {
            $crate::__slog_assert_failed!($target, $crate::AssertMode::Abort, stringify!($expression));
        }
    };
    ($target:expr, $expression:expr, $($arg:tt)+) => {
        if !($expression) && $crate::ASSERTIONS_ENABLED {
            $crate::__slog_assert_failed!(
                $target,
                $crate::AssertMode::Abort,
                stringify!($expression),
                $($arg)+
            );
        }
    };
}

/// Abort when `expression` differs from `value`. The expression is always
/// evaluated.
///
/// ```
/// # use simplelog::prelude::*;
/// # let engine = Engine::builder("Doc").build();
/// use simplelog::slog_check_val;
/// let mut buf = Vec::new();
/// slog_check_val!(engine, std::io::Write::write(&mut buf, b"abc").ok(), Some(3));
/// ```
#[macro_export]
macro_rules! slog_check_val {
    ($target:expr, $expression:expr, $value:expr $(,)?) => {
        if ($expression) != ($value) && $crate::ASSERTIONS_ENABLED {
            $crate::__slog_assert_failed!(
                $target,
                $crate::AssertMode::Abort,
                concat!(stringify!($expression), " != ", stringify!($value))
            );
        }
    };
    ($target:expr, $expression:expr, $value:expr, $($arg:tt)+) => {
        if ($expression) != ($value) && $crate::ASSERTIONS_ENABLED {
            $crate::__slog_assert_failed!(
                $target,
                $crate::AssertMode::Abort,
                concat!(stringify!($expression), " != ", stringify!($value)),
                $($arg)+
            );
        }
    };
}
