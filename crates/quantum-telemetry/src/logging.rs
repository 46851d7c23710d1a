//! Structured logging helpers.
//!
//! Every event carries a `component` field so that log pipelines can split
//! validation, state and processing output:
//! - `component`: emitting component (validation, state, processing, ...)
//! - `entity_hash` / `height`: entity context where available
//! - Additional context fields

/// Log an entity-related event with standard fields.
#[macro_export]
macro_rules! log_entity_event {
    ($level:ident, $component:expr, $msg:expr, $entity_hash:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = $component,
            entity_hash = %$entity_hash,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log at a level chosen at runtime.
///
/// `tracing` macros need a constant level, so this expands to one branch
/// per level.
#[macro_export]
macro_rules! log_at_level {
    ($level:expr, $($arg:tt)+) => {{
        let level: tracing::Level = $level;
        if level == tracing::Level::TRACE {
            tracing::trace!($($arg)+)
        } else if level == tracing::Level::DEBUG {
            tracing::debug!($($arg)+)
        } else if level == tracing::Level::INFO {
            tracing::info!($($arg)+)
        } else if level == tracing::Level::WARN {
            tracing::warn!($($arg)+)
        } else {
            tracing::error!($($arg)+)
        }
    }};
}
