//! Structured logging helpers.
//!
//! Every line carries a `subsystem` field. Block lines add `block_index` and
//! `block_hash`; entry lines add `entry_hash`, the marker the ledger search
//! matches on. JSON output can then be filtered on those keys alone.

/// Log a ledger-wide event at `info` or `warn`.
#[macro_export]
macro_rules! log_event {
    (info, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(subsystem = $subsystem, $($($field)*,)? $msg)
    };
    (warn, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(subsystem = $subsystem, $($($field)*,)? $msg)
    };
}

/// Log a sealed or rejected block.
#[macro_export]
macro_rules! log_block_event {
    ($level:ident, $subsystem:expr, $msg:expr, $index:expr, $hash:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            block_index = $index,
            block_hash = %$hash,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a recorded entry keyed by its marker hash.
#[macro_export]
macro_rules! log_entry_event {
    ($level:ident, $subsystem:expr, $msg:expr, $marker:expr $(, $($field:tt)*)?) => {
        tracing::$level!(subsystem = $subsystem, entry_hash = %$marker, $($($field)*,)? $msg)
    };
}
