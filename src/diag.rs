//! Diagnostic sinks
//!
//! The parsers report advisory diagnostics (malformed or unrecognized
//! elements) through a [`DiagSink`]. Emission is gated by the caller's
//! `show_errors` flag and never influences a parse outcome.

use log::Level;
use std::fmt;

/// Destination for parser diagnostics.
pub trait DiagSink: Sync {
    /// Emit one diagnostic message at the given severity.
    fn emit(&self, level: Level, args: fmt::Arguments<'_>);
}

/// Emit through `$sink` only when `$show` is set.
macro_rules! diag {
    ($sink:expr, $show:expr, $level:expr, $($arg:tt)+) => {
        if $show {
            $sink.emit($level, format_args!($($arg)+));
        }
    };
}

pub(crate) use diag;

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagSink for LogSink {
    fn emit(&self, level: Level, args: fmt::Arguments<'_>) {
        log::log!(target: "ieee80211_elems", level, "{}", args);
    }
}

/// Drops every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagSink for NullSink {
    fn emit(&self, _level: Level, _args: fmt::Arguments<'_>) {}
}

/// Sink that keeps every message, for inspecting diagnostics in tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct CaptureSink {
    pub(crate) messages: std::sync::Mutex<Vec<(Level, String)>>,
}

#[cfg(test)]
impl CaptureSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn take(&self) -> Vec<(Level, String)> {
        std::mem::take(&mut *self.messages.lock().unwrap())
    }
}

#[cfg(test)]
impl DiagSink for CaptureSink {
    fn emit(&self, level: Level, args: fmt::Arguments<'_>) {
        self.messages.lock().unwrap().push((level, args.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_sink_accepts_messages() {
        NullSink.emit(Level::Debug, format_args!("dropped {}", 1));
    }

    #[test]
    fn test_capture_sink() {
        let sink = CaptureSink::new();
        sink.emit(Level::Trace, format_args!("unknown element id={}", 42));

        let messages = sink.take();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, Level::Trace);
        assert_eq!(messages[0].1, "unknown element id=42");
        assert!(sink.take().is_empty());
    }
}
