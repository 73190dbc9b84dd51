//! `tracing` output for the browser console.
//!
//! Each formatted event is buffered and handed to the `console` method that
//! matches its level, so warnings show up as warnings in devtools.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;
use web_sys::console;

/// Install the console subscriber. Later calls are no-ops.
pub fn init() {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_max_level(Level::DEBUG)
        .without_time()
        .with_target(false)
        .with_level(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Channel {
    Error,
    Warn,
    Info,
    Debug,
}

impl Channel {
    fn for_level(level: &Level) -> Self {
        match *level {
            Level::ERROR => Channel::Error,
            Level::WARN => Channel::Warn,
            Level::INFO => Channel::Info,
            _ => Channel::Debug,
        }
    }
}

struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Channel::Info)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(Channel::for_level(meta.level()))
    }
}

struct ConsoleWriter {
    channel: Channel,
    buf: Vec<u8>,
}

impl ConsoleWriter {
    fn new(channel: Channel) -> Self {
        Self {
            channel,
            buf: Vec::new(),
        }
    }

    /// The line to print, without the trailing newline. `None` when empty.
    fn line(&self) -> Option<String> {
        let text = String::from_utf8_lossy(&self.buf);
        let text = text.trim_end();
        (!text.is_empty()).then(|| text.to_string())
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let Some(line) = self.line() else {
            return;
        };
        let msg = JsValue::from_str(&line);
        match self.channel {
            Channel::Error => console::error_1(&msg),
            Channel::Warn => console::warn_1(&msg),
            Channel::Info => console::info_1(&msg),
            Channel::Debug => console::debug_1(&msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_levels_map_to_console_methods() {
        assert_eq!(Channel::for_level(&Level::ERROR), Channel::Error);
        assert_eq!(Channel::for_level(&Level::WARN), Channel::Warn);
        assert_eq!(Channel::for_level(&Level::INFO), Channel::Info);
        assert_eq!(Channel::for_level(&Level::DEBUG), Channel::Debug);
        assert_eq!(Channel::for_level(&Level::TRACE), Channel::Debug);
    }

    #[test]
    fn test_writer_buffers_one_line() {
        let mut w = ConsoleWriter::new(Channel::Warn);
        w.write_all(b"best score not persisted ").unwrap();
        w.write_all(b"best=3\n").unwrap();
        assert_eq!(w.line().as_deref(), Some("best score not persisted best=3"));
        // Off wasm the console import cannot run; skip the Drop.
        w.buf.clear();
    }

    #[test]
    fn test_empty_writer_prints_nothing() {
        let w = ConsoleWriter::new(Channel::Info);
        assert_eq!(w.line(), None);
    }
}
