//! Routes `tracing` events to the browser console.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;

/// One formatted event, flushed to the console method matching its level.
pub struct ConsoleWriter {
    level: Level,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let line = String::from_utf8_lossy(buf);
        let message = line.trim_end();
        if message.is_empty() {
            return Ok(buf.len());
        }
        let message = JsValue::from_str(message);
        match self.level {
            Level::ERROR => web_sys::console::error_1(&message),
            Level::WARN => web_sys::console::warn_1(&message),
            Level::INFO => web_sys::console::info_1(&message),
            _ => web_sys::console::debug_1(&message),
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Clone, Copy, Default)]
pub struct Console;

impl<'a> MakeWriter<'a> for Console {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter { level: Level::INFO }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            level: *meta.level(),
        }
    }
}

/// Installs the console subscriber and the panic hook. A subscriber the
/// embedding page installed first is left in place.
pub fn init() {
    console_error_panic_hook::set_once();
    let installed = tracing_subscriber::fmt()
        .with_writer(Console)
        .with_max_level(Level::INFO)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .try_init();
    if installed.is_err() {
        tracing::debug!("Keeping the existing tracing subscriber");
    }
}
