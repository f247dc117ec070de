//! Logging backend for the `log` facade.
//!
//! The soft core has no trace port, so records go to the JTAG UART and show
//! up in the operator's terminal between console output, the same way the
//! demo always printed its diagnostics.
//!
//! Provided logger is available to `log` facade after calling unsafe init function
//!
//! # Examples
//!
//! ```no_run
//! # use peripherals::{logger::*, system};
//! # use log::info;
//! let logger = create_uart_logger(LevelFilter::Info, system::UART_BASE);
//! unsafe { init(&logger).unwrap() }
//!
//! info!("console ready");
//! ```

use core::fmt::Write;

use log::{Log, Metadata, Record};

pub use log::{LevelFilter, SetLoggerError};

use crate::uart::JtagUart;

/// Logger printing `[LEVEL][target] message` lines to a JTAG UART
pub struct UartLogger {
    level: LevelFilter,
    base: usize,
}

/// Create new logger instance writing to the JTAG UART at `base`
pub fn create_uart_logger(level: LevelFilter, base: usize) -> UartLogger {
    UartLogger { level, base }
}

impl Log for UartLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut uart = unsafe { JtagUart::new(self.base) };
        let _ = writeln!(uart, "[{:5}][{}] {}", record.level(), record.target(), record.args());
    }

    fn flush(&self) {}
}

/// Initialize logger for the log facade.
///
/// # Safety
///
/// This function should only be called once
///
/// This function extends the lifetime of `logger` to `'static`. It is UB to
/// drop the logger and use the logging API afterwards, so keep it as a local
/// of a `main` that never returns.
pub unsafe fn init(logger: &UartLogger) -> Result<(), SetLoggerError> {
    let logger: &'static UartLogger = &*(logger as *const UartLogger);
    log::set_logger(logger)?;
    log::set_max_level(logger.level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn filters_by_level() {
        let logger = create_uart_logger(LevelFilter::Info, 0);
        let metadata = |level| Metadata::builder().level(level).target("avdemo").build();

        assert!(logger.enabled(&metadata(Level::Error)));
        assert!(logger.enabled(&metadata(Level::Info)));
        assert!(!logger.enabled(&metadata(Level::Debug)));

        let silent = create_uart_logger(LevelFilter::Off, 0);
        assert!(!silent.enabled(&metadata(Level::Error)));
    }
}
