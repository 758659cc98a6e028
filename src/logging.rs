// Logger setup for the `prodcons` binary. The library only uses the `log` facade.

use flexi_logger::{DeferredNow, Logger, LoggerHandle};
use log::Record;
use std::sync::{Mutex, OnceLock};

static LOGGER_HANDLE: OnceLock<Mutex<LoggerHandle>> = OnceLock::new();

/// Start logging to stderr at `log_level` (a flexi_logger spec such as
/// `"info"` or `"bounded_prodcons=trace"`). Later calls are no-ops.
pub fn init_logging(log_level: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
   if LOGGER_HANDLE.get().is_some() {
      return Ok(());
   }
   let level_str = log_level.unwrap_or("info");
   let handle = Logger::try_with_str(level_str)?
      .format(thread_format)
      .start()?;
   let _ = LOGGER_HANDLE.set(Mutex::new(handle));
   Ok(())
}

/// `HH:MM:SS.mmm LEVEL [thread] message`
fn thread_format(
   w: &mut dyn std::io::Write,
   now: &mut DeferredNow,
   record: &Record,
) -> Result<(), std::io::Error> {
   write!(
      w,
      "{} {:<5} [{}] {}",
      now.format("%H:%M:%S%.3f"),
      record.level(),
      std::thread::current().name().unwrap_or("main"),
      record.args()
   )
}
