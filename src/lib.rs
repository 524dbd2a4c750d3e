pub mod config;
pub mod date_format;
pub mod helpers;
pub mod logger;
mod macros;
pub mod middleware;
pub mod sink;
pub mod theme;
pub mod timing;

use std::sync::{Arc, OnceLock};

pub use config::Options;
pub use date_format::{DateFormat, DEFAULT_DATE_FORMAT};
pub use logger::{Logger, LoggerState, Severity};
pub use middleware::{request_logger, AccessLog, AccessLogLayer};
pub use sink::Sink;
pub use theme::{Category, StyleError, Theme};
pub use timing::{Elapsed, RequestTiming};

static GLOBAL: OnceLock<Arc<Logger>> = OnceLock::new();

/// The process-wide logger, created with defaults on first use. Independent
/// instances come from [`Logger::new`].
pub fn global() -> &'static Arc<Logger> {
    GLOBAL.get_or_init(|| Arc::new(Logger::new()))
}
