pub mod layer;
pub mod route_log;

pub use layer::{AccessLog, AccessLogLayer};
pub use route_log::request_logger;
