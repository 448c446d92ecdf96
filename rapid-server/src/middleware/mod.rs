pub mod error_log;
pub mod rate_limit;
pub mod request_errors;
pub mod request_id;
pub mod request_logger;

pub use error_log::{ErrorLogEntry, ErrorLogWriter};
pub use rate_limit::{ApiRateLimiter, rate_limit};
pub use request_errors::RequestErrors;
pub use request_id::{REQUEST_ID_HEADER, RequestIds, TRACE_ID_HEADER, request_id};
pub use request_logger::request_logger;
