//! API middleware layer

pub mod logging;
pub mod validation;

pub use logging::logging_layer;
pub use validation::parse_job_id;
