//! Progress observation: snapshots and streamed updates

pub mod publisher;

pub use publisher::{ProgressEvent, ProgressPublisher};
