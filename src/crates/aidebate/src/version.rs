// Version information for the aidebate crate

/// Version string for the aidebate crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

