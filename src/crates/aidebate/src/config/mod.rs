//! Configuration for the aidebate server

pub mod server;

pub use server::{
    LimitsConfig, ProgressConfig, ProviderConfig, ServerConfig, ServerConfigError,
    ServerInfoConfig,
};
