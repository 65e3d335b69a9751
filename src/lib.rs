pub mod logging;
pub mod registry;

// Tracing targets used across the crate
pub const APP_NAME: &str = "ctban";
pub const REGISTRY_TARGET: &str = "ctban::registry";
pub const PERSIST_TARGET: &str = "ctban::persist";
pub const CONSOLE_TARGET: &str = "ctban";

pub use registry::{
    duration_label, BanExpiry, BanRecord, BanRegistry, RegistryError, RegistryResult,
    TrackedEntry, BAN_DURATIONS, DEFAULT_DATABASE_PATH,
};

pub type Error = Box<dyn std::error::Error + Send + Sync>;
