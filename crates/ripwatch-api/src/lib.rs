// ripwatch-api: Async Rust client for the CD ripper service HTTP API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

// Endpoint groups, implemented as inherent methods on `RipperClient`.
mod config;
mod status;
mod system;

pub use client::RipperClient;
pub use error::Error;
pub use models::{
    CdInfo, ConfigDocument, EncoderProfiles, EncoderSection, LogEntry, LoggingSection,
    LosslessProfile, LossyProfile, OutputSection, RemotePaths, RipperSection, StatusSnapshot,
    StepId, SyncSection,
};
pub use transport::TransportConfig;
