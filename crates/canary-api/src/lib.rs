// canary-api: Async Rust client for the Canary home-security cloud API

pub mod auth;
pub mod cache;
pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use auth::Credentials;
pub use cache::TtlCache;
pub use client::{CacheTtls, CanaryClient, DEFAULT_BASE_URL};
pub use error::Error;
pub use models::{ApiId, Device, DeviceId, Location, LocationId, Reading, ReadingKind};
pub use transport::TransportConfig;
