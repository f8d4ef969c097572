// armlink-api: Async Rust client for the Azure Resource Manager REST API

pub mod api_version;
pub mod client;
pub mod environment;
pub mod error;
pub mod lro;
pub mod subscription;
pub mod tags;
pub mod transport;
pub mod types;

pub use client::ArmClient;
pub use environment::CloudEnvironment;
pub use error::Error;
pub use lro::PollConfig;
pub use tags::TagMode;
pub use transport::{TlsMode, TransportConfig};
