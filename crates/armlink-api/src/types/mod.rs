// ARM request/response payloads, grouped by resource provider.

pub mod common;
pub mod compute;
pub mod network;
pub mod web;

pub use common::*;
pub use compute::*;
pub use network::*;
pub use web::*;
