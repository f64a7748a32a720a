//! ObjectGate - Minimal authenticated HTTP gateway for object storage
//!
//! A thin HTTP front for a single backing bucket: PUT writes an object,
//! GET reads one, DELETE removes one. Every request passes a single
//! authorization rule first: mutations require a shared secret header,
//! reads are public only for allow-listed keys.
//!
//! # Architecture
//!
//! Requests are handled independently; the gateway holds no mutable state
//! of its own. All storage work is delegated to an external object store
//! and storage failures propagate unretried.
//!
//! # Features
//!
//! - Three-verb object API (PUT / GET / DELETE) over plain HTTP
//! - Shared-secret authorization for mutations, allow-list for reads
//! - Streamed uploads and downloads
//! - Filesystem and in-memory storage backends

pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod store;

pub use config::GatewayConfig;
pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::auth::{Authorizer, AUTH_HEADER};
    pub use crate::config::GatewayConfig;
    pub use crate::error::{Error, Result};
    pub use crate::gateway::GatewayServer;
    pub use crate::store::{Bucket, StoredObject};
}
