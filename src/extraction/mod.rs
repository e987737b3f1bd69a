//! Best-effort extractors for the project's spec documents and manifest.
//!
//! The extractors match textual patterns instead of building a grammar. They
//! accept malformed input as long as it looks like the expected shape, and
//! the only hard failure is a document with no recognizable service block.

pub mod api;
pub mod manifest;
pub mod proto;

pub use api::{extract_http_spec, HttpSpec};
pub use manifest::{Manifest, ManifestParser};
pub use proto::{extract_rpc_spec, RpcSpec};
