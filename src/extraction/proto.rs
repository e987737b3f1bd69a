//! Extraction of RPC service descriptions from `.proto` documents.
//!
//! Service and method identifiers must start with an upper-case letter, the
//! way protobuf style requires. The first service block ends at its first
//! closing brace; an unclosed block yields the service with no methods.

use crate::core::{RpcMethod, ServiceInfo, ServiceKind, StreamDirection};
use crate::errors::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static SERVICE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bservice\s+([A-Z][a-zA-Z0-9_]*)\s*\{(?:([^}]*)\})?").unwrap()
});

static RPC_METHOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\brpc\s+([A-Z][a-zA-Z0-9_]*)\s*\(([^)]+)\)\s*returns\s*\(([^)]+)\)").unwrap()
});

static MESSAGE_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bmessage\s+([A-Z][a-zA-Z0-9_]*)\s*\{").unwrap());

const STREAM_TOKEN: &str = "stream";

/// Everything extracted from one RPC spec document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcSpec {
    pub service: String,
    pub methods: Vec<RpcMethod>,
    /// Declared message names in source order
    pub messages: Vec<String>,
}

impl RpcSpec {
    pub fn into_service(self, spec_file: &Path) -> ServiceInfo {
        ServiceInfo::rpc(self.service, spec_file, self.methods)
    }
}

/// Extract the service, its methods and the declared messages.
///
/// A service whose name starts with a lower-case letter is not recognized and
/// yields [`Error::NoServiceDeclared`].
pub fn extract_rpc_spec(content: &str) -> Result<RpcSpec> {
    let captures = SERVICE_BLOCK
        .captures(content)
        .ok_or(Error::NoServiceDeclared {
            kind: ServiceKind::Rpc,
        })?;

    let body = captures.get(2).map_or("", |m| m.as_str());

    Ok(RpcSpec {
        service: captures[1].to_string(),
        methods: extract_methods(body),
        messages: extract_messages(content),
    })
}

fn extract_methods(service_body: &str) -> Vec<RpcMethod> {
    RPC_METHOD
        .captures_iter(service_body)
        .map(|caps| {
            let (request, request_streams) = split_stream(&caps[2]);
            let (response, response_streams) = split_stream(&caps[3]);
            RpcMethod {
                name: caps[1].to_string(),
                request,
                response,
                stream: StreamDirection::from_sides(request_streams, response_streams),
            }
        })
        .collect()
}

/// Separate the `stream` modifier from the type name inside a parenthesis.
fn split_stream(side: &str) -> (String, bool) {
    let tokens: Vec<&str> = side.split_whitespace().collect();
    let streams = tokens.contains(&STREAM_TOKEN);
    let type_name = tokens
        .into_iter()
        .filter(|token| *token != STREAM_TOKEN)
        .collect::<Vec<_>>()
        .join(" ");
    (type_name, streams)
}

fn extract_messages(content: &str) -> Vec<String> {
    MESSAGE_DECL
        .captures_iter(content)
        .map(|caps| caps[1].to_string())
        .collect()
}
