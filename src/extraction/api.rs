//! Extraction of HTTP service descriptions from `.api` documents.
//!
//! This is a pattern matcher, not a parser. Only the first `service` block is
//! read, and its body ends at the first closing brace, so nested braces inside
//! a service block truncate it. A block that is never closed still names the
//! service but yields no endpoints. Comments are not stripped.

use crate::core::{Endpoint, ServiceInfo, ServiceKind};
use crate::errors::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Captures the service name and, when the block is closed, the body up to
/// the first `}`.
static SERVICE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bservice\s+([a-zA-Z0-9_-]+)\s*\{(?:([^}]*)\})?").unwrap()
});

static HANDLER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"@handler\s+(\w+)\s+(\w+)\s+(/[^\s(]*)\s*(?:\(([^)]+)\))?\s*(?:returns\s*\(([^)]+)\))?",
    )
    .unwrap()
});

static TYPE_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\btype\s+(\w+)\s+(?:struct\s*)?\{").unwrap());

const API_SUFFIX: &str = "-api";

/// Everything extracted from one HTTP spec document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSpec {
    /// Service name with any `-api` suffix removed
    pub service: String,
    pub endpoints: Vec<Endpoint>,
    /// Declared type names in source order, duplicates kept
    pub types: Vec<String>,
}

impl HttpSpec {
    pub fn into_service(self, spec_file: &Path) -> ServiceInfo {
        ServiceInfo::http(self.service, spec_file, self.endpoints)
    }
}

/// Extract the service, its endpoints and the declared types.
///
/// Fails with [`Error::NoServiceDeclared`] when no `service <name> {` block exists.
pub fn extract_http_spec(content: &str) -> Result<HttpSpec> {
    let captures = SERVICE_BLOCK
        .captures(content)
        .ok_or(Error::NoServiceDeclared {
            kind: ServiceKind::Http,
        })?;

    let raw_name = &captures[1];
    let service = raw_name
        .strip_suffix(API_SUFFIX)
        .unwrap_or(raw_name)
        .to_string();
    let body = captures.get(2).map_or("", |m| m.as_str());

    Ok(HttpSpec {
        service,
        endpoints: extract_endpoints(body),
        types: extract_types(content),
    })
}

fn extract_endpoints(service_body: &str) -> Vec<Endpoint> {
    HANDLER
        .captures_iter(service_body)
        .map(|caps| Endpoint {
            handler: caps[1].to_string(),
            method: caps[2].to_uppercase(),
            path: caps[3].to_string(),
            request: optional_group(&caps, 4),
            response: optional_group(&caps, 5),
        })
        .collect()
}

fn optional_group(caps: &regex::Captures<'_>, index: usize) -> Option<String> {
    caps.get(index)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract_types(content: &str) -> Vec<String> {
    TYPE_DECL
        .captures_iter(content)
        .map(|caps| caps[1].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strips_api_suffix_and_uppercases_verb() {
        let spec = extract_http_spec("service foo-api { @handler H\n get /x }").unwrap();

        assert_eq!(spec.service, "foo");
        assert_eq!(
            spec.endpoints,
            vec![Endpoint {
                method: "GET".into(),
                path: "/x".into(),
                handler: "H".into(),
                request: None,
                response: None,
            }]
        );
    }

    #[test]
    fn test_missing_service_block_fails() {
        let err = extract_http_spec("type Foo {\n  Name string\n}\n").unwrap_err();
        assert!(matches!(
            err,
            Error::NoServiceDeclared {
                kind: ServiceKind::Http
            }
        ));
    }

    #[test]
    fn test_full_document() {
        let content = indoc! {r#"
            syntax = "v1"

            info(
                title: "User API"
            )

            type LoginReq {
                Username string `json:"username"`
            }

            type LoginResp struct {
                Token string `json:"token"`
            }

            service user-api {
                @handler Login
                post /user/login (LoginReq) returns (LoginResp)

                @handler GetUser
                get /user/:id returns ( UserInfo )

                @handler Ping
                head /ping
            }
        "#};

        let spec = extract_http_spec(content).unwrap();
        assert_eq!(spec.service, "user");
        assert_eq!(spec.types, vec!["LoginReq", "LoginResp"]);

        let routes: Vec<_> = spec
            .endpoints
            .iter()
            .map(|e| (e.method.as_str(), e.path.as_str(), e.handler.as_str()))
            .collect();
        assert_eq!(
            routes,
            vec![
                ("POST", "/user/login", "Login"),
                ("GET", "/user/:id", "GetUser"),
                ("HEAD", "/ping", "Ping"),
            ]
        );
        assert_eq!(spec.endpoints[0].request.as_deref(), Some("LoginReq"));
        assert_eq!(spec.endpoints[0].response.as_deref(), Some("LoginResp"));
        assert_eq!(spec.endpoints[1].request, None);
        assert_eq!(spec.endpoints[1].response.as_deref(), Some("UserInfo"));
    }

    #[test]
    fn test_only_first_service_block_is_read() {
        let content = indoc! {"
            service first {
                @handler A
                get /a
            }
            service second {
                @handler B
                get /b
            }
        "};

        let spec = extract_http_spec(content).unwrap();
        assert_eq!(spec.service, "first");
        assert_eq!(spec.endpoints.len(), 1);
        assert_eq!(spec.endpoints[0].handler, "A");
    }

    #[test]
    fn test_body_ends_at_first_closing_brace() {
        let content = indoc! {"
            service nested {
                @handler A
                get /a
                @server { jwt: Auth }
                @handler B
                get /b
            }
        "};

        let spec = extract_http_spec(content).unwrap();
        assert_eq!(spec.endpoints.len(), 1);
    }

    #[test]
    fn test_partial_handlers_are_skipped() {
        let content = indoc! {"
            service partial {
                @handler NoRoute
                @handler Good
                delete /items/:id
            }
        "};

        let spec = extract_http_spec(content).unwrap();
        // NoRoute is followed by another annotation, not a verb and path
        assert_eq!(spec.endpoints.len(), 1);
        assert_eq!(spec.endpoints[0].handler, "Good");
        assert_eq!(spec.endpoints[0].method, "DELETE");
    }

    #[test]
    fn test_types_collected_across_document_with_duplicates() {
        let content = indoc! {"
            type A {}
            service s {
                @handler H
                get /h
            }
            type B struct {}
            type A {}
        "};

        let spec = extract_http_spec(content).unwrap();
        assert_eq!(spec.types, vec!["A", "B", "A"]);
    }

    #[test]
    fn test_empty_service_block_has_no_endpoints() {
        let spec = extract_http_spec("service empty {}").unwrap();
        assert_eq!(spec.service, "empty");
        assert!(spec.endpoints.is_empty());
    }

    #[test]
    fn test_unclosed_service_block_has_no_endpoints() {
        let content = indoc! {"
            service orders-api {
                @handler ListOrders
                get /orders
        "};

        let spec = extract_http_spec(content).unwrap();
        assert_eq!(spec.service, "orders");
        assert!(spec.endpoints.is_empty());
    }

    #[test]
    fn test_into_service_sets_paths() {
        let spec = extract_http_spec("service s { @handler H\n get /h }").unwrap();
        let service = spec.into_service(Path::new("/proj/api/s.api"));
        assert_eq!(service.kind, ServiceKind::Http);
        assert_eq!(service.path, Path::new("/proj/api"));
        assert_eq!(service.endpoints.len(), 1);
    }
}
