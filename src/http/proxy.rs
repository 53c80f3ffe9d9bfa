//! Reverse proxy forwarding.
//!
//! # Responsibilities
//! - Rewrite the request URI onto the upstream authority
//! - Strip hop-by-hop headers in both directions
//! - Set `Host` and the `X-Forwarded-*` headers
//! - Stream the request body up and the response body back
//! - Relay `Connection: upgrade` exchanges once the upstream switches protocols
//!
//! # Design Decisions
//! - One handle per backend rule, built once at registration
//! - All handles share a single pooled client
//! - Upstream failures become 502 with an empty body; no retries
//! - A query configured on the upstream is prepended to the request's
//!
//! # Upgrade Flow
//! ```text
//! client ──Connection: upgrade──▶ proxy ──Connection: upgrade──▶ upstream
//! client ◀──────────101────────── proxy ◀──────────101────────── upstream
//! client ◀═══════ bytes ════════▶ relay task ◀═══════ bytes ═══▶ upstream
//! ```

use std::net::{IpAddr, SocketAddr};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{
        header::{self, HeaderMap, HeaderName, HeaderValue},
        uri::{Authority, PathAndQuery, Scheme},
        Request, StatusCode, Uri, Version,
    },
    response::{IntoResponse, Response},
};
use hyper::{body::Incoming, upgrade::OnUpgrade};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::{TokioExecutor, TokioIo},
};

use crate::config::ConfigError;

/// Pooled HTTP client shared by every backend rule.
pub type ProxyClient = Client<HttpConnector, Body>;

/// Build the shared upstream client.
pub fn new_client() -> ProxyClient {
    Client::builder(TokioExecutor::new()).build(HttpConnector::new())
}

const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
const X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");

/// Headers that only apply to a single transport hop.
const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "proxy-connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Parsed upstream target: authority plus optional base path and query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstream {
    pub authority: Authority,
    pub base_path: String,
    pub query: Option<String>,
}

impl Upstream {
    /// Parse `host[:port][/base][?query]` as the remainder of an `http://` URL.
    pub fn parse(host: &str) -> Result<Self, ConfigError> {
        let uri: Uri = format!("http://{}", host)
            .parse()
            .map_err(|source| ConfigError::InvalidHost {
                host: host.to_string(),
                source,
            })?;

        let authority = uri
            .authority()
            .cloned()
            .ok_or_else(|| ConfigError::MissingAuthority(host.to_string()))?;

        Ok(Self {
            authority,
            base_path: uri.path().trim_end_matches('/').to_string(),
            query: uri.query().filter(|q| !q.is_empty()).map(str::to_string),
        })
    }
}

/// Forwarding handle bound to one upstream.
#[derive(Debug, Clone)]
pub struct ReverseProxy {
    client: ProxyClient,
    authority: Authority,
    host_header: HeaderValue,
    base_path: String,
    query: Option<String>,
}

impl ReverseProxy {
    pub fn new(client: ProxyClient, upstream: Upstream) -> Result<Self, ConfigError> {
        let host_header = HeaderValue::from_str(upstream.authority.as_str())
            .map_err(|_| ConfigError::MissingAuthority(upstream.authority.to_string()))?;

        Ok(Self {
            client,
            authority: upstream.authority,
            host_header,
            base_path: upstream.base_path,
            query: upstream.query,
        })
    }

    pub fn authority(&self) -> &str {
        self.authority.as_str()
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Forward `request` upstream and relay the response.
    pub async fn forward(&self, mut request: Request<Body>) -> Response {
        let client_ip = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        let protocol = upgrade_protocol(request.headers());
        let client_upgrade = protocol.is_some().then(|| hyper::upgrade::on(&mut request));

        let (mut parts, body) = request.into_parts();

        let uri = match self.upstream_uri(&parts.uri) {
            Ok(uri) => uri,
            Err(e) => {
                tracing::error!(upstream = %self.authority, error = %e, "Failed to build upstream URI");
                return StatusCode::BAD_GATEWAY.into_response();
            }
        };

        let inbound_host = parts.headers.get(header::HOST).cloned().or_else(|| {
            parts
                .uri
                .authority()
                .and_then(|a| HeaderValue::from_str(a.as_str()).ok())
        });

        strip_hop_by_hop(&mut parts.headers);
        if let Some(protocol) = protocol {
            restore_upgrade(&mut parts.headers, protocol);
        }
        if let Some(host) = inbound_host {
            parts.headers.insert(X_FORWARDED_HOST, host);
        }
        if let Some(ip) = client_ip {
            append_forwarded_for(&mut parts.headers, ip);
        }
        parts.headers.insert(header::HOST, self.host_header.clone());

        parts.uri = uri;
        parts.version = Version::HTTP_11;

        tracing::debug!(upstream = %self.authority, uri = %parts.uri, "Forwarding request");

        match self.client.request(Request::from_parts(parts, body)).await {
            Ok(response) => match client_upgrade {
                Some(client) if response.status() == StatusCode::SWITCHING_PROTOCOLS => {
                    self.switch_protocols(response, client)
                }
                _ => {
                    let (mut parts, body) = response.into_parts();
                    strip_hop_by_hop(&mut parts.headers);
                    Response::from_parts(parts, Body::new(body))
                }
            },
            Err(e) => {
                tracing::error!(upstream = %self.authority, error = %e, "Upstream request failed");
                StatusCode::BAD_GATEWAY.into_response()
            }
        }
    }

    /// Relay the upstream's 101 and splice both upgraded connections.
    fn switch_protocols(&self, mut response: Response<Incoming>, client: OnUpgrade) -> Response {
        let upstream = hyper::upgrade::on(&mut response);
        let (mut parts, body) = response.into_parts();

        let protocol = parts.headers.get(header::UPGRADE).cloned();
        strip_hop_by_hop(&mut parts.headers);
        if let Some(protocol) = protocol {
            restore_upgrade(&mut parts.headers, protocol);
        }

        let authority = self.authority.clone();
        tokio::spawn(async move {
            let (client, upstream) = match tokio::try_join!(client, upstream) {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::error!(upstream = %authority, error = %e, "Protocol upgrade failed");
                    return;
                }
            };

            let mut client = TokioIo::new(client);
            let mut upstream = TokioIo::new(upstream);
            match tokio::io::copy_bidirectional(&mut client, &mut upstream).await {
                Ok((up, down)) => {
                    tracing::debug!(upstream = %authority, bytes_up = up, bytes_down = down, "Upgraded connection closed");
                }
                Err(e) => {
                    tracing::debug!(upstream = %authority, error = %e, "Upgraded connection aborted");
                }
            }
        });

        Response::from_parts(parts, Body::new(body))
    }

    fn upstream_uri(&self, inbound: &Uri) -> Result<Uri, axum::http::Error> {
        let path = join_path(&self.base_path, inbound.path());
        let request_query = inbound.query().filter(|q| !q.is_empty());
        let path_and_query = match (self.query.as_deref(), request_query) {
            (Some(target), Some(query)) => format!("{}?{}&{}", path, target, query),
            (Some(query), None) | (None, Some(query)) => format!("{}?{}", path, query),
            (None, None) => path,
        };

        Uri::builder()
            .scheme(Scheme::HTTP)
            .authority(self.authority.clone())
            .path_and_query(PathAndQuery::try_from(path_and_query)?)
            .build()
    }
}

/// Join the upstream base path and the request path with a single slash.
fn join_path(base: &str, path: &str) -> String {
    match (base.is_empty(), path.starts_with('/')) {
        (true, true) => path.to_string(),
        (true, false) => format!("/{}", path),
        (false, true) => format!("{}{}", base, path),
        (false, false) => format!("{}/{}", base, path),
    }
}

/// The `Upgrade` value when the request asks to switch protocols.
fn upgrade_protocol(headers: &HeaderMap) -> Option<HeaderValue> {
    let wants_upgrade = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .any(|token| token.trim().eq_ignore_ascii_case("upgrade"));

    if wants_upgrade {
        headers.get(header::UPGRADE).cloned()
    } else {
        None
    }
}

fn restore_upgrade(headers: &mut HeaderMap, protocol: HeaderValue) {
    headers.insert(header::CONNECTION, HeaderValue::from_static("upgrade"));
    headers.insert(header::UPGRADE, protocol);
}

/// Remove hop-by-hop headers, including any named in `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<String> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|token| token.trim().to_ascii_lowercase())
        .filter(|token| !token.is_empty())
        .collect();

    for name in listed.iter().map(String::as_str).chain(HOP_BY_HOP_HEADERS.iter().copied()) {
        headers.remove(name);
    }
}

fn append_forwarded_for(headers: &mut HeaderMap, ip: IpAddr) {
    let prior: Vec<&str> = headers
        .get_all(&X_FORWARDED_FOR)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();

    let value = if prior.is_empty() {
        ip.to_string()
    } else {
        format!("{}, {}", prior.join(", "), ip)
    };

    if let Ok(value) = HeaderValue::from_str(&value) {
        headers.insert(X_FORWARDED_FOR, value);
    }
}
