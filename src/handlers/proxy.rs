use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, Uri},
    response::{IntoResponse, Response},
};
use tracing::debug;
use url::Url;

use crate::errors::{AppError, Result};
use crate::AppState;

/// Headers that describe this hop and must not be replayed upstream.
/// Accept-Encoding goes too since the upstream body is relayed without decoding.
const HOP_HEADERS: [header::HeaderName; 4] = [
    header::HOST,
    header::CONTENT_LENGTH,
    header::CONNECTION,
    header::ACCEPT_ENCODING,
];

const PROXY_PREFIX: &str = "/proxy";

/// ANY /proxy/*path - replay the request against `UPSTREAM_API_URL`
pub async fn forward(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let base = state
        .upstream
        .as_ref()
        .ok_or_else(|| AppError::NotConfigured("UPSTREAM_API_URL not set".to_string()))?;
    // Raw path: percent escapes such as `%3F` must reach upstream untouched
    let path = uri.path().strip_prefix(PROXY_PREFIX).unwrap_or(uri.path());
    let target = upstream_target(base, path, uri.query())?;

    let mut forwarded = headers;
    for name in HOP_HEADERS {
        forwarded.remove(name);
    }

    debug!("Proxying {} {} -> {}", method, uri, target);

    let mut request = state
        .http
        .request(method.clone(), target)
        .headers(forwarded);
    if method != Method::GET && method != Method::HEAD {
        request = request.body(body);
    }

    let upstream = request.send().await?;
    let status = upstream.status();
    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("text/plain"));
    let body = upstream.bytes().await?;

    Ok((status, [(header::CONTENT_TYPE, content_type)], body).into_response())
}

fn upstream_target(base: &Url, path: &str, query: Option<&str>) -> Result<Url> {
    let mut target = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        target.push('?');
        target.push_str(query);
    }

    Url::parse(&target).map_err(|e| AppError::BadRequest(format!("Invalid proxy path: {}", e)))
}
