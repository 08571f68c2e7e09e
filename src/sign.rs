use std::io::Write;

use bytes::{BufMut, BytesMut};
use thiserror::Error;

use crate::query::Query;

/// Domain queried when the caller does not supply one.
pub const DEFAULT_DOMAIN: &str = "http://api.data-publica.com/v1/";

/// Errors produced while building a [Query](crate::Query) or turning it into
/// a signature or a signed URL.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum QueryError {
    /// A required query parameter was empty at construction time.
    #[error("missing required parameter `{0}`")]
    MissingParameter(&'static str),

    /// The canonical signature input could not be assembled.
    #[error("failed to build signature input: {0}")]
    Signing(&'static str),

    /// A parameter value could not be percent-encoded into the URL.
    #[error("failed to percent-encode parameter `{0}`")]
    Encoding(&'static str),

    /// The rendered URL was rejected by the `url` crate.
    #[cfg(feature = "url")]
    #[error("rendered URL failed to parse: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Computes the signature authenticating `query` against `domain`: the SHA-1
/// digest of the canonical signature input, rendered as lowercase hex.
///
/// The canonical input concatenates, in fixed order, the domain, the
/// `<data_ref>/<table_name>/content` path, the filter expression when one is
/// set, then `format`, `key`, `limit`, `offset` and the password, each
/// introduced by a comma. The remote API recomputes this exact byte string
/// to verify the request, so the order and separators are a wire contract.
pub fn sign(query: &Query, domain: &str) -> Result<String, QueryError> {
    let mut temporary_buffer = BytesMut::with_capacity(128);
    let signature_input = build_canonical_signature_input(&mut temporary_buffer, query, domain)?;
    let digest = ring::digest::digest(&ring::digest::SHA1_FOR_LEGACY_USE_ONLY, &signature_input);
    Ok(hex::encode(digest))
}

fn build_canonical_signature_input(
        temporary_buffer: &mut BytesMut,
        query: &Query,
        domain: &str,
    ) -> Result<BytesMut, QueryError> {
    temporary_buffer.clear();
    temporary_buffer.extend_from_slice(domain.as_bytes());
    temporary_buffer.extend_from_slice(query.data_ref().as_bytes());
    temporary_buffer.extend_from_slice(b"/");
    temporary_buffer.extend_from_slice(query.table_name().as_bytes());
    temporary_buffer.extend_from_slice(b"/content");
    if let Some(filters) = query.filters() {
        temporary_buffer.extend_from_slice(b",filter=");
        temporary_buffer.extend_from_slice(filters.as_bytes());
    }
    temporary_buffer.extend_from_slice(b",format=");
    temporary_buffer.extend_from_slice(query.format().as_bytes());
    temporary_buffer.extend_from_slice(b",key=");
    temporary_buffer.extend_from_slice(query.api_key().as_bytes());
    write!(temporary_buffer.writer(), ",limit={},offset={}", query.limit(), query.offset())
        .map_err(|_err| QueryError::Signing("failed to format limit/offset"))?;
    temporary_buffer.extend_from_slice(b",");
    temporary_buffer.extend_from_slice(query.passwd().as_bytes());
    Ok(temporary_buffer.split())
}

/// Renders the signed URL for `query` against `domain`. Query parameters
/// appear in fixed order: `filter` (only when set), `format`, `key`,
/// `limit`, `offset`, `signature`.
pub(crate) fn build_signed_url(query: &Query, domain: &str) -> Result<String, QueryError> {
    let signature = sign(query, domain)?;
    let mut url = String::with_capacity(domain.len() + 128);
    url.push_str(domain);
    url.push_str(query.data_ref());
    url.push('/');
    url.push_str(query.table_name());
    url.push_str("/content?");
    if let Some(filters) = query.filters() {
        push_encoded_param(&mut url, "filter", filters)?;
        url.push('&');
    }
    push_encoded_param(&mut url, "format", query.format())?;
    url.push('&');
    push_encoded_param(&mut url, "key", query.api_key())?;
    url.push('&');
    push_encoded_param(&mut url, "limit", &query.limit().to_string())?;
    url.push('&');
    push_encoded_param(&mut url, "offset", &query.offset().to_string())?;
    url.push('&');
    push_encoded_param(&mut url, "signature", &signature)?;
    Ok(url)
}

fn push_encoded_param(url: &mut String, name: &'static str, value: &str) -> Result<(), QueryError> {
    use std::fmt::Write as _;
    url.push_str(name);
    url.push('=');
    write!(url, "{}", urlencoding::Encoded(value))
        .map_err(|_err| QueryError::Encoding(name))?;
    Ok(())
}
