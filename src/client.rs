use std::fmt::Debug;

use crate::query::{Query, QueryOptions};
use crate::sign::{QueryError, DEFAULT_DOMAIN};

/// Convenience wrapper holding developer credentials and a base URL, so
/// repeated queries do not re-thread them. The client performs no network
/// I/O; it only produces [Query] values and signed URLs for a transport of
/// the caller's choosing.
pub struct Client {
    api_key: String,
    passwd: String,
    base_url: String,
}

impl Client {
    /// Builds a client for the [default domain](crate::DEFAULT_DOMAIN).
    /// Both credentials must be non-empty.
    pub fn new(api_key: impl Into<String>, passwd: impl Into<String>) -> Result<Self, QueryError> {
        let api_key = api_key.into();
        let passwd = passwd.into();
        if api_key.is_empty() {
            return Err(QueryError::MissingParameter("api_key"));
        }
        if passwd.is_empty() {
            return Err(QueryError::MissingParameter("passwd"));
        }
        Ok(Self {
            api_key,
            passwd,
            base_url: DEFAULT_DOMAIN.to_string(),
        })
    }

    /// Overrides the queried domain, e.g. for a staging deployment.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The domain queries are signed against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds a [Query] carrying this client's credentials.
    pub fn query(
            &self,
            data_ref: impl Into<String>,
            table_name: impl Into<String>,
            options: QueryOptions) -> Result<Query, QueryError> {
        Query::new(self.api_key.clone(), self.passwd.clone(), data_ref, table_name, options)
    }

    /// Renders the signed URL for `query` against this client's base URL.
    pub fn url_for(&self, query: &Query) -> Result<String, QueryError> {
        query.to_url(Some(&self.base_url))
    }
}

impl Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("api_key", &self.api_key)
            .field("passwd", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}
