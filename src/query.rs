use std::fmt::Debug;

use crate::sign::{self, QueryError, DEFAULT_DOMAIN};

/// Response format requested when [QueryOptions::format] is unset.
pub const DEFAULT_FORMAT: &str = "json";

/// Row limit applied when [QueryOptions::limit] is unset.
pub const DEFAULT_LIMIT: u64 = 50;

/// Row offset applied when [QueryOptions::offset] is unset.
pub const DEFAULT_OFFSET: u64 = 0;

/// Optional query parameters. Any field left unset falls back to its
/// documented default at construction.
#[derive(Clone, Debug, Default)]
pub struct QueryOptions {
    /// Response format understood by the API (`json`, `csv` or `excel`).
    /// Defaults to [DEFAULT_FORMAT]. The value is hashed and rendered
    /// verbatim, so unrecognized formats are rejected by the server, not
    /// here.
    pub format: Option<String>,

    /// Maximum number of rows returned. Defaults to [DEFAULT_LIMIT].
    pub limit: Option<u64>,

    /// Number of rows skipped from the start of the result set. Defaults to
    /// [DEFAULT_OFFSET].
    pub offset: Option<u64>,
}

/// A single query against the content API, holding everything needed to
/// produce the request [signature](Query::sign) and the signed
/// [URL](Query::to_url).
///
/// A query is constructed once with its final required parameters. The only
/// mutation allowed afterwards is (re)setting the filter expression via
/// [set_filters](Query::set_filters); signature and URL derivation are pure
/// reads and can be repeated freely.
///
/// The password authenticates the request through the signature and is never
/// rendered into the URL in plaintext. It is also withheld from the `Debug`
/// representation.
#[derive(Clone)]
pub struct Query {
    api_key: String,
    passwd: String,
    data_ref: String,
    table_name: String,
    format: String,
    limit: u64,
    offset: u64,
    filters: Option<String>,
}

impl Query {
    /// Builds a new [Query]. The first four parameters are mandatory and
    /// must be non-empty; `options` covers the defaultable rest.
    pub fn new(
            api_key: impl Into<String>,
            passwd: impl Into<String>,
            data_ref: impl Into<String>,
            table_name: impl Into<String>,
            options: QueryOptions) -> Result<Self, QueryError> {
        let api_key = api_key.into();
        let passwd = passwd.into();
        let data_ref = data_ref.into();
        let table_name = table_name.into();
        if api_key.is_empty() {
            return Err(QueryError::MissingParameter("api_key"));
        }
        if passwd.is_empty() {
            return Err(QueryError::MissingParameter("passwd"));
        }
        if data_ref.is_empty() {
            return Err(QueryError::MissingParameter("data_ref"));
        }
        if table_name.is_empty() {
            return Err(QueryError::MissingParameter("table_name"));
        }
        Ok(Self {
            api_key,
            passwd,
            data_ref,
            table_name,
            format: options.format.unwrap_or_else(|| DEFAULT_FORMAT.to_string()),
            limit: options.limit.unwrap_or(DEFAULT_LIMIT),
            offset: options.offset.unwrap_or(DEFAULT_OFFSET),
            filters: None,
        })
    }

    /// Sets the filter expression for this query. The string is hashed and
    /// rendered as-is and must comply with the API's filter syntax; setting
    /// a new expression overwrites the previous one.
    pub fn set_filters(&mut self, filters: impl Into<String>) {
        self.filters = Some(filters.into());
    }

    /// Sets the filter expression from a JSON value, rendered in its
    /// compact form. For example `json!({"index.name": "Recels"})` becomes
    /// the expression `{"index.name":"Recels"}`.
    pub fn set_filters_json(&mut self, filters: &serde_json::Value) {
        self.filters = Some(filters.to_string());
    }

    /// Computes the request signature against `domain`. See [sign()](crate::sign()).
    pub fn sign(&self, domain: &str) -> Result<String, QueryError> {
        sign::sign(self, domain)
    }

    /// Renders the fully encoded, signed URL for this query. `None` selects
    /// the [default domain](crate::DEFAULT_DOMAIN). Issuing the GET request
    /// is the caller's job.
    pub fn to_url(&self, domain: Option<&str>) -> Result<String, QueryError> {
        sign::build_signed_url(self, domain.unwrap_or(DEFAULT_DOMAIN))
    }

    /// The developer API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The dataset reference.
    pub fn data_ref(&self) -> &str {
        &self.data_ref
    }

    /// The data table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// The requested response format.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// The row limit.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// The row offset.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// The filter expression, if one was set.
    pub fn filters(&self) -> Option<&str> {
        self.filters.as_deref()
    }

    pub(crate) fn passwd(&self) -> &str {
        &self.passwd
    }
}

impl Debug for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("api_key", &self.api_key)
            .field("passwd", &"<redacted>")
            .field("data_ref", &self.data_ref)
            .field("table_name", &self.table_name)
            .field("format", &self.format)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .field("filters", &self.filters)
            .finish()
    }
}

/// Adds support for rendering a [Query] as a parsed [url::Url].
///
/// Requires the `url` feature to be enabled.
#[cfg(feature = "url")]
mod url_support {
    use super::Query;
    use crate::sign::QueryError;

    impl Query {
        /// Renders the signed URL and parses it into a [url::Url].
        pub fn to_parsed_url(&self, domain: Option<&str>) -> Result<url::Url, QueryError> {
            Ok(url::Url::parse(&self.to_url(domain)?)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults_applied_when_options_unset() {
        let query = Query::new("k", "p", "d", "t", QueryOptions::default()).unwrap();
        assert_eq!(query.format(), "json");
        assert_eq!(query.limit(), 50);
        assert_eq!(query.offset(), 0);
        assert_eq!(query.filters(), None);
    }

    #[test]
    fn explicit_options_override_defaults() {
        let options = QueryOptions {
            format: Some("csv".to_string()),
            limit: Some(5),
            offset: Some(2),
        };
        let query = Query::new("k", "p", "d", "t", options).unwrap();
        assert_eq!(query.format(), "csv");
        assert_eq!(query.limit(), 5);
        assert_eq!(query.offset(), 2);
    }

    #[rstest]
    #[case::api_key("", "p", "d", "t", "api_key")]
    #[case::passwd("k", "", "d", "t", "passwd")]
    #[case::data_ref("k", "p", "", "t", "data_ref")]
    #[case::table_name("k", "p", "d", "", "table_name")]
    fn empty_required_parameter_is_rejected(
        #[case] api_key: &str,
        #[case] passwd: &str,
        #[case] data_ref: &str,
        #[case] table_name: &str,
        #[case] missing: &'static str,
    ) {
        let err = Query::new(api_key, passwd, data_ref, table_name, QueryOptions::default())
            .unwrap_err();
        assert_eq!(err, QueryError::MissingParameter(missing));
    }

    #[test]
    fn resetting_filters_overwrites() {
        let mut query = Query::new("k", "p", "d", "t", QueryOptions::default()).unwrap();
        query.set_filters("a=1");
        query.set_filters("b=2");
        assert_eq!(query.filters(), Some("b=2"));
    }

    #[test]
    fn json_filters_render_compact() {
        let mut query = Query::new("k", "p", "d", "t", QueryOptions::default()).unwrap();
        query.set_filters_json(&serde_json::json!({"index.name": "Recels"}));
        assert_eq!(query.filters(), Some(r#"{"index.name":"Recels"}"#));
    }

    #[test]
    fn debug_withholds_passwd() {
        let query = Query::new("k", "s3cr3t-passwd", "d", "t", QueryOptions::default()).unwrap();
        let rendered = format!("{:?}", query);
        assert!(!rendered.contains("s3cr3t-passwd"));
        assert!(rendered.contains("<redacted>"));
    }
}
