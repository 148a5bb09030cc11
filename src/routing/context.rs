//! Request view consumed by the decision pipeline.
//!
//! The pipeline reads the path, Host, query parameters and Referer of a
//! request and writes response annotations back. [`SimpleRequest`] is an
//! owned implementation for callers that do not have an HTTP request at
//! hand; the HTTP shell adapts axum requests in `http::context`.

/// Annotation carrying the resolved subnet id.
pub const SUBNET_ID_ANNOTATION: &str = "x-ic-subnet-id";
/// Annotation carrying the selected node id.
pub const NODE_ID_ANNOTATION: &str = "x-ic-node-id";
/// Annotation carrying the decoded canister key.
pub const CANISTER_ID_ANNOTATION: &str = "x-ic-canister-id";

/// Read and annotate access to one request.
pub trait RequestContext {
    /// Request path, without query string.
    fn path(&self) -> &str;

    fn host(&self) -> Option<&str>;

    /// Decoded value of the first query parameter named `name`.
    fn query_param(&self, name: &str) -> Option<String>;

    fn referer(&self) -> Option<&str>;

    /// Record a response annotation.
    fn annotate(&mut self, key: &'static str, value: String);
}

/// Owned request description.
#[derive(Debug, Clone, Default)]
pub struct SimpleRequest {
    pub path: String,
    pub host: Option<String>,
    pub query: Vec<(String, String)>,
    pub referer: Option<String>,
    pub annotations: Vec<(&'static str, String)>,
}

impl SimpleRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    /// Value of a recorded annotation.
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl RequestContext for SimpleRequest {
    fn path(&self) -> &str {
        &self.path
    }

    fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    fn query_param(&self, name: &str) -> Option<String> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    fn referer(&self) -> Option<&str> {
        self.referer.as_deref()
    }

    fn annotate(&mut self, key: &'static str, value: String) {
        self.annotations.push((key, value));
    }
}
