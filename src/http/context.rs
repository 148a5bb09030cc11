//! Adapter exposing an HTTP request to the decision pipeline.

use axum::http::header::{HOST, REFERER};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Uri};

use crate::routing::RequestContext;

/// Borrowed request parts plus the response headers collected as annotations.
#[derive(Debug)]
pub struct HttpRequestContext<'a> {
    uri: &'a Uri,
    headers: &'a HeaderMap,
    annotations: HeaderMap,
}

impl<'a> HttpRequestContext<'a> {
    pub fn new(uri: &'a Uri, headers: &'a HeaderMap) -> Self {
        Self {
            uri,
            headers,
            annotations: HeaderMap::new(),
        }
    }

    /// Annotations recorded by the pipeline, ready to go on the response.
    pub fn into_annotations(self) -> HeaderMap {
        self.annotations
    }

    fn header(&self, name: HeaderName) -> Option<&'a str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl RequestContext for HttpRequestContext<'_> {
    fn path(&self) -> &str {
        self.uri.path()
    }

    fn host(&self) -> Option<&str> {
        // HTTP/2 carries the host in the authority, not a header.
        self.header(HOST)
            .or_else(|| self.uri.authority().map(|a| a.as_str()))
    }

    fn query_param(&self, name: &str) -> Option<String> {
        let query = self.uri.query()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    fn referer(&self) -> Option<&str> {
        self.header(REFERER)
    }

    fn annotate(&mut self, key: &'static str, value: String) {
        match HeaderValue::try_from(value) {
            Ok(value) => {
                self.annotations.insert(HeaderName::from_static(key), value);
            }
            Err(e) => tracing::debug!(key, error = %e, "Dropping annotation that is not a valid header value"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::context::NODE_ID_ANNOTATION;

    #[test]
    fn test_reads_request_parts() {
        let uri: Uri = "/index.html?canisterId=abc%2Ddef&x=1".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("foo.ic0.app"));
        headers.insert(REFERER, HeaderValue::from_static("https://bar.ic0.app/"));

        let mut ctx = HttpRequestContext::new(&uri, &headers);
        assert_eq!(ctx.path(), "/index.html");
        assert_eq!(ctx.host(), Some("foo.ic0.app"));
        assert_eq!(ctx.query_param("canisterId").as_deref(), Some("abc-def"));
        assert_eq!(ctx.query_param("missing"), None);
        assert_eq!(ctx.referer(), Some("https://bar.ic0.app/"));

        ctx.annotate(NODE_ID_ANNOTATION, "node-1".to_string());
        let annotations = ctx.into_annotations();
        assert_eq!(annotations.get(NODE_ID_ANNOTATION).unwrap(), "node-1");
    }

    #[test]
    fn test_host_from_authority() {
        let uri: Uri = "https://foo.ic0.app/".parse().unwrap();
        let headers = HeaderMap::new();
        let ctx = HttpRequestContext::new(&uri, &headers);
        assert_eq!(ctx.host(), Some("foo.ic0.app"));
    }
}
