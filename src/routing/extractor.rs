//! Canister id extraction from a request.
//!
//! # Sources (first match wins)
//! 1. Path `/api/v2/canister/<id>/...` (27-character ids only)
//! 2. First label of the Host header, alias-resolved (27 characters only)
//! 3. `canisterId` query parameter, verbatim
//! 4. Referer host (as 2), then the Referer's own query string
//!
//! # Design Decisions
//! - No regex: every source is a prefix/delimiter scan
//! - A source that does not match is "no match", never an error
//! - The query parameter is accepted without a length check; a bogus value
//!   fails range containment later

use serde::{Deserialize, Serialize};

use crate::routing::canister_id::CANISTER_ID_LENGTH;
use crate::routing::context::RequestContext;
use crate::table::alias::AliasTable;

const CANISTER_PATH_PREFIX: &str = "/api/v2/canister/";
const CANISTER_ID_PARAM: &str = "canisterId";

/// How the Referer's query string is used once its host yields nothing.
///
/// The long-standing behavior never produces an id from the Referer query
/// (`Skip`). `Parse` reads its `canisterId` parameter instead. Which of the
/// two is intended has not been settled, so both are kept selectable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefererQueryPolicy {
    #[default]
    Skip,
    Parse,
}

/// Canister id embedded in an API path.
pub fn canister_id_from_path(path: &str) -> Option<&str> {
    let rest = path.strip_prefix(CANISTER_PATH_PREFIX)?;
    let (id, _) = rest.split_once('/')?;
    let valid_chars = id
        .bytes()
        .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase() || b == b'-');

    (valid_chars && id.len() == CANISTER_ID_LENGTH).then_some(id)
}

/// Canister id named by the first label of a host, resolved through aliases.
pub fn canister_id_from_host<'a>(host: &'a str, aliases: &'a AliasTable) -> Option<&'a str> {
    let (label, _) = host.split_once('.')?;
    if label.is_empty() || !label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
        return None;
    }

    let id = aliases.resolve(label).unwrap_or(label);
    (id.len() == CANISTER_ID_LENGTH).then_some(id)
}

/// Host portion of an `http://` or `https://` URL.
pub fn host_from_url(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let end = rest
        .find(|c: char| matches!(c, ':' | '/' | '?' | '#'))
        .unwrap_or(rest.len());
    let host = &rest[..end];

    (!host.is_empty()).then_some(host)
}

/// Canister id derived from a Referer header value.
pub fn canister_id_from_referer(
    referer: &str,
    aliases: &AliasTable,
    policy: RefererQueryPolicy,
) -> Option<String> {
    let host = host_from_url(referer)?;
    if let Some(id) = canister_id_from_host(host, aliases) {
        return Some(id.to_string());
    }

    match policy {
        RefererQueryPolicy::Skip => None,
        RefererQueryPolicy::Parse => {
            let (_, query) = referer.split_once('?')?;
            url::form_urlencoded::parse(query.as_bytes())
                .find(|(name, _)| name == CANISTER_ID_PARAM)
                .map(|(_, value)| value.into_owned())
                .filter(|value| !value.is_empty())
        }
    }
}

/// Canister id from the Host header alone.
pub fn host_canister_id(ctx: &impl RequestContext, aliases: &AliasTable) -> Option<String> {
    ctx.host()
        .and_then(|host| canister_id_from_host(host, aliases))
        .map(str::to_string)
}

/// Canister id for a request, trying every source in order.
pub fn infer_canister_id(
    ctx: &impl RequestContext,
    aliases: &AliasTable,
    policy: RefererQueryPolicy,
) -> Option<String> {
    if let Some(id) = canister_id_from_path(ctx.path()) {
        return Some(id.to_string());
    }

    if let Some(id) = host_canister_id(ctx, aliases) {
        return Some(id);
    }

    if let Some(id) = ctx.query_param(CANISTER_ID_PARAM).filter(|id| !id.is_empty()) {
        return Some(id);
    }

    ctx.referer()
        .and_then(|referer| canister_id_from_referer(referer, aliases, policy))
}

/// Network label of a host: its third-from-last label, unless that label is
/// long enough to be a canister id itself.
///
/// For `<name>.<network>.ic0.app` style hosts this yields the network
/// name. Nothing routes on it yet.
// TODO: resolve custom domains through the network label once a domain → canister mapping is available.
pub fn network_label_from_host(host: &str) -> Option<&str> {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 3 {
        return None;
    }

    let label = labels[labels.len() - 3];
    (!label.is_empty() && label.len() < CANISTER_ID_LENGTH).then_some(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::context::SimpleRequest;

    const ID: &str = "rwlgt-iiaaa-aaaaa-aaaaa-cai";
    const OTHER: &str = "sgymv-uiaaa-aaaaa-aaaia-cai";

    fn aliases() -> AliasTable {
        [
            ("foo".to_string(), ID.to_string()),
            ("broken".to_string(), "too-short".to_string()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_path_extraction() {
        assert_eq!(
            canister_id_from_path(&format!("/api/v2/canister/{}/query", ID)),
            Some(ID)
        );
        // Needs the trailing segment.
        assert_eq!(canister_id_from_path(&format!("/api/v2/canister/{}", ID)), None);
        // Wrong length.
        assert_eq!(canister_id_from_path("/api/v2/canister/aaaaa-aa/call"), None);
        // Uppercase is not accepted in paths.
        assert_eq!(
            canister_id_from_path("/api/v2/canister/RWLGT-IIAAA-AAAAA-AAAAA-CAI/call"),
            None
        );
        assert_eq!(canister_id_from_path("/api/v2/status"), None);
    }

    #[test]
    fn test_host_extraction() {
        let aliases = aliases();
        assert_eq!(canister_id_from_host(&format!("{}.ic0.app", ID), &aliases), Some(ID));
        assert_eq!(canister_id_from_host("foo.example.com", &aliases), Some(ID));
        assert_eq!(canister_id_from_host("broken.example.com", &aliases), None);
        assert_eq!(canister_id_from_host("bar.example.com", &aliases), None);
        // No dot after the label.
        assert_eq!(canister_id_from_host(ID, &aliases), None);
        assert_eq!(canister_id_from_host("foo_bar.example.com", &aliases), None);
    }

    #[test]
    fn test_host_from_url() {
        assert_eq!(host_from_url("https://foo.ic0.app/index.html"), Some("foo.ic0.app"));
        assert_eq!(host_from_url("http://foo.ic0.app:8080"), Some("foo.ic0.app"));
        assert_eq!(host_from_url("http://foo.ic0.app?x=1"), Some("foo.ic0.app"));
        assert_eq!(host_from_url("ftp://foo.ic0.app"), None);
        assert_eq!(host_from_url("https:///path"), None);
    }

    #[test]
    fn test_referer_query_policy() {
        let aliases = aliases();
        let referer = format!("https://ic0.app/?canisterId={}", OTHER);

        assert_eq!(
            canister_id_from_referer(&referer, &aliases, RefererQueryPolicy::Skip),
            None
        );
        assert_eq!(
            canister_id_from_referer(&referer, &aliases, RefererQueryPolicy::Parse),
            Some(OTHER.to_string())
        );
        // The referer host still wins under either policy.
        let hosted = format!("https://foo.ic0.app/?canisterId={}", OTHER);
        assert_eq!(
            canister_id_from_referer(&hosted, &aliases, RefererQueryPolicy::Parse),
            Some(ID.to_string())
        );
        // No query string at all.
        assert_eq!(
            canister_id_from_referer("https://ic0.app/", &aliases, RefererQueryPolicy::Parse),
            None
        );
    }

    #[test]
    fn test_precedence() {
        let aliases = aliases();
        let both = SimpleRequest::new(format!("/api/v2/canister/{}/call", OTHER))
            .with_host(format!("{}.ic0.app", ID));
        assert_eq!(
            infer_canister_id(&both, &aliases, RefererQueryPolicy::Skip).as_deref(),
            Some(OTHER)
        );

        let host_and_query = SimpleRequest::new("/")
            .with_host("foo.ic0.app")
            .with_query("canisterId", OTHER);
        assert_eq!(
            infer_canister_id(&host_and_query, &aliases, RefererQueryPolicy::Skip).as_deref(),
            Some(ID)
        );

        let query_and_referer = SimpleRequest::new("/")
            .with_host("ic0.app")
            .with_query("canisterId", "anything-goes")
            .with_referer(format!("https://{}.ic0.app/", OTHER));
        assert_eq!(
            infer_canister_id(&query_and_referer, &aliases, RefererQueryPolicy::Skip).as_deref(),
            Some("anything-goes")
        );

        let referer_only = SimpleRequest::new("/")
            .with_query("canisterId", "")
            .with_referer(format!("https://{}.ic0.app/", OTHER));
        assert_eq!(
            infer_canister_id(&referer_only, &aliases, RefererQueryPolicy::Skip).as_deref(),
            Some(OTHER)
        );

        assert_eq!(
            infer_canister_id(&SimpleRequest::new("/"), &aliases, RefererQueryPolicy::Parse),
            None
        );
    }

    #[test]
    fn test_host_canister_id_ignores_other_sources() {
        let aliases = aliases();
        let req = SimpleRequest::new(format!("/api/v2/canister/{}/call", OTHER)).with_host("ic0.app");
        assert_eq!(host_canister_id(&req, &aliases), None);

        let req = req.with_host("foo.localhost:8080");
        assert_eq!(host_canister_id(&req, &aliases).as_deref(), Some(ID));
    }

    #[test]
    fn test_network_label() {
        assert_eq!(network_label_from_host("app.mainnet.ic0.app"), Some("mainnet"));
        assert_eq!(network_label_from_host(&format!("{}.ic0.app", ID)), None);
        assert_eq!(network_label_from_host("ic0.app"), None);
    }
}
