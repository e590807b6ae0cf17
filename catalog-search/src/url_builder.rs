//! Merges protocol parameters into caller-supplied service URLs.

use anyhow::{Context, Result};
use reqwest::Url;

/// Returns `base` with `defaults` added for every key the caller did not
/// already supply, and `forced` replacing whatever the caller supplied.
///
/// Keys are compared case-insensitively, so a caller's `request=GetMap`
/// is removed before `REQUEST=GetCapabilities` is set.
pub fn build_url(base: &str, defaults: &[(&str, &str)], forced: &[(&str, &str)]) -> Result<String> {
    let mut url = Url::parse(base).with_context(|| format!("Invalid service URL: {}", base))?;

    let is_forced = |key: &str| forced.iter().any(|(k, _)| k.eq_ignore_ascii_case(key));

    let caller: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_forced(&**key))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut merged: Vec<(String, String)> = defaults
        .iter()
        .filter(|(key, _)| !is_forced(*key))
        .filter(|(key, _)| !caller.iter().any(|(k, _)| k.eq_ignore_ascii_case(key)))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    merged.extend(caller);
    merged.extend(forced.iter().map(|(key, value)| (key.to_string(), value.to_string())));

    if merged.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(merged);
    }
    Ok(url.to_string())
}

/// Capabilities request URL for an OGC service: `SERVICE` and `REQUEST` are
/// forced, `VERSION` is only a default.
pub fn capabilities_url(base: &str, service: &str, version: &str) -> Result<String> {
    build_url(
        base,
        &[("VERSION", version)],
        &[("SERVICE", service), ("REQUEST", "GetCapabilities")],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_of(url: &str) -> Vec<(String, String)> {
        Url::parse(url)
            .unwrap()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_defaults_added_to_bare_url() {
        let url = capabilities_url("https://maps.example.org/wms", "WMS", "1.3.0").unwrap();
        assert_eq!(
            query_of(&url),
            vec![
                ("VERSION".to_string(), "1.3.0".to_string()),
                ("SERVICE".to_string(), "WMS".to_string()),
                ("REQUEST".to_string(), "GetCapabilities".to_string()),
            ]
        );
    }

    #[test]
    fn test_caller_parameters_take_precedence_over_defaults() {
        let url = capabilities_url(
            "https://maps.example.org/wms?version=1.1.1&map=/srv/roads.map",
            "WMS",
            "1.3.0",
        )
        .unwrap();
        let query = query_of(&url);
        assert!(query.contains(&("version".to_string(), "1.1.1".to_string())));
        assert!(query.contains(&("map".to_string(), "/srv/roads.map".to_string())));
        assert!(!query.iter().any(|(k, _)| k == "VERSION"));
    }

    #[test]
    fn test_conflicting_request_is_cleared() {
        let url = capabilities_url(
            "https://maps.example.org/wms?request=GetMap&REQUEST=GetLegendGraphic&layers=a",
            "WMS",
            "1.3.0",
        )
        .unwrap();
        let query = query_of(&url);
        let requests: Vec<&(String, String)> = query
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case("request"))
            .collect();
        assert_eq!(requests, vec![&("REQUEST".to_string(), "GetCapabilities".to_string())]);
        assert!(query.contains(&("layers".to_string(), "a".to_string())));
    }

    #[test]
    fn test_no_parameters_leaves_url_untouched() {
        let url = build_url("https://maps.example.org/csw", &[], &[]).unwrap();
        assert_eq!(url, "https://maps.example.org/csw");
    }

    #[test]
    fn test_malformed_url_is_an_error() {
        let err = build_url("not a url", &[], &[]).unwrap_err();
        assert!(err.to_string().contains("Invalid service URL"));
    }
}
