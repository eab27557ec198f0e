mod common;

use std::collections::HashMap;

use common::TestServer;
use corpus_core::azure::fetch_build_logs;

fn listing_body(base_url: &str, ids: &[u32]) -> String {
    let descriptors: Vec<String> = ids
        .iter()
        .map(|id| format!(r#"{{"id": {id}, "url": "{base_url}/logs/{id}"}}"#))
        .collect();
    format!(r#"{{"count": {}, "value": [{}]}}"#, ids.len(), descriptors.join(","))
}

/// All segments download: contents are concatenated with newline separators
/// in listing order.
#[test]
fn concatenates_all_segments_in_order() {
    let mut server = TestServer::bind();
    let base = server.base_url.clone();

    let mut routes = HashMap::new();
    routes.insert("/logs".to_string(), (200, listing_body(&base, &[1, 2, 3])));
    routes.insert("/logs/1".to_string(), (200, "alpha".to_string()));
    routes.insert("/logs/2".to_string(), (200, "beta".to_string()));
    routes.insert("/logs/3".to_string(), (200, "gamma".to_string()));
    server.run(routes);

    let agent = ureq::agent();
    let logs = fetch_build_logs(&agent, &format!("{base}/logs")).unwrap();
    assert_eq!(logs.fetched, 3);
    assert_eq!(logs.skipped, 0);
    assert_eq!(logs.content, "alpha\nbeta\ngamma");
}

/// Partial success is success: a failing segment is skipped silently and
/// the rest are still concatenated.
#[test]
fn skips_failing_segments() {
    let mut server = TestServer::bind();
    let base = server.base_url.clone();

    let mut routes = HashMap::new();
    routes.insert("/logs".to_string(), (200, listing_body(&base, &[1, 2, 3])));
    routes.insert("/logs/1".to_string(), (200, "alpha".to_string()));
    // /logs/2 intentionally unregistered: that segment 404s
    routes.insert("/logs/3".to_string(), (200, "gamma".to_string()));
    server.run(routes);

    let agent = ureq::agent();
    let logs = fetch_build_logs(&agent, &format!("{base}/logs")).unwrap();
    assert_eq!(logs.fetched, 2);
    assert_eq!(logs.skipped, 1);
    assert_eq!(logs.content, "alpha\ngamma");
}

/// A descriptor without a URL is skipped, not an error.
#[test]
fn skips_descriptors_without_url() {
    let mut server = TestServer::bind();
    let base = server.base_url.clone();

    let listing =
        format!(r#"{{"count": 2, "value": [{{"id": 1}}, {{"id": 2, "url": "{base}/logs/2"}}]}}"#);
    let mut routes = HashMap::new();
    routes.insert("/logs".to_string(), (200, listing));
    routes.insert("/logs/2".to_string(), (200, "only".to_string()));
    server.run(routes);

    let agent = ureq::agent();
    let logs = fetch_build_logs(&agent, &format!("{base}/logs")).unwrap();
    assert_eq!(logs.fetched, 1);
    assert_eq!(logs.skipped, 1);
    assert_eq!(logs.content, "only");
}

/// Total failure degrades to None: a failing listing request...
#[test]
fn returns_none_when_listing_fails() {
    let server = common::serve(HashMap::new());
    let agent = ureq::agent();
    assert!(fetch_build_logs(&agent, &format!("{}/logs", server.base_url)).is_none());
}

/// ...or every segment failing.
#[test]
fn returns_none_when_every_segment_fails() {
    let mut server = TestServer::bind();
    let base = server.base_url.clone();

    let mut routes = HashMap::new();
    routes.insert("/logs".to_string(), (200, listing_body(&base, &[1, 2])));
    server.run(routes);

    let agent = ureq::agent();
    assert!(fetch_build_logs(&agent, &format!("{base}/logs")).is_none());
}

/// An empty listing yields None as well.
#[test]
fn returns_none_for_empty_listing() {
    let mut routes = HashMap::new();
    routes.insert("/logs".to_string(), (200, r#"{"count": 0, "value": []}"#.to_string()));
    let server = common::serve(routes);

    let agent = ureq::agent();
    assert!(fetch_build_logs(&agent, &format!("{}/logs", server.base_url)).is_none());
}
