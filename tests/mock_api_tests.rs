//! HTTP retrieval tests
//!
//! These tests serve subtitle documents from a local mock server and check the
//! loader's behavior for successful fetches and each class of failure.

use std::time::Duration;
use subcue::config::Config;
use subcue::source::{open_source, HttpSource, SubtitleSource};
use subcue::{CaptionError, CaptionStore, SubtitleLoader};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VTT: &str = "WEBVTT

1
00:00:01.000 --> 00:00:04.000
<v Alice>Hello world</v>

2
00:00:05.000 --> 00:00:07.500
Line one
Line two
";

async fn serve(route: &str, response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

fn stale_store() -> CaptionStore {
    let mut store = CaptionStore::new();
    store.load(vec![subcue::Cue::new(0.0, 100.0, "stale")]);
    store
}

// ============================================================================
// HttpSource
// ============================================================================

mod http_source_tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_text() {
        let server = serve("/subs.vtt", ResponseTemplate::new(200).set_body_string(VTT)).await;

        let text = HttpSource::new()
            .fetch(&format!("{}/subs.vtt", server.uri()))
            .await
            .unwrap();

        assert_eq!(text, VTT);
    }

    #[tokio::test]
    async fn test_non_success_status_is_retrieval_failure() {
        let server = serve("/subs.vtt", ResponseTemplate::new(404)).await;

        let result = HttpSource::new()
            .fetch(&format!("{}/subs.vtt", server.uri()))
            .await;

        match result {
            Err(CaptionError::RetrievalFailure(msg)) => assert!(msg.contains("404")),
            other => panic!("expected RetrievalFailure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_is_retrieval_failure() {
        let server = serve(
            "/slow.vtt",
            ResponseTemplate::new(200)
                .set_body_string(VTT)
                .set_delay(Duration::from_secs(3)),
        )
        .await;

        let config = Config {
            request_timeout_secs: 1,
            ..Config::default()
        };
        let result = HttpSource::from_config(&config)
            .unwrap()
            .fetch(&format!("{}/slow.vtt", server.uri()))
            .await;

        assert!(matches!(result, Err(CaptionError::RetrievalFailure(_))));
    }

    #[tokio::test]
    async fn test_configured_user_agent_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/subs.vtt"))
            .and(header("user-agent", "subcue-test"))
            .respond_with(ResponseTemplate::new(200).set_body_string(VTT))
            .expect(1)
            .mount(&server)
            .await;

        let config = Config {
            user_agent: Some("subcue-test".to_string()),
            ..Config::default()
        };
        let source = open_source(&server.uri(), &config).unwrap();
        let text = source
            .fetch(&format!("{}/subs.vtt", server.uri()))
            .await
            .unwrap();

        assert!(text.starts_with("WEBVTT"));
    }

    #[tokio::test]
    async fn test_rejects_non_http_scheme() {
        let result = HttpSource::new().fetch("ftp://example.com/subs.vtt").await;
        assert!(matches!(result, Err(CaptionError::InvalidSourceReference(_))));
    }
}

// ============================================================================
// Loader over HTTP
// ============================================================================

mod http_loader_tests {
    use super::*;

    #[tokio::test]
    async fn test_load_and_query() {
        let server = serve("/subs.vtt", ResponseTemplate::new(200).set_body_string(VTT)).await;
        let loader = SubtitleLoader::new(Box::new(HttpSource::new()));
        let mut store = CaptionStore::new();

        let count = loader
            .load(&format!("{}/subs.vtt", server.uri()), &mut store)
            .await
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(store.caption_at(2.0).unwrap(), "Hello world");
        assert_eq!(store.caption_at(4.5).unwrap(), "");
        assert_eq!(store.caption_at(6.0).unwrap(), "Line one\nLine two");
    }

    #[tokio::test]
    async fn test_server_error_clears_store() {
        let server = serve("/subs.vtt", ResponseTemplate::new(500)).await;
        let loader = SubtitleLoader::new(Box::new(HttpSource::new()));
        let mut store = stale_store();

        let result = loader
            .load(&format!("{}/subs.vtt", server.uri()), &mut store)
            .await;

        assert!(matches!(result, Err(CaptionError::RetrievalFailure(_))));
        assert!(store.is_empty());
        assert_eq!(store.caption_at(1.0).unwrap(), "");
    }

    #[tokio::test]
    async fn test_malformed_body_clears_store() {
        let server = serve(
            "/bad.vtt",
            ResponseTemplate::new(200).set_body_string("aa:bb:cc --> 00:00:05.000\nHi"),
        )
        .await;
        let loader = SubtitleLoader::new(Box::new(HttpSource::new()));
        let mut store = stale_store();

        let result = loader
            .load(&format!("{}/bad.vtt", server.uri()), &mut store)
            .await;

        assert!(matches!(result, Err(CaptionError::MalformedTimestamp(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_empty_body_is_empty_result() {
        let server = serve(
            "/empty.vtt",
            ResponseTemplate::new(200).set_body_string("WEBVTT\n"),
        )
        .await;
        let loader = SubtitleLoader::new(Box::new(HttpSource::new()));
        let mut store = stale_store();

        let result = loader
            .load(&format!("{}/empty.vtt", server.uri()), &mut store)
            .await;

        assert!(matches!(result, Err(CaptionError::EmptyResult)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_locator_keeps_store() {
        let loader = SubtitleLoader::new(Box::new(HttpSource::new()));
        let mut store = stale_store();

        let result = loader.load("mailto:someone@example.com", &mut store).await;

        assert!(matches!(result, Err(CaptionError::InvalidSourceReference(_))));
        assert_eq!(store.caption_at(1.0).unwrap(), "stale");
    }

    #[tokio::test]
    async fn test_load_all_tracks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/en.vtt"))
            .respond_with(ResponseTemplate::new(200).set_body_string(VTT))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/fr.vtt"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("WEBVTT\n\n00:00:01.000 --> 00:00:04.000\nBonjour"),
            )
            .mount(&server)
            .await;

        let en = format!("{}/en.vtt", server.uri());
        let fr = format!("{}/fr.vtt", server.uri());
        let missing = format!("{}/de.vtt", server.uri());

        let loader = SubtitleLoader::new(Box::new(HttpSource::new()));
        let results = loader
            .load_all(&[en.as_str(), fr.as_str(), missing.as_str()])
            .await;

        assert_eq!(results[0].as_ref().unwrap().caption_at(2.0).unwrap(), "Hello world");
        assert_eq!(results[1].as_ref().unwrap().caption_at(2.0).unwrap(), "Bonjour");
        assert!(matches!(results[2], Err(CaptionError::RetrievalFailure(_))));
    }
}
