use actix_web::{http::header::CONTENT_TYPE, test};
use async_trait::async_trait;
use manoyukti::proto;
use manoyukti::server::sitemap::{client::ContentLister, init_app, state::App as AppState};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use url::Url;

/// Upstream stand-in returning a fixed list, or failing.
struct FixedLister {
    contents: Option<Vec<proto::Content>>,
    calls: AtomicUsize,
}

#[async_trait]
impl ContentLister for FixedLister {
    async fn list_all(&self) -> anyhow::Result<Vec<proto::Content>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.contents
            .clone()
            .ok_or_else(|| anyhow::anyhow!("status: Unavailable, message: \"tcp connect error\""))
    }
}

fn content(id: &str) -> proto::Content {
    proto::Content {
        id: id.to_owned(),
        ..Default::default()
    }
}

fn initialize_state(contents: Option<Vec<proto::Content>>) -> (AppState, Arc<FixedLister>) {
    let lister = Arc::new(FixedLister {
        contents,
        calls: AtomicUsize::new(0),
    });
    let state = AppState {
        lister: lister.clone(),
        base_url: Url::parse("https://example.com").unwrap(),
    };
    (state, lister)
}

#[actix_web::test]
async fn test_sitemap_when_two_contents_expect_two_locations() {
    let (state, _) = initialize_state(Some(vec![content("a"), content("b")]));
    let app = test::init_service(init_app(&state)).await;
    let req = test::TestRequest::get().uri("/sitemap.xml").to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    let content_type = resp.headers().get(CONTENT_TYPE).unwrap().to_str().unwrap();
    assert_eq!(content_type, "application/xml");

    let body = test::read_body(resp).await;
    let actual = core::str::from_utf8(&body).unwrap();
    assert!(actual.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(actual.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
    assert!(actual.contains("<url><loc>https://example.com/content/a</loc></url>"));
    assert!(actual.contains("<url><loc>https://example.com/content/b</loc></url>"));
    assert_eq!(actual.matches("<url>").count(), 2);
    assert_eq!(actual.matches("<urlset").count(), 1);
}

#[actix_web::test]
async fn test_sitemap_when_upstream_fails_expect_server_error_json() {
    let (state, _) = initialize_state(None);
    let app = test::init_service(init_app(&state)).await;
    let req = test::TestRequest::get().uri("/sitemap.xml").to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_server_error());
    let content_type = resp.headers().get(CONTENT_TYPE).unwrap().to_str().unwrap();
    assert_eq!(content_type, "application/json");

    let actual: serde_json::Value = test::read_body_json(resp).await;
    let expected = serde_json::json!({ "error": "Failed to fetch content list" });
    assert_eq!(actual, expected);
}

#[actix_web::test]
async fn test_sitemap_when_requested_twice_expect_two_upstream_calls() {
    let (state, lister) = initialize_state(Some(vec![content("a")]));
    let app = test::init_service(init_app(&state)).await;

    for _ in 0..2 {
        let req = test::TestRequest::get().uri("/sitemap.xml").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    assert_eq!(lister.calls.load(Ordering::SeqCst), 2);
}

#[actix_web::test]
async fn test_sitemap_when_empty_list_expect_empty_urlset() {
    let (state, _) = initialize_state(Some(vec![]));
    let app = test::init_service(init_app(&state)).await;
    let req = test::TestRequest::get().uri("/sitemap.xml").to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    let body = test::read_body(resp).await;
    let actual = core::str::from_utf8(&body).unwrap();
    assert!(actual.contains("</urlset>"));
    assert!(!actual.contains("<url>"));
}

#[actix_web::test]
async fn test_unknown_path_expect_client_error() {
    let (state, lister) = initialize_state(Some(vec![content("a")]));
    let app = test::init_service(init_app(&state)).await;
    let req = test::TestRequest::get().uri("/content/a").to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_client_error());
    assert_eq!(lister.calls.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn test_sitemap_when_post_expect_client_error() {
    let (state, _) = initialize_state(Some(vec![]));
    let app = test::init_service(init_app(&state)).await;
    let req = test::TestRequest::post().uri("/sitemap.xml").to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_client_error());
}
