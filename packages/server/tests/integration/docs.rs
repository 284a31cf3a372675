use crate::common::{TestApp, routes};

#[tokio::test]
async fn api_reference_page_lists_blog_routes() {
    let app = TestApp::with_posts(vec![]).await;

    let res = app.get("/scalar").await;

    assert_eq!(res.status, 200);
    assert!(res.text.contains("/api/blogs"));
    assert!(res.text.contains("/api/blogs/{slug}"));
    assert!(res.text.contains("/api/health"));
}

#[tokio::test]
async fn api_version_matches_health_report() {
    let app = TestApp::with_posts(vec![]).await;
    let version = env!("CARGO_PKG_VERSION");

    let docs = app.get("/scalar").await;
    let health = app.get(routes::HEALTH).await;

    assert!(docs.text.contains(&format!(r#""version":"{version}""#)));
    assert_eq!(health.body["version"], version);
}
