//! End-to-end tests against a real MongoDB. They need Docker:
//! `cargo test -p server -- --ignored`

use std::sync::atomic::{AtomicU32, Ordering};

use mongodb::bson::{self, doc};
use mongodb::{Client, Collection};
use testcontainers::ContainerAsync;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::mongo::Mongo;
use tokio::sync::OnceCell;

use crate::common::{TestApp, routes};
use server::config::DatabaseConfig;
use server::database::MongoConnector;
use server::entity::blog;

/// MongoDB container shared across the tests in this binary.
static SHARED_MONGO: OnceCell<(ContainerAsync<Mongo>, u16)> = OnceCell::const_new();

/// Monotonic counter for unique database names.
static DB_COUNTER: AtomicU32 = AtomicU32::new(0);

async fn shared_mongo_port() -> u16 {
    let (_, port) = SHARED_MONGO
        .get_or_init(|| async {
            let container = Mongo::default()
                .start()
                .await
                .expect("Failed to start MongoDB container");
            let port = container
                .get_host_port_ipv4(27017)
                .await
                .expect("Failed to get MongoDB port");
            (container, port)
        })
        .await;
    *port
}

struct MongoApp {
    app: TestApp,
    blogs: Collection<blog::Document>,
}

/// Spawn the server against a fresh database in the shared container.
async fn spawn_mongo_app() -> MongoApp {
    let port = shared_mongo_port().await;
    let uri = format!("mongodb://127.0.0.1:{port}");
    let name = format!("test_{}", DB_COUNTER.fetch_add(1, Ordering::Relaxed));

    let client = Client::with_uri_str(&uri)
        .await
        .expect("Failed to create seeding client");
    let blogs = client.database(&name).collection(blog::COLLECTION);

    let database = DatabaseConfig {
        url: Some(uri),
        name,
        ping_on_connect: true,
        server_selection_timeout_secs: Some(10),
        ..Default::default()
    };
    let app = TestApp::spawn(MongoConnector, database).await;

    MongoApp { app, blogs }
}

fn document(title: &str, slug: &str) -> blog::Document {
    let now = bson::DateTime::now();
    blog::Document {
        id: None,
        title: title.to_string(),
        slug: slug.to_string(),
        content: "World".to_string(),
        date: "2024-01-01".to_string(),
        tags: vec!["intro".to_string()],
        thumbnail: "t.png".to_string(),
        image: "i.png".to_string(),
        created_at: Some(now),
        updated_at: Some(now),
    }
}

#[tokio::test]
#[ignore = "requires docker"]
async fn seeded_post_is_served_with_timestamps() {
    let MongoApp { app, blogs } = spawn_mongo_app().await;
    blogs
        .insert_one(document("Hello", "hello"))
        .await
        .expect("insert blog");

    let res = app.get(routes::BLOGS).await;

    assert_eq!(res.status, 200, "{}", res.text);
    let posts = res.body.as_array().expect("array body");
    assert_eq!(posts.len(), 1);
    let post = &posts[0];
    assert_eq!(post["title"], "Hello");
    assert_eq!(post["slug"], "hello");
    assert_eq!(post["content"], "World");
    assert_eq!(post["date"], "2024-01-01");
    assert_eq!(post["tags"], serde_json::json!(["intro"]));
    assert_eq!(post["thumbnail"], "t.png");
    assert_eq!(post["image"], "i.png");
    assert!(post["_id"].is_string());
    assert!(post["createdAt"].is_string());
    assert!(post["updatedAt"].is_string());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn empty_collection_returns_empty_array() {
    let MongoApp { app, .. } = spawn_mongo_app().await;

    let res = app.get(routes::BLOGS).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body, serde_json::json!([]));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn returns_all_documents() {
    let MongoApp { app, blogs } = spawn_mongo_app().await;
    blogs
        .insert_many(vec![
            document("A", "a"),
            document("B", "b"),
            document("C", "c"),
        ])
        .await
        .expect("insert blogs");

    let res = app.get(routes::BLOGS).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.slugs(), vec!["a", "b", "c"]);
    assert_eq!(app.db.attempts(), 1);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn slug_lookup_is_case_insensitive_and_literal() {
    let MongoApp { app, blogs } = spawn_mongo_app().await;
    blogs
        .insert_many(vec![document("Dots", "v1.0-notes"), document("Other", "v100-notes")])
        .await
        .expect("insert blogs");

    let res = app.get(&routes::blog("V1.0-NOTES")).await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["title"], "Dots");

    // The dot must not act as a wildcard.
    let res = app.get(&routes::blog("v1x0-notes")).await;
    assert_eq!(res.status, 404);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn slug_lookup_trims_stored_slugs_and_rejects_nul() {
    let MongoApp { app, blogs } = spawn_mongo_app().await;
    blogs
        .insert_one(document("Padded", "  padded-post "))
        .await
        .expect("insert blog");

    let res = app.get(&routes::blog("Padded-Post")).await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["title"], "Padded");

    let res = app.get("/api/blogs/%00").await;
    assert_eq!(res.status, 404, "{}", res.text);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn malformed_document_is_a_500() {
    let MongoApp { app, blogs } = spawn_mongo_app().await;
    blogs
        .clone_with_type::<bson::Document>()
        .insert_one(doc! { "title": "no other fields" })
        .await
        .expect("insert raw document");

    let res = app.get(routes::BLOGS).await;

    assert_eq!(res.status, 500);
    assert!(res.text.starts_with("Error fetching blog: malformed blog document"));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn unreachable_server_fails_handshake() {
    let database = DatabaseConfig {
        url: Some("mongodb://127.0.0.1:1/?connectTimeoutMS=200".into()),
        ping_on_connect: true,
        server_selection_timeout_secs: Some(1),
        ..Default::default()
    };
    let app = TestApp::spawn(MongoConnector, database).await;

    let res = app.get(routes::BLOGS).await;

    assert_eq!(res.status, 500);
    assert!(res.text.contains("handshake failed"), "{}", res.text);
}
