//! Integration tests for nicheboard-api endpoints
//!
//! Drives the full router with `oneshot` against a fresh in-memory SQLite
//! store per test. Covers:
//! - Response envelopes and status codes
//! - ICE score and slug recomputation on create and update
//! - Validation messages
//! - Niche counts, including degradation when counting fails
//! - Orphan delete policy
//! - File-backed persistence and hosted-store failures

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use nicheboard_api::{build_router, AppState};
use nicheboard_common::store::{Filter, RestStore, Row, SelectQuery, SqliteStore, Store, Table};
use nicheboard_common::{Error, Result};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test helper: app over a fresh in-memory store
async fn setup_app() -> Router {
    let store = SqliteStore::in_memory()
        .await
        .expect("Should create in-memory store");
    build_router(AppState::new(Arc::new(store)))
}

/// Test helper: Create request without body
fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: Create request with JSON body
fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: Send request, return status and parsed JSON body
async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let body = serde_json::from_slice(&bytes).expect("Should parse JSON");
    (status, body)
}

async fn create_niche(app: &Router, name: &str) -> Value {
    let (status, body) = send(app, json_request("POST", "/api/niches", json!({"name": name}))).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"].clone()
}

async fn create_idea(app: &Router, niche_id: &str, title: &str, ratings: (i32, i32, i32)) -> Value {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/ideas",
            json!({
                "title": title,
                "nicheId": niche_id,
                "impact": ratings.0,
                "confidence": ratings.1,
                "effort": ratings.2,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"].clone()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app().await;

    let (status, body) = send(&app, test_request("GET", "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "nicheboard-api");
    assert!(body["version"].is_string());
}

// =============================================================================
// Niches
// =============================================================================

#[tokio::test]
async fn test_create_niche_returns_slug_and_counts() {
    let app = setup_app().await;

    let niche = create_niche(&app, "Health & Fitness!").await;

    assert_eq!(niche["name"], "Health & Fitness!");
    assert_eq!(niche["slug"], "health-fitness");
    assert_eq!(niche["ideasCount"], 0);
    assert_eq!(niche["highlightsCount"], 0);
    assert_eq!(niche["subredditsCount"], 0);
    assert!(niche["created_at"].is_string());
}

#[tokio::test]
async fn test_create_niche_requires_name() {
    let app = setup_app().await;

    let (status, body) = send(&app, json_request("POST", "/api/niches", json!({"description": "x"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"success": false, "error": "Name is required"}));

    let (_, list) = send(&app, test_request("GET", "/api/niches")).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_list_niches_with_counts() {
    let app = setup_app().await;

    let tech = create_niche(&app, "Technology").await;
    let tech_id = tech["id"].as_str().unwrap();
    create_niche(&app, "Hobbies & DIY").await;

    create_idea(&app, tech_id, "Dev tool", (3, 3, 3)).await;
    create_idea(&app, tech_id, "SaaS", (5, 4, 2)).await;
    send(
        &app,
        json_request(
            "POST",
            "/api/subreddits",
            json!({"name": "r/rust", "url": "https://reddit.com/r/rust", "nicheId": tech_id}),
        ),
    )
    .await;

    let (status, body) = send(&app, test_request("GET", "/api/niches")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let niches = body["data"].as_array().unwrap();
    assert_eq!(niches.len(), 2);

    let tech = niches.iter().find(|n| n["slug"] == "technology").unwrap();
    assert_eq!(tech["ideasCount"], 2);
    assert_eq!(tech["highlightsCount"], 0);
    assert_eq!(tech["subredditsCount"], 1);

    let hobbies = niches.iter().find(|n| n["slug"] == "hobbies-diy").unwrap();
    assert_eq!(hobbies["ideasCount"], 0);
}

#[tokio::test]
async fn test_get_niche_by_id_and_slug() {
    let app = setup_app().await;
    let niche = create_niche(&app, "Hobbies & DIY").await;
    let id = niche["id"].as_str().unwrap();

    let (status, body) = send(&app, test_request("GET", &format!("/api/niches/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["slug"], "hobbies-diy");

    let (status, body) = send(&app, test_request("GET", "/api/niches/slug/hobbies-diy")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id);

    let (status, body) = send(&app, test_request("GET", "/api/niches/slug/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Niche not found");
}

#[tokio::test]
async fn test_update_niche_recomputes_slug() {
    let app = setup_app().await;
    let niche = create_niche(&app, "Tech").await;
    let id = niche["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/niches/{}", id),
            json!({"name": "Tech Startups", "slug": "ignored", "description": ""}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["slug"], "tech-startups");
    assert!(body["data"]["description"].is_null());
}

#[tokio::test]
async fn test_update_missing_niche_is_operation_failure() {
    let app = setup_app().await;

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/api/niches/0b7e8a52-51a6-4c09-bb77-1f0a36f0e8f2",
            json!({"name": "Ghost"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to update niche");
}

#[tokio::test]
async fn test_duplicate_slug_is_operation_failure() {
    let app = setup_app().await;
    create_niche(&app, "Technology").await;

    let (status, body) = send(&app, json_request("POST", "/api/niches", json!({"name": "TECHNOLOGY"}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to create niche");
}

// =============================================================================
// Ideas
// =============================================================================

#[tokio::test]
async fn test_create_idea_computes_ice_score() {
    let app = setup_app().await;
    let niche = create_niche(&app, "Hobbies & DIY").await;

    let idea = create_idea(&app, niche["id"].as_str().unwrap(), "Custom Woodworking Plans", (4, 3, 2)).await;

    assert_eq!(idea["ice_score"].as_f64(), Some(6.0));
    assert_eq!(idea["status"], "Backlog");
    assert_eq!(idea["niche_id"], niche["id"]);
}

#[tokio::test]
async fn test_create_idea_without_title_persists_nothing() {
    let app = setup_app().await;
    let niche = create_niche(&app, "Hobbies & DIY").await;

    let (status, body) = send(
        &app,
        json_request("POST", "/api/ideas", json!({"nicheId": niche["id"], "impact": 5})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Title and nicheId are required");

    let (_, list) = send(&app, test_request("GET", "/api/ideas")).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_idea_rejects_bad_niche_id_and_rating() {
    let app = setup_app().await;

    let (status, body) = send(
        &app,
        json_request("POST", "/api/ideas", json!({"title": "t", "nicheId": "not-a-uuid"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Must be a valid niche ID");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/ideas",
            json!({"title": "t", "nicheId": "0b7e8a52-51a6-4c09-bb77-1f0a36f0e8f2", "confidence": 9}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Confidence must be at most 5");
}

#[tokio::test]
async fn test_update_idea_overwrites_client_score() {
    let app = setup_app().await;
    let niche = create_niche(&app, "Hobbies & DIY").await;
    let idea = create_idea(&app, niche["id"].as_str().unwrap(), "Plans", (4, 3, 2)).await;
    let id = idea["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/ideas/{}", id),
            json!({
                "title": "Plans v2",
                "impact": 5,
                "confidence": 5,
                "effort": 3,
                "ice_score": 100,
                "iceScore": 100,
                "status": "Building",
                "tags": ["woodworking", " plans "]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let updated = &body["data"];
    assert_eq!(updated["ice_score"].as_f64(), Some(8.33));
    assert_eq!(updated["status"], "Building");
    assert_eq!(updated["tags"], "woodworking, plans");
    assert_eq!(updated["niche_id"], niche["id"]);
    assert_ne!(updated["updated_at"], idea["updated_at"]);

    let (_, fetched) = send(&app, test_request("GET", &format!("/api/ideas/{}", id))).await;
    assert_eq!(fetched["data"]["ice_score"].as_f64(), Some(8.33));
}

#[tokio::test]
async fn test_update_idea_cannot_move_niche() {
    let app = setup_app().await;
    let home = create_niche(&app, "Home").await;
    let other = create_niche(&app, "Other").await;
    let idea = create_idea(&app, home["id"].as_str().unwrap(), "Stay", (1, 1, 1)).await;

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/ideas/{}", idea["id"].as_str().unwrap()),
            json!({"title": "Stay", "nicheId": other["id"]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["niche_id"], home["id"]);
}

#[tokio::test]
async fn test_list_ideas_filters_and_orders_by_score() {
    let app = setup_app().await;
    let a = create_niche(&app, "A").await;
    let b = create_niche(&app, "B").await;
    let a_id = a["id"].as_str().unwrap();

    create_idea(&app, a_id, "low", (1, 1, 5)).await;
    create_idea(&app, a_id, "high", (5, 5, 1)).await;
    create_idea(&app, b["id"].as_str().unwrap(), "elsewhere", (5, 5, 5)).await;

    let (status, body) = send(&app, test_request("GET", &format!("/api/ideas?nicheId={}", a_id))).await;
    assert_eq!(status, StatusCode::OK);

    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["high", "low"]);
}

#[tokio::test]
async fn test_get_missing_idea() {
    let app = setup_app().await;

    let (status, body) = send(&app, test_request("GET", "/api/ideas/does-not-exist")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "error": "Idea not found"}));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = setup_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/ideas")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_url_fields_stored_trimmed() {
    let app = setup_app().await;
    let niche = create_niche(&app, "Technology").await;
    let niche_id = niche["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/ideas",
            json!({"title": "Padded", "nicheId": niche_id, "sourceUrl": "  https://example.com  "}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["source_url"], "https://example.com");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/subreddits",
            json!({"name": "r/rust", "url": "\thttps://reddit.com/r/rust ", "nicheId": niche_id}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["url"], "https://reddit.com/r/rust");
}

// =============================================================================
// Highlights and subreddits
// =============================================================================

#[tokio::test]
async fn test_highlight_lifecycle() {
    let app = setup_app().await;
    let niche = create_niche(&app, "Gardening").await;
    let niche_id = niche["id"].as_str().unwrap();
    let idea = create_idea(&app, niche_id, "Gardening App", (3, 4, 3)).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/highlights",
            json!({
                "quote": "Patience is key in gardening.",
                "nicheId": niche_id,
                "ideaId": idea["id"],
                "upvotes": 0,
                "author": ""
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let highlight = &body["data"];
    assert!(highlight["upvotes"].is_null());
    assert!(highlight["author"].is_null());
    assert_eq!(highlight["idea_id"], idea["id"]);

    let (_, by_idea) = send(
        &app,
        test_request("GET", &format!("/api/highlights?ideaId={}", idea["id"].as_str().unwrap())),
    )
    .await;
    assert_eq!(by_idea["data"].as_array().unwrap().len(), 1);

    let id = highlight["id"].as_str().unwrap();
    let (status, body) = send(
        &app,
        json_request("PUT", &format!("/api/highlights/{}", id), json!({"quote": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Quote is required");

    let (status, body) = send(&app, test_request("DELETE", &format!("/api/highlights/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": true, "message": "Highlight deleted successfully"})
    );

    let (status, _) = send(&app, test_request("GET", &format!("/api/highlights/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_subreddit_validation_and_ordering() {
    let app = setup_app().await;
    let niche = create_niche(&app, "Hobbies").await;
    let niche_id = niche["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        json_request("POST", "/api/subreddits", json!({"name": "r/woodworking", "nicheId": niche_id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name, url, and nicheId are required");

    for (name, count) in [("r/gardening", 1_800_000), ("r/woodworking", 2_500_000), ("r/tiny", 0)] {
        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/api/subreddits",
                json!({
                    "name": name,
                    "url": format!("https://reddit.com/{}", name),
                    "subscriberCount": count,
                    "nicheId": niche_id
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = send(&app, test_request("GET", "/api/subreddits")).await;
    let rows = body["data"].as_array().unwrap();
    let names: Vec<&str> = rows.iter().map(|s| s["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["r/woodworking", "r/gardening", "r/tiny"]);
    assert_eq!(rows[2]["subscriber_count"], 0);

    let id = rows[0]["id"].as_str().unwrap();
    let (status, body) = send(
        &app,
        json_request("PUT", &format!("/api/subreddits/{}", id), json!({"name": "r/woodworking"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name and url are required");
}

// =============================================================================
// Delete policy
// =============================================================================

#[tokio::test]
async fn test_deleting_niche_orphans_dependents() {
    let app = setup_app().await;
    let niche = create_niche(&app, "Doomed").await;
    let niche_id = niche["id"].as_str().unwrap();
    let idea = create_idea(&app, niche_id, "Survivor", (2, 2, 2)).await;

    let (_, body) = send(
        &app,
        json_request(
            "POST",
            "/api/subreddits",
            json!({"name": "r/x", "url": "https://reddit.com/r/x", "nicheId": niche_id}),
        ),
    )
    .await;
    let subreddit_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, test_request("DELETE", &format!("/api/niches/{}", niche_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Niche deleted successfully");

    let (status, _) = send(&app, test_request("GET", &format!("/api/niches/{}", niche_id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        test_request("GET", &format!("/api/ideas/{}", idea["id"].as_str().unwrap())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["niche_id"], niche_id);

    let (status, _) = send(&app, test_request("GET", &format!("/api/subreddits/{}", subreddit_id))).await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Count degradation
// =============================================================================

/// Delegates everything to SQLite except `count`, which always fails
struct CountFailingStore {
    inner: SqliteStore,
}

#[async_trait]
impl Store for CountFailingStore {
    fn backend(&self) -> &'static str {
        "count-failing"
    }

    async fn select(&self, table: Table, query: &SelectQuery) -> Result<Vec<Row>> {
        self.inner.select(table, query).await
    }

    async fn fetch_by_id(&self, table: Table, id: &str) -> Result<Option<Row>> {
        self.inner.fetch_by_id(table, id).await
    }

    async fn count(&self, table: Table, _filters: &[Filter]) -> Result<i64> {
        Err(Error::Store(format!("count on {} unavailable", table.name())))
    }

    async fn insert(&self, table: Table, row: Row) -> Result<Row> {
        self.inner.insert(table, row).await
    }

    async fn update(&self, table: Table, id: &str, row: Row) -> Result<Row> {
        self.inner.update(table, id, row).await
    }

    async fn delete(&self, table: Table, id: &str) -> Result<()> {
        self.inner.delete(table, id).await
    }
}

#[tokio::test]
async fn test_failed_counts_default_to_zero() {
    let inner = SqliteStore::in_memory().await.unwrap();
    let app = build_router(AppState::new(Arc::new(CountFailingStore { inner })));

    let niche = create_niche(&app, "Technology").await;
    assert_eq!(niche["ideasCount"], 0);

    create_idea(&app, niche["id"].as_str().unwrap(), "Counted nowhere", (1, 1, 1)).await;

    let (status, body) = send(&app, test_request("GET", "/api/niches")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let listed = &body["data"][0];
    assert_eq!(listed["slug"], "technology");
    assert_eq!(listed["ideasCount"], 0);
    assert_eq!(listed["highlightsCount"], 0);
    assert_eq!(listed["subredditsCount"], 0);
}

// =============================================================================
// Store backends
// =============================================================================

#[tokio::test]
async fn test_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("nicheboard.db").display());

    let niche_id = {
        let store = SqliteStore::connect(&url).await.unwrap();
        let app = build_router(AppState::new(Arc::new(store)));
        let niche = create_niche(&app, "Hobbies & DIY").await;
        create_idea(&app, niche["id"].as_str().unwrap(), "Woodworking plans", (4, 3, 2)).await;
        niche["id"].as_str().unwrap().to_string()
    };

    let store = SqliteStore::connect(&url).await.unwrap();
    let app = build_router(AppState::new(Arc::new(store)));

    let (status, body) = send(&app, test_request("GET", "/api/niches/slug/hobbies-diy")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], niche_id.as_str());

    let (_, body) = send(&app, test_request("GET", &format!("/api/ideas?nicheId={}", niche_id))).await;
    assert_eq!(body["data"][0]["ice_score"], 6.0);
}

#[tokio::test]
async fn test_hosted_store_fetch_failure_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/ideas"))
        .and(query_param("id", "eq.7f1f2c2e-8a55-4b3e-9f3c-0d6b9d0a1c11"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "connection reset"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = RestStore::new(&server.uri(), "test-key").unwrap();
    let app = build_router(AppState::new(Arc::new(store)));

    let (status, body) = send(
        &app,
        test_request("GET", "/api/ideas/7f1f2c2e-8a55-4b3e-9f3c-0d6b9d0a1c11"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "error": "Idea not found"}));
}

#[tokio::test]
async fn test_hosted_store_list_failure_is_operation_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/subreddits"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let store = RestStore::new(&server.uri(), "test-key").unwrap();
    let app = build_router(AppState::new(Arc::new(store)));

    let (status, body) = send(&app, test_request("GET", "/api/subreddits")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"success": false, "error": "Failed to fetch subreddits"}));
}
