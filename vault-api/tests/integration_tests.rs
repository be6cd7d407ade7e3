//! End-to-end API tests over an in-memory datastore.

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderValue;
use axum_test::TestServer;
use serde_json::{json, Value};

use vault_api::{create_router, ApiConfig, AppState};
use vault_core::types::Role;

async fn spawn() -> (TestServer, AppState) {
    let db = vault_db::connect("mem://", "vault", "test")
        .await
        .expect("in-memory datastore");
    let config = test_config();
    let state = AppState::new(db, &config).await.expect("state");
    let server = TestServer::new(create_router(state.clone())).expect("server");
    (server, state)
}

fn test_config() -> ApiConfig {
    ApiConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "mem://".to_string(),
        db_namespace: "vault".to_string(),
        db_name: "test".to_string(),
        jwt_access_secret: "access-secret-for-tests".to_string(),
        jwt_refresh_secret: "refresh-secret-for-tests".to_string(),
        access_ttl: std::time::Duration::from_secs(900),
        refresh_ttl: std::time::Duration::from_secs(604_800),
        cors_origin: None,
        cookie_secure: false,
    }
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
}

/// Register a fresh user and return (access token, user id).
async fn register(server: &TestServer, username: &str) -> (String, String) {
    let res = server
        .post("/api/v1/auth/register")
        .json(&json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "hunter2hunter2",
        }))
        .await;
    res.assert_status(axum::http::StatusCode::CREATED);
    let body: Value = res.json();
    (
        body["accessToken"].as_str().unwrap().to_string(),
        body["user"]["userId"].as_str().unwrap().to_string(),
    )
}

/// Register a user, promote it to admin out of band, log in again so the
/// new role lands in the claims.
async fn register_admin(server: &TestServer, state: &AppState, username: &str) -> String {
    let (_, user_id) = register(server, username).await;
    state.db.users.set_role(&user_id, Role::Admin).await.unwrap();

    let res = server
        .post("/api/v1/auth/login")
        .json(&json!({
            "email": format!("{username}@example.com"),
            "password": "hunter2hunter2",
        }))
        .await;
    res.assert_status_ok();
    let body: Value = res.json();
    body["accessToken"].as_str().unwrap().to_string()
}

/// Build branch -> program -> year -> semester -> subject and return the
/// subject id.
async fn seed_subject(server: &TestServer, admin: &str, branch_code: &str) -> String {
    let res = server
        .post("/api/v1/admin/branches")
        .add_header(AUTHORIZATION, bearer(admin))
        .json(&json!({"code": branch_code, "name": "Computer Science"}))
        .await;
    res.assert_status(axum::http::StatusCode::CREATED);
    let branch_id = res.json::<Value>()["branchId"].as_str().unwrap().to_string();

    let res = server
        .post("/api/v1/admin/programs")
        .add_header(AUTHORIZATION, bearer(admin))
        .json(&json!({"branchId": branch_id, "name": "B.Tech", "durationYears": 4}))
        .await;
    let program_id = res.json::<Value>()["programId"].as_str().unwrap().to_string();

    let res = server
        .post("/api/v1/admin/years")
        .add_header(AUTHORIZATION, bearer(admin))
        .json(&json!({"programId": program_id, "yearNumber": 2}))
        .await;
    let year_id = res.json::<Value>()["yearId"].as_str().unwrap().to_string();

    let res = server
        .post("/api/v1/admin/semesters")
        .add_header(AUTHORIZATION, bearer(admin))
        .json(&json!({"yearId": year_id, "semesterNumber": 3}))
        .await;
    let semester_id = res.json::<Value>()["semesterId"].as_str().unwrap().to_string();

    let res = server
        .post("/api/v1/admin/subjects")
        .add_header(AUTHORIZATION, bearer(admin))
        .json(&json!({
            "code": format!("{branch_code}201"),
            "name": "Data Structures",
            "branchId": branch_id,
            "semesterId": semester_id,
            "credits": 4,
            "topics": ["trees", "graphs"],
        }))
        .await;
    res.assert_status(axum::http::StatusCode::CREATED);
    res.json::<Value>()["subjectId"].as_str().unwrap().to_string()
}

async fn seed_resource(server: &TestServer, token: &str, subject_id: &str, title: &str) -> String {
    let res = server
        .post("/api/v1/resources")
        .add_header(AUTHORIZATION, bearer(token))
        .json(&json!({
            "type": "notes",
            "title": title,
            "url": "https://example.com/notes.pdf",
            "subjectId": subject_id,
        }))
        .await;
    res.assert_status(axum::http::StatusCode::CREATED);
    res.json::<Value>()["resourceId"].as_str().unwrap().to_string()
}

async fn approve(server: &TestServer, admin: &str, resource_id: &str) {
    let res = server
        .patch(&format!("/api/v1/resources/{resource_id}/approve"))
        .add_header(AUTHORIZATION, bearer(admin))
        .json(&json!({"approved": true}))
        .await;
    res.assert_status_ok();
}

#[tokio::test]
async fn healthz_is_public() {
    let (server, _) = spawn().await;
    let res = server.get("/healthz").await;
    res.assert_status_ok();
    let body: Value = res.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["time"].as_str().is_some());
}

#[tokio::test]
async fn register_login_me_flow() {
    let (server, _) = spawn().await;
    let (token, _) = register(&server, "alice").await;

    let res = server
        .get("/api/v1/auth/me")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    res.assert_status_ok();
    let body: Value = res.json();
    assert_eq!(body["username"], "alice");
    assert_eq!(body["role"], "user");
    assert_eq!(body["isVerified"], false);

    let res = server.get("/api/v1/auth/me").await;
    res.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_sets_auth_cookies() {
    let (server, _) = spawn().await;
    let res = server
        .post("/api/v1/auth/register")
        .json(&json!({
            "username": "cookiefan",
            "email": "cookiefan@example.com",
            "password": "hunter2hunter2",
        }))
        .await;
    res.assert_status(axum::http::StatusCode::CREATED);

    let cookies: Vec<String> = res
        .iter_headers_by_name("set-cookie")
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert!(cookies.iter().any(|c| c.starts_with("access_token=")));
    assert!(cookies.iter().any(|c| c.starts_with("refresh_token=")));
    assert!(cookies.iter().all(|c| c.contains("HttpOnly")));
}

#[tokio::test]
async fn login_rejects_bad_password() {
    let (server, _) = spawn().await;
    register(&server, "bob").await;

    let res = server
        .post("/api/v1/auth/login")
        .json(&json!({"email": "bob@example.com", "password": "wrong-password"}))
        .await;
    res.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_rejects_access_token() {
    let (server, _) = spawn().await;
    let res = server
        .post("/api/v1/auth/register")
        .json(&json!({
            "username": "carol",
            "email": "carol@example.com",
            "password": "hunter2hunter2",
        }))
        .await;
    let body: Value = res.json();
    let access = body["accessToken"].as_str().unwrap();
    let refresh = body["refreshToken"].as_str().unwrap();

    let res = server
        .post("/api/v1/auth/refresh")
        .json(&json!({"refreshToken": access}))
        .await;
    res.assert_status(axum::http::StatusCode::UNAUTHORIZED);

    let res = server
        .post("/api/v1/auth/refresh")
        .json(&json!({"refreshToken": refresh}))
        .await;
    res.assert_status_ok();
    assert!(res.json::<Value>()["accessToken"].as_str().is_some());
}

#[tokio::test]
async fn duplicate_username_is_conflict() {
    let (server, _) = spawn().await;
    register(&server, "dave").await;

    let res = server
        .post("/api/v1/auth/register")
        .json(&json!({
            "username": "dave",
            "email": "other@example.com",
            "password": "hunter2hunter2",
        }))
        .await;
    res.assert_status(axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn catalog_writes_are_admin_only() {
    let (server, _) = spawn().await;
    let (token, _) = register(&server, "erin").await;

    let res = server
        .post("/api/v1/admin/branches")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({"code": "CS", "name": "Computer Science"}))
        .await;
    res.assert_status(axum::http::StatusCode::FORBIDDEN);

    let res = server
        .post("/api/v1/admin/branches")
        .json(&json!({"code": "CS", "name": "Computer Science"}))
        .await;
    res.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn catalog_structure_assembles_hierarchy() {
    let (server, state) = spawn().await;
    let admin = register_admin(&server, &state, "root").await;
    seed_subject(&server, &admin, "CS").await;

    let res = server.get("/api/v1/catalog/structure").await;
    res.assert_status_ok();
    let body: Value = res.json();
    let branch = &body["branches"][0];
    assert_eq!(branch["code"], "CS");
    let subject =
        &branch["programs"][0]["years"][0]["semesters"][0]["subjects"][0];
    assert_eq!(subject["code"], "CS201");

    let res = server.get("/api/v1/catalog/subjects/CS201").await;
    res.assert_status_ok();
    assert_eq!(res.json::<Value>()["name"], "Data Structures");
}

#[tokio::test]
async fn unapproved_resources_stay_hidden() {
    let (server, state) = spawn().await;
    let admin = register_admin(&server, &state, "root").await;
    let subject_id = seed_subject(&server, &admin, "CS").await;
    let (token, _) = register(&server, "frank").await;
    let resource_id = seed_resource(&server, &token, &subject_id, "Tree notes").await;

    // Anonymous list and fetch act as if the resource does not exist.
    let res = server.get("/api/v1/resources").await;
    res.assert_status_ok();
    assert_eq!(res.json::<Value>()["total"], 0);

    let res = server.get(&format!("/api/v1/resources/{resource_id}")).await;
    res.assert_status(axum::http::StatusCode::NOT_FOUND);

    // The contributor still sees their own submission.
    let res = server
        .get(&format!("/api/v1/resources/{resource_id}"))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    res.assert_status_ok();

    approve(&server, &admin, &resource_id).await;

    let res = server.get("/api/v1/resources").await;
    let body: Value = res.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["title"], "Tree notes");
    assert_eq!(body["items"][0]["isApproved"], true);
}

#[tokio::test]
async fn approve_requires_moderator() {
    let (server, state) = spawn().await;
    let admin = register_admin(&server, &state, "root").await;
    let subject_id = seed_subject(&server, &admin, "CS").await;
    let (token, _) = register(&server, "grace").await;
    let resource_id = seed_resource(&server, &token, &subject_id, "Graph notes").await;

    let res = server
        .patch(&format!("/api/v1/resources/{resource_id}/approve"))
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({"approved": true}))
        .await;
    res.assert_status(axum::http::StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn rating_upsert_replaces_value_and_aggregate() {
    let (server, state) = spawn().await;
    let admin = register_admin(&server, &state, "root").await;
    let subject_id = seed_subject(&server, &admin, "CS").await;
    let (token, _) = register(&server, "heidi").await;
    let resource_id = seed_resource(&server, &token, &subject_id, "Heap notes").await;
    approve(&server, &admin, &resource_id).await;

    let res = server
        .post(&format!("/api/v1/ratings/resource/{resource_id}"))
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({"rating": 5, "review": "great"}))
        .await;
    res.assert_status(axum::http::StatusCode::CREATED);

    // Same user again: still one rating, new value, 200 instead of 201.
    let res = server
        .post(&format!("/api/v1/ratings/resource/{resource_id}"))
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({"rating": 3}))
        .await;
    res.assert_status_ok();

    let res = server.get(&format!("/api/v1/resources/{resource_id}")).await;
    let body: Value = res.json();
    assert_eq!(body["totalRatings"], 1);
    assert_eq!(body["averageRating"], 3.0);
    assert_eq!(body["ratingDistribution"]["3"], 1);
    assert_eq!(body["ratingDistribution"]["5"], 0);

    let res = server
        .get(&format!("/api/v1/ratings/resource/{resource_id}"))
        .await;
    let body: Value = res.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["authorName"], "heidi");
}

#[tokio::test]
async fn rating_out_of_range_is_rejected() {
    let (server, state) = spawn().await;
    let admin = register_admin(&server, &state, "root").await;
    let subject_id = seed_subject(&server, &admin, "CS").await;
    let (token, _) = register(&server, "ivan").await;
    let resource_id = seed_resource(&server, &token, &subject_id, "Trie notes").await;
    approve(&server, &admin, &resource_id).await;

    let res = server
        .post(&format!("/api/v1/ratings/resource/{resource_id}"))
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({"rating": 6}))
        .await;
    res.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_resource_removes_its_ratings() {
    let (server, state) = spawn().await;
    let admin = register_admin(&server, &state, "root").await;
    let subject_id = seed_subject(&server, &admin, "CS").await;
    let (token, _) = register(&server, "judy").await;
    let resource_id = seed_resource(&server, &token, &subject_id, "Stack notes").await;
    approve(&server, &admin, &resource_id).await;

    server
        .post(&format!("/api/v1/ratings/resource/{resource_id}"))
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({"rating": 4}))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let res = server
        .delete(&format!("/api/v1/resources/{resource_id}"))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    res.assert_status(axum::http::StatusCode::NO_CONTENT);

    let res = server
        .get(&format!("/api/v1/ratings/resource/{resource_id}"))
        .await;
    res.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_branch_filter_returns_empty_page() {
    let (server, state) = spawn().await;
    let admin = register_admin(&server, &state, "root").await;
    let subject_id = seed_subject(&server, &admin, "CS").await;
    let (token, _) = register(&server, "kim").await;
    let resource_id = seed_resource(&server, &token, &subject_id, "Queue notes").await;
    approve(&server, &admin, &resource_id).await;

    let res = server.get("/api/v1/resources?branch=XX").await;
    res.assert_status_ok();
    let body: Value = res.json();
    assert_eq!(body["total"], 0);
    assert_eq!(body["pages"], 0);
    assert!(body["items"].as_array().unwrap().is_empty());

    // The real branch still matches.
    let res = server.get("/api/v1/resources?branch=CS").await;
    assert_eq!(res.json::<Value>()["total"], 1);
}

#[tokio::test]
async fn list_rejects_unknown_sort_key() {
    let (server, _) = spawn().await;
    let res = server.get("/api/v1/resources?sort=passwordHash").await;
    res.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn roadmap_lifecycle() {
    let (server, state) = spawn().await;
    let admin = register_admin(&server, &state, "root").await;
    seed_subject(&server, &admin, "CS").await;
    let (user_token, _) = register(&server, "lena").await;

    // Creation is a moderator action.
    let body = json!({
        "subjectCode": "CS201",
        "type": "general",
        "title": "Graphs in four weeks",
        "difficulty": "intermediate",
        "steps": [
            {"title": "BFS and DFS", "order": 2, "estimatedHours": 6.0},
            {"title": "Representations", "order": 1, "estimatedHours": 3.5},
        ],
    });
    let res = server
        .post("/api/v1/roadmaps")
        .add_header(AUTHORIZATION, bearer(&user_token))
        .json(&body)
        .await;
    res.assert_status(axum::http::StatusCode::FORBIDDEN);

    let res = server
        .post("/api/v1/roadmaps")
        .add_header(AUTHORIZATION, bearer(&admin))
        .json(&body)
        .await;
    res.assert_status(axum::http::StatusCode::CREATED);
    let created: Value = res.json();
    let roadmap_id = created["roadmapId"].as_str().unwrap();
    assert_eq!(created["totalEstimatedHours"], 9.5);
    // Steps come back in consumer order.
    assert_eq!(created["steps"][0]["title"], "Representations");

    let res = server
        .get("/api/v1/roadmaps/subject/CS201")
        .await;
    res.assert_status_ok();
    assert_eq!(res.json::<Value>()[0]["roadmapId"], *roadmap_id);

    // Deletion stays with the creator or an admin.
    let res = server
        .delete(&format!("/api/v1/roadmaps/{roadmap_id}"))
        .add_header(AUTHORIZATION, bearer(&user_token))
        .await;
    res.assert_status(axum::http::StatusCode::FORBIDDEN);

    let res = server
        .delete(&format!("/api/v1/roadmaps/{roadmap_id}"))
        .add_header(AUTHORIZATION, bearer(&admin))
        .await;
    res.assert_status(axum::http::StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn pending_queue_lists_unapproved_resources() {
    let (server, state) = spawn().await;
    let admin = register_admin(&server, &state, "root").await;
    let subject_id = seed_subject(&server, &admin, "CS").await;
    let (token, _) = register(&server, "mallory").await;
    seed_resource(&server, &token, &subject_id, "Pending notes").await;

    let res = server
        .get("/api/v1/admin/resources/pending")
        .add_header(AUTHORIZATION, bearer(&admin))
        .await;
    res.assert_status_ok();
    let body: Value = res.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["title"], "Pending notes");
}

#[tokio::test]
async fn role_update_round_trips() {
    let (server, state) = spawn().await;
    let admin = register_admin(&server, &state, "root").await;
    let (_, user_id) = register(&server, "nina").await;

    let res = server
        .patch(&format!("/api/v1/admin/users/{user_id}/role"))
        .add_header(AUTHORIZATION, bearer(&admin))
        .json(&json!({"role": "moderator"}))
        .await;
    res.assert_status_ok();
    assert_eq!(res.json::<Value>()["role"], "moderator");
}
