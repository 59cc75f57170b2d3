use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use entities::{IssueId, NewUser, ProjectId, UserId};
use serde_json::{Value, json};
use tower::ServiceExt;
use tracker_store::{CommentFilter, MemoryTrackerStore, TrackerStore};

use crate::config::Config;
use crate::state::AppState;
use crate::{create_app, create_state};

struct TestApp {
    state: Arc<AppState<MemoryTrackerStore>>,
    app: Router,
}

struct TestUser {
    id: i64,
    token: String,
}

impl TestApp {
    fn new() -> Self {
        let state = create_state(Config::new("test-secret"), MemoryTrackerStore::new());
        let app = create_app(state.clone());
        Self { state, app }
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    async fn get(&self, uri: &str, user: &TestUser) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(&user.token), None).await
    }

    async fn post(&self, uri: &str, user: &TestUser, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(&user.token), Some(body))
            .await
    }

    async fn put(&self, uri: &str, user: &TestUser, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(&user.token), Some(body))
            .await
    }

    async fn delete(&self, uri: &str, user: &TestUser) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(&user.token), None)
            .await
    }

    /// Creates an account directly in the store and mints its access token,
    /// skipping password hashing.
    async fn seed_user(&self, username: &str) -> TestUser {
        let user = self
            .state
            .store
            .create_user(NewUser::new(username, 30, "unused"))
            .await
            .unwrap();
        let token = self
            .state
            .jwt_manager
            .generate_access_token(user.id.get(), username)
            .unwrap();
        TestUser {
            id: user.id.get(),
            token,
        }
    }

    async fn create_project(&self, owner: &TestUser, name: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/projects",
                owner,
                json!({"name": name, "description": "Tracker", "type": "backend"}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }

    async fn add_contributor(&self, owner: &TestUser, project_id: i64, user: &TestUser) {
        let (status, body) = self
            .post(
                &format!("/api/projects/{project_id}/contributors"),
                owner,
                json!({"user_id": user.id}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
    }

    async fn create_issue(&self, author: &TestUser, project_id: i64, body: Value) -> (StatusCode, Value) {
        self.post(&format!("/api/projects/{project_id}/issues"), author, body)
            .await
    }
}

fn issue_body(name: &str) -> Value {
    json!({"name": name, "priority": "high", "type": "bug"})
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}

// ============================================================================
// Accounts and tokens
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();
    let (status, body) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_register_login_and_refresh() {
    let app = TestApp::new();

    let (status, body) = app
        .request(
            Method::POST,
            "/api/users",
            None,
            Some(json!({
                "username": "alice",
                "password": "s3cret-pass",
                "first_name": "Alice",
                "age": 31,
                "can_be_contacted": true
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["username"], "alice");
    assert_eq!(body["can_be_contacted"], true);
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());

    let (status, wrong_password) = app
        .request(
            Method::POST,
            "/api/token",
            None,
            Some(json!({"username": "alice", "password": "wrong"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // An unknown username fails the same way as a wrong password.
    let (status, unknown_user) = app
        .request(
            Method::POST,
            "/api/token",
            None,
            Some(json!({"username": "mallory", "password": "wrong"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user, wrong_password);

    let (status, tokens) = app
        .request(
            Method::POST,
            "/api/token",
            None,
            Some(json!({"username": "alice", "password": "s3cret-pass"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let access = tokens["access"].as_str().unwrap().to_string();
    let refresh = tokens["refresh"].as_str().unwrap().to_string();

    let (status, body) = app
        .request(Method::GET, "/api/users", Some(&access), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 1);

    // A refresh token is not an access credential.
    let (status, body) = app
        .request(Method::GET, "/api/users", Some(&refresh), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "authentication_required");

    let (status, body) = app
        .request(
            Method::POST,
            "/api/token/refresh",
            None,
            Some(json!({"refresh": refresh})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let renewed = body["access"].as_str().unwrap();
    let (status, _) = app
        .request(Method::GET, "/api/projects", Some(renewed), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    // And an access token cannot be used to refresh.
    let (status, _) = app
        .request(
            Method::POST,
            "/api/token/refresh",
            None,
            Some(json!({"refresh": access})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_registration_validation() {
    let app = TestApp::new();
    app.seed_user("alice").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/users",
            None,
            Some(json!({"username": "young", "password": "pw", "age": 14})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "validation_error");
    assert_eq!(body["error"]["fields"][0]["field"], "age");

    let (status, body) = app
        .request(
            Method::POST,
            "/api/users",
            None,
            Some(json!({"username": "alice", "password": "pw", "age": 20})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["fields"][0]["field"], "username");

    let (status, body) = app
        .request(
            Method::POST,
            "/api/users",
            None,
            Some(json!({"username": "bob", "age": 20})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "validation_error");
}

#[tokio::test]
async fn test_anonymous_and_invalid_tokens_are_rejected() {
    let app = TestApp::new();

    let (status, body) = app.request(Method::GET, "/api/projects", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "authentication_required");

    let (status, _) = app
        .request(Method::GET, "/api/users", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(Method::DELETE, "/api/users/1", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_accounts_are_managed_by_their_owner_only() {
    let app = TestApp::new();
    let alice = app.seed_user("alice").await;
    let bob = app.seed_user("bob").await;

    let (status, body) = app.get(&format!("/api/users/{}", bob.id), &alice).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "permission_denied");

    let (status, _) = app.delete(&format!("/api/users/{}", bob.id), &alice).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/api/users/999", &alice).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .put(
            &format!("/api/users/{}", alice.id),
            &alice,
            json!({"username": "alice2", "age": 32, "last_name": "Liddell"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["username"], "alice2");
    assert_eq!(body["last_name"], "Liddell");

    let (status, body) = app
        .put(
            &format!("/api/users/{}", alice.id),
            &alice,
            json!({"username": "bob", "age": 32}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["fields"][0]["field"], "username");

    let (status, _) = app.delete(&format!("/api/users/{}", bob.id), &bob).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The deleted account's token no longer authenticates.
    let (status, _) = app.get("/api/users", &bob).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_list_hides_staff() {
    let app = TestApp::new();
    let alice = app.seed_user("alice").await;
    let admin = app
        .state
        .store
        .create_user(NewUser::new("admin", 40, "unused").with_staff(true))
        .await
        .unwrap();

    let (status, body) = app.get("/api/users", &alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["users"][0]["username"], "alice");

    let (status, _) = app.get(&format!("/api/users/{}", admin.id), &alice).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Projects and contributors
// ============================================================================

#[tokio::test]
async fn test_project_creator_is_owner_and_contributor() {
    let app = TestApp::new();
    let alice = app.seed_user("alice").await;

    let project_id = app.create_project(&alice, "SoftDesk").await;
    let (status, body) = app.get(&format!("/api/projects/{project_id}"), &alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["author"], alice.id);
    assert_eq!(body["type"], "backend");
    assert_eq!(body["contributors"], json!([alice.id]));
}

#[tokio::test]
async fn test_non_contributors_cannot_see_projects() {
    let app = TestApp::new();
    let alice = app.seed_user("alice").await;
    let carol = app.seed_user("carol").await;
    let project_id = app.create_project(&alice, "SoftDesk").await;

    let (status, body) = app.get(&format!("/api/projects/{project_id}"), &carol).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "not_found");

    let (status, _) = app
        .get(&format!("/api/projects/{project_id}/contributors"), &carol)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&format!("/api/projects/{project_id}"), &carol).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.get("/api/projects", &carol).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 0);

    let (status, _) = app.get("/api/projects/not-a-number", &carol).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_only_project_author_modifies_project() {
    let app = TestApp::new();
    let alice = app.seed_user("alice").await;
    let bob = app.seed_user("bob").await;
    let project_id = app.create_project(&alice, "SoftDesk").await;
    app.add_contributor(&alice, project_id, &bob).await;

    let update = json!({"name": "Renamed", "description": "", "type": "ios"});
    let (status, body) = app
        .put(&format!("/api/projects/{project_id}"), &bob, update.clone())
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"]["message"].as_str().unwrap().contains("not_author"));

    let (status, body) = app
        .put(&format!("/api/projects/{project_id}"), &alice, update)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["type"], "ios");
    assert_eq!(body["contributors"], json!([alice.id, bob.id]));

    let (status, body) = app
        .put(
            &format!("/api/projects/{project_id}"),
            &alice,
            json!({"name": "Renamed", "type": "desktop"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "validation_error");

    let (status, _) = app.delete(&format!("/api/projects/{project_id}"), &bob).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.delete(&format!("/api/projects/{project_id}"), &alice).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_contributor_management() {
    let app = TestApp::new();
    let alice = app.seed_user("alice").await;
    let bob = app.seed_user("bob").await;
    let carol = app.seed_user("carol").await;
    let project_id = app.create_project(&alice, "SoftDesk").await;
    let contributors = format!("/api/projects/{project_id}/contributors");

    app.add_contributor(&alice, project_id, &bob).await;
    // Adding twice is a no-op.
    app.add_contributor(&alice, project_id, &bob).await;

    let (status, body) = app.get(&contributors, &bob).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 2);

    let (status, body) = app.post(&contributors, &bob, json!({"user_id": carol.id})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"]["message"].as_str().unwrap().contains("not_project_author"));

    let (status, _) = app.post(&contributors, &alice, json!({"user_id": 999})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.post("/api/projects/999/contributors", &alice, json!({"user_id": bob.id})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Removing a non-member succeeds without changing anything.
    let (status, _) = app.delete(&format!("{contributors}/{}", carol.id), &alice).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, body) = app.get(&contributors, &alice).await;
    assert_eq!(body["total_count"], 2);

    // An account that does not exist is not found rather than ignored.
    let (status, body) = app.delete(&format!("{contributors}/999"), &alice).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "not_found");

    let (status, _) = app.delete(&format!("{contributors}/{}", alice.id), &bob).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.delete(&format!("{contributors}/{}", alice.id), &alice).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["fields"][0]["field"], "user_id");

    let (status, _) = app.delete(&format!("{contributors}/{}", bob.id), &alice).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.get(&format!("/api/projects/{project_id}"), &bob).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_removing_contributor_keeps_assignments() {
    let app = TestApp::new();
    let alice = app.seed_user("alice").await;
    let bob = app.seed_user("bob").await;
    let project_id = app.create_project(&alice, "SoftDesk").await;
    app.add_contributor(&alice, project_id, &bob).await;

    let mut body = issue_body("Crash");
    body["assigned_to"] = json!(bob.id);
    let (status, issue) = app.create_issue(&alice, project_id, body).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .delete(&format!("/api/projects/{project_id}/contributors/{}", bob.id), &alice)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, issue) = app
        .get(&format!("/api/projects/{project_id}/issues/{}", issue["id"]), &alice)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(issue["assigned_to"], bob.id);
}

#[tokio::test]
async fn test_project_list_pagination() {
    let app = TestApp::new();
    let alice = app.seed_user("alice").await;
    let first = app.create_project(&alice, "First").await;
    let second = app.create_project(&alice, "Second").await;

    let (status, body) = app.get("/api/projects?limit=1", &alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 2);
    assert_eq!(body["projects"][0]["id"], first);

    let (_, body) = app.get("/api/projects?limit=1&offset=1", &alice).await;
    assert_eq!(body["projects"].as_array().unwrap().len(), 1);
    assert_eq!(body["projects"][0]["id"], second);
}

// ============================================================================
// Issues and comments
// ============================================================================

#[tokio::test]
async fn test_issue_assignee_must_be_contributor() {
    let app = TestApp::new();
    let alice = app.seed_user("alice").await;
    let bob = app.seed_user("bob").await;
    let carol = app.seed_user("carol").await;
    let project_id = app.create_project(&alice, "SoftDesk").await;
    app.add_contributor(&alice, project_id, &bob).await;

    let mut body = issue_body("Crash on login");
    body["assigned_to"] = json!(carol.id);
    let (status, response) = app.create_issue(&alice, project_id, body.clone()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"]["fields"][0]["field"], "assigned_to");

    body["assigned_to"] = json!(bob.id);
    let (status, issue) = app.create_issue(&alice, project_id, body).await;
    assert_eq!(status, StatusCode::CREATED, "{issue}");
    assert_eq!(issue["assigned_to"], bob.id);
    assert_eq!(issue["author"], alice.id);
    assert_eq!(issue["project"], project_id);
    assert_eq!(issue["status"], "todo");

    // Outsiders are refused before the body is looked at.
    let (status, _) = app.create_issue(&carol, project_id, issue_body("Spam")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.create_issue(&carol, 999, issue_body("Spam")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_only_issue_author_modifies_issue() {
    let app = TestApp::new();
    let alice = app.seed_user("alice").await;
    let bob = app.seed_user("bob").await;
    let project_id = app.create_project(&alice, "SoftDesk").await;
    app.add_contributor(&alice, project_id, &bob).await;

    let (_, issue) = app.create_issue(&bob, project_id, issue_body("Crash")).await;
    let uri = format!("/api/projects/{project_id}/issues/{}", issue["id"]);

    let update = json!({
        "name": "Crash on startup",
        "priority": "medium",
        "type": "bug",
        "status": "in_progress"
    });
    // The project owner is a contributor, not the issue's author.
    let (status, _) = app.put(&uri, &alice, update.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.delete(&uri, &alice).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.put(&uri, &bob, update).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "in_progress");
    assert_eq!(body["author"], bob.id);

    let (status, body) = app
        .put(&uri, &bob, json!({"name": "Crash", "priority": "urgent", "type": "bug"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "validation_error");
}

#[tokio::test]
async fn test_issue_must_belong_to_url_project() {
    let app = TestApp::new();
    let alice = app.seed_user("alice").await;
    let first = app.create_project(&alice, "First").await;
    let second = app.create_project(&alice, "Second").await;
    let (_, issue) = app.create_issue(&alice, first, issue_body("Crash")).await;

    let (status, _) = app
        .get(&format!("/api/projects/{second}/issues/{}", issue["id"]), &alice)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post(
            &format!("/api/projects/{second}/issues/{}/comments", issue["id"]),
            &alice,
            json!({"description": "Wrong place"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comment_lifecycle() {
    let app = TestApp::new();
    let alice = app.seed_user("alice").await;
    let bob = app.seed_user("bob").await;
    let carol = app.seed_user("carol").await;
    let project_id = app.create_project(&alice, "SoftDesk").await;
    app.add_contributor(&alice, project_id, &bob).await;
    let (_, issue) = app.create_issue(&alice, project_id, issue_body("Crash")).await;
    let comments = format!("/api/projects/{project_id}/issues/{}/comments", issue["id"]);

    let (status, _) = app.post(&comments, &carol, json!({"description": "Hi"})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.post(&comments, &bob, json!({"description": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["fields"][0]["field"], "description");

    let (status, comment) = app
        .post(&comments, &bob, json!({"description": "Reproduced on iOS"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(comment["author"], bob.id);
    let uri = format!("{comments}/{}", comment["id"].as_str().unwrap());

    let (status, body) = app.get(&uri, &alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "Reproduced on iOS");
    let (status, _) = app.get(&uri, &carol).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.put(&uri, &alice, json!({"description": "Edited"})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = app.put(&uri, &bob, json!({"description": "Edited"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "Edited");

    let (status, body) = app.get(&comments, &alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 1);

    let (status, _) = app.delete(&uri, &bob).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.get(&uri, &bob).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tracking_scenario() {
    let app = TestApp::new();
    let a = app.seed_user("a").await;
    let b = app.seed_user("b").await;
    let c = app.seed_user("c").await;

    let p = app.create_project(&a, "P").await;
    app.add_contributor(&a, p, &b).await;

    let mut body = issue_body("I");
    body["assigned_to"] = json!(a.id);
    let (status, issue) = app.create_issue(&b, p, body).await;
    assert_eq!(status, StatusCode::CREATED);
    let issue_uri = format!("/api/projects/{p}/issues/{}", issue["id"]);

    let (status, _) = app
        .post(&format!("{issue_uri}/comments"), &a, json!({"description": "Looking"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.get(&format!("/api/projects/{p}"), &c).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get(&issue_uri, &c).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&issue_uri, &b).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.get(&issue_uri, &b).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let issue_id = IssueId(issue["id"].as_i64().unwrap());
    let filter = CommentFilter {
        issue_id: Some(issue_id),
        ..Default::default()
    };
    let (_, total) = app.state.store.list_comments(filter).await.unwrap();
    assert_eq!(total, 0);
}

#[tokio::test]
async fn test_deleting_user_cascades() {
    let app = TestApp::new();
    let alice = app.seed_user("alice").await;
    let bob = app.seed_user("bob").await;

    let owned = app.create_project(&alice, "Alice's").await;
    let shared = app.create_project(&bob, "Bob's").await;
    app.add_contributor(&bob, shared, &alice).await;
    app.add_contributor(&alice, owned, &bob).await;

    let (_, issue) = app.create_issue(&alice, shared, issue_body("Crash")).await;
    let issue_uri = format!("/api/projects/{shared}/issues/{}", issue["id"]);
    let (_, comment) = app
        .post(&format!("{issue_uri}/comments"), &alice, json!({"description": "Mine"}))
        .await;

    let (status, _) = app.delete(&format!("/api/users/{}", alice.id), &alice).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Alice's own project is gone, even for its other members.
    let (status, _) = app.get(&format!("/api/projects/{owned}"), &bob).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(app.state.store.get_project(ProjectId(owned)).await.unwrap().is_none());

    // Her work on Bob's project remains, without an author.
    let (status, body) = app.get(&issue_uri, &bob).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["author"], Value::Null);
    let (_, body) = app
        .get(&format!("{issue_uri}/comments/{}", comment["id"].as_str().unwrap()), &bob)
        .await;
    assert_eq!(body["author"], Value::Null);

    let (_, body) = app.get(&format!("/api/projects/{shared}/contributors"), &bob).await;
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["contributors"][0]["id"], bob.id);

    // An orphaned issue cannot be edited by anyone.
    let (status, _) = app.delete(&issue_uri, &bob).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(app.state.store.get_user(UserId(alice.id)).await.unwrap().is_none());
}
