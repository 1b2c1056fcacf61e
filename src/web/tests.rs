//! End-to-end checks that drive the real router against an in-memory database.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::web::{AppState, models::timestamp_now, router::build_router};

async fn test_app() -> (AppState, Router) {
    let state = AppState::in_memory().await;
    let app = build_router(state.clone());
    (state, app)
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

fn request(method: Method, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

/// `name=value` pair of the session cookie set by `response`.
fn session_cookie(response: &Response) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("session="))
        .and_then(|value| value.split(';').next())
        .unwrap()
        .to_string()
}

fn registration(username: &str, role: Option<&str>) -> Value {
    let mut body = json!({
        "username": username,
        "fullName": format!("{username} Example"),
        "email": format!("{username}@example.com"),
        "department": "Eng",
        "title": "SWE",
        "password": "p",
    });
    if let Some(role) = role {
        body["role"] = json!(role);
    }
    body
}

async fn register(app: &Router, username: &str, role: Option<&str>) -> String {
    let response = send(
        app,
        request(
            Method::POST,
            "/api/register",
            None,
            Some(registration(username, role)),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    session_cookie(&response)
}

#[tokio::test]
async fn register_twice_reports_duplicate_username() {
    let (state, app) = test_app().await;

    let first = send(
        &app,
        request(
            Method::POST,
            "/api/register",
            None,
            Some(json!({
                "username": "alice",
                "fullName": "Alice A",
                "email": "a@x.com",
                "department": "Eng",
                "title": "SWE",
                "password": "p"
            })),
        ),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);
    assert_eq!(
        body_json(first).await,
        json!({
            "id": 1,
            "username": "alice",
            "fullName": "Alice A",
            "email": "a@x.com",
            "department": "Eng",
            "title": "SWE",
            "role": "employee"
        })
    );

    let second = send(
        &app,
        request(
            Method::POST,
            "/api/register",
            None,
            Some(registration("alice", None)),
        ),
    )
    .await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(second).await,
        json!({"error": "Username already exists"})
    );

    let email: String = sqlx::query_scalar("SELECT email FROM users WHERE username = 'alice'")
        .fetch_one(state.pool_ref())
        .await
        .unwrap();
    assert_eq!(email, "a@x.com");
}

#[tokio::test]
async fn register_rejects_blank_fields_and_unknown_roles() {
    let (_state, app) = test_app().await;

    let mut body = registration("bob", None);
    body["fullName"] = json!("   ");
    let response = send(&app, request(Method::POST, "/api/register", None, Some(body))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"error": "fullName is required"})
    );

    let response = send(
        &app,
        request(
            Method::POST,
            "/api/register",
            None,
            Some(registration("bob", Some("owner"))),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_requires_the_right_password() {
    let (_state, app) = test_app().await;
    register(&app, "carol", None).await;

    let wrong = send(
        &app,
        request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({"username": "carol", "password": "nope"})),
        ),
    )
    .await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(wrong).await,
        json!({"error": "Invalid username or password"})
    );

    let unknown = send(
        &app,
        request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({"username": "nobody", "password": "p"})),
        ),
    )
    .await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);

    let right = send(
        &app,
        request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({"username": "carol", "password": "p"})),
        ),
    )
    .await;
    assert_eq!(right.status(), StatusCode::OK);
    let cookie = session_cookie(&right);
    let view = body_json(right).await;
    assert_eq!(view["username"], json!("carol"));
    assert_eq!(view["email"], json!("carol@example.com"));
    assert!(view.get("passwordHash").is_none());

    let me = send(&app, request(Method::GET, "/api/user", Some(&cookie), None)).await;
    assert_eq!(me.status(), StatusCode::OK);
    assert_eq!(body_json(me).await, view);
}

#[tokio::test]
async fn current_user_requires_a_live_session() {
    let (_state, app) = test_app().await;

    let anonymous = send(&app, request(Method::GET, "/api/user", None, None)).await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let forged = send(
        &app,
        request(
            Method::GET,
            "/api/user",
            Some("session=00000000-0000-0000-0000-000000000000"),
            None,
        ),
    )
    .await;
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);

    let cookie = register(&app, "dave", None).await;
    let logout = send(&app, request(Method::POST, "/api/logout", Some(&cookie), None)).await;
    assert_eq!(logout.status(), StatusCode::NO_CONTENT);

    let after = send(&app, request(Method::GET, "/api/user", Some(&cookie), None)).await;
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);

    let again = send(&app, request(Method::POST, "/api/logout", None, None)).await;
    assert_eq!(again.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn admin_only_routes_reject_everyone_else() {
    let (_state, app) = test_app().await;
    let employee = register(&app, "erin", None).await;
    let announcement = json!({"title": "Hello", "content": "World"});

    for cookie in [None, Some(employee.as_str())] {
        let response = send(
            &app,
            request(Method::DELETE, "/api/documents/1", cookie, None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = send(
            &app,
            request(
                Method::POST,
                "/api/announcements",
                cookie,
                Some(announcement.clone()),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = send(
            &app,
            request(
                Method::POST,
                "/api/financials/metrics",
                cookie,
                Some(json!({"name": "EBITDA", "value": 12.5})),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    let admin = register(&app, "frank", Some("admin")).await;
    let response = send(
        &app,
        request(
            Method::POST,
            "/api/announcements",
            Some(&admin),
            Some(json!({"title": "Hello", "content": "World"})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["isImportant"], json!(false));

    let listed = send(
        &app,
        request(Method::GET, "/api/announcements", Some(&employee), None),
    )
    .await;
    assert_eq!(body_json(listed).await, json!([created]));
}

#[tokio::test]
async fn deleting_a_document_removes_only_that_row() {
    let (_state, app) = test_app().await;
    let employee = register(&app, "gina", None).await;
    let admin = register(&app, "hank", Some("admin")).await;

    let mut ids = Vec::new();
    for title in ["Handbook", "Benefits"] {
        let response = send(
            &app,
            request(
                Method::POST,
                "/api/documents",
                Some(&employee),
                Some(json!({
                    "title": title,
                    "fileName": format!("{title}.pdf"),
                    "mimeType": "application/pdf"
                })),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let doc = body_json(response).await;
        assert_eq!(doc["uploadedBy"], json!(1));
        assert_eq!(doc["description"], Value::Null);
        ids.push(doc["id"].as_i64().unwrap());
    }

    let bad_mime = send(
        &app,
        request(
            Method::POST,
            "/api/documents",
            Some(&employee),
            Some(json!({"title": "x", "fileName": "x.bin", "mimeType": "garbage"})),
        ),
    )
    .await;
    assert_eq!(bad_mime.status(), StatusCode::BAD_REQUEST);

    let uri = format!("/api/documents/{}", ids[0]);
    let deleted = send(&app, request(Method::DELETE, &uri, Some(&admin), None)).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let missing = send(&app, request(Method::DELETE, &uri, Some(&admin), None)).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert!(body_json(missing).await["error"].is_string());

    let listed = body_json(
        send(
            &app,
            request(Method::GET, "/api/documents", Some(&employee), None),
        )
        .await,
    )
    .await;
    let remaining: Vec<i64> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|doc| doc["id"].as_i64().unwrap())
        .collect();
    assert_eq!(remaining, vec![ids[1]]);
}

#[tokio::test]
async fn seed_endpoint_is_admin_only_and_idempotent() {
    let (_state, app) = test_app().await;

    let anonymous = send(
        &app,
        request(Method::GET, "/admin/init-financial-data", None, None),
    )
    .await;
    assert_eq!(anonymous.status(), StatusCode::FORBIDDEN);

    let admin = register(&app, "ivy", Some("admin")).await;

    let mut snapshots = Vec::new();
    for _ in 0..2 {
        let response = send(
            &app,
            request(Method::GET, "/admin/init-financial-data", Some(&admin), None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_text(response).await,
            "Financial data initialized successfully!"
        );

        let mut snapshot = Vec::new();
        for uri in [
            "/api/financials/metrics",
            "/api/financials/revenue-breakdown",
            "/api/financials/yearly",
            "/api/financials/investor-events",
        ] {
            let mut rows =
                body_json(send(&app, request(Method::GET, uri, Some(&admin), None)).await).await;
            // Identity and timestamps are regenerated on every run.
            for row in rows.as_array_mut().unwrap() {
                let row = row.as_object_mut().unwrap();
                row.remove("id");
                row.remove("createdAt");
            }
            snapshot.push(rows);
        }
        snapshots.push(snapshot);
    }

    assert_eq!(snapshots[0], snapshots[1]);
    assert_eq!(snapshots[0][0].as_array().unwrap().len(), 3);
    assert_eq!(snapshots[0][1].as_array().unwrap().len(), 4);
    assert_eq!(snapshots[0][2][0]["year"], json!(2024));
    assert_eq!(snapshots[0][3].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn financials_page_reflects_available_data() {
    let (_state, app) = test_app().await;

    let empty = send(&app, request(Method::GET, "/financials", None, None)).await;
    assert_eq!(empty.status(), StatusCode::OK);
    let html = body_text(empty).await;
    assert!(html.contains(r#"data-has-dynamic-data="false""#));
    assert!(html.contains(r#"<a href="/financials" class="active">"#));

    let admin = register(&app, "jack", Some("admin")).await;
    send(
        &app,
        request(Method::GET, "/admin/init-financial-data", Some(&admin), None),
    )
    .await;

    let seeded = body_text(send(&app, request(Method::GET, "/financials", None, None)).await).await;
    assert!(seeded.contains(r#"data-has-dynamic-data="true""#));
    assert!(seeded.contains("Annual Shareholders Meeting"));
}

#[tokio::test]
async fn contact_form_redirects_with_flash_codes() {
    let (state, app) = test_app().await;

    let form = |body: &'static str| {
        Request::builder()
            .method(Method::POST)
            .uri("/contact")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    };

    let missing = send(&app, form("name=Ann&email=ann%40example.com&subject=&message=Hi")).await;
    assert_eq!(missing.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        missing.headers()[header::LOCATION],
        "/contact?error=missing_fields"
    );

    let sent = send(
        &app,
        form("name=Ann&email=ann%40example.com&subject=Hello&message=Hi+there"),
    )
    .await;
    assert_eq!(sent.status(), StatusCode::SEE_OTHER);
    assert_eq!(sent.headers()[header::LOCATION], "/contact?status=sent");

    let stored: Vec<(String, String)> =
        sqlx::query_as("SELECT email, message FROM contact_forms")
            .fetch_all(state.pool_ref())
            .await
            .unwrap();
    assert_eq!(
        stored,
        vec![("ann@example.com".to_string(), "Hi there".to_string())]
    );

    let page = body_text(
        send(
            &app,
            request(Method::GET, "/contact?status=sent", None, None),
        )
        .await,
    )
    .await;
    assert!(page.contains("Your message has been sent!"));
}

#[tokio::test]
async fn content_status_changes_follow_the_transition_table() {
    let (state, app) = test_app().await;
    let writer = register(&app, "kate", None).await;

    let created = send(
        &app,
        request(
            Method::POST,
            "/api/content",
            Some(&writer),
            Some(json!({
                "title": "Spring launch",
                "contentType": "blog",
                "assignedTo": 1,
                "deadline": "2025-03-01"
            })),
        ),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let item = body_json(created).await;
    assert_eq!(item["status"], json!("draft"));
    assert_eq!(item["deadline"], json!("2025-03-01T00:00:00.000000Z"));
    let uri = format!("/api/content/{}", item["id"]);

    let history_count = || {
        let pool = state.pool_ref().clone();
        async move {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM content_history")
                .fetch_one(&pool)
                .await
                .unwrap()
        }
    };
    assert_eq!(history_count().await, 1);

    let skipped = send(
        &app,
        request(
            Method::PUT,
            &uri,
            Some(&writer),
            Some(json!({"status": "published"})),
        ),
    )
    .await;
    assert_eq!(skipped.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(skipped).await,
        json!({"error": "Invalid status transition from draft to published"})
    );
    assert_eq!(history_count().await, 1);

    let review = send(
        &app,
        request(
            Method::PUT,
            &uri,
            Some(&writer),
            Some(json!({"status": "review"})),
        ),
    )
    .await;
    assert_eq!(review.status(), StatusCode::OK);
    assert_eq!(body_json(review).await["status"], json!("review"));
    assert_eq!(history_count().await, 2);

    let detail = body_json(send(&app, request(Method::GET, &uri, Some(&writer), None)).await).await;
    assert_eq!(detail["title"], json!("Spring launch"));
    assert_eq!(detail["history"][0]["status"], json!("review"));
    assert_eq!(detail["history"][0]["notes"], json!("Status changed to review"));
    assert_eq!(detail["history"][1]["notes"], json!("Content item created"));

    let filtered = body_json(
        send(
            &app,
            request(
                Method::GET,
                "/api/content?type=social",
                Some(&writer),
                None,
            ),
        )
        .await,
    )
    .await;
    assert_eq!(filtered, json!([]));

    let forbidden = send(&app, request(Method::DELETE, &uri, Some(&writer), None)).await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let admin = register(&app, "leo", Some("admin")).await;
    let deleted = send(&app, request(Method::DELETE, &uri, Some(&admin), None)).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
    assert_eq!(history_count().await, 0);

    let gone = send(&app, request(Method::GET, &uri, Some(&admin), None)).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn workflows_require_admin_to_create() {
    let (_state, app) = test_app().await;
    let employee = register(&app, "mia", None).await;
    let admin = register(&app, "ned", Some("admin")).await;
    let workflow = json!({
        "name": "Blog review",
        "contentType": "blog",
        "steps": ["draft", "review", "approved", "published"]
    });

    let denied = send(
        &app,
        request(
            Method::POST,
            "/api/workflows",
            Some(&employee),
            Some(workflow.clone()),
        ),
    )
    .await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let empty_steps = send(
        &app,
        request(
            Method::POST,
            "/api/workflows",
            Some(&admin),
            Some(json!({"name": "x", "contentType": "blog", "steps": []})),
        ),
    )
    .await;
    assert_eq!(empty_steps.status(), StatusCode::BAD_REQUEST);

    let created = send(
        &app,
        request(Method::POST, "/api/workflows", Some(&admin), Some(workflow)),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let blog = body_json(
        send(
            &app,
            request(Method::GET, "/api/workflows?type=blog", Some(&employee), None),
        )
        .await,
    )
    .await;
    assert_eq!(blog[0]["steps"][1], json!("review"));

    let social = body_json(
        send(
            &app,
            request(Method::GET, "/api/workflows?type=social", Some(&employee), None),
        )
        .await,
    )
    .await;
    assert_eq!(social, json!([]));
}

#[tokio::test]
async fn public_pages_render_and_unknown_paths_404() {
    let (_state, app) = test_app().await;

    for (path, active) in [
        ("/", "home"),
        ("/about", "about"),
        ("/services", "services"),
        ("/team", "team"),
        ("/careers", "careers"),
        ("/contact", "contact"),
    ] {
        let response = send(&app, request(Method::GET, path, None, None)).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        let html = body_text(response).await;
        assert!(html.contains(&format!(r#"data-active-page="{active}""#)));
    }

    let health = send(&app, request(Method::GET, "/healthz", None, None)).await;
    assert_eq!(health.status(), StatusCode::OK);

    let missing = send(&app, request(Method::GET, "/no/such/page", None, None)).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert!(body_text(missing).await.contains("Page not found"));
}

#[tokio::test]
async fn login_rejects_missing_credentials() {
    let (_state, app) = test_app().await;
    register(&app, "olga", None).await;

    let no_username = send(
        &app,
        request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({"username": "  ", "password": "p"})),
        ),
    )
    .await;
    assert_eq!(no_username.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(no_username).await,
        json!({"error": "username is required"})
    );

    let no_password = send(
        &app,
        request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({"username": "olga"})),
        ),
    )
    .await;
    assert_eq!(no_password.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn expired_sessions_stop_authenticating_and_are_purged() {
    let (state, app) = test_app().await;
    let cookie = register(&app, "paul", None).await;

    let token: String = sqlx::query_scalar("SELECT token FROM sessions")
        .fetch_one(state.pool_ref())
        .await
        .unwrap();
    sqlx::query("UPDATE sessions SET expires_at = $1 WHERE token = $2")
        .bind("2000-01-01T00:00:00.000000Z")
        .bind(&token)
        .execute(state.pool_ref())
        .await
        .unwrap();

    let expired = send(&app, request(Method::GET, "/api/user", Some(&cookie), None)).await;
    assert_eq!(expired.status(), StatusCode::UNAUTHORIZED);

    let login = send(
        &app,
        request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({"username": "paul", "password": "p"})),
        ),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);

    let stale: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions WHERE token = $1")
        .bind(&token)
        .fetch_one(state.pool_ref())
        .await
        .unwrap();
    assert_eq!(stale, 0);

    let live: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
        .fetch_one(state.pool_ref())
        .await
        .unwrap();
    assert_eq!(live, 1);
}

#[tokio::test]
async fn contact_storage_failure_redirects_with_send_failed() {
    let (state, app) = test_app().await;
    sqlx::query("DROP TABLE contact_forms")
        .execute(state.pool_ref())
        .await
        .unwrap();

    let response = send(
        &app,
        Request::builder()
            .method(Method::POST)
            .uri("/contact")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(
                "name=Ann&email=ann%40example.com&subject=Hello&message=Hi",
            ))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION],
        "/contact?error=send_failed"
    );
}

#[tokio::test]
async fn null_optional_columns_read_back_as_null() {
    let (state, app) = test_app().await;
    let cookie = register(&app, "quinn", None).await;
    let now = timestamp_now();

    sqlx::query(
        "INSERT INTO financial_metrics (name, value, display_order, created_at, updated_at) VALUES ($1, $2, $3, $4, $4)",
    )
    .bind("EBITDA")
    .bind(12.5)
    .bind(0_i64)
    .bind(&now)
    .execute(state.pool_ref())
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO yearly_financials (year, revenue, created_at, updated_at) VALUES ($1, $2, $3, $3)",
    )
    .bind(2019_i64)
    .bind(60.0)
    .bind(&now)
    .execute(state.pool_ref())
    .await
    .unwrap();
    sqlx::query("INSERT INTO investor_events (title, event_date, created_at) VALUES ($1, $2, $3)")
        .bind("Capital Markets Day")
        .bind("2030-09-01")
        .bind(&now)
        .execute(state.pool_ref())
        .await
        .unwrap();

    let metrics = send(
        &app,
        request(Method::GET, "/api/financials/metrics", Some(&cookie), None),
    )
    .await;
    assert_eq!(metrics.status(), StatusCode::OK);
    let metrics = body_json(metrics).await;
    assert_eq!(metrics[0]["description"], Value::Null);
    assert_eq!(metrics[0]["icon"], Value::Null);

    let yearly = body_json(
        send(
            &app,
            request(Method::GET, "/api/financials/yearly", Some(&cookie), None),
        )
        .await,
    )
    .await;
    assert_eq!(yearly[0]["growthPercentage"], Value::Null);
    assert_eq!(yearly[0]["profit"], Value::Null);

    let events = body_json(
        send(
            &app,
            request(
                Method::GET,
                "/api/financials/investor-events",
                Some(&cookie),
                None,
            ),
        )
        .await,
    )
    .await;
    assert_eq!(events[0]["description"], Value::Null);

    let created = send(
        &app,
        request(
            Method::POST,
            "/api/content",
            Some(&cookie),
            Some(json!({"title": "Teaser", "contentType": "social"})),
        ),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let item = body_json(created).await;
    for field in ["description", "assignedTo", "deadline"] {
        assert_eq!(item[field], Value::Null, "{field}");
    }

    let listed = send(&app, request(Method::GET, "/api/content", Some(&cookie), None)).await;
    assert_eq!(listed.status(), StatusCode::OK);
    assert_eq!(body_json(listed).await, json!([item.clone()]));

    let uri = format!("/api/content/{}", item["id"]);
    let detail = send(&app, request(Method::GET, &uri, Some(&cookie), None)).await;
    assert_eq!(detail.status(), StatusCode::OK);
    let detail = body_json(detail).await;
    assert_eq!(detail["assignedTo"], Value::Null);
    assert_eq!(detail["history"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn content_update_clears_fields_only_when_null() {
    let (_state, app) = test_app().await;
    let cookie = register(&app, "rosa", None).await;

    let created = send(
        &app,
        request(
            Method::POST,
            "/api/content",
            Some(&cookie),
            Some(json!({
                "title": "Catalogue",
                "contentType": "product",
                "description": "Autumn range",
                "assignedTo": 1,
                "deadline": "2025-10-01"
            })),
        ),
    )
    .await;
    let uri = format!("/api/content/{}", body_json(created).await["id"]);

    let kept = body_json(
        send(
            &app,
            request(
                Method::PUT,
                &uri,
                Some(&cookie),
                Some(json!({"title": "Autumn catalogue"})),
            ),
        )
        .await,
    )
    .await;
    assert_eq!(kept["title"], json!("Autumn catalogue"));
    assert_eq!(kept["assignedTo"], json!(1));
    assert_eq!(kept["deadline"], json!("2025-10-01T00:00:00.000000Z"));
    assert_eq!(kept["description"], json!("Autumn range"));

    let cleared = send(
        &app,
        request(
            Method::PUT,
            &uri,
            Some(&cookie),
            Some(json!({"assignedTo": null, "deadline": null, "description": null})),
        ),
    )
    .await;
    assert_eq!(cleared.status(), StatusCode::OK);
    let cleared = body_json(cleared).await;
    assert_eq!(cleared["assignedTo"], Value::Null);
    assert_eq!(cleared["deadline"], Value::Null);
    assert_eq!(cleared["description"], Value::Null);
    assert_eq!(cleared["title"], json!("Autumn catalogue"));
}

#[tokio::test]
async fn registering_with_admin_role_grants_admin_capability() {
    let (_state, app) = test_app().await;
    let admin = register(&app, "sam", Some("admin")).await;

    let me = body_json(send(&app, request(Method::GET, "/api/user", Some(&admin), None)).await).await;
    assert_eq!(me["role"], json!("admin"));

    let seeded = send(
        &app,
        request(Method::GET, "/admin/init-financial-data", Some(&admin), None),
    )
    .await;
    assert_eq!(seeded.status(), StatusCode::OK);
}
