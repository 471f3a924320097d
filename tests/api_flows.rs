//! End-to-end flows against a real Postgres (`DATABASE_URL`), one fresh
//! database per test. Run with `cargo test --features postgres-tests`.

mod common;

use axum::{
    http::{Method, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tokio::task::JoinSet;
use uuid::Uuid;

use common::{app_with, send};

struct Session {
    id: Uuid,
    token: String,
    expires_at: OffsetDateTime,
}

fn expiry(body: &Value) -> OffsetDateTime {
    OffsetDateTime::parse(body["expires_at"].as_str().unwrap(), &Rfc3339).unwrap()
}

fn id_of(body: &Value) -> Uuid {
    body["id"].as_str().unwrap().parse().unwrap()
}

async fn register(app: &Router, name: &str, email: &str) -> Session {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({"name": name, "email": email, "password": "correct horse"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["token_type"], "bearer");
    assert!(body["user"].get("password_hash").is_none());
    Session {
        id: body["user"]["id"].as_str().unwrap().parse().unwrap(),
        token: body["access_token"].as_str().unwrap().to_owned(),
        expires_at: expiry(&body),
    }
}

async fn create(app: &Router, s: &Session, uri: &str, body: Value) -> Value {
    let (status, body) = send(app, Method::POST, uri, Some(&s.token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{uri}: {body}");
    body
}

#[sqlx::test(migrations = "./migrations")]
async fn register_login_and_isolation(pool: PgPool) {
    let app = app_with(pool);

    let alice = register(&app, "Alice", "alice@example.com").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({"email": "alice@example.com", "password": "wrong password"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({"email": "nobody@example.com", "password": "correct horse"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, login) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({"email": "alice@example.com", "password": "correct horse"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(expiry(&login) >= alice.expires_at);
    assert!(login["user"]["last_login"].is_string());

    let (status, me) = send(&app, Method::GET, "/api/v1/auth/me", Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "alice@example.com");

    let client = create(
        &app,
        &alice,
        "/api/v1/clients",
        json!({"name": "Acme Corp", "email": "buyer@acme.test", "company": "Acme"}),
    )
    .await;
    let client_id = id_of(&client);

    let (status, list) = send(&app, Method::GET, "/api/v1/clients", Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(id_of(&list[0]), client_id);

    let bob = register(&app, "Bob", "bob@example.com").await;
    let uri = format!("/api/v1/clients/{client_id}");

    let (status, body) = send(&app, Method::GET, &uri, Some(&bob.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, missing) = send(
        &app,
        Method::GET,
        &format!("/api/v1/clients/{}", Uuid::new_v4()),
        Some(&bob.token),
        None,
    )
    .await;
    assert_eq!(body, missing, "foreign and missing rows must look the same");

    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&bob.token),
        Some(json!({"name": "Hijacked"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&bob.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::GET, &uri, Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Acme Corp");

    let (_, bobs) = send(&app, Method::GET, "/api/v1/clients", Some(&bob.token), None).await;
    assert!(bobs.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_user_email_conflicts(pool: PgPool) {
    let app = app_with(pool);
    register(&app, "Alice", "alice@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({"name": "Alice Two", "email": "alice@example.com", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email already registered");
}

/// Fires `n` identical POSTs at once and returns the statuses and bodies.
async fn post_concurrently(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: Value,
    n: usize,
) -> Vec<(StatusCode, Value)> {
    let mut set = JoinSet::new();
    for _ in 0..n {
        let app = app.clone();
        let uri = uri.to_owned();
        let token = token.map(str::to_owned);
        let body = body.clone();
        set.spawn(async move { send(&app, Method::POST, &uri, token.as_deref(), Some(body)).await });
    }
    let mut out = Vec::with_capacity(n);
    while let Some(res) = set.join_next().await {
        out.push(res.unwrap());
    }
    out
}

fn assert_one_winner(results: &[(StatusCode, Value)], conflict_message: &str) {
    let created = results
        .iter()
        .filter(|(s, _)| *s == StatusCode::CREATED)
        .count();
    assert_eq!(created, 1, "{results:?}");
    for (status, body) in results.iter().filter(|(s, _)| *s != StatusCode::CREATED) {
        assert_eq!(*status, StatusCode::CONFLICT, "{body}");
        assert_eq!(body["message"], conflict_message);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn concurrent_registrations_with_one_email(pool: PgPool) {
    let app = app_with(pool.clone());
    let results = post_concurrently(
        &app,
        "/api/v1/auth/register",
        None,
        json!({"name": "Racer", "email": "race@example.com", "password": "secret1"}),
        6,
    )
    .await;
    assert_one_winner(&results, "Email already registered");

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind("race@example.com")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(users, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn concurrent_client_creation_with_one_email(pool: PgPool) {
    let app = app_with(pool.clone());
    let alice = register(&app, "Alice", "alice@example.com").await;
    let results = post_concurrently(
        &app,
        "/api/v1/clients",
        Some(&alice.token),
        json!({"name": "Same Lead", "email": "lead@example.com"}),
        6,
    )
    .await;
    assert_one_winner(&results, "A client with this email already exists");

    let clients: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients WHERE user_id = $1")
        .bind(alice.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(clients, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn client_email_is_unique_per_owner(pool: PgPool) {
    let app = app_with(pool);
    let alice = register(&app, "Alice", "alice@example.com").await;
    let bob = register(&app, "Bob", "bob@example.com").await;
    let body = json!({"name": "Shared Lead", "email": "lead@example.com"});

    create(&app, &alice, "/api/v1/clients", body.clone()).await;
    create(&app, &bob, "/api/v1/clients", body.clone()).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/clients",
        Some(&alice.token),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn client_update_and_search(pool: PgPool) {
    let app = app_with(pool);
    let alice = register(&app, "Alice", "alice@example.com").await;
    let client = create(
        &app,
        &alice,
        "/api/v1/clients",
        json!({"name": "Globex Inc", "company": "Globex", "phone": "555-0100"}),
    )
    .await;
    create(&app, &alice, "/api/v1/clients", json!({"name": "Initech"})).await;

    let uri = format!("/api/v1/clients/{}", id_of(&client));
    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&alice.token),
        Some(json!({"notes": "call back"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["notes"], "call back");
    assert_eq!(updated["phone"], "555-0100", "omitted fields are kept");

    let (_, found) = send(
        &app,
        Method::GET,
        "/api/v1/clients/search/name/glob",
        Some(&alice.token),
        None,
    )
    .await;
    assert_eq!(found.as_array().unwrap().len(), 1);

    let (_, found) = send(
        &app,
        Method::GET,
        "/api/v1/clients/search/company/%25",
        Some(&alice.token),
        None,
    )
    .await;
    assert!(found.as_array().unwrap().is_empty(), "wildcards are literal");

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &uri, Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn sales_are_owner_scoped(pool: PgPool) {
    let app = app_with(pool);
    let alice = register(&app, "Alice", "alice@example.com").await;
    let bob = register(&app, "Bob", "bob@example.com").await;
    let client = create(&app, &alice, "/api/v1/clients", json!({"name": "Acme Corp"})).await;
    let client_id = id_of(&client);

    let sale = create(
        &app,
        &alice,
        "/api/v1/sales",
        json!({"title": "Annual plan", "value": "1500.50", "client_id": client_id,
               "closing_date": "2025-06-30"}),
    )
    .await;
    assert_eq!(sale["status"], "negotiating");
    assert_eq!(sale["value"], "1500.50");
    assert_eq!(sale["closing_date"], "2025-06-30");
    let sale_uri = format!("/api/v1/sales/{}", id_of(&sale));

    // Bob cannot attach a sale to Alice's client.
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/sales",
        Some(&bob.token),
        Some(json!({"title": "Sneaky deal", "value": 10, "client_id": client_id})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, closed) = send(
        &app,
        Method::PUT,
        &sale_uri,
        Some(&alice.token),
        Some(json!({"status": "closed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(closed["status"], "closed");
    assert_eq!(closed["title"], "Annual plan");

    let (_, filtered) = send(
        &app,
        Method::GET,
        "/api/v1/sales?status=negotiating",
        Some(&alice.token),
        None,
    )
    .await;
    assert!(filtered.as_array().unwrap().is_empty());

    for method in [Method::GET, Method::DELETE] {
        let (status, _) = send(&app, method, &sale_uri, Some(&bob.token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn sale_owner_may_be_supplied_by_creator(pool: PgPool) {
    let app = app_with(pool);
    let alice = register(&app, "Alice", "alice@example.com").await;
    let bob = register(&app, "Bob", "bob@example.com").await;
    let client = create(&app, &alice, "/api/v1/clients", json!({"name": "Acme Corp"})).await;

    let sale = create(
        &app,
        &alice,
        "/api/v1/sales",
        json!({"title": "Handed over", "value": 99, "client_id": id_of(&client),
               "user_id": bob.id}),
    )
    .await;
    assert_eq!(sale["user_id"], bob.id.to_string());

    let uri = format!("/api/v1/sales/{}", id_of(&sale));
    let (status, _) = send(&app, Method::GET, &uri, Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::GET, &uri, Some(&bob.token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn calls_and_suggestions_follow_call_owner(pool: PgPool) {
    let app = app_with(pool.clone());
    let alice = register(&app, "Alice", "alice@example.com").await;
    let bob = register(&app, "Bob", "bob@example.com").await;
    let client = create(&app, &alice, "/api/v1/clients", json!({"name": "Acme Corp"})).await;

    let call = create(
        &app,
        &alice,
        "/api/v1/calls",
        json!({"client_id": id_of(&client), "result": "in_progress", "duration_secs": 0}),
    )
    .await;
    assert!(call["started_at"].is_string());
    let call_id = id_of(&call);

    let suggestion = create(
        &app,
        &alice,
        "/api/v1/suggestions",
        json!({"call_id": call_id, "content": "Ask about their budget", "moment": 42}),
    )
    .await;
    assert_eq!(suggestion["accepted"], false);
    let suggestion_uri = format!("/api/v1/suggestions/{}", id_of(&suggestion));

    // Bob can neither attach to nor see anything under Alice's call.
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/suggestions",
        Some(&bob.token),
        Some(json!({"call_id": call_id, "content": "Offer a discount now"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::GET, &suggestion_uri, Some(&bob.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("{suggestion_uri}/accept"),
        Some(&bob.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, listed) = send(&app, Method::GET, "/api/v1/suggestions", Some(&bob.token), None).await;
    assert!(listed.as_array().unwrap().is_empty());

    let (status, _) = send(
        &app,
        Method::PUT,
        &suggestion_uri,
        Some(&bob.token),
        Some(json!({"accepted": true})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/calls/{call_id}"),
        Some(&bob.token),
        Some(json!({"transcript": "overwritten", "result": "failure"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, &suggestion_uri, Some(&bob.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Bob's attempts changed nothing.
    let (_, untouched) = send(&app, Method::GET, &suggestion_uri, Some(&alice.token), None).await;
    assert_eq!(untouched["accepted"], false);
    let (_, untouched) = send(
        &app,
        Method::GET,
        &format!("/api/v1/calls/{call_id}"),
        Some(&alice.token),
        None,
    )
    .await;
    assert_eq!(untouched["result"], "in_progress");
    assert!(untouched["transcript"].is_null());

    let (status, accepted) = send(
        &app,
        Method::PATCH,
        &format!("{suggestion_uri}/accept"),
        Some(&alice.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accepted["accepted"], true);

    let (_, listed) = send(
        &app,
        Method::GET,
        &format!("/api/v1/suggestions?accepted=true&call_id={call_id}"),
        Some(&alice.token),
        None,
    )
    .await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Deleting the user takes their calls and the calls' suggestions along.
    let removed = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(alice.id)
        .execute(&pool)
        .await
        .unwrap();
    assert_eq!(removed.rows_affected(), 1);
    let calls: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM calls")
        .fetch_one(&pool)
        .await
        .unwrap();
    let suggestions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM suggestions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!((calls, suggestions), (0, 0));

    let (status, _) = send(&app, Method::GET, "/api/v1/auth/me", Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn chat_history_is_private_and_clearable(pool: PgPool) {
    let app = app_with(pool);
    let alice = register(&app, "Alice", "alice@example.com").await;
    let bob = register(&app, "Bob", "bob@example.com").await;

    let first = create(&app, &alice, "/api/v1/chat", json!({"content": "hello"})).await;
    create(&app, &alice, "/api/v1/chat", json!({"content": "how do I close?"})).await;

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/v1/chat/{}", id_of(&first)),
        Some(&bob.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/api/v1/chat", Some(&bob.token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, history) = send(&app, Method::GET, "/api/v1/chat", Some(&alice.token), None).await;
    assert_eq!(history.as_array().unwrap().len(), 2);

    let (status, _) = send(&app, Method::DELETE, "/api/v1/chat", Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, history) = send(&app, Method::GET, "/api/v1/chat", Some(&alice.token), None).await;
    assert!(history.as_array().unwrap().is_empty());
}
