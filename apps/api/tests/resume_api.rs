//! Resume ownership and section CRUD against a real database.
//!
//! Run with `DATABASE_URL=... cargo test -- --ignored`.

mod common;

use axum::http::{Method, StatusCode};
use common::{build_test_app, create_resume, register, send};
use resume_api::resumes::sections::SECTIONS;
use serde_json::{json, Map, Value};
use sqlx::PgPool;
use uuid::Uuid;

/// A body that fills every field of a section with `"<field>-<tag>"`.
fn section_body(fields: &[&str], tag: &str) -> Value {
    let map: Map<String, Value> = fields
        .iter()
        .map(|f| (f.to_string(), Value::String(format!("{f}-{tag}"))))
        .collect();
    Value::Object(map)
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn test_guest_resume_is_open_to_anyone(pool: PgPool) {
    let app = build_test_app(pool);
    let resume_id = create_resume(&app, None, "Guest CV").await;

    let (status, json) = send(&app, Method::GET, &format!("/api/resumes/{resume_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user_id"], Value::Null);
    assert_eq!(json["title"], "Guest CV");

    // A logged-in stranger may edit a guest resume too.
    let (token, _) = register(&app, "stranger").await;
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/resumes/{resume_id}"),
        Some(&token),
        Some(json!({ "title": "Edited" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn test_garbage_token_creates_a_guest_resume(pool: PgPool) {
    let app = build_test_app(pool);
    let (status, json) = send(
        &app,
        Method::POST,
        "/api/resumes",
        Some("garbage"),
        Some(json!({ "title": "Anonymous CV" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let resume_id = json["id"].as_str().expect("id should be a string").to_string();

    let (status, json) = send(&app, Method::GET, &format!("/api/resumes/{resume_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user_id"], Value::Null);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn test_owned_resume_is_private(pool: PgPool) {
    let app = build_test_app(pool);
    let (token_a, user_a) = register(&app, "alice").await;
    let (token_b, _) = register(&app, "bob").await;
    let resume_id = create_resume(&app, Some(&token_a), "Alice CV").await;
    let uri = format!("/api/resumes/{resume_id}");

    let (status, json) = send(&app, Method::GET, &uri, Some(&token_b), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "Access denied");

    let (status, _) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("{uri}/skills"),
        Some(&token_b),
        Some(json!({ "skill": "Sabotage" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = send(&app, Method::GET, &uri, Some(&token_a), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user_id"], user_a.to_string());
    for section in &SECTIONS {
        assert_eq!(json[section.name], json!([]), "{} should be empty", section.name);
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn test_missing_resume_is_not_found(pool: PgPool) {
    let app = build_test_app(pool);
    let uri = format!("/api/resumes/{}", Uuid::new_v4());

    let (status, _) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("{uri}/interests"),
        None,
        Some(json!({ "name": "Chess" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn test_list_only_returns_callers_resumes(pool: PgPool) {
    let app = build_test_app(pool);
    let (token_a, _) = register(&app, "carol").await;
    let (token_b, _) = register(&app, "dave").await;
    create_resume(&app, Some(&token_a), "Carol 1").await;
    create_resume(&app, Some(&token_a), "Carol 2").await;
    create_resume(&app, Some(&token_b), "Dave").await;
    create_resume(&app, None, "Guest").await;

    let (status, json) = send(&app, Method::GET, "/api/resumes", Some(&token_a), None).await;
    assert_eq!(status, StatusCode::OK);
    let mut titles: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap().to_string())
        .collect();
    titles.sort();
    assert_eq!(titles, vec!["Carol 1", "Carol 2"]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn test_every_section_add_update_delete(pool: PgPool) {
    let app = build_test_app(pool);
    let (token, _) = register(&app, "erin").await;
    let resume_id = create_resume(&app, Some(&token), "Full CV").await;
    let resume_uri = format!("/api/resumes/{resume_id}");

    for section in &SECTIONS {
        let fields: Vec<&str> = section.fields.iter().map(|f| f.name).collect();
        let base = format!("{resume_uri}/{}", section.name);

        let (status, json) = send(&app, Method::POST, &base, Some(&token), Some(section_body(&fields, "v1"))).await;
        assert_eq!(status, StatusCode::CREATED, "{}: {json}", section.name);
        let item_id = json["id"].as_str().unwrap().to_string();

        let (_, resume) = send(&app, Method::GET, &resume_uri, Some(&token), None).await;
        let items = resume[section.name].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], item_id);
        assert_eq!(items[0][fields[0]], format!("{}-v1", fields[0]));

        let item_uri = format!("{base}/{item_id}");
        let (status, _) = send(&app, Method::PUT, &item_uri, Some(&token), Some(section_body(&fields, "v2"))).await;
        assert_eq!(status, StatusCode::OK, "{}", section.name);

        let (_, resume) = send(&app, Method::GET, &resume_uri, Some(&token), None).await;
        for field in &fields {
            assert_eq!(resume[section.name][0][*field], format!("{field}-v2"));
        }

        let (status, _) = send(&app, Method::DELETE, &item_uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK, "{}", section.name);

        let (_, resume) = send(&app, Method::GET, &resume_uri, Some(&token), None).await;
        assert_eq!(resume[section.name], json!([]));
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn test_add_item_validates_required_fields(pool: PgPool) {
    let app = build_test_app(pool);
    let resume_id = create_resume(&app, None, "Guest").await;

    let (status, json) = send(
        &app,
        Method::POST,
        &format!("/api/resumes/{resume_id}/experience"),
        None,
        Some(json!({ "company": "Acme" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("role"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn test_item_from_another_resume_is_not_found(pool: PgPool) {
    let app = build_test_app(pool);
    let first = create_resume(&app, None, "First").await;
    let second = create_resume(&app, None, "Second").await;

    let (_, json) = send(
        &app,
        Method::POST,
        &format!("/api/resumes/{first}/languages"),
        None,
        Some(json!({ "language": "Basque", "proficiency": "native" })),
    )
    .await;
    let item_id = json["id"].as_str().unwrap();

    // Addressing the item through the wrong parent touches no rows.
    let wrong = format!("/api/resumes/{second}/languages/{item_id}");
    let (status, _) = send(&app, Method::PUT, &wrong, None, Some(json!({ "language": "Hacked" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, &wrong, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, resume) = send(&app, Method::GET, &format!("/api/resumes/{first}"), None, None).await;
    assert_eq!(resume["languages"][0]["language"], "Basque");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn test_deleting_resume_cascades_to_sections(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let resume_id = create_resume(&app, None, "Short-lived").await;
    for (section, body) in [
        ("experience", json!({ "company": "Acme", "role": "Dev" })),
        ("certifications", json!({ "name": "CKA", "issuer": "CNCF" })),
    ] {
        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/resumes/{resume_id}/{section}"),
            None,
            Some(body),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let uri = format!("/api/resumes/{resume_id}");
    let (status, _) = send(&app, Method::DELETE, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for table in ["experience", "certifications"] {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE resume_id = $1"))
            .bind(resume_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0, "{table} rows survived");
    }
}
