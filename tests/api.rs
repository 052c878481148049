//! Drives the HTTP router over an in-memory store; no database or socket needed.

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use skills_manager::api;
use skills_manager::config::Config;
use skills_manager::db;

fn app() -> Router {
    api::app(db::in_memory(), &Config::default())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn create(app: &Router, uri: &str, body: Value) -> i64 {
    let (status, value) = send(app, Method::POST, uri, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "POST {uri}: {value}");
    value["id"].as_i64().expect("id")
}

async fn assign(app: &Router, personnel: i64, skill: i64, level: &str) {
    let (status, _) = send(
        app,
        Method::POST,
        &format!("/api/personnel/{personnel}/skills"),
        Some(json!({ "skill_id": skill, "proficiency_level": level })),
    )
    .await;
    assert!(status.is_success());
}

async fn require(app: &Router, project: i64, skill: i64, level: &str) {
    let (status, _) = send(
        app,
        Method::POST,
        &format!("/api/projects/{project}/requirements"),
        Some(json!({ "skill_id": skill, "minimum_proficiency_level": level })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

fn names(rows: &Value) -> Vec<&str> {
    rows.as_array()
        .expect("array")
        .iter()
        .map(|row| row["name"].as_str().expect("name"))
        .collect()
}

struct Staffing {
    skill_a: i64,
    skill_b: i64,
    project: i64,
}

/// Project needs Rust >= Intermediate and SQL >= Beginner.
///
/// Xavier (Senior) and Wendy (Junior) cover both; Yusuf lacks SQL; Zoe's Rust is too weak.
async fn staffing(app: &Router) -> Staffing {
    let skill_a = create(app, "/api/skills", json!({ "skill_name": "Rust", "category": "Languages" })).await;
    let skill_b = create(app, "/api/skills", json!({ "skill_name": "SQL" })).await;

    let people = [
        ("Xavier", "Senior", vec![(skill_a, "Advanced"), (skill_b, "Beginner")]),
        ("Yusuf", "Mid-Level", vec![(skill_a, "Advanced")]),
        ("Zoe", "Senior", vec![(skill_a, "Beginner"), (skill_b, "Expert")]),
        ("Wendy", "Junior", vec![(skill_a, "Expert"), (skill_b, "Advanced")]),
    ];
    for (name, level, skills) in people {
        let id = create(
            app,
            "/api/personnel",
            json!({
                "name": name,
                "email": format!("{}@example.com", name.to_lowercase()),
                "role": "Engineer",
                "experience_level": level,
            }),
        )
        .await;
        for (skill, proficiency) in skills {
            assign(app, id, skill, proficiency).await;
        }
    }

    let project = create(
        app,
        "/api/projects",
        json!({ "project_name": "Apollo", "status": "Active", "start_date": "2024-01-01" }),
    )
    .await;
    require(app, project, skill_a, "Intermediate").await;
    require(app, project, skill_b, "Beginner").await;

    Staffing {
        skill_a,
        skill_b,
        project,
    }
}

#[tokio::test]
async fn health_endpoints_report_ok() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, Method::GET, "/api/health/db", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"]["connected"], true);
}

#[tokio::test]
async fn match_returns_full_coverage_ranked_by_experience() {
    let app = app();
    let staffing = staffing(&app).await;

    let (status, body) = send(&app, Method::GET, &format!("/api/matching/{}", staffing.project), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Xavier", "Wendy"]);
    assert_eq!(body[0]["matched_skills"], "Rust:Advanced, SQL:Beginner");
    assert_eq!(body[0]["match_percentage"], 100);
    assert_eq!(body[1]["experience_level"], "Junior");
}

#[tokio::test]
async fn unknown_project_matches_nobody() {
    let app = app();
    staffing(&app).await;

    let (status, body) = send(&app, Method::GET, "/api/matching/9999", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn search_filters_by_minimum_proficiency() {
    let app = app();
    let staffing = staffing(&app).await;

    let uri = format!(
        "/api/matching/search/personnel?skillId={}&minProficiency=Advanced",
        staffing.skill_a
    );
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let found = names(&body);
    assert_eq!(found.len(), 3);
    assert!(!found.contains(&"Zoe"));

    let (_, body) = send(
        &app,
        Method::GET,
        "/api/matching/search/personnel?experienceLevel=Senior",
        None,
    )
    .await;
    assert_eq!(names(&body), vec!["Zoe", "Xavier"]);

    let (_, body) = send(&app, Method::GET, "/api/matching/search/personnel", None).await;
    assert_eq!(names(&body), vec!["Wendy", "Zoe", "Yusuf", "Xavier"]);
}

#[tokio::test]
async fn search_rejects_unknown_levels() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/matching/search/personnel?skillId=1&minProficiency=Guru",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().expect("error").contains("Guru"));
}

#[tokio::test]
async fn utilization_counts_matched_projects() {
    let app = app();
    let staffing = staffing(&app).await;
    let planning = create(&app, "/api/projects", json!({ "project_name": "Gemini" })).await;
    require(&app, planning, staffing.skill_b, "Advanced").await;

    let (status, body) = send(&app, Method::GET, "/api/matching/utilization/personnel", None).await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().expect("array");
    assert_eq!(rows.len(), 4);
    let wendy = &rows[0];
    assert_eq!(wendy["name"], "Wendy");
    assert_eq!(wendy["project_count"], 2);
    assert_eq!(wendy["active_project_count"], 1);
    assert_eq!(wendy["planning_project_count"], 1);
    assert_eq!(wendy["utilization_percentage"], 25);

    let yusuf = rows.iter().find(|row| row["name"] == "Yusuf").expect("Yusuf");
    assert_eq!(yusuf["project_count"], 0);
    assert_eq!(yusuf["utilization_percentage"], 0);
}

#[tokio::test]
async fn deleting_a_skill_cascades_into_matching() {
    let app = app();
    let staffing = staffing(&app).await;

    let (status, body) = send(&app, Method::DELETE, &format!("/api/skills/{}", staffing.skill_a), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, requirements) = send(
        &app,
        Method::GET,
        &format!("/api/projects/{}/requirements", staffing.project),
        None,
    )
    .await;
    assert_eq!(requirements.as_array().map(Vec::len), Some(1));

    let (_, body) = send(&app, Method::GET, &format!("/api/matching/{}", staffing.project), None).await;
    assert_eq!(names(&body), vec!["Xavier", "Zoe", "Wendy"]);

    send(&app, Method::DELETE, &format!("/api/skills/{}", staffing.skill_b), None).await;
    let (_, body) = send(&app, Method::GET, &format!("/api/matching/{}", staffing.project), None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn assigning_twice_updates_the_level() {
    let app = app();
    let skill = create(&app, "/api/skills", json!({ "skill_name": "Go" })).await;
    let person = create(
        &app,
        "/api/personnel",
        json!({ "name": "Ada", "email": "ada@example.com" }),
    )
    .await;
    let uri = format!("/api/personnel/{person}/skills");

    let (status, body) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({ "skill_id": skill, "proficiency_level": "Beginner" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["created"], true);

    let (status, body) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({ "skill_id": skill, "proficiency_level": "Expert" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], true);

    let (_, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(body[0]["proficiency_level"], "Expert");
    assert_eq!(body[0]["skill_name"], "Go");
}

#[tokio::test]
async fn missing_rows_are_not_found() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/skills/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Skill not found");

    let (status, _) = send(&app, Method::DELETE, "/api/projects/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/personnel/42",
        Some(json!({ "name": "Nobody" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let app = app();
    create(
        &app,
        "/api/personnel",
        json!({ "name": "Ada", "email": "ada@example.com" }),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/personnel",
        Some(json!({ "name": "Ada Again", "email": "ada@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already exists");
}

#[tokio::test]
async fn invalid_payloads_are_rejected() {
    let app = app();

    let (status, _) = send(&app, Method::POST, "/api/skills", Some(json!({ "category": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/personnel",
        Some(json!({ "name": "Ada", "email": "ada@example.com", "experience_level": "Principal" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/projects",
        Some(json!({ "project_name": "Late", "start_date": "2024-05-01", "end_date": "2024-04-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn partial_update_keeps_unset_fields() {
    let app = app();
    let project = create(
        &app,
        "/api/projects",
        json!({ "project_name": "Apollo", "description": "Moon" }),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/projects/{project}"),
        Some(json!({ "status": "On Hold", "description": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["project_name"], "Apollo");
    assert_eq!(body["description"], "Moon");
    assert_eq!(body["status"], "On Hold");
}

#[tokio::test]
async fn malformed_requests_get_json_errors() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/matching/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string(), "{body}");

    let (status, body) = send(&app, Method::POST, "/api/skills", Some(json!({ "skill_name": 5 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().expect("error").contains("skill_name"));

    let (status, body) = send(
        &app,
        Method::DELETE,
        "/api/personnel/1/skills/not-a-number",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn names_sort_ignoring_case() {
    let app = app();
    let skill = create(&app, "/api/skills", json!({ "skill_name": "Rust" })).await;
    let project = create(&app, "/api/projects", json!({ "project_name": "Apollo", "status": "Active" })).await;
    require(&app, project, skill, "Beginner").await;
    for name in ["Carol", "bob"] {
        let id = create(
            &app,
            "/api/personnel",
            json!({ "name": name, "email": format!("{name}@example.com"), "experience_level": "Senior" }),
        )
        .await;
        assign(&app, id, skill, "Expert").await;
    }

    let (_, body) = send(&app, Method::GET, &format!("/api/matching/{project}"), None).await;
    assert_eq!(names(&body), vec!["bob", "Carol"]);

    let (_, body) = send(&app, Method::GET, "/api/matching/utilization/personnel", None).await;
    assert_eq!(names(&body), vec!["bob", "Carol"]);
}
