//! Route tests for the private mood and exercise journals.

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::{json, Value};

async fn create_mood(app: &TestApp, token: &str, body: Value) -> Value {
    let (status, json) = app.post("/mood", Some(token), body).await;
    assert_eq!(status, StatusCode::CREATED, "{}", json);
    json["mood"].clone()
}

// ============================================================================
// Auth Guard
// ============================================================================

#[tokio::test]
async fn test_protected_routes_require_a_token() {
    let app = TestApp::new();

    let (status, body) = app.get("/mood", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = app.get("/exercise/stats/summary", Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post("/exercise", None, json!({ "exerciseType": "yoga", "duration": 30, "intensity": "low" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_empty_identity_is_rejected() {
    let app = TestApp::new();
    let token = app.token("   ");
    let (status, _) = app.get("/mood", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Mood CRUD
// ============================================================================

#[tokio::test]
async fn test_create_mood_ignores_body_owner() {
    let app = TestApp::new();
    let token = app.token("alice");

    let (status, body) = app
        .post(
            "/mood",
            Some(&token),
            json!({
                "moodLevel": 7,
                "moodType": "happy",
                "userId": "mallory",
                "activities": ["exercise", "social"],
                "sleepHours": 7.5,
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["message"].is_string());
    assert_eq!(body["mood"]["userId"], "alice");
    assert_eq!(body["mood"]["moodLevel"], 7);
    assert_eq!(body["mood"]["activities"], json!(["exercise", "social"]));
    assert_eq!(body["mood"]["tags"], json!([]));
}

#[tokio::test]
async fn test_create_mood_reports_field_violations() {
    let app = TestApp::new();
    let token = app.token("alice");

    let (status, body) = app
        .post(
            "/mood",
            Some(&token),
            json!({ "moodLevel": 11, "moodType": "calm", "stressLevel": 0 }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"moodLevel"));
    assert!(fields.contains(&"stressLevel"));

    let (_, list) = app.get("/mood", Some(&token)).await;
    assert_eq!(list["total"], 0);
}

#[tokio::test]
async fn test_unknown_enum_and_missing_fields_are_bad_requests() {
    let app = TestApp::new();
    let token = app.token("alice");

    let (status, _) = app
        .post("/mood", Some(&token), json!({ "moodLevel": 5, "moodType": "elated" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.post("/mood", Some(&token), json!({ "moodType": "calm" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.get("/mood?moodType=elated", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pagination_envelope() {
    let app = TestApp::new();
    let token = app.token("alice");
    for day in 1..=25 {
        create_mood(
            &app,
            &token,
            json!({ "moodLevel": 5, "moodType": "calm", "date": format!("2024-01-{:02}", day) }),
        )
        .await;
    }

    let (status, body) = app.get("/mood?page=3&limit=10", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 5);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["currentPage"], 3);
    assert_eq!(body["total"], 25);
    // newest first: the last page holds the oldest days
    assert!(body["items"][4]["date"]
        .as_str()
        .unwrap()
        .starts_with("2024-01-01"));

    let (_, first) = app.get("/mood", Some(&token)).await;
    assert_eq!(first["items"].as_array().unwrap().len(), 10);
    assert!(first["items"][0]["date"]
        .as_str()
        .unwrap()
        .starts_with("2024-01-25"));

    let (status, _) = app.get("/mood?limit=0", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app.get("/mood?page=0", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unreachable_page_is_a_bad_request() {
    let app = TestApp::new();
    let token = app.token("alice");

    let (status, body) = app
        .get("/mood?page=9223372036854775807", Some(&token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = app
        .get("/exercise?page=9223372036854775807&limit=100", Some(&token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_date_range_filter_is_inclusive() {
    let app = TestApp::new();
    let token = app.token("alice");
    for date in ["2024-03-01", "2024-03-02T22:15:00Z", "2024-03-05"] {
        create_mood(&app, &token, json!({ "moodLevel": 4, "moodType": "tired", "date": date })).await;
    }

    let (_, body) = app
        .get("/mood?startDate=2024-03-01&endDate=2024-03-02", Some(&token))
        .await;
    assert_eq!(body["total"], 2);

    let (_, body) = app.get("/mood?startDate=2024-03-02", Some(&token)).await;
    assert_eq!(body["total"], 2);

    let (status, _) = app.get("/mood?startDate=soon", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_entries_are_invisible_to_other_users() {
    let app = TestApp::new();
    let alice = app.token("alice");
    let bob = app.token("bob");
    let mood = create_mood(&app, &alice, json!({ "moodLevel": 6, "moodType": "calm" })).await;
    let uri = format!("/mood/{}", mood["id"].as_str().unwrap());

    let (status, _) = app.get(&uri, Some(&bob)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.put(&uri, Some(&bob), json!({ "moodLevel": 1 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.delete(&uri, Some(&bob)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, bobs) = app.get("/mood", Some(&bob)).await;
    assert_eq!(bobs["total"], 0);

    let (status, body) = app.get(&uri, Some(&alice)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["moodLevel"], 6);
}

#[tokio::test]
async fn test_malformed_id_is_not_found() {
    let app = TestApp::new();
    let token = app.token("alice");
    let (status, body) = app.get("/mood/not-a-uuid", Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_update_merges_and_revalidates() {
    let app = TestApp::new();
    let token = app.token("alice");
    let mood = create_mood(
        &app,
        &token,
        json!({ "moodLevel": 3, "moodType": "sad", "notes": "rough day" }),
    )
    .await;
    let uri = format!("/mood/{}", mood["id"].as_str().unwrap());

    let (status, body) = app
        .put(&uri, Some(&token), json!({ "moodLevel": 8, "userId": "bob" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mood"]["moodLevel"], 8);
    assert_eq!(body["mood"]["moodType"], "sad");
    assert_eq!(body["mood"]["notes"], "rough day");
    assert_eq!(body["mood"]["userId"], "alice");

    let (status, _) = app.put(&uri, Some(&token), json!({ "sleepHours": 30 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, stored) = app.get(&uri, Some(&token)).await;
    assert_eq!(stored["moodLevel"], 8);
    assert!(stored["sleepHours"].is_null());
}

#[tokio::test]
async fn test_delete_then_lookup() {
    let app = TestApp::new();
    let token = app.token("alice");
    let mood = create_mood(&app, &token, json!({ "moodLevel": 5, "moodType": "other" })).await;
    let uri = format!("/mood/{}", mood["id"].as_str().unwrap());

    let (status, body) = app.delete(&uri, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, _) = app.get(&uri, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.delete(&uri, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Mood statistics
// ============================================================================

#[tokio::test]
async fn test_summary_of_nothing_is_zero() {
    let app = TestApp::new();
    let token = app.token("alice");

    let (status, body) = app.get("/mood/stats/summary", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["totalEntries"], 0);
    assert_eq!(body["summary"]["averageMood"].as_f64(), Some(0.0));
    assert_eq!(body["summary"]["averageSleep"].as_f64(), Some(0.0));
    assert_eq!(body["moodTypeStats"], json!([]));

    let (status, body) = app.get("/exercise/stats/summary", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["totalSessions"], 0);
    assert_eq!(body["summary"]["averageDuration"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn test_mood_summary_skips_missing_values() {
    let app = TestApp::new();
    let token = app.token("alice");
    create_mood(&app, &token, json!({ "moodLevel": 4, "moodType": "calm", "stressLevel": 6 })).await;
    create_mood(&app, &token, json!({ "moodLevel": 8, "moodType": "calm" })).await;
    create_mood(&app, &token, json!({ "moodLevel": 6, "moodType": "happy", "stressLevel": 2 })).await;
    create_mood(&app, &app.token("bob"), json!({ "moodLevel": 1, "moodType": "sad" })).await;

    let (_, body) = app.get("/mood/stats/summary", Some(&token)).await;
    let summary = &body["summary"];
    assert_eq!(summary["totalEntries"], 3);
    assert_eq!(summary["averageMood"].as_f64(), Some(6.0));
    assert_eq!(summary["averageStress"].as_f64(), Some(4.0));
    assert_eq!(summary["averageEnergy"].as_f64(), Some(0.0));
    assert_eq!(summary["moodTypes"], json!(["happy", "calm"]));

    assert_eq!(
        body["moodTypeStats"],
        json!([
            { "moodType": "calm", "count": 2 },
            { "moodType": "happy", "count": 1 },
        ])
    );
}

#[tokio::test]
async fn test_mood_trends_by_day_and_month() {
    let app = TestApp::new();
    let token = app.token("alice");
    for (date, level) in [("2024-01-10", 2), ("2024-01-10T18:00:00Z", 4), ("2024-02-03", 9)] {
        create_mood(&app, &token, json!({ "moodLevel": level, "moodType": "calm", "date": date }))
            .await;
    }

    let (_, daily) = app.get("/mood/stats/trends?period=daily", Some(&token)).await;
    let daily = daily.as_array().unwrap();
    assert_eq!(daily.len(), 2);
    assert_eq!(daily[0]["period"], "2024-01-10");
    assert_eq!(daily[0]["totalEntries"], 2);
    assert_eq!(daily[0]["averageMood"].as_f64(), Some(3.0));
    assert_eq!(daily[1]["period"], "2024-02-03");

    let (_, monthly) = app.get("/mood/stats/trends?period=monthly", Some(&token)).await;
    let periods: Vec<&Value> = monthly.as_array().unwrap().iter().map(|t| &t["period"]).collect();
    assert_eq!(periods, vec![&json!(1), &json!(2)]);

    // unrecognised periods fall back to daily buckets
    let (_, fallback) = app.get("/mood/stats/trends?period=hourly", Some(&token)).await;
    assert_eq!(fallback.as_array().unwrap()[0]["period"], "2024-01-10");

    // weekly is the default; 2024-01-10 is in ISO week 2
    let (_, weekly) = app.get("/mood/stats/trends", Some(&token)).await;
    assert_eq!(weekly.as_array().unwrap()[0]["period"], 2);
}

// ============================================================================
// Exercise
// ============================================================================

#[tokio::test]
async fn test_exercise_lifecycle_and_summary() {
    let app = TestApp::new();
    let token = app.token("alice");

    let (status, body) = app
        .post(
            "/exercise",
            Some(&token),
            json!({
                "exerciseType": "running",
                "duration": 30,
                "intensity": "high",
                "caloriesBurned": 300,
                "moodBefore": 4,
                "moodAfter": 7,
                "distance": 5.0,
                "steps": 6000,
                "heartRate": { "average": 150, "max": 182 },
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["exercise"]["heartRate"]["max"], 182);
    let id = body["exercise"]["id"].as_str().unwrap().to_string();

    app.post(
        "/exercise",
        Some(&token),
        json!({ "exerciseType": "yoga", "duration": 60, "intensity": "low", "moodBefore": 5, "moodAfter": 6 }),
    )
    .await;
    app.post(
        "/exercise",
        Some(&token),
        json!({ "exerciseType": "running", "duration": 20, "intensity": "moderate" }),
    )
    .await;

    let (_, body) = app.get("/exercise/stats/summary", Some(&token)).await;
    let summary = &body["summary"];
    assert_eq!(summary["totalSessions"], 3);
    assert_eq!(summary["totalDuration"], 110);
    assert_eq!(summary["totalSteps"], 6000);
    assert_eq!(summary["averageMoodBefore"].as_f64(), Some(4.5));
    assert_eq!(summary["averageMoodAfter"].as_f64(), Some(6.5));

    let stats = body["exerciseTypeStats"].as_array().unwrap();
    assert_eq!(stats[0]["exerciseType"], "running");
    assert_eq!(stats[0]["count"], 2);
    assert_eq!(stats[0]["totalDuration"], 50);
    assert_eq!(stats[0]["averageMoodImprovement"].as_f64(), Some(3.0));

    let (_, filtered) = app.get("/exercise?exerciseType=yoga", Some(&token)).await;
    assert_eq!(filtered["total"], 1);

    let uri = format!("/exercise/{}", id);
    let (status, body) = app.put(&uri, Some(&token), json!({ "duration": 0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "duration");

    let (status, _) = app.delete(&uri, Some(&app.token("bob"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.delete(&uri, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_huge_step_counts_do_not_break_the_summary() {
    let app = TestApp::new();
    let token = app.token("alice");
    for _ in 0..2 {
        let (status, _) = app
            .post(
                "/exercise",
                Some(&token),
                json!({
                    "exerciseType": "walking",
                    "duration": 2147483647,
                    "intensity": "low",
                    "steps": 9223372036854775807i64,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app.get("/exercise/stats/summary", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["totalSteps"], json!(i64::MAX));
    assert_eq!(body["summary"]["totalDuration"], json!(2 * i64::from(i32::MAX)));

    let (status, _) = app.get("/exercise/stats/trends?period=daily", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_nested_heart_rate_violation() {
    let app = TestApp::new();
    let token = app.token("alice");
    let (status, body) = app
        .post(
            "/exercise",
            Some(&token),
            json!({ "exerciseType": "cycling", "duration": 45, "intensity": "high", "heartRate": { "average": -5 } }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "heartRate.average");
}

#[tokio::test]
async fn test_recommendations_follow_rule_order() {
    let app = TestApp::new();
    let token = app.token("alice");

    let (status, body) = app
        .get(
            "/exercise/recommendations?moodLevel=2&energyLevel=9&stressLevel=8",
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let kinds: Vec<&str> = body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["cardio", "high-intensity", "mind-body"]);
    assert_eq!(body["recommendations"][0]["suggestions"].as_array().unwrap().len(), 4);

    let (_, body) = app
        .get("/exercise/recommendations?moodLevel=6&energyLevel=5&stressLevel=3", Some(&token))
        .await;
    assert_eq!(body["recommendations"], json!([]));

    let (status, _) = app.get("/exercise/recommendations", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
