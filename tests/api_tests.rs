mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::*;
use sea_orm::{ActiveModelTrait, NotSet, Set};
use serde_json::json;
use stakemarket::entities::projects;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn test_health_check() {
    let (app, _) = offline_app().await;
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Service is healthy"));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (app, _) = offline_app().await;
    let (status, body) = send(&app, "GET", "/api-doc/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/projects/{id}/funding").is_some());
    assert!(body["paths"].get("/staking/estimate").is_some());
}

#[tokio::test]
async fn test_artist_create_get_and_validation() {
    let (app, _) = offline_app().await;
    let id = create_artist(&app).await;

    let (status, body) = send(&app, "GET", &format!("/artists/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Nova Lane");
    assert_eq!(body["total_raised"], 0.0);
    assert_eq!(body["completed_projects"], 0);
    assert_eq!(body["verified"], false);

    let (status, body) = send(&app, "POST", "/artists", Some(json!({ "name": "  ", "genre": "jazz" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("name"));

    let (status, _) = send(
        &app,
        "POST",
        "/artists",
        Some(json!({ "name": "Kim", "genre": "jazz", "wallet_address": "0x1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/artists/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", "/artists", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_project_starts_as_draft() {
    let (app, _) = offline_app().await;
    let artist_id = create_artist(&app).await;
    let project = create_project(&app, artist_id, json!({ "images": ["https://img.test/a.png", " "] })).await;

    assert_eq!(project["status"], "draft");
    assert_eq!(project["current_funding"], 0.0);
    assert_eq!(project["funding_percentage"], 0.0);
    assert_eq!(project["risk_level"], "medium");
    assert_eq!(project["images"], json!(["https://img.test/a.png"]));
}

#[tokio::test]
async fn test_project_creation_validation() {
    let (app, _) = offline_app().await;
    let artist_id = create_artist(&app).await;

    let base = json!({ "artist_id": artist_id, "title": "EP", "category": "music" });

    let mut zero_target = base.clone();
    zero_target["funding_target"] = json!(0.0);
    let (status, _) = send(&app, "POST", "/projects", Some(zero_target)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut bad_contract = base.clone();
    bad_contract["funding_target"] = json!(500.0);
    bad_contract["funding_contract"] = json!("not-an-address");
    let (status, _) = send(&app, "POST", "/projects", Some(bad_contract)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/projects",
        Some(json!({ "artist_id": 4242, "title": "EP", "category": "music", "funding_target": 10.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_lifecycle_and_rejected_transitions() {
    let (app, _) = offline_app().await;
    let artist_id = create_artist(&app).await;
    let project = create_project(&app, artist_id, json!({})).await;
    let uri = format!("/projects/{}/status", project["id"]);

    // Skipping a step is rejected
    let (status, body) = send(&app, "POST", &uri, Some(json!({ "status": "funded" }))).await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);

    for next in ["published", "funded", "completed"] {
        let (status, body) = send(&app, "POST", &uri, Some(json!({ "status": next }))).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["status"], next);
    }

    let (status, body) = send(&app, "POST", &uri, Some(json!({ "status": "draft" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["error"],
        "Invalid status transition: cannot move a project from completed to draft"
    );

    let (status, _) = send(&app, "POST", &uri, Some(json!({ "status": "archived" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Completion is credited to the artist exactly once
    let (_, artist) = send(&app, "GET", &format!("/artists/{}", artist_id), None).await;
    assert_eq!(artist["completed_projects"], 1);
    let (status, _) = send(&app, "POST", &uri, Some(json!({ "status": "completed" }))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, artist) = send(&app, "GET", &format!("/artists/{}", artist_id), None).await;
    assert_eq!(artist["completed_projects"], 1);
}

#[tokio::test]
async fn test_update_project_fields() {
    let (app, _) = offline_app().await;
    let artist_id = create_artist(&app).await;
    let project = create_project(&app, artist_id, json!({})).await;
    let uri = format!("/projects/{}", project["id"]);

    let (status, body) = send(
        &app,
        "PATCH",
        &uri,
        Some(json!({
            "title": "Second Album",
            "funding_target": 50000.0,
            "milestones_completed": 1,
            "status": "published",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["title"], "Second Album");
    assert_eq!(body["funding_target"], 50000.0);
    assert_eq!(body["milestones_completed"], 1);
    assert_eq!(body["status"], "published");

    let (status, _) = send(&app, "PATCH", &uri, Some(json!({ "status": "draft" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, "PATCH", "/projects/777", Some(json!({ "title": "x" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_counts_and_draft_filter_include_missing_status() {
    let (app, state) = offline_app().await;
    let artist_id = create_artist(&app).await;

    let draft = create_project(&app, artist_id, json!({})).await;
    for _ in 0..2 {
        let published = create_project(&app, artist_id, json!({})).await;
        let uri = format!("/projects/{}/status", published["id"]);
        send(&app, "POST", &uri, Some(json!({ "status": "published" }))).await;
    }
    let funded = create_project(&app, artist_id, json!({})).await;
    let uri = format!("/projects/{}/status", funded["id"]);
    send(&app, "POST", &uri, Some(json!({ "status": "published" }))).await;
    send(&app, "POST", &uri, Some(json!({ "status": "funded" }))).await;

    // A legacy row without any status
    let now = Utc::now();
    let legacy = projects::ActiveModel {
        id: NotSet,
        artist_id: Set(artist_id as i32),
        title: Set("Legacy".to_string()),
        description: Set(String::new()),
        category: Set("music".to_string()),
        risk_level: Set("low".to_string()),
        funding_target: Set(1000.0),
        current_funding: Set(0.0),
        milestones_total: Set(0),
        milestones_completed: Set(0),
        images: Set("[]".to_string()),
        status: Set(None),
        funding_contract: Set(None),
        staking_pool_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await
    .unwrap();

    let (status, counts) = send(&app, "GET", "/projects/status-counts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        counts,
        json!({ "draft": 2, "published": 2, "funded": 1, "completed": 0, "total": 5 })
    );

    let (status, drafts) = send(&app, "GET", "/projects?status=draft", None).await;
    assert_eq!(status, StatusCode::OK);
    let mut ids: Vec<i64> = drafts
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![draft["id"].as_i64().unwrap(), i64::from(legacy.id)]);
    assert!(drafts.as_array().unwrap().iter().all(|p| p["status"] == "draft"));

    let (status, _) = send(&app, "GET", "/projects?status=bogus", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, other) = send(&app, "GET", "/projects/status-counts?artist_id=999", None).await;
    assert_eq!(other["total"], 0);
}

#[tokio::test]
async fn test_contributions_update_project_and_artist() {
    let (app, _) = offline_app().await;
    let artist_id = create_artist(&app).await;
    let project = create_project(&app, artist_id, json!({})).await;
    let uri = format!("/projects/{}/contributions", project["id"]);

    let (status, body) = send(&app, "POST", &uri, Some(json!({ "amount": 20000.0 }))).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let (_, body) = send(&app, "POST", &uri, Some(json!({ "amount": 5000.0 }))).await;
    assert_eq!(body["current_funding"], 25000.0);
    assert_eq!(body["funding_percentage"], 25.0);

    let (status, _) = send(&app, "POST", &uri, Some(json!({ "amount": -1.0 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, "POST", "/projects/404/contributions", Some(json!({ "amount": 1.0 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, artist) = send(&app, "GET", &format!("/artists/{}", artist_id), None).await;
    assert_eq!(artist["total_raised"], 25000.0);
}

#[tokio::test]
async fn test_funding_without_chain_counts_recorded_only() {
    let (app, _) = offline_app().await;
    let artist_id = create_artist(&app).await;
    let project = create_project(&app, artist_id, json!({ "funding_contract": FUNDING_CONTRACT })).await;
    let id = project["id"].as_i64().unwrap();
    send(&app, "POST", &format!("/projects/{}/contributions", id), Some(json!({ "amount": 25000.0 }))).await;

    let (status, body) = send(&app, "GET", &format!("/projects/{}/funding", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recorded"], 25000.0);
    assert_eq!(body["onchain"], 0.0);
    assert_eq!(body["percentage"], 25.0);
    assert_eq!(body["onchain_available"], false);
}

#[tokio::test]
async fn test_funding_adds_onchain_balance() {
    let base = spawn_upstream(FakeUpstream::default()).await;
    let (app, _) = app_with(upstream_config(&base)).await;
    let artist_id = create_artist(&app).await;
    let project = create_project(&app, artist_id, json!({ "funding_contract": FUNDING_CONTRACT })).await;
    let id = project["id"].as_i64().unwrap();
    send(&app, "POST", &format!("/projects/{}/contributions", id), Some(json!({ "amount": 25000.0 }))).await;

    let (status, body) = send(&app, "GET", &format!("/projects/{}/funding", id), None).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["onchain"], 5000.0);
    assert_eq!(body["total"], 30000.0);
    assert_eq!(body["percentage"], 30.0);
    assert_eq!(body["display_percentage"], 30.0);
    assert_eq!(body["onchain_available"], true);
}

#[tokio::test]
async fn test_delete_project() {
    let (app, _) = offline_app().await;
    let artist_id = create_artist(&app).await;
    let project = create_project(&app, artist_id, json!({})).await;
    let uri = format!("/projects/{}", project["id"]);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pool_requires_contract_without_receipt() {
    let (app, _) = offline_app().await;
    let artist_id = create_artist(&app).await;
    let project = create_project(&app, artist_id, json!({})).await;

    let (status, _) = send(
        &app,
        "POST",
        "/staking/pools",
        Some(json!({
            "project_id": project["id"],
            "apy": 12.0,
            "lockup_periods": [30, 90],
            "pool_size": 50000.0,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/staking/pools",
        Some(json!({
            "project_id": project["id"],
            "contract_address": DEPLOYED_CONTRACT,
            "apy": 12.0,
            "lockup_periods": [],
            "pool_size": 50000.0,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pool_and_stakes() {
    let (app, _) = offline_app().await;
    let artist_id = create_artist(&app).await;
    let project = create_project(&app, artist_id, json!({})).await;

    let (status, pool) = send(
        &app,
        "POST",
        "/staking/pools",
        Some(json!({
            "project_id": project["id"],
            "contract_address": DEPLOYED_CONTRACT,
            "apy": 12.0,
            "lockup_periods": [365, 30, 90, 30],
            "pool_size": 50000.0,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", pool);
    assert_eq!(pool["lockup_periods"], json!([30, 90, 365]));
    assert_eq!(pool["total_staked"], 0.0);

    let (_, linked) = send(&app, "GET", &format!("/projects/{}", project["id"]), None).await;
    assert_eq!(linked["staking_pool_id"], pool["id"]);

    let stakes_uri = format!("/staking/pools/{}/stakes", pool["id"]);
    let (status, body) = send(
        &app,
        "POST",
        &stakes_uri,
        Some(json!({ "staker_address": STAKER, "amount": 1000.0, "lockup_days": 365 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["pool"]["total_staked"], 1000.0);
    assert_eq!(body["pool"]["stakers_count"], 1);
    assert_eq!(body["estimate"]["tier"], "Premium Backer");
    assert!((body["estimate"]["reward"].as_f64().unwrap() - 120.0).abs() < 1e-9);
    assert!(body.get("receipt").is_none());

    let (_, body) = send(
        &app,
        "POST",
        &stakes_uri,
        Some(json!({ "staker_address": STAKER, "amount": 4000.0, "lockup_days": 30 })),
    )
    .await;
    assert_eq!(body["pool"]["total_staked"], 5000.0);
    assert_eq!(body["pool"]["stakers_count"], 2);
    assert_eq!(body["pool"]["utilization"], 10.0);

    // Lockup not offered by the pool
    let (status, _) = send(
        &app,
        "POST",
        &stakes_uri,
        Some(json!({ "staker_address": STAKER, "amount": 10.0, "lockup_days": 60 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        &stakes_uri,
        Some(json!({ "staker_address": "0xnope", "amount": 10.0, "lockup_days": 30 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/staking/pools/999/stakes",
        Some(json!({ "staker_address": STAKER, "amount": 10.0, "lockup_days": 30 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, pools) = send(&app, "GET", &format!("/staking/pools?project_id={}", project["id"]), None).await;
    assert_eq!(pools.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_stakes_cannot_exceed_pool_size() {
    let (app, _) = offline_app().await;
    let artist_id = create_artist(&app).await;
    let project = create_project(&app, artist_id, json!({})).await;
    let (_, pool) = send(
        &app,
        "POST",
        "/staking/pools",
        Some(json!({
            "project_id": project["id"],
            "contract_address": DEPLOYED_CONTRACT,
            "apy": 10.0,
            "lockup_periods": [30],
            "pool_size": 50000.0,
        })),
    )
    .await;
    let stakes_uri = format!("/staking/pools/{}/stakes", pool["id"]);

    let (status, body) = send(
        &app,
        "POST",
        &stakes_uri,
        Some(json!({ "staker_address": STAKER, "amount": 90000.0, "lockup_days": 30 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", body);

    let (status, _) = send(
        &app,
        "POST",
        &stakes_uri,
        Some(json!({ "staker_address": STAKER, "amount": 40000.0, "lockup_days": 30 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        &stakes_uri,
        Some(json!({ "staker_address": STAKER, "amount": 20000.0, "lockup_days": 30 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Filling the pool exactly is allowed
    let (status, body) = send(
        &app,
        "POST",
        &stakes_uri,
        Some(json!({ "staker_address": STAKER, "amount": 10000.0, "lockup_days": 30 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pool"]["total_staked"], 50000.0);
    assert_eq!(body["pool"]["stakers_count"], 2);
    assert_eq!(body["pool"]["utilization"], 100.0);
}

#[tokio::test]
async fn test_pool_contract_read_from_deployment_receipt() {
    let fake = FakeUpstream {
        pending_polls: 2,
        ..FakeUpstream::default()
    };
    let polls = fake.receipt_polls.clone();
    let base = spawn_upstream(fake).await;
    let (app, _) = app_with(upstream_config(&base)).await;
    let artist_id = create_artist(&app).await;
    let project = create_project(&app, artist_id, json!({})).await;

    let (status, pool) = send(
        &app,
        "POST",
        "/staking/pools",
        Some(json!({
            "project_id": project["id"],
            "apy": 8.0,
            "lockup_periods": [90],
            "pool_size": 1000.0,
            "deployment_tx_hash": TX_HASH,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", pool);
    assert_eq!(pool["contract_address"], DEPLOYED_CONTRACT);
    assert_eq!(pool["deployment_tx_hash"], TX_HASH);
    assert!(polls.load(Ordering::SeqCst) >= 3);
}

#[tokio::test]
async fn test_reverted_stake_is_not_recorded() {
    let base = spawn_upstream(FakeUpstream {
        receipt_status: "0x0",
        ..FakeUpstream::default()
    })
    .await;
    let (app, _) = app_with(upstream_config(&base)).await;
    let artist_id = create_artist(&app).await;
    let project = create_project(&app, artist_id, json!({})).await;
    let (_, pool) = send(
        &app,
        "POST",
        "/staking/pools",
        Some(json!({
            "project_id": project["id"],
            "contract_address": DEPLOYED_CONTRACT,
            "apy": 8.0,
            "lockup_periods": [90],
            "pool_size": 1000.0,
        })),
    )
    .await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/staking/pools/{}/stakes", pool["id"]),
        Some(json!({ "staker_address": STAKER, "amount": 100.0, "lockup_days": 90, "tx_hash": TX_HASH })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, pool) = send(&app, "GET", &format!("/staking/pools/{}", pool["id"]), None).await;
    assert_eq!(pool["total_staked"], 0.0);
    assert_eq!(pool["stakers_count"], 0);
}

#[tokio::test]
async fn test_confirmed_stake_returns_receipt() {
    let base = spawn_upstream(FakeUpstream::default()).await;
    let (app, _) = app_with(upstream_config(&base)).await;
    let artist_id = create_artist(&app).await;
    let project = create_project(&app, artist_id, json!({})).await;
    let (_, pool) = send(
        &app,
        "POST",
        "/staking/pools",
        Some(json!({
            "project_id": project["id"],
            "contract_address": DEPLOYED_CONTRACT,
            "apy": 8.0,
            "lockup_periods": [90],
            "pool_size": 1000.0,
        })),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/staking/pools/{}/stakes", pool["id"]),
        Some(json!({ "staker_address": STAKER, "amount": 100.0, "lockup_days": 90, "tx_hash": TX_HASH })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["receipt"]["transactionHash"], TX_HASH);
    assert_eq!(body["pool"]["total_staked"], 100.0);
}

#[tokio::test]
async fn test_estimate_and_tiers() {
    let (app, _) = offline_app().await;

    let (status, body) = send(&app, "GET", "/staking/estimate?principal=1000&apy=12&lockup_days=365", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!((body["reward"].as_f64().unwrap() - 120.0).abs() < 1e-9);
    assert_eq!(body["tier"], "Premium Backer");
    assert_eq!(body["royalty_share"], 1.2);

    let (_, body) = send(&app, "GET", "/staking/estimate?principal=0&apy=12&lockup_days=365", None).await;
    assert_eq!(body["reward"], 0.0);
    assert!(body["tier"].is_null());

    let (status, _) = send(&app, "GET", "/staking/estimate?principal=-5&apy=12&lockup_days=30", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, tiers) = send(&app, "GET", "/staking/tiers", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = tiers
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Basic Supporter", "Premium Backer", "VIP Investor"]);
}

fn patent_request(artist_id: i64, register: bool) -> serde_json::Value {
    json!({
        "artist_id": artist_id,
        "title": "Looping synth circuit",
        "description": "Analog feedback loop",
        "patent_number": "US-1234567",
        "filing_date": "2024-03-01",
        "register_ip_asset": register,
    })
}

#[tokio::test]
async fn test_patent_without_registration() {
    let (app, _) = offline_app().await;
    let artist_id = create_artist(&app).await;

    let (status, patent) = send(&app, "POST", "/patents", Some(patent_request(artist_id, false))).await;
    assert_eq!(status, StatusCode::CREATED, "{}", patent);
    assert_eq!(patent["status"], "Pending");
    assert!(patent["ip_asset_id"].is_null());
    assert!(patent["metadata_uri"].is_null());

    let uri = format!("/patents/{}", patent["id"]);
    let (status, updated) = send(&app, "PATCH", &uri, Some(json!({ "status": "granted" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "Granted");
    assert_eq!(updated["description"], "Analog feedback loop");

    let (_, updated) = send(&app, "PATCH", &uri, Some(json!({ "description": "   " }))).await;
    assert!(updated["description"].is_null());
    let (_, updated) = send(&app, "PATCH", &uri, Some(json!({ "description": " Digital loop " }))).await;
    assert_eq!(updated["description"], "Digital loop");

    let (_, listed) = send(&app, "GET", "/patents?status=Granted", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    let (status, _) = send(&app, "GET", "/patents?status=lapsed", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patent_registration_unconfigured() {
    let (app, _) = offline_app().await;
    let artist_id = create_artist(&app).await;

    let (status, _) = send(&app, "POST", "/patents", Some(patent_request(artist_id, true))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (_, listed) = send(&app, "GET", "/patents", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_patent_registered_as_ip_asset() {
    let fake = FakeUpstream::default();
    let pins = fake.pins.clone();
    let base = spawn_upstream(fake).await;
    let (app, _) = app_with(upstream_config(&base)).await;
    let artist_id = create_artist(&app).await;

    let (status, patent) = send(&app, "POST", "/patents", Some(patent_request(artist_id, true))).await;
    assert_eq!(status, StatusCode::CREATED, "{}", patent);
    assert_eq!(patent["ip_asset_id"], IP_ASSET_ID);
    assert_eq!(patent["ip_asset_contract"], IP_ASSET_CONTRACT);
    assert_eq!(patent["ip_chain_id"], 1315);
    assert_eq!(patent["metadata_uri"], format!("https://gateway.test/ipfs/{}", PINNED_CID));
    assert_eq!(pins.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_patent_registry_failure_stores_nothing() {
    let fake = FakeUpstream {
        fail_registry: true,
        ..FakeUpstream::default()
    };
    let registrations = fake.registrations.clone();
    let base = spawn_upstream(fake).await;
    let (app, _) = app_with(upstream_config(&base)).await;
    let artist_id = create_artist(&app).await;

    let (status, _) = send(&app, "POST", "/patents", Some(patent_request(artist_id, true))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(registrations.load(Ordering::SeqCst), 1);

    let (_, listed) = send(&app, "GET", "/patents", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_patent_project_must_belong_to_artist() {
    let (app, _) = offline_app().await;
    let owner = create_artist(&app).await;
    let other = create_artist(&app).await;
    let project = create_project(&app, owner, json!({})).await;

    let mut request = patent_request(other, false);
    request["project_id"] = project["id"].clone();
    let (status, _) = send(&app, "POST", "/patents", Some(request)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut request = patent_request(404, false);
    request["project_id"] = json!(null);
    let (status, _) = send(&app, "POST", "/patents", Some(request)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
