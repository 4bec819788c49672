//! Placement derivation and the idempotent bulk recompute.

mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use backend::entities::match_players;
use backend::repos::{games, players};
use backend::routes;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set};
use serde_json::json;

use common::{open_shared, rpc_request, seed_user, test_state};

async fn seed_game(
    shared: &backend::db::txn::SharedTxn,
    owner_id: i64,
    is_coop: bool,
) -> games::Game {
    games::create_game(
        shared.transaction(),
        games::GameCreate {
            created_by: owner_id,
            name: "Scored Game".to_string(),
            min_players: 2,
            max_players: 5,
            playtime_min: None,
            is_coop,
            year_published: None,
        },
    )
    .await
    .expect("seed game")
}

async fn seed_player(
    shared: &backend::db::txn::SharedTxn,
    owner_id: i64,
    name: &str,
) -> players::Player {
    players::create_player(
        shared.transaction(),
        players::PlayerCreate {
            created_by: owner_id,
            name: name.to_string(),
            linked_user_id: None,
        },
    )
    .await
    .expect("seed player")
}

#[tokio::test]
async fn placements_derive_from_scores_with_shared_ties() {
    let state = test_state().await;
    let shared = open_shared(&state).await;
    let alice = seed_user(&shared, "alice").await;
    let game = seed_game(&shared, alice.id, false).await;
    let p1 = seed_player(&shared, alice.id, "P1").await;
    let p2 = seed_player(&shared, alice.id, "P2").await;
    let p3 = seed_player(&shared, alice.id, "P3").await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/rpc").configure(routes::rpc::configure_routes)),
    )
    .await;

    let req = rpc_request(
        "match.create",
        json!({
            "game": {"type": "original", "id": game.id},
            "players": [
                {"playerId": p1.id, "score": 50},
                {"playerId": p2.id, "score": 50},
                {"playerId": p3.id, "score": 40}
            ]
        }),
        &shared,
        &alice.sub,
    );
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created: serde_json::Value = test::read_body_json(resp).await;
    let match_id = created["id"].as_i64().unwrap();

    let req = rpc_request("match.get", json!({"id": match_id}), &shared, &alice.sub);
    let resp = test::call_service(&app, req).await;
    let detail: serde_json::Value = test::read_body_json(resp).await;
    let rows = detail["players"].as_array().unwrap();

    assert_eq!(rows[0]["placement"], 1);
    assert_eq!(rows[1]["placement"], 1);
    assert_eq!(rows[2]["placement"], 3);
    assert_eq!(rows[0]["isWinner"], true);
    assert_eq!(rows[1]["isWinner"], true);
    assert_eq!(rows[2]["isWinner"], false);
}

#[tokio::test]
async fn bulk_recompute_repairs_rows_and_is_idempotent() {
    let state = test_state().await;
    let shared = open_shared(&state).await;
    let alice = seed_user(&shared, "alice").await;
    let game = seed_game(&shared, alice.id, false).await;
    let p1 = seed_player(&shared, alice.id, "P1").await;
    let p2 = seed_player(&shared, alice.id, "P2").await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/rpc").configure(routes::rpc::configure_routes)),
    )
    .await;

    let req = rpc_request(
        "match.create",
        json!({
            "game": {"type": "original", "id": game.id},
            "players": [
                {"playerId": p1.id, "score": 12},
                {"playerId": p2.id, "score": 30}
            ]
        }),
        &shared,
        &alice.sub,
    );
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created: serde_json::Value = test::read_body_json(resp).await;
    let match_id = created["id"].as_i64().unwrap();

    // Corrupt one row behind the procedure layer's back
    let row = match_players::Entity::find()
        .filter(match_players::Column::MatchId.eq(match_id))
        .one(shared.transaction())
        .await
        .unwrap()
        .unwrap();
    let mut active = row.into_active_model();
    active.placement = Set(Some(99));
    active.is_winner = Set(true);
    active.update(shared.transaction()).await.unwrap();

    // First recompute repairs the damage
    let req = rpc_request(
        "match.updateAllPlacements",
        json!({"type": "original", "id": game.id}),
        &shared,
        &alice.sub,
    );
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let result: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(result["matchesSeen"], 1);
    assert!(result["rowsChanged"].as_u64().unwrap() >= 1);

    // Second recompute finds nothing to do
    let req = rpc_request(
        "match.updateAllPlacements",
        json!({"type": "original", "id": game.id}),
        &shared,
        &alice.sub,
    );
    let resp = test::call_service(&app, req).await;
    let result: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(result["matchesSeen"], 1);
    assert_eq!(
        result["rowsChanged"], 0,
        "recompute on unchanged data must be a no-op"
    );

    // And the rows agree with the score order again
    let req = rpc_request("match.get", json!({"id": match_id}), &shared, &alice.sub);
    let resp = test::call_service(&app, req).await;
    let detail: serde_json::Value = test::read_body_json(resp).await;
    let rows = detail["players"].as_array().unwrap();
    assert_eq!(rows[0]["placement"], 2);
    assert_eq!(rows[0]["isWinner"], false);
    assert_eq!(rows[1]["placement"], 1);
    assert_eq!(rows[1]["isWinner"], true);
}

#[tokio::test]
async fn unfinished_matches_are_skipped_by_the_recompute() {
    let state = test_state().await;
    let shared = open_shared(&state).await;
    let alice = seed_user(&shared, "alice").await;
    let game = seed_game(&shared, alice.id, false).await;
    let p1 = seed_player(&shared, alice.id, "P1").await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/rpc").configure(routes::rpc::configure_routes)),
    )
    .await;

    let req = rpc_request(
        "match.create",
        json!({
            "game": {"type": "original", "id": game.id},
            "finished": false,
            "players": [{"playerId": p1.id, "score": 7}]
        }),
        &shared,
        &alice.sub,
    );
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = rpc_request(
        "match.updateAllPlacements",
        json!({"type": "original", "id": game.id}),
        &shared,
        &alice.sub,
    );
    let resp = test::call_service(&app, req).await;
    let result: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(result["matchesSeen"], 0);
    assert_eq!(result["rowsChanged"], 0);
}

#[tokio::test]
async fn coop_games_keep_explicit_winners_and_no_placements() {
    let state = test_state().await;
    let shared = open_shared(&state).await;
    let alice = seed_user(&shared, "alice").await;
    let game = seed_game(&shared, alice.id, true).await;
    let p1 = seed_player(&shared, alice.id, "P1").await;
    let p2 = seed_player(&shared, alice.id, "P2").await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/rpc").configure(routes::rpc::configure_routes)),
    )
    .await;

    let req = rpc_request(
        "match.create",
        json!({
            "game": {"type": "original", "id": game.id},
            "players": [
                {"playerId": p1.id, "score": 40, "isWinner": true},
                {"playerId": p2.id, "score": 40, "isWinner": true}
            ]
        }),
        &shared,
        &alice.sub,
    );
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created: serde_json::Value = test::read_body_json(resp).await;
    let match_id = created["id"].as_i64().unwrap();

    // Recompute must not manufacture placements or clobber the flags
    let req = rpc_request(
        "match.updateAllPlacements",
        json!({"type": "original", "id": game.id}),
        &shared,
        &alice.sub,
    );
    let resp = test::call_service(&app, req).await;
    let result: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(result["rowsChanged"], 0);

    let req = rpc_request("match.get", json!({"id": match_id}), &shared, &alice.sub);
    let resp = test::call_service(&app, req).await;
    let detail: serde_json::Value = test::read_body_json(resp).await;
    for row in detail["players"].as_array().unwrap() {
        assert!(row["placement"].is_null());
        assert_eq!(row["isWinner"], true);
    }
}
