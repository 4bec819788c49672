//! Player statistics aggregation.

mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use backend::repos::{games, players};
use backend::routes;
use serde_json::json;

use common::{open_shared, rpc_request, seed_user, test_state};

#[tokio::test]
async fn stats_aggregate_across_finished_matches() {
    let state = test_state().await;
    let shared = open_shared(&state).await;
    let alice = seed_user(&shared, "alice").await;

    let game = games::create_game(
        shared.transaction(),
        games::GameCreate {
            created_by: alice.id,
            name: "Tracked Game".to_string(),
            min_players: 2,
            max_players: 4,
            playtime_min: None,
            is_coop: false,
            year_published: None,
        },
    )
    .await
    .unwrap();

    let ann = players::create_player(
        shared.transaction(),
        players::PlayerCreate {
            created_by: alice.id,
            name: "Ann".to_string(),
            linked_user_id: None,
        },
    )
    .await
    .unwrap();
    let ben = players::create_player(
        shared.transaction(),
        players::PlayerCreate {
            created_by: alice.id,
            name: "Ben".to_string(),
            linked_user_id: None,
        },
    )
    .await
    .unwrap();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/rpc").configure(routes::rpc::configure_routes)),
    )
    .await;

    // Ben wins the first match, Ann the second
    for (ann_score, ben_score) in [(10, 20), (30, 5)] {
        let req = rpc_request(
            "match.create",
            json!({
                "game": {"type": "original", "id": game.id},
                "players": [
                    {"playerId": ann.id, "score": ann_score},
                    {"playerId": ben.id, "score": ben_score}
                ]
            }),
            &shared,
            &alice.sub,
        );
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    // An unfinished match must not count
    let req = rpc_request(
        "match.create",
        json!({
            "game": {"type": "original", "id": game.id},
            "finished": false,
            "players": [{"playerId": ann.id, "score": 99}]
        }),
        &shared,
        &alice.sub,
    );
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = rpc_request(
        "game.getPlayerStats",
        json!({"type": "original", "id": game.id}),
        &shared,
        &alice.sub,
    );
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let stats: serde_json::Value = test::read_body_json(resp).await;

    assert_eq!(stats["matchCount"], 2);
    let rows = stats["players"].as_array().unwrap();
    assert_eq!(rows.len(), 2);

    let row_for = |name: &str| {
        rows.iter()
            .find(|r| r["playerName"] == name)
            .unwrap_or_else(|| panic!("no stats row for {name}"))
    };

    let ann_row = row_for("Ann");
    assert_eq!(ann_row["plays"], 2);
    assert_eq!(ann_row["wins"], 1);
    assert_eq!(ann_row["bestScore"], 30);
    assert_eq!(ann_row["totalScore"], 40);
    assert_eq!(ann_row["avgPlacement"], 1.5);

    let ben_row = row_for("Ben");
    assert_eq!(ben_row["plays"], 2);
    assert_eq!(ben_row["wins"], 1);
    assert_eq!(ben_row["bestScore"], 20);
    assert_eq!(ben_row["totalScore"], 25);
    assert_eq!(ben_row["avgPlacement"], 1.5);
}

#[tokio::test]
async fn stats_for_unknown_reference_is_a_null_sentinel() {
    let state = test_state().await;
    let shared = open_shared(&state).await;
    let alice = seed_user(&shared, "alice").await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/rpc").configure(routes::rpc::configure_routes)),
    )
    .await;

    let req = rpc_request(
        "game.getPlayerStats",
        json!({"type": "original", "id": 424_242}),
        &shared,
        &alice.sub,
    );
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body.is_null(), "absent game reports null, not an error");
}

#[tokio::test]
async fn players_for_game_lists_distinct_participants() {
    let state = test_state().await;
    let shared = open_shared(&state).await;
    let alice = seed_user(&shared, "alice").await;

    let game = games::create_game(
        shared.transaction(),
        games::GameCreate {
            created_by: alice.id,
            name: "Busy Game".to_string(),
            min_players: 1,
            max_players: 4,
            playtime_min: None,
            is_coop: false,
            year_published: None,
        },
    )
    .await
    .unwrap();
    let ann = players::create_player(
        shared.transaction(),
        players::PlayerCreate {
            created_by: alice.id,
            name: "Ann".to_string(),
            linked_user_id: None,
        },
    )
    .await
    .unwrap();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/rpc").configure(routes::rpc::configure_routes)),
    )
    .await;

    // Ann appears in two matches but must list once
    for score in [5, 9] {
        let req = rpc_request(
            "match.create",
            json!({
                "game": {"type": "original", "id": game.id},
                "players": [{"playerId": ann.id, "score": score}]
            }),
            &shared,
            &alice.sub,
        );
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = rpc_request(
        "player.getForGame",
        json!({"type": "original", "id": game.id}),
        &shared,
        &alice.sub,
    );
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["name"], "Ann");
}
