//! Insert round-trips: create through the RPC surface, re-fetch by the
//! returned reference, and confirm the user-supplied fields survive intact.

mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use backend::routes;
use serde_json::json;

use common::{open_shared, rpc_request, seed_user, test_state};

#[tokio::test]
async fn game_create_then_get_round_trips_user_fields() {
    let state = test_state().await;
    let shared = open_shared(&state).await;
    let alice = seed_user(&shared, "alice").await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/rpc").configure(routes::rpc::configure_routes)),
    )
    .await;

    let payload = json!({
        "name": "Brass: Birmingham",
        "minPlayers": 2,
        "maxPlayers": 4,
        "playtimeMin": 120,
        "isCoop": false,
        "yearPublished": 2018
    });

    let req = rpc_request("game.create", payload.clone(), &shared, &alice.sub);
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created: serde_json::Value = test::read_body_json(resp).await;

    let id = created["ref"]["id"].as_i64().expect("server-assigned id");
    assert!(id > 0);
    assert_eq!(created["ref"]["type"], "original");

    let req = rpc_request(
        "game.get",
        json!({"type": "original", "id": id}),
        &shared,
        &alice.sub,
    );
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: serde_json::Value = test::read_body_json(resp).await;

    for field in ["name", "minPlayers", "maxPlayers", "playtimeMin", "isCoop", "yearPublished"] {
        assert_eq!(
            fetched[field], payload[field],
            "field {field} must round-trip unchanged"
        );
    }
}

#[tokio::test]
async fn player_create_then_list_round_trips() {
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
        "player.create",
        json!({"name": "Greta"}),
        &shared,
        &alice.sub,
    );
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(created["name"], "Greta");
    assert_eq!(created["ref"]["type"], "original");

    let req = rpc_request("player.list", json!({}), &shared, &alice.sub);
    let resp = test::call_service(&app, req).await;
    let listed: serde_json::Value = test::read_body_json(resp).await;
    let rows = listed.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Greta");
    assert_eq!(rows[0]["ref"], created["ref"]);
}

#[tokio::test]
async fn match_create_then_get_round_trips() {
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
        "game.create",
        json!({"name": "Azul", "minPlayers": 2, "maxPlayers": 4}),
        &shared,
        &alice.sub,
    );
    let game: serde_json::Value = test::read_body_json(test::call_service(&app, req).await).await;
    let game_id = game["ref"]["id"].as_i64().unwrap();

    let req = rpc_request(
        "player.create",
        json!({"name": "Hal"}),
        &shared,
        &alice.sub,
    );
    let player: serde_json::Value =
        test::read_body_json(test::call_service(&app, req).await).await;
    let player_id = player["ref"]["id"].as_i64().unwrap();

    let req = rpc_request(
        "match.create",
        json!({
            "game": {"type": "original", "id": game_id},
            "name": "Friday night",
            "durationSec": 3600,
            "comment": "close one",
            "players": [{"playerId": player_id, "score": 55}]
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

    assert_eq!(detail["name"], "Friday night");
    assert_eq!(detail["durationSec"], 3600);
    assert_eq!(detail["comment"], "close one");
    assert_eq!(detail["finished"], true);
    assert_eq!(detail["game"], json!({"type": "original", "id": game_id}));
    assert_eq!(detail["players"][0]["playerName"], "Hal");
    assert_eq!(detail["players"][0]["score"], 55);
}

#[tokio::test]
async fn scoresheet_default_demotes_previous_default() {
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
        "game.create",
        json!({"name": "Root", "minPlayers": 2, "maxPlayers": 4}),
        &shared,
        &alice.sub,
    );
    let game: serde_json::Value = test::read_body_json(test::call_service(&app, req).await).await;
    let game_id = game["ref"]["id"].as_i64().unwrap();
    let game_ref = json!({"type": "original", "id": game_id});

    for name in ["First Sheet", "Second Sheet"] {
        let req = rpc_request(
            "scoresheet.create",
            json!({
                "game": game_ref,
                "name": name,
                "scoringKind": "AGGREGATE",
                "isDefault": true
            }),
            &shared,
            &alice.sub,
        );
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = rpc_request("game.getScoresheets", game_ref.clone(), &shared, &alice.sub);
    let resp = test::call_service(&app, req).await;
    let sheets: serde_json::Value = test::read_body_json(resp).await;
    let rows = sheets.as_array().unwrap();
    assert_eq!(rows.len(), 2);

    let defaults: Vec<&serde_json::Value> = rows
        .iter()
        .filter(|r| r["isDefault"] == true)
        .collect();
    assert_eq!(defaults.len(), 1, "only one default per game");
    assert_eq!(defaults[0]["name"], "Second Sheet");
}
