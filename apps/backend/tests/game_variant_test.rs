//! Original/shared dispatch behavior: distinct routing, scope authorization,
//! and the forbidden-vs-not-found split.

mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use backend::entities::game_shares::SharePermission;
use backend::repos::{games, players, shares};
use backend::routes;
use serde_json::json;

use common::{assert_problem, open_shared, rpc_request, seed_user, test_state};

async fn seed_game(
    shared: &backend::db::txn::SharedTxn,
    owner_id: i64,
    name: &str,
) -> games::Game {
    games::create_game(
        shared.transaction(),
        games::GameCreate {
            created_by: owner_id,
            name: name.to_string(),
            min_players: 2,
            max_players: 4,
            playtime_min: Some(60),
            is_coop: false,
            year_published: Some(2019),
        },
    )
    .await
    .expect("seed game")
}

#[tokio::test]
async fn original_and_shared_refs_resolve_distinct_rows() {
    let state = test_state().await;
    let shared = open_shared(&state).await;
    let alice = seed_user(&shared, "alice").await;
    let bob = seed_user(&shared, "bob").await;

    let alices_game = seed_game(&shared, alice.id, "Alice Original").await;
    let bobs_game = seed_game(&shared, bob.id, "Bob Shared Out").await;
    let grant = shares::create_game_share(
        shared.transaction(),
        bobs_game.id,
        bob.id,
        alice.id,
        SharePermission::Edit,
    )
    .await
    .expect("seed share");

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/rpc").configure(routes::rpc::configure_routes)),
    )
    .await;

    // Original tag routes to the owned row
    let req = rpc_request(
        "game.get",
        json!({"type": "original", "id": alices_game.id}),
        &shared,
        &alice.sub,
    );
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "Alice Original");
    assert_eq!(body["ref"]["type"], "original");

    // Shared tag routes to the share row, not the games table
    let req = rpc_request(
        "game.get",
        json!({"type": "shared", "sharedGameId": grant.id}),
        &shared,
        &alice.sub,
    );
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "Bob Shared Out");
    assert_eq!(body["ref"]["type"], "shared");
    assert_eq!(body["permission"], "EDIT");

    // A shared id with no share row is a null sentinel, not an error
    let req = rpc_request(
        "game.get",
        json!({"type": "shared", "sharedGameId": 999_999}),
        &shared,
        &alice.sub,
    );
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body.is_null());
}

#[tokio::test]
async fn someone_elses_original_game_is_forbidden_not_missing() {
    let state = test_state().await;
    let shared = open_shared(&state).await;
    let alice = seed_user(&shared, "alice").await;
    let bob = seed_user(&shared, "bob").await;
    let bobs_game = seed_game(&shared, bob.id, "Bob Private").await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/rpc").configure(routes::rpc::configure_routes)),
    )
    .await;

    let req = rpc_request(
        "game.get",
        json!({"type": "original", "id": bobs_game.id}),
        &shared,
        &alice.sub,
    );
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, "FORBIDDEN", "FORBIDDEN", StatusCode::FORBIDDEN).await;
}

#[tokio::test]
async fn share_addressed_to_someone_else_is_forbidden_not_missing() {
    let state = test_state().await;
    let shared = open_shared(&state).await;
    let alice = seed_user(&shared, "alice").await;
    let bob = seed_user(&shared, "bob").await;
    let carol = seed_user(&shared, "carol").await;

    let bobs_game = seed_game(&shared, bob.id, "Bob To Carol").await;
    let grant = shares::create_game_share(
        shared.transaction(),
        bobs_game.id,
        bob.id,
        carol.id,
        SharePermission::View,
    )
    .await
    .expect("seed share");

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/rpc").configure(routes::rpc::configure_routes)),
    )
    .await;

    let req = rpc_request(
        "game.get",
        json!({"type": "shared", "sharedGameId": grant.id}),
        &shared,
        &alice.sub,
    );
    let resp = test::call_service(&app, req).await;
    assert_problem(
        resp,
        "NOT_SHARE_RECIPIENT",
        "FORBIDDEN",
        StatusCode::FORBIDDEN,
    )
    .await;
}

#[tokio::test]
async fn view_only_share_rejects_writes_but_allows_reads() {
    let state = test_state().await;
    let shared = open_shared(&state).await;
    let alice = seed_user(&shared, "alice").await;
    let bob = seed_user(&shared, "bob").await;

    let bobs_game = seed_game(&shared, bob.id, "View Only").await;
    let grant = shares::create_game_share(
        shared.transaction(),
        bobs_game.id,
        bob.id,
        alice.id,
        SharePermission::View,
    )
    .await
    .expect("seed share");
    let pawn = players::create_player(
        shared.transaction(),
        players::PlayerCreate {
            created_by: alice.id,
            name: "Pawn".to_string(),
            linked_user_id: None,
        },
    )
    .await
    .expect("seed player");

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/rpc").configure(routes::rpc::configure_routes)),
    )
    .await;

    // Read succeeds
    let req = rpc_request(
        "game.get",
        json!({"type": "shared", "sharedGameId": grant.id}),
        &shared,
        &alice.sub,
    );
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Write is rejected with the view-only code
    let req = rpc_request(
        "match.create",
        json!({
            "game": {"type": "shared", "sharedGameId": grant.id},
            "players": [{"playerId": pawn.id, "score": 10}]
        }),
        &shared,
        &alice.sub,
    );
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, "VIEW_ONLY_SHARE", "FORBIDDEN", StatusCode::FORBIDDEN).await;

    let req = rpc_request(
        "match.updateAllPlacements",
        json!({"type": "shared", "sharedGameId": grant.id}),
        &shared,
        &alice.sub,
    );
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, "VIEW_ONLY_SHARE", "FORBIDDEN", StatusCode::FORBIDDEN).await;
}

#[tokio::test]
async fn stats_for_original_and_shared_scopes_never_alias() {
    let state = test_state().await;
    let shared = open_shared(&state).await;
    let alice = seed_user(&shared, "alice").await;
    let bob = seed_user(&shared, "bob").await;

    let own_game = seed_game(&shared, alice.id, "Own Table").await;
    let bobs_game = seed_game(&shared, bob.id, "Borrowed Table").await;
    let grant = shares::create_game_share(
        shared.transaction(),
        bobs_game.id,
        bob.id,
        alice.id,
        SharePermission::Edit,
    )
    .await
    .expect("seed share");

    let p_original = players::create_player(
        shared.transaction(),
        players::PlayerCreate {
            created_by: alice.id,
            name: "Original Only".to_string(),
            linked_user_id: None,
        },
    )
    .await
    .unwrap();
    let p_shared = players::create_player(
        shared.transaction(),
        players::PlayerCreate {
            created_by: alice.id,
            name: "Shared Only".to_string(),
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

    // One match under each variant, different players
    let req = rpc_request(
        "match.create",
        json!({
            "game": {"type": "original", "id": own_game.id},
            "players": [{"playerId": p_original.id, "score": 21}]
        }),
        &shared,
        &alice.sub,
    );
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = rpc_request(
        "match.create",
        json!({
            "game": {"type": "shared", "sharedGameId": grant.id},
            "players": [{"playerId": p_shared.id, "score": 33}]
        }),
        &shared,
        &alice.sub,
    );
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Stats under the original tag only see the original-scope match
    let req = rpc_request(
        "game.getPlayerStats",
        json!({"type": "original", "id": own_game.id}),
        &shared,
        &alice.sub,
    );
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["matchCount"], 1);
    assert_eq!(body["players"].as_array().unwrap().len(), 1);
    assert_eq!(body["players"][0]["playerName"], "Original Only");

    // And the shared tag only sees the share-scope match
    let req = rpc_request(
        "game.getPlayerStats",
        json!({"type": "shared", "sharedGameId": grant.id}),
        &shared,
        &alice.sub,
    );
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["matchCount"], 1);
    assert_eq!(body["players"][0]["playerName"], "Shared Only");
}

#[tokio::test]
async fn game_list_merges_owned_and_shared_with_tags() {
    let state = test_state().await;
    let shared = open_shared(&state).await;
    let alice = seed_user(&shared, "alice").await;
    let bob = seed_user(&shared, "bob").await;

    seed_game(&shared, alice.id, "Mine").await;
    let bobs_game = seed_game(&shared, bob.id, "Theirs").await;
    shares::create_game_share(
        shared.transaction(),
        bobs_game.id,
        bob.id,
        alice.id,
        SharePermission::View,
    )
    .await
    .expect("seed share");

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/rpc").configure(routes::rpc::configure_routes)),
    )
    .await;

    let req = rpc_request("game.list", json!({}), &shared, &alice.sub);
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);

    let tags: Vec<&str> = items
        .iter()
        .map(|i| i["ref"]["type"].as_str().unwrap())
        .collect();
    assert!(tags.contains(&"original"));
    assert!(tags.contains(&"shared"));

    let shared_item = items
        .iter()
        .find(|i| i["ref"]["type"] == "shared")
        .unwrap();
    assert_eq!(shared_item["permission"], "VIEW");
    assert_eq!(shared_item["name"], "Theirs");
}
