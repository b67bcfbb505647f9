//! In-process fake of the BG Chooser backend used by the integration tests.
//!
//! Serves the room REST API and both WebSocket endpoints from one `axum`
//! router on `127.0.0.1:<port>`. Only room [`ROOM_ID`] exists.

#![allow(dead_code)]

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::{sync::broadcast, task::JoinHandle};

pub const ROOM_ID: &str = "04217";

/// Catalog user whose collection is ready
pub const CATALOG_USER: &str = "alice";
/// Catalog user the catalog does not know
pub const UNKNOWN_USER: &str = "ghost";
/// Catalog user whose collection is still being processed for the first
/// [`SLOW_USER_PENDING`] requests
pub const SLOW_USER: &str = "slowpoke";
pub const SLOW_USER_PENDING: u32 = 2;
/// Catalog user whose collection never finishes processing
pub const STUCK_USER: &str = "stuck";

pub fn game_json(id: &str, name: &str, min_players: u32, max_players: u32) -> Value {
    json!({
        "id": id,
        "name": name,
        "thumbnail": format!("https://cf.geekdo-images.com/{id}.jpg"),
        "info": {
            "minPlayers": min_players,
            "maxPlayers": max_players,
            "minPlaytime": 30,
            "maxPlaytime": 60
        }
    })
}

fn catalog(user: &str) -> Option<Vec<Value>> {
    match user {
        CATALOG_USER | SLOW_USER => Some(vec![
            game_json("13", "Catan", 3, 4),
            game_json("230802", "Azul", 2, 4),
            game_json("237182", "Root", 2, 4),
        ]),
        _ => None,
    }
}

#[derive(Default)]
struct Room {
    games: Vec<Value>,
    votes: BTreeMap<String, Vec<String>>,
    vetoes: BTreeMap<String, Vec<String>>,
    slow_polls: u32,
    collection_requests: u32,
}

impl Room {
    fn has_game(&self, game: &Value) -> bool {
        self.games.iter().any(|g| g["id"] == game["id"])
    }
}

struct AppState {
    room: Mutex<Room>,
    updates: broadcast::Sender<String>,
}

impl AppState {
    fn broadcast(&self, message: Value) {
        // No subscriber is fine
        let _ = self.updates.send(message.to_string());
    }
}

type Shared = Arc<AppState>;

fn check_room(room: &str) -> Result<(), Response> {
    if room == ROOM_ID {
        Ok(())
    } else {
        Err((StatusCode::NOT_FOUND, "Room not found").into_response())
    }
}

async fn create_room() -> Json<Value> {
    Json(json!({ "roomID": ROOM_ID }))
}

async fn get_room(State(state): State<Shared>, Path(room): Path<String>) -> Response {
    if let Err(response) = check_room(&room) {
        return response;
    }
    let room = state.room.lock().unwrap();
    Json(json!({
        "games": room.games,
        "voteResults": { "votes": room.votes, "vetoes": room.vetoes }
    }))
    .into_response()
}

async fn get_collection(
    State(state): State<Shared>,
    Path((room, user)): Path<(String, String)>,
) -> Response {
    if let Err(response) = check_room(&room) {
        return response;
    }
    let mut room = state.room.lock().unwrap();
    room.collection_requests += 1;
    match user.as_str() {
        STUCK_USER => return StatusCode::ACCEPTED.into_response(),
        SLOW_USER if room.slow_polls < SLOW_USER_PENDING => {
            room.slow_polls += 1;
            return StatusCode::ACCEPTED.into_response();
        }
        _ => {}
    }
    Json(json!({ "games": catalog(&user) })).into_response()
}

async fn post_collection(
    State(state): State<Shared>,
    Path((room, user)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = check_room(&room) {
        return response;
    }
    let games: Vec<Value> = body["games"].as_array().cloned().unwrap_or_default();
    let mut room = state.room.lock().unwrap();
    let added: Vec<Value> = games.into_iter().filter(|g| !room.has_game(g)).collect();
    room.games.extend(added.iter().cloned());
    state.broadcast(json!({ "type": "addedGamesUpdate", "user": user, "games": added }));
    Json(json!({ "games": added })).into_response()
}

async fn add_game(
    State(state): State<Shared>,
    Path((room, user, game_id)): Path<(String, String, String)>,
) -> Response {
    if let Err(response) = check_room(&room) {
        return response;
    }
    let Some(game) = catalog(CATALOG_USER)
        .unwrap_or_default()
        .into_iter()
        .find(|g| g["id"] == game_id.as_str())
    else {
        return (StatusCode::NOT_FOUND, "Game not found").into_response();
    };
    let mut room = state.room.lock().unwrap();
    if !room.has_game(&game) {
        room.games.push(game.clone());
        state.broadcast(json!({ "type": "addedGamesUpdate", "user": user, "games": [game] }));
    }
    Json(json!({ "game": game })).into_response()
}

async fn post_votes(
    State(state): State<Shared>,
    Path((room, user)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = check_room(&room) {
        return response;
    }
    let list = |field: &str| -> Vec<String> {
        body[field]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    };
    let (votes, vetoes) = (list("votes"), list("vetoes"));
    let mut room = state.room.lock().unwrap();
    room.votes.insert(user.clone(), votes.clone());
    room.vetoes.insert(user.clone(), vetoes.clone());
    state.broadcast(json!({
        "type": "addedVotesUpdate",
        "user": user,
        "votes": votes,
        "vetoes": vetoes
    }));
    StatusCode::OK.into_response()
}

async fn reset_votes(State(state): State<Shared>, Path(room): Path<String>) -> Response {
    if let Err(response) = check_room(&room) {
        return response;
    }
    let mut room = state.room.lock().unwrap();
    room.votes.clear();
    room.vetoes.clear();
    // Capitalized field names, like the real backend without struct tags
    state.broadcast(json!({ "Type": "resetVotesUpdate", "User": "", "Games": null }));
    StatusCode::OK.into_response()
}

async fn echo(ws: WebSocketUpgrade, State(state): State<Shared>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| push_updates(socket, state))
}

/// Wait for `register:<room>`, then forward every update of that room
async fn push_updates(socket: WebSocket, state: Shared) {
    let mut updates = state.updates.subscribe();
    let (mut sender, mut receiver) = socket.split();
    let registered = match receiver.next().await {
        Some(Ok(Message::Text(text))) => text
            .as_str()
            .strip_prefix("register:")
            .is_some_and(|room| room == ROOM_ID),
        _ => false,
    };
    if !registered {
        let _ = sender.close().await;
        return;
    }

    while let Ok(update) = updates.recv().await {
        if sender.send(Message::Text(update.into())).await.is_err() {
            break;
        }
    }
}

async fn import_progress(
    ws: WebSocketUpgrade,
    State(state): State<Shared>,
    Path((room, user)): Path<(String, String)>,
) -> Response {
    if let Err(response) = check_room(&room) {
        return response;
    }
    ws.on_upgrade(move |socket| stream_import(socket, state, user))
}

async fn stream_import(mut socket: WebSocket, state: Shared, user: String) {
    let Some(games) = catalog(&user) else {
        let error = json!({ "progress": 0.0, "error": format!("User not found: {user}") });
        let _ = socket.send(Message::Text(error.to_string().into())).await;
        return;
    };

    let total = games.len();
    for (i, game) in games.into_iter().enumerate() {
        let new_game = {
            let mut room = state.room.lock().unwrap();
            let new_game = !room.has_game(&game);
            if new_game {
                room.games.push(game.clone());
            }
            new_game
        };
        let event = json!({
            "progress": (i + 1) as f32 / total as f32,
            "game": game,
            "newGame": new_game
        });
        if socket
            .send(Message::Text(event.to_string().into()))
            .await
            .is_err()
        {
            return;
        }
    }
    let _ = socket.send(Message::Close(None)).await;
}

/// Running fake backend; stops when dropped
pub struct TestServer {
    port: u16,
    state: Shared,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a backend whose room holds Catan (voted by `u2` by name) and Azul
    pub fn start(port: u16) -> Self {
        let (updates, _) = broadcast::channel(64);
        let room = Room {
            games: vec![game_json("13", "Catan", 3, 4), game_json("230802", "Azul", 2, 4)],
            votes: BTreeMap::from([("u2".to_string(), vec!["Catan".to_string()])]),
            ..Default::default()
        };
        let state = Arc::new(AppState {
            room: Mutex::new(room),
            updates,
        });

        let app = Router::new()
            .route("/api/rooms", post(create_room))
            .route("/api/rooms/{room}", get(get_room))
            .route(
                "/api/rooms/{room}/bgguser/{user}",
                get(get_collection).post(post_collection),
            )
            .route(
                "/api/rooms/{room}/bgguser/{user}/progress",
                get(import_progress),
            )
            .route("/api/rooms/{room}/games/{user}/{game_id}", post(add_game))
            .route("/api/rooms/{room}/vote/{user}", post(post_votes))
            .route("/api/rooms/{room}/votes", axum::routing::delete(reset_votes))
            .route("/api/echo", get(echo))
            .with_state(state.clone());

        let listener = std::net::TcpListener::bind(("127.0.0.1", port))
            .expect("Failed to bind test server port");
        listener
            .set_nonblocking(true)
            .expect("Failed to set non-blocking");
        let listener =
            tokio::net::TcpListener::from_std(listener).expect("Failed to adopt listener");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        Self {
            port,
            state,
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}", self.port)
    }

    /// Number of `GET .../bgguser/{user}` requests served so far
    pub fn collection_requests(&self) -> u32 {
        self.state.room.lock().unwrap().collection_requests
    }

    pub fn votes_of(&self, user: &str) -> Option<Vec<String>> {
        self.state.room.lock().unwrap().votes.get(user).cloned()
    }

    pub fn game_count(&self) -> usize {
        self.state.room.lock().unwrap().games.len()
    }

    /// Push a raw message to every registered client
    pub fn push(&self, message: Value) {
        self.state.broadcast(message);
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
