//! Router-level tests against in-memory repositories.

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use crate::app;
use crate::state::AppState;
use shared::models::event::{Event, EventRequest};
use shared::models::game::{Game, GameRequest};
use shared::models::identity::ParticipantIdentity;
use shared::models::participation::Participation;
use shared::models::user::User;
use shared::repositories::errors::event_repository_errors::EventRepositoryError;
use shared::repositories::errors::game_repository_errors::GameRepositoryError;
use shared::repositories::errors::participation_repository_errors::ParticipationRepositoryError;
use shared::repositories::errors::user_repository_errors::UserRepositoryError;
use shared::repositories::event_repository::EventRepository;
use shared::repositories::game_repository::GameRepository;
use shared::repositories::participation_repository::ParticipationRepository;
use shared::repositories::user_repository::UserRepository;
use shared::services::auth_service::{AuthService, AuthServiceTrait};
use shared::services::event_service::EventService;
use shared::services::game_service::GameService;
use shared::services::identity_resolver::IdentityResolver;
use shared::services::participation_service::ParticipationService;
use shared::services::user_service::UserService;

const SECRET: &str = "test-secret";
const EVENT_ID: &str = "event-1";

#[derive(Default)]
struct InMemoryGames(Mutex<HashMap<String, Game>>);

#[async_trait]
impl GameRepository for InMemoryGames {
    async fn create_game(&self, game: &Game) -> Result<(), GameRepositoryError> {
        self.0.lock().unwrap().insert(game.id.clone(), game.clone());
        Ok(())
    }

    async fn get_game(&self, game_id: &str) -> Result<Game, GameRepositoryError> {
        self.0
            .lock()
            .unwrap()
            .get(game_id)
            .cloned()
            .ok_or(GameRepositoryError::NotFound)
    }

    async fn list_games(&self) -> Result<Vec<Game>, GameRepositoryError> {
        Ok(self.0.lock().unwrap().values().cloned().collect())
    }

    async fn update_game(&self, game: &Game) -> Result<(), GameRepositoryError> {
        self.create_game(game).await
    }

    async fn delete_game(&self, game_id: &str) -> Result<(), GameRepositoryError> {
        self.0
            .lock()
            .unwrap()
            .remove(game_id)
            .map(|_| ())
            .ok_or(GameRepositoryError::NotFound)
    }
}

#[derive(Default)]
struct InMemoryEvents(Mutex<HashMap<String, Event>>);

#[async_trait]
impl EventRepository for InMemoryEvents {
    async fn create_event(&self, event: &Event) -> Result<(), EventRepositoryError> {
        self.0
            .lock()
            .unwrap()
            .insert(event.id.clone(), event.clone());
        Ok(())
    }

    async fn get_event(&self, event_id: &str) -> Result<Event, EventRepositoryError> {
        self.0
            .lock()
            .unwrap()
            .get(event_id)
            .cloned()
            .ok_or(EventRepositoryError::NotFound)
    }

    async fn list_events(&self) -> Result<Vec<Event>, EventRepositoryError> {
        Ok(self.0.lock().unwrap().values().cloned().collect())
    }

    async fn update_event(&self, event: &Event) -> Result<(), EventRepositoryError> {
        self.create_event(event).await
    }

    async fn delete_event(&self, event_id: &str) -> Result<(), EventRepositoryError> {
        self.0
            .lock()
            .unwrap()
            .remove(event_id)
            .map(|_| ())
            .ok_or(EventRepositoryError::NotFound)
    }
}

#[derive(Default)]
struct InMemoryParticipations(Mutex<HashMap<(String, String), Participation>>);

#[async_trait]
impl ParticipationRepository for InMemoryParticipations {
    async fn get_participation(
        &self,
        event_id: &str,
        identity: &ParticipantIdentity,
    ) -> Result<Option<Participation>, ParticipationRepositoryError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .get(&(event_id.to_string(), identity.storage_key()))
            .cloned())
    }

    async fn put_participation(
        &self,
        participation: &Participation,
    ) -> Result<(), ParticipationRepositoryError> {
        self.0.lock().unwrap().insert(
            (
                participation.event_id.clone(),
                participation.participant_key.clone(),
            ),
            participation.clone(),
        );
        Ok(())
    }

    async fn list_by_event(
        &self,
        event_id: &str,
    ) -> Result<Vec<Participation>, ParticipationRepositoryError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn delete_participation(
        &self,
        event_id: &str,
        participant_key: &str,
    ) -> Result<(), ParticipationRepositoryError> {
        self.0
            .lock()
            .unwrap()
            .remove(&(event_id.to_string(), participant_key.to_string()));
        Ok(())
    }
}

#[derive(Default)]
struct InMemoryUsers(Mutex<HashMap<String, User>>);

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create_user(&self, user: &User) -> Result<(), UserRepositoryError> {
        self.0.lock().unwrap().insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn get_user_by_id(&self, user_id: &str) -> Result<User, UserRepositoryError> {
        self.0
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .ok_or(UserRepositoryError::NotFound)
    }

    async fn list_users(&self) -> Result<Vec<User>, UserRepositoryError> {
        Ok(self.0.lock().unwrap().values().cloned().collect())
    }
}

struct TestApp {
    router: Router,
    participations: Arc<InMemoryParticipations>,
    auth_service: Arc<AuthService>,
}

fn game(id: &str, title: &str) -> Game {
    let mut game = Game::new(GameRequest {
        title: title.to_string(),
        description: String::new(),
        complexity_rating: Some(2.5),
        video_url: None,
        bgg_url: None,
        image_url: None,
    });
    game.id = id.to_string();
    game
}

fn test_app() -> TestApp {
    let games = Arc::new(InMemoryGames::default());
    for (id, title) in [("a", "Azul"), ("b", "Brass"), ("c", "Carcassonne")] {
        games.0.lock().unwrap().insert(id.to_string(), game(id, title));
    }

    let events = Arc::new(InMemoryEvents::default());
    let mut event = Event::new(EventRequest {
        title: "Game night".to_string(),
        description: String::new(),
        date: Utc::now(),
        games: vec!["a".to_string(), "b".to_string(), "c".to_string()],
    });
    event.id = EVENT_ID.to_string();
    events.0.lock().unwrap().insert(event.id.clone(), event);

    let users = Arc::new(InMemoryUsers::default());
    users.0.lock().unwrap().insert(
        "u1".to_string(),
        User::new("u1".to_string(), "Robin".to_string()),
    );

    let participations = Arc::new(InMemoryParticipations::default());
    let auth_service = Arc::new(AuthService::new(SECRET.to_string()));
    let event_service = Arc::new(EventService::new(events.clone(), games.clone()));

    let state = AppState {
        auth_service: auth_service.clone(),
        user_service: Arc::new(UserService::new(users)),
        game_service: Arc::new(GameService::new(games, events)),
        participation_service: Arc::new(ParticipationService::new(
            participations.clone(),
            event_service.clone(),
        )),
        identity_resolver: IdentityResolver::new(participations.clone()),
        event_service,
    };

    TestApp {
        router: app(state),
        participations,
        auth_service,
    }
}

impl TestApp {
    fn token(&self, id: &str, is_admin: bool) -> String {
        let mut user = User::new(id.to_string(), "Robin".to_string());
        user.is_admin = is_admin;
        self.auth_service.generate_token(&user).unwrap().token
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        headers: &[(&str, &str)],
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }
}

#[tokio::test]
async fn test_health() {
    let app = test_app();
    let (status, _) = app.send(Method::GET, "/health", &[], None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_guest_rsvp_then_save_preferences() {
    let app = test_app();

    let (status, body) = app
        .send(
            Method::POST,
            "/events/event-1/rsvp",
            &[],
            Some(json!({"name": " Alex ", "attending": true})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notification"]["title"], "RSVP confirmed!");
    assert_eq!(body["participation"]["participant_key"], "GUEST#Alex");

    let (status, body) = app
        .send(
            Method::PUT,
            "/events/event-1/preferences",
            &[("x-guest-name", "Alex")],
            Some(json!({"order": ["c", "a"], "excluded": ["b"]})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recovered"], false);
    assert_eq!(body["participation"]["rankings"], json!({"a": 2, "c": 1}));

    let (status, body) = app
        .send(
            Method::GET,
            "/events/event-1/preferences",
            &[("x-guest-name", "Alex")],
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entries"][0]["game_id"], "c");
    assert_eq!(body["entries"][1]["stored_rank"], 2);
    assert_eq!(body["excluded"], json!(["b"]));
}

#[tokio::test]
async fn test_rsvp_without_name_is_rejected() {
    let app = test_app();
    let (status, body) = app
        .send(
            Method::POST,
            "/events/event-1/rsvp",
            &[],
            Some(json!({"name": "  ", "attending": true})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["notification"]["message"],
        "Please enter your name to RSVP"
    );
}

#[tokio::test]
async fn test_anonymous_ranking_without_rsvp_asks_to_rsvp_first() {
    let app = test_app();
    let (status, body) = app
        .send(
            Method::PUT,
            "/events/event-1/rankings",
            &[],
            Some(json!({"rankings": {"a": 1}})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["notification"]["title"], "RSVP first");
    assert!(app.participations.0.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_logged_in_ranking_without_rsvp_recovers() {
    let app = test_app();
    let token = format!("Bearer {}", app.token("u1", false));
    let (status, body) = app
        .send(
            Method::PUT,
            "/events/event-1/rankings",
            &[("authorization", token.as_str())],
            Some(json!({"rankings": {"b": 1}})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recovered"], true);
    assert_eq!(body["participation"]["attending"], true);
}

#[tokio::test]
async fn test_gestures_reorder_and_exclude() {
    let app = test_app();
    let token = format!("Bearer {}", app.token("u1", false));
    app.send(
        Method::POST,
        "/events/event-1/rsvp",
        &[("authorization", token.as_str())],
        Some(json!({"attending": true})),
    )
    .await;

    let (status, body) = app
        .send(
            Method::POST,
            "/events/event-1/preferences/gestures",
            &[("authorization", token.as_str())],
            Some(json!({"gestures": [
                {"type": "move_down", "index": 0},
                {"type": "toggle_excluded", "game_id": "c"}
            ]})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let order: Vec<&str> = body["preferences"]["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["game_id"].as_str().unwrap())
        .collect();
    assert_eq!(order, vec!["b", "a"]);
    assert_eq!(body["preferences"]["excluded"], json!(["c"]));

    let (status, body) = app
        .send(
            Method::GET,
            "/events/event-1/participation",
            &[("authorization", token.as_str())],
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ranking_state"], "FullyRanked");
}

#[tokio::test]
async fn test_attendees_show_user_and_guest_names() {
    let app = test_app();
    let token = format!("Bearer {}", app.token("u1", false));
    app.send(
        Method::POST,
        "/events/event-1/rsvp",
        &[("authorization", token.as_str())],
        Some(json!({"attending": true})),
    )
    .await;
    app.send(
        Method::POST,
        "/events/event-1/rsvp",
        &[],
        Some(json!({"name": "Sam", "attending": false})),
    )
    .await;

    let (status, body) = app
        .send(Method::GET, "/events/event-1/attendees", &[], None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"display_name": "Robin", "identity": {"kind": "User", "id": "u1"}}]));
}

#[tokio::test]
async fn test_summary_is_admin_only() {
    let app = test_app();
    let user = format!("Bearer {}", app.token("u1", false));
    let admin = format!("Bearer {}", app.token("admin", true));

    let (status, _) = app
        .send(Method::GET, "/events/event-1/rankings/summary", &[], None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(
            Method::GET,
            "/events/event-1/rankings/summary",
            &[("authorization", user.as_str())],
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    app.send(
        Method::PUT,
        "/events/event-1/rankings",
        &[("authorization", user.as_str())],
        Some(json!({"rankings": {"b": 1, "a": 2}})),
    )
    .await;

    let (status, body) = app
        .send(
            Method::GET,
            "/events/event-1/rankings/summary",
            &[("authorization", admin.as_str())],
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["game_id"], "b");
    assert_eq!(body[1]["game_id"], "a");
    assert_eq!(body[2]["votes_count"], 0);
    assert_eq!(body[2]["average_rank"], Value::Null);
}

#[tokio::test]
async fn test_invalid_token_is_rejected_even_on_open_routes() {
    let app = test_app();
    let (status, _) = app
        .send(
            Method::POST,
            "/events/event-1/rsvp",
            &[("authorization", "Bearer nonsense")],
            Some(json!({"name": "Alex", "attending": true})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_event_purges_participations() {
    let app = test_app();
    let admin = format!("Bearer {}", app.token("admin", true));
    app.send(
        Method::POST,
        "/events/event-1/rsvp",
        &[],
        Some(json!({"name": "Alex", "attending": true})),
    )
    .await;
    assert_eq!(app.participations.0.lock().unwrap().len(), 1);

    let (status, _) = app
        .send(
            Method::DELETE,
            "/events/event-1",
            &[("authorization", admin.as_str())],
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(app.participations.0.lock().unwrap().is_empty());

    let (status, _) = app
        .send(Method::GET, "/events/event-1", &[], None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_event_details_resolve_games_in_order() {
    let app = test_app();
    let (status, body) = app.send(Method::GET, "/events/event-1", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Game night");
    assert_eq!(body["game_details"][2]["title"], "Carcassonne");
}

#[tokio::test]
async fn test_creating_a_game_needs_a_token() {
    let app = test_app();
    let (status, _) = app
        .send(
            Method::POST,
            "/games",
            &[],
            Some(json!({"title": "Wingspan", "complexity_rating": 2.4})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
