use axum::{routing::get, Router};
use lambda_http::{run, tracing, Error};
use std::env::set_var;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

#[cfg(test)]
mod tests;

use shared::config::{dynamodb_client, AppConfig};
use shared::repositories::event_repository::DynamoDbEventRepository;
use shared::repositories::game_repository::DynamoDbGameRepository;
use shared::repositories::participation_repository::DynamoDbParticipationRepository;
use shared::repositories::user_repository::DynamoDbUserRepository;
use shared::services::auth_service::AuthService;
use shared::services::event_service::EventService;
use shared::services::game_service::GameService;
use shared::services::identity_resolver::IdentityResolver;
use shared::services::participation_service::ParticipationService;
use shared::services::user_service::UserService;

#[tokio::main]
async fn main() -> Result<(), Error> {
    set_var("AWS_LAMBDA_HTTP_IGNORE_STAGE_IN_PATH", "true");

    // required to enable CloudWatch error logging by the runtime
    tracing::init_default_subscriber();

    let config = AppConfig::from_env()?;
    let client = dynamodb_client().await;

    let game_repository = Arc::new(DynamoDbGameRepository::new(
        client.clone(),
        config.games_table.clone(),
    ));
    let event_repository = Arc::new(DynamoDbEventRepository::new(
        client.clone(),
        config.events_table.clone(),
    ));
    let participation_repository = Arc::new(DynamoDbParticipationRepository::new(
        client.clone(),
        config.participations_table.clone(),
    ));
    let user_repository = Arc::new(DynamoDbUserRepository::new(
        client.clone(),
        config.users_table.clone(),
    ));

    let event_service = Arc::new(EventService::new(
        event_repository.clone(),
        game_repository.clone(),
    ));
    let app_state = state::AppState {
        auth_service: Arc::new(AuthService::new(config.require_jwt_secret()?)),
        user_service: Arc::new(UserService::new(user_repository)),
        game_service: Arc::new(GameService::new(game_repository, event_repository)),
        participation_service: Arc::new(ParticipationService::new(
            participation_repository.clone(),
            event_service.clone(),
        )),
        identity_resolver: IdentityResolver::new(participation_repository),
        event_service,
    };

    run(app(app_state)).await
}

pub fn app(app_state: state::AppState) -> Router {
    // ToDo: restrict origins once the frontend domain is fixed
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(routes::games::routes())
        .merge(routes::events::routes())
        .merge(routes::participation::routes())
        .merge(routes::rankings::routes())
        .layer(cors)
        .with_state(app_state)
}
