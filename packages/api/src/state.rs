use std::sync::Arc;

use shared::services::auth_service::AuthService;
use shared::services::event_service::EventService;
use shared::services::game_service::GameService;
use shared::services::identity_resolver::IdentityResolver;
use shared::services::participation_service::ParticipationService;
use shared::services::user_service::UserService;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub game_service: Arc<GameService>,
    pub event_service: Arc<EventService>,
    pub participation_service: Arc<ParticipationService>,
    pub identity_resolver: IdentityResolver,
}
