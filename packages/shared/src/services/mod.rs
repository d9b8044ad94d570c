pub mod aggregate_rankings;
pub mod auth_service;
pub mod errors;
pub mod event_service;
pub mod game_service;
pub mod identity_resolver;
pub mod participation_service;
pub mod preference_list;
pub mod user_service;
