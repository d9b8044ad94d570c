pub mod auth_service_errors;
pub mod event_service_errors;
pub mod game_service_errors;
pub mod participation_service_errors;
pub mod user_service_errors;
