pub mod event_repository_errors;
pub mod game_repository_errors;
pub mod participation_repository_errors;
pub mod user_repository_errors;
