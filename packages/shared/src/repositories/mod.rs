pub mod errors;
pub mod event_repository;
pub mod game_repository;
pub mod participation_repository;
pub mod user_repository;
