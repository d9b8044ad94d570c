pub mod auth;
pub mod event;
pub mod game;
pub mod identity;
pub mod notification;
pub mod participation;
pub mod requests;
pub mod user;
