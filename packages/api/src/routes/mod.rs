pub mod events;
pub mod games;
pub mod health;
pub mod participation;
pub mod rankings;
