pub mod auth;
pub mod event;
pub mod id;
pub mod registration;
pub mod role;
pub mod team;
pub mod user;
