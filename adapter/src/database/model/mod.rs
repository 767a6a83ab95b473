pub mod event;
pub mod registration;
pub mod team;
pub mod user;
