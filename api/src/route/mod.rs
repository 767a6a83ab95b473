pub mod event;
pub mod health;
pub mod team;
pub mod v1;
