use crate::model::{id::UserId, role::Role};

#[derive(Debug, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug)]
pub struct EventOrganizer {
    pub organizer_id: UserId,
    pub organizer_name: String,
}
