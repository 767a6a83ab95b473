pub mod event;

use crate::model::id::{EventId, TeamId, UserId};
use chrono::{DateTime, Utc};
use shared::error::{AppError, AppResult};

#[derive(Debug)]
pub struct Team {
    pub team_id: TeamId,
    pub event_id: EventId,
    pub team_name: String,
    pub leader_id: UserId,
    pub members: Vec<UserId>,
    pub team_code: String,
    pub created_at: DateTime<Utc>,
}

impl Team {
    pub fn is_led_by(&self, user_id: UserId) -> bool {
        self.leader_id == user_id
    }

    pub fn has_member(&self, user_id: UserId) -> bool {
        self.members.contains(&user_id)
    }

    pub fn is_full(&self, size_limit: i32) -> bool {
        self.members.len() as i32 >= size_limit
    }

    /// joinTeam の事前条件。
    /// 「同一イベントの別チームに所属していないか」はストア側で確認する。
    pub fn ensure_joinable(&self, user_id: UserId, size_limit: i32) -> AppResult<()> {
        if self.has_member(user_id) {
            return Err(AppError::ResourceConflict(
                "You already joined this team.".into(),
            ));
        }
        if self.is_full(size_limit) {
            return Err(AppError::CapacityExceeded("Team is already full.".into()));
        }
        Ok(())
    }

    pub fn ensure_member_removable(
        &self,
        member_id: UserId,
        requested_user: UserId,
    ) -> AppResult<()> {
        if !self.is_led_by(requested_user) {
            return Err(AppError::ForbiddenOperation(
                "Only the team leader can remove members.".into(),
            ));
        }
        if !self.has_member(member_id) {
            return Err(AppError::UnprocessableEntity(
                "Member is not part of this team.".into(),
            ));
        }
        // リーダー自身はこの経路では外せない
        if member_id == self.leader_id {
            return Err(AppError::UnprocessableEntity(
                "The leader cannot remove themselves.".into(),
            ));
        }
        Ok(())
    }

    pub fn ensure_deletable_by(&self, requested_user: UserId) -> AppResult<()> {
        if !self.is_led_by(requested_user) {
            return Err(AppError::ForbiddenOperation(
                "Only the team leader can delete this team.".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(leader: UserId, members: Vec<UserId>) -> Team {
        Team {
            team_id: TeamId::new(),
            event_id: EventId::new(),
            team_name: "Rustaceans".into(),
            leader_id: leader,
            members,
            team_code: "A1B2C3".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn joining_twice_is_a_conflict() {
        let leader = UserId::new();
        let member = UserId::new();
        let team = team(leader, vec![leader, member]);
        assert!(matches!(
            team.ensure_joinable(member, 3),
            Err(AppError::ResourceConflict(_))
        ));
    }

    #[test]
    fn full_team_rejects_new_members() {
        let leader = UserId::new();
        let team = team(leader, vec![leader, UserId::new(), UserId::new()]);
        assert!(matches!(
            team.ensure_joinable(UserId::new(), 3),
            Err(AppError::CapacityExceeded(_))
        ));
    }

    #[test]
    fn open_team_accepts_a_new_member() {
        let leader = UserId::new();
        let team = team(leader, vec![leader]);
        assert!(team.ensure_joinable(UserId::new(), 3).is_ok());
    }

    #[test]
    fn only_the_leader_removes_members() {
        let leader = UserId::new();
        let member = UserId::new();
        let team = team(leader, vec![leader, member]);
        assert!(matches!(
            team.ensure_member_removable(member, member),
            Err(AppError::ForbiddenOperation(_))
        ));
        assert!(team.ensure_member_removable(member, leader).is_ok());
    }

    #[test]
    fn removing_an_outsider_is_invalid() {
        let leader = UserId::new();
        let team = team(leader, vec![leader]);
        assert!(matches!(
            team.ensure_member_removable(UserId::new(), leader),
            Err(AppError::UnprocessableEntity(_))
        ));
    }

    #[test]
    fn leader_cannot_remove_themselves() {
        let leader = UserId::new();
        let team = team(leader, vec![leader, UserId::new()]);
        assert!(matches!(
            team.ensure_member_removable(leader, leader),
            Err(AppError::UnprocessableEntity(_))
        ));
    }

    #[test]
    fn only_the_leader_deletes_the_team() {
        let leader = UserId::new();
        let team = team(leader, vec![leader]);
        assert!(matches!(
            team.ensure_deletable_by(UserId::new()),
            Err(AppError::ForbiddenOperation(_))
        ));
        assert!(team.ensure_deletable_by(leader).is_ok());
    }
}
