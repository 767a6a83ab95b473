pub mod event;

use crate::model::{id::EventId, user::EventOrganizer};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

/// チーム人数の上限が未指定（2 未満）だった場合に適用する既定値
pub const DEFAULT_MAX_TEAM_SIZE: i32 = 5;

pub fn effective_team_size_limit(max_team_size: i32) -> i32 {
    if max_team_size >= 2 {
        max_team_size
    } else {
        DEFAULT_MAX_TEAM_SIZE
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, AsRefStr, EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Technical,
    Cultural,
    Workshop,
    Social,
    #[default]
    Other,
}

#[derive(Debug)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub category: EventCategory,
    pub organizer: EventOrganizer,
    pub is_team_event: bool,
    pub max_team_size: i32,
    pub max_participants: i32,
    pub participants_count: i32,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// max_participants = 0 は定員なしを表す
    pub fn is_unlimited(&self) -> bool {
        self.max_participants == 0
    }

    /// seats 人分の空きがあるか。
    /// 最終的な定員判定はストア側の条件付き UPDATE が同じ式で行う。
    pub fn has_capacity_for(&self, seats: i32) -> bool {
        self.is_unlimited() || self.participants_count + seats <= self.max_participants
    }

    pub fn team_size_limit(&self) -> i32 {
        effective_team_size_limit(self.max_team_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::id::UserId;
    use rstest::rstest;

    fn event(max_participants: i32, participants_count: i32) -> Event {
        Event {
            id: EventId::new(),
            title: "Tech Innovation Summit".into(),
            description: "annual summit".into(),
            event_date: Utc::now(),
            location: "Hall A".into(),
            category: EventCategory::Technical,
            organizer: EventOrganizer {
                organizer_id: UserId::new(),
                organizer_name: "organizer".into(),
            },
            is_team_event: false,
            max_team_size: 5,
            max_participants,
            participants_count,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn unlimited_event_always_has_capacity() {
        let ev = event(0, 12345);
        assert!(ev.is_unlimited());
        assert!(ev.has_capacity_for(1));
        assert!(ev.has_capacity_for(100));
    }

    #[rstest]
    #[case(2, 1, 1, true)]
    #[case(2, 2, 1, false)]
    #[case(10, 7, 3, true)]
    #[case(10, 7, 4, false)]
    fn capacity_is_checked_against_the_counter(
        #[case] max: i32,
        #[case] count: i32,
        #[case] seats: i32,
        #[case] expected: bool,
    ) {
        assert_eq!(event(max, count).has_capacity_for(seats), expected);
    }

    #[rstest]
    #[case(3, 3)]
    #[case(1, DEFAULT_MAX_TEAM_SIZE)]
    #[case(0, DEFAULT_MAX_TEAM_SIZE)]
    fn team_size_limit_falls_back_to_the_default(#[case] max_team_size: i32, #[case] expected: i32) {
        let mut ev = event(0, 0);
        ev.is_team_event = true;
        ev.max_team_size = max_team_size;
        assert_eq!(ev.team_size_limit(), expected);
    }
}
