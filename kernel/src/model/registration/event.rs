use super::ContactInfo;
use crate::model::{
    event::Event,
    id::{EventId, UserId},
    role::Role,
};
use derive_new::new;
use shared::error::{AppError, AppResult};

#[derive(new, Debug)]
pub struct RegisterForEvent {
    pub event_id: EventId,
    pub user_id: UserId,
    pub role: Role,
    pub payload: RegistrationPayload,
}

/// リクエストの type タグで分かれる登録内容。
/// 未知のタグは API 層のデシリアライズ時点で弾かれる。
#[derive(Debug)]
pub enum RegistrationPayload {
    Individual {
        participant: ContactInfo,
    },
    Team {
        team_name: String,
        participants: Vec<ContactInfo>,
    },
}

impl RegistrationPayload {
    pub fn seats(&self) -> i32 {
        match self {
            RegistrationPayload::Individual { .. } => 1,
            RegistrationPayload::Team { participants, .. } => participants.len() as i32,
        }
    }
}

/// 事前検証を通過した登録の受け入れ枠
#[derive(Debug, PartialEq, Eq)]
pub struct Admission {
    pub seats: i32,
}

impl RegisterForEvent {
    /// 管理者はイベントへ参加登録できない
    pub fn ensure_registrant_allowed(&self) -> AppResult<()> {
        if self.role.is_admin() {
            return Err(AppError::ForbiddenOperation(
                "Admins cannot register for events.".into(),
            ));
        }
        Ok(())
    }

    /// 入力内容・チーム人数・定員をイベントのスナップショットに対して検証する。
    /// 定員の確定はストア側の条件付き UPDATE が同じ式で行うため、ここでの
    /// 定員チェックはあくまで事前判定である。
    pub fn admission(&self, event: &Event) -> AppResult<Admission> {
        match &self.payload {
            RegistrationPayload::Individual { participant } => {
                ensure_contact(participant)?;
                if !event.has_capacity_for(1) {
                    return Err(AppError::CapacityExceeded("Event is full.".into()));
                }
                Ok(Admission { seats: 1 })
            }
            RegistrationPayload::Team {
                team_name,
                participants,
            } => {
                if team_name.trim().is_empty() {
                    return Err(AppError::UnprocessableEntity(
                        "Team name is required.".into(),
                    ));
                }
                if participants.is_empty() {
                    return Err(AppError::UnprocessableEntity(
                        "At least one team participant is required.".into(),
                    ));
                }
                for participant in participants {
                    ensure_contact(participant)?;
                }
                let seats = participants.len() as i32;
                if seats > event.team_size_limit() {
                    return Err(AppError::UnprocessableEntity(
                        "Team size exceeds the limit for this event.".into(),
                    ));
                }
                if !event.has_capacity_for(seats) {
                    return Err(AppError::CapacityExceeded(
                        "Not enough capacity left for this team.".into(),
                    ));
                }
                Ok(Admission { seats })
            }
        }
    }
}

fn ensure_contact(participant: &ContactInfo) -> AppResult<()> {
    if !participant.is_complete() {
        return Err(AppError::UnprocessableEntity(
            "Name, email and phone are all required.".into(),
        ));
    }
    if participant.normalized_phone().is_none() {
        return Err(AppError::UnprocessableEntity(
            "Phone number must contain exactly 10 digits.".into(),
        ));
    }
    Ok(())
}

#[derive(new, Debug)]
pub struct UnregisterFromEvent {
    pub event_id: EventId,
    pub user_id: UserId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{event::EventCategory, user::EventOrganizer};
    use chrono::Utc;

    fn event(max_participants: i32, participants_count: i32, max_team_size: i32) -> Event {
        Event {
            id: EventId::new(),
            title: "Hackathon".into(),
            description: "48h build".into(),
            event_date: Utc::now(),
            location: "Lab 2".into(),
            category: EventCategory::Technical,
            organizer: EventOrganizer {
                organizer_id: UserId::new(),
                organizer_name: "host".into(),
            },
            is_team_event: true,
            max_team_size,
            max_participants,
            participants_count,
            created_at: Utc::now(),
        }
    }

    fn contact(phone: &str) -> ContactInfo {
        ContactInfo {
            name: "Mei Lin".into(),
            email: "mei@example.com".into(),
            phone: phone.into(),
        }
    }

    fn individual(phone: &str) -> RegisterForEvent {
        RegisterForEvent::new(
            EventId::new(),
            UserId::new(),
            Role::User,
            RegistrationPayload::Individual {
                participant: contact(phone),
            },
        )
    }

    fn team(participants: Vec<ContactInfo>) -> RegisterForEvent {
        RegisterForEvent::new(
            EventId::new(),
            UserId::new(),
            Role::User,
            RegistrationPayload::Team {
                team_name: "Rustaceans".into(),
                participants,
            },
        )
    }

    #[test]
    fn admins_may_not_register() {
        let mut cmd = individual("123-456-7890");
        cmd.role = Role::Admin;
        assert!(matches!(
            cmd.ensure_registrant_allowed(),
            Err(AppError::ForbiddenOperation(_))
        ));
        assert!(individual("123-456-7890").ensure_registrant_allowed().is_ok());
    }

    #[test]
    fn individual_admission_takes_one_seat() {
        let admission = individual("123-456-7890").admission(&event(2, 1, 5));
        assert_eq!(admission.ok(), Some(Admission { seats: 1 }));
    }

    #[test]
    fn full_event_rejects_individual_registration() {
        let result = individual("123-456-7890").admission(&event(2, 2, 5));
        assert!(matches!(result, Err(AppError::CapacityExceeded(_))));
    }

    #[test]
    fn unlimited_event_admits_regardless_of_counter() {
        assert!(individual("123-456-7890").admission(&event(0, 9999, 5)).is_ok());
    }

    #[test]
    fn malformed_phone_is_rejected_before_capacity() {
        // 満席のイベントでも入力エラーが先に報告される
        let result = individual("12345").admission(&event(2, 2, 5));
        assert!(matches!(result, Err(AppError::UnprocessableEntity(_))));
    }

    #[test]
    fn missing_contact_fields_are_rejected() {
        let mut cmd = individual("123-456-7890");
        if let RegistrationPayload::Individual { participant } = &mut cmd.payload {
            participant.email.clear();
        }
        assert!(matches!(
            cmd.admission(&event(0, 0, 5)),
            Err(AppError::UnprocessableEntity(_))
        ));
    }

    #[test]
    fn oversized_team_is_rejected() {
        let result = team(vec![contact("1234567890"); 4]).admission(&event(0, 0, 3));
        assert!(matches!(result, Err(AppError::UnprocessableEntity(_))));
    }

    #[test]
    fn team_size_defaults_to_five_when_unset() {
        assert!(team(vec![contact("1234567890"); 5]).admission(&event(0, 0, 0)).is_ok());
        assert!(team(vec![contact("1234567890"); 6]).admission(&event(0, 0, 0)).is_err());
    }

    #[test]
    fn team_admission_requires_capacity_for_every_member() {
        let ev = event(10, 8, 5);
        assert!(matches!(
            team(vec![contact("1234567890"); 3]).admission(&ev),
            Err(AppError::CapacityExceeded(_))
        ));
        assert_eq!(
            team(vec![contact("1234567890"); 2]).admission(&ev).ok(),
            Some(Admission { seats: 2 })
        );
    }

    #[test]
    fn empty_team_roster_is_rejected() {
        assert!(matches!(
            team(vec![]).admission(&event(0, 0, 5)),
            Err(AppError::UnprocessableEntity(_))
        ));
    }
}
