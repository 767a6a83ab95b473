use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::{EventId, RegistrationId, TeamId, UserId},
    registration::{
        event::{RegisterForEvent, RegistrationPayload},
        ContactInfo, Registration, RegistrationDetail, RegistrationReceipt,
    },
    role::Role,
};
use serde::{Deserialize, Serialize};

/// 登録リクエスト。type タグで個人登録かチーム登録かが決まり、
/// 未知のタグはデシリアライズの時点で弾かれる。
#[derive(Debug, Deserialize, Validate)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RegisterForEventRequest {
    #[serde(rename_all = "camelCase")]
    Individual {
        #[garde(length(min = 1))]
        name: String,
        #[garde(email)]
        email: String,
        #[garde(custom(ten_digit_phone))]
        phone: String,
    },
    #[serde(rename_all = "camelCase")]
    Team {
        #[garde(length(min = 1))]
        team_name: String,
        #[garde(length(min = 1), dive)]
        participants: Vec<ParticipantRequest>,
    },
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(email)]
    pub email: String,
    #[garde(custom(ten_digit_phone))]
    pub phone: String,
}

// ハイフンや括弧を除いた数字がちょうど 10 桁であること
fn ten_digit_phone(value: &str, _ctx: &()) -> garde::Result {
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    if digits == 10 {
        Ok(())
    } else {
        Err(garde::Error::new(
            "phone number must contain exactly 10 digits",
        ))
    }
}

impl From<ParticipantRequest> for ContactInfo {
    fn from(value: ParticipantRequest) -> Self {
        let ParticipantRequest { name, email, phone } = value;
        Self { name, email, phone }
    }
}

#[derive(new)]
pub struct RegisterForEventRequestWithIds(EventId, UserId, Role, RegisterForEventRequest);

impl From<RegisterForEventRequestWithIds> for RegisterForEvent {
    fn from(value: RegisterForEventRequestWithIds) -> Self {
        let RegisterForEventRequestWithIds(event_id, user_id, role, req) = value;
        let payload = match req {
            RegisterForEventRequest::Individual { name, email, phone } => {
                RegistrationPayload::Individual {
                    participant: ContactInfo { name, email, phone },
                }
            }
            RegisterForEventRequest::Team {
                team_name,
                participants,
            } => RegistrationPayload::Team {
                team_name,
                participants: participants.into_iter().map(ContactInfo::from).collect(),
            },
        };
        RegisterForEvent::new(event_id, user_id, role, payload)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationReceiptResponse {
    pub registration_id: RegistrationId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<TeamId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_code: Option<String>,
}

impl From<RegistrationReceipt> for RegistrationReceiptResponse {
    fn from(value: RegistrationReceipt) -> Self {
        let RegistrationReceipt {
            registration_id,
            team_id,
            team_code,
        } = value;
        Self {
            registration_id,
            team_id,
            team_code,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationsResponse {
    pub items: Vec<RegistrationResponse>,
}

impl From<Vec<Registration>> for RegistrationsResponse {
    fn from(value: Vec<Registration>) -> Self {
        Self {
            items: value.into_iter().map(RegistrationResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub registration_id: RegistrationId,
    pub event_id: EventId,
    pub user_id: UserId,
    pub registered_at: DateTime<Utc>,
    pub number_of_participants: i32,
    #[serde(flatten)]
    pub detail: RegistrationDetailResponse,
}

impl From<Registration> for RegistrationResponse {
    fn from(value: Registration) -> Self {
        let number_of_participants = value.seats();
        let Registration {
            registration_id,
            event_id,
            user_id,
            registered_at,
            detail,
        } = value;
        Self {
            registration_id,
            event_id,
            user_id,
            registered_at,
            number_of_participants,
            detail: detail.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RegistrationDetailResponse {
    #[serde(rename_all = "camelCase")]
    Individual { name: String, email: String, phone: String },
    #[serde(rename_all = "camelCase")]
    Team {
        team_id: TeamId,
        team_name: String,
        participants: Vec<ParticipantResponse>,
    },
}

impl From<RegistrationDetail> for RegistrationDetailResponse {
    fn from(value: RegistrationDetail) -> Self {
        match value {
            RegistrationDetail::Individual(ContactInfo { name, email, phone }) => {
                Self::Individual { name, email, phone }
            }
            RegistrationDetail::Team {
                team_id,
                team_name,
                participants,
            } => Self::Team {
                team_id,
                team_name,
                participants: participants
                    .into_iter()
                    .map(ParticipantResponse::from)
                    .collect(),
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantResponse {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl From<ContactInfo> for ParticipantResponse {
    fn from(value: ContactInfo) -> Self {
        let ContactInfo { name, email, phone } = value;
        Self { name, email, phone }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn individual_payload_parses_from_the_type_tag() {
        let req: RegisterForEventRequest = serde_json::from_value(serde_json::json!({
            "type": "individual",
            "name": "Asha Rao",
            "email": "asha@example.com",
            "phone": "123-456-7890"
        }))
        .unwrap();
        assert!(req.validate(&()).is_ok());
        assert!(matches!(req, RegisterForEventRequest::Individual { .. }));
    }

    #[test]
    fn team_payload_parses_with_participants() {
        let req: RegisterForEventRequest = serde_json::from_value(serde_json::json!({
            "type": "team",
            "teamName": "Rustaceans",
            "participants": [
                { "name": "Asha Rao", "email": "asha@example.com", "phone": "1234567890" },
                { "name": "Mei Lin", "email": "mei@example.com", "phone": "(123) 456 7890" }
            ]
        }))
        .unwrap();
        assert!(req.validate(&()).is_ok());
        let cmd: RegisterForEvent =
            RegisterForEventRequestWithIds::new(EventId::new(), UserId::new(), Role::User, req)
                .into();
        assert_eq!(cmd.payload.seats(), 2);
    }

    #[test]
    fn unknown_type_tag_is_rejected() {
        let result = serde_json::from_value::<RegisterForEventRequest>(serde_json::json!({
            "type": "corporate",
            "name": "Asha Rao",
            "email": "asha@example.com",
            "phone": "1234567890"
        }));
        assert!(result.is_err());
    }

    #[rstest]
    #[case("12345", false)]
    #[case("123-456-78901", false)]
    #[case("", false)]
    #[case("123-456-7890", true)]
    #[case("(123) 456 7890", true)]
    fn phone_numbers_must_carry_exactly_ten_digits(#[case] phone: &str, #[case] valid: bool) {
        let req: RegisterForEventRequest = serde_json::from_value(serde_json::json!({
            "type": "individual",
            "name": "Asha Rao",
            "email": "asha@example.com",
            "phone": phone
        }))
        .unwrap();
        assert_eq!(req.validate(&()).is_ok(), valid);
    }

    #[test]
    fn empty_team_roster_fails_validation() {
        let req: RegisterForEventRequest = serde_json::from_value(serde_json::json!({
            "type": "team",
            "teamName": "Rustaceans",
            "participants": []
        }))
        .unwrap();
        assert!(req.validate(&()).is_err());
    }

    #[test]
    fn team_registration_response_carries_the_snapshot() {
        let team_id = TeamId::new();
        let registration = Registration {
            registration_id: RegistrationId::new(),
            event_id: EventId::new(),
            user_id: UserId::new(),
            registered_at: chrono::Utc::now(),
            detail: RegistrationDetail::Team {
                team_id,
                team_name: "Rustaceans".into(),
                participants: vec![
                    ContactInfo {
                        name: "Asha Rao".into(),
                        email: "asha@example.com".into(),
                        phone: "1234567890".into(),
                    };
                    3
                ],
            },
        };
        let response = RegistrationResponse::from(registration);
        assert_eq!(response.number_of_participants, 3);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], "team");
        assert_eq!(json["teamName"], "Rustaceans");
        assert_eq!(json["numberOfParticipants"], 3);
    }
}
