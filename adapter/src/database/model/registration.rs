use kernel::model::{
    id::{EventId, RegistrationId, TeamId, UserId},
    registration::{ContactInfo, Registration, RegistrationDetail},
};
use chrono::{DateTime, Utc};
use shared::error::AppError;
use sqlx::types::Json;

pub const REGISTRATION_TYPE_INDIVIDUAL: &str = "individual";
pub const REGISTRATION_TYPE_TEAM: &str = "team";

/// registrations の 1 行。個人登録とチーム登録で埋まるカラムが異なる。
#[derive(Debug, sqlx::FromRow)]
pub struct RegistrationRow {
    pub registration_id: RegistrationId,
    pub event_id: EventId,
    pub user_id: UserId,
    pub registration_type: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub team_id: Option<TeamId>,
    pub team_name: Option<String>,
    pub participants: Option<Json<Vec<ContactInfo>>>,
    pub registered_at: DateTime<Utc>,
}

impl TryFrom<RegistrationRow> for Registration {
    type Error = AppError;

    fn try_from(value: RegistrationRow) -> Result<Self, Self::Error> {
        let detail = match value.registration_type.as_str() {
            REGISTRATION_TYPE_INDIVIDUAL => match (value.name, value.email, value.phone) {
                (Some(name), Some(email), Some(phone)) => {
                    RegistrationDetail::Individual(ContactInfo { name, email, phone })
                }
                _ => {
                    return Err(AppError::ConversionEntityError(
                        "individual registration is missing contact columns".into(),
                    ))
                }
            },
            REGISTRATION_TYPE_TEAM => match (value.team_id, value.team_name, value.participants) {
                (Some(team_id), Some(team_name), Some(Json(participants))) => {
                    RegistrationDetail::Team {
                        team_id,
                        team_name,
                        participants,
                    }
                }
                _ => {
                    return Err(AppError::ConversionEntityError(
                        "team registration is missing team columns".into(),
                    ))
                }
            },
            other => {
                return Err(AppError::ConversionEntityError(format!(
                    "unknown registration type: {other}"
                )))
            }
        };
        Ok(Registration {
            registration_id: value.registration_id,
            event_id: value.event_id,
            user_id: value.user_id,
            registered_at: value.registered_at,
            detail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn individual_row() -> RegistrationRow {
        RegistrationRow {
            registration_id: RegistrationId::new(),
            event_id: EventId::new(),
            user_id: UserId::new(),
            registration_type: REGISTRATION_TYPE_INDIVIDUAL.into(),
            name: Some("Asha Rao".into()),
            email: Some("asha@example.com".into()),
            phone: Some("1234567890".into()),
            team_id: None,
            team_name: None,
            participants: None,
            registered_at: Utc::now(),
        }
    }

    #[test]
    fn individual_row_converts_to_individual_detail() {
        let registration = Registration::try_from(individual_row()).unwrap();
        assert_eq!(registration.seats(), 1);
        assert!(matches!(
            registration.detail,
            RegistrationDetail::Individual(_)
        ));
    }

    #[test]
    fn team_row_carries_the_participants_snapshot() {
        let mut row = individual_row();
        row.registration_type = REGISTRATION_TYPE_TEAM.into();
        row.team_id = Some(TeamId::new());
        row.team_name = Some("Rustaceans".into());
        row.participants = Some(Json(vec![
            ContactInfo {
                name: "Asha Rao".into(),
                email: "asha@example.com".into(),
                phone: "1234567890".into(),
            };
            3
        ]));
        let registration = Registration::try_from(row).unwrap();
        assert_eq!(registration.seats(), 3);
    }

    #[test]
    fn inconsistent_row_is_rejected() {
        let mut row = individual_row();
        row.phone = None;
        assert!(matches!(
            Registration::try_from(row),
            Err(AppError::ConversionEntityError(_))
        ));

        let mut row = individual_row();
        row.registration_type = "corporate".into();
        assert!(matches!(
            Registration::try_from(row),
            Err(AppError::ConversionEntityError(_))
        ));
    }
}
