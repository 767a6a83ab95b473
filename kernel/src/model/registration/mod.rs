pub mod event;

use crate::model::id::{EventId, RegistrationId, TeamId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 登録時点の連絡先スナップショット。イベント削除までこの値を保持する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl ContactInfo {
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.phone.trim().is_empty()
    }

    /// 電話番号から数字以外を取り除いた結果がちょうど 10 桁であれば返す
    pub fn normalized_phone(&self) -> Option<String> {
        let digits: String = self.phone.chars().filter(char::is_ascii_digit).collect();
        (digits.len() == 10).then_some(digits)
    }
}

#[derive(Debug)]
pub struct Registration {
    pub registration_id: RegistrationId,
    pub event_id: EventId,
    pub user_id: UserId,
    pub registered_at: DateTime<Utc>,
    pub detail: RegistrationDetail,
}

/// type タグで分岐する多相な登録内容
#[derive(Debug)]
pub enum RegistrationDetail {
    Individual(ContactInfo),
    Team {
        team_id: TeamId,
        team_name: String,
        participants: Vec<ContactInfo>,
    },
}

impl Registration {
    /// この登録が占める人数。解除時は同じ人数分だけカウンタを戻す。
    pub fn seats(&self) -> i32 {
        match &self.detail {
            RegistrationDetail::Individual(_) => 1,
            RegistrationDetail::Team { participants, .. } => participants.len() as i32,
        }
    }

    pub fn team_id(&self) -> Option<TeamId> {
        match &self.detail {
            RegistrationDetail::Individual(_) => None,
            RegistrationDetail::Team { team_id, .. } => Some(*team_id),
        }
    }
}

/// 登録受付の結果。チーム登録では生成したチームの情報を呼び出し元へ返す。
#[derive(Debug)]
pub struct RegistrationReceipt {
    pub registration_id: RegistrationId,
    pub team_id: Option<TeamId>,
    pub team_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn contact(phone: &str) -> ContactInfo {
        ContactInfo {
            name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            phone: phone.into(),
        }
    }

    #[rstest]
    #[case("123-456-7890", Some("1234567890"))]
    #[case("(123) 456 7890", Some("1234567890"))]
    #[case("1234567890", Some("1234567890"))]
    #[case("12345", None)]
    #[case("123-456-78901", None)]
    #[case("", None)]
    fn phone_numbers_normalize_to_ten_digits(
        #[case] phone: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(
            contact(phone).normalized_phone().as_deref(),
            expected
        );
    }

    #[test]
    fn seats_follow_the_registration_shape() {
        let individual = Registration {
            registration_id: RegistrationId::new(),
            event_id: EventId::new(),
            user_id: UserId::new(),
            registered_at: Utc::now(),
            detail: RegistrationDetail::Individual(contact("1234567890")),
        };
        assert_eq!(individual.seats(), 1);
        assert_eq!(individual.team_id(), None);

        let team_id = TeamId::new();
        let team = Registration {
            registration_id: RegistrationId::new(),
            event_id: EventId::new(),
            user_id: UserId::new(),
            registered_at: Utc::now(),
            detail: RegistrationDetail::Team {
                team_id,
                team_name: "Rustaceans".into(),
                participants: vec![contact("1234567890"); 3],
            },
        };
        assert_eq!(team.seats(), 3);
        assert_eq!(team.team_id(), Some(team_id));
    }
}
