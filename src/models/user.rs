use chrono::{DateTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Suffix appended to every derived referral code
pub const REFERRAL_CODE_SUFFIX: &str = "2025";

/// Referral code for a name: lowercased, whitespace stripped, suffixed.
pub fn derive_referral_code(name: &str) -> String {
    let mut code: String = name
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    code.push_str(REFERRAL_CODE_SUFFIX);
    code
}

/// User record as exchanged over HTTP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store id (hex). Absent on demo sample records.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub referral_code: String,
    #[serde(default)]
    pub total_donations: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Document stored in the `users` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub referral_code: String,
    #[serde(default)]
    pub total_donations: i64,
    pub created_at: BsonDateTime,
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        User {
            id: doc.id.map(|id| id.to_hex()),
            name: doc.name,
            email: doc.email,
            referral_code: doc.referral_code,
            total_donations: doc.total_donations,
            created_at: DateTime::from_timestamp_millis(doc.created_at.timestamp_millis()),
        }
    }
}

/// Fields of a user about to be persisted
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub referral_code: String,
    pub total_donations: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&NewUser> for UserDocument {
    fn from(user: &NewUser) -> Self {
        UserDocument {
            id: None,
            name: user.name.clone(),
            email: user.email.clone(),
            referral_code: user.referral_code.clone(),
            total_donations: user.total_donations,
            created_at: BsonDateTime::from_millis(user.created_at.timestamp_millis()),
        }
    }
}

/// Request body for POST /api/user
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Request body for PUT /api/user/{code}/donate
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DonateRequest {
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_users: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        Pagination {
            current_page: page,
            total_pages: total.div_ceil(limit),
            total_users: total,
            has_next: page.saturating_mul(limit) < total,
            has_prev: page > 1,
        }
    }

    /// Pagination describing a list that fits on one page
    pub fn single_page(page: u64, total: u64) -> Self {
        Pagination {
            current_page: page,
            total_pages: 1,
            total_users: total,
            has_next: false,
            has_prev: false,
        }
    }
}

/// Response body for GET /api/users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UsersPage {
    pub users: Vec<User>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_referral_code() {
        assert_eq!(derive_referral_code("John Doe"), "johndoe2025");
        assert_eq!(derive_referral_code("  Mary  Ann\tLee "), "maryannlee2025");
        assert_eq!(derive_referral_code("ÉLODIE"), "élodie2025");
    }

    #[test]
    fn test_user_json_uses_camel_case() {
        let user = User {
            id: None,
            name: "John Doe".into(),
            email: "john@example.com".into(),
            referral_code: "johndoe2025".into(),
            total_donations: 1234,
            created_at: None,
        };
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "John Doe",
                "email": "john@example.com",
                "referralCode": "johndoe2025",
                "totalDonations": 1234
            })
        );
    }

    #[test]
    fn test_document_conversion_keeps_timestamp() {
        let created_at = DateTime::from_timestamp_millis(1_736_899_200_123).unwrap();
        let new_user = NewUser {
            name: "Alice Smith".into(),
            email: "alice@example.com".into(),
            referral_code: "alicesmith2025".into(),
            total_donations: 10,
            created_at,
        };
        let mut doc = UserDocument::from(&new_user);
        doc.id = Some(ObjectId::new());
        let user = User::from(doc);
        assert_eq!(user.created_at, Some(created_at));
        assert_eq!(user.id.map(|id| id.len()), Some(24));
    }

    #[test]
    fn test_pagination_metadata() {
        let p = Pagination::new(1, 50, 120);
        assert_eq!((p.total_pages, p.has_next, p.has_prev), (3, true, false));

        let p = Pagination::new(3, 50, 120);
        assert_eq!((p.total_pages, p.has_next, p.has_prev), (3, false, true));

        let p = Pagination::new(2, 10, 20);
        assert!(!p.has_next);

        let p = Pagination::new(1, 50, 0);
        assert_eq!(p.total_pages, 0);
    }
}
