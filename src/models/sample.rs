//! Fixed records served in demo mode when the store has nothing to show.

use super::user::{derive_referral_code, User};
use chrono::{DateTime, NaiveDate, Utc};

fn sample_date(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}

fn sample_user(name: &str, email: &str, total_donations: i64, created_at: Option<DateTime<Utc>>) -> User {
    User {
        id: None,
        name: name.to_string(),
        email: email.to_string(),
        referral_code: derive_referral_code(name),
        total_donations,
        created_at,
    }
}

/// Placeholder returned by a lookup that found nothing
pub fn fallback_user() -> User {
    sample_user("John Doe", "john@example.com", 1234, None)
}

/// Six sample users, oldest first
pub fn sample_users() -> Vec<User> {
    vec![
        sample_user("Alice Smith", "alice@example.com", 2500, sample_date(2025, 1, 15)),
        sample_user("John Doe", "john@example.com", 1234, sample_date(2025, 1, 20)),
        sample_user("Bob Johnson", "bob@example.com", 900, sample_date(2025, 1, 25)),
        sample_user("Sarah Wilson", "sarah@example.com", 750, sample_date(2025, 1, 30)),
        sample_user("Mike Davis", "mike@example.com", 1800, sample_date(2025, 2, 1)),
        sample_user("Emma Brown", "emma@example.com", 650, sample_date(2025, 2, 5)),
    ]
}

/// The sample users in leaderboard order (literal, not sorted at runtime)
pub fn sample_leaderboard() -> Vec<User> {
    vec![
        sample_user("Alice Smith", "alice@example.com", 2500, sample_date(2025, 1, 15)),
        sample_user("Mike Davis", "mike@example.com", 1800, sample_date(2025, 2, 1)),
        sample_user("John Doe", "john@example.com", 1234, sample_date(2025, 1, 20)),
        sample_user("Bob Johnson", "bob@example.com", 900, sample_date(2025, 1, 25)),
        sample_user("Sarah Wilson", "sarah@example.com", 750, sample_date(2025, 1, 30)),
        sample_user("Emma Brown", "emma@example.com", 650, sample_date(2025, 2, 5)),
    ]
}
