//! Projections the leaderboard, directory and dashboard views render.
//! Everything here works on the records already fetched; nothing hits the
//! network.

use crate::models::User;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Donation total, highest first
    Highest,
    /// Donation total, lowest first
    Lowest,
    /// Name, case-insensitive
    Name,
    /// Creation time, oldest first
    Oldest,
    /// Creation time, newest first
    #[default]
    Newest,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Newest,
        SortKey::Oldest,
        SortKey::Highest,
        SortKey::Lowest,
        SortKey::Name,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Highest => "highest",
            SortKey::Lowest => "lowest",
            SortKey::Name => "name",
            SortKey::Oldest => "oldest",
            SortKey::Newest => "newest",
        }
    }

    fn compare(&self, a: &User, b: &User) -> Ordering {
        match self {
            SortKey::Highest => b.total_donations.cmp(&a.total_donations),
            SortKey::Lowest => a.total_donations.cmp(&b.total_donations),
            SortKey::Name => a
                .name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name)),
            SortKey::Oldest => a.created_at.cmp(&b.created_at),
            SortKey::Newest => b.created_at.cmp(&a.created_at),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<&str> = SortKey::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown sort '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

/// Search term and sort order of a list view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub search: String,
    pub sort: SortKey,
}

impl ListQuery {
    pub fn new(search: impl Into<String>, sort: SortKey) -> Self {
        Self {
            search: search.into(),
            sort,
        }
    }

    /// Case-insensitive substring match on name, email or referral code.
    /// An empty term matches everything.
    pub fn matches(&self, user: &User) -> bool {
        let needle = self.search.to_lowercase();
        [&user.name, &user.email, &user.referral_code]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Filter first, then a stable sort
    pub fn apply(&self, users: &[User]) -> Vec<User> {
        let mut filtered: Vec<User> = users.iter().filter(|u| self.matches(u)).cloned().collect();
        filtered.sort_by(|a, b| self.sort.compare(a, b));
        filtered
    }
}

/// Summary over the loaded page only
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryStats {
    pub total_users: usize,
    pub total_donations: i64,
    /// Mean donation, rounded to the nearest integer
    pub average_donations: i64,
    pub top_donor: Option<User>,
}

impl DirectoryStats {
    pub fn from_users(users: &[User]) -> Self {
        let total_users = users.len();
        // Totals are unbounded; sum wide and saturate back into i64
        let sum: i128 = users.iter().map(|u| i128::from(u.total_donations)).sum();
        let total_donations = saturate(sum);
        let average_donations = if total_users > 0 {
            // Half rounds up
            let n = total_users as i128;
            saturate((2 * sum + n).div_euclid(2 * n))
        } else {
            0
        };

        // First strictly-greater total wins, starting from zero
        let top_donor = users
            .iter()
            .fold(None::<&User>, |best, user| {
                let best_total = best.map_or(0, |b| b.total_donations);
                if user.total_donations > best_total {
                    Some(user)
                } else {
                    best
                }
            })
            .cloned();

        DirectoryStats {
            total_users,
            total_donations,
            average_donations,
            top_donor,
        }
    }
}

fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

/// Dashboard reward tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reward {
    pub title: &'static str,
    pub description: &'static str,
    pub threshold: i64,
}

pub const REWARDS: [Reward; 5] = [
    Reward { title: "Welcome Badge", description: "Join the platform", threshold: 0 },
    Reward { title: "Bronze Referrer", description: "Raise $500", threshold: 500 },
    Reward { title: "Silver Champion", description: "Raise $1000", threshold: 1000 },
    Reward { title: "Gold Master", description: "Raise $2000", threshold: 2000 },
    Reward { title: "Diamond Elite", description: "Raise $5000", threshold: 5000 },
];

impl Reward {
    pub fn is_unlocked(&self, total_donations: i64) -> bool {
        total_donations >= self.threshold
    }
}

/// Every tier with its unlock state for a donation total
pub fn reward_progress(total_donations: i64) -> Vec<(Reward, bool)> {
    REWARDS
        .iter()
        .map(|reward| (*reward, reward.is_unlocked(total_donations)))
        .collect()
}
