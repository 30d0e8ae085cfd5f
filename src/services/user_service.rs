use crate::{
    models::{
        derive_referral_code, fallback_user, sample_leaderboard, sample_users, CreateUserRequest,
        NewUser, Pagination, User, UsersPage,
    },
    store::UserStore,
    utils::AppError,
};
use rand::Rng;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 50;
pub const LEADERBOARD_SIZE: u64 = 10;
/// Upper bound (exclusive) of the initial donation total
pub const MAX_INITIAL_DONATIONS: i64 = 2000;

/// GET /api/user/{code}
///
/// Outside demo mode an absent or unknown code is a not-found error; in demo
/// mode it yields the fallback record.
pub async fn get_user(
    store: &dyn UserStore,
    code: Option<&str>,
    demo_mode: bool,
) -> Result<User, AppError> {
    if let Some(code) = code {
        if let Some(user) = store.find_by_referral_code(code).await? {
            return Ok(user);
        }
    }

    if demo_mode {
        log::debug!("🎭 Demo mode: serving fallback user for {:?}", code);
        return Ok(fallback_user());
    }

    Err(AppError::NotFound(match code {
        Some(code) => format!("No user with referral code '{}'", code),
        None => "User not found".to_string(),
    }))
}

pub async fn create_user(store: &dyn UserStore, request: &CreateUserRequest) -> Result<User, AppError> {
    let name = required_field(request.name.as_deref(), "name")?;
    let email = required_field(request.email.as_deref(), "email")?;

    let referral_code = derive_referral_code(name);

    if store.find_by_referral_code(&referral_code).await?.is_some() {
        return Err(AppError::conflict("referralCode", &referral_code));
    }
    if store.find_by_email(email).await?.is_some() {
        return Err(AppError::conflict("email", email));
    }

    let total_donations = rand::thread_rng().gen_range(0..MAX_INITIAL_DONATIONS);

    store
        .insert(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            referral_code,
            total_donations,
            created_at: chrono::Utc::now(),
        })
        .await
}

fn required_field<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, AppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::InvalidRequest(format!("{} is required", field))),
    }
}

/// Lenient page/limit parsing: missing, non-numeric or < 1 falls back to
/// the default.
pub fn parse_positive(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v >= 1)
        .unwrap_or(default)
}

pub async fn list_users(
    store: &dyn UserStore,
    page: u64,
    limit: u64,
    demo_mode: bool,
) -> Result<UsersPage, AppError> {
    let total = store.count().await?;

    if total == 0 && demo_mode {
        let users = sample_users();
        let pagination = Pagination::single_page(page, users.len() as u64);
        return Ok(UsersPage { users, pagination });
    }

    // Past the last record there is nothing to fetch
    let skip = page.saturating_sub(1).saturating_mul(limit);
    let users = if skip >= total {
        Vec::new()
    } else {
        store.list_newest(skip, limit).await?
    };

    Ok(UsersPage {
        users,
        pagination: Pagination::new(page, limit, total),
    })
}

pub async fn leaderboard(store: &dyn UserStore, demo_mode: bool) -> Result<Vec<User>, AppError> {
    let users = store.top_donors(LEADERBOARD_SIZE).await?;

    if users.is_empty() && demo_mode {
        return Ok(sample_leaderboard());
    }

    Ok(users)
}

pub async fn add_donation(store: &dyn UserStore, code: &str, amount: i64) -> Result<User, AppError> {
    store
        .increment_donations(code, amount)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}
