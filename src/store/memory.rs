use super::UserStore;
use crate::models::{NewUser, User};
use crate::utils::AppError;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-process store keeping records in insertion order.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<User>>, AppError> {
        self.users
            .read()
            .map_err(|e| AppError::DatabaseError(format!("memory store poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<User>>, AppError> {
        self.users
            .write()
            .map_err(|e| AppError::DatabaseError(format!("memory store poisoned: {}", e)))
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_referral_code(&self, code: &str) -> Result<Option<User>, AppError> {
        Ok(self.read()?.iter().find(|u| u.referral_code == code).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.read()?.iter().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let mut users = self.write()?;

        // Same guarantees as the unique indexes on the Mongo collection
        if users.iter().any(|u| u.referral_code == user.referral_code) {
            return Err(AppError::conflict("referralCode", &user.referral_code));
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::conflict("email", &user.email));
        }

        let record = User {
            id: Some(ObjectId::new().to_hex()),
            name: user.name,
            email: user.email,
            referral_code: user.referral_code,
            total_donations: user.total_donations,
            created_at: Some(user.created_at),
        };
        users.push(record.clone());
        Ok(record)
    }

    async fn list_newest(&self, skip: u64, limit: u64) -> Result<Vec<User>, AppError> {
        let mut users = self.read()?.clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect())
    }

    async fn count(&self) -> Result<u64, AppError> {
        Ok(self.read()?.len() as u64)
    }

    async fn top_donors(&self, limit: u64) -> Result<Vec<User>, AppError> {
        let mut users = self.read()?.clone();
        // Stable sort: ties stay in insertion order
        users.sort_by(|a, b| b.total_donations.cmp(&a.total_donations));
        users.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(users)
    }

    async fn increment_donations(&self, code: &str, amount: i64) -> Result<Option<User>, AppError> {
        let mut users = self.write()?;
        Ok(users.iter_mut().find(|u| u.referral_code == code).map(|user| {
            user.total_donations = user.total_donations.wrapping_add(amount);
            user.clone()
        }))
    }
}
