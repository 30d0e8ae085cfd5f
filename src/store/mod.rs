//! Persistence port for user records.
//!
//! The service talks to the store only through [`UserStore`]; MongoDB backs it
//! in production (`database::MongoUserStore`) and [`MemoryUserStore`] in tests
//! or when no database is wanted.

pub mod memory;

pub use memory::MemoryUserStore;

use crate::models::{NewUser, User};
use crate::utils::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_referral_code(&self, code: &str) -> Result<Option<User>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Persist a new record and return it with its assigned id.
    async fn insert(&self, user: NewUser) -> Result<User, AppError>;

    /// Records ordered by creation time, newest first.
    async fn list_newest(&self, skip: u64, limit: u64) -> Result<Vec<User>, AppError>;

    async fn count(&self) -> Result<u64, AppError>;

    /// Records ordered by donation total, highest first. Equal totals keep
    /// store order.
    async fn top_donors(&self, limit: u64) -> Result<Vec<User>, AppError>;

    /// Atomically add `amount` to the record's total. `None` when no record
    /// has the code.
    async fn increment_donations(&self, code: &str, amount: i64) -> Result<Option<User>, AppError>;
}
