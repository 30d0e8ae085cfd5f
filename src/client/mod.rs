//! Presentation client: HTTP access to the directory, the signed-in session
//! and the list/dashboard projections.

pub mod api_client;
pub mod session;
pub mod views;

pub use api_client::{ApiClient, ClientError, DEFAULT_API_URL};
pub use session::{Session, SessionStore};
pub use views::{reward_progress, DirectoryStats, ListQuery, Reward, SortKey, REWARDS};
