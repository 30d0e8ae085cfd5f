use crate::models::{NewUser, User, UserDocument};
use crate::store::UserStore;
use crate::utils::AppError;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};
use std::error::Error;
use std::time::Duration;

pub const DEFAULT_DATABASE: &str = "refrel-system";
pub const USERS_COLLECTION: &str = "users";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    /// Builds the client without touching the network. Fails only on a
    /// malformed URI; reachability is checked by [`MongoDB::ping`].
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(Duration::from_secs(300));

        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        // Database name comes from the URI path
        let db_name = client_options
            .default_database
            .clone()
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&db_name);

        Ok(Self { db })
    }

    pub async fn ping(&self) -> Result<(), mongodb::error::Error> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    /// Unique indexes backing the referral code and email invariants
    pub async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        log::info!("🔧 Creating database indexes...");

        let users = self.collection::<UserDocument>(USERS_COLLECTION);

        for field in ["referralCode", "email"] {
            let index = IndexModel::builder()
                .keys(index_keys(field, 1))
                .options(IndexOptions::builder().unique(true).build())
                .build();

            match users.create_index(index).await {
                Ok(_) => log::info!("   ✅ Index ready: users({}) unique", field),
                Err(e) => {
                    log::error!("   ❌ Failed to create index users({}): {}", field, e);
                    return Err(Box::new(e));
                }
            }
        }

        // createdAt and totalDonations back the list and leaderboard sorts
        for field in ["createdAt", "totalDonations"] {
            let index = IndexModel::builder().keys(index_keys(field, -1)).build();
            match users.create_index(index).await {
                Ok(_) => log::info!("   ✅ Index ready: users({})", field),
                Err(e) => log::debug!("   ℹ️  Index users({}) skipped: {}", field, e),
            }
        }

        log::info!("✅ Database indexes ready");
        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn user_store(&self) -> MongoUserStore {
        MongoUserStore {
            users: self.collection(USERS_COLLECTION),
        }
    }
}

fn index_keys(field: &str, direction: i32) -> Document {
    let mut keys = Document::new();
    keys.insert(field, direction);
    keys
}

/// [`UserStore`] over the `users` collection
#[derive(Clone)]
pub struct MongoUserStore {
    users: Collection<UserDocument>,
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn find_by_referral_code(&self, code: &str) -> Result<Option<User>, AppError> {
        let found = self.users.find_one(doc! { "referralCode": code }).await?;
        Ok(found.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let found = self.users.find_one(doc! { "email": email }).await?;
        Ok(found.map(User::from))
    }

    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let mut document = UserDocument::from(&user);
        let result = self.users.insert_one(&document).await?;
        document.id = result.inserted_id.as_object_id();
        Ok(User::from(document))
    }

    async fn list_newest(&self, skip: u64, limit: u64) -> Result<Vec<User>, AppError> {
        let cursor = self
            .users
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .skip(skip)
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .await?;
        let documents: Vec<UserDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(User::from).collect())
    }

    async fn count(&self) -> Result<u64, AppError> {
        Ok(self.users.count_documents(doc! {}).await?)
    }

    async fn top_donors(&self, limit: u64) -> Result<Vec<User>, AppError> {
        let cursor = self
            .users
            .find(doc! {})
            .sort(doc! { "totalDonations": -1 })
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .await?;
        let documents: Vec<UserDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(User::from).collect())
    }

    async fn increment_donations(&self, code: &str, amount: i64) -> Result<Option<User>, AppError> {
        let updated = self
            .users
            .find_one_and_update(
                doc! { "referralCode": code },
                doc! { "$inc": { "totalDonations": amount } },
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated.map(User::from))
    }
}
