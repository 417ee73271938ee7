//! Storage backends. All of them do the identical thing; which one runs is
//! decided at startup from `DATABASE_URL` (SQLite file when unset).

mod memory;
mod postgres;
mod sqlite;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use sqlite::SqliteStore;

use crate::errors::{AppError, Result};
use crate::models::{AdoptionRequest, FoodRequest, Listing, Notification, Pickup};

#[derive(Clone)]
pub enum Store {
    Postgres(PgStore),
    Sqlite(SqliteStore),
    Memory(MemoryStore),
}

/// Every table at one point in time, used to derive the map overview
#[derive(Debug, Default)]
pub struct Snapshot {
    pub listings: Vec<Listing>,
    pub requests: Vec<AdoptionRequest>,
    pub pickups: Vec<Pickup>,
    pub food_requests: Vec<FoodRequest>,
}

impl Store {
    pub fn backend_name(&self) -> &'static str {
        match self {
            Store::Postgres(_) => "postgres",
            Store::Sqlite(_) => "sqlite",
            Store::Memory(_) => "memory",
        }
    }

    pub async fn ping(&self) -> Result<()> {
        match self {
            Store::Postgres(store) => store.ping().await,
            Store::Sqlite(store) => store.ping().await,
            Store::Memory(_) => Ok(()),
        }
    }

    pub async fn list_listings(&self) -> Result<Vec<Listing>> {
        match self {
            Store::Postgres(store) => store.list_listings().await,
            Store::Sqlite(store) => store.list_listings().await,
            Store::Memory(store) => Ok(store.list_listings()),
        }
    }

    pub async fn insert_listing(&self, listing: &Listing) -> Result<()> {
        match self {
            Store::Postgres(store) => store.insert_listing(listing).await,
            Store::Sqlite(store) => store.insert_listing(listing).await,
            Store::Memory(store) => store.insert_listing(listing),
        }
    }

    pub async fn list_requests(&self) -> Result<Vec<AdoptionRequest>> {
        match self {
            Store::Postgres(store) => store.list_requests().await,
            Store::Sqlite(store) => store.list_requests().await,
            Store::Memory(store) => Ok(store.list_requests()),
        }
    }

    /// Inserts the request and, when the listing exists, a notification for
    /// its owner. Both writes land together or not at all.
    pub async fn insert_request(&self, request: &AdoptionRequest) -> Result<Option<Notification>> {
        match self {
            Store::Postgres(store) => store.insert_request(request).await,
            Store::Sqlite(store) => store.insert_request(request).await,
            Store::Memory(store) => store.insert_request(request),
        }
    }

    pub async fn list_pickups(&self) -> Result<Vec<Pickup>> {
        match self {
            Store::Postgres(store) => store.list_pickups().await,
            Store::Sqlite(store) => store.list_pickups().await,
            Store::Memory(store) => Ok(store.list_pickups()),
        }
    }

    pub async fn insert_pickup(&self, pickup: &Pickup) -> Result<()> {
        match self {
            Store::Postgres(store) => store.insert_pickup(pickup).await,
            Store::Sqlite(store) => store.insert_pickup(pickup).await,
            Store::Memory(store) => store.insert_pickup(pickup),
        }
    }

    pub async fn list_food_requests(&self) -> Result<Vec<FoodRequest>> {
        match self {
            Store::Postgres(store) => store.list_food_requests().await,
            Store::Sqlite(store) => store.list_food_requests().await,
            Store::Memory(store) => Ok(store.list_food_requests()),
        }
    }

    pub async fn insert_food_request(&self, food_request: &FoodRequest) -> Result<()> {
        match self {
            Store::Postgres(store) => store.insert_food_request(food_request).await,
            Store::Sqlite(store) => store.insert_food_request(food_request).await,
            Store::Memory(store) => store.insert_food_request(food_request),
        }
    }

    /// Newest first, optionally only those addressed to `contact`
    pub async fn list_notifications(&self, contact: Option<&str>) -> Result<Vec<Notification>> {
        match self {
            Store::Postgres(store) => store.list_notifications(contact).await,
            Store::Sqlite(store) => store.list_notifications(contact).await,
            Store::Memory(store) => Ok(store.list_notifications(contact)),
        }
    }

    pub async fn mark_notifications_read(&self, ids: &[String]) -> Result<()> {
        match self {
            Store::Postgres(store) => store.mark_notifications_read(ids).await,
            Store::Sqlite(store) => store.mark_notifications_read(ids).await,
            Store::Memory(store) => {
                store.mark_notifications_read(ids);
                Ok(())
            }
        }
    }

    pub async fn snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            listings: self.list_listings().await?,
            requests: self.list_requests().await?,
            pickups: self.list_pickups().await?,
            food_requests: self.list_food_requests().await?,
        })
    }
}

/// Maps a primary key clash to a 409, anything else stays a database error
pub(super) fn insert_error(entity: &str, id: &str, err: sqlx::Error) -> AppError {
    let duplicate = err
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);

    if duplicate {
        AppError::Conflict(format!("A {} with id '{}' already exists", entity, id))
    } else {
        AppError::Database(err)
    }
}
