use sqlx::PgPool;
use tracing::info;

use crate::errors::Result;
use crate::models::{AdoptionRequest, FoodRequest, Listing, Notification, Pickup};

use super::insert_error;

const SELECT_LISTINGS: &str = r#"
    SELECT id, type, name, "desc", img, contact, lat, lng, created_at
    FROM listings
"#;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn list_listings(&self) -> Result<Vec<Listing>> {
        let query = format!("{SELECT_LISTINGS} ORDER BY created_at ASC");
        let listings = sqlx::query_as::<_, Listing>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(listings)
    }

    pub async fn insert_listing(&self, listing: &Listing) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO listings (id, type, name, "desc", img, contact, lat, lng, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&listing.id)
        .bind(&listing.animal_type)
        .bind(&listing.name)
        .bind(&listing.desc)
        .bind(&listing.img)
        .bind(&listing.contact)
        .bind(listing.lat)
        .bind(listing.lng)
        .bind(listing.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error("listing", &listing.id, e))?;

        Ok(())
    }

    pub async fn list_requests(&self) -> Result<Vec<AdoptionRequest>> {
        let requests = sqlx::query_as::<_, AdoptionRequest>(
            r#"
            SELECT id, listing_id, message, contact, lat, lng, created_at
            FROM requests
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    pub async fn insert_request(&self, request: &AdoptionRequest) -> Result<Option<Notification>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO requests (id, listing_id, message, contact, lat, lng, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&request.id)
        .bind(&request.listing_id)
        .bind(&request.message)
        .bind(&request.contact)
        .bind(request.lat)
        .bind(request.lng)
        .bind(request.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| insert_error("request", &request.id, e))?;

        let query = format!("{SELECT_LISTINGS} WHERE id = $1");
        let listing = sqlx::query_as::<_, Listing>(&query)
            .bind(&request.listing_id)
            .fetch_optional(&mut *tx)
            .await?;

        let notification = listing.map(|listing| Notification::adoption_request(&listing, request));

        if let Some(notification) = &notification {
            sqlx::query(
                r#"
                INSERT INTO notifications (id, user_contact, message, created_at, read)
                VALUES ($1, $2, $3, $4, 0)
                "#,
            )
            .bind(&notification.id)
            .bind(&notification.user_contact)
            .bind(&notification.message)
            .bind(notification.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        if notification.is_some() {
            info!("📬 Notified owner of listing {} about request {}", request.listing_id, request.id);
        }
        Ok(notification)
    }

    pub async fn list_pickups(&self) -> Result<Vec<Pickup>> {
        let pickups = sqlx::query_as::<_, Pickup>(
            r#"
            SELECT id, request_id, date, "time", contact, lat, lng, created_at
            FROM pickups
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(pickups)
    }

    pub async fn insert_pickup(&self, pickup: &Pickup) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO pickups (id, request_id, date, "time", contact, lat, lng, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&pickup.id)
        .bind(&pickup.request_id)
        .bind(&pickup.date)
        .bind(&pickup.time)
        .bind(&pickup.contact)
        .bind(pickup.lat)
        .bind(pickup.lng)
        .bind(pickup.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error("pickup", &pickup.id, e))?;

        Ok(())
    }

    pub async fn list_food_requests(&self) -> Result<Vec<FoodRequest>> {
        let food_requests = sqlx::query_as::<_, FoodRequest>(
            r#"
            SELECT id, animal, kind, qty, contact, lat, lng, created_at
            FROM food_requests
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(food_requests)
    }

    pub async fn insert_food_request(&self, food_request: &FoodRequest) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO food_requests (id, animal, kind, qty, contact, lat, lng, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&food_request.id)
        .bind(&food_request.animal)
        .bind(&food_request.kind)
        .bind(&food_request.qty)
        .bind(&food_request.contact)
        .bind(food_request.lat)
        .bind(food_request.lng)
        .bind(food_request.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error("food request", &food_request.id, e))?;

        Ok(())
    }

    pub async fn list_notifications(&self, contact: Option<&str>) -> Result<Vec<Notification>> {
        let notifications = match contact {
            Some(contact) => {
                sqlx::query_as::<_, Notification>(
                    r#"
                    SELECT id, user_contact, message, created_at, read
                    FROM notifications
                    WHERE user_contact = $1
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(contact)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Notification>(
                    r#"
                    SELECT id, user_contact, message, created_at, read
                    FROM notifications
                    ORDER BY created_at DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(notifications)
    }

    pub async fn mark_notifications_read(&self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        sqlx::query("UPDATE notifications SET read = 1 WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
