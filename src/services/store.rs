use chrono::Utc;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::AppError;
use crate::models::destination::{Destination, NewDestination};
use crate::models::trip::{NewTrip, Trip, TripChanges};
use crate::models::user::{NewUser, User, UserChanges};

/// All database access behind one handle. Every mutation is a single
/// statement, so a failed request never leaves half a write behind.
#[derive(Clone)]
pub struct Store {
    pool: DbPool,
}

impl Store {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create_trip(&self, trip: &NewTrip) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO trips (id, name, start_date, end_date, destination_id) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(trip.id.to_string())
        .bind(&trip.name)
        .bind(trip.start_date.to_string())
        .bind(trip.end_date.to_string())
        .bind(trip.destination_id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_trip(&self, id: &Uuid) -> Result<Trip, AppError> {
        let trip = sqlx::query_as::<_, Trip>(
            "SELECT id, name, start_date, end_date, destination_id FROM trips WHERE id = ?1",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        trip.ok_or(AppError::NotFound)
    }

    pub async fn list_trips(&self) -> Result<Vec<Trip>, AppError> {
        let trips = sqlx::query_as::<_, Trip>(
            "SELECT id, name, start_date, end_date, destination_id FROM trips",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(trips)
    }

    pub async fn trips_by_destination(
        &self,
        destination_id: &Uuid,
    ) -> Result<Vec<Trip>, AppError> {
        let trips = sqlx::query_as::<_, Trip>(
            "SELECT id, name, start_date, end_date, destination_id FROM trips \
             WHERE destination_id = ?1",
        )
        .bind(destination_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        Ok(trips)
    }

    /// Applies only the submitted fields. COALESCE keeps the stored value
    /// wherever the bound parameter is NULL, so the untouched columns never
    /// leave the database.
    pub async fn update_trip(&self, id: &Uuid, changes: &TripChanges) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE trips SET \
                name = COALESCE(?1, name), \
                start_date = COALESCE(?2, start_date), \
                end_date = COALESCE(?3, end_date), \
                destination_id = COALESCE(?4, destination_id) \
             WHERE id = ?5",
        )
        .bind(&changes.name)
        .bind(changes.start_date.map(|d| d.to_string()))
        .bind(changes.end_date.map(|d| d.to_string()))
        .bind(changes.destination_id.map(|d| d.to_string()))
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    pub async fn delete_trip(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM trips WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    pub async fn create_destination(&self, destination: &NewDestination) -> Result<(), AppError> {
        sqlx::query("INSERT INTO destinations (id, name) VALUES (?1, ?2)")
            .bind(destination.id.to_string())
            .bind(&destination.name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn list_destinations(&self) -> Result<Vec<Destination>, AppError> {
        let destinations =
            sqlx::query_as::<_, Destination>("SELECT id, name FROM destinations")
                .fetch_all(&self.pool)
                .await?;
        Ok(destinations)
    }

    pub async fn create_user(&self, user: &NewUser, password_hash: &str) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO users (email, name, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(password_hash)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_user(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, password_hash, admin, owner FROM users WHERE email = ?1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// The presented token's address is the row key. A token whose address
    /// no longer matches any row updates nothing, and that is not an error:
    /// the caller still gets a fresh token either way.
    pub async fn update_user(&self, email: &str, changes: &UserChanges) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE users SET email = COALESCE(?1, email), name = COALESCE(?2, name) \
             WHERE email = ?3",
        )
        .bind(&changes.email)
        .bind(&changes.name)
        .bind(email)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
