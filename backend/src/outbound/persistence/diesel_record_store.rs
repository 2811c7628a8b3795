//! PostgreSQL-backed [`RecordStore`] using Diesel.
//!
//! Scans are ordered by the `created_at` column the database stamps on
//! insert, so listings follow insertion order like the in-memory adapter.
//! Writes are plain inserts: a taken primary key, email, or secret code
//! surfaces as [`RecordStoreError::Conflict`] naming the field.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{
    ComplaintFieldUpdate, ComplaintPredicate, RecordStore, RecordStoreError, UniqueField,
    UserFieldUpdate, UserPredicate,
};
use crate::domain::{Complaint, ComplaintId, User, UserId};

use super::models::{ComplaintRow, NewComplaintRow, NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{complaints, users};

/// Diesel implementation of the [`RecordStore`] port.
#[derive(Clone)]
pub struct DieselRecordStore {
    pool: DbPool,
}

impl DieselRecordStore {
    /// Create a store that checks connections out of `pool` per call.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecordStoreError {
    RecordStoreError::connection(error.message())
}

/// Field guarded by a named constraint from the embedded migrations.
fn unique_field(constraint: &str) -> Option<UniqueField> {
    match constraint {
        "users_pkey" | "complaints_pkey" => Some(UniqueField::Id),
        "users_email_key" => Some(UniqueField::Email),
        "users_secret_code_key" => Some(UniqueField::SecretCode),
        _ => None,
    }
}

fn map_diesel_error(error: diesel::result::Error) -> RecordStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            let constraint = info.constraint_name().unwrap_or("unique constraint");
            match unique_field(constraint) {
                Some(field) => RecordStoreError::conflict(field, format!("{constraint} violated")),
                None => RecordStoreError::query(format!("unexpected {constraint} violation")),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            RecordStoreError::connection("database connection error")
        }
        DieselError::NotFound => RecordStoreError::query("record not found"),
        DieselError::QueryBuilderError(_) => RecordStoreError::query("database query error"),
        _ => RecordStoreError::query("database error"),
    }
}

#[async_trait]
impl RecordStore for DieselRecordStore {
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .find(id.as_str())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(User::try_from).transpose()
    }

    async fn put_user(&self, user: &User) -> Result<(), RecordStoreError> {
        let row = NewUserRow::from(user);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn scan_users(&self, predicate: &UserPredicate) -> Result<Vec<User>, RecordStoreError> {
        let mut query = users::table
            .select(UserRow::as_select())
            .order((users::created_at.asc(), users::id.asc()))
            .into_boxed();
        match predicate {
            UserPredicate::All => {}
            UserPredicate::Email(email) => {
                query = query.filter(users::email.eq(email.as_str().to_owned()));
            }
            UserPredicate::SecretCode(secret) => {
                query = query.filter(users::secret_code.eq(secret.expose().to_owned()));
            }
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(User::try_from).collect()
    }

    async fn update_user(
        &self,
        id: &UserId,
        update: &UserFieldUpdate,
    ) -> Result<(), RecordStoreError> {
        let UserFieldUpdate::AppendComplaintId(complaint_id) = update;
        let key = id.as_str().to_owned();
        let appended = complaint_id.as_str().to_owned();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let found = conn
            .transaction(|conn| {
                async move {
                    let current: Option<Vec<String>> = users::table
                        .find(key.as_str())
                        .select(users::complaint_ids)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(mut complaint_ids) = current else {
                        return Ok(false);
                    };
                    if complaint_ids.contains(&appended) {
                        return Ok(true);
                    }
                    complaint_ids.push(appended);
                    diesel::update(users::table.find(key.as_str()))
                        .set(users::complaint_ids.eq(complaint_ids))
                        .execute(conn)
                        .await?;
                    Ok(true)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        if found {
            Ok(())
        } else {
            Err(RecordStoreError::missing_record("users", id.as_str()))
        }
    }

    async fn find_complaint(
        &self,
        id: &ComplaintId,
    ) -> Result<Option<Complaint>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = complaints::table
            .find(id.as_str())
            .select(ComplaintRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Complaint::try_from).transpose()
    }

    async fn put_complaint(&self, complaint: &Complaint) -> Result<(), RecordStoreError> {
        let row = NewComplaintRow::from(complaint);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(complaints::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn scan_complaints(
        &self,
        predicate: &ComplaintPredicate,
    ) -> Result<Vec<Complaint>, RecordStoreError> {
        let mut query = complaints::table
            .select(ComplaintRow::as_select())
            .order((complaints::created_at.asc(), complaints::id.asc()))
            .into_boxed();
        if let ComplaintPredicate::Ids(ids) = predicate {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            let keys: Vec<String> = ids.iter().map(|id| id.as_str().to_owned()).collect();
            query = query.filter(complaints::id.eq_any(keys));
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ComplaintRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(Complaint::try_from).collect()
    }

    async fn update_complaint(
        &self,
        id: &ComplaintId,
        update: &ComplaintFieldUpdate,
    ) -> Result<(), RecordStoreError> {
        let ComplaintFieldUpdate::Resolved = update;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(complaints::table.find(id.as_str()))
            .set(complaints::resolved.eq(true))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(RecordStoreError::missing_record("complaints", id.as_str()));
        }
        Ok(())
    }
}
