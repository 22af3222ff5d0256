//! Repository implementations

use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::application::errors::RepositoryError;
use crate::domain::{EmailAddress, User, UserId, UserProfile};

/// Repository trait for user data access
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Users ordered by id, skipping `skip` rows and returning at most `take`
    async fn list(&self, skip: i64, take: i64) -> Result<Vec<User>, RepositoryError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Case-insensitive lookup by email
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, RepositoryError>;

    /// Persist a new user; the store assigns the identifier
    async fn insert(&self, profile: &UserProfile) -> Result<User, RepositoryError>;

    /// Overwrite an existing row. Returns `false` if no row had that id.
    async fn update(&self, user: &User) -> Result<bool, RepositoryError>;

    /// Remove a row. Returns `false` if no row had that id.
    async fn delete(&self, id: UserId) -> Result<bool, RepositoryError>;
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    department: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId::new(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: EmailAddress::from_stored(row.email),
            department: row.department,
        }
    }
}

/// SQLite-backed user repository
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Translate a unique-constraint violation on the email key into a conflict
fn map_write_error(error: sqlx::Error, email: &EmailAddress) -> RepositoryError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => RepositoryError::DuplicateEmail {
            email: email.to_string(),
        },
        _ => RepositoryError::Database(error),
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn list(&self, skip: i64, take: i64) -> Result<Vec<User>, RepositoryError> {
        let rows: Vec<UserRow> = sqlx::query_as(
            "SELECT id, first_name, last_name, email, department FROM users ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(take)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), skip, take, "Fetched user page");
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, first_name, last_name, email, department FROM users WHERE id = ?",
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, first_name, last_name, email, department FROM users WHERE email_normalized = ?",
        )
        .bind(email.normalized())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn insert(&self, profile: &UserProfile) -> Result<User, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO users (first_name, last_name, email, email_normalized, department) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(profile.email.as_str())
        .bind(profile.email.normalized())
        .bind(&profile.department)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &profile.email))?;

        Ok(profile
            .clone()
            .into_user(UserId::new(result.last_insert_rowid())))
    }

    async fn update(&self, user: &User) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET first_name = ?, last_name = ?, email = ?, email_normalized = ?, department = ? WHERE id = ?",
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.email.as_str())
        .bind(user.email.normalized())
        .bind(&user.department)
        .bind(user.id.value())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &user.email))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
