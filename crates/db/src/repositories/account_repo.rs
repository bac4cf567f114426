//! Repository for the `accounts` table.
//!
//! Every lookup filters `deleted_at IS NULL`: a soft-deleted account is
//! non-existent as far as the rest of the system is concerned, but its row
//! (and everything cascading from it) is retained.

use sqlx::PgPool;
use vigil_core::types::DbId;

use crate::models::account::{Account, UpsertAccount};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, external_id, email, display_name, role, supervisor_id, \
                        deleted_at, created_at, updated_at";

/// Provides account lookup and role-assignment mutations.
pub struct AccountRepo;

impl AccountRepo {
    /// Insert an account, or revive/update it if the external id is already
    /// known (including soft-deleted rows: re-assigning a role undeletes).
    pub async fn upsert(pool: &PgPool, input: &UpsertAccount) -> Result<Account, sqlx::Error> {
        let query = format!(
            "INSERT INTO accounts (external_id, email, display_name, role, supervisor_id)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (external_id) DO UPDATE SET
                email = EXCLUDED.email,
                display_name = EXCLUDED.display_name,
                role = EXCLUDED.role,
                supervisor_id = EXCLUDED.supervisor_id,
                deleted_at = NULL,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(&input.external_id)
            .bind(&input.email)
            .bind(&input.display_name)
            .bind(input.role.as_str())
            .bind(input.supervisor_id)
            .fetch_one(pool)
            .await
    }

    /// Find a live account by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a live account by its external directory id.
    pub async fn find_by_external_id(
        pool: &PgPool,
        external_id: &str,
    ) -> Result<Option<Account>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM accounts WHERE external_id = $1 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(external_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a live account by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Account>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM accounts WHERE LOWER(email) = LOWER($1) AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Reassign an employee's supervisor. Returns the updated row, or
    /// `None` if no live account with the given `id` exists.
    pub async fn set_supervisor(
        pool: &PgPool,
        id: DbId,
        supervisor_id: Option<DbId>,
    ) -> Result<Option<Account>, sqlx::Error> {
        let query = format!(
            "UPDATE accounts SET supervisor_id = $2, updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .bind(supervisor_id)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete an account on role removal.
    ///
    /// Returns `true` if a live row was marked. Already-deleted rows are
    /// left alone so `deleted_at` keeps the original removal time.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE accounts SET deleted_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
