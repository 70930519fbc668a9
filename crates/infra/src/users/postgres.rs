//! Postgres-backed user gateway.
//!
//! Every statement is a fixed string with `$n` placeholders; caller-supplied
//! values only ever reach the database through `bind`.
//!
//! Column identifiers are written unquoted, so Postgres folds them to lower
//! case and the table may be created with either `firstName` or `firstname`.
//! Integer columns are cast to `BIGINT` on the way out so both `INTEGER` and
//! `BIGINT` schemas decode into `i64`.
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError |
//! |------------|------------|
//! | Database | `Query` |
//! | PoolClosed / PoolTimedOut / Io / Tls | `Unavailable` |
//! | ColumnDecode / ColumnNotFound / Decode | `Decode` |
//! | Other | `Query` |

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use userbase_core::{User, UserId, UserProfile};

use super::gateway::{StoreError, UserGateway};

const INSERT_USER: &str = r#"
    INSERT INTO users (firstName, lastName, email, password, age)
    VALUES ($1, $2, $3, $4, $5)
    RETURNING id::BIGINT
"#;

const SELECT_USER_BY_ID: &str = r#"
    SELECT id::BIGINT, firstName, lastName, email, password, age::BIGINT
    FROM users
    WHERE id = $1
"#;

const UPDATE_USER_BY_ID: &str = r#"
    UPDATE users
    SET firstName = $1, lastName = $2, email = $3, password = $4, age = $5
    WHERE id = $6
"#;

const DELETE_USER_BY_ID: &str = "DELETE FROM users WHERE id = $1";

const SELECT_ALL_USERS: &str = r#"
    SELECT id::BIGINT, firstName, lastName, email, password, age::BIGINT
    FROM users
"#;

/// Postgres-backed user gateway.
///
/// Holds only the pool handle. `PgPool` is internally reference counted, so
/// cloning this gateway shares the same connections.
#[derive(Debug, Clone)]
pub struct PostgresUserGateway {
    pool: PgPool,
}

impl PostgresUserGateway {
    /// Wrap an already-open pool. The `users` table must already exist.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserGateway for PostgresUserGateway {
    #[instrument(skip_all, err)]
    async fn insert(&self, profile: &UserProfile) -> Result<UserId, StoreError> {
        let row = sqlx::query(INSERT_USER)
            .bind(&profile.first_name)
            .bind(&profile.last_name)
            .bind(&profile.email)
            .bind(&profile.password)
            .bind(profile.age)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_user", e))?;

        let id: i64 = row
            .try_get(0)
            .map_err(|e| map_sqlx_error("insert_user", e))?;
        Ok(UserId::new(id))
    }

    #[instrument(skip(self), fields(user_id = %id), err)]
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(SELECT_USER_BY_ID)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_user", e))?;

        row.map(|r| user_from_row(&r)).transpose()
    }

    #[instrument(skip(self, profile), fields(user_id = %id), err)]
    async fn replace_by_id(&self, id: UserId, profile: &UserProfile) -> Result<u64, StoreError> {
        let result = sqlx::query(UPDATE_USER_BY_ID)
            .bind(&profile.first_name)
            .bind(&profile.last_name)
            .bind(&profile.email)
            .bind(&profile.password)
            .bind(profile.age)
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("update_user", e))?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self), fields(user_id = %id), err)]
    async fn delete_by_id(&self, id: UserId) -> Result<u64, StoreError> {
        let result = sqlx::query(DELETE_USER_BY_ID)
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_user", e))?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self), err)]
    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query(SELECT_ALL_USERS)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_users", e))?;

        rows.iter().map(user_from_row).collect()
    }
}

/// Read a row selected in `id, firstName, lastName, email, password, age` order.
fn user_from_row(row: &PgRow) -> Result<User, StoreError> {
    let read = |e| map_sqlx_error("decode_user_row", e);

    let id: i64 = row.try_get(0).map_err(read)?;
    let profile = UserProfile {
        first_name: row.try_get(1).map_err(read)?,
        last_name: row.try_get(2).map_err(read)?,
        email: row.try_get(3).map_err(read)?,
        password: row.try_get(4).map_err(read)?,
        age: row.try_get(5).map_err(read)?,
    };
    Ok(User::new(UserId::new(id), profile))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();
            StoreError::Query(format!(
                "database error in {} ({}): {}",
                operation,
                code,
                db_err.message()
            ))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("timed out acquiring connection in {}", operation))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("io error in {}: {}", operation, e)),
        sqlx::Error::Tls(e) => StoreError::Unavailable(format!("tls error in {}: {}", operation, e)),
        sqlx::Error::ColumnDecode { index, source } => StoreError::Decode(format!(
            "column {} in {}: {}",
            index, operation, source
        )),
        sqlx::Error::ColumnNotFound(name) => {
            StoreError::Decode(format!("column {} not found in {}", name, operation))
        }
        sqlx::Error::Decode(e) => StoreError::Decode(format!("{} in {}", e, operation)),
        _ => StoreError::Query(format!("sqlx error in {}: {}", operation, err)),
    }
}
