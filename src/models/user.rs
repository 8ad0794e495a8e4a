use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub institution_name: String,
    pub institution_address: String,
    pub representative_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub member_type: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateUserData {
    pub institution_name: String,
    pub institution_address: String,
    pub representative_name: String,
    pub email: String,
    pub password_hash: String,
    pub member_type: Option<String>,
}

impl User {
    /// Creates a new institutional account
    pub async fn create(pool: &PgPool, data: CreateUserData) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO users (institution_name, institution_address, representative_name, email, password_hash, member_type)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, '기관회원'))
            RETURNING *
            "#,
        )
        .bind(&data.institution_name)
        .bind(&data.institution_address)
        .bind(&data.representative_name)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.member_type)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Lists every institutional account, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(pool)
            .await
    }

    /// Deletes an account. Returns false when no row matched.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
