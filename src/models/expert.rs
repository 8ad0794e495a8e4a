use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Expert {
    pub id: i64,
    pub name: String,
    pub institution_name: String,
    pub position: Option<String>,
    pub phone_number: Option<String>,
    pub email: String,
    pub specialty: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub member_type: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateExpertData {
    pub name: String,
    pub institution_name: String,
    pub position: Option<String>,
    pub phone_number: Option<String>,
    pub email: String,
    pub specialty: Option<String>,
    pub password_hash: String,
    pub member_type: String,
}

impl Expert {
    pub async fn create(pool: &PgPool, data: CreateExpertData) -> Result<Self, sqlx::Error> {
        let expert = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO experts (name, institution_name, position, phone_number, email, specialty, password_hash, member_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.institution_name)
        .bind(&data.position)
        .bind(&data.phone_number)
        .bind(&data.email)
        .bind(&data.specialty)
        .bind(&data.password_hash)
        .bind(&data.member_type)
        .fetch_one(pool)
        .await?;

        Ok(expert)
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM experts WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM experts ORDER BY created_at DESC")
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM experts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
