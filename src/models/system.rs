use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor, PgPool};

/// Assessment progress of a registered system. Wire values match what the
/// frontend renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssessmentStatus {
    #[serde(rename = "시작전")]
    NotStarted,
    #[serde(rename = "진행중")]
    InProgress,
    #[serde(rename = "완료")]
    Completed,
}

impl AssessmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentStatus::NotStarted => "시작전",
            AssessmentStatus::InProgress => "진행중",
            AssessmentStatus::Completed => "완료",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct System {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub min_subjects: i32,
    pub max_subjects: i32,
    pub purpose: String,
    pub is_private: bool,
    pub is_unique: bool,
    pub is_resident: bool,
    pub reason: Option<String>,
    pub assessment_status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateSystemData {
    pub user_id: i64,
    pub name: String,
    pub min_subjects: i32,
    pub max_subjects: i32,
    pub purpose: String,
    pub is_private: bool,
    pub is_unique: bool,
    pub is_resident: bool,
    pub reason: Option<String>,
}

/// System row joined with its owning institution, as listed to users.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SystemSummary {
    pub system_id: i64,
    pub system_name: String,
    pub purpose: String,
    pub assessment_status: String,
    pub institution_name: String,
    pub representative_name: String,
}

/// Joined row for the superuser overview of every system.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SystemAdminRow {
    pub system_id: i64,
    pub system_name: String,
    pub purpose: String,
    pub min_subjects: i32,
    pub max_subjects: i32,
    pub assessment_status: String,
    pub user_institution_name: String,
    pub user_representative_name: String,
    pub user_email: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SystemDetail {
    pub system_id: i64,
    pub system_name: String,
    pub purpose: String,
    pub min_subjects: i32,
    pub max_subjects: i32,
    pub assessment_status: String,
    pub institution_name: String,
    pub representative_name: String,
}

impl System {
    pub async fn create(pool: &PgPool, data: CreateSystemData) -> Result<Self, sqlx::Error> {
        let system = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO systems (user_id, name, min_subjects, max_subjects, purpose, is_private, is_unique, is_resident, reason, assessment_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, '시작전')
            RETURNING *
            "#,
        )
        .bind(data.user_id)
        .bind(&data.name)
        .bind(data.min_subjects)
        .bind(data.max_subjects)
        .bind(&data.purpose)
        .bind(data.is_private)
        .bind(data.is_unique)
        .bind(data.is_resident)
        .bind(&data.reason)
        .fetch_one(pool)
        .await?;

        Ok(system)
    }

    pub async fn count_for_user(pool: &PgPool, user_id: i64) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM systems WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    pub async fn exists(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM systems WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.is_some())
    }

    /// Caller's systems joined with owner info, newest first
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: i64,
    ) -> Result<Vec<SystemSummary>, sqlx::Error> {
        sqlx::query_as::<_, SystemSummary>(
            r#"
            SELECT
                systems.id AS system_id,
                systems.name AS system_name,
                systems.purpose,
                systems.assessment_status,
                users.institution_name,
                users.representative_name
            FROM systems
            INNER JOIN users ON systems.user_id = users.id
            WHERE systems.user_id = $1
            ORDER BY systems.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_detail(pool: &PgPool, id: i64) -> Result<Option<SystemDetail>, sqlx::Error> {
        sqlx::query_as::<_, SystemDetail>(
            r#"
            SELECT
                systems.id AS system_id,
                systems.name AS system_name,
                systems.purpose,
                systems.min_subjects,
                systems.max_subjects,
                systems.assessment_status,
                users.institution_name,
                users.representative_name
            FROM systems
            INNER JOIN users ON systems.user_id = users.id
            WHERE systems.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Every registered system with owner contact info, newest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<SystemAdminRow>, sqlx::Error> {
        sqlx::query_as::<_, SystemAdminRow>(
            r#"
            SELECT
                systems.id AS system_id,
                systems.name AS system_name,
                systems.purpose,
                systems.min_subjects,
                systems.max_subjects,
                systems.assessment_status,
                users.institution_name AS user_institution_name,
                users.representative_name AS user_representative_name,
                users.email AS user_email
            FROM systems
            INNER JOIN users ON systems.user_id = users.id
            ORDER BY systems.created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Updates the editable fields. Returns false when no row matched.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        name: &str,
        purpose: &str,
        min_subjects: i32,
        max_subjects: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE systems
            SET name = $2, purpose = $3, min_subjects = $4, max_subjects = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(purpose)
        .bind(min_subjects)
        .bind(max_subjects)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn set_status<'e, E: PgExecutor<'e>>(
        executor: E,
        id: i64,
        status: AssessmentStatus,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE systems SET assessment_status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM systems WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assessment_status_serializes_to_wire_values() {
        assert_eq!(
            serde_json::to_string(&AssessmentStatus::NotStarted).unwrap(),
            "\"시작전\""
        );
        assert_eq!(
            serde_json::to_string(&AssessmentStatus::Completed).unwrap(),
            "\"완료\""
        );
    }

    #[test]
    fn assessment_status_round_trips_as_str() {
        for status in [
            AssessmentStatus::NotStarted,
            AssessmentStatus::InProgress,
            AssessmentStatus::Completed,
        ] {
            let parsed: AssessmentStatus =
                serde_json::from_str(&format!("\"{}\"", status.as_str())).unwrap();
            assert_eq!(parsed, status);
        }
    }
}
