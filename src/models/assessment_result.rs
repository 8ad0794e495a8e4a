use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgExecutor, PgPool};

/// Feedback status labels rendered by the frontend.
pub const FEEDBACK_PENDING: &str = "전문가 자문이 반영되기전입니다";
pub const FEEDBACK_REFLECTED: &str = "전문가 자문이 반영되었습니다";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AssessmentResult {
    pub id: i64,
    pub system_id: i64,
    pub user_id: i64,
    pub assessment_id: i64,
    pub score: f64,
    pub grade: String,
    pub feedback_status: String,
    pub completed_at: DateTime<Utc>,
}

/// Result row joined with the owning institution, shown to assigned experts.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AssessmentResultDetail {
    pub assessment_id: i64,
    pub system_id: i64,
    pub user_id: i64,
    pub score: f64,
    pub grade: String,
    pub feedback_status: String,
    pub completed_at: DateTime<Utc>,
    pub institution_name: String,
}

impl AssessmentResult {
    /// Writes the computed result for a completed self-test, replacing any
    /// earlier run for the same system and user.
    pub async fn upsert<'e, E: PgExecutor<'e>>(
        executor: E,
        system_id: i64,
        user_id: i64,
        assessment_id: i64,
        score: f64,
        grade: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO assessment_results (
                system_id, user_id, assessment_id, score, feedback_status, completed_at, grade
            ) VALUES ($1, $2, $3, $4, $5, NOW(), $6)
            ON CONFLICT (system_id, user_id) DO UPDATE SET
                score = EXCLUDED.score,
                feedback_status = EXCLUDED.feedback_status,
                completed_at = EXCLUDED.completed_at,
                grade = EXCLUDED.grade
            RETURNING *
            "#,
        )
        .bind(system_id)
        .bind(user_id)
        .bind(assessment_id)
        .bind(score)
        .bind(FEEDBACK_PENDING)
        .bind(grade)
        .fetch_one(executor)
        .await
    }

    /// Results for a system and user, newest first.
    pub async fn list_for_system_and_user(
        pool: &PgPool,
        system_id: i64,
        user_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM assessment_results
            WHERE user_id = $1 AND system_id = $2
            ORDER BY completed_at DESC
            "#,
        )
        .bind(user_id)
        .bind(system_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_detail_for_system(
        pool: &PgPool,
        system_id: i64,
    ) -> Result<Option<AssessmentResultDetail>, sqlx::Error> {
        sqlx::query_as::<_, AssessmentResultDetail>(
            r#"
            SELECT
                ar.id AS assessment_id, ar.system_id, ar.user_id, ar.score,
                ar.grade, ar.feedback_status, ar.completed_at, u.institution_name
            FROM assessment_results ar
            JOIN systems s ON ar.system_id = s.id
            JOIN users u ON s.user_id = u.id
            WHERE ar.system_id = $1
            "#,
        )
        .bind(system_id)
        .fetch_optional(pool)
        .await
    }

    /// Map of system id to whether any completed result exists.
    pub async fn completion_map(pool: &PgPool) -> Result<Vec<(i64, bool)>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT system_id, COUNT(*) > 0 AS is_completed
            FROM assessment_results
            GROUP BY system_id
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Flips the feedback status label. Returns the number of rows touched.
    pub async fn set_feedback_status<'e, E: PgExecutor<'e>>(
        executor: E,
        system_id: i64,
        status: &str,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE assessment_results SET feedback_status = $2 WHERE system_id = $1")
                .bind(system_id)
                .bind(status)
                .execute(executor)
                .await?;

        Ok(result.rows_affected())
    }
}
