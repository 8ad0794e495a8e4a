use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Feedback {
    pub id: i64,
    pub assessment_result_id: i64,
    pub expert_id: i64,
    pub feedback_content: String,
    pub created_at: DateTime<Utc>,
}

/// Per-system rollup shown to the owning institution: result, overall
/// feedback, and the matched expert. Systems without a result keep nulls.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SystemResultRow {
    pub system_id: i64,
    pub system_name: String,
    pub score: Option<f64>,
    pub grade: Option<String>,
    pub feedback_status: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub feedback_content: Option<String>,
    pub expert_name: Option<String>,
}

impl Feedback {
    /// Records an expert's overall comment on an assessment result.
    pub async fn create(
        pool: &PgPool,
        assessment_result_id: i64,
        expert_id: i64,
        feedback_content: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO feedbacks (assessment_result_id, expert_id, feedback_content)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(assessment_result_id)
        .bind(expert_id)
        .bind(feedback_content)
        .fetch_one(pool)
        .await
    }

    pub async fn results_for_owner(
        pool: &PgPool,
        user_id: i64,
    ) -> Result<Vec<SystemResultRow>, sqlx::Error> {
        sqlx::query_as::<_, SystemResultRow>(
            r#"
            SELECT s.id AS system_id, s.name AS system_name,
                   ar.score, ar.grade, ar.feedback_status, ar.completed_at,
                   f.feedback_content, e.name AS expert_name
            FROM systems s
            LEFT JOIN assessment_results ar ON s.id = ar.system_id
            LEFT JOIN assignments a ON s.id = a.system_id
            LEFT JOIN feedbacks f ON ar.id = f.assessment_result_id
            LEFT JOIN experts e ON a.expert_id = e.id
            WHERE s.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
