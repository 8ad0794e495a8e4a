use serde::Serialize;
use sqlx::{FromRow, PgPool};

pub struct Assignment;

/// Expert row as matched to a system.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MatchedExpert {
    pub expert_id: i64,
    pub expert_name: String,
    pub institution_name: String,
    pub email: String,
}

/// System assigned to an expert, with the owning institution and any result.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AssignedSystem {
    pub system_id: i64,
    pub system_name: String,
    pub institution_name: String,
    pub score: Option<f64>,
    pub grade: Option<String>,
    pub feedback_status: Option<String>,
}

impl Assignment {
    /// Replaces the expert set matched to a system in one transaction.
    pub async fn replace_for_system(
        pool: &PgPool,
        system_id: i64,
        expert_ids: &[i64],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM assignments WHERE system_id = $1")
            .bind(system_id)
            .execute(&mut *tx)
            .await?;

        for expert_id in expert_ids {
            sqlx::query(
                r#"
                INSERT INTO assignments (expert_id, system_id)
                VALUES ($1, $2)
                ON CONFLICT (expert_id, system_id) DO NOTHING
                "#,
            )
            .bind(expert_id)
            .bind(system_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await
    }

    pub async fn experts_for_system(
        pool: &PgPool,
        system_id: i64,
    ) -> Result<Vec<MatchedExpert>, sqlx::Error> {
        sqlx::query_as::<_, MatchedExpert>(
            r#"
            SELECT e.id AS expert_id, e.name AS expert_name, e.institution_name, e.email
            FROM assignments a
            JOIN experts e ON a.expert_id = e.id
            WHERE a.system_id = $1
            "#,
        )
        .bind(system_id)
        .fetch_all(pool)
        .await
    }

    pub async fn systems_for_expert(
        pool: &PgPool,
        expert_id: i64,
    ) -> Result<Vec<AssignedSystem>, sqlx::Error> {
        sqlx::query_as::<_, AssignedSystem>(
            r#"
            SELECT s.id AS system_id, s.name AS system_name, u.institution_name,
                   ar.score, ar.grade, ar.feedback_status
            FROM assignments a
            JOIN systems s ON a.system_id = s.id
            JOIN users u ON s.user_id = u.id
            LEFT JOIN assessment_results ar ON s.id = ar.system_id
            WHERE a.expert_id = $1
            "#,
        )
        .bind(expert_id)
        .fetch_all(pool)
        .await
    }
}
