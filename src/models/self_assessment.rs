use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SelfAssessment {
    pub id: i64,
    pub user_id: i64,
    pub system_id: i64,
    pub organization: String,
    pub user_scale: String,
    pub personal_info_system: Option<String>,
    pub member_info_homepage: Option<String>,
    pub external_data_provision: String,
    pub cctv_operation: Option<String>,
    pub task_outsourcing: Option<String>,
    pub personal_info_disposal: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct UpsertSelfAssessmentData {
    pub user_id: i64,
    pub system_id: i64,
    pub organization: String,
    pub user_scale: String,
    pub personal_info_system: Option<String>,
    pub member_info_homepage: Option<String>,
    pub external_data_provision: Option<String>,
    pub cctv_operation: Option<String>,
    pub task_outsourcing: Option<String>,
    pub personal_info_disposal: Option<String>,
}

impl SelfAssessment {
    /// Inserts the intake questionnaire for a system, overwriting a prior
    /// submission for the same system.
    pub async fn upsert(pool: &PgPool, data: UpsertSelfAssessmentData) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO self_assessments (
                user_id, system_id, organization, user_scale, personal_info_system,
                member_info_homepage, external_data_provision, cctv_operation,
                task_outsourcing, personal_info_disposal
            ) VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, '없음'), $8, $9, $10)
            ON CONFLICT (system_id) DO UPDATE SET
                organization = EXCLUDED.organization,
                user_scale = EXCLUDED.user_scale,
                personal_info_system = EXCLUDED.personal_info_system,
                member_info_homepage = EXCLUDED.member_info_homepage,
                external_data_provision = EXCLUDED.external_data_provision,
                cctv_operation = EXCLUDED.cctv_operation,
                task_outsourcing = EXCLUDED.task_outsourcing,
                personal_info_disposal = EXCLUDED.personal_info_disposal
            RETURNING *
            "#,
        )
        .bind(data.user_id)
        .bind(data.system_id)
        .bind(&data.organization)
        .bind(&data.user_scale)
        .bind(&data.personal_info_system)
        .bind(&data.member_info_homepage)
        .bind(&data.external_data_provision)
        .bind(&data.cctv_operation)
        .bind(&data.task_outsourcing)
        .bind(&data.personal_info_disposal)
        .fetch_one(pool)
        .await
    }

    pub async fn find_for_system_and_user(
        pool: &PgPool,
        system_id: i64,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM self_assessments WHERE system_id = $1 AND user_id = $2",
        )
        .bind(system_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }
}
