use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuantitativeQuestion {
    pub id: i64,
    pub question_number: i32,
    pub question: String,
    pub unit: Option<String>,
    pub legal_basis: Option<String>,
    pub evaluation_criteria: Option<String>,
    pub reference_info: Option<String>,
    pub image_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpsertQuantitativeQuestionData {
    pub question_number: i32,
    pub question: String,
    pub unit: Option<String>,
    pub legal_basis: Option<String>,
    pub evaluation_criteria: Option<String>,
    pub reference_info: Option<String>,
    pub image_path: Option<String>,
}

impl QuantitativeQuestion {
    /// Inserts or replaces the question carrying this number.
    pub async fn upsert(
        pool: &PgPool,
        data: UpsertQuantitativeQuestionData,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO quantitative_questions (
                question_number, question, unit, legal_basis,
                evaluation_criteria, reference_info, image_path
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (question_number) DO UPDATE SET
                question = EXCLUDED.question,
                unit = EXCLUDED.unit,
                legal_basis = EXCLUDED.legal_basis,
                evaluation_criteria = EXCLUDED.evaluation_criteria,
                reference_info = EXCLUDED.reference_info,
                image_path = EXCLUDED.image_path
            RETURNING *
            "#,
        )
        .bind(data.question_number)
        .bind(&data.question)
        .bind(&data.unit)
        .bind(&data.legal_basis)
        .bind(&data.evaluation_criteria)
        .bind(&data.reference_info)
        .bind(&data.image_path)
        .fetch_one(pool)
        .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM quantitative_questions ORDER BY question_number",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, question_number: i32) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM quantitative_questions WHERE question_number = $1")
                .bind(question_number)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QualitativeQuestion {
    pub id: i64,
    pub question_number: i32,
    pub indicator: String,
    pub indicator_definition: Option<String>,
    pub evaluation_criteria: Option<String>,
    pub reference_info: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpsertQualitativeQuestionData {
    pub question_number: i32,
    pub indicator: String,
    pub indicator_definition: Option<String>,
    pub evaluation_criteria: Option<String>,
    pub reference_info: Option<String>,
}

impl QualitativeQuestion {
    pub async fn upsert(
        pool: &PgPool,
        data: UpsertQualitativeQuestionData,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO qualitative_questions (
                question_number, indicator, indicator_definition,
                evaluation_criteria, reference_info
            ) VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (question_number) DO UPDATE SET
                indicator = EXCLUDED.indicator,
                indicator_definition = EXCLUDED.indicator_definition,
                evaluation_criteria = EXCLUDED.evaluation_criteria,
                reference_info = EXCLUDED.reference_info
            RETURNING *
            "#,
        )
        .bind(data.question_number)
        .bind(&data.indicator)
        .bind(&data.indicator_definition)
        .bind(&data.evaluation_criteria)
        .bind(&data.reference_info)
        .fetch_one(pool)
        .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM qualitative_questions ORDER BY question_number")
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, question_number: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM qualitative_questions WHERE question_number = $1")
            .bind(question_number)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
