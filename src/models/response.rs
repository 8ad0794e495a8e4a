use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor, PgPool};

/// Questionnaire answer values. Serialized to the Korean wire strings the
/// frontend submits and renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Answer {
    #[serde(rename = "이행")]
    Fulfilled,
    #[serde(rename = "미이행")]
    Unfulfilled,
    #[serde(rename = "자문필요")]
    ConsultNeeded,
    #[serde(rename = "해당없음")]
    NotApplicable,
}

impl Answer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Answer::Fulfilled => "이행",
            Answer::Unfulfilled => "미이행",
            Answer::ConsultNeeded => "자문필요",
            Answer::NotApplicable => "해당없음",
        }
    }

    /// Parses a stored answer string. Unknown values yield None and score
    /// zero points.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "이행" => Some(Answer::Fulfilled),
            "미이행" => Some(Answer::Unfulfilled),
            "자문필요" => Some(Answer::ConsultNeeded),
            "해당없음" => Some(Answer::NotApplicable),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct QuantitativeResponse {
    pub id: i64,
    pub question_number: i32,
    pub system_id: i64,
    pub user_id: i64,
    pub response: String,
    pub additional_comment: Option<String>,
    pub file_path: Option<String>,
    pub feedback: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct UpsertResponseData {
    pub question_number: i32,
    pub system_id: i64,
    pub user_id: i64,
    pub response: String,
    pub additional_comment: Option<String>,
    pub file_path: Option<String>,
}

/// One question of the quantitative track joined with the system's answer,
/// if any.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct QuantitativeSheetRow {
    pub question_number: i32,
    pub question: String,
    pub unit: Option<String>,
    pub legal_basis: Option<String>,
    pub evaluation_criteria: Option<String>,
    pub reference_info: Option<String>,
    pub response: Option<String>,
    pub additional_comment: Option<String>,
    pub file_path: Option<String>,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct QualitativeSheetRow {
    pub question_number: i32,
    pub indicator: String,
    pub indicator_definition: Option<String>,
    pub evaluation_criteria: Option<String>,
    pub reference_info: Option<String>,
    pub response: Option<String>,
    pub additional_comment: Option<String>,
    pub file_path: Option<String>,
    pub feedback: Option<String>,
}

impl QuantitativeResponse {
    /// Batch upsert of a questionnaire submission in a single transaction.
    pub async fn upsert_batch(
        pool: &PgPool,
        rows: Vec<UpsertResponseData>,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        for row in &rows {
            sqlx::query(
                r#"
                INSERT INTO quantitative_responses (
                    question_number, system_id, user_id, response,
                    additional_comment, file_path
                ) VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (system_id, question_number) DO UPDATE SET
                    response = EXCLUDED.response,
                    additional_comment = EXCLUDED.additional_comment,
                    file_path = COALESCE(EXCLUDED.file_path, quantitative_responses.file_path),
                    updated_at = NOW()
                "#,
            )
            .bind(row.question_number)
            .bind(row.system_id)
            .bind(row.user_id)
            .bind(&row.response)
            .bind(&row.additional_comment)
            .bind(&row.file_path)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await
    }

    /// Answer values of every quantitative response for a system, for scoring.
    pub async fn list_answers(pool: &PgPool, system_id: i64) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT response FROM quantitative_responses WHERE system_id = $1")
                .bind(system_id)
                .fetch_all(pool)
                .await?;

        Ok(rows.into_iter().map(|(response,)| response).collect())
    }

    /// The question catalog joined with the system's responses.
    pub async fn sheet_for_system(
        pool: &PgPool,
        system_id: i64,
    ) -> Result<Vec<QuantitativeSheetRow>, sqlx::Error> {
        sqlx::query_as::<_, QuantitativeSheetRow>(
            r#"
            SELECT
                q.question_number, q.question, q.unit, q.legal_basis,
                q.evaluation_criteria, q.reference_info,
                r.response, r.additional_comment, r.file_path, r.feedback
            FROM quantitative_questions q
            LEFT JOIN quantitative_responses r
                ON r.question_number = q.question_number AND r.system_id = $1
            ORDER BY q.question_number
            "#,
        )
        .bind(system_id)
        .fetch_all(pool)
        .await
    }

    /// Writes expert feedback onto one response row.
    pub async fn apply_feedback<'e, E: PgExecutor<'e>>(
        executor: E,
        system_id: i64,
        question_number: i32,
        feedback: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO quantitative_responses (question_number, system_id, user_id, response, feedback)
            SELECT $1, $2, s.user_id, '해당없음', $3 FROM systems s WHERE s.id = $2
            ON CONFLICT (system_id, question_number) DO UPDATE SET
                feedback = EXCLUDED.feedback,
                updated_at = NOW()
            "#,
        )
        .bind(question_number)
        .bind(system_id)
        .bind(feedback)
        .execute(executor)
        .await?;

        Ok(())
    }
}

pub struct QualitativeResponse;

impl QualitativeResponse {
    /// Upserts a single qualitative answer. Missing answers default to
    /// 해당없음 like the paper form.
    pub async fn upsert(pool: &PgPool, row: UpsertResponseData) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO qualitative_responses (
                question_number, system_id, user_id, response,
                additional_comment, file_path
            ) VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (system_id, question_number) DO UPDATE SET
                response = EXCLUDED.response,
                additional_comment = EXCLUDED.additional_comment,
                file_path = COALESCE(EXCLUDED.file_path, qualitative_responses.file_path),
                updated_at = NOW()
            "#,
        )
        .bind(row.question_number)
        .bind(row.system_id)
        .bind(row.user_id)
        .bind(&row.response)
        .bind(&row.additional_comment)
        .bind(&row.file_path)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn list_answers(pool: &PgPool, system_id: i64) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT response FROM qualitative_responses WHERE system_id = $1")
                .bind(system_id)
                .fetch_all(pool)
                .await?;

        Ok(rows.into_iter().map(|(response,)| response).collect())
    }

    pub async fn sheet_for_system(
        pool: &PgPool,
        system_id: i64,
    ) -> Result<Vec<QualitativeSheetRow>, sqlx::Error> {
        sqlx::query_as::<_, QualitativeSheetRow>(
            r#"
            SELECT
                q.question_number, q.indicator, q.indicator_definition,
                q.evaluation_criteria, q.reference_info,
                r.response, r.additional_comment, r.file_path, r.feedback
            FROM qualitative_questions q
            LEFT JOIN qualitative_responses r
                ON r.question_number = q.question_number AND r.system_id = $1
            ORDER BY q.question_number
            "#,
        )
        .bind(system_id)
        .fetch_all(pool)
        .await
    }

    /// Writes expert feedback, the reviewed answer, and the comment back onto
    /// one response row.
    pub async fn apply_feedback<'e, E: PgExecutor<'e>>(
        executor: E,
        system_id: i64,
        question_number: i32,
        feedback: &str,
        additional_comment: &str,
        response: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE qualitative_responses
            SET feedback = $3, additional_comment = $4, response = $5, updated_at = NOW()
            WHERE system_id = $1 AND question_number = $2
            "#,
        )
        .bind(system_id)
        .bind(question_number)
        .bind(feedback)
        .bind(additional_comment)
        .bind(response)
        .execute(executor)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_parses_known_values() {
        assert_eq!(Answer::parse("이행"), Some(Answer::Fulfilled));
        assert_eq!(Answer::parse("미이행"), Some(Answer::Unfulfilled));
        assert_eq!(Answer::parse("자문필요"), Some(Answer::ConsultNeeded));
        assert_eq!(Answer::parse("해당없음"), Some(Answer::NotApplicable));
        assert_eq!(Answer::parse("기타"), None);
    }

    #[test]
    fn answer_serde_uses_wire_strings() {
        assert_eq!(
            serde_json::to_string(&Answer::Fulfilled).unwrap(),
            "\"이행\""
        );
        let parsed: Answer = serde_json::from_str("\"자문필요\"").unwrap();
        assert_eq!(parsed, Answer::ConsultNeeded);
    }
}
