use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, PgPool};

/// How long a sent code stays valid.
pub const CODE_TTL_MINUTES: i64 = 10;

#[derive(Debug, Clone, FromRow)]
pub struct EmailVerification {
    pub email: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl EmailVerification {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    pub async fn find(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM email_verifications WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Stores a fresh code for the address, replacing any stale one.
    pub async fn store(pool: &PgPool, email: &str, code: &str) -> Result<(), sqlx::Error> {
        let expires_at = Utc::now() + Duration::minutes(CODE_TTL_MINUTES);

        sqlx::query(
            r#"
            INSERT INTO email_verifications (email, code, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE SET
                code = EXCLUDED.code,
                expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(email)
        .bind(code)
        .bind(expires_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn delete(pool: &PgPool, email: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM email_verifications WHERE email = $1")
            .bind(email)
            .execute(pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_check_uses_the_given_clock() {
        let now = Utc::now();
        let pending = EmailVerification {
            email: "office@example.kr".to_string(),
            code: "123456".to_string(),
            expires_at: now + Duration::minutes(CODE_TTL_MINUTES),
        };
        assert!(!pending.is_expired(now));
        assert!(pending.is_expired(now + Duration::minutes(CODE_TTL_MINUTES + 1)));
    }
}
