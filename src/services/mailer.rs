use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use thiserror::Error;

use crate::config::Config;

#[derive(Error, Debug)]
pub enum MailerError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Mail API error: {status} - {message}")]
    Api { status: StatusCode, message: String },
}

#[derive(Serialize)]
struct SendMailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// Client for the HTTP mail delivery API.
pub struct Mailer {
    client: Client,
    api_url: String,
    api_key: Secret<String>,
    from: String,
}

impl Mailer {
    pub fn new(api_url: String, api_key: Secret<String>, from: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
            from,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.mail_api_url.clone(),
            config.mail_api_key.clone(),
            config.mail_from.clone(),
        )
    }

    pub async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailerError> {
        let response = self
            .client
            .post(format!("{}/send", self.api_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&SendMailRequest {
                from: &self.from,
                to,
                subject,
                html,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(MailerError::Api { status, message });
        }

        Ok(())
    }

    /// Sends the 6-digit verification code mail.
    pub async fn send_verification_code(&self, to: &str, code: &str) -> Result<(), MailerError> {
        let html = format!(
            "<p>인증 코드: <b>{}</b></p><p>10분 안에 입력해주세요.</p>",
            code
        );

        self.send(to, "이메일 인증 코드", &html).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{bearer_token, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_mailer(api_url: String) -> Mailer {
        Mailer::new(
            api_url,
            Secret::new("test-key".to_string()),
            "noreply@example.kr".to_string(),
        )
    }

    #[tokio::test]
    async fn send_posts_authenticated_json() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/send"))
            .and(bearer_token("test-key"))
            .and(body_partial_json(serde_json::json!({
                "from": "noreply@example.kr",
                "to": "office@example.kr",
                "subject": "이메일 인증 코드",
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mailer = test_mailer(server.uri());
        let result = mailer
            .send_verification_code("office@example.kr", "123456")
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn send_surfaces_api_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/send"))
            .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let mailer = test_mailer(server.uri());
        let err = mailer
            .send("office@example.kr", "subject", "<p>body</p>")
            .await
            .unwrap_err();

        match err {
            MailerError::Api { status, message } => {
                assert_eq!(status, StatusCode::BAD_GATEWAY);
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
