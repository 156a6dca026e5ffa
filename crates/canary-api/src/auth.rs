// Session authentication
//
// The vendor guards its login POST with a double-submit XSRF check:
// `GET /login` plants an `XSRF-TOKEN` cookie, and the credential POST
// must echo that value in the `X-XSRF-TOKEN` header. The JSON answer
// carries the bearer token used by every other endpoint.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, info};

use crate::client::{CanaryClient, check_status, parse_json};
use crate::error::Error;
use crate::models::LoginResponse;

const XSRF_COOKIE: &str = "XSRF-TOKEN";
const XSRF_HEADER: &str = "X-XSRF-TOKEN";

/// Account credentials. Fixed for the lifetime of a client.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

impl CanaryClient {
    /// The bearer token for the current session.
    ///
    /// Logs in at most once per session TTL (14 days by default).
    /// Concurrent callers during a login wait for that login instead of
    /// starting their own, and share its outcome if it fails.
    pub async fn session_token(&self) -> Result<SecretString, Error> {
        self.session_cache()
            .get_or_try_fetch(&(), move || self.login())
            .await
    }

    /// Run the full login sequence, bypassing the session cache.
    async fn login(&self) -> Result<SecretString, Error> {
        info!("setting up new Canary session");

        let xsrf_token = self.xsrf_token().await?;

        let url = self.endpoint("/api/auth/login")?;
        debug!("logging in at {}", url);

        let body = json!({
            "username": self.credentials().username,
            "password": self.credentials().password.expose_secret(),
        });

        let resp = self
            .http()
            .post(url)
            .header(XSRF_HEADER, xsrf_token)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {})", status.as_u16()),
            });
        }

        let login: LoginResponse = parse_json(resp).await?;
        let token = login
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Authentication {
                message: "no session token".into(),
            })?;

        info!("established Canary session");
        Ok(SecretString::from(token))
    }

    /// Load the login page and pull the anti-forgery cookie out of it.
    ///
    /// The cookie also lands in the client's jar, so the following POST
    /// carries it back automatically.
    async fn xsrf_token(&self) -> Result<String, Error> {
        let url = self.endpoint("/login")?;
        debug!("fetching login page at {}", url);

        let resp = self
            .http()
            .get(url)
            .send()
            .await?;
        let resp = check_status(resp).await?;

        resp.cookies()
            .filter(|c| c.name() == XSRF_COOKIE && !c.value().is_empty())
            .last()
            .map(|c| c.value().to_owned())
            .ok_or_else(|| Error::Authentication {
                message: "no XSRF token".into(),
            })
    }
}
