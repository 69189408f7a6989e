//! [`Authenticator`] backed by the login server's HTTP action endpoint.

use serde::Deserialize;
use serde_json::Value;

use crate::{Assertion, Authenticator, Credentials, SessionError};

/// The login server's action endpoint.
pub const DEFAULT_LOGIN_URL: &str =
    "https://play.pokemonshowdown.com/~~showdown/action.php";

/// Logs in by POSTing the challenge and credentials to the login server.
#[derive(Debug, Clone)]
pub struct HttpAuthenticator {
    client: reqwest::Client,
    url: String,
}

impl HttpAuthenticator {
    /// An authenticator for [`DEFAULT_LOGIN_URL`].
    pub fn new() -> Self {
        Self::with_url(DEFAULT_LOGIN_URL)
    }

    /// An authenticator for a different action endpoint.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    /// Reuses an existing HTTP client (connection pool, proxy settings).
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// The endpoint this authenticator posts to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpAuthenticator {
    fn default() -> Self {
        Self::new()
    }
}

impl Authenticator for HttpAuthenticator {
    async fn login(
        &self,
        challstr: &str,
        credentials: &Credentials,
    ) -> Result<Assertion, SessionError> {
        tracing::debug!(
            url = %self.url,
            name = credentials.name(),
            "requesting login assertion"
        );

        let body = self
            .client
            .post(&self.url)
            .form(&[
                ("act", "login"),
                ("name", credentials.name()),
                ("pass", credentials.pass()),
                ("challstr", challstr),
            ])
            .send()
            .await?
            .text()
            .await?;

        parse_login_response(&body).inspect_err(|e| {
            tracing::warn!(name = credentials.name(), error = %e, "login rejected");
        })
    }
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    actionsuccess: Value,
    #[serde(default)]
    assertion: Option<String>,
}

/// Parses the body of a login response into an [`Assertion`].
///
/// The login server prefixes its JSON with a one-character sentinel (`]`)
/// that has to be dropped before parsing. Login succeeded iff
/// `actionsuccess` is truthy in the JavaScript sense.
///
/// # Errors
/// - [`SessionError::MalformedResponse`] if the rest is not JSON of the
///   expected shape (including an empty body)
/// - [`SessionError::AuthFailed`] if `actionsuccess` is falsy or no
///   assertion was returned
pub fn parse_login_response(body: &str) -> Result<Assertion, SessionError> {
    let mut chars = body.chars();
    chars.next();
    let json = chars.as_str();

    let response: LoginResponse =
        serde_json::from_str(json).map_err(SessionError::MalformedResponse)?;

    if !is_truthy(&response.actionsuccess) {
        return Err(SessionError::AuthFailed(format!(
            "login server refused: {json}"
        )));
    }

    match response.assertion {
        Some(assertion) if !assertion.is_empty() => Ok(Assertion::new(assertion)),
        _ => Err(SessionError::AuthFailed(
            "login server returned no assertion".into(),
        )),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login_response_success_returns_assertion() {
        let body = r#"]{"actionsuccess":true,"assertion":"abc,bot,2,1700000000,sim3;sig"}"#;
        let assertion = parse_login_response(body).expect("should succeed");
        assert_eq!(assertion.as_str(), "abc,bot,2,1700000000,sim3;sig");
    }

    #[test]
    fn test_parse_login_response_actionsuccess_false_is_auth_failed() {
        let body = r#"]{"actionsuccess":false,"assertion":";;Wrong password."}"#;
        let result = parse_login_response(body);
        assert!(
            matches!(result, Err(SessionError::AuthFailed(_))),
            "expected AuthFailed, got {result:?}"
        );
    }

    #[test]
    fn test_parse_login_response_missing_actionsuccess_is_auth_failed() {
        let result = parse_login_response(r#"]{"assertion":"x"}"#);
        assert!(matches!(result, Err(SessionError::AuthFailed(_))));
    }

    #[test]
    fn test_parse_login_response_truthy_number_counts_as_success() {
        let result = parse_login_response(r#"]{"actionsuccess":1,"assertion":"x"}"#);
        assert_eq!(result.expect("should succeed").as_str(), "x");
    }

    #[test]
    fn test_parse_login_response_success_without_assertion_is_auth_failed() {
        let result = parse_login_response(r#"]{"actionsuccess":true}"#);
        assert!(matches!(result, Err(SessionError::AuthFailed(_))));
    }

    #[test]
    fn test_parse_login_response_not_json_is_malformed() {
        let result = parse_login_response("]<html>502 Bad Gateway</html>");
        assert!(matches!(result, Err(SessionError::MalformedResponse(_))));
    }

    #[test]
    fn test_parse_login_response_empty_body_is_malformed() {
        assert!(matches!(
            parse_login_response(""),
            Err(SessionError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_login_response_without_sentinel_is_malformed() {
        // The first character is always dropped, so a bare JSON object
        // loses its opening brace.
        let result = parse_login_response(r#"{"actionsuccess":true,"assertion":"x"}"#);
        assert!(matches!(result, Err(SessionError::MalformedResponse(_))));
    }

    #[test]
    fn test_is_truthy_follows_javascript_rules() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&serde_json::json!(0)));
        assert!(!is_truthy(&serde_json::json!("")));
        assert!(is_truthy(&serde_json::json!("yes")));
        assert!(is_truthy(&serde_json::json!({})));
        assert!(is_truthy(&serde_json::json!([])));
    }
}
