use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Name of the cookie the backend sets on login
pub const SESSION_COOKIE: &str = "token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Authenticated,
    Unauthenticated,
}

impl SessionStatus {
    pub fn is_authenticated(self) -> bool {
        matches!(self, SessionStatus::Authenticated)
    }
}

/// Checked once before a protected operation. The caller decides what to do
/// on `Unauthenticated` (the CLI asks the user to log in).
pub trait SessionProbe {
    fn check_session(&self) -> SessionStatus;
}

/// Claims this console cares about. The signature is the backend's business;
/// only expiry is read locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Session probe over a `Cookie`-style header such as `a=1; token=xyz`.
#[derive(Debug, Clone, Default)]
pub struct CookieSessionProbe {
    cookie_header: Option<String>,
}

impl CookieSessionProbe {
    pub fn new(cookie_header: Option<String>) -> Self {
        Self { cookie_header }
    }

    pub fn from_token(token: Option<&str>) -> Self {
        Self {
            cookie_header: token.map(|t| format!("{}={}", SESSION_COOKIE, t)),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.cookie_header
            .as_deref()
            .and_then(|header| cookie_value(header, SESSION_COOKIE))
    }
}

impl SessionProbe for CookieSessionProbe {
    fn check_session(&self) -> SessionStatus {
        match self.token() {
            Some(token) if !token_expired(token) => SessionStatus::Authenticated,
            Some(_) => {
                tracing::warn!("Session token has expired");
                SessionStatus::Unauthenticated
            }
            None => SessionStatus::Unauthenticated,
        }
    }
}

/// Value of `name` in a `k=v; k2=v2` cookie list; empty values count as absent
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .map(str::trim)
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// Read claims from a JWT without verifying its signature
pub fn peek_claims(token: &str) -> Option<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .ok()
        .map(|data| data.claims)
}

/// Only a readable JWT with a past `exp` counts as expired; opaque tokens are
/// trusted until the backend answers 401.
pub fn token_expired(token: &str) -> bool {
    match peek_claims(token).and_then(|claims| claims.exp) {
        Some(exp) => exp <= Utc::now().timestamp(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn jwt(exp: i64) -> String {
        let claims = Claims {
            exp: Some(exp),
            sub: Some("1".into()),
            username: Some("admin".into()),
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"backend-secret")).unwrap()
    }

    #[test]
    fn reads_token_among_other_cookies() {
        assert_eq!(cookie_value("theme=dark; token=abc.def; lang=es", "token"), Some("abc.def"));
        assert_eq!(cookie_value("theme=dark", "token"), None);
        assert_eq!(cookie_value("token=", "token"), None);
        assert_eq!(cookie_value("mytoken=1", "token"), None);
    }

    #[test]
    fn missing_cookie_is_unauthenticated() {
        assert_eq!(CookieSessionProbe::new(None).check_session(), SessionStatus::Unauthenticated);
        assert_eq!(
            CookieSessionProbe::new(Some("theme=dark".into())).check_session(),
            SessionStatus::Unauthenticated
        );
    }

    #[test]
    fn opaque_token_is_authenticated() {
        let probe = CookieSessionProbe::from_token(Some("opaque-session-id"));
        assert!(probe.check_session().is_authenticated());
    }

    #[test]
    fn jwt_expiry_is_honored() {
        let live = jwt((Utc::now() + Duration::hours(1)).timestamp());
        let stale = jwt((Utc::now() - Duration::hours(1)).timestamp());

        assert!(CookieSessionProbe::from_token(Some(&live)).check_session().is_authenticated());
        assert_eq!(
            CookieSessionProbe::from_token(Some(&stale)).check_session(),
            SessionStatus::Unauthenticated
        );
        assert_eq!(peek_claims(&live).and_then(|c| c.username).as_deref(), Some("admin"));
    }
}
