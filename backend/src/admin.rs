use std::collections::HashMap;
use std::sync::Mutex;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ring::constant_time::verify_slices_are_equal;
use ring::rand::{SecureRandom, SystemRandom};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use shared::AdminSession;
use time::{Duration, OffsetDateTime};
use tracing::{debug, error, warn};
use crate::error::ApiError;
use crate::routes::AppState;
use crate::utils::bearer_token;

pub const SESSION_TTL_HOURS: i64 = 8;
const MAX_SESSIONS: usize = 1000;

/// The admin secret from the deployment's secret store. Without one, nobody
/// can sign in.
pub struct AdminCredentials {
    secret: Option<String>,
}

impl AdminCredentials {
    pub fn disabled() -> Self {
        Self { secret: None }
    }

    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        if secret.trim().is_empty() {
            warn!("AdminCredentials created with empty secret - admin login will be disabled");
            Self { secret: None }
        } else {
            Self { secret: Some(secret) }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    pub fn matches(&self, candidate: &str) -> bool {
        let Some(secret) = &self.secret else {
            warn!("Admin login attempted but ADMIN_SECRET is not configured");
            return false;
        };
        verify_slices_are_equal(secret.as_bytes(), candidate.as_bytes()).is_ok()
    }
}

/// Bearer tokens handed out after a successful admin login.
pub struct AdminSessions {
    tokens: Mutex<HashMap<String, OffsetDateTime>>,
    rng: SystemRandom,
    ttl: Duration,
}

impl Default for AdminSessions {
    fn default() -> Self {
        Self::new(Duration::hours(SESSION_TTL_HOURS))
    }
}

impl AdminSessions {
    pub fn new(ttl: Duration) -> Self {
        Self {
            tokens: Mutex::new(HashMap::new()),
            rng: SystemRandom::new(),
            ttl,
        }
    }

    pub fn issue(&self) -> Result<AdminSession, ApiError> {
        self.issue_at(OffsetDateTime::now_utc())
    }

    pub fn issue_at(&self, now: OffsetDateTime) -> Result<AdminSession, ApiError> {
        let mut bytes = [0u8; 32];
        self.rng.fill(&mut bytes)
            .map_err(|_| ApiError::Internal("failed to generate session token".into()))?;
        let token = URL_SAFE_NO_PAD.encode(bytes);
        let expires_at = now + self.ttl;

        let mut tokens = self.tokens.lock().map_err(|_| {
            error!("Failed to acquire lock for session storage");
            ApiError::Internal("session storage unavailable".into())
        })?;
        if tokens.len() >= MAX_SESSIONS {
            tokens.retain(|_, expiry| *expiry > now);
        }
        if tokens.len() >= MAX_SESSIONS {
            warn!("Admin session table full; dropping all sessions");
            tokens.clear();
        }
        tokens.insert(token.clone(), expires_at);
        debug!("Issued admin session");

        Ok(AdminSession { token, expires_at })
    }

    pub fn verify(&self, token: &str) -> bool {
        self.verify_at(token, OffsetDateTime::now_utc())
    }

    pub fn verify_at(&self, token: &str, now: OffsetDateTime) -> bool {
        let Ok(mut tokens) = self.tokens.lock() else {
            error!("Failed to acquire lock for session storage");
            return false;
        };
        match tokens.get(token) {
            Some(expiry) if *expiry > now => true,
            Some(_) => {
                tokens.remove(token);
                debug!("Admin session expired");
                false
            }
            None => false,
        }
    }

    pub fn revoke(&self, token: &str) -> bool {
        self.tokens.lock()
            .map(|mut tokens| tokens.remove(token).is_some())
            .unwrap_or(false)
    }

    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(OffsetDateTime::now_utc())
    }

    pub fn purge_expired_at(&self, now: OffsetDateTime) -> usize {
        let Ok(mut tokens) = self.tokens.lock() else {
            return 0;
        };
        let before = tokens.len();
        tokens.retain(|_, expiry| *expiry > now);
        before - tokens.len()
    }
}

/// Request guard for admin-only routes: a live session token in the
/// `Authorization: Bearer` header.
#[derive(Debug)]
pub struct AdminToken(String);

impl AdminToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminToken {
    type Error = ApiError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let Some(state) = req.rocket().state::<AppState>() else {
            error!("AppState is not managed; admin routes are unusable");
            return Outcome::Error((Status::InternalServerError, ApiError::Internal("missing state".into())));
        };

        match req.headers().get_one("Authorization").and_then(bearer_token) {
            Some(token) if state.sessions.verify(token) => Outcome::Success(AdminToken(token.to_string())),
            _ => Outcome::Error((Status::Unauthorized, ApiError::Unauthorized)),
        }
    }
}
