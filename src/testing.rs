//! Test doubles and fixtures shared by the unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, header},
    response::Response,
};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::de::DeserializeOwned;
use tower::ServiceExt;
use tracing::Level;
use uuid::Uuid;

use crate::app::build_router;
use crate::middleware::check::{CheckLogger, TracingLogger};
use crate::repos::error::RepoError;
use crate::services::{
    environment::{EnvironmentResolver, Share, ShareLookup, UserLookup},
    session::SessionVerifier,
    settings::StaticSettings,
    urls::UrlGenerator,
};
use crate::state::AppState;

pub const SECRET: &str = "test-secret-test-secret-test-secret!";
pub const ISSUER: &str = "https://auth.example.test";
pub const AUDIENCE: &str = "gallery";

pub fn verifier() -> SessionVerifier {
    SessionVerifier::new(SECRET, ISSUER, AUDIENCE, 0)
}

pub fn session_token(user: Uuid) -> String {
    session_token_with(&user.to_string(), AUDIENCE, 3600)
}

pub fn session_token_with(sub: &str, audience: &str, expires_in_secs: i64) -> String {
    let claims = serde_json::json!({
        "sub": sub,
        "iss": ISSUER,
        "aud": audience,
        "exp": chrono::Utc::now().timestamp() + expires_in_secs,
    });

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn share(id: i64, token: &str, owner: Uuid, path: &str) -> Share {
    Share {
        id,
        token: token.to_string(),
        owner,
        path: path.to_string(),
        password_hash: None,
        expires_at: None,
    }
}

/// bcrypt at its minimum cost, to keep tests fast.
pub fn password_hash(password: &str) -> String {
    bcrypt::hash(password, 4).unwrap()
}

/// In-memory shares and accounts. Counts share lookups.
#[derive(Default)]
pub struct MemoryDirectory {
    shares: HashMap<String, Share>,
    users: HashSet<Uuid>,
    failing: bool,
    share_lookups: AtomicUsize,
}

impl MemoryDirectory {
    pub fn with_share(mut self, share: Share) -> Self {
        self.shares.insert(share.token.clone(), share);
        self
    }

    pub fn with_user(mut self, user: Uuid) -> Self {
        self.users.insert(user);
        self
    }

    /// Every lookup fails like an unreachable database.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn share_lookups(&self) -> usize {
        self.share_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ShareLookup for MemoryDirectory {
    async fn find_by_token(&self, token: &str) -> Result<Option<Share>, RepoError> {
        self.share_lookups.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(RepoError::Db(sqlx::Error::PoolTimedOut));
        }
        Ok(self.shares.get(token).cloned())
    }
}

#[async_trait]
impl UserLookup for MemoryDirectory {
    async fn user_exists(&self, user_id: Uuid) -> Result<bool, RepoError> {
        if self.failing {
            return Err(RepoError::Db(sqlx::Error::PoolTimedOut));
        }
        Ok(self.users.contains(&user_id))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: Level,
    pub template: &'static str,
    pub rendered: String,
}

#[derive(Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl RecordingLogger {
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

impl CheckLogger for RecordingLogger {
    fn log(&self, level: Level, template: &'static str, context: &[(&'static str, String)]) {
        let rendered = crate::middleware::check::interpolate(template, context);
        self.entries.lock().unwrap().push(LogEntry {
            level,
            template,
            rendered,
        });
    }
}

/// The application router over in-memory collaborators.
pub struct TestApp {
    pub directory: Arc<MemoryDirectory>,
    sharing_enabled: bool,
    logger: Arc<dyn CheckLogger>,
}

impl TestApp {
    pub fn new(directory: MemoryDirectory) -> Self {
        Self {
            directory: Arc::new(directory),
            sharing_enabled: true,
            logger: Arc::new(TracingLogger),
        }
    }

    pub fn with_sharing(mut self, enabled: bool) -> Self {
        self.sharing_enabled = enabled;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn CheckLogger>) -> Self {
        self.logger = logger;
        self
    }

    fn state(&self) -> AppState {
        let resolver = EnvironmentResolver::new(
            self.directory.clone(),
            self.directory.clone(),
            Arc::new(verifier()),
        );

        AppState::new(
            "galleryplus",
            Arc::new(StaticSettings::new(self.sharing_enabled)),
            Arc::new(resolver),
            UrlGenerator::new("galleryplus", ""),
            self.logger.clone(),
        )
    }

    pub async fn get(&self, uri: &str, accept: &str, bearer: Option<&str>) -> Response {
        self.send(Method::GET, uri, accept, bearer).await
    }

    pub async fn delete(&self, uri: &str, accept: &str, bearer: Option<&str>) -> Response {
        self.send(Method::DELETE, uri, accept, bearer).await
    }

    async fn send(&self, method: Method, uri: &str, accept: &str, bearer: Option<&str>) -> Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::ACCEPT, accept);
        if let Some(bearer) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", bearer));
        }

        build_router(self.state())
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn json<T: DeserializeOwned>(response: Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    pub async fn text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }
}
