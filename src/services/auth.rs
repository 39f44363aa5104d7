use crate::models::{AccountPreferences, PublicUser};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use pbkdf2::{Params, Pbkdf2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

pub const DEFAULT_HASH_ROUNDS: u32 = 100_000;
pub const MIN_PASSWORD_CHARS: usize = 6;
const HASH_LEN: usize = 32;

/// Errors that can occur during authentication
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Password must be at least 6 characters")]
    WeakPassword,

    #[error("User already exists")]
    AlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Token error: {0}")]
    TokenError(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

/// Claims carried by issued tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub iat: u64,
    pub exp: u64,
    pub jti: String,
}

#[derive(Debug, Clone)]
struct Account {
    id: String,
    email: String,
    name: String,
    avatar: Option<String>,
    password_hash: String,
    created_at: DateTime<Utc>,
    preferences: AccountPreferences,
}

impl Account {
    fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            avatar: self.avatar.clone(),
            created_at: self.created_at,
            preferences: self.preferences.clone(),
        }
    }
}

/// An issued token and the account it belongs to
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: PublicUser,
}

/// Account registry and token issuer
///
/// Accounts live in memory for the lifetime of the process. Revoked
/// token ids are remembered until the token would have expired anyway.
pub struct AuthService {
    accounts: RwLock<HashMap<String, Account>>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
    hash_rounds: u32,
    revoked: moka::future::Cache<String, ()>,
}

impl AuthService {
    pub fn new(jwt_secret: &str, token_ttl_hours: u64) -> Self {
        Self::with_hash_rounds(jwt_secret, token_ttl_hours, DEFAULT_HASH_ROUNDS)
    }

    pub fn with_hash_rounds(jwt_secret: &str, token_ttl_hours: u64, hash_rounds: u32) -> Self {
        let token_ttl = Duration::from_secs(token_ttl_hours.max(1) * 3600);

        // Unbounded: a revoked jti stays until its token expires
        let revoked = moka::future::Cache::builder()
            .time_to_live(token_ttl)
            .build();

        Self {
            accounts: RwLock::new(HashMap::new()),
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            token_ttl,
            hash_rounds: hash_rounds.max(1),
            revoked,
        }
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Create an account and sign it in
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<AuthSession, AuthError> {
        let email = normalize_email(email);
        let name = name.trim();

        if email.is_empty() || password.is_empty() || name.is_empty() {
            return Err(AuthError::MissingFields);
        }
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AuthError::WeakPassword);
        }

        if self.accounts.read().await.contains_key(&email) {
            return Err(AuthError::AlreadyExists);
        }

        // Hash outside the lock; PBKDF2 is CPU-bound
        let rounds = self.hash_rounds;
        let secret = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&secret, rounds))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))??;

        let account = Account {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.clone(),
            name: name.to_string(),
            avatar: None,
            password_hash,
            created_at: Utc::now(),
            preferences: AccountPreferences::default(),
        };

        let mut accounts = self.accounts.write().await;
        // Another registration may have won while we were hashing
        if accounts.contains_key(&email) {
            return Err(AuthError::AlreadyExists);
        }

        let session = self.issue(&account)?;
        accounts.insert(email, account);
        drop(accounts);

        tracing::info!("Registered account {}", session.user.id);
        Ok(session)
    }

    /// Check credentials and issue a token
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        let account = self
            .accounts
            .read()
            .await
            .get(&email)
            .cloned()
            .ok_or(AuthError::InvalidCredentials)?;

        let stored = account.password_hash.clone();
        let candidate = password.to_string();
        let matches = tokio::task::spawn_blocking(move || verify_password(&candidate, &stored))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        if !matches {
            tracing::debug!("Password mismatch for account {}", account.id);
            return Err(AuthError::InvalidCredentials);
        }

        self.issue(&account)
    }

    /// Validate a token and return its claims
    pub async fn claims(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| {
                tracing::debug!("Token rejected: {}", e);
                AuthError::InvalidToken
            })?;

        if self.revoked.get(&data.claims.jti).await.is_some() {
            return Err(AuthError::InvalidToken);
        }

        Ok(data.claims)
    }

    /// Validate a token and return the account it belongs to
    pub async fn verify(&self, token: &str) -> Result<PublicUser, AuthError> {
        let claims = self.claims(token).await?;

        let accounts = self.accounts.read().await;
        accounts
            .get(&claims.email)
            .filter(|account| account.id == claims.sub)
            .map(Account::public)
            .ok_or(AuthError::UserNotFound)
    }

    /// Revoke a token until it expires
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let claims = self.claims(token).await?;
        self.revoked.insert(claims.jti, ()).await;
        Ok(())
    }

    pub async fn account_count(&self) -> usize {
        self.accounts.read().await.len()
    }

    fn issue(&self, account: &Account) -> Result<AuthSession, AuthError> {
        let now = Utc::now().timestamp().max(0) as u64;
        let claims = Claims {
            sub: account.id.clone(),
            email: account.email.clone(),
            iat: now,
            exp: now + self.token_ttl.as_secs(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;

        Ok(AuthSession {
            token,
            user: account.public(),
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Hash a password into a PHC string (`$pbkdf2-sha256$i=...,l=32$salt$hash`)
pub fn hash_password(password: &str, rounds: u32) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let params = Params {
        rounds,
        output_length: HASH_LEN,
    };

    Pbkdf2
        .hash_password_customized(password.as_bytes(), None, None, params, &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Check a password against a stored PHC string
///
/// Rounds and salt come from the stored hash. Unparseable hashes never match.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(hash) => Pbkdf2.verify_password(password.as_bytes(), &hash).is_ok(),
        Err(e) => {
            tracing::warn!("Stored password hash is unreadable: {}", e);
            false
        }
    }
}
