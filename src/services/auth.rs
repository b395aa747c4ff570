// src/services/auth.rs

use std::net::IpAddr;

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{LoginAttemptRepository, UserRepository},
    models::auth::{Claims, User},
    services::login_limiter::LoginLimiter,
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    attempt_repo: LoginAttemptRepository,
    limiter: LoginLimiter,
    jwt_secret: String,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        attempt_repo: LoginAttemptRepository,
        limiter: LoginLimiter,
        jwt_secret: String,
        token_ttl: Duration,
    ) -> Self {
        Self { user_repo, attempt_repo, limiter, jwt_secret, token_ttl }
    }

    pub async fn register_user(&self, email: &str, password: &str, name: &str) -> Result<String, AppError> {
        let email = email.trim().to_lowercase();

        // O hashing é caro; roda fora do runtime assíncrono
        let password_clone = password.to_owned();
        let hashed_password = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let new_user = self.user_repo.create_user(&email, name.trim(), &hashed_password).await?;
        tracing::info!(user_id = %new_user.id, "Usuário registrado");

        encode_token(new_user.id, &self.jwt_secret, self.token_ttl)
    }

    pub async fn login_user(&self, email: &str, password: &str, ip: Option<IpAddr>) -> Result<String, AppError> {
        let email = email.trim().to_lowercase();
        let identity = LoginLimiter::identity(ip, &email);

        let previous = self.attempt_repo.find(&identity).await?;
        if self.limiter.is_locked(previous.as_ref(), Utc::now()) {
            tracing::warn!(%identity, "Login bloqueado pelo limitador");
            return Err(AppError::TooManyLoginAttempts);
        }

        match self.check_credentials(&email, password).await {
            Ok(user) => {
                self.attempt_repo.clear(&identity).await?;
                encode_token(user.id, &self.jwt_secret, self.token_ttl)
            }
            Err(AppError::InvalidCredentials) => {
                let attempt = self
                    .attempt_repo
                    .record_failure(&identity, self.limiter.window_expired_before(Utc::now()))
                    .await?;
                tracing::debug!(%identity, attempts = attempt.attempts, "Falha de login registrada");
                Err(AppError::InvalidCredentials)
            }
            Err(e) => Err(e),
        }
    }

    async fn check_credentials(&self, email: &str, password: &str) -> Result<User, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        Ok(user)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = decode_token(token, &self.jwt_secret)?;

        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }
}

pub fn encode_token(user_id: Uuid, secret: &str, ttl: Duration) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + ttl;

    let claims = Claims {
        sub: user_id,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_ref()))?)
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_ref()), &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)
}
