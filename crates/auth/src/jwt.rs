//! JWT token generation and validation.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    AuthError, AuthResult, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_JWT_ISSUER,
    DEFAULT_REFRESH_EXPIRATION_HOURS,
};

/// Purpose of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived credential sent with API requests.
    Access,
    /// Longer-lived credential only accepted by the refresh endpoint.
    Refresh,
}

impl TokenKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

/// JWT claims for SoftDesk tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,
    /// Login name at issuance.
    pub username: String,
    /// Token purpose.
    pub kind: TokenKind,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
    /// Issuer.
    pub iss: String,
    /// JWT ID.
    pub jti: String,
}

impl Claims {
    /// Creates new claims for a user.
    pub fn new(
        user_id: i64,
        username: String,
        kind: TokenKind,
        expiration_hours: u64,
        issuer: &str,
    ) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours as i64);

        Self {
            sub: user_id.to_string(),
            username,
            kind,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: issuer.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Returns the user ID.
    pub fn user_id(&self) -> AuthResult<i64> {
        self.sub.parse().map_err(|_| AuthError::InvalidToken)
    }
}

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in hours.
    pub expiration_hours: u64,
    /// Refresh token expiration in hours.
    pub refresh_expiration_hours: u64,
    /// Token issuer.
    pub issuer: String,
}

impl JwtConfig {
    /// Creates a new JWT configuration.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            refresh_expiration_hours: DEFAULT_REFRESH_EXPIRATION_HOURS,
            issuer: DEFAULT_JWT_ISSUER.to_string(),
        }
    }

    /// Sets the access token expiration time in hours.
    pub fn with_expiration_hours(mut self, hours: u64) -> Self {
        self.expiration_hours = hours;
        self
    }

    /// Sets the refresh token expiration time in hours.
    pub fn with_refresh_expiration_hours(mut self, hours: u64) -> Self {
        self.refresh_expiration_hours = hours;
        self
    }

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }
}

/// An access token together with the refresh token that renews it.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// JWT token manager.
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("issuer", &self.config.issuer)
            .field("expiration_hours", &self.config.expiration_hours)
            .finish_non_exhaustive()
    }
}

impl JwtManager {
    /// Creates a new JWT manager.
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    fn generate_token(&self, user_id: i64, username: &str, kind: TokenKind) -> AuthResult<String> {
        let hours = match kind {
            TokenKind::Access => self.config.expiration_hours,
            TokenKind::Refresh => self.config.refresh_expiration_hours,
        };
        let claims = Claims::new(
            user_id,
            username.to_string(),
            kind,
            hours,
            &self.config.issuer,
        );

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::JwtEncoding(e.to_string()))
    }

    /// Generates an access token for a user.
    pub fn generate_access_token(&self, user_id: i64, username: &str) -> AuthResult<String> {
        self.generate_token(user_id, username, TokenKind::Access)
    }

    /// Generates an access token and a refresh token for a user.
    pub fn generate_token_pair(&self, user_id: i64, username: &str) -> AuthResult<TokenPair> {
        Ok(TokenPair {
            access: self.generate_token(user_id, username, TokenKind::Access)?,
            refresh: self.generate_token(user_id, username, TokenKind::Refresh)?,
        })
    }

    /// Validates and decodes a token of any kind.
    pub fn validate_token(&self, token: &str) -> AuthResult<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;

        Ok(token_data.claims)
    }

    /// Validates a token and checks that it is of the expected kind.
    pub fn validate_token_kind(&self, token: &str, expected: TokenKind) -> AuthResult<Claims> {
        let claims = self.validate_token(token)?;
        if claims.kind != expected {
            return Err(AuthError::WrongTokenKind {
                expected: expected.as_str(),
            });
        }
        Ok(claims)
    }
}
