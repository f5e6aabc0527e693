//! Bearer-token authentication and the `/api/auth` endpoints.

use api_types::auth::{AuthResponse, LoginRequest, RegisterRequest, UserView};
use axum::{
    Extension, Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use chrono::{Duration, Utc};
use engine::{EngineError, User};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

/// The contents of a JSON Web Token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the token owner.
    pub sub: String,
    /// Id of the token owner.
    pub uid: Uuid,
    pub exp: i64,
    pub iat: i64,
}

/// HS256 signing material plus token lifetime.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, ServerError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.username.clone(),
            uid: user.id,
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(ServerError::Token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, ServerError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|err| {
                tracing::debug!("rejected token: {err}");
                ServerError::Unauthorized("invalid token".to_string())
            })
    }
}

/// Resolve the bearer token to a user and store it in the request extensions.
pub(crate) async fn require_user(
    State(state): State<ServerState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|rejection| {
        let message = if rejection.is_missing() {
            "missing bearer token"
        } else {
            "malformed authorization header"
        };
        ServerError::Unauthorized(message.to_string())
    })?;
    let claims = state.keys.verify(bearer.token())?;

    let user = match state.engine.user_by_username(&claims.sub).await {
        Ok(user) => user,
        Err(EngineError::KeyNotFound(_)) => {
            return Err(ServerError::Unauthorized("unknown user".to_string()));
        }
        Err(err) => return Err(err.into()),
    };
    // A recreated account with the same username must not inherit old tokens.
    if user.id != claims.uid {
        return Err(ServerError::Unauthorized("unknown user".to_string()));
    }

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn auth_response(state: &ServerState, user: &User) -> Result<AuthResponse, ServerError> {
    Ok(AuthResponse {
        token: state.keys.issue(user)?,
        user_id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
    })
}

pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ServerError> {
    let user = state
        .engine
        .register(&payload.username, &payload.email, &payload.password)
        .await?;
    Ok((StatusCode::CREATED, Json(auth_response(&state, &user)?)))
}

pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ServerError> {
    let user = state
        .engine
        .login(&payload.username_or_email, &payload.password)
        .await?;
    Ok(Json(auth_response(&state, &user)?))
}

pub async fn me(Extension(user): Extension<User>) -> Json<UserView> {
    Json(UserView {
        id: user.id,
        username: user.username,
        email: user.email,
        roles: user.roles,
        created_at: user.created_at,
    })
}
