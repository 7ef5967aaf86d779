use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization};
use axum_extra::TypedHeader;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

// Lo que viaja DENTRO del token (lo emite el servicio de login)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
    pub role: String,
}

pub fn decode_claims(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized)
}

/// Solo deja pasar tokens válidos con rol "admin"
pub async fn admin_middleware(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(auth) = auth.ok_or(AppError::Unauthorized)?;

    // Token falso, expirado o manipulado
    let claims = decode_claims(auth.token(), &state.jwt_secret)?;

    if claims.role != "admin" {
        return Err(AppError::Forbidden);
    }

    // Adjuntamos claims por si se necesitan aguas abajo
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

#[cfg(test)]
pub fn issue_token(secret: &str, role: &str) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: "admin@example.com".to_string(),
        exp: now + 3600,
        iat: now,
        role: role.to_string(),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
}
