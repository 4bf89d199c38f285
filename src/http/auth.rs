//! Password login (bcrypt + JWT) and the request extractors guarding the API.

use actix_web::{get, post, web, HttpResponse};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Settings;
use crate::db::models::User;
use crate::db::{user_repo, Datastore};
use crate::http::error::{ApiError, ApiResult};

//////////////////////////////////////////////////
// Data structs
//////////////////////////////////////////////////

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user id
    exp: usize,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: User,
}

/// Sign an access token for `user_id` with the configured secret and lifetime.
pub fn issue_token(settings: &Settings, user_id: Uuid) -> jsonwebtoken::errors::Result<String> {
    let exp = (Utc::now() + Duration::minutes(settings.token_ttl_minutes)).timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: usize::try_from(exp).unwrap_or_default(),
    };
    encode(
        &Header::new(settings.jwt_algorithm),
        &claims,
        &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
    )
}

//////////////////////////////////////////////////
// ─────────────  Extractors  ─────────────
//////////////////////////////////////////////////

pub mod extractor {
    use super::Claims;
    use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
    use futures_util::future::LocalBoxFuture;
    use jsonwebtoken::{decode, DecodingKey, Validation};
    use uuid::Uuid;

    use crate::config::Settings;
    use crate::db::models::User;
    use crate::db::{user_repo, Datastore};
    use crate::http::error::ApiError;

    /// Validate `Authorization: Bearer <JWT>` and return the subject id.
    fn bearer_subject(req: &HttpRequest) -> Result<Uuid, ApiError> {
        let hdr = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing Authorization header".into()))?;

        let token = hdr
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("malformed Authorization header".into()))?;

        let settings = req
            .app_data::<web::Data<Settings>>()
            .ok_or_else(|| ApiError::Unauthorized("server mis-config".into()))?;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
            &Validation::new(settings.jwt_algorithm),
        )
        .map_err(|_| ApiError::Unauthorized("invalid / expired token".into()))?;

        Uuid::parse_str(&data.claims.sub).map_err(|_| ApiError::Unauthorized("bad sub".into()))
    }

    /// The authenticated scout, loaded from the datastore.
    #[derive(Debug, Clone)]
    pub struct CurrentUser(pub User);

    impl FromRequest for CurrentUser {
        type Error = ApiError;
        type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

        fn from_request(req: &HttpRequest, _pl: &mut Payload) -> Self::Future {
            let subject = bearer_subject(req);
            let db = req.app_data::<web::Data<Datastore>>().cloned();

            Box::pin(async move {
                let user_id = subject?;
                let db = db.ok_or_else(|| ApiError::Unauthorized("server mis-config".into()))?;
                match user_repo::by_id(&db, user_id).await? {
                    Some(user) => Ok(CurrentUser(user)),
                    None => Err(ApiError::Unauthorized("unknown user".into())),
                }
            })
        }
    }

    impl std::ops::Deref for CurrentUser {
        type Target = User;

        fn deref(&self) -> &User {
            &self.0
        }
    }
}
pub use extractor::CurrentUser;

//////////////////////////////////////////////////
// POST /api/auth/login
//////////////////////////////////////////////////
#[post("/auth/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<Datastore>,
    settings: web::Data<Settings>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { email, password } = body.into_inner();
    let bad_credentials = || ApiError::Unauthorized("Incorrect email or password".into());

    let Some(user) = user_repo::by_email(&db, &email).await? else {
        log::info!("login for unknown email {email}");
        return Err(bad_credentials());
    };

    let hash = user.password_hash.clone();
    let verified = web::block(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| ApiError::internal("password check failed", e))?
        .unwrap_or_else(|e| {
            log::warn!("unreadable password hash for {}: {e}", user.email);
            false
        });
    if !verified {
        return Err(bad_credentials());
    }

    if !user.is_active {
        return Err(ApiError::Forbidden("User account is deactivated".into()));
    }

    let access_token =
        issue_token(&settings, user.id).map_err(|e| ApiError::internal("token signing failed", e))?;
    log::info!("{} logged in", user.email);

    Ok(HttpResponse::Ok().json(TokenResponse {
        access_token,
        token_type: "bearer",
        user,
    }))
}

//////////////////////////////////////////////////
// GET /api/auth/me
//////////////////////////////////////////////////
#[get("/auth/me")]
pub async fn me(user: CurrentUser) -> HttpResponse {
    HttpResponse::Ok().json(user.0)
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login).service(me);
}
