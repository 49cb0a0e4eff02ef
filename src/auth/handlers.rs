use crate::{auth::auth::AuthUser, error::Error, model::role::Role, store::identity::IdentityStore};
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

// auth end points

#[derive(Deserialize, ToSchema)]
pub struct RegisterReq {
    #[schema(example = "Alice")]
    pub name: String,
    #[schema(example = "secret")]
    pub password: String,
    pub role: Role,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReq {
    #[schema(example = "Alice")]
    pub name: String,
    #[schema(example = "secret")]
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "Alice")]
    pub name: String,
    pub role: Role,
}

impl From<crate::model::user::User> for UserResponse {
    fn from(user: crate::model::user::User) -> Self {
        Self {
            name: user.name,
            role: user.role,
        }
    }
}

/// User registration handler. Signs the new identity in on success.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "User registered and signed in", body = UserResponse),
        (status = 400, description = "Empty name or password"),
        (status = 409, description = "Name already registered", body = Object, example = json!({
            "error": "name already registered: Alice"
        }))
    ),
    tag = "Auth"
)]
pub async fn register(
    body: web::Json<RegisterReq>,
    identity: web::Data<IdentityStore>,
) -> Result<HttpResponse, Error> {
    let name = body.name.trim();

    if name.is_empty() || body.password.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "Name and password must not be empty"
        })));
    }

    let user = identity.register(name, &body.password, body.role)?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Login handler. Sets the persisted session pointer on success.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Signed in", body = UserResponse),
        (status = 400, description = "Empty name or password"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(identity, body), fields(name = %body.name))]
pub async fn login(
    body: web::Json<LoginReq>,
    identity: web::Data<IdentityStore>,
) -> Result<HttpResponse, Error> {
    info!("Login request received");

    if body.name.trim().is_empty() || body.password.is_empty() {
        info!("Validation failed: empty name or password");
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "Name and password must not be empty"
        })));
    }

    debug!("Verifying credentials");
    let user = identity.authenticate(&body.name, &body.password)?;
    identity.set_session(&user.name)?;

    info!("Login successful");
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// Logout handler. Clears the session; idempotent.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 204, description = "Session cleared")
    ),
    tag = "Auth"
)]
pub async fn logout(identity: web::Data<IdentityStore>) -> Result<HttpResponse, Error> {
    identity.clear_session()?;
    Ok(HttpResponse::NoContent().finish())
}

/// Currently signed-in user.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not signed in")
    ),
    tag = "Auth"
)]
pub async fn me(auth: AuthUser) -> impl Responder {
    HttpResponse::Ok().json(UserResponse {
        name: auth.name,
        role: auth.role,
    })
}
