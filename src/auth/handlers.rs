use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{CredentialsRequest, MessageResponse, PublicUser, SigninResponse, SignupResponse},
        extractors::AuthUser,
        services::{AuthService, SIGNIN_MESSAGE, SIGNUP_MESSAGE},
    },
    error::AuthError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/signin", post(signin))
        .route("/auth/signout", post(signout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(get_me))
}

#[instrument(skip(auth, payload))]
pub async fn signup(
    State(auth): State<AuthService>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<SignupResponse>, AuthError> {
    let user = auth.signup(&payload.email, &payload.password).await?;
    Ok(Json(SignupResponse {
        message: SIGNUP_MESSAGE,
        user,
    }))
}

#[instrument(skip(auth, payload))]
pub async fn signin(
    State(auth): State<AuthService>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<SigninResponse>, AuthError> {
    let issued = auth.signin(&payload.email, &payload.password).await?;
    Ok(Json(SigninResponse {
        message: SIGNIN_MESSAGE,
        token: issued.token,
    }))
}

#[instrument(skip(auth))]
pub async fn signout(State(auth): State<AuthService>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: auth.signout(),
    })
}

#[instrument(skip(auth, claims))]
pub async fn get_me(
    State(auth): State<AuthService>,
    AuthUser(claims): AuthUser,
) -> Result<Json<PublicUser>, AuthError> {
    Ok(Json(auth.current_user(&claims).await?))
}
