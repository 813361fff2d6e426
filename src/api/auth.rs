use serde::Serialize;
use tracing::{info, instrument};
use crate::domain::{Session, User};
use super::dto::{Envelope, LoginDto, UserDto};
use super::{ApiClient, ApiError};

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// Exchanges credentials for a session. The caller decides whether to
    /// store it.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let body: Envelope<LoginDto> = self.post_json("auth/login", &LoginRequest { email, password }).await?;
        let login = body.into_inner();
        let user = login.user.into_user()?;
        info!(user_id = %user.user_id, "Signed in");
        Ok(Session::new(user, login.token))
    }

    #[instrument(skip(self))]
    pub async fn fetch_profile(&self) -> Result<User, ApiError> {
        let body: Envelope<UserDto> = self.get_json("users/profile").await?;
        body.into_inner().into_user()
    }
}
