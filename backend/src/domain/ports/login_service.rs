//! Driving port for the development login.
//!
//! Real credential storage is out of scope; the fixture authenticator accepts
//! one well-known account so the session-backed endpoints can be exercised.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserId};

/// Username accepted by [`FixtureLoginService`].
pub const FIXTURE_USERNAME: &str = "recycler";
/// Password accepted by [`FixtureLoginService`].
pub const FIXTURE_PASSWORD: &str = "descarte";
/// User id returned for the fixture account.
pub const FIXTURE_USER_ID: &str = "8f14e45f-ceea-4e7a-9b1a-2d3c4b5a6f70";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

/// Authenticator backed by a single fixture account.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        if credentials.username() != FIXTURE_USERNAME || credentials.password() != FIXTURE_PASSWORD
        {
            return Err(Error::unauthorized("invalid credentials"));
        }
        UserId::new(FIXTURE_USER_ID)
            .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))
    }
}
