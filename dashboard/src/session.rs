//! Process-wide credential holder.
//!
//! # Design
//! Every view shares one `Session`, so a token fetched for the dashboard is
//! reused by the detail page. A 401 on a data request invalidates the cached
//! token; the next request that needs one fetches a fresh token. Nothing is
//! retried automatically.
//!
//! Each call takes the view's `CancellationToken`. A cancelled call is never
//! sent, and a response that arrives after cancellation is discarded.

use parking_lot::Mutex;
use petboard_core::{AccessToken, ApiError, Credentials, HttpRequest, HttpResponse, PetfinderClient};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::transport::{Transport, TransportError, UreqTransport};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("request cancelled")]
    Cancelled,

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

pub struct Session<T = UreqTransport> {
    client: PetfinderClient,
    credentials: Credentials,
    transport: T,
    token: Mutex<Option<AccessToken>>,
}

impl Session<UreqTransport> {
    pub fn connect(client: PetfinderClient, credentials: Credentials) -> Self {
        Self::new(client, credentials, UreqTransport::new())
    }
}

impl<T: Transport> Session<T> {
    pub fn new(client: PetfinderClient, credentials: Credentials, transport: T) -> Self {
        Self {
            client,
            credentials,
            transport,
            token: Mutex::new(None),
        }
    }

    pub fn client(&self) -> &PetfinderClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Cached token, or a fresh one from the token endpoint.
    ///
    /// The lock is held across the exchange so concurrent callers wait for a
    /// single token request instead of each issuing their own.
    pub fn token(&self, cancel: &CancellationToken) -> Result<AccessToken, SessionError> {
        let mut cached = self.token.lock();
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        let request = self.client.build_token_request(&self.credentials);
        let response = self.send(&request, cancel)?;
        let token = self.client.parse_token(response)?;
        info!(client_id = %self.credentials.client_id, "acquired access token");
        *cached = Some(token.clone());
        Ok(token)
    }

    /// Drop `stale` if it is still the cached token.
    pub fn invalidate(&self, stale: &AccessToken) {
        let mut cached = self.token.lock();
        if cached.as_ref() == Some(stale) {
            warn!("access token rejected, discarding cached credential");
            *cached = None;
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.lock().is_some()
    }

    pub fn send(&self, request: &HttpRequest, cancel: &CancellationToken) -> Result<HttpResponse, SessionError> {
        if cancel.is_cancelled() {
            return Err(SessionError::Cancelled);
        }
        let response = self.transport.execute(request)?;
        if cancel.is_cancelled() {
            return Err(SessionError::Cancelled);
        }
        Ok(response)
    }
}
