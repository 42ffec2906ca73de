//! Stateless HTTP request builder and response parser for the Petfinder API.
//!
//! # Design
//! `PetfinderClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the HTTP round-trip, keeping the core
//! deterministic and free of I/O dependencies.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{AccessToken, Animal, AnimalEnvelope, AnimalsPage, Credentials, TokenResponse};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.petfinder.com/v2";

/// Animals requested by the dashboard in its single list call.
pub const PAGE_LIMIT: u32 = 100;

/// Synchronous, stateless client for the Petfinder API.
#[derive(Debug, Clone)]
pub struct PetfinderClient {
    base_url: String,
}

impl Default for PetfinderClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl PetfinderClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /oauth2/token` with a form-encoded client-credentials grant.
    pub fn build_token_request(&self, credentials: &Credentials) -> HttpRequest {
        let body = format!(
            "grant_type=client_credentials&client_id={}&client_secret={}",
            urlencoding::encode(&credentials.client_id),
            urlencoding::encode(&credentials.client_secret),
        );
        HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/oauth2/token", self.base_url),
            headers: vec![(
                "content-type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            )],
            body: Some(body),
        }
    }

    pub fn build_list_animals(&self, token: &AccessToken) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/animals?limit={PAGE_LIMIT}", self.base_url),
            headers: vec![authorization(token)],
            body: None,
        }
    }

    pub fn build_get_animal(&self, token: &AccessToken, id: u64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/animals/{id}", self.base_url),
            headers: vec![authorization(token)],
            body: None,
        }
    }

    pub fn parse_token(&self, response: HttpResponse) -> Result<AccessToken, ApiError> {
        check_status(&response)?;
        let token: TokenResponse = deserialize(&response.body)?;
        Ok(AccessToken::new(token.access_token))
    }

    /// Animals in the order the server delivered them.
    pub fn parse_list_animals(&self, response: HttpResponse) -> Result<Vec<Animal>, ApiError> {
        check_status(&response)?;
        let page: AnimalsPage = deserialize(&response.body)?;
        Ok(page.animals)
    }

    pub fn parse_get_animal(&self, response: HttpResponse) -> Result<Animal, ApiError> {
        check_status(&response)?;
        let envelope: AnimalEnvelope = deserialize(&response.body)?;
        Ok(envelope.animal)
    }
}

fn authorization(token: &AccessToken) -> (String, String) {
    ("authorization".to_string(), token.bearer())
}

fn deserialize<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    match response.status {
        200 => Ok(()),
        401 => Err(ApiError::Unauthorized),
        404 => Err(ApiError::NotFound),
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}
