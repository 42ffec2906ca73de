//! Domain DTOs for the Petfinder v2 API.
//!
//! # Design
//! These types mirror the slice of the Petfinder schema the dashboard reads.
//! Everything the API may omit or send as `null` is an `Option` or a
//! defaulted collection so a sparse record never fails to parse; fields the
//! dashboard does not use are ignored. The mock-server crate keeps its own
//! copy of the schema and the integration tests catch drift between the two.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Client identifier and secret for the client-credentials grant.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Bearer token presented on every data request.
///
/// Only `PetfinderClient::parse_token` creates one, and every data request
/// builder takes `&AccessToken`, so a data request cannot be built before a
/// token response has been parsed.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub(crate) fn new(secret: String) -> Self {
        Self(secret)
    }

    pub fn secret(&self) -> &str {
        &self.0
    }

    /// Value for the `authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Body of a successful `POST /oauth2/token`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Ordinal age scale used for display and for the average-age card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeBracket {
    Baby,
    Young,
    Adult,
    Senior,
}

impl AgeBracket {
    pub const ALL: [AgeBracket; 4] = [
        AgeBracket::Baby,
        AgeBracket::Young,
        AgeBracket::Adult,
        AgeBracket::Senior,
    ];

    /// Numeric weight: Baby = 1 through Senior = 4.
    pub fn value(self) -> u32 {
        match self {
            AgeBracket::Baby => 1,
            AgeBracket::Young => 2,
            AgeBracket::Adult => 3,
            AgeBracket::Senior => 4,
        }
    }

    /// Zero-based position on the scale, `None` outside `0..=3`.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Exact Petfinder spelling, `None` for anything else.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|bracket| bracket.label() == value)
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeBracket::Baby => "Baby",
            AgeBracket::Young => "Young",
            AgeBracket::Adult => "Adult",
            AgeBracket::Senior => "Senior",
        }
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breeds {
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub secondary: Option<String>,
    #[serde(default)]
    pub mixed: bool,
    #[serde(default)]
    pub unknown: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Colors {
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub secondary: Option<String>,
    #[serde(default)]
    pub tertiary: Option<String>,
}

/// One photo at the resolutions Petfinder serves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
    #[serde(default)]
    pub full: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Address,
}

/// A single adoptable animal as delivered by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animal {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub breeds: Breeds,
    #[serde(default)]
    pub colors: Colors,
    /// `None` when the API sends an age outside the known scale, or none at all.
    #[serde(default, deserialize_with = "lenient_age")]
    pub age: Option<AgeBracket>,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub contact: Contact,
    #[serde(default)]
    pub url: Option<String>,
}

fn lenient_age<'de, D>(deserializer: D) -> Result<Option<AgeBracket>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(AgeBracket::parse))
}

impl Animal {
    /// Age for display; unknown ages read "Unknown".
    pub fn age_label(&self) -> &'static str {
        self.age.map_or("Unknown", AgeBracket::label)
    }

    /// Medium-resolution URL of the first photo, used on list rows.
    pub fn thumbnail(&self) -> Option<&str> {
        self.photos.first().and_then(|photo| photo.medium.as_deref())
    }
}

/// Pagination block that accompanies list responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub count_per_page: Option<u32>,
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

/// Body of `GET /animals`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnimalsPage {
    pub animals: Vec<Animal>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Body of `GET /animals/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnimalEnvelope {
    pub animal: Animal,
}
