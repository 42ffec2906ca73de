use std::{collections::HashSet, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const CLIENT_ID: &str = "mock-client";
pub const CLIENT_SECRET: &str = "";

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 100;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Breeds {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub mixed: bool,
    pub unknown: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Colors {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub tertiary: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Photo {
    pub small: String,
    pub medium: String,
    pub large: String,
    pub full: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Address {
    pub city: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Contact {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Address,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Animal {
    pub id: u64,
    pub organization_id: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub species: String,
    pub breeds: Breeds,
    pub colors: Colors,
    pub age: String,
    pub gender: String,
    pub size: String,
    pub tags: Vec<String>,
    pub name: String,
    pub description: Option<String>,
    pub photos: Vec<Photo>,
    pub status: String,
    pub contact: Contact,
}

#[derive(Serialize, Deserialize)]
pub struct TokenResponse {
    pub token_type: String,
    pub expires_in: u64,
    pub access_token: String,
}

#[derive(Serialize, Deserialize)]
pub struct Pagination {
    pub count_per_page: usize,
    pub total_count: usize,
    pub current_page: usize,
    pub total_pages: usize,
}

#[derive(Serialize, Deserialize)]
pub struct AnimalsPage {
    pub animals: Vec<Animal>,
    pub pagination: Pagination,
}

#[derive(Serialize, Deserialize)]
pub struct AnimalEnvelope {
    pub animal: Animal,
}

#[derive(Deserialize)]
pub struct TokenForm {
    pub grant_type: String,
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
}

/// Shared server state: accepted credentials, issued tokens, and the data set.
#[derive(Clone)]
pub struct MockState {
    inner: Arc<Inner>,
}

struct Inner {
    client_id: String,
    client_secret: String,
    animals: Vec<Animal>,
    tokens: RwLock<HashSet<String>>,
}

impl MockState {
    pub fn new(client_id: &str, client_secret: &str, animals: Vec<Animal>) -> Self {
        Self {
            inner: Arc::new(Inner {
                client_id: client_id.to_string(),
                client_secret: client_secret.to_string(),
                animals,
                tokens: RwLock::new(HashSet::new()),
            }),
        }
    }

    /// Default credentials with the bundled sample animals.
    pub fn seeded() -> Self {
        Self::new(CLIENT_ID, CLIENT_SECRET, sample_animals())
    }

    /// Forget every issued token, as if they had all expired.
    pub async fn revoke_tokens(&self) {
        self.inner.tokens.write().await.clear();
    }

    pub async fn issued_tokens(&self) -> usize {
        self.inner.tokens.read().await.len()
    }

    async fn authorized(&self, headers: &HeaderMap) -> bool {
        let Some(token) = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
        else {
            return false;
        };
        self.inner.tokens.read().await.contains(token)
    }
}

pub fn app(state: MockState) -> Router {
    Router::new()
        .route("/oauth2/token", post(issue_token))
        .route("/animals", get(list_animals))
        .route("/animals/{id}", get(get_animal))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

async fn issue_token(
    State(state): State<MockState>,
    Form(form): Form<TokenForm>,
) -> Result<Json<TokenResponse>, StatusCode> {
    if form.grant_type != "client_credentials" {
        return Err(StatusCode::BAD_REQUEST);
    }
    if form.client_id != state.inner.client_id || form.client_secret != state.inner.client_secret {
        tracing::debug!(client_id = %form.client_id, "rejected credentials");
        return Err(StatusCode::UNAUTHORIZED);
    }
    let token = Uuid::new_v4().to_string();
    state.inner.tokens.write().await.insert(token.clone());
    Ok(Json(TokenResponse {
        token_type: "Bearer".to_string(),
        expires_in: 3600,
        access_token: token,
    }))
}

async fn list_animals(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<AnimalsPage>, StatusCode> {
    if !state.authorized(&headers).await {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let total = state.inner.animals.len();
    let animals: Vec<Animal> = state.inner.animals.iter().take(limit).cloned().collect();
    Ok(Json(AnimalsPage {
        animals,
        pagination: Pagination {
            count_per_page: limit,
            total_count: total,
            current_page: 1,
            total_pages: total.div_ceil(limit).max(1),
        },
    }))
}

async fn get_animal(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<AnimalEnvelope>, StatusCode> {
    if !state.authorized(&headers).await {
        return Err(StatusCode::UNAUTHORIZED);
    }
    state
        .inner
        .animals
        .iter()
        .find(|animal| animal.id == id)
        .cloned()
        .map(|animal| Json(AnimalEnvelope { animal }))
        .ok_or(StatusCode::NOT_FOUND)
}

fn photo(slug: &str) -> Photo {
    let url = |size: &str| format!("https://photos.example.org/{slug}/{size}.jpg");
    Photo {
        small: url("small"),
        medium: url("medium"),
        large: url("large"),
        full: url("full"),
    }
}

#[allow(clippy::too_many_arguments)]
fn animal(
    id: u64,
    name: &str,
    kind: &str,
    breed: (&str, Option<&str>),
    color: (&str, Option<&str>),
    age: &str,
    gender: &str,
    size: &str,
) -> Animal {
    Animal {
        id,
        organization_id: "NJ333".to_string(),
        url: format!("https://www.petfinder.com/animal/{id}"),
        kind: kind.to_string(),
        species: kind.to_string(),
        breeds: Breeds {
            primary: Some(breed.0.to_string()),
            secondary: breed.1.map(str::to_string),
            mixed: breed.1.is_some(),
            unknown: false,
        },
        colors: Colors {
            primary: Some(color.0.to_string()),
            secondary: color.1.map(str::to_string),
            tertiary: None,
        },
        age: age.to_string(),
        gender: gender.to_string(),
        size: size.to_string(),
        tags: Vec::new(),
        name: name.to_string(),
        description: None,
        photos: Vec::new(),
        status: "adoptable".to_string(),
        contact: Contact {
            email: Some("adopt@shelter.example.org".to_string()),
            phone: None,
            address: Address {
                city: Some("Jersey City".to_string()),
                state: Some("NJ".to_string()),
                postcode: Some("07097".to_string()),
                country: Some("US".to_string()),
            },
        },
    }
}

/// Small, mixed data set: dogs, cats, and a rabbit across every age bracket.
pub fn sample_animals() -> Vec<Animal> {
    let mut pepper = animal(42, "Pepper", "Dog", ("Labrador Retriever", None), ("Black", None), "Young", "Female", "Large");
    pepper.description = Some("Pepper is a goofy lab who loves tennis balls.".to_string());
    pepper.tags = vec!["Friendly".to_string(), "Playful".to_string()];
    pepper.photos = vec![photo("pepper-1"), photo("pepper-2")];
    pepper.contact.phone = Some("(555) 010-4242".to_string());

    let mut nebula = animal(101, "Nebula", "Cat", ("Domestic Short Hair", Some("Siamese")), ("Tortoiseshell", Some("Cream")), "Baby", "Female", "Small");
    nebula.description = Some("Tiny, curious, and fond of laps.".to_string());
    nebula.photos = vec![photo("nebula-1")];
    nebula.tags = vec!["Curious".to_string()];

    let biscuit = animal(102, "Biscuit", "Dog", ("Beagle", Some("Basset Hound")), ("Tricolor", None), "Senior", "Male", "Medium");

    let mut clover = animal(103, "Clover", "Rabbit", ("Lionhead", None), ("White", None), "Adult", "Female", "Small");
    clover.description = Some("Calm bunny, litter trained.".to_string());

    let mut miso = animal(104, "Miso", "Cat", ("Tabby", None), ("Orange", None), "Adult", "Male", "Medium");
    miso.photos = vec![photo("miso-1")];

    let rocket = animal(105, "Rocket", "Dog", ("Border Collie", None), ("Black", Some("White")), "Baby", "Male", "Medium");

    vec![pepper, nebula, biscuit, clover, miso, rocket]
}
