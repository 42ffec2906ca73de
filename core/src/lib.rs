//! Synchronous API client core for the Petfinder adoption dashboard.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), and derives everything the
//! dashboard displays from the fetched animals.
//!
//! # Design
//! - `PetfinderClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit.
//! - Data requests take an `AccessToken`, which only `parse_token` can
//!   produce, so "token before data" holds by construction.
//! - `view_model` is pure: filters narrow the list, statistics always cover
//!   the full list.

pub mod client;
pub mod error;
pub mod http;
pub mod route;
pub mod state;
pub mod types;
pub mod view_model;

pub use client::{PetfinderClient, DEFAULT_BASE_URL, PAGE_LIMIT};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use route::Route;
pub use state::{ViewError, ViewState};
pub use types::{AccessToken, AgeBracket, Animal, Credentials};
pub use view_model::{filter_animals, Dashboard, FilterState, Statistics, TypeFilter};
