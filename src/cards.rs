//! Pokemon TCG API card lookup.

use serde::Deserialize;
use tracing::debug;

use crate::error::FetchError;
use crate::state::CardSummary;

pub const TCG_API_BASE: &str = "https://api.pokemontcg.io/v2";
pub const MAX_CARDS: usize = 10;
const API_KEY_HEADER: &str = "X-Api-Key";

#[derive(Clone, Debug, Deserialize)]
struct CardsResponse {
    #[serde(default)]
    data: Vec<CardResponse>,
}

#[derive(Clone, Debug, Deserialize)]
struct CardResponse {
    name: String,
    #[serde(default)]
    images: CardImages,
    set: CardSet,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct CardImages {
    small: Option<String>,
    large: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct CardSet {
    name: String,
}

#[derive(Clone, Debug)]
pub struct CardMatcher {
    client: reqwest::Client,
    base: String,
    api_key: Option<String>,
}

impl CardMatcher {
    pub fn new(client: reqwest::Client, base: impl Into<String>, api_key: Option<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self {
            client,
            base,
            api_key,
        }
    }

    /// Up to [`MAX_CARDS`] cards in API order. An empty list is a normal
    /// result, not an error.
    pub async fn find_cards(&self, entity_name: &str) -> Result<Vec<CardSummary>, FetchError> {
        let url = card_query_url(&self.base, entity_name);
        debug!(%url, "searching cards");

        let mut request = self.client.get(&url);
        if let Some(key) = self.api_key.as_deref() {
            request = request.header(API_KEY_HEADER, key);
        }
        let response = request.send().await.map_err(FetchError::unavailable)?;
        let response = response.error_for_status().map_err(FetchError::unavailable)?;
        let body: CardsResponse = response.json().await.map_err(FetchError::unavailable)?;
        Ok(summarize(body))
    }
}

pub fn card_query_url(base: &str, entity_name: &str) -> String {
    let name = capitalize_first(entity_name);
    format!("{base}/cards?q=name:{}", urlencoding::encode(&name))
}

/// The card API matches names as printed: "Pikachu", not "pikachu".
pub fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn summarize(body: CardsResponse) -> Vec<CardSummary> {
    body.data
        .into_iter()
        .take(MAX_CARDS)
        .map(|card| CardSummary {
            name: card.name,
            image_url: card.images.large.or(card.images.small).unwrap_or_default(),
            set_name: card.set.name,
        })
        .collect()
}
