//! PokeAPI client: the entity lookup and its best-effort enrichment fetches.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::evolution::{self, ChainLink};
use crate::state::{Enrichment, EntityQuery, EntitySnapshot, EntityStat, EvolutionNode};

pub const API_BASE: &str = "https://pokeapi.co/api/v2";
pub const PLACEHOLDER_SPRITE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/0.png";
const SPRITE_BASE: &str = "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";
const CRY_BASE: &str = "https://raw.githubusercontent.com/PokeAPI/cries/main/cries/pokemon/latest";

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ApiResource {
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    height: u16,
    weight: u16,
    types: Vec<PokemonTypeSlot>,
    stats: Vec<PokemonStatSlot>,
    #[serde(default)]
    moves: Vec<PokemonMoveSlot>,
    sprites: serde_json::Value,
    species: NamedResource,
    location_area_encounters: String,
    cries: Option<PokemonCries>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u16,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonMoveSlot {
    #[serde(rename = "move")]
    move_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonCries {
    latest: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonSpeciesResponse {
    #[serde(default)]
    is_legendary: bool,
    evolution_chain: Option<ApiResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct EvolutionChainResponse {
    chain: ChainLink,
}

#[derive(Clone, Debug, Deserialize)]
struct EncounterResponse {
    location_area: NamedResource,
}

/// Resolves entities against the primary API.
#[derive(Clone, Debug)]
pub struct EntityFetcher {
    client: reqwest::Client,
    base: String,
}

impl EntityFetcher {
    pub fn new(client: reqwest::Client, base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self { client, base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub async fn fetch_by_id(&self, id: u32) -> Result<EntitySnapshot, FetchError> {
        if id == 0 {
            return Err(FetchError::NotFound(id.to_string()));
        }
        self.fetch(&EntityQuery::Id(id)).await
    }

    pub async fn fetch_by_name(&self, name: &str) -> Result<EntitySnapshot, FetchError> {
        match EntityQuery::parse(name) {
            Some(query) => self.fetch(&query).await,
            None => Err(FetchError::NotFound(name.to_string())),
        }
    }

    /// Single `GET {base}/pokemon/{idOrName}`; every failure is `NotFound`.
    pub async fn fetch(&self, query: &EntityQuery) -> Result<EntitySnapshot, FetchError> {
        let url = format!("{}/pokemon/{}", self.base, query.path_segment());
        debug!(%url, "fetching entity");
        match self.get_json::<PokemonResponse>(&url).await {
            Ok(response) => Ok(snapshot_from_response(response)),
            Err(error) => {
                warn!(%query, %error, "entity lookup failed");
                Err(FetchError::NotFound(query.path_segment()))
            }
        }
    }

    /// Species (legendary flag, then evolution chain) and encounters run
    /// concurrently. Each section keeps its own outcome.
    pub async fn fetch_enrichment(&self, species_url: &str, encounters_url: &str) -> Enrichment {
        let ((legendary, evolution), encounters) = tokio::join!(
            self.fetch_species_and_chain(species_url),
            self.fetch_encounters(encounters_url),
        );
        Enrichment {
            legendary: legendary.map_err(|error| error.to_string()),
            evolution: evolution.map_err(|error| error.to_string()),
            encounters: encounters.map_err(|error| error.to_string()),
        }
    }

    async fn fetch_species_and_chain(
        &self,
        species_url: &str,
    ) -> (
        Result<bool, FetchError>,
        Result<Vec<EvolutionNode>, FetchError>,
    ) {
        let species = match self.get_json::<PokemonSpeciesResponse>(species_url).await {
            Ok(species) => species,
            Err(error) => {
                warn!(%species_url, %error, "species unavailable");
                let message = error.to_string();
                return (
                    Err(FetchError::Unavailable(message.clone())),
                    Err(FetchError::Unavailable(message)),
                );
            }
        };
        let evolution = match species.evolution_chain {
            Some(chain) => self.fetch_evolution_chain(&chain.url).await,
            None => Err(FetchError::Unavailable("species has no evolution chain".into())),
        };
        (Ok(species.is_legendary), evolution)
    }

    pub async fn fetch_evolution_chain(&self, url: &str) -> Result<Vec<EvolutionNode>, FetchError> {
        let response: EvolutionChainResponse = self.get_json(url).await.inspect_err(|error| {
            warn!(%url, %error, "evolution chain unavailable");
        })?;
        Ok(evolution::first_branch(&response.chain))
    }

    /// Location-area names in API order.
    pub async fn fetch_encounters(&self, url: &str) -> Result<Vec<String>, FetchError> {
        let response: Vec<EncounterResponse> = self.get_json(url).await.inspect_err(|error| {
            warn!(%url, %error, "encounters unavailable");
        })?;
        Ok(response
            .into_iter()
            .map(|encounter| encounter.location_area.name)
            .collect())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::unavailable)?;
        let response = response.error_for_status().map_err(FetchError::unavailable)?;
        response.json::<T>().await.map_err(FetchError::unavailable)
    }
}

pub fn sprite_url_for(id: u32) -> String {
    format!("{SPRITE_BASE}/{id}.png")
}

fn snapshot_from_response(response: PokemonResponse) -> EntitySnapshot {
    let sprite_url = pointer_string(&response.sprites, "/front_default")
        .unwrap_or_else(|| PLACEHOLDER_SPRITE.to_string());
    let cry_url = response
        .cries
        .and_then(|cries| cries.latest)
        .unwrap_or_else(|| format!("{CRY_BASE}/{}.ogg", response.id));

    EntitySnapshot {
        id: response.id,
        name: response.name,
        sprite_url,
        cry_url,
        height: response.height,
        weight: response.weight,
        stats: response
            .stats
            .into_iter()
            .map(|slot| EntityStat {
                name: slot.stat.name,
                value: slot.base_stat,
            })
            .collect(),
        types: response
            .types
            .into_iter()
            .map(|slot| slot.type_info.name)
            .collect(),
        moves: response
            .moves
            .into_iter()
            .map(|slot| slot.move_info.name)
            .collect(),
        species_url: response.species.url,
        encounters_url: response.location_area_encounters,
    }
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn pikachu_json() -> serde_json::Value {
        json!({
            "id": 25,
            "name": "pikachu",
            "height": 4,
            "weight": 60,
            "types": [{"slot": 1, "type": {"name": "electric", "url": "https://pokeapi.co/api/v2/type/13/"}}],
            "stats": [
                {"base_stat": 35, "effort": 0, "stat": {"name": "hp", "url": "u"}},
                {"base_stat": 55, "effort": 0, "stat": {"name": "attack", "url": "u"}}
            ],
            "moves": [
                {"move": {"name": "mega-punch", "url": "u"}},
                {"move": {"name": "pay-day", "url": "u"}}
            ],
            "sprites": {"front_default": "https://sprites/25.png", "front_shiny": null},
            "species": {"name": "pikachu", "url": "https://pokeapi.co/api/v2/pokemon-species/25/"},
            "location_area_encounters": "https://pokeapi.co/api/v2/pokemon/25/encounters",
            "cries": {"latest": "https://cries/25.ogg", "legacy": null}
        })
    }

    #[test]
    fn test_snapshot_from_response() {
        let response: PokemonResponse = serde_json::from_value(pikachu_json()).unwrap();
        let snapshot = snapshot_from_response(response);

        assert_eq!(snapshot.id, 25);
        assert_eq!(snapshot.name, "pikachu");
        assert_eq!(snapshot.sprite_url, "https://sprites/25.png");
        assert_eq!(snapshot.cry_url, "https://cries/25.ogg");
        assert_eq!(snapshot.types, vec!["electric".to_string()]);
        assert_eq!(snapshot.primary_type(), Some("electric"));
        assert_eq!(snapshot.moves, vec!["mega-punch".to_string(), "pay-day".to_string()]);
        assert_eq!(
            snapshot.stats,
            vec![
                EntityStat {
                    name: "hp".into(),
                    value: 35
                },
                EntityStat {
                    name: "attack".into(),
                    value: 55
                },
            ]
        );
        assert_eq!(
            snapshot.encounters_url,
            "https://pokeapi.co/api/v2/pokemon/25/encounters"
        );
    }

    #[test]
    fn test_snapshot_fallbacks() {
        let mut value = pikachu_json();
        value["sprites"] = json!({"front_default": null});
        value["cries"] = serde_json::Value::Null;
        let response: PokemonResponse = serde_json::from_value(value).unwrap();
        let snapshot = snapshot_from_response(response);

        assert_eq!(snapshot.sprite_url, PLACEHOLDER_SPRITE);
        assert!(snapshot.cry_url.ends_with("/latest/25.ogg"));
    }

    #[test]
    fn test_base_trailing_slash_trimmed() {
        let fetcher = EntityFetcher::new(reqwest::Client::new(), "http://localhost:1/api/v2/");
        assert_eq!(fetcher.base(), "http://localhost:1/api/v2");
    }

    #[test]
    fn test_sprite_url_for() {
        assert_eq!(
            sprite_url_for(133),
            "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/133.png"
        );
    }
}
