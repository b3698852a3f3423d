use std::{future::Future, time::Duration};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::CapturedRecord;

pub const DEFAULT_API_BASE_URL: &str = "https://pokeapi.co/api/v2";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Upper bound for one whole request, body included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Read-only lookup of one creature by id.
pub trait CreatureSource: Send + Sync + 'static {
    fn fetch(&self, id: u32) -> impl Future<Output = Result<PokemonResponse>> + Send;
}

/// The slice of `GET /pokemon/{id}` we keep.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PokemonResponse {
    pub id: u32,
    pub name: String,
    pub types: Vec<TypeSlot>,
    pub sprites: Sprites,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NamedResource {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Sprites {
    pub front_default: Option<String>,
}

impl PokemonResponse {
    pub fn into_record(self, captured_on: String) -> CapturedRecord {
        CapturedRecord {
            id: self.id,
            name: self.name,
            categories: self.types.into_iter().map(|slot| slot.kind.name).collect(),
            image_ref: self.sprites.front_default.unwrap_or_default(),
            captured_on,
        }
    }
}

#[derive(Clone)]
pub struct PokeApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl PokeApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("pokefocus/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn creature_url(&self, id: u32) -> String {
        format!("{}/pokemon/{id}", self.base_url)
    }
}

impl CreatureSource for PokeApiClient {
    async fn fetch(&self, id: u32) -> Result<PokemonResponse> {
        let url = self.creature_url(id);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("{url} returned an error status"))?;

        response
            .json::<PokemonResponse>()
            .await
            .with_context(|| format!("unexpected response body from {url}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIKACHU: &str = r#"{
        "id": 25,
        "name": "pikachu",
        "base_experience": 112,
        "types": [
            { "slot": 1, "type": { "name": "electric", "url": "https://pokeapi.co/api/v2/type/13/" } }
        ],
        "sprites": {
            "front_default": "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/25.png",
            "back_default": null
        }
    }"#;

    #[test]
    fn maps_response_into_record() {
        let response: PokemonResponse = serde_json::from_str(PIKACHU).unwrap();
        let record = response.into_record("2026-10-18".into());

        assert_eq!(record.id, 25);
        assert_eq!(record.name, "pikachu");
        assert_eq!(record.categories, vec!["electric"]);
        assert!(record.image_ref.ends_with("/25.png"));
        assert_eq!(record.captured_on, "2026-10-18");
    }

    #[test]
    fn keeps_type_order() {
        let json = r#"{"id":1,"name":"bulbasaur",
            "types":[{"type":{"name":"grass"}},{"type":{"name":"poison"}}],
            "sprites":{"front_default":"x"}}"#;
        let record = serde_json::from_str::<PokemonResponse>(json)
            .unwrap()
            .into_record(String::new());
        assert_eq!(record.categories, vec!["grass", "poison"]);
    }

    #[test]
    fn missing_sprite_maps_to_empty_image() {
        let json = r#"{"id":132,"name":"ditto","types":[],"sprites":{"front_default":null}}"#;
        let record = serde_json::from_str::<PokemonResponse>(json)
            .unwrap()
            .into_record(String::new());
        assert_eq!(record.image_ref, "");
    }

    #[test]
    fn malformed_body_is_rejected() {
        assert!(serde_json::from_str::<PokemonResponse>(r#"{"id":25}"#).is_err());
    }

    #[test]
    fn url_ignores_trailing_slash() {
        let client = PokeApiClient::new("https://pokeapi.co/api/v2/").unwrap();
        assert_eq!(client.creature_url(25), "https://pokeapi.co/api/v2/pokemon/25");
    }
}
