pub mod client;
pub mod commands;
pub mod service;

pub use client::{CreatureSource, PokeApiClient, PokemonResponse};
pub use service::{CaptureService, CaptureSnapshot, FETCH_FAILURE_MESSAGE};
