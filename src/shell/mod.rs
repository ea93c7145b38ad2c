// Composition root for the gallery query service.
//
// Responsibilities
// - Read config from environment.
// - Instantiate the store and wire it into the lanes and the listing.
// - Spawn background workers (one lane per topic, dead letter drain).

pub mod config;
pub mod graphql;
pub mod http;
pub mod state;
pub mod workers;
