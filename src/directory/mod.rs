pub mod client;
pub mod model;

pub use client::{search_by_genre, search_stations};
pub use model::Station;
