//! Nominatim geocoder client.

mod client;

pub use client::{LookupOutcome, NominatimClient, SearchOutcome, DEFAULT_BASE_URL};
