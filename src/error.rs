//! Domain error kinds.
//!
//! None of these are caught or retried inside the core: any failure aborts
//! the run before the artifact is written.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeometryError {
    /// The coordinate walk found no lon/lat pairs at all.
    #[error("no coordinates in geometry")]
    EmptyGeometry,

    /// Provider bbox was not a 4-tuple of numeric values.
    #[error("bbox must have 4 numeric values")]
    MalformedBbox,
}

#[derive(Debug, Error)]
pub enum SelectError {
    #[error("no candidates returned by Nominatim")]
    NoCandidates,
}

#[derive(Debug, Error)]
pub enum NominatimError {
    /// Lookup response had no usable feature or the feature had no geometry.
    #[error("{0}")]
    MissingGeometry(&'static str),

    #[error("nominatim request failed")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode nominatim response")]
    Decode(#[from] serde_json::Error),

    #[error("invalid nominatim base url: {0}")]
    BaseUrl(String),
}
