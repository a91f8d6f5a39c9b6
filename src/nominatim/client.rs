//! HTTP client for the Nominatim search and lookup endpoints.

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use crate::error::NominatimError;
use crate::models::{BoundingBox, Candidate, OsmRef};

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

const USER_AGENT: &str = "tamarack/0.1 (administrative region resolver)";
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Result of one `/search` call.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Request parameters, echoed into the artifact's audit trail.
    pub params: Value,
    /// Raw candidate records exactly as returned.
    pub raw: Vec<Value>,
    /// Typed view over the same records.
    pub candidates: Vec<Candidate>,
}

/// Result of one `/lookup` call.
#[derive(Debug, Clone)]
pub struct LookupOutcome {
    pub params: Value,
    /// The feature's polygon geometry, kept opaque.
    pub geometry: Value,
    /// Feature-level bbox, already in `[west, south, east, north]` order.
    pub feature_bbox: Option<BoundingBox>,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    bbox: Option<[f64; 4]>,
    #[serde(default)]
    geometry: Option<Value>,
}

/// Client for a Nominatim instance.
///
/// One blocking-style call per request, no retries: rate limiting and
/// retry policy belong to the service contract, not this resolver, so any
/// transport or status failure surfaces upward unchanged.
pub struct NominatimClient {
    client: Client,
    base_url: Url,
}

impl NominatimClient {
    pub fn new(base_url: &str) -> Result<Self, NominatimError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| NominatimError::BaseUrl(e.to_string()))?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Free-text search returning ranked candidate records.
    pub async fn search(&self, query: &str, limit: u32) -> Result<SearchOutcome, NominatimError> {
        let params = json!({
            "q": query,
            "format": "jsonv2",
            "addressdetails": 1,
            "limit": limit,
        });

        let url = self.endpoint("search")?;
        debug!("GET {} q={:?}", url, query);
        let limit = limit.to_string();
        let raw: Vec<Value> = self
            .client
            .get(url)
            .query(&[
                ("q", query),
                ("format", "jsonv2"),
                ("addressdetails", "1"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let candidates = raw
            .iter()
            .cloned()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Candidate>, _>>()?;

        Ok(SearchOutcome {
            params,
            raw,
            candidates,
        })
    }

    /// Fetch the polygon geometry for one OSM object.
    pub async fn lookup(&self, osm_ref: OsmRef) -> Result<LookupOutcome, NominatimError> {
        let osm_ids = osm_ref.compact();
        let params = json!({
            "osm_ids": osm_ids,
            "format": "geojson",
            "polygon_geojson": 1,
        });

        let url = self.endpoint("lookup")?;
        debug!("GET {} osm_ids={}", url, osm_ids);
        let payload: FeatureCollection = self
            .client
            .get(url)
            .query(&[
                ("osm_ids", osm_ids.as_str()),
                ("format", "geojson"),
                ("polygon_geojson", "1"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let feature = payload
            .features
            .into_iter()
            .next()
            .ok_or(NominatimError::MissingGeometry(
                "Lookup returned empty features",
            ))?;

        let geometry = match feature.geometry {
            Some(g) if !g.is_null() => g,
            _ => {
                return Err(NominatimError::MissingGeometry(
                    "Lookup feature missing geometry",
                ))
            }
        };

        Ok(LookupOutcome {
            params,
            geometry,
            feature_bbox: feature.bbox.map(BoundingBox::from),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, NominatimError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| NominatimError::BaseUrl("base url cannot have segments".to_string()))?
            .push(path);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OsmType;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn search_record() -> Value {
        json!({
            "place_id": 282375199,
            "osm_type": "relation",
            "osm_id": 62422,
            "category": "boundary",
            "type": "administrative",
            "place_rank": 8,
            "display_name": "Berlin, Deutschland",
            "boundingbox": ["52.33", "52.67", "13.08", "13.76"]
        })
    }

    #[tokio::test]
    async fn test_search_parses_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Berlin"))
            .and(query_param("format", "jsonv2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([search_record()])))
            .mount(&server)
            .await;

        let client = NominatimClient::new(&server.uri()).unwrap();
        let outcome = client.search("Berlin", 5).await.unwrap();

        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.raw.len(), 1);
        let c = &outcome.candidates[0];
        assert!(c.is_admin_boundary());
        assert_eq!(c.osm_id, 62422);
        assert_eq!(c.osm_type, OsmType::Relation);
        assert_eq!(c.place_rank, Some(8));
    }

    #[tokio::test]
    async fn test_lookup_returns_geometry_and_bbox() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lookup"))
            .and(query_param("osm_ids", "R62422"))
            .and(query_param("polygon_geojson", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "bbox": [13.08, 52.33, 13.76, 52.67],
                    "properties": {},
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[13.08, 52.33], [13.76, 52.33], [13.76, 52.67], [13.08, 52.33]]]
                    }
                }]
            })))
            .mount(&server)
            .await;

        let client = NominatimClient::new(&server.uri()).unwrap();
        let osm_ref = OsmRef {
            osm_type: OsmType::Relation,
            osm_id: 62422,
        };
        let outcome = client.lookup(osm_ref).await.unwrap();

        assert_eq!(outcome.geometry["type"], "Polygon");
        let bbox = outcome.feature_bbox.unwrap();
        assert_eq!(bbox.min_lon, 13.08);
        assert_eq!(bbox.max_lat, 52.67);
    }

    #[tokio::test]
    async fn test_lookup_empty_features_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lookup"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"type": "FeatureCollection", "features": []})),
            )
            .mount(&server)
            .await;

        let client = NominatimClient::new(&server.uri()).unwrap();
        let osm_ref = OsmRef {
            osm_type: OsmType::Way,
            osm_id: 1,
        };
        let err = client.lookup(osm_ref).await.unwrap_err();
        assert!(matches!(err, NominatimError::MissingGeometry(_)));
    }

    #[tokio::test]
    async fn test_search_server_error_surfaces() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = NominatimClient::new(&server.uri()).unwrap();
        assert!(client.search("Berlin", 5).await.is_err());
    }
}
