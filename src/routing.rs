use serde::Deserialize;

use crate::common::Coordinate;
use crate::error::{ClientError, Result};
use crate::fare::fare_for_distance;

/// First candidate route returned by the routing service, plus the fare
/// derived from its distance. Ephemeral: recomputed on every destination
/// pick, never stored.
#[derive(Debug, Clone)]
pub struct RoutePlan {
    pub distance_meters: f64,
    /// Path geometry for drawing the polyline, converted to lat/lng order.
    pub geometry: Vec<Coordinate>,
    pub fare: u32,
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    #[serde(default)]
    routes: Vec<RouteCandidate>,
}

#[derive(Debug, Deserialize)]
struct RouteCandidate {
    distance: f64,
    geometry: RouteGeometry,
}

#[derive(Debug, Deserialize)]
struct RouteGeometry {
    /// GeoJSON order: [lng, lat].
    coordinates: Vec<[f64; 2]>,
}

/// Client for the external OSRM-style routing service.
pub struct RoutingClient {
    http: reqwest::Client,
    base: String,
}

impl RoutingClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Ask the routing service for a driving route between two points.
    ///
    /// A non-2xx status, a malformed body, and an empty candidate list all
    /// collapse into `NoRoute`; the caller shows that to the user and no
    /// retry is attempted.
    pub async fn plan(&self, origin: Coordinate, destination: Coordinate) -> Result<RoutePlan> {
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=geojson",
            self.base, origin.lng, origin.lat, destination.lng, destination.lat
        );

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            log::warn!("Routing service returned {}", response.status());
            return Err(ClientError::NoRoute);
        }

        let body = response.text().await?;
        parse_route(&body)
    }
}

/// Keep only the first candidate, mirroring what the booking screen draws.
fn parse_route(body: &str) -> Result<RoutePlan> {
    let parsed: RouteResponse = serde_json::from_str(body).map_err(|err| {
        log::warn!("Malformed routing response: {err}");
        ClientError::NoRoute
    })?;

    let Some(route) = parsed.routes.into_iter().next() else {
        return Err(ClientError::NoRoute);
    };

    let geometry = route
        .geometry
        .coordinates
        .iter()
        .map(|pair| Coordinate { lat: pair[1], lng: pair[0] })
        .collect();

    Ok(RoutePlan {
        distance_meters: route.distance,
        fare: fare_for_distance(route.distance),
        geometry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_ROUTE: &str = r#"{
        "code": "Ok",
        "routes": [{
            "distance": 2500.0,
            "duration": 410.2,
            "geometry": {
                "type": "LineString",
                "coordinates": [[120.5960, 16.4023], [120.5971, 16.4100]]
            }
        }]
    }"#;

    #[test]
    fn first_candidate_becomes_the_plan() {
        let plan = parse_route(ONE_ROUTE).unwrap();
        assert_eq!(plan.distance_meters, 2500.0);
        assert_eq!(plan.fare, 25);
        assert_eq!(plan.geometry.len(), 2);
        // GeoJSON pairs arrive as [lng, lat] and must be flipped.
        assert_eq!(plan.geometry[0].lat, 16.4023);
        assert_eq!(plan.geometry[0].lng, 120.5960);
    }

    #[test]
    fn empty_candidate_list_is_no_route_not_a_default_fare() {
        let err = parse_route(r#"{"code": "NoRoute", "routes": []}"#).unwrap_err();
        assert!(matches!(err, ClientError::NoRoute));
    }

    #[test]
    fn missing_routes_key_is_no_route() {
        let err = parse_route(r#"{"code": "InvalidQuery"}"#).unwrap_err();
        assert!(matches!(err, ClientError::NoRoute));
    }

    #[test]
    fn garbage_body_is_no_route() {
        let err = parse_route("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, ClientError::NoRoute));
    }
}
