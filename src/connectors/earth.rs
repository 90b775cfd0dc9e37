use serde::{Deserialize, Serialize};

use crate::{
    Result,
    connectors::{Connector, ConnectorKind, DATE_PATTERN, default_api_key, default_image_dest, from_params},
    pipeline::{ArtifactSpec, AssetLink, Descriptor, RequestSpec, TransformMode},
};

const EARTH_URL: &str = "https://api.nasa.gov/planetary/earth/imagery/";

/// Landsat imagery for a coordinate. The metadata response links to the image.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EarthConnector {
    lon: f64,
    lat: f64,
    #[serde(default = "default_date")]
    date: String,
    #[serde(default = "default_api_key", alias = "apikey")]
    api_key: String,
    #[serde(default = "default_image_dest")]
    dest: String,
}

fn default_date() -> String {
    "2017-01-01".to_string()
}

impl Connector for EarthConnector {
    fn create(params: serde_json::Value) -> Result<Self> {
        from_params(params, &Self::schema())
    }

    fn schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "required": ["lon", "lat"],
            "properties": {
                "lon": { "type": "number", "minimum": -180, "maximum": 180 },
                "lat": { "type": "number", "minimum": -90, "maximum": 90 },
                "date": {
                    "type": "string",
                    "pattern": DATE_PATTERN,
                    "description": "Imagery date, defaults to 2017-01-01"
                },
                "api_key": { "type": "string" },
                "dest": {
                    "type": "string",
                    "description": "File the image is saved to, defaults to /tmp/example.png"
                }
            }
        })
    }

    fn kind(&self) -> ConnectorKind {
        ConnectorKind::Earth
    }

    fn descriptor(&self) -> Result<Descriptor> {
        let request = RequestSpec::new(EARTH_URL).param("lon", Some(self.lon)).param("lat", Some(self.lat)).param("date", Some(&self.date)).param("api_key", Some(&self.api_key));

        Ok(Descriptor::new(request, TransformMode::Binary).asset(AssetLink::new("url")).artifact(ArtifactSpec::overwrite(&self.dest)).echo_field("url"))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::SkyfetchError;

    #[test]
    fn test_url() {
        let descriptor = EarthConnector::create(json!({"lon": 100.75, "lat": 1.5})).unwrap().descriptor().unwrap();
        assert_eq!(descriptor.request.compose().unwrap(), "https://api.nasa.gov/planetary/earth/imagery/?lon=100.75&lat=1.5&date=2017-01-01&api_key=DEMO_KEY");
        assert_eq!(descriptor.asset, Some(AssetLink::new("url")));
    }

    #[test]
    fn test_coordinates_are_required() {
        let err = EarthConnector::create(json!({"lon": 100.75})).unwrap_err();
        assert!(matches!(err, SkyfetchError::Config(_)));
    }

    #[test]
    fn test_latitude_range() {
        assert!(EarthConnector::create(json!({"lon": 0, "lat": 91})).is_err());
    }
}
