use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    connectors::{Connector, ConnectorKind, default_api_key, default_tmp_dir, from_params},
    pipeline::{ArtifactSpec, Descriptor, RequestSpec, TransformMode},
};

const INSIGHT_WEATHER_URL: &str = "https://api.nasa.gov/insight_weather/";

/// InSight lander weather feed, saved verbatim.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MarsWeatherConnector {
    /// File name without extension, `.txt` is appended.
    name: String,
    #[serde(default = "default_tmp_dir")]
    file_loc: String,
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default = "default_feedtype")]
    feedtype: String,
    #[serde(default = "default_api_key", alias = "apikey")]
    api_key: String,
}

fn default_version() -> u32 {
    1
}

fn default_feedtype() -> String {
    "json".to_string()
}

impl Connector for MarsWeatherConnector {
    fn create(params: serde_json::Value) -> Result<Self> {
        from_params(params, &Self::schema())
    }

    fn schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": { "type": "string", "minLength": 1 },
                "file_loc": {
                    "type": "string",
                    "description": "Output directory, defaults to /tmp"
                },
                "version": { "type": "integer", "minimum": 1 },
                "feedtype": { "type": "string" },
                "api_key": { "type": "string" }
            }
        })
    }

    fn kind(&self) -> ConnectorKind {
        ConnectorKind::MarsWeather
    }

    fn descriptor(&self) -> Result<Descriptor> {
        let request = RequestSpec::new(INSIGHT_WEATHER_URL).param("api_key", Some(&self.api_key)).param("feedtype", Some(&self.feedtype)).param("ver", Some(self.version));
        let path = Path::new(&self.file_loc).join(format!("{}.txt", self.name));

        Ok(Descriptor::new(request, TransformMode::Text).artifact(ArtifactSpec::overwrite(path)))
    }
}
