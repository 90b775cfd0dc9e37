use serde::{Deserialize, Serialize};

use crate::{
    Result,
    connectors::{Connector, ConnectorKind, default_api_key, from_params},
    pipeline::{ArtifactSpec, Descriptor, RequestSpec, TransformMode},
};

const MARS_PHOTOS_URL: &str = "https://api.nasa.gov/mars-photos/api/v1/rovers/{rover_name}/photos";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MarsPhotosConnector {
    rover_name: String,
    #[serde(default = "default_sol")]
    sol: u32,
    #[serde(default = "default_api_key", alias = "apikey")]
    api_key: String,
    /// When set, the raw response is saved here as well as echoed.
    #[serde(default)]
    dest: Option<String>,
}

fn default_sol() -> u32 {
    1000
}

impl Connector for MarsPhotosConnector {
    fn create(params: serde_json::Value) -> Result<Self> {
        from_params(params, &Self::schema())
    }

    fn schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "required": ["rover_name"],
            "properties": {
                "rover_name": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Rover, e.g. curiosity, opportunity, spirit"
                },
                "sol": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Martian day since landing, defaults to 1000"
                },
                "api_key": { "type": "string" },
                "dest": { "type": "string" }
            }
        })
    }

    fn kind(&self) -> ConnectorKind {
        ConnectorKind::MarsPhotos
    }

    fn descriptor(&self) -> Result<Descriptor> {
        let request = RequestSpec::new(MARS_PHOTOS_URL).path_segment("rover_name", &self.rover_name).param("sol", Some(self.sol)).param("api_key", Some(&self.api_key));

        let mut descriptor = Descriptor::new(request, TransformMode::Text).detail("rover_name", self.rover_name.as_str());
        if let Some(dest) = &self.dest {
            descriptor = descriptor.artifact(ArtifactSpec::overwrite(dest));
        }
        Ok(descriptor)
    }
}
