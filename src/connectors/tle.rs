use serde::{Deserialize, Serialize};

use crate::{
    Result, SkyfetchError,
    connectors::{Connector, ConnectorKind, from_params},
    pipeline::{ArtifactSpec, BROWSER_USER_AGENT, Descriptor, RequestSpec, TransformMode},
};

const TLE_URL: &str = "https://tle.ivanstanojevic.me/api/tle/";

/// Two-line element sets for satellites, searched by name or looked up by
/// catalog number. The upstream rejects default client identification.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct TleConnector {
    #[serde(default)]
    sat_name: Option<String>,
    #[serde(default)]
    sat_num: Option<u64>,
    #[serde(default)]
    dest: Option<String>,
}

impl Connector for TleConnector {
    fn create(params: serde_json::Value) -> Result<Self> {
        let connector: Self = from_params(params, &Self::schema())?;
        if connector.sat_name.is_some() && connector.sat_num.is_some() {
            return Err(SkyfetchError::Config("parameters are mutually exclusive: sat_name|sat_num".to_string()));
        }
        Ok(connector)
    }

    fn schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "sat_name": { "type": "string", "description": "Free text search on satellite names" },
                "sat_num": { "type": "integer", "minimum": 0, "description": "NORAD catalog number" },
                "dest": { "type": "string", "description": "Optional file the raw response is saved to" }
            }
        })
    }

    fn kind(&self) -> ConnectorKind {
        ConnectorKind::Tle
    }

    fn descriptor(&self) -> Result<Descriptor> {
        let request = match (&self.sat_name, self.sat_num) {
            (Some(name), _) => RequestSpec::new(TLE_URL).param("search", Some(name)),
            (None, Some(num)) => RequestSpec::new(format!("{}{{sat_num}}", TLE_URL)).path_segment("sat_num", num),
            (None, None) => RequestSpec::new(TLE_URL),
        };

        let mut descriptor = Descriptor::new(request, TransformMode::Text).user_agent(BROWSER_USER_AGENT);
        if let Some(dest) = &self.dest {
            descriptor = descriptor.artifact(ArtifactSpec::overwrite(dest));
        }
        Ok(descriptor)
    }
}
