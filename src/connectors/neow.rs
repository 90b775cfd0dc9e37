use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    connectors::{Connector, ConnectorKind, DATE_PATTERN, current_dir, default_api_key, from_params},
    pipeline::{ArtifactSpec, Descriptor, RequestSpec, TransformMode},
};

const NEOW_FEED_URL: &str = "https://api.nasa.gov/neo/rest/v1/feed";

/// Near earth object feed for a date range, saved as YAML once per range.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NeowConnector {
    startdate: String,
    enddate: String,
    #[serde(default = "default_api_key", alias = "apikey")]
    api_key: String,
    #[serde(default)]
    savepath: Option<String>,
}

impl Connector for NeowConnector {
    fn create(params: serde_json::Value) -> Result<Self> {
        from_params(params, &Self::schema())
    }

    fn schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "required": ["startdate", "enddate"],
            "properties": {
                "startdate": { "type": "string", "pattern": DATE_PATTERN },
                "enddate": { "type": "string", "pattern": DATE_PATTERN },
                "api_key": { "type": "string" },
                "savepath": {
                    "type": "string",
                    "description": "Output directory, defaults to the current directory"
                }
            }
        })
    }

    fn kind(&self) -> ConnectorKind {
        ConnectorKind::Neow
    }

    fn descriptor(&self) -> Result<Descriptor> {
        let request = RequestSpec::new(NEOW_FEED_URL)
            .param("start_date", Some(&self.startdate))
            .param("end_date", Some(&self.enddate))
            .param("api_key", Some(&self.api_key))
            .require("start_date")?
            .require("end_date")?;

        let savepath = match &self.savepath {
            Some(p) => p.clone(),
            None => current_dir()?,
        };
        let file_name = format!("neow-{}to{}.yml", self.startdate, self.enddate);

        Ok(Descriptor::new(request, TransformMode::Yaml)
            .artifact(ArtifactSpec::skip_if_exists(Path::new(&savepath).join(&file_name)))
            .detail("file_loc", savepath.as_str())
            .detail("yaml_output_file", file_name)
            .detail("start_date", self.startdate.as_str())
            .detail("end_date", self.enddate.as_str()))
    }
}
