use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    connectors::{Connector, ConnectorKind, DATE_PATTERN, current_dir, from_params},
    pipeline::{ArtifactSpec, Descriptor, RequestSpec, TransformMode},
    utils,
};

const EONET_URL: &str = "https://eonet.sci.gsfc.nasa.gov/api/v3/events";

/// Natural events tracker. Every filter is optional and forwarded verbatim;
/// the response is saved as YAML once per date range.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct EonetConnector {
    source: Option<String>,
    status: Option<String>,
    limit: Option<String>,
    days: Option<String>,
    start: Option<String>,
    end: Option<String>,
    #[serde(rename = "magID")]
    mag_id: Option<String>,
    #[serde(rename = "magMin")]
    mag_min: Option<String>,
    #[serde(rename = "magMax")]
    mag_max: Option<String>,
    bbox: Option<String>,
    savepath: Option<String>,
}

impl EonetConnector {
    /// `eonet-{start}to{end}.yml`, the end defaulting to today (UTC).
    fn file_name(&self) -> String {
        let end = self.end.clone().unwrap_or_else(utils::time::today);
        match &self.start {
            Some(start) => format!("eonet-{}to{}.yml", start, end),
            None => format!("eonet-{}.yml", end),
        }
    }
}

impl Connector for EonetConnector {
    fn create(params: serde_json::Value) -> Result<Self> {
        from_params(params, &Self::schema())
    }

    fn schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "source": { "type": "string", "description": "Comma separated source ids" },
                "status": { "type": "string", "enum": ["open", "closed"] },
                "limit": { "type": "string" },
                "days": { "type": "string" },
                "start": { "type": "string", "pattern": DATE_PATTERN },
                "end": { "type": "string", "pattern": DATE_PATTERN },
                "magID": { "type": "string" },
                "magMin": { "type": "string" },
                "magMax": { "type": "string" },
                "bbox": { "type": "string", "description": "min lon, max lat, max lon, min lat" },
                "savepath": {
                    "type": "string",
                    "description": "Output directory, defaults to the current directory"
                }
            }
        })
    }

    fn kind(&self) -> ConnectorKind {
        ConnectorKind::Eonet
    }

    fn descriptor(&self) -> Result<Descriptor> {
        let request = RequestSpec::new(EONET_URL)
            .param("source", self.source.as_deref())
            .param("status", self.status.as_deref())
            .param("limit", self.limit.as_deref())
            .param("days", self.days.as_deref())
            .param("start", self.start.as_deref())
            .param("end", self.end.as_deref())
            .param("magID", self.mag_id.as_deref())
            .param("magMin", self.mag_min.as_deref())
            .param("magMax", self.mag_max.as_deref())
            .param("bbox", self.bbox.as_deref());

        let savepath = match &self.savepath {
            Some(p) => p.clone(),
            None => current_dir()?,
        };
        let file_name = self.file_name();

        Ok(Descriptor::new(request, TransformMode::Yaml)
            .artifact(ArtifactSpec::skip_if_exists(Path::new(&savepath).join(&file_name)))
            .detail("file_loc", savepath.as_str())
            .detail("yaml_output_file", file_name)
            .detail("start_date", self.start.as_deref())
            .detail("end_date", self.end.as_deref()))
    }
}
