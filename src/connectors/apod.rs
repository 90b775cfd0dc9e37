use serde::{Deserialize, Serialize};

use crate::{
    Result,
    connectors::{Connector, ConnectorKind, DATE_PATTERN, default_api_key, default_image_dest, from_params},
    pipeline::{ArtifactSpec, AssetLink, Descriptor, RequestSpec, TransformMode},
};

const APOD_URL: &str = "https://api.nasa.gov/planetary/apod";

/// Astronomy Picture of the Day: fetches the day's metadata, then the image it links to.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApodConnector {
    /// Defaults to today on the upstream side.
    #[serde(default)]
    date: Option<String>,
    #[serde(default = "default_hd")]
    hd: bool,
    #[serde(default = "default_api_key", alias = "apikey")]
    api_key: String,
    #[serde(default = "default_image_dest")]
    dest: String,
}

fn default_hd() -> bool {
    true
}

impl Connector for ApodConnector {
    fn create(params: serde_json::Value) -> Result<Self> {
        from_params(params, &Self::schema())
    }

    fn schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "date": {
                    "type": "string",
                    "pattern": DATE_PATTERN,
                    "description": "Picture date in yyyy-MM-dd, defaults to today"
                },
                "hd": {
                    "type": "boolean",
                    "description": "Download the high definition image, defaults to true"
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
        ConnectorKind::Apod
    }

    fn descriptor(&self) -> Result<Descriptor> {
        let request = RequestSpec::new(APOD_URL).param("hd", Some(self.hd)).param("api_key", Some(&self.api_key)).param("date", self.date.as_deref());
        let link = if self.hd { "hdurl" } else { "url" };

        Ok(Descriptor::new(request, TransformMode::Binary)
            .asset(AssetLink::new(link))
            .artifact(ArtifactSpec::overwrite(&self.dest))
            .echo_field("url")
            .echo_field("hdurl"))
    }
}
