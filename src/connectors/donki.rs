use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    connectors::{Connector, ConnectorKind, DATE_PATTERN, default_api_key, default_tmp_dir, from_params},
    pipeline::{ArtifactSpec, Descriptor, FieldExtraction, RequestSpec, TransformMode},
};

const DONKI_URL: &str = "https://api.nasa.gov/DONKI/notifications";

/// Space weather notifications. The message body of every notification is
/// written to a delimited text file.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DonkiConnector {
    /// File name without extension, `.txt` is appended.
    #[serde(default = "default_name")]
    name: String,
    #[serde(default = "default_tmp_dir")]
    dest: String,
    #[serde(default = "default_api_key", alias = "apikey")]
    api_key: String,
    #[serde(default)]
    startdate: Option<String>,
    #[serde(default)]
    enddate: Option<String>,
    #[serde(default = "default_datatype")]
    datatype: String,
}

fn default_name() -> String {
    "results".to_string()
}

fn default_datatype() -> String {
    "all".to_string()
}

impl Connector for DonkiConnector {
    fn create(params: serde_json::Value) -> Result<Self> {
        from_params(params, &Self::schema())
    }

    fn schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Output file name, .txt is appended. Defaults to results"
                },
                "dest": {
                    "type": "string",
                    "description": "Output directory, defaults to /tmp"
                },
                "api_key": { "type": "string" },
                "startdate": {
                    "type": "string",
                    "pattern": DATE_PATTERN,
                    "description": "yyyy-MM-dd, upstream defaults to 7 days before enddate"
                },
                "enddate": {
                    "type": "string",
                    "pattern": DATE_PATTERN,
                    "description": "yyyy-MM-dd, upstream defaults to today"
                },
                "datatype": {
                    "type": "string",
                    "enum": ["all", "FLR", "SEP", "CME", "IPS", "MPC", "GST", "RBE", "report"]
                }
            }
        })
    }

    fn kind(&self) -> ConnectorKind {
        ConnectorKind::Donki
    }

    fn descriptor(&self) -> Result<Descriptor> {
        let request = RequestSpec::new(DONKI_URL)
            .param("api_key", Some(&self.api_key))
            .param("type", Some(&self.datatype))
            .param("startDate", self.startdate.as_deref())
            .param("endDate", self.enddate.as_deref());
        let path = Path::new(&self.dest).join(format!("{}.txt", self.name));

        Ok(Descriptor::new(request, TransformMode::Extract(FieldExtraction::new("messageBody"))).artifact(ArtifactSpec::overwrite(path)))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_unset_dates_are_omitted() {
        let descriptor = DonkiConnector::create(json!({})).unwrap().descriptor().unwrap();
        assert_eq!(descriptor.request.compose().unwrap(), "https://api.nasa.gov/DONKI/notifications?api_key=DEMO_KEY&type=all");
        assert_eq!(descriptor.artifact.unwrap().path().to_str(), Some("/tmp/results.txt"));
    }

    #[test]
    fn test_date_range() {
        let connector = DonkiConnector::create(json!({"startdate": "2014-05-01", "enddate": "2014-05-08", "datatype": "CME", "dest": "/data/", "name": "cme"})).unwrap();
        let descriptor = connector.descriptor().unwrap();
        assert_eq!(
            descriptor.request.compose().unwrap(),
            "https://api.nasa.gov/DONKI/notifications?api_key=DEMO_KEY&type=CME&startDate=2014-05-01&endDate=2014-05-08"
        );
        assert_eq!(descriptor.artifact.unwrap().path().to_str(), Some("/data/cme.txt"));
        assert!(matches!(descriptor.transform, TransformMode::Extract(ref e) if e.field == "messageBody" && e.delimiter == "\n------\n"));
    }

    #[test]
    fn test_unknown_datatype() {
        assert!(DonkiConnector::create(json!({"datatype": "XYZ"})).is_err());
    }
}
