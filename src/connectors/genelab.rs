use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    connectors::{Connector, ConnectorKind, from_params},
    pipeline::{ArtifactSpec, Descriptor, FieldExtraction, RequestSpec, TransformMode},
};

const GENELAB_ROOT: &str = "https://genelab-data.ndc.nasa.gov";
const GENELAB_FILES_URL: &str = "https://genelab-data.ndc.nasa.gov/genelab/data/glds/files/{glds_study_ids}/";

/// Lists the downloadable files of GeneLab studies, one study header
/// followed by the absolute URL of each of its files.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GenelabConnector {
    /// Passed through unescaped, e.g. `87-95,137`.
    glds_study_ids: String,
    #[serde(default = "default_name")]
    name: String,
    #[serde(default = "default_path")]
    path: String,
    #[serde(default)]
    page_number: u32,
    #[serde(default = "default_results_per_page")]
    results_per_page: u32,
}

fn default_name() -> String {
    "gene-results.txt".to_string()
}

fn default_path() -> String {
    "/tmp/".to_string()
}

fn default_results_per_page() -> u32 {
    25
}

impl Connector for GenelabConnector {
    fn create(params: serde_json::Value) -> Result<Self> {
        from_params(params, &Self::schema())
    }

    fn schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "required": ["glds_study_ids"],
            "properties": {
                "glds_study_ids": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Study ids, single (87), list (87,88) or range (87-95)"
                },
                "name": {
                    "type": "string",
                    "description": "Output file name, defaults to gene-results.txt"
                },
                "path": {
                    "type": "string",
                    "description": "Output directory, defaults to /tmp/"
                },
                "page_number": { "type": "integer", "minimum": 0 },
                "results_per_page": { "type": "integer", "minimum": 1 }
            }
        })
    }

    fn kind(&self) -> ConnectorKind {
        ConnectorKind::Genelab
    }

    fn descriptor(&self) -> Result<Descriptor> {
        let request = RequestSpec::new(GENELAB_FILES_URL)
            .path_segment("glds_study_ids", &self.glds_study_ids)
            .param("page", Some(self.page_number))
            .param("size", Some(self.results_per_page));
        let extraction = FieldExtraction::new("remote_url").delimiter("\n").prefix(GENELAB_ROOT).grouped("studies", "study_files");

        Ok(Descriptor::new(request, TransformMode::Extract(extraction)).artifact(ArtifactSpec::overwrite(Path::new(&self.path).join(&self.name))))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_range_ids_are_not_escaped() {
        let descriptor = GenelabConnector::create(json!({"glds_study_ids": "87-95,137"})).unwrap().descriptor().unwrap();
        assert_eq!(descriptor.request.compose().unwrap(), "https://genelab-data.ndc.nasa.gov/genelab/data/glds/files/87-95,137/?page=0&size=25");
        assert_eq!(descriptor.artifact.unwrap().path().to_str(), Some("/tmp/gene-results.txt"));
    }

    #[test]
    fn test_paging_is_forwarded() {
        let descriptor = GenelabConnector::create(json!({"glds_study_ids": "87", "page_number": 2, "results_per_page": 10, "path": "/data", "name": "g.txt"}))
            .unwrap()
            .descriptor()
            .unwrap();
        assert_eq!(descriptor.request.compose().unwrap(), "https://genelab-data.ndc.nasa.gov/genelab/data/glds/files/87/?page=2&size=10");
        assert_eq!(descriptor.artifact.unwrap().path().to_str(), Some("/data/g.txt"));
    }

    #[test]
    fn test_ids_required() {
        assert!(GenelabConnector::create(json!({})).is_err());
        assert!(GenelabConnector::create(json!({"glds_study_ids": ""})).is_err());
    }
}
