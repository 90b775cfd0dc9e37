use std::{collections::HashMap, fs, path::Path};

use serde::Deserialize;

use crate::{Result, SkyfetchError, common::Vars, connectors::DEFAULT_API_KEY};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// api key handed to every connector that takes one, defaults to `DEMO_KEY`
    pub api_key: String,
    /// identification sent upstream when a connector does not force its own
    pub user_agent: Option<String>,
    /// compose requests without fetching or writing anything
    pub plan_only: bool,
    /// default parameters per connector, keyed by connector name
    pub params: HashMap<String, Vars>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: DEFAULT_API_KEY.to_string(),
            user_agent: None,
            plan_only: false,
            params: HashMap::new(),
        }
    }
}

impl Config {
    pub fn create<T: AsRef<Path>>(path: T) -> Result<Self> {
        let data = fs::read_to_string(path.as_ref()).map_err(|e| SkyfetchError::Config(format!("failed to load config file {:?}: {}", path.as_ref(), e)))?;

        Self::load_from_str(data.as_str())
    }

    pub fn load_from_str(toml_str: &str) -> Result<Self> {
        let config = toml::from_str::<Config>(toml_str)?;
        Ok(config)
    }

    /// Default parameters configured for `connector`.
    pub fn params_for(
        &self,
        connector: &str,
    ) -> Vars {
        self.params.get(connector).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod test {
    use crate::{Config, SkyfetchError};

    #[test]
    fn test_config_deserialize() {
        let toml_str = r#"
        api_key = "abc123"
        plan_only = true

        [params.neow]
        startdate = "2021-01-01"
        enddate = "2021-01-07"
        savepath = "/data/neow"

        [params.genelab]
        glds_study_ids = "87-95,137"
        results_per_page = 50
        "#;
        let config = Config::load_from_str(toml_str).unwrap();
        assert_eq!(config.api_key, "abc123");
        assert!(config.plan_only);
        assert_eq!(config.user_agent, None);
        assert_eq!(config.params_for("neow").get::<String>("savepath"), Some("/data/neow".to_string()));
        assert_eq!(config.params_for("genelab").get::<u32>("results_per_page"), Some(50));
        assert!(config.params_for("apod").is_empty());
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::load_from_str("").unwrap();
        assert_eq!(config.api_key, "DEMO_KEY");
        assert!(!config.plan_only);
    }

    #[test]
    fn test_config_parse_error() {
        let err = Config::load_from_str("plan_only = \"maybe\"").unwrap_err();
        assert!(matches!(err, SkyfetchError::Convert(_)));
    }

    #[test]
    fn test_config_missing_file() {
        let err = Config::create("/nonexistent/skyfetch.toml").unwrap_err();
        assert!(matches!(err, SkyfetchError::Config(_)));
    }
}
