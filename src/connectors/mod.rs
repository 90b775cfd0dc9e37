mod apod;
mod donki;
mod earth;
mod eonet;
mod genelab;
mod mars_photos;
mod mars_weather;
mod neow;
mod tle;

use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Result, SkyfetchError, pipeline::Descriptor};

pub use apod::ApodConnector;
pub use donki::DonkiConnector;
pub use earth::EarthConnector;
pub use eonet::EonetConnector;
pub use genelab::GenelabConnector;
pub use mars_photos::MarsPhotosConnector;
pub use mars_weather::MarsWeatherConnector;
pub use neow::NeowConnector;
pub use tle::TleConnector;

/// Publicly shared demonstration key accepted by api.nasa.gov.
pub const DEFAULT_API_KEY: &str = "DEMO_KEY";

/// JSON-schema fragment for `yyyy-MM-dd` dates.
const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString, strum::EnumIter, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConnectorKind {
    Apod,
    Donki,
    Earth,
    Eonet,
    Genelab,
    MarsPhotos,
    MarsWeather,
    Neow,
    Tle,
}

pub trait Connector: Send + Sync + Debug {
    /// Creates a connector from its named parameters.
    ///
    /// # Arguments
    ///
    /// * `params` - The [`serde_json::Value`] object holding the parameters.
    ///
    /// # Returns
    ///
    /// Returns the connector, or a config error when the parameters do not
    /// satisfy [`Connector::schema`].
    fn create(params: Value) -> Result<Self>
    where
        Self: Sized;

    /// Returns the JSON schema of the connector's parameters.
    fn schema() -> Value
    where
        Self: Sized;

    /// Returns the [`ConnectorKind`] of the connector.
    fn kind(&self) -> ConnectorKind;

    /// Describes the request, transform and artifact for the pipeline.
    fn descriptor(&self) -> Result<Descriptor>;
}

impl ConnectorKind {
    /// Instantiate the connector of this kind from `params`.
    pub fn create(
        self,
        params: Value,
    ) -> Result<Box<dyn Connector>> {
        match self {
            ConnectorKind::Apod => Ok(Box::new(ApodConnector::create(params)?)),
            ConnectorKind::Donki => Ok(Box::new(DonkiConnector::create(params)?)),
            ConnectorKind::Earth => Ok(Box::new(EarthConnector::create(params)?)),
            ConnectorKind::Eonet => Ok(Box::new(EonetConnector::create(params)?)),
            ConnectorKind::Genelab => Ok(Box::new(GenelabConnector::create(params)?)),
            ConnectorKind::MarsPhotos => Ok(Box::new(MarsPhotosConnector::create(params)?)),
            ConnectorKind::MarsWeather => Ok(Box::new(MarsWeatherConnector::create(params)?)),
            ConnectorKind::Neow => Ok(Box::new(NeowConnector::create(params)?)),
            ConnectorKind::Tle => Ok(Box::new(TleConnector::create(params)?)),
        }
    }

    pub fn schema(self) -> Value {
        match self {
            ConnectorKind::Apod => ApodConnector::schema(),
            ConnectorKind::Donki => DonkiConnector::schema(),
            ConnectorKind::Earth => EarthConnector::schema(),
            ConnectorKind::Eonet => EonetConnector::schema(),
            ConnectorKind::Genelab => GenelabConnector::schema(),
            ConnectorKind::MarsPhotos => MarsPhotosConnector::schema(),
            ConnectorKind::MarsWeather => MarsWeatherConnector::schema(),
            ConnectorKind::Neow => NeowConnector::schema(),
            ConnectorKind::Tle => TleConnector::schema(),
        }
    }

    /// Whether the connector takes an `api_key` parameter.
    pub fn takes_api_key(self) -> bool {
        self.schema().pointer("/properties/api_key").is_some()
    }
}

/// Validate `params` against `schema` and deserialize them.
fn from_params<T: serde::de::DeserializeOwned>(
    params: Value,
    schema: &Value,
) -> Result<T> {
    let params = if params.is_null() { Value::Object(Default::default()) } else { params };
    jsonschema::validate(schema, &params)?;
    serde_json::from_value::<T>(params).map_err(|e| SkyfetchError::Config(e.to_string()))
}

fn default_api_key() -> String {
    DEFAULT_API_KEY.to_string()
}

fn default_image_dest() -> String {
    "/tmp/example.png".to_string()
}

fn default_tmp_dir() -> String {
    "/tmp".to_string()
}

/// Directory of the invoking process, used where artifacts default to "here".
fn current_dir() -> Result<String> {
    std::env::current_dir().map(|p| p.display().to_string()).map_err(|e| SkyfetchError::Config(format!("cannot resolve current directory: {}", e)))
}
