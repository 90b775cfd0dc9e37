//! The fetch, transform and persist pipeline shared by every connector.
//!
//! A connector only describes *what* to fetch and *where* to put it
//! ([`Descriptor`]); [`Pipeline`] runs the same sequence for all of them:
//!
//! ```text
//! compose url -> [planning: stop] -> fetch -> validate -> [asset: fetch -> validate]
//!             -> transform -> write -> report
//! ```
//!
//! Every fatal condition aborts where it is detected. The write is the last
//! step, so no partial artifact is left behind.

mod fetch;
mod persist;
mod query;
mod report;
mod transform;
mod validate;

use serde_json::Value;
use tracing::{debug, warn};

use crate::{Result, SkyfetchError, common::Vars};

pub use fetch::{BROWSER_USER_AGENT, ContentKind, FetchOutcome, Fetcher, HttpFetcher, Payload};
pub use persist::{ArtifactSpec, WritePolicy};
pub use query::RequestSpec;
pub use report::{Mode, OperationResult};
pub use transform::{FieldExtraction, Grouping, RECORD_DELIMITER, TransformMode};
pub use validate::Verdict;

/// Second resource referenced from inside the first response, e.g. the image
/// an imagery metadata record points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLink {
    /// Metadata field holding the asset URL.
    pub field: String,
}

impl AssetLink {
    pub fn new(field: &str) -> Self {
        Self {
            field: field.to_string(),
        }
    }

    fn resolve(
        &self,
        metadata: &Payload,
        status_code: u16,
    ) -> Result<String> {
        let link = match metadata {
            Payload::Json(value) => value.get(&self.field).and_then(Value::as_str),
            _ => None,
        };
        link.map(str::to_string).ok_or_else(|| SkyfetchError::Transform {
            status_code,
            message: format!("response has no '{}' link to fetch", self.field),
        })
    }
}

/// Per-connector configuration data consumed by [`Pipeline`].
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    pub request: RequestSpec,
    pub transform: TransformMode,
    pub asset: Option<AssetLink>,
    /// `None` for connectors that only echo the payload.
    pub artifact: Option<ArtifactSpec>,
    /// Identification override for upstreams that reject default clients.
    pub user_agent: Option<String>,
    /// Echoed in the result as-is.
    pub details: Vars,
    /// Top-level response fields copied into the result details.
    pub echo_fields: Vec<String>,
}

impl Descriptor {
    pub fn new(
        request: RequestSpec,
        transform: TransformMode,
    ) -> Self {
        Self {
            request,
            transform,
            asset: None,
            artifact: None,
            user_agent: None,
            details: Vars::new(),
            echo_fields: Vec::new(),
        }
    }

    pub fn asset(
        mut self,
        link: AssetLink,
    ) -> Self {
        self.asset = Some(link);
        self
    }

    pub fn artifact(
        mut self,
        artifact: ArtifactSpec,
    ) -> Self {
        self.artifact = Some(artifact);
        self
    }

    pub fn user_agent(
        mut self,
        user_agent: &str,
    ) -> Self {
        self.user_agent = Some(user_agent.to_string());
        self
    }

    pub fn detail(
        mut self,
        key: &str,
        value: impl Into<Value>,
    ) -> Self {
        self.details.set(key, value);
        self
    }

    pub fn echo_field(
        mut self,
        field: &str,
    ) -> Self {
        self.echo_fields.push(field.to_string());
        self
    }

    /// Kind the first response is decoded as. Metadata for a chained asset is always JSON.
    fn primary_kind(&self) -> ContentKind {
        if self.asset.is_some() { ContentKind::Json } else { self.transform.content_kind() }
    }

    fn details_with(
        &self,
        payload: &Value,
    ) -> Vars {
        let mut details = self.details.clone();
        for field in &self.echo_fields {
            details.set(field, payload.get(field).cloned().unwrap_or(Value::Null));
        }
        details
    }
}

/// Runs descriptors against a [`Fetcher`].
pub struct Pipeline<F> {
    fetcher: F,
}

impl<F: Fetcher> Pipeline<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
        }
    }

    pub fn run(
        &self,
        descriptor: &Descriptor,
        mode: Mode,
    ) -> Result<OperationResult> {
        let url = descriptor.request.compose()?;

        if mode == Mode::Planning {
            debug!(url = %url, "plan only, skipping fetch");
            return Ok(OperationResult::planned(url, descriptor.details.clone()));
        }

        let (status_code, payload) = match self.fetch(&url, descriptor.primary_kind())? {
            Some(fetched) => fetched,
            None => return Ok(OperationResult::executed(url, 200, Value::Null, None, descriptor.details.clone())),
        };

        let echo = payload.echo();
        let details = descriptor.details_with(&echo);

        let Some(artifact) = &descriptor.artifact else {
            return Ok(OperationResult::executed(url, status_code, echo, None, details));
        };

        let content_payload = match &descriptor.asset {
            Some(link) => {
                let asset_url = link.resolve(&payload, status_code)?;
                match self.fetch(&asset_url, descriptor.transform.content_kind())? {
                    Some((_, asset)) => asset,
                    None => return Ok(OperationResult::executed(url, status_code, echo, None, details)),
                }
            }
            None => payload,
        };

        let content = descriptor.transform.apply(&content_payload, status_code)?;
        let written = artifact.persist(&content)?.then(|| artifact.path().display().to_string());

        Ok(OperationResult::executed(url, status_code, echo, written, details))
    }

    /// One fetch plus validation. `None` means a 200 with nothing usable in it.
    fn fetch(
        &self,
        url: &str,
        kind: ContentKind,
    ) -> Result<Option<(u16, Payload)>> {
        let outcome = self.fetcher.get(url)?;

        if !outcome.is_success() {
            warn!(url, status_code = outcome.status_code, history = ?outcome.history, "upstream failure");
            Verdict::classify(&outcome, None).into_result(url)?;
        }

        let payload = outcome.decode(kind)?;
        match Verdict::classify(&outcome, Some(&payload)).into_result(url)? {
            Verdict::ProceedEmpty => {
                debug!(url, "empty payload, nothing to persist");
                Ok(None)
            }
            _ => Ok(Some((outcome.status_code, payload))),
        }
    }
}
