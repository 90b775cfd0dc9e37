//! Connector engine - the main entry point for skyfetch.
//!
//! The engine turns a connector name plus named parameters into one pipeline
//! run:
//! - Merging configured default parameters and the api key
//! - Validating parameters and building the connector's descriptor
//! - Choosing the execution mode
//! - Running the shared pipeline against an HTTP fetcher

use tracing::info;

use crate::{
    Config, Result,
    common::Vars,
    connectors::ConnectorKind,
    pipeline::{Descriptor, Fetcher, HttpFetcher, Mode, OperationResult, Pipeline},
};

/// Runs connectors with a shared [`Config`].
///
/// # Example
///
/// ```rust,ignore
/// let engine = Engine::new(Config::default());
/// let params = Vars::new().with("startdate", "2021-01-01").with("enddate", "2021-01-07");
/// let result = engine.run(ConnectorKind::Neow, params, false)?;
/// println!("{}", result.request_url());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: Config,
}

impl Engine {
    pub fn new(config: Config) -> Self {
        Self {
            config,
        }
    }

    /// Parameters for `kind`: configured defaults overlaid with `params`, plus
    /// the configured api key when the connector takes one and none was given.
    ///
    /// The `apikey` alias is folded into `api_key` on both sides before the
    /// overlay, so a key given at call time replaces a configured one.
    pub fn params(
        &self,
        kind: ConnectorKind,
        params: Vars,
    ) -> Vars {
        let defaults = self.config.params_for(kind.as_ref());
        if !kind.takes_api_key() {
            return defaults.merge(params);
        }

        let mut merged = defaults.rename("apikey", "api_key").merge(params.rename("apikey", "api_key"));
        if !merged.contains("api_key") {
            merged.set("api_key", self.config.api_key.as_str());
        }
        merged
    }

    /// Validate parameters and describe the invocation without running it.
    pub fn descriptor(
        &self,
        kind: ConnectorKind,
        params: Vars,
    ) -> Result<Descriptor> {
        let connector = kind.create(self.params(kind, params).into())?;
        connector.descriptor()
    }

    /// Run a connector against the real upstream.
    ///
    /// `plan_only` or the configured `plan_only` switch the run to
    /// [`Mode::Planning`].
    pub fn run(
        &self,
        kind: ConnectorKind,
        params: Vars,
        plan_only: bool,
    ) -> Result<OperationResult> {
        let descriptor = self.descriptor(kind, params)?;
        let mode = Mode::from_plan_only(plan_only || self.config.plan_only);
        let user_agent = descriptor.user_agent.as_deref().or(self.config.user_agent.as_deref());
        let fetcher = HttpFetcher::with_user_agent(user_agent)?;

        info!(connector = kind.as_ref(), mode = mode.as_ref(), "running connector");
        Pipeline::new(fetcher).run(&descriptor, mode)
    }

    /// Run a connector against the given fetcher.
    pub fn run_with<F: Fetcher>(
        &self,
        fetcher: F,
        kind: ConnectorKind,
        params: Vars,
        mode: Mode,
    ) -> Result<OperationResult> {
        let descriptor = self.descriptor(kind, params)?;

        info!(connector = kind.as_ref(), mode = mode.as_ref(), "running connector");
        Pipeline::new(fetcher).run(&descriptor, mode)
    }
}
