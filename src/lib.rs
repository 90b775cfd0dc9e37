//! # skyfetch
//!
//! skyfetch exposes read-only public science APIs (astronomy imagery, space
//! weather, planetary events, near earth objects, rover imagery, GeneLab
//! studies, satellite elements) as single declarative operations: named
//! parameters in, one local artifact and a structured report out.
//!
//! ## Core Features
//!
//! - **One pipeline**: every connector is a [`pipeline::Descriptor`] run by the same
//!   compose, fetch, validate, transform, write and report sequence
//! - **Plan only**: compose the request URL without touching the network or disk
//! - **Idempotent writes**: date-ranged feeds are skipped once their artifact exists
//! - **Schema-checked parameters**: every connector publishes a JSON schema
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use skyfetch::{ConnectorKind, Engine, Vars};
//!
//! let engine = Engine::default();
//! let params = Vars::new().with("startdate", "2021-01-01").with("enddate", "2021-01-07");
//! let result = engine.run(ConnectorKind::Neow, params, false)?;
//! assert!(result.status_code() == 200);
//! ```

mod common;
mod config;
mod engine;
mod error;
mod utils;

pub mod connectors;
pub mod pipeline;

pub use common::Vars;
pub use config::Config;
pub use connectors::{Connector, ConnectorKind};
pub use engine::Engine;
pub use error::SkyfetchError;
pub use pipeline::{Mode, OperationResult};

/// Result type alias for skyfetch operations.
pub type Result<T> = std::result::Result<T, SkyfetchError>;
