use crate::{
    SkyfetchError,
    pipeline::fetch::{FetchOutcome, Payload},
};

/// Classification of one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// 200 with a usable body.
    Proceed,
    /// 200 with nothing in it. Completes successfully without an artifact.
    ProceedEmpty,
    /// Any other status. Aborts the pipeline.
    UpstreamFailure {
        status_code: u16,
        history: Vec<String>,
    },
}

impl Verdict {
    /// Classify a fetch. The payload is only consulted for successful
    /// statuses, so callers may pass `None` before decoding a failed body.
    pub fn classify(
        outcome: &FetchOutcome,
        payload: Option<&Payload>,
    ) -> Self {
        if !outcome.is_success() {
            return Verdict::UpstreamFailure {
                status_code: outcome.status_code,
                history: outcome.history.clone(),
            };
        }

        match payload {
            Some(p) if !p.is_empty() => Verdict::Proceed,
            _ => Verdict::ProceedEmpty,
        }
    }

    /// Turn an upstream failure into the matching error, pass anything else through.
    pub fn into_result(
        self,
        url: &str,
    ) -> Result<Self, SkyfetchError> {
        match self {
            Verdict::UpstreamFailure {
                status_code,
                history,
            } => Err(SkyfetchError::Upstream {
                status_code,
                url: url.to_string(),
                history,
            }),
            other => Ok(other),
        }
    }
}
