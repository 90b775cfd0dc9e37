use reqwest::{
    blocking::Client,
    header::{ACCEPT, HeaderMap, HeaderValue},
};
use serde_json::Value;
use tracing::debug;

use crate::{Result, SkyfetchError};

/// Browser-like identification for upstreams that reject default client agents.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

/// How a response body is to be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ContentKind {
    Json,
    Text,
    Binary,
}

/// Decoded response body. Exactly one representation, chosen by [`ContentKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
    Binary(Vec<u8>),
}

impl Payload {
    /// True for bodies that carry nothing usable: no bytes, or JSON
    /// `null`, `""`, `[]` or `{}`.
    pub fn is_empty(&self) -> bool {
        match self {
            Payload::Json(Value::Null) => true,
            Payload::Json(Value::String(s)) => s.is_empty(),
            Payload::Json(Value::Array(a)) => a.is_empty(),
            Payload::Json(Value::Object(o)) => o.is_empty(),
            Payload::Json(_) => false,
            Payload::Text(s) => s.trim().is_empty(),
            Payload::Binary(b) => b.is_empty(),
        }
    }

    /// JSON view of the payload for echoing back to the caller.
    ///
    /// Text that parses as JSON is echoed structurally; other text is echoed
    /// as a string. Binary bodies are not echoed.
    pub fn echo(&self) -> Value {
        match self {
            Payload::Json(v) => v.clone(),
            Payload::Text(s) => serde_json::from_str(s).unwrap_or_else(|_| Value::String(s.clone())),
            Payload::Binary(_) => Value::Null,
        }
    }
}

/// Raw result of one GET.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub status_code: u16,
    pub body: Vec<u8>,
    /// URLs the transport was redirected through, final one last. Empty when
    /// the request was answered without a redirect.
    pub history: Vec<String>,
}

impl FetchOutcome {
    pub fn new(
        status_code: u16,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            status_code,
            body: body.into(),
            history: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }

    /// Decode the body as `kind`. An empty JSON body decodes to `null`.
    pub fn decode(
        &self,
        kind: ContentKind,
    ) -> Result<Payload> {
        let payload = match kind {
            ContentKind::Binary => Payload::Binary(self.body.clone()),
            ContentKind::Text => Payload::Text(String::from_utf8(self.body.clone()).map_err(|e| self.transform_error(e.to_string()))?),
            ContentKind::Json => {
                if self.body.iter().all(u8::is_ascii_whitespace) {
                    Payload::Json(Value::Null)
                } else {
                    Payload::Json(serde_json::from_slice(&self.body).map_err(|e| self.transform_error(format!("response is not valid json: {}", e)))?)
                }
            }
        };
        Ok(payload)
    }

    fn transform_error(
        &self,
        message: String,
    ) -> SkyfetchError {
        SkyfetchError::Transform {
            status_code: self.status_code,
            message,
        }
    }
}

/// A single blocking GET. The pipeline only ever talks to upstreams through
/// this trait, so it can be driven by stubs.
pub trait Fetcher {
    fn get(
        &self,
        url: &str,
    ) -> Result<FetchOutcome>;
}

/// [`Fetcher`] backed by `reqwest`'s blocking client.
///
/// No retries and no timeout override; redirects follow the client default.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_user_agent(None)
    }

    /// Build a fetcher that identifies itself with `user_agent` when given.
    pub fn with_user_agent(user_agent: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(ua) = user_agent {
            builder = builder.user_agent(ua.to_string());
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Fetcher for HttpFetcher {
    fn get(
        &self,
        url: &str,
    ) -> Result<FetchOutcome> {
        debug!(url, "fetch");
        let res = self.client.get(url).send().map_err(|err| SkyfetchError::Http(format!("Http error: {}", err)))?;

        let status_code = res.status().as_u16();
        // compare parsed forms, the transport normalizes what it sends
        let redirected = reqwest::Url::parse(url).map(|requested| &requested != res.url()).unwrap_or(true);
        let history = if redirected { vec![res.url().to_string()] } else { Vec::new() };
        let body = res.bytes().map_err(|err| SkyfetchError::Http(format!("failed to read body: {}", err)))?.to_vec();

        debug!(url, status_code, bytes = body.len(), "fetched");

        Ok(FetchOutcome {
            status_code,
            body,
            history,
        })
    }
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn get(
        &self,
        url: &str,
    ) -> Result<FetchOutcome> {
        (**self).get(url)
    }
}
