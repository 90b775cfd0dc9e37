use std::sync::LazyLock;

use regex::Regex;

use crate::{Result, SkyfetchError};

/// Path placeholder pattern, e.g. `/rovers/{rover_name}/photos`.
static PATH_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

/// Everything needed to compose one upstream request URL.
///
/// Query parameters keep their declaration order; a parameter whose value is
/// `None` is never emitted. Values are inserted verbatim, so comma lists and
/// range syntax such as `87-95,137` reach the upstream unescaped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestSpec {
    base: String,
    path: Vec<(String, String)>,
    query: Vec<(String, Option<String>)>,
}

impl RequestSpec {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            ..Default::default()
        }
    }

    /// Value substituted for the `{name}` placeholder in the base.
    pub fn path_segment(
        mut self,
        name: &str,
        value: impl ToString,
    ) -> Self {
        self.path.push((name.to_string(), value.to_string()));
        self
    }

    /// Append a query parameter. `None` values are kept in the list but skipped on compose.
    pub fn param<V: ToString>(
        mut self,
        name: &str,
        value: Option<V>,
    ) -> Self {
        self.query.push((name.to_string(), value.map(|v| v.to_string())));
        self
    }

    /// Fail with a config error unless `name` has a value, either as a query
    /// parameter or a path segment.
    pub fn require(
        self,
        name: &str,
    ) -> Result<Self> {
        let in_query = self.query.iter().any(|(k, v)| k == name && v.is_some());
        let in_path = self.path.iter().any(|(k, _)| k == name);
        if in_query || in_path {
            Ok(self)
        } else {
            Err(SkyfetchError::Config(format!("missing required parameter '{}'", name)))
        }
    }

    /// Compose the full request URL.
    pub fn compose(&self) -> Result<String> {
        let mut missing: Vec<String> = Vec::new();
        let url = PATH_PLACEHOLDER.replace_all(&self.base, |caps: &regex::Captures| {
            let name = &caps[1];
            match self.path.iter().find(|(k, _)| k == name) {
                Some((_, value)) => value.clone(),
                None => {
                    missing.push(name.to_string());
                    String::new()
                }
            }
        });

        if !missing.is_empty() {
            return Err(SkyfetchError::Config(format!("missing path parameter(s): {}", missing.join(", "))));
        }

        let query = self.query.iter().filter_map(|(k, v)| v.as_ref().map(|v| format!("{}={}", k, v))).collect::<Vec<_>>().join("&");

        if query.is_empty() {
            return Ok(url.into_owned());
        }

        let separator = if url.contains('?') {
            if url.ends_with('?') || url.ends_with('&') { "" } else { "&" }
        } else {
            "?"
        };

        Ok(format!("{}{}{}", url, separator, query))
    }
}
