use crate::{Error, FieldMetadata, Result};

use datamodels_core::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// The kinds of content the REDCap API exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Content {
    Metadata,
    Event,
    Arm,
    Project,
    Record,
}

impl Content {
    pub const fn as_str(self) -> &'static str {
        match self {
            Content::Metadata => "metadata",
            Content::Event => "event",
            Content::Arm => "arm",
            Content::Project => "project",
            Content::Record => "record",
        }
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration of an API [`Client`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Content kinds answered with an empty result instead of an API call.
    ///
    /// Events are skipped by default: exporting them from a classic
    /// (non-longitudinal) project fails, and a data model never needs them.
    pub skip: Vec<Content>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            skip: vec![Content::Event],
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the set of skipped content kinds.
    pub fn skip(mut self, skip: impl IntoIterator<Item = Content>) -> Self {
        self.skip = skip.into_iter().collect();
        self
    }

    pub fn is_skipped(&self, content: Content) -> bool {
        self.skip.contains(&content)
    }
}

/// Posts form data to a REDCap API endpoint and returns the decoded JSON body.
#[async_trait]
pub trait Transport: fmt::Debug + Send + Sync {
    async fn post(&self, url: &str, form: &[(&str, &str)]) -> Result<Value>;
}

/// [`Transport`] over HTTPS.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, url: &str, form: &[(&str, &str)]) -> Result<Value> {
        let response = self
            .http
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(Error::driver)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::driver)?;

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(_) if !status.is_success() => Err(Error::redcap(format!("HTTP {status}: {body}"))),
            Err(err) => Err(Error::driver(err)),
        }
    }
}

/// A REDCap API client bound to one project token.
#[derive(Debug)]
pub struct Client<T = HttpTransport> {
    url: String,
    token: String,
    config: ClientConfig,
    transport: T,
}

impl Client<HttpTransport> {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_transport(url, token, ClientConfig::default(), HttpTransport::new())
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(
        url: impl Into<String>,
        token: impl Into<String>,
        config: ClientConfig,
        transport: T,
    ) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
            config,
            transport,
        }
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Exports `content` as JSON records.
    ///
    /// Skipped content kinds return no records without calling the transport.
    /// An `{"error": ...}` payload is returned as a REDCap error.
    pub async fn export(&self, content: Content) -> Result<Vec<Value>> {
        if self.config.is_skipped(content) {
            debug!(%content, "skipping REDCap export");
            return Ok(vec![]);
        }

        let form = [
            ("token", self.token.as_str()),
            ("content", content.as_str()),
            ("format", "json"),
        ];

        let value = self.transport.post(&self.url, &form).await?;

        records(value).map_err(|err| err.context(datamodels_core::err!("exporting {content}")))
    }

    /// Exports the project's field metadata (data dictionary).
    pub async fn export_metadata(&self) -> Result<Vec<FieldMetadata>> {
        self.export(Content::Metadata)
            .await?
            .into_iter()
            .map(|record| serde_json::from_value(record).map_err(Error::driver))
            .collect()
    }
}

fn records(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(records) => Ok(records),
        Value::Object(mut object) => match object.remove("error") {
            Some(Value::String(message)) => Err(Error::redcap(message)),
            Some(other) => Err(Error::redcap(other.to_string())),
            None => Ok(vec![Value::Object(object)]),
        },
        other => Err(Error::redcap(format!("unexpected response: {other}"))),
    }
}
