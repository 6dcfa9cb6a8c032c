use crate::{Client, Content, FieldMetadata, HttpTransport, Result, Transport};

use tracing::debug;

/// A REDCap project reached through the API.
///
/// Connecting loads the project's metadata and exports its events, the way
/// API clients establish what kind of project they talk to. The events export
/// goes through the client's skip list, so with the default configuration a
/// project is reported as classic without the events call being made.
#[derive(Debug)]
pub struct Project<T = HttpTransport> {
    client: Client<T>,
    metadata: Vec<FieldMetadata>,
    longitudinal: bool,
}

impl<T: Transport> Project<T> {
    pub async fn connect(client: Client<T>) -> Result<Self> {
        let metadata = client.export_metadata().await?;
        let events = client.export(Content::Event).await?;

        debug!(
            url = client.url(),
            fields = metadata.len(),
            events = events.len(),
            "connected to REDCap project"
        );

        Ok(Self {
            client,
            metadata,
            longitudinal: !events.is_empty(),
        })
    }

    pub fn client(&self) -> &Client<T> {
        &self.client
    }

    /// Field metadata in data dictionary order.
    pub fn metadata(&self) -> &[FieldMetadata] {
        &self.metadata
    }

    pub fn into_metadata(self) -> Vec<FieldMetadata> {
        self.metadata
    }

    /// Returns `true` if the project defines events.
    pub fn is_longitudinal(&self) -> bool {
        self.longitudinal
    }
}
