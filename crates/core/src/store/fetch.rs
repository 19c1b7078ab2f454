//! Pluggable marker fetching.
//!
//! Hosts may implement [`DataFetcher`] themselves; [`SourceFetcher`] covers
//! HTTP URLs and local files.

use std::future::Future;
use std::pin::Pin;

use tracing::debug;

use crate::{
    error::{QuizError, Result},
    event::GameEvent,
    store::{DataSource, LoadTicket, parse_marker_records},
};

/// Fetch the raw bytes behind a data source.
pub trait DataFetcher: Send + Sync {
    fn fetch<'a>(
        &'a self,
        source: &'a DataSource,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>>;
}

#[derive(Clone, Default)]
pub struct SourceFetcher {
    client: reqwest::Client,
}

impl SourceFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch_url(&self, url: &str) -> Result<Vec<u8>> {
        let fetch_error = |e: reqwest::Error| QuizError::Fetch {
            location: url.to_owned(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(fetch_error)?;

        let bytes = response.bytes().await.map_err(fetch_error)?;
        Ok(bytes.to_vec())
    }
}

impl DataFetcher for SourceFetcher {
    fn fetch<'a>(
        &'a self,
        source: &'a DataSource,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
        Box::pin(async move {
            debug!(%source, "fetching markers");
            match source {
                DataSource::Url(url) => self.fetch_url(url).await,
                DataSource::Path(path) => Ok(tokio::fs::read(path).await?),
            }
        })
    }
}

/// Runs the fetch for a [`LoadTicket`] and turns the outcome into the event the
/// session expects back.
pub struct MarkerLoader<F> {
    fetcher: F,
}

impl<F: DataFetcher> MarkerLoader<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub async fn load(&self, ticket: LoadTicket, source: &DataSource) -> GameEvent {
        let records = match self.fetcher.fetch(source).await {
            Ok(bytes) => parse_marker_records(&bytes).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        GameEvent::MarkersLoaded { ticket, records }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::identifiers::CityIdentifier;

    struct FakeFetcher {
        files: HashMap<String, Vec<u8>>,
    }

    impl DataFetcher for FakeFetcher {
        fn fetch<'a>(
            &'a self,
            source: &'a DataSource,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
            Box::pin(async move {
                self.files
                    .get(&source.to_string())
                    .cloned()
                    .ok_or_else(|| QuizError::Fetch {
                        location: source.to_string(),
                        message: "404".into(),
                    })
            })
        }
    }

    fn loader() -> MarkerLoader<FakeFetcher> {
        let mut files = HashMap::new();
        files.insert(
            "https://example.org/faro.json".to_owned(),
            br#"[{"title":"Faro","coordinates":[0.23,38.79],"question":"?","answers":["a","b"],"correctAnswerIndex":0}]"#
                .to_vec(),
        );
        files.insert("https://example.org/broken.json".to_owned(), b"{not json".to_vec());
        MarkerLoader::new(FakeFetcher { files })
    }

    fn ticket() -> LoadTicket {
        LoadTicket {
            generation: 1,
            city: CityIdentifier::new("xabia"),
        }
    }

    #[tokio::test]
    async fn test_load_success() {
        let source = DataSource::from("https://example.org/faro.json".to_owned());
        let event = loader().load(ticket(), &source).await;

        let GameEvent::MarkersLoaded { ticket, records } = event else {
            panic!("unexpected event");
        };
        assert_eq!(ticket.generation, 1);
        assert_eq!(records.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_load_parse_failure() {
        let source = DataSource::from("https://example.org/broken.json".to_owned());
        let GameEvent::MarkersLoaded { records, .. } = loader().load(ticket(), &source).await
        else {
            panic!("unexpected event");
        };
        assert!(records.is_err());
    }

    #[tokio::test]
    async fn test_load_fetch_failure() {
        let source = DataSource::from("https://example.org/missing.json".to_owned());
        let GameEvent::MarkersLoaded { records, .. } = loader().load(ticket(), &source).await
        else {
            panic!("unexpected event");
        };
        assert!(records.unwrap_err().contains("404"));
    }

    #[tokio::test]
    async fn test_source_fetcher_reads_files() {
        let path = std::env::temp_dir().join(format!("radar-quiz-{}.json", std::process::id()));
        tokio::fs::write(&path, b"[]").await.unwrap();

        let source = DataSource::Path(path.clone());
        let bytes = SourceFetcher::default().fetch(&source).await.unwrap();
        assert_eq!(bytes, b"[]");

        tokio::fs::remove_file(&path).await.unwrap();
    }
}
