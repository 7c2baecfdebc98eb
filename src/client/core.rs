// File: ./src/client/core.rs
use crate::client::cert::NoVerifier;
use crate::config::Config;
use crate::model::Timetable;

use http::{Request, StatusCode, Uri};
use http_body_util::BodyExt;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

type HttpsClient = Client<
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>,
    String,
>;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid timetable URL: {0}")]
    InvalidUri(#[from] http::uri::InvalidUri),
    #[error("no valid system certificates found")]
    NoCertificates,
    #[error("could not build request: {0}")]
    Request(#[from] http::Error),
    #[error("request failed: {0}")]
    Connection(#[from] hyper_util::client::legacy::Error),
    #[error("reading response body: {0}")]
    Body(#[from] hyper::Error),
    #[error("server answered {0}")]
    Status(StatusCode),
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("timetable is not a valid JSON object: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone, Debug)]
enum Source {
    Remote { uri: Uri, http: HttpsClient },
    File(PathBuf),
}

/// Fetches the timetable document once per call. No retries and no
/// timeout; callers decide what a failure means.
#[derive(Clone, Debug)]
pub struct TimetableClient {
    source: Source,
    cache_bust: bool,
}

impl TimetableClient {
    /// `source` is either an `http(s)://` URL or a path on disk.
    pub fn new(source: &str, insecure: bool) -> Result<Self, LoadError> {
        let source = if source.starts_with("http://") || source.starts_with("https://") {
            let uri: Uri = source.parse()?;
            Source::Remote {
                uri,
                http: build_http_client(insecure)?,
            }
        } else {
            Source::File(PathBuf::from(source))
        };
        Ok(Self {
            source,
            cache_bust: true,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, LoadError> {
        Ok(Self::new(&config.source, config.allow_insecure_certs)?.with_cache_bust(config.cache_bust))
    }

    pub fn with_cache_bust(mut self, enabled: bool) -> Self {
        self.cache_bust = enabled;
        self
    }

    pub fn is_remote(&self) -> bool {
        matches!(self.source, Source::Remote { .. })
    }

    pub async fn fetch(&self) -> Result<Timetable, LoadError> {
        match &self.source {
            Source::Remote { uri, http } => {
                let target = if self.cache_bust {
                    cache_busted(uri, unix_millis())?
                } else {
                    uri.clone()
                };
                log::info!("Fetching timetable from {}", target);
                let response = http.request(Request::get(target).body(String::new())?).await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(LoadError::Status(status));
                }
                let bytes = response.into_body().collect().await?.to_bytes();
                log::debug!("Received {} bytes", bytes.len());
                Ok(Timetable::from_slice(&bytes)?)
            }
            Source::File(path) => {
                log::info!("Reading timetable from {}", path.display());
                let bytes = tokio::fs::read(path).await.map_err(|source| LoadError::Io {
                    path: path.clone(),
                    source,
                })?;
                Ok(Timetable::from_slice(&bytes)?)
            }
        }
    }
}

/// Appends `v=<stamp>` to the query so intermediaries never serve a stale copy.
pub fn cache_busted(uri: &Uri, stamp: u128) -> Result<Uri, http::uri::InvalidUri> {
    let separator = if uri.query().is_some() { '&' } else { '?' };
    format!("{}{}v={}", uri, separator, stamp).parse()
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

fn build_http_client(insecure: bool) -> Result<HttpsClient, LoadError> {
    let https_connector = if insecure {
        let tls_config = rustls::ClientConfig::builder()
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(NoVerifier))
            .with_no_client_auth();

        HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_http1()
            .build()
    } else {
        let mut root_store = rustls::RootCertStore::empty();
        let result = rustls_native_certs::load_native_certs();
        root_store.add_parsable_certificates(result.certs);

        if root_store.is_empty() {
            return Err(LoadError::NoCertificates);
        }

        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_http1()
            .build()
    };

    Ok(Client::builder(TokioExecutor::new()).build(https_connector))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_buster_respects_existing_query() {
        let plain: Uri = "https://example.org/DB/TimeTable.json".parse().unwrap();
        assert_eq!(
            cache_busted(&plain, 42).unwrap().to_string(),
            "https://example.org/DB/TimeTable.json?v=42"
        );

        let with_query: Uri = "https://example.org/tt.json?campus=isb".parse().unwrap();
        assert_eq!(
            cache_busted(&with_query, 7).unwrap().query(),
            Some("campus=isb&v=7")
        );
    }

    #[test]
    fn paths_are_local_sources() {
        let client = TimetableClient::new("DB/TimeTable.json", false).unwrap();
        assert!(!client.is_remote());
    }
}
