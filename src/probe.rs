//! # Connectivity Probe
//!
//! On-demand liveness/auth smoke test against a registry's remote endpoint.
//! The probe operates on a point-in-time copy of record fields and never
//! touches the store, so a timed-out probe cannot leave state inconsistent.
//!
//! Classification contract: malformed target data is the caller's fault
//! (InvalidInput). A transport failure, or the remote rejecting the supplied
//! credentials, means target health could not be established (Internal).
//! Any other HTTP response counts as reachable; beyond the auth check the
//! response status is not interpreted.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use crate::error::{RegistryError, Result};
use crate::models::{Credential, CredentialType, Registry};

/// Point-in-time copy of the fields a probe needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeTarget {
    pub url: String,
    pub credential: Option<Credential>,
    pub insecure: bool,
}

impl ProbeTarget {
    pub fn from_registry(registry: &Registry) -> Self {
        Self {
            url: registry.url.clone(),
            credential: registry.credential.clone(),
            insecure: registry.insecure,
        }
    }
}

/// Live reachability/auth check against a remote endpoint.
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    /// Single synchronous attempt; no caching, no retry.
    async fn ping(&self, target: &ProbeTarget) -> Result<()>;
}

/// HTTP-based probe.
pub struct HttpProbe {
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn classify(error: reqwest::Error) -> RegistryError {
        if error.is_builder() {
            // The client itself flagged the target as malformed.
            RegistryError::invalid_input(format!("malformed probe target: {error}"))
        } else {
            RegistryError::internal(format!("endpoint unreachable: {error}"))
        }
    }
}

#[async_trait]
impl ConnectivityProbe for HttpProbe {
    async fn ping(&self, target: &ProbeTarget) -> Result<()> {
        let url = target.url.trim();
        if url.is_empty() {
            return Err(RegistryError::invalid_input("url is required to probe"));
        }
        let url = reqwest::Url::parse(url)
            .map_err(|e| RegistryError::invalid_input(format!("invalid url {url:?}: {e}")))?;

        // Client is built per probe so the insecure flag stays per-target.
        let client = reqwest::ClientBuilder::new()
            .timeout(self.timeout)
            .danger_accept_invalid_certs(target.insecure)
            .user_agent(concat!("registry-service/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Self::classify)?;

        let mut request = client.get(url.clone());
        if let Some(credential) = &target.credential {
            match credential.kind {
                CredentialType::Basic => {
                    request = request
                        .basic_auth(&credential.access_key, Some(&credential.access_secret));
                }
            }
        }

        let response = request.send().await.map_err(Self::classify)?;
        let status = response.status();
        debug!(url = %url, status = %status, "probe completed");

        // An explicit credential rejection means we could not authenticate
        // to the target, which is as inconclusive as not reaching it.
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(RegistryError::internal(format!(
                "endpoint rejected the supplied credentials: {status}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn probe() -> HttpProbe {
        HttpProbe::new(Duration::from_secs(2))
    }

    fn target(url: &str) -> ProbeTarget {
        ProbeTarget {
            url: url.to_string(),
            credential: Some(Credential {
                kind: CredentialType::Basic,
                access_key: "admin".to_string(),
                access_secret: "secret".to_string(),
            }),
            insecure: false,
        }
    }

    /// One-shot HTTP listener that answers every connection with `response`.
    async fn serve_once(response: &'static str) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        addr
    }

    /// Listener that accepts a connection and then never answers it.
    async fn silent_endpoint() -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                // Hold the connection open without responding.
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
        });
        addr
    }

    #[tokio::test]
    async fn empty_url_is_invalid_input() {
        let err = probe().ping(&target("")).await.unwrap_err();
        assert!(matches!(err, RegistryError::InvalidInput { .. }));

        let err = probe().ping(&target("   ")).await.unwrap_err();
        assert!(matches!(err, RegistryError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn malformed_url_is_invalid_input() {
        let err = probe().ping(&target("not a url")).await.unwrap_err();
        assert!(matches!(err, RegistryError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_internal_failure() {
        // Nothing listens on this port.
        let err = probe()
            .ping(&target("http://127.0.0.1:1/"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Internal { .. }));
    }

    #[tokio::test]
    async fn hung_endpoint_times_out_as_internal_failure() {
        let addr = silent_endpoint().await;
        let short_probe = HttpProbe::new(Duration::from_millis(200));

        let err = short_probe
            .ping(&target(&format!("http://{addr}/")))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Internal { .. }));
    }

    #[tokio::test]
    async fn credential_rejection_is_internal_failure() {
        for status_line in [
            "HTTP/1.1 401 Unauthorized\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
            "HTTP/1.1 403 Forbidden\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        ] {
            let addr = serve_once(status_line).await;
            let err = probe()
                .ping(&target(&format!("http://{addr}/")))
                .await
                .unwrap_err();
            assert!(matches!(err, RegistryError::Internal { .. }));
        }
    }

    #[tokio::test]
    async fn non_auth_statuses_count_as_reachable() {
        for status_line in [
            "HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
            "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        ] {
            let addr = serve_once(status_line).await;
            let url = format!("http://{addr}/");
            assert!(probe().ping(&target(&url)).await.is_ok());
        }
    }

    #[tokio::test]
    async fn anonymous_target_probes_without_credentials() {
        let addr =
            serve_once("HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n").await;
        let anonymous = ProbeTarget {
            url: format!("http://{addr}/"),
            credential: None,
            insecure: false,
        };
        assert!(probe().ping(&anonymous).await.is_ok());
    }
}
