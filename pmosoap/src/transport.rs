//! Transport HTTP des requêtes SOAP

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};
use ureq::{Agent, tls::TlsConfig};

use crate::config::SoapConfig;

pub const CONTENT_TYPE: &str = "text/xml;charset=UTF-8";
pub const ACCEPT: &str = "text/xml";

const DEFAULT_MAX_RESPONSE_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Requête POST à envoyer
#[derive(Debug, Clone)]
pub struct TransportRequest<'a> {
    pub url: &'a str,
    pub headers: Vec<(&'static str, String)>,
    pub body: &'a [u8],
}

impl<'a> TransportRequest<'a> {
    /// Requête SOAP avec les en-têtes `Content-Type`, `Accept` et `SOAPAction`
    pub fn soap(url: &'a str, soap_action: String, body: &'a [u8]) -> Self {
        Self {
            url,
            headers: vec![
                ("Content-Type", CONTENT_TYPE.to_string()),
                ("Accept", ACCEPT.to_string()),
                ("SOAPAction", soap_action),
            ],
            body,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Réponse HTTP brute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Envoi d'octets en HTTP POST, réception du corps de la réponse.
///
/// Les statuts 4xx/5xx ne sont pas des erreurs de transport : un SOAP Fault
/// arrive typiquement avec un statut 500.
pub trait Transport {
    fn send(&self, request: &TransportRequest<'_>) -> Result<TransportResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &TransportRequest<'_>) -> Result<TransportResponse, TransportError> {
        (**self).send(request)
    }
}

/// Transport bloquant basé sur `ureq`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    agent: Agent,
    max_response_bytes: u64,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>, verify_certificates: bool) -> Self {
        if !verify_certificates {
            warn!("TLS certificate verification disabled for SOAP transport");
        }

        let tls = TlsConfig::builder()
            .disable_verification(!verify_certificates)
            .build();

        // Ne pas traiter 4xx/5xx comme des erreurs : le corps d'un SOAP Fault
        // doit rester lisible.
        let config = Agent::config_builder()
            .timeout_global(timeout)
            .http_status_as_error(false)
            .tls_config(tls)
            .build();

        Self {
            agent: config.into(),
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }

    /// Limite la taille du corps de réponse lu (10 MiB par défaut).
    pub fn with_max_response_bytes(mut self, limit: u64) -> Self {
        self.max_response_bytes = limit;
        self
    }

    pub fn max_response_bytes(&self) -> u64 {
        self.max_response_bytes
    }

    pub fn from_config(config: &SoapConfig) -> Self {
        Self::new(config.timeout(), config.tls.verify_certificates)
            .with_max_response_bytes(config.http.max_response_bytes)
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::from_config(&SoapConfig::default())
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &TransportRequest<'_>) -> Result<TransportResponse, TransportError> {
        let mut builder = self.agent.post(request.url);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value.as_str());
        }

        let mut response = builder.send(request.body)?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .with_config()
            .limit(self.max_response_bytes)
            .read_to_vec()?;

        debug!(url = request.url, status, bytes = body.len(), "SOAP HTTP response");

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soap_request_headers() {
        let request = TransportRequest::soap(
            "http://example.org/endpoint",
            "http://example.org/ns/GetUser".to_string(),
            b"<x/>",
        );

        assert_eq!(request.headers.len(), 3);
        assert_eq!(request.header("content-type"), Some("text/xml;charset=UTF-8"));
        assert_eq!(request.header("Accept"), Some("text/xml"));
        assert_eq!(
            request.header("SOAPAction"),
            Some("http://example.org/ns/GetUser")
        );
    }

    #[test]
    fn test_response_limit_from_config() {
        let mut config = SoapConfig::default();
        assert_eq!(
            HttpTransport::from_config(&config).max_response_bytes(),
            10 * 1024 * 1024
        );

        config.http.max_response_bytes = 64 * 1024 * 1024;
        assert_eq!(
            HttpTransport::from_config(&config).max_response_bytes(),
            64 * 1024 * 1024
        );
    }

    #[test]
    fn test_response_success_range() {
        let ok = TransportResponse {
            status: 204,
            body: Vec::new(),
        };
        let fault = TransportResponse {
            status: 500,
            body: Vec::new(),
        };
        assert!(ok.is_success());
        assert!(!fault.is_success());
    }
}
