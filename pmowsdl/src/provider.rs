//! Chargement des WSDL (HTTP ou fichier local)

use std::{fs, time::Duration};

use tracing::{debug, warn};
use ureq::{Agent, tls::TlsConfig};
use url::Url;

use crate::{ServiceDefinition, WsdlError, parse_definitions};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Source de [`ServiceDefinition`] à partir d'une localisation WSDL
pub trait DefinitionsProvider {
    /// Récupère et parse le WSDL situé à `location`.
    fn definitions(&self, location: &Url) -> Result<ServiceDefinition, WsdlError>;
}

/// Provider HTTP(S) + `file://`
#[derive(Debug, Clone)]
pub struct HttpWsdlProvider {
    timeout: Option<Duration>,
    verify_certificates: bool,
}

impl Default for HttpWsdlProvider {
    fn default() -> Self {
        Self::new(Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)), true)
    }
}

impl HttpWsdlProvider {
    pub fn new(timeout: Option<Duration>, verify_certificates: bool) -> Self {
        Self {
            timeout,
            verify_certificates,
        }
    }

    fn fetch(&self, location: &Url) -> Result<Vec<u8>, WsdlError> {
        debug!(location = %location, "Fetching WSDL");

        if !self.verify_certificates {
            warn!(location = %location, "TLS certificate verification disabled for WSDL fetch");
        }

        let tls = TlsConfig::builder()
            .disable_verification(!self.verify_certificates)
            .build();

        let config = Agent::config_builder()
            .timeout_global(self.timeout)
            .http_status_as_error(false)
            .tls_config(tls)
            .build();

        let agent: Agent = config.into();

        let mut response = agent.get(location.as_str()).call()?;

        let status = response.status();
        if !status.is_success() {
            return Err(WsdlError::HttpStatus(status.as_u16()));
        }

        Ok(response.body_mut().read_to_vec()?)
    }
}

impl DefinitionsProvider for HttpWsdlProvider {
    fn definitions(&self, location: &Url) -> Result<ServiceDefinition, WsdlError> {
        let xml = match location.scheme() {
            "http" | "https" => self.fetch(location)?,
            "file" => {
                let path = location
                    .to_file_path()
                    .map_err(|_| WsdlError::UnsupportedScheme(location.to_string()))?;
                debug!(path = %path.display(), "Reading WSDL file");
                fs::read(path)?
            }
            other => return Err(WsdlError::UnsupportedScheme(other.to_string())),
        };

        parse_definitions(&xml)
    }
}
