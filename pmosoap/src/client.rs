//! # Client SOAP
//!
//! [`SoapClient`] est construit une fois par service (URL du WSDL), puis
//! réutilisé pour des appels successifs. Chaque appel est un aller-retour
//! HTTP indépendant.
//!
//! ## État de session
//!
//! Le client conserve l'état du dernier appel : méthode, paramètres,
//! enveloppe émise et réponse reçue. Cet état est remplacé à chaque
//! [`call`](SoapClient::call). Les appels prennent `&mut self`, un même
//! client ne peut donc pas servir à deux appels simultanés ; utiliser un
//! client par contexte concurrent.
//!
//! ## Example
//!
//! ```no_run
//! use pmosoap::{Params, SoapClient};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct GetUserResponse {
//!     name: String,
//! }
//!
//! let mut client = SoapClient::new("http://example.org/service?wsdl")?;
//! client.call("GetUser", Params::from([("id", "42")]))?;
//! let user: GetUserResponse = client.unmarshal()?;
//! println!("{}", user.name);
//! # Ok::<(), pmosoap::SoapError>(())
//! ```

use pmowsdl::{DefinitionsProvider, HttpWsdlProvider, ServiceDefinition};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    Params, SoapError,
    config::SoapConfig,
    soap::{
        Envelope, EnvelopeRequest, Fault, HeaderBlock, decode_body, decode_envelope,
        detect_fault, encode_envelope,
    },
    transport::{HttpTransport, Transport, TransportRequest},
};

/// Résultat d'un appel : statut HTTP et enveloppe décodée.
///
/// Indépendant du client : peut être conservé après d'autres appels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoapResponse {
    pub status: u16,
    pub envelope: Envelope,
}

impl SoapResponse {
    pub fn header(&self) -> &[u8] {
        &self.envelope.header
    }

    pub fn body(&self) -> &[u8] {
        &self.envelope.body
    }

    /// Fault contenu dans le Body, s'il y en a un
    pub fn fault(&self) -> Option<Fault> {
        detect_fault(&self.envelope.body)
    }

    /// Décode le Body dans `T` (voir [`decode_body`])
    pub fn unmarshal<T: DeserializeOwned>(&self) -> Result<T, SoapError> {
        decode_body(&self.envelope.body)
    }
}

/// Client SOAP lié à un service décrit par un WSDL
#[derive(Debug)]
pub struct SoapClient<T: Transport = HttpTransport> {
    wsdl: Url,
    url: String,
    definitions: ServiceDefinition,
    config: SoapConfig,
    transport: T,

    method: String,
    params: Params,
    header: Option<HeaderBlock>,
    payload: Vec<u8>,
    response: Option<SoapResponse>,
}

impl SoapClient<HttpTransport> {
    /// Construit un client avec la configuration par défaut.
    pub fn new(wsdl: &str) -> Result<Self, SoapError> {
        Self::with_config(wsdl, SoapConfig::default())
    }

    /// Construit un client : le WSDL est chargé et le transport HTTP
    /// configuré selon `config`.
    pub fn with_config(wsdl: &str, config: SoapConfig) -> Result<Self, SoapError> {
        let provider = HttpWsdlProvider::new(config.timeout(), config.tls.verify_certificates);
        let transport = HttpTransport::from_config(&config);
        Self::with_parts(wsdl, &provider, transport, config)
    }
}

impl<T: Transport> SoapClient<T> {
    /// Construit un client à partir de collaborateurs explicites.
    ///
    /// Le namespace du client est le `targetNamespace` du WSDL, privé de son
    /// éventuel `/` final.
    pub fn with_parts<P: DefinitionsProvider + ?Sized>(
        wsdl: &str,
        provider: &P,
        transport: T,
        config: SoapConfig,
    ) -> Result<Self, SoapError> {
        let location = Url::parse(wsdl).map_err(pmowsdl::WsdlError::from)?;
        let definitions = provider.definitions(&location)?;
        let url = definitions
            .target_namespace
            .strip_suffix('/')
            .unwrap_or(&definitions.target_namespace)
            .to_string();

        info!(wsdl = %location, namespace = %url, "SOAP client ready");

        Ok(Self {
            wsdl: location,
            url,
            definitions,
            config,
            transport,
            method: String::new(),
            params: Params::new(),
            header: None,
            payload: Vec::new(),
            response: None,
        })
    }

    /// Appelle `method` avec `params`.
    ///
    /// En cas de réponse illisible, l'éventuel Header/Body partiellement
    /// décodé reste consultable via [`body`](Self::body) et
    /// [`header`](Self::header).
    pub fn call(&mut self, method: &str, params: Params) -> Result<(), SoapError> {
        self.method = method.to_string();
        self.params = params;
        self.payload.clear();
        self.response = None;

        let mut request = EnvelopeRequest::new(&self.method, &self.params);
        if let Some(header) = &self.header {
            request = request.with_header(header);
        }
        if self.config.envelope.qualify_method {
            request = request.with_namespace(&self.definitions.target_namespace);
        }
        self.payload = encode_envelope(&request)?;

        let address = self
            .definitions
            .first_address()
            .ok_or(SoapError::NoEndpoint)?;

        let soap_action = format!("{}/{}", self.url, self.method);
        debug!(
            method = %self.method,
            url = address,
            soap_action = %soap_action,
            bytes = self.payload.len(),
            "Sending SOAP request"
        );

        let response = self
            .transport
            .send(&TransportRequest::soap(address, soap_action, &self.payload))?;
        let status = response.status;

        match decode_envelope(&response.body) {
            Ok(envelope) => {
                if !response.is_success() {
                    debug!(method = %self.method, status, "SOAP response with error status");
                }
                self.response = Some(SoapResponse { status, envelope });
                Ok(())
            }
            Err(err) => {
                warn!(method = %self.method, status, "Malformed SOAP response: {}", err);
                self.response = Some(SoapResponse {
                    status,
                    envelope: err.partial,
                });
                if self.config.http.reject_error_status && !response.is_success() {
                    Err(SoapError::HttpStatus { status })
                } else {
                    Err(SoapError::MalformedResponse(err.reason))
                }
            }
        }
    }

    /// Appelle `method` avec des paramètres typés (voir
    /// [`Params::from_serializable`]).
    pub fn call_typed<P: Serialize + ?Sized>(
        &mut self,
        method: &str,
        params: &P,
    ) -> Result<(), SoapError> {
        let params = Params::from_serializable(params)?;
        self.call(method, params)
    }

    /// Décode le Body de la dernière réponse.
    ///
    /// Un Fault dans le Body produit [`SoapError::RemoteFault`] sans que le
    /// décodage dans `R` soit tenté.
    pub fn unmarshal<R: DeserializeOwned>(&self) -> Result<R, SoapError> {
        self.response
            .as_ref()
            .ok_or(SoapError::EmptyResponseBody)?
            .unmarshal()
    }

    /// Paramètres d'en-tête envoyés avec les appels suivants.
    pub fn set_header(&mut self, name: Option<&str>, params: Params) {
        self.header = Some(HeaderBlock {
            name: name.map(str::to_string),
            params,
        });
    }

    pub fn clear_header(&mut self) {
        self.header = None;
    }

    /// Dernière enveloppe émise
    pub fn last_request(&self) -> &[u8] {
        &self.payload
    }

    pub fn last_response(&self) -> Option<&SoapResponse> {
        self.response.as_ref()
    }

    /// XML interne du Body de la dernière réponse (vide si aucune)
    pub fn body(&self) -> &[u8] {
        match &self.response {
            Some(response) => response.body(),
            None => &[],
        }
    }

    /// XML interne du Header de la dernière réponse (vide si aucun)
    pub fn header(&self) -> &[u8] {
        match &self.response {
            Some(response) => response.header(),
            None => &[],
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Namespace du service, utilisé pour l'en-tête `SOAPAction`
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn wsdl(&self) -> &Url {
        &self.wsdl
    }

    pub fn definitions(&self) -> &ServiceDefinition {
        &self.definitions
    }

    pub fn config(&self) -> &SoapConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}
