use pmowsdl::WsdlError;
use thiserror::Error;

use crate::transport::TransportError;

/// Erreurs du client SOAP
#[derive(Error, Debug)]
pub enum SoapError {
    /// Localisation WSDL invalide, ou WSDL impossible à charger/parser
    #[error("Invalid WSDL: {0}")]
    InvalidWsdl(#[from] WsdlError),

    /// Aucun service/port/adresse exploitable dans les définitions
    #[error("No endpoint address advertised by the WSDL")]
    NoEndpoint,

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Réponse non-2xx dont le corps n'est pas une enveloppe SOAP
    #[error("HTTP status {status} with a non-SOAP body")]
    HttpStatus { status: u16 },

    #[error("Malformed SOAP response: {0}")]
    MalformedResponse(String),

    #[error("SOAP response body is empty")]
    EmptyResponseBody,

    /// Fault renvoyé par le service distant
    #[error("[{code}]: {description}")]
    RemoteFault { code: String, description: String },

    #[error("Cannot decode SOAP body: {0}")]
    Decode(#[from] quick_xml::DeError),

    #[error("Cannot encode SOAP envelope: {0}")]
    Encode(String),

    #[error("Invalid call parameters: {0}")]
    InvalidParams(String),
}

/// Catégorie d'une [`SoapError`], sans les données associées
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidWsdl,
    NoEndpoint,
    Transport,
    HttpStatus,
    MalformedResponse,
    EmptyResponseBody,
    RemoteFault,
    Decode,
    Encode,
    InvalidParams,
}

impl SoapError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SoapError::InvalidWsdl(_) => ErrorKind::InvalidWsdl,
            SoapError::NoEndpoint => ErrorKind::NoEndpoint,
            SoapError::Transport(_) => ErrorKind::Transport,
            SoapError::HttpStatus { .. } => ErrorKind::HttpStatus,
            SoapError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            SoapError::EmptyResponseBody => ErrorKind::EmptyResponseBody,
            SoapError::RemoteFault { .. } => ErrorKind::RemoteFault,
            SoapError::Decode(_) => ErrorKind::Decode,
            SoapError::Encode(_) => ErrorKind::Encode,
            SoapError::InvalidParams(_) => ErrorKind::InvalidParams,
        }
    }

    pub(crate) fn encode(err: impl std::fmt::Display) -> Self {
        SoapError::Encode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_fault_display() {
        let err = SoapError::RemoteFault {
            code: "400".to_string(),
            description: "bad id".to_string(),
        };
        assert_eq!(err.to_string(), "[400]: bad id");
        assert_eq!(err.kind(), ErrorKind::RemoteFault);
    }

    #[test]
    fn test_wsdl_error_conversion() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let err: SoapError = WsdlError::from(parse_err).into();
        assert_eq!(err.kind(), ErrorKind::InvalidWsdl);
        assert!(err.to_string().starts_with("Invalid WSDL"));
    }

    #[test]
    fn test_http_status_display() {
        let err = SoapError::HttpStatus { status: 502 };
        assert_eq!(err.to_string(), "HTTP status 502 with a non-SOAP body");
    }
}
