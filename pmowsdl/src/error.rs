use thiserror::Error;

/// Erreurs de chargement ou de parsing d'un WSDL
#[derive(Debug, Error)]
pub enum WsdlError {
    #[error("Invalid WSDL location: {0}")]
    InvalidLocation(#[from] url::ParseError),

    #[error("Unsupported WSDL location scheme: {0}")]
    UnsupportedScheme(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("WSDL fetch failed with HTTP status {0}")]
    HttpStatus(u16),

    #[error("Failed to read WSDL: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(String),

    #[error("Not a WSDL document (root element: '{0}')")]
    NotAWsdl(String),
}

impl From<quick_xml::Error> for WsdlError {
    fn from(err: quick_xml::Error) -> Self {
        WsdlError::Xml(err.to_string())
    }
}
