//! # Module SOAP - enveloppes et faults
//!
//! Ce module ne connaît que le cadre SOAP : `Envelope`, `Header`, `Body` et
//! l'élément de la méthode appelée. Le contenu du Header et du Body d'une
//! réponse est conservé en XML brut et n'est interprété que par l'appelant
//! (ou par la détection de [`Fault`]).
//!
//! ## Example
//!
//! ```
//! use pmosoap::Params;
//! use pmosoap::soap::{EnvelopeRequest, decode_envelope, encode_envelope};
//!
//! let params = Params::from([("a", "1"), ("b", "2")]);
//! let request = EnvelopeRequest::new("M", &params);
//! let xml = encode_envelope(&request).unwrap();
//!
//! let envelope = decode_envelope(&xml).unwrap();
//! assert_eq!(envelope.body, b"<M><a>1</a><b>2</b></M>");
//! ```

mod builder;
mod envelope;
mod fault;
mod parser;

pub use builder::{build_fault, encode_envelope};
pub use envelope::{Envelope, EnvelopeRequest, HeaderBlock};
pub use fault::{Fault, detect_fault};
pub use parser::{MalformedEnvelope, decode_body, decode_envelope};

/// Namespaces déclarés sur l'enveloppe émise
pub mod namespaces {
    /// SOAP 1.1
    pub const SOAP_ENVELOPE: &str = "http://schemas.xmlsoap.org/soap/envelope/";

    pub const XML_SCHEMA_INSTANCE: &str = "http://www.w3.org/2001/XMLSchema-instance";

    pub const XML_SCHEMA: &str = "http://www.w3.org/2001/XMLSchema";
}
