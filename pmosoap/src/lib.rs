//! # pmosoap - Client SOAP piloté par WSDL
//!
//! Cette crate permet d'appeler les opérations d'un service SOAP décrit par
//! un document WSDL :
//!
//! 1. le WSDL est chargé et analysé à la construction du client
//!    ([`pmowsdl`]) ;
//! 2. chaque appel encode une enveloppe SOAP 1.1, l'envoie en HTTP POST à la
//!    première adresse déclarée par le WSDL et décode l'enveloppe reçue ;
//! 3. le Body de la réponse est ensuite désérialisé dans un type fourni par
//!    l'appelant, sauf s'il contient un SOAP Fault.
//!
//! ## Organisation
//!
//! - [`soap`] : encodage/décodage des enveloppes et détection des faults
//! - [`transport`] : envoi HTTP (trait [`Transport`], implémentation `ureq`)
//! - [`client`] : [`SoapClient`] et l'état du dernier appel
//! - [`config`] : configuration YAML et surcharges par variables d'environnement
//!
//! ## Example
//!
//! ```no_run
//! use pmosoap::{Params, SoapClient, SoapError};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct AddResponse {
//!     #[serde(rename = "AddResult")]
//!     result: i64,
//! }
//!
//! let mut client = SoapClient::new("http://www.dneonline.com/calculator.asmx?WSDL")?;
//! client.call("Add", Params::from([("intA", "1"), ("intB", "2")]))?;
//!
//! match client.unmarshal::<AddResponse>() {
//!     Ok(sum) => println!("1 + 2 = {}", sum.result),
//!     Err(SoapError::RemoteFault { code, description }) => {
//!         eprintln!("fault {code}: {description}")
//!     }
//!     Err(e) => return Err(e),
//! }
//! # Ok::<(), SoapError>(())
//! ```

pub mod client;
pub mod config;
mod error;
mod params;
pub mod soap;
pub mod transport;

pub use client::{SoapClient, SoapResponse};
pub use config::SoapConfig;
pub use error::{ErrorKind, SoapError};
pub use params::Params;
pub use soap::Fault;
pub use transport::{HttpTransport, Transport, TransportError};

pub use pmowsdl;
