//! # pmowsdl - Définitions WSDL
//!
//! Chargement et parsing minimal de documents WSDL (1.1 et 2.0) afin d'en
//! extraire ce dont un client SOAP a besoin :
//!
//! - le namespace cible (`targetNamespace`)
//! - la liste ordonnée des services, de leurs ports et des adresses réseau
//!
//! Le schéma des types (XSD) n'est pas interprété, seul le namespace du
//! premier `schema` est conservé.
//!
//! ## Example
//!
//! ```no_run
//! use pmowsdl::{DefinitionsProvider, HttpWsdlProvider};
//! use url::Url;
//!
//! let provider = HttpWsdlProvider::default();
//! let location = Url::parse("http://example.org/service?wsdl")?;
//! let definitions = provider.definitions(&location)?;
//! println!("endpoint: {:?}", definitions.first_address());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod definitions;
mod error;
mod parser;
mod provider;

pub use definitions::{ServiceDefinition, WsdlPort, WsdlService};
pub use error::WsdlError;
pub use parser::parse_definitions;
pub use provider::{DefinitionsProvider, HttpWsdlProvider};
