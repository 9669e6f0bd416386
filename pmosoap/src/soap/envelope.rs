//! Structures de l'enveloppe SOAP

use std::borrow::Cow;

use crate::Params;

/// Enveloppe SOAP décodée.
///
/// Header et Body sont conservés tels quels (XML interne brut).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Envelope {
    /// XML interne de `Header`, vide si absent
    pub header: Vec<u8>,

    /// XML interne de `Body`, vide si absent
    pub body: Vec<u8>,
}

impl Envelope {
    pub fn header_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.header)
    }

    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Paramètres d'en-tête d'un appel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderBlock {
    /// Élément englobant les paramètres dans `Header`, s'il y en a un
    pub name: Option<String>,
    pub params: Params,
}

/// Tout ce qu'il faut pour émettre une enveloppe de requête
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeRequest<'a> {
    pub method: &'a str,
    pub params: &'a Params,
    pub header: Option<&'a HeaderBlock>,
    /// Namespace posé en `xmlns` sur l'élément de la méthode (et du header)
    pub namespace: Option<&'a str>,
}

impl<'a> EnvelopeRequest<'a> {
    pub fn new(method: &'a str, params: &'a Params) -> Self {
        Self {
            method,
            params,
            header: None,
            namespace: None,
        }
    }

    pub fn with_header(mut self, header: &'a HeaderBlock) -> Self {
        self.header = Some(header);
        self
    }

    pub fn with_namespace(mut self, namespace: &'a str) -> Self {
        self.namespace = Some(namespace);
        self
    }
}
