//! Structures extraites d'un document WSDL

/// Définitions d'un service décrit par un WSDL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDefinition {
    /// Namespace cible du document (`targetNamespace` de la racine)
    pub target_namespace: String,

    /// Namespace cible du premier schéma XSD embarqué, s'il existe
    pub schema_namespace: Option<String>,

    /// Services annoncés, dans l'ordre du document
    pub services: Vec<WsdlService>,
}

/// Un `<service>` du WSDL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WsdlService {
    pub name: String,
    pub ports: Vec<WsdlPort>,
}

/// Un `<port>` (WSDL 1.1) ou `<endpoint>` (WSDL 2.0)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WsdlPort {
    pub name: String,
    pub binding: Option<String>,
    /// Adresses réseau du port (`soap:address`, `soap12:address`, `http:address`)
    pub addresses: Vec<String>,
}

impl ServiceDefinition {
    /// Première adresse du premier port du premier service.
    ///
    /// Retourne `None` dès qu'un niveau est vide : seul le tout premier
    /// élément de chaque niveau est considéré.
    pub fn first_address(&self) -> Option<&str> {
        self.services
            .first()?
            .ports
            .first()?
            .addresses
            .first()
            .map(String::as_str)
    }

    /// Définition construite à la main, pratique pour les tests et les
    /// services dont l'adresse est connue sans WSDL.
    pub fn single_endpoint(target_namespace: &str, address: &str) -> Self {
        Self {
            target_namespace: target_namespace.to_string(),
            schema_namespace: None,
            services: vec![WsdlService {
                name: String::new(),
                ports: vec![WsdlPort {
                    name: String::new(),
                    binding: None,
                    addresses: vec![address.to_string()],
                }],
            }],
        }
    }
}
