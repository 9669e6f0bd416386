//! Parser WSDL en flux (quick-xml)
//!
//! Les éléments sont comparés par leur nom local : les préfixes (`wsdl:`,
//! `soap:`, `soap12:`...) ne sont pas résolus.

use quick_xml::{
    Reader,
    encoding::Decoder,
    events::{BytesStart, Event},
};
use tracing::{debug, trace};

use crate::{ServiceDefinition, WsdlError, WsdlPort, WsdlService};

/// Parse un document WSDL et en extrait les [`ServiceDefinition`].
///
/// La racine doit être `definitions` (WSDL 1.1) ou `description` (WSDL 2.0).
pub fn parse_definitions(xml: &[u8]) -> Result<ServiceDefinition, WsdlError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let decoder = reader.decoder();

    let mut buf = Vec::new();
    let mut definitions = ServiceDefinition::default();
    let mut root_seen = false;
    let mut in_port = false;

    loop {
        let event = reader.read_event_into(&mut buf)?;
        let is_empty = matches!(event, Event::Empty(_));

        match event {
            Event::Start(ref e) | Event::Empty(ref e) if !root_seen => {
                let name = local_name(e);
                if name != "definitions" && name != "description" {
                    return Err(WsdlError::NotAWsdl(name));
                }
                root_seen = true;
                definitions.target_namespace =
                    attribute(e, b"targetNamespace", decoder)?.unwrap_or_default();
                if is_empty {
                    break;
                }
            }
            Event::Start(ref e) | Event::Empty(ref e) => match local_name(e).as_str() {
                "schema" => {
                    if definitions.schema_namespace.is_none() {
                        definitions.schema_namespace =
                            attribute(e, b"targetNamespace", decoder)?;
                    }
                }
                "service" => {
                    let name = attribute(e, b"name", decoder)?.unwrap_or_default();
                    trace!(service = %name, "WSDL service");
                    definitions.services.push(WsdlService {
                        name,
                        ports: Vec::new(),
                    });
                }
                "port" | "endpoint" => {
                    if let Some(service) = definitions.services.last_mut() {
                        let mut port = WsdlPort {
                            name: attribute(e, b"name", decoder)?.unwrap_or_default(),
                            binding: attribute(e, b"binding", decoder)?,
                            addresses: Vec::new(),
                        };
                        // WSDL 2.0 : l'adresse est un attribut de <endpoint>
                        if let Some(address) = attribute(e, b"address", decoder)? {
                            port.addresses.push(address);
                        }
                        service.ports.push(port);
                        in_port = !is_empty;
                    }
                }
                "address" if in_port => {
                    if let Some(location) = attribute(e, b"location", decoder)? {
                        if let Some(port) = definitions
                            .services
                            .last_mut()
                            .and_then(|s| s.ports.last_mut())
                        {
                            port.addresses.push(location);
                        }
                    }
                }
                _ => {}
            },
            Event::End(ref e) => {
                let name = e.local_name();
                if name.as_ref() == b"port" || name.as_ref() == b"endpoint" {
                    in_port = false;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !root_seen {
        return Err(WsdlError::NotAWsdl(String::new()));
    }

    debug!(
        target_namespace = %definitions.target_namespace,
        services = definitions.services.len(),
        "Parsed WSDL definitions"
    );

    Ok(definitions)
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

/// Valeur (déséchappée) d'un attribut, recherché par nom local
fn attribute(
    e: &BytesStart<'_>,
    name: &[u8],
    decoder: Decoder,
) -> Result<Option<String>, WsdlError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| WsdlError::Xml(err.to_string()))?;
        if attr.key.local_name().as_ref() == name {
            let value = attr
                .decode_and_unescape_value(decoder)
                .map_err(|err| WsdlError::Xml(err.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
