//! Décodage des enveloppes SOAP

use quick_xml::{DeError, Reader, events::Event};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::{Envelope, detect_fault};
use crate::SoapError;

/// Enveloppe illisible.
///
/// `partial` contient ce qui a pu être extrait avant l'erreur (par exemple
/// un Header complet suivi d'un Body tronqué).
#[derive(Debug, Clone, Error)]
#[error("{reason}")]
pub struct MalformedEnvelope {
    pub reason: String,
    pub partial: Envelope,
}

/// Décode le cadre `Envelope` / `Header` / `Body` d'une réponse.
///
/// Les éléments sont reconnus par leur nom local, quel que soit leur préfixe.
/// Le contenu de `Header` et `Body` est capturé tel quel, sans interprétation.
/// Un Body absent donne un Body vide.
pub fn decode_envelope(xml: &[u8]) -> Result<Envelope, MalformedEnvelope> {
    let mut envelope = Envelope::default();
    match read_frame(xml, &mut envelope) {
        Ok(()) => Ok(envelope),
        Err(reason) => Err(MalformedEnvelope {
            reason,
            partial: envelope,
        }),
    }
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn read_frame(xml: &[u8], envelope: &mut Envelope) -> Result<(), String> {
    // Le reader saute le BOM sans le compter dans ses positions : les spans
    // doivent être appliqués au document sans BOM.
    let xml = xml.strip_prefix(UTF8_BOM).unwrap_or(xml);
    let mut reader = Reader::from_reader(xml);

    // Racine
    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(e) => {
                if e.local_name().as_ref() != b"Envelope" {
                    return Err(format!(
                        "expected Envelope root element, found '{}'",
                        String::from_utf8_lossy(e.name().as_ref())
                    ));
                }
                break;
            }
            Event::Empty(e) => {
                if e.local_name().as_ref() != b"Envelope" {
                    return Err(format!(
                        "expected Envelope root element, found '{}'",
                        String::from_utf8_lossy(e.name().as_ref())
                    ));
                }
                return read_trailer(&mut reader);
            }
            Event::Text(t) if !is_blank(&t) => {
                return Err("text content before the root element".to_string());
            }
            Event::Eof => return Err("document has no root element".to_string()),
            _ => {}
        }
    }

    // Enfants de l'Envelope
    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(e) => {
                let span = reader.read_to_end(e.name()).map_err(|e| e.to_string())?;
                let inner = xml[span.start as usize..span.end as usize].to_vec();
                match e.local_name().as_ref() {
                    b"Header" => envelope.header = inner,
                    b"Body" => envelope.body = inner,
                    _ => {}
                }
            }
            Event::End(_) => break,
            Event::Eof => return Err("unexpected end of document inside Envelope".to_string()),
            _ => {}
        }
    }

    read_trailer(&mut reader)
}

/// Seuls des blancs, commentaires ou instructions peuvent suivre la racine.
fn read_trailer(reader: &mut Reader<&[u8]>) -> Result<(), String> {
    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Eof => return Ok(()),
            Event::Start(_) | Event::Empty(_) => {
                return Err("unexpected element after the Envelope".to_string());
            }
            Event::Text(t) if !is_blank(&t) => {
                return Err("unexpected text after the Envelope".to_string());
            }
            _ => {}
        }
    }
}

/// Décode le XML interne d'un Body dans un type fourni par l'appelant.
///
/// - Body vide (ou uniquement des blancs) : [`SoapError::EmptyResponseBody`]
/// - Body contenant un Fault : [`SoapError::RemoteFault`], sans tenter le décodage
/// - sinon désérialisation `quick_xml::de` ; le nom de l'élément racine n'est
///   pas vérifié, seuls ses enfants sont mis en correspondance avec `T`
pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, SoapError> {
    if is_blank(body) {
        return Err(SoapError::EmptyResponseBody);
    }

    if let Some(fault) = detect_fault(body) {
        return Err(fault.into());
    }

    let text = std::str::from_utf8(body).map_err(|e| DeError::Custom(e.to_string()))?;
    Ok(quick_xml::de::from_str(text.trim())?)
}
