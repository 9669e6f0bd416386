//! Détection des SOAP Faults

use quick_xml::{Reader, escape::unescape, events::Event};

use crate::SoapError;

/// Erreur SOAP (Fault) renvoyée dans le Body d'une réponse
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fault {
    /// Code d'erreur (ex: "soap:Client", "400")
    pub code: String,

    /// Description lisible de l'erreur
    pub description: String,

    /// Contenu brut de `detail`, s'il existe
    pub detail: Option<String>,
}

impl Fault {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            detail: None,
        }
    }
}

impl From<Fault> for SoapError {
    fn from(fault: Fault) -> Self {
        SoapError::RemoteFault {
            code: fault.code,
            description: fault.description,
        }
    }
}

/// Cherche un Fault dans le XML interne d'un Body.
///
/// La détection est spéculative : un Body qui n'est pas un Fault, ou qui
/// n'est pas lisible, donne simplement `None`. Un Fault n'est retenu que si
/// son code est non vide une fois les blancs retirés : `<Code>  </Code>` ne
/// signale pas de Fault. Code et description sont rendus sans leurs blancs
/// de début et de fin.
///
/// Noms reconnus (comparés sans préfixe) :
/// - code : `Code`, `faultcode`, ou `Code/Value` (SOAP 1.2)
/// - description : `Description`, `faultstring`, ou `Reason/Text` (SOAP 1.2)
pub fn detect_fault(body: &[u8]) -> Option<Fault> {
    read_fault(body)
        .ok()
        .flatten()
        .filter(|fault| !fault.code.is_empty())
}

fn read_fault(body: &[u8]) -> Result<Option<Fault>, quick_xml::Error> {
    let mut reader = Reader::from_reader(body);

    let root = loop {
        match reader.read_event()? {
            Event::Start(e) => break e,
            Event::Empty(_) | Event::Eof => return Ok(None),
            Event::Text(t) if !t.iter().all(u8::is_ascii_whitespace) => return Ok(None),
            _ => {}
        }
    };

    if root.local_name().as_ref() != b"Fault" {
        return Ok(None);
    }

    let mut fault = Fault::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let raw = reader.read_text(e.name())?;
                match e.local_name().as_ref() {
                    b"Code" | b"faultcode" => fault.code = leaf_text(&raw),
                    b"Description" | b"faultstring" | b"Reason" => {
                        fault.description = leaf_text(&raw)
                    }
                    b"detail" | b"Detail" => fault.detail = Some(raw.trim().to_string()),
                    _ => {}
                }
            }
            Event::End(_) | Event::Eof => break,
            _ => {}
        }
    }

    Ok(Some(fault))
}

/// Texte du premier élément feuille contenu dans `raw`
fn leaf_text(raw: &str) -> String {
    if !raw.contains('<') {
        return match unescape(raw) {
            Ok(text) => text.trim().to_string(),
            Err(_) => raw.trim().to_string(),
        };
    }

    let mut reader = Reader::from_str(raw);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                return reader
                    .read_text(e.name())
                    .map(|inner| leaf_text(&inner))
                    .unwrap_or_default();
            }
            Ok(Event::CData(c)) => return String::from_utf8_lossy(&c).trim().to_string(),
            Ok(Event::Eof) | Err(_) => return String::new(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_simple_fault() {
        let body = b"<Fault><Code>400</Code><Description>bad id</Description></Fault>";
        let fault = detect_fault(body).unwrap();
        assert_eq!(fault.code, "400");
        assert_eq!(fault.description, "bad id");
        assert_eq!(fault.detail, None);
    }

    #[test]
    fn test_detect_soap11_fault() {
        let body = br#"
    <soap:Fault>
      <faultcode>soap:Server</faultcode>
      <faultstring>Server was unable to process request &amp; gave up</faultstring>
      <detail><ErrorInfo>db down</ErrorInfo></detail>
    </soap:Fault>
  "#;
        let fault = detect_fault(body).unwrap();
        assert_eq!(fault.code, "soap:Server");
        assert_eq!(
            fault.description,
            "Server was unable to process request & gave up"
        );
        assert_eq!(
            fault.detail.as_deref(),
            Some("<ErrorInfo>db down</ErrorInfo>")
        );
    }

    #[test]
    fn test_detect_soap12_fault() {
        let body = br#"<env:Fault>
  <env:Code><env:Value>env:Sender</env:Value><env:Subcode><env:Value>m:Bad</env:Value></env:Subcode></env:Code>
  <env:Reason><env:Text xml:lang="en">Invalid user</env:Text></env:Reason>
</env:Fault>"#;
        let fault = detect_fault(body).unwrap();
        assert_eq!(fault.code, "env:Sender");
        assert_eq!(fault.description, "Invalid user");
    }

    #[test]
    fn test_fault_without_code_is_ignored() {
        let body = b"<Fault><Code></Code><Description>nothing</Description></Fault>";
        assert_eq!(detect_fault(body), None);
    }

    #[test]
    fn test_blank_code_is_ignored() {
        let body = b"<Fault><Code> \n </Code><Description>oops</Description></Fault>";
        assert_eq!(detect_fault(body), None);

        let body = b"<Fault><faultcode>\n  soap:Server\n</faultcode><faultstring> boom </faultstring></Fault>";
        assert_eq!(detect_fault(body), Some(Fault::new("soap:Server", "boom")));
    }

    #[test]
    fn test_regular_body_is_not_a_fault() {
        let body = b"<GetUserResponse><Code>200</Code><Name>Ada</Name></GetUserResponse>";
        assert_eq!(detect_fault(body), None);
    }

    #[test]
    fn test_garbage_is_not_a_fault() {
        assert_eq!(detect_fault(b"plain text"), None);
        assert_eq!(detect_fault(b""), None);
        assert_eq!(detect_fault(b"<Fault><Code>1</Description></Fault>"), None);
        assert_eq!(detect_fault(&[0xff, 0xfe, 0x00]), None);
    }

    #[test]
    fn test_fault_into_error() {
        let err: SoapError = Fault::new("400", "bad id").into();
        assert!(matches!(
            err,
            SoapError::RemoteFault { ref code, ref description } if code == "400" && description == "bad id"
        ));
    }
}
