//! Construction des enveloppes SOAP

use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use super::{EnvelopeRequest, Fault, namespaces};
use crate::{Params, SoapError};

const ENVELOPE: &str = "soap:Envelope";
const HEADER: &str = "soap:Header";
const BODY: &str = "soap:Body";

/// Émetteur XML sans indentation : deux appels identiques produisent
/// exactement les mêmes octets.
struct EnvelopeWriter {
    writer: Writer<Vec<u8>>,
}

impl EnvelopeWriter {
    fn new() -> Result<Self, SoapError> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(SoapError::encode)?;

        let mut out = Self { writer };
        out.start(
            BytesStart::new(ENVELOPE).with_attributes([
                ("xmlns:soap", namespaces::SOAP_ENVELOPE),
                ("xmlns:xsi", namespaces::XML_SCHEMA_INSTANCE),
                ("xmlns:xsd", namespaces::XML_SCHEMA),
            ]),
        )?;
        Ok(out)
    }

    fn start(&mut self, element: BytesStart<'_>) -> Result<(), SoapError> {
        self.writer
            .write_event(Event::Start(element))
            .map_err(SoapError::encode)
    }

    fn end(&mut self, name: &str) -> Result<(), SoapError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(SoapError::encode)
    }

    fn text_element(&mut self, name: &str, value: &str) -> Result<(), SoapError> {
        check_name(name)?;
        self.start(BytesStart::new(name))?;
        self.writer
            .write_event(Event::Text(BytesText::new(value)))
            .map_err(SoapError::encode)?;
        self.end(name)
    }

    /// Élément optionnellement qualifié par `xmlns`
    fn start_qualified(&mut self, name: &str, namespace: Option<&str>) -> Result<(), SoapError> {
        check_name(name)?;
        let mut element = BytesStart::new(name);
        if let Some(ns) = namespace {
            element.push_attribute(("xmlns", ns));
        }
        self.start(element)
    }

    fn params(&mut self, params: &Params) -> Result<(), SoapError> {
        for (name, value) in params {
            self.text_element(name, value)?;
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>, SoapError> {
        self.end(ENVELOPE)?;
        Ok(self.writer.into_inner())
    }
}

/// Un nom d'élément XML ne peut pas être vide ni contenir de séparateurs.
fn check_name(name: &str) -> Result<(), SoapError> {
    let valid = !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '.')
        && !name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '&' | '"' | '\'' | '/' | '='));

    if valid {
        Ok(())
    } else {
        Err(SoapError::Encode(format!("invalid XML element name '{name}'")))
    }
}

/// Construit l'enveloppe d'une requête.
///
/// ```text
/// <soap:Envelope xmlns:soap=... xmlns:xsi=... xmlns:xsd=...>
///   <soap:Header>...</soap:Header>        (seulement si des paramètres d'en-tête existent)
///   <soap:Body><Method><Key>value</Key>...</Method></soap:Body>
/// </soap:Envelope>
/// ```
///
/// Les paramètres sont émis dans l'ordre de leurs clés.
pub fn encode_envelope(request: &EnvelopeRequest<'_>) -> Result<Vec<u8>, SoapError> {
    let mut out = EnvelopeWriter::new()?;

    if let Some(header) = request.header.filter(|h| !h.params.is_empty()) {
        out.start(BytesStart::new(HEADER))?;
        match header.name.as_deref() {
            Some(name) => {
                out.start_qualified(name, request.namespace)?;
                out.params(&header.params)?;
                out.end(name)?;
            }
            None => out.params(&header.params)?,
        }
        out.end(HEADER)?;
    }

    out.start(BytesStart::new(BODY))?;
    out.start_qualified(request.method, request.namespace)?;
    out.params(request.params)?;
    out.end(request.method)?;
    out.end(BODY)?;

    out.finish()
}

/// Construit une enveloppe de réponse contenant un SOAP Fault (forme 1.1 :
/// `faultcode`, `faultstring`, `detail`).
pub fn build_fault(fault: &Fault) -> Result<String, SoapError> {
    let mut out = EnvelopeWriter::new()?;

    out.start(BytesStart::new(BODY))?;
    out.start(BytesStart::new("soap:Fault"))?;
    out.text_element("faultcode", &fault.code)?;
    out.text_element("faultstring", &fault.description)?;
    if let Some(detail) = &fault.detail {
        out.text_element("detail", detail)?;
    }
    out.end("soap:Fault")?;
    out.end(BODY)?;

    let bytes = out.finish()?;
    String::from_utf8(bytes).map_err(SoapError::encode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soap::HeaderBlock;

    fn to_string(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_encode_request() {
        let params = Params::from([("id", "42")]);
        let xml = to_string(encode_envelope(&EnvelopeRequest::new("GetUser", &params)).unwrap());

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/""#));
        assert!(xml.contains("<soap:Body><GetUser><id>42</id></GetUser></soap:Body>"));
        assert!(!xml.contains("soap:Header"));
        assert!(xml.ends_with("</soap:Envelope>"));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let first = Params::from([("b", "2"), ("a", "1")]);
        let second = Params::from([("a", "1"), ("b", "2")]);

        let x1 = encode_envelope(&EnvelopeRequest::new("M", &first)).unwrap();
        let x2 = encode_envelope(&EnvelopeRequest::new("M", &second)).unwrap();
        assert_eq!(x1, x2);
        assert!(to_string(x1).contains("<M><a>1</a><b>2</b></M>"));
    }

    #[test]
    fn test_encode_escapes_values() {
        let params = Params::from([("q", "a < b & c")]);
        let xml = to_string(encode_envelope(&EnvelopeRequest::new("Search", &params)).unwrap());
        assert!(xml.contains("<q>a &lt; b &amp; c</q>"));
    }

    #[test]
    fn test_encode_with_namespace() {
        let params = Params::new();
        let request = EnvelopeRequest::new("Ping", &params).with_namespace("urn:svc");
        let xml = to_string(encode_envelope(&request).unwrap());
        assert!(xml.contains(r#"<Ping xmlns="urn:svc"></Ping>"#));
    }

    #[test]
    fn test_encode_named_header() {
        let params = Params::from([("id", "1")]);
        let header = HeaderBlock {
            name: Some("AuthHeader".to_string()),
            params: Params::from([("Token", "secret"), ("User", "ada")]),
        };
        let request = EnvelopeRequest::new("GetUser", &params).with_header(&header);
        let xml = to_string(encode_envelope(&request).unwrap());

        assert!(xml.contains(
            "<soap:Header><AuthHeader><Token>secret</Token><User>ada</User></AuthHeader></soap:Header><soap:Body>"
        ));
    }

    #[test]
    fn test_encode_anonymous_header() {
        let params = Params::new();
        let header = HeaderBlock {
            name: None,
            params: Params::from([("SessionId", "s1")]),
        };
        let request = EnvelopeRequest::new("Logout", &params).with_header(&header);
        let xml = to_string(encode_envelope(&request).unwrap());
        assert!(xml.contains("<soap:Header><SessionId>s1</SessionId></soap:Header>"));
    }

    #[test]
    fn test_empty_header_is_omitted() {
        let params = Params::new();
        let header = HeaderBlock {
            name: Some("AuthHeader".to_string()),
            params: Params::new(),
        };
        let request = EnvelopeRequest::new("Ping", &params).with_header(&header);
        let xml = to_string(encode_envelope(&request).unwrap());
        assert!(!xml.contains("Header"));
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        let params = Params::from([("bad name", "x")]);
        let err = encode_envelope(&EnvelopeRequest::new("M", &params)).unwrap_err();
        assert!(matches!(err, SoapError::Encode(_)));

        let params = Params::new();
        let err = encode_envelope(&EnvelopeRequest::new("", &params)).unwrap_err();
        assert!(matches!(err, SoapError::Encode(_)));
    }

    #[test]
    fn test_build_fault() {
        let fault = Fault::new("soap:Client", "Invalid Action");
        let xml = build_fault(&fault).unwrap();

        assert!(xml.contains("<soap:Fault>"));
        assert!(xml.contains("<faultcode>soap:Client</faultcode>"));
        assert!(xml.contains("<faultstring>Invalid Action</faultstring>"));
        assert!(!xml.contains("<detail>"));
    }
}
