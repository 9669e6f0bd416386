use pmowsdl::{DefinitionsProvider, HttpWsdlProvider, WsdlError};
use std::io::Write;
use url::Url;

const WSDL: &str = r#"<?xml version="1.0"?>
<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
    xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
    targetNamespace="http://example.org/ns/">
  <service name="UserService">
    <port name="UserPort" binding="tns:UserBinding">
      <soap:address location="http://example.org/endpoint"/>
    </port>
  </service>
</definitions>"#;

#[test]
fn test_fetch_wsdl_over_http() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/service")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(WSDL)
        .create();

    let location = Url::parse(&format!("{}/service?wsdl", server.url())).unwrap();
    let def = HttpWsdlProvider::default().definitions(&location).unwrap();

    mock.assert();
    assert_eq!(def.target_namespace, "http://example.org/ns/");
    assert_eq!(def.first_address(), Some("http://example.org/endpoint"));
}

#[test]
fn test_fetch_wsdl_http_error_status() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/missing")
        .with_status(404)
        .with_body("not found")
        .create();

    let location = Url::parse(&format!("{}/missing", server.url())).unwrap();
    let err = HttpWsdlProvider::default()
        .definitions(&location)
        .unwrap_err();

    assert!(matches!(err, WsdlError::HttpStatus(404)));
}

#[test]
fn test_read_wsdl_from_file() {
    let mut file = tempfile::NamedTempFile::with_suffix(".wsdl").unwrap();
    file.write_all(WSDL.as_bytes()).unwrap();

    let location = Url::from_file_path(file.path()).unwrap();
    let def = HttpWsdlProvider::default().definitions(&location).unwrap();

    assert_eq!(def.services[0].name, "UserService");
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let location = Url::from_file_path(dir.path().join("absent.wsdl")).unwrap();
    let err = HttpWsdlProvider::default()
        .definitions(&location)
        .unwrap_err();

    assert!(matches!(err, WsdlError::Io(_)));
}

#[test]
fn test_unsupported_scheme() {
    let location = Url::parse("ftp://example.org/service.wsdl").unwrap();
    let err = HttpWsdlProvider::default()
        .definitions(&location)
        .unwrap_err();

    assert!(matches!(err, WsdlError::UnsupportedScheme(ref s) if s == "ftp"));
}
