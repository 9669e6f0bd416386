//! Appel d'une opération SOAP depuis la ligne de commande
//!
//! Le WSDL est chargé, l'opération appelée avec les paramètres `clé=valeur`
//! donnés, puis le Body de la réponse (ou le Fault) est affiché.
//!
//! La configuration est lue dans le fichier désigné par `PMOSOAP_CONFIG`
//! s'il est défini, puis surchargée par les variables
//! `PMOSOAP_CONFIG__<SECTION>__<KEY>`.
//!
//! Usage:
//!   cargo run --example call_operation -- <wsdl_url> <method> [key=value...]
//!
//! Exemple:
//!   RUST_LOG=pmosoap=debug cargo run --example call_operation -- \
//!       "http://www.dneonline.com/calculator.asmx?WSDL" Add intA=1 intB=2

use std::{env, path::PathBuf};

use pmosoap::{Params, SoapClient, SoapConfig};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <wsdl_url> <method> [key=value...]", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!(
            "  {} \"http://www.dneonline.com/calculator.asmx?WSDL\" Add intA=1 intB=2",
            args[0]
        );
        std::process::exit(1);
    }

    let wsdl = &args[1];
    let method = &args[2];

    let mut params = Params::new();
    for arg in &args[3..] {
        let Some((key, value)) = arg.split_once('=') else {
            anyhow::bail!("Invalid parameter '{}', expected key=value", arg);
        };
        params.insert(key, value);
    }

    let config_path = env::var_os("PMOSOAP_CONFIG").map(PathBuf::from);
    let config = SoapConfig::load(config_path.as_deref())?;

    let mut client = SoapClient::with_config(wsdl, config)?;
    println!("Service namespace: {}", client.url());

    client.call(method, params)?;

    let Some(response) = client.last_response() else {
        return Ok(());
    };
    println!("HTTP status: {}", response.status);

    match response.fault() {
        Some(fault) => {
            println!("Fault [{}]: {}", fault.code, fault.description);
            if let Some(detail) = &fault.detail {
                println!("Detail: {}", detail);
            }
        }
        None => {
            println!();
            println!("{}", response.envelope.body_text());
        }
    }

    Ok(())
}
