//! # Configuration du client SOAP
//!
//! La configuration est construite en trois couches :
//! 1. la configuration par défaut embarquée (`pmosoap.yaml`)
//! 2. un fichier YAML optionnel fusionné par-dessus
//! 3. les variables d'environnement `PMOSOAP_CONFIG__<SECTION>__<KEY>`
//!
//! ```no_run
//! use pmosoap::config::SoapConfig;
//!
//! let config = SoapConfig::load(Some(std::path::Path::new("soap.yaml")))?;
//! println!("timeout: {:?}", config.timeout());
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::{env, fs, path::Path, time::Duration};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use tracing::{info, warn};

const DEFAULT_CONFIG: &str = include_str!("pmosoap.yaml");

const ENV_PREFIX: &str = "PMOSOAP_CONFIG__";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

const DEFAULT_MAX_RESPONSE_BYTES: u64 = 10 * 1024 * 1024;

/// Configuration typée du client
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SoapConfig {
    /// Timeout global d'un appel HTTP, `0` pour aucun timeout
    pub timeout_secs: u64,
    pub tls: TlsSettings,
    pub http: HttpSettings,
    pub envelope: EnvelopeSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TlsSettings {
    /// Vérification des certificats serveur (désactiver uniquement pour
    /// des services auto-signés de confiance)
    pub verify_certificates: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Une réponse non-2xx dont le corps n'est pas une enveloppe SOAP
    /// produit `SoapError::HttpStatus` plutôt que `MalformedResponse`.
    pub reject_error_status: bool,

    /// Taille maximale lue pour le corps d'une réponse ; au-delà, l'appel
    /// échoue en erreur de transport.
    pub max_response_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EnvelopeSettings {
    /// Ajoute `xmlns="<namespace>"` sur l'élément de la méthode
    pub qualify_method: bool,
}

impl Default for SoapConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            tls: TlsSettings::default(),
            http: HttpSettings::default(),
            envelope: EnvelopeSettings::default(),
        }
    }
}

impl Default for TlsSettings {
    fn default() -> Self {
        Self {
            verify_certificates: true,
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            reject_error_status: true,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

impl SoapConfig {
    /// Charge la configuration : défauts embarqués, fichier optionnel,
    /// puis variables d'environnement.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let external = match path {
            Some(path) => {
                let data = fs::read(path)
                    .with_context(|| format!("Cannot read config file {}", path.display()))?;
                info!(config_file = %path.display(), "Loaded SOAP config file");
                Some(serde_yaml::from_slice::<Value>(&data)?)
            }
            None => None,
        };

        Self::build(external, env::vars())
    }

    /// Construit la configuration depuis un texte YAML, sans lire
    /// l'environnement.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let external: Value = serde_yaml::from_str(yaml)?;
        Self::build(Some(external), std::iter::empty())
    }

    fn build(
        external: Option<Value>,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self> {
        let mut value = lower_keys_value(serde_yaml::from_str(DEFAULT_CONFIG)?);
        if let Some(external) = external {
            overlay_user_config(&mut value, lower_keys_value(external));
        }
        apply_env_overrides(&mut value, vars);

        let config: SoapConfig = serde_yaml::from_value(value)?;
        if !config.tls.verify_certificates {
            warn!("TLS certificate verification is disabled by configuration");
        }
        Ok(config)
    }

    /// Timeout global, `None` si `timeout_secs` vaut 0
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

fn apply_env_overrides(config: &mut Value, vars: impl IntoIterator<Item = (String, String)>) {
    for (key, value) in vars {
        if let Some(path) = key.strip_prefix(ENV_PREFIX) {
            let key_path = path.split("__").collect::<Vec<_>>();
            if let Err(err) = set_value(config, &key_path, convert_env_value(&value)) {
                warn!(variable = %key, "Ignoring config override: {}", err);
            }
        }
    }
}

fn convert_env_value(value: &str) -> Value {
    serde_yaml::from_str::<Value>(value).unwrap_or_else(|_| Value::String(value.to_string()))
}

fn set_value(data: &mut Value, path: &[&str], value: Value) -> Result<()> {
    let Some((first, rest)) = path.split_first() else {
        *data = value;
        return Ok(());
    };

    let Value::Mapping(map) = data else {
        return Err(anyhow!("Current node is not a map"));
    };

    let key = Value::String(first.to_lowercase());
    if rest.is_empty() {
        map.insert(key, value);
        Ok(())
    } else {
        let entry = map
            .entry(key)
            .or_insert(Value::Mapping(Mapping::new()));
        set_value(entry, rest, value)
    }
}

fn lower_keys_value(value: Value) -> Value {
    match value {
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(k, v)| {
                    let k = match k {
                        Value::String(s) => Value::String(s.to_lowercase()),
                        other => other,
                    };
                    (k, lower_keys_value(v))
                })
                .collect(),
        ),
        Value::Sequence(seq) => Value::Sequence(seq.into_iter().map(lower_keys_value).collect()),
        _ => value,
    }
}

/// Applique le fichier utilisateur sur les réglages embarqués.
///
/// Une section du fichier (`tls`, `http`, `envelope`) ne remplace que les clés
/// qu'elle mentionne ; une section vide (`tls:` seul) laisse les défauts en
/// place. Toute autre valeur remplace celle par défaut.
fn overlay_user_config(settings: &mut Value, user: Value) {
    match (settings, user) {
        (_, Value::Null) => {}
        (Value::Mapping(current), Value::Mapping(user)) => {
            for (key, value) in user {
                match current.get_mut(&key) {
                    Some(slot) => overlay_user_config(slot, value),
                    None => {
                        current.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
