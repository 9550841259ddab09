//! Rendering a live secret map to `.env` or Kubernetes Secret YAML.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;

use crate::error::InputError;
use crate::error::Result;
use crate::model::sanitize_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Env,
    K8s,
}

impl ExportFormat {
    pub fn parse(format: &str) -> Result<Self> {
        match format {
            "env" | "dotenv" => Ok(Self::Env),
            "k8s" | "kubernetes" => Ok(Self::K8s),
            other => Err(InputError::UnknownExportFormat(other.to_string()).into()),
        }
    }
}

/// Renders `secrets` (`key -> plaintext`) as `# Exported variables for
/// environment: <env>` followed by unquoted `KEY=VALUE` lines.
pub fn render_env(env: &str, secrets: &BTreeMap<String, String>) -> String {
    let mut out = format!("# Exported variables for environment: {env}\n");
    for (key, value) in secrets {
        let _ = writeln!(out, "{key}={value}");
    }
    out
}

#[derive(Serialize)]
struct K8sSecret {
    #[serde(rename = "apiVersion")]
    api_version: &'static str,
    kind: &'static str,
    metadata: K8sMetadata,
    #[serde(rename = "type")]
    kind_type: &'static str,
    data: BTreeMap<String, String>,
}

#[derive(Serialize)]
struct K8sMetadata {
    name: String,
}

/// Renders `secrets` as a Kubernetes `Secret` manifest with base64-encoded
/// `data` values and a sanitized `metadata.name`.
pub fn render_k8s(project_name: &str, secrets: &BTreeMap<String, String>) -> Result<String> {
    let manifest = K8sSecret {
        api_version: "v1",
        kind: "Secret",
        metadata: K8sMetadata { name: sanitize_name(project_name) },
        kind_type: "Opaque",
        data: secrets
            .iter()
            .map(|(k, v)| (k.clone(), BASE64.encode(v.as_bytes())))
            .collect(),
    };
    serde_yaml::to_string(&manifest).map_err(|e| InputError::Usage(e.to_string()).into())
}

pub fn render(format: ExportFormat, project_name: &str, env: &str, secrets: &BTreeMap<String, String>) -> Result<String> {
    match format {
        ExportFormat::Env => Ok(render_env(env, secrets)),
        ExportFormat::K8s => render_k8s(project_name, secrets),
    }
}
