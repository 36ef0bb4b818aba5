// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use opa_client::PolicyClientConfig;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_OPA_URL: &str = "http://localhost:8181";

/// Query a rule through the Open Policy Agent data API
#[derive(Debug, Parser)]
#[command(name = "opa-query")]
#[command(version, about, long_about = None)]
#[command(group(ArgGroup::new("source").args(["input", "input_file"])))]
pub struct Cli {
    /// Rule path, e.g. /example/allow
    #[arg(value_name = "PATH")]
    pub path: String,

    /// OPA base URL (ignored when --config is given)
    #[arg(long, env = "OPA_URL", default_value = DEFAULT_OPA_URL)]
    pub url: String,

    /// Path to a YAML client configuration file
    #[arg(short, long, env = "OPA_CLIENT_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Input document as inline JSON
    #[arg(short, long, value_name = "JSON")]
    pub input: Option<String>,

    /// Read the input document from a JSON file
    #[arg(long, value_name = "FILE")]
    pub input_file: Option<PathBuf>,

    /// Per-request timeout, e.g. "2s" or "500ms"
    #[arg(long, value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "OPA_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Client settings from --config, falling back to --url.
    pub fn client_config(&self) -> Result<PolicyClientConfig> {
        match &self.config {
            Some(path) => PolicyClientConfig::from_file(path)
                .with_context(|| format!("Failed to load client config {}", path.display())),
            None => Ok(PolicyClientConfig::new(self.url.clone())),
        }
    }

    /// Input document to forward; `{}` when none is given.
    pub fn input_document(&self) -> Result<Value> {
        if let Some(inline) = &self.input {
            return serde_json::from_str(inline).context("--input is not valid JSON");
        }

        if let Some(path) = &self.input_file {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file {}", path.display()))?;
            return serde_json::from_str(&content)
                .with_context(|| format!("{} is not valid JSON", path.display()));
        }

        Ok(Value::Object(Default::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("opa-query").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["/example/allow"]);

        assert_eq!(cli.path, "/example/allow");
        assert_eq!(cli.timeout, None);
        assert_eq!(cli.input_document().unwrap(), json!({}));
    }

    #[test]
    fn test_inline_input_and_timeout() {
        let cli = parse(&[
            "/example/allow",
            "--url",
            "http://opa:8181",
            "--input",
            r#"{"age": 17}"#,
            "--timeout",
            "750ms",
        ]);

        assert_eq!(cli.client_config().unwrap().base_url, "http://opa:8181");
        assert_eq!(cli.input_document().unwrap(), json!({"age": 17}));
        assert_eq!(cli.timeout, Some(Duration::from_millis(750)));
    }

    #[test]
    fn test_input_sources_are_exclusive() {
        let result = Cli::try_parse_from(["opa-query", "/p", "--input", "{}", "--input-file", "x.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_inline_input() {
        let cli = parse(&["/p", "--input", "{not json"]);
        assert!(cli.input_document().is_err());
    }

    #[test]
    fn test_input_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"user": "alice", "action": "read"}}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = parse(&["/p", "--input-file", &path]);
        assert_eq!(cli.input_document().unwrap(), json!({"user": "alice", "action": "read"}));
    }

    #[test]
    fn test_config_file_overrides_url() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url: http://from-config:8181\ntimeout: 3s").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = parse(&["/p", "--url", "http://ignored", "--config", &path]);
        let config = cli.client_config().unwrap();

        assert_eq!(config.base_url, "http://from-config:8181");
        assert_eq!(config.timeout, Some(Duration::from_secs(3)));
    }
}
