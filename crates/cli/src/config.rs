//! Configuration management for the CLI
//!
//! Values come from flags (or their `ARCBENCH_*` environment variables),
//! then the config file, then built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use bench_lib::BenchmarkConfig;
use serde::{Deserialize, Serialize};

use crate::Cli;

/// Config file contents; every field is optional
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub source_repo: Option<String>,
    pub temp_dir: Option<PathBuf>,
    pub trigger_file: Option<PathBuf>,
    pub controller_namespace: Option<String>,
    pub runner_namespace: Option<String>,
    pub triggers: Option<u32>,
    pub poll_interval_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub git: Option<String>,
    pub kubectl: Option<String>,
    pub output: Option<PathBuf>,
}

impl Config {
    /// Load the config file.
    ///
    /// An explicit path must exist; the default path may be absent.
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let config_path = match override_path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        Self::from_file(&config_path)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// `~/.config/arcbench/config.json`
    fn default_path() -> Option<PathBuf> {
        dirs_next::home_dir().map(|home| home.join(".config").join("arcbench").join("config.json"))
    }
}

/// Everything a run needs, after precedence has been applied
#[derive(Debug, Clone)]
pub struct Settings {
    pub benchmark: BenchmarkConfig,
    pub git: String,
    pub kubectl: String,
    pub output: Option<PathBuf>,
}

impl Settings {
    pub fn resolve(cli: &Cli, file: Config) -> Self {
        let defaults = BenchmarkConfig::default();

        let benchmark = BenchmarkConfig {
            source_repo: cli
                .source_repo
                .clone()
                .or(file.source_repo)
                .unwrap_or_default(),
            work_dir: cli.temp_dir.clone().or(file.temp_dir),
            trigger_file: cli
                .trigger_file
                .clone()
                .or(file.trigger_file)
                .unwrap_or(defaults.trigger_file),
            triggers: cli.triggers.or(file.triggers).unwrap_or(defaults.triggers),
            controller_namespace: cli
                .controller_namespace
                .clone()
                .or(file.controller_namespace)
                .unwrap_or(defaults.controller_namespace),
            runner_namespace: cli
                .runner_namespace
                .clone()
                .or(file.runner_namespace)
                .unwrap_or(defaults.runner_namespace),
            poll_interval: cli
                .poll_interval
                .or(file.poll_interval_secs)
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_interval),
            deadline: cli
                .timeout
                .or(file.timeout_secs)
                .map(Duration::from_secs),
        };

        Self {
            benchmark,
            git: cli.git.clone().or(file.git).unwrap_or_else(|| "git".into()),
            kubectl: cli
                .kubectl
                .clone()
                .or(file.kubectl)
                .unwrap_or_else(|| "kubectl".into()),
            output: cli.output.clone().or(file.output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use crate::LogFormat;
    use tempfile::TempDir;

    /// A `Cli` with no flags set, independent of `ARCBENCH_*` in the environment
    fn cli() -> Cli {
        Cli {
            output: None,
            temp_dir: None,
            source_repo: None,
            trigger_file: None,
            controller_namespace: None,
            runner_namespace: None,
            triggers: None,
            poll_interval: None,
            timeout: None,
            git: None,
            kubectl: None,
            config: None,
            format: OutputFormat::Table,
            log_format: LogFormat::Text,
            verbose: false,
        }
    }

    #[test]
    fn test_defaults_without_flags_or_file() {
        let cli = Cli {
            source_repo: Some("repo".into()),
            ..cli()
        };
        let settings = Settings::resolve(&cli, Config::default());

        assert_eq!(settings.benchmark.source_repo, "repo");
        assert_eq!(settings.benchmark.trigger_file, PathBuf::from("trigger.txt"));
        assert_eq!(settings.benchmark.triggers, 1);
        assert_eq!(settings.benchmark.controller_namespace, "arc-systems");
        assert_eq!(settings.benchmark.runner_namespace, "arc-runners");
        assert_eq!(settings.benchmark.poll_interval, Duration::from_secs(10));
        assert!(settings.benchmark.work_dir.is_none());
        assert!(settings.benchmark.deadline.is_none());
        assert_eq!(settings.git, "git");
        assert_eq!(settings.kubectl, "kubectl");
        assert!(settings.output.is_none());
    }

    #[test]
    fn test_flags_override_file() {
        let file = Config {
            source_repo: Some("from-file".into()),
            triggers: Some(5),
            runner_namespace: Some("file-runners".into()),
            timeout_secs: Some(600),
            ..Config::default()
        };
        let cli = Cli {
            source_repo: Some("from-flag".into()),
            triggers: Some(3),
            poll_interval: Some(2),
            ..cli()
        };

        let settings = Settings::resolve(&cli, file);

        assert_eq!(settings.benchmark.source_repo, "from-flag");
        assert_eq!(settings.benchmark.triggers, 3);
        assert_eq!(settings.benchmark.runner_namespace, "file-runners");
        assert_eq!(settings.benchmark.poll_interval, Duration::from_secs(2));
        assert_eq!(settings.benchmark.deadline, Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_file_fills_unset_flags() {
        let file = Config {
            source_repo: Some("from-file".into()),
            git: Some("/opt/git/bin/git".into()),
            output: Some(PathBuf::from("report.json")),
            ..Config::default()
        };

        let settings = Settings::resolve(&cli(), file);

        assert_eq!(settings.benchmark.source_repo, "from-file");
        assert_eq!(settings.git, "/opt/git/bin/git");
        assert_eq!(settings.output, Some(PathBuf::from("report.json")));
    }

    #[test]
    fn test_load_explicit_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"source_repo": "git@github.com:example/repo.git", "triggers": 10, "kubectl": "/usr/local/bin/kubectl"}"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(
            config.source_repo.as_deref(),
            Some("git@github.com:example/repo.git")
        );
        assert_eq!(config.triggers, Some(10));
        assert_eq!(config.kubectl.as_deref(), Some("/usr/local/bin/kubectl"));
        assert!(config.git.is_none());
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let err = Config::load(Some(&temp_dir.path().join("missing.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_rejects_unknown_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"trigers": 3}"#).unwrap();

        assert!(Config::load(Some(&path)).is_err());
    }
}
