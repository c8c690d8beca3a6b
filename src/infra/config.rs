//! Configuration loading from TOML files
//!
//! The embedding application picks the file; `load_from_path` falls back to
//! defaults when it is missing or invalid.

use crate::domain::types::Stage;
use crate::services::classifier::{Thresholds, DEFAULT_THRESHOLD};
use crate::services::normalizer::{Normalizer, DEFAULT_TOLERANCE};
use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Journey stages used when the config does not list any
pub const DEFAULT_STAGES: [&str; 9] = [
    "Awareness",
    "Consideration",
    "Decision",
    "Onboarding",
    "Core Usage",
    "Support",
    "Follow-up",
    "Retention",
    "Advocacy",
];

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Identifier stamped on every report row
    #[serde(default = "default_project_id")]
    pub id: String,
}

fn default_project_id() -> String {
    "touchpoints".to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self { id: default_project_id() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdsConfig {
    #[serde(default = "default_threshold")]
    pub importance: f64,
    #[serde(default = "default_threshold")]
    pub performance: f64,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self { importance: default_threshold(), performance: default_threshold() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NormalizerConfig {
    /// Allowed overshoot outside a declared scale, in raw units
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self { tolerance: default_tolerance() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JourneyConfig {
    /// Ordered journey stages; an empty list accepts any stage
    #[serde(default = "default_stages")]
    pub stages: Vec<String>,
}

fn default_stages() -> Vec<String> {
    DEFAULT_STAGES.iter().map(|s| s.to_string()).collect()
}

impl Default for JourneyConfig {
    fn default() -> Self {
        Self { stages: default_stages() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// Worker threads for classification (1 = sequential)
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_workers() -> usize {
    1
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self { workers: default_workers() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// File path for roadmap egress (JSONL format)
    #[serde(default = "default_report_file")]
    pub file: String,
}

fn default_report_file() -> String {
    "roadmap.jsonl".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { file: default_report_file() }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
    #[serde(default)]
    pub normalizer: NormalizerConfig,
    #[serde(default)]
    pub journey: JourneyConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Main configuration struct used throughout the library
#[derive(Debug, Clone)]
pub struct Config {
    project_id: String,
    thresholds: Thresholds,
    normalizer: Normalizer,
    stages: Vec<Stage>,
    workers: usize,
    report_file: String,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_id: default_project_id(),
            thresholds: Thresholds::default(),
            normalizer: Normalizer::default(),
            stages: DEFAULT_STAGES.iter().map(|s| Stage::from(*s)).collect(),
            workers: default_workers(),
            report_file: default_report_file(),
            config_file: "default".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Self::from_toml(toml_config, &path.display().to_string())
    }

    /// Validate a parsed TOML config
    pub fn from_toml(toml_config: TomlConfig, config_file: &str) -> anyhow::Result<Self> {
        let thresholds =
            Thresholds::new(toml_config.thresholds.importance, toml_config.thresholds.performance)
                .with_context(|| format!("Invalid [thresholds] in {}", config_file))?;
        let normalizer = Normalizer::new(toml_config.normalizer.tolerance)
            .with_context(|| format!("Invalid [normalizer] in {}", config_file))?;

        let stages = stage_list(toml_config.journey.stages.iter().map(String::as_str))
            .with_context(|| format!("Invalid [journey] in {}", config_file))?;

        Ok(Self {
            project_id: toml_config.project.id,
            thresholds,
            normalizer,
            stages,
            workers: toml_config.classifier.workers.max(1),
            report_file: toml_config.report.file,
            config_file: config_file.to_string(),
        })
    }

    /// Load configuration from a specific path, falling back to defaults
    pub fn load_from_path(path: &str) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path, error = %format!("{:#}", e), "config_fallback_to_defaults");
                Self::default()
            }
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn report_file(&self) -> &str {
        &self.report_file
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Builder method to override journey stages (empty = accept any).
    /// Names are trimmed; empty or duplicate names are rejected.
    pub fn with_stages<I, S>(mut self, stages: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<S> = stages.into_iter().collect();
        self.stages = stage_list(names.iter().map(|s| s.as_ref()))?;
        Ok(self)
    }

    /// Builder method to override the classification worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}

/// Trim stage names, rejecting empty and duplicate entries
fn stage_list<'a, I>(names: I) -> anyhow::Result<Vec<Stage>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut stages: Vec<Stage> = Vec::new();
    for name in names {
        let stage = Stage::new(name.trim());
        if stage.as_str().is_empty() {
            anyhow::bail!("Empty journey stage name");
        }
        if stages.contains(&stage) {
            anyhow::bail!("Duplicate journey stage '{}'", stage);
        }
        stages.push(stage);
    }
    Ok(stages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.project_id(), "touchpoints");
        assert_eq!(config.thresholds().importance(), 0.5);
        assert_eq!(config.thresholds().performance(), 0.5);
        assert_eq!(config.normalizer().tolerance(), 0.0);
        assert_eq!(config.stages().len(), 9);
        assert_eq!(config.stages()[0].as_str(), "Awareness");
        assert_eq!(config.workers(), 1);
        assert_eq!(config.report_file(), "roadmap.jsonl");
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let parsed: TomlConfig = toml::from_str("").unwrap();
        let config = Config::from_toml(parsed, "inline").unwrap();
        assert_eq!(config.project_id(), "touchpoints");
        assert_eq!(config.stages().len(), 9);
        assert_eq!(config.thresholds(), &Thresholds::default());
        assert_eq!(config.config_file(), "inline");
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let parsed: TomlConfig = toml::from_str("[thresholds]\nimportance = 1.5\n").unwrap();
        let err = Config::from_toml(parsed, "inline").unwrap_err();
        assert!(format!("{:#}", err).contains("importance threshold 1.5"));
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let parsed: TomlConfig = toml::from_str("[normalizer]\ntolerance = -1.0\n").unwrap();
        assert!(Config::from_toml(parsed, "inline").is_err());
    }

    #[test]
    fn test_duplicate_stage_rejected() {
        let parsed: TomlConfig =
            toml::from_str("[journey]\nstages = [\"Support\", \" Support \"]\n").unwrap();
        assert!(Config::from_toml(parsed, "inline").is_err());
    }

    #[test]
    fn test_workers_floor_at_one() {
        let parsed: TomlConfig = toml::from_str("[classifier]\nworkers = 0\n").unwrap();
        assert_eq!(Config::from_toml(parsed, "inline").unwrap().workers(), 1);
    }

    #[test]
    fn test_with_stages_trims_names() {
        let config = Config::default().with_stages([" Support", "Onboarding "]).unwrap();
        assert_eq!(config.stages(), &[Stage::from("Support"), Stage::from("Onboarding")]);
    }

    #[test]
    fn test_with_stages_rejects_duplicates_and_blanks() {
        let err = Config::default().with_stages(["Support", "Support "]).unwrap_err();
        assert!(err.to_string().contains("Duplicate journey stage 'Support'"));
        assert!(Config::default().with_stages(["Support", "  "]).is_err());
    }

    #[test]
    fn test_with_stages_empty_accepts_any() {
        let config = Config::default().with_stages(Vec::<String>::new()).unwrap();
        assert!(config.stages().is_empty());
    }

    #[test]
    fn test_report_file_default() {
        let report = ReportConfig::default();
        assert_eq!(report.file, "roadmap.jsonl");
        assert!(!report.file.is_empty());
    }
}
