use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::{
    error::ExtractError,
    options::{DEFAULT_DISABLE_MARKER, ExtractionObserver, ImportKind, Options},
    text::{DEFAULT_SCRIPT_PATTERN, TextClassifier},
};

pub const CONFIG_FILE_NAME: &str = ".autointlrc.json";

pub const TEST_FILE_PATTERNS: &[&str] = &[
    "**/*.test.tsx",
    "**/*.test.ts",
    "**/*.test.jsx",
    "**/*.test.js",
    "**/*.spec.tsx",
    "**/*.spec.ts",
    "**/*.spec.jsx",
    "**/*.spec.js",
    "**/__tests__/**",
];

const ARGS_PLACEHOLDER: &str = "{args}";
const SOURCE_PLACEHOLDER: &str = "{source}";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    #[serde(default)]
    pub ignore_test_files: bool,
    #[serde(default = "default_source_root")]
    pub source_root: String,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_template: Option<String>,
    #[serde(default)]
    pub import_kind: ImportKind,
    #[serde(default = "default_disable_marker")]
    pub disable_marker: String,
    #[serde(default = "default_script_pattern")]
    pub script_pattern: String,
}

fn default_includes() -> Vec<String> {
    vec!["src".to_string()]
}

fn default_ignores() -> Vec<String> {
    ["**/node_modules/**", "**/*.d.ts"].map(String::from).to_vec()
}

fn default_source_root() -> String {
    ".".to_string()
}

fn default_output() -> String {
    "./output/zh_CN.json".to_string()
}

fn default_disable_marker() -> String {
    DEFAULT_DISABLE_MARKER.to_string()
}

fn default_script_pattern() -> String {
    DEFAULT_SCRIPT_PATTERN.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            includes: default_includes(),
            ignores: default_ignores(),
            ignore_test_files: false,
            source_root: default_source_root(),
            output: default_output(),
            import_source: None,
            binding_name: None,
            call_template: None,
            import_kind: ImportKind::default(),
            disable_marker: default_disable_marker(),
            script_pattern: default_script_pattern(),
        }
    }
}

impl Config {
    /// Starter configuration written by `init`, with sample engine options.
    pub fn starter() -> Self {
        Self {
            import_source: Some("@/utils/intl".to_string()),
            binding_name: Some("getLangMsg".to_string()),
            call_template: Some("getLangMsg({args}).d({source})".to_string()),
            ..Default::default()
        }
    }

    /// Validate configuration values.
    ///
    /// Checks glob patterns, the script pattern and the placeholders of the
    /// call template. Missing engine options are reported by
    /// [`Config::to_options`].
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern)
                    .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
            }
        }

        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        TextClassifier::new(&self.script_pattern)?;

        if let Some(template) = &self.call_template {
            for placeholder in [ARGS_PLACEHOLDER, SOURCE_PLACEHOLDER] {
                if !template.contains(placeholder) {
                    return Err(ExtractError::InvalidCallTemplate {
                        template: template.clone(),
                        reason: format!("missing placeholder `{}`", placeholder),
                    }
                    .into());
                }
            }
        }

        Ok(())
    }

    /// Build engine options from this configuration.
    pub fn to_options(
        &self,
        observer: Arc<dyn ExtractionObserver>,
    ) -> Result<Options, ExtractError> {
        let mut builder = Options::builder()
            .import_kind(self.import_kind)
            .disable_marker(self.disable_marker.as_str())
            .classifier(TextClassifier::new(&self.script_pattern)?)
            .observer(observer);

        if let Some(source) = &self.import_source {
            builder = builder.import_source(source.as_str());
        }
        if let Some(name) = &self.binding_name {
            builder = builder.binding_name(name.as_str());
        }
        if let Some(template) = &self.call_template {
            builder = builder.call_template(template.as_str());
        }

        builder.build()
    }

    /// Path of the dictionary artifact.
    pub fn output_path(&self) -> PathBuf {
        Path::new(&self.source_root).join(&self.output)
    }
}

pub fn starter_config_json() -> Result<String> {
    serde_json::to_string_pretty(&Config::starter()).context("Failed to generate starter config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    let Some(path) = find_config_file(start_dir) else {
        return Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        });
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    if config.output.trim().is_empty() {
        bail!("'output' must not be empty in {}", path.display());
    }
    config
        .validate()
        .with_context(|| format!("Invalid config file: {}", path.display()))?;

    Ok(ConfigLoadResult {
        config,
        from_file: true,
    })
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use crate::config::*;
    use crate::core::options::NoopObserver;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.includes, vec!["src"]);
        assert_eq!(config.ignores, default_ignores());
        assert!(!config.ignore_test_files);
        assert_eq!(config.output, "./output/zh_CN.json");
        assert_eq!(config.import_kind, ImportKind::Named);
        assert!(config.import_source.is_none());
    }

    #[test]
    fn test_parse_config() {
        let json = r#"{
              "includes": ["app", "components"],
              "importSource": "@/intl",
              "bindingName": "t",
              "callTemplate": "t({args}).d({source})",
              "importKind": "default",
              "scriptPattern": "[\\u3040-\\u30ff]"
          }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.includes, vec!["app", "components"]);
        assert_eq!(config.import_source.as_deref(), Some("@/intl"));
        assert_eq!(config.binding_name.as_deref(), Some("t"));
        assert_eq!(config.import_kind, ImportKind::Default);
        assert_eq!(config.ignores, default_ignores());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_to_options() {
        let config = Config::starter();
        let options = config.to_options(Arc::new(NoopObserver)).unwrap();
        assert_eq!(options.import_source, "@/utils/intl");
        assert_eq!(options.binding_name, "getLangMsg");
        assert_eq!(
            (options.render_call)("\"k\"", "\"你好\""),
            "getLangMsg(\"k\").d(\"你好\")"
        );
    }

    #[test]
    fn test_to_options_missing_required() {
        let config = Config {
            binding_name: None,
            ..Config::starter()
        };
        let err = config.to_options(Arc::new(NoopObserver)).unwrap_err();
        assert!(matches!(err, ExtractError::MissingOption("bindingName")));

        let err = Config::default()
            .to_options(Arc::new(NoopObserver))
            .unwrap_err();
        assert!(matches!(err, ExtractError::MissingOption("importSource")));
    }

    #[test]
    fn test_validate_call_template_placeholders() {
        let config = Config {
            call_template: Some("getLangMsg({args})".to_string()),
            ..Config::starter()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("{source}"));
    }

    #[test]
    fn test_validate_invalid_script_pattern() {
        let config = Config {
            script_pattern: "[".to_string(),
            ..Config::starter()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_invalid_ignore_pattern() {
        let config = Config {
            ignores: vec!["**/[invalid".to_string()],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ignores"));
    }

    #[test]
    fn test_validate_literal_include_with_brackets() {
        let config = Config {
            includes: vec!["app/[locale]".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_find_config_file() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("src").join("components");
        fs::create_dir_all(&sub_dir).unwrap();

        let config_path = dir.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).unwrap();

        assert_eq!(find_config_file(&sub_dir), Some(config_path));
    }

    #[test]
    fn test_find_config_stops_at_git() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        assert!(find_config_file(dir.path()).is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "output": "./locales/zh.json", "ignoreTestFiles": true }"#,
        )
        .unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(result.from_file);
        assert_eq!(result.config.output, "./locales/zh.json");
        assert!(result.config.ignore_test_files);
    }

    #[test]
    fn test_load_config_default_when_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(!result.from_file);
        assert_eq!(result.config.includes, default_includes());
    }

    #[test]
    fn test_load_config_rejects_invalid_pattern() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "scriptPattern": "(" }"#,
        )
        .unwrap();
        assert!(load_config(dir.path()).is_err());
    }

    #[test]
    fn test_starter_config_round_trips() {
        let json = starter_config_json().unwrap();
        assert!(json.contains("\"callTemplate\""));
        assert!(json.contains("\"importKind\": \"named\""));

        let config: Config = serde_json::from_str(&json).unwrap();
        assert!(config.to_options(Arc::new(NoopObserver)).is_ok());
    }

    #[test]
    fn test_output_path() {
        let config = Config {
            source_root: "web".to_string(),
            ..Default::default()
        };
        assert_eq!(config.output_path(), Path::new("web").join("./output/zh_CN.json"));
    }
}
