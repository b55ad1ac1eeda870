//! Run configuration, read from the environment.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::OrganizeError;
use crate::scan::ContentBudget;

/// Default component tree location, relative to the working directory
pub const DEFAULT_COMPONENTS_DIR: &str = "components";

/// Per-file character budget for advisory requests
pub const DEFAULT_CONTENT_BUDGET: usize = 4000;

const DEFAULT_ADVISORY_TIMEOUT_SECS: u64 = 120;
const DEFAULT_ADVISORY_MODEL: &str = "gpt-4o-mini";

/// Which pipeline a run follows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    /// Local classifier decides every category
    #[default]
    Classify,
    /// One advisory call supplies the plan
    Advisory,
    /// Regenerate the navigation document without moving anything
    TocOnly,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classify => "classify",
            Self::Advisory => "advisory",
            Self::TocOnly => "toc-only",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunMode {
    type Err = OrganizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "classify" | "classifier" => Ok(Self::Classify),
            "advisory" | "ai" => Ok(Self::Advisory),
            "toc-only" | "toc" | "update-toc" => Ok(Self::TocOnly),
            other => Err(OrganizeError::Config(format!(
                "unknown ORGANIZE_MODE `{}` (expected classify, advisory or toc-only)",
                other
            ))),
        }
    }
}

/// Connection settings for the advisory API
#[derive(Debug, Clone)]
pub struct AdvisoryConfig {
    /// Chat-completions endpoint
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct OrganizerConfig {
    /// Component tree root
    pub root: PathBuf,
    pub mode: RunMode,
    /// Where audit artifacts are written
    pub audit_dir: PathBuf,
    /// Character cap per file sent to the advisory system
    pub content_budget: ContentBudget,
    /// Present only when the environment configures it
    pub advisory: Option<AdvisoryConfig>,
}

impl OrganizerConfig {
    /// Config for `root` with defaults; audit output goes next to the root
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let audit_dir = default_audit_dir(&root);
        Self {
            root,
            mode: RunMode::default(),
            audit_dir,
            content_budget: ContentBudget::Chars(DEFAULT_CONTENT_BUDGET),
            advisory: None,
        }
    }

    /// Build from environment variables (after `.env` has been loaded)
    pub fn from_env() -> Result<Self, OrganizeError> {
        let root = env::var("COMPONENTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_COMPONENTS_DIR));

        let mut config = Self::new(root);

        if let Ok(mode) = env::var("ORGANIZE_MODE") {
            config.mode = mode.parse()?;
        }

        if let Ok(dir) = env::var("AUDIT_DIR") {
            config.audit_dir = PathBuf::from(dir);
        }

        if let Ok(budget) = env::var("ADVISORY_CONTENT_BUDGET") {
            let chars = budget.trim().parse::<usize>().map_err(|_| {
                OrganizeError::Config(format!("ADVISORY_CONTENT_BUDGET is not a number: {}", budget))
            })?;
            config.content_budget = ContentBudget::Chars(chars);
        }

        config.advisory = advisory_from_env()?;

        if config.mode == RunMode::Advisory && config.advisory.is_none() {
            return Err(OrganizeError::Config(
                "advisory mode requires ADVISORY_API_URL and ADVISORY_API_KEY".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_audit_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.audit_dir = dir.into();
        self
    }

    pub fn with_content_budget(mut self, budget: ContentBudget) -> Self {
        self.content_budget = budget;
        self
    }

    pub fn with_advisory(mut self, advisory: AdvisoryConfig) -> Self {
        self.advisory = Some(advisory);
        self
    }
}

/// Parent of the component root, or the root itself at the filesystem top
fn default_audit_dir(root: &std::path::Path) -> PathBuf {
    match root.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        Some(_) => PathBuf::from("."),
        None => root.to_path_buf(),
    }
}

fn advisory_from_env() -> Result<Option<AdvisoryConfig>, OrganizeError> {
    let (Ok(api_url), Ok(api_key)) = (env::var("ADVISORY_API_URL"), env::var("ADVISORY_API_KEY"))
    else {
        return Ok(None);
    };

    let timeout_secs = match env::var("ADVISORY_TIMEOUT_SECS") {
        Ok(value) => value.trim().parse::<u64>().map_err(|_| {
            OrganizeError::Config(format!("ADVISORY_TIMEOUT_SECS is not a number: {}", value))
        })?,
        Err(_) => DEFAULT_ADVISORY_TIMEOUT_SECS,
    };

    Ok(Some(AdvisoryConfig {
        api_url,
        api_key,
        model: env::var("ADVISORY_MODEL").unwrap_or_else(|_| DEFAULT_ADVISORY_MODEL.to_string()),
        timeout: Duration::from_secs(timeout_secs),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode() {
        assert_eq!("classify".parse::<RunMode>().unwrap(), RunMode::Classify);
        assert_eq!("Advisory".parse::<RunMode>().unwrap(), RunMode::Advisory);
        assert_eq!("toc-only".parse::<RunMode>().unwrap(), RunMode::TocOnly);
        assert!(matches!(
            "sometimes".parse::<RunMode>(),
            Err(OrganizeError::Config(_))
        ));
    }

    #[test]
    fn test_default_audit_dir() {
        let config = OrganizerConfig::new("repo/components");
        assert_eq!(config.audit_dir, PathBuf::from("repo"));

        let config = OrganizerConfig::new("components");
        assert_eq!(config.audit_dir, PathBuf::from("."));
    }

    #[test]
    fn test_builders() {
        let config = OrganizerConfig::new("components")
            .with_mode(RunMode::TocOnly)
            .with_audit_dir("/tmp/audit")
            .with_content_budget(ContentBudget::Unbounded);

        assert_eq!(config.mode, RunMode::TocOnly);
        assert_eq!(config.audit_dir, PathBuf::from("/tmp/audit"));
        assert_eq!(config.content_budget, ContentBudget::Unbounded);
        assert!(config.advisory.is_none());
    }

    #[test]
    fn test_mode_serializes_kebab_case() {
        assert_eq!(serde_json::to_string(&RunMode::TocOnly).unwrap(), "\"toc-only\"");
    }
}
