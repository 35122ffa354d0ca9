//! Build configuration (`occ.toml`)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// One of the files a build can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emit {
    /// Annotated tree dump, `<stem>.ast`
    Ast,
    /// Symbol table dump, `<stem>.sym`
    Sym,
    /// Generated code, `<stem>.oil`
    Oil,
}

impl Emit {
    /// Every output, in the order they are written
    pub const ALL: [Emit; 3] = [Emit::Ast, Emit::Sym, Emit::Oil];

    /// File extension, without the dot
    pub fn extension(self) -> &'static str {
        match self {
            Self::Ast => "ast",
            Self::Sym => "sym",
            Self::Oil => "oil",
        }
    }
}

impl fmt::Display for Emit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Emit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Emit::ALL
            .into_iter()
            .find(|emit| emit.extension() == s)
            .ok_or_else(|| format!("unknown output kind '{s}' (expected ast, sym or oil)"))
    }
}

/// Build settings, read from TOML and overridden by command-line flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Outputs to write
    pub emit: Vec<Emit>,

    /// Where outputs go; next to the input when unset
    pub out_dir: Option<PathBuf>,

    /// Treat redeclaration warnings as errors
    pub warnings_as_errors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            emit: Emit::ALL.to_vec(),
            out_dir: None,
            warnings_as_errors: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Whether `emit` is requested
    pub fn emits(&self, emit: Emit) -> bool {
        self.emit.contains(&emit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_emits_everything() {
        let config = Config::default();
        assert!(Emit::ALL.iter().all(|&emit| config.emits(emit)));
        assert!(!config.warnings_as_errors);
    }

    #[test]
    fn test_parse_partial_config() {
        let config = Config::parse(
            r#"
emit = ["oil"]
warnings-as-errors = true
"#,
        )
        .unwrap();

        assert_eq!(config.emit, vec![Emit::Oil]);
        assert_eq!(config.out_dir, None);
        assert!(config.warnings_as_errors);
    }

    #[test]
    fn test_parse_empty_config() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_unknown_emit_rejected() {
        assert!(Config::parse(r#"emit = ["asm"]"#).is_err());
        assert!("asm".parse::<Emit>().is_err());
        assert_eq!("sym".parse::<Emit>(), Ok(Emit::Sym));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("occ.toml");
        std::fs::write(&path, "out-dir = \"build\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.out_dir, Some(PathBuf::from("build")));

        let missing = Config::from_file(&dir.path().join("missing.toml"));
        assert!(missing.is_err());
    }
}
