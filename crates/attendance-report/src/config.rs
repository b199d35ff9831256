//! Report configuration.
//!
//! Every field has a default, so an empty TOML file (or no file at all)
//! yields a working setup. Relative asset paths in a loaded file resolve
//! against the file's directory.

use std::fmt;
use std::path::{Path, PathBuf};

use attendance_core::HeaderStrategy;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_TITLE: &str = "تقرير الطالب الشهري";
pub const DEFAULT_NAME_LABEL: &str = "الاسم";
pub const DEFAULT_FILE_PREFIX: &str = "student";

/// Output page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSize {
    #[default]
    Letter,
    A4,
}

impl PageSize {
    /// Width and height in points.
    pub const fn dimensions(self) -> (f32, f32) {
        match self {
            Self::Letter => (612.0, 792.0),
            Self::A4 => (595.28, 841.89),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Letter => "letter",
            Self::A4 => "a4",
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Image and font files used by the PDF renderer.
///
/// `None` disables the asset; a path that does not exist is reported and
/// skipped when the renderer starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub background: Option<PathBuf>,
    pub logo: Option<PathBuf>,
    pub font_regular: Option<PathBuf>,
    pub font_bold: Option<PathBuf>,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            background: Some(PathBuf::from("media/about-bg.png")),
            logo: Some(PathBuf::from("media/character.png")),
            font_regular: Some(PathBuf::from("Almarai-Regular.ttf")),
            font_bold: Some(PathBuf::from("Almarai-Bold.ttf")),
        }
    }
}

impl AssetPaths {
    /// No assets at all: built-in fonts and no images.
    pub fn none() -> Self {
        Self {
            background: None,
            logo: None,
            font_regular: None,
            font_bold: None,
        }
    }

    fn rebase(&mut self, base: &Path) {
        for path in [
            &mut self.background,
            &mut self.logo,
            &mut self.font_regular,
            &mut self.font_bold,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// Settings for one report run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub assets: AssetPaths,
    pub page_size: PageSize,
    pub header_strategy: HeaderStrategy,
    pub title: String,
    pub name_label: String,
    /// File stem prefix; reports are written as `<prefix>_<index>.pdf`.
    pub file_prefix: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            assets: AssetPaths::default(),
            page_size: PageSize::default(),
            header_strategy: HeaderStrategy::default(),
            title: DEFAULT_TITLE.to_string(),
            name_label: DEFAULT_NAME_LABEL.to_string(),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
        }
    }
}

impl ReportConfig {
    /// Parses a configuration from TOML text. Asset paths are left as written.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Loads a configuration file and resolves relative asset paths against
    /// its directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(base) = path.parent() {
            config.assets.rebase(base);
        }
        Ok(config)
    }

    pub fn report_file_name(&self, index: usize) -> String {
        format!("{}_{index}.pdf", self.file_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = ReportConfig::from_toml_str("").expect("parse");
        assert_eq!(config, ReportConfig::default());
        assert_eq!(config.title, DEFAULT_TITLE);
        assert_eq!(config.page_size, PageSize::Letter);
        assert_eq!(config.header_strategy, HeaderStrategy::Marker);
    }

    #[test]
    fn partial_toml_overrides_fields() {
        let config = ReportConfig::from_toml_str(
            r#"
page_size = "a4"
header_strategy = "keyword"
file_prefix = "report"

[assets]
logo = "brand/logo.png"
"#,
        )
        .expect("parse");
        assert_eq!(config.page_size, PageSize::A4);
        assert_eq!(config.header_strategy, HeaderStrategy::Keyword);
        assert_eq!(config.report_file_name(3), "report_3.pdf");
        assert_eq!(config.assets.logo, Some(PathBuf::from("brand/logo.png")));
        assert_eq!(
            config.assets.background,
            Some(PathBuf::from("media/about-bg.png"))
        );
    }

    #[test]
    fn unknown_page_size_is_rejected() {
        assert!(ReportConfig::from_toml_str("page_size = \"legal\"").is_err());
    }

    #[test]
    fn load_resolves_assets_next_to_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.toml");
        std::fs::write(
            &path,
            "[assets]\nbackground = \"bg.png\"\nlogo = \"/abs/logo.png\"\n",
        )
        .expect("write config");

        let config = ReportConfig::load(&path).expect("load");
        assert_eq!(config.assets.background, Some(dir.path().join("bg.png")));
        assert_eq!(config.assets.logo, Some(PathBuf::from("/abs/logo.png")));
        assert_eq!(
            config.assets.font_regular,
            Some(dir.path().join("Almarai-Regular.ttf"))
        );
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ReportConfig::load(Path::new("/nonexistent/report.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn page_dimensions() {
        assert_eq!(PageSize::Letter.dimensions(), (612.0, 792.0));
        assert_eq!(PageSize::A4.to_string(), "a4");
    }
}
