use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::layout_engine::GridLayout;

pub fn config_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_default().join(".config").join("tessera")
}
pub fn config_file() -> PathBuf { config_dir().join("config.toml") }
pub fn layouts_file() -> PathBuf { config_dir().join("layouts.ron") }

/// Expands a leading `~/` to the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// RON file holding stored layouts; see [`layouts_file`] for the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layouts_file: Option<PathBuf>,
    #[serde(default)]
    pub navigation: NavigationSettings,
    #[serde(default)]
    pub default_layout: DefaultLayoutSettings,
    #[serde(default)]
    pub overlay: OverlaySettings,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NavigationSettings {
    /// Continue onto the neighbouring display when a move runs out of tiles.
    #[serde(default = "yes")]
    pub cross_display: bool,
}

/// Grid used for displays without a stored layout.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DefaultLayoutSettings {
    #[serde(default = "default_grid_dim")]
    pub columns: usize,
    #[serde(default = "default_grid_dim")]
    pub rows: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self { Color { r, g, b, a } }

    pub fn with_alpha(self, a: f64) -> Self { Color { a, ..self } }
}

const ACCENT: Color = Color::new(12.0 / 255.0, 117.0 / 255.0, 222.0 / 255.0, 1.0);

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OverlaySettings {
    #[serde(default = "default_corner_radius")]
    pub corner_radius: f64,
    #[serde(default = "default_background")]
    pub background: Color,
    #[serde(default = "default_highlight")]
    pub highlight: Color,
    #[serde(default = "default_border")]
    pub border: Color,
}

impl Default for NavigationSettings {
    fn default() -> Self { Self { cross_display: true } }
}

impl Default for DefaultLayoutSettings {
    fn default() -> Self {
        Self {
            columns: default_grid_dim(),
            rows: default_grid_dim(),
        }
    }
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            corner_radius: default_corner_radius(),
            background: default_background(),
            highlight: default_highlight(),
            border: default_border(),
        }
    }
}

fn yes() -> bool { true }

fn default_grid_dim() -> usize { 2 }

fn default_corner_radius() -> f64 { 10.0 }

fn default_background() -> Color { ACCENT.with_alpha(0.3) }

fn default_highlight() -> Color { ACCENT.with_alpha(0.6) }

fn default_border() -> Color { ACCENT }

impl Settings {
    pub fn layouts_path(&self) -> PathBuf {
        self.layouts_file.as_deref().map(expand_home).unwrap_or_else(layouts_file)
    }

    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        issues.extend(self.default_layout.validate());
        issues.extend(self.overlay.validate());
        issues
    }
}

impl DefaultLayoutSettings {
    pub fn grid(&self) -> GridLayout {
        GridLayout {
            columns: self.columns,
            rows: self.rows,
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.columns == 0 {
            issues.push("default_layout.columns must be at least 1".to_string());
        }
        if self.rows == 0 {
            issues.push("default_layout.rows must be at least 1".to_string());
        }
        issues
    }
}

impl OverlaySettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.corner_radius < 0.0 {
            issues.push(format!(
                "overlay.corner_radius must be non-negative, got {}",
                self.corner_radius
            ));
        }

        for (name, color) in [
            ("background", self.background),
            ("highlight", self.highlight),
            ("border", self.border),
        ] {
            for (channel, value) in [("r", color.r), ("g", color.g), ("b", color.b), ("a", color.a)] {
                if !(0.0..=1.0).contains(&value) {
                    issues.push(format!(
                        "overlay.{name}.{channel} must be between 0 and 1, got {value}"
                    ));
                }
            }
        }

        issues
    }
}

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)?;
        Self::parse(&buf)
    }

    pub fn parse(buf: &str) -> anyhow::Result<Config> { Ok(toml::from_str(buf)?) }

    /// Reads `path` if it exists, otherwise returns the defaults.
    pub fn read_or_default(path: &Path) -> anyhow::Result<Config> {
        if path.exists() { Self::read(path) } else { Ok(Config::default()) }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml_string.as_bytes())?;
        Ok(())
    }

    /// Validates the entire configuration and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> { self.settings.validate() }
}
