//! Generator configuration handling
//!
//! Values are layered: built-in defaults, then an optional toml/yaml file, then
//! `MEDITRACK_QR_*` environment variables. CLI flags are applied last by the binary.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "qr_codes";

/// Largest accepted module edge, in pixels.
pub const MAX_MODULE_SIZE: u32 = 100;

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Where and what to write
    pub output: OutputOptions,
    /// QR rendering parameters
    pub render: RenderOptions,
    /// Logging configuration
    pub logging: LoggingOptions,
}

impl GeneratorConfig {
    /// Load configuration from an explicit path or fall back to discovered defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = explicit_path {
            Self::from_file(path)?
        } else if let Some(path) = Self::discover_file()? {
            tracing::info!("Using configuration file: {}", path.display());
            Self::from_file(&path)?
        } else {
            tracing::debug!("No meditrack-qr.toml / meditrack-qr.yaml found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        config.render.validate()?;
        Ok(config)
    }

    fn discover_file() -> Result<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| Error::Config(format!("Failed to read cwd: {e}")))?;
        for candidate in ["meditrack-qr.toml", "meditrack-qr.yaml", "meditrack-qr.yml"] {
            let path = cwd.join(candidate);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            let base = PathBuf::from(xdg_config).join("meditrack-qr");
            for candidate in ["config.toml", "config.yaml"] {
                let path = base.join(candidate);
                if path.exists() {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }

    /// Read configuration from a concrete file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
            .as_str()
        {
            "toml" => toml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse TOML {}: {e}", path.display()))
            }),
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse YAML {}: {e}", path.display()))
            }),
            other => Err(Error::Config(format!(
                "Unsupported config format '{}', expected toml/yaml",
                other
            ))),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.output.apply_env_overrides();
        self.render.apply_env_overrides();
        self.logging.apply_env_overrides();
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// Output directory and artifact selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Directory all artifacts are written to
    pub dir: PathBuf,
    /// Write `README.md` alongside a full-catalog run
    pub emit_readme: bool,
    /// Decode each PNG after writing and compare against its payload
    pub verify: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            emit_readme: true,
            verify: false,
        }
    }
}

impl OutputOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(dir) = env::var("MEDITRACK_QR_OUTPUT_DIR") {
            if !dir.trim().is_empty() {
                self.dir = PathBuf::from(dir);
            }
        }
        if let Some(flag) = env::var("MEDITRACK_QR_EMIT_README")
            .ok()
            .and_then(|v| parse_flag(&v))
        {
            self.emit_readme = flag;
        }
        if let Some(flag) = env::var("MEDITRACK_QR_VERIFY")
            .ok()
            .and_then(|v| parse_flag(&v))
        {
            self.verify = flag;
        }
    }
}

/// QR error-correction tolerance
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCorrection {
    /// ~7% recovery
    #[default]
    Low,
    /// ~15% recovery
    Medium,
    /// ~25% recovery
    Quartile,
    /// ~30% recovery
    High,
}

impl FromStr for ErrorCorrection {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(Self::Low),
            "m" | "medium" => Ok(Self::Medium),
            "q" | "quartile" => Ok(Self::Quartile),
            "h" | "high" => Ok(Self::High),
            other => Err(format!(
                "Unknown error correction level '{other}', expected low/medium/quartile/high"
            )),
        }
    }
}

/// An opaque RGB color, written as `black`, `white` or `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 3]);

impl Color {
    /// Pure black
    pub const BLACK: Color = Color([0, 0, 0]);
    /// Pure white
    pub const WHITE: Color = Color([255, 255, 255]);
}

impl FromStr for Color {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = value.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "black" => return Ok(Self::BLACK),
            "white" => return Ok(Self::WHITE),
            _ => {}
        }

        let hex = trimmed
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.is_ascii())
            .ok_or_else(|| format!("Invalid color '{value}', expected black, white or #rrggbb"))?;

        let mut rgb = [0u8; 3];
        for (i, channel) in rgb.iter_mut().enumerate() {
            *channel = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
                .map_err(|e| format!("Invalid color '{value}': {e}"))?;
        }
        Ok(Self(rgb))
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::BLACK => f.write_str("black"),
            Self::WHITE => f.write_str("white"),
            Self([r, g, b]) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

/// QR rendering parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderOptions {
    /// Error-correction tolerance
    pub ec_level: ErrorCorrection,
    /// Edge length of one module, in pixels
    pub module_size: u32,
    /// Surround the matrix with the standard 4-module quiet zone
    pub quiet_zone: bool,
    /// Dark module color
    pub foreground: Color,
    /// Light module and quiet-zone color
    pub background: Color,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            ec_level: ErrorCorrection::Low,
            module_size: 10,
            quiet_zone: true,
            foreground: Color::BLACK,
            background: Color::WHITE,
        }
    }
}

impl RenderOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("MEDITRACK_QR_EC_LEVEL") {
            if let Ok(parsed) = level.parse::<ErrorCorrection>() {
                self.ec_level = parsed;
            }
        }
        if let Ok(size) = env::var("MEDITRACK_QR_MODULE_SIZE") {
            if let Ok(parsed) = size.parse::<u32>() {
                self.module_size = parsed;
            }
        }
        if let Some(flag) = env::var("MEDITRACK_QR_QUIET_ZONE")
            .ok()
            .and_then(|v| parse_flag(&v))
        {
            self.quiet_zone = flag;
        }
    }

    /// Reject settings the renderer cannot honour.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_MODULE_SIZE).contains(&self.module_size) {
            return Err(Error::Config(format!(
                "module_size must be between 1 and {MAX_MODULE_SIZE} pixels, got {}",
                self.module_size
            )));
        }
        Ok(())
    }
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default log level (overridable via `MEDITRACK_QR_LOG_LEVEL`)
    pub level: String,
    /// Optional log file path for teeing structured logs
    pub file: Option<PathBuf>,
    /// Force ANSI colors in stderr logging
    pub color: bool,
    /// Optional log rotation strategy applied to `file`
    pub rotation: Option<LogRotation>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            color: true,
            rotation: None,
        }
    }
}

impl LoggingOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("MEDITRACK_QR_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(file) = env::var("MEDITRACK_QR_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }
        if let Some(color) = env::var("MEDITRACK_QR_LOG_COLOR")
            .ok()
            .and_then(|v| parse_flag(&v))
        {
            self.color = color;
        }
        if let Ok(rotation) = env::var("MEDITRACK_QR_LOG_ROTATION") {
            if let Some(parsed) = LogRotation::from_str(&rotation) {
                self.rotation = Some(parsed);
            }
        }
    }
}

/// Supported log rotation policies for file sinks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Rotate log files once per hour
    Hourly,
    /// Rotate log files once per day
    Daily,
}

impl LogRotation {
    fn from_str(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixture_layout() {
        let config = GeneratorConfig::default();
        assert_eq!(config.output.dir, PathBuf::from("qr_codes"));
        assert!(config.output.emit_readme);
        assert!(!config.output.verify);
        assert_eq!(config.render.ec_level, ErrorCorrection::Low);
        assert_eq!(config.render.module_size, 10);
        assert!(config.render.quiet_zone);
        assert_eq!(config.render.foreground, Color::BLACK);
        assert_eq!(config.render.background, Color::WHITE);
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!("black".parse::<Color>(), Ok(Color::BLACK));
        assert_eq!("WHITE".parse::<Color>(), Ok(Color::WHITE));
        assert_eq!("#1a2b3c".parse::<Color>(), Ok(Color([0x1a, 0x2b, 0x3c])));
        assert!("#12345".parse::<Color>().is_err());
        assert!("teal".parse::<Color>().is_err());
        assert_eq!(Color([0x1a, 0x2b, 0x3c]).to_string(), "#1a2b3c");
    }

    #[test]
    fn test_parse_toml_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("meditrack-qr.toml");
        fs::write(
            &path,
            r##"
[output]
dir = "fixtures/qr"
emit_readme = false

[render]
ec_level = "high"
module_size = 6
foreground = "#102030"
"##,
        )
        .unwrap();

        let config = GeneratorConfig::from_file(&path).unwrap();
        assert_eq!(config.output.dir, PathBuf::from("fixtures/qr"));
        assert!(!config.output.emit_readme);
        assert_eq!(config.render.ec_level, ErrorCorrection::High);
        assert_eq!(config.render.module_size, 6);
        assert!(config.render.quiet_zone);
        assert_eq!(config.render.foreground, Color([0x10, 0x20, 0x30]));
    }

    #[test]
    fn test_module_size_bounds() {
        let mut render = RenderOptions::default();
        assert!(render.validate().is_ok());

        render.module_size = 0;
        assert!(matches!(render.validate(), Err(Error::Config(_))));

        render.module_size = MAX_MODULE_SIZE + 1;
        assert!(matches!(render.validate(), Err(Error::Config(_))));

        render.module_size = MAX_MODULE_SIZE;
        assert!(render.validate().is_ok());
    }

    #[test]
    fn test_load_rejects_oversized_module() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("meditrack-qr.toml");
        fs::write(&path, "[render]\nmodule_size = 3000000000\n").unwrap();

        assert!(GeneratorConfig::from_file(&path).is_ok());
        if env::var("MEDITRACK_QR_MODULE_SIZE").is_err() {
            assert!(matches!(
                GeneratorConfig::load(Some(&path)),
                Err(Error::Config(_))
            ));
        }
    }

    #[test]
    fn test_parse_yaml_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "output:\n  verify: true\nlogging:\n  level: debug\n").unwrap();

        let config = GeneratorConfig::from_file(&path).unwrap();
        assert!(config.output.verify);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, "").unwrap();
        assert!(matches!(
            GeneratorConfig::from_file(&path),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_error_correction_from_str() {
        assert_eq!("L".parse::<ErrorCorrection>(), Ok(ErrorCorrection::Low));
        assert_eq!(
            "quartile".parse::<ErrorCorrection>(),
            Ok(ErrorCorrection::Quartile)
        );
        assert!("max".parse::<ErrorCorrection>().is_err());
    }
}
