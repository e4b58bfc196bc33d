//! Configuration for subdeco
//!
//! Loads configuration from TOML file at `~/.config/subdeco/config.toml`
//! Auto-generates default config file on first run if missing.

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use subdeco_layout::{
    default_placements, ButtonPlacement, ClickPolicy, ControlButton, FrameMetrics, FrameStyle,
    Region, Size,
};
use tracing::{debug, info, warn};

/// wl_shm pool sizes are signed 32-bit
const MAX_BUFFER_BYTES: u64 = i32::MAX as u64;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub decorations: DecorationConfig,
    pub colors: ColorConfig,
    pub cursor: CursorConfig,
}

impl Config {
    /// Load configuration from file, or use defaults if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            info!("Config file not found at {:?}, using defaults", config_path);
            // Auto-generate default config file
            if let Err(e) = Self::save_default(&config_path) {
                warn!("Failed to create default config file: {}", e);
            }
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .context("Failed to read config file")?;
        let config = Self::parse(&content)?;

        info!("Configuration loaded from {:?}", config_path);
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Parse and validate a TOML document
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the layout engine cannot work with
    pub fn validate(&self) -> Result<()> {
        let style = self.frame_style();
        style.validate().context("Invalid decoration settings")?;
        ensure!(self.cursor.size > 0, "Cursor size must be non-zero");

        // Every surface fits inside the frame, so the frame bounds the
        // largest shared-memory buffer drawn at startup
        let frame = style
            .metrics
            .frame_size(self.initial_size().at_least(style.min_content));
        ensure!(
            u64::from(frame.width)
                .saturating_mul(4)
                .saturating_mul(u64::from(frame.height))
                <= MAX_BUFFER_BYTES,
            "Window of {}x{} is too large for a shared-memory buffer",
            frame.width,
            frame.height
        );
        Ok(())
    }

    /// Get the path to the config file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("subdeco");

        Ok(config_dir.join("config.toml"))
    }

    /// Save default configuration to file
    fn save_default(path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(&Self::default())
            .context("Failed to serialize default config")?;

        fs::write(path, toml_string)
            .context("Failed to write default config file")?;

        info!("Created default config file at {:?}", path);
        Ok(())
    }

    pub fn initial_size(&self) -> Size {
        Size::new(self.window.initial_width, self.window.initial_height)
    }

    pub fn frame_style(&self) -> FrameStyle {
        FrameStyle {
            metrics: FrameMetrics::new(
                self.decorations.border_thickness,
                self.decorations.title_thickness,
            ),
            min_content: Size::new(self.window.min_width, self.window.min_height),
            button_size: Size::new(self.decorations.button_width, self.decorations.button_height),
            placements: self.decorations.buttons.clone(),
        }
    }

    pub fn click_policy(&self) -> ClickPolicy {
        ClickPolicy {
            double_click_ms: self.decorations.double_click_ms,
            double_click_distance: self.decorations.double_click_distance,
            retain_hover_on_leave: self.decorations.retain_hover_on_leave,
        }
    }
}

/// Toplevel window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Toplevel title
    pub title: String,
    /// Requested content size before the first configure
    pub initial_width: u32,
    pub initial_height: u32,
    /// Content is never laid out smaller than this
    pub min_width: u32,
    pub min_height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "subdeco".to_string(),
            initial_width: 256,
            initial_height: 256,
            min_width: 50,
            min_height: 50,
        }
    }
}

/// Decoration geometry and pointer behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationConfig {
    /// Resize border thickness in logical units
    pub border_thickness: u32,
    /// Title bar height in logical units
    pub title_thickness: u32,
    pub button_width: u32,
    pub button_height: u32,
    /// Two title presses closer than this toggle maximize
    pub double_click_ms: u32,
    pub double_click_distance: f64,
    /// Keep the hovered region when the pointer leaves a decoration
    pub retain_hover_on_leave: bool,
    /// Control buttons, in creation order
    pub buttons: Vec<ButtonPlacement>,
}

impl Default for DecorationConfig {
    fn default() -> Self {
        let policy = ClickPolicy::default();
        Self {
            border_thickness: 5,
            title_thickness: 15,
            button_width: 10,
            button_height: 8,
            double_click_ms: policy.double_click_ms,
            double_click_distance: policy.double_click_distance,
            retain_hover_on_leave: policy.retain_hover_on_leave,
            buttons: default_placements(),
        }
    }
}

/// Surface colors (hex: 0xRRGGBB)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub content: u32,
    pub title: u32,
    pub border: u32,
    pub corner: u32,
    pub close: u32,
    pub maximize: u32,
    pub minimize: u32,
}

impl Default for ColorConfig {
    fn default() -> Self {
        // Nord Theme Colors
        Self {
            content: 0x2e3440,  // Polar Night Darkest
            title: 0x3b4252,    // Polar Night Lighter
            border: 0x5e81ac,   // Frost Blue
            corner: 0x81a1c1,   // Frost Light Blue
            close: ControlButton::Close.default_color(),
            maximize: ControlButton::Maximize.default_color(),
            minimize: ControlButton::Minimize.default_color(),
        }
    }
}

impl ColorConfig {
    pub fn region(&self, region: Region) -> u32 {
        match region {
            Region::Title => self.title,
            r if r.is_corner() => self.corner,
            _ => self.border,
        }
    }

    pub fn button(&self, button: ControlButton) -> u32 {
        match button {
            ControlButton::Close => self.close,
            ControlButton::Maximize => self.maximize,
            ControlButton::Minimize => self.minimize,
        }
    }
}

/// Pointer cursor theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    /// XCursor theme name; `None` uses the default theme
    pub theme: Option<String>,
    /// Cursor size in pixels
    pub size: u32,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            theme: None,
            size: 24,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subdeco_layout::ButtonAnchor;

    #[test]
    fn test_defaults_validate() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.initial_size(), Size::new(256, 256));
        assert_eq!(config.frame_style().metrics, FrameMetrics::new(5, 15));
        assert_eq!(config.frame_style().button_size, Size::new(10, 8));
    }

    #[test]
    fn test_default_file_parses_back() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let parsed = Config::parse(&text).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed = Config::parse(
            r#"
            [window]
            title = "demo"

            [decorations]
            border_thickness = 8

            [[decorations.buttons]]
            button = "close"
            anchor = "start"
            offset_x = 2
            offset_y = 3
            "#,
        )
        .unwrap();

        assert_eq!(parsed.window.title, "demo");
        assert_eq!(parsed.window.initial_width, 256);
        assert_eq!(parsed.decorations.border_thickness, 8);
        assert_eq!(parsed.decorations.title_thickness, 15);
        assert_eq!(
            parsed.decorations.buttons,
            vec![ButtonPlacement::new(ControlButton::Close, ButtonAnchor::Start, 2, 3)]
        );
    }

    #[test]
    fn test_duplicate_buttons_rejected() {
        let result = Config::parse(
            r#"
            [[decorations.buttons]]
            button = "maximize"
            offset_x = 2
            offset_y = 3

            [[decorations.buttons]]
            button = "maximize"
            offset_x = 20
            offset_y = 3
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_minimum_rejected() {
        let mut config = Config::default();
        config.window.min_height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_window_rejected() {
        let result = Config::parse("[window]\ninitial_width = 100000\ninitial_height = 100000");
        assert!(result.is_err());

        let result = Config::parse("[window]\nmin_width = 100000\nmin_height = 100000");
        assert!(result.is_err());

        let result = Config::parse("[decorations]\nborder_thickness = 4000000000");
        assert!(result.is_err());
    }

    #[test]
    fn test_large_window_within_buffer_limit() {
        let config =
            Config::parse("[window]\ninitial_width = 3840\ninitial_height = 2160").unwrap();
        assert_eq!(config.initial_size(), Size::new(3840, 2160));
    }

    #[test]
    fn test_region_colors() {
        let colors = ColorConfig::default();
        assert_eq!(colors.region(Region::Title), colors.title);
        assert_eq!(colors.region(Region::EdgeLeft), colors.border);
        assert_eq!(colors.region(Region::CornerBottomRight), colors.corner);
        assert_eq!(colors.button(ControlButton::Close), 0xbf616a);
    }
}
