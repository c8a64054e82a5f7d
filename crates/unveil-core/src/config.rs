use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::animation::AnimationId;
use crate::intro::IntroTimings;
use crate::observer::RootMargin;
use crate::reveal::RevealOptions;
use crate::stagger::{StaggerGroup, PER_ITEM_DELAY_CAP_MS};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub stagger: StaggerConfig,
    #[serde(default)]
    pub intro: IntroConfig,
    #[serde(default)]
    pub marquee: MarqueeConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory for log files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Defaults applied to every reveal target that doesn't override them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealConfig {
    #[serde(default)]
    pub animation: AnimationId,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub root_margin: RootMargin,
    /// Margin used by section wrappers
    #[serde(default = "default_section_margin")]
    pub section_root_margin: RootMargin,
    #[serde(default = "default_true")]
    pub trigger_once: bool,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            animation: AnimationId::FALLBACK,
            threshold: default_threshold(),
            root_margin: RootMargin::default(),
            section_root_margin: default_section_margin(),
            trigger_once: default_true(),
        }
    }
}

impl RevealConfig {
    pub fn options(&self) -> RevealOptions {
        RevealOptions::new()
            .with_animation(self.animation)
            .with_threshold(self.threshold)
            .with_root_margin(self.root_margin)
            .with_trigger_once(self.trigger_once)
    }

    pub fn section_options(&self) -> RevealOptions {
        RevealOptions::section()
            .with_animation(self.animation)
            .with_threshold(self.threshold)
            .with_root_margin(self.section_root_margin)
            .with_trigger_once(self.trigger_once)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaggerConfig {
    /// Delay before the first child of a group
    #[serde(default)]
    pub base_delay_ms: u64,
    /// Added per child index in group mode
    #[serde(default = "default_step_delay")]
    pub step_delay_ms: u64,
    /// Per-index delay in per-item mode
    #[serde(default = "default_step_delay")]
    pub per_item_delay_ms: u64,
    #[serde(default = "default_per_item_cap")]
    pub per_item_cap_ms: u64,
}

impl Default for StaggerConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 0,
            step_delay_ms: default_step_delay(),
            per_item_delay_ms: default_step_delay(),
            per_item_cap_ms: default_per_item_cap(),
        }
    }
}

impl StaggerConfig {
    pub fn group(&self) -> StaggerGroup {
        StaggerGroup::new(self.base_delay_ms, self.step_delay_ms)
    }

    pub fn per_item(&self) -> StaggerGroup {
        StaggerGroup::new(self.per_item_delay_ms, 0).with_cap(self.per_item_cap_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntroConfig {
    /// Play the intro on startup
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub timings: IntroTimings,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            timings: IntroTimings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarqueeConfig {
    /// Base drift speed in pixels per second
    #[serde(default = "default_base_velocity")]
    pub base_velocity: f64,
    #[serde(default = "default_damping")]
    pub damping: f64,
    #[serde(default = "default_stiffness")]
    pub stiffness: f64,
    /// Scroll velocity that maps to the maximum speed factor
    #[serde(default = "default_velocity_input_max")]
    pub velocity_input_max: f64,
    #[serde(default = "default_velocity_factor_max")]
    pub velocity_factor_max: f64,
    /// Repeated copies of the text in a row
    #[serde(default = "default_copies")]
    pub copies: usize,
}

impl Default for MarqueeConfig {
    fn default() -> Self {
        Self {
            base_velocity: default_base_velocity(),
            damping: default_damping(),
            stiffness: default_stiffness(),
            velocity_input_max: default_velocity_input_max(),
            velocity_factor_max: default_velocity_factor_max(),
            copies: default_copies(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Smooth scrolling
    #[serde(default)]
    pub scroll: ScrollConfig,
    /// Theme configuration
    #[serde(default)]
    pub theme: ThemeConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            scroll: ScrollConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

/// Easing curve used by scroll animations and reveal transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    /// Jump straight to the end value
    None,
    Linear,
    #[default]
    Cubic,
    Quintic,
    EaseOut,
    EaseInOut,
    /// Overshoots slightly before settling
    Back,
    /// Decaying oscillation around the end value
    Elastic,
}

/// Smooth scroll configuration for the preview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    #[serde(default = "default_scroll_duration")]
    pub animation_duration_ms: u64,
    #[serde(default)]
    pub easing: EasingType,
    /// Lines moved by j/k
    #[serde(default = "default_scroll_lines")]
    pub scroll_lines: u16,
    /// Render rate while an animation is running
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_scroll_duration(),
            easing: EasingType::default(),
            scroll_lines: default_scroll_lines(),
            animation_fps: default_animation_fps(),
        }
    }
}

/// Theme configuration
/// Either a bare theme name or a table with `name` and optional `colors`
#[derive(Debug, Clone, Serialize)]
pub struct ThemeConfig {
    /// Theme name ("dark" or "light")
    pub name: String,
    pub colors: ThemeColorOverrides,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: default_theme_name(),
            colors: ThemeColorOverrides::default(),
        }
    }
}

impl<'de> Deserialize<'de> for ThemeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, MapAccess, Visitor};
        use std::fmt;

        struct ThemeConfigVisitor;

        impl<'de> Visitor<'de> for ThemeConfigVisitor {
            type Value = ThemeConfig;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a theme name or a map with 'name' and optional 'colors'")
            }

            fn visit_str<E>(self, value: &str) -> Result<ThemeConfig, E>
            where
                E: de::Error,
            {
                Ok(ThemeConfig {
                    name: value.to_string(),
                    colors: ThemeColorOverrides::default(),
                })
            }

            fn visit_map<M>(self, mut map: M) -> Result<ThemeConfig, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut name: Option<String> = None;
                let mut colors: Option<ThemeColorOverrides> = None;

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "name" => name = Some(map.next_value()?),
                        "colors" => colors = Some(map.next_value()?),
                        _ => {
                            let _: de::IgnoredAny = map.next_value()?;
                        }
                    }
                }

                Ok(ThemeConfig {
                    name: name.unwrap_or_else(default_theme_name),
                    colors: colors.unwrap_or_default(),
                })
            }
        }

        deserializer.deserialize_any(ThemeConfigVisitor)
    }
}

/// Hex color overrides ("#ff0000" or "ff0000")
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeColorOverrides {
    pub bg: Option<String>,
    pub fg: Option<String>,
    /// Secondary text
    pub muted: Option<String>,
    pub accent: Option<String>,
    pub overlay: Option<String>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("~/.local/share/unveil")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_threshold() -> f64 {
    0.1
}

fn default_section_margin() -> RootMargin {
    RootMargin::bottom_inset(80.0)
}

fn default_step_delay() -> u64 {
    100
}

fn default_per_item_cap() -> u64 {
    PER_ITEM_DELAY_CAP_MS
}

fn default_base_velocity() -> f64 {
    80.0
}

fn default_damping() -> f64 {
    50.0
}

fn default_stiffness() -> f64 {
    400.0
}

fn default_velocity_input_max() -> f64 {
    1000.0
}

fn default_velocity_factor_max() -> f64 {
    5.0
}

fn default_copies() -> usize {
    6
}

fn default_tick_rate() -> u64 {
    100
}

fn default_scroll_duration() -> u64 {
    150
}

fn default_scroll_lines() -> u16 {
    1
}

fn default_animation_fps() -> u32 {
    60
}

fn default_theme_name() -> String {
    "dark".to_string()
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults when it doesn't exist
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    pub fn validate(&self) -> crate::Result<()> {
        self.reveal.options().validate()?;
        if self.ui.scroll.animation_fps == 0 {
            return Err(crate::Error::Config("ui.scroll.animation_fps must be positive".to_string()));
        }
        if self.marquee.copies == 0 {
            return Err(crate::Error::Config("marquee.copies must be positive".to_string()));
        }
        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/unveil/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("unveil")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Log file written by the preview, which owns the terminal
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("unveil.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.reveal.threshold, 0.1);
        assert_eq!(config.reveal.root_margin.to_string(), "0px 0px -50px 0px");
        assert_eq!(config.stagger.step_delay_ms, 100);
        assert_eq!(config.stagger.per_item_cap_ms, 1000);
        assert_eq!(config.intro.timings.text1_duration_ms, 1500);
        assert_eq!(config.intro.timings.text1_hold_ms, 800);
        assert_eq!(config.ui.scroll.easing, EasingType::Cubic);
        assert_eq!(config.ui.theme.name, "dark");
    }

    #[test]
    fn test_malformed_file_is_a_toml_error() {
        let path = std::env::temp_dir().join(format!("unveil-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[reveal\nthreshold = ").unwrap();

        let result = AppConfig::load_from(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(crate::Error::Toml(_))));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join(format!("unveil-{}.toml", uuid::Uuid::new_v4()));
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.stagger.per_item_cap_ms, 1000);
    }

    #[test]
    fn test_partial_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            [reveal]
            animation = "zoom"
            root_margin = "0px 0px -120px 0px"

            [ui]
            theme = "light"

            [ui.scroll]
            easing = "ease_in_out"
            "#,
        )
        .unwrap();

        assert_eq!(config.reveal.animation, AnimationId::Zoom);
        assert_eq!(config.reveal.root_margin, RootMargin::bottom_inset(120.0));
        assert!(config.reveal.trigger_once);
        assert_eq!(config.ui.theme.name, "light");
        assert_eq!(config.ui.scroll.easing, EasingType::EaseInOut);
        assert_eq!(config.ui.scroll.animation_duration_ms, 150);
    }

    #[test]
    fn test_theme_table_form() {
        let config: AppConfig = toml::from_str(
            r##"
            [ui.theme]
            name = "dark"
            colors = { accent = "#ff8800" }
            "##,
        )
        .unwrap();
        assert_eq!(config.ui.theme.colors.accent.as_deref(), Some("#ff8800"));
    }

    #[test]
    fn test_invalid_margin_is_rejected() {
        let result = toml::from_str::<AppConfig>("[reveal]\nroot_margin = \"fifty\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_threshold() {
        let mut config = AppConfig::default();
        config.reveal.threshold = 2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serialize_round_trip() {
        let config = AppConfig::default();
        let text = config.to_toml().unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.reveal.root_margin, config.reveal.root_margin);
        assert_eq!(parsed.marquee.copies, 6);
    }

    #[test]
    fn test_per_item_stagger_from_config() {
        let config = StaggerConfig::default();
        let stagger = config.per_item();
        assert_eq!(stagger.per_item_delay(3), 300);
        assert_eq!(stagger.per_item_delay(40), 1000);
    }
}
