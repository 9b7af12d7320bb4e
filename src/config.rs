//! Simulation settings, loaded from TOML.

use std::path::Path;

use serde::Deserialize;

use crate::world::Circle;

pub const DEFAULT_PATH: &str = "raycast.toml";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid setting: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    pub viewport: ViewportConfig,
    pub rays: RayConfig,
    pub source: CircleConfig,
    pub obstacle: ObstacleConfig,
    pub timing: TimingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewportConfig {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RayConfig {
    /// Rays at startup
    pub count: usize,
    /// Lower bound for the decrease command
    pub min: usize,
    /// Upper bound for the increase command
    pub max: usize,
    /// Rays added or removed per command
    pub step: usize,
    /// Side of the square drawn per step, in pixels
    pub thickness: u32,
    /// 0xRRGGBB
    pub color: u32,
    /// Steps per one-level darkening
    pub darken_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CircleConfig {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObstacleConfig {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Vertical pixels per frame
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    pub frame_interval_ms: u64,
    pub report_interval_ms: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            viewport: ViewportConfig::default(),
            rays: RayConfig::default(),
            source: CircleConfig::default(),
            obstacle: ObstacleConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 900,
            height: 600,
        }
    }
}

impl Default for RayConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            min: 10,
            max: 5000,
            step: 10,
            thickness: 3,
            color: 0xffd43b,
            darken_rate: 2,
        }
    }
}

impl Default for CircleConfig {
    fn default() -> Self {
        Self {
            x: 200.0,
            y: 200.0,
            radius: 30.0,
        }
    }
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            x: 650.0,
            y: 200.0,
            radius: 100.0,
            speed: 2.0,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 10,
            report_interval_ms: 1000,
        }
    }
}

impl CircleConfig {
    pub fn circle(&self) -> Circle {
        Circle::new(self.x, self.y, self.radius)
    }
}

impl ObstacleConfig {
    pub fn circle(&self) -> Circle {
        Circle::new(self.x, self.y, self.radius)
    }
}

impl SimConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Load `path` if given, otherwise `raycast.toml` if it exists, otherwise defaults.
    ///
    /// A path passed explicitly must exist.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            log::info!("loading config from {}", path.display());
            return Self::load(path);
        }
        let default = Path::new(DEFAULT_PATH);
        if default.exists() {
            log::info!("loading config from {}", default.display());
            Self::load(default)
        } else {
            log::info!("no {DEFAULT_PATH} found, using built-in defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.viewport.width == 0 || self.viewport.height == 0 {
            return invalid(format!(
                "viewport must be non-empty, got {}x{}",
                self.viewport.width, self.viewport.height
            ));
        }

        let rays = &self.rays;
        if rays.min > rays.max {
            return invalid(format!("rays.min {} exceeds rays.max {}", rays.min, rays.max));
        }
        if !(rays.min..=rays.max).contains(&rays.count) {
            return invalid(format!(
                "rays.count {} outside [{}, {}]",
                rays.count, rays.min, rays.max
            ));
        }
        if rays.step == 0 || rays.thickness == 0 || rays.darken_rate == 0 {
            return invalid("rays.step, rays.thickness and rays.darken_rate must be positive".to_string());
        }
        // The high byte must stay clear so a packed 0 means every channel is black.
        if rays.color > 0xFFFFFF {
            return invalid(format!("rays.color {:#x} is not 0xRRGGBB", rays.color));
        }

        let circles = [
            ("source", self.source.x, self.source.y, self.source.radius),
            ("obstacle", self.obstacle.x, self.obstacle.y, self.obstacle.radius),
        ];
        for (name, x, y, r) in circles {
            if !(x.is_finite() && y.is_finite() && r.is_finite()) || r < 0.0 {
                return invalid(format!("{name} needs finite coordinates and radius >= 0"));
            }
        }
        if !self.obstacle.speed.is_finite() {
            return invalid("obstacle.speed must be finite".into());
        }

        Ok(())
    }
}
