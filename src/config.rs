use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::panel::Layout;

pub const DEFAULT_PORT: &str = "/dev/cu.usbmodem143201";
pub const DEFAULT_BAUD: u32 = 9600;

/// Connection and presentation settings, read from the `[rover]` table of
/// a TOML file. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RoverConfig {
    pub port: String,
    pub baud: u32,
    pub timeout_ms: u64,
    pub settle_ms: u64,
    pub layout: Layout,
    /// Font file to load for the CJK captions.
    pub font: Option<PathBuf>,
}

impl Default for RoverConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud: DEFAULT_BAUD,
            timeout_ms: 1000,
            settle_ms: 0,
            layout: Layout::default(),
            font: None,
        }
    }
}

/// Values given on the command line; each one that is set wins over the
/// file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<String>,
    pub baud: Option<u32>,
    pub timeout_ms: Option<u64>,
    pub settle_ms: Option<u64>,
    pub layout: Option<Layout>,
    pub font: Option<PathBuf>,
}

impl RoverConfig {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        #[derive(Deserialize)]
        struct Root {
            #[serde(default)]
            rover: RoverConfig,
        }
        let root: Root = toml::from_str(text)?;
        Ok(root.rover)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load `path` if given, otherwise start from defaults, then apply
    /// `overrides`.
    pub fn resolve(path: Option<&Path>, overrides: Overrides) -> anyhow::Result<Self> {
        let base = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(base.apply(overrides))
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(baud) = overrides.baud {
            self.baud = baud;
        }
        if let Some(timeout_ms) = overrides.timeout_ms {
            self.timeout_ms = timeout_ms;
        }
        if let Some(settle_ms) = overrides.settle_ms {
            self.settle_ms = settle_ms;
        }
        if let Some(layout) = overrides.layout {
            self.layout = layout;
        }
        if overrides.font.is_some() {
            self.font = overrides.font;
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}
