use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// A selectable swatch: the hue the engine uses plus the gradient the UI
/// paints the button with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorEntry {
    pub hue: f64,
    pub gradient: String,
}

pub fn default_palette() -> Vec<ColorEntry> {
    vec![
        ColorEntry {
            hue: 0.0,
            gradient: "linear-gradient(135deg, #ff6b6b, #ee5a6f)".to_string(),
        },
        ColorEntry {
            hue: 60.0,
            gradient: "linear-gradient(135deg, #f9ca24, #f0932b)".to_string(),
        },
        ColorEntry {
            hue: 120.0,
            gradient: "linear-gradient(135deg, #6dd5ed, #2193b0)".to_string(),
        },
        ColorEntry {
            hue: 180.0,
            gradient: "linear-gradient(135deg, #a8edea, #fed6e3)".to_string(),
        },
        ColorEntry {
            hue: 240.0,
            gradient: "linear-gradient(135deg, #667eea, #764ba2)".to_string(),
        },
        ColorEntry {
            hue: 300.0,
            gradient: "linear-gradient(135deg, #f093fb, #f5576c)".to_string(),
        },
    ]
}

/// Hue angle of a "#rrggbb" color, via the RGB-to-HSL hue formula,
/// rounded to the nearest degree
pub fn hue_from_hex(hex: &str) -> Result<f64> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return Err(anyhow!("Expected a #rrggbb color, got: {}", hex));
    }

    let r = u8::from_str_radix(&hex[0..2], 16).context("Bad red component")? as f64 / 255.0;
    let g = u8::from_str_radix(&hex[2..4], 16).context("Bad green component")? as f64 / 255.0;
    let b = u8::from_str_radix(&hex[4..6], 16).context("Bad blue component")? as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);

    if max == min {
        return Ok(0.0);
    }

    let d = max - min;
    let h = if max == r {
        ((g - b) / d + if g < b { 6.0 } else { 0.0 }) / 6.0
    } else if max == g {
        ((b - r) / d + 2.0) / 6.0
    } else {
        ((r - g) / d + 4.0) / 6.0
    };

    Ok((h * 360.0).round())
}

/// Default swatches plus the user's custom colors. Custom entries are
/// persisted as-is, duplicates and all.
pub struct Palette {
    custom: Vec<ColorEntry>,
    data_file: Option<PathBuf>,
}

impl Palette {
    pub fn new(config: &Config) -> Result<Self> {
        let data_file = config.custom_colors_file();

        let custom = if data_file.exists() {
            let content =
                std::fs::read_to_string(&data_file).context("Failed to read custom_colors.json")?;
            serde_json::from_str(&content).context("Failed to parse custom_colors.json")?
        } else {
            Vec::new()
        };

        Ok(Palette {
            custom,
            data_file: Some(data_file),
        })
    }

    pub fn in_memory() -> Self {
        Palette {
            custom: Vec::new(),
            data_file: None,
        }
    }

    /// Turn a hex color into a swatch and append it. No dedup: picking the
    /// same color twice adds it twice.
    pub fn add_hex(&mut self, hex: &str) -> Result<ColorEntry> {
        let hue = hue_from_hex(hex)?;
        let hex = hex.trim();
        let entry = ColorEntry {
            hue,
            gradient: format!("linear-gradient(135deg, {hex}, {hex}dd)"),
        };

        self.custom.push(entry.clone());
        self.save()?;

        Ok(entry)
    }

    /// Defaults first, then custom entries in insertion order
    pub fn all(&self) -> Vec<ColorEntry> {
        let mut all = default_palette();
        all.extend(self.custom.iter().cloned());
        all
    }

    pub fn custom(&self) -> &[ColorEntry] {
        &self.custom
    }

    fn save(&self) -> Result<()> {
        if let Some(path) = &self.data_file {
            let content = serde_json::to_string_pretty(&self.custom)
                .context("Failed to serialize custom colors")?;
            std::fs::write(path, content).context("Failed to write custom_colors.json")?;
        }
        Ok(())
    }
}
