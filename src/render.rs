use anyhow::anyhow;
use colored::Colorize;

use crate::emotion::EmotionDescriptor;
use crate::motion::Bounds;
use crate::particles::{alpha_band, ParticlePoint};

/// Fixed fill saturation/brightness; only the hue varies per emotion
pub const FILL_SATURATION: f64 = 0.7;
pub const FILL_BRIGHTNESS: f64 = 0.9;

/// Particle count of the contact-list avatar miniature
pub const AVATAR_PARTICLE_COUNT: usize = 5;

/// How a preview surface is drawn each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewMode {
    /// Full clear, live alpha
    Live,
    /// Partial clear: previous frame leaves motion trails
    Speed,
    /// Full clear, flattened alpha so the particle count reads visually
    Density,
}

impl std::fmt::Display for PreviewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreviewMode::Live => write!(f, "live"),
            PreviewMode::Speed => write!(f, "speed"),
            PreviewMode::Density => write!(f, "density"),
        }
    }
}

impl std::str::FromStr for PreviewMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "live" => Ok(PreviewMode::Live),
            "speed" => Ok(PreviewMode::Speed),
            "density" => Ok(PreviewMode::Density),
            _ => Err(anyhow!("Unknown preview mode: {}", s)),
        }
    }
}

/// Drawing backend for tick snapshots. The engine only ever hands over the
/// read-only point list and a hue; anything beyond that is the backend's
/// business.
pub trait Renderer {
    fn draw(&mut self, points: &[ParticlePoint], hue: f64, mode: PreviewMode);
}

/// HSB to RGB at the given saturation/brightness, hue in degrees
pub fn hsb_to_rgb(hue: f64, saturation: f64, brightness: f64) -> (u8, u8, u8) {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = brightness * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = brightness - c;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}

/// A colored swatch dot for a hue, used in contact and palette listings
pub fn hue_swatch(hue: f64) -> String {
    let (r, g, b) = hsb_to_rgb(hue, FILL_SATURATION, FILL_BRIGHTNESS);
    "●".truecolor(r, g, b).to_string()
}

/// Character-grid renderer for the terminal.
///
/// Maps the surface bounds onto a cols x rows cell grid; dot glyph follows
/// the point size, color intensity follows alpha. In Speed mode cells lit
/// on the previous frame linger as faint trail marks.
pub struct TerminalRenderer {
    bounds: Bounds,
    cols: usize,
    rows: usize,
    trail: Vec<bool>,
}

impl TerminalRenderer {
    pub fn new(bounds: Bounds, cols: usize, rows: usize) -> Self {
        TerminalRenderer {
            bounds,
            cols,
            rows,
            trail: vec![false; cols * rows],
        }
    }

    /// Renderer sized for the composer preview surface
    pub fn preview() -> Self {
        Self::new(Bounds::PREVIEW, 57, 14)
    }

    /// Renderer sized for a message tile
    pub fn message() -> Self {
        Self::new(Bounds::MESSAGE, 33, 16)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    fn cell(&self, point: &ParticlePoint) -> Option<usize> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let col = (point.x / self.bounds.width * self.cols as f64) as usize;
        let row = (point.y / self.bounds.height * self.rows as f64) as usize;
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(row * self.cols + col)
    }

    /// Render one frame to a string
    pub fn frame(&mut self, points: &[ParticlePoint], hue: f64, mode: PreviewMode) -> String {
        let (r, g, b) = hsb_to_rgb(hue, FILL_SATURATION, FILL_BRIGHTNESS);
        let mut cells: Vec<Option<(char, f64)>> = vec![None; self.cols * self.rows];

        for point in points {
            let Some(index) = self.cell(point) else {
                continue;
            };
            let alpha = match mode {
                PreviewMode::Density => 200.0 / 255.0,
                _ => point.alpha,
            };
            let glyph = if point.size >= 5.0 {
                '●'
            } else if point.size >= 3.5 {
                '•'
            } else {
                '∙'
            };
            // Brightest point wins a contested cell
            match cells[index] {
                Some((_, existing)) if existing >= alpha => {}
                _ => cells[index] = Some((glyph, alpha)),
            }
        }

        let mut out = String::new();
        let mut lit = vec![false; self.cols * self.rows];

        for row in 0..self.rows {
            for col in 0..self.cols {
                let index = row * self.cols + col;
                match cells[index] {
                    Some((glyph, alpha)) => {
                        lit[index] = true;
                        let shade = |v: u8| (v as f64 * alpha) as u8;
                        out.push_str(
                            &glyph
                                .to_string()
                                .truecolor(shade(r), shade(g), shade(b))
                                .to_string(),
                        );
                    }
                    None if mode == PreviewMode::Speed && self.trail[index] => {
                        // Ghost of the previous frame
                        out.push_str(&"·".truecolor(r / 3, g / 3, b / 3).to_string());
                    }
                    None => out.push(' '),
                }
            }
            out.push('\n');
        }

        self.trail = lit;
        out
    }
}

impl Renderer for TerminalRenderer {
    fn draw(&mut self, points: &[ParticlePoint], hue: f64, mode: PreviewMode) {
        print!("{}", self.frame(points, hue, mode));
    }
}

/// The contact-list avatar miniature: five dots orbiting the avatar center,
/// driven directly by the contact's emotion
pub fn avatar_points(emotion: &EmotionDescriptor, time: f64) -> Vec<ParticlePoint> {
    (0..AVATAR_PARTICLE_COUNT)
        .map(|i| {
            let phase = i as f64;
            ParticlePoint {
                x: 27.0 + (time + phase).cos() * 10.0,
                y: 27.0 + (time + phase).sin() * 10.0,
                size: 15.0 + (time * emotion.rhythm + phase).sin() * 5.0,
                alpha: alpha_band((time + phase).sin()),
            }
        })
        .collect()
}
