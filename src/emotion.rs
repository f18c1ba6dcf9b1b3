use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// Fallback when a sides input cannot be parsed
pub const DEFAULT_SIDES: u32 = 5;
/// Minimum vertex count for custom shapes
pub const MIN_SIDES: u32 = 3;

/// Wrap a hue angle into [0, 360). Idempotent.
pub fn normalize_hue(hue: f64) -> f64 {
    hue.rem_euclid(360.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Circle,
    Wave,
    Shard,
    Spiral,
    Burst,
    Custom,
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shape::Circle => write!(f, "circle"),
            Shape::Wave => write!(f, "wave"),
            Shape::Shard => write!(f, "shard"),
            Shape::Spiral => write!(f, "spiral"),
            Shape::Burst => write!(f, "burst"),
            Shape::Custom => write!(f, "custom"),
        }
    }
}

impl std::str::FromStr for Shape {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "circle" => Ok(Shape::Circle),
            "wave" => Ok(Shape::Wave),
            "shard" => Ok(Shape::Shard),
            "spiral" => Ok(Shape::Spiral),
            "burst" => Ok(Shape::Burst),
            "custom" => Ok(Shape::Custom),
            _ => Err(anyhow!("Unknown shape: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Polygon,
    Star,
    Flower,
    Chaos,
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeKind::Polygon => write!(f, "polygon"),
            ShapeKind::Star => write!(f, "star"),
            ShapeKind::Flower => write!(f, "flower"),
            ShapeKind::Chaos => write!(f, "chaos"),
        }
    }
}

impl std::str::FromStr for ShapeKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "polygon" => Ok(ShapeKind::Polygon),
            "star" => Ok(ShapeKind::Star),
            "flower" => Ok(ShapeKind::Flower),
            "chaos" => Ok(ShapeKind::Chaos),
            _ => Err(anyhow!("Unknown shape kind: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionPath {
    Bounce,
    Zigzag,
    Orbit,
    Random,
}

impl std::fmt::Display for MotionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MotionPath::Bounce => write!(f, "bounce"),
            MotionPath::Zigzag => write!(f, "zigzag"),
            MotionPath::Orbit => write!(f, "orbit"),
            MotionPath::Random => write!(f, "random"),
        }
    }
}

impl std::str::FromStr for MotionPath {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bounce" => Ok(MotionPath::Bounce),
            "zigzag" => Ok(MotionPath::Zigzag),
            "orbit" => Ok(MotionPath::Orbit),
            "random" => Ok(MotionPath::Random),
            _ => Err(anyhow!("Unknown motion path: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RhythmPattern {
    Accelerate,
    Decelerate,
    Heartbeat,
    Morse,
}

impl std::fmt::Display for RhythmPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RhythmPattern::Accelerate => write!(f, "accelerate"),
            RhythmPattern::Decelerate => write!(f, "decelerate"),
            RhythmPattern::Heartbeat => write!(f, "heartbeat"),
            RhythmPattern::Morse => write!(f, "morse"),
        }
    }
}

impl std::str::FromStr for RhythmPattern {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accelerate" => Ok(RhythmPattern::Accelerate),
            "decelerate" => Ok(RhythmPattern::Decelerate),
            "heartbeat" => Ok(RhythmPattern::Heartbeat),
            "morse" => Ok(RhythmPattern::Morse),
            _ => Err(anyhow!("Unknown rhythm pattern: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveformChoice {
    Auto,
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

impl std::fmt::Display for WaveformChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaveformChoice::Auto => write!(f, "auto"),
            WaveformChoice::Sine => write!(f, "sine"),
            WaveformChoice::Triangle => write!(f, "triangle"),
            WaveformChoice::Square => write!(f, "square"),
            WaveformChoice::Sawtooth => write!(f, "sawtooth"),
        }
    }
}

impl std::str::FromStr for WaveformChoice {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(WaveformChoice::Auto),
            "sine" => Ok(WaveformChoice::Sine),
            "triangle" => Ok(WaveformChoice::Triangle),
            "square" => Ok(WaveformChoice::Square),
            "sawtooth" => Ok(WaveformChoice::Sawtooth),
            _ => Err(anyhow!("Unknown waveform: {}", s)),
        }
    }
}

/// Custom shape override, active only while `shape == Shape::Custom`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomShape {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub sides: u32,
}

impl Default for CustomShape {
    fn default() -> Self {
        CustomShape {
            enabled: false,
            kind: ShapeKind::Polygon,
            sides: DEFAULT_SIDES,
        }
    }
}

/// Custom motion override; when enabled it replaces shape kinematics entirely
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomMotion {
    pub enabled: bool,
    pub path: MotionPath,
}

impl Default for CustomMotion {
    fn default() -> Self {
        CustomMotion {
            enabled: false,
            path: MotionPath::Bounce,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomRhythm {
    pub enabled: bool,
    pub pattern: RhythmPattern,
    /// Percent 0-100, added as random jitter to the rhythm multiplier
    pub variation: u32,
}

impl Default for CustomRhythm {
    fn default() -> Self {
        CustomRhythm {
            enabled: false,
            pattern: RhythmPattern::Heartbeat,
            variation: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomSound {
    pub enabled: bool,
    pub waveform: WaveformChoice,
    /// Base pitch in Hz
    pub pitch: f64,
    /// Duration in seconds
    pub duration: f64,
    /// Volume percent 0-100
    pub volume: f64,
}

impl Default for CustomSound {
    fn default() -> Self {
        CustomSound {
            enabled: false,
            waveform: WaveformChoice::Auto,
            pitch: 400.0,
            duration: 1.0,
            volume: 15.0,
        }
    }
}

/// The unit of meaning exchanged between two people.
///
/// A descriptor is mutable while it is the live draft in a composer; a sent
/// message stores a structural copy, so edits after send never rewrite
/// history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionDescriptor {
    pub hue: f64,
    pub shape: Shape,
    pub motion: f64,
    pub rhythm: f64,
    #[serde(default)]
    pub custom_shape: CustomShape,
    #[serde(default)]
    pub custom_motion: CustomMotion,
    #[serde(default)]
    pub custom_rhythm: CustomRhythm,
    #[serde(default)]
    pub custom_sound: CustomSound,
    #[serde(default = "default_particle_density")]
    pub particle_density: usize,
}

fn default_particle_density() -> usize {
    30
}

impl Default for EmotionDescriptor {
    fn default() -> Self {
        EmotionDescriptor {
            hue: 0.0,
            shape: Shape::Circle,
            motion: 5.0,
            rhythm: 1.0,
            custom_shape: CustomShape::default(),
            custom_motion: CustomMotion::default(),
            custom_rhythm: CustomRhythm::default(),
            custom_sound: CustomSound::default(),
            particle_density: default_particle_density(),
        }
    }
}

impl EmotionDescriptor {
    /// Neutral state shown for a contact that has never shared an emotion
    pub fn neutral() -> Self {
        EmotionDescriptor {
            hue: 200.0,
            shape: Shape::Circle,
            motion: 2.0,
            rhythm: 1.0,
            ..EmotionDescriptor::default()
        }
    }

    pub fn simple(hue: f64, shape: Shape, motion: f64, rhythm: f64) -> Self {
        EmotionDescriptor {
            hue,
            shape,
            motion,
            rhythm,
            ..EmotionDescriptor::default()
        }
    }

    /// Hue wrapped into [0, 360); every consumer reads hue through this
    pub fn normalized_hue(&self) -> f64 {
        normalize_hue(self.hue)
    }

    /// Pull stray values back into their documented ranges
    pub fn clamp_ranges(&mut self) {
        self.hue = normalize_hue(self.hue);
        self.motion = self.motion.clamp(0.0, 10.0);
        self.rhythm = self.rhythm.clamp(0.0, 3.0);
        self.custom_rhythm.variation = self.custom_rhythm.variation.min(100);
        self.custom_shape.sides = self.custom_shape.sides.max(MIN_SIDES);
    }
}

/// Parse a sides input the forgiving way: non-numeric falls back to 5,
/// numeric values are floored at the 3-vertex minimum.
pub fn parse_sides(input: &str) -> u32 {
    input
        .trim()
        .parse::<u32>()
        .unwrap_or(DEFAULT_SIDES)
        .max(MIN_SIDES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_hue_range() {
        assert_eq!(normalize_hue(0.0), 0.0);
        assert_eq!(normalize_hue(360.0), 0.0);
        assert_eq!(normalize_hue(370.0), 10.0);
        assert_eq!(normalize_hue(-10.0), 350.0);
        assert_eq!(normalize_hue(725.0), 5.0);
    }

    #[test]
    fn test_normalize_hue_idempotent() {
        for h in [-540.0, -10.0, 0.0, 179.5, 359.9, 360.0, 1000.0] {
            let once = normalize_hue(h);
            assert_eq!(normalize_hue(once), once);
            assert!((0.0..360.0).contains(&once));
        }
    }

    #[test]
    fn test_shape_round_trip() {
        for s in [
            Shape::Circle,
            Shape::Wave,
            Shape::Shard,
            Shape::Spiral,
            Shape::Burst,
            Shape::Custom,
        ] {
            assert_eq!(s.to_string().parse::<Shape>().unwrap(), s);
        }
        assert!("triangle".parse::<Shape>().is_err());
    }

    #[test]
    fn test_parse_sides_fallback() {
        assert_eq!(parse_sides("7"), 7);
        assert_eq!(parse_sides(" 8 "), 8);
        assert_eq!(parse_sides("abc"), 5);
        assert_eq!(parse_sides(""), 5);
        assert_eq!(parse_sides("2"), 3);
    }

    #[test]
    fn test_neutral_default() {
        let neutral = EmotionDescriptor::neutral();
        assert_eq!(neutral.hue, 200.0);
        assert_eq!(neutral.shape, Shape::Circle);
        assert_eq!(neutral.motion, 2.0);
        assert_eq!(neutral.rhythm, 1.0);
        assert!(!neutral.custom_sound.enabled);
    }

    #[test]
    fn test_clamp_ranges() {
        let mut e = EmotionDescriptor::simple(400.0, Shape::Wave, 12.0, -0.5);
        e.clamp_ranges();
        assert_eq!(e.hue, 40.0);
        assert_eq!(e.motion, 10.0);
        assert_eq!(e.rhythm, 0.0);
    }

    #[test]
    fn test_descriptor_missing_fields_default() {
        // A stored record from before the custom overrides existed
        let json = r#"{"hue": 120.0, "shape": "wave", "motion": 3.0, "rhythm": 1.2}"#;
        let e: EmotionDescriptor = serde_json::from_str(json).unwrap();
        assert!(!e.custom_shape.enabled);
        assert!(!e.custom_motion.enabled);
        assert_eq!(e.particle_density, 30);
    }
}
