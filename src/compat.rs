use crate::emotion::EmotionDescriptor;

/// A pair scoring above this (exclusive) fires the sync signal
pub const SYNC_THRESHOLD: f64 = 70.0;

/// Breakdown of one compatibility comparison
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncScore {
    pub hue: f64,
    pub motion: f64,
    pub rhythm: f64,
    pub shape: f64,
    pub total: f64,
}

impl SyncScore {
    /// Compare two descriptors.
    ///
    /// Hue distance is linear, not circular: 10 and 350 degrees score as
    /// far apart as the raw difference says. Kept exactly as designed;
    /// do not "fix" this to wrap-around distance.
    pub fn compute(a: &EmotionDescriptor, b: &EmotionDescriptor) -> SyncScore {
        let hue = 100.0 - (a.normalized_hue() - b.normalized_hue()).abs() / 360.0 * 100.0;
        let motion = 100.0 - (a.motion - b.motion).abs() / 10.0 * 100.0;
        let rhythm = 100.0 - (a.rhythm - b.rhythm).abs() / 3.0 * 100.0;
        let shape = if a.shape == b.shape { 100.0 } else { 50.0 };

        SyncScore {
            hue,
            motion,
            rhythm,
            shape,
            total: (hue + motion + rhythm + shape) / 4.0,
        }
    }

    pub fn is_sync(&self) -> bool {
        self.total > SYNC_THRESHOLD
    }
}

/// Overall alignment of two descriptors, 0-100
pub fn score(a: &EmotionDescriptor, b: &EmotionDescriptor) -> f64 {
    SyncScore::compute(a, b).total
}
