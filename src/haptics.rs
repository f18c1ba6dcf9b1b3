use anyhow::anyhow;

/// Named vibration patterns, alternating on/off milliseconds, handed to a
/// host vibration collaborator as-is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticPattern {
    Heart,
    Burst,
    Wave,
}

impl HapticPattern {
    pub fn pattern(&self) -> &'static [u64] {
        match self {
            HapticPattern::Heart => &[100, 50, 100, 50, 100, 300, 100, 50, 100],
            HapticPattern::Burst => &[50, 30, 50, 30, 50, 30, 50],
            HapticPattern::Wave => &[200, 100, 300, 100, 400, 100, 300, 100, 200],
        }
    }
}

impl std::fmt::Display for HapticPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HapticPattern::Heart => write!(f, "heart"),
            HapticPattern::Burst => write!(f, "burst"),
            HapticPattern::Wave => write!(f, "wave"),
        }
    }
}

impl std::str::FromStr for HapticPattern {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "heart" => Ok(HapticPattern::Heart),
            "burst" => Ok(HapticPattern::Burst),
            "wave" => Ok(HapticPattern::Wave),
            _ => Err(anyhow!("Unknown haptic pattern: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_round_trip() {
        for p in [
            HapticPattern::Heart,
            HapticPattern::Burst,
            HapticPattern::Wave,
        ] {
            assert_eq!(p.to_string().parse::<HapticPattern>().unwrap(), p);
            assert!(!p.pattern().is_empty());
        }
    }

    #[test]
    fn test_heart_pattern_shape() {
        assert_eq!(HapticPattern::Heart.pattern().len(), 9);
        assert_eq!(HapticPattern::Heart.pattern()[5], 300);
    }
}
