use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::emotion::{EmotionDescriptor, Shape};

/// A named emotion the user taught the app
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnedEmotion {
    pub name: String,
    pub hue: f64,
    pub shape: Shape,
    pub motion: f64,
    pub rhythm: f64,
    pub created_at: DateTime<Utc>,
}

/// User-scoped catalog of learned emotions, persisted as JSON.
/// Names are unique case-insensitively; learning an existing name is a
/// silent no-op, as is an empty or whitespace-only name.
pub struct EmotionBook {
    entries: Vec<LearnedEmotion>,
    data_file: Option<PathBuf>,
}

impl EmotionBook {
    pub fn new(config: &Config) -> Result<Self> {
        let data_file = config.learned_emotions_file();

        let entries = if data_file.exists() {
            let content = std::fs::read_to_string(&data_file)
                .context("Failed to read learned_emotions.json")?;
            serde_json::from_str(&content).context("Failed to parse learned_emotions.json")?
        } else {
            Vec::new()
        };

        Ok(EmotionBook {
            entries,
            data_file: Some(data_file),
        })
    }

    /// Catalog without a backing file
    pub fn in_memory() -> Self {
        EmotionBook {
            entries: Vec::new(),
            data_file: None,
        }
    }

    /// Record the emotion under a name. Returns true when a new entry was
    /// created; blank names and case-duplicates are ignored.
    pub fn learn(&mut self, name: &str, emotion: &EmotionDescriptor) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }

        let exists = self
            .entries
            .iter()
            .any(|e| e.name.eq_ignore_ascii_case(name));
        if exists {
            return Ok(false);
        }

        self.entries.push(LearnedEmotion {
            name: name.to_string(),
            hue: emotion.normalized_hue(),
            shape: emotion.shape,
            motion: emotion.motion,
            rhythm: emotion.rhythm,
            created_at: Utc::now(),
        });
        self.save()?;

        Ok(true)
    }

    pub fn entries(&self) -> &[LearnedEmotion] {
        &self.entries
    }

    fn save(&self) -> Result<()> {
        if let Some(path) = &self.data_file {
            let content = serde_json::to_string_pretty(&self.entries)
                .context("Failed to serialize learned emotions")?;
            std::fs::write(path, content).context("Failed to write learned_emotions.json")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_learn_creates_entry() {
        let mut book = EmotionBook::in_memory();
        let e = EmotionDescriptor::simple(300.0, Shape::Wave, 3.0, 1.2);

        assert!(book.learn("longing", &e).unwrap());
        assert_eq!(book.entries().len(), 1);
        assert_eq!(book.entries()[0].name, "longing");
        assert_eq!(book.entries()[0].hue, 300.0);
    }

    #[test]
    fn test_blank_names_silently_ignored() {
        let mut book = EmotionBook::in_memory();
        let e = EmotionDescriptor::default();

        assert!(!book.learn("", &e).unwrap());
        assert!(!book.learn("   ", &e).unwrap());
        assert!(!book.learn("\t\n", &e).unwrap());
        assert!(book.entries().is_empty());
    }

    #[test]
    fn test_dedup_is_case_insensitive() {
        let mut book = EmotionBook::in_memory();
        let e = EmotionDescriptor::default();

        assert!(book.learn("Quiet Joy", &e).unwrap());
        assert!(!book.learn("quiet joy", &e).unwrap());
        assert!(!book.learn("  QUIET JOY  ", &e).unwrap());
        assert_eq!(book.entries().len(), 1);
    }

    #[test]
    fn test_learned_hue_is_normalized() {
        let mut book = EmotionBook::in_memory();
        let e = EmotionDescriptor::simple(400.0, Shape::Circle, 5.0, 1.0);

        book.learn("wrap", &e).unwrap();
        assert_eq!(book.entries()[0].hue, 40.0);
    }
}
