use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::compat::SyncScore;
use crate::emotion::{normalize_hue, EmotionDescriptor, Shape};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Sent,
    Received,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Sent => write!(f, "sent"),
            Direction::Received => write!(f, "received"),
        }
    }
}

/// One entry in a conversation. The emotion is a structural snapshot taken
/// at creation; editing the live draft afterwards never rewrites history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub direction: Direction,
    pub emotion: EmotionDescriptor,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(direction: Direction, emotion: EmotionDescriptor) -> Self {
        Message {
            id: Uuid::new_v4().to_string(),
            direction,
            emotion,
            timestamp: Utc::now(),
        }
    }

    /// Stable particle seed so the bubble re-renders identically whenever
    /// its surface is rebuilt
    pub fn pattern_seed(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.id.hash(&mut hasher);
        hasher.finish()
    }

    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

/// Append-only, ordered message log for one conversation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Conversation::default()
    }

    pub fn push_sent(&mut self, emotion: EmotionDescriptor) -> &Message {
        self.messages.push(Message::new(Direction::Sent, emotion));
        self.messages.last().unwrap()
    }

    pub fn push_received(&mut self, emotion: EmotionDescriptor) -> &Message {
        self.messages
            .push(Message::new(Direction::Received, emotion));
        self.messages.last().unwrap()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Score of the trailing sent/received pair, if the log ends in one.
    /// Only ever the last two entries; earlier pairs are never revisited.
    pub fn last_pair_score(&self) -> Option<SyncScore> {
        if self.messages.len() < 2 {
            return None;
        }
        let pair = &self.messages[self.messages.len() - 2..];
        if pair[0].direction == Direction::Sent && pair[1].direction == Direction::Received {
            Some(SyncScore::compute(&pair[0].emotion, &pair[1].emotion))
        } else {
            None
        }
    }

    /// Total score of the trailing pair when it crosses the sync threshold
    pub fn sync_achieved(&self) -> Option<f64> {
        self.last_pair_score()
            .filter(|s| s.is_sync())
            .map(|s| s.total)
    }
}

/// Build the simulated counterpart reply to a sent emotion.
///
/// One of three moods, picked at random: an echo of what was sent, a hard
/// contrast, or a complementary answer. Results are pulled back into
/// documented ranges before use.
pub fn compose_reply<R: Rng>(sent: &EmotionDescriptor, rng: &mut R) -> EmotionDescriptor {
    let mut reply = match rng.gen_range(0..3u8) {
        0 => EmotionDescriptor::simple(
            sent.hue + (rng.gen::<f64>() - 0.5) * 30.0,
            sent.shape,
            sent.motion + (rng.gen::<f64>() - 0.5),
            sent.rhythm + (rng.gen::<f64>() - 0.5) * 0.3,
        ),
        1 => EmotionDescriptor::simple(
            normalize_hue(sent.hue + 180.0 + (rng.gen::<f64>() - 0.5) * 60.0),
            [Shape::Circle, Shape::Wave, Shape::Shard][rng.gen_range(0..3usize)],
            rng.gen::<f64>() * 10.0,
            0.5 + rng.gen::<f64>() * 2.5,
        ),
        _ => EmotionDescriptor::simple(
            normalize_hue(sent.hue + 120.0),
            match sent.shape {
                Shape::Circle => Shape::Wave,
                Shape::Wave => Shape::Shard,
                _ => Shape::Circle,
            },
            10.0 - sent.motion,
            sent.rhythm * 1.5,
        ),
    };

    reply.clamp_ranges();
    reply
}
