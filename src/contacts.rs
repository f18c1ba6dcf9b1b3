use serde::{Deserialize, Serialize};

use crate::emotion::{EmotionDescriptor, Shape};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: u32,
    pub name: String,
    pub status: String,
    pub active: bool,
    pub emotion: Option<EmotionDescriptor>,
}

impl Contact {
    /// A contact who has never shared an emotion renders neutral
    pub fn emotion_or_neutral(&self) -> EmotionDescriptor {
        self.emotion
            .clone()
            .unwrap_or_else(EmotionDescriptor::neutral)
    }
}

pub fn builtin_contacts() -> Vec<Contact> {
    vec![
        Contact {
            id: 1,
            name: "Priya".to_string(),
            status: "Feeling deeply connected".to_string(),
            active: true,
            emotion: Some(EmotionDescriptor::simple(300.0, Shape::Wave, 3.0, 1.2)),
        },
        Contact {
            id: 2,
            name: "Arjun".to_string(),
            status: "Calm and thoughtful".to_string(),
            active: true,
            emotion: Some(EmotionDescriptor::simple(180.0, Shape::Circle, 2.0, 0.8)),
        },
        Contact {
            id: 3,
            name: "Arbin".to_string(),
            status: "Energetic mood".to_string(),
            active: true,
            emotion: Some(EmotionDescriptor::simple(60.0, Shape::Shard, 7.0, 2.1)),
        },
        Contact {
            id: 4,
            name: "Alif".to_string(),
            status: "Peaceful state".to_string(),
            active: true,
            emotion: Some(EmotionDescriptor::simple(120.0, Shape::Wave, 1.5, 0.6)),
        },
        Contact {
            id: 5,
            name: "Tanvir".to_string(),
            status: "Creative flow".to_string(),
            active: true,
            emotion: Some(EmotionDescriptor::simple(240.0, Shape::Circle, 4.0, 1.5)),
        },
        Contact {
            id: 6,
            name: "Meera".to_string(),
            status: "Last seen yesterday".to_string(),
            active: false,
            emotion: None,
        },
    ]
}

pub fn find_contact(name: &str) -> Option<Contact> {
    builtin_contacts()
        .into_iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
}
