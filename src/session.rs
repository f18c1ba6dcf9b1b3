use std::time::Duration;

use rand::Rng;
use tokio::task::JoinHandle;

use crate::contacts::Contact;
use crate::conversation::{compose_reply, Conversation, Message};
use crate::emotion::EmotionDescriptor;
use crate::particles::ParticleSystem;
use crate::render::PreviewMode;
use crate::synth::{synthesize, TonePlayer};

/// Wall-clock delay before the simulated counterpart answers
pub const REPLY_DELAY: Duration = Duration::from_secs(2);

/// One open conversation surface.
///
/// Owns the live draft, the conversation log, the preview particle system
/// and the tone player; nothing here is shared, so two sessions never
/// cross-talk. The pending reply task dies with the session.
pub struct ChatSession {
    pub contact: Contact,
    pub draft: EmotionDescriptor,
    conversation: Conversation,
    preview: Option<ParticleSystem>,
    preview_mode: PreviewMode,
    preview_paused: bool,
    tones: TonePlayer,
    pending_reply: Option<JoinHandle<EmotionDescriptor>>,
}

impl ChatSession {
    pub fn new(contact: Contact) -> Self {
        ChatSession {
            contact,
            draft: EmotionDescriptor::default(),
            conversation: Conversation::new(),
            preview: None,
            preview_mode: PreviewMode::Live,
            preview_paused: false,
            tones: TonePlayer::silent(),
            pending_reply: None,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn tones(&self) -> &TonePlayer {
        &self.tones
    }

    /// Send the current draft: snapshot it into the log, start its tone,
    /// and schedule the simulated reply
    pub fn send(&mut self) -> Message {
        let mut snapshot = self.draft.clone();
        snapshot.clamp_ranges();

        let message = self.conversation.push_sent(snapshot.clone()).clone();
        self.tones.play(synthesize(&snapshot));

        let handle = tokio::spawn(async move {
            tokio::time::sleep(REPLY_DELAY).await;
            let mut rng = rand::thread_rng();
            compose_reply(&snapshot, &mut rng)
        });
        self.pending_reply = Some(handle);

        message
    }

    /// Wait for the scheduled reply, append it, play its tone, and report
    /// the sync signal for the completed pair. None if nothing is pending
    /// or the task was torn down under us.
    pub async fn await_reply(&mut self) -> Option<(Message, Option<f64>)> {
        let handle = self.pending_reply.take()?;
        let emotion = handle.await.ok()?;

        let message = self.conversation.push_received(emotion.clone()).clone();
        self.tones.play(synthesize(&emotion));
        let sync = self.conversation.sync_achieved();

        Some((message, sync))
    }

    pub fn has_pending_reply(&self) -> bool {
        self.pending_reply.is_some()
    }

    /// Tear the surface down: cancel the in-flight reply so it can never
    /// touch the log, and drop the preview with its particles
    pub fn teardown(&mut self) {
        if let Some(handle) = self.pending_reply.take() {
            handle.abort();
        }
        self.preview = None;
    }

    // Preview surface ----------------------------------------------------

    pub fn preview_mode(&self) -> PreviewMode {
        self.preview_mode
    }

    pub fn set_preview_mode(&mut self, mode: PreviewMode) {
        self.preview_mode = mode;
    }

    pub fn preview_paused(&self) -> bool {
        self.preview_paused
    }

    pub fn toggle_preview_paused(&mut self) {
        self.preview_paused = !self.preview_paused;
    }

    /// Advance the live preview one frame; respects the pause flag.
    /// The preview system is created lazily from the draft on first use.
    pub fn preview_tick(&mut self) -> Option<Vec<crate::particles::ParticlePoint>> {
        if self.preview_paused {
            return None;
        }
        let preview = self.preview.get_or_insert_with(|| {
            ParticleSystem::preview(self.draft.clone(), rand::thread_rng().gen())
        });
        // Track live draft edits without reseeding
        preview.set_emotion(self.draft.clone());
        Some(preview.tick())
    }

    /// Discard all preview particle state and start over
    pub fn reset_preview(&mut self) {
        if let Some(preview) = &mut self.preview {
            preview.reset();
        }
        self.preview_paused = false;
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
