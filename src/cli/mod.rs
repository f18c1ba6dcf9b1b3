use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use colored::*;
use rand::Rng;

use crate::compat::{SyncScore, SYNC_THRESHOLD};
use crate::config::Config;
use crate::contacts::{builtin_contacts, find_contact};
use crate::conversation::Message;
use crate::emotion::{parse_sides, EmotionDescriptor, Shape};
use crate::haptics::HapticPattern;
use crate::learned::EmotionBook;
use crate::palette::Palette;
use crate::particles::ParticleSystem;
use crate::render::{avatar_points, hue_swatch, PreviewMode, Renderer, TerminalRenderer};
use crate::session::ChatSession;
use crate::synth::synthesize;

#[derive(Parser)]
#[command(name = "nirbhaas", version, about = "Silent understanding - say it without words")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
    /// Override the data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List contacts and their current emotions
    Contacts,
    /// Compose an emotion and send it to a contact
    Send {
        /// Contact name
        contact: String,
        #[command(flatten)]
        emotion: EmotionArgs,
        /// Also learn the sent emotion under this name
        #[arg(long)]
        learn: Option<String>,
    },
    /// Animate the composer preview in the terminal
    Preview {
        #[command(flatten)]
        emotion: EmotionArgs,
        /// Frames to animate
        #[arg(long, default_value_t = 40)]
        frames: usize,
        /// live|speed|density
        #[arg(long, default_value = "live")]
        mode: String,
    },
    /// Describe the tone an emotion synthesizes to
    Sound {
        #[command(flatten)]
        emotion: EmotionArgs,
    },
    /// Compare two contacts' emotions
    Score {
        contact_a: String,
        contact_b: String,
    },
    /// List the learned-emotion catalog
    Learned,
    /// Show the color palette, optionally adding a custom hex color
    Colors {
        /// A #rrggbb color to append to the palette
        #[arg(long)]
        add: Option<String>,
    },
    /// Print a haptic vibration pattern
    Haptics {
        /// heart|burst|wave
        pattern: String,
    },
}

/// Emotion parameters shared by every composing command
#[derive(clap::Args, Debug, Clone)]
pub struct EmotionArgs {
    /// Color angle, 0-360
    #[arg(long, default_value_t = 0.0)]
    pub hue: f64,
    /// circle|wave|shard|spiral|burst|custom
    #[arg(long, default_value = "circle")]
    pub shape: String,
    /// Movement intensity, 0-10
    #[arg(long, default_value_t = 5.0)]
    pub motion: f64,
    /// Oscillation multiplier, 0-3
    #[arg(long, default_value_t = 1.0)]
    pub rhythm: f64,
    /// Custom shape kind: polygon|star|flower|chaos
    #[arg(long)]
    pub shape_kind: Option<String>,
    /// Vertex count for custom shapes (minimum 3)
    #[arg(long)]
    pub sides: Option<String>,
    /// Custom motion path: bounce|zigzag|orbit|random
    #[arg(long)]
    pub path: Option<String>,
    /// Custom rhythm pattern: accelerate|decelerate|heartbeat|morse
    #[arg(long)]
    pub pattern: Option<String>,
    /// Rhythm variation percent, 0-100
    #[arg(long)]
    pub variation: Option<u32>,
    /// Custom sound waveform: auto|sine|triangle|square|sawtooth
    #[arg(long)]
    pub waveform: Option<String>,
    /// Custom pitch in Hz
    #[arg(long)]
    pub pitch: Option<f64>,
    /// Custom tone length in seconds
    #[arg(long)]
    pub tone_seconds: Option<f64>,
    /// Custom volume percent, 0-100
    #[arg(long)]
    pub volume: Option<f64>,
    /// Particle count for the live preview
    #[arg(long, default_value_t = 30)]
    pub density: usize,
}

impl EmotionArgs {
    pub fn to_descriptor(&self) -> Result<EmotionDescriptor> {
        let mut emotion = EmotionDescriptor {
            hue: self.hue,
            shape: self.shape.parse()?,
            motion: self.motion,
            rhythm: self.rhythm,
            particle_density: self.density,
            ..EmotionDescriptor::default()
        };

        if emotion.shape == Shape::Custom {
            emotion.custom_shape.enabled = true;
            if let Some(kind) = &self.shape_kind {
                emotion.custom_shape.kind = kind.parse()?;
            }
            if let Some(sides) = &self.sides {
                emotion.custom_shape.sides = parse_sides(sides);
            }
        }

        if let Some(path) = &self.path {
            emotion.custom_motion.enabled = true;
            emotion.custom_motion.path = path.parse()?;
        }

        if let Some(pattern) = &self.pattern {
            emotion.custom_rhythm.enabled = true;
            emotion.custom_rhythm.pattern = pattern.parse()?;
        }
        if let Some(variation) = self.variation {
            emotion.custom_rhythm.variation = variation.min(100);
        }

        let wants_custom_sound = self.waveform.is_some()
            || self.pitch.is_some()
            || self.tone_seconds.is_some()
            || self.volume.is_some();
        if wants_custom_sound {
            emotion.custom_sound.enabled = true;
            if let Some(waveform) = &self.waveform {
                emotion.custom_sound.waveform = waveform.parse()?;
            }
            if let Some(pitch) = self.pitch {
                emotion.custom_sound.pitch = pitch;
            }
            if let Some(seconds) = self.tone_seconds {
                emotion.custom_sound.duration = seconds;
            }
            if let Some(volume) = self.volume {
                emotion.custom_sound.volume = volume;
            }
        }

        emotion.clamp_ranges();
        Ok(emotion)
    }
}

pub async fn handle_contacts(data_dir: Option<PathBuf>) -> Result<()> {
    let config = Config::new(data_dir)?;

    println!(
        "{} · {}",
        config.app_name.cyan().bold(),
        config.tagline.dimmed()
    );
    println!();

    for contact in builtin_contacts() {
        let emotion = contact.emotion_or_neutral();
        let presence = if contact.active {
            "●".green()
        } else {
            "○".dimmed()
        };
        println!(
            "{} {} {}",
            presence,
            avatar_strip(&emotion),
            contact.name.bold()
        );
        println!("    {}", contact.status.dimmed());
        println!(
            "    {} · motion {}/10 · rhythm {:.1}",
            emotion.shape, emotion.motion, emotion.rhythm
        );
    }

    Ok(())
}

// The avatar miniature flattened to one line: five orbiting dots, shaded
// by their momentary alpha
fn avatar_strip(emotion: &EmotionDescriptor) -> String {
    let (r, g, b) = crate::render::hsb_to_rgb(
        emotion.normalized_hue(),
        crate::render::FILL_SATURATION,
        crate::render::FILL_BRIGHTNESS,
    );
    avatar_points(emotion, 1.0)
        .iter()
        .map(|p| {
            let shade = |v: u8| (v as f64 * p.alpha) as u8;
            "●".truecolor(shade(r), shade(g), shade(b)).to_string()
        })
        .collect()
}

pub async fn handle_send(
    contact_name: String,
    emotion: EmotionArgs,
    learn: Option<String>,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let config = Config::new(data_dir)?;
    let contact =
        find_contact(&contact_name).ok_or_else(|| anyhow!("Unknown contact: {}", contact_name))?;

    let mut session = ChatSession::new(contact);
    session.draft = emotion.to_descriptor()?;

    // Learn on send when a name came along, exactly like naming an emotion
    // in the composer
    if let Some(name) = learn {
        let mut book = EmotionBook::new(&config)?;
        if book.learn(&name, &session.draft)? {
            println!("📖 Learned '{}'", name.trim());
        }
    }

    let sent = session.send();
    println!("➤ {} · {}", "you".bold(), sent.time_label());
    render_message_tile(&sent);
    if let Some(tone) = session.tones().active() {
        println!("  🔊 {}", tone);
    }

    println!();
    println!("{}", "…waiting for a reply".dimmed());
    println!();

    if let Some((reply, sync)) = session.await_reply().await {
        println!("◀ {} · {}", session.contact.name.bold(), reply.time_label());
        render_message_tile(&reply);
        if let Some(tone) = session.tones().active() {
            println!("  🔊 {}", tone);
        }

        if let Some(score) = sync {
            println!();
            println!(
                "✨ {} ({:.1} > {:.0})",
                "Understanding achieved".yellow().bold(),
                score,
                SYNC_THRESHOLD
            );
        }
    }

    Ok(())
}

// Settle the tile animation for a few ticks, then draw the frame
fn render_message_tile(message: &Message) {
    let mut system = ParticleSystem::message(message.emotion.clone(), message.pattern_seed());
    let mut renderer: Box<dyn Renderer> = Box::new(TerminalRenderer::message());

    let mut points = system.tick();
    for _ in 0..30 {
        points = system.tick();
    }
    renderer.draw(&points, message.emotion.normalized_hue(), PreviewMode::Live);
}

pub async fn handle_preview(emotion: EmotionArgs, frames: usize, mode: String) -> Result<()> {
    let mode: PreviewMode = mode.parse()?;
    let descriptor = emotion.to_descriptor()?;

    let mut system = ParticleSystem::preview(descriptor.clone(), rand::thread_rng().gen());
    let mut renderer = TerminalRenderer::preview();

    for frame in 0..frames {
        let points = system.tick();
        let rendered = renderer.frame(&points, descriptor.normalized_hue(), mode);
        if frame > 0 {
            // Redraw over the previous frame
            print!("\x1b[{}A", renderer.rows());
        }
        print!("{}", rendered);
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    Ok(())
}

pub async fn handle_sound(emotion: EmotionArgs) -> Result<()> {
    let descriptor = emotion.to_descriptor()?;
    let tone = synthesize(&descriptor);

    println!("{}", "Synthesized tone".cyan().bold());
    println!("  waveform:   {}", tone.waveform);
    println!("  frequency:  {:.1} Hz", tone.frequency);
    match &tone.modulation {
        Some(m) => println!("  modulation: {:.1} Hz wobble, {:.0} Hz depth", m.frequency, m.depth),
        None => println!("  modulation: none"),
    }
    println!("  duration:   {:.2} s", tone.duration);
    println!("  volume:     {:.0}%", tone.volume * 100.0);
    println!(
        "  envelope:   {:.0} ms attack, exponential decay to {}",
        tone.envelope.attack * 1000.0,
        tone.envelope.decay_floor
    );

    Ok(())
}

pub async fn handle_score(contact_a: String, contact_b: String) -> Result<()> {
    let a = find_contact(&contact_a).ok_or_else(|| anyhow!("Unknown contact: {}", contact_a))?;
    let b = find_contact(&contact_b).ok_or_else(|| anyhow!("Unknown contact: {}", contact_b))?;

    let score = SyncScore::compute(&a.emotion_or_neutral(), &b.emotion_or_neutral());

    println!(
        "{} {} × {}",
        "Compatibility".cyan().bold(),
        a.name,
        b.name
    );
    println!("  hue:    {:.1}", score.hue);
    println!("  motion: {:.1}", score.motion);
    println!("  rhythm: {:.1}", score.rhythm);
    println!("  shape:  {:.0}", score.shape);
    println!("  total:  {}", format!("{:.1}", score.total).bold());

    if score.is_sync() {
        println!("✨ {}", "Understanding achieved".yellow().bold());
    } else {
        println!("{}", format!("No sync (needs > {:.0})", SYNC_THRESHOLD).dimmed());
    }

    Ok(())
}

pub async fn handle_learned(data_dir: Option<PathBuf>) -> Result<()> {
    let config = Config::new(data_dir)?;
    let book = EmotionBook::new(&config)?;

    if book.entries().is_empty() {
        println!("No custom emotions learned yet. Create your first!");
        return Ok(());
    }

    println!("{} ({})", "Learned emotions".cyan().bold(), book.entries().len());
    for entry in book.entries() {
        println!(
            "  {} {} : {} · {}/10 · {}",
            hue_swatch(entry.hue),
            entry.name.bold(),
            entry.shape,
            entry.motion,
            entry.created_at.format("%Y-%m-%d")
        );
    }

    Ok(())
}

pub async fn handle_colors(add: Option<String>, data_dir: Option<PathBuf>) -> Result<()> {
    let config = Config::new(data_dir)?;
    let mut palette = Palette::new(&config)?;

    if let Some(hex) = add {
        let entry = palette.add_hex(&hex)?;
        println!("✓ Color added! hue {:.0} · {}", entry.hue, entry.gradient);
    }

    println!("{}", "Palette".cyan().bold());
    for entry in palette.all() {
        println!(
            "  {} hue {:>3.0}  {}",
            hue_swatch(entry.hue),
            entry.hue,
            entry.gradient.dimmed()
        );
    }

    Ok(())
}

pub async fn handle_haptics(pattern: String) -> Result<()> {
    let pattern: HapticPattern = pattern.parse()?;
    let steps = pattern.pattern();

    println!("{} {}", "Haptic pattern".cyan().bold(), pattern);
    for (i, ms) in steps.iter().enumerate() {
        let state = if i % 2 == 0 { "on " } else { "off" };
        let bar = "█".repeat((*ms / 50).max(1) as usize);
        println!("  {} {:>4} ms {}", state, ms, bar);
    }

    Ok(())
}
