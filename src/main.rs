// main.rs
mod cli;
mod compat;
mod config;
mod contacts;
mod conversation;
mod emotion;
mod haptics;
mod learned;
mod motion;
mod palette;
mod particles;
mod render;
mod session;
mod synth;

use clap::Parser;
use cli::{Args, Commands};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    match args.command {
        Commands::Contacts => {
            if let Err(e) = cli::handle_contacts(args.data_dir).await {
                eprintln!("❌ Contact list error: {}", e);
            }
        }
        Commands::Send {
            contact,
            emotion,
            learn,
        } => {
            if let Err(e) = cli::handle_send(contact, emotion, learn, args.data_dir).await {
                eprintln!("❌ Send error: {}", e);
            }
        }
        Commands::Preview {
            emotion,
            frames,
            mode,
        } => {
            if let Err(e) = cli::handle_preview(emotion, frames, mode).await {
                eprintln!("❌ Preview error: {}", e);
            }
        }
        Commands::Sound { emotion } => {
            if let Err(e) = cli::handle_sound(emotion).await {
                eprintln!("❌ Sound error: {}", e);
            }
        }
        Commands::Score {
            contact_a,
            contact_b,
        } => {
            if let Err(e) = cli::handle_score(contact_a, contact_b).await {
                eprintln!("❌ Score error: {}", e);
            }
        }
        Commands::Learned => {
            if let Err(e) = cli::handle_learned(args.data_dir).await {
                eprintln!("❌ Learned emotions error: {}", e);
            }
        }
        Commands::Colors { add } => {
            if let Err(e) = cli::handle_colors(add, args.data_dir).await {
                eprintln!("❌ Palette error: {}", e);
            }
        }
        Commands::Haptics { pattern } => {
            if let Err(e) = cli::handle_haptics(pattern).await {
                eprintln!("❌ Haptics error: {}", e);
            }
        }
    }
}
