use std::fs;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

mod args;
mod script;
mod topic;
mod tts;
mod upload;
mod video;

use args::Args;
use tts::{SynthConfig, Synthesizer};
use upload::UploadClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info") // set to "debug" for more logs
        .init();

    info!("Starting topic shorts pipeline");

    let args = Args::parse();

    if !Path::new(&args.background).exists() {
        error!("Background video not found: {}", args.background);
        std::process::exit(1);
    }
    info!("Background video found: {}", args.background);

    let topic = args.topic.clone().unwrap_or_else(topic::pick_topic);
    info!("Topic: {}", topic);

    let scripts = script::build_scripts(&topic);

    let work_dir = &args.work_dir;
    if Path::new(work_dir).exists() {
        info!("Removing existing work dir '{}'", work_dir);
        fs::remove_dir_all(work_dir)?;
    }
    fs::create_dir_all(work_dir)?;
    info!("Created work directory '{}'", work_dir);

    let synth = Synthesizer::new(SynthConfig {
        voice: args.voice.clone(),
        ..SynthConfig::default()
    });

    // Synthesis failure here is fatal: nothing downstream can run without
    // the narration tracks.
    let short_audio = synth
        .narrate(&scripts.short, &format!("{}/short", work_dir))
        .await?;
    let long_audio = synth
        .narrate(&scripts.long, &format!("{}/long", work_dir))
        .await?;

    let short_video = format!("{}/short.mp4", work_dir);
    let long_video = format!("{}/long.mp4", work_dir);
    video::compose(&args.background, &short_audio, &short_video)?;
    video::compose(&args.background, &long_audio, &long_video)?;

    if args.skip_upload {
        info!("Skipping upload; videos left in '{}'", work_dir);
        return Ok(());
    }

    let token = std::env::var("YOUTUBE_ACCESS_TOKEN")
        .context("YOUTUBE_ACCESS_TOKEN is not set; cannot upload")?;
    let client = UploadClient::new(token);

    for (path, label) in [(&short_video, "Shorts"), (&long_video, "Full")] {
        let title = format!("{} | {}", topic, label);
        let id = client
            .upload(Path::new(path), &title, &args.category)
            .await?;
        info!("Uploaded {} as video id {}", path, id);
    }

    info!("Process complete.");
    Ok(())
}
