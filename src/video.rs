use std::path::Path;
use std::process::Command;

use tracing::{error, info};

/// Composite a narration track over the stock background clip with ffmpeg.
/// The background loops as long as the audio runs; output is 1080x1920
/// portrait, libx264 + aac, cut to the shorter stream.
pub fn compose(background: &str, audio: &Path, out: &str) -> anyhow::Result<()> {
    info!("Merging {} over {} into {}", audio.display(), background, out);

    let status = Command::new("ffmpeg")
        .args(["-y", "-stream_loop", "-1", "-i", background, "-i"])
        .arg(audio)
        .args([
            "-vf",
            "scale=1080:1920,setsar=1",
            "-map",
            "0:v:0",
            "-map",
            "1:a:0",
            "-c:v",
            "libx264",
            "-c:a",
            "aac",
            "-r",
            "60",
            "-shortest",
            out,
        ])
        .status()?;

    if !status.success() {
        error!("ffmpeg failed to produce video {}", out);
        anyhow::bail!("ffmpeg failed to produce video {}", out);
    }
    info!("Video written to {}", out);
    Ok(())
}
