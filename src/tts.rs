use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use regex::Regex;
use tempfile::NamedTempFile;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

/// Policy knobs for the synthesis retry loop. The defaults match what the
/// pipeline has always shipped with.
#[derive(Clone, Debug)]
pub struct SynthConfig {
    pub voice: String,
    pub max_attempts: u32,
    pub attempt_timeout: Duration,
    pub retry_delay: Duration,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            voice: "en-US-ChristopherNeural".to_string(),
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(180),
            retry_delay: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    /// The retry budget ran out without a single clean engine run.
    #[error("speech synthesis failed after {attempts} attempts")]
    Exhausted { attempts: u32 },
    /// Staging the script text to disk failed. Not an engine problem, so it
    /// is not retried.
    #[error("could not stage script text for synthesis")]
    Stage(#[from] std::io::Error),
}

enum AttemptOutcome {
    Success,
    TransientFailure(String),
}

#[async_trait]
pub trait SpeechEngine {
    /// Read `script`, speak it with `voice`, write the audio to `output`.
    async fn synthesize(&self, voice: &str, script: &Path, output: &Path) -> anyhow::Result<()>;
}

/// Production engine: shells out to `edge-tts`.
pub struct EdgeTts;

#[async_trait]
impl SpeechEngine for EdgeTts {
    async fn synthesize(&self, voice: &str, script: &Path, output: &Path) -> anyhow::Result<()> {
        let status = tokio::process::Command::new("edge-tts")
            .arg("--voice")
            .arg(voice)
            .arg("--file")
            .arg(script)
            .arg("--write-media")
            .arg(output)
            .status()
            .await
            .context("failed to spawn edge-tts")?;
        if !status.success() {
            anyhow::bail!("edge-tts exited with {}", status);
        }
        Ok(())
    }
}

pub struct Synthesizer<E> {
    engine: E,
    config: SynthConfig,
}

impl Synthesizer<EdgeTts> {
    pub fn new(config: SynthConfig) -> Self {
        Self::with_engine(EdgeTts, config)
    }
}

impl<E: SpeechEngine + Sync> Synthesizer<E> {
    pub fn with_engine(engine: E, config: SynthConfig) -> Self {
        Self { engine, config }
    }

    /// Narrate `text` into `{name}.mp3`. The sanitized script lives in a
    /// temp file that is removed when the guard drops, success or not.
    ///
    /// Every failed attempt logs its attempt number and waits
    /// `retry_delay` before the next one; only exhaustion of the whole
    /// budget reaches the caller.
    pub async fn narrate(&self, text: &str, name: &str) -> Result<PathBuf, SynthesisError> {
        let clean = sanitize(text);
        debug!("Sanitized script for '{}': {} chars", name, clean.len());

        let script = NamedTempFile::new()?;
        std::fs::write(script.path(), clean.as_bytes())?;

        let artifact = PathBuf::from(format!("{}.mp3", name));

        for attempt in 1..=self.config.max_attempts {
            match self.run_attempt(script.path(), &artifact).await {
                AttemptOutcome::Success => {
                    info!(
                        "Synthesized {} on attempt {}/{}",
                        artifact.display(),
                        attempt,
                        self.config.max_attempts
                    );
                    return Ok(artifact);
                }
                AttemptOutcome::TransientFailure(cause) => {
                    warn!(
                        "Synthesis attempt {}/{} failed: {}",
                        attempt, self.config.max_attempts, cause
                    );
                    sleep(self.config.retry_delay).await;
                }
            }
        }

        Err(SynthesisError::Exhausted {
            attempts: self.config.max_attempts,
        })
    }

    async fn run_attempt(&self, script: &Path, artifact: &Path) -> AttemptOutcome {
        let call = self.engine.synthesize(&self.config.voice, script, artifact);
        match timeout(self.config.attempt_timeout, call).await {
            Ok(Ok(())) => AttemptOutcome::Success,
            Ok(Err(e)) => AttemptOutcome::TransientFailure(format!("{:#}", e)),
            Err(_) => AttemptOutcome::TransientFailure(format!(
                "engine call exceeded {:?}",
                self.config.attempt_timeout
            )),
        }
    }
}

/// Strip everything the synthesis engine chokes on: anything outside
/// letters, digits, `. , ! ?` and whitespace. Trims the ends. Empty input
/// stays empty.
pub fn sanitize(text: &str) -> String {
    let re = Regex::new(r"[^\p{L}\p{N}.,!?\s]+").unwrap();
    re.replace_all(text, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    /// Fails the first `fail_first` calls, then succeeds. Never touches the
    /// filesystem.
    struct FlakyEngine {
        calls: Arc<AtomicU32>,
        fail_first: u32,
    }

    #[async_trait]
    impl SpeechEngine for FlakyEngine {
        async fn synthesize(
            &self,
            _voice: &str,
            _script: &Path,
            _output: &Path,
        ) -> anyhow::Result<()> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.fail_first {
                anyhow::bail!("engine unavailable");
            }
            Ok(())
        }
    }

    /// Hangs longer than any timeout the tests configure.
    struct StuckEngine {
        calls: Arc<AtomicU32>,
    }

    #[async_trait]
    impl SpeechEngine for StuckEngine {
        async fn synthesize(
            &self,
            _voice: &str,
            _script: &Path,
            _output: &Path,
        ) -> anyhow::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            sleep(Duration::from_secs(60)).await;
            Ok(())
        }
    }

    fn quick_config() -> SynthConfig {
        SynthConfig {
            attempt_timeout: Duration::from_millis(100),
            retry_delay: Duration::from_millis(20),
            ..SynthConfig::default()
        }
    }

    #[test]
    fn sanitize_keeps_only_allowed_characters() {
        let out = sanitize("Hello <world> & #friends! (ok?)");
        for c in out.chars() {
            assert!(
                c.is_alphanumeric() || c.is_whitespace() || ".,!?".contains(c),
                "disallowed char {:?} survived",
                c
            );
        }
        assert_eq!(out, "Hello world  friends! ok?");
    }

    #[test]
    fn sanitize_is_idempotent() {
        let once = sanitize("  déjà-vu: 100% [true]!?  ");
        assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn sanitize_trims_and_passes_empty_through() {
        assert_eq!(sanitize("  hi there  "), "hi there");
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("@#$%"), "");
    }

    #[tokio::test]
    async fn exhausts_budget_after_three_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let engine = FlakyEngine {
            calls: calls.clone(),
            fail_first: u32::MAX,
        };
        let config = quick_config();
        let delay = config.retry_delay;
        let synth = Synthesizer::with_engine(engine, config);

        let start = Instant::now();
        let err = synth.narrate("always fails", "doomed").await.unwrap_err();
        let elapsed = start.elapsed();

        assert!(matches!(err, SynthesisError::Exhausted { attempts: 3 }));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(elapsed >= delay * 2, "elapsed {:?} too short", elapsed);
    }

    #[tokio::test]
    async fn second_attempt_success_short_circuits() {
        let calls = Arc::new(AtomicU32::new(0));
        let engine = FlakyEngine {
            calls: calls.clone(),
            fail_first: 1,
        };
        let synth = Synthesizer::with_engine(engine, quick_config());

        let artifact = synth.narrate("flaky once", "take2").await.unwrap();
        assert_eq!(artifact, PathBuf::from("take2.mp3"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn immediate_success_makes_one_attempt_without_delay() {
        let calls = Arc::new(AtomicU32::new(0));
        let engine = FlakyEngine {
            calls: calls.clone(),
            fail_first: 0,
        };
        let config = quick_config();
        let delay = config.retry_delay;
        let synth = Synthesizer::with_engine(engine, config);

        let start = Instant::now();
        synth.narrate("first try", "lucky").await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(start.elapsed() < delay);
    }

    #[tokio::test]
    async fn artifact_name_follows_caller_supplied_base() {
        let engine = FlakyEngine {
            calls: Arc::new(AtomicU32::new(0)),
            fail_first: 0,
        };
        let synth = Synthesizer::with_engine(engine, quick_config());

        let artifact = synth.narrate("any text at all", "short").await.unwrap();
        assert_eq!(artifact, PathBuf::from("short.mp3"));
    }

    #[tokio::test]
    async fn timeout_counts_as_a_failed_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let engine = StuckEngine {
            calls: calls.clone(),
        };
        let config = SynthConfig {
            max_attempts: 2,
            ..quick_config()
        };
        let synth = Synthesizer::with_engine(engine, config);

        let err = synth.narrate("too slow", "stuck").await.unwrap_err();
        assert!(matches!(err, SynthesisError::Exhausted { attempts: 2 }));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
