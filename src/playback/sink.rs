use std::io::Write;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::audio::wav::WavFormat;

/// External playback process fed raw PCM over stdin. Writing the exact
/// bytes read per scheduler tick keeps the audible output aligned with the
/// visualized frame.
pub struct PlaybackSink {
    child: Child,
}

/// aplay-style arguments describing the raw stream, so the player can
/// interpret stdin without a container header.
pub fn pcm_stream_args(format: &WavFormat) -> Vec<String> {
    vec![
        "-f".into(),
        "S16_LE".into(),
        "-c".into(),
        format.channels.to_string(),
        "-r".into(),
        format.sample_rate.to_string(),
    ]
}

impl PlaybackSink {
    pub fn spawn(player: &str, args: &[String]) -> Result<Self> {
        let child = Command::new(player)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to spawn player '{player}'. Is it installed?"))?;

        log::info!("Playback started: {player} {}", args.join(" "));

        Ok(Self { child })
    }

    /// Fire-and-forget write of one tick's PCM bytes. No acknowledgment is
    /// awaited; a dead consumer surfaces as a write error on a later tick.
    pub fn write_chunk(&mut self, pcm: &[u8]) -> Result<()> {
        let stdin = self
            .child
            .stdin
            .as_mut()
            .context("player stdin not available")?;
        stdin
            .write_all(pcm)
            .context("Failed to write PCM chunk to player")?;
        Ok(())
    }

    /// Signals end-of-input by closing stdin, then waits for the player to
    /// drain its buffer and exit.
    pub fn finish(mut self) -> Result<()> {
        drop(self.child.stdin.take());
        let status = self.child.wait().context("Failed to wait for player")?;
        if !status.success() {
            log::warn!("player exited with {status}");
        }
        Ok(())
    }

    /// Forced stop: close stdin, give the player a bounded grace period,
    /// then kill it.
    pub fn stop(mut self, grace: Duration) -> Result<()> {
        drop(self.child.stdin.take());
        let deadline = Instant::now() + grace;
        loop {
            if self.child.try_wait().context("Failed to poll player")?.is_some() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                self.child.kill().context("Failed to kill player")?;
                self.child.wait().context("Failed to reap player")?;
                return Ok(());
            }
            thread::sleep(Duration::from_millis(10));
        }
    }
}
