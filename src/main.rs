mod audio;
mod cli;
mod config;
mod playback;
mod scheduler;

use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;

use audio::wav::WavReader;
use cli::Cli;
use playback::mixer;
use playback::sink::{pcm_stream_args, PlaybackSink};
use scheduler::{FrameScheduler, TickOutput};

/// Bars drawn on the terminal meter; bins are averaged down to this many.
const METER_BARS: usize = 32;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Load config: explicit --config path, or auto-detect waveq.toml / global config
    let config_path = cli.config.clone().or_else(|| {
        let local = std::path::PathBuf::from("waveq.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(home) = dirs::home_dir() {
            let xdg = home.join(".config").join("waveq").join("config.toml");
            if xdg.exists() {
                return Some(xdg);
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("waveq").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    });
    let mut mixer_cfg = config::MixerConfig::default();
    if let Some(ref path) = config_path {
        if let Some(cfg) = config::load_config(path) {
            log::info!("Loaded config from {}", path.display());
            // Merge: config values apply only when CLI is at its default
            if cli.fps == 10 { cli.fps = cfg.analysis.fps; }
            if cli.fft_size == 1024 { cli.fft_size = cfg.analysis.fft_size; }
            if cli.gain == 50.0 { cli.gain = cfg.analysis.gain; }
            if cli.player == "aplay" { cli.player = cfg.playback.player; }
            if cli.player_args.is_empty() {
                cli.player_args = cfg.playback.player_args;
            }
            if cli.volume.is_none() {
                cli.volume = cfg.mixer.volume;
            }
            mixer_cfg = cfg.mixer;
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    if !cli.fft_size.is_power_of_two() {
        anyhow::bail!("--fft-size must be a power of two, got {}", cli.fft_size);
    }
    if cli.fps == 0 || cli.fps > 1000 {
        anyhow::bail!("--fps must be in 1..=1000, got {}", cli.fps);
    }

    log::info!("waveq - real-time WAV equalizer");
    log::info!("Input: {}", cli.input.display());

    let reader = WavReader::open(&cli.input)
        .with_context(|| format!("Failed to open {}", cli.input.display()))?;
    let format = *reader.format();
    let duration = format.duration_secs();
    log::info!(
        "{} ch, {} Hz, {}-bit, {:02}:{:02}",
        format.channels,
        format.sample_rate,
        format.bits_per_sample,
        duration / 60,
        duration % 60
    );

    // Pre-roll: device volume, then the playback process
    if let Some(volume) = cli.volume {
        mixer::set_volume(&mixer_cfg.command, mixer_cfg.card, &mixer_cfg.control, volume);
    }

    let mut sink = if cli.no_playback {
        None
    } else {
        let mut args = cli.player_args.clone();
        args.extend(pcm_stream_args(&format));
        Some(PlaybackSink::spawn(&cli.player, &args)?)
    };

    let mut scheduler = FrameScheduler::new(reader, cli.fps, cli.fft_size);
    log::info!(
        "Streaming at {} fps, {} samples/tick, FFT {} ({} bars)",
        cli.fps,
        scheduler.samples_per_tick(),
        cli.fft_size,
        scheduler.bin_count()
    );

    let tick = scheduler.tick_interval();
    let mut deadline = Instant::now() + tick;

    loop {
        match scheduler.step() {
            Ok(TickOutput::Frame { pcm, levels }) => {
                if let Some(mut active) = sink.take() {
                    // Fire-and-forget; a dead player downgrades to analysis-only
                    match active.write_chunk(&pcm) {
                        Ok(()) => sink = Some(active),
                        Err(err) => {
                            log::warn!("Playback lost, continuing analysis-only: {err:#}");
                            let _ = active.stop(Duration::from_millis(500));
                        }
                    }
                }
                if let Some(levels) = levels {
                    draw_meter(&levels, cli.gain);
                }
            }
            Ok(TickOutput::Finished) => break,
            Err(err) => {
                scheduler.stop();
                if let Some(active) = sink.take() {
                    let _ = active.stop(Duration::from_millis(500));
                }
                return Err(err).context("Tick read failed");
            }
        }

        // One tick at a time: sleep to the deadline, or re-anchor after an
        // overrun instead of letting ticks pile up
        let now = Instant::now();
        if now < deadline {
            std::thread::sleep(deadline - now);
            deadline += tick;
        } else {
            let missed = (now - deadline).as_millis() / tick.as_millis().max(1) + 1;
            log::debug!("Tick overran its interval, skipping {missed} slot(s)");
            deadline = now + tick;
        }
    }

    println!();
    log::info!("End of stream");
    if let Some(active) = sink.take() {
        active.finish()?;
    }
    Ok(())
}

/// Single-line terminal equalizer. The gain clamp is display scaling only;
/// raw levels stay untouched upstream.
fn draw_meter(levels: &[f32], gain: f32) {
    const GLYPHS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

    let per_bar = (levels.len() / METER_BARS).max(1);
    let mut line = String::with_capacity(METER_BARS * 4 + 8);
    line.push('\r');
    line.push('[');
    for bar in levels.chunks(per_bar).take(METER_BARS) {
        let avg = bar.iter().sum::<f32>() / bar.len() as f32;
        let scaled = (avg * gain).min(1.0);
        let idx = (scaled * (GLYPHS.len() - 1) as f32).round() as usize;
        line.push(GLYPHS[idx]);
    }
    line.push(']');
    print!("{line}");
    let _ = std::io::stdout().flush();
}
