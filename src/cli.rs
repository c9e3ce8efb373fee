use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "waveq", about = "Real-time WAV equalizer with synchronized external playback")]
pub struct Cli {
    /// Input WAV file (16-bit linear PCM)
    pub input: PathBuf,

    /// Visual frames per second (one PCM chunk read per frame)
    #[arg(long, default_value_t = 10)]
    pub fps: u32,

    /// FFT window size in samples (power of two)
    #[arg(long, default_value_t = 1024)]
    pub fft_size: usize,

    /// Display gain applied to bar levels before clamping to 1.0
    #[arg(long, default_value_t = 50.0)]
    pub gain: f32,

    /// Playback command fed raw PCM on stdin
    #[arg(long, default_value = "aplay")]
    pub player: String,

    /// Extra arguments for the player (comma-separated, e.g. -Dhw:0,0)
    #[arg(long, value_delimiter = ',')]
    pub player_args: Vec<String>,

    /// Device volume percent set via the mixer utility before playback
    #[arg(long)]
    pub volume: Option<u8>,

    /// Analyze without spawning the playback process
    #[arg(long)]
    pub no_playback: bool,

    /// Config file path (default: waveq.toml or XDG config)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
