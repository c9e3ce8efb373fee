use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub mixer: MixerConfig,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_fft_size")]
    pub fft_size: usize,
    #[serde(default = "default_gain")]
    pub gain: f32,
}

#[derive(Debug, Deserialize)]
pub struct PlaybackConfig {
    #[serde(default = "default_player")]
    pub player: String,
    #[serde(default)]
    pub player_args: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct MixerConfig {
    #[serde(default = "default_mixer")]
    pub command: String,
    #[serde(default)]
    pub card: u32,
    #[serde(default = "default_control")]
    pub control: String,
    #[serde(default)]
    pub volume: Option<u8>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            fft_size: default_fft_size(),
            gain: default_gain(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            player: default_player(),
            player_args: Vec::new(),
        }
    }
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            command: default_mixer(),
            card: 0,
            control: default_control(),
            volume: None,
        }
    }
}

fn default_fps() -> u32 { 10 }
fn default_fft_size() -> usize { 1024 }
fn default_gain() -> f32 { 50.0 }
fn default_player() -> String { "aplay".into() }
fn default_mixer() -> String { "amixer".into() }
fn default_control() -> String { "numid=1".into() }

pub fn load_config(path: &PathBuf) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.analysis.fps, 10);
        assert_eq!(cfg.analysis.fft_size, 1024);
        assert_eq!(cfg.playback.player, "aplay");
        assert_eq!(cfg.mixer.control, "numid=1");
        assert!(cfg.mixer.volume.is_none());
    }

    #[test]
    fn partial_sections_fill_in_missing_fields() {
        let cfg: Config = toml::from_str(
            r#"
            [analysis]
            fps = 25

            [playback]
            player = "pw-play"
            player_args = ["--target", "0"]

            [mixer]
            volume = 80
            "#,
        )
        .unwrap();
        assert_eq!(cfg.analysis.fps, 25);
        assert_eq!(cfg.analysis.gain, 50.0);
        assert_eq!(cfg.playback.player, "pw-play");
        assert_eq!(cfg.playback.player_args, vec!["--target", "0"]);
        assert_eq!(cfg.mixer.volume, Some(80));
        assert_eq!(cfg.mixer.card, 0);
    }
}
