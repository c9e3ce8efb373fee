use std::process::Command;

/// Sets the device volume through an external mixer utility (amixer-style
/// `cset`) before playback starts. Mixer failures are logged, not fatal:
/// playback proceeds at whatever level the device is already at.
pub fn set_volume(mixer: &str, card: u32, control: &str, percent: u8) {
    let percent = percent.min(100);
    let status = Command::new(mixer)
        .args(["-c", &card.to_string()])
        .args(["cset", control, &format!("{percent}%")])
        .status();

    match status {
        Ok(status) if status.success() => {
            log::info!("Mixer volume set to {percent}% via {mixer}");
        }
        Ok(status) => {
            log::warn!("{mixer} exited with {status}; volume unchanged");
        }
        Err(err) => {
            log::warn!("Failed to run {mixer}: {err}; volume unchanged");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_mixer_does_not_panic() {
        set_volume("definitely-not-a-mixer-7c1b", 0, "numid=1", 80);
    }

    #[test]
    fn percent_is_clamped() {
        // `true` ignores its arguments and exits 0
        set_volume("true", 0, "numid=1", 200);
    }
}
