/// Extracts normalized mono samples from interleaved 16-bit LE PCM bytes.
///
/// Only the first channel of each frame feeds the analysis; the remaining
/// channels still reach the playback sink verbatim. Scaling is `/ 32768.0`,
/// giving roughly [-1, 1) with no further clamping.
pub fn extract_mono(chunk: &[u8], channels: u16) -> Vec<f32> {
    const BYTES_PER_SAMPLE: usize = 2;
    let frame_bytes = channels as usize * BYTES_PER_SAMPLE;
    if frame_bytes == 0 {
        return Vec::new();
    }
    chunk
        .chunks_exact(frame_bytes)
        .map(|frame| {
            let sample = i16::from_le_bytes([frame[0], frame[1]]);
            sample as f32 / 32768.0
        })
        .collect()
}
