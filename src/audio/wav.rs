use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use thiserror::Error;

/// PCM format code in the `fmt ` subchunk. Anything else is compressed.
const WAVE_FORMAT_PCM: u16 = 1;

#[derive(Debug, Error)]
pub enum WavError {
    #[error("not a RIFF file")]
    NotRiff,
    #[error("RIFF container is not WAVE")]
    NotWave,
    #[error("no fmt subchunk before data")]
    MissingFmt,
    #[error("no data subchunk found")]
    MissingData,
    #[error("unsupported audio format code {0} (only PCM)")]
    UnsupportedFormat(u16),
    #[error("unsupported bit depth {0} (only 16-bit)")]
    UnsupportedBitDepth(u16),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Parsed `fmt ` metadata plus the location of the `data` payload.
/// Populated once by [`WavReader::new`]; immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub data_offset: u64,
    pub data_len: u64,
}

impl WavFormat {
    pub fn bytes_per_sample(&self) -> u16 {
        self.bits_per_sample / 8
    }

    /// Bytes per interleaved frame (one sample from every channel).
    pub fn block_align(&self) -> u16 {
        self.channels * self.bytes_per_sample()
    }

    /// Playback length rounded to whole seconds. Returns 0 instead of
    /// dividing by zero on degenerate headers.
    pub fn duration_secs(&self) -> u64 {
        let block_align = self.block_align();
        if self.sample_rate == 0 || block_align == 0 {
            return 0;
        }
        let sample_count = self.data_len as f64 / block_align as f64;
        (sample_count / self.sample_rate as f64 + 0.5) as u64
    }
}

/// Streaming reader over the PCM data region of a RIFF/WAVE file.
///
/// The header is parsed eagerly, the payload lazily: [`read_chunk`] hands out
/// successive slices of the data region and signals end-of-stream with a
/// short (possibly empty) result.
///
/// [`read_chunk`]: WavReader::read_chunk
pub struct WavReader<R> {
    source: R,
    format: WavFormat,
    /// Bytes of the data region consumed so far.
    cursor: u64,
}

impl WavReader<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, WavError> {
        let file = File::open(path)?;
        Self::new(file)
    }
}

impl<R: Read + Seek> WavReader<R> {
    pub fn new(mut source: R) -> Result<Self, WavError> {
        let format = parse_header(&mut source)?;
        source.seek(SeekFrom::Start(format.data_offset))?;
        Ok(Self {
            source,
            format,
            cursor: 0,
        })
    }

    pub fn format(&self) -> &WavFormat {
        &self.format
    }

    /// Reads up to `byte_count` bytes from the data region, clamped to what
    /// remains. A result shorter than requested (including empty) means
    /// end-of-stream; it is not an error.
    pub fn read_chunk(&mut self, byte_count: usize) -> std::io::Result<Vec<u8>> {
        let remaining = self.format.data_len.saturating_sub(self.cursor);
        let want = (byte_count as u64).min(remaining) as usize;
        let mut buf = vec![0u8; want];
        let mut filled = 0;
        while filled < want {
            let n = self.source.read(&mut buf[filled..])?;
            if n == 0 {
                break; // file truncated below its declared data length
            }
            filled += n;
        }
        buf.truncate(filled);
        self.cursor += filled as u64;
        Ok(buf)
    }
}

fn parse_header<R: Read + Seek>(source: &mut R) -> Result<WavFormat, WavError> {
    let mut tag = [0u8; 4];
    source.read_exact(&mut tag)?;
    if &tag != b"RIFF" {
        return Err(WavError::NotRiff);
    }
    let _chunk_size = read_u32(source)?;
    source.read_exact(&mut tag)?;
    if &tag != b"WAVE" {
        return Err(WavError::NotWave);
    }

    let mut fmt: Option<(u16, u32, u16)> = None; // (channels, rate, bits)
    loop {
        match source.read_exact(&mut tag) {
            Ok(()) => {}
            // ran out of subchunks, even mid-tag
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Err(if fmt.is_none() {
                    WavError::MissingFmt
                } else {
                    WavError::MissingData
                });
            }
            Err(e) => return Err(e.into()),
        }
        let size = read_u32(source)?;
        match &tag {
            b"fmt " => {
                let audio_format = read_u16(source)?;
                if audio_format != WAVE_FORMAT_PCM {
                    return Err(WavError::UnsupportedFormat(audio_format));
                }
                let channels = read_u16(source)?;
                let sample_rate = read_u32(source)?;
                let _byte_rate = read_u32(source)?;
                let _block_align = read_u16(source)?;
                let bits_per_sample = read_u16(source)?;
                if bits_per_sample != 16 {
                    return Err(WavError::UnsupportedBitDepth(bits_per_sample));
                }
                // extensible headers declare more than the canonical 16 bytes
                if size > 16 {
                    source.seek(SeekFrom::Current((size - 16) as i64))?;
                }
                fmt = Some((channels, sample_rate, bits_per_sample));
            }
            b"data" => {
                let (channels, sample_rate, bits_per_sample) =
                    fmt.ok_or(WavError::MissingFmt)?;
                let data_offset = source.stream_position()?;
                return Ok(WavFormat {
                    channels,
                    sample_rate,
                    bits_per_sample,
                    data_offset,
                    data_len: size as u64,
                });
            }
            _ => {
                // LIST, fact, cue... skip by declared size
                source.seek(SeekFrom::Current(size as i64))?;
            }
        }
    }
}

fn read_u16<R: Read>(source: &mut R) -> std::io::Result<u16> {
    let mut buf = [0u8; 2];
    source.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

fn read_u32<R: Read>(source: &mut R) -> std::io::Result<u32> {
    let mut buf = [0u8; 4];
    source.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Minimal RIFF/WAVE builder for header tests.
    fn wav_bytes(
        channels: u16,
        sample_rate: u32,
        bits_per_sample: u16,
        data: &[u8],
    ) -> Vec<u8> {
        let mut out = Vec::new();
        let block_align = channels * bits_per_sample / 8;
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36u32 + data.len() as u32).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&channels.to_le_bytes());
        out.extend_from_slice(&sample_rate.to_le_bytes());
        out.extend_from_slice(&(sample_rate * block_align as u32).to_le_bytes());
        out.extend_from_slice(&block_align.to_le_bytes());
        out.extend_from_slice(&bits_per_sample.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(data);
        out
    }

    fn reader(bytes: Vec<u8>) -> Result<WavReader<Cursor<Vec<u8>>>, WavError> {
        WavReader::new(Cursor::new(bytes))
    }

    #[test]
    fn parses_canonical_header() {
        let r = reader(wav_bytes(2, 44100, 16, &[0u8; 16])).unwrap();
        let f = r.format();
        assert_eq!(f.channels, 2);
        assert_eq!(f.sample_rate, 44100);
        assert_eq!(f.bits_per_sample, 16);
        assert_eq!(f.data_offset, 44);
        assert_eq!(f.data_len, 16);
    }

    #[test]
    fn rejects_missing_riff_tag() {
        let mut bytes = wav_bytes(1, 44100, 16, &[]);
        bytes[0..4].copy_from_slice(b"JUNK");
        assert!(matches!(reader(bytes), Err(WavError::NotRiff)));
    }

    #[test]
    fn rejects_non_wave_container() {
        let mut bytes = wav_bytes(1, 44100, 16, &[]);
        bytes[8..12].copy_from_slice(b"AVI ");
        assert!(matches!(reader(bytes), Err(WavError::NotWave)));
    }

    #[test]
    fn rejects_non_pcm_format() {
        let mut bytes = wav_bytes(1, 44100, 16, &[]);
        bytes[20..22].copy_from_slice(&3u16.to_le_bytes()); // IEEE float
        assert!(matches!(reader(bytes), Err(WavError::UnsupportedFormat(3))));
    }

    #[test]
    fn rejects_unsupported_bit_depth() {
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&36u32.to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&44100u32.to_le_bytes());
        out.extend_from_slice(&(44100u32 * 3).to_le_bytes());
        out.extend_from_slice(&3u16.to_le_bytes());
        out.extend_from_slice(&24u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&0u32.to_le_bytes());
        assert!(matches!(
            reader(out),
            Err(WavError::UnsupportedBitDepth(24))
        ));
    }

    #[test]
    fn skips_oversized_fmt_and_foreign_subchunks() {
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&100u32.to_le_bytes());
        out.extend_from_slice(b"WAVE");
        // fmt with 2 trailing extension bytes
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&18u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&8000u32.to_le_bytes());
        out.extend_from_slice(&16000u32.to_le_bytes());
        out.extend_from_slice(&2u16.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(&[0u8; 2]);
        // a LIST chunk between fmt and data
        out.extend_from_slice(b"LIST");
        out.extend_from_slice(&6u32.to_le_bytes());
        out.extend_from_slice(&[0u8; 6]);
        out.extend_from_slice(b"data");
        out.extend_from_slice(&4u32.to_le_bytes());
        out.extend_from_slice(&[1, 2, 3, 4]);

        let mut r = reader(out).unwrap();
        assert_eq!(r.format().sample_rate, 8000);
        assert_eq!(r.format().data_len, 4);
        assert_eq!(r.read_chunk(8).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn missing_data_subchunk_is_an_error() {
        let full = wav_bytes(1, 44100, 16, &[]);
        let truncated = full[..36].to_vec(); // header ends right after fmt
        assert!(matches!(reader(truncated), Err(WavError::MissingData)));
    }

    #[test]
    fn partial_trailing_tag_reports_missing_data() {
        let full = wav_bytes(1, 44100, 16, &[]);
        let truncated = full[..38].to_vec(); // two stray bytes after fmt
        assert!(matches!(reader(truncated), Err(WavError::MissingData)));
    }

    #[test]
    fn read_chunk_clamps_to_data_region_and_signals_eof() {
        let mut r = reader(wav_bytes(1, 44100, 16, &[9u8; 10])).unwrap();
        assert_eq!(r.read_chunk(6).unwrap().len(), 6);
        // short read at the tail, then empty forever after
        assert_eq!(r.read_chunk(6).unwrap().len(), 4);
        assert!(r.read_chunk(6).unwrap().is_empty());
    }

    #[test]
    fn duration_rounds_to_nearest_second() {
        let f = WavFormat {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 16,
            data_offset: 44,
            data_len: 176_400,
        };
        assert_eq!(f.block_align(), 4);
        assert_eq!(f.duration_secs(), 1);
    }

    #[test]
    fn duration_fails_closed_on_zero_rate() {
        let f = WavFormat {
            channels: 0,
            sample_rate: 0,
            bits_per_sample: 16,
            data_offset: 44,
            data_len: 176_400,
        };
        assert_eq!(f.duration_secs(), 0);
    }
}
