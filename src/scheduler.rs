use std::io::{Read, Seek};
use std::time::Duration;

use crate::audio::pcm::extract_mono;
use crate::audio::spectrum::SpectrumAnalyzer;
use crate::audio::wav::WavReader;
use crate::audio::window::AnalysisWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No open stream.
    Idle,
    /// Timer active, cursor advancing.
    Streaming,
    /// Cursor exhausted or explicitly stopped.
    Finished,
}

/// Everything one tick produces. The step itself does no I/O beyond the
/// source read; writing `pcm` to the playback sink and presenting `levels`
/// are the driver's side effects.
#[derive(Debug)]
pub enum TickOutput {
    Frame {
        /// Raw PCM bytes read this tick, forwarded verbatim to playback.
        pcm: Vec<u8>,
        /// Fresh magnitude levels when the window was full this tick.
        levels: Option<Vec<f32>>,
    },
    /// Short or empty read: end of stream, the scheduler is now Finished.
    Finished,
}

/// Drives the per-tick pipeline: read a chunk sized to the target frame
/// rate, feed the analysis window, recompute the spectrum once the window
/// is full. Owns the cursor, window, and levels exclusively; a tick either
/// applies completely or the stream is treated as finished.
pub struct FrameScheduler<R> {
    reader: WavReader<R>,
    window: AnalysisWindow,
    analyzer: SpectrumAnalyzer,
    samples_per_tick: usize,
    tick_interval: Duration,
    state: SchedulerState,
}

impl<R: Read + Seek> FrameScheduler<R> {
    pub fn new(reader: WavReader<R>, fps: u32, fft_size: usize) -> Self {
        let format = reader.format();
        // at least one sample per tick so the cursor always advances and a
        // zero-byte read stays an end-of-stream signal
        let samples_per_tick = (format.sample_rate / fps.max(1)).max(1) as usize;
        Self {
            reader,
            window: AnalysisWindow::new(fft_size),
            analyzer: SpectrumAnalyzer::new(fft_size),
            samples_per_tick,
            tick_interval: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            state: SchedulerState::Idle,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn samples_per_tick(&self) -> usize {
        self.samples_per_tick
    }

    pub fn bin_count(&self) -> usize {
        self.analyzer.bin_count()
    }

    /// Runs one tick. The first call promotes Idle to Streaming; once
    /// Finished it keeps returning [`TickOutput::Finished`].
    pub fn step(&mut self) -> std::io::Result<TickOutput> {
        match self.state {
            SchedulerState::Idle => self.state = SchedulerState::Streaming,
            SchedulerState::Streaming => {}
            SchedulerState::Finished => return Ok(TickOutput::Finished),
        }

        let format = *self.reader.format();
        let chunk_bytes =
            self.samples_per_tick * format.bytes_per_sample() as usize * format.channels as usize;
        let pcm = self.reader.read_chunk(chunk_bytes)?;

        if pcm.len() < chunk_bytes {
            self.state = SchedulerState::Finished;
            return Ok(TickOutput::Finished);
        }

        for sample in extract_mono(&pcm, format.channels) {
            self.window.push(sample);
        }

        let levels = if self.window.is_full() {
            Some(self.analyzer.levels(&self.window.snapshot()))
        } else {
            None
        };

        Ok(TickOutput::Frame { pcm, levels })
    }

    /// Explicit stop: no further ticks produce frames.
    pub fn stop(&mut self) {
        self.state = SchedulerState::Finished;
    }
}
