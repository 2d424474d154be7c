use std::cell::Cell;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};

use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{SampleRate, StreamConfig};

use crate::audio::{AudioDevice, SoundBuffer};
use crate::system::{Error, Result};

/// Playback state of a [`Sound`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundStatus {
    Stopped,
    Paused,
    Playing,
}

/// State shared with the audio callback
struct SoundControl {
    /// Next sample index to play
    position: AtomicUsize,
    looping: AtomicBool,
    /// Volume percentage as f32 bits
    volume: AtomicU32,
    /// Set by the callback when the end of the buffer is reached
    finished: AtomicBool,
}

impl SoundControl {
    /// A set finished flag turns a stored `Playing` into `Stopped`
    fn fold_finished(&self, stored: SoundStatus) -> SoundStatus {
        if stored == SoundStatus::Playing && self.finished.load(Ordering::Relaxed) {
            SoundStatus::Stopped
        } else {
            stored
        }
    }
}

/// Plays a [`SoundBuffer`] through its own output stream
///
/// Pure pass-through: samples go to the device at the buffer's own sample
/// rate & channel count, no resampling or mixing. The stream is opened on
/// the first [`play`](Sound::play)
pub struct Sound {
    device: AudioDevice,
    buffer: SoundBuffer,
    stream: Option<cpal::Stream>,
    control: Arc<SoundControl>,
    status: Cell<SoundStatus>,
}

impl Sound {
    /// Binds a sound to a buffer; fails if no output device exists
    pub fn new(buffer: &SoundBuffer) -> Result<Sound> {
        Ok(Sound {
            device: AudioDevice::acquire()?,
            buffer: buffer.clone(),
            stream: None,
            control: Arc::new(SoundControl {
                position: AtomicUsize::new(0),
                looping: AtomicBool::new(false),
                volume: AtomicU32::new(100f32.to_bits()),
                finished: AtomicBool::new(false),
            }),
            status: Cell::new(SoundStatus::Stopped),
        })
    }

    /// Starts or resumes playback
    ///
    /// Restarts from the beginning if the sound already ran to completion
    pub fn play(&mut self) -> Result<()> {
        if self.control.finished.swap(false, Ordering::Relaxed) {
            self.control.position.store(0, Ordering::Relaxed);
        }
        if self.stream.is_none() {
            self.stream = Some(self.open_stream()?);
        }
        if let Some(stream) = &self.stream {
            stream
                .play()
                .map_err(|e| Error::AudioStream(e.to_string()))?;
        }
        self.status.set(SoundStatus::Playing);
        Ok(())
    }

    /// Pauses playback, keeping the position
    ///
    /// A sound that already ran to completion stays stopped
    pub fn pause(&mut self) {
        if self.status() != SoundStatus::Playing {
            return;
        }
        if let Some(stream) = &self.stream
            && let Err(e) = stream.pause()
        {
            log::warn!("pause failed: {e}");
        }
        self.status.set(SoundStatus::Paused);
    }

    /// Stops playback & rewinds to the beginning
    pub fn stop(&mut self) {
        self.stream = None;
        self.control.position.store(0, Ordering::Relaxed);
        self.control.finished.store(false, Ordering::Relaxed);
        self.status.set(SoundStatus::Stopped);
    }

    pub fn status(&self) -> SoundStatus {
        let status = self.control.fold_finished(self.status.get());
        self.status.set(status);
        status
    }

    pub fn is_looping(&self) -> bool {
        self.control.looping.load(Ordering::Relaxed)
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.control.looping.store(looping, Ordering::Relaxed);
    }

    /// Volume in [0, 100]
    pub fn volume(&self) -> f32 {
        f32::from_bits(self.control.volume.load(Ordering::Relaxed))
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.control
            .volume
            .store(volume.clamp(0.0, 100.0).to_bits(), Ordering::Relaxed);
    }

    pub fn buffer(&self) -> &SoundBuffer {
        &self.buffer
    }

    fn open_stream(&self) -> Result<cpal::Stream> {
        let config = StreamConfig {
            channels: self.buffer.channel_count(),
            sample_rate: SampleRate(self.buffer.sample_rate()),
            buffer_size: cpal::BufferSize::Default,
        };
        let samples = self.buffer.shared_samples();
        let control = self.control.clone();

        self.device
            .output()
            .build_output_stream(
                &config,
                move |out: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    fill(&samples, &control, out);
                },
                |err| log::warn!("output stream error: {err}"),
                None,
            )
            .map_err(|e| Error::AudioStream(e.to_string()))
    }
}

/// The playback callback: copies samples out, scaling by volume, looping or
/// padding with silence at the end
fn fill(samples: &[i16], control: &SoundControl, out: &mut [f32]) {
    let gain = f32::from_bits(control.volume.load(Ordering::Relaxed)) / 100.0;
    let mut position = control.position.load(Ordering::Relaxed);

    for slot in out.iter_mut() {
        if position >= samples.len() {
            if control.looping.load(Ordering::Relaxed) && !samples.is_empty() {
                position = 0;
            } else {
                control.finished.store(true, Ordering::Relaxed);
                *slot = 0.0;
                continue;
            }
        }
        *slot = samples[position] as f32 / i16::MAX as f32 * gain;
        position += 1;
    }
    control.position.store(position, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control(volume: f32, looping: bool) -> SoundControl {
        SoundControl {
            position: AtomicUsize::new(0),
            looping: AtomicBool::new(looping),
            volume: AtomicU32::new(volume.to_bits()),
            finished: AtomicBool::new(false),
        }
    }

    #[test]
    fn fill_scales_by_volume() {
        let samples = [i16::MAX, 0, -i16::MAX];
        let ctl = control(50.0, false);
        let mut out = [0.0f32; 3];
        fill(&samples, &ctl, &mut out);
        assert!((out[0] - 0.5).abs() < 1e-4);
        assert_eq!(out[1], 0.0);
        assert!((out[2] + 0.5).abs() < 1e-4);
    }

    #[test]
    fn fill_pads_silence_and_flags_completion() {
        let samples = [100i16, 200];
        let ctl = control(100.0, false);
        let mut out = [1.0f32; 4];
        fill(&samples, &ctl, &mut out);
        assert_eq!(out[2], 0.0);
        assert_eq!(out[3], 0.0);
        assert!(ctl.finished.load(Ordering::Relaxed));
    }

    #[test]
    fn completion_folds_playing_into_stopped() {
        let samples = [100i16, 200];
        let ctl = control(100.0, false);
        let mut out = [0.0f32; 4];
        fill(&samples, &ctl, &mut out);
        assert_eq!(ctl.fold_finished(SoundStatus::Playing), SoundStatus::Stopped);
        // pause & stop states are untouched by the flag
        assert_eq!(ctl.fold_finished(SoundStatus::Paused), SoundStatus::Paused);
        assert_eq!(ctl.fold_finished(SoundStatus::Stopped), SoundStatus::Stopped);
    }

    #[test]
    fn fill_wraps_when_looping() {
        let samples = [100i16, 200];
        let ctl = control(100.0, true);
        let mut out = [0.0f32; 5];
        fill(&samples, &ctl, &mut out);
        assert!(!ctl.finished.load(Ordering::Relaxed));
        assert_eq!(ctl.position.load(Ordering::Relaxed), 1);
        // wrapped copy matches the first pass
        assert_eq!(out[0], out[2]);
        assert_eq!(out[1], out[3]);
    }
}
