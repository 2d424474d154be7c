use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{FromSample, SizedSample};

use crate::audio::{AudioDevice, SoundBuffer};
use crate::system::{Error, Result};

/// Captures audio from the default input device
///
/// Samples arrive in the device's native format & are converted to
/// interleaved i16 as they are collected; [`stop`](SoundRecorder::stop)
/// hands them over as a [`SoundBuffer`]
pub struct SoundRecorder {
    device: AudioDevice,
    stream: Option<cpal::Stream>,
    samples: Arc<Mutex<Vec<i16>>>,
    recording: Arc<AtomicBool>,
    channel_count: u16,
    sample_rate: u32,
}

impl SoundRecorder {
    pub fn new() -> Result<SoundRecorder> {
        Ok(SoundRecorder {
            device: AudioDevice::acquire()?,
            stream: None,
            samples: Arc::new(Mutex::new(Vec::new())),
            recording: Arc::new(AtomicBool::new(false)),
            channel_count: 0,
            sample_rate: 0,
        })
    }

    /// Starts capturing; a second call while recording is a no-op
    pub fn start(&mut self) -> Result<()> {
        if self.recording.load(Ordering::SeqCst) {
            return Ok(());
        }

        let input = self.device.default_input()?;
        let config = input
            .default_input_config()
            .map_err(|e| Error::AudioStream(e.to_string()))?;
        self.channel_count = config.channels();
        self.sample_rate = config.sample_rate().0;
        log::debug!(
            "capture started: {} channels at {} Hz",
            self.channel_count,
            self.sample_rate
        );

        self.samples
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();

        let stream = match config.sample_format() {
            cpal::SampleFormat::I16 => self.open_stream::<i16>(&input, &config.into()),
            cpal::SampleFormat::U16 => self.open_stream::<u16>(&input, &config.into()),
            cpal::SampleFormat::F32 => self.open_stream::<f32>(&input, &config.into()),
            other => Err(Error::AudioStream(format!(
                "unsupported capture format {other:?}"
            ))),
        }?;
        stream
            .play()
            .map_err(|e| Error::AudioStream(e.to_string()))?;

        self.recording.store(true, Ordering::SeqCst);
        self.stream = Some(stream);
        Ok(())
    }

    /// Stops capturing & returns what was recorded; `None` if nothing was
    pub fn stop(&mut self) -> Option<SoundBuffer> {
        if !self.recording.swap(false, Ordering::SeqCst) {
            return None;
        }
        self.stream = None;

        let samples = std::mem::take(
            &mut *self
                .samples
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        );
        if samples.is_empty() {
            log::warn!("capture stopped with no samples");
            return None;
        }
        SoundBuffer::from_samples(samples, self.channel_count, self.sample_rate).ok()
    }

    pub fn is_recording(&self) -> bool {
        self.recording.load(Ordering::SeqCst)
    }

    /// Channel count of the last capture; zero before the first start
    pub fn channel_count(&self) -> u16 {
        self.channel_count
    }

    /// Sample rate of the last capture; zero before the first start
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn open_stream<T>(
        &self,
        input: &cpal::Device,
        config: &cpal::StreamConfig,
    ) -> Result<cpal::Stream>
    where
        T: SizedSample,
        i16: FromSample<T>,
    {
        let samples = Arc::clone(&self.samples);
        let recording = Arc::clone(&self.recording);

        input
            .build_input_stream(
                config,
                move |data: &[T], _: &cpal::InputCallbackInfo| {
                    if !recording.load(Ordering::SeqCst) {
                        return;
                    }
                    if let Ok(mut samples) = samples.lock() {
                        samples.extend(data.iter().map(|s| s.to_sample::<i16>()));
                    }
                },
                |err| log::warn!("input stream error: {err}"),
                None,
            )
            .map_err(|e| Error::AudioStream(e.to_string()))
    }
}
