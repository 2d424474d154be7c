use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait};

use crate::system::lifecycle::SharedLifecycle;
use crate::system::{Error, Result};

static AUDIO: SharedLifecycle<SharedAudio> = SharedLifecycle::new();

/// Process-wide counted handle to the audio backend
///
/// Same discipline as [`GpuContext`](crate::graphics::GpuContext): the cpal
/// host & default output device are opened when the first handle is acquired
/// & closed when the last one is released
pub struct AudioDevice {
    shared: Arc<SharedAudio>,
}

pub(crate) struct SharedAudio {
    pub host: cpal::Host,
    pub output: cpal::Device,
}

impl AudioDevice {
    /// Acquires a handle, opening the audio backend if this is the first
    /// live handle in the process
    pub fn acquire() -> Result<AudioDevice> {
        Ok(AudioDevice {
            shared: AUDIO.acquire(init_audio)?,
        })
    }

    pub(crate) fn output(&self) -> &cpal::Device {
        &self.shared.output
    }

    pub(crate) fn default_input(&self) -> Result<cpal::Device> {
        self.shared
            .host
            .default_input_device()
            .ok_or(Error::AudioDeviceNotFound)
    }

    /// (inits, teardowns) of the underlying audio backend, for
    /// instrumentation
    pub fn lifecycle_counters() -> (u64, u64) {
        AUDIO.counters()
    }

    /// Number of live handles
    pub fn live_handles() -> usize {
        AUDIO.live()
    }
}

impl Clone for AudioDevice {
    fn clone(&self) -> Self {
        // count > 0 while self is alive, so the init closure never runs
        let shared = AUDIO
            .acquire(|| Err(Error::AudioDeviceNotFound))
            .unwrap_or_else(|_| self.shared.clone());
        AudioDevice { shared }
    }
}

impl Drop for AudioDevice {
    fn drop(&mut self) {
        AUDIO.release();
    }
}

impl std::fmt::Debug for AudioDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AudioDevice")
    }
}

fn init_audio() -> Result<SharedAudio> {
    let host = cpal::default_host();
    let output = host
        .default_output_device()
        .ok_or(Error::AudioDeviceNotFound)?;
    log::debug!(
        "audio backend up: {}",
        output.name().unwrap_or_else(|_| "unknown device".into())
    );
    Ok(SharedAudio { host, output })
}
