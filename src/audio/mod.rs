//! Audio playback & capture over the system's default devices
//!
//! The core only moves interleaved PCM i16 blocks; file codecs plug in
//! through the [`SoundFileReader`]/[`SoundFileWriter`] traits

mod buffer;
mod device;
mod recorder;
mod sound;

pub use buffer::{SoundBuffer, SoundFileReader, SoundFileWriter, SoundStreamInfo};
pub use device::AudioDevice;
pub use recorder::SoundRecorder;
pub use sound::{Sound, SoundStatus};
