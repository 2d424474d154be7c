use std::sync::Arc;
use std::time::Duration;

use crate::system::{Error, Result};

/// Stream-level facts a codec reports before any samples are read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundStreamInfo {
    pub sample_rate: u32,
    pub channel_count: u16,
    /// Total frames (one frame = one sample per channel)
    pub frame_count: u64,
}

/// Decoding side of an audio codec
///
/// The library core only moves interleaved PCM i16 blocks; codecs live
/// behind this trait & stay external
pub trait SoundFileReader {
    fn info(&self) -> SoundStreamInfo;
    /// Fills `out` with interleaved samples; returns how many were written.
    /// Zero means end of stream
    fn read(&mut self, out: &mut [i16]) -> usize;
    /// Repositions the stream to an absolute frame
    fn seek(&mut self, frame: u64);
}

/// Encoding side of an audio codec
pub trait SoundFileWriter {
    /// Appends interleaved samples to the stream
    fn write(&mut self, samples: &[i16]) -> Result<()>;
    /// Flushes & finalizes the stream
    fn finish(&mut self) -> Result<()>;
}

/// An immutable block of decoded audio
///
/// Samples are interleaved PCM i16, shared cheaply between the buffer &
/// any [`Sound`](crate::audio::Sound) playing it
#[derive(Debug, Clone)]
pub struct SoundBuffer {
    samples: Arc<[i16]>,
    channel_count: u16,
    sample_rate: u32,
}

impl SoundBuffer {
    /// Wraps raw interleaved samples
    pub fn from_samples(
        samples: Vec<i16>,
        channel_count: u16,
        sample_rate: u32,
    ) -> Result<SoundBuffer> {
        if channel_count == 0 || sample_rate == 0 {
            return Err(Error::InvalidSound(format!(
                "{channel_count} channels at {sample_rate} Hz"
            )));
        }
        Ok(SoundBuffer {
            samples: samples.into(),
            channel_count,
            sample_rate,
        })
    }

    /// Drains a [`SoundFileReader`] into a buffer
    pub fn from_reader(reader: &mut dyn SoundFileReader) -> Result<SoundBuffer> {
        let info = reader.info();
        let mut samples =
            Vec::with_capacity((info.frame_count as usize).saturating_mul(info.channel_count as usize));
        let mut chunk = [0i16; 4096];
        loop {
            let read = reader.read(&mut chunk);
            if read == 0 {
                break;
            }
            samples.extend_from_slice(&chunk[..read]);
        }
        Self::from_samples(samples, info.channel_count, info.sample_rate)
    }

    /// Streams the whole buffer through a [`SoundFileWriter`]
    pub fn write_to(&self, writer: &mut dyn SoundFileWriter) -> Result<()> {
        writer.write(&self.samples)?;
        writer.finish()
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub(crate) fn shared_samples(&self) -> Arc<[i16]> {
        self.samples.clone()
    }

    pub fn channel_count(&self) -> u16 {
        self.channel_count
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frame_count(&self) -> u64 {
        (self.samples.len() / self.channel_count as usize) as u64
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frame_count() as f64 / self.sample_rate as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SineReader {
        info: SoundStreamInfo,
        produced: usize,
    }

    impl SoundFileReader for SineReader {
        fn info(&self) -> SoundStreamInfo {
            self.info
        }
        fn read(&mut self, out: &mut [i16]) -> usize {
            let total = self.info.frame_count as usize * self.info.channel_count as usize;
            let n = out.len().min(total - self.produced);
            for (i, sample) in out[..n].iter_mut().enumerate() {
                *sample = ((self.produced + i) % 100) as i16;
            }
            self.produced += n;
            n
        }
        fn seek(&mut self, frame: u64) {
            self.produced = frame as usize * self.info.channel_count as usize;
        }
    }

    #[test]
    fn from_samples_tracks_duration() {
        let buffer = SoundBuffer::from_samples(vec![0; 44100 * 2], 2, 44100).unwrap();
        assert_eq!(buffer.frame_count(), 44100);
        assert_eq!(buffer.duration(), Duration::from_secs(1));
        assert_eq!(buffer.channel_count(), 2);
    }

    #[test]
    fn zero_channels_or_rate_is_rejected() {
        assert!(SoundBuffer::from_samples(vec![], 0, 44100).is_err());
        assert!(SoundBuffer::from_samples(vec![], 1, 0).is_err());
    }

    #[test]
    fn from_reader_drains_the_stream() {
        let mut reader = SineReader {
            info: SoundStreamInfo {
                sample_rate: 22050,
                channel_count: 1,
                frame_count: 10_000,
            },
            produced: 0,
        };
        let buffer = SoundBuffer::from_reader(&mut reader).unwrap();
        assert_eq!(buffer.samples().len(), 10_000);
        assert_eq!(buffer.sample_rate(), 22050);
        assert_eq!(buffer.samples()[5], 5);
    }

    #[test]
    fn write_to_round_trips() {
        #[derive(Default)]
        struct MemoryWriter {
            samples: Vec<i16>,
            finished: bool,
        }
        impl SoundFileWriter for MemoryWriter {
            fn write(&mut self, samples: &[i16]) -> Result<()> {
                self.samples.extend_from_slice(samples);
                Ok(())
            }
            fn finish(&mut self) -> Result<()> {
                self.finished = true;
                Ok(())
            }
        }

        let buffer = SoundBuffer::from_samples(vec![1, 2, 3, 4], 2, 8000).unwrap();
        let mut writer = MemoryWriter::default();
        buffer.write_to(&mut writer).unwrap();
        assert_eq!(writer.samples, vec![1, 2, 3, 4]);
        assert!(writer.finished);
    }
}
