/// Errors surfaced by fallible constructors
///
/// Construction failures (no adapter, bad surface, missing audio device) are
/// explicit; per-frame failures are logged & dropped instead, since raising
/// on every frame of a render loop is unworkable
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no suitable graphics adapter found")]
    AdapterNotFound,
    #[error("failed to acquire graphics device: {0}")]
    DeviceRequest(String),
    #[error("window creation failed: {0}")]
    WindowCreation(String),
    #[error("surface creation failed: {0}")]
    SurfaceCreation(String),
    #[error("surface configuration not supported by the adapter")]
    SurfaceUnsupported,
    #[error("invalid image data: {0}")]
    InvalidImage(String),
    #[error("shader compilation failed: {0}")]
    ShaderCompilation(String),
    #[error("no audio device available")]
    AudioDeviceNotFound,
    #[error("audio stream error: {0}")]
    AudioStream(String),
    #[error("invalid sound data: {0}")]
    InvalidSound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
