pub mod angle;
pub mod error;
pub(crate) mod lifecycle;
pub mod rect;

pub use angle::Angle;
pub use error::{Error, Result};
pub use rect::Rect;
