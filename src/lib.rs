//! Lantern: a 2D multimedia library
//!
//! Three layers, usable independently:
//! - [`window`] — OS windows with an explicit event queue, keyboard/mouse
//!   types & joystick/sensor facades
//! - [`graphics`] — 2D rendering on wgpu: vertices, transforms, views,
//!   shapes & sprites drawn onto windows or off-screen textures
//! - [`audio`] — sound playback & capture over the default devices
//!
//! GPU & audio backends are process-wide and reference counted; any
//! resource can be created before (or without) a window.
//!
//! ```no_run
//! use glam::vec2;
//! use lantern::graphics::{Color, RectangleShape, RenderTarget, RenderWindow};
//! use lantern::window::{Event, WindowConfig};
//!
//! # fn main() -> lantern::system::Result<()> {
//! let mut window = RenderWindow::new(WindowConfig::new("demo", 800, 600))?;
//! let mut shape = RectangleShape::new(vec2(120.0, 80.0));
//! shape.set_fill_color(Color::RED);
//!
//! while window.is_open() {
//!     while let Some(event) = window.poll_event() {
//!         if event == Event::Closed {
//!             window.close();
//!         }
//!     }
//!     window.clear(Color::BLACK);
//!     window.draw(&shape);
//!     window.display();
//! }
//! # Ok(())
//! # }
//! ```

pub mod audio;
pub mod graphics;
pub mod system;
pub mod window;

pub use glam::{Vec2, vec2};

/// Installs the env_logger backend for the crate's `log` output
#[cfg(feature = "log")]
pub fn init_logging() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("error"));
}
