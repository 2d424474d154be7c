//! Windowing & input: OS windows, the event queue, keyboard/mouse types &
//! the joystick/sensor facades

mod backend;
mod event;
pub mod joystick;
mod keyboard;
mod mouse;
pub mod sensor;
#[allow(clippy::module_inception)]
mod window;

pub use event::Event;
pub use joystick::{JoystickAxis, JoystickCapabilities};
pub use keyboard::Key;
pub use mouse::MouseButton;
pub use sensor::SensorType;
pub use window::{Window, WindowConfig};
