use glam::Vec3;

use crate::window::joystick::JoystickAxis;
use crate::window::sensor::SensorType;
use crate::window::{Key, MouseButton};

/// A window or input event, delivered through
/// [`Window::poll_event`](crate::window::Window::poll_event)
///
/// One flat enum for everything; match on the variants you care about &
/// ignore the rest
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// The user asked to close the window; the window stays open until
    /// [`close`](crate::window::Window::close) is called
    Closed,
    /// The drawable area changed size, in pixels
    Resized { width: u32, height: u32 },
    FocusGained,
    FocusLost,
    /// A unicode character was produced; carries dead-key & layout handling
    /// the raw key events don't
    TextEntered { unicode: char },
    KeyPressed {
        code: Key,
        alt: bool,
        ctrl: bool,
        shift: bool,
        system: bool,
    },
    KeyReleased {
        code: Key,
        alt: bool,
        ctrl: bool,
        shift: bool,
        system: bool,
    },
    /// Vertical wheel movement in lines; positive is away from the user
    MouseWheelScrolled { delta: f32, x: f32, y: f32 },
    MouseButtonPressed { button: MouseButton, x: f32, y: f32 },
    MouseButtonReleased { button: MouseButton, x: f32, y: f32 },
    MouseMoved { x: f32, y: f32 },
    MouseEntered,
    MouseLeft,
    JoystickButtonPressed { joystick_id: u32, button: u32 },
    JoystickButtonReleased { joystick_id: u32, button: u32 },
    /// An axis moved; `position` is in [-100, 100]
    JoystickMoved {
        joystick_id: u32,
        axis: JoystickAxis,
        position: f32,
    },
    JoystickConnected { joystick_id: u32 },
    JoystickDisconnected { joystick_id: u32 },
    TouchBegan { finger: u32, x: f32, y: f32 },
    TouchMoved { finger: u32, x: f32, y: f32 },
    TouchEnded { finger: u32, x: f32, y: f32 },
    SensorChanged { sensor: SensorType, value: Vec3 },
}
