use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::system::{Error, Result};
use crate::window::backend::{PlatformBackend, WinitBackend};
use crate::window::{Event, joystick, sensor};

/// Settings for opening a window
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    pub decorations: bool,
    pub visible: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Lantern".into(),
            width: 800,
            height: 600,
            resizable: true,
            decorations: true,
            visible: true,
        }
    }
}

impl WindowConfig {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            ..Default::default()
        }
    }
}

// the desktop backend owns the process's one native event loop
static WINDOW_ALIVE: AtomicBool = AtomicBool::new(false);

/// An OS window with an explicit event queue
///
/// Events are pulled, not pushed: [`poll_event`](Window::poll_event) pumps
/// the platform backend & the joystick/sensor managers, then pops one event.
/// Only one window can exist per process at a time; the native event loop
/// isn't shareable
pub struct Window {
    backend: Box<dyn PlatformBackend>,
    events: VecDeque<Event>,
    open: bool,
}

impl Window {
    pub fn new(config: WindowConfig) -> Result<Window> {
        if WINDOW_ALIVE.swap(true, Ordering::SeqCst) {
            return Err(Error::WindowCreation(
                "a window already exists in this process".into(),
            ));
        }
        let backend = match WinitBackend::new(&config) {
            Ok(backend) => backend,
            Err(e) => {
                WINDOW_ALIVE.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };
        log::debug!("window \"{}\" opened at {}x{}", config.title, config.width, config.height);
        Ok(Window {
            backend: Box::new(backend),
            events: VecDeque::new(),
            open: true,
        })
    }

    /// Pops the next pending event, pumping the backend first; never blocks
    pub fn poll_event(&mut self) -> Option<Event> {
        self.backend.pump(&mut self.events, Some(Duration::ZERO));
        joystick::update_into(&mut self.events);
        sensor::update_into(&mut self.events);
        self.events.pop_front()
    }

    /// Like [`poll_event`](Self::poll_event), but blocks until an event
    /// arrives or the timeout elapses (`None` waits indefinitely)
    pub fn wait_event(&mut self, timeout: Option<Duration>) -> Option<Event> {
        if let Some(event) = self.poll_event() {
            return Some(event);
        }
        self.backend.pump(&mut self.events, timeout);
        joystick::update_into(&mut self.events);
        sensor::update_into(&mut self.events);
        self.events.pop_front()
    }

    /// Marks the window closed & hides it; the OS window is destroyed when
    /// the `Window` is dropped
    pub fn close(&mut self) {
        self.open = false;
        self.backend.set_visible(false);
    }

    /// Whether the window is open; a [`Closed`](Event::Closed) event does
    /// not close the window on its own
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Size of the drawable area in pixels
    pub fn size(&self) -> (u32, u32) {
        self.backend.size()
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.backend.set_size(width, height);
    }

    /// Position of the window's outer frame on the desktop
    pub fn position(&self) -> (i32, i32) {
        self.backend.position()
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.backend.set_position(x, y);
    }

    pub fn set_title(&mut self, title: &str) {
        self.backend.set_title(title);
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.backend.set_visible(visible);
    }

    pub fn set_cursor_visible(&mut self, visible: bool) {
        self.backend.set_cursor_visible(visible);
    }

    /// Whether holding a key generates repeated `KeyPressed` events
    /// (enabled by default)
    pub fn set_key_repeat_enabled(&mut self, enabled: bool) {
        self.backend.set_key_repeat_enabled(enabled);
    }

    pub fn request_focus(&mut self) {
        self.backend.request_focus();
    }

    pub fn has_focus(&self) -> bool {
        self.backend.has_focus()
    }

    pub(crate) fn surface_handle(&self) -> Option<Box<dyn wgpu::WindowHandle>> {
        self.backend.surface_handle()
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        WINDOW_ALIVE.store(false, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("open", &self.open)
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}
