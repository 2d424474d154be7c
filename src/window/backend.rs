//! Platform window backends
//!
//! [`PlatformBackend`] is the seam between the library's explicit
//! `poll_event` model and whatever the OS offers. The winit implementation
//! pumps the native loop on demand & translates OS events into library
//! events; one native event may produce zero or more library events.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use glam::{Vec2, vec2};
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseScrollDelta, TouchPhase, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{ModifiersState, PhysicalKey};
use winit::platform::pump_events::EventLoopExtPumpEvents;
use winit::window::{WindowAttributes, WindowId};

use crate::system::{Error, Result};
use crate::window::{Event, Key, MouseButton, WindowConfig};

/// What the library needs from a platform window
pub(crate) trait PlatformBackend {
    /// Runs the native event loop until it goes idle (`Some(ZERO)`), until
    /// the timeout elapses, or indefinitely (`None`); translated events are
    /// appended to `events`
    fn pump(&mut self, events: &mut VecDeque<Event>, timeout: Option<Duration>);

    fn size(&self) -> (u32, u32);
    fn set_size(&mut self, width: u32, height: u32);
    fn position(&self) -> (i32, i32);
    fn set_position(&mut self, x: i32, y: i32);
    fn set_title(&mut self, title: &str);
    fn set_visible(&mut self, visible: bool);
    fn set_cursor_visible(&mut self, visible: bool);
    fn set_key_repeat_enabled(&mut self, enabled: bool);
    fn request_focus(&mut self);
    fn has_focus(&self) -> bool;

    /// Handle for creating a rendering surface over this window
    fn surface_handle(&self) -> Option<Box<dyn wgpu::WindowHandle>>;
}

/// Desktop backend over winit
pub(crate) struct WinitBackend {
    event_loop: EventLoop<()>,
    state: PumpState,
}

/// The `ApplicationHandler` side of the backend: owns the native window &
/// collects translated events while the loop is pumped
struct PumpState {
    attributes: WindowAttributes,
    window: Option<Arc<winit::window::Window>>,
    events: VecDeque<Event>,
    key_repeat: bool,
    modifiers: ModifiersState,
    cursor: Vec2,
}

impl WinitBackend {
    pub fn new(config: &WindowConfig) -> Result<WinitBackend> {
        let event_loop = EventLoop::new().map_err(|e| Error::WindowCreation(e.to_string()))?;
        let attributes = winit::window::Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(PhysicalSize::new(config.width.max(1), config.height.max(1)))
            .with_resizable(config.resizable)
            .with_decorations(config.decorations)
            .with_visible(config.visible);

        let mut backend = WinitBackend {
            event_loop,
            state: PumpState {
                attributes,
                window: None,
                events: VecDeque::new(),
                key_repeat: true,
                modifiers: ModifiersState::empty(),
                cursor: Vec2::ZERO,
            },
        };

        // the window is created by `resumed`, which fires on the first pump
        let mut startup = VecDeque::new();
        backend.pump(&mut startup, Some(Duration::ZERO));
        backend.state.events = startup;

        if backend.state.window.is_none() {
            return Err(Error::WindowCreation("event loop never resumed".into()));
        }
        Ok(backend)
    }

    fn window(&self) -> Option<&winit::window::Window> {
        self.state.window.as_deref()
    }
}

impl PlatformBackend for WinitBackend {
    fn pump(&mut self, events: &mut VecDeque<Event>, timeout: Option<Duration>) {
        let _ = self.event_loop.pump_app_events(timeout, &mut self.state);
        events.append(&mut self.state.events);
    }

    fn size(&self) -> (u32, u32) {
        self.window()
            .map_or((0, 0), |w| w.inner_size().into())
    }

    fn set_size(&mut self, width: u32, height: u32) {
        if let Some(window) = self.window() {
            let _ = window.request_inner_size(PhysicalSize::new(width.max(1), height.max(1)));
        }
    }

    fn position(&self) -> (i32, i32) {
        self.window()
            .and_then(|w| w.outer_position().ok())
            .map_or((0, 0), |p| (p.x, p.y))
    }

    fn set_position(&mut self, x: i32, y: i32) {
        if let Some(window) = self.window() {
            window.set_outer_position(PhysicalPosition::new(x, y));
        }
    }

    fn set_title(&mut self, title: &str) {
        if let Some(window) = self.window() {
            window.set_title(title);
        }
    }

    fn set_visible(&mut self, visible: bool) {
        if let Some(window) = self.window() {
            window.set_visible(visible);
        }
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        if let Some(window) = self.window() {
            window.set_cursor_visible(visible);
        }
    }

    fn set_key_repeat_enabled(&mut self, enabled: bool) {
        self.state.key_repeat = enabled;
    }

    fn request_focus(&mut self) {
        if let Some(window) = self.window() {
            window.focus_window();
        }
    }

    fn has_focus(&self) -> bool {
        self.window().is_some_and(|w| w.has_focus())
    }

    fn surface_handle(&self) -> Option<Box<dyn wgpu::WindowHandle>> {
        self.state
            .window
            .clone()
            .map(|window| Box::new(window) as Box<dyn wgpu::WindowHandle>)
    }
}

impl ApplicationHandler for PumpState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        match event_loop.create_window(self.attributes.clone()) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(e) => log::error!("window creation failed: {e}"),
        }
    }

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.events.push_back(Event::Closed),
            WindowEvent::Resized(size) => self.events.push_back(Event::Resized {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::Focused(true) => self.events.push_back(Event::FocusGained),
            WindowEvent::Focused(false) => self.events.push_back(Event::FocusLost),
            WindowEvent::ModifiersChanged(modifiers) => self.modifiers = modifiers.state(),
            WindowEvent::KeyboardInput { event, .. } => {
                if event.repeat && !self.key_repeat {
                    return;
                }
                if let PhysicalKey::Code(code) = event.physical_key
                    && let Some(code) = Key::from_winit(code)
                {
                    let (alt, ctrl, shift, system) = (
                        self.modifiers.alt_key(),
                        self.modifiers.control_key(),
                        self.modifiers.shift_key(),
                        self.modifiers.super_key(),
                    );
                    self.events.push_back(match event.state {
                        ElementState::Pressed => Event::KeyPressed {
                            code,
                            alt,
                            ctrl,
                            shift,
                            system,
                        },
                        ElementState::Released => Event::KeyReleased {
                            code,
                            alt,
                            ctrl,
                            shift,
                            system,
                        },
                    });
                }
                if event.state == ElementState::Pressed
                    && let Some(text) = &event.text
                {
                    for unicode in text.chars() {
                        self.events.push_back(Event::TextEntered { unicode });
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = vec2(position.x as f32, position.y as f32);
                self.events.push_back(Event::MouseMoved {
                    x: self.cursor.x,
                    y: self.cursor.y,
                });
            }
            WindowEvent::CursorEntered { .. } => self.events.push_back(Event::MouseEntered),
            WindowEvent::CursorLeft { .. } => self.events.push_back(Event::MouseLeft),
            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    // approximate a line as 20 pixels of smooth scrolling
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 20.0,
                };
                self.events.push_back(Event::MouseWheelScrolled {
                    delta,
                    x: self.cursor.x,
                    y: self.cursor.y,
                });
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = MouseButton::from_winit(button) {
                    self.events.push_back(match state {
                        ElementState::Pressed => Event::MouseButtonPressed {
                            button,
                            x: self.cursor.x,
                            y: self.cursor.y,
                        },
                        ElementState::Released => Event::MouseButtonReleased {
                            button,
                            x: self.cursor.x,
                            y: self.cursor.y,
                        },
                    });
                }
            }
            WindowEvent::Touch(touch) => {
                let (finger, x, y) = (
                    touch.id as u32,
                    touch.location.x as f32,
                    touch.location.y as f32,
                );
                self.events.push_back(match touch.phase {
                    TouchPhase::Started => Event::TouchBegan { finger, x, y },
                    TouchPhase::Moved => Event::TouchMoved { finger, x, y },
                    TouchPhase::Ended | TouchPhase::Cancelled => {
                        Event::TouchEnded { finger, x, y }
                    }
                });
            }
            _ => {}
        }
    }
}
