//! Pull-based joystick support
//!
//! The OS side sits behind [`JoystickDriver`]; the manager rescans the slot
//! range on every update, opens devices that appeared, polls the open ones &
//! resets the ones that vanished, emitting diff events for everything that
//! changed. Desktop builds ship the null driver, so all slots simply read as
//! disconnected; the manager & facade behave identically either way.

use std::collections::VecDeque;
use std::sync::{LazyLock, Mutex, MutexGuard};

use crate::window::Event;

/// Number of joystick slots tracked
pub const JOYSTICK_COUNT: u32 = 8;
/// Number of supported buttons per joystick
pub const BUTTON_COUNT: usize = 32;

/// Minimum axis movement (in [-100,100] units) that produces a
/// [`JoystickMoved`](Event::JoystickMoved) event
const AXIS_EPSILON: f32 = 0.1;

/// Joystick axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoystickAxis {
    X,
    Y,
    Z,
    R,
    U,
    V,
    PovX,
    PovY,
}

impl JoystickAxis {
    pub const ALL: [JoystickAxis; 8] = [
        JoystickAxis::X,
        JoystickAxis::Y,
        JoystickAxis::Z,
        JoystickAxis::R,
        JoystickAxis::U,
        JoystickAxis::V,
        JoystickAxis::PovX,
        JoystickAxis::PovY,
    ];
}

/// What a connected joystick supports
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct JoystickCapabilities {
    pub button_count: u32,
    axes: [bool; 8],
}

impl JoystickCapabilities {
    pub fn new(button_count: u32, axes: &[JoystickAxis]) -> Self {
        let mut caps = Self {
            button_count,
            axes: [false; 8],
        };
        for axis in axes {
            caps.axes[*axis as usize] = true;
        }
        caps
    }

    pub fn has_axis(&self, axis: JoystickAxis) -> bool {
        self.axes[axis as usize]
    }
}

/// Snapshot of one joystick's inputs; axes in [-100, 100]
#[derive(Debug, Clone, PartialEq)]
pub struct JoystickState {
    pub connected: bool,
    pub axes: [f32; 8],
    pub buttons: [bool; BUTTON_COUNT],
}

impl Default for JoystickState {
    fn default() -> Self {
        Self {
            connected: false,
            axes: [0.0; 8],
            buttons: [false; BUTTON_COUNT],
        }
    }
}

/// OS-level joystick access, one implementation per platform
///
/// Drivers only answer point questions about single slots; connection
/// tracking & event diffing live in the manager
pub(crate) trait JoystickDriver: Send {
    fn is_present(&mut self, id: u32) -> bool;
    /// Opens the device in a slot; `None` if it vanished between the
    /// presence check & the open
    fn open(&mut self, id: u32) -> Option<JoystickCapabilities>;
    fn poll(&mut self, id: u32) -> JoystickState;
    fn close(&mut self, id: u32);
}

/// Driver for platforms without joystick support
pub(crate) struct NullJoystickDriver;

impl JoystickDriver for NullJoystickDriver {
    fn is_present(&mut self, _id: u32) -> bool {
        false
    }
    fn open(&mut self, _id: u32) -> Option<JoystickCapabilities> {
        None
    }
    fn poll(&mut self, _id: u32) -> JoystickState {
        JoystickState::default()
    }
    fn close(&mut self, _id: u32) {}
}

pub(crate) struct JoystickManager {
    driver: Box<dyn JoystickDriver>,
    capabilities: Vec<JoystickCapabilities>,
    states: Vec<JoystickState>,
}

impl JoystickManager {
    pub fn new(driver: Box<dyn JoystickDriver>) -> Self {
        Self {
            driver,
            capabilities: vec![JoystickCapabilities::default(); JOYSTICK_COUNT as usize],
            states: vec![JoystickState::default(); JOYSTICK_COUNT as usize],
        }
    }

    /// Rescans every slot & appends diff events for what changed since the
    /// previous update
    pub fn update(&mut self, events: &mut VecDeque<Event>) {
        for id in 0..JOYSTICK_COUNT {
            let slot = id as usize;
            let was_connected = self.states[slot].connected;
            let present = self.driver.is_present(id);

            if present && !was_connected {
                let Some(caps) = self.driver.open(id) else {
                    continue;
                };
                log::debug!("joystick {id} connected ({} buttons)", caps.button_count);
                self.capabilities[slot] = caps;
                let mut state = self.driver.poll(id);
                state.connected = true;
                self.states[slot] = state;
                events.push_back(Event::JoystickConnected { joystick_id: id });
            } else if !present && was_connected {
                log::debug!("joystick {id} disconnected");
                self.driver.close(id);
                self.capabilities[slot] = JoystickCapabilities::default();
                self.states[slot] = JoystickState::default();
                events.push_back(Event::JoystickDisconnected { joystick_id: id });
            } else if present {
                let mut state = self.driver.poll(id);
                state.connected = true;
                self.diff(id, &state, events);
                self.states[slot] = state;
            }
        }
    }

    fn diff(&self, id: u32, new: &JoystickState, events: &mut VecDeque<Event>) {
        let old = &self.states[id as usize];
        let caps = &self.capabilities[id as usize];

        for button in 0..caps.button_count.min(BUTTON_COUNT as u32) {
            let (was, is) = (old.buttons[button as usize], new.buttons[button as usize]);
            if is && !was {
                events.push_back(Event::JoystickButtonPressed {
                    joystick_id: id,
                    button,
                });
            } else if was && !is {
                events.push_back(Event::JoystickButtonReleased {
                    joystick_id: id,
                    button,
                });
            }
        }

        for axis in JoystickAxis::ALL {
            if !caps.has_axis(axis) {
                continue;
            }
            let position = new.axes[axis as usize];
            if (position - old.axes[axis as usize]).abs() > AXIS_EPSILON {
                events.push_back(Event::JoystickMoved {
                    joystick_id: id,
                    axis,
                    position,
                });
            }
        }
    }

    pub fn is_connected(&self, id: u32) -> bool {
        self.states
            .get(id as usize)
            .is_some_and(|state| state.connected)
    }

    pub fn axis_position(&self, id: u32, axis: JoystickAxis) -> f32 {
        self.states
            .get(id as usize)
            .map_or(0.0, |state| state.axes[axis as usize])
    }

    pub fn is_button_pressed(&self, id: u32, button: u32) -> bool {
        (button as usize) < BUTTON_COUNT
            && self
                .states
                .get(id as usize)
                .is_some_and(|state| state.buttons[button as usize])
    }

    pub fn capabilities(&self, id: u32) -> JoystickCapabilities {
        self.capabilities.get(id as usize).cloned().unwrap_or_default()
    }
}

static MANAGER: LazyLock<Mutex<JoystickManager>> =
    LazyLock::new(|| Mutex::new(JoystickManager::new(Box::new(NullJoystickDriver))));

fn manager() -> MutexGuard<'static, JoystickManager> {
    MANAGER.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Called by the window event pump once per poll
pub(crate) fn update_into(events: &mut VecDeque<Event>) {
    manager().update(events);
}

/// Whether a joystick slot currently has a device connected
pub fn is_connected(id: u32) -> bool {
    manager().is_connected(id)
}

/// Current position of an axis, in [-100, 100]; 0 when disconnected
pub fn axis_position(id: u32, axis: JoystickAxis) -> f32 {
    manager().axis_position(id, axis)
}

pub fn is_button_pressed(id: u32, button: u32) -> bool {
    manager().is_button_pressed(id, button)
}

pub fn capabilities(id: u32) -> JoystickCapabilities {
    manager().capabilities(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Driver fed by a script of snapshots for slot 0, one per update
    struct ScriptedDriver {
        script: Vec<Option<JoystickState>>,
        step: usize,
        current: Option<JoystickState>,
    }

    impl ScriptedDriver {
        fn new(script: Vec<Option<JoystickState>>) -> Self {
            Self {
                script,
                step: 0,
                current: None,
            }
        }
    }

    impl JoystickDriver for ScriptedDriver {
        fn is_present(&mut self, id: u32) -> bool {
            if id != 0 {
                return false;
            }
            // one presence check for slot 0 per update; advance the script
            self.current = self.script.get(self.step).cloned().flatten();
            self.step += 1;
            self.current.is_some()
        }
        fn open(&mut self, _id: u32) -> Option<JoystickCapabilities> {
            self.current
                .as_ref()
                .map(|_| JoystickCapabilities::new(2, &[JoystickAxis::X, JoystickAxis::Y]))
        }
        fn poll(&mut self, _id: u32) -> JoystickState {
            self.current.clone().unwrap_or_default()
        }
        fn close(&mut self, _id: u32) {}
    }

    fn state(x: f32, button0: bool) -> JoystickState {
        let mut s = JoystickState::default();
        s.axes[JoystickAxis::X as usize] = x;
        s.buttons[0] = button0;
        s
    }

    fn drain(manager: &mut JoystickManager) -> Vec<Event> {
        let mut queue = VecDeque::new();
        manager.update(&mut queue);
        queue.into()
    }

    #[test]
    fn connection_lifecycle_emits_events_once() {
        let driver = ScriptedDriver::new(vec![
            Some(state(0.0, false)),
            Some(state(0.0, false)),
            None,
        ]);
        let mut manager = JoystickManager::new(Box::new(driver));

        let events = drain(&mut manager);
        assert_eq!(events, vec![Event::JoystickConnected { joystick_id: 0 }]);
        assert!(manager.is_connected(0));

        // no change, no events
        assert!(drain(&mut manager).is_empty());

        let events = drain(&mut manager);
        assert_eq!(events, vec![Event::JoystickDisconnected { joystick_id: 0 }]);
        assert!(!manager.is_connected(0));
        assert_eq!(manager.capabilities(0), JoystickCapabilities::default());
    }

    #[test]
    fn button_and_axis_diffs_become_events() {
        let driver = ScriptedDriver::new(vec![
            Some(state(0.0, false)),
            Some(state(55.0, true)),
            Some(state(55.0, false)),
        ]);
        let mut manager = JoystickManager::new(Box::new(driver));
        drain(&mut manager);

        let events = drain(&mut manager);
        assert!(events.contains(&Event::JoystickButtonPressed {
            joystick_id: 0,
            button: 0
        }));
        assert!(events.contains(&Event::JoystickMoved {
            joystick_id: 0,
            axis: JoystickAxis::X,
            position: 55.0
        }));
        assert_eq!(manager.axis_position(0, JoystickAxis::X), 55.0);
        assert!(manager.is_button_pressed(0, 0));

        let events = drain(&mut manager);
        assert_eq!(
            events,
            vec![Event::JoystickButtonReleased {
                joystick_id: 0,
                button: 0
            }]
        );
    }

    #[test]
    fn null_driver_reports_nothing() {
        let mut manager = JoystickManager::new(Box::new(NullJoystickDriver));
        assert!(drain(&mut manager).is_empty());
        assert!(!manager.is_connected(0));
        assert_eq!(manager.axis_position(0, JoystickAxis::X), 0.0);
        assert!(!manager.is_button_pressed(0, 0));
    }

    #[test]
    fn capabilities_track_reported_axes() {
        let caps = JoystickCapabilities::new(4, &[JoystickAxis::X, JoystickAxis::PovY]);
        assert!(caps.has_axis(JoystickAxis::X));
        assert!(caps.has_axis(JoystickAxis::PovY));
        assert!(!caps.has_axis(JoystickAxis::Z));
        assert_eq!(caps.button_count, 4);
    }
}
