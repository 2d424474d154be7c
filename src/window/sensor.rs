//! Pull-based sensor support, mirroring the joystick machinery
//!
//! Sensors are enabled individually; each update polls the enabled ones &
//! emits a [`SensorChanged`](Event::SensorChanged) when a value moved. The
//! desktop driver reports no sensors available.

use std::collections::VecDeque;
use std::sync::{LazyLock, Mutex, MutexGuard};

use glam::Vec3;

use crate::window::Event;

/// Sensor kinds a device may expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorType {
    /// Raw acceleration including gravity, in m/s²
    Accelerometer,
    /// Rotation rates, in rad/s
    Gyroscope,
    /// Ambient magnetic field, in µT
    Magnetometer,
    /// Gravity direction, in m/s²
    Gravity,
    /// Acceleration with gravity removed, in m/s²
    UserAcceleration,
    /// Absolute orientation angles, in radians
    Orientation,
}

impl SensorType {
    pub const ALL: [SensorType; 6] = [
        SensorType::Accelerometer,
        SensorType::Gyroscope,
        SensorType::Magnetometer,
        SensorType::Gravity,
        SensorType::UserAcceleration,
        SensorType::Orientation,
    ];
}

pub(crate) trait SensorDriver: Send {
    fn is_available(&mut self, sensor: SensorType) -> bool;
    fn set_enabled(&mut self, sensor: SensorType, enabled: bool);
    fn poll(&mut self, sensor: SensorType) -> Vec3;
}

/// Driver for platforms without sensors
pub(crate) struct NullSensorDriver;

impl SensorDriver for NullSensorDriver {
    fn is_available(&mut self, _sensor: SensorType) -> bool {
        false
    }
    fn set_enabled(&mut self, _sensor: SensorType, _enabled: bool) {}
    fn poll(&mut self, _sensor: SensorType) -> Vec3 {
        Vec3::ZERO
    }
}

pub(crate) struct SensorManager {
    driver: Box<dyn SensorDriver>,
    enabled: [bool; 6],
    values: [Vec3; 6],
}

impl SensorManager {
    pub fn new(driver: Box<dyn SensorDriver>) -> Self {
        Self {
            driver,
            enabled: [false; 6],
            values: [Vec3::ZERO; 6],
        }
    }

    pub fn is_available(&mut self, sensor: SensorType) -> bool {
        self.driver.is_available(sensor)
    }

    /// Enabling an unavailable sensor is a logged no-op
    pub fn set_enabled(&mut self, sensor: SensorType, enabled: bool) {
        if enabled && !self.driver.is_available(sensor) {
            log::warn!("sensor {sensor:?} is not available");
            return;
        }
        self.driver.set_enabled(sensor, enabled);
        self.enabled[sensor as usize] = enabled;
        if !enabled {
            self.values[sensor as usize] = Vec3::ZERO;
        }
    }

    pub fn is_enabled(&self, sensor: SensorType) -> bool {
        self.enabled[sensor as usize]
    }

    pub fn value(&self, sensor: SensorType) -> Vec3 {
        self.values[sensor as usize]
    }

    pub fn update(&mut self, events: &mut VecDeque<Event>) {
        for sensor in SensorType::ALL {
            if !self.enabled[sensor as usize] {
                continue;
            }
            let value = self.driver.poll(sensor);
            if value != self.values[sensor as usize] {
                self.values[sensor as usize] = value;
                events.push_back(Event::SensorChanged { sensor, value });
            }
        }
    }
}

static MANAGER: LazyLock<Mutex<SensorManager>> =
    LazyLock::new(|| Mutex::new(SensorManager::new(Box::new(NullSensorDriver))));

fn manager() -> MutexGuard<'static, SensorManager> {
    MANAGER.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Called by the window event pump once per poll
pub(crate) fn update_into(events: &mut VecDeque<Event>) {
    manager().update(events);
}

pub fn is_available(sensor: SensorType) -> bool {
    manager().is_available(sensor)
}

pub fn set_enabled(sensor: SensorType, enabled: bool) {
    manager().set_enabled(sensor, enabled);
}

pub fn is_enabled(sensor: SensorType) -> bool {
    manager().is_enabled(sensor)
}

/// Latest value of an enabled sensor; zero otherwise
pub fn value(sensor: SensorType) -> Vec3 {
    manager().value(sensor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec3;

    struct FakeSensorDriver {
        reading: Vec3,
    }

    impl SensorDriver for FakeSensorDriver {
        fn is_available(&mut self, sensor: SensorType) -> bool {
            sensor == SensorType::Accelerometer
        }
        fn set_enabled(&mut self, _sensor: SensorType, _enabled: bool) {}
        fn poll(&mut self, _sensor: SensorType) -> Vec3 {
            self.reading
        }
    }

    #[test]
    fn disabled_sensors_produce_no_events() {
        let mut manager = SensorManager::new(Box::new(FakeSensorDriver {
            reading: vec3(1.0, 2.0, 3.0),
        }));
        let mut events = VecDeque::new();
        manager.update(&mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn enabled_sensor_reports_changes_once() {
        let mut manager = SensorManager::new(Box::new(FakeSensorDriver {
            reading: vec3(0.0, -9.8, 0.0),
        }));
        manager.set_enabled(SensorType::Accelerometer, true);
        assert!(manager.is_enabled(SensorType::Accelerometer));

        let mut events = VecDeque::new();
        manager.update(&mut events);
        assert_eq!(
            events.pop_front(),
            Some(Event::SensorChanged {
                sensor: SensorType::Accelerometer,
                value: vec3(0.0, -9.8, 0.0)
            })
        );

        // same reading, no further event
        manager.update(&mut events);
        assert!(events.is_empty());
        assert_eq!(manager.value(SensorType::Accelerometer), vec3(0.0, -9.8, 0.0));
    }

    #[test]
    fn enabling_unavailable_sensor_is_refused() {
        let mut manager = SensorManager::new(Box::new(FakeSensorDriver {
            reading: Vec3::ZERO,
        }));
        manager.set_enabled(SensorType::Gyroscope, true);
        assert!(!manager.is_enabled(SensorType::Gyroscope));
    }
}
