//! Door: swings open over time, optionally closes itself again.

use bevy::prelude::*;

use super::Openable;

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum DoorState {
    Closed,
    Opening { progress: f32 },
    Open { elapsed: f32 },
    Closing { progress: f32 },
}

/// Door component (the only `Openable` shipped with the crate)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Door {
    pub state: DoorState,
    /// Seconds to swing fully open or closed
    pub swing_duration: f32,
    /// Close again after staying open this long (None = stay open)
    pub auto_close_after: Option<f32>,
    /// Locked doors refuse open requests
    pub locked: bool,
}

impl Default for Door {
    fn default() -> Self {
        Self {
            state: DoorState::Closed,
            swing_duration: 1.0,
            auto_close_after: Some(5.0),
            locked: false,
        }
    }
}

impl Door {
    pub fn locked() -> Self {
        Self {
            locked: true,
            ..Default::default()
        }
    }

    pub fn request_close(&mut self) -> bool {
        match self.state {
            DoorState::Open { .. } => {
                self.state = DoorState::Closing { progress: 0.0 };
                true
            }
            _ => false,
        }
    }

    pub fn step(&mut self, delta: f32) {
        let rate = delta / self.swing_duration.max(f32::EPSILON);

        self.state = match self.state {
            DoorState::Closed => DoorState::Closed,
            DoorState::Opening { progress } => {
                let progress = progress + rate;
                if progress >= 1.0 {
                    DoorState::Open { elapsed: 0.0 }
                } else {
                    DoorState::Opening { progress }
                }
            }
            DoorState::Open { elapsed } => {
                let elapsed = elapsed + delta;
                match self.auto_close_after {
                    Some(limit) if elapsed >= limit => DoorState::Closing { progress: 0.0 },
                    _ => DoorState::Open { elapsed },
                }
            }
            DoorState::Closing { progress } => {
                let progress = progress + rate;
                if progress >= 1.0 {
                    DoorState::Closed
                } else {
                    DoorState::Closing { progress }
                }
            }
        };
    }
}

impl Openable for Door {
    fn is_open(&self) -> bool {
        matches!(self.state, DoorState::Open { .. })
    }

    fn is_moving(&self) -> bool {
        matches!(
            self.state,
            DoorState::Opening { .. } | DoorState::Closing { .. }
        )
    }

    fn request_open(&mut self) -> bool {
        if self.locked || self.state != DoorState::Closed {
            return false;
        }
        self.state = DoorState::Opening { progress: 0.0 };
        true
    }
}

/// System: swing doors
pub fn door_motion(mut doors: Query<&mut Door>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut door in doors.iter_mut() {
        if matches!(door.state, DoorState::Closed) {
            continue;
        }
        door.step(delta);
    }
}
