//! Built-in seek task used by the CLI, tests and benchmarks.
//!
//! A point vehicle starts at the origin facing +x and must visit a ring of
//! targets in order. Motion is plain kinematic integration.

use crate::config::TaskConfig;
use crate::environment::Environment;
use std::f32::consts::TAU;

const DT: f32 = 1.0 / 30.0;
const MAX_SPEED: f32 = 20.0;
const ACCELERATION: f32 = 30.0;
const BRAKING: f32 = 40.0;
const DRAG: f32 = 0.5;
const TURN_RATE: f32 = 3.0;
const TARGET_RADIUS: f32 = 3.0;

/// Reward per target reached
pub const TARGET_REWARD: f32 = 10.0;

/// Sensor slots
pub const INPUTS: usize = 4;
/// Actuator slots: throttle, brake, steer left, steer right
pub const OUTPUTS: usize = 4;

const OUT_THROTTLE: usize = 0;
const OUT_BRAKE: usize = 1;
const OUT_LEFT: usize = 2;
const OUT_RIGHT: usize = 3;

/// Vehicle state for one individual
#[derive(Clone, Debug, PartialEq)]
pub struct Vehicle {
    pub x: f32,
    pub y: f32,
    pub heading: f32,
    pub speed: f32,
    pub turn: f32,
    pub targets_reached: usize,
    /// Distance to the current target when it became current
    leg_length: f32,
    /// Closest approach to the current target
    best_distance: f32,
}

/// Ring of targets visited in order
#[derive(Clone, Debug)]
pub struct SeekTask {
    targets: Vec<(f32, f32)>,
    arena_radius: f32,
}

impl SeekTask {
    pub fn new(config: &TaskConfig) -> Self {
        let count = config.checkpoint_count.max(1);
        let radius = config.arena_radius;

        // ring centered ahead of the origin; the first target is straight ahead
        let targets = (0..count)
            .map(|i| {
                let angle = TAU * i as f32 / count as f32;
                (radius + 0.5 * radius * angle.cos(), 0.5 * radius * angle.sin())
            })
            .collect();

        Self {
            targets,
            arena_radius: radius,
        }
    }

    pub fn targets(&self) -> &[(f32, f32)] {
        &self.targets
    }

    fn current_target(&self, vehicle: &Vehicle) -> (f32, f32) {
        self.targets[vehicle.targets_reached % self.targets.len()]
    }

    fn distance_to_target(&self, vehicle: &Vehicle) -> f32 {
        let (tx, ty) = self.current_target(vehicle);
        (tx - vehicle.x).hypot(ty - vehicle.y)
    }
}

impl Environment for SeekTask {
    type Agent = Vehicle;

    fn input_count(&self) -> usize {
        INPUTS
    }

    fn output_count(&self) -> usize {
        OUTPUTS
    }

    fn spawn(&self, _agent_id: u32) -> Vehicle {
        let mut vehicle = Vehicle {
            x: 0.0,
            y: 0.0,
            heading: 0.0,
            speed: 0.0,
            turn: 0.0,
            targets_reached: 0,
            leg_length: 0.0,
            best_distance: 0.0,
        };
        let d = self.distance_to_target(&vehicle);
        vehicle.leg_length = d;
        vehicle.best_distance = d;
        vehicle
    }

    fn sense(&self, vehicle: &Vehicle, inputs: &mut [f32]) {
        let (tx, ty) = self.current_target(vehicle);
        let (dx, dy) = (tx - vehicle.x, ty - vehicle.y);
        let (sin, cos) = vehicle.heading.sin_cos();

        // target vector in the vehicle frame
        inputs[0] = (dx * cos + dy * sin) / self.arena_radius;
        inputs[1] = (-dx * sin + dy * cos) / self.arena_radius;
        inputs[2] = vehicle.speed / MAX_SPEED;
        inputs[3] = vehicle.turn / TURN_RATE;
    }

    fn act(&self, vehicle: &mut Vehicle, outputs: &[f32]) {
        let throttle = outputs[OUT_THROTTLE];
        let brake = outputs[OUT_BRAKE];
        let steer = outputs[OUT_RIGHT] - outputs[OUT_LEFT];

        vehicle.speed += (throttle * ACCELERATION - brake * BRAKING - vehicle.speed * DRAG) * DT;
        vehicle.speed = vehicle.speed.clamp(0.0, MAX_SPEED);
        vehicle.turn = steer * TURN_RATE;
        vehicle.heading = (vehicle.heading + vehicle.turn * DT).rem_euclid(TAU);

        let (sin, cos) = vehicle.heading.sin_cos();
        vehicle.x += cos * vehicle.speed * DT;
        vehicle.y += sin * vehicle.speed * DT;

        let d = self.distance_to_target(vehicle);
        if d <= TARGET_RADIUS {
            vehicle.targets_reached += 1;
            let next = self.distance_to_target(vehicle);
            vehicle.leg_length = next;
            vehicle.best_distance = next;
        } else {
            vehicle.best_distance = vehicle.best_distance.min(d);
        }
    }

    fn fitness(&self, vehicle: &Vehicle) -> f32 {
        let progress = if vehicle.leg_length > 0.0 {
            (1.0 - vehicle.best_distance / vehicle.leg_length).clamp(0.0, 1.0)
        } else {
            0.0
        };
        TARGET_REWARD * vehicle.targets_reached as f32 + progress
    }
}
