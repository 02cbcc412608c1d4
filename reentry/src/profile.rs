//! Forward-Euler reentry integrator
//!
//! The vehicle flies a straight path at the entry angle through an
//! exponential atmosphere. Drag slows it, gravity along the path speeds it
//! up, and once it drops below 2 km/s the path slowly steepens toward
//! vertical. Surface temperature follows a stagnation-point heating
//! approximation. Each sample is classified into a [`FlightStatus`]; the
//! loop stops at a terminal status or after 600 s of simulated time.
//!
//! The gravity-turn rate and heating constants are tuned for plausible
//! behavior rather than derived from real vehicles.

use common::config::clamp_logged;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::fmt;

/// Integration step (s)
pub const DT: f64 = 0.5;
/// Simulated time cap (s)
pub const MAX_TIME: f64 = 600.0;
pub const MAX_STEPS: usize = (MAX_TIME / DT) as usize;

pub const GRAVITY: f64 = 9.81;
pub const START_ALTITUDE: f64 = 100_000.0;
pub const SURFACE_DENSITY: f64 = 1.225;
pub const SCALE_HEIGHT: f64 = 8_500.0;

/// Capsule mass (kg)
pub const VEHICLE_MASS: f64 = 5_000.0;
/// Reference area (m²)
pub const VEHICLE_AREA: f64 = 10.0;

pub const SPEED_OF_SOUND: f64 = 343.0;
/// Below this speed the flight path starts to steepen
pub const GRAVITY_TURN_SPEED: f64 = 2_000.0;
/// Flight path steepening rate (rad/s)
pub const GRAVITY_TURN_RATE: f64 = 0.001;

pub const HEAT_COEFFICIENT: f64 = 1.83e-4;
pub const HEAT_SCALE: f64 = 10_000.0;
pub const AMBIENT_TEMPERATURE: f64 = 20.0;
pub const MAX_TEMPERATURE: f64 = 3_000.0;

pub const SPACE_ALTITUDE: f64 = 80_000.0;
pub const PLASMA_TEMPERATURE: f64 = 1_400.0;
pub const BURN_TEMPERATURE: f64 = 2_800.0;
pub const MAX_G_FORCE: f64 = 12.0;
pub const SAFE_LANDING_SPEED: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightStatus {
    Space,
    Reentry,
    Plasma,
    Subsonic,
    Landed,
    Crashed,
    Burned,
}

impl FlightStatus {
    pub const ALL: [FlightStatus; 7] = [
        FlightStatus::Space,
        FlightStatus::Reentry,
        FlightStatus::Plasma,
        FlightStatus::Subsonic,
        FlightStatus::Landed,
        FlightStatus::Crashed,
        FlightStatus::Burned,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FlightStatus::Space => "Space",
            FlightStatus::Reentry => "Reentry",
            FlightStatus::Plasma => "Plasma",
            FlightStatus::Subsonic => "Subsonic",
            FlightStatus::Landed => "Landed",
            FlightStatus::Crashed => "Crashed",
            FlightStatus::Burned => "Burned",
        }
    }

    /// Integration stops after a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FlightStatus::Landed | FlightStatus::Crashed | FlightStatus::Burned
        )
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, FlightStatus::Crashed | FlightStatus::Burned)
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Entry conditions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReentryParams {
    /// Flight path angle below horizontal, in degrees
    pub entry_angle: f64,
    /// Initial speed (m/s)
    pub initial_velocity: f64,
    pub drag_coefficient: f64,
}

impl Default for ReentryParams {
    fn default() -> Self {
        Self {
            entry_angle: 2.0,
            initial_velocity: 7_500.0,
            drag_coefficient: 1.2,
        }
    }
}

impl ReentryParams {
    pub fn new(entry_angle: f64, initial_velocity: f64, drag_coefficient: f64) -> Self {
        Self {
            entry_angle,
            initial_velocity,
            drag_coefficient,
        }
    }

    pub fn clamped(self) -> Self {
        Self {
            entry_angle: clamp_logged("entry_angle", self.entry_angle, 0.5, 10.0),
            initial_velocity: clamp_logged("initial_velocity", self.initial_velocity, 1_000.0, 11_000.0),
            drag_coefficient: clamp_logged("drag_coefficient", self.drag_coefficient, 0.1, 3.0),
        }
    }
}

/// One sample of the flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReentryStep {
    /// Seconds since the start of the simulation
    pub time: f64,
    /// Meters above ground, never negative
    pub altitude: f64,
    pub velocity: f64,
    /// Surface temperature (°C)
    pub temperature: f64,
    pub g_force: f64,
    /// Air density that drove this step (kg/m³), taken at the altitude the
    /// step started from. `temperature` and `g_force` are derived from it.
    pub density: f64,
    pub status: FlightStatus,
}

/// Exponential atmosphere
pub fn density_at(altitude: f64) -> f64 {
    SURFACE_DENSITY * (-altitude / SCALE_HEIGHT).exp()
}

/// Stagnation-point surface temperature for the given density and speed
pub fn surface_temperature(density: f64, velocity: f64) -> f64 {
    let heat_flux = HEAT_COEFFICIENT * density.sqrt() * velocity.powi(3);
    (AMBIENT_TEMPERATURE + heat_flux / HEAT_SCALE).min(MAX_TEMPERATURE)
}

/// Structural and thermal failure take precedence over everything else
pub fn classify(altitude: f64, velocity: f64, temperature: f64, g_force: f64) -> FlightStatus {
    if g_force > MAX_G_FORCE || temperature > BURN_TEMPERATURE {
        FlightStatus::Burned
    } else if altitude <= 0.0 {
        if velocity <= SAFE_LANDING_SPEED {
            FlightStatus::Landed
        } else {
            FlightStatus::Crashed
        }
    } else if altitude > SPACE_ALTITUDE {
        FlightStatus::Space
    } else if temperature > PLASMA_TEMPERATURE {
        FlightStatus::Plasma
    } else if velocity > SPEED_OF_SOUND {
        FlightStatus::Reentry
    } else {
        FlightStatus::Subsonic
    }
}

/// Integrate a full descent. Parameters are clamped into their supported
/// ranges first; the result is never empty.
pub fn compute_profile(params: &ReentryParams) -> Vec<ReentryStep> {
    let params = params.clamped();
    let mut steps = Vec::with_capacity(MAX_STEPS);

    let mut altitude = START_ALTITUDE;
    let mut velocity = params.initial_velocity;
    let mut angle = params.entry_angle.to_radians();

    for i in 0..MAX_STEPS {
        let time = i as f64 * DT;
        let rho = density_at(altitude);

        let deceleration =
            0.5 * rho * velocity * velocity * params.drag_coefficient * VEHICLE_AREA / VEHICLE_MASS;
        let gravity_along_path = GRAVITY * angle.sin();

        velocity -= (deceleration - gravity_along_path) * DT;
        altitude -= velocity * angle.sin() * DT;

        if velocity < GRAVITY_TURN_SPEED {
            angle = (angle + GRAVITY_TURN_RATE * DT).min(FRAC_PI_2);
        }

        let temperature = surface_temperature(rho, velocity);
        let g_force = deceleration / GRAVITY;
        let status = classify(altitude, velocity, temperature, g_force);

        let reported_altitude = altitude.max(0.0);
        steps.push(ReentryStep {
            time,
            altitude: reported_altitude,
            velocity,
            temperature,
            g_force,
            density: rho,
            status,
        });

        if status.is_terminal() {
            log::info!(
                "Reentry ended {} at t={:.1}s, altitude {:.0} m, {:.0} m/s",
                status,
                time,
                reported_altitude,
                velocity
            );
            return steps;
        }
    }

    log::debug!(
        "Reentry reached the {MAX_TIME} s cap at altitude {:.0} m",
        altitude
    );
    steps
}

/// Headline numbers for a computed profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub final_status: FlightStatus,
    pub max_temperature: f64,
    pub max_g_force: f64,
    /// Speed at the last sample
    pub impact_velocity: f64,
    pub duration: f64,
    /// The time cap ended the flight before a terminal status
    pub timed_out: bool,
}

impl ProfileSummary {
    pub fn from_profile(steps: &[ReentryStep]) -> Option<Self> {
        let last = steps.last()?;
        Some(Self {
            final_status: last.status,
            max_temperature: steps.iter().map(|s| s.temperature).fold(f64::MIN, f64::max),
            max_g_force: steps.iter().map(|s| s.g_force).fold(f64::MIN, f64::max),
            impact_velocity: last.velocity,
            duration: last.time,
            timed_out: !last.status.is_terminal(),
        })
    }
}
