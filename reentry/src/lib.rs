//! Atmospheric reentry simulator
//!
//! [`profile::compute_profile`] integrates a capsule's descent from 100 km
//! through an exponential atmosphere and returns the whole flight as an
//! immutable list of samples. The renderer and playback only read that list.

pub mod equations_ui;
pub mod playback;
pub mod profile;
pub mod renderer;

pub use playback::Playback;
pub use profile::{compute_profile, FlightStatus, ProfileSummary, ReentryParams, ReentryStep};
