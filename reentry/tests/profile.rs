use approx::assert_relative_eq;
use proptest::prelude::*;
use reentry::profile::{density_at, DT, MAX_STEPS, START_ALTITUDE};
use reentry::{compute_profile, FlightStatus, ProfileSummary, ReentryParams};

#[test]
fn shallow_entry_is_gentler_than_steep_fast_entry() {
    let shallow = compute_profile(&ReentryParams::new(2.0, 7_500.0, 1.2));
    let steep = compute_profile(&ReentryParams::new(10.0, 11_000.0, 0.1));

    let shallow = ProfileSummary::from_profile(&shallow).unwrap();
    let steep = ProfileSummary::from_profile(&steep).unwrap();

    assert!(!shallow.final_status.is_failure(), "{:?}", shallow.final_status);
    assert_eq!(steep.final_status, FlightStatus::Burned);
    assert!(shallow.max_temperature < steep.max_temperature);
    assert!(shallow.max_g_force < steep.max_g_force);
}

#[test]
fn default_entry_runs_to_the_time_cap() {
    let profile = compute_profile(&ReentryParams::default());
    assert_eq!(profile.len(), MAX_STEPS);

    let summary = ProfileSummary::from_profile(&profile).unwrap();
    assert!(summary.timed_out);
    assert_relative_eq!(summary.duration, (MAX_STEPS - 1) as f64 * DT);
    assert_eq!(summary.final_status, FlightStatus::Subsonic);
    assert!(summary.max_g_force < 12.0);
}

#[test]
fn slow_steep_entry_hits_the_ground() {
    let profile = compute_profile(&ReentryParams::new(10.0, 1_000.0, 0.1));
    let last = profile.last().unwrap();
    let before = profile[profile.len() - 2];

    assert_eq!(last.status, FlightStatus::Crashed);
    assert_eq!(last.altitude, 0.0);
    assert!(last.velocity > 100.0);
    assert_relative_eq!(last.density, density_at(before.altitude));
    assert!(last.density < density_at(0.0));
}

#[test]
fn summary_tracks_peaks_and_final_sample() {
    let profile = compute_profile(&ReentryParams::new(5.0, 7_800.0, 1.0));
    let summary = ProfileSummary::from_profile(&profile).unwrap();
    let last = profile.last().unwrap();

    assert_eq!(summary.final_status, last.status);
    assert_eq!(summary.impact_velocity, last.velocity);
    assert_eq!(summary.duration, last.time);
    assert!(profile.iter().all(|s| s.temperature <= summary.max_temperature));
    assert!(profile.iter().any(|s| s.g_force == summary.max_g_force));
}

proptest! {
    #[test]
    fn profile_ends_terminal_or_at_cap(
        angle in 0.5f64..10.0,
        velocity in 1_000.0f64..11_000.0,
        cd in 0.1f64..3.0,
    ) {
        let profile = compute_profile(&ReentryParams::new(angle, velocity, cd));
        prop_assert!(!profile.is_empty());

        let last = profile.last().unwrap();
        prop_assert!(
            last.status.is_terminal() || (profile.len() == MAX_STEPS && last.altitude > 0.0)
        );
        // Only the last sample may be terminal
        prop_assert!(profile[..profile.len() - 1].iter().all(|s| !s.status.is_terminal()));
    }

    #[test]
    fn descent_never_climbs(
        angle in 0.5f64..10.0,
        velocity in 1_000.0f64..11_000.0,
        cd in 0.1f64..3.0,
    ) {
        let profile = compute_profile(&ReentryParams::new(angle, velocity, cd));
        prop_assert!(profile[0].altitude < START_ALTITUDE);
        for pair in profile.windows(2) {
            prop_assert!(pair[1].altitude <= pair[0].altitude);
            prop_assert!(pair[1].density >= pair[0].density);
            prop_assert!(pair[1].time > pair[0].time);
        }
    }
}
