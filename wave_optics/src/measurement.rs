//! Point probes placed by clicking on the field

use common::BoundedHistory;
use glam::Vec2;

/// Most recent probes kept
pub const MAX_MEASUREMENTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementPoint {
    /// Canvas pixel coordinates
    pub position: Vec2,
    /// Instantaneous displacement at the probe
    pub value: f32,
    /// Where the value sits between trough (0 %) and crest (100 %)
    pub phase_percent: f32,
}

impl MeasurementPoint {
    pub fn new(position: Vec2, value: f32, amplitude: f32) -> Self {
        let normalised = if amplitude > 0.0 { value / amplitude } else { 0.0 };
        Self {
            position,
            value,
            phase_percent: ((normalised + 1.0) / 2.0 * 100.0).clamp(0.0, 100.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MeasurementLog {
    points: BoundedHistory<MeasurementPoint>,
}

impl Default for MeasurementLog {
    fn default() -> Self {
        Self {
            points: BoundedHistory::new(MAX_MEASUREMENTS),
        }
    }
}

impl MeasurementLog {
    pub fn record(&mut self, point: MeasurementPoint) {
        self.points.push(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&MeasurementPoint> {
        self.points.latest()
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &MeasurementPoint> {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_last_five() {
        let mut log = MeasurementLog::default();
        for i in 0..7 {
            log.record(MeasurementPoint::new(Vec2::new(i as f32, 0.0), 0.0, 1.0));
        }
        assert_eq!(log.len(), MAX_MEASUREMENTS);
        let xs: Vec<f32> = log.iter().map(|p| p.position.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0, 5.0, 6.0]);
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn phase_percent_spans_trough_to_crest() {
        assert_eq!(MeasurementPoint::new(Vec2::ZERO, -2.0, 2.0).phase_percent, 0.0);
        assert_eq!(MeasurementPoint::new(Vec2::ZERO, 0.0, 2.0).phase_percent, 50.0);
        assert_eq!(MeasurementPoint::new(Vec2::ZERO, 0.5, 0.5).phase_percent, 100.0);
    }
}
