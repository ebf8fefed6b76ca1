use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::catalog::Catalog;

/// Replication factor the toy ships with.
pub const DEFAULT_REPLICATION: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("cannot lay out an empty catalog")]
    EmptyCatalog,
    #[error("replication factor must be at least 1")]
    ZeroReplication,
}

/// One angular slice of the wheel. Angles are in wheel coordinates, measured
/// clockwise before the half-segment bias is applied.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub scenario_index: usize,
    pub scenario_id: String,
    pub start_deg: f64,
    pub end_deg: f64,
    pub color: String,
}

impl Segment {
    pub fn width(&self) -> f64 {
        self.end_deg - self.start_deg
    }
}

/// Fixed circular arrangement derived from the catalog: the catalog repeated
/// `replication` times, every slot the same width.
#[derive(Debug, Clone)]
pub struct WheelLayout {
    segments: Vec<Segment>,
    replication: usize,
    by_id: HashMap<String, Vec<usize>>,
}

impl WheelLayout {
    pub fn build(catalog: &Catalog, replication: usize) -> Result<Self, LayoutError> {
        if catalog.is_empty() {
            return Err(LayoutError::EmptyCatalog);
        }
        if replication == 0 {
            return Err(LayoutError::ZeroReplication);
        }

        let catalog_len = catalog.len();
        let count = catalog_len * replication;
        let mut segments = Vec::with_capacity(count);
        let mut by_id: HashMap<String, Vec<usize>> = HashMap::new();

        for index in 0..count {
            let scenario_index = index % catalog_len;
            let record = &catalog.records()[scenario_index];
            // k * 360 / n keeps the last edge at exactly 360.
            let start_deg = index as f64 * 360.0 / count as f64;
            let end_deg = (index + 1) as f64 * 360.0 / count as f64;

            by_id.entry(record.id.clone()).or_default().push(index);
            segments.push(Segment {
                index,
                scenario_index,
                scenario_id: record.id.clone(),
                start_deg,
                end_deg,
                color: record.wheel_color.clone(),
            });
        }

        Ok(Self {
            segments,
            replication,
            by_id,
        })
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn replication(&self) -> usize {
        self.replication
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn segment_angle(&self) -> f64 {
        360.0 / self.segments.len() as f64
    }

    /// The layout's zero reference sits half a segment backward, so segment
    /// centres line up with multiples of the segment angle.
    pub fn bias_deg(&self) -> f64 {
        -self.segment_angle() / 2.0
    }

    /// Segment indices holding the given scenario, in ascending order.
    pub fn segments_for(&self, scenario_id: &str) -> &[usize] {
        self.by_id.get(scenario_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Segment under a fixed pointer at the top after rotating the wheel
    /// clockwise by `rotation_deg`.
    pub fn segment_under_pointer(&self, rotation_deg: f64) -> usize {
        let angle = self.segment_angle();
        let wheel_angle = (-rotation_deg).rem_euclid(360.0);
        let slot = ((wheel_angle + angle / 2.0) / angle).floor() as usize;
        slot % self.segments.len()
    }

    /// Scenario id under the pointer for a given rotation.
    pub fn scenario_under_pointer(&self, rotation_deg: f64) -> &str {
        &self.segments[self.segment_under_pointer(rotation_deg)].scenario_id
    }

    /// CSS background for the wheel face.
    pub fn conic_gradient(&self) -> String {
        let stops = self
            .segments
            .iter()
            .map(|s| format!("{} {}deg {}deg", s.color, trim_float(s.start_deg), trim_float(s.end_deg)))
            .collect::<Vec<_>>()
            .join(", ");
        format!("conic-gradient(from {}deg, {})", trim_float(self.bias_deg()), stops)
    }
}

fn trim_float(value: f64) -> String {
    let formatted = format!("{:.3}", value);
    formatted.trim_end_matches('0').trim_end_matches('.').to_string()
}
