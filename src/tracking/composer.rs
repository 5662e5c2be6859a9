//! Derives per-marker transforms from the bound device's pose.
//!
//! The pipeline for one tick is:
//!
//! 1. optionally zero the base pose's 3x3 block so markers ignore the device's tilt,
//! 2. add the calibration offset to the translation,
//! 3. per marker, overwrite the 3x3 block with the direction's fixed basis (vertical
//!    column stretched to `1 + height`) and nudge the translation by `size / π`
//!    along the direction's axis.
//!
//! Everything here is a pure function of the base pose and calibration.

use std::f32::consts::PI;

use crate::calibration::{Calibration, Offset};
use crate::config::MarkerLayout;
use crate::vr::Affine3x4;

/// Cardinal direction a pole half faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Left,
    Front,
    Back,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Front,
        Direction::Back,
    ];

    /// Basis rows and nudge axis for this direction.
    pub fn basis(self) -> &'static DirectionBasis {
        &BASES[self as usize]
    }
}

/// Fixed orientation and positional nudge of one direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionBasis {
    /// Rows of the 3x3 block with a unit vertical entry; `[1][1]` gets `+ height`.
    pub rows: [[f32; 3]; 3],
    /// Unit vector the translation is nudged along.
    pub nudge: [f32; 3],
}

/// Indexed by `Direction as usize`. Each basis is a quarter turn about +Y.
static BASES: [DirectionBasis; 4] = [
    // Right
    DirectionBasis {
        rows: [[0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [-1.0, 0.0, 0.0]],
        nudge: [1.0, 0.0, 0.0],
    },
    // Left
    DirectionBasis {
        rows: [[0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
        nudge: [-1.0, 0.0, 0.0],
    },
    // Front
    DirectionBasis {
        rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        nudge: [0.0, 0.0, -1.0],
    },
    // Back
    DirectionBasis {
        rows: [[-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]],
        nudge: [0.0, 0.0, 1.0],
    },
];

/// Static description of one marker; maps 1:1 to an overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSpec {
    pub direction: Direction,
    pub key: String,
    pub name: String,
}

impl MarkerSpec {
    pub fn new(direction: Direction, key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            direction,
            key: key.into(),
            name: name.into(),
        }
    }

    /// Specs for every direction in `layout`, keyed `<prefix>.1`, `<prefix>.2`, ...
    pub fn for_layout(layout: MarkerLayout, prefix: &str) -> Vec<MarkerSpec> {
        layout
            .directions()
            .iter()
            .enumerate()
            .map(|(i, direction)| {
                let id = (i + 1).to_string();
                let key = if prefix.is_empty() {
                    id.clone()
                } else {
                    format!("{}.{}", prefix, id)
                };
                MarkerSpec::new(*direction, key, id)
            })
            .collect()
    }
}

/// Zero all nine entries of the 3x3 block.
pub fn neutralize_rotation(transform: &mut Affine3x4) {
    transform.clear_linear();
}

/// Add the calibration offset to the translation.
pub fn apply_offset(transform: &mut Affine3x4, offset: Offset) {
    transform.translate([offset.x as f32, offset.y as f32, offset.z as f32]);
}

/// Transform for one direction, from an already offset base.
pub fn directional_transform(
    base: &Affine3x4,
    direction: Direction,
    height: f32,
    marker_size: f32,
) -> Affine3x4 {
    let basis = direction.basis();
    let mut rows = basis.rows;
    rows[1][1] += height;

    let magnitude = marker_size / PI;
    let mut transform = *base;
    transform.set_linear(rows);
    transform.translate(basis.nudge.map(|axis| axis * magnitude));
    transform
}

/// Produces marker transforms from a base pose and calibration.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformComposer {
    neutralize_rotation: bool,
}

impl TransformComposer {
    pub fn new(neutralize_rotation: bool) -> Self {
        Self {
            neutralize_rotation,
        }
    }

    /// Steps 1 and 2: rotation neutralization (if enabled) and offset.
    pub fn prepare_base(&self, base: &Affine3x4, calibration: &Calibration) -> Affine3x4 {
        let mut prepared = *base;
        if self.neutralize_rotation {
            neutralize_rotation(&mut prepared);
        }
        apply_offset(&mut prepared, calibration.offset());
        prepared
    }

    /// One transform per direction, all derived from the same base snapshot.
    pub fn compose(
        &self,
        base: &Affine3x4,
        calibration: &Calibration,
        directions: impl IntoIterator<Item = Direction>,
    ) -> Vec<Affine3x4> {
        let prepared = self.prepare_base(base, calibration);
        let height = calibration.height as f32;
        let size = calibration.size as f32;

        directions
            .into_iter()
            .map(|direction| directional_transform(&prepared, direction, height, size))
            .collect()
    }

    /// [`compose`](Self::compose) over marker specs.
    pub fn compose_markers(
        &self,
        base: &Affine3x4,
        calibration: &Calibration,
        markers: &[MarkerSpec],
    ) -> Vec<Affine3x4> {
        self.compose(base, calibration, markers.iter().map(|m| m.direction))
    }
}
