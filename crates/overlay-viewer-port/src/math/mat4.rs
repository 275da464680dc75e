// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::math::Vec3;

/// Column-major 4×4 affine transform.
///
/// Drivers hand these out as data-to-world transforms; the layout matches
/// what WebGL uploads expect.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4 {
    data: [f64; 16],
}

impl Mat4 {
    /// Returns the identity matrix.
    pub const fn identity() -> Self {
        Self::scale(1.0, 1.0, 1.0)
    }

    /// Builds a non-uniform scale matrix.
    pub const fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            data: [
                sx, 0.0, 0.0, 0.0, // col 0
                0.0, sy, 0.0, 0.0, // col 1
                0.0, 0.0, sz, 0.0, // col 2
                0.0, 0.0, 0.0, 1.0, // col 3
            ],
        }
    }

    /// Returns the column-major elements.
    pub fn to_array(self) -> [f64; 16] {
        self.data
    }

    fn at(&self, row: usize, col: usize) -> f64 {
        self.data[col * 4 + row]
    }

    /// Per-axis scale, read as the length of each basis column.
    pub fn scale_factors(&self) -> [f64; 3] {
        [0, 1, 2].map(|col| {
            Vec3::new(self.at(0, col), self.at(1, col), self.at(2, col)).length()
        })
    }

    /// Transforms a point (`w = 1`).
    pub fn transform_point(&self, p: &Vec3) -> Vec3 {
        let [x, y, z] = p.to_array();
        Vec3::new(
            self.at(0, 0) * x + self.at(0, 1) * y + self.at(0, 2) * z + self.at(0, 3),
            self.at(1, 0) * x + self.at(1, 1) * y + self.at(1, 2) * z + self.at(1, 3),
            self.at(2, 0) * x + self.at(2, 1) * y + self.at(2, 2) * z + self.at(2, 3),
        )
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}
