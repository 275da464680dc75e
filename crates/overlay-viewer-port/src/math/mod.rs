// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Linear-algebra helpers for camera poses and frame transforms.
//!
//! Components are `f64` because host viewers report poses as JSON numbers.
//! Quaternions use `(x, y, z, w)` layout and matrices are column-major, the
//! same conventions the hosts use on the wire.

mod mat4;
mod quat;
mod vec3;

pub use mat4::Mat4;
pub use quat::Quat;
pub use vec3::Vec3;

/// Degeneracy threshold for lengths and norms.
pub const EPSILON: f64 = 1e-12;
