// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Layout tag to viewport binding.

use core::f64::consts::FRAC_PI_2;

use overlay_viewer_port::math::{Quat, Vec3};

/// Layout tag of the four-panel view.
pub const QUAD_LAYOUT_TAG: &str = "4panel";

const THREE_D_SUFFIX: &str = "-3d";

/// Cross-section plane shown by a viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaneRole {
    /// XY cross-section.
    Xy,
    /// XZ cross-section.
    Xz,
    /// YZ cross-section.
    Yz,
}

impl PlaneRole {
    /// Parses a bare plane tag (`"xy"`, `"xz"`, `"yz"`).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "xy" => Some(Self::Xy),
            "xz" => Some(Self::Xz),
            "yz" => Some(Self::Yz),
            _ => None,
        }
    }

    /// The plane tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Xy => "xy",
            Self::Xz => "xz",
            Self::Yz => "yz",
        }
    }

    /// Static rotation from the viewer's orientation to this plane's,
    /// applied in the viewer's local frame.
    pub fn orientation_offset(self) -> Quat {
        match self {
            Self::Xy => Quat::identity(),
            Self::Xz => Quat::from_axis_angle(Vec3::UNIT_X, FRAC_PI_2),
            Self::Yz => Quat::from_axis_angle(Vec3::UNIT_Y, FRAC_PI_2),
        }
    }
}

/// A viewport bound to a display panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelBinding {
    /// Index into the host's panels, in document order.
    pub panel_index: usize,
    /// Plane shown by that panel.
    pub plane: PlaneRole,
}

/// Recognised viewer layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewerLayout {
    /// Three cross-sections plus a 3D view.
    Quad,
    /// One cross-section, optionally next to a 3D view.
    SinglePlane {
        /// Plane shown.
        plane: PlaneRole,
        /// Whether the tag carried the 3D suffix.
        with_3d: bool,
    },
}

impl ViewerLayout {
    /// Parses a layout tag; `None` for layouts without brushable panels.
    pub fn parse(tag: &str) -> Option<Self> {
        if tag == QUAD_LAYOUT_TAG {
            return Some(Self::Quad);
        }
        let (plane, with_3d) = match tag.strip_suffix(THREE_D_SUFFIX) {
            Some(plane) => (plane, true),
            None => (tag, false),
        };
        PlaneRole::from_tag(plane).map(|plane| Self::SinglePlane { plane, with_3d })
    }

    /// Panels to bind given `panel_count` discovered panels.
    ///
    /// The quad layout binds panels 0, 1 and 3; panel 2 is the 3D
    /// perspective view and never gets a viewport. Too few panels yields
    /// no bindings.
    pub fn bindings(self, panel_count: usize) -> Vec<PanelBinding> {
        let wanted: &[(usize, PlaneRole)] = match self {
            Self::Quad => &[(0, PlaneRole::Xy), (1, PlaneRole::Xz), (3, PlaneRole::Yz)],
            Self::SinglePlane { plane, .. } => {
                return if panel_count > 0 {
                    vec![PanelBinding {
                        panel_index: 0,
                        plane,
                    }]
                } else {
                    Vec::new()
                };
            }
        };
        if wanted.iter().any(|(idx, _)| *idx >= panel_count) {
            return Vec::new();
        }
        wanted
            .iter()
            .map(|&(panel_index, plane)| PanelBinding { panel_index, plane })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn single_plane_tags_strip_3d_suffix() {
        for (tag, plane, with_3d) in [
            ("xy", PlaneRole::Xy, false),
            ("xy-3d", PlaneRole::Xy, true),
            ("xz", PlaneRole::Xz, false),
            ("xz-3d", PlaneRole::Xz, true),
            ("yz", PlaneRole::Yz, false),
            ("yz-3d", PlaneRole::Yz, true),
        ] {
            assert_eq!(
                ViewerLayout::parse(tag),
                Some(ViewerLayout::SinglePlane { plane, with_3d }),
                "{tag}"
            );
        }
    }

    #[test]
    fn unknown_tags_are_rejected() {
        for tag in ["3d", "xy-4d", "", "4PANEL", "xyz"] {
            assert_eq!(ViewerLayout::parse(tag), None, "{tag}");
        }
    }

    #[test]
    fn quad_skips_perspective_panel() {
        let indices: Vec<_> = ViewerLayout::Quad
            .bindings(4)
            .iter()
            .map(|b| (b.panel_index, b.plane))
            .collect();
        assert_eq!(
            indices,
            vec![(0, PlaneRole::Xy), (1, PlaneRole::Xz), (3, PlaneRole::Yz)]
        );
    }

    #[test]
    fn quad_with_missing_panels_binds_nothing() {
        assert!(ViewerLayout::Quad.bindings(3).is_empty());
    }

    #[test]
    fn single_plane_needs_one_panel() {
        let layout = ViewerLayout::parse("yz-3d").unwrap();
        assert!(layout.bindings(0).is_empty());
        assert_eq!(
            layout.bindings(2),
            vec![PanelBinding {
                panel_index: 0,
                plane: PlaneRole::Yz
            }]
        );
    }
}
