// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-viewport driver: pose, zoom and geometry of one bound panel.

use std::rc::Rc;

use overlay_viewer_port::math::{Mat4, Quat};
use overlay_viewer_port::{
    CameraPose, DriverError, InjectionParams, ViewportDriver, ViewportGeometry,
};

use crate::driver::DriverCore;
use crate::host::NeuroglancerHost;
use crate::layout::PlaneRole;
use crate::schema::NavigationState;

/// Data space is right-handed with +Y/+Z pointing away from the overlay's
/// world axes.
const UVW_TO_WORLD: Mat4 = Mat4::scale(1.0, -1.0, -1.0);

/// Driver for one Neuroglancer cross-section panel.
///
/// Instances are rebuilt on every
/// [`overlay_viewer_port::ViewerDriver::viewport_drivers`] call and hold no
/// cached pose; every read goes to the live host.
pub struct NeuroglancerViewportDriver<H: NeuroglancerHost> {
    core: Rc<DriverCore<H>>,
    panel: H::Element,
    plane: PlaneRole,
    orientation_offset: Quat,
}

impl<H: NeuroglancerHost> NeuroglancerViewportDriver<H> {
    pub(crate) fn new(core: Rc<DriverCore<H>>, panel: H::Element, plane: PlaneRole) -> Self {
        Self {
            core,
            panel,
            plane,
            orientation_offset: plane.orientation_offset(),
        }
    }

    /// Panel element this viewport is bound to.
    pub fn panel(&self) -> &H::Element {
        &self.panel
    }

    /// Plane shown by this viewport.
    pub fn plane(&self) -> PlaneRole {
        self.plane
    }

    fn navigation(&self) -> Result<NavigationState, DriverError> {
        NavigationState::from_json(self.core.host.navigation_json())
    }
}

impl<H: NeuroglancerHost> ViewportDriver for NeuroglancerViewportDriver<H> {
    type Element = H::Element;

    fn geometry(&self) -> Result<ViewportGeometry, DriverError> {
        let tracked = self.core.tracked_element()?;
        let panel_rect = self.core.host.content_rect(&self.panel);
        let tracked_rect = self.core.host.content_rect(&tracked);
        Ok(ViewportGeometry {
            left: panel_rect.left - tracked_rect.left,
            bottom: panel_rect.bottom() - tracked_rect.bottom(),
            width: panel_rect.width,
            height: panel_rect.height,
        })
    }

    fn camera_pose_in_uvw_space(&self) -> Result<CameraPose, DriverError> {
        let pose = self.navigation()?.pose;
        // Position is passed through in the host's navigation units.
        let orientation = pose.orientation.quat().multiply(&self.orientation_offset);
        Ok(CameraPose::new(pose.position.uvw()?, orientation))
    }

    fn uvw_to_world_matrix(&self) -> Mat4 {
        UVW_TO_WORLD
    }

    fn zoom_in_pixels_per_nm(&self) -> Result<f64, DriverError> {
        let zoom_factor = self.navigation()?.zoom_factor.value;
        if !zoom_factor.is_finite() || zoom_factor <= 0.0 {
            return Err(DriverError::NotReady(format!(
                "zoom factor {zoom_factor} is not positive"
            )));
        }
        Ok(1.0 / zoom_factor)
    }

    fn injection_params(&self) -> Option<InjectionParams<Self::Element>> {
        Some(InjectionParams {
            preceding_element: Some(self.panel.clone()),
            z_index: None,
        })
    }
}
