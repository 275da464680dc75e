// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Driver traits defining the viewer contract.

use crate::math::Mat4;
use crate::{
    CameraPose, DriverError, InjectionParams, NativeView, RefreshViewParams, ViewportGeometry,
};

/// Callback fired on structural viewer changes.
pub type ViewportsChangedHandler = Box<dyn FnMut()>;

/// One rectangular region of a viewer showing an independent camera view.
///
/// A viewer may split a single canvas into several viewports so they share
/// one WebGL context; each gets its own driver.
pub trait ViewportDriver {
    /// DOM node handle type of the host page.
    type Element;

    /// Viewport rectangle relative to the tracked element.
    fn geometry(&self) -> Result<ViewportGeometry, DriverError>;

    /// Camera pose in data space; the orientation is always normalised.
    fn camera_pose_in_uvw_space(&self) -> Result<CameraPose, DriverError>;

    /// Data-to-world transform. At least one scale axis is exactly 1.
    fn uvw_to_world_matrix(&self) -> Mat4;

    /// How many pixels one data unit occupies on screen. Always positive.
    fn zoom_in_pixels_per_nm(&self) -> Result<f64, DriverError>;

    /// Moves the viewport camera to `pose`.
    fn snap_camera_to(&self, _pose: &CameraPose) -> Result<(), DriverError> {
        Err(DriverError::Unsupported("snap_camera_to"))
    }

    /// Where the overlay element for this viewport should be injected.
    fn injection_params(&self) -> Option<InjectionParams<Self::Element>> {
        None
    }
}

/// Glue every viewer must provide to be driven by the overlay.
pub trait ViewerDriver {
    /// DOM node handle type of the host page.
    type Element;
    /// Per-viewport driver type.
    type Viewport: ViewportDriver<Element = Self::Element>;

    /// Drivers for the currently visible viewports.
    ///
    /// Empty while the host is initializing or its layout is unknown; treat
    /// it as "not ready", never as "no viewports exist".
    fn viewport_drivers(&self) -> Vec<Self::Viewport>;

    /// The element actually displaying pixels; the overlay mirrors its box.
    fn tracked_element(&self) -> Result<Self::Element, DriverError>;

    /// Opens `params.native_view`, or refreshes the tab with the same name.
    ///
    /// Fire-and-forget: returns once the host has been told, without waiting
    /// for any fetch.
    fn refresh_view(&self, params: &RefreshViewParams) -> Result<(), DriverError>;

    /// Registers `handler` for structural changes: a source opened or
    /// closed, shown or hidden, or the viewport set reconfigured. Camera
    /// pan, zoom and rotation never fire it.
    fn on_viewports_changed(&self, handler: ViewportsChangedHandler);

    /// The source currently on display ("active tab"), if any.
    fn data_view_on_display(&self) -> Result<Option<NativeView>, DriverError>;

    /// Every source currently open, visible or not.
    fn open_data_views(&self) -> Result<Vec<NativeView>, DriverError>;
}
