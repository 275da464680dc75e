// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Data model exchanged between the overlay and viewer drivers.

use crate::math::{Quat, Vec3};

/// RGB color with 8-bit components, as painted by a brush stroke.
pub type ColorRgb8 = [u8; 3];

/// Identity of a data source known to the host viewer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NativeView {
    /// Name of the tab/layer showing the data.
    pub name: String,
    /// Url the data is fetched from.
    pub url: String,
}

impl NativeView {
    /// Creates a view from a name and a url.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Pixel rectangle of a viewport, relative to the tracked element's box.
///
/// Analogous to a WebGL viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportGeometry {
    /// Left edge offset.
    pub left: f64,
    /// Bottom edge offset.
    pub bottom: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

/// Camera position and orientation in data (UVW) space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    /// Camera position in data space.
    pub position_uvw: Vec3,
    /// Camera orientation in data space; always a unit quaternion.
    pub orientation_uvw: Quat,
}

impl CameraPose {
    /// Builds a pose, normalising the orientation.
    pub fn new(position_uvw: Vec3, orientation_uvw: Quat) -> Self {
        Self {
            position_uvw,
            orientation_uvw: orientation_uvw.normalize(),
        }
    }
}

/// Hint on where to inject the overlay's per-viewport element into the DOM.
///
/// Not owned state: the element handle is only borrowed from the host page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InjectionParams<E> {
    /// Insert the overlay element immediately before this element.
    pub preceding_element: Option<E>,
    /// CSS `z-index` to apply to the overlay element.
    pub z_index: Option<String>,
}

impl<E> Default for InjectionParams<E> {
    fn default() -> Self {
        Self {
            preceding_element: None,
            z_index: None,
        }
    }
}

/// Arguments of [`crate::ViewerDriver::refresh_view`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefreshViewParams {
    /// Data source to open, or refresh when a tab with its name exists.
    pub native_view: NativeView,
    /// Url of an already-open source whose rendering should be reused.
    pub similar_url_hint: Option<String>,
    /// Per-channel colors; takes precedence over `similar_url_hint`.
    pub channel_colors: Option<Vec<ColorRgb8>>,
}

impl RefreshViewParams {
    /// Refresh `native_view` keeping the host's default rendering.
    pub fn new(native_view: NativeView) -> Self {
        Self {
            native_view,
            similar_url_hint: None,
            channel_colors: None,
        }
    }

    /// Copy rendering from the open source at `url`, if any.
    pub fn with_similar_url_hint(mut self, url: impl Into<String>) -> Self {
        self.similar_url_hint = Some(url.into());
        self
    }

    /// Render channel `i` with `colors[i]`.
    pub fn with_channel_colors(mut self, colors: Vec<ColorRgb8>) -> Self {
        self.channel_colors = Some(colors);
        self
    }
}
