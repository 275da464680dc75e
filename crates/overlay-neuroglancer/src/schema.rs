// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Typed view of the host state fields the adapter consumes.
//!
//! Only the consumed fields are modelled; everything else in the host JSON
//! is ignored. Known variants across Neuroglancer versions are accepted
//! explicitly, anything else surfaces as
//! [`DriverError::UnsupportedSchema`].

use overlay_viewer_port::math::{Quat, Vec3};
use overlay_viewer_port::DriverError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

fn parse<T: DeserializeOwned>(what: &str, value: Value) -> Result<T, DriverError> {
    serde_json::from_value(value)
        .map_err(|err| DriverError::UnsupportedSchema(format!("{what}: {err}")))
}

/// Serialized viewer state.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ViewerState {
    /// Layout tag; absent while the viewer boots.
    #[serde(default)]
    pub layout: Option<LayoutSpec>,
    /// Layers in host order.
    #[serde(default)]
    pub layers: Vec<LayerState>,
}

impl ViewerState {
    /// Parses `viewer.state.toJSON()`.
    pub fn from_json(value: Value) -> Result<Self, DriverError> {
        parse("viewer state", value)
    }
}

/// Layout, either a bare tag or an object carrying one.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LayoutSpec {
    /// `"4panel"`, `"xy"`, `"xy-3d"`, ...
    Tag(String),
    /// `{"type": "xy", ...}` as written by newer viewers.
    Object {
        /// The layout tag.
        #[serde(rename = "type")]
        kind: String,
    },
}

impl LayoutSpec {
    /// The layout tag regardless of representation.
    pub fn tag(&self) -> &str {
        match self {
            Self::Tag(tag) | Self::Object { kind: tag } => tag,
        }
    }
}

/// One entry of the host's layer list.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LayerState {
    /// Unique layer name.
    pub name: String,
    /// Layer type; `None` until the host has resolved the source.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Data source.
    #[serde(default)]
    pub source: Option<LayerSource>,
    /// Visibility; absent means visible.
    #[serde(default)]
    pub visible: Option<bool>,
    /// Rendering program.
    #[serde(default)]
    pub shader: Option<String>,
}

impl LayerState {
    /// Visibility with the host default applied.
    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }

    /// Url of the primary data source, if any.
    pub fn source_url(&self) -> Option<&str> {
        self.source.as_ref().and_then(LayerSource::primary_url)
    }
}

/// Layer data source in any of the host's spellings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LayerSource {
    /// Bare url.
    Url(String),
    /// `{"url": ...}` with optional extra options.
    Spec {
        /// Source url.
        url: String,
    },
    /// Several sources; the first one is primary.
    Many(Vec<LayerSource>),
}

impl LayerSource {
    /// Url of the primary source.
    pub fn primary_url(&self) -> Option<&str> {
        match self {
            Self::Url(url) | Self::Spec { url } => Some(url),
            Self::Many(sources) => sources.first().and_then(Self::primary_url),
        }
    }
}

/// Live navigation state.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NavigationState {
    /// Camera pose.
    pub pose: PoseState,
    /// Zoom factor (data units per pixel).
    #[serde(rename = "zoomFactor")]
    pub zoom_factor: ZoomFactorState,
}

impl NavigationState {
    /// Parses the host's navigation state.
    pub fn from_json(value: Value) -> Result<Self, DriverError> {
        parse("navigation state", value)
    }
}

/// Position and orientation of the viewer camera.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PoseState {
    /// Camera position.
    pub position: PositionState,
    /// Camera orientation.
    pub orientation: OrientationState,
}

/// Camera position; older viewers lack `value`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PositionState {
    /// Current schema.
    Value {
        /// Position coordinates, possibly with extra non-spatial dimensions.
        value: Vec<f64>,
    },
    /// Legacy schema.
    SpatialCoordinates {
        /// Position coordinates.
        #[serde(rename = "spatialCoordinates")]
        spatial_coordinates: Vec<f64>,
    },
}

impl PositionState {
    /// The first three coordinates, taken as reported by the host.
    pub fn uvw(&self) -> Result<Vec3, DriverError> {
        let coords = match self {
            Self::Value { value } => value,
            Self::SpatialCoordinates {
                spatial_coordinates,
            } => spatial_coordinates,
        };
        match coords.as_slice() {
            [x, y, z, ..] => Ok(Vec3::new(*x, *y, *z)),
            _ => Err(DriverError::NotReady(format!(
                "camera position has {} dimensions",
                coords.len()
            ))),
        }
    }
}

/// Orientation wrapper as exposed by the host.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct OrientationState {
    /// `(x, y, z, w)` quaternion.
    pub orientation: [f64; 4],
}

impl OrientationState {
    /// The orientation as a quaternion (not normalised).
    pub fn quat(&self) -> Quat {
        Quat::from(self.orientation)
    }
}

/// Zoom factor wrapper as exposed by the host.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ZoomFactorState {
    /// Data units per screen pixel.
    pub value: f64,
}
