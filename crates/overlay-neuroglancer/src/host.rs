// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Capability trait over the embedded Neuroglancer viewer and its page.

use core::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Callback registered on the host's layer-change signal.
pub type LayersChangedListener = Box<dyn FnMut()>;

/// Content box of a DOM element in page pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementRect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl ElementRect {
    /// Bottom edge (`top + height`).
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Layer to hand to the host's layer manager.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSpec {
    /// Unique layer name.
    pub name: String,
    /// Data source url.
    pub source: String,
    /// Rendering program; `None` keeps the host default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shader: Option<String>,
}

/// Everything the adapter reads from, or writes to, a Neuroglancer viewer.
///
/// The host is single-threaded and interior-mutable, so every method takes
/// `&self`. Reads hand back raw JSON; [`crate::ViewerState`] and
/// [`crate::NavigationState`] impose the schema.
pub trait NeuroglancerHost {
    /// DOM node handle.
    type Element: Clone + fmt::Debug;

    /// Serialized viewer state (`viewer.state.toJSON()`).
    fn state_json(&self) -> Value;

    /// Live navigation state: pose position and orientation plus zoom factor.
    fn navigation_json(&self) -> Value;

    /// First element matching `selector`.
    fn query_selector(&self, selector: &str) -> Option<Self::Element>;

    /// All elements matching `selector`, in document order.
    fn query_selector_all(&self, selector: &str) -> Vec<Self::Element>;

    /// Content box of `element`.
    fn content_rect(&self, element: &Self::Element) -> ElementRect;

    /// Removes the managed layer called `name`; `false` when there is none.
    fn remove_layer(&self, name: &str) -> bool;

    /// Adds a new managed layer.
    fn add_layer(&self, layer: &LayerSpec);

    /// Subscribes to the layer manager's change signal.
    fn add_layers_changed_listener(&self, listener: LayersChangedListener);
}
