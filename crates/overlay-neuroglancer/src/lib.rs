// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Neuroglancer adapter for the overlay driver contract.
//!
//! [`NeuroglancerDriver`] implements [`overlay_viewer_port::ViewerDriver`] on
//! top of any [`NeuroglancerHost`]: a live viewer behind a wasm bridge, or the
//! offline [`SnapshotHost`] used by tests and `ng-inspect`.
//!
//! # Layer replacement
//!
//! Neuroglancer caches fetched chunks by layer and url. Refreshing a source
//! therefore always drops the named layer and adds a new one with a
//! cache-busted url; layers are never patched in place.

mod driver;
mod host;
mod layout;
mod readiness;
mod schema;
mod settings;
mod shader;
mod snapshot;
mod urls;
mod viewport;

pub use driver::{ImageLayer, NeuroglancerDriver};
pub use host::{ElementRect, LayerSpec, LayersChangedListener, NeuroglancerHost};
pub use layout::{PanelBinding, PlaneRole, ViewerLayout, QUAD_LAYOUT_TAG};
pub use readiness::{is_settled, state_is_settled};
pub use schema::{
    LayerSource, LayerState, LayoutSpec, NavigationState, OrientationState, PoseState,
    PositionState, ViewerState, ZoomFactorState,
};
pub use settings::{NeuroglancerSettings, SettingsError, SETTINGS_KEY};
pub use shader::predictions_shader;
pub use snapshot::{SnapshotDocument, SnapshotElement, SnapshotElementEntry, SnapshotHost};
pub use urls::UrlRewriter;
pub use viewport::NeuroglancerViewportDriver;
