// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Readiness predicate gating change notifications.
//!
//! Right after a bulk state change the host lists layers whose type is not
//! resolved yet. Notifying then would hand callers a half-loaded viewer.

use serde::Deserialize;
use serde_json::Value;

use crate::schema::ViewerState;

/// The only part of the viewer state readiness looks at. Layout, sources and
/// every other field may drift without holding notifications back.
#[derive(Deserialize)]
struct LayerTypes {
    #[serde(default)]
    layers: Vec<TypedLayer>,
}

#[derive(Deserialize)]
struct TypedLayer {
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

/// True when every layer has a resolved type.
pub fn is_settled(state: &ViewerState) -> bool {
    state.layers.iter().all(|layer| layer.kind.is_some())
}

/// [`is_settled`] over raw host JSON.
///
/// Only `layers[*].type` is read. A layer list that cannot be read at all
/// is not settled.
pub fn state_is_settled(state: &Value) -> bool {
    LayerTypes::deserialize(state)
        .is_ok_and(|types| types.layers.iter().all(|layer| layer.kind.is_some()))
}
