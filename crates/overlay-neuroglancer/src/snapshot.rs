// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Offline host backed by a saved viewer snapshot.
//!
//! `SnapshotHost` keeps the viewer state, navigation and panel boxes as plain
//! data and applies layer-manager calls to its own `layers` array, so the
//! adapter can run headless in tests and developer tools.

use std::cell::{Cell, RefCell};

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::host::{ElementRect, LayerSpec, LayersChangedListener, NeuroglancerHost};

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Handle to an element of a snapshot page.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SnapshotElement {
    /// Selector the element was registered under.
    pub selector: String,
    /// Position in the snapshot's element list.
    pub index: usize,
}

/// An element of a snapshot page and its content box.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotElementEntry {
    /// Selector that matches this element.
    pub selector: String,
    /// Content box in page pixels.
    pub rect: ElementRect,
}

/// On-disk form of a snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    /// Serialized viewer state.
    #[serde(default = "empty_object")]
    pub state: Value,
    /// Navigation state.
    #[serde(default = "empty_object")]
    pub navigation: Value,
    /// Page elements in document order.
    #[serde(default)]
    pub elements: Vec<SnapshotElementEntry>,
}

impl Default for SnapshotDocument {
    fn default() -> Self {
        Self {
            state: empty_object(),
            navigation: empty_object(),
            elements: Vec::new(),
        }
    }
}

/// [`NeuroglancerHost`] over in-memory snapshot data.
///
/// Listeners fire after every layer add/remove and after [`Self::set_state`];
/// camera changes through [`Self::set_navigation`] never fire them.
pub struct SnapshotHost {
    state: RefCell<Value>,
    navigation: RefCell<Value>,
    elements: Vec<SnapshotElementEntry>,
    listeners: RefCell<Vec<LayersChangedListener>>,
    defer_type_resolution: Cell<bool>,
    added_layer_type: String,
}

impl SnapshotHost {
    /// Host with the given state and navigation and no page elements.
    pub fn new(state: Value, navigation: Value) -> Self {
        Self::from_document(SnapshotDocument {
            state,
            navigation,
            elements: Vec::new(),
        })
    }

    /// Host loaded from a saved document.
    pub fn from_document(document: SnapshotDocument) -> Self {
        Self {
            state: RefCell::new(document.state),
            navigation: RefCell::new(document.navigation),
            elements: document.elements,
            listeners: RefCell::new(Vec::new()),
            defer_type_resolution: Cell::new(false),
            added_layer_type: "image".to_owned(),
        }
    }

    /// Current contents as a document.
    pub fn to_document(&self) -> SnapshotDocument {
        SnapshotDocument {
            state: self.state.borrow().clone(),
            navigation: self.navigation.borrow().clone(),
            elements: self.elements.clone(),
        }
    }

    /// Appends a page element matching `selector`.
    pub fn with_element(mut self, selector: impl Into<String>, rect: ElementRect) -> Self {
        self.elements.push(SnapshotElementEntry {
            selector: selector.into(),
            rect,
        });
        self
    }

    /// Newly added layers get this type (default `"image"`).
    pub fn with_added_layer_type(mut self, kind: impl Into<String>) -> Self {
        self.added_layer_type = kind.into();
        self
    }

    /// Newly added layers stay untyped until [`Self::resolve_pending_layers`].
    pub fn with_deferred_type_resolution(self) -> Self {
        self.defer_type_resolution.set(true);
        self
    }

    /// Replaces the whole viewer state, as a bulk state load would.
    pub fn set_state(&self, state: Value) {
        *self.state.borrow_mut() = state;
        self.emit_layers_changed();
    }

    /// Moves the camera. Never notifies listeners.
    pub fn set_navigation(&self, navigation: Value) {
        *self.navigation.borrow_mut() = navigation;
    }

    /// Assigns `kind` to every untyped layer; returns how many changed.
    pub fn resolve_pending_layers(&self, kind: &str) -> usize {
        let resolved = self.with_layers_mut(|layers| {
            let mut count = 0;
            for layer in layers.iter_mut().filter_map(Value::as_object_mut) {
                if !layer.contains_key("type") {
                    layer.insert("type".to_owned(), Value::String(kind.to_owned()));
                    count += 1;
                }
            }
            count
        });
        if resolved > 0 {
            self.emit_layers_changed();
        }
        resolved
    }

    /// Names of all layers, in host order.
    pub fn layer_names(&self) -> Vec<String> {
        self.state
            .borrow()
            .get("layers")
            .and_then(Value::as_array)
            .map(|layers| {
                layers
                    .iter()
                    .filter_map(|layer| layer.get("name").and_then(Value::as_str))
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Raw JSON of the layer called `name`.
    pub fn layer(&self, name: &str) -> Option<Value> {
        self.state
            .borrow()
            .get("layers")
            .and_then(Value::as_array)
            .and_then(|layers| layers.iter().find(|layer| layer_is_named(layer, name)))
            .cloned()
    }

    /// Number of registered layer-change listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn with_layers_mut<R>(&self, f: impl FnOnce(&mut Vec<Value>) -> R) -> R {
        let mut state = self.state.borrow_mut();
        if !state.is_object() {
            *state = empty_object();
        }
        let mut detached = Vec::new();
        let layers = match state.as_object_mut() {
            Some(object) => {
                let entry = object
                    .entry("layers")
                    .or_insert_with(|| Value::Array(Vec::new()));
                if !entry.is_array() {
                    *entry = Value::Array(Vec::new());
                }
                match entry {
                    Value::Array(list) => list,
                    _ => &mut detached,
                }
            }
            None => &mut detached,
        };
        f(layers)
    }

    fn emit_layers_changed(&self) {
        let mut listeners = self.listeners.take();
        for listener in &mut listeners {
            listener();
        }
        // Keep listeners registered while dispatching.
        let mut slot = self.listeners.borrow_mut();
        listeners.append(&mut slot);
        *slot = listeners;
    }
}

fn layer_is_named(layer: &Value, name: &str) -> bool {
    layer.get("name").and_then(Value::as_str) == Some(name)
}

impl NeuroglancerHost for SnapshotHost {
    type Element = SnapshotElement;

    fn state_json(&self) -> Value {
        self.state.borrow().clone()
    }

    fn navigation_json(&self) -> Value {
        self.navigation.borrow().clone()
    }

    fn query_selector(&self, selector: &str) -> Option<Self::Element> {
        self.query_selector_all(selector).into_iter().next()
    }

    fn query_selector_all(&self, selector: &str) -> Vec<Self::Element> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.selector == selector)
            .map(|(index, entry)| SnapshotElement {
                selector: entry.selector.clone(),
                index,
            })
            .collect()
    }

    fn content_rect(&self, element: &Self::Element) -> ElementRect {
        self.elements
            .get(element.index)
            .map(|entry| entry.rect)
            .unwrap_or_default()
    }

    fn remove_layer(&self, name: &str) -> bool {
        let removed = self.with_layers_mut(|layers| {
            let before = layers.len();
            layers.retain(|layer| !layer_is_named(layer, name));
            layers.len() != before
        });
        if removed {
            self.emit_layers_changed();
        }
        removed
    }

    fn add_layer(&self, layer: &LayerSpec) {
        let mut entry = json!({
            "name": layer.name,
            "source": layer.source,
        });
        if let Some(object) = entry.as_object_mut() {
            if let Some(shader) = &layer.shader {
                object.insert("shader".to_owned(), Value::String(shader.clone()));
            }
            if !self.defer_type_resolution.get() {
                object.insert(
                    "type".to_owned(),
                    Value::String(self.added_layer_type.clone()),
                );
            }
        }
        self.with_layers_mut(|layers| {
            match layers.iter_mut().find(|existing| layer_is_named(existing, &layer.name)) {
                Some(existing) => *existing = entry,
                None => layers.push(entry),
            }
        });
        self.emit_layers_changed();
    }

    fn add_layers_changed_listener(&self, listener: LayersChangedListener) {
        self.listeners.borrow_mut().push(listener);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn counting_host() -> (SnapshotHost, Rc<Cell<usize>>) {
        let host = SnapshotHost::new(json!({"layers": []}), json!({}));
        let fired = Rc::new(Cell::new(0));
        let seen = Rc::clone(&fired);
        host.add_layers_changed_listener(Box::new(move || seen.set(seen.get() + 1)));
        (host, fired)
    }

    #[test]
    fn add_replaces_same_name() {
        let (host, fired) = counting_host();
        let spec = |source: &str| LayerSpec {
            name: "preds".into(),
            source: source.into(),
            shader: None,
        };
        host.add_layer(&spec("precomputed://a"));
        host.add_layer(&spec("precomputed://b"));
        assert_eq!(host.layer_names(), vec!["preds".to_owned()]);
        assert_eq!(host.layer("preds").unwrap()["source"], "precomputed://b");
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn removing_missing_layer_is_silent() {
        let (host, fired) = counting_host();
        assert!(!host.remove_layer("ghost"));
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn navigation_changes_do_not_notify() {
        let (host, fired) = counting_host();
        host.set_navigation(json!({"zoomFactor": {"value": 3.0}}));
        assert_eq!(fired.get(), 0);
        host.set_state(json!({"layers": []}));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn deferred_layers_resolve_on_demand() {
        let host = SnapshotHost::new(json!({}), json!({})).with_deferred_type_resolution();
        host.add_layer(&LayerSpec {
            name: "preds".into(),
            source: "precomputed://p".into(),
            shader: None,
        });
        assert!(host.layer("preds").unwrap().get("type").is_none());
        assert_eq!(host.resolve_pending_layers("image"), 1);
        assert_eq!(host.layer("preds").unwrap()["type"], "image");
    }

    #[test]
    fn selectors_match_in_document_order() {
        let rect = ElementRect {
            left: 1.0,
            top: 2.0,
            width: 3.0,
            height: 4.0,
        };
        let host = SnapshotHost::new(json!({}), json!({}))
            .with_element("canvas", ElementRect::default())
            .with_element(".panel", rect)
            .with_element(".panel", ElementRect::default());
        let panels = host.query_selector_all(".panel");
        assert_eq!(panels.iter().map(|p| p.index).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(host.content_rect(&panels[0]), rect);
        assert!(host.query_selector("#missing").is_none());
    }
}
