// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-viewer driver: viewport enumeration and layer lifecycle.

use std::rc::Rc;

use overlay_viewer_port::{
    DriverError, NativeView, RefreshViewParams, ViewerDriver, ViewportsChangedHandler,
};
use tracing::{debug, info, trace, warn};

use crate::host::{LayerSpec, NeuroglancerHost};
use crate::layout::ViewerLayout;
use crate::readiness::state_is_settled;
use crate::schema::{LayoutSpec, ViewerState};
use crate::settings::{NeuroglancerSettings, SettingsError};
use crate::shader::predictions_shader;
use crate::urls::UrlRewriter;
use crate::viewport::NeuroglancerViewportDriver;

/// State shared between the viewer driver, its viewport drivers and its
/// change listeners.
pub(crate) struct DriverCore<H> {
    pub(crate) host: H,
    pub(crate) settings: NeuroglancerSettings,
    urls: UrlRewriter,
}

impl<H: NeuroglancerHost> DriverCore<H> {
    pub(crate) fn tracked_element(&self) -> Result<H::Element, DriverError> {
        let selector = &self.settings.tracked_element_selector;
        self.host
            .query_selector(selector)
            .ok_or_else(|| DriverError::ElementNotFound(selector.clone()))
    }
}

/// An image layer as listed by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageLayer {
    /// Layer name.
    pub name: String,
    /// Source url with `gs://` normalised to https.
    pub source: String,
    /// Visibility; absent in the host state means visible.
    pub visible: bool,
    /// Rendering program, if one is set.
    pub shader: Option<String>,
}

impl ImageLayer {
    /// The layer as a data view.
    pub fn native_view(&self) -> NativeView {
        NativeView::new(self.name.clone(), self.source.clone())
    }
}

/// [`ViewerDriver`] for an embedded Neuroglancer viewer.
pub struct NeuroglancerDriver<H> {
    core: Rc<DriverCore<H>>,
}

impl<H: NeuroglancerHost> NeuroglancerDriver<H> {
    /// Wraps `host` using `settings`.
    pub fn new(host: H, settings: NeuroglancerSettings) -> Result<Self, SettingsError> {
        let urls = UrlRewriter::new(&settings)?;
        Ok(Self {
            core: Rc::new(DriverCore {
                host,
                settings,
                urls,
            }),
        })
    }

    /// The wrapped host.
    pub fn host(&self) -> &H {
        &self.core.host
    }

    /// Settings in effect.
    pub fn settings(&self) -> &NeuroglancerSettings {
        &self.core.settings
    }

    fn viewer_state(&self) -> Result<ViewerState, DriverError> {
        ViewerState::from_json(self.core.host.state_json())
    }

    /// Image layers in host order.
    ///
    /// Layers of other types, and image layers without a source, are skipped.
    pub fn image_layers(&self) -> Result<Vec<ImageLayer>, DriverError> {
        let image_type = self.core.settings.image_layer_type.as_str();
        Ok(self
            .viewer_state()?
            .layers
            .into_iter()
            .filter(|layer| layer.kind.as_deref() == Some(image_type))
            .filter_map(|layer| {
                let source = self.core.urls.normalize_source(layer.source_url()?);
                Some(ImageLayer {
                    visible: layer.is_visible(),
                    name: layer.name,
                    source,
                    shader: layer.shader,
                })
            })
            .collect())
    }

    /// Removes the layer called `name`; `false` when there was none.
    pub fn drop_layer(&self, name: &str) -> bool {
        self.core.host.remove_layer(name)
    }

    fn resolve_shader(&self, params: &RefreshViewParams) -> Result<Option<String>, DriverError> {
        if let Some(colors) = &params.channel_colors {
            return Ok(Some(predictions_shader(colors)));
        }
        let Some(hint) = &params.similar_url_hint else {
            return Ok(None);
        };
        Ok(self
            .image_layers()?
            .into_iter()
            .find(|layer| &layer.source == hint)
            .and_then(|layer| layer.shader))
    }

    fn refresh_layer(&self, name: &str, url: &str, shader: Option<String>) {
        let existed = self.drop_layer(name);
        let source = self.core.urls.cache_bust(url);
        info!(layer = name, url = %source, replaced = existed, "refreshing layer");
        self.core.host.add_layer(&LayerSpec {
            name: name.to_owned(),
            source,
            shader,
        });
    }
}

impl<H> ViewerDriver for NeuroglancerDriver<H>
where
    H: NeuroglancerHost + 'static,
{
    type Element = H::Element;
    type Viewport = NeuroglancerViewportDriver<H>;

    fn viewport_drivers(&self) -> Vec<Self::Viewport> {
        let panels = self
            .core
            .host
            .query_selector_all(&self.core.settings.panel_selector);
        if panels.is_empty() {
            debug!("no viewer panels discovered");
            return Vec::new();
        }
        let state = match self.viewer_state() {
            Ok(state) => state,
            Err(err) => {
                warn!(%err, "cannot read viewer layout");
                return Vec::new();
            }
        };
        let Some(tag) = state.layout.as_ref().map(LayoutSpec::tag) else {
            debug!("viewer has no layout yet");
            return Vec::new();
        };
        let Some(layout) = ViewerLayout::parse(tag) else {
            debug!(layout = tag, "unrecognized layout");
            return Vec::new();
        };
        match layout {
            ViewerLayout::Quad => debug!(panels = panels.len(), "detected quad layout"),
            ViewerLayout::SinglePlane { plane, with_3d } => {
                debug!(plane = plane.as_str(), with_3d, "detected single-plane layout");
            }
        }
        layout
            .bindings(panels.len())
            .into_iter()
            .filter_map(|binding| {
                let panel = panels.get(binding.panel_index)?.clone();
                Some(NeuroglancerViewportDriver::new(
                    Rc::clone(&self.core),
                    panel,
                    binding.plane,
                ))
            })
            .collect()
    }

    fn tracked_element(&self) -> Result<Self::Element, DriverError> {
        self.core.tracked_element()
    }

    fn refresh_view(&self, params: &RefreshViewParams) -> Result<(), DriverError> {
        let shader = self.resolve_shader(params)?;
        self.refresh_layer(&params.native_view.name, &params.native_view.url, shader);
        Ok(())
    }

    fn on_viewports_changed(&self, mut handler: ViewportsChangedHandler) {
        let core = Rc::downgrade(&self.core);
        self.core
            .host
            .add_layers_changed_listener(Box::new(move || {
                let Some(core) = core.upgrade() else {
                    return;
                };
                if state_is_settled(&core.host.state_json()) {
                    handler();
                } else {
                    trace!("viewer not settled; holding viewports-changed notification");
                }
            }));
    }

    fn data_view_on_display(&self) -> Result<Option<NativeView>, DriverError> {
        Ok(self
            .image_layers()?
            .iter()
            .find(|layer| layer.visible)
            .map(ImageLayer::native_view))
    }

    fn open_data_views(&self) -> Result<Vec<NativeView>, DriverError> {
        Ok(self
            .image_layers()?
            .iter()
            .map(ImageLayer::native_view)
            .collect())
    }
}
