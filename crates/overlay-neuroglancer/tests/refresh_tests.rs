// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]
mod common;

use common::{driver, host};
use overlay_neuroglancer::{predictions_shader, NeuroglancerDriver, SnapshotHost};
use overlay_viewer_port::{NativeView, RefreshViewParams, ViewerDriver};
use serde_json::{json, Value};

const PREDS_URL: &str = "precomputed://https://ilastik.example/predictions/run_id=abc/data";

fn layers() -> Value {
    json!([
        {"name": "raw", "type": "image", "source": "gs://bucket/raw", "shader": "void main() { emitGrayscale(1.0); }"},
        {"name": "seg", "type": "segmentation", "source": "precomputed://seg", "visible": true},
        {"name": "hidden", "type": "image", "source": "precomputed://hidden", "visible": false}
    ])
}

fn refresh(driver: &NeuroglancerDriver<SnapshotHost>, params: RefreshViewParams) {
    driver.refresh_view(&params).unwrap();
}

fn count_named(driver: &NeuroglancerDriver<SnapshotHost>, name: &str) -> usize {
    driver
        .host()
        .layer_names()
        .iter()
        .filter(|n| n.as_str() == name)
        .count()
}

fn source_of(driver: &NeuroglancerDriver<SnapshotHost>, name: &str) -> String {
    driver.host().layer(name).unwrap()["source"]
        .as_str()
        .unwrap()
        .to_owned()
}

#[test]
fn refreshing_twice_leaves_exactly_one_layer() {
    let driver = driver(host("xy", 1, layers()));
    let params = RefreshViewParams::new(NativeView::new("preds", PREDS_URL));
    refresh(&driver, params.clone());
    assert_eq!(count_named(&driver, "preds"), 1);
    refresh(&driver, params);
    assert_eq!(count_named(&driver, "preds"), 1);
    assert_eq!(driver.host().layer_names().len(), 4);
}

#[test]
fn successive_refreshes_bust_the_cache_differently() {
    let driver = driver(host("xy", 1, layers()));
    let params = RefreshViewParams::new(NativeView::new("preds", PREDS_URL));
    refresh(&driver, params.clone());
    let first = source_of(&driver, "preds");
    refresh(&driver, params);
    let second = source_of(&driver, "preds");
    assert_ne!(first, second);
    for url in [&first, &second] {
        assert!(url.starts_with("precomputed://https://ilastik.example/predictions/run_id="));
        assert!(url.ends_with("/data"));
        assert!(!url.contains("run_id=abc"));
    }
}

#[test]
fn channel_colors_synthesize_a_shader() {
    let driver = driver(host("xy", 1, layers()));
    let colors = vec![[255, 0, 0], [0, 255, 0]];
    refresh(
        &driver,
        RefreshViewParams::new(NativeView::new("preds", PREDS_URL))
            .with_channel_colors(colors.clone())
            .with_similar_url_hint("https://storage.googleapis.com/bucket/raw"),
    );
    let layer = driver.host().layer("preds").unwrap();
    assert_eq!(layer["shader"], json!(predictions_shader(&colors)));
}

#[test]
fn similar_url_hint_copies_sibling_shader() {
    let driver = driver(host("xy", 1, layers()));
    refresh(
        &driver,
        RefreshViewParams::new(NativeView::new("preds", PREDS_URL))
            .with_similar_url_hint("https://storage.googleapis.com/bucket/raw"),
    );
    assert_eq!(
        driver.host().layer("preds").unwrap()["shader"],
        "void main() { emitGrayscale(1.0); }"
    );
}

#[test]
fn unmatched_hint_keeps_default_rendering() {
    let driver = driver(host("xy", 1, layers()));
    refresh(
        &driver,
        RefreshViewParams::new(NativeView::new("preds", PREDS_URL))
            .with_similar_url_hint("precomputed://nowhere"),
    );
    assert!(driver.host().layer("preds").unwrap().get("shader").is_none());
}

#[test]
fn refresh_replaces_existing_layer_with_same_name() {
    let driver = driver(host("xy", 1, layers()));
    refresh(
        &driver,
        RefreshViewParams::new(NativeView::new("raw", "precomputed://fresh/run_id=1")),
    );
    assert_eq!(count_named(&driver, "raw"), 1);
    let layer = driver.host().layer("raw").unwrap();
    assert!(layer.get("shader").is_none());
    assert!(source_of(&driver, "raw").starts_with("precomputed://fresh/run_id="));
    // Drop-then-add moves the layer to the end of the host order.
    assert_eq!(driver.host().layer_names().last().map(String::as_str), Some("raw"));
}

#[test]
fn dropping_missing_layer_reports_false() {
    let driver = driver(host("xy", 1, layers()));
    assert!(!driver.drop_layer("ghost"));
    assert!(driver.drop_layer("seg"));
    assert_eq!(count_named(&driver, "seg"), 0);
}

#[test]
fn image_layers_normalize_sources_and_visibility() {
    let driver = driver(SnapshotHost::new(
        json!({"layers": [{"name": "raw", "type": "image", "source": "gs://bucket/path"}]}),
        json!({}),
    ));
    let layers = driver.image_layers().unwrap();
    assert_eq!(layers.len(), 1);
    assert_eq!(layers[0].source, "https://storage.googleapis.com/bucket/path");
    assert!(layers[0].visible);
}

#[test]
fn open_views_list_every_image_layer() {
    let driver = driver(host("xy", 1, layers()));
    assert_eq!(
        driver.open_data_views().unwrap(),
        vec![
            NativeView::new("raw", "https://storage.googleapis.com/bucket/raw"),
            NativeView::new("hidden", "precomputed://hidden"),
        ]
    );
}

#[test]
fn view_on_display_is_first_visible_image_layer() {
    let driver = driver(host(
        "xy",
        1,
        json!([
            {"name": "hidden", "type": "image", "source": "precomputed://hidden", "visible": false},
            {"name": "seg", "type": "segmentation", "source": "precomputed://seg"},
            {"name": "shown", "type": "image", "source": "precomputed://shown"},
            {"name": "later", "type": "image", "source": "precomputed://later"}
        ]),
    ));
    assert_eq!(
        driver.data_view_on_display().unwrap(),
        Some(NativeView::new("shown", "precomputed://shown"))
    );
}

#[test]
fn nothing_on_display_without_visible_images() {
    let driver = driver(host("xy", 1, json!([])));
    assert_eq!(driver.data_view_on_display().unwrap(), None);
    assert!(driver.open_data_views().unwrap().is_empty());
}
