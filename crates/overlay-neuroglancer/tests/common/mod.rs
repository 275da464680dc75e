// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(dead_code)]

use overlay_neuroglancer::{ElementRect, NeuroglancerDriver, NeuroglancerSettings, SnapshotHost};
use serde_json::{json, Value};

pub const CANVAS: ElementRect = ElementRect {
    left: 10.0,
    top: 20.0,
    width: 800.0,
    height: 600.0,
};

pub fn panel_rect(i: usize) -> ElementRect {
    let col = (i % 2) as f64;
    let row = (i / 2) as f64;
    ElementRect {
        left: 10.0 + col * 400.0,
        top: 20.0 + row * 300.0,
        width: 400.0,
        height: 300.0,
    }
}

pub fn navigation(orientation: [f64; 4], zoom: f64) -> Value {
    json!({
        "pose": {
            "position": {"value": [100.0, 200.0, 300.0]},
            "orientation": {"orientation": orientation}
        },
        "zoomFactor": {"value": zoom}
    })
}

pub fn host(layout: &str, panels: usize, layers: Value) -> SnapshotHost {
    let mut host = SnapshotHost::new(
        json!({"layout": layout, "layers": layers}),
        navigation([0.0, 0.0, 0.0, 1.0], 4.0),
    )
    .with_element("canvas", CANVAS);
    for i in 0..panels {
        host = host.with_element(".neuroglancer-panel", panel_rect(i));
    }
    host
}

pub fn driver(host: SnapshotHost) -> NeuroglancerDriver<SnapshotHost> {
    NeuroglancerDriver::new(host, NeuroglancerSettings::default()).unwrap()
}
