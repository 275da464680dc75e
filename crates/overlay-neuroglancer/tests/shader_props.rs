// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use overlay_neuroglancer::predictions_shader;
use proptest::prelude::*;

fn emitted_sum(shader: &str) -> &str {
    let start = shader.find("vec4(").map_or(0, |i| i + "vec4(".len());
    let end = shader.find(", 1.0)").unwrap_or(shader.len());
    &shader[start..end]
}

proptest! {
    #[test]
    fn one_term_per_channel_summed_once(colors in prop::collection::vec(any::<[u8; 3]>(), 1..12)) {
        let shader = predictions_shader(&colors);
        prop_assert_eq!(shader.matches("toNormalized(getDataValue(").count(), colors.len());
        let terms: Vec<String> = (0..colors.len()).map(|i| format!("color{i}")).collect();
        prop_assert_eq!(emitted_sum(&shader), terms.join(" + "));
        prop_assert_eq!(shader.matches("emitRGBA(").count(), 1);
        for (i, [r, g, b]) in colors.iter().enumerate() {
            let line = format!("vec3 color{i} = (vec3({r}, {g}, {b}) / 255.0) * toNormalized(getDataValue({i}));");
            prop_assert!(shader.contains(&line));
        }
    }

    #[test]
    fn synthesis_is_deterministic(colors in prop::collection::vec(any::<[u8; 3]>(), 0..12)) {
        prop_assert_eq!(predictions_shader(&colors), predictions_shader(&colors.clone()));
    }
}
