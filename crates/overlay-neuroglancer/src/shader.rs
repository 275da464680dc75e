// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shader synthesis for multi-channel prediction layers.

use core::fmt::Write as _;

use overlay_viewer_port::ColorRgb8;

/// Builds a Neuroglancer image shader mixing one color per channel.
///
/// Channel `i` contributes `(colors[i] / 255) * toNormalized(getDataValue(i))`;
/// all contributions are summed once and emitted as an opaque color. The
/// output is a pure function of the ordered input.
pub fn predictions_shader(channel_colors: &[ColorRgb8]) -> String {
    let mut color_lines = String::new();
    for (idx, [r, g, b]) in channel_colors.iter().enumerate() {
        let _ = writeln!(
            color_lines,
            "    vec3 color{idx} = (vec3({r}, {g}, {b}) / 255.0) * toNormalized(getDataValue({idx}));"
        );
    }
    let mix = if channel_colors.is_empty() {
        "vec3(0.0)".to_owned()
    } else {
        (0..channel_colors.len())
            .map(|idx| format!("color{idx}"))
            .collect::<Vec<_>>()
            .join(" + ")
    };

    format!("void main() {{\n{color_lines}    emitRGBA(\n        vec4({mix}, 1.0)\n    );\n}}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_channels_render_expected_program() {
        let shader = predictions_shader(&[[255, 0, 0], [0, 255, 0]]);
        let expected = "void main() {\n\
            \x20   vec3 color0 = (vec3(255, 0, 0) / 255.0) * toNormalized(getDataValue(0));\n\
            \x20   vec3 color1 = (vec3(0, 255, 0) / 255.0) * toNormalized(getDataValue(1));\n\
            \x20   emitRGBA(\n\
            \x20       vec4(color0 + color1, 1.0)\n\
            \x20   );\n\
            }";
        assert_eq!(shader, expected);
    }

    #[test]
    fn no_channels_emit_black() {
        let shader = predictions_shader(&[]);
        assert!(!shader.contains("color0"));
        assert!(shader.contains("vec4(vec3(0.0), 1.0)"));
    }
}
