/// Vertex shader: interleaved position + color, one model-view matrix per draw
pub const COLOR_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec4 a_color;

uniform mat4 u_model_view;
uniform mat4 u_projection;

out vec4 v_color;

void main() {
    v_color = a_color;
    gl_Position = u_projection * u_model_view * vec4(a_position, 1.0);
}
"#;

/// Fragment shader: interpolated vertex color, no lighting
pub const COLOR_FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;

in vec4 v_color;

out vec4 fragColor;

void main() {
    fragColor = v_color;
}
"#;

/// Attribute location of `a_position`
pub const POSITION_LOCATION: u32 = 0;

/// Attribute location of `a_color`
pub const COLOR_LOCATION: u32 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shaders_declare_locations() {
        assert!(COLOR_VERTEX_SHADER.starts_with("#version 300 es"));
        assert!(COLOR_VERTEX_SHADER.contains(&format!("location = {}) in vec3 a_position", POSITION_LOCATION)));
        assert!(COLOR_VERTEX_SHADER.contains(&format!("location = {}) in vec4 a_color", COLOR_LOCATION)));
        assert!(COLOR_FRAGMENT_SHADER.contains("in vec4 v_color"));
    }
}
