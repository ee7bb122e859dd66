//! Procedural meshes and shaders that ship with the engine

use super::{AssetError, AssetLoader, MeshData, ShaderProgram, Vertex};
use crate::foundation::math::{constants::PI, Vec3};

/// Loader serving the built-in `cube`, `sphere`, `capsule`, `unlit` and `lit` assets
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLoader;

impl AssetLoader for BuiltinLoader {
    fn load_mesh(&mut self, name: &str) -> Result<MeshData, AssetError> {
        match name {
            "cube" => Ok(cube()),
            "sphere" => Ok(sphere()),
            "capsule" => Ok(capsule()),
            _ => Err(AssetError::NotFound(name.to_string())),
        }
    }

    fn load_shader_program(&mut self, name: &str) -> Result<ShaderProgram, AssetError> {
        match name {
            "unlit" => Ok(unlit_shader()),
            "lit" => Ok(lit_shader()),
            _ => Err(AssetError::NotFound(name.to_string())),
        }
    }
}

/// Unit cube centred on the origin, half extent 1, flat normals
pub(super) fn cube() -> MeshData {
    let faces = [
        (Vec3::x(), Vec3::y(), Vec3::z()),
        (-Vec3::x(), Vec3::y(), -Vec3::z()),
        (Vec3::y(), Vec3::z(), Vec3::x()),
        (-Vec3::y(), Vec3::z(), -Vec3::x()),
        (Vec3::z(), Vec3::x(), Vec3::y()),
        (-Vec3::z(), Vec3::x(), -Vec3::y()),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let base = vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            vertices.push(Vertex::new(normal + u * su + v * sv, normal));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    MeshData {
        name: "cube".to_string(),
        vertices,
        indices,
    }
}

/// Latitude/longitude grid; rows above the equator are lifted by `stretch`
fn rounded(name: &str, rings: u32, segments: u32, stretch: f32) -> MeshData {
    let mut vertices = Vec::with_capacity(((rings + 1) * (segments + 1)) as usize);
    for ring in 0..=rings {
        let theta = PI * ring as f32 / rings as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();
        let lift = if ring * 2 <= rings { stretch } else { -stretch };
        for segment in 0..=segments {
            let phi = 2.0 * PI * segment as f32 / segments as f32;
            let normal = Vec3::new(sin_theta * phi.cos(), cos_theta, sin_theta * phi.sin());
            vertices.push(Vertex::new(normal + Vec3::new(0.0, lift, 0.0), normal));
        }
    }

    let mut indices = Vec::with_capacity((rings * segments * 6) as usize);
    let row = segments + 1;
    for ring in 0..rings {
        for segment in 0..segments {
            let a = ring * row + segment;
            let b = a + row;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }

    MeshData {
        name: name.to_string(),
        vertices,
        indices,
    }
}

/// Unit sphere
pub(super) fn sphere() -> MeshData {
    rounded("sphere", 12, 16, 0.0)
}

/// Capsule of radius 1 with a core segment of length 2
pub(super) fn capsule() -> MeshData {
    rounded("capsule", 12, 16, 1.0)
}

pub(super) fn unlit_shader() -> ShaderProgram {
    ShaderProgram {
        name: "unlit".to_string(),
        vertex_source: r"#version 450
layout(location = 0) in vec3 position;
layout(push_constant) uniform Push { mat4 mvp; } push;
void main() { gl_Position = push.mvp * vec4(position, 1.0); }
"
        .to_string(),
        fragment_source: r"#version 450
layout(location = 0) out vec4 color;
void main() { color = vec4(1.0); }
"
        .to_string(),
    }
}

fn lit_shader() -> ShaderProgram {
    ShaderProgram {
        name: "lit".to_string(),
        vertex_source: r"#version 450
layout(location = 0) in vec3 position;
layout(location = 1) in vec3 normal;
layout(push_constant) uniform Push { mat4 mvp; mat4 model; } push;
layout(location = 0) out vec3 world_normal;
void main() {
    world_normal = mat3(push.model) * normal;
    gl_Position = push.mvp * vec4(position, 1.0);
}
"
        .to_string(),
        fragment_source: r"#version 450
layout(location = 0) in vec3 world_normal;
layout(location = 0) out vec4 color;
void main() {
    float light = max(dot(normalize(world_normal), normalize(vec3(0.3, 1.0, 0.2))), 0.1);
    color = vec4(vec3(light), 1.0);
}
"
        .to_string(),
    }
}
