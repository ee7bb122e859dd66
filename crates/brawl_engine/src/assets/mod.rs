//! Asset management system
//!
//! [`AssetLoader`] is the seam to whatever produces mesh and shader data. The
//! [`AssetManager`] in front of it caches by name and hands out slotmap handles.
//! A load that fails logs a warning and resolves to the built-in default mesh
//! or shader, so callers always get a usable handle.

mod builtin;

pub use builtin::BuiltinLoader;

use crate::foundation::math::Vec3;
use slotmap::{new_key_type, SlotMap};
use std::collections::HashMap;
use thiserror::Error;

new_key_type! {
    /// Handle to a cached mesh
    pub struct MeshHandle;
    /// Handle to a cached shader program
    pub struct ShaderHandle;
}

/// Asset loading errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssetError {
    /// No asset with this name
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// The asset exists but its data is unusable
    #[error("Invalid asset data: {0}")]
    InvalidData(String),
}

/// Vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Model-space position
    pub position: Vec3,
    /// Unit normal
    pub normal: Vec3,
}

impl Vertex {
    /// Create a vertex
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

/// Indexed triangle mesh
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    /// Name the mesh was loaded under
    pub name: String,
    /// Vertex data
    pub vertices: Vec<Vertex>,
    /// Triangle list indices
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Check that the mesh is a non-empty triangle list with in-range indices
    pub fn validate(&self) -> Result<(), AssetError> {
        if self.vertices.is_empty() || self.indices.is_empty() || self.indices.len() % 3 != 0 {
            return Err(AssetError::InvalidData(format!("mesh '{}' is not a triangle list", self.name)));
        }
        let vertex_count = self.vertices.len();
        if self.indices.iter().any(|&i| i as usize >= vertex_count) {
            return Err(AssetError::InvalidData(format!("mesh '{}' indexes past its vertices", self.name)));
        }
        Ok(())
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Vertex and fragment stage sources
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderProgram {
    /// Name the program was loaded under
    pub name: String,
    /// Vertex stage source
    pub vertex_source: String,
    /// Fragment stage source
    pub fragment_source: String,
}

/// Producer of mesh and shader data
pub trait AssetLoader {
    /// Load the mesh called `name`
    fn load_mesh(&mut self, name: &str) -> Result<MeshData, AssetError>;

    /// Load the shader program called `name`
    fn load_shader_program(&mut self, name: &str) -> Result<ShaderProgram, AssetError>;
}

/// Name-keyed cache in front of an [`AssetLoader`]
pub struct AssetManager {
    loader: Box<dyn AssetLoader>,
    meshes: SlotMap<MeshHandle, MeshData>,
    shaders: SlotMap<ShaderHandle, ShaderProgram>,
    mesh_names: HashMap<String, MeshHandle>,
    shader_names: HashMap<String, ShaderHandle>,
    default_mesh: MeshHandle,
    default_shader: ShaderHandle,
}

impl Default for AssetManager {
    fn default() -> Self {
        Self::new(Box::new(BuiltinLoader))
    }
}

impl AssetManager {
    /// Create a manager; the built-in cube and unlit shader become the fallbacks
    pub fn new(loader: Box<dyn AssetLoader>) -> Self {
        let mut meshes = SlotMap::with_key();
        let mut shaders = SlotMap::with_key();
        let default_mesh = meshes.insert(builtin::cube());
        let default_shader = shaders.insert(builtin::unlit_shader());
        Self {
            loader,
            meshes,
            shaders,
            mesh_names: HashMap::new(),
            shader_names: HashMap::new(),
            default_mesh,
            default_shader,
        }
    }

    /// Handle of the fallback mesh
    pub fn default_mesh(&self) -> MeshHandle {
        self.default_mesh
    }

    /// Handle of the fallback shader
    pub fn default_shader(&self) -> ShaderHandle {
        self.default_shader
    }

    /// Load a mesh by name, reusing the cached copy when there is one
    pub fn load_mesh(&mut self, name: &str) -> MeshHandle {
        if let Some(&handle) = self.mesh_names.get(name) {
            return handle;
        }

        let handle = match self.loader.load_mesh(name).and_then(|mesh| mesh.validate().map(|()| mesh)) {
            Ok(mesh) => {
                log::debug!("Loaded mesh '{}' ({} triangles)", name, mesh.triangle_count());
                self.meshes.insert(mesh)
            }
            Err(error) => {
                log::warn!("Falling back to default mesh for '{}': {}", name, error);
                self.default_mesh
            }
        };
        self.mesh_names.insert(name.to_string(), handle);
        handle
    }

    /// Load a shader program by name, reusing the cached copy when there is one
    pub fn load_shader_program(&mut self, name: &str) -> ShaderHandle {
        if let Some(&handle) = self.shader_names.get(name) {
            return handle;
        }

        let handle = match self.loader.load_shader_program(name) {
            Ok(program) => {
                log::debug!("Loaded shader program '{}'", name);
                self.shaders.insert(program)
            }
            Err(error) => {
                log::warn!("Falling back to default shader for '{}': {}", name, error);
                self.default_shader
            }
        };
        self.shader_names.insert(name.to_string(), handle);
        handle
    }

    /// Cached mesh data
    pub fn mesh(&self, handle: MeshHandle) -> Option<&MeshData> {
        self.meshes.get(handle)
    }

    /// Cached shader program
    pub fn shader_program(&self, handle: ShaderHandle) -> Option<&ShaderProgram> {
        self.shaders.get(handle)
    }

    /// Number of distinct meshes held, fallback included
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }
}
