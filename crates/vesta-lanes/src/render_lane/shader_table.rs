// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The fixed set of precompiled shader programs and the tables selecting them.

use std::borrow::Cow;
use vesta_core::renderer::{
    GraphicsDevice, PsoFlags, ResourceError, ShaderModuleDescriptor, ShaderModuleId, ShaderStage,
};

/// Every shader program the mesh renderer binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderProgram {
    /// Position-only depth pass.
    DepthOnlyVs,
    /// Skinned position-only depth pass.
    DepthOnlySkinVs,
    /// Depth pass with a UV for alpha testing.
    CutoutDepthVs,
    /// Skinned depth pass with a UV for alpha testing.
    CutoutDepthSkinVs,
    /// Alpha-test discard for depth passes.
    CutoutDepthPs,
    /// Color pass, tangent and second UV.
    DefaultVs,
    /// Skinned color pass, tangent and second UV.
    DefaultSkinVs,
    /// Color pass, tangent only.
    DefaultNoUv1Vs,
    /// Skinned color pass, tangent only.
    DefaultNoUv1SkinVs,
    /// Color pass, second UV only.
    DefaultNoTangentVs,
    /// Skinned color pass, second UV only.
    DefaultNoTangentSkinVs,
    /// Color pass, neither tangent nor second UV.
    DefaultNoTangentNoUv1Vs,
    /// Skinned color pass, neither tangent nor second UV.
    DefaultNoTangentNoUv1SkinVs,
    /// Shading with normal mapping and a second UV.
    DefaultPs,
    /// Shading with normal mapping.
    DefaultNoUv1Ps,
    /// Shading with a second UV.
    DefaultNoTangentPs,
    /// Shading with neither.
    DefaultNoTangentNoUv1Ps,
    /// Full-screen sky triangle.
    SkyboxVs,
    /// Sky cube-map lookup.
    SkyboxPs,
}

impl ShaderProgram {
    /// The number of programs.
    pub const COUNT: usize = 19;

    /// Every program, in declaration order.
    pub const ALL: [ShaderProgram; Self::COUNT] = [
        ShaderProgram::DepthOnlyVs,
        ShaderProgram::DepthOnlySkinVs,
        ShaderProgram::CutoutDepthVs,
        ShaderProgram::CutoutDepthSkinVs,
        ShaderProgram::CutoutDepthPs,
        ShaderProgram::DefaultVs,
        ShaderProgram::DefaultSkinVs,
        ShaderProgram::DefaultNoUv1Vs,
        ShaderProgram::DefaultNoUv1SkinVs,
        ShaderProgram::DefaultNoTangentVs,
        ShaderProgram::DefaultNoTangentSkinVs,
        ShaderProgram::DefaultNoTangentNoUv1Vs,
        ShaderProgram::DefaultNoTangentNoUv1SkinVs,
        ShaderProgram::DefaultPs,
        ShaderProgram::DefaultNoUv1Ps,
        ShaderProgram::DefaultNoTangentPs,
        ShaderProgram::DefaultNoTangentNoUv1Ps,
        ShaderProgram::SkyboxVs,
        ShaderProgram::SkyboxPs,
    ];

    /// A stable name, used as the module label.
    pub const fn name(self) -> &'static str {
        match self {
            ShaderProgram::DepthOnlyVs => "depth_only_vs",
            ShaderProgram::DepthOnlySkinVs => "depth_only_skin_vs",
            ShaderProgram::CutoutDepthVs => "cutout_depth_vs",
            ShaderProgram::CutoutDepthSkinVs => "cutout_depth_skin_vs",
            ShaderProgram::CutoutDepthPs => "cutout_depth_ps",
            ShaderProgram::DefaultVs => "default_vs",
            ShaderProgram::DefaultSkinVs => "default_skin_vs",
            ShaderProgram::DefaultNoUv1Vs => "default_no_uv1_vs",
            ShaderProgram::DefaultNoUv1SkinVs => "default_no_uv1_skin_vs",
            ShaderProgram::DefaultNoTangentVs => "default_no_tangent_vs",
            ShaderProgram::DefaultNoTangentSkinVs => "default_no_tangent_skin_vs",
            ShaderProgram::DefaultNoTangentNoUv1Vs => "default_no_tangent_no_uv1_vs",
            ShaderProgram::DefaultNoTangentNoUv1SkinVs => "default_no_tangent_no_uv1_skin_vs",
            ShaderProgram::DefaultPs => "default_ps",
            ShaderProgram::DefaultNoUv1Ps => "default_no_uv1_ps",
            ShaderProgram::DefaultNoTangentPs => "default_no_tangent_ps",
            ShaderProgram::DefaultNoTangentNoUv1Ps => "default_no_tangent_no_uv1_ps",
            ShaderProgram::SkyboxVs => "skybox_vs",
            ShaderProgram::SkyboxPs => "skybox_ps",
        }
    }

    /// The stage the program runs in.
    pub const fn stage(self) -> ShaderStage {
        match self {
            ShaderProgram::CutoutDepthPs
            | ShaderProgram::DefaultPs
            | ShaderProgram::DefaultNoUv1Ps
            | ShaderProgram::DefaultNoTangentPs
            | ShaderProgram::DefaultNoTangentNoUv1Ps
            | ShaderProgram::SkyboxPs => ShaderStage::Pixel,
            _ => ShaderStage::Vertex,
        }
    }
}

/// Color-pass programs indexed by `skinned << 2 | tangent << 1 | uv1`.
const COLOR_SHADERS: [(ShaderProgram, ShaderProgram); 8] = [
    (
        ShaderProgram::DefaultNoTangentNoUv1Vs,
        ShaderProgram::DefaultNoTangentNoUv1Ps,
    ),
    (
        ShaderProgram::DefaultNoTangentVs,
        ShaderProgram::DefaultNoTangentPs,
    ),
    (ShaderProgram::DefaultNoUv1Vs, ShaderProgram::DefaultNoUv1Ps),
    (ShaderProgram::DefaultVs, ShaderProgram::DefaultPs),
    (
        ShaderProgram::DefaultNoTangentNoUv1SkinVs,
        ShaderProgram::DefaultNoTangentNoUv1Ps,
    ),
    (
        ShaderProgram::DefaultNoTangentSkinVs,
        ShaderProgram::DefaultNoTangentPs,
    ),
    (
        ShaderProgram::DefaultNoUv1SkinVs,
        ShaderProgram::DefaultNoUv1Ps,
    ),
    (ShaderProgram::DefaultSkinVs, ShaderProgram::DefaultPs),
];

/// Selects the vertex and pixel programs of a mesh's color pass.
pub fn color_shaders(flags: PsoFlags) -> (ShaderProgram, ShaderProgram) {
    let index = (usize::from(flags.is_skinned()) << 2)
        | (usize::from(flags.contains(PsoFlags::HAS_TANGENT)) << 1)
        | usize::from(flags.contains(PsoFlags::HAS_UV1));
    COLOR_SHADERS[index]
}

/// Index of a mesh's depth-only pipeline in the fixed depth table.
///
/// Add [`SHADOW_PSO_OFFSET`] for the shadow-map variant.
pub fn depth_pso_index(flags: PsoFlags) -> u8 {
    u8::from(flags.is_alpha_tested())
        + (u8::from(flags.is_skinned()) << 1)
        + (u8::from(flags.is_two_sided()) << 2)
}

/// Distance between a depth pipeline and its shadow-map variant.
pub const SHADOW_PSO_OFFSET: u8 = 8;

/// Number of fixed depth and shadow pipelines at the front of the cache.
pub const DEPTH_PSO_COUNT: usize = 16;

/// Shader module ids for every [`ShaderProgram`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderLibrary {
    modules: [ShaderModuleId; ShaderProgram::COUNT],
}

impl ShaderLibrary {
    /// Creates one module per program from the bytecode returned by `bytecode`.
    pub fn build<'a, F>(device: &dyn GraphicsDevice, mut bytecode: F) -> Result<Self, ResourceError>
    where
        F: FnMut(ShaderProgram) -> Cow<'a, [u8]>,
    {
        let mut modules = [ShaderModuleId(0); ShaderProgram::COUNT];
        for (slot, program) in modules.iter_mut().zip(ShaderProgram::ALL) {
            let descriptor = ShaderModuleDescriptor {
                label: Some(program.name()),
                stage: program.stage(),
                bytecode: bytecode(program),
            };
            *slot = device.create_shader_module(&descriptor)?;
        }
        log::debug!("Created {} mesh shader modules", ShaderProgram::COUNT);
        Ok(Self { modules })
    }

    /// Wraps modules that were created elsewhere.
    pub fn from_fn(mut module: impl FnMut(ShaderProgram) -> ShaderModuleId) -> Self {
        Self {
            modules: ShaderProgram::ALL.map(&mut module),
        }
    }

    /// The module of `program`.
    pub fn get(&self, program: ShaderProgram) -> ShaderModuleId {
        self.modules[program as usize]
    }
}
