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

//! Constant buffer layouts shared with the mesh shaders.

/// Per-frame constants bound at `CommonCbv`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalConstants {
    /// World to clip space.
    pub view_proj: [[f32; 4]; 4],
    /// World to sun shadow-map space.
    pub sun_shadow_matrix: [[f32; 4]; 4],
    /// Camera position (xyz), w unused.
    pub camera_pos: [f32; 4],
    /// Direction towards the sun (xyz), w unused.
    pub sun_direction: [f32; 4],
    /// Sun color times intensity (xyz), w unused.
    pub sun_intensity: [f32; 4],
    /// Highest mip of the specular IBL cube map.
    pub ibl_range: f32,
    /// Mip bias applied when sampling the specular IBL cube map.
    pub ibl_bias: f32,
    /// Free-form value for shader debugging.
    pub debug_flag: f32,
    /// Padding for 16-byte alignment.
    pub _padding: f32,
    /// x = one over the shadow map width.
    pub shadow_texel_size: [f32; 4],
    /// One over the light-grid tile size (xy).
    pub inv_tile_dim: [f32; 4],
    /// Number of light-grid tiles across (x) and down (y) the scene color target.
    pub tile_count: [u32; 4],
    /// x = first cone light, y = first shadowed cone light.
    pub first_light_index: [u32; 4],
}

/// Vertex-stage constants of the skybox draw.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkyboxVsConstants {
    /// Clip to view space.
    pub proj_inverse: [[f32; 4]; 4],
    /// View to world rotation (3x3, rows padded).
    pub view_inverse: [[f32; 4]; 3],
    /// Extra rotation applied to the sky.
    pub rotation: [[f32; 4]; 3],
}

/// Pixel-stage constants of the skybox draw.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkyboxPsConstants {
    /// The mip sampled from the sky cube map.
    pub texture_level: f32,
    /// Padding for 16-byte alignment.
    pub _padding: [f32; 3],
}
