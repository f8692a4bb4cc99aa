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

//! Camera and lighting inputs computed outside the renderer.

/// The camera data the mesh passes need. Matrix math happens upstream.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraView {
    /// World to clip space.
    pub view_proj: [[f32; 4]; 4],
    /// World-space position.
    pub position: [f32; 3],
}

/// The camera data the skybox pass needs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SkyboxView {
    /// The inverse projection matrix.
    pub proj_inverse: [[f32; 4]; 4],
    /// The rotation part of the inverse view matrix.
    pub view_inverse: [[f32; 3]; 3],
    /// Extra rotation applied to the sky.
    pub rotation: [[f32; 3]; 3],
}

/// Light-grid bookkeeping produced by the lighting system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LightGridInfo {
    /// Index of the first cone light in the light buffer.
    pub first_cone_light: u32,
    /// Index of the first shadow-casting cone light in the light buffer.
    pub first_cone_shadowed_light: u32,
}
