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

//! Main pipeline descriptors.

use super::enums::PrimitiveTopology;
use super::layout::{InputLayout, PipelineLayoutId};
use super::state::*;
use crate::renderer::api::{core::ShaderModuleId, util::TextureFormat};

/// A complete, owned description of a graphics pipeline.
///
/// Equality and hashing are structural, so a pipeline library can map equal
/// descriptors to the same compiled object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GraphicsPipelineDesc {
    /// The pipeline layout (root signature).
    pub layout: PipelineLayoutId,
    /// Rasterizer state.
    pub rasterizer: RasterizerState,
    /// Blend state shared by all color targets.
    pub blend: BlendState,
    /// Depth test state.
    pub depth_stencil: DepthStencilState,
    /// The vertex input layout.
    pub input_layout: InputLayout,
    /// Primitive assembly topology.
    pub topology: PrimitiveTopology,
    /// The vertex shader.
    pub vertex_shader: Option<ShaderModuleId>,
    /// The pixel shader. `None` for depth-only pipelines.
    pub pixel_shader: Option<ShaderModuleId>,
    /// Formats of the bound color targets, in slot order.
    pub color_formats: Vec<TextureFormat>,
    /// The format of the depth target, if any.
    pub depth_format: Option<TextureFormat>,
}

impl GraphicsPipelineDesc {
    /// Creates a descriptor with default state bound to `layout`.
    pub fn new(layout: PipelineLayoutId) -> Self {
        Self {
            layout,
            rasterizer: RasterizerState::DEFAULT,
            blend: BlendState::DISABLED,
            depth_stencil: DepthStencilState::READ_WRITE,
            input_layout: InputLayout::new(),
            topology: PrimitiveTopology::TriangleList,
            vertex_shader: None,
            pixel_shader: None,
            color_formats: Vec::new(),
            depth_format: None,
        }
    }
}

/// An opaque handle to a compiled render pipeline state object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderPipelineId(pub usize);
