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

//! Pipeline state objects under construction and the library that compiles them.

use ahash::AHashMap;
use std::borrow::Cow;
use vesta_core::renderer::{
    BlendState, DepthStencilState, GraphicsDevice, GraphicsPipelineDesc, InputLayout,
    PipelineError, PipelineLayoutId, PrimitiveTopology, RasterizerState, RenderPipelineId,
    ResourceError, ShaderModuleId, TextureFormat,
};

/// Compiled pipelines keyed by their full description.
///
/// Finalizing a description that was already compiled returns the existing
/// handle, so pipeline identity is structural.
#[derive(Debug, Default)]
pub struct PipelineLibrary {
    pipelines: AHashMap<GraphicsPipelineDesc, RenderPipelineId>,
}

impl PipelineLibrary {
    /// Creates an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle compiled for `desc`, compiling it on first use.
    pub fn get_or_create(
        &mut self,
        device: &dyn GraphicsDevice,
        desc: &GraphicsPipelineDesc,
        label: &str,
    ) -> Result<RenderPipelineId, ResourceError> {
        if let Some(id) = self.pipelines.get(desc) {
            log::trace!("Pipeline '{label}' reuses {id:?}");
            return Ok(*id);
        }

        let id = device.create_render_pipeline(desc)?;
        log::debug!("Compiled pipeline '{label}' as {id:?}");
        self.pipelines.insert(desc.clone(), id);
        Ok(id)
    }

    /// Number of distinct pipelines compiled so far.
    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    /// Returns `true` if nothing was compiled yet.
    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}

/// A graphics pipeline being configured.
///
/// Every setter drops the compiled handle; call [`GraphicsPso::finalize`] again
/// before binding.
#[derive(Debug, Clone)]
pub struct GraphicsPso {
    label: Cow<'static, str>,
    desc: GraphicsPipelineDesc,
    handle: Option<RenderPipelineId>,
}

impl GraphicsPso {
    /// Creates an unfinalized pipeline with default state bound to `layout`.
    pub fn new(label: impl Into<Cow<'static, str>>, layout: PipelineLayoutId) -> Self {
        Self {
            label: label.into(),
            desc: GraphicsPipelineDesc::new(layout),
            handle: None,
        }
    }

    /// Returns a copy under a new label, keeping state and handle.
    pub fn relabeled(&self, label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            label: label.into(),
            ..self.clone()
        }
    }

    /// The debug label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The full description.
    pub fn desc(&self) -> &GraphicsPipelineDesc {
        &self.desc
    }

    /// The compiled handle, if finalized since the last change.
    pub fn handle(&self) -> Option<RenderPipelineId> {
        self.handle
    }

    /// The compiled handle, or an error naming this pipeline.
    pub fn finalized_handle(&self) -> Result<RenderPipelineId, PipelineError> {
        self.handle.ok_or_else(|| PipelineError::NotFinalized {
            label: self.label.to_string(),
        })
    }

    /// Sets the rasterizer state.
    pub fn set_rasterizer_state(&mut self, state: RasterizerState) {
        self.desc.rasterizer = state;
        self.handle = None;
    }

    /// Sets the blend state.
    pub fn set_blend_state(&mut self, state: BlendState) {
        self.desc.blend = state;
        self.handle = None;
    }

    /// Sets the depth-stencil state.
    pub fn set_depth_stencil_state(&mut self, state: DepthStencilState) {
        self.desc.depth_stencil = state;
        self.handle = None;
    }

    /// Sets the vertex input layout.
    pub fn set_input_layout(&mut self, layout: InputLayout) {
        self.desc.input_layout = layout;
        self.handle = None;
    }

    /// Sets the primitive topology.
    pub fn set_primitive_topology(&mut self, topology: PrimitiveTopology) {
        self.desc.topology = topology;
        self.handle = None;
    }

    /// Sets the color and depth target formats.
    pub fn set_render_target_formats(
        &mut self,
        colors: &[TextureFormat],
        depth: Option<TextureFormat>,
    ) {
        self.desc.color_formats = colors.to_vec();
        self.desc.depth_format = depth;
        self.handle = None;
    }

    /// Sets the vertex shader.
    pub fn set_vertex_shader(&mut self, shader: ShaderModuleId) {
        self.desc.vertex_shader = Some(shader);
        self.handle = None;
    }

    /// Sets or clears the pixel shader.
    pub fn set_pixel_shader(&mut self, shader: Option<ShaderModuleId>) {
        self.desc.pixel_shader = shader;
        self.handle = None;
    }

    /// Compiles the current state through `library` and stores the handle.
    pub fn finalize(
        &mut self,
        library: &mut PipelineLibrary,
        device: &dyn GraphicsDevice,
    ) -> Result<RenderPipelineId, ResourceError> {
        let id = library.get_or_create(device, &self.desc, &self.label)?;
        self.handle = Some(id);
        Ok(id)
    }
}
