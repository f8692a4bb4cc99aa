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

use crate::renderer::api::*;
use crate::renderer::error::ResourceError;
use std::fmt::Debug;

/// The interface the renderer uses to create GPU objects.
pub trait GraphicsDevice: Send + Sync + Debug + 'static {
    /// Creates a pipeline layout (root signature) from the provided descriptor.
    /// ## Errors
    /// * `ResourceError` - If the backend rejects the layout.
    fn create_pipeline_layout(
        &self,
        descriptor: &PipelineLayoutDescriptor,
    ) -> Result<PipelineLayoutId, ResourceError>;

    /// Creates a shader module from precompiled bytecode.
    /// ## Errors
    /// * `ResourceError` - If the bytecode is rejected.
    fn create_shader_module(
        &self,
        descriptor: &ShaderModuleDescriptor,
    ) -> Result<ShaderModuleId, ResourceError>;

    /// Compiles a graphics pipeline.
    ///
    /// Implementations may return the same id for descriptors that compare equal.
    /// ## Errors
    /// * `ResourceError` - If the pipeline cannot be compiled.
    fn create_render_pipeline(
        &self,
        descriptor: &GraphicsPipelineDesc,
    ) -> Result<RenderPipelineId, ResourceError>;
}
