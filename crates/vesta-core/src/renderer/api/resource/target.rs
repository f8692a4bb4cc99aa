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

//! Descriptor handles, render/depth targets and their states.

use crate::renderer::api::util::TextureFormat;

/// An opaque handle to a shader-visible descriptor heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DescriptorHeapId(pub usize);

/// A position inside a descriptor heap, used as the base of a descriptor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescriptorHandle {
    /// The heap.
    pub heap: DescriptorHeapId,
    /// The descriptor offset inside the heap.
    pub index: u32,
}

impl DescriptorHandle {
    /// Returns the handle `count` descriptors further into the same heap.
    pub const fn offset(self, count: u32) -> Self {
        Self {
            heap: self.heap,
            index: self.index + count,
        }
    }
}

/// An opaque handle to a texture usable as a render or depth target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub usize);

/// A color render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTarget {
    /// The underlying texture.
    pub id: TargetId,
    /// The pixel format.
    pub format: TextureFormat,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// A depth(-stencil) target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthTarget {
    /// The underlying texture.
    pub id: TargetId,
    /// The depth format.
    pub format: TextureFormat,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl DepthTarget {
    /// A writable view of this target.
    pub const fn writable(&self) -> DepthView {
        DepthView {
            target: self.id,
            read_only: false,
        }
    }

    /// A read-only view of this target.
    pub const fn read_only(&self) -> DepthView {
        DepthView {
            target: self.id,
            read_only: true,
        }
    }

    /// The viewport covering the whole target.
    pub fn full_viewport(&self) -> Viewport {
        Viewport {
            x: 0.0,
            y: 0.0,
            width: self.width as f32,
            height: self.height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }

    /// The scissor covering the whole target.
    pub const fn full_scissor(&self) -> ScissorRect {
        ScissorRect {
            left: 0,
            top: 0,
            right: self.width,
            bottom: self.height,
        }
    }
}

/// How a depth target is bound for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthView {
    /// The depth texture.
    pub target: TargetId,
    /// If `true`, the depth is bound for testing only.
    pub read_only: bool,
}

/// The usage state a target is transitioned into before it is accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceState {
    /// Bound as a writable depth target.
    DepthWrite,
    /// Bound as a read-only depth target.
    DepthRead,
    /// Bound as a color render target.
    RenderTarget,
    /// Sampled by pixel shaders.
    PixelShaderResource,
}

/// A viewport rectangle with a depth range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Left edge in pixels.
    pub x: f32,
    /// Top edge in pixels.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Near end of the depth range.
    pub min_depth: f32,
    /// Far end of the depth range.
    pub max_depth: f32,
}

/// A scissor rectangle. `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScissorRect {
    /// Left edge.
    pub left: u32,
    /// Top edge.
    pub top: u32,
    /// Right edge.
    pub right: u32,
    /// Bottom edge.
    pub bottom: u32,
}

/// Scene-wide resources the renderer is initialized with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneResources {
    /// The shader-visible texture heap.
    pub texture_heap: DescriptorHeapId,
    /// The shader-visible sampler heap.
    pub sampler_heap: DescriptorHeapId,
    /// Base of the common texture table bound at `CommonSrvs`.
    pub common_textures: DescriptorHandle,
    /// The HDR scene color target.
    pub scene_color: RenderTarget,
    /// The main scene depth target.
    pub scene_depth: DepthTarget,
    /// The sun shadow map.
    pub shadow_buffer: DepthTarget,
}
