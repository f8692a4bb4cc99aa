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

//! Input layouts and pipeline (root signature) layout descriptors.

use super::enums::{AddressMode, CompareFunction, FilterMode, InputClassification, VertexFormat};
use std::borrow::Cow;

/// An opaque handle to a pipeline layout (root signature).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PipelineLayoutId(pub usize);

/// One attribute of the input assembler layout.
///
/// Offsets are always appended: each element follows the previous element of
/// the same input slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputElement {
    /// The HLSL-style semantic name, e.g. `"POSITION"`.
    pub semantic: &'static str,
    /// The semantic index, e.g. `1` for `TEXCOORD1`.
    pub semantic_index: u32,
    /// The memory format of the attribute.
    pub format: VertexFormat,
    /// The vertex buffer slot the attribute is read from.
    pub input_slot: u32,
    /// Per-vertex or per-instance stepping.
    pub classification: InputClassification,
}

impl InputElement {
    /// A per-vertex element with appended offset.
    pub const fn per_vertex(
        semantic: &'static str,
        semantic_index: u32,
        format: VertexFormat,
        input_slot: u32,
    ) -> Self {
        Self {
            semantic,
            semantic_index,
            format,
            input_slot,
            classification: InputClassification::PerVertex,
        }
    }
}

/// An ordered list of input elements. Empty means "no vertex input".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct InputLayout(pub Vec<InputElement>);

impl InputLayout {
    /// Creates an empty layout.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends an element.
    pub fn push(&mut self, element: InputElement) {
        self.0.push(element);
    }

    /// The elements, in declaration order.
    pub fn elements(&self) -> &[InputElement] {
        &self.0
    }

    /// Returns `true` if the layout has no elements.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Finds an element by semantic name and index.
    pub fn find(&self, semantic: &str, semantic_index: u32) -> Option<&InputElement> {
        self.0
            .iter()
            .find(|e| e.semantic == semantic && e.semantic_index == semantic_index)
    }

    /// The byte stride of one vertex in `input_slot`, summing appended elements.
    pub fn stride(&self, input_slot: u32) -> u32 {
        self.0
            .iter()
            .filter(|e| e.input_slot == input_slot)
            .map(|e| e.format.size())
            .sum()
    }
}

impl FromIterator<InputElement> for InputLayout {
    fn from_iter<T: IntoIterator<Item = InputElement>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The root parameter slots of the mesh renderer's pipeline layout.
///
/// The discriminant is the slot index in the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum RootParameter {
    /// Per-mesh constants (`b0`, vertex).
    MeshConstants = 0,
    /// Per-material constants (`b0`, pixel).
    MaterialConstants,
    /// Material textures (`t0..t9`, pixel).
    MaterialSrvs,
    /// Material samplers (`s0..s9`, pixel).
    MaterialSamplers,
    /// Scene-wide textures (`t10..t20`, pixel).
    CommonSrvs,
    /// Per-frame global constants (`b1`, all stages).
    CommonCbv,
    /// Joint matrices of the skeleton (`t20`, vertex).
    SkinMatrices,
}

impl RootParameter {
    /// Every parameter, in slot order.
    pub const ALL: [RootParameter; 7] = [
        RootParameter::MeshConstants,
        RootParameter::MaterialConstants,
        RootParameter::MaterialSrvs,
        RootParameter::MaterialSamplers,
        RootParameter::CommonSrvs,
        RootParameter::CommonCbv,
        RootParameter::SkinMatrices,
    ];

    /// The slot index of this parameter.
    pub const fn index(self) -> u32 {
        self as u32
    }
}

/// The shader stages a root parameter is visible to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderVisibility {
    /// Visible to every stage.
    All,
    /// Visible to the vertex stage only.
    Vertex,
    /// Visible to the pixel stage only.
    Pixel,
}

/// The kind of descriptor range in a descriptor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorRangeType {
    /// Shader resource views.
    Srv,
    /// Samplers.
    Sampler,
}

/// The binding model of a single root parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootParameterKind {
    /// A root constant buffer view at `register`.
    ConstantBuffer {
        /// The `b` register.
        register: u32,
    },
    /// A root shader resource view at `register`.
    ShaderResource {
        /// The `t` register.
        register: u32,
    },
    /// A table of `count` descriptors starting at `base_register`.
    DescriptorTable {
        /// The kind of descriptors in the range.
        range_type: DescriptorRangeType,
        /// The first register of the range.
        base_register: u32,
        /// The number of descriptors.
        count: u32,
    },
}

/// Describes one root parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RootParameterDescriptor {
    /// The binding model.
    pub kind: RootParameterKind,
    /// The stages that can see it.
    pub visibility: ShaderVisibility,
}

/// A sampler baked into the pipeline layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticSamplerDescriptor {
    /// The `s` register.
    pub register: u32,
    /// The filter.
    pub filter: FilterMode,
    /// Addressing applied to all three axes.
    pub address_mode: AddressMode,
    /// Maximum anisotropy, used when `filter` is [`FilterMode::Anisotropic`].
    pub max_anisotropy: u32,
    /// The comparison for comparison samplers.
    pub compare: Option<CompareFunction>,
    /// Border color used with [`AddressMode::Border`].
    pub border_color: [f32; 4],
    /// The stages that can see it.
    pub visibility: ShaderVisibility,
}

/// A descriptor for a [`PipelineLayoutId`].
#[derive(Debug, Clone)]
pub struct PipelineLayoutDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// Root parameters, indexed by [`RootParameter::index`].
    pub parameters: Cow<'a, [RootParameterDescriptor]>,
    /// Samplers baked into the layout.
    pub static_samplers: Cow<'a, [StaticSamplerDescriptor]>,
    /// If `true`, pipelines using this layout may declare an input layout.
    pub allow_input_layout: bool,
}
