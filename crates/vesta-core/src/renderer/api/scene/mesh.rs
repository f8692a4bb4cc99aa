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

//! Mesh records produced by the asset pipeline.

use crate::renderer::api::util::{IndexFormat, PsoFlags};

/// One indexed draw inside a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DrawRange {
    /// Number of indices to draw.
    pub index_count: u32,
    /// First index inside the mesh's index range.
    pub start_index: u32,
    /// Value added to each index before fetching vertices.
    pub base_vertex: i32,
}

/// A drawable unit.
///
/// All byte offsets are relative to the buffer base address supplied with each
/// submission.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    /// Vertex attributes and material behavior.
    pub flags: PsoFlags,
    /// Index of the depth-read-write pipeline. `pso + 1` is its depth-equal twin.
    pub pso: u8,
    /// Offset of the full vertex stream.
    pub vb_offset: u32,
    /// Size of the full vertex stream.
    pub vb_size: u32,
    /// Offset of the depth-only vertex stream.
    pub vb_depth_offset: u32,
    /// Size of the depth-only vertex stream.
    pub vb_depth_size: u32,
    /// Stride of the full vertex stream.
    pub vb_stride: u32,
    /// Offset of the index buffer.
    pub ib_offset: u32,
    /// Size of the index buffer.
    pub ib_size: u32,
    /// Width of each index.
    pub ib_format: IndexFormat,
    /// Offset of the material texture table in the texture heap.
    pub srv_table: u32,
    /// Offset of the material sampler table in the sampler heap.
    pub sampler_table: u32,
    /// Number of joints referenced by the skin. Zero for rigid meshes.
    pub num_joints: u32,
    /// First joint of the skeleton used by this mesh.
    pub start_joint: u32,
    /// Indexed draws, issued in order.
    pub draws: Vec<DrawRange>,
}

impl Mesh {
    /// Returns `true` if the mesh binds joint matrices when drawn.
    pub fn is_skinned(&self) -> bool {
        self.num_joints > 0
    }

    /// The stride of one vertex in the depth-only stream.
    ///
    /// Positions take 12 bytes, padded to 16 when a UV follows for alpha
    /// testing; skinning appends 16 bytes of joint indices and weights.
    pub fn depth_vertex_stride(&self) -> u32 {
        let mut stride = if self.flags.is_alpha_tested() { 16 } else { 12 };
        if self.is_skinned() {
            stride += 16;
        }
        stride
    }
}

/// The transforms of one skeleton joint, uploaded verbatim.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Joint {
    /// Position transform.
    pub pos_xform: [[f32; 4]; 4],
    /// Normal transform (3x3, rows padded to four floats).
    pub nrm_xform: [[f32; 4]; 3],
}

impl Joint {
    /// The identity joint.
    pub const IDENTITY: Self = Self {
        pos_xform: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
        nrm_xform: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ],
    };
}
