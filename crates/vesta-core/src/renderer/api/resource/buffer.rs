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

//! GPU virtual addresses and the buffer views built from them.

use crate::renderer::api::util::IndexFormat;
use std::ops::Add;

/// An opaque GPU virtual address. Passed through to the command stream untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GpuAddress(pub u64);

impl GpuAddress {
    /// The null address.
    pub const NULL: Self = Self(0);

    /// Returns the address `bytes` past this one.
    pub const fn offset(self, bytes: u32) -> Self {
        Self(self.0.wrapping_add(bytes as u64))
    }
}

impl Add<u32> for GpuAddress {
    type Output = Self;

    fn add(self, bytes: u32) -> Self {
        self.offset(bytes)
    }
}

/// A view of a vertex buffer region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexBufferView {
    /// Address of the first vertex.
    pub address: GpuAddress,
    /// Size of the region in bytes.
    pub size: u32,
    /// Distance between consecutive vertices in bytes.
    pub stride: u32,
}

/// A view of an index buffer region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexBufferView {
    /// Address of the first index.
    pub address: GpuAddress,
    /// Size of the region in bytes.
    pub size: u32,
    /// Width of each index.
    pub format: IndexFormat,
}
