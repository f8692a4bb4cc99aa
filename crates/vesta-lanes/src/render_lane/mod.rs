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

//! Rendering lane - PSO cache, draw sorting and submission for meshes.
//!
//! A [`Renderer`] owns every pipeline the meshes can be drawn with. Meshes resolve
//! their pipeline index once through [`Renderer::get_pso`], then each frame a
//! [`MeshSorter`] collects instances, sorts them by [`SortKey`] and records them
//! pass by pass.

mod mesh_sorter;
mod pipeline_library;
mod renderer;
mod shader_table;
mod sort_key;

pub use mesh_sorter::*;
pub use pipeline_library::*;
pub use renderer::*;
pub use shader_table::*;
pub use sort_key::*;
