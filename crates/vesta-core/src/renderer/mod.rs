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

//! Provides the public, backend-agnostic rendering contracts.
//!
//! This module is the "common language" between the mesh renderer and a graphics
//! backend. It contains the abstract [`traits`] (the [`GraphicsDevice`] that builds
//! pipeline objects and the [`CommandStream`] that records commands), the plain
//! data in [`api`], and the error types returned across that boundary.
//!
//! The module defines the 'what' of rendering; the `vesta-lanes` crate decides the
//! order in which things are drawn, and a backend decides how each command reaches
//! the GPU.

pub mod api;
pub mod error;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::error::{PipelineError, RenderError, ResourceError};
pub use self::traits::{CommandStream, GraphicsDevice};
