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

//! 64-bit draw sort keys.
//!
//! Layout, high to low:
//!
//! ```text
//! [63..60] pass           (z-pass, opaque, transparent)
//! [59..48] pipeline index (group state changes)
//! [47..16] distance key   (IEEE-754 bits, inverted for back-to-front)
//! [15.. 0] object index   (tiebreak and back-reference)
//! ```
//!
//! Ascending integer order is therefore pass order, then pipeline, then depth.

/// The passes a draw can be recorded in, in recording order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DrawPass {
    /// Depth-only prepass, also used for shadow maps.
    ZPass = 0,
    /// Opaque shading.
    Opaque = 1,
    /// Alpha-blended shading, back to front.
    Transparent = 2,
}

impl DrawPass {
    /// Number of passes.
    pub const COUNT: usize = 3;

    /// Every pass, in recording order.
    pub const ALL: [DrawPass; Self::COUNT] =
        [DrawPass::ZPass, DrawPass::Opaque, DrawPass::Transparent];

    /// Position of the pass in recording order.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The pass at `index`, if any.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(DrawPass::ZPass),
            1 => Some(DrawPass::Opaque),
            2 => Some(DrawPass::Transparent),
            _ => None,
        }
    }
}

const PASS_SHIFT: u32 = 60;
const PSO_SHIFT: u32 = 48;
const DISTANCE_SHIFT: u32 = 16;
const PSO_MASK: u64 = 0xFFF;
const DISTANCE_MASK: u64 = 0xFFFF_FFFF;
const OBJECT_MASK: u64 = 0xFFFF;

/// Largest pipeline index a key can hold.
pub const MAX_KEY_PSO: u16 = PSO_MASK as u16;

/// Number of distinct objects a key can reference.
pub const MAX_SORT_OBJECTS: usize = OBJECT_MASK as usize + 1;

/// A packed draw key. Ordering is the ordering of the raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SortKey(pub u64);

impl SortKey {
    /// Packs a key. Fields wider than their slot are truncated.
    pub const fn new(pass: DrawPass, pso: u16, distance: u32, object: u16) -> Self {
        Self(
            ((pass as u64) << PASS_SHIFT)
                | ((pso as u64 & PSO_MASK) << PSO_SHIFT)
                | ((distance as u64) << DISTANCE_SHIFT)
                | object as u64,
        )
    }

    /// The pass. Raw values with an out-of-range pass read as `Transparent`.
    pub const fn pass(self) -> DrawPass {
        match DrawPass::from_index((self.0 >> PASS_SHIFT) as usize) {
            Some(pass) => pass,
            None => DrawPass::Transparent,
        }
    }

    /// The pipeline index.
    pub const fn pso(self) -> u16 {
        ((self.0 >> PSO_SHIFT) & PSO_MASK) as u16
    }

    /// The distance key.
    pub const fn distance(self) -> u32 {
        ((self.0 >> DISTANCE_SHIFT) & DISTANCE_MASK) as u32
    }

    /// The object index.
    pub const fn object(self) -> u16 {
        (self.0 & OBJECT_MASK) as u16
    }
}

/// Distance key for front-to-back ordering.
///
/// Non-positive and NaN distances clamp to zero. For non-negative floats the
/// bit pattern orders like the value.
pub fn front_to_back(distance: f32) -> u32 {
    if distance > 0.0 {
        distance.to_bits()
    } else {
        0
    }
}

/// Distance key for back-to-front ordering.
pub fn back_to_front(distance: f32) -> u32 {
    !front_to_back(distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_unpack() {
        let key = SortKey::new(DrawPass::Opaque, 0xABC, 0xDEAD_BEEF, 0x1234);
        assert_eq!(key.pass(), DrawPass::Opaque);
        assert_eq!(key.pso(), 0xABC);
        assert_eq!(key.distance(), 0xDEAD_BEEF);
        assert_eq!(key.object(), 0x1234);
    }

    #[test]
    fn test_pass_dominates_pso_and_pso_dominates_distance() {
        let z = SortKey::new(DrawPass::ZPass, MAX_KEY_PSO, u32::MAX, u16::MAX);
        let opaque = SortKey::new(DrawPass::Opaque, 0, 0, 0);
        assert!(z < opaque);

        let near_late_pso = SortKey::new(DrawPass::Opaque, 20, front_to_back(1.0), 0);
        let far_early_pso = SortKey::new(DrawPass::Opaque, 19, front_to_back(1000.0), 1);
        assert!(far_early_pso < near_late_pso);
    }

    #[test]
    fn test_distance_ordering() {
        assert!(front_to_back(5.0) < front_to_back(10.0));
        assert!(back_to_front(5.0) > back_to_front(10.0));
        assert_eq!(front_to_back(-3.0), 0);
        assert_eq!(front_to_back(-0.0), 0);
        assert_eq!(front_to_back(f32::NAN), 0);
        assert_eq!(back_to_front(0.0), u32::MAX);
    }

    #[test]
    fn test_pso_is_truncated_to_its_slot() {
        let key = SortKey::new(DrawPass::ZPass, 0x1001, 0, 0);
        assert_eq!(key.pso(), 1);
        assert_eq!(key.pass(), DrawPass::ZPass);
    }

    #[test]
    fn test_draw_pass_indices() {
        for (i, pass) in DrawPass::ALL.iter().enumerate() {
            assert_eq!(pass.index(), i);
            assert_eq!(DrawPass::from_index(i), Some(*pass));
        }
        assert_eq!(DrawPass::from_index(3), None);
    }
}
