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

//! Byte-size accounting primitives.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// A (compressed, uncompressed) byte-count pair.
///
/// Raw measurements frequently know only one side: a filesystem scan sees
/// uncompressed bytes, an archive listing sees both, a probe may report
/// only one. Converting from a bare byte count therefore leaves the
/// compressed side at zero, and nothing forces `compressed` to stay below
/// `uncompressed`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizePair {
    /// Footprint inside a compressed package, in bytes.
    pub compressed: u64,
    /// Logical (uncompressed) footprint, in bytes.
    pub uncompressed: u64,
}

impl SizePair {
    /// Creates a pair from both sides.
    pub const fn new(compressed: u64, uncompressed: u64) -> Self {
        Self {
            compressed,
            uncompressed,
        }
    }
}

impl From<u64> for SizePair {
    fn from(uncompressed: u64) -> Self {
        Self {
            compressed: 0,
            uncompressed,
        }
    }
}

impl Add for SizePair {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            compressed: self.compressed + rhs.compressed,
            uncompressed: self.uncompressed + rhs.uncompressed,
        }
    }
}

impl AddAssign for SizePair {
    fn add_assign(&mut self, rhs: Self) {
        self.compressed += rhs.compressed;
        self.uncompressed += rhs.uncompressed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotion_from_bare_count_leaves_compressed_zero() {
        let size = SizePair::from(1234);
        assert_eq!(size.compressed, 0);
        assert_eq!(size.uncompressed, 1234);
    }

    #[test]
    fn summation_is_field_wise() {
        let mut total = SizePair::new(10, 100);
        total += SizePair::new(5, 50);
        assert_eq!(total, SizePair::new(15, 150));
        assert_eq!(
            SizePair::new(1, 2) + SizePair::new(3, 4),
            SizePair::new(4, 6)
        );
    }
}
