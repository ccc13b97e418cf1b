// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
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

//! Fixed-width, wrap-around bit-vector arithmetic
//!
//! `BitVec` stores a value masked to a bit width (32 by default) and
//! provides both a signed (two's complement) and unsigned view of it.
//! Every binary operator below re-masks its result to the left
//! operand's width, matching the "signed evaluate, then wrap" semantics
//! of the source ISA.
//!
//! # Example
//!
//! ```
//! use vecsim::core::bitvec::BitVec;
//!
//! let a = BitVec::from_signed(5, 32);
//! let b = BitVec::from_signed(7, 32);
//! assert_eq!(BitVec::add(&a, &b).signed(), 12);
//! ```

use std::fmt;

/// A fixed-width integer value with wrap-around (modular) arithmetic
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BitVec {
    /// Raw bit pattern, always pre-masked to `width` bits
    value: u64,
    /// Bit width, at most 64
    width: u32,
}

impl BitVec {
    /// Bit width used throughout the ISA
    pub const DEFAULT_WIDTH: u32 = 32;

    fn mask(width: u32) -> u64 {
        if width >= 64 {
            u64::MAX
        } else {
            (1u64 << width) - 1
        }
    }

    /// Build a `BitVec` from a signed value, masking it to `width` bits
    pub fn from_signed(value: i64, width: u32) -> Self {
        Self {
            value: (value as u64) & Self::mask(width),
            width,
        }
    }

    /// Build a `BitVec` from an already-unsigned bit pattern
    pub fn from_unsigned(value: u64, width: u32) -> Self {
        Self {
            value: value & Self::mask(width),
            width,
        }
    }

    /// Convenience constructor at the default 32-bit width
    pub fn new(value: i64) -> Self {
        Self::from_signed(value, Self::DEFAULT_WIDTH)
    }

    /// Bit width of this value
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Two's-complement signed interpretation
    pub fn signed(&self) -> i64 {
        let mask = Self::mask(self.width);
        if self.value > mask / 2 {
            -((mask - self.value + 1) as i64)
        } else {
            self.value as i64
        }
    }

    /// Unsigned interpretation, always in `[0, 2^width)`
    pub fn unsigned(&self) -> u64 {
        self.value
    }

    /// Two's-complement negation
    pub fn twos_complement(&self) -> Self {
        let mask = Self::mask(self.width);
        Self::from_unsigned(mask - self.value + 1, self.width)
    }

    fn floor_div(a: i64, b: i64) -> i64 {
        let q = a / b;
        let r = a % b;
        if r != 0 && (r < 0) != (b < 0) {
            q - 1
        } else {
            q
        }
    }

    /// `lhs + rhs`, signed evaluate, result wrapped to `lhs`'s width
    pub fn add(lhs: &Self, rhs: &Self) -> Self {
        Self::from_signed(lhs.signed() + rhs.signed(), lhs.width)
    }

    /// `lhs - rhs`, signed evaluate, result wrapped to `lhs`'s width
    pub fn sub(lhs: &Self, rhs: &Self) -> Self {
        Self::from_signed(lhs.signed() - rhs.signed(), lhs.width)
    }

    /// `lhs * rhs`, signed evaluate, result wrapped to `lhs`'s width
    pub fn mul(lhs: &Self, rhs: &Self) -> Self {
        Self::from_signed(lhs.signed().wrapping_mul(rhs.signed()), lhs.width)
    }

    /// `lhs / rhs`, signed floor division; division by zero saturates to
    /// the maximum positive signed value and logs a warning instead of
    /// panicking.
    pub fn div(lhs: &Self, rhs: &Self) -> Self {
        if rhs.signed() == 0 {
            log::warn!("BitVec::div - division by zero, saturating to max positive");
            return Self::from_unsigned(Self::mask(lhs.width) / 2, lhs.width);
        }
        Self::from_signed(Self::floor_div(lhs.signed(), rhs.signed()), lhs.width)
    }

    /// Bitwise AND, on unsigned values
    pub fn bitand(lhs: &Self, rhs: &Self) -> Self {
        Self::from_unsigned(lhs.unsigned() & rhs.unsigned(), lhs.width)
    }

    /// Bitwise OR, on unsigned values
    pub fn bitor(lhs: &Self, rhs: &Self) -> Self {
        Self::from_unsigned(lhs.unsigned() | rhs.unsigned(), lhs.width)
    }

    /// Bitwise XOR, on unsigned values
    pub fn bitxor(lhs: &Self, rhs: &Self) -> Self {
        Self::from_unsigned(lhs.unsigned() ^ rhs.unsigned(), lhs.width)
    }

    /// Shift left logical, by `rhs.unsigned() mod width`, on the signed value
    pub fn sll(lhs: &Self, rhs: &Self) -> Self {
        let shift = (rhs.unsigned() % lhs.width as u64) as u32;
        Self::from_signed(lhs.signed().wrapping_shl(shift), lhs.width)
    }

    /// Shift right logical (zero-fill), by `rhs.unsigned() mod width`
    pub fn srl(lhs: &Self, rhs: &Self) -> Self {
        let shift = (rhs.unsigned() % lhs.width as u64) as u32;
        let mask = Self::mask(lhs.width);
        Self::from_unsigned((lhs.unsigned() >> shift) & (mask >> shift), lhs.width)
    }

    /// Shift right arithmetic (sign-preserving), by `rhs.unsigned() mod width`
    pub fn sra(lhs: &Self, rhs: &Self) -> Self {
        let shift = (rhs.unsigned() % lhs.width as u64) as u32;
        Self::from_signed(lhs.signed() >> shift, lhs.width)
    }
}

impl fmt::Debug for BitVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitVec({}, w{})", self.signed(), self.width)
    }
}

impl fmt::Display for BitVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signed())
    }
}

impl Default for BitVec {
    /// Zero at the default width, the reset value of every register cell
    fn default() -> Self {
        Self::from_signed(0, Self::DEFAULT_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_roundtrip() {
        for v in [-1i64, 0, 1, 1234, -1234, i32::MIN as i64, i32::MAX as i64] {
            let bv = BitVec::from_signed(v, 32);
            assert_eq!(BitVec::from_unsigned(bv.unsigned(), 32).signed(), v);
        }
    }

    #[test]
    fn twos_complement_involution() {
        let v = BitVec::from_signed(42, 32);
        assert_eq!(v.twos_complement().twos_complement(), v);
    }

    #[test]
    fn add_wraps_at_width() {
        let max = BitVec::from_signed(i32::MAX as i64, 32);
        let one = BitVec::from_signed(1, 32);
        assert_eq!(BitVec::add(&max, &one).signed(), i32::MIN as i64);
    }

    #[test]
    fn div_by_zero_saturates() {
        let a = BitVec::from_signed(10, 32);
        let zero = BitVec::from_signed(0, 32);
        assert_eq!(BitVec::div(&a, &zero).signed(), i32::MAX as i64);
    }

    #[test]
    fn div_floors_toward_negative_infinity() {
        let a = BitVec::from_signed(-7, 32);
        let b = BitVec::from_signed(2, 32);
        assert_eq!(BitVec::div(&a, &b).signed(), -4);
    }

    #[test]
    fn shift_amount_reduces_modulo_width() {
        let v = BitVec::from_signed(1, 32);
        let full = BitVec::from_signed(32, 32);
        let zero = BitVec::from_signed(0, 32);
        assert_eq!(BitVec::sll(&v, &full).signed(), BitVec::sll(&v, &zero).signed());
    }

    #[test]
    fn srl_is_zero_filling() {
        let neg_one = BitVec::from_signed(-1, 32);
        let one = BitVec::from_signed(1, 32);
        assert_eq!(BitVec::srl(&neg_one, &one).unsigned(), 0x7FFF_FFFF);
    }

    #[test]
    fn sra_preserves_sign() {
        let neg_one = BitVec::from_signed(-1, 32);
        let one = BitVec::from_signed(1, 32);
        assert_eq!(BitVec::sra(&neg_one, &one).signed(), -1);
    }

    #[test]
    fn unsigned_in_range() {
        let v = BitVec::from_signed(-1, 32);
        assert!(v.unsigned() < (1u64 << 32));
    }
}
