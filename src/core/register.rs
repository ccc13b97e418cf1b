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

//! Architectural register names
//!
//! Defines `SR0`-`SR7` (scalar) and `VR0`-`VR7` (vector).

use std::fmt;
use std::str::FromStr;

/// Which register bank a [`Register`] belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterKind {
    /// `SR0`-`SR7`
    Scalar,
    /// `VR0`-`VR7`
    Vector,
}

/// A register reference: a kind and an index in `0..8`
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Register {
    kind: RegisterKind,
    index: u8,
}

impl Register {
    /// Number of registers in each bank
    pub const COUNT: u8 = 8;

    /// Build a scalar register reference
    ///
    /// # Panics
    /// Panics if `index >= 8`; callers are expected to validate operands
    /// during decoding rather than here.
    pub fn scalar(index: u8) -> Self {
        assert!(index < Self::COUNT, "invalid scalar register index: {index}");
        Self {
            kind: RegisterKind::Scalar,
            index,
        }
    }

    /// Build a vector register reference
    ///
    /// # Panics
    /// Panics if `index >= 8`.
    pub fn vector(index: u8) -> Self {
        assert!(index < Self::COUNT, "invalid vector register index: {index}");
        Self {
            kind: RegisterKind::Vector,
            index,
        }
    }

    /// The register's bank
    pub fn kind(&self) -> RegisterKind {
        self.kind
    }

    /// The register's index within its bank, `0..8`
    pub fn index(&self) -> usize {
        self.index as usize
    }

    /// Parse a register name such as `SR3` or `VR0`
    ///
    /// Returns `None` if the string does not match the `SR<0-7>` / `VR<0-7>`
    /// grammar, so callers can fall back to parsing it as an immediate.
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() < 3 {
            return None;
        }
        let (prefix, digits) = s.split_at(2);
        let index: u8 = digits.parse().ok()?;
        if index >= Self::COUNT {
            return None;
        }
        match prefix {
            "SR" => Some(Self::scalar(index)),
            "VR" => Some(Self::vector(index)),
            _ => None,
        }
    }
}

impl FromStr for Register {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or(())
    }
}

impl fmt::Debug for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            RegisterKind::Scalar => "SR",
            RegisterKind::Vector => "VR",
        };
        write!(f, "{prefix}{}", self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scalar_and_vector() {
        assert_eq!(Register::parse("SR3"), Some(Register::scalar(3)));
        assert_eq!(Register::parse("VR0"), Some(Register::vector(0)));
    }

    #[test]
    fn rejects_out_of_range_and_non_register() {
        assert_eq!(Register::parse("SR8"), None);
        assert_eq!(Register::parse("42"), None);
        assert_eq!(Register::parse("-5"), None);
    }

    #[test]
    fn display_round_trips_through_parse() {
        let r = Register::vector(5);
        assert_eq!(Register::parse(&r.to_string()), Some(r));
    }
}
