// Copyright contributors to the Expval Measurement Setup project
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

use std::{
    fmt::Display,
    ops::{Mul, MulAssign, Neg},
};

use rand::distr::{Distribution, StandardUniform};
use serde::{Deserialize, Serialize};

mod pauli_string;

pub use pauli_string::{QubitPauliString, QubitPauliTensor};

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, Default,
)]
pub enum Pauli {
    #[default]
    I,
    X,
    Z,
    Y,
}

impl Pauli {
    /// Split into (x, z) components of the symplectic representation, Y = (1, 1).
    pub fn xz(self) -> (bool, bool) {
        match self {
            Pauli::I => (false, false),
            Pauli::X => (true, false),
            Pauli::Z => (false, true),
            Pauli::Y => (true, true),
        }
    }

    pub fn from_xz(x: bool, z: bool) -> Self {
        match (x, z) {
            (false, false) => Pauli::I,
            (true, false) => Pauli::X,
            (false, true) => Pauli::Z,
            (true, true) => Pauli::Y,
        }
    }
}

/// Single-qubit Pauli product, including the phase picked up, e.g. XY = iZ.
impl Mul for Pauli {
    type Output = (Phase, Pauli);

    fn mul(self, rhs: Self) -> Self::Output {
        use Pauli::{I, X, Y, Z};
        match (self, rhs) {
            (I, p) | (p, I) => (Phase::One, p),
            (p, q) if p == q => (Phase::One, I),
            (X, Y) => (Phase::I, Z),
            (Y, Z) => (Phase::I, X),
            (Z, X) => (Phase::I, Y),
            (Y, X) => (Phase::MinusI, Z),
            (Z, Y) => (Phase::MinusI, X),
            (X, Z) => (Phase::MinusI, Y),
            _ => unreachable!("All Pauli pairs are covered"),
        }
    }
}

impl Display for Pauli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Distribution<Pauli> for StandardUniform {
    fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> Pauli {
        let i = rng.random_range(0..=3);
        match i {
            0 => Pauli::I,
            1 => Pauli::Z,
            2 => Pauli::X,
            3 => Pauli::Y,
            _ => unreachable!("RNG number out of range"),
        }
    }
}

/// A power of i, the only scalars that appear in products of Pauli strings.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Default)]
pub enum Phase {
    #[default]
    One,
    I,
    MinusOne,
    MinusI,
}

impl Phase {
    /// Exponent k in i^k
    pub fn quarter_turns(self) -> u8 {
        match self {
            Phase::One => 0,
            Phase::I => 1,
            Phase::MinusOne => 2,
            Phase::MinusI => 3,
        }
    }

    pub fn from_quarter_turns(k: u8) -> Self {
        match k % 4 {
            0 => Phase::One,
            1 => Phase::I,
            2 => Phase::MinusOne,
            3 => Phase::MinusI,
            _ => unreachable!("Remainder is below 4"),
        }
    }

    /// +1 or -1, as opposed to +-i
    pub fn is_real(self) -> bool {
        matches!(self, Phase::One | Phase::MinusOne)
    }
}

impl Mul for Phase {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Phase::from_quarter_turns(self.quarter_turns() + rhs.quarter_turns())
    }
}

impl MulAssign for Phase {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Neg for Phase {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self * Phase::MinusOne
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::One => write!(f, "+"),
            Phase::I => write!(f, "+i"),
            Phase::MinusOne => write!(f, "-"),
            Phase::MinusI => write!(f, "-i"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use Pauli::{I, X, Y, Z};

    #[test]
    fn pauli_products() {
        assert_eq!((Phase::I, Z), X * Y);
        assert_eq!((Phase::MinusI, Z), Y * X);
        assert_eq!((Phase::I, X), Y * Z);
        assert_eq!((Phase::I, Y), Z * X);
        assert_eq!((Phase::MinusI, Y), X * Z);
        for p in [I, X, Y, Z] {
            assert_eq!((Phase::One, I), p * p);
            assert_eq!((Phase::One, p), I * p);
        }
    }

    #[test]
    fn xz_roundtrip() {
        for p in [I, X, Y, Z] {
            let (x, z) = p.xz();
            assert_eq!(p, Pauli::from_xz(x, z));
        }
    }

    #[test]
    fn phase_arithmetic() {
        assert_eq!(Phase::MinusOne, Phase::I * Phase::I);
        assert_eq!(Phase::One, Phase::I * Phase::MinusI);
        assert_eq!(Phase::MinusI, -Phase::I);
        assert!(Phase::MinusOne.is_real());
        assert!(!Phase::MinusI.is_real());
    }
}
