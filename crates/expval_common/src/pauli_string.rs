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
    collections::{btree_map, BTreeMap},
    fmt,
    ops::{Mul, MulAssign, Neg},
};

use serde::{Deserialize, Serialize};

use crate::{Pauli, Phase};

/// A sparse Pauli string over qubit indices.
/// Only non-identity Paulis are stored, so two strings that differ only in
/// explicit identities compare (and hash) equal.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "BTreeMap<usize, Pauli>", into = "BTreeMap<usize, Pauli>")]
pub struct QubitPauliString(BTreeMap<usize, Pauli>);

impl QubitPauliString {
    /// The identity string
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// A string with a single Pauli on `qubit`
    pub fn single(qubit: usize, pauli: Pauli) -> Self {
        [(qubit, pauli)].into_iter().collect()
    }

    /// Given Paulis in the order [qubit 0, qubit 1, ...], produce the sparse string.
    pub fn from_paulis(paulis: &[Pauli]) -> Self {
        paulis.iter().copied().enumerate().collect()
    }

    pub fn get(&self, qubit: usize) -> Pauli {
        self.0.get(&qubit).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, usize, Pauli> {
        self.0.iter()
    }

    /// Replace `self` with `self * rhs` and return the phase of the product.
    fn mul_in_place(&mut self, rhs: &QubitPauliString) -> Phase {
        let mut coeff = Phase::One;
        for (qubit, p) in rhs.iter() {
            let (phase, product) = self.get(*qubit) * *p;
            coeff *= phase;
            if product == Pauli::I {
                self.0.remove(qubit);
            } else {
                self.0.insert(*qubit, product);
            }
        }
        coeff
    }
}

impl FromIterator<(usize, Pauli)> for QubitPauliString {
    /// Later entries for the same qubit overwrite earlier ones.
    fn from_iter<T: IntoIterator<Item = (usize, Pauli)>>(iter: T) -> Self {
        let mut map = BTreeMap::new();
        for (qubit, pauli) in iter {
            if pauli == Pauli::I {
                map.remove(&qubit);
            } else {
                map.insert(qubit, pauli);
            }
        }
        Self(map)
    }
}

impl From<BTreeMap<usize, Pauli>> for QubitPauliString {
    fn from(value: BTreeMap<usize, Pauli>) -> Self {
        value.into_iter().collect()
    }
}

impl From<QubitPauliString> for BTreeMap<usize, Pauli> {
    fn from(value: QubitPauliString) -> Self {
        value.0
    }
}

impl<'a> IntoIterator for &'a QubitPauliString {
    type Item = (&'a usize, &'a Pauli);
    type IntoIter = btree_map::Iter<'a, usize, Pauli>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Mul for &QubitPauliString {
    type Output = QubitPauliTensor;

    fn mul(self, rhs: Self) -> Self::Output {
        let mut string = self.clone();
        let coeff = string.mul_in_place(rhs);
        QubitPauliTensor { string, coeff }
    }
}

impl fmt::Debug for QubitPauliString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "QubitPauliString{}", self)
    }
}

impl fmt::Display for QubitPauliString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "({})",
            self.0
                .iter()
                .map(|(q, p)| format!("{p}{q}"))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

/// A Pauli string with a phase, as produced by multiplying strings together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QubitPauliTensor {
    pub string: QubitPauliString,
    pub coeff: Phase,
}

impl QubitPauliTensor {
    pub fn new(string: QubitPauliString, coeff: Phase) -> Self {
        Self { string, coeff }
    }
}

impl From<QubitPauliString> for QubitPauliTensor {
    fn from(value: QubitPauliString) -> Self {
        Self::new(value, Phase::One)
    }
}

impl Mul for &QubitPauliTensor {
    type Output = QubitPauliTensor;

    fn mul(self, rhs: Self) -> Self::Output {
        let mut product = &self.string * &rhs.string;
        product.coeff *= self.coeff * rhs.coeff;
        product
    }
}

/// Multiply on the right without copying the accumulated string.
impl MulAssign<&QubitPauliTensor> for QubitPauliTensor {
    fn mul_assign(&mut self, rhs: &QubitPauliTensor) {
        let phase = self.string.mul_in_place(&rhs.string);
        self.coeff *= phase * rhs.coeff;
    }
}

impl Mul for QubitPauliTensor {
    type Output = QubitPauliTensor;

    fn mul(self, rhs: Self) -> Self::Output {
        &self * &rhs
    }
}

impl Neg for QubitPauliTensor {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            string: self.string,
            coeff: -self.coeff,
        }
    }
}

impl fmt::Display for QubitPauliTensor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.coeff, self.string)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    use Pauli::{I, X, Y, Z};

    #[test]
    fn identities_are_dropped() {
        let a = QubitPauliString::from_paulis(&[Z, I, X]);
        let b: QubitPauliString = [(2, X), (0, Z), (5, I)].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(vec![(&0, &Z), (&2, &X)], a.iter().collect::<Vec<_>>());

        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(1, set.len());
    }

    #[test]
    fn overwrite_with_identity() {
        let s: QubitPauliString = [(0, Z), (0, I)].into_iter().collect();
        assert_eq!(QubitPauliString::new(), s);
        assert_eq!(I, s.get(0));
    }

    #[test]
    fn products() {
        let zz = QubitPauliString::from_paulis(&[Z, Z]);
        let z0 = QubitPauliString::single(0, Z);
        let z1 = QubitPauliString::single(1, Z);
        assert_eq!(QubitPauliTensor::from(zz.clone()), &z0 * &z1);
        assert_eq!(QubitPauliTensor::from(z1.clone()), &zz * &z0);

        let x0 = QubitPauliString::single(0, X);
        let y0 = QubitPauliString::single(0, Y);
        assert_eq!(QubitPauliTensor::new(z0.clone(), Phase::I), &x0 * &y0);

        // XZ * ZX = (-iY)(iY) = YY
        let xz = QubitPauliString::from_paulis(&[X, Z]);
        let zx = QubitPauliString::from_paulis(&[Z, X]);
        let yy = QubitPauliString::from_paulis(&[Y, Y]);
        assert_eq!(QubitPauliTensor::from(yy), &xz * &zx);
    }

    #[test]
    fn tensor_products_keep_phases() {
        let x0: QubitPauliTensor = QubitPauliString::single(0, X).into();
        let minus_z0 = -QubitPauliTensor::from(QubitPauliString::single(0, Z));
        // X(-Z) = -(-iY) = iY
        let product = &x0 * &minus_z0;
        assert_eq!(Phase::I, product.coeff);
        assert_eq!(QubitPauliString::single(0, Y), product.string);

        let mut accumulated = x0.clone();
        accumulated *= &minus_z0;
        assert_eq!(product, accumulated);
        accumulated *= &QubitPauliTensor::from(QubitPauliString::single(3, X));
        assert_eq!(QubitPauliString::from_paulis(&[Y, I, I, X]), accumulated.string);
    }

    #[test]
    fn check_display() {
        let s = QubitPauliString::from_paulis(&[Z, I, Y]);
        assert_eq!("(Z0, Y2)", format!("{}", s));
        assert_eq!("()", format!("{}", QubitPauliString::new()));
        let t = -QubitPauliTensor::from(s);
        assert_eq!("-(Z0, Y2)", format!("{}", t));
    }

    #[test]
    fn serde_map_form() {
        let s = QubitPauliString::from_paulis(&[Z, X]);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(r#"{"0":"Z","1":"X"}"#, json);

        let parsed: QubitPauliString = serde_json::from_str(r#"{"3":"I","1":"Y"}"#).unwrap();
        assert_eq!(QubitPauliString::single(1, Y), parsed);
    }
}
