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

use std::collections::BTreeMap;

use expval_common::{Pauli, Phase, QubitPauliString, QubitPauliTensor};

use crate::gate::CliffordGate;

/// A Hermitian Pauli string in symplectic form with a sign bit.
/// Only qubits with a non-identity Pauli are stored; Y is kept as Y itself
/// rather than XZ, so (x, z) = (1, 1) carries no hidden phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PauliRow {
    paulis: BTreeMap<usize, Pauli>,
    negative: bool,
}

impl PauliRow {
    pub fn single(qubit: usize, pauli: Pauli) -> Self {
        let mut row = Self {
            paulis: BTreeMap::new(),
            negative: false,
        };
        let (x, z) = pauli.xz();
        row.set(qubit, x, z);
        row
    }

    fn xz(&self, qubit: usize) -> (bool, bool) {
        self.paulis.get(&qubit).copied().unwrap_or_default().xz()
    }

    fn set(&mut self, qubit: usize, x: bool, z: bool) {
        match Pauli::from_xz(x, z) {
            Pauli::I => self.paulis.remove(&qubit),
            pauli => self.paulis.insert(qubit, pauli),
        };
    }

    /// Map P to g P g^dagger.
    pub fn conjugate(&mut self, gate: CliffordGate) {
        match gate {
            CliffordGate::H(q) => {
                let (x, z) = self.xz(q);
                self.negative ^= x & z;
                self.set(q, z, x);
            }
            CliffordGate::S(q) => {
                // X -> Y, Y -> -X
                let (x, z) = self.xz(q);
                self.negative ^= x & z;
                self.set(q, x, z ^ x);
            }
            CliffordGate::Sdg(q) => {
                // X -> -Y, Y -> X
                let (x, z) = self.xz(q);
                self.negative ^= x & !z;
                self.set(q, x, z ^ x);
            }
            CliffordGate::V(q) => {
                // Z -> -Y, Y -> Z
                let (x, z) = self.xz(q);
                self.negative ^= z & !x;
                self.set(q, x ^ z, z);
            }
            CliffordGate::Vdg(q) => {
                // Z -> Y, Y -> -Z
                let (x, z) = self.xz(q);
                self.negative ^= x & z;
                self.set(q, x ^ z, z);
            }
            CliffordGate::X(q) => self.negative ^= self.xz(q).1,
            CliffordGate::Y(q) => {
                let (x, z) = self.xz(q);
                self.negative ^= x ^ z;
            }
            CliffordGate::Z(q) => self.negative ^= self.xz(q).0,
            CliffordGate::CX(c, t) => {
                let (xc, zc) = self.xz(c);
                let (xt, zt) = self.xz(t);
                self.negative ^= xc & zt & !(xt ^ zc);
                self.set(c, xc, zc ^ zt);
                self.set(t, xt ^ xc, zt);
            }
            CliffordGate::CZ(a, b) => {
                let (xa, za) = self.xz(a);
                let (xb, zb) = self.xz(b);
                self.negative ^= xa & xb & (za ^ zb);
                self.set(a, xa, za ^ xb);
                self.set(b, xb, zb ^ xa);
            }
            CliffordGate::Swap(a, b) => {
                let pa = self.paulis.remove(&a);
                let pb = self.paulis.remove(&b);
                if let Some(p) = pa {
                    self.paulis.insert(b, p);
                }
                if let Some(p) = pb {
                    self.paulis.insert(a, p);
                }
            }
        }
    }

    pub fn into_tensor(self) -> QubitPauliTensor {
        let coeff = if self.negative {
            Phase::MinusOne
        } else {
            Phase::One
        };
        QubitPauliTensor::new(QubitPauliString::from(self.paulis), coeff)
    }
}

/// The observable on the input state that a Z measurement of `qubit` reveals
/// after `gates` have been applied in order, i.e. U^dagger Z U.
///
/// Only qubits the observable reaches are stored, so the cost depends on the
/// gates alone and not on the size of the register.
pub(crate) fn back_propagate_z<'a>(
    qubit: usize,
    gates: impl DoubleEndedIterator<Item = &'a CliffordGate>,
) -> QubitPauliTensor {
    let mut row = PauliRow::single(qubit, Pauli::Z);
    for gate in gates.rev() {
        row.conjugate(gate.inverse());
    }
    row.into_tensor()
}
