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

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Clifford gates that may appear in a measurement circuit.
/// V is the square root of X, i.e. Rx(pi/2) up to global phase.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CliffordGate {
    H(usize),
    S(usize),
    Sdg(usize),
    V(usize),
    Vdg(usize),
    X(usize),
    Y(usize),
    Z(usize),
    CX(usize, usize),
    CZ(usize, usize),
    Swap(usize, usize),
}

/// The kind of a gate, forgetting which qubits it acts on
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum GateKind {
    H,
    S,
    Sdg,
    V,
    Vdg,
    X,
    Y,
    Z,
    CX,
    CZ,
    Swap,
}

impl CliffordGate {
    pub fn kind(&self) -> GateKind {
        match self {
            Self::H(_) => GateKind::H,
            Self::S(_) => GateKind::S,
            Self::Sdg(_) => GateKind::Sdg,
            Self::V(_) => GateKind::V,
            Self::Vdg(_) => GateKind::Vdg,
            Self::X(_) => GateKind::X,
            Self::Y(_) => GateKind::Y,
            Self::Z(_) => GateKind::Z,
            Self::CX(..) => GateKind::CX,
            Self::CZ(..) => GateKind::CZ,
            Self::Swap(..) => GateKind::Swap,
        }
    }

    pub fn qubits(&self) -> Vec<usize> {
        match *self {
            Self::H(q)
            | Self::S(q)
            | Self::Sdg(q)
            | Self::V(q)
            | Self::Vdg(q)
            | Self::X(q)
            | Self::Y(q)
            | Self::Z(q) => vec![q],
            Self::CX(a, b) | Self::CZ(a, b) | Self::Swap(a, b) => vec![a, b],
        }
    }

    pub fn inverse(&self) -> Self {
        match *self {
            Self::S(q) => Self::Sdg(q),
            Self::Sdg(q) => Self::S(q),
            Self::V(q) => Self::Vdg(q),
            Self::Vdg(q) => Self::V(q),
            // The rest are self-inverse
            gate => gate,
        }
    }
}

impl Display for GateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Display for CliffordGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({})",
            self.kind(),
            self.qubits()
                .iter()
                .map(|q| q.to_string())
                .collect::<Vec<_>>()
                .join(",")
        )
    }
}
