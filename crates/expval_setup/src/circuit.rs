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
    collections::{BTreeMap, BTreeSet},
    fmt::{Display, Formatter},
};

use expval_common::{Pauli, QubitPauliTensor};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::{
    gate::{CliffordGate, GateKind},
    tableau,
};

/// What a measurement setup needs to know about a circuit.
///
/// Implementors report, for each classical bit, the signed Pauli observable on
/// the circuit's input state whose eigenvalue (+1 for bit 0, -1 for bit 1) the
/// bit records. A bit that is never written, or whose value does not correspond
/// to a single Pauli observable, has no observable.
pub trait MeasurementCircuit {
    /// Number of classical bits in each shot
    fn n_bits(&self) -> usize;

    fn measured_observable(&self, bit: usize) -> Option<QubitPauliTensor>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    Gate(CliffordGate),
    Measure { qubit: usize, bit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CircuitError {
    QubitOutOfRange { qubit: usize, n_qubits: usize },
    BitOutOfRange { bit: usize, n_bits: usize },
    RepeatedQubit { gate: CliffordGate },
    IdentityBasis { qubit: usize },
}

impl Display for CircuitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QubitOutOfRange { qubit, n_qubits } => {
                write!(f, "qubit {qubit} out of range for {n_qubits} qubits")
            }
            Self::BitOutOfRange { bit, n_bits } => {
                write!(f, "bit {bit} out of range for {n_bits} bits")
            }
            Self::RepeatedQubit { gate } => write!(f, "gate {gate} repeats a qubit"),
            Self::IdentityBasis { qubit } => {
                write!(f, "cannot measure qubit {qubit} in the identity basis")
            }
        }
    }
}

impl std::error::Error for CircuitError {}

/// A Clifford circuit ending in computational-basis measurements.
///
/// Measured observables are derived by conjugating Z on the measured qubit back
/// through the gates that precede the measurement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CircuitRecord", into = "CircuitRecord")]
pub struct CliffordCircuit {
    n_qubits: usize,
    n_bits: usize,
    instructions: Vec<Instruction>,
    // Kept up to date as instructions are appended
    gates: Vec<CliffordGate>,
    measured: BTreeSet<usize>,
    /// Bit -> (number of gates before its last measurement, measured qubit)
    final_writes: BTreeMap<usize, (usize, usize)>,
    mid_circuit: bool,
}

#[derive(Serialize, Deserialize)]
struct CircuitRecord {
    n_qubits: usize,
    n_bits: usize,
    instructions: Vec<Instruction>,
}

impl From<CliffordCircuit> for CircuitRecord {
    fn from(circuit: CliffordCircuit) -> Self {
        Self {
            n_qubits: circuit.n_qubits,
            n_bits: circuit.n_bits,
            instructions: circuit.instructions,
        }
    }
}

impl TryFrom<CircuitRecord> for CliffordCircuit {
    type Error = CircuitError;

    fn try_from(record: CircuitRecord) -> Result<Self, Self::Error> {
        let mut circuit = CliffordCircuit::new(record.n_qubits, record.n_bits);
        for instruction in record.instructions {
            match instruction {
                Instruction::Gate(gate) => circuit.add_gate(gate)?,
                Instruction::Measure { qubit, bit } => circuit.measure(qubit, bit)?,
            };
        }
        Ok(circuit)
    }
}

impl CliffordCircuit {
    pub fn new(n_qubits: usize, n_bits: usize) -> Self {
        Self {
            n_qubits,
            n_bits,
            instructions: Vec::new(),
            gates: Vec::new(),
            measured: BTreeSet::new(),
            final_writes: BTreeMap::new(),
            mid_circuit: false,
        }
    }

    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    fn check_qubit(&self, qubit: usize) -> Result<(), CircuitError> {
        if qubit >= self.n_qubits {
            return Err(CircuitError::QubitOutOfRange {
                qubit,
                n_qubits: self.n_qubits,
            });
        }
        Ok(())
    }

    pub fn add_gate(&mut self, gate: CliffordGate) -> Result<&mut Self, CircuitError> {
        let qubits = gate.qubits();
        for qubit in &qubits {
            self.check_qubit(*qubit)?;
        }
        if let [a, b] = qubits[..] {
            if a == b {
                return Err(CircuitError::RepeatedQubit { gate });
            }
        }
        if qubits.iter().any(|qubit| self.measured.contains(qubit)) {
            self.mid_circuit = true;
        }
        self.instructions.push(Instruction::Gate(gate));
        self.gates.push(gate);
        Ok(self)
    }

    /// Measure `qubit` in the computational basis and store the outcome in `bit`
    pub fn measure(&mut self, qubit: usize, bit: usize) -> Result<&mut Self, CircuitError> {
        self.check_qubit(qubit)?;
        if bit >= self.n_bits {
            return Err(CircuitError::BitOutOfRange {
                bit,
                n_bits: self.n_bits,
            });
        }
        self.measured.insert(qubit);
        self.final_writes.insert(bit, (self.gates.len(), qubit));
        self.instructions.push(Instruction::Measure { qubit, bit });
        Ok(self)
    }

    /// Rotate `qubit` so that a computational-basis measurement reads `pauli`, then measure.
    pub fn measure_in_basis(
        &mut self,
        qubit: usize,
        pauli: Pauli,
        bit: usize,
    ) -> Result<&mut Self, CircuitError> {
        match pauli {
            Pauli::I => return Err(CircuitError::IdentityBasis { qubit }),
            Pauli::Z => (),
            Pauli::X => {
                self.add_gate(CliffordGate::H(qubit))?;
            }
            Pauli::Y => {
                self.add_gate(CliffordGate::Sdg(qubit))?;
                self.add_gate(CliffordGate::H(qubit))?;
            }
        }
        self.measure(qubit, bit)
    }

    /// Number of gates of each kind; measurements are not counted.
    pub fn gate_counts(&self) -> BTreeMap<GateKind, usize> {
        let mut counts = BTreeMap::new();
        for gate in &self.gates {
            *counts.entry(gate.kind()).or_insert(0) += 1;
        }
        counts
    }

    pub fn n_measurements(&self) -> usize {
        self.instructions.len() - self.gates.len()
    }

    /// Whether some measured qubit is acted on by a later gate.
    pub fn has_mid_circuit_measurement(&self) -> bool {
        self.mid_circuit
    }
}

impl MeasurementCircuit for CliffordCircuit {
    fn n_bits(&self) -> usize {
        self.n_bits
    }

    fn measured_observable(&self, bit: usize) -> Option<QubitPauliTensor> {
        if bit >= self.n_bits {
            return None;
        }
        // Later gates would invalidate the observables read off earlier measurements
        if self.mid_circuit {
            debug!("Circuit measures qubits before acting on them again; no observables");
            return None;
        }
        let Some(&(n_gates, qubit)) = self.final_writes.get(&bit) else {
            debug!("Bit {bit} is never written");
            return None;
        };
        let observable = tableau::back_propagate_z(qubit, self.gates[..n_gates].iter());
        trace!("Bit {bit} (qubit {qubit}) measures {observable}");
        Some(observable)
    }
}

impl Display for CliffordCircuit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Circuit({}q, {}b)[", self.n_qubits, self.n_bits)?;
        let instructions = self
            .instructions
            .iter()
            .map(|instruction| match instruction {
                Instruction::Gate(gate) => gate.to_string(),
                Instruction::Measure { qubit, bit } => format!("Measure({qubit}->{bit})"),
            })
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "{instructions}]")
    }
}

#[cfg(test)]
mod tests {
    use expval_common::{Pauli::*, QubitPauliString};

    use super::*;

    #[test]
    fn rejects_out_of_range() {
        let mut circ = CliffordCircuit::new(2, 1);
        assert_eq!(
            Err(CircuitError::QubitOutOfRange {
                qubit: 2,
                n_qubits: 2
            }),
            circ.add_gate(CliffordGate::H(2)).map(|_| ())
        );
        assert_eq!(
            Err(CircuitError::BitOutOfRange { bit: 1, n_bits: 1 }),
            circ.measure(0, 1).map(|_| ())
        );
        assert_eq!(
            Err(CircuitError::RepeatedQubit {
                gate: CliffordGate::CX(1, 1)
            }),
            circ.add_gate(CliffordGate::CX(1, 1)).map(|_| ())
        );
        assert!(circ.measure_in_basis(0, I, 0).is_err());
        assert!(circ.instructions().is_empty());
    }

    #[test]
    fn basis_measurements() {
        let mut circ = CliffordCircuit::new(3, 3);
        circ.measure_in_basis(0, X, 0)
            .unwrap()
            .measure_in_basis(1, Y, 1)
            .unwrap()
            .measure_in_basis(2, Z, 2)
            .unwrap();

        assert_eq!(
            Some(QubitPauliString::single(0, X).into()),
            circ.measured_observable(0)
        );
        assert_eq!(
            Some(QubitPauliString::single(1, Y).into()),
            circ.measured_observable(1)
        );
        assert_eq!(
            Some(QubitPauliString::single(2, Z).into()),
            circ.measured_observable(2)
        );
        assert_eq!(None, circ.measured_observable(3));
    }

    #[test]
    fn flipped_measurement() {
        let mut circ = CliffordCircuit::new(1, 1);
        circ.add_gate(CliffordGate::X(0)).unwrap().measure(0, 0).unwrap();
        assert_eq!(
            Some(-QubitPauliTensor::from(QubitPauliString::single(0, Z))),
            circ.measured_observable(0)
        );
    }

    #[test]
    fn unwritten_bit_has_no_observable() {
        let mut circ = CliffordCircuit::new(2, 2);
        circ.measure(0, 0).unwrap();
        assert!(circ.measured_observable(0).is_some());
        assert_eq!(None, circ.measured_observable(1));
    }

    #[test]
    fn last_write_wins() {
        let mut circ = CliffordCircuit::new(2, 1);
        circ.measure(0, 0).unwrap().measure(1, 0).unwrap();
        assert_eq!(
            Some(QubitPauliString::single(1, Z).into()),
            circ.measured_observable(0)
        );
    }

    #[test]
    fn mid_circuit_measurement_has_no_observables() {
        let mut circ = CliffordCircuit::new(2, 2);
        circ.measure(0, 0)
            .unwrap()
            .add_gate(CliffordGate::CX(0, 1))
            .unwrap()
            .measure(1, 1)
            .unwrap();
        assert!(circ.has_mid_circuit_measurement());
        assert_eq!(None, circ.measured_observable(0));
        assert_eq!(None, circ.measured_observable(1));
    }

    #[test]
    fn gates_on_other_qubits_after_measurement() {
        let mut circ = CliffordCircuit::new(2, 2);
        circ.measure(0, 0)
            .unwrap()
            .add_gate(CliffordGate::H(1))
            .unwrap()
            .measure(1, 1)
            .unwrap();
        assert!(!circ.has_mid_circuit_measurement());
        assert_eq!(
            Some(QubitPauliString::single(1, X).into()),
            circ.measured_observable(1)
        );
    }

    #[test]
    fn counts() {
        let mut circ = CliffordCircuit::new(2, 2);
        circ.add_gate(CliffordGate::H(0))
            .unwrap()
            .add_gate(CliffordGate::CX(0, 1))
            .unwrap()
            .add_gate(CliffordGate::H(1))
            .unwrap()
            .measure(0, 0)
            .unwrap()
            .measure(1, 1)
            .unwrap();
        let counts = circ.gate_counts();
        assert_eq!(Some(&2), counts.get(&GateKind::H));
        assert_eq!(Some(&1), counts.get(&GateKind::CX));
        assert_eq!(None, counts.get(&GateKind::S));
        assert_eq!(2, circ.n_measurements());
    }

    #[test]
    fn serde_validates_instructions() {
        let mut circ = CliffordCircuit::new(2, 2);
        circ.add_gate(CliffordGate::CX(0, 1)).unwrap().measure(1, 0).unwrap();
        let json = serde_json::to_string(&circ).unwrap();
        let parsed: CliffordCircuit = serde_json::from_str(&json).unwrap();
        assert_eq!(circ, parsed);

        let bad = r#"{"n_qubits":1,"n_bits":1,"instructions":[{"Gate":{"CX":[0,1]}}]}"#;
        assert!(serde_json::from_str::<CliffordCircuit>(bad).is_err());
    }

    #[test]
    fn register_size_does_not_matter() {
        let json = r#"{"n_qubits":1125899906842624,"n_bits":1125899906842624,"instructions":[
            {"Gate":{"H":1125899906842623}},
            {"Measure":{"qubit":1125899906842623,"bit":1125899906842623}}]}"#;
        let circ: CliffordCircuit = serde_json::from_str(json).unwrap();
        let last = (1 << 50) - 1;
        assert_eq!(
            Some(QubitPauliString::single(last, X).into()),
            circ.measured_observable(last)
        );
        assert_eq!(None, circ.measured_observable(0));
    }

    #[test]
    fn check_display() {
        let mut circ = CliffordCircuit::new(2, 1);
        circ.add_gate(CliffordGate::CX(0, 1)).unwrap().measure(1, 0).unwrap();
        assert_eq!("Circuit(2q, 1b)[CX(0,1),Measure(1->0)]", circ.to_string());
    }
}
