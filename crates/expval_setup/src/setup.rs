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
    collections::BTreeMap,
    fmt::{Display, Formatter},
};

use expval_common::{QubitPauliString, QubitPauliTensor};
use serde::{Deserialize, Serialize};

use crate::circuit::CliffordCircuit;

/// Post-processing for one shot of one measurement circuit.
///
/// The XOR of `bits`, read as a sign (-1)^parity and negated if `invert` is set,
/// is a sample of the associated Pauli term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MeasurementBitMap {
    circ_index: usize,
    bits: Vec<usize>,
    invert: bool,
}

impl MeasurementBitMap {
    pub fn new(circ_index: usize, bits: Vec<usize>, invert: bool) -> Self {
        Self {
            circ_index,
            bits,
            invert,
        }
    }

    pub fn get_circ_index(&self) -> usize {
        self.circ_index
    }

    pub fn get_bits(&self) -> &[usize] {
        &self.bits
    }

    pub fn get_invert(&self) -> bool {
        self.invert
    }
}

impl Display for MeasurementBitMap {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "circ {}, bits [{}], invert {}",
            self.circ_index,
            self.bits
                .iter()
                .map(|b| b.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            self.invert
        )
    }
}

pub type MeasureResultMap = BTreeMap<QubitPauliString, Vec<MeasurementBitMap>>;

/// An expectation value experiment: measurement circuits, and for every Pauli
/// term the circuits and bits from which its expectation value can be read.
///
/// A term may be measured by several circuits, in which case shots from all of
/// them can be pooled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "SetupRecord<C>",
    into = "SetupRecord<C>",
    bound(
        serialize = "C: Serialize + Clone",
        deserialize = "C: Deserialize<'de>"
    )
)]
pub struct MeasurementSetup<C = CliffordCircuit> {
    measurement_circs: Vec<C>,
    result_map: MeasureResultMap,
}

impl<C> Default for MeasurementSetup<C> {
    fn default() -> Self {
        Self {
            measurement_circs: Vec::new(),
            result_map: BTreeMap::new(),
        }
    }
}

impl<C> MeasurementSetup<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_circs(&self) -> &[C] {
        &self.measurement_circs
    }

    pub fn get_result_map(&self) -> &MeasureResultMap {
        &self.result_map
    }

    /// Append a circuit and return its index
    pub fn add_measurement_circuit(&mut self, circ: C) -> usize {
        self.measurement_circs.push(circ);
        self.measurement_circs.len() - 1
    }

    /// Register `result` as a way to measure `term`.
    /// Indices are not checked until verification.
    pub fn add_result_for_term(&mut self, term: &QubitPauliString, result: MeasurementBitMap) {
        self.result_map
            .entry(term.clone())
            .or_default()
            .push(result);
    }

    /// Register `result` for the Pauli string of `tensor`, discarding its phase.
    ///
    /// The phase is not folded into the `invert` flag of `result`; a caller
    /// measuring `-P` must set `invert` itself.
    pub fn add_result_for_tensor_ignoring_coeff(
        &mut self,
        tensor: &QubitPauliTensor,
        result: MeasurementBitMap,
    ) {
        self.add_result_for_term(&tensor.string, result);
    }

    /// Total number of registered bit maps over all terms
    pub fn n_bitmaps(&self) -> usize {
        self.result_map.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.measurement_circs.is_empty() && self.result_map.is_empty()
    }
}

impl<C> Display for MeasurementSetup<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Circuits: {}", self.measurement_circs.len())?;
        for (term, bitmaps) in &self.result_map {
            writeln!(f, "{term} ->")?;
            for bitmap in bitmaps {
                writeln!(f, "\t{bitmap}")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupRecordError {
    DanglingCircuitIndex {
        term: QubitPauliString,
        circ_index: usize,
        n_circs: usize,
    },
    /// A term listed without any bit map that measures it
    EmptyTerm { term: QubitPauliString },
}

impl Display for SetupRecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DanglingCircuitIndex {
                term,
                circ_index,
                n_circs,
            } => write!(
                f,
                "term {term} refers to circuit {circ_index} but only {n_circs} circuits are given"
            ),
            Self::EmptyTerm { term } => write!(f, "term {term} has no bit maps"),
        }
    }
}

impl std::error::Error for SetupRecordError {}

#[derive(Serialize, Deserialize)]
struct TermRecord {
    term: QubitPauliString,
    bitmaps: Vec<MeasurementBitMap>,
}

/// Serialized form of a setup: the result map as an ordered list of records
#[derive(Serialize, Deserialize)]
struct SetupRecord<C> {
    circs: Vec<C>,
    result_map: Vec<TermRecord>,
}

impl<C> TryFrom<SetupRecord<C>> for MeasurementSetup<C> {
    type Error = SetupRecordError;

    fn try_from(record: SetupRecord<C>) -> Result<Self, Self::Error> {
        let n_circs = record.circs.len();
        let mut setup = MeasurementSetup {
            measurement_circs: record.circs,
            result_map: BTreeMap::new(),
        };
        for TermRecord { term, bitmaps } in record.result_map {
            if bitmaps.is_empty() {
                return Err(SetupRecordError::EmptyTerm { term });
            }
            for bitmap in bitmaps {
                if bitmap.circ_index >= n_circs {
                    return Err(SetupRecordError::DanglingCircuitIndex {
                        term,
                        circ_index: bitmap.circ_index,
                        n_circs,
                    });
                }
                setup.add_result_for_term(&term, bitmap);
            }
        }
        Ok(setup)
    }
}

impl<C> From<MeasurementSetup<C>> for SetupRecord<C> {
    fn from(setup: MeasurementSetup<C>) -> Self {
        Self {
            circs: setup.measurement_circs,
            result_map: setup
                .result_map
                .into_iter()
                .map(|(term, bitmaps)| TermRecord { term, bitmaps })
                .collect(),
        }
    }
}
