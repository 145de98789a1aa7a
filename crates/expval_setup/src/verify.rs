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
    collections::HashMap,
    fmt::{Display, Formatter},
};

use expval_common::{Phase, QubitPauliString, QubitPauliTensor};
use log::{debug, error, trace};

use crate::{
    circuit::MeasurementCircuit,
    setup::{MeasurementBitMap, MeasurementSetup},
};

/// The first reason a measurement setup does not measure what it claims to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    CircuitIndexOutOfRange {
        term: QubitPauliString,
        circ_index: usize,
        n_circs: usize,
    },
    BitOutOfRange {
        term: QubitPauliString,
        circ_index: usize,
        bit: usize,
        n_bits: usize,
    },
    /// The circuit does not measure a Pauli observable into this bit
    UnmeasuredBit {
        term: QubitPauliString,
        circ_index: usize,
        bit: usize,
    },
    /// The bits multiply to a different Pauli string than the term
    WrongTerm {
        term: QubitPauliString,
        circ_index: usize,
        found: QubitPauliTensor,
    },
    /// The bits measure the term but the invert flag gives it the wrong sign
    WrongSign {
        term: QubitPauliString,
        circ_index: usize,
        invert: bool,
    },
    NonHermitian {
        term: QubitPauliString,
        circ_index: usize,
        found: QubitPauliTensor,
    },
}

impl VerificationError {
    pub fn term(&self) -> &QubitPauliString {
        match self {
            Self::CircuitIndexOutOfRange { term, .. }
            | Self::BitOutOfRange { term, .. }
            | Self::UnmeasuredBit { term, .. }
            | Self::WrongTerm { term, .. }
            | Self::WrongSign { term, .. }
            | Self::NonHermitian { term, .. } => term,
        }
    }
}

impl Display for VerificationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CircuitIndexOutOfRange {
                term,
                circ_index,
                n_circs,
            } => write!(
                f,
                "term {term}: circuit index {circ_index} out of range for {n_circs} circuits"
            ),
            Self::BitOutOfRange {
                term,
                circ_index,
                bit,
                n_bits,
            } => write!(
                f,
                "term {term}: bit {bit} out of range for circuit {circ_index} with {n_bits} bits"
            ),
            Self::UnmeasuredBit {
                term,
                circ_index,
                bit,
            } => write!(
                f,
                "term {term}: bit {bit} of circuit {circ_index} does not record a Pauli measurement"
            ),
            Self::WrongTerm {
                term,
                circ_index,
                found,
            } => write!(
                f,
                "term {term}: bits of circuit {circ_index} measure {found} instead"
            ),
            Self::WrongSign {
                term,
                circ_index,
                invert,
            } => write!(
                f,
                "term {term}: circuit {circ_index} gives the opposite sign (invert = {invert})"
            ),
            Self::NonHermitian {
                term,
                circ_index,
                found,
            } => write!(
                f,
                "term {term}: bits of circuit {circ_index} multiply to non-Hermitian {found}"
            ),
        }
    }
}

impl std::error::Error for VerificationError {}

impl<C: MeasurementCircuit> MeasurementSetup<C> {
    /// Check that every bit map reconstructs its term, with the right sign,
    /// from the observables its circuit measures.
    ///
    /// Returns the first inconsistency found.
    pub fn check(&self) -> Result<(), VerificationError> {
        let circs = self.get_circs();
        // (circuit index, bit) -> observable, shared between terms
        let mut observables: HashMap<(usize, usize), Option<QubitPauliTensor>> = HashMap::new();

        for (term, bitmaps) in self.get_result_map() {
            trace!("Checking term {term} with {} bit maps", bitmaps.len());
            for bitmap in bitmaps {
                check_bitmap(term, bitmap, circs, &mut observables)?;
            }
        }
        debug!(
            "Verified {} terms over {} circuits",
            self.get_result_map().len(),
            circs.len()
        );
        Ok(())
    }

    /// Whether the setup is consistent; failures are logged, not raised.
    pub fn verify(&self) -> bool {
        match self.check() {
            Ok(()) => true,
            Err(e) => {
                error!("Measurement setup failed verification: {e}");
                false
            }
        }
    }
}

fn check_bitmap<C: MeasurementCircuit>(
    term: &QubitPauliString,
    bitmap: &MeasurementBitMap,
    circs: &[C],
    observables: &mut HashMap<(usize, usize), Option<QubitPauliTensor>>,
) -> Result<(), VerificationError> {
    let circ_index = bitmap.get_circ_index();
    let circ = circs
        .get(circ_index)
        .ok_or_else(|| VerificationError::CircuitIndexOutOfRange {
            term: term.clone(),
            circ_index,
            n_circs: circs.len(),
        })?;

    let n_bits = circ.n_bits();
    let mut total = QubitPauliTensor::default();
    for &bit in bitmap.get_bits() {
        if bit >= n_bits {
            return Err(VerificationError::BitOutOfRange {
                term: term.clone(),
                circ_index,
                bit,
                n_bits,
            });
        }
        let observable = observables
            .entry((circ_index, bit))
            .or_insert_with(|| circ.measured_observable(bit))
            .as_ref()
            .ok_or_else(|| VerificationError::UnmeasuredBit {
                term: term.clone(),
                circ_index,
                bit,
            })?;
        total *= observable;
    }
    if bitmap.get_invert() {
        total = -total;
    }

    if &total.string != term {
        return Err(VerificationError::WrongTerm {
            term: term.clone(),
            circ_index,
            found: total,
        });
    }
    match total.coeff {
        Phase::One => Ok(()),
        Phase::MinusOne => Err(VerificationError::WrongSign {
            term: term.clone(),
            circ_index,
            invert: bitmap.get_invert(),
        }),
        Phase::I | Phase::MinusI => Err(VerificationError::NonHermitian {
            term: term.clone(),
            circ_index,
            found: total,
        }),
    }
}
