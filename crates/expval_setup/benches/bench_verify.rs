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

//! Benchmarks for measurement setup verification.
//!
//! Builds setups in which every term is measured by its own basis-rotation
//! circuit and times `verify` on them.
//!
//! Run with:
//!
//! ```sh
//! cargo bench --package expval_setup --bench bench_verify
//! ```

use std::hint::black_box;
use std::time::{Duration, Instant};

use expval_common::{Pauli, QubitPauliString};
use expval_setup::{CliffordCircuit, CliffordGate, MeasurementBitMap, MeasurementSetup};
use rand::{Rng, SeedableRng, rngs::StdRng};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Run `f` for at least `min_duration` and report per-iteration average.
fn bench<F: FnMut()>(label: &str, iters_per_batch: u64, min_duration: Duration, mut f: F) {
    // Warm-up
    for _ in 0..iters_per_batch.min(5) {
        f();
    }

    let mut total_iters: u64 = 0;
    let start = Instant::now();
    while start.elapsed() < min_duration {
        for _ in 0..iters_per_batch {
            f();
        }
        total_iters += iters_per_batch;
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / total_iters as u32;
    println!("  {label:<50} {per_iter:>10.2?}/iter  ({total_iters} iters in {elapsed:.2?})");
}

/// One circuit per random term, with a CX ladder so that the parity of all
/// qubits ends up in the last bit.
fn random_setup(n_qubits: usize, n_terms: usize, seed: u64) -> MeasurementSetup {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut setup = MeasurementSetup::new();
    for _ in 0..n_terms {
        let paulis: Vec<Pauli> = (0..n_qubits)
            .map(|_| match rng.random::<Pauli>() {
                Pauli::I => Pauli::Z,
                p => p,
            })
            .collect();
        let mut circ = CliffordCircuit::new(n_qubits, n_qubits);
        for (qubit, pauli) in paulis.iter().enumerate() {
            match pauli {
                Pauli::X => {
                    circ.add_gate(CliffordGate::H(qubit))
                        .expect("qubit in range");
                }
                Pauli::Y => {
                    circ.add_gate(CliffordGate::V(qubit))
                        .expect("qubit in range");
                }
                _ => (),
            }
        }
        for qubit in 1..n_qubits {
            circ.add_gate(CliffordGate::CX(qubit - 1, qubit))
                .expect("qubits in range");
        }
        circ.measure(n_qubits - 1, 0).expect("bit in range");

        let index = setup.add_measurement_circuit(circ);
        setup.add_result_for_term(
            &QubitPauliString::from_paulis(&paulis),
            MeasurementBitMap::new(index, vec![0], false),
        );
    }
    setup
}

fn main() {
    println!("=== Measurement Setup Verification Benchmark ===");

    for (n_qubits, n_terms) in [(4, 16), (16, 64), (64, 128)] {
        let setup = random_setup(n_qubits, n_terms, 0xBEEF);
        assert!(setup.verify(), "benchmark setup should verify");
        bench(
            &format!("verify: {n_qubits} qubits, {n_terms} terms"),
            10,
            Duration::from_millis(500),
            || {
                black_box(black_box(&setup).verify());
            },
        );
    }
}
