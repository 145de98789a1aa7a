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
    error,
    fs::File,
    io::{self, BufReader, Read},
    path::PathBuf,
};

use clap::Parser;
use expval_setup::{MeasurementCircuit, MeasurementSetup};
use log::{debug, info};

/// Check that a serialized measurement setup measures the terms it claims to.
#[derive(Parser)]
#[command(version, about, long_about=None)]
struct Cli {
    /// JSON measurement setup. Read from stdin if not given.
    input: Option<PathBuf>,
    /// Print every term with the bit maps that measure it
    #[arg(long)]
    dump: bool,
    /// Print gate counts of each measurement circuit as CSV
    #[arg(long)]
    stats: bool,
}

fn read_setup(input: Option<&PathBuf>) -> Result<MeasurementSetup, Box<dyn error::Error>> {
    let reader: Box<dyn Read> = match input {
        Some(path) => {
            debug!("Reading setup from {}", path.display());
            Box::new(BufReader::new(File::open(path)?))
        }
        None => {
            debug!("Reading setup from stdin");
            Box::new(io::stdin().lock())
        }
    };
    Ok(serde_json::from_reader(reader)?)
}

fn print_stats(setup: &MeasurementSetup) {
    println!("circuit,gate,count");
    for (i, circ) in setup.get_circs().iter().enumerate() {
        for (kind, count) in circ.gate_counts() {
            println!("{i},{kind},{count}");
        }
        println!("{i},Measure,{}", circ.n_measurements());
    }
}

fn main() -> Result<(), Box<dyn error::Error>> {
    // By default log INFO.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let setup = read_setup(cli.input.as_ref())?;
    info!(
        "Loaded {} circuits and {} terms ({} bit maps)",
        setup.get_circs().len(),
        setup.get_result_map().len(),
        setup.n_bitmaps()
    );
    for (i, circ) in setup.get_circs().iter().enumerate() {
        debug!("Circuit {i} with {} bits: {circ}", circ.n_bits());
    }

    if cli.dump {
        print!("{setup}");
    }
    if cli.stats {
        print_stats(&setup);
    }

    if setup.verify() {
        info!("Measurement setup verified");
        Ok(())
    } else {
        // The failure itself is logged by verify
        std::process::exit(1);
    }
}
