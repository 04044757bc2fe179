//! Client entrypoint for the CSR build.

// Bin target reuses lib deps, silence noisy lint.
#![allow(unused_crate_dependencies)]

use log::error;
use portfolio_fx::{init_logging, start};

fn main() {
	init_logging();

	if let Err(e) = start() {
		error!("portfolio-fx: startup failed: {}", e);
		wasm_bindgen::throw_str(&format!("portfolio-fx: {e}"));
	}
}
