//! Engine timing calibration.
//!
//! Runs a fixed sequence of identical arithmetic blocks between
//! checkpoint markers so the engine can measure per-block cost.

use crate::engine::{CalibrationOp, SymbexEngine};
use std::hint::black_box;

/// Number of measured blocks
pub const CALIBRATION_BLOCKS: usize = 15;

/// Ordinal cost of each measured block
pub const BLOCK_COST: u32 = 5;

fn block(x: &mut i64, y: &mut i64) {
    *x += *y;
    *y += *y;
    *x *= 2;
    *y /= 2;
    black_box((*x, *y));
}

/// Emit `Start`, a zero checkpoint, fifteen measured blocks each closed by
/// a `Checkpoint(5)`, then `End`
pub fn perform_calibration(engine: &mut dyn SymbexEngine) {
    engine.calibrate(CalibrationOp::Start);

    let mut x = black_box(0i64);
    let mut y = black_box(1i64);
    engine.calibrate(CalibrationOp::Checkpoint(0));
    for _ in 0..CALIBRATION_BLOCKS {
        block(&mut x, &mut y);
        engine.calibrate(CalibrationOp::Checkpoint(BLOCK_COST));
    }

    engine.calibrate(CalibrationOp::End);
}
