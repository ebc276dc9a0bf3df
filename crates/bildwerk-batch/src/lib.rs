// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bildwerk Batch: applies engine operators to collections of images. The
// runner works on in-memory images; the directory module is the filesystem
// collaborator that feeds it decoded files and writes results back out.

pub mod directory;
pub mod runner;

pub use directory::{BatchReport, run_directory, scan_inputs};
pub use runner::{BatchFailure, BatchOutcome, BatchRunner, run_many};
