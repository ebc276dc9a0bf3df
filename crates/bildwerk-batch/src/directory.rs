// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Directory batch processing.
//
// Scans an input directory for `.png` / `.jpg` files, decodes each to 8-bit
// grayscale, runs every configured operator, and writes the results to
// `<output>/<operator name>/<file name>` in the input's format. Work proceeds
// chunk by chunk so only a handful of images are held at once. Files that
// fail to decode, process, or encode are recorded in the report; the rest of
// the batch carries on.

use std::path::{Path, PathBuf};

use bildwerk_core::{BatchConfig, BildwerkError, Result};
use bildwerk_filter::{check_image, luma_bt601};
use chrono::{DateTime, Utc};
use image::GrayImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::runner::{BatchOutcome, BatchRunner};

/// File name suffixes picked up by [`scan_inputs`]. Matching is
/// case-sensitive, so `scan.PNG` is skipped.
pub const ACCEPTED_EXTENSIONS: [&str; 2] = [".png", ".jpg"];

/// Where in the pipeline a file failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Decode,
    Process,
    Encode,
}

/// A file that produced no output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileFailure {
    pub file: String,
    pub stage: FailureStage,
    pub message: String,
}

/// Per-operator results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorReport {
    pub operator: String,
    pub output_dir: PathBuf,
    pub written: usize,
    pub failures: Vec<FileFailure>,
}

/// Summary of a directory run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Accepted input files found.
    pub inputs: usize,
    pub decode_failures: Vec<FileFailure>,
    pub operators: Vec<OperatorReport>,
}

impl BatchReport {
    /// Total failures across decoding and every operator.
    pub fn failure_count(&self) -> usize {
        self.decode_failures.len()
            + self
                .operators
                .iter()
                .map(|op| op.failures.len())
                .sum::<usize>()
    }

    pub fn is_clean(&self) -> bool {
        self.failure_count() == 0
    }

    /// Pretty-printed JSON form of the report.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// List the accepted image files directly inside `dir`, sorted by name.
pub fn scan_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if ACCEPTED_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Decode an image file to 8-bit grayscale.
///
/// Colour inputs are converted to luma with BT.601 weights. Samples wider
/// than 8 bits are refused with [`BildwerkError::UnsupportedImage`].
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_gray(path: &Path) -> Result<GrayImage> {
    let decoded = image::open(path).map_err(|err| {
        BildwerkError::ImageError(format!("failed to open {}: {}", path.display(), err))
    })?;

    let color = decoded.color();
    if color.bytes_per_pixel() != color.channel_count() {
        return Err(BildwerkError::UnsupportedImage(format!(
            "{} has more than 8 bits per sample ({color:?})",
            path.display()
        )));
    }

    let gray = luma_bt601(decoded);
    check_image(&gray)?;
    debug!(width = gray.width(), height = gray.height(), "Image decoded");
    Ok(gray)
}

/// Write `image` to `path`; the format follows the file extension.
pub fn save_gray(image: &GrayImage, path: &Path) -> Result<()> {
    image.save(path).map_err(|err| {
        BildwerkError::ImageError(format!(
            "failed to save image to {}: {}",
            path.display(),
            err
        ))
    })
}

/// Run every operator in `config` over every accepted file in its input
/// directory.
///
/// Files are handled in chunks of a few per worker thread: a chunk is decoded,
/// run through each operator, and written out before the next one is read, so
/// memory stays bounded by the chunk rather than the directory.
///
/// Only configuration and directory-level I/O errors are returned as `Err`;
/// per-file problems end up in the report.
#[instrument(skip_all, fields(input = %config.input_dir.display(), output = %config.output_dir.display()))]
pub fn run_directory(config: &BatchConfig) -> Result<BatchReport> {
    config.validate()?;
    let started_at = Utc::now();

    let files = scan_inputs(&config.input_dir)?;
    info!(files = files.len(), "Input directory scanned");

    let runners: Vec<BatchRunner> = config
        .operators
        .iter()
        .map(|op| BatchRunner::new(*op))
        .collect();
    let mut operators = Vec::with_capacity(runners.len());
    for runner in &runners {
        let output_dir = config.output_dir.join(runner.namespace());
        std::fs::create_dir_all(&output_dir)?;
        operators.push(OperatorReport {
            operator: runner.namespace().to_string(),
            output_dir,
            written: 0,
            failures: Vec::new(),
        });
    }

    let mut decode_failures = Vec::new();
    let chunk_len = rayon::current_num_threads().max(1) * CHUNK_PER_THREAD;
    for chunk in files.chunks(chunk_len) {
        let decoded = decode_chunk(chunk, &mut decode_failures);
        for (runner, report) in runners.iter().zip(operators.iter_mut()) {
            let outcome = runner.run(&decoded);
            record_outcome(outcome, report);
        }
    }

    for report in &operators {
        info!(
            operator = %report.operator,
            written = report.written,
            failed = report.failures.len(),
            "Operator completed"
        );
    }

    Ok(BatchReport {
        started_at,
        finished_at: Utc::now(),
        inputs: files.len(),
        decode_failures,
        operators,
    })
}

/// Files decoded and processed together per worker thread.
const CHUNK_PER_THREAD: usize = 2;

/// Decode a chunk of files in parallel, keeping input order. Undecodable
/// files are appended to `failures`.
fn decode_chunk(
    chunk: &[PathBuf],
    failures: &mut Vec<FileFailure>,
) -> Vec<(String, GrayImage)> {
    let results: Vec<(String, Result<GrayImage>)> = chunk
        .par_iter()
        .map(|path| (file_name(path), load_gray(path)))
        .collect();

    let mut decoded = Vec::with_capacity(results.len());
    for (file, result) in results {
        match result {
            Ok(gray) => decoded.push((file, gray)),
            Err(err) => {
                warn!(file, error = %err, "Skipping undecodable file");
                failures.push(FileFailure {
                    file,
                    stage: FailureStage::Decode,
                    message: err.to_string(),
                });
            }
        }
    }
    decoded
}

/// Write one operator's results for a chunk and fold them into its report.
fn record_outcome(outcome: BatchOutcome, report: &mut OperatorReport) {
    report
        .failures
        .extend(outcome.failures.into_iter().map(|f| FileFailure {
            file: f.id,
            stage: FailureStage::Process,
            message: f.error.to_string(),
        }));

    for (file, image) in &outcome.images {
        match save_gray(image, &report.output_dir.join(file)) {
            Ok(()) => report.written += 1,
            Err(err) => {
                warn!(file, error = %err, "Failed to write result");
                report.failures.push(FileFailure {
                    file: file.clone(),
                    stage: FailureStage::Encode,
                    message: err.to_string(),
                });
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bildwerk_core::{NiblackParams, Operator};
    use image::Luma;

    fn page() -> GrayImage {
        GrayImage::from_fn(32, 32, |x, _| Luma([if (12..14).contains(&x) { 200 } else { 50 }]))
    }

    #[test]
    fn scan_is_case_sensitive_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.jpg", "c.PNG", "notes.txt", "d.jpeg"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();

        let files = scan_inputs(dir.path()).unwrap();
        let names: Vec<_> = files.iter().map(|p| file_name(p)).collect();
        assert_eq!(names, ["a.jpg", "b.png"]);
    }

    #[test]
    fn load_converts_colour_to_luma() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.png");
        image::RgbImage::from_pixel(5, 4, image::Rgb([10, 10, 10]))
            .save(&path)
            .unwrap();
        let gray = load_gray(&path).unwrap();
        assert_eq!(gray.dimensions(), (5, 4));
        assert_eq!(gray.get_pixel(0, 0).0[0], 10);
    }

    #[test]
    fn colour_load_uses_bt601_weights() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red.png");
        image::RgbImage::from_pixel(2, 2, image::Rgb([255, 0, 0]))
            .save(&path)
            .unwrap();
        let gray = load_gray(&path).unwrap();
        assert!(gray.pixels().all(|p| p.0[0] == 76));
    }

    #[test]
    fn sixteen_bit_input_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep.png");
        image::ImageBuffer::<Luma<u16>, Vec<u16>>::from_pixel(4, 4, Luma([1000]))
            .save(&path)
            .unwrap();
        assert!(matches!(
            load_gray(&path),
            Err(BildwerkError::UnsupportedImage(_))
        ));
    }

    #[test]
    fn directory_run_writes_namespaced_outputs() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        page().save(input.path().join("page.png")).unwrap();
        page().save(input.path().join("photo.jpg")).unwrap();
        std::fs::write(input.path().join("broken.png"), b"not a png").unwrap();
        GrayImage::from_pixel(3, 3, Luma([1]))
            .save(input.path().join("tiny.png"))
            .unwrap();

        let config = BatchConfig {
            input_dir: input.path().to_path_buf(),
            output_dir: output.path().to_path_buf(),
            operators: vec![
                Operator::Niblack(NiblackParams::default()),
                Operator::LaplacianSharpen,
            ],
        };
        let report = run_directory(&config).unwrap();

        assert_eq!(report.inputs, 4);
        assert_eq!(report.decode_failures.len(), 1);
        assert_eq!(report.decode_failures[0].file, "broken.png");

        let niblack = &report.operators[0];
        assert_eq!(niblack.operator, "niblack");
        assert_eq!(niblack.written, 2);
        assert_eq!(niblack.failures.len(), 1);
        assert_eq!(niblack.failures[0].file, "tiny.png");
        assert_eq!(niblack.failures[0].stage, FailureStage::Process);

        // Sharpening has no size limit, so the tiny image succeeds there.
        assert_eq!(report.operators[1].written, 3);
        assert_eq!(report.failure_count(), 2);
        assert!(!report.is_clean());

        let written = load_gray(&output.path().join("niblack").join("page.png")).unwrap();
        assert_eq!(written.get_pixel(12, 16).0[0], 255);
        assert_eq!(written.get_pixel(20, 16).0[0], 0);
        assert!(output.path().join("niblack").join("photo.jpg").is_file());
        assert!(output.path().join("laplacian_sharpen").join("tiny.png").is_file());
    }

    #[test]
    fn directory_larger_than_one_chunk_is_fully_processed() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let count = rayon::current_num_threads().max(1) * CHUNK_PER_THREAD * 2 + 3;
        for i in 0..count {
            GrayImage::from_pixel(4, 4, Luma([i as u8]))
                .save(input.path().join(format!("scan-{i:04}.png")))
                .unwrap();
        }
        std::fs::write(input.path().join("scan-zzzz.png"), b"junk").unwrap();

        let config = BatchConfig {
            input_dir: input.path().to_path_buf(),
            output_dir: output.path().to_path_buf(),
            operators: vec![Operator::LogTransform, Operator::LaplacianSharpen],
        };
        let report = run_directory(&config).unwrap();

        assert_eq!(report.inputs, count + 1);
        assert_eq!(report.decode_failures.len(), 1);
        for op in &report.operators {
            assert_eq!(op.written, count);
            assert!(op.failures.is_empty());
        }
        let last = load_gray(
            &output
                .path()
                .join("laplacian_sharpen")
                .join(format!("scan-{:04}.png", count - 1)),
        )
        .unwrap();
        assert_eq!(last.get_pixel(1, 1).0[0], (count - 1) as u8);
    }

    #[test]
    fn report_serializes_to_json() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        page().save(input.path().join("page.png")).unwrap();
        let config = BatchConfig {
            input_dir: input.path().to_path_buf(),
            output_dir: output.path().to_path_buf(),
            ..Default::default()
        };
        let report = run_directory(&config).unwrap();
        assert!(report.is_clean());
        let json = report.to_json().unwrap();
        let back: BatchReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn missing_input_directory_is_an_error() {
        let output = tempfile::tempdir().unwrap();
        let config = BatchConfig {
            input_dir: output.path().join("does-not-exist"),
            output_dir: output.path().to_path_buf(),
            ..Default::default()
        };
        assert!(matches!(run_directory(&config), Err(BildwerkError::Io(_))));
    }
}
