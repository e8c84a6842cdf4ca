// Heat-map export of a bigram count matrix.
//
// Raw counts are far too sparse to show anything on a linear scale, so each
// cell is mapped through `ln(count + 1)` and scaled against the largest
// cell. Output is a plain-text (P2) PGM image, one pixel per cell, rows are
// predecessors and columns successors. Frequent transitions are dark, zero
// cells white.

use std::io::Write;
use std::path::Path;

use crate::counts::CountMatrix;
use crate::error::{BigramError, Result};

/// Largest grey level in the output image.
const MAX_GREY: u8 = 255;

/// Grey level for one cell: `MAX_GREY` for zero, 0 for the largest count.
pub fn shade(count: u32, max_count: u32) -> u8 {
    if max_count == 0 {
        return MAX_GREY;
    }
    let scaled = f64::from(count).ln_1p() / f64::from(max_count).ln_1p();
    let darkness = (scaled * f64::from(MAX_GREY)).round() as u8;
    MAX_GREY - darkness
}

/// Write `counts` as a P2 PGM image.
pub fn write_pgm<W: Write>(counts: &CountMatrix, out: &mut W) -> std::io::Result<()> {
    let dim = counts.dim();
    let max = counts.max_count();
    writeln!(out, "P2")?;
    writeln!(out, "# log-scaled bigram counts, max cell {max}")?;
    writeln!(out, "{dim} {dim}")?;
    writeln!(out, "{MAX_GREY}")?;
    for row in counts.rows().take(dim) {
        let line = row
            .iter()
            .map(|&c| shade(c, max).to_string())
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Write the heat map to a file.
pub fn write_heatmap(counts: &CountMatrix, path: &Path) -> Result<()> {
    let mut buf = Vec::new();
    write_pgm(counts, &mut buf).map_err(|e| BigramError::io(e, path))?;
    std::fs::write(path, &buf).map_err(|e| BigramError::io(e, path))?;
    Ok(())
}
