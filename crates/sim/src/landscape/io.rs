//! Plain-text landscape files.
//!
//! Layout, after `#` comments and blank lines are dropped:
//!
//! ```text
//! N lines        K+1 locus indices (lookup order)
//! 2^(K+1) lines  N fitness contributions
//! any lines      <genome> <fitness> peak records
//! ```

use super::{EpistasisTable, FitnessTable, Landscape, NkParams, Peaks};
use crate::errors::LandscapeFileError;
use std::io::{self, Write};
use std::str::FromStr;

/// Components recovered from a landscape file.
#[derive(Debug)]
pub(crate) struct LandscapeParts {
    pub epistasis: EpistasisTable,
    pub table: FitnessTable,
    pub peaks: Peaks,
}

fn parse_row<T: FromStr>(
    line: usize,
    text: &str,
    expected: usize,
) -> Result<Vec<T>, LandscapeFileError>
where
    T::Err: std::fmt::Display,
{
    let values = text
        .split_whitespace()
        .map(|token| {
            token.parse::<T>().map_err(|e| LandscapeFileError::Parse {
                line,
                message: format!("'{token}': {e}"),
            })
        })
        .collect::<Result<Vec<T>, _>>()?;
    if values.len() != expected {
        return Err(LandscapeFileError::Shape {
            line,
            expected,
            found: values.len(),
        });
    }
    Ok(values)
}

/// Parse the text of a landscape file for the given N and K.
pub(crate) fn parse(params: NkParams, text: &str) -> Result<LandscapeParts, LandscapeFileError> {
    let n = params.n() as usize;
    let width = params.k() as usize + 1;
    let rows = params.rows();

    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'));

    let mut loci = Vec::with_capacity(n);
    let mut last_line = 0;
    for (line, text) in lines.by_ref().take(n) {
        loci.push(parse_row::<u32>(line, text, width)?);
        last_line = line;
    }
    if loci.len() < n {
        return Err(LandscapeFileError::Truncated {
            section: "epistasis",
            expected: n,
            found: loci.len(),
        });
    }
    let epistasis = EpistasisTable::from_rows(params.n(), params.k(), &loci).map_err(|source| {
        LandscapeFileError::Table {
            line: last_line,
            source,
        }
    })?;

    let mut cells = Vec::with_capacity(rows);
    for (line, text) in lines.by_ref().take(rows) {
        cells.push(parse_row::<f64>(line, text, n)?);
    }
    if cells.len() < rows {
        return Err(LandscapeFileError::Truncated {
            section: "fitness",
            expected: rows,
            found: cells.len(),
        });
    }
    let table = FitnessTable::from_rows(cells).map_err(|source| LandscapeFileError::Table {
        line: last_line,
        source,
    })?;

    let mut peaks = Peaks::new();
    for (line, text) in lines {
        let mut tokens = text.split_whitespace();
        let (Some(genome), Some(fitness), None) = (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(LandscapeFileError::Shape {
                line,
                expected: 2,
                found: text.split_whitespace().count(),
            });
        };
        let genome: u64 = genome.parse().map_err(|e| LandscapeFileError::Parse {
            line,
            message: format!("peak genome '{genome}': {e}"),
        })?;
        if !params.space().contains(genome) {
            return Err(LandscapeFileError::Parse {
                line,
                message: format!("peak genome {genome} does not fit N = {n}"),
            });
        }
        let fitness: f64 = fitness.parse().map_err(|e| LandscapeFileError::Parse {
            line,
            message: format!("peak fitness '{fitness}': {e}"),
        })?;
        peaks.insert(genome as u32, fitness);
    }

    Ok(LandscapeParts {
        epistasis,
        table,
        peaks,
    })
}

/// Serialize a landscape in the format accepted by [`parse`].
///
/// Floats use Rust's shortest round-trip formatting, so reading the file
/// back reproduces the exact values.
pub(crate) fn write<W: Write>(landscape: &Landscape, mut out: W) -> io::Result<()> {
    writeln!(out, "# NK landscape")?;
    writeln!(
        out,
        "# N = {}, K = {}, Seed = {}",
        landscape.n(),
        landscape.k(),
        landscape.seed()
    )?;
    writeln!(
        out,
        "# Epistasis Locations [{}][{}]:",
        landscape.n(),
        landscape.k() + 1
    )?;
    for row in landscape.epistasis_table().rows() {
        let line: Vec<String> = row.iter().map(u32::to_string).collect();
        writeln!(out, "{}", line.join(" "))?;
    }

    let table = landscape.fitness_table();
    writeln!(out, "# Fitness Table [{}][{}]:", table.rows(), table.cols())?;
    for row in 0..table.rows() {
        let line: Vec<String> = table.row(row).iter().map(f64::to_string).collect();
        writeln!(out, "{}", line.join(" "))?;
    }

    let peaks = landscape.peaks();
    writeln!(out, "# Fitness Peaks {}", peaks.len())?;
    for (genome, fitness) in peaks.iter() {
        writeln!(out, "{genome} {fitness}")?;
    }
    out.flush()
}
