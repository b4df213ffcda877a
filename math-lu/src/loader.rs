//! Text matrix loader
//!
//! The format is one matrix row per line, values separated by whitespace.
//! The number of values on the first line fixes the dimension `n`; the first
//! `n` lines are read. A file with fewer than `n` lines is accepted and the
//! missing rows stay zero. Lines past the `n`-th are ignored.

use crate::error::{LuError, Result};
use crate::matrix::MatrixStore;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Load a matrix from a text file.
pub fn load_matrix<P: AsRef<Path>>(path: P) -> Result<MatrixStore> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LuError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    read_matrix(BufReader::new(file)).map_err(|err| match err {
        LuError::Io { source, .. } => LuError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Read a matrix from any buffered reader.
pub fn read_matrix<R: BufRead>(reader: R) -> Result<MatrixStore> {
    let mut lines = reader.lines();

    let first = match lines.next() {
        Some(line) => line.map_err(io_error)?,
        None => return Err(LuError::EmptyInput),
    };
    let n = first.split_whitespace().count();
    if n == 0 {
        return Err(LuError::EmptyInput);
    }

    let mut m = MatrixStore::new(n)?;
    parse_row(&first, 1, m.row_mut(0))?;

    let mut rows_read = 1;
    for (i, line) in lines.take(n - 1).enumerate() {
        let line = line.map_err(io_error)?;
        parse_row(&line, i + 2, m.row_mut(i + 1))?;
        rows_read += 1;
    }

    if rows_read < n {
        log::warn!("matrix input has {rows_read} of {n} rows; remaining rows are zero");
    }

    Ok(m)
}

fn parse_row(line: &str, line_no: usize, row: &mut [f64]) -> Result<()> {
    let expected = row.len();
    let mut got = 0;

    for (j, token) in line.split_whitespace().enumerate() {
        if j >= expected {
            // Extra values past column n are ignored.
            got = j + 1;
            continue;
        }
        row[j] = token.parse::<f64>().map_err(|_| LuError::Parse {
            line: line_no,
            column: j + 1,
            token: token.to_string(),
        })?;
        got = j + 1;
    }

    if got < expected {
        return Err(LuError::RaggedRow {
            line: line_no,
            expected,
            got,
        });
    }
    Ok(())
}

fn io_error(source: std::io::Error) -> LuError {
    LuError::Io {
        path: Default::default(),
        source,
    }
}
