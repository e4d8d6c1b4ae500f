use std::path::Path;

use crate::error::{GridreelError, GridreelResult};

/// Rectangular row-major grid of scalars parsed from one dump file.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Grid {
    /// Build a grid from explicit rows, enforcing rectangularity.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> GridreelResult<Self> {
        let nrows = rows.len();
        let cols = rows.first().map_or(0, |r| r.len());
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(GridreelError::format(format!(
                    "row {} has {} values, expected {cols}",
                    i + 1,
                    row.len()
                )));
            }
        }
        let data = rows.into_iter().flatten().collect();
        Ok(Self {
            rows: nrows,
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, r: usize) -> &[f64] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }
}

/// Parse one `file{N}` dump: one row per line, fields delimited by commas.
///
/// The upstream writer terminates every row with a delimiter before the
/// newline (`"1,2,3,\n"`); the empty field that produces is dropped, and the
/// line terminator itself is stripped whether or not it is present on the
/// final line.
pub fn parse_grid(path: &Path) -> GridreelResult<Grid> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(GridreelError::not_found(format!(
                "input '{}' does not exist",
                path.display()
            )));
        }
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("read input '{}'", path.display()))
                .into());
        }
    };
    parse_grid_str(&text, &path.display().to_string())
}

fn parse_grid_str(text: &str, source: &str) -> GridreelResult<Grid> {
    let mut data = Vec::new();
    let mut cols: Option<usize> = None;
    let mut nrows = 0usize;

    for (lineno, line) in text.lines().enumerate() {
        let mut fields: Vec<&str> = line.split(',').collect();
        if fields.len() > 1 && fields.last().is_some_and(|f| f.trim().is_empty()) {
            fields.pop();
        }
        if fields.len() == 1 && fields[0].trim().is_empty() {
            return Err(GridreelError::format(format!(
                "{source}: line {} has no fields",
                lineno + 1
            )));
        }

        match cols {
            None => cols = Some(fields.len()),
            Some(c) if c != fields.len() => {
                return Err(GridreelError::format(format!(
                    "{source}: line {} has {} fields, expected {c}",
                    lineno + 1,
                    fields.len()
                )));
            }
            Some(_) => {}
        }

        for field in fields {
            let field = field.trim();
            let value: f64 = field.parse().map_err(|_| {
                GridreelError::parse(format!(
                    "{source}: line {}: invalid number '{field}'",
                    lineno + 1
                ))
            })?;
            data.push(value);
        }
        nrows += 1;
    }

    Ok(Grid {
        rows: nrows,
        cols: cols.unwrap_or(0),
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rectangular_grid_with_trailing_delimiters() {
        let grid = parse_grid_str("0,255,\n10,0,\n", "t").unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 2);
        assert_eq!(grid.data(), &[0.0, 255.0, 10.0, 0.0]);
    }

    #[test]
    fn terminator_and_trailing_delimiter_are_optional() {
        // The last line of a dump may lack the newline; a row may lack the
        // trailing comma. All spellings parse identically.
        let a = parse_grid_str("1,2,3,\n", "t").unwrap();
        let b = parse_grid_str("1,2,3,", "t").unwrap();
        let c = parse_grid_str("1,2,3", "t").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.row(0), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn ragged_rows_are_a_format_error() {
        let err = parse_grid_str("1,2,\n3,\n", "t").unwrap_err();
        assert!(matches!(err, GridreelError::Format(_)), "{err}");
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn empty_line_is_a_format_error() {
        let err = parse_grid_str("1,2,\n\n3,4,\n", "t").unwrap_err();
        assert!(matches!(err, GridreelError::Format(_)), "{err}");
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn bad_float_is_a_parse_error_naming_line_and_field() {
        let err = parse_grid_str("1,zap,\n", "t").unwrap_err();
        assert!(matches!(err, GridreelError::Parse(_)), "{err}");
        let msg = err.to_string();
        assert!(msg.contains("line 1"));
        assert!(msg.contains("zap"));
    }

    #[test]
    fn empty_text_parses_as_zero_by_zero() {
        let grid = parse_grid_str("", "t").unwrap();
        assert_eq!(grid.rows(), 0);
        assert_eq!(grid.cols(), 0);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = parse_grid(Path::new("/nonexistent/gridreel/file0")).unwrap_err();
        assert!(matches!(err, GridreelError::NotFound(_)), "{err}");
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = Grid::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, GridreelError::Format(_)), "{err}");
    }
}
