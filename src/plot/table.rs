use crate::StrError;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Holds the columns of a whitespace-delimited text file (e.g., a recorder file)
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    /// Holds the columns; the first one is the time for recorder files
    pub columns: Vec<Vec<f64>>,
}

impl Table {
    /// Parses whitespace-delimited text
    ///
    /// Blank lines are skipped; all other rows must have the same number of columns.
    pub fn from_text(text: &str) -> Result<Self, StrError> {
        let mut table = Table { columns: Vec::new() };
        for line in text.lines() {
            table.push_line(line)?;
        }
        Ok(table)
    }

    /// Reads a whitespace-delimited text file
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let file = File::open(path).map_err(|_| "cannot open file")?;
        let buffered = BufReader::new(file);
        let mut table = Table { columns: Vec::new() };
        for line in buffered.lines() {
            let line = line.map_err(|_| "cannot read line")?;
            table.push_line(&line)?;
        }
        Ok(table)
    }

    /// Appends a row
    fn push_line(&mut self, line: &str) -> Result<(), StrError> {
        let mut row = Vec::new();
        for token in line.split_whitespace() {
            let value: f64 = token.parse().map_err(|_| "cannot parse number")?;
            row.push(value);
        }
        if row.is_empty() {
            return Ok(());
        }
        if self.columns.is_empty() {
            self.columns = vec![Vec::new(); row.len()];
        } else if row.len() != self.columns.len() {
            return Err("all rows must have the same number of columns");
        }
        for (column, value) in self.columns.iter_mut().zip(row) {
            column.push(value);
        }
        Ok(())
    }

    /// Returns the number of rows
    pub fn n_row(&self) -> usize {
        match self.columns.first() {
            Some(c) => c.len(),
            None => 0,
        }
    }

    /// Returns the number of columns
    pub fn n_column(&self) -> usize {
        self.columns.len()
    }

    /// Returns a column
    pub fn column(&self, index: usize) -> Result<&Vec<f64>, StrError> {
        self.columns.get(index).ok_or("column index is out of range")
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Table;

    #[test]
    fn from_text_works() {
        let table = Table::from_text("0.1 1.0 2.0\n\n0.2 1.5 -2.5e-3\n").unwrap();
        assert_eq!(table.n_row(), 2);
        assert_eq!(table.n_column(), 3);
        assert_eq!(table.column(0).unwrap(), &vec![0.1, 0.2]);
        assert_eq!(table.column(2).unwrap(), &vec![2.0, -2.5e-3]);
        assert_eq!(table.column(3).err(), Some("column index is out of range"));

        let empty = Table::from_text("").unwrap();
        assert_eq!(empty.n_row(), 0);
        assert_eq!(empty.n_column(), 0);
    }

    #[test]
    fn from_text_captures_errors() {
        assert_eq!(Table::from_text("0.1 a").err(), Some("cannot parse number"));
        assert_eq!(
            Table::from_text("0.1 1.0\n0.2").err(),
            Some("all rows must have the same number of columns")
        );
        assert_eq!(Table::read("/tmp/liqsim/__not_found__.txt").err(), Some("cannot open file"));
    }
}
