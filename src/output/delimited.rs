//! Delimited-text writer

use crate::config::OutputConfig;
use crate::dataset::Value;
use crate::output::TabularWriter;
use crate::{OutputError, OutputResult};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

const UTF8_BOM: &str = "\u{feff}";

/// Writes records separated by a single-character delimiter
///
/// Fields containing the delimiter, a quote, CR or LF are quoted, with inner
/// quotes doubled. The file is written next to its destination and renamed
/// into place once complete.
#[derive(Debug, Clone)]
pub struct DelimitedWriter {
    delimiter: char,
    byte_order_mark: bool,
}

impl Default for DelimitedWriter {
    fn default() -> Self {
        Self::from_config(&OutputConfig::default())
    }
}

impl DelimitedWriter {
    pub fn new(delimiter: char, byte_order_mark: bool) -> Self {
        Self {
            delimiter,
            byte_order_mark,
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.delimiter, config.byte_order_mark)
    }

    /// Serializes header and rows into any writer
    pub fn write_to<W: Write>(&self, mut w: W, header: &[String], rows: &[Vec<Value>]) -> io::Result<()> {
        if self.byte_order_mark {
            w.write_all(UTF8_BOM.as_bytes())?;
        }
        self.write_record(&mut w, header.iter().map(String::as_str))?;
        for row in rows {
            let fields: Vec<String> = row.iter().map(Value::to_string).collect();
            self.write_record(&mut w, fields.iter().map(String::as_str))?;
        }
        w.flush()
    }

    fn write_record<'a, W: Write>(
        &self,
        w: &mut W,
        fields: impl Iterator<Item = &'a str>,
    ) -> io::Result<()> {
        for (i, field) in fields.enumerate() {
            if i > 0 {
                write!(w, "{}", self.delimiter)?;
            }
            if self.needs_quotes(field) {
                write!(w, "\"{}\"", field.replace('"', "\"\""))?;
            } else {
                w.write_all(field.as_bytes())?;
            }
        }
        w.write_all(b"\r\n")
    }

    fn needs_quotes(&self, field: &str) -> bool {
        field.contains(self.delimiter)
            || field.contains('"')
            || field.contains('\n')
            || field.contains('\r')
    }
}

impl TabularWriter for DelimitedWriter {
    fn write(&self, path: &Path, header: &[String], rows: &[Vec<Value>]) -> OutputResult<()> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != header.len() {
                return Err(OutputError::Width {
                    row: i + 1,
                    found: row.len(),
                    expected: header.len(),
                });
            }
        }

        let io_err = |source| OutputError::Io {
            path: path.display().to_string(),
            source,
        };

        let partial = partial_path(path);
        let result = File::create(&partial)
            .and_then(|file| self.write_to(BufWriter::new(file), header, rows))
            .and_then(|()| fs::rename(&partial, path));

        if let Err(e) = result {
            let _ = fs::remove_file(&partial);
            return Err(io_err(e));
        }

        tracing::debug!("Wrote {} records to {}", rows.len(), path.display());
        Ok(())
    }
}

/// Sibling path the file is written to before being renamed into place
fn partial_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.partial", name))
}
