//! Entry output
//!
//! CSV output starts with a header row naming the selected fields; JSON
//! output is one object per line with the same keys in the same order.
//! SQLite output is a fresh database holding one `utxos` table keyed by
//! `(txid, vout)`, filled with one transaction per batch.

use crate::errors::{AppError, AppResult};
use crate::types::{ChainstateEntry, FieldSelection, OutputField, OutputFormat};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

enum Sink<W: Write> {
    Csv(csv::Writer<W>),
    Json(BufWriter<W>),
    Sqlite(SqliteSink),
}

/// Writes entries with a running 1-based `count`
pub struct EntryWriter<W: Write> {
    sink: Sink<W>,
    fields: Vec<OutputField>,
    count: u64,
}

impl EntryWriter<File> {
    /// Create (or replace) the output file
    pub fn create(path: &Path, format: OutputFormat, fields: &FieldSelection) -> AppResult<Self> {
        if format == OutputFormat::Sqlite {
            return Ok(Self {
                sink: Sink::Sqlite(SqliteSink::create(path, fields)?),
                fields: fields.fields().to_vec(),
                count: 0,
            });
        }
        let file = File::create(path)?;
        Self::new(file, format, fields)
    }
}

impl<W: Write> EntryWriter<W> {
    /// Stream output to `writer`; SQLite needs a file and goes through [`EntryWriter::create`]
    pub fn new(writer: W, format: OutputFormat, fields: &FieldSelection) -> AppResult<Self> {
        let sink = match format {
            OutputFormat::Csv => {
                let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
                csv_writer.write_record(fields.header())?;
                Sink::Csv(csv_writer)
            }
            OutputFormat::Json => Sink::Json(BufWriter::new(writer)),
            OutputFormat::Sqlite => {
                return Err(AppError::InvalidInput(
                    "SQLite output needs a file path".to_string(),
                ))
            }
        };

        Ok(Self {
            sink,
            fields: fields.fields().to_vec(),
            count: 0,
        })
    }

    /// Entries written so far
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn write_entry(&mut self, entry: &ChainstateEntry) -> AppResult<()> {
        self.write_batch(std::slice::from_ref(entry))
    }

    /// Write a decoded batch in order; SQLite commits it as one transaction
    pub fn write_batch(&mut self, entries: &[ChainstateEntry]) -> AppResult<()> {
        match &mut self.sink {
            Sink::Csv(writer) => {
                for entry in entries {
                    self.count += 1;
                    let count = self.count;
                    let row = self.fields.iter().map(|field| entry.field_text(*field, count));
                    writer.write_record(row)?;
                }
            }
            Sink::Json(writer) => {
                for entry in entries {
                    self.count += 1;
                    serde_json::to_writer(&mut *writer, &entry.to_json(&self.fields, self.count))?;
                    writer.write_all(b"\n")?;
                }
            }
            Sink::Sqlite(sink) => {
                sink.insert(entries, self.count + 1)?;
                self.count += entries.len() as u64;
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> AppResult<()> {
        match &mut self.sink {
            Sink::Csv(writer) => writer.flush()?,
            Sink::Json(writer) => writer.flush()?,
            // Every batch is committed on write
            Sink::Sqlite(_) => {}
        }
        Ok(())
    }

    /// Flush and return the underlying writer
    #[cfg(test)]
    pub fn into_inner(self) -> AppResult<W> {
        match self.sink {
            Sink::Csv(writer) => writer
                .into_inner()
                .map_err(|err| AppError::Io(err.into_error())),
            Sink::Json(writer) => writer
                .into_inner()
                .map_err(|err| AppError::Io(err.into_error())),
            Sink::Sqlite(_) => Err(AppError::InvalidInput(
                "SQLite output has no stream writer".to_string(),
            )),
        }
    }
}

/// `utxos` table writer
struct SqliteSink {
    connection: Connection,
    columns: Vec<OutputField>,
    insert_sql: String,
}

impl SqliteSink {
    /// Replace any database at `path` and set up the `utxos` table
    fn create(path: &Path, fields: &FieldSelection) -> AppResult<Self> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        let connection = Connection::open(path)?;

        let columns = table_columns(fields);
        let definitions = columns
            .iter()
            .map(|field| format!("\"{}\" {}", field.as_str(), column_type(*field)))
            .collect::<Vec<_>>()
            .join(",\n    ");
        connection.execute_batch(&format!(
            "CREATE TABLE utxos (
    {},
    PRIMARY KEY (txid, vout)
);",
            definitions
        ))?;

        let names = columns
            .iter()
            .map(|field| format!("\"{}\"", field.as_str()))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; columns.len()].join(", ");
        let insert_sql = format!("INSERT INTO utxos ({}) VALUES ({})", names, placeholders);

        info!("SQLite output initialised at: {}", path.display());
        Ok(Self {
            connection,
            columns,
            insert_sql,
        })
    }

    /// Insert `entries` in one transaction, numbering them from `first_count`
    fn insert(&mut self, entries: &[ChainstateEntry], first_count: u64) -> AppResult<()> {
        let tx = self.connection.transaction()?;
        {
            let mut statement = tx.prepare_cached(&self.insert_sql)?;
            for (offset, entry) in entries.iter().enumerate() {
                let count = first_count + offset as u64;
                let row = self
                    .columns
                    .iter()
                    .map(|field| sql_value(entry.field_json(*field, count)))
                    .collect::<AppResult<Vec<_>>>()?;
                statement.execute(params_from_iter(row))?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

/// `txid` and `vout` always lead since they form the primary key
fn table_columns(fields: &FieldSelection) -> Vec<OutputField> {
    let mut columns = vec![OutputField::Txid, OutputField::Vout];
    columns.extend(
        fields
            .fields()
            .iter()
            .copied()
            .filter(|field| !matches!(field, OutputField::Txid | OutputField::Vout)),
    );
    columns
}

fn column_type(field: OutputField) -> &'static str {
    match field {
        OutputField::Txid => "TEXT NOT NULL",
        OutputField::Vout => "INTEGER NOT NULL",
        OutputField::Script | OutputField::Type | OutputField::Address => "TEXT",
        _ => "INTEGER",
    }
}

fn sql_value(value: Value) -> AppResult<SqlValue> {
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Bool(flag) => SqlValue::Integer(i64::from(flag)),
        Value::Number(number) => match number.as_i64() {
            Some(n) => SqlValue::Integer(n),
            None => {
                return Err(AppError::InvalidInput(format!(
                    "{} does not fit an SQLite integer",
                    number
                )))
            }
        },
        Value::String(text) => SqlValue::Text(text),
        other => SqlValue::Text(other.to_string()),
    })
}
