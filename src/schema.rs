//! Reading spreadsheets into typed records.
//!
//! Headers are matched once, when the file is loaded. Past this module
//! nothing looks at column labels again.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::config::{HeaderMatch, HeaderSchema};
use crate::error::{BadgeError, Result};
use crate::record::Record;

/// A spreadsheet as plain text: the header row, then the data rows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// `.csv` goes through the csv reader, anything else through calamine
    /// (xlsx, xlsm, xlsb, xls, ods). Only the first worksheet is read.
    pub fn load(path: &Path) -> Result<Table> {
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if is_csv {
            Table::load_csv(path)
        } else {
            Table::load_workbook(path)
        }
    }

    fn load_csv(path: &Path) -> Result<Table> {
        let fail = |err: csv::Error| BadgeError::source_load("spreadsheet", path, err);
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(fail)?;
        let headers = reader
            .headers()
            .map_err(fail)?
            .iter()
            .map(|header| header.trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        let mut rows = vec![];
        for row in reader.records() {
            let row = row.map_err(fail)?;
            rows.push(row.iter().map(|cell| cell.trim().to_string()).collect());
        }
        Ok(Table { headers, rows })
    }

    fn load_workbook(path: &Path) -> Result<Table> {
        let mut workbook = open_workbook_auto(path)
            .map_err(|err| BadgeError::source_load("spreadsheet", path, err))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| BadgeError::source_load("spreadsheet", path, "workbook has no worksheet"))?
            .map_err(|err| BadgeError::source_load("spreadsheet", path, err))?;
        let mut rows = range.rows().map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
        let headers = rows.next().unwrap_or_default();
        Ok(Table {
            headers,
            rows: rows.collect(),
        })
    }
}

fn cell_text(cell: &Data) -> String {
    match *cell {
        Data::Empty => String::new(),
        Data::String(ref value) => value.trim().to_string(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) => number_text(value),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(ref value) => match value.as_datetime() {
            Some(datetime) => datetime.date().to_string(),
            None => number_text(value.as_f64()),
        },
        Data::DateTimeIso(ref value) => value.split('T').next().unwrap_or_default().to_string(),
        Data::DurationIso(ref value) => value.clone(),
        // Cell errors (#N/A, #REF!...) read as empty.
        _ => String::new(),
    }
}

/// Passport and phone numbers typed as numbers come back as floats.
fn number_text(value: f64) -> String {
    if value.fract() == 0. && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Column index of each record field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnMap {
    pub name: usize,
    pub birth_date: usize,
    pub passport_number: usize,
    pub organization_name: Option<usize>,
    pub supplier_name: Option<usize>,
    pub whatsapp_number: Option<usize>,
    pub local_contact_number: Option<usize>,
}

impl ColumnMap {
    /// Match headers against the schema. A column feeds the first field it
    /// matches, in schema order. When several columns match the same field,
    /// the last one wins.
    pub fn resolve(headers: &[String], schema: &HeaderSchema) -> Result<ColumnMap> {
        let matchers: [Option<&HeaderMatch>; 7] = [
            Some(&schema.name),
            Some(&schema.birth_date),
            Some(&schema.identifier),
            schema.organization.as_ref(),
            schema.supplier.as_ref(),
            schema.whatsapp.as_ref(),
            schema.local_contact.as_ref(),
        ];
        let mut found: [Option<usize>; 7] = [None; 7];
        for (column, header) in headers.iter().enumerate() {
            let field = matchers
                .iter()
                .position(|matcher| matcher.map(|m| m.matches(header)).unwrap_or(false));
            if let Some(field) = field {
                debug!(target: "schema", "Column {} \"{}\" -> field {}", column, header, field);
                found[field] = Some(column);
            }
        }

        let missing: Vec<String> = [&schema.name, &schema.birth_date, &schema.identifier]
            .iter()
            .zip(found.iter())
            .filter(|(_, column)| column.is_none())
            .map(|(matcher, _)| matcher.label.clone())
            .collect();
        match (found[0], found[1], found[2]) {
            (Some(name), Some(birth_date), Some(passport_number)) => Ok(ColumnMap {
                name,
                birth_date,
                passport_number,
                organization_name: found[3],
                supplier_name: found[4],
                whatsapp_number: found[5],
                local_contact_number: found[6],
            }),
            _ => Err(BadgeError::SchemaMismatch { missing }),
        }
    }

    /// Build the record of a data row. `line` is only used in diagnostics.
    pub fn record(&self, line: usize, row: &[String]) -> Result<Record> {
        let cell = |column: usize| row.get(column).map(|value| value.trim()).unwrap_or_default();
        let optional = |column: Option<usize>| {
            column
                .map(cell)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        let required = |column: usize, field: &'static str| {
            let value = cell(column);
            if value.is_empty() {
                Err(BadgeError::IncompleteRecord { row: line, field })
            } else {
                Ok(value.to_string())
            }
        };
        Ok(Record {
            name: required(self.name, "name")?,
            birth_date: required(self.birth_date, "birth date")?,
            passport_number: required(self.passport_number, "passport number")?,
            organization_name: optional(self.organization_name),
            supplier_name: optional(self.supplier_name),
            whatsapp_number: optional(self.whatsapp_number),
            local_contact_number: optional(self.local_contact_number),
        })
    }
}

/// Typed rows of a spreadsheet. Rows that are entirely blank are dropped,
/// rows missing a required cell are kept as errors so that the caller can
/// report them and carry on.
pub fn load_records(path: &Path, schema: &HeaderSchema) -> Result<Vec<Result<Record>>> {
    let table = Table::load(path)?;
    let columns = ColumnMap::resolve(&table.headers, schema)?;
    Ok(table_records(&table, &columns))
}

pub fn table_records(table: &Table, columns: &ColumnMap) -> Vec<Result<Record>> {
    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.iter().any(|cell| !cell.trim().is_empty()))
        // Spreadsheet rows count from 1, and the header takes the first.
        .map(|(index, row)| columns.record(index + 2, row))
        .collect()
}
