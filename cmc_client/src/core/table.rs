// @file: cmc_client/src/core/table.rs
// @description: Flat tabular records built from nested JSON payloads.
// @author: LAS.

use serde::Serialize;
use serde_json::{Map, Value};


//
// CONSTANTS
//

pub const KEY_SEPARATOR: &str = "-";


//
// TYPE DEFINITIONS
//

pub type Row = Map<String, Value>;

/// Ordered rows sharing one column schema.
///
/// Columns are the union of every row's keys in order of first appearance.
/// A row lacking a column reads as `Value::Null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    //
    // CONSTRUCTION
    //

    pub fn new() -> Self {
        Self::default()
    }

    // Flattens each JSON object into one row. Returns the index of the first
    // element that is not an object.
    pub fn from_records(records: &[Value]) -> Result<Self, usize> {
        let mut table = Table::new();
        for (idx, record) in records.iter().enumerate() {
            let obj = record.as_object().ok_or(idx)?;
            table.push_row(flatten_object(obj, KEY_SEPARATOR));
        }
        Ok(table)
    }

    pub fn push_row(&mut self, row: Row) {
        for key in row.keys() {
            if !self.columns.iter().any(|c| c == key) {
                self.columns.push(key.clone());
            }
        }
        self.rows.push(row);
    }

    // Appends `other` below `self`, keeping both row orders.
    pub fn concat(mut self, other: Table) -> Self {
        for row in other.rows {
            self.push_row(row);
        }
        self
    }


    //
    // ACCESSORS
    //

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let r = self.rows.get(row)?;
        if !self.has_column(column) {
            return None;
        }
        Some(r.get(column).unwrap_or(&Value::Null))
    }

    pub fn column<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.rows.iter().map(move |r| r.get(name).unwrap_or(&Value::Null))
    }
}


//
// FLATTENING
//

/// Flattens nested objects into `parent<sep>child` keys. Arrays and scalars are leaves.
pub fn flatten_object(obj: &Map<String, Value>, sep: &str) -> Row {
    let mut out = Row::new();
    flatten_into(&mut out, None, obj, sep);
    out
}

fn flatten_into(out: &mut Row, prefix: Option<&str>, obj: &Map<String, Value>, sep: &str) {
    for (key, value) in obj {
        let path = match prefix {
            Some(p) => format!("{}{}{}", p, sep, key),
            None => key.clone(),
        };

        match value {
            Value::Object(inner) => flatten_into(out, Some(&path), inner, sep),
            leaf => {
                out.insert(path, leaf.clone());
            }
        }
    }
}
