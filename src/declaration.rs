//! Declaration table parsing
//!
//! The input is a comma separated table:
//!
//! ```text
//! key,type,encoding,value
//! storage,namespace,,
//! ssid,data,string,myssid
//! retries,data,u8,3
//! ```
//!
//! Lines starting with `#` before the header row are comments. After the
//! header every line is a row. The table ends at the first empty line or at
//! end of input.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{NvsError, Result};

/// Type column of a declaration row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationType {
    /// Opens a namespace named by the key
    Namespace,
    /// Inline value in the `value` column
    Data,
    /// Value read from a file path; not supported
    File,
}

impl FromStr for DeclarationType {
    type Err = NvsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "namespace" => Ok(DeclarationType::Namespace),
            "data" => Ok(DeclarationType::Data),
            "file" => Ok(DeclarationType::File),
            _ => Err(NvsError::UnsupportedType(s.to_string())),
        }
    }
}

impl fmt::Display for DeclarationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeclarationType::Namespace => "namespace",
            DeclarationType::Data => "data",
            DeclarationType::File => "file",
        };
        f.write_str(name)
    }
}

/// One row of the declaration table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub key: String,
    pub kind: DeclarationType,
    /// Empty for namespace rows
    pub encoding: String,
    pub value: String,
}

impl Declaration {
    /// Replace the value with the override registered for this key, if any
    pub fn apply_override(&mut self, overrides: &HashMap<String, String>) {
        if let Some(value) = overrides.get(&self.key) {
            tracing::debug!("Overriding value of `{}`", self.key);
            self.value = value.clone();
        }
    }
}

/// Column positions taken from the header row
struct Columns {
    key: usize,
    kind: usize,
    encoding: Option<usize>,
    value: Option<usize>,
}

impl Columns {
    fn from_header(header: &str) -> Result<Self> {
        let names: Vec<&str> = header.split(',').map(str::trim).collect();
        let find = |name: &str| names.iter().position(|n| *n == name);

        let key = find("key")
            .ok_or_else(|| NvsError::Parse(format!("header `{}` has no `key` column", header)))?;
        let kind = find("type")
            .ok_or_else(|| NvsError::Parse(format!("header `{}` has no `type` column", header)))?;

        Ok(Self {
            key,
            kind,
            encoding: find("encoding"),
            value: find("value"),
        })
    }
}

/// Parse the whole declaration table.
pub fn parse_declarations(source: &str) -> Result<Vec<Declaration>> {
    let mut lines = source.lines();

    let header = lines
        .by_ref()
        .find(|line| !line.starts_with('#'))
        .ok_or_else(|| NvsError::Parse("missing header row".to_string()))?;
    let columns = Columns::from_header(header)?;

    let mut declarations = Vec::new();
    for (row, line) in lines.enumerate() {
        let cells: Vec<&str> = line.split(',').collect();
        if cells.len() == 1 && cells[0].is_empty() {
            break;
        }

        let cell = |index: Option<usize>| {
            index
                .and_then(|i| cells.get(i).copied())
                .unwrap_or("")
        };

        let key = cell(Some(columns.key)).trim();
        if key.is_empty() {
            return Err(NvsError::Parse(format!("row {} has an empty key", row + 1)));
        }
        let kind: DeclarationType = cell(Some(columns.kind)).trim().parse()?;

        declarations.push(Declaration {
            key: key.to_string(),
            kind,
            encoding: cell(columns.encoding).trim().to_string(),
            value: cell(columns.value).to_string(),
        });
    }

    tracing::debug!("Parsed {} declarations", declarations.len());
    Ok(declarations)
}
