//! Generator entry point
//!
//! Ties the declaration parser to the partition builder.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use bytes::Bytes;

use crate::config::Config;
use crate::declaration::{parse_declarations, Declaration, DeclarationType};
use crate::error::{NvsError, Result};
use crate::nvs::{encode_key, Partition};

/// Encode the declaration table in `source` into a partition image.
///
/// `overrides` maps keys to values that replace the table's own. The image
/// is exactly `config.partition_size` bytes long.
pub fn generate(
    source: &str,
    overrides: &HashMap<String, String>,
    config: &Config,
) -> Result<Bytes> {
    let budget = config.usable_size()?;
    let declarations = parse_declarations(source)?;

    let mut partition = Partition::new(budget)?;
    for mut declaration in declarations {
        declaration.apply_override(overrides);
        write_declaration(&mut partition, &declaration)?;
    }

    let image = partition.finish()?;
    tracing::info!(
        "Generated NVS partition: {} bytes, {} pages",
        image.len(),
        image.len() / crate::nvs::PAGE_SIZE
    );
    Ok(image)
}

/// Read the declaration table from `path` and encode it.
pub fn generate_file(
    path: &Path,
    overrides: &HashMap<String, String>,
    config: &Config,
) -> Result<Bytes> {
    let source = fs::read_to_string(path)?;
    tracing::debug!("Read {} bytes of declarations from {}", source.len(), path.display());
    generate(&source, overrides, config)
}

fn write_declaration(partition: &mut Partition, declaration: &Declaration) -> Result<()> {
    let key = declaration.key.as_str();
    encode_key(key)?;

    match declaration.kind {
        DeclarationType::Namespace => partition.write_namespace(key),
        DeclarationType::Data => {
            partition.write_entry(key, &declaration.value, &declaration.encoding)
        }
        DeclarationType::File => Err(NvsError::UnsupportedType(format!(
            "{}: Files are not supported",
            key
        ))),
    }
}
