//! # nvsgen
//!
//! Generates NVS (non-volatile storage) partition images from a table of
//! key/value declarations:
//! - Fixed 4096-byte pages with ACTIVE/FULL lifecycle
//! - Namespaces, integers, strings and multi-page blobs
//! - CRC32 on every page header, entry header and data chunk
//! - Output padded to the exact partition size, ready to flash
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Declaration table (CSV)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  parse + overrides
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Generator                             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Partition builder                          │
//! │        (page budget, namespaces, retry on full)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!          ┌────────────┴────────────┐
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Page     │◄─────────│    Blob     │
//!   │  (entries)  │          │  chunking   │
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use std::collections::HashMap;
//! use nvsgen::{generate, Config};
//!
//! let table = "key,type,encoding,value\nstorage,namespace,,\nssid,data,string,myssid\n";
//! let image = generate(table, &HashMap::new(), &Config::with_size(0x3000)).unwrap();
//! assert_eq!(image.len(), 0x3000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod nvs;
pub mod value;
pub mod declaration;
pub mod generator;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{NvsError, Result};
pub use config::Config;
pub use generator::{generate, generate_file};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of nvsgen
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
