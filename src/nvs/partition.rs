//! Partition Builder
//!
//! Owns the page list and routes entries to the current page.
//!
//! ## Responsibilities
//! - Allocate pages against the partition's byte budget
//! - Keep exactly one ACTIVE page (the current one), mark the rest FULL
//! - Allocate namespace indices
//! - Retry an entry once on a fresh page when the current one is full
//! - Pad the image with empty pages and the trailing reserved page

use bytes::{Bytes, BytesMut};

use crate::error::{NvsError, Result};
use crate::value::{Encoding, Value};

use super::entry::ItemType;
use super::page::Page;
use super::{MAX_NAMESPACE_INDEX, PAGE_SIZE};

/// Builds an NVS partition image page by page
pub struct Partition {
    /// Pages before the current one, in sequence order
    pub(super) pages: Vec<Page>,
    /// Page receiving new entries
    pub(super) current: Page,
    /// Sequence number of the current page
    page_num: u32,
    /// Bytes left for data pages
    remaining: usize,
    /// Namespace index tagged onto new entries (0 = default namespace)
    namespace_idx: u8,
}

impl Partition {
    /// Start a partition with `budget` bytes for data pages and allocate page 0
    pub fn new(budget: usize) -> Result<Self> {
        if budget < PAGE_SIZE {
            return Err(NvsError::InsufficientSize);
        }

        tracing::debug!("Creating partition with {} bytes for data pages", budget);

        Ok(Self {
            pages: Vec::new(),
            current: Page::new(0, false),
            page_num: 0,
            remaining: budget - PAGE_SIZE,
            namespace_idx: 0,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Completed pages, excluding the current one
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn current_page(&self) -> &Page {
        &self.current
    }

    /// Number of pages allocated so far, current page included
    pub fn page_count(&self) -> usize {
        self.pages.len() + 1
    }

    pub fn namespace_index(&self) -> u8 {
        self.namespace_idx
    }

    /// Bytes of budget not yet allocated to pages
    pub fn remaining_size(&self) -> usize {
        self.remaining
    }

    // =========================================================================
    // Page Lifecycle
    // =========================================================================

    /// Retire the current page and start the next one.
    ///
    /// The current page is marked FULL even when allocation then fails, so
    /// after `finish()` every data page is FULL.
    pub fn create_new_page(&mut self, reserved: bool) -> Result<()> {
        self.current.mark_full();

        if self.remaining == 0 && !reserved {
            return Err(NvsError::InsufficientSize);
        }
        if !reserved {
            self.remaining = self.remaining.saturating_sub(PAGE_SIZE);
        }

        self.page_num += 1;
        tracing::debug!(
            "Allocating page {}{} ({} bytes left)",
            self.page_num,
            if reserved { " (reserved)" } else { "" },
            self.remaining
        );

        let page = Page::new(self.page_num, reserved);
        let previous = std::mem::replace(&mut self.current, page);
        self.pages.push(previous);
        Ok(())
    }

    /// Run `place` on the current page, and once more on a fresh page if the
    /// current one is full.
    fn place_with_retry<F>(&mut self, mut place: F) -> Result<()>
    where
        F: FnMut(&mut Page) -> Result<()>,
    {
        match place(&mut self.current) {
            Err(e) if e.is_page_full() => {
                self.create_new_page(false)?;
                place(&mut self.current)
            }
            other => other,
        }
    }

    // =========================================================================
    // Entries
    // =========================================================================

    /// Open a new namespace; entries written afterwards belong to it.
    pub fn write_namespace(&mut self, key: &str) -> Result<()> {
        if self.namespace_idx >= MAX_NAMESPACE_INDEX {
            return Err(NvsError::Input(format!(
                "Cannot create namespace `{}`: at most {} namespaces allowed",
                key, MAX_NAMESPACE_INDEX
            )));
        }

        self.namespace_idx += 1;
        let index = [self.namespace_idx];
        tracing::debug!("Namespace `{}` -> index {}", key, self.namespace_idx);

        self.place_with_retry(|page| page.write_primitive(key, ItemType::U8, &index, 0))
    }

    /// Normalize `value` by `encoding` and write it under the current namespace.
    pub fn write_entry(&mut self, key: &str, value: &str, encoding: &str) -> Result<()> {
        let encoding: Encoding = encoding.parse()?;
        let value = Value::parse(key, value, encoding)?;
        self.write_value(key, &value)
    }

    /// Write an already normalized value under the current namespace.
    pub fn write_value(&mut self, key: &str, value: &Value) -> Result<()> {
        let ns_index = self.namespace_idx;
        tracing::trace!("Writing `{}` ({} bytes) in namespace {}", key, value.len(), ns_index);

        match value {
            Value::Primitive { item_type, bytes } => self.place_with_retry(|page| {
                page.write_primitive(key, *item_type, bytes, ns_index)
            }),
            Value::Str(data) => {
                self.place_with_retry(|page| page.write_string(key, data, ns_index))
            }
            Value::Blob(data) => match self.write_blob(key, data, ns_index) {
                Err(e) if e.is_page_full() => {
                    self.create_new_page(false)?;
                    self.write_blob(key, data, ns_index)
                }
                other => other,
            },
        }
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Fill the remaining budget with empty pages, append the reserved page
    /// and return the whole image.
    pub fn finish(mut self) -> Result<Bytes> {
        loop {
            match self.create_new_page(false) {
                Ok(()) => continue,
                Err(NvsError::InsufficientSize) => break,
                Err(e) => return Err(e),
            }
        }
        self.create_new_page(true)?;

        let mut image = BytesMut::with_capacity(self.page_count() * PAGE_SIZE);
        for page in &self.pages {
            image.extend_from_slice(page.as_bytes());
        }
        image.extend_from_slice(self.current.as_bytes());

        tracing::debug!("Partition finished: {} pages", self.page_count());
        Ok(image.freeze())
    }
}
