use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field id reserved for the "no scaling" entry.
pub const SENTINEL_FIELD_ID: &str = "none";

/// Label shown in the selector for the "no scaling" entry.
pub const SENTINEL_FIELD_LABEL: &str = "(no scaling)";

/// A selectable statistical attribute.
///
/// `key` is the source column to read values from; the sentinel "no
/// scaling" field carries no key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    pub name: String,
    pub key: Option<String>,
}

impl Field {
    pub fn sentinel() -> Self {
        Self {
            id: SENTINEL_FIELD_ID.to_string(),
            name: SENTINEL_FIELD_LABEL.to_string(),
            key: None,
        }
    }

    pub fn from_header(header: &str) -> Self {
        Self {
            id: field_id(header),
            name: header.to_string(),
            key: Some(header.to_string()),
        }
    }
}

/// Derives a stable, URL-safe field id from a column header.
///
/// Lowercases the header and collapses every run of characters outside
/// `[a-z0-9]` into a single `_`. Pure and idempotent.
pub fn field_id(header: &str) -> String {
    let mut out = String::with_capacity(header.len());
    let mut in_run = false;
    for c in header.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

/// The ordered set of selectable fields, sentinel first, with O(1) lookup
/// by id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldCatalog {
    fields: Vec<Field>,
    by_id: BTreeMap<String, usize>,
}

impl FieldCatalog {
    /// The "nothing to show" catalog: no fields at all, not even the
    /// sentinel. Produced when ingestion yields zero rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the catalog from a header row: the sentinel first, then one
    /// field per header excluding the join column, in header order.
    pub fn from_headers<S: AsRef<str>>(headers: &[S], join_column: &str) -> Self {
        let mut fields = vec![Field::sentinel()];
        for header in headers {
            let header = header.as_ref();
            if header == join_column {
                continue;
            }
            fields.push(Field::from_header(header));
        }

        let by_id = fields
            .iter()
            .enumerate()
            .map(|(idx, f)| (f.id.clone(), idx))
            .collect();

        Self { fields, by_id }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Resolves an id to its field, falling back to the catalog's first
    /// field on a miss. Returns `None` only for the empty catalog.
    pub fn lookup(&self, id: &str) -> Option<&Field> {
        match self.index_of(id) {
            Some(idx) => self.fields.get(idx),
            None => self.fields.first(),
        }
    }

    /// The field selection starts on once ingestion completes: the first
    /// non-sentinel field, or the sentinel when no data fields exist.
    pub fn initial_field(&self) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| f.key.is_some())
            .or_else(|| self.fields.first())
    }
}
