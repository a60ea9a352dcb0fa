//! Column visibility and order
//!
//! Column state is kept apart from `QueryState`: it never feeds the cache key,
//! so editing columns never triggers a fetch.

use crate::errors::ColumnError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub key: String,
    pub title: String,
    pub visible: bool,
    pub order: u32,
}

impl ColumnDescriptor {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            visible: true,
            order: 0,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }
}

/// Types that describe their own table columns, usually via `#[derive(TableColumns)]`
pub trait ColumnSource {
    fn column_descriptors() -> Vec<ColumnDescriptor>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnState {
    columns: Vec<ColumnDescriptor>,
    initial: Vec<ColumnDescriptor>,
}

impl ColumnState {
    /// Columns are sorted by their order index, then renumbered densely
    pub fn new(columns: Vec<ColumnDescriptor>) -> Result<Self, ColumnError> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.key.as_str()) {
                return Err(ColumnError::DuplicateColumn(column.key.clone()));
            }
        }

        let mut columns = columns;
        columns.sort_by_key(|column| column.order);
        renumber(&mut columns);

        Ok(Self {
            initial: columns.clone(),
            columns,
        })
    }

    pub fn from_source<T: ColumnSource>() -> Result<Self, ColumnError> {
        Self::new(T::column_descriptors())
    }

    /// All columns in display order
    pub fn all(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Visible columns in display order
    pub fn visible(&self) -> Vec<ColumnDescriptor> {
        self.columns
            .iter()
            .filter(|column| column.visible)
            .cloned()
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|column| column.key == key)
    }

    fn position(&self, key: &str) -> Result<usize, ColumnError> {
        self.columns
            .iter()
            .position(|column| column.key == key)
            .ok_or_else(|| ColumnError::UnknownColumn(key.to_string()))
    }

    /// Flip visibility; returns the new flag
    pub fn toggle(&mut self, key: &str) -> Result<bool, ColumnError> {
        let index = self.position(key)?;
        let visible = !self.columns[index].visible;
        self.set_visible(key, visible)?;
        Ok(visible)
    }

    pub fn set_visible(&mut self, key: &str, visible: bool) -> Result<(), ColumnError> {
        let index = self.position(key)?;

        if !visible && self.columns[index].visible {
            let visible_count = self.columns.iter().filter(|column| column.visible).count();
            if visible_count == 1 {
                return Err(ColumnError::LastVisibleColumn(key.to_string()));
            }
        }

        self.columns[index].visible = visible;
        Ok(())
    }

    /// Move a column to `index`, clamped to the end
    pub fn move_to(&mut self, key: &str, index: usize) -> Result<(), ColumnError> {
        let from = self.position(key)?;
        let column = self.columns.remove(from);
        let to = index.min(self.columns.len());
        self.columns.insert(to, column);
        renumber(&mut self.columns);
        Ok(())
    }

    /// Apply a full ordering; `keys` must be a permutation of the current keys
    pub fn reorder(&mut self, keys: &[&str]) -> Result<(), ColumnError> {
        if keys.len() != self.columns.len() {
            return Err(ColumnError::InvalidOrder(format!(
                "expected {} keys, got {}",
                self.columns.len(),
                keys.len()
            )));
        }

        let mut reordered = Vec::with_capacity(self.columns.len());
        let mut seen = HashSet::new();
        for key in keys {
            if !seen.insert(*key) {
                return Err(ColumnError::InvalidOrder(format!("'{}' listed twice", key)));
            }
            let index = self.position(key)?;
            reordered.push(self.columns[index].clone());
        }

        renumber(&mut reordered);
        self.columns = reordered;
        Ok(())
    }

    /// Restore the initial snapshot
    pub fn reset(&mut self) {
        self.columns = self.initial.clone();
    }

    pub fn is_modified(&self) -> bool {
        self.columns != self.initial
    }
}

fn renumber(columns: &mut [ColumnDescriptor]) {
    for (index, column) in columns.iter_mut().enumerate() {
        column.order = index as u32;
    }
}
