//! Template store boundary.
//!
//! Persistence belongs to the calling layer; the engine only needs lookups
//! and an atomic insert-if-absent. [`InMemoryTemplateStore`] backs tests, the
//! demo binary and single-process deployments.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

use crate::types::UserTemplate;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("backend error: {0}")]
    Backend(String),

    #[error("template for '{0}' already exists")]
    Duplicate(String),

    #[error("template serialization failed: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn backend<E: std::fmt::Display>(err: E) -> Self {
        StoreError::Backend(err.to_string())
    }
}

pub trait TemplateStore: Send + Sync {
    fn get(&self, username: &str) -> Result<Option<UserTemplate>, StoreError>;

    fn contains(&self, username: &str) -> Result<bool, StoreError> {
        Ok(self.get(username)?.is_some())
    }

    /// Insert `template` unless its username is taken, in which case
    /// [`StoreError::Duplicate`] is returned and the stored template is kept.
    fn insert_if_absent(&self, template: UserTemplate) -> Result<(), StoreError>;

    /// Enrolled usernames, sorted.
    fn usernames(&self) -> Result<Vec<String>, StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryTemplateStore {
    templates: RwLock<HashMap<String, UserTemplate>>,
}

impl InMemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.templates
            .read()
            .map(|guard| guard.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TemplateStore for InMemoryTemplateStore {
    fn get(&self, username: &str) -> Result<Option<UserTemplate>, StoreError> {
        let guard = self
            .templates
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        Ok(guard.get(username).cloned())
    }

    fn contains(&self, username: &str) -> Result<bool, StoreError> {
        let guard = self
            .templates
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        Ok(guard.contains_key(username))
    }

    fn insert_if_absent(&self, template: UserTemplate) -> Result<(), StoreError> {
        let mut guard = self
            .templates
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        if guard.contains_key(&template.username) {
            return Err(StoreError::Duplicate(template.username));
        }
        guard.insert(template.username.clone(), template);
        Ok(())
    }

    fn usernames(&self) -> Result<Vec<String>, StoreError> {
        let guard = self
            .templates
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        let mut names: Vec<String> = guard.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
