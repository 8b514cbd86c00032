//! Container values: Bag, Seq, List and Alt.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use crate::error::CollectionError;
use crate::model::Value;

/// RDF container or list idiom a collection is encoded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// Unordered; duplicates only when explicitly allowed.
    Bag,
    /// Ordered, duplicates kept.
    Seq,
    /// Ordered linked list (`rdf:first`/`rdf:rest`), duplicates kept.
    List,
    /// Ordered alternatives, the first being the default; never duplicated.
    Alt,
}

impl CollectionKind {
    pub fn is_ordered(self) -> bool {
        !matches!(self, CollectionKind::Bag)
    }
}

/// A collection value.
///
/// Editing a collection never touches resources it was already assigned to:
/// they hold their own copy. Every edit keeps the kind's duplicate policy.
#[derive(Debug, Clone)]
pub struct Collection {
    kind: CollectionKind,
    elements: Vec<Value>,
    allow_duplicates: bool,
}

impl Collection {
    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    /// Elements in insertion order. For a Bag the order carries no meaning.
    pub fn elements(&self) -> &[Value] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.elements.get(index)
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.elements.contains(value)
    }

    pub fn allows_duplicates(&self) -> bool {
        self.allow_duplicates
    }

    /// Number of occurrences of `value`.
    pub fn count(&self, value: &Value) -> usize {
        self.elements.iter().filter(|e| *e == value).count()
    }

    /// Default alternative of an Alt (its first element).
    pub fn default_alternative(&self) -> Option<&Value> {
        match self.kind {
            CollectionKind::Alt => self.elements.first(),
            _ => None,
        }
    }

    /// Append `value`. Returns `false` when the collection keeps no
    /// duplicates and already holds it.
    pub fn push(&mut self, value: impl Into<Value>) -> bool {
        let value = value.into();
        if self.rejects(&value) {
            return false;
        }
        self.elements.push(value);
        true
    }

    /// Insert `value` before position `index` (`index == len` appends).
    /// Returns `Ok(false)` when the value is a rejected duplicate.
    pub fn insert(&mut self, index: usize, value: impl Into<Value>) -> Result<bool, CollectionError> {
        if index > self.elements.len() {
            return Err(self.out_of_range(index));
        }
        let value = value.into();
        if self.rejects(&value) {
            return Ok(false);
        }
        self.elements.insert(index, value);
        Ok(true)
    }

    /// Replace the element at `index`, returning the previous one.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Result<Value, CollectionError> {
        let value = value.into();
        let current = self
            .elements
            .get(index)
            .ok_or_else(|| self.out_of_range(index))?;
        if *current != value && self.rejects(&value) {
            return Err(CollectionError::DuplicateElement(value.describe()));
        }
        Ok(std::mem::replace(&mut self.elements[index], value))
    }

    /// Remove and return the element at `index`.
    pub fn remove(&mut self, index: usize) -> Result<Value, CollectionError> {
        if index >= self.elements.len() {
            return Err(self.out_of_range(index));
        }
        Ok(self.elements.remove(index))
    }

    /// Remove and return the last element.
    pub fn pop(&mut self) -> Option<Value> {
        self.elements.pop()
    }

    /// Remove every occurrence of `value`, failing if there is none.
    /// Returns the number removed.
    pub fn remove_item(&mut self, value: &Value) -> Result<usize, CollectionError> {
        match self.discard(value) {
            0 => Err(CollectionError::MissingElement(value.describe())),
            removed => Ok(removed),
        }
    }

    /// Remove every occurrence of `value`; returns the number removed.
    pub fn discard(&mut self, value: &Value) -> usize {
        let before = self.elements.len();
        self.elements.retain(|e| e != value);
        before - self.elements.len()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    fn rejects(&self, value: &Value) -> bool {
        !self.allow_duplicates && self.elements.contains(value)
    }

    fn out_of_range(&self, index: usize) -> CollectionError {
        CollectionError::IndexOutOfRange {
            index,
            len: self.elements.len(),
        }
    }
}

/// Bags compare as multisets; the other kinds element by element.
impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        if self.kind != other.kind || self.elements.len() != other.elements.len() {
            return false;
        }
        match self.kind {
            CollectionKind::Bag => self
                .elements
                .iter()
                .all(|e| self.count(e) == other.count(e)),
            _ => self.elements == other.elements,
        }
    }
}

impl Eq for Collection {}

impl Hash for Collection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        match self.kind {
            CollectionKind::Bag => {
                // Order-independent: sum of per-element hashes.
                let combined = self.elements.iter().fold(0u64, |acc, e| {
                    let mut hasher = DefaultHasher::new();
                    e.hash(&mut hasher);
                    acc.wrapping_add(hasher.finish())
                });
                self.elements.len().hash(state);
                combined.hash(state);
            }
            _ => self.elements.hash(state),
        }
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

/// Builds [`Collection`] values.
///
/// `allow_duplicates` is a Bag-only switch: Seq and List always keep every
/// element, Alt never keeps a repeated one.
#[derive(Debug, Clone)]
pub struct CollectionBuilder {
    kind: CollectionKind,
    allow_duplicates: bool,
    elements: Vec<Value>,
}

impl CollectionBuilder {
    pub fn new(kind: CollectionKind) -> Self {
        Self {
            kind,
            allow_duplicates: false,
            elements: Vec::new(),
        }
    }

    /// One-shot construction.
    pub fn from_elements(
        kind: CollectionKind,
        elements: impl IntoIterator<Item = Value>,
        allow_duplicates: bool,
    ) -> Collection {
        Self::new(kind)
            .allow_duplicates(allow_duplicates)
            .extend(elements)
            .build()
    }

    pub fn allow_duplicates(mut self, allow: bool) -> Self {
        self.allow_duplicates = allow;
        self
    }

    pub fn push(mut self, value: impl Into<Value>) -> Self {
        self.elements.push(value.into());
        self
    }

    pub fn extend(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.elements.extend(values);
        self
    }

    pub fn build(self) -> Collection {
        let keep_duplicates = match self.kind {
            CollectionKind::Seq | CollectionKind::List => true,
            CollectionKind::Bag => self.allow_duplicates,
            CollectionKind::Alt => false,
        };

        let elements = if keep_duplicates {
            self.elements
        } else {
            let mut seen = HashSet::with_capacity(self.elements.len());
            self.elements
                .into_iter()
                .filter(|value| seen.insert(value.clone()))
                .collect()
        };

        Collection {
            kind: self.kind,
            elements,
            allow_duplicates: keep_duplicates,
        }
    }
}
