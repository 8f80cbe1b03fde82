//! Per-attribute string table.

/// Distinct strings in first-seen order plus one index per element.
///
/// Empty values are recorded as `-1`. Whitespace is replaced by `_` before a
/// string is compared or stored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StringList {
    strings: Vec<String>,
    indices: Vec<i32>,
}

impl StringList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from a sequence of values.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        for v in values {
            list.push(v);
        }
        list
    }

    /// Append an element and return the table position it refers to.
    pub fn push(&mut self, value: impl AsRef<str>) -> i32 {
        let value = value.as_ref();
        if value.is_empty() {
            return self.push_missing();
        }

        let value = normalize(value);
        let index = match self.strings.iter().position(|s| *s == value) {
            Some(pos) => pos as i32,
            None => {
                self.strings.push(value);
                (self.strings.len() - 1) as i32
            }
        };
        self.indices.push(index);
        index
    }

    /// Append an element without a value.
    pub fn push_missing(&mut self) -> i32 {
        self.indices.push(-1);
        -1
    }

    /// Append an optional element.
    pub fn push_opt(&mut self, value: Option<&str>) -> i32 {
        match value {
            Some(v) => self.push(v),
            None => self.push_missing(),
        }
    }

    /// Element index of the first element holding `value`.
    pub fn element_of(&self, value: &str) -> Option<usize> {
        if value.is_empty() {
            return None;
        }
        let value = normalize(value);
        let pos = self.strings.iter().position(|s| *s == value)? as i32;
        self.indices.iter().position(|&i| i == pos)
    }

    /// Distinct strings in table order.
    #[inline]
    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    /// Per-element table positions.
    #[inline]
    pub fn indices(&self) -> &[i32] {
        &self.indices
    }

    /// Number of elements (not distinct strings).
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

fn normalize(value: &str) -> String {
    value.chars().map(|c| if c.is_whitespace() { '_' } else { c }).collect()
}
