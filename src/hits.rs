use std::ops::Deref;

/// Point indices returned by a query.
///
/// A query either allocates its own result or writes into a scratch buffer
/// supplied by the caller. In the latter case only the first `len` entries of
/// the buffer are meaningful, and `Scratch` holds exactly that prefix.
#[derive(Debug, PartialEq, Eq)]
pub enum Hits<'a> {
    /// Freshly allocated result.
    Owned(Vec<usize>),
    /// Prefix of the caller's scratch buffer holding the result.
    Scratch(&'a [usize]),
}

impl Hits<'_> {
    pub fn as_slice(&self) -> &[usize] {
        match self {
            Hits::Owned(v) => v,
            Hits::Scratch(s) => s,
        }
    }

    /// Logical number of hits.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Returns true if the result lives in a caller supplied buffer.
    pub fn is_scratch(&self) -> bool {
        matches!(self, Hits::Scratch(_))
    }

    pub fn into_vec(self) -> Vec<usize> {
        match self {
            Hits::Owned(v) => v,
            Hits::Scratch(s) => s.to_vec(),
        }
    }
}

impl Deref for Hits<'_> {
    type Target = [usize];

    fn deref(&self) -> &[usize] {
        self.as_slice()
    }
}
