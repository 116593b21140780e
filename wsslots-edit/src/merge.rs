/// How requested content combines with a slot's current content.
///
/// The mode applies to every slot of one request. Concatenation inserts no
/// separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    #[default]
    Replace,
    Append,
    Prepend,
}

impl MergeMode {
    /// Picks the mode from the `append`/`prepend` flags. Returns `None` when
    /// both are set.
    #[must_use]
    pub fn from_flags(append: bool, prepend: bool) -> Option<Self> {
        match (append, prepend) {
            (false, false) => Some(Self::Replace),
            (true, false) => Some(Self::Append),
            (false, true) => Some(Self::Prepend),
            (true, true) => None,
        }
    }

    /// Computes the effective content. Absent current content counts as empty.
    #[must_use]
    pub fn apply(&self, current: Option<&str>, requested: &str) -> String {
        let current = current.unwrap_or_default();
        match self {
            Self::Replace => requested.to_string(),
            Self::Append => format!("{current}{requested}"),
            Self::Prepend => format!("{requested}{current}"),
        }
    }
}
