use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// A diagnostic raised against a sprite's recorded usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UsageFlag {
    /// Observed in a transient/don't-destroy context with no scene on disk.
    UsedInUnresolvedScene,
    /// At least one observation couldn't measure the rendered size, so the
    /// recorded maximum may be an underestimate. Sticky for the run.
    CannotDiscoverSize,
    /// Rendered noticeably larger than its intrinsic rect.
    UsedBigger,
    /// Rendered noticeably smaller than its intrinsic rect.
    UsedSmaller,
}
impl UsageFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageFlag::UsedInUnresolvedScene => "used in unresolved scene",
            UsageFlag::CannotDiscoverSize => "cannot discover usage size",
            UsageFlag::UsedBigger => "used bigger",
            UsageFlag::UsedSmaller => "used smaller",
        }
    }

    /// Whether this flag is a size verdict (as opposed to a recording fact).
    pub fn is_size_verdict(&self) -> bool {
        matches!(self, UsageFlag::UsedBigger | UsageFlag::UsedSmaller)
    }
}
impl Display for UsageFlag {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Ordered set of [`UsageFlag`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet(BTreeSet<UsageFlag>);
impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the flag wasn't already set.
    pub fn insert(&mut self, flag: UsageFlag) -> bool {
        self.0.insert(flag)
    }

    /// Returns `true` if the flag was set.
    pub fn remove(&mut self, flag: UsageFlag) -> bool {
        self.0.remove(&flag)
    }

    pub fn contains(&self, flag: UsageFlag) -> bool {
        self.0.contains(&flag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = UsageFlag> + '_ {
        self.0.iter().copied()
    }
}
impl FromIterator<UsageFlag> for FlagSet {
    fn from_iter<T: IntoIterator<Item = UsageFlag>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
impl<const N: usize> From<[UsageFlag; N]> for FlagSet {
    fn from(flags: [UsageFlag; N]) -> Self {
        flags.into_iter().collect()
    }
}
impl Display for FlagSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut first = true;
        for flag in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{flag}")?;
            first = false;
        }
        Ok(())
    }
}
