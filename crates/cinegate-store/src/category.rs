//! The three browsable catalog categories.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;

/// A browsable collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Movies matching the default query.
    Movies,
    /// Series.
    Series,
    /// Movies released this year.
    Premieres,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 3] = [Self::Movies, Self::Series, Self::Premieres];

    /// Lowercase name used in commands and messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movies => "movies",
            Self::Series => "series",
            Self::Premieres => "premieres",
        }
    }

    /// Key of the durable entry mirroring this collection.
    #[must_use]
    pub const fn storage_key(self) -> &'static str {
        match self {
            Self::Movies => "moviesList",
            Self::Series => "seriesList",
            Self::Premieres => "premieresList",
        }
    }

    /// Gateway path segments serving this collection.
    #[must_use]
    pub const fn api_segments(self) -> [&'static str; 2] {
        ["api", self.as_str()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movies" => Ok(Self::Movies),
            "series" => Ok(Self::Series),
            "premieres" => Ok(Self::Premieres),
            other => bail!("unknown category: {other} (expected movies, series or premieres)"),
        }
    }
}
