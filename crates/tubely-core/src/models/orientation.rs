use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Aspect classification of a video's primary stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Other,
}

impl Orientation {
    /// Object key prefix for videos of this orientation.
    pub fn prefix(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Other => "other",
        }
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes() {
        assert_eq!(Orientation::Landscape.prefix(), "landscape");
        assert_eq!(Orientation::Portrait.prefix(), "portrait");
        assert_eq!(Orientation::Other.prefix(), "other");
    }

    #[test]
    fn test_serializes_lowercase() {
        let json = serde_json::to_string(&Orientation::Portrait).unwrap();
        assert_eq!(json, "\"portrait\"");
    }
}
