use serde::{Deserialize, Serialize};
use std::fmt;

/// Record fields that must pass a normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Datetime,
    Process,
    Flow,
    Family,
    Dimension,
    Element,
}

impl Field {
    /// Column name in the record table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Datetime => "datetime",
            Field::Process => "process",
            Field::Flow => "flow",
            Field::Family => "family",
            Field::Dimension => "dimension",
            Field::Element => "element",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
