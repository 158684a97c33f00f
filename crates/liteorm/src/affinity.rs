//! Column affinity inference and literal compatibility.
//!
//! SQLite decides how a column stores values from the text of its declared
//! type. [`Affinity::from_declared_type`] reproduces that decision with a fixed
//! priority order, and [`Affinity::accepts`] checks whether a literal can be
//! written unquoted into a column of that affinity.

use crate::error::{OrmError, OrmResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const INT_MARKER: &str = "INT";
const BLOB_MARKER: &str = "BLOB";
const NULL_MARKER: &str = "NULL";

// Scanned pairwise: index i of both lists is tried before index i + 1.
const TEXT_MARKERS: [&str; 3] = ["CHAR", "CLOB", "TEXT"];
const REAL_MARKERS: [&str; 3] = ["REAL", "FLOA", "DOUB"];

/// Storage affinity of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Affinity {
    Integer,
    Text,
    Blob,
    Real,
    Numeric,
    /// Only produced for declared types mentioning the `NULL` keyword.
    Null,
}

impl Affinity {
    /// Resolve the affinity of a declared column type.
    ///
    /// Matching is case-insensitive and follows this order:
    ///
    /// 1. contains `NULL` => [`Affinity::Null`]
    /// 2. contains `INT` => [`Affinity::Integer`]
    /// 3. contains `BLOB`, or the type is empty => [`Affinity::Blob`]
    /// 4. `CHAR`/`REAL`, `CLOB`/`FLOA`, `TEXT`/`DOUB` pairwise => [`Affinity::Text`] or
    ///    [`Affinity::Real`]
    /// 5. anything else => [`Affinity::Numeric`]
    ///
    /// The order matters: `POINT` resolves to INTEGER, not REAL, because the
    /// integer marker is tested first.
    pub fn from_declared_type(declared: &str) -> Self {
        let declared = declared.to_ascii_uppercase();

        if declared.contains(NULL_MARKER) {
            return Affinity::Null;
        }
        if declared.contains(INT_MARKER) {
            return Affinity::Integer;
        }
        if declared.contains(BLOB_MARKER) || declared.is_empty() {
            return Affinity::Blob;
        }

        for (text, real) in TEXT_MARKERS.iter().zip(REAL_MARKERS.iter()) {
            if declared.contains(text) {
                return Affinity::Text;
            }
            if declared.contains(real) {
                return Affinity::Real;
            }
        }

        Affinity::Numeric
    }

    /// Check whether `literal` is lexically compatible with this affinity.
    ///
    /// TEXT and BLOB take anything. INTEGER needs ASCII digits only; REAL and
    /// NUMERIC also allow `,` and `.` as decimal separators. The NULL affinity
    /// only takes the keyword itself. An empty literal never satisfies a
    /// checked affinity.
    pub fn accepts(self, literal: &str) -> bool {
        match self {
            Affinity::Integer => is_valid_int(literal),
            Affinity::Real | Affinity::Numeric => is_valid_real(literal),
            Affinity::Null => literal == NULL_MARKER,
            Affinity::Text | Affinity::Blob => true,
        }
    }

    /// Whether literals of this affinity are written inside single quotes.
    pub fn is_quoted(self) -> bool {
        matches!(self, Affinity::Text | Affinity::Blob)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Affinity::Integer => "INTEGER",
            Affinity::Text => "TEXT",
            Affinity::Blob => "BLOB",
            Affinity::Real => "REAL",
            Affinity::Numeric => "NUMERIC",
            Affinity::Null => "NULL",
        }
    }
}

impl fmt::Display for Affinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Affinity {
    type Err = OrmError;

    fn from_str(s: &str) -> OrmResult<Self> {
        match s.to_ascii_uppercase().as_str() {
            "INTEGER" => Ok(Affinity::Integer),
            "TEXT" => Ok(Affinity::Text),
            "BLOB" => Ok(Affinity::Blob),
            "REAL" => Ok(Affinity::Real),
            "NUMERIC" => Ok(Affinity::Numeric),
            "NULL" => Ok(Affinity::Null),
            other => Err(OrmError::validation(format!("unknown affinity: {other}"))),
        }
    }
}

fn is_valid_int(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_valid_real(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_digit() || b == b'.' || b == b',')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_affinity_is_case_insensitive() {
        assert_eq!(Affinity::from_declared_type("int"), Affinity::Integer);
        assert_eq!(Affinity::from_declared_type("INT"), Affinity::Integer);
        assert_eq!(Affinity::from_declared_type("medint"), Affinity::Integer);
        assert_eq!(Affinity::from_declared_type("InTeGer"), Affinity::Integer);
        assert_eq!(Affinity::from_declared_type("LONG INT"), Affinity::Integer);
    }

    #[test]
    fn test_integer_marker_wins_over_real_markers() {
        // "POINT" contains INT; "FLOATINT" contains both.
        assert_eq!(Affinity::from_declared_type("POINT"), Affinity::Integer);
        assert_eq!(Affinity::from_declared_type("FLOATINT"), Affinity::Integer);
    }

    #[test]
    fn test_empty_type_is_blob() {
        assert_eq!(Affinity::from_declared_type(""), Affinity::Blob);
        assert_eq!(Affinity::from_declared_type("blob"), Affinity::Blob);
        assert_eq!(Affinity::from_declared_type("BlOB"), Affinity::Blob);
    }

    #[test]
    fn test_text_and_real_markers() {
        assert_eq!(Affinity::from_declared_type("char(50)"), Affinity::Text);
        assert_eq!(Affinity::from_declared_type("CHAR (90)"), Affinity::Text);
        assert_eq!(Affinity::from_declared_type("ChAr (100)"), Affinity::Text);
        assert_eq!(Affinity::from_declared_type("Text"), Affinity::Text);
        assert_eq!(Affinity::from_declared_type("double"), Affinity::Real);
        assert_eq!(Affinity::from_declared_type("LONG DOUBLE"), Affinity::Real);
        assert_eq!(Affinity::from_declared_type("ReaL"), Affinity::Real);
        assert_eq!(Affinity::from_declared_type("float"), Affinity::Real);
    }

    #[test]
    fn test_null_keyword_takes_priority() {
        assert_eq!(Affinity::from_declared_type("INT NULL"), Affinity::Null);
        assert_eq!(Affinity::from_declared_type("not null"), Affinity::Null);
    }

    #[test]
    fn test_fallback_is_numeric() {
        assert_eq!(Affinity::from_declared_type("DECIMAL(10,5)"), Affinity::Numeric);
        assert_eq!(Affinity::from_declared_type("BOOLEAN"), Affinity::Numeric);
        assert_eq!(Affinity::from_declared_type("DATETIME"), Affinity::Numeric);
    }

    #[test]
    fn test_no_false_matches() {
        assert_ne!(Affinity::from_declared_type("REAL"), Affinity::Integer);
        assert_ne!(Affinity::from_declared_type("REAL"), Affinity::Text);
        assert_ne!(Affinity::from_declared_type("LONG INT"), Affinity::Real);
        assert_ne!(Affinity::from_declared_type("Text"), Affinity::Blob);
    }

    #[test]
    fn test_integer_values() {
        assert!(Affinity::Integer.accepts("3386"));
        assert!(!Affinity::Integer.accepts("33,86"));
        assert!(!Affinity::Integer.accepts("33a86"));
        assert!(!Affinity::Integer.accepts("33+86"));
        assert!(!Affinity::Integer.accepts("-3"));
        assert!(!Affinity::Integer.accepts(""));
    }

    #[test]
    fn test_real_values() {
        assert!(Affinity::Real.accepts("33,86"));
        assert!(Affinity::Real.accepts("33.86"));
        assert!(Affinity::Real.accepts("3386"));
        assert!(!Affinity::Real.accepts("33a86"));
        assert!(!Affinity::Real.accepts("33/86"));
        assert!(!Affinity::Real.accepts(""));
    }

    #[test]
    fn test_numeric_accepts_what_real_accepts() {
        for literal in ["3386", "33,86", "33.86", "", "abc", "1e5"] {
            assert_eq!(
                Affinity::Numeric.accepts(literal),
                Affinity::Real.accepts(literal),
                "literal {literal:?}"
            );
        }
    }

    #[test]
    fn test_null_and_unchecked_affinities() {
        assert!(Affinity::Null.accepts("NULL"));
        assert!(!Affinity::Null.accepts("null"));
        assert!(!Affinity::Null.accepts(""));
        assert!(Affinity::Text.accepts(""));
        assert!(Affinity::Text.accepts("anything at all"));
        assert!(Affinity::Blob.accepts("x'00'"));
    }

    #[test]
    fn test_parse_and_display_round_trip() {
        for affinity in [
            Affinity::Integer,
            Affinity::Text,
            Affinity::Blob,
            Affinity::Real,
            Affinity::Numeric,
            Affinity::Null,
        ] {
            assert_eq!(affinity.to_string().parse::<Affinity>().ok(), Some(affinity));
        }
        assert!("integer".parse::<Affinity>().is_ok());
        assert!("VARCHAR".parse::<Affinity>().is_err());
    }
}
