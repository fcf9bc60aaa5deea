use serde::{Deserialize, Serialize};
use std::fmt;

/// How the point set of one shape relates to the point set of another.
///
/// A relation is always read from the point of view of the receiver:
/// `a.relate(b) == Relation::Contains` means *a contains b*. Swapping the
/// roles of the two shapes is expressed with [`Relation::transpose`].
///
/// The discriminants are stable and double as the on-heap ordinal stored by
/// the quantized grid predicate, so the declaration order must not change.
///
/// # Examples
///
/// ```
/// use geoshape_types::relation::Relation;
///
/// assert_eq!(Relation::Within.transpose(), Relation::Contains);
/// assert_eq!(Relation::Crosses.transpose(), Relation::Crosses);
/// assert!(Relation::Crosses.intersects());
/// assert!(!Relation::Disjoint.intersects());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Relation {
    /// The shapes share no point.
    Disjoint = 0,
    /// The shapes share at least one point; nothing more is known.
    Intersects = 1,
    /// The receiver covers every point of the other shape.
    Contains = 2,
    /// Every point of the receiver lies in the other shape.
    Within = 3,
    /// The boundaries cross: the shapes overlap without containment.
    Crosses = 4,
}

impl Relation {
    /// All relations in ordinal order.
    pub const ALL: [Relation; 5] = [
        Relation::Disjoint,
        Relation::Intersects,
        Relation::Contains,
        Relation::Within,
        Relation::Crosses,
    ];

    /// Swap the roles of the two shapes: `Contains` and `Within` trade
    /// places, every other relation is its own transpose.
    pub const fn transpose(self) -> Relation {
        match self {
            Relation::Contains => Relation::Within,
            Relation::Within => Relation::Contains,
            other => other,
        }
    }

    /// True for every relation except [`Relation::Disjoint`].
    pub const fn intersects(self) -> bool {
        !matches!(self, Relation::Disjoint)
    }

    /// Stable ordinal, used as the compact byte representation.
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Inverse of [`Relation::ordinal`].
    pub const fn from_ordinal(ordinal: u8) -> Option<Relation> {
        match ordinal {
            0 => Some(Relation::Disjoint),
            1 => Some(Relation::Intersects),
            2 => Some(Relation::Contains),
            3 => Some(Relation::Within),
            4 => Some(Relation::Crosses),
            _ => None,
        }
    }

    /// Upper-case name, matching the names used in query strings.
    pub const fn name(self) -> &'static str {
        match self {
            Relation::Disjoint => "DISJOINT",
            Relation::Intersects => "INTERSECTS",
            Relation::Contains => "CONTAINS",
            Relation::Within => "WITHIN",
            Relation::Crosses => "CROSSES",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transpose_is_an_involution() {
        for rel in Relation::ALL {
            assert_eq!(rel.transpose().transpose(), rel);
        }
    }

    #[test]
    fn test_only_containment_flips() {
        assert_eq!(Relation::Contains.transpose(), Relation::Within);
        assert_eq!(Relation::Within.transpose(), Relation::Contains);
        assert_eq!(Relation::Disjoint.transpose(), Relation::Disjoint);
        assert_eq!(Relation::Intersects.transpose(), Relation::Intersects);
        assert_eq!(Relation::Crosses.transpose(), Relation::Crosses);
    }

    #[test]
    fn test_ordinal_roundtrip() {
        for rel in Relation::ALL {
            assert_eq!(Relation::from_ordinal(rel.ordinal()), Some(rel));
        }
        assert_eq!(Relation::from_ordinal(5), None);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Relation::Crosses).unwrap();
        assert_eq!(json, "\"crosses\"");
        let back: Relation = serde_json::from_str("\"within\"").unwrap();
        assert_eq!(back, Relation::Within);
    }
}
