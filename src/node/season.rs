use core::cell::OnceCell;

use alloc::vec::Vec;

use crate::{civil, error::Error, factory, node::Node, step, unit::Unit};

/// The kind of a season: summer or winter.
///
/// Seasons partition the year into two half-year spans. Summer covers
/// the second and third quarters of its year; winter covers the fourth
/// quarter of its year and the first quarter of the following year.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum SeasonKind {
    /// April through September: quarters 2 and 3.
    Summer,
    /// October through March of the next year: quarter 4, then
    /// quarter 1 of the following year.
    Winter,
}

impl SeasonKind {
    fn label(self) -> &'static str {
        match self {
            SeasonKind::Summer => "S",
            SeasonKind::Winter => "W",
        }
    }
}

/// A season: a half-year span of two quarters.
///
/// The winter season straddles a year boundary, so a winter's second
/// quarter belongs to the year after the season's nominal year.
/// Consequently the winter of the last supported year cannot be
/// constructed.
///
/// # Example
///
/// ```
/// use gridtime::{node::{Season, SeasonKind}, Unit};
///
/// let s = Season::new(2024, SeasonKind::Winter)?;
/// assert_eq!(s.count(Unit::Quarter)?, 2);
/// assert_eq!(s.count(Unit::Month)?, 6);
/// # Ok::<(), gridtime::Error>(())
/// ```
#[derive(Clone)]
pub struct Season {
    year: i16,
    kind: SeasonKind,
    children: OnceCell<Vec<Node>>,
}

impl Season {
    /// Creates the season of the given kind anchored at the given year.
    ///
    /// # Errors
    ///
    /// This returns an error when the year is out of range, including
    /// when a winter season would extend past the supported maximum
    /// year.
    pub fn new(year: i16, kind: SeasonKind) -> Result<Season, Error> {
        // Winter reaches into year+1, so its anchor stops one short.
        let max = match kind {
            SeasonKind::Summer => civil::MAX_YEAR,
            SeasonKind::Winter => civil::MAX_YEAR - 1,
        };
        if !(civil::MIN_YEAR..=max).contains(&year) {
            return Err(Error::range("year", year, civil::MIN_YEAR, max));
        }
        Ok(Season { year, kind, children: OnceCell::new() })
    }

    /// Returns the nominal year this season is anchored at.
    pub fn year(&self) -> i16 {
        self.year
    }

    /// Returns whether this is a summer or a winter season.
    pub fn kind(&self) -> SeasonKind {
        self.kind
    }

    /// Returns this node's unit, [`Unit::Season`].
    pub fn unit(&self) -> Unit {
        Unit::Season
    }

    /// Returns this season's two quarters in order, building them on
    /// first access.
    pub fn children(&self) -> &[Node] {
        self.children.get_or_init(|| {
            factory::season_quarters(self.year, self.kind)
                .expect("season parameters were validated at construction")
                .into_iter()
                .map(Node::Quarter)
                .collect()
        })
    }

    /// Counts the nodes of the given unit beneath (and including) this
    /// season.
    ///
    /// # Errors
    ///
    /// This returns an error when the unit does not occur in a season's
    /// subtree.
    pub fn count(&self, unit: Unit) -> Result<usize, Error> {
        crate::node::count_beneath(Unit::Season, unit, || self.children())
    }

    /// Returns the season reached by moving `steps` seasons forward
    /// (positive) or backward (negative). Seasons alternate: the
    /// summer of a year is followed by the winter of the same year,
    /// which is followed by the summer of the next year.
    ///
    /// # Errors
    ///
    /// This returns an error when the resulting year falls outside the
    /// supported range.
    pub fn shift(&self, steps: i64) -> Result<Season, Error> {
        step::shift_season(self, steps)
    }

    /// Returns the following season. Equivalent to `shift(1)`.
    pub fn next(&self) -> Result<Season, Error> {
        self.shift(1)
    }

    /// Returns the preceding season. Equivalent to `shift(-1)`.
    pub fn prev(&self) -> Result<Season, Error> {
        self.shift(-1)
    }
}

impl Eq for Season {}

impl PartialEq for Season {
    fn eq(&self, other: &Season) -> bool {
        (self.year, self.kind) == (other.year, other.kind)
    }
}

impl core::hash::Hash for Season {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        (self.year, self.kind).hash(state);
    }
}

impl Ord for Season {
    fn cmp(&self, other: &Season) -> core::cmp::Ordering {
        (self.year, self.kind).cmp(&(other.year, other.kind))
    }
}

impl PartialOrd for Season {
    fn partial_cmp(&self, other: &Season) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl core::fmt::Display for Season {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{:04}-{}", self.year, self.kind.label())
    }
}

impl core::fmt::Debug for Season {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Season({:04}-{})", self.year, self.kind.label())
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Season {
    fn arbitrary(g: &mut quickcheck::Gen) -> Season {
        use quickcheck::Arbitrary;

        let date = crate::civil::Date::arbitrary(g);
        let kind = *g
            .choose(&[SeasonKind::Summer, SeasonKind::Winter])
            .unwrap();
        Season::new(date.year(), kind).unwrap()
    }
}
