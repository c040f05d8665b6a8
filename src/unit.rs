use crate::{error::Error, node::Node, step};

/// The signature of a per-unit stepping function.
///
/// A stepping function returns the node of the same concrete type reached
/// by moving `steps` units of that type's own granularity.
pub(crate) type StepFn = fn(&Node, i64) -> Result<Node, Error>;

/// A granularity of the calendar tree.
///
/// Every node type in the tree corresponds to exactly one `Unit`, and the
/// registry baked into this type records, for each unit, its key, the
/// unit of its immediate children (if any) and its stepping function.
/// Traversal ([`Node::count`], [`Node::get`], [`Node::walk`]) is driven
/// entirely by this table.
///
/// `Unit` has an ordering defined such that coarser units compare
/// greater than finer units:
///
/// ```
/// use gridtime::Unit;
///
/// assert!(Unit::Year > Unit::QuarterHour);
/// assert!(Unit::Day > Unit::Hour);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Unit {
    /// A quarter of an hour. Key: `quarters15`.
    QuarterHour = 0,
    /// An hour, anchored on its end. Key: `hours`.
    Hour = 1,
    /// A calendar day. Key: `days`.
    Day = 2,
    /// An ISO 8601 week. Key: `weeks`.
    Week = 3,
    /// A month-decade, a ten-day (or remainder) subdivision of a month.
    /// Key: `decades10`.
    Decade = 4,
    /// A calendar month. Key: `months`.
    Month = 5,
    /// A quarter of a year. Key: `quarters`.
    Quarter = 6,
    /// A summer or winter season, spanning two quarters. Key: `seasons`.
    Season = 7,
    /// A calendar year. Key: `years`.
    Year = 8,
}

/// The registry metadata for one unit.
struct UnitMeta {
    label: &'static str,
    children: Option<Unit>,
    step: Option<StepFn>,
}

/// The unit registry. Built once at compile time and never mutated, so
/// registry reads need no synchronization. Indexed by `Unit`
/// discriminant.
static REGISTRY: [UnitMeta; 9] = [
    UnitMeta {
        label: "quarters15",
        children: None,
        step: Some(step::quarter_hour),
    },
    UnitMeta {
        label: "hours",
        children: Some(Unit::QuarterHour),
        step: Some(step::hour),
    },
    UnitMeta { label: "days", children: Some(Unit::Hour), step: Some(step::day) },
    UnitMeta {
        label: "weeks",
        children: Some(Unit::Day),
        step: Some(step::week),
    },
    UnitMeta {
        label: "decades10",
        children: Some(Unit::Day),
        step: Some(step::decade),
    },
    UnitMeta {
        label: "months",
        children: Some(Unit::Day),
        step: Some(step::month),
    },
    UnitMeta {
        label: "quarters",
        children: Some(Unit::Month),
        step: Some(step::quarter),
    },
    UnitMeta {
        label: "seasons",
        children: Some(Unit::Quarter),
        step: Some(step::season),
    },
    UnitMeta {
        label: "years",
        children: Some(Unit::Quarter),
        step: Some(step::year),
    },
];

impl Unit {
    /// All registered units, finest granularity first.
    pub const ALL: &'static [Unit] = &[
        Unit::QuarterHour,
        Unit::Hour,
        Unit::Day,
        Unit::Week,
        Unit::Decade,
        Unit::Month,
        Unit::Quarter,
        Unit::Season,
        Unit::Year,
    ];

    fn meta(self) -> &'static UnitMeta {
        &REGISTRY[self as usize]
    }

    /// Returns this unit's registry key, e.g. `"hours"`.
    ///
    /// The keys are the ones accepted by the `FromStr` impl.
    pub fn label(self) -> &'static str {
        self.meta().label
    }

    /// Returns the unit of this unit's immediate children, or `None` for
    /// the leaf unit.
    ///
    /// # Example
    ///
    /// ```
    /// use gridtime::Unit;
    ///
    /// assert_eq!(Unit::Year.children(), Some(Unit::Quarter));
    /// assert_eq!(Unit::QuarterHour.children(), None);
    /// ```
    pub fn children(self) -> Option<Unit> {
        self.meta().children
    }

    /// Returns true if and only if `target` can appear somewhere in the
    /// subtree composed by a node of this unit (including this unit
    /// itself).
    ///
    /// # Example
    ///
    /// ```
    /// use gridtime::Unit;
    ///
    /// assert!(Unit::Year.reachable(Unit::Hour));
    /// // A quarter is not beneath a day.
    /// assert!(!Unit::Day.reachable(Unit::Quarter));
    /// // Decades subdivide months as a parallel unit; no subtree
    /// // contains them except their own.
    /// assert!(!Unit::Month.reachable(Unit::Decade));
    /// ```
    pub fn reachable(self, target: Unit) -> bool {
        let mut current = self;
        loop {
            if current == target {
                return true;
            }
            match current.children() {
                Some(child) => current = child,
                None => return false,
            }
        }
    }

    /// Returns this unit's stepping function, if one is registered.
    pub(crate) fn step_fn(self) -> Option<StepFn> {
        self.meta().step
    }
}

impl core::fmt::Display for Unit {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl core::str::FromStr for Unit {
    type Err = Error;

    /// Parses a registry key like `"hours"` or `"decades10"`.
    ///
    /// # Errors
    ///
    /// Returns an error enumerating the valid keys when the given string
    /// is not one of them.
    fn from_str(s: &str) -> Result<Unit, Error> {
        Unit::ALL
            .iter()
            .copied()
            .find(|unit| unit.label() == s)
            .ok_or_else(|| Error::unknown_unit(s))
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Unit {
    fn arbitrary(g: &mut quickcheck::Gen) -> Unit {
        *g.choose(Unit::ALL).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use core::str::FromStr;

    use super::*;

    #[test]
    fn labels_roundtrip() {
        for &unit in Unit::ALL {
            assert_eq!(Unit::from_str(unit.label()).unwrap(), unit);
        }
        assert!(Unit::from_str("fortnights").unwrap_err().is_unknown_unit());
    }

    #[test]
    fn composition_chains() {
        // years -> quarters -> months -> days -> hours -> quarters15
        let mut unit = Unit::Year;
        let mut chain = alloc::vec![unit];
        while let Some(child) = unit.children() {
            chain.push(child);
            unit = child;
        }
        assert_eq!(
            chain,
            [
                Unit::Year,
                Unit::Quarter,
                Unit::Month,
                Unit::Day,
                Unit::Hour,
                Unit::QuarterHour,
            ],
        );
        assert_eq!(Unit::Week.children(), Some(Unit::Day));
        assert_eq!(Unit::Decade.children(), Some(Unit::Day));
        assert_eq!(Unit::Season.children(), Some(Unit::Quarter));
    }

    #[test]
    fn reachability() {
        assert!(Unit::Year.reachable(Unit::Year));
        assert!(Unit::Year.reachable(Unit::QuarterHour));
        assert!(Unit::Week.reachable(Unit::Hour));
        assert!(Unit::Season.reachable(Unit::Day));
        assert!(!Unit::Day.reachable(Unit::Quarter));
        assert!(!Unit::Year.reachable(Unit::Week));
        assert!(!Unit::Year.reachable(Unit::Decade));
        assert!(!Unit::QuarterHour.reachable(Unit::Hour));
    }

    #[test]
    fn every_unit_steps() {
        for &unit in Unit::ALL {
            assert!(unit.step_fn().is_some(), "no step for {unit}");
        }
    }
}
