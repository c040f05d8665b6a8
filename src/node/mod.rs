/*!
Concrete calendar nodes and the traversal protocol over them.

Every node kind is its own type with a typed constructor and typed
navigation, and the [`Node`] enum closes them over for uniform
traversal: counting, collecting and walking descendants of a chosen
[`Unit`](crate::Unit), membership tests and tree rendering.
*/

use alloc::{string::String, vec::Vec};

use crate::{error::Error, unit::Unit};

pub use self::{
    day::Day, decade::Decade, hour::Hour, month::Month, quarter::Quarter,
    quarter_hour::QuarterHour, season::Season, season::SeasonKind, week::Week,
    year::Year,
};

mod day;
mod decade;
mod hour;
mod month;
mod quarter;
mod quarter_hour;
mod season;
mod week;
mod year;

/// Any calendar node.
///
/// This is the uniform currency of traversal: children are always
/// `Node` values, and the walking operations accept and yield `Node`.
/// Code that knows which kind it has should use the concrete types
/// directly.
#[derive(Clone, Eq, Hash, PartialEq)]
pub enum Node {
    /// A quarter-hour, the leaf of every subtree.
    QuarterHour(QuarterHour),
    /// A clock hour, possibly one of a duplicated pair.
    Hour(Hour),
    /// A calendar day.
    Day(Day),
    /// A ten-day (or remainder) subdivision of a month.
    Decade(Decade),
    /// A calendar month.
    Month(Month),
    /// A calendar quarter.
    Quarter(Quarter),
    /// A half-year season of two quarters.
    Season(Season),
    /// A calendar year.
    Year(Year),
    /// An ISO 8601 week.
    Week(Week),
}

impl Node {
    /// Returns the unit of this node.
    pub fn unit(&self) -> Unit {
        match *self {
            Node::QuarterHour(_) => Unit::QuarterHour,
            Node::Hour(_) => Unit::Hour,
            Node::Day(_) => Unit::Day,
            Node::Decade(_) => Unit::Decade,
            Node::Month(_) => Unit::Month,
            Node::Quarter(_) => Unit::Quarter,
            Node::Season(_) => Unit::Season,
            Node::Year(_) => Unit::Year,
            Node::Week(_) => Unit::Week,
        }
    }

    /// Returns the unit of this node's children, if it has any.
    pub fn children_unit(&self) -> Option<Unit> {
        self.unit().children()
    }

    /// Returns this node's children in chronological order, building
    /// them on first access. Quarter-hours have none.
    pub fn children(&self) -> &[Node] {
        match *self {
            Node::QuarterHour(_) => &[],
            Node::Hour(ref n) => n.children(),
            Node::Day(ref n) => n.children(),
            Node::Decade(ref n) => n.children(),
            Node::Month(ref n) => n.children(),
            Node::Quarter(ref n) => n.children(),
            Node::Season(ref n) => n.children(),
            Node::Year(ref n) => n.children(),
            Node::Week(ref n) => n.children(),
        }
    }

    /// Counts the nodes of the given unit beneath (and including) this
    /// node. Counting a node's own unit yields 1.
    ///
    /// # Errors
    ///
    /// This returns an error when the unit does not occur in this
    /// node's subtree.
    ///
    /// # Example
    ///
    /// ```
    /// use gridtime::{node::{Node, Year}, Unit};
    ///
    /// let year = Node::Year(Year::new(2025)?);
    /// assert_eq!(year.count(Unit::Hour)?, 8760);
    /// # Ok::<(), gridtime::Error>(())
    /// ```
    pub fn count(&self, unit: Unit) -> Result<usize, Error> {
        count_beneath(self.unit(), unit, || self.children())
    }

    /// Returns an iterator over the descendants of the given unit, in
    /// chronological order. Walking a node's own unit yields just the
    /// node itself.
    ///
    /// # Errors
    ///
    /// This returns an error when the unit does not occur in this
    /// node's subtree.
    pub fn walk(&self, unit: Unit) -> Result<Walk<'_>, Error> {
        if unit == self.unit() {
            return Ok(Walk { target: unit, root: Some(self), stack: Vec::new() });
        }
        if !self.unit().reachable(unit) {
            return Err(Error::unreachable_unit(self.unit(), unit));
        }
        let mut stack = Vec::new();
        stack.push(self.children().iter());
        Ok(Walk { target: unit, root: None, stack })
    }

    /// Collects the descendants of the given unit into a vector, in
    /// chronological order.
    ///
    /// # Errors
    ///
    /// This returns an error when the unit does not occur in this
    /// node's subtree.
    pub fn get(&self, unit: Unit) -> Result<Vec<&Node>, Error> {
        Ok(self.walk(unit)?.collect())
    }

    /// Returns whether the given node occurs in this node's subtree.
    /// A node contains itself. Nodes whose unit is unreachable from
    /// this one are never contained.
    pub fn contains(&self, other: &Node) -> bool {
        match self.walk(other.unit()) {
            Ok(mut walk) => walk.any(|node| node == other),
            Err(_) => false,
        }
    }

    /// Renders this node's subtree as an indented tree, one node per
    /// line. When `stop` is given, nodes of that unit are rendered but
    /// not descended into.
    ///
    /// # Example
    ///
    /// ```
    /// use gridtime::{node::{Node, Quarter}, Unit};
    ///
    /// let q = Node::Quarter(Quarter::new(2025, 1)?);
    /// assert_eq!(q.render(Some(Unit::Month)), "\
    /// └── 2025-Q1
    ///     ├── 2025-01
    ///     ├── 2025-02
    ///     └── 2025-03");
    /// # Ok::<(), gridtime::Error>(())
    /// ```
    pub fn render(&self, stop: Option<Unit>) -> String {
        let mut out = String::new();
        self.render_into("", true, stop, &mut out);
        out
    }

    fn render_into(
        &self,
        prefix: &str,
        last: bool,
        stop: Option<Unit>,
        out: &mut String,
    ) {
        use core::fmt::Write;

        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(prefix);
        out.push_str(if last { "└── " } else { "├── " });
        write!(out, "{}", self).expect("writing to a String cannot fail");
        if stop == Some(self.unit()) {
            return;
        }
        let children = self.children();
        let child_prefix = alloc::format!(
            "{}{}",
            prefix,
            if last { "    " } else { "│   " },
        );
        for (i, child) in children.iter().enumerate() {
            child.render_into(
                &child_prefix,
                i + 1 == children.len(),
                stop,
                out,
            );
        }
    }

    /// Returns the node reached by moving `steps` nodes of this unit
    /// forward (positive) or backward (negative).
    ///
    /// # Errors
    ///
    /// This returns an error when the destination falls outside the
    /// supported range, or when this unit does not support stepping.
    pub fn shift(&self, steps: i64) -> Result<Node, Error> {
        match self.unit().step_fn() {
            Some(step) => step(self, steps),
            None => Err(Error::unsupported(self.unit())),
        }
    }

    /// Returns the following node of this unit. Equivalent to
    /// `shift(1)`.
    pub fn next(&self) -> Result<Node, Error> {
        self.shift(1)
    }

    /// Returns the preceding node of this unit. Equivalent to
    /// `shift(-1)`.
    pub fn prev(&self) -> Result<Node, Error> {
        self.shift(-1)
    }
}

impl core::fmt::Display for Node {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            Node::QuarterHour(ref n) => n.fmt(f),
            Node::Hour(ref n) => n.fmt(f),
            Node::Day(ref n) => n.fmt(f),
            Node::Decade(ref n) => n.fmt(f),
            Node::Month(ref n) => n.fmt(f),
            Node::Quarter(ref n) => n.fmt(f),
            Node::Season(ref n) => n.fmt(f),
            Node::Year(ref n) => n.fmt(f),
            Node::Week(ref n) => n.fmt(f),
        }
    }
}

impl core::fmt::Debug for Node {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            Node::QuarterHour(ref n) => n.fmt(f),
            Node::Hour(ref n) => n.fmt(f),
            Node::Day(ref n) => n.fmt(f),
            Node::Decade(ref n) => n.fmt(f),
            Node::Month(ref n) => n.fmt(f),
            Node::Quarter(ref n) => n.fmt(f),
            Node::Season(ref n) => n.fmt(f),
            Node::Year(ref n) => n.fmt(f),
            Node::Week(ref n) => n.fmt(f),
        }
    }
}

impl From<QuarterHour> for Node {
    fn from(n: QuarterHour) -> Node {
        Node::QuarterHour(n)
    }
}

impl From<Hour> for Node {
    fn from(n: Hour) -> Node {
        Node::Hour(n)
    }
}

impl From<Day> for Node {
    fn from(n: Day) -> Node {
        Node::Day(n)
    }
}

impl From<Decade> for Node {
    fn from(n: Decade) -> Node {
        Node::Decade(n)
    }
}

impl From<Month> for Node {
    fn from(n: Month) -> Node {
        Node::Month(n)
    }
}

impl From<Quarter> for Node {
    fn from(n: Quarter) -> Node {
        Node::Quarter(n)
    }
}

impl From<Season> for Node {
    fn from(n: Season) -> Node {
        Node::Season(n)
    }
}

impl From<Year> for Node {
    fn from(n: Year) -> Node {
        Node::Year(n)
    }
}

impl From<Week> for Node {
    fn from(n: Week) -> Node {
        Node::Week(n)
    }
}

/// An iterator over the descendants of one unit beneath a node.
///
/// Created by [`Node::walk`]. Matching nodes are yielded in
/// chronological order and are not descended into.
#[derive(Debug)]
pub struct Walk<'a> {
    target: Unit,
    root: Option<&'a Node>,
    stack: Vec<core::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        if let Some(root) = self.root.take() {
            return Some(root);
        }
        while let Some(iter) = self.stack.last_mut() {
            match iter.next() {
                None => {
                    self.stack.pop();
                }
                Some(node) if node.unit() == self.target => {
                    return Some(node);
                }
                Some(node) => {
                    self.stack.push(node.children().iter());
                }
            }
        }
        None
    }
}

/// Shared counting logic for a node of unit `unit`. Counting the
/// node's own unit yields 1 without materializing any children; the
/// closure is only invoked when the count has to descend.
pub(crate) fn count_beneath<'n>(
    unit: Unit,
    target: Unit,
    children: impl FnOnce() -> &'n [Node],
) -> Result<usize, Error> {
    if target == unit {
        return Ok(1);
    }
    if !unit.reachable(target) {
        return Err(Error::unreachable_unit(unit, target));
    }
    let mut total = 0;
    for child in children() {
        total += child.count(target)?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use crate::civil::{Date, DateTime};

    use super::*;

    #[test]
    fn walk_yields_chronological_hours() {
        let day = Node::Day(Day::new(Date::constant(2025, 10, 26)).unwrap());
        let hours: Vec<&Node> = day.walk(Unit::Hour).unwrap().collect();
        assert_eq!(hours.len(), 25);
        assert_eq!(hours[0].to_string(), "2025-10-26 00:00-01:00");
        assert_eq!(hours[2].to_string(), "2025-10-26 02:00-03:00 [↑1st]");
        assert_eq!(hours[3].to_string(), "2025-10-26 02:00-03:00 [↓2nd]");
        assert_eq!(hours[24].to_string(), "2025-10-26 23:00-00:00");
    }

    #[test]
    fn walk_of_own_unit_yields_self() {
        let day = Node::Day(Day::new(Date::constant(2025, 5, 12)).unwrap());
        let got: Vec<&Node> = day.walk(Unit::Day).unwrap().collect();
        assert_eq!(got, alloc::vec![&day]);
    }

    #[test]
    fn walk_unreachable_unit_errors() {
        let year = Node::Year(Year::new(2025).unwrap());
        assert!(year.walk(Unit::Week).unwrap_err().is_unreachable_unit());
    }

    #[test]
    fn count_of_own_unit_is_one() {
        // Counting a node's own unit never descends into children.
        let year = Node::Year(Year::new(9998).unwrap());
        assert_eq!(year.count(Unit::Year).unwrap(), 1);
        let day =
            Node::Day(Day::new(Date::constant(9999, 12, 30)).unwrap());
        assert_eq!(day.count(Unit::Day).unwrap(), 1);
        assert_eq!(day.count(Unit::Hour).unwrap(), 24);
    }

    #[test]
    fn get_matches_count() {
        let month = Node::Month(Month::new(2025, 3).unwrap());
        let hours = month.get(Unit::Hour).unwrap();
        assert_eq!(hours.len(), month.count(Unit::Hour).unwrap());
    }

    #[test]
    fn contains_descendant() {
        let month = Node::Month(Month::new(2025, 10).unwrap());
        let day = Node::Day(Day::new(Date::constant(2025, 10, 26)).unwrap());
        assert!(month.contains(&day));

        let second = Node::Hour(
            Hour::second(DateTime::constant(2025, 10, 26, 3, 0)).unwrap(),
        );
        assert!(month.contains(&second));

        let other = Node::Day(Day::new(Date::constant(2025, 11, 26)).unwrap());
        assert!(!month.contains(&other));
    }

    #[test]
    fn contains_self() {
        let year = Node::Year(Year::new(2025).unwrap());
        assert!(year.contains(&year));
    }

    #[test]
    fn contains_unreachable_is_false() {
        let year = Node::Year(Year::new(2025).unwrap());
        let week = Node::Week(Week::new(2025, 20).unwrap());
        assert!(!year.contains(&week));
    }

    #[test]
    fn render_stops_at_unit() {
        let q = Node::Quarter(Quarter::new(2025, 1).unwrap());
        assert_eq!(
            q.render(Some(Unit::Month)),
            "└── 2025-Q1\n\
             \x20   ├── 2025-01\n\
             \x20   ├── 2025-02\n\
             \x20   └── 2025-03",
        );
    }

    #[test]
    fn render_leaf() {
        let qh = Node::QuarterHour(
            QuarterHour::new(DateTime::constant(2025, 7, 1, 12, 30)).unwrap(),
        );
        assert_eq!(qh.render(None), "└── 2025-07-01 12:30-12:45");
    }

    quickcheck::quickcheck! {
        fn count_agrees_with_walk(month: Month) -> bool {
            let node = Node::Month(month);
            node.count(Unit::Day).unwrap()
                == node.walk(Unit::Day).unwrap().count()
        }
    }
}
