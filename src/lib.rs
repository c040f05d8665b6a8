/*!
Gridtime models a calendar as a navigable tree of nested time units.

The units, biggest to smallest: [`Year`](node::Year),
[`Season`](node::Season), [`Quarter`](node::Quarter),
[`Month`](node::Month), [`Week`](node::Week) (ISO),
[`Decade`](node::Decade) (a ten-day subdivision of a month),
[`Day`](node::Day), [`Hour`](node::Hour) and
[`QuarterHour`](node::QuarterHour). Every unit knows its exact temporal
boundaries, its children and how to step forward or backward by its own
granularity.

The hard problem this crate solves is daylight saving time. Under the
fixed transition rule used here (last Sunday of March and October at
02:00 local wall-clock time), the spring transition deletes the local
hour `[02:00, 03:00)` from the calendar and the autumn transition makes
it occur twice. The duplicated hour produces two distinct, orderable
occurrences that compare unequal, and all traversal, counting and
stepping operations remain correct across both discontinuities.

# Example

```
use gridtime::{civil::DateTime, node::Hour, Unit};

// The duplicated hour on the night clocks fall back. The end of the
// hour is its anchor.
let first = Hour::new(DateTime::constant(2025, 10, 26, 3, 0))?;
assert!(first.is_duplicated() && !first.is_backward());

// Stepping forward lands on the second occurrence of the *same* hour.
let second = first.next()?;
assert!(second.is_backward());
assert_eq!(first.start(), second.start());
assert_ne!(first, second);

// A day has 23, 24 or 25 hours.
use gridtime::{civil::Date, node::Day};
let day = Day::new(Date::constant(2025, 10, 26))?;
assert_eq!(day.count(Unit::Hour)?, 25);
# Ok::<(), gridtime::Error>(())
```

# Crate features

* **std** (enabled by default) - Implements the `std::error::Error` trait
  for this crate's error type.
* **alloc** (enabled by default, implied by **std**) - Dynamic memory
  allocation. This crate requires it; the feature exists to mirror the
  usual `std`/`alloc` layering.
* **logging** - Emits some trace-level messages via the `log` crate,
  mostly from the DST-aware stepping loop and the child factories.
*/

#![no_std]
#![deny(rustdoc::broken_intra_doc_links)]
// We generally want all types to impl Debug.
#![warn(missing_debug_implementations)]

#[cfg(any(test, feature = "std"))]
extern crate std;

extern crate alloc;

pub use crate::{error::Error, node::Node, unit::Unit};

#[macro_use]
mod logging;

pub mod civil;
mod error;
pub mod factory;
pub mod node;
pub mod rules;
mod step;
mod unit;
