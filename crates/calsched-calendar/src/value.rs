use std::fmt;

use crate::error::{CalendarError, Result};

/// Storage of a [`Value`]. Promotion only goes forward:
/// `Empty -> Single -> Set`.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Empty,
    Single(u32),
    /// One flag per value in `min..=max`.
    Set(Vec<bool>),
}

/// One field of a calendar event: nothing (any value), a single value,
/// or a set of values inside `[min, max]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    min: u32,
    max: u32,
    slot: Slot,
}

/// Contiguous run of values, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: u32,
    pub end: u32,
}

impl Range {
    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }
}

/// An item read from a comma-separated list: `n` or `a..b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Item {
    Single(u32),
    Range(u32, u32),
}

impl Value {
    /// Empty value over the domain `[min, max]`.
    pub fn new(min: u32, max: u32) -> Self {
        Self {
            min,
            max,
            slot: Slot::Empty,
        }
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// False when the value is a wildcard.
    pub fn has_value(&self) -> bool {
        !matches!(self.slot, Slot::Empty)
    }

    pub fn has_single_value(&self) -> bool {
        matches!(self.slot, Slot::Single(_))
    }

    pub fn has_range(&self) -> bool {
        matches!(self.slot, Slot::Set(_))
    }

    pub fn single_value(&self) -> Option<u32> {
        match self.slot {
            Slot::Single(value) => Some(value),
            _ => None,
        }
    }

    pub fn add_value(&mut self, value: u32) -> Result<()> {
        self.check(value)?;
        let len = (self.max - self.min + 1) as usize;
        match self.slot {
            Slot::Empty => self.slot = Slot::Single(value),
            Slot::Single(existing) => {
                let mut set = vec![false; len];
                set[(existing - self.min) as usize] = true;
                set[(value - self.min) as usize] = true;
                self.slot = Slot::Set(set);
            }
            Slot::Set(ref mut set) => set[(value - self.min) as usize] = true,
        }
        Ok(())
    }

    /// Add every value of `start..=end`. A reversed range adds nothing.
    pub fn add_range(&mut self, start: u32, end: u32) -> Result<()> {
        if start > end {
            return Ok(());
        }
        self.check(start)?;
        self.check(end)?;
        for value in start..=end {
            self.add_value(value)?;
        }
        Ok(())
    }

    /// Like [`add_value`](Self::add_value) for values known to be valid.
    ///
    /// # Panics
    ///
    /// Panics when `value` is outside of the domain.
    pub fn must_add_value(&mut self, value: u32) {
        if let Err(e) = self.add_value(value) {
            panic!("{e}");
        }
    }

    /// # Panics
    ///
    /// Panics when either end is outside of the domain.
    pub fn must_add_range(&mut self, start: u32, end: u32) {
        if let Err(e) = self.add_range(start, end) {
            panic!("{e}");
        }
    }

    /// Read a comma separated list of numbers and `a..b` ranges.
    /// `""` and `"*"` leave the value untouched.
    pub fn parse(&mut self, input: &str) -> Result<()> {
        for item in parse_items(input)? {
            self.add_item(item, false)?;
        }
        Ok(())
    }

    /// Add a parsed item; with `wrap`, a reversed range goes through `max`
    /// and restarts at `min`.
    pub(crate) fn add_item(&mut self, item: Item, wrap: bool) -> Result<()> {
        match item {
            Item::Single(value) => self.add_value(value),
            Item::Range(start, end) if wrap && start > end => {
                self.add_range(start, self.max)?;
                self.add_range(self.min, end)
            }
            Item::Range(start, end) => self.add_range(start, end),
        }
    }

    /// Whether `value` belongs to the set (or is the single value).
    pub fn contains(&self, value: u32) -> bool {
        match &self.slot {
            Slot::Empty => false,
            Slot::Single(v) => *v == value,
            Slot::Set(set) => value
                .checked_sub(self.min)
                .and_then(|i| set.get(i as usize).copied())
                .unwrap_or(false),
        }
    }

    /// True when `value` is accepted: a wildcard accepts everything.
    pub fn matches(&self, value: u32) -> bool {
        !self.has_value() || self.contains(value)
    }

    /// Values in ascending order; empty for a wildcard.
    pub fn range_values(&self) -> Vec<u32> {
        match &self.slot {
            Slot::Empty => Vec::new(),
            Slot::Single(v) => vec![*v],
            Slot::Set(set) => set
                .iter()
                .enumerate()
                .filter(|(_, on)| **on)
                .map(|(i, _)| self.min + i as u32)
                .collect(),
        }
    }

    /// Values grouped into maximal contiguous runs.
    pub fn ranges(&self) -> Vec<Range> {
        let mut ranges: Vec<Range> = Vec::new();
        for value in self.range_values() {
            match ranges.last_mut() {
                Some(last) if last.end + 1 == value => last.end = value,
                _ => ranges.push(Range {
                    start: value,
                    end: value,
                }),
            }
        }
        ranges
    }

    /// At least two adjacent values are set.
    pub fn has_contiguous_range(&self) -> bool {
        self.ranges().iter().any(|r| r.len() >= 2)
    }

    /// At least three adjacent values are set.
    pub fn has_long_contiguous_range(&self) -> bool {
        self.ranges().iter().any(|r| r.len() >= 3)
    }

    /// Write the values with `label` (runs as `a..b` when a run of three
    /// exists, a plain comma list otherwise). Used for both numbers and
    /// weekday names.
    pub(crate) fn write_with<F>(&self, f: &mut fmt::Formatter<'_>, label: F) -> fmt::Result
    where
        F: Fn(u32) -> String,
    {
        if !self.has_value() {
            return f.write_str("*");
        }
        let parts: Vec<String> = if self.has_long_contiguous_range() {
            self.ranges()
                .iter()
                .map(|r| {
                    if r.is_single() {
                        label(r.start)
                    } else {
                        format!("{}..{}", label(r.start), label(r.end))
                    }
                })
                .collect()
        } else {
            self.range_values().into_iter().map(label).collect()
        };
        f.write_str(&parts.join(","))
    }

    fn check(&self, value: u32) -> Result<()> {
        if value < self.min || value > self.max {
            return Err(CalendarError::OutOfRange {
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_with(f, |v| format!("{v:02}"))
    }
}

/// Split a list into items, skipping empty entries and wildcards.
pub(crate) fn parse_items(input: &str) -> Result<Vec<Item>> {
    let mut items = Vec::new();
    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() || part == "*" {
            continue;
        }
        let item = match part.split_once("..") {
            Some((start, end)) => Item::Range(parse_number(start)?, parse_number(end)?),
            None => Item::Single(parse_number(part)?),
        };
        items.push(item);
    }
    Ok(items)
}

fn parse_number(token: &str) -> Result<u32> {
    token
        .trim()
        .parse::<u32>()
        .map_err(|e| CalendarError::InvalidToken {
            token: token.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of(min: u32, max: u32, input: &str) -> Value {
        let mut value = Value::new(min, max);
        value.parse(input).unwrap();
        value
    }

    // -----------------------------------------------------------------------
    // promotion
    // -----------------------------------------------------------------------

    #[test]
    fn new_value_is_empty() {
        let value = Value::new(0, 59);
        assert!(!value.has_value());
        assert!(!value.has_single_value());
        assert!(!value.has_range());
        assert_eq!(value.to_string(), "*");
        assert!(value.range_values().is_empty());
    }

    #[test]
    fn single_then_range() {
        let mut value = Value::new(0, 59);
        value.add_value(5).unwrap();
        assert!(value.has_single_value());
        assert_eq!(value.single_value(), Some(5));
        assert_eq!(value.to_string(), "05");

        value.add_value(10).unwrap();
        assert!(value.has_range());
        assert!(!value.has_single_value());
        assert_eq!(value.single_value(), None);
        assert_eq!(value.range_values(), vec![5, 10]);
    }

    #[test]
    fn same_value_twice_still_promotes() {
        let mut value = Value::new(1, 7);
        value.add_value(3).unwrap();
        value.add_value(3).unwrap();
        assert!(value.has_range());
        assert_eq!(value.range_values(), vec![3]);
    }

    #[test]
    fn out_of_domain_is_rejected_without_change() {
        let mut value = Value::new(1, 12);
        let err = value.add_value(13).unwrap_err();
        assert_eq!(
            err,
            CalendarError::OutOfRange {
                value: 13,
                min: 1,
                max: 12
            }
        );
        assert!(value.add_value(0).is_err());
        assert!(!value.has_value());

        value.add_value(4).unwrap();
        assert!(value.add_range(10, 13).is_err());
        assert_eq!(value.range_values(), vec![4]);
    }

    #[test]
    fn reversed_range_is_a_no_op() {
        let mut value = Value::new(0, 23);
        value.add_range(12, 11).unwrap();
        assert!(!value.has_value());
    }

    #[test]
    #[should_panic(expected = "Value outside of range")]
    fn must_add_value_panics() {
        Value::new(0, 59).must_add_value(60);
    }

    #[test]
    fn contains_and_matches() {
        let value = value_of(1, 31, "1..3,10");
        assert!(value.contains(2));
        assert!(value.contains(10));
        assert!(!value.contains(4));
        assert!(!value.contains(0));
        assert!(!value.contains(99));
        assert!(Value::new(1, 31).matches(17));
        assert!(!Value::new(1, 31).contains(17));
    }

    // -----------------------------------------------------------------------
    // ranges and display
    // -----------------------------------------------------------------------

    #[test]
    fn ranges_group_adjacent_values() {
        let value = value_of(0, 59, "10,11,14,15,16,19,20");
        assert_eq!(
            value.ranges(),
            vec![
                Range { start: 10, end: 11 },
                Range { start: 14, end: 16 },
                Range { start: 19, end: 20 },
            ]
        );
        assert!(value.has_contiguous_range());
        assert!(value.has_long_contiguous_range());
    }

    #[test]
    fn display_without_long_run_lists_values() {
        let value = value_of(0, 59, "11,12,14");
        assert!(value.has_contiguous_range());
        assert!(!value.has_long_contiguous_range());
        assert_eq!(value.to_string(), "11,12,14");
    }

    #[test]
    fn display_with_long_run_uses_ranges_everywhere() {
        assert_eq!(
            value_of(0, 59, "10,11,14,15,16,19,20").to_string(),
            "10..11,14..16,19..20"
        );
        assert_eq!(value_of(0, 59, "1,2,3").to_string(), "01..03");
        assert_eq!(
            value_of(0, 59, "1..3,5..5,10..12").to_string(),
            "01..03,05,10..12"
        );
    }

    // -----------------------------------------------------------------------
    // parsing
    // -----------------------------------------------------------------------

    #[test]
    fn wildcards_and_empty_items_are_skipped() {
        assert!(!value_of(0, 59, "").has_value());
        assert!(!value_of(0, 59, "*").has_value());
        assert_eq!(value_of(0, 59, "1,,2,").range_values(), vec![1, 2]);
    }

    #[test]
    fn malformed_ranges_fail() {
        for input in ["..", "1..", "..1", "1..2..3", "x", "-1"] {
            let mut value = Value::new(0, 59);
            assert!(
                matches!(value.parse(input), Err(CalendarError::InvalidToken { .. })),
                "{input:?} should fail"
            );
        }
    }

    #[test]
    fn out_of_domain_in_list_fails() {
        let mut value = Value::new(0, 23);
        assert!(matches!(
            value.parse("1,24"),
            Err(CalendarError::OutOfRange { value: 24, .. })
        ));
    }

    #[test]
    fn wrapping_range_goes_through_max() {
        let mut value = Value::new(1, 7);
        value.add_item(Item::Range(7, 1), true).unwrap();
        assert_eq!(value.range_values(), vec![1, 7]);

        let mut value = Value::new(1, 7);
        value.add_item(Item::Range(7, 1), false).unwrap();
        assert!(!value.has_value());
    }
}
