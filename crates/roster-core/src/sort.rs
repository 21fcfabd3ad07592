//! Ordering by start date.

use std::cmp::Ordering;

use crate::{date, filter::OrderBy, person::Person};

/// Return `records` ordered per `order_by`. The input is never modified.
///
/// The sort is stable. Records with an unparseable start date go after every
/// dated record in both directions and keep their relative order.
pub fn sort(records: &[Person], order_by: OrderBy) -> Vec<Person> {
  sort_owned(records.to_vec(), order_by)
}

/// [`sort`] for a vector the caller already owns.
pub fn sort_owned(records: Vec<Person>, order_by: OrderBy) -> Vec<Person> {
  let descending = match order_by {
    OrderBy::Unordered => return records,
    OrderBy::NewestFirst => true,
    OrderBy::OldestFirst => false,
  };

  let mut keyed: Vec<_> = records
    .into_iter()
    .map(|p| (date::parse(&p.details().start_date).instant(), p))
    .collect();

  keyed.sort_by(|(a, _), (b, _)| match (a, b) {
    (Some(x), Some(y)) if descending => y.cmp(x),
    (Some(x), Some(y)) => x.cmp(y),
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => Ordering::Equal,
  });

  keyed.into_iter().map(|(_, p)| p).collect()
}
