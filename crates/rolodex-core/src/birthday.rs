//! Year-independent birthday windows.
//!
//! A window starts at `today` and extends `days` days forward, both ends
//! inclusive. Only month and day of a birthday are considered, so a window
//! opened on Dec 28 reaches into early January. A Feb 29 birthday falls on
//! Feb 28 in non-leap years.

use chrono::{Datelike, NaiveDate};

use crate::contact::Contact;

/// The anniversary of `birthday` in `year`.
fn anniversary_in(birthday: NaiveDate, year: i32) -> Option<NaiveDate> {
  NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day())
    .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
}

/// The first anniversary of `birthday` on or after `today`.
pub fn next_occurrence(birthday: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
  match anniversary_in(birthday, today.year()) {
    Some(d) if d >= today => Some(d),
    _ => anniversary_in(birthday, today.year().checked_add(1)?),
  }
}

/// Days from `today` until the next anniversary of `birthday`; 0 if it is
/// today.
pub fn days_until(birthday: NaiveDate, today: NaiveDate) -> Option<u32> {
  let next = next_occurrence(birthday, today)?;
  u32::try_from((next - today).num_days()).ok()
}

/// `[today, today + days]`, compared by month and day only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthdayWindow {
  pub today: NaiveDate,
  pub days:  u32,
}

impl BirthdayWindow {
  pub fn new(today: NaiveDate, days: u32) -> Self { Self { today, days } }

  /// Days until `birthday` if it falls in the window.
  pub fn offset_of(&self, birthday: NaiveDate) -> Option<u32> {
    days_until(birthday, self.today).filter(|d| *d <= self.days)
  }

  #[cfg(test)]
  fn contains(&self, birthday: NaiveDate) -> bool { self.offset_of(birthday).is_some() }

  /// Keep the contacts whose birthday falls in the window, soonest first.
  /// Ties keep id order.
  pub fn select(&self, contacts: impl IntoIterator<Item = Contact>) -> Vec<Contact> {
    let mut hits: Vec<(u32, Contact)> = contacts
      .into_iter()
      .filter_map(|c| self.offset_of(c.birthday).map(|d| (d, c)))
      .collect();
    hits.sort_by_key(|(d, c)| (*d, c.id));
    hits.into_iter().map(|(_, c)| c).collect()
  }
}
