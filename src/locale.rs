//! Locale tables for the formatter.
//!
//! A [`Locale`] is a flat mapping from `%`-token to a [`Spec`]: either a
//! renderer function of the wall-clock fields or a pattern string expanded
//! recursively in terms of other tokens. Tables layer: a small owned override
//! map plus a reference to a parent table, checked in order, so extending the
//! base locale is cheap and never mutates shared state.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::fields::Fields;

/// A locale table entry.
#[derive(Clone)]
pub enum Spec {
    /// A format pattern containing further tokens, expanded recursively by
    /// the formatter. Patterns must not reference themselves, directly or
    /// transitively.
    Pattern(String),
    /// A renderer invoked with the wall-clock fields and the resolved UTC
    /// offset in minutes.
    Render(Arc<dyn Fn(&Fields, i32) -> String + Send + Sync>),
}

impl Spec {
    /// An expansion-pattern entry.
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self::Pattern(pattern.into())
    }

    /// A renderer entry.
    pub fn render<F>(render: F) -> Self
    where
        F: Fn(&Fields, i32) -> String + Send + Sync + 'static,
    {
        Self::Render(Arc::new(render))
    }
}

impl fmt::Debug for Spec {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Pattern(pattern) => formatter.debug_tuple("Pattern").field(pattern).finish(),
            Self::Render(_) => formatter.write_str("Render(..)"),
        }
    }
}

/// A layered token table. Lookups check the owned overrides first, then walk
/// the parent chain.
#[derive(Debug, Clone, Default)]
pub struct Locale {
    overrides: HashMap<String, Spec>,
    parent: Option<Arc<Locale>>,
}

impl Locale {
    /// The base (English) table. Shared; constructed once.
    pub fn base() -> Arc<Self> {
        static BASE: OnceLock<Arc<Locale>> = OnceLock::new();
        Arc::clone(BASE.get_or_init(build_base))
    }

    /// Builds a new table layering `entries` over `parent`. Tokens present in
    /// `entries` shadow the parent's; everything else falls through.
    pub fn extend<K>(parent: &Arc<Self>, entries: impl IntoIterator<Item = (K, Spec)>) -> Arc<Self>
    where
        K: Into<String>,
    {
        Arc::new(Self {
            overrides: entries
                .into_iter()
                .map(|(token, spec)| (token.into(), spec))
                .collect(),
            parent: Some(Arc::clone(parent)),
        })
    }

    /// Looks up a token, walking the parent chain.
    pub fn get(&self, token: &str) -> Option<&Spec> {
        match self.overrides.get(token) {
            Some(spec) => Some(spec),
            None => self.parent.as_deref()?.get(token),
        }
    }
}

const WEEKDAY_SHORT: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const WEEKDAY_LONG: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];
const MONTH_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const MONTH_LONG: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn build_base() -> Arc<Locale> {
    let mut overrides = HashMap::new();

    macro_rules! entry {
        ($token:literal, $spec:expr) => {
            overrides.insert($token.to_owned(), $spec)
        };
    }

    entry!("%a", Spec::render(|f, _| WEEKDAY_SHORT[f.weekday as usize % 7].to_owned()));
    entry!("%A", Spec::render(|f, _| WEEKDAY_LONG[f.weekday as usize % 7].to_owned()));
    entry!("%b", Spec::render(|f, _| MONTH_SHORT[(f.month as usize - 1) % 12].to_owned()));
    entry!("%B", Spec::render(|f, _| MONTH_LONG[(f.month as usize - 1) % 12].to_owned()));
    entry!("%p", Spec::render(|f, _| {
        let meridiem = if f.hour < 12 { "AM" } else { "PM" };
        meridiem.to_owned()
    }));

    // composite layouts, expressed as expansions over the built-ins
    entry!("%c", Spec::pattern("%a %b %-d %H:%M:%S %Y"));
    entry!("%D", Spec::pattern("%m/%d/%y"));
    entry!("%x", Spec::pattern("%m/%d/%y"));
    entry!("%X", Spec::pattern("%H:%M:%S"));
    entry!("%r", Spec::pattern("%I:%M:%S %p"));
    entry!("%R", Spec::pattern("%H:%M"));
    entry!("%T", Spec::pattern("%H:%M:%S"));

    Arc::new(Locale {
        overrides,
        parent: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layered_lookup() {
        let base = Locale::base();
        let table = Locale::extend(&base, [("%a", Spec::pattern("[short weekday]"))]);

        // the override shadows the base entry
        assert!(matches!(table.get("%a"), Some(Spec::Pattern(p)) if p == "[short weekday]"));

        // non-overridden tokens fall through to the parent
        assert!(matches!(table.get("%A"), Some(Spec::Render(_))));

        // unknown tokens miss everywhere
        assert!(table.get("%Q").is_none());
    }

    #[test]
    fn test_base_is_shared() {
        assert!(Arc::ptr_eq(&Locale::base(), &Locale::base()));
    }
}
