use chrono::NaiveDate;

/// Every calendar day from `from` to `to` inclusive, ascending.
///
/// An inverted range yields nothing; the builder treats that as "nothing
/// selected yet" rather than an error.
pub fn expand_range(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    if from > to {
        return Vec::new();
    }
    from.iter_days().take_while(|day| *day <= to).collect()
}

/// Key used when a date is shown or persisted (`YYYY-MM-DD`).
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Date range picked in the builder. Either endpoint may still be unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Both endpoints, if set.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.from.zip(self.to)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.bounds()
            .is_some_and(|(from, to)| from <= date && date <= to)
    }

    pub fn days(&self) -> Vec<NaiveDate> {
        self.bounds()
            .map(|(from, to)| expand_range(from, to))
            .unwrap_or_default()
    }
}
