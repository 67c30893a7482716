use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
    Sunday = 7,
}

impl Day {
    pub fn all() -> [Day; 7] {
        [
            Day::Monday,
            Day::Tuesday,
            Day::Wednesday,
            Day::Thursday,
            Day::Friday,
            Day::Saturday,
            Day::Sunday,
        ]
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Day> {
        Day::all().into_iter().find(|d| d.number() == n)
    }

    pub fn of(date: NaiveDate) -> Day {
        match date.weekday() {
            chrono::Weekday::Mon => Day::Monday,
            chrono::Weekday::Tue => Day::Tuesday,
            chrono::Weekday::Wed => Day::Wednesday,
            chrono::Weekday::Thu => Day::Thursday,
            chrono::Weekday::Fri => Day::Friday,
            chrono::Weekday::Sat => Day::Saturday,
            chrono::Weekday::Sun => Day::Sunday,
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Day::Monday => "Mon",
            Day::Tuesday => "Tue",
            Day::Wednesday => "Wed",
            Day::Thursday => "Thu",
            Day::Friday => "Fri",
            Day::Saturday => "Sat",
            Day::Sunday => "Sun",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }
}

impl FromStr for Day {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if let Ok(n) = s.parse::<u8>() {
            return Day::from_number(n).ok_or_else(|| anyhow::anyhow!("Weekday out of range: {}", n));
        }
        match s.as_str() {
            "mon" | "monday" => Ok(Day::Monday),
            "tue" | "tues" | "tuesday" => Ok(Day::Tuesday),
            "wed" | "wednesday" => Ok(Day::Wednesday),
            "thu" | "thur" | "thurs" | "thursday" => Ok(Day::Thursday),
            "fri" | "friday" => Ok(Day::Friday),
            "sat" | "saturday" => Ok(Day::Saturday),
            "sun" | "sunday" => Ok(Day::Sunday),
            _ => Err(anyhow::anyhow!("Unknown weekday: {}", s)),
        }
    }
}

/// Weekly schedule of a tracker. Empty means a one-off event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule(BTreeSet<Day>);

impl Schedule {
    pub fn event() -> Self {
        Self(BTreeSet::new())
    }

    pub fn daily() -> Self {
        Self(Day::all().into_iter().collect())
    }

    pub fn of(days: impl IntoIterator<Item = Day>) -> Self {
        Self(days.into_iter().collect())
    }

    pub fn is_event(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, day: Day) -> bool {
        self.0.contains(&day)
    }

    pub fn days(&self) -> impl Iterator<Item = Day> + '_ {
        self.0.iter().copied()
    }

    /// Storage form: comma-separated weekday numbers, e.g. "1,3,5".
    pub fn encode(&self) -> String {
        self.0
            .iter()
            .map(|d| d.number().to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Inverse of [`Schedule::encode`]. Unknown numbers are skipped.
    pub fn decode(stored: &str) -> Self {
        Self(
            stored
                .split(',')
                .filter_map(|part| part.trim().parse::<u8>().ok())
                .filter_map(Day::from_number)
                .collect(),
        )
    }

    pub fn describe(&self) -> String {
        if self.is_event() {
            return "event".to_string();
        }
        if self.0.len() == 7 {
            return "every day".to_string();
        }
        let days: Vec<Day> = self.days().collect();
        if let [only] = days.as_slice() {
            return format!("every {}", only.display_name());
        }
        days.iter()
            .map(|d| d.short_name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for Schedule {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "event" | "none" | "once" => Ok(Schedule::event()),
            "daily" | "everyday" | "every day" => Ok(Schedule::daily()),
            "weekdays" => Ok(Schedule::of([
                Day::Monday,
                Day::Tuesday,
                Day::Wednesday,
                Day::Thursday,
                Day::Friday,
            ])),
            "weekends" => Ok(Schedule::of([Day::Saturday, Day::Sunday])),
            other => other
                .split(',')
                .filter(|part| !part.trim().is_empty())
                .map(Day::from_str)
                .collect::<Result<BTreeSet<_>, _>>()
                .map(Schedule),
        }
    }
}
