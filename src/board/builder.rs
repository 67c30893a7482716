use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::db::Snapshot;
use crate::models::{Tracker, TrackerFilter};
use crate::stats::CompletionIndex;

#[derive(Debug, Clone, PartialEq)]
pub struct TrackerCard {
    pub tracker: Tracker,
    pub completed: bool,
    pub days_completed: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub cards: Vec<TrackerCard>,
}

/// Trackers visible on one date, grouped for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Date the board was built for; `Today` filter moves it to today.
    pub date: NaiveDate,
    pub sections: Vec<Section>,
}

impl Board {
    pub fn build(
        snapshot: &Snapshot,
        date: NaiveDate,
        today: NaiveDate,
        filter: TrackerFilter,
        search: &str,
        pinned_title: &str,
    ) -> Self {
        let date = if filter == TrackerFilter::Today { today } else { date };
        let index = CompletionIndex::from_records(&snapshot.records);
        let needle = search.trim().to_lowercase();

        let mut pinned = Vec::new();
        let mut by_category: BTreeMap<&str, Vec<TrackerCard>> = BTreeMap::new();

        let mut trackers: Vec<&Tracker> = snapshot.trackers.iter().collect();
        trackers.sort_by_key(|t| t.id);

        for tracker in trackers {
            if !tracker.is_visible_on(date, today) {
                continue;
            }
            if !needle.is_empty() && !tracker.title.to_lowercase().contains(&needle) {
                continue;
            }
            let completed = index.is_completed(tracker.id, date);
            let keep = match filter {
                TrackerFilter::All | TrackerFilter::Today => true,
                TrackerFilter::Completed => completed,
                TrackerFilter::NotCompleted => !completed,
            };
            if !keep {
                continue;
            }

            // An event is a single occurrence, so only the shown day counts
            let days_completed = if tracker.is_event() {
                completed as u32
            } else {
                index.days_completed(tracker.id)
            };
            let card = TrackerCard {
                tracker: tracker.clone(),
                completed,
                days_completed,
            };
            if tracker.is_pinned {
                pinned.push(card);
            } else {
                by_category.entry(tracker.category.as_str()).or_default().push(card);
            }
        }

        let mut sections = Vec::new();
        if !pinned.is_empty() {
            sections.push(Section {
                title: pinned_title.to_string(),
                cards: pinned,
            });
        }
        sections.extend(by_category.into_iter().map(|(title, cards)| Section {
            title: title.to_string(),
            cards,
        }));

        Board { date, sections }
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Cards in display order, for cursor navigation.
    pub fn cards(&self) -> impl Iterator<Item = &TrackerCard> {
        self.sections.iter().flat_map(|s| s.cards.iter())
    }

    pub fn card_count(&self) -> usize {
        self.sections.iter().map(|s| s.cards.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryId, CompletionRecord, Day, Rgb, Schedule, TrackerId};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn tracker(id: i64, title: &str, category: &str, schedule: Schedule) -> Tracker {
        Tracker {
            id: TrackerId(id),
            title: title.to_string(),
            color: Rgb::new(0, 0, 0),
            emoji: "⭐".to_string(),
            schedule,
            category_id: CategoryId(if category == "Home" { 1 } else { 2 }),
            category: category.to_string(),
            is_pinned: false,
        }
    }

    // 2024-03-04 is a Monday.
    fn snapshot() -> Snapshot {
        let mut pinned = tracker(4, "Meditate", "Health", Schedule::daily());
        pinned.is_pinned = true;
        Snapshot {
            trackers: vec![
                tracker(1, "Water plants", "Home", Schedule::of([Day::Monday])),
                tracker(2, "Gym", "Health", Schedule::of([Day::Monday, Day::Wednesday])),
                tracker(3, "Dentist", "Health", Schedule::event()),
                pinned,
            ],
            categories: Vec::new(),
            records: vec![
                CompletionRecord { tracker_id: TrackerId(2), date: date("2024-03-04") },
                CompletionRecord { tracker_id: TrackerId(2), date: date("2024-02-26") },
            ],
        }
    }

    fn titles(board: &Board) -> Vec<(String, Vec<String>)> {
        board
            .sections
            .iter()
            .map(|s| {
                (
                    s.title.clone(),
                    s.cards.iter().map(|c| c.tracker.title.clone()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn groups_by_category_with_pinned_first() {
        let monday = date("2024-03-04");
        let board = Board::build(&snapshot(), monday, monday, TrackerFilter::All, "", "Pinned");
        assert_eq!(
            titles(&board),
            vec![
                ("Pinned".to_string(), vec!["Meditate".to_string()]),
                ("Health".to_string(), vec!["Gym".to_string(), "Dentist".to_string()]),
                ("Home".to_string(), vec!["Water plants".to_string()]),
            ]
        );
        assert_eq!(board.card_count(), 4);
    }

    #[test]
    fn events_only_show_on_today() {
        let monday = date("2024-03-04");
        let tuesday = date("2024-03-05");
        let board = Board::build(&snapshot(), monday, tuesday, TrackerFilter::All, "", "Pinned");
        assert!(board.cards().all(|c| c.tracker.title != "Dentist"));
        assert!(board.cards().any(|c| c.tracker.title == "Gym"));
    }

    #[test]
    fn today_filter_moves_the_date() {
        let monday = date("2024-03-04");
        let wednesday = date("2024-03-06");
        let board = Board::build(&snapshot(), monday, wednesday, TrackerFilter::Today, "", "Pinned");
        assert_eq!(board.date, wednesday);
        assert!(board.cards().all(|c| c.tracker.title != "Water plants"));
        assert!(board.cards().any(|c| c.tracker.title == "Dentist"));
    }

    #[test]
    fn completion_filters() {
        let monday = date("2024-03-04");
        let done = Board::build(&snapshot(), monday, monday, TrackerFilter::Completed, "", "Pinned");
        let done_titles: Vec<_> = done.cards().map(|c| c.tracker.title.as_str()).collect();
        assert_eq!(done_titles, vec!["Gym"]);

        let pending =
            Board::build(&snapshot(), monday, monday, TrackerFilter::NotCompleted, "", "Pinned");
        assert_eq!(pending.card_count(), 3);
        assert!(pending.cards().all(|c| !c.completed));
    }

    #[test]
    fn search_is_case_insensitive() {
        let monday = date("2024-03-04");
        let board = Board::build(&snapshot(), monday, monday, TrackerFilter::All, " PLANT", "Pinned");
        let found: Vec<_> = board.cards().map(|c| c.tracker.title.as_str()).collect();
        assert_eq!(found, vec!["Water plants"]);

        let none = Board::build(&snapshot(), monday, monday, TrackerFilter::All, "yoga", "Pinned");
        assert!(none.is_empty());
    }

    #[test]
    fn cards_carry_completion_counts() {
        let monday = date("2024-03-04");
        let board = Board::build(&snapshot(), monday, monday, TrackerFilter::All, "", "Pinned");
        let gym = board.cards().find(|c| c.tracker.title == "Gym").unwrap();
        assert!(gym.completed);
        assert_eq!(gym.days_completed, 2);
    }

    #[test]
    fn event_cards_count_only_the_shown_day() {
        let monday = date("2024-03-04");
        let mut snap = snapshot();
        snap.records.push(CompletionRecord { tracker_id: TrackerId(3), date: date("2024-02-20") });
        snap.records.push(CompletionRecord { tracker_id: TrackerId(3), date: date("2024-02-27") });

        let board = Board::build(&snap, monday, monday, TrackerFilter::All, "", "Pinned");
        let dentist = board.cards().find(|c| c.tracker.title == "Dentist").unwrap();
        assert!(!dentist.completed);
        assert_eq!(dentist.days_completed, 0);

        snap.records.push(CompletionRecord { tracker_id: TrackerId(3), date: monday });
        let board = Board::build(&snap, monday, monday, TrackerFilter::All, "", "Pinned");
        let dentist = board.cards().find(|c| c.tracker.title == "Dentist").unwrap();
        assert!(dentist.completed);
        assert_eq!(dentist.days_completed, 1);
    }
}
