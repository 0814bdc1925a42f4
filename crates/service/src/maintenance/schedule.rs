//! Pure date scoring for preventive work.
//!
//! Candidates are the `CANDIDATE_DAYS` days starting at `max(today, due - LOOKBEHIND_DAYS)`.
//! Each gets a penalty; the lowest wins and ties go to the earliest day.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

pub const CANDIDATE_DAYS: i64 = 30;
pub const LOOKBEHIND_DAYS: i64 = 7;
pub const WEEKEND_PENALTY: i64 = 40;
pub const LOAD_PENALTY: i64 = 15;
pub const DISTANCE_PENALTY: i64 = 2;
pub const LATE_PENALTY: i64 = 10;
pub const DUE_DAY_BONUS: i64 = 20;

/// Penalty breakdown of one candidate day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CandidateScore {
    pub date: NaiveDate,
    pub weekend: i64,
    pub load: i64,
    pub distance: i64,
    pub late: i64,
    pub due_day_bonus: i64,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub due_on: NaiveDate,
    pub suggested_on: NaiveDate,
    pub score: CandidateScore,
    pub candidates: Vec<CandidateScore>,
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn window_start(today: NaiveDate, due: NaiveDate) -> NaiveDate {
    today.max(due - Duration::days(LOOKBEHIND_DAYS))
}

/// Every candidate day, in order.
pub fn candidate_days(today: NaiveDate, due: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let start = window_start(today, due);
    (0..CANDIDATE_DAYS).map(move |offset| start + Duration::days(offset))
}

/// `load` is the number of open orders already scheduled on `date`.
pub fn score_day(date: NaiveDate, due: NaiveDate, load: u32) -> CandidateScore {
    let offset = (date - due).num_days();
    let weekend = if is_weekend(date) { WEEKEND_PENALTY } else { 0 };
    let load = LOAD_PENALTY * i64::from(load);
    let distance = DISTANCE_PENALTY * offset.abs();
    let late = LATE_PENALTY * offset.max(0);
    let due_day_bonus = if offset == 0 { DUE_DAY_BONUS } else { 0 };
    CandidateScore {
        date,
        weekend,
        load,
        distance,
        late,
        due_day_bonus,
        total: weekend + load + distance + late - due_day_bonus,
    }
}

/// Score the whole window and pick the best day.
pub fn suggest(today: NaiveDate, due: NaiveDate, load_on: impl Fn(NaiveDate) -> u32) -> Suggestion {
    let candidates: Vec<CandidateScore> = candidate_days(today, due)
        .map(|day| score_day(day, due, load_on(day)))
        .collect();
    // min_by_key keeps the first of equal minima, which is the earliest day.
    let score = candidates
        .iter()
        .copied()
        .min_by_key(|c| c.total)
        .unwrap_or_else(|| score_day(window_start(today, due), due, 0));
    Suggestion { due_on: due, suggested_on: score.date, score, candidates }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn window_starts_a_week_before_due() {
        let today = d(2024, 3, 1);
        let due = d(2024, 3, 20);
        let days: Vec<_> = candidate_days(today, due).collect();
        assert_eq!(days.len() as i64, CANDIDATE_DAYS);
        assert_eq!(days[0], d(2024, 3, 13));
        assert_eq!(*days.last().unwrap(), d(2024, 4, 11));
    }

    #[test]
    fn window_never_starts_in_the_past() {
        let today = d(2024, 3, 18);
        assert_eq!(window_start(today, d(2024, 3, 20)), today);
        assert_eq!(window_start(today, d(2024, 3, 1)), today);
    }

    #[test]
    fn due_weekday_with_no_load_wins() {
        // 2024-03-20 is a Wednesday.
        let s = suggest(d(2024, 3, 1), d(2024, 3, 20), |_| 0);
        assert_eq!(s.suggested_on, d(2024, 3, 20));
        assert_eq!(s.score.total, -DUE_DAY_BONUS);
        assert_eq!(s.candidates.len() as i64, CANDIDATE_DAYS);
    }

    #[test]
    fn due_on_saturday_moves_to_friday() {
        // 2024-03-23 is a Saturday: 40 - 20 = 20 vs Friday 2 vs Monday 4 + 20.
        let s = suggest(d(2024, 3, 1), d(2024, 3, 23), |_| 0);
        assert_eq!(s.suggested_on, d(2024, 3, 22));
        assert_eq!(s.score.total, DISTANCE_PENALTY);
    }

    #[test]
    fn busy_due_day_shifts_earlier() {
        let due = d(2024, 3, 20);
        // due: 30 - 20 = 10; Tuesday: 2; Thursday: 2 + 10 = 12.
        let s = suggest(d(2024, 3, 1), due, |day| if day == due { 2 } else { 0 });
        assert_eq!(s.suggested_on, d(2024, 3, 19));
    }

    #[test]
    fn ties_go_to_the_earliest_day() {
        let due = d(2024, 3, 20);
        // Six days early and one day late both cost 12 once the days between are busy.
        let s = suggest(d(2024, 3, 1), due, |day| if day > d(2024, 3, 14) && day <= due { 3 } else { 0 });
        assert_eq!(score_day(d(2024, 3, 21), due, 0).total, 12);
        assert_eq!(s.suggested_on, d(2024, 3, 14));
        assert_eq!(s.score.total, 12);
    }

    #[test]
    fn overdue_plans_are_scheduled_as_soon_as_possible() {
        // today Wednesday 2024-03-20, due ten days earlier.
        let s = suggest(d(2024, 3, 20), d(2024, 3, 10), |_| 0);
        assert_eq!(s.suggested_on, d(2024, 3, 20));
        assert_eq!(s.score.late, 10 * LATE_PENALTY);
        assert_eq!(s.score.distance, 10 * DISTANCE_PENALTY);
    }

    #[test]
    fn breakdown_adds_up() {
        let c = score_day(d(2024, 3, 24), d(2024, 3, 20), 1);
        assert_eq!(c.weekend, WEEKEND_PENALTY);
        assert_eq!(c.load, LOAD_PENALTY);
        assert_eq!(c.distance, 4 * DISTANCE_PENALTY);
        assert_eq!(c.late, 4 * LATE_PENALTY);
        assert_eq!(c.due_day_bonus, 0);
        assert_eq!(c.total, 40 + 15 + 8 + 40);
    }
}
