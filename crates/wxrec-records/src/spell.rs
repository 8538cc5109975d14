//! Dry/wet spell tracking

use chrono::NaiveDate;
use wxrec_core::{DayKind, WetDayRule};

/// A finished (or still open) run of same-kind days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spell {
    pub length: u32,
    pub start: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenRun {
    kind: DayKind,
    length: u32,
    start: NaiveDate,
}

/// Longest runs found by a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpellRecords {
    pub longest_dry: Option<Spell>,
    pub longest_wet: Option<Spell>,
}

/// Two-state machine fed once per day.
///
/// A run is only compared against its record when it closes, either on a
/// transition, on [`break_run`](Self::break_run) or in [`finish`](Self::finish).
/// Comparisons are strict so the earliest of equal runs is kept.
#[derive(Debug, Clone)]
pub struct SpellTracker {
    rule: WetDayRule,
    open: Option<OpenRun>,
    best: SpellRecords,
}

impl SpellTracker {
    pub fn new(rule: WetDayRule) -> Self {
        Self {
            rule,
            open: None,
            best: SpellRecords::default(),
        }
    }

    /// Classify one day's rain and advance the machine
    pub fn observe(&mut self, date: NaiveDate, rain: f64) -> DayKind {
        let kind = self.rule.classify(rain);
        let continues = self.open.map_or(false, |run| run.kind == kind);
        if continues {
            if let Some(run) = self.open.as_mut() {
                run.length += 1;
            }
        } else {
            self.close();
            self.open = Some(OpenRun {
                kind,
                length: 1,
                start: date,
            });
        }
        kind
    }

    /// Close the open run without starting another (non-adjacent days)
    pub fn break_run(&mut self) {
        self.close();
    }

    /// Length of the run in progress, if any
    pub fn current(&self) -> Option<(DayKind, Spell)> {
        self.open.map(|run| {
            (
                run.kind,
                Spell {
                    length: run.length,
                    start: run.start,
                },
            )
        })
    }

    /// Records so far, not counting the open run
    pub fn records(&self) -> SpellRecords {
        self.best
    }

    /// Finalise the open run and return the records
    pub fn finish(mut self) -> SpellRecords {
        self.close();
        self.best
    }

    fn close(&mut self) {
        let Some(run) = self.open.take() else {
            return;
        };
        let best = match run.kind {
            DayKind::Dry => &mut self.best.longest_dry,
            DayKind::Wet => &mut self.best.longest_wet,
        };
        if best.map_or(true, |b| run.length > b.length) {
            *best = Some(Spell {
                length: run.length,
                start: run.start,
            });
        }
    }
}
