//! Tyre stint segmentation.
//!
//! Stint numbers come from the provider; the segmenter only groups laps by
//! them. A new stint starts wherever the stint number differs from the
//! previous lap's, so anomalous provider data (decreasing or skipped stint
//! numbers) still yields contiguous, non-overlapping stints plus a
//! [`DataQualityWarning`] instead of an error.

use tracing::warn;

use crate::Result;
use crate::laps::LapIndex;
use crate::types::{DataQualityWarning, Lap, Session, Stint, WarningKind};

/// Stints of one driver along with any anomalies found while grouping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Segmentation {
    pub stints: Vec<Stint>,
    pub warnings: Vec<DataQualityWarning>,
}

/// Groups a driver's laps into stints.
#[derive(Debug, Clone, Copy)]
pub struct StintSegmenter {
    /// Report the first stint as starting at lap 0.
    ///
    /// Strategy charts draw the first bar from the race start rather than
    /// from the first recorded lap number. Disable to see raw boundaries.
    pub pin_first_start: bool,
}

impl Default for StintSegmenter {
    fn default() -> Self {
        Self { pin_first_start: true }
    }
}

impl StintSegmenter {
    pub fn new(pin_first_start: bool) -> Self {
        Self { pin_first_start }
    }

    /// Segment one driver's laps.
    ///
    /// # Errors
    ///
    /// [`TimingError::DriverNotFound`](crate::TimingError::DriverNotFound) if
    /// the driver has no laps in the session.
    pub fn segment(&self, session: &Session, driver: &str) -> Result<Segmentation> {
        let index = LapIndex::new(session);
        let laps = index.driver_laps(driver)?;
        let segmentation = self.segment_laps(laps);

        for warning in &segmentation.warnings {
            warn!(driver, kind = ?warning.kind, "{}", warning);
        }
        Ok(segmentation)
    }

    /// Stints of every driver, ordered by driver code.
    ///
    /// This is the whole-field table behind the tyre-strategy chart.
    pub fn strategy(&self, session: &Session) -> Segmentation {
        let index = LapIndex::new(session);
        let mut all = Segmentation::default();

        for driver in index.drivers() {
            let Ok(laps) = index.driver_laps(driver) else { continue };
            let segmentation = self.segment_laps(laps);
            for warning in &segmentation.warnings {
                warn!(driver, kind = ?warning.kind, "{}", warning);
            }
            all.stints.extend(segmentation.stints);
            all.warnings.extend(segmentation.warnings);
        }

        all
    }

    /// Group laps (one driver, lap-number order) into runs of equal stint number.
    fn segment_laps(&self, laps: &[&Lap]) -> Segmentation {
        let mut segmentation = Segmentation::default();

        for lap in laps {
            if let Some(stint) =
                segmentation.stints.last_mut().filter(|stint| stint.stint_number == lap.stint)
            {
                if lap.compound != stint.compound {
                    segmentation.warnings.push(
                        DataQualityWarning::new(
                            WarningKind::CompoundChangeWithinStint,
                            format!(
                                "compound changed from {} to {} inside stint {}",
                                stint.compound, lap.compound, stint.stint_number
                            ),
                        )
                        .for_lap(&lap.driver, Some(lap.lap_number)),
                    );
                }
                stint.end_lap = stint.end_lap.max(lap.lap_number);
                stint.lap_count += 1;
                continue;
            }

            if let Some(warning) = segmentation
                .stints
                .last()
                .and_then(|previous| boundary_warning(previous.stint_number, lap))
            {
                segmentation.warnings.push(warning);
            }

            segmentation.stints.push(Stint {
                driver: lap.driver.clone(),
                stint_number: lap.stint,
                compound: lap.compound,
                start_lap: lap.lap_number,
                end_lap: lap.lap_number,
                lap_count: 1,
            });
        }

        if self.pin_first_start {
            if let Some(first) = segmentation.stints.first_mut() {
                first.start_lap = 0;
            }
        }

        segmentation
    }
}

/// Warning for a stint boundary that is not a step of exactly one.
fn boundary_warning(previous: u32, lap: &Lap) -> Option<DataQualityWarning> {
    let (kind, message) = if lap.stint < previous {
        (WarningKind::StintRegression, format!("stint number went from {} to {}", previous, lap.stint))
    } else if lap.stint > previous + 1 {
        (WarningKind::StintGap, format!("stint number jumped from {} to {}", previous, lap.stint))
    } else {
        return None;
    };

    Some(DataQualityWarning::new(kind, message).for_lap(&lap.driver, Some(lap.lap_number)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TimingError;
    use crate::test_utils::{lap, session_with_laps};
    use crate::types::Compound::{self, *};
    use proptest::prelude::*;

    fn stint_row(stint: &Stint) -> (Compound, u32, u32) {
        (stint.compound, stint.start_lap, stint.end_lap)
    }

    #[test]
    fn segments_scenario_with_pinned_first_start() {
        let session = session_with_laps(vec![
            lap("VER", 1, Some(92.1), Soft, 1),
            lap("VER", 2, Some(91.8), Soft, 1),
            lap("VER", 3, Some(95.0), Medium, 2),
        ]);

        let segmentation = StintSegmenter::default().segment(&session, "VER").unwrap();
        let rows: Vec<_> = segmentation.stints.iter().map(stint_row).collect();
        assert_eq!(rows, vec![(Soft, 0, 2), (Medium, 3, 3)]);
        assert!(segmentation.warnings.is_empty());
    }

    #[test]
    fn pinning_can_be_disabled() {
        let session = session_with_laps(vec![
            lap("VER", 2, Some(92.1), Soft, 1),
            lap("VER", 3, Some(95.0), Medium, 2),
        ]);

        let segmentation = StintSegmenter::new(false).segment(&session, "VER").unwrap();
        assert_eq!(segmentation.stints[0].start_lap, 2);
    }

    #[test]
    fn single_lap_is_one_degenerate_stint() {
        let session = session_with_laps(vec![lap("ZHO", 7, None, Hard, 1)]);

        let stints = StintSegmenter::new(false).segment(&session, "ZHO").unwrap().stints;
        assert_eq!(stints.len(), 1);
        assert_eq!((stints[0].start_lap, stints[0].end_lap), (7, 7));
    }

    #[test]
    fn anomalous_stint_numbers_split_with_warnings() {
        let session = session_with_laps(vec![
            lap("BOT", 1, Some(95.0), Soft, 1),
            lap("BOT", 2, Some(95.0), Soft, 1),
            lap("BOT", 3, Some(95.0), Hard, 3),
            lap("BOT", 4, Some(95.0), Hard, 2),
            lap("BOT", 5, Some(95.0), Medium, 2),
        ]);

        let segmentation = StintSegmenter::default().segment(&session, "BOT").unwrap();
        let numbers: Vec<_> = segmentation.stints.iter().map(|s| s.stint_number).collect();
        assert_eq!(numbers, vec![1, 3, 2]);

        let kinds: Vec<_> = segmentation.warnings.iter().map(|w| w.kind).collect();
        assert_eq!(
            kinds,
            vec![WarningKind::StintGap, WarningKind::StintRegression, WarningKind::CompoundChangeWithinStint]
        );
    }

    #[test]
    fn unknown_driver_is_an_error() {
        let session = session_with_laps(vec![lap("VER", 1, Some(92.1), Soft, 1)]);
        let err = StintSegmenter::default().segment(&session, "HAM").unwrap_err();
        assert!(matches!(err, TimingError::DriverNotFound { .. }));
    }

    #[test]
    fn strategy_covers_every_driver() {
        let session = session_with_laps(vec![
            lap("VER", 1, Some(92.1), Soft, 1),
            lap("VER", 2, Some(95.0), Hard, 2),
            lap("LEC", 1, Some(93.0), Medium, 1),
        ]);

        let strategy = StintSegmenter::default().strategy(&session);
        let rows: Vec<_> =
            strategy.stints.iter().map(|s| (s.driver.as_str(), s.start_lap, s.end_lap)).collect();
        assert_eq!(rows, vec![("LEC", 0, 1), ("VER", 0, 1), ("VER", 2, 2)]);
    }

    proptest! {
        #[test]
        fn stints_are_ordered_disjoint_and_cover_all_laps(
            increments in prop::collection::vec(0u32..2u32, 1..60),
            first_lap in 1u32..5u32,
        ) {
            let mut stint = 1;
            let laps: Vec<Lap> = increments
                .iter()
                .enumerate()
                .map(|(i, step)| {
                    if i > 0 { stint += step; }
                    lap("RUS", first_lap + i as u32, Some(90.0), Medium, stint)
                })
                .collect();
            let total = laps.len();
            let session = session_with_laps(laps);

            let stints = StintSegmenter::default().segment(&session, "RUS").unwrap().stints;

            prop_assert_eq!(stints[0].start_lap, 0);
            prop_assert_eq!(stints.last().unwrap().end_lap, first_lap + total as u32 - 1);
            prop_assert_eq!(stints.iter().map(|s| s.lap_count).sum::<usize>(), total);
            for pair in stints.windows(2) {
                prop_assert!(pair[0].stint_number < pair[1].stint_number);
                prop_assert!(pair[0].end_lap < pair[1].start_lap);
                prop_assert_eq!(pair[0].end_lap + 1, pair[1].start_lap);
            }
        }
    }
}
