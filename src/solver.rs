//! Exhaustive via-point ordering under soft time windows.
//!
//! Every permutation of the via points is scored by simulating the drive
//! from pickup to destination. Early arrivals wait for the window to open and
//! late arrivals are charged per minute; the lowest score wins.

use chrono::{DateTime, TimeDelta, Utc};
use rayon::prelude::*;
use tracing::debug;

use crate::error::OptimizeError;
use crate::location::{Location, TimeWindows};
use crate::matrix::{DistanceMatrix, round2};
use crate::result::{OptimizationResult, OptimizedStop, OriginalStop, Penalties, SearchMetadata};
use crate::traits::DistanceMatrixProvider;

/// Penalty per minute spent waiting for a window to open.
pub const WAITING_PENALTY_PER_MINUTE: f64 = 2.0;

/// Penalty per minute of arrival after a window closes.
pub const LATENESS_PENALTY_PER_MINUTE: f64 = 10.0;

/// Largest via-point count searched by default (8! = 40320 candidates).
pub const DEFAULT_MAX_VIA_POINTS: usize = 8;

#[derive(Debug, Clone)]
pub struct OptimizeOptions {
    /// Requests with more via points are rejected rather than searched.
    pub max_via_points: usize,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            max_via_points: DEFAULT_MAX_VIA_POINTS,
        }
    }
}

/// A simulated drive along one stop ordering.
#[derive(Debug, Clone)]
struct Candidate {
    /// Indices into the full stop list.
    order: Vec<usize>,
    arrivals: Vec<DateTime<Utc>>,
    waiting_minutes: Vec<f64>,
    total_time: f64,
    total_distance: f64,
    penalties: f64,
    score: f64,
}

/// Finds the lowest-score visiting order for `via_points`.
///
/// Pickup stays first and destination last. The original order is scored
/// too, for comparison only.
pub fn optimize<M>(
    pickup: &Location,
    via_points: &[Location],
    destination: &Location,
    pickup_time: DateTime<Utc>,
    time_windows: &TimeWindows,
    matrix_provider: &M,
    options: &OptimizeOptions,
) -> Result<OptimizationResult, OptimizeError>
where
    M: DistanceMatrixProvider + ?Sized,
{
    if via_points.len() > options.max_via_points {
        return Err(OptimizeError::TooManyViaPoints {
            count: via_points.len(),
            max: options.max_via_points,
        });
    }

    if via_points.is_empty() {
        return Ok(direct_route(pickup, destination, pickup_time, matrix_provider));
    }

    let stops: Vec<Location> = std::iter::once(pickup.clone())
        .chain(via_points.iter().cloned())
        .chain(std::iter::once(destination.clone()))
        .collect();
    let coords: Vec<(f64, f64)> = stops.iter().map(Location::coords).collect();
    let last = stops.len() - 1;

    debug!(stops = stops.len(), "calculating distance matrix");
    let matrix = matrix_provider.matrix_for(&coords);

    let via_indices: Vec<usize> = (1..last).collect();
    let orderings = permutations(&via_indices);
    debug!(count = orderings.len(), "scoring via point permutations");

    let full_route = |ordering: &[usize]| -> Vec<usize> {
        std::iter::once(0)
            .chain(ordering.iter().copied())
            .chain(std::iter::once(last))
            .collect()
    };

    let scores: Vec<f64> = orderings
        .par_iter()
        .map(|ordering| {
            score_route(full_route(ordering), &stops, &matrix, pickup_time, time_windows).score
        })
        .collect();

    // Strict comparison keeps the first ordering on ties.
    let mut best_index = 0;
    for (index, score) in scores.iter().enumerate() {
        if *score < scores[best_index] {
            best_index = index;
        }
    }

    let best = score_route(
        full_route(&orderings[best_index]),
        &stops,
        &matrix,
        pickup_time,
        time_windows,
    );
    let original = score_route((0..=last).collect(), &stops, &matrix, pickup_time, time_windows);
    debug!(
        best_score = best.score,
        original_score = original.score,
        "route optimization finished"
    );

    Ok(assemble(&stops, &best, &original, orderings.len(), pickup_time))
}

/// Pickup straight to destination; nothing to reorder.
fn direct_route<M>(
    pickup: &Location,
    destination: &Location,
    pickup_time: DateTime<Utc>,
    matrix_provider: &M,
) -> OptimizationResult
where
    M: DistanceMatrixProvider + ?Sized,
{
    let cell = matrix_provider.distance(pickup.coords(), destination.coords());
    let arrival = advance(pickup_time, cell.time_minutes);
    let stops = [(pickup, pickup_time), (destination, arrival)];

    OptimizationResult {
        optimized_route: stops
            .iter()
            .enumerate()
            .map(|(sequence_number, (location, arrival_time))| OptimizedStop {
                location: (*location).clone(),
                sequence_number,
                arrival_time: *arrival_time,
                waiting_time_minutes: 0.0,
            })
            .collect(),
        original_route: stops
            .iter()
            .enumerate()
            .map(|(sequence_number, (location, arrival_time))| OriginalStop {
                location: (*location).clone(),
                sequence_number,
                arrival_time: *arrival_time,
            })
            .collect(),
        total_distance_km: cell.distance_km,
        total_time_minutes: cell.time_minutes,
        time_saved_minutes: 0.0,
        distance_saved_km: 0.0,
        optimization_applied: false,
        penalties: Penalties::default(),
        metadata: SearchMetadata {
            permutations_evaluated: 0,
            pickup_time,
            optimization_score: round2(cell.time_minutes),
            original_score: round2(cell.time_minutes),
        },
    }
}

fn assemble(
    stops: &[Location],
    best: &Candidate,
    original: &Candidate,
    permutations_evaluated: usize,
    pickup_time: DateTime<Utc>,
) -> OptimizationResult {
    let best_time = round2(best.total_time);
    let best_distance = round2(best.total_distance);

    OptimizationResult {
        optimized_route: best
            .order
            .iter()
            .enumerate()
            .map(|(sequence_number, &index)| OptimizedStop {
                location: stops[index].clone(),
                sequence_number,
                arrival_time: best.arrivals[sequence_number],
                waiting_time_minutes: best.waiting_minutes[sequence_number],
            })
            .collect(),
        original_route: original
            .order
            .iter()
            .enumerate()
            .map(|(sequence_number, &index)| OriginalStop {
                location: stops[index].clone(),
                sequence_number,
                arrival_time: original.arrivals[sequence_number],
            })
            .collect(),
        total_distance_km: best_distance,
        total_time_minutes: best_time,
        time_saved_minutes: round2(round2(original.total_time) - best_time),
        distance_saved_km: round2(round2(original.total_distance) - best_distance),
        optimization_applied: true,
        penalties: Penalties {
            optimized: round2(best.penalties),
            original: round2(original.penalties),
        },
        metadata: SearchMetadata {
            permutations_evaluated,
            pickup_time,
            optimization_score: round2(best.score),
            original_score: round2(original.score),
        },
    }
}

/// Simulates driving `order` from `start`, applying time-window penalties.
///
/// Waiting moves the clock to the window's opening and counts as travel
/// time. Lateness only accrues penalty; the clock is not corrected.
fn score_route(
    order: Vec<usize>,
    stops: &[Location],
    matrix: &DistanceMatrix,
    start: DateTime<Utc>,
    time_windows: &TimeWindows,
) -> Candidate {
    let mut now = start;
    let mut total_time = 0.0;
    let mut total_distance = 0.0;
    let mut penalties = 0.0;
    let mut arrivals = Vec::with_capacity(order.len());
    let mut waiting_minutes = Vec::with_capacity(order.len());

    arrivals.push(now);
    waiting_minutes.push(0.0);

    for (position, leg) in order.windows(2).enumerate().map(|(i, leg)| (i + 1, leg)) {
        let segment = matrix.get(leg[0], leg[1]);
        now = advance(now, segment.time_minutes);
        total_time += segment.time_minutes;
        total_distance += segment.distance_km;

        let mut waited = 0.0;
        if let Some(window) = time_windows.get(&stops[leg[1]].window_key(position)) {
            if now < window.earliest {
                waited = minutes_between(window.earliest, now);
                penalties += waited * WAITING_PENALTY_PER_MINUTE;
                now = window.earliest;
                total_time += waited;
            } else if now > window.latest {
                penalties += minutes_between(now, window.latest) * LATENESS_PENALTY_PER_MINUTE;
            }
        }

        arrivals.push(now);
        waiting_minutes.push(waited);
    }

    Candidate {
        order,
        arrivals,
        waiting_minutes,
        total_time,
        total_distance,
        penalties,
        score: total_time + penalties,
    }
}

/// Moves `time` forward by fractional minutes, truncated to whole
/// milliseconds. Saturates at the latest representable instant.
fn advance(time: DateTime<Utc>, minutes: f64) -> DateTime<Utc> {
    TimeDelta::try_milliseconds((minutes * 60_000.0) as i64)
        .and_then(|delta| time.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn minutes_between(later: DateTime<Utc>, earlier: DateTime<Utc>) -> f64 {
    (later - earlier).num_milliseconds() as f64 / 60_000.0
}

/// Every ordering of `items`, each head-first choice in input order.
///
/// Returns `[[]]` for an empty slice. Yields `n!` orderings; distinct inputs
/// give distinct orderings.
pub fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }

    let mut result = Vec::new();
    for (i, head) in items.iter().enumerate() {
        let mut rest = items.to_vec();
        rest.remove(i);
        for tail in permutations(&rest) {
            let mut ordering = Vec::with_capacity(items.len());
            ordering.push(head.clone());
            ordering.extend(tail);
            result.push(ordering);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::TimeZone;

    use super::*;
    use crate::location::TimeWindow;
    use crate::matrix::DistanceCell;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
    }

    fn stops(n: usize) -> Vec<Location> {
        (0..n).map(|i| Location::new(i as f64, 0.0)).collect()
    }

    /// 10 minutes and 5 km between any two distinct stops.
    fn flat_matrix(n: usize) -> DistanceMatrix {
        DistanceMatrix::from_fn(n, |_, _| DistanceCell::new(5.0, 10.0))
    }

    #[test]
    fn test_permutations_base_cases() {
        assert_eq!(permutations::<u8>(&[]), vec![Vec::<u8>::new()]);
        assert_eq!(permutations(&[7]), vec![vec![7]]);
    }

    #[test]
    fn test_permutations_order() {
        assert_eq!(
            permutations(&[1, 2, 3]),
            vec![
                vec![1, 2, 3],
                vec![1, 3, 2],
                vec![2, 1, 3],
                vec![2, 3, 1],
                vec![3, 1, 2],
                vec![3, 2, 1],
            ]
        );
    }

    #[test]
    fn test_permutations_are_distinct() {
        let all = permutations(&[1, 2, 3, 4, 5]);
        assert_eq!(all.len(), 120);
        let unique: HashSet<_> = all.into_iter().collect();
        assert_eq!(unique.len(), 120);
    }

    #[test]
    fn test_score_without_windows_is_travel_time() {
        let candidate = score_route(
            vec![0, 1, 2],
            &stops(3),
            &flat_matrix(3),
            start(),
            &TimeWindows::new(),
        );

        assert_eq!(candidate.total_time, 20.0);
        assert_eq!(candidate.total_distance, 10.0);
        assert_eq!(candidate.penalties, 0.0);
        assert_eq!(candidate.score, 20.0);
        assert_eq!(candidate.arrivals[0], start());
        assert_eq!(candidate.arrivals[2], start() + TimeDelta::minutes(20));
    }

    #[test]
    fn test_early_arrival_waits_and_pays_double() {
        let mut windows = TimeWindows::new();
        windows.insert(
            "stop_1".to_string(),
            TimeWindow::new(start() + TimeDelta::minutes(25), start() + TimeDelta::minutes(60)),
        );

        let candidate = score_route(vec![0, 1, 2], &stops(3), &flat_matrix(3), start(), &windows);

        assert_eq!(candidate.waiting_minutes, vec![0.0, 15.0, 0.0]);
        assert_eq!(candidate.penalties, 30.0);
        assert_eq!(candidate.total_time, 35.0);
        assert_eq!(candidate.arrivals[1], start() + TimeDelta::minutes(25));
        assert_eq!(candidate.arrivals[2], start() + TimeDelta::minutes(35));
        assert_eq!(candidate.score, 65.0);
    }

    #[test]
    fn test_late_arrival_pays_tenfold_without_clamping() {
        let mut windows = TimeWindows::new();
        windows.insert(
            "stop_1".to_string(),
            TimeWindow::new(start(), start() + TimeDelta::minutes(4)),
        );

        let candidate = score_route(vec![0, 1, 2], &stops(3), &flat_matrix(3), start(), &windows);

        assert_eq!(candidate.penalties, 60.0);
        assert_eq!(candidate.arrivals[1], start() + TimeDelta::minutes(10));
        assert_eq!(candidate.total_time, 20.0);
        assert_eq!(candidate.waiting_minutes[1], 0.0);
    }

    #[test]
    fn test_window_keyed_by_id_follows_the_stop() {
        let mut stops = stops(4);
        stops[2] = stops[2].clone().with_id("school");
        let mut windows = TimeWindows::new();
        windows.insert(
            "school".to_string(),
            TimeWindow::new(start() + TimeDelta::minutes(30), start() + TimeDelta::minutes(40)),
        );

        // "school" is visited second here, arriving after 20 minutes.
        let candidate = score_route(vec![0, 1, 2, 3], &stops, &flat_matrix(4), start(), &windows);

        assert_eq!(candidate.waiting_minutes[2], 10.0);
    }

    #[test]
    fn test_fractional_minutes_truncate_to_milliseconds() {
        let later = advance(start(), 1.000_001);
        assert_eq!(later, start() + TimeDelta::milliseconds(60_000));
    }

    #[test]
    fn test_huge_travel_time_saturates_clock() {
        assert_eq!(advance(start(), 1e15), DateTime::<Utc>::MAX_UTC);
        assert_eq!(advance(start(), f64::MAX), DateTime::<Utc>::MAX_UTC);

        let crawl = DistanceMatrix::from_fn(3, |_, _| DistanceCell::new(5.0, 1e15));
        let candidate = score_route(
            vec![0, 1, 2],
            &stops(3),
            &crawl,
            start(),
            &TimeWindows::new(),
        );

        assert_eq!(candidate.arrivals[2], DateTime::<Utc>::MAX_UTC);
        assert_eq!(candidate.total_time, 2e15);
    }

    #[test]
    fn test_guard_rejects_before_matrix_call() {
        struct Unreachable;
        impl DistanceMatrixProvider for Unreachable {
            fn matrix_for(&self, _: &[(f64, f64)]) -> DistanceMatrix {
                panic!("matrix must not be requested");
            }
        }

        let options = OptimizeOptions { max_via_points: 2 };
        let err = optimize(
            &Location::new(0.0, 0.0),
            &stops(3),
            &Location::new(1.0, 1.0),
            start(),
            &TimeWindows::new(),
            &Unreachable,
            &options,
        )
        .expect_err("three via points exceed the limit");

        assert_eq!(err, OptimizeError::TooManyViaPoints { count: 3, max: 2 });
    }
}
