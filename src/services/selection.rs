//! Seat selection.
//!
//! Pure functions over a list of free seats. Given the same free seats, count
//! and priority they always return the same seats in the same order.
//!
//! - `Default` / `Together`: the first row (ascending) holding `count`
//!   consecutive free seats wins; otherwise the window of `count` free seats
//!   (in seat order) with the smallest summed distance between neighbours.
//! - `Comfort`: the same row search, with the run re-ordered window seats
//!   first, then aisle, then middle; otherwise the first `count` seats of the
//!   comfort ranking.
//!
//! A result shorter than `count` means no allocation was possible.

use std::collections::{BTreeMap, HashMap};

use crate::models::{ComfortTier, FreeSeat, Priority, SeatLayout, SeatNumber};

pub fn select_seats(
    layout: &SeatLayout,
    free: &[FreeSeat],
    count: usize,
    priority: Priority,
) -> Vec<SeatNumber> {
    if count == 0 {
        return Vec::new();
    }

    match priority {
        Priority::Default | Priority::Together => select_together(layout, free, count),
        Priority::Comfort => select_comfort(layout, free, count),
    }
}

/// Free seat numbers grouped by row, rows ascending, seats ascending within a row.
pub fn group_by_row(free: &[FreeSeat]) -> BTreeMap<u32, Vec<SeatNumber>> {
    let mut rows: BTreeMap<u32, Vec<SeatNumber>> = BTreeMap::new();
    for seat in free {
        rows.entry(seat.row).or_default().push(seat.seat_number);
    }
    for seats in rows.values_mut() {
        seats.sort_unstable();
    }
    rows
}

/// First run of `count` seats with consecutive numbers, scanning left to right.
pub fn find_consecutive_run(seats: &[SeatNumber], count: usize) -> Option<&[SeatNumber]> {
    if count == 0 {
        return None;
    }
    seats
        .windows(count)
        .find(|window| window.windows(2).all(|pair| pair[1] == pair[0] + 1))
}

fn first_row_run(free: &[FreeSeat], count: usize) -> Option<Vec<SeatNumber>> {
    group_by_row(free)
        .values()
        .find_map(|seats| find_consecutive_run(seats, count).map(<[SeatNumber]>::to_vec))
}

fn select_together(layout: &SeatLayout, free: &[FreeSeat], count: usize) -> Vec<SeatNumber> {
    first_row_run(free, count).unwrap_or_else(|| nearest_cluster(layout, free, count))
}

/// Window of `count` free seats, in seat order, minimising the sum of distances
/// between neighbouring seats. The earliest window wins ties.
pub fn nearest_cluster(layout: &SeatLayout, free: &[FreeSeat], count: usize) -> Vec<SeatNumber> {
    let mut seats: Vec<SeatNumber> = free.iter().map(|s| s.seat_number).collect();
    seats.sort_unstable();

    if seats.len() < count {
        return seats;
    }

    let mut best: Option<(u32, &[SeatNumber])> = None;
    for window in seats.windows(count) {
        let spread: u32 = window.windows(2).map(|pair| layout.distance(pair[0], pair[1])).sum();
        match best {
            Some((best_spread, _)) if spread >= best_spread => {}
            _ => best = Some((spread, window)),
        }
    }

    best.map(|(_, window)| window.to_vec()).unwrap_or_default()
}

/// Free seats ranked window, aisle, middle; ascending seat number within a tier.
pub fn comfort_ranking(layout: &SeatLayout, free: &[FreeSeat]) -> Vec<SeatNumber> {
    let mut ranked: Vec<(ComfortTier, SeatNumber)> = free
        .iter()
        .map(|s| (layout.comfort_tier(s.seat_number), s.seat_number))
        .collect();
    ranked.sort_unstable();
    ranked.into_iter().map(|(_, seat)| seat).collect()
}

fn select_comfort(layout: &SeatLayout, free: &[FreeSeat], count: usize) -> Vec<SeatNumber> {
    let ranking = comfort_ranking(layout, free);

    match first_row_run(free, count) {
        Some(mut run) => {
            let rank: HashMap<SeatNumber, usize> =
                ranking.iter().enumerate().map(|(i, &seat)| (seat, i)).collect();
            run.sort_by_key(|seat| rank.get(seat).copied().unwrap_or(usize::MAX));
            run
        }
        // TODO: use nearest_cluster over the comfort tiers here once product decides whether
        // comfort fallbacks should stay grouped
        None => ranking.into_iter().take(count).collect(),
    }
}
