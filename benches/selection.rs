use criterion::{black_box, criterion_group, criterion_main, Criterion};

use coach_booking::models::{FreeSeat, Priority, SeatLayout};
use coach_booking::services::selection::select_seats;

fn checkerboard(layout: &SeatLayout) -> Vec<FreeSeat> {
    (1..=layout.total_seats as i32)
        .filter(|seat| seat % 2 == 1)
        .map(|seat| FreeSeat::new(seat, layout))
        .collect()
}

fn bench_selection(c: &mut Criterion) {
    let layout = SeatLayout::default();
    let empty_coach: Vec<FreeSeat> = (1..=80).map(|seat| FreeSeat::new(seat, &layout)).collect();
    let scattered = checkerboard(&layout);

    c.bench_function("together/first_row_run", |b| {
        b.iter(|| select_seats(&layout, black_box(&empty_coach), 7, Priority::Together))
    });

    c.bench_function("together/cluster_fallback", |b| {
        b.iter(|| select_seats(&layout, black_box(&scattered), 7, Priority::Together))
    });

    c.bench_function("comfort/ranking_fallback", |b| {
        b.iter(|| select_seats(&layout, black_box(&scattered), 7, Priority::Comfort))
    });
}

criterion_group!(benches, bench_selection);
criterion_main!(benches);
