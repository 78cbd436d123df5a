use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use osk_core::{is_free, unscheduled_items, AvailabilityIndex};
use osk_domain::{AppState, Booking, Course, Reservation, Student};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// `count` courses of three consecutive days each, with one student per course.
fn school(count: usize) -> AppState {
    let mut state = AppState::default();
    for index in 0..count {
        let first = start() + Duration::days(index as i64 * 3);
        let course = Course::new(
            format!("Kurs {index}"),
            10,
            (0..3).map(|offset| first + Duration::days(offset)),
        );
        state.reservations.push(Reservation::new(
            Booking::Course {
                course_id: course.id.clone(),
            },
            Student::new(format!("Kursant {index}"), "600000000"),
        ));
        state.courses.push(course);
    }
    state
}

fn bench_free_days(c: &mut Criterion) {
    let mut group = c.benchmark_group("free_days_in_year");
    for count in [10usize, 100, 300] {
        let state = school(count);
        let days: Vec<NaiveDate> = (0..365).map(|d| start() + Duration::days(d)).collect();

        group.bench_with_input(BenchmarkId::new("scan", count), &state, |b, state| {
            b.iter(|| {
                days.iter()
                    .filter(|day| is_free(&state.courses, **day))
                    .count()
            })
        });
        group.bench_with_input(BenchmarkId::new("index", count), &state, |b, state| {
            b.iter(|| {
                let index = AvailabilityIndex::build(&state.courses);
                days.iter().filter(|day| index.is_free(**day)).count()
            })
        });
    }
    group.finish();
}

fn bench_unscheduled(c: &mut Criterion) {
    let state = school(300);
    c.bench_function("unscheduled_items_300_courses", |b| {
        b.iter(|| unscheduled_items(black_box(&state)).len())
    });
}

criterion_group!(benches, bench_free_days, bench_unscheduled);
criterion_main!(benches);
