//! Benchmarks for prompt rendering
//!
//! Run with: cargo bench --package data-loader
//!
//! Uses synthetic users sized like a heavy MovieLens / Amazon reviewer.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{AgeGroup, Gender, MovieItem, MovieUser, MusicItem, MusicUser, Profile, PromptStyle};

fn build_movie_user(ratings: usize) -> MovieUser {
    let mut user = MovieUser::new(1, Gender::Female, AgeGroup::Age25To34);
    for i in 0..ratings {
        user.rate(MovieItem::new(format!("Movie {} ({})", i, 1950 + i % 50)), (i % 5 + 1) as u8);
    }
    user
}

fn build_music_user(ratings: usize, style: PromptStyle) -> MusicUser {
    let mut user = MusicUser::new("A1", style);
    for i in 0..ratings {
        let item = MusicItem::new(
            &format!("{:010}", i + 1),
            format!("Album {}", i),
            "['Rock', 'Indie']",
            format!("Label {}", i % 17),
            "CD",
        )
        .expect("synthetic item is valid");
        user.add(item, (i % 5 + 1) as u8, i as i64);
    }
    user
}

fn bench_movie_prompt(c: &mut Criterion) {
    let user = build_movie_user(500);
    c.bench_function("movie_prompt_500", |b| {
        b.iter(|| black_box(black_box(&user).prompt()))
    });
}

fn bench_music_prompts(c: &mut Criterion) {
    let summary = build_music_user(500, PromptStyle::Summary);
    let grouped = build_music_user(500, PromptStyle::Grouped);

    c.bench_function("music_summary_prompt_500", |b| {
        b.iter(|| black_box(black_box(&summary).prompt()))
    });
    c.bench_function("music_grouped_prompt_500", |b| {
        b.iter(|| black_box(black_box(&grouped).prompt()))
    });
}

criterion_group!(benches, bench_movie_prompt, bench_music_prompts);
criterion_main!(benches);
