// Criterion benchmarks for Vivah Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vivah_match::core::{extract_name, extract_score, is_browsable, parse_suggestions};
use vivah_match::models::MatrimonialProfile;

const NAMES: &[&str] = &["Riya Kapoor", "Sam Verma", "Anjali Rao", "Neha Gupta", "Arjun Mehta"];

fn model_output(lines: usize) -> String {
    (0..lines)
        .map(|i| {
            if i % 4 == 3 {
                "Another promising profile worth a look.".to_string()
            } else {
                format!("{} ({}/100) Shared values and similar career goals.", NAMES[i % NAMES.len()], 50 + i % 50)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn create_profile(id: usize) -> MatrimonialProfile {
    serde_json::from_value(serde_json::json!({
        "userId": id.to_string(),
        "name": format!("User {}", id),
        "email": format!("user{}@example.com", id),
        "gender": if id % 2 == 0 { "female" } else { "male" },
        "age": 24 + (id % 12) as u8,
        "likedProfiles": (0..id % 20).map(|n| n.to_string()).collect::<Vec<_>>()
    }))
    .unwrap()
}

fn bench_line_extraction(c: &mut Criterion) {
    let line = "Anjali Rao (87/100) Great hobbies match and shared outlook on family.";

    c.bench_function("extract_name", |b| b.iter(|| extract_name(black_box(line))));
    c.bench_function("extract_score", |b| b.iter(|| extract_score(black_box(line))));
}

fn bench_parse_suggestions(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_suggestions");

    for line_count in [5, 20, 100, 1000].iter() {
        let text = model_output(*line_count);

        group.bench_with_input(BenchmarkId::from_parameter(line_count), &text, |b, text| {
            b.iter(|| parse_suggestions(black_box(Some(text.as_str()))));
        });
    }

    group.finish();
}

fn bench_browse_filter(c: &mut Criterion) {
    let viewer = create_profile(1);
    let candidates: Vec<MatrimonialProfile> = (0..500).map(create_profile).collect();

    c.bench_function("browse_filter_500_candidates", |b| {
        b.iter(|| {
            let visible: Vec<_> = candidates
                .iter()
                .filter(|p| is_browsable(p, black_box(&viewer)))
                .collect();
            black_box(visible)
        });
    });
}

criterion_group!(benches, bench_line_extraction, bench_parse_suggestions, bench_browse_filter);

criterion_main!(benches);
