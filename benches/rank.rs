use criterion::{black_box, criterion_group, criterion_main, Criterion};
use orphalink::*;
use std::collections::HashSet;

fn ranking_lines(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| format!("chr{}\t{}\t0.{}", i % 22 + 1, i * 100, i))
        .collect()
}

fn bench_get_rank(c: &mut Criterion) {
    let ranking = ranking_lines(50_000);
    let target = vec!["7\t4999900\t.\tA\tG\t.\tPASS\t.\tGT\t0/1".to_string()];

    c.bench_function("get_rank 50k lines", |b| {
        b.iter(|| get_rank(black_box(&target), black_box(&ranking)))
    });
}

fn bench_resolve_index(c: &mut Criterion) {
    let mut index = CrossReferenceIndex::new();
    let mut annotated = HashSet::new();
    let mut entries = Vec::new();

    for i in 0..10_000 {
        let record = index.get_or_create(&i.to_string());
        record.phenotype_ids.push(format!("{}", 100_000 + i));
        record.genotype_ids.push(format!("{}", 600_000 + i));
        record.inheritance_patterns.push(if i % 2 == 0 {
            InheritancePattern::AutosomalDominant
        } else {
            InheritancePattern::AutosomalRecessive
        });

        if i % 3 != 0 {
            annotated.insert(format!("{}", 100_000 + i));
        }
        if i % 5 != 0 {
            entries.push(MutationEntry {
                chromosome: "1".to_string(),
                locus: i.to_string(),
                disease_id: format!("{}", 600_000 + i),
            });
        }
    }
    let mutations = ReverseMutationIndex::from_entries(&entries);
    let config = ResolutionConfig::with_inheritance([InheritancePattern::AutosomalDominant]);

    c.bench_function("resolve_index 10k records", |b| {
        b.iter(|| resolve_index(black_box(&index), &annotated, &mutations, &config))
    });
}

criterion_group!(benches, bench_get_rank, bench_resolve_index);
criterion_main!(benches);
