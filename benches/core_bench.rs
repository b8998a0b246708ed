//! Benchmarks for recipe2unit core operations.
//!
//! Run with: cargo bench
//!
//! Results include 95% confidence intervals via Criterion.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use recipe2unit::core::normalize::lowercase_keys;
use recipe2unit::core::parser::parse_recipe;
use recipe2unit::core::unit::{generate, GenerateOptions, ManifestPolicy};
use std::path::PathBuf;

fn recipe_yaml(deps: usize, manifests: usize) -> String {
    let mut yaml = String::from(
        "RecipeFormatVersion: \"2020-01-25\"\nComponentName: bench\nComponentDescription: Bench component\nComponentDependencies:\n",
    );
    for i in 0..deps {
        let kind = if i % 2 == 0 { "HARD" } else { "SOFT" };
        yaml.push_str(&format!(
            "  dep{i}:\n    VersionRequirement: \">=1.0.0\"\n    DependencyType: {kind}\n"
        ));
    }
    yaml.push_str("Manifests:\n");
    for i in 0..manifests {
        let os = if i % 3 == 0 { "windows" } else { "linux" };
        yaml.push_str(&format!(
            "  - Platform:\n      OS: {os}\n    Lifecycle:\n      Install: make install\n      Run:\n        Script: ./run-{i}\n        RequiresPrivilege: true\n"
        ));
    }
    yaml
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("lowercase_keys");
    for deps in [4, 64, 512] {
        let value: serde_yaml_ng::Value = serde_yaml_ng::from_str(&recipe_yaml(deps, 4)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(deps), &value, |b, value| {
            b.iter(|| black_box(lowercase_keys(black_box(value.clone()))));
        });
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let yaml = recipe_yaml(16, 4);
    c.bench_function("parse_recipe", |b| {
        b.iter(|| black_box(parse_recipe(black_box(&yaml)).unwrap()));
    });
}

fn bench_generate(c: &mut Criterion) {
    let opts = GenerateOptions {
        runner_path: PathBuf::from("/usr/bin/recipe-runner"),
        script_dir: PathBuf::from("/var/lib/ggl"),
        manifest_policy: ManifestPolicy::LastWins,
    };
    let mut group = c.benchmark_group("generate");
    for manifests in [1, 8, 64] {
        let recipe = parse_recipe(&recipe_yaml(16, manifests)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(manifests), &recipe, |b, recipe| {
            b.iter(|| black_box(generate(black_box(recipe), &opts).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_normalize, bench_parse, bench_generate);
criterion_main!(benches);
