//! Benchmarks for parameter validation on the admission path.
//!
//! Every admission builds the merged parameter schema and validates the
//! request against it, so this measures the per-request cost of both steps
//! for a typical action and for an action with a wide parameter list.

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};

use runway_admission::{check_overrides, parameter_schema, validate_parameters};
use runway_core::{ActionDefinition, ParameterDecl, ParameterMap, RunnerTypeDefinition};

fn local_runner() -> RunnerTypeDefinition {
    RunnerTypeDefinition::new("run-local")
        .with_parameter("cmd", ParameterDecl::typed("string").required())
        .with_parameter("timeout", ParameterDecl::typed("integer").with_default(json!(60)))
        .with_parameter(
            "sudo",
            ParameterDecl::typed("boolean")
                .immutable()
                .with_default(json!(false)),
        )
        .with_parameter("env", ParameterDecl::typed("object"))
}

/// Action declaring `width` extra string parameters on top of the runner's.
fn wide_action(width: usize) -> ActionDefinition {
    (0..width).fold(
        ActionDefinition::new("core", "wide", "run-local"),
        |action, i| {
            action.with_parameter(
                &format!("arg_{}", i),
                ParameterDecl::typed("string").with_keyword("maxLength", json!(64)),
            )
        },
    )
}

fn wide_parameters(width: usize) -> ParameterMap {
    let mut params = ParameterMap::new();
    params.insert("cmd".to_string(), json!("uname -a"));
    for i in 0..width {
        params.insert(format!("arg_{}", i), Value::String(format!("value {}", i)));
    }
    params
}

fn bench_parameter_schema(c: &mut Criterion) {
    let runner = local_runner();
    let small = wide_action(2);
    let large = wide_action(50);

    let mut group = c.benchmark_group("parameter_schema");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("merge_6_params", |b| {
        b.iter(|| parameter_schema(black_box(&small), black_box(&runner)))
    });

    group.bench_function("merge_54_params", |b| {
        b.iter(|| parameter_schema(black_box(&large), black_box(&runner)))
    });

    group.finish();
}

fn bench_validate_parameters(c: &mut Criterion) {
    let runner = local_runner();
    let small = wide_action(2);
    let large = wide_action(50);
    let small_params = wide_parameters(2);
    let large_params = wide_parameters(50);

    let mut invalid_params = wide_parameters(2);
    invalid_params.insert("timeout".to_string(), json!("soon"));
    invalid_params.insert("colour".to_string(), json!("red"));

    let mut group = c.benchmark_group("validate_parameters");
    group.sample_size(200);
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("valid_small", |b| {
        b.iter(|| validate_parameters(&small, &runner, black_box(&small_params)))
    });

    group.bench_function("valid_large", |b| {
        b.iter(|| validate_parameters(&large, &runner, black_box(&large_params)))
    });

    // Collecting every violation is the slow path
    group.bench_function("invalid_small", |b| {
        b.iter(|| validate_parameters(&small, &runner, black_box(&invalid_params)))
    });

    group.bench_function("immutability_check", |b| {
        b.iter(|| check_overrides(&large, &runner, black_box(&large_params)))
    });

    group.finish();
}

criterion_group!(benches, bench_parameter_schema, bench_validate_parameters);
criterion_main!(benches);
