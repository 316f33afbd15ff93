use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hostcall_engine::{create_registry, VmHandle};
use hostcall_sdk::{Arity, CallFrame, DynamicValue, NativeFn, StackFrame};

fn bench_typed_add(c: &mut Criterion) {
    let session = create_registry(VmHandle::new(1));
    session.expose_typed("add", |a: f64, b: f64| a + b).unwrap();

    c.bench_function("call_typed_add", |b| {
        b.iter(|| {
            let mut frame = StackFrame::with_args([2.0, 3.0]);
            session.call(black_box("add"), &mut frame)
        });
    });

    c.bench_function("resolve_add", |b| {
        b.iter(|| session.resolve(black_box("add")));
    });
}

fn bench_failures(c: &mut Criterion) {
    let session = create_registry(VmHandle::new(1));
    session.expose_typed("add", |a: f64, b: f64| a + b).unwrap();

    let mut group = c.benchmark_group("failures");
    group.bench_function("arity_mismatch", |b| {
        b.iter(|| {
            let mut frame = StackFrame::with_args([2.0]);
            session.call(black_box("add"), &mut frame)
        });
    });
    group.bench_function("type_mismatch", |b| {
        b.iter(|| {
            let mut frame = StackFrame::with_args([DynamicValue::from("x"), DynamicValue::from(1.0)]);
            session.call(black_box("add"), &mut frame)
        });
    });
    group.bench_function("unknown_name", |b| {
        b.iter(|| {
            let mut frame = StackFrame::default();
            session.call(black_box("missing"), &mut frame)
        });
    });
    group.finish();
}

fn bench_variadic(c: &mut Criterion) {
    let session = create_registry(VmHandle::new(1));
    session
        .expose(
            "sum",
            Arity::Variadic,
            NativeFn::new(|frame: &CallFrame<'_>| {
                (0..frame.argument_count())
                    .filter_map(|i| frame.argument(i).and_then(|v| v.as_number()))
                    .sum::<f64>()
            }),
        )
        .unwrap();

    let mut group = c.benchmark_group("variadic_sum");
    for count in [1usize, 8, 64] {
        let args = vec![DynamicValue::Number(1.0); count];
        group.bench_with_input(BenchmarkId::from_parameter(count), &args, |b, args| {
            b.iter(|| {
                let mut frame = StackFrame::new(args.clone());
                session.call("sum", &mut frame)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_typed_add, bench_failures, bench_variadic);
criterion_main!(benches);
