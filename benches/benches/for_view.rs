// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_reflect` + `understory_for_view`.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::rc::Rc;

use understory_for_view::{
    BindingBuildContext, BuildContext, ConditionFactories, FnCondition, ForViewBuilder,
    ForViewCondition, ForViewSelector, SelectorOptions,
};
use understory_reflect::{ObjectType, PropertyDescriptor, PropertyProxy, object_ref};

struct Row {
    name: String,
    count: u32,
    tag: u32,
}

fn row_type() -> ObjectType {
    ObjectType::new::<Row>()
        .with(
            PropertyDescriptor::builder::<Row, String>("Name")
                .getter(|r| r.name.clone())
                .setter(|r, v| r.name = v)
                .build(),
        )
        .with(
            PropertyDescriptor::builder::<Row, u32>("Count")
                .getter(|r| r.count)
                .build(),
        )
        .with(
            PropertyDescriptor::builder::<Row, u32>("Tag")
                .getter(|r| r.tag)
                .annotate(ForViewCondition::new("tag"))
                .build(),
        )
}

fn proxies() -> Vec<PropertyProxy> {
    let target = object_ref(Row {
        name: "row".into(),
        count: 1,
        tag: 2,
    });
    row_type().proxies(&target).expect("descriptors match the target")
}

/// `n` conditions that never accept, then one that accepts `Count`.
fn builder(n: u32) -> ForViewBuilder<u32, BuildContext> {
    let mut factories = ConditionFactories::new();
    factories.register("tag", || {
        FnCondition::new(|_: &BuildContext| false, |_| Ok(u32::MAX))
    });
    let mut builder = ForViewBuilder::with_factories(Rc::new(factories));
    for i in 0..n {
        builder.add(FnCondition::new(|_: &BuildContext| false, move |_| Ok(i)).with_order(i as i32));
    }
    builder.add(
        FnCondition::new(|c: &BuildContext| c.proxy().name() == "Count", move |_| Ok(n))
            .with_order(n as i32),
    );
    builder
}

fn bench_resolve(c: &mut Criterion) {
    let proxies = proxies();
    let name = BuildContext::new(proxies[0].clone());
    let count = BuildContext::new(proxies[1].clone());
    let tag = BuildContext::new(proxies[2].clone());

    let mut group = c.benchmark_group("for_view/resolve");

    for n in [0_u32, 8, 64] {
        let builder = builder(n);
        group.bench_function(BenchmarkId::new("match_last", n), |b| {
            b.iter(|| black_box(builder.resolve(&count, false)))
        });
        group.bench_function(BenchmarkId::new("no_match", n), |b| {
            b.iter(|| black_box(builder.resolve(&name, false)))
        });
        group.bench_function(BenchmarkId::new("attribute_fallback", n), |b| {
            b.iter(|| black_box(builder.resolve(&tag, true)))
        });
    }

    group.finish();

    let mut group = c.benchmark_group("for_view/selector");

    let mut selector_builder = ForViewBuilder::<&'static str, BindingBuildContext>::new();
    selector_builder.add(FnCondition::new(
        |c: &BindingBuildContext| c.proxy().value_type().is_numeric(),
        |_| Ok("spinner"),
    ));
    let selector = ForViewSelector::new(Rc::new(selector_builder))
        .with_options(SelectorOptions::default().force_attribute_fallback(true));

    group.bench_function("generate", |b| {
        b.iter_batched(
            || proxies.clone(),
            |proxies| black_box(selector.generate(proxies)),
            BatchSize::SmallInput,
        )
    });

    group.finish();

    let mut group = c.benchmark_group("for_view/proxy");

    group.bench_function("get", |b| {
        b.iter(|| black_box(proxies[1].get::<u32>()))
    });

    group.bench_function("set_string", |b| {
        b.iter(|| black_box(proxies[0].set(String::from("renamed"))))
    });

    group.finish();
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
