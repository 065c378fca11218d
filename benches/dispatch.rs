extern crate modscope;

use std::{cell::Cell, collections::BTreeSet, hint::black_box, rc::Rc};

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use modscope::{
    post_listener, pre_listener, EventFlags, Handler, ModificationHooks, ObservationConfig, Observed,
    StandardHooks,
};

const ELEMENTS: u64 = 10_000;

/// Cost of the decoration itself: adds to a plain `Vec` versus adds through a handler whose
/// hooks accept everything.
fn bench_add_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");
    group.throughput(Throughput::Elements(ELEMENTS));

    group.bench_function("plain_vec", |b| {
        b.iter(|| {
            let mut list = Vec::with_capacity(ELEMENTS as usize);
            for value in 0..ELEMENTS {
                list.push(black_box(value));
            }
            black_box(list)
        });
    });

    group.bench_function("accept_all", |b| {
        b.iter(|| {
            let mut list =
                Observed::with_handler(Vec::with_capacity(ELEMENTS as usize), Handler::<u64>::new())
                    .unwrap();
            for value in 0..ELEMENTS {
                list.add(black_box(value)).unwrap();
            }
            black_box(list.into_inner())
        });
    });
    group.finish();
}

/// Listener dispatch with masks: half of the registered listeners match the kind.
fn bench_listener_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("listeners");
    group.throughput(Throughput::Elements(ELEMENTS));

    for listeners in [1_usize, 8, 32] {
        group.bench_function(format!("{listeners}_listeners"), |b| {
            b.iter(|| {
                let hooks = Rc::new(StandardHooks::<u64>::with_config(ObservationConfig::default()));
                let seen = Rc::new(Cell::new(0_u64));
                for index in 0..listeners {
                    let mask = if index % 2 == 0 {
                        EventFlags::ADD_GROUP
                    } else {
                        EventFlags::REDUCE_GROUP
                    };
                    let counter = Rc::clone(&seen);
                    hooks.subscribe_pre(pre_listener(|_| true));
                    hooks
                        .add_post_listener(
                            post_listener(move |_| counter.set(counter.get() + 1)),
                            mask,
                        )
                        .unwrap();
                }
                let mut list = Observed::with_handler(Vec::<u64>::new(), Handler::with_hooks(hooks))
                    .unwrap();
                for value in 0..ELEMENTS {
                    list.add(black_box(value)).unwrap();
                }
                black_box(seen.get())
            });
        });
    }
    group.finish();
}

/// Events raised through nested views have to walk up to the root.
fn bench_view_forwarding(c: &mut Criterion) {
    let mut group = c.benchmark_group("views");
    group.throughput(Throughput::Elements(ELEMENTS));

    group.bench_function("sub_list_depth_3", |b| {
        b.iter(|| {
            let mut list = Observed::decorate(vec![0_u64; 16], None).unwrap();
            let mut outer = list.sub_list(2, 14).unwrap();
            let mut middle = outer.sub_list(2, 10).unwrap();
            let mut inner = middle.sub_list(2, 6).unwrap();
            for value in 0..ELEMENTS {
                inner.set(1, black_box(value)).unwrap();
            }
            black_box(inner.len())
        });
    });

    group.bench_function("sorted_view", |b| {
        b.iter(|| {
            let mut set = Observed::decorate(BTreeSet::<u64>::new(), None).unwrap();
            let mut view = set.sub_set(0, ELEMENTS).unwrap();
            for value in 0..ELEMENTS {
                view.add(black_box(value)).unwrap();
            }
            black_box(view.len())
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_add_overhead,
    bench_listener_dispatch,
    bench_view_forwarding
);
criterion_main!(benches);
