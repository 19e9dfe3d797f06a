use arbitrary::{Arbitrary, Unstructured};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use depthbook::{
    book::{
        btree_book::{BTreeBook, Metadata},
        Book,
    },
    order::PlainOrder,
};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

const SAMPLE_SECS: u64 = 5;
const BUFLEN: usize = 256;

fn make_orders(n: usize) -> Vec<PlainOrder> {
    let mut rng = StdRng::seed_from_u64(42); // Deterministic RNG for reproducibility
    (0..n)
        .map(|i| {
            let mut bytes = vec![0u8; BUFLEN];
            rng.fill_bytes(&mut bytes);
            let mut unstructured = Unstructured::new(&bytes);
            let mut order = PlainOrder::arbitrary(&mut unstructured)
                .expect("Failed to generate instance");
            order.id = i as u128; // Identities must be unique while active
            order.price = rng.gen_range(10.0..100.0); // Set realistic price ranges
            order.quantity = rng.gen_range(1..1_000);
            order
        })
        .collect()
}

fn mock_book() -> BTreeBook<PlainOrder> {
    BTreeBook::meta(Metadata {
        id: 1,
        name: "Benchmark Book".to_string(),
        ticker: "BENCH".to_string(),
    })
}

fn insert_into_book(orders: &[PlainOrder], book: &mut BTreeBook<PlainOrder>) {
    orders.iter().for_each(|x| {
        book.place(x.clone()).expect("valid order");
    });
}

fn benchmark_insert(c: &mut Criterion) {
    for n in [1_000, 10_000] {
        let orders = make_orders(black_box(n));

        c.bench_function(&format!("insert {n}"), |b| {
            b.iter(|| {
                let mut book = mock_book();
                insert_into_book(&orders, &mut book)
            })
        });
    }
}

fn benchmark_insert_cancel(c: &mut Criterion) {
    let orders = make_orders(black_box(10_000));

    c.bench_function("insert then cancel 10000", |b| {
        b.iter(|| {
            let mut book = mock_book();
            insert_into_book(&orders, &mut book);
            orders.iter().for_each(|x| {
                book.cancel(x.id).expect("resting order");
            });
        })
    });
}

fn benchmark_depth(c: &mut Criterion) {
    let orders = make_orders(black_box(10_000));
    let mut book = mock_book();
    insert_into_book(&orders, &mut book);

    c.bench_function("market depth 10000", |b| {
        b.iter(|| black_box(book.market_depth()))
    });
}

fn configure_criterion() -> Criterion {
    Criterion::default()
        .measurement_time(std::time::Duration::from_secs(SAMPLE_SECS))
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets = benchmark_insert, benchmark_insert_cancel, benchmark_depth,
}
criterion_main!(benches);
