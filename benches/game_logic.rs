use criterion::{black_box, criterion_group, criterion_main, Criterion};
use memory_match::core::deck;
use memory_match::core::{DeckRng, Session, TimerKind};
use memory_match::types::{CardCount, GameConfig, GameMode, Item};

fn items(n: usize) -> Vec<Item> {
    (0..n)
        .map(|i| Item::new(format!("h{i}"), format!("Style {i}"), format!("img://{i}")))
        .collect()
}

fn bench_shuffle(c: &mut Criterion) {
    let mut rng = DeckRng::new(12345);
    let mut cards: Vec<usize> = (0..16).collect();

    c.bench_function("shuffle_16", |b| {
        b.iter(|| {
            rng.shuffle(black_box(&mut cards));
        })
    });
}

fn bench_deal(c: &mut Criterion) {
    let items = items(8);
    let mut rng = DeckRng::new(12345);

    c.bench_function("deal_16_cards", |b| {
        b.iter(|| deck::deal(black_box(&items), &mut rng))
    });
}

fn bench_flip_resolution(c: &mut Criterion) {
    let items = items(8);

    c.bench_function("clear_board_16", |b| {
        b.iter(|| {
            let mut session = Session::new(GameConfig::new(GameMode::Classic, CardCount::Sixteen));
            session.deal(items.clone(), &mut DeckRng::new(7), 0);
            // Naive pairing scan: flip each hidden card against every later one.
            let n = session.cards().len();
            for i in 0..n {
                for j in (i + 1)..n {
                    if !session.cards()[i].is_hidden() {
                        break;
                    }
                    if !session.cards()[j].is_hidden() {
                        continue;
                    }
                    session.flip(i, 0);
                    session.flip(j, 0);
                    if let Some(token) = session.armed_token(TimerKind::FlipBack) {
                        session.fire(token, 1_000);
                    }
                }
            }
            black_box(session.score())
        })
    });
}

criterion_group!(benches, bench_shuffle, bench_deal, bench_flip_resolution);
criterion_main!(benches);
