// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use chess3d::core::{self, Color};
use chess3d::{movegen, notation, Position};

const KIWIPETE: &str = concat!(
    "r___k__r", "p_ppqpb_", "bn__pnp_", "___PN___", "_p__P___", "__N__Q_p", "PPPBBPPP", "R___K__R",
);

const SCHOLARS_MATE: &str = "1. e4 e5 2. Bc4 Nc6 3. Qh5 Nf6 4. Qxf7#";

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("quiet-move-apply", |b| {
        let pos = Position::standard();
        b.iter(|| {
            black_box(&pos)
                .apply_move(black_box(core::G1), black_box(core::F3), None)
                .unwrap()
        });
    });

    c.bench_function("kiwipete-legal-table", |b| {
        let pos = Position::from_setup(KIWIPETE).unwrap();
        let board = pos.board();
        let black_attacks = pos.attack_set(Color::Black);
        b.iter(|| movegen::legal_table(black_box(board), 1, Color::White, black_attacks));
    });

    c.bench_function("kiwipete-attack-table", |b| {
        let pos = Position::from_setup(KIWIPETE).unwrap();
        let placement = pos.placement();
        b.iter(|| movegen::attack_table(black_box(&placement), Color::Black));
    });

    c.bench_function("scholars-mate-replay", |b| {
        let pos = Position::standard();
        b.iter(|| notation::decode_str(black_box(&pos), black_box(SCHOLARS_MATE)).unwrap());
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
