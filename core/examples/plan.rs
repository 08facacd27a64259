// SPDX-FileCopyrightText: © 2023 Foundation Devices, Inc. <hello@foundationdevices.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use plate_core::{is_recoverable, plan_fragments, Key, OutputDescriptor};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let m: u8 = args
        .next()
        .unwrap_or_else(|| "2".into())
        .parse()
        .expect("M must be a small integer");
    let n: u8 = args
        .next()
        .unwrap_or_else(|| "4".into())
        .parse()
        .expect("N must be a small integer");

    let keys = (0..n).map(|i| Key::new(vec![i; 33])).collect();
    let desc = OutputDescriptor::new(m, keys, "Example Wallet");

    println!("planning {m}-of-{n}");
    for key_idx in 0..n {
        let fragments = plan_fragments(&desc, key_idx);
        println!("plate {key_idx}:");
        for fragment in &fragments {
            println!("  {fragment}");
        }
    }

    match is_recoverable(&desc) {
        Ok(true) => println!("every {m}-of-{n} coalition recovers the descriptor"),
        Ok(false) => {
            println!("some coalition failed to recover the descriptor");
            std::process::exit(1);
        }
        Err(e) => {
            println!("{e}");
            std::process::exit(1);
        }
    }
}
