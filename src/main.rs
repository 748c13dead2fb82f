// Trains a network to add two 2-bit numbers, printing progress as JSON
// lines, then checks every sum.
use std::sync::mpsc;
use std::thread;

use rand::{rngs::StdRng, SeedableRng};

use ferrite_grad::{dataset, train_loop, Network, Result, TrainConfig};

const BITS: usize = 2;

fn main() -> Result<()> {
    let ds = dataset::adder(BITS)?;

    let arch = [2 * BITS, 2 * BITS + 1, BITS + 1];
    let mut net = Network::build(&arch)?;
    let mut grad = Network::build(&arch)?;
    net.randomize(&mut StdRng::seed_from_u64(69), 0.0, 1.0);

    let (tx, rx) = mpsc::channel();
    let printer = thread::spawn(move || {
        for stats in rx {
            match serde_json::to_string(&stats) {
                Ok(line) => println!("{line}"),
                Err(e) => eprintln!("failed to encode progress: {e}"),
            }
        }
    });

    let config = TrainConfig::new(5_000, 1.0)
        .with_report_every(500)
        .with_progress(tx);
    let cost = train_loop(&mut net, &mut grad, ds.inputs(), ds.targets(), &config)?;
    drop(config);
    let _ = printer.join();
    println!("final cost = {cost:.6}");

    let n = 1usize << BITS;
    let mut fails = 0;
    for x in 0..n {
        for y in 0..n {
            let z = x + y;
            for j in 0..BITS {
                net.input_mut().set(0, j, ((x >> j) & 1) as f64);
                net.input_mut().set(0, j + BITS, ((y >> j) & 1) as f64);
            }
            net.forward();

            let out = net.output();
            if out.at(0, BITS) > 0.5 {
                if z < n {
                    println!("{x} + {y} = (OVERFLOW <> {z})");
                    fails += 1;
                }
                continue;
            }

            let got = (0..BITS).fold(0, |acc, j| acc | (((out.at(0, j) > 0.5) as usize) << j));
            if got != z {
                println!("{x} + {y} = (OVERFLOW | {got} <> {z})");
                fails += 1;
            } else {
                println!("{x} + {y} = {got}");
            }
        }
    }

    if fails == 0 {
        println!("OK");
    }

    Ok(())
}
