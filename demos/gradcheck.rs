// Prints finite-difference and backprop gradients side by side for a small
// network on the XOR table.
use rand::{rngs::StdRng, SeedableRng};

use ferrite_grad::{backprop, dataset, fdiff, Network};

fn main() -> ferrite_grad::Result<()> {
    let ds = dataset::xor()?;
    let arch = [2, 2, 1];

    let mut network = Network::build(&arch)?;
    network.randomize(&mut StdRng::seed_from_u64(7), 0.0, 1.0);

    let mut fd = Network::build(&arch)?;
    let mut bp = Network::build(&arch)?;
    fdiff(&mut network, &mut fd, 1e-3, ds.inputs(), ds.targets())?;
    backprop(&mut network, &mut bp, ds.inputs(), ds.targets())?;

    let mut worst: f64 = 0.0;
    for l in 0..network.layer_count() {
        for (name, f, b) in [
            ("w", fd.weights(l), bp.weights(l)),
            ("b", fd.biases(l), bp.biases(l)),
        ] {
            for j in 0..f.rows() {
                for k in 0..f.cols() {
                    let (gf, gb) = (f.at(j, k), b.at(j, k));
                    worst = worst.max((gf - gb).abs());
                    println!("{name}{l}[{j},{k}]  fdiff={gf:+.6}  backprop={gb:+.6}");
                }
            }
        }
    }
    println!("max |fdiff - backprop| = {worst:.2e}");

    Ok(())
}
