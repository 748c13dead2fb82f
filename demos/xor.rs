use rand::{rngs::StdRng, SeedableRng};

use ferrite_grad::{backprop, cost, dataset, GradientDescent, Network};

fn main() -> ferrite_grad::Result<()> {
    let ds = dataset::xor()?;

    let mut network = Network::build(&[2, 2, 1])?;
    let mut grad = Network::build(&[2, 2, 1])?;
    network.randomize(&mut StdRng::seed_from_u64(42), 0.0, 1.0);

    let optimizer = GradientDescent::new(1.0);
    let steps = 10_000;

    for step in 0..steps {
        backprop(&mut network, &mut grad, ds.inputs(), ds.targets())?;
        optimizer.step(&mut network, &grad);
        if step % 1000 == 0 {
            println!("Step {step}: cost = {:.6}", cost(&mut network, ds.inputs(), ds.targets())?);
        }
    }

    print!("nn = {network}");
    for i in 0..ds.len() {
        let input = ds.inputs().row(i);
        let (x, y) = (input.at(0, 0), input.at(0, 1));
        let out = network.predict(input)?.at(0, 0);
        println!("{x} ^ {y} = {out:.4}");
    }

    Ok(())
}
