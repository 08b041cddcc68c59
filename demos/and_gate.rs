use cgnet::{accuracy, Network, Topology, TrainConfig, TrainingSet};

fn main() -> cgnet::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // The AND gate as a two-class problem: column 0 = off, column 1 = on.
    let xs = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ];
    let ys = vec![
        vec![1.0, 0.0],
        vec![1.0, 0.0],
        vec![1.0, 0.0],
        vec![0.0, 1.0],
    ];
    let data = TrainingSet::from_rows(&xs, &ys)?;

    // 2 -> 2 -> 2 network, trained with the conjugate-gradient optimizer.
    let mut net = Network::with_seed(Topology::new(vec![2, 2, 2])?, 0);
    let report = net.train(
        &data,
        &TrainConfig {
            lambda: 0.0,
            max_iter: 50,
            verbose: true,
        },
    )?;

    println!("accepted line searches: {}", report.iterations);
    if let Some(cost) = report.final_cost {
        println!("final cost: {cost}");
    }

    let predictions = net.predict(data.x())?;
    println!("train accuracy: {}%", accuracy(&predictions, data.y()));
    for (x, p) in xs.iter().zip(predictions.rows()) {
        println!("x={x:?} and={}", p[1]);
    }

    Ok(())
}
