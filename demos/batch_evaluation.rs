use formulary_rs::{Bindings, EngineConfig, Evaluator};

fn main() {
    pretty_env_logger::init();

    let evaluator = Evaluator::new(EngineConfig::default().with_cache_capacity(16));

    let contexts: Vec<Bindings> = (1..=5)
        .map(|gallons| {
            Bindings::from([
                ("Miles".to_string(), 300.0),
                ("Gallons".to_string(), (gallons as f64 - 1.0) * 4.0),
            ])
        })
        .collect();

    let results = evaluator
        .evaluate_batch("Miles / Gallons", &contexts)
        .expect("Failed to parse");

    for (i, result) in results.iter().enumerate() {
        match result {
            Ok(mpg) => println!("Result {}: {:.2} mpg", i, mpg),
            Err(err) => println!("Result {}: {}", i, err),
        }
    }
}
