use formulary_rs::{evaluate, extract_variables, validate};
use std::collections::HashMap;

fn main() {
    pretty_env_logger::init();

    let formula = "Weight / (Height * Height)";
    let variables = extract_variables(formula).expect("Failed to tokenize");
    println!("Variables: {:?}", variables);
    println!("Valid: {}", validate(formula, &variables));

    let context: HashMap<String, f64> =
        [("Weight".to_string(), 70.0), ("Height".to_string(), 1.75)]
            .iter()
            .cloned()
            .collect();

    match evaluate(formula, &context) {
        Ok(result) => println!("Result: {}", result),
        Err(err) => println!("Error: {}", err),
    }

    for broken in ["Weight / 0", "sqrt(0 - Weight)", "Weight * Age", "(Weight"] {
        match evaluate(broken, &context) {
            Ok(result) => println!("{} = {}", broken, result),
            Err(err) => println!("{} failed with {}: {}", broken, err.kind(), err),
        }
    }
}
