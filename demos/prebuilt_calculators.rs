use formulary_rs::prebuilt::templates;
use formulary_rs::{Calculator, Evaluator};
use std::collections::HashMap;

fn main() {
    pretty_env_logger::init();

    let evaluator = Evaluator::default();

    for (id, template) in templates().into_iter().enumerate() {
        let calculator = Calculator::from_template(template, format!("prebuilt-{}", id), 0);
        let issues = calculator.check();
        println!(
            "{} [{}] {}",
            calculator.name,
            calculator.input_names().join(", "),
            if issues.is_empty() { "ok" } else { "invalid" }
        );
    }

    let loan = templates()
        .into_iter()
        .next()
        .map(|template| Calculator::from_template(template, "loan", 0))
        .expect("No prebuilt calculators");
    let values: HashMap<String, String> = [("principal", "200000"), ("rate", "6"), ("term", "30")]
        .iter()
        .map(|(id, value)| (id.to_string(), value.to_string()))
        .collect();

    match loan.calculate(&evaluator, &values) {
        Ok(payment) => println!("Monthly payment: {:.2}", payment),
        Err(err) => println!("Calculation error: {}", err),
    }
}
