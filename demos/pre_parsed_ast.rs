use formulary_rs::{Bindings, Evaluator};

fn main() {
    pretty_env_logger::init();

    let evaluator = Evaluator::default();

    let expression = "(X - Mean) / StdDev";
    let ast = evaluator
        .parse_expression(expression)
        .expect("Failed to parse");
    println!("Variables: {:?}", ast.variables());

    for x in [55.0, 70.0, 85.0, 100.0] {
        let context = Bindings::from([
            ("X".to_string(), x),
            ("Mean".to_string(), 70.0),
            ("StdDev".to_string(), 10.0),
        ]);

        match evaluator.evaluate_ast(&ast, &context) {
            Ok(result) => println!("z({}) = {}", x, result),
            Err(err) => println!("Error: {}", err),
        }
    }
}
