//! Ready-made calculator templates offered to new users.
//!
//! Date calculators work on plain day counts (days since 2000-01-01); there is
//! no date type in a formula.

use crate::calculator::{CalculatorTemplate, InputField};

fn template(name: &str, description: &str, inputs: Vec<InputField>, formula: &str) -> CalculatorTemplate {
    CalculatorTemplate {
        name: name.to_string(),
        description: Some(description.to_string()),
        inputs,
        formula: formula.to_string(),
    }
}

pub fn templates() -> Vec<CalculatorTemplate> {
    vec![
        template(
            "Loan Installment Calculator",
            "Calculate monthly payment for a loan based on principal, interest rate, and term.",
            vec![
                InputField::new("principal", "Principal", "Loan amount"),
                InputField::new("rate", "Rate", "Annual interest rate (%)"),
                InputField::new("term", "Term", "Loan term in years"),
            ],
            "(Principal * (Rate / 100 / 12) * pow((1 + Rate / 100 / 12), Term * 12)) / (pow((1 + Rate / 100 / 12), Term * 12) - 1)",
        ),
        template(
            "BMI Calculator",
            "Calculate Body Mass Index based on weight and height.",
            vec![
                InputField::new("weight", "Weight", "Weight in kg"),
                InputField::new("height", "Height", "Height in meters"),
            ],
            "Weight / (Height * Height)",
        ),
        template(
            "Z-score Calculator",
            "Calculate the standard score (z-score) of a data point.",
            vec![
                InputField::new("x", "X", "Data point value"),
                InputField::new("mean", "Mean", "Population mean"),
                InputField::new("stdDev", "StdDev", "Population standard deviation"),
            ],
            "(X - Mean) / StdDev",
        ),
        template(
            "Gas Mileage Calculator",
            "Calculate miles per gallon (MPG) for a vehicle.",
            vec![
                InputField::new("miles", "Miles", "Distance traveled in miles"),
                InputField::new("gallons", "Gallons", "Gallons of fuel used"),
            ],
            "Miles / Gallons",
        ),
        template(
            "BTU Calculator",
            "Calculate BTUs needed to heat a room based on size and insulation.",
            vec![
                InputField::new("sqft", "SqFt", "Room size in square feet"),
                InputField::new("height", "Height", "Ceiling height in feet"),
                InputField::new("factor", "Factor", "Insulation factor (20-30)"),
            ],
            "SqFt * Height * Factor",
        ),
        template(
            "Days Between Dates Calculator",
            "Calculate the number of days between two dates (enter days since Jan 1, 2000).",
            vec![
                InputField::new("date1", "Date1", "First date (days since Jan 1, 2000)"),
                InputField::new("date2", "Date2", "Second date (days since Jan 1, 2000)"),
            ],
            "abs(Date2 - Date1)",
        ),
        template(
            "Date Addition Calculator",
            "Add days to a date (enter base date as days since Jan 1, 2000).",
            vec![
                InputField::new("baseDate", "BaseDate", "Base date (days since Jan 1, 2000)"),
                InputField::new("daysToAdd", "DaysToAdd", "Days to add"),
            ],
            "BaseDate + DaysToAdd",
        ),
        template(
            "Circle Area Calculator",
            "Calculate the area of a circle based on radius.",
            vec![InputField::new("radius", "Radius", "Radius of the circle")],
            "3.14159 * Radius * Radius",
        ),
        template(
            "Cube Volume Calculator",
            "Calculate the volume of a cube based on side length.",
            vec![InputField::new("side", "Side", "Length of cube side")],
            "Side * Side * Side",
        ),
        template(
            "Cylinder Volume Calculator",
            "Calculate the volume of a cylinder based on radius and height.",
            vec![
                InputField::new("radius", "Radius", "Radius of the cylinder"),
                InputField::new("height", "Height", "Height of the cylinder"),
            ],
            "3.14159 * Radius * Radius * Height",
        ),
    ]
}
