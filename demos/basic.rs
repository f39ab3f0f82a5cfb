use predicate_rules::{predicate, rule, Context};

fn main() {
    // Define rules
    let solvent = rule!(credit_rating__gte = 50, flood_risk__lt = 10);
    let large = rule!(revenue__gt = 1_000_000);
    let not_sanctioned = !rule!(country__in = vec!["XX", "YY"]);
    let named = rule!(name__func = predicate(|v| v.as_str().is_some_and(|s| !s.trim().is_empty())));

    let insurable = rule!(solvent | large, not_sanctioned, named);
    println!("{insurable}");

    // Evaluate against a context
    let ctx = Context::new()
        .set("name", "Riverside Bakery")
        .set("credit_rating", 40_i64)
        .set("flood_risk", 15_i64)
        .set("revenue", 1_500_000_i64)
        .set("country", "NL");

    match insurable.evaluate(&ctx) {
        Ok(result) => println!("Result: {result}"),
        Err(err) => println!("Evaluation failed: {err}"),
    }
}
