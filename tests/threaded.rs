use std::sync::Arc;
use std::thread;

use predicate_rules::{rule, Condition, Context, Registry, Rule};

#[test]
fn evaluate_across_threads() {
    let eligible = rule!(age__gte = 18) & rule!(status = "active");
    let allowed = Arc::new(eligible & !rule!(banned = true));

    let contexts = vec![
        (Context::new().set("age", 25_i64).set("status", "active").set("banned", false), true),
        (Context::new().set("age", 30_i64).set("status", "active").set("banned", true), false),
        (Context::new().set("age", 15_i64).set("status", "active").set("banned", false), false),
        (Context::new().set("age", 25_i64).set("status", "inactive").set("banned", false), false),
    ];

    let handles: Vec<_> = contexts
        .into_iter()
        .map(|(ctx, expected)| {
            let rule = Arc::clone(&allowed);
            thread::spawn(move || (rule.evaluate(&ctx).unwrap(), expected))
        })
        .collect();

    for handle in handles {
        let (actual, expected) = handle.join().unwrap();
        assert_eq!(actual, expected);
    }
}

#[test]
fn shared_registry_across_threads() {
    let mut registry = Registry::new();
    registry.register("len_gte", |actual, expected| match (actual, expected) {
        (predicate_rules::Value::String(s), predicate_rules::Value::Int(n)) => {
            i64::try_from(s.chars().count()).is_ok_and(|len| len >= *n)
        }
        _ => false,
    });
    let registry = Arc::new(registry);
    let rule = Arc::new(Rule::leaf(vec![Condition::new("password", "len_gte", 12_i64)]));

    let handles: Vec<_> = ["short", "correct-horse-battery"]
        .into_iter()
        .map(|password| {
            let registry = Arc::clone(&registry);
            let rule = Arc::clone(&rule);
            thread::spawn(move || {
                let ctx = Context::new().set("password", password);
                rule.evaluate_with(registry.as_ref(), &ctx).unwrap()
            })
        })
        .collect();

    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![false, true]);
}
