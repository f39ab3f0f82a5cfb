
use predicate_rules::{rule, Context, Rule};
use proptest::prelude::*;
use strategies::{arb_context, arb_rule};

fn eval(rule: &Rule, ctx: &Context) -> bool {
    rule.evaluate(ctx).expect("generated rules never fail")
}

// ---------------------------------------------------------------------------
// Combinators map onto boolean operators
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn and_matches_boolean_and(a in arb_rule(), b in arb_rule(), ctx in arb_context()) {
        let expected = eval(&a, &ctx) && eval(&b, &ctx);
        prop_assert_eq!(eval(&(a & b), &ctx), expected);
    }

    #[test]
    fn or_matches_boolean_or(a in arb_rule(), b in arb_rule(), ctx in arb_context()) {
        let expected = eval(&a, &ctx) || eval(&b, &ctx);
        prop_assert_eq!(eval(&(a | b), &ctx), expected);
    }

    #[test]
    fn not_matches_boolean_not(a in arb_rule(), ctx in arb_context()) {
        let expected = !eval(&a, &ctx);
        prop_assert_eq!(eval(&!a, &ctx), expected);
    }

    #[test]
    fn double_negation(a in arb_rule(), ctx in arb_context()) {
        prop_assert_eq!(eval(&!!a.clone(), &ctx), eval(&a, &ctx));
    }

    #[test]
    fn builder_ands_children(a in arb_rule(), b in arb_rule(), ctx in arb_context()) {
        let built = rule!(a.clone(), b.clone());
        prop_assert_eq!(eval(&built, &ctx), eval(&(a & b), &ctx));
    }
}

// ---------------------------------------------------------------------------
// Algebraic laws hold on results, regardless of tree shape
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn and_is_commutative(a in arb_rule(), b in arb_rule(), ctx in arb_context()) {
        prop_assert_eq!(eval(&(&a & &b), &ctx), eval(&(&b & &a), &ctx));
    }

    #[test]
    fn or_is_commutative(a in arb_rule(), b in arb_rule(), ctx in arb_context()) {
        prop_assert_eq!(eval(&(&a | &b), &ctx), eval(&(&b | &a), &ctx));
    }

    #[test]
    fn and_is_associative(
        a in arb_rule(),
        b in arb_rule(),
        c in arb_rule(),
        ctx in arb_context(),
    ) {
        let left = (&a & &b) & c.clone();
        let right = a & (b & c);
        prop_assert_eq!(eval(&left, &ctx), eval(&right, &ctx));
    }

    #[test]
    fn or_is_associative(
        a in arb_rule(),
        b in arb_rule(),
        c in arb_rule(),
        ctx in arb_context(),
    ) {
        let left = (&a | &b) | c.clone();
        let right = a | (b | c);
        prop_assert_eq!(eval(&left, &ctx), eval(&right, &ctx));
    }

    #[test]
    fn de_morgan(a in arb_rule(), b in arb_rule(), ctx in arb_context()) {
        let left = !(&a & &b);
        let right = !a | !b;
        prop_assert_eq!(eval(&left, &ctx), eval(&right, &ctx));
    }

    #[test]
    fn empty_rule_is_and_identity(a in arb_rule(), ctx in arb_context()) {
        prop_assert!(eval(&Rule::new(), &ctx));
        prop_assert_eq!(eval(&(Rule::new() & a.clone()), &ctx), eval(&a, &ctx));
    }

    #[test]
    fn evaluation_is_repeatable(a in arb_rule(), ctx in arb_context()) {
        let first = eval(&a, &ctx);
        for _ in 0..5 {
            prop_assert_eq!(eval(&a, &ctx), first);
        }
    }

    #[test]
    fn single_child_build_is_transparent(a in arb_rule(), ctx in arb_context()) {
        let wrapped = Rule::builder().rule(a.clone()).build();
        prop_assert_eq!(wrapped.to_string(), a.to_string());
        prop_assert_eq!(eval(&wrapped, &ctx), eval(&a, &ctx));
    }
}
