//! Builtin function semantics through the public engine facade.

use formic::api::Engine;
use formic::context::ResolutionContext;
use formic::types::ExprType;
use pretty_assertions::assert_eq;

fn compile(source: &str) -> formic::api::Expression {
    Engine::default()
        .compile(source, &ResolutionContext::builder().build())
        .expect("should compile")
}

fn eval_numeric(source: &str) -> f64 {
    compile(source).evaluate_numerical().expect("should evaluate")
}

#[test]
fn rounding_family() {
    assert_eq!(eval_numeric("floor(2.9)"), 2.0);
    assert_eq!(eval_numeric("ceil(2.1)"), 3.0);
    assert_eq!(eval_numeric("round(2.5)"), 3.0);
    assert_eq!(eval_numeric("round(2.456, 2)"), 2.46);
    // Round half to even.
    assert_eq!(eval_numeric("rint(2.5)"), 2.0);
    assert_eq!(eval_numeric("rint(3.5)"), 4.0);
}

#[test]
fn one_argument_round_is_integer_two_argument_real() {
    assert_eq!(compile("round(2.5)").expression_type(), ExprType::Integer);
    assert_eq!(
        compile("round(2.456, 2)").expression_type(),
        ExprType::Double
    );
}

#[test]
fn math_family() {
    assert_eq!(eval_numeric("abs(-4)"), 4.0);
    assert_eq!(eval_numeric("sqrt(16)"), 4.0);
    assert!((eval_numeric("ln(exp(1))") - 1.0).abs() < 1e-12);
    assert_eq!(eval_numeric("log10(1000)"), 3.0);
}

#[test]
fn abs_preserves_integer() {
    assert_eq!(compile("abs(-4)").expression_type(), ExprType::Integer);
    assert_eq!(compile("abs(-4.5)").expression_type(), ExprType::Double);
    assert_eq!(compile("sqrt(16)").expression_type(), ExprType::Double);
}

#[test]
fn statistical_reducers() {
    assert_eq!(eval_numeric("min(3, 1, 2)"), 1.0);
    assert_eq!(eval_numeric("max(3, 1, 2)"), 3.0);
    assert_eq!(eval_numeric("sum(1, 2, 3, 4)"), 10.0);
    assert_eq!(eval_numeric("avg(1, 2, 3, 4)"), 2.5);
}

#[test]
fn zero_argument_reducers() {
    assert_eq!(eval_numeric("sum()"), 0.0);
    assert!(eval_numeric("min()").is_nan());
    assert!(eval_numeric("max()").is_nan());
    assert!(eval_numeric("avg()").is_nan());
}

#[test]
fn binomial_coefficients() {
    assert_eq!(eval_numeric("binomial(5, 2)"), 10.0);
    assert_eq!(eval_numeric("binomial(10, 0)"), 1.0);
    assert_eq!(eval_numeric("binomial(3, 5)"), 0.0);
}

#[test]
fn bitwise_on_integers() {
    assert_eq!(eval_numeric("bit_and(12, 10)"), 8.0);
    assert_eq!(eval_numeric("bit_or(12, 10)"), 14.0);
    assert_eq!(eval_numeric("bit_xor(12, 10)"), 6.0);
    assert_eq!(eval_numeric("bit_not(0)"), -1.0);
    assert_eq!(compile("bit_and(12, 10)").expression_type(), ExprType::Integer);
}

#[test]
fn text_family() {
    let expr = compile("upper(\"widget\")");
    assert_eq!(expr.expression_type(), ExprType::Text);
    assert_eq!(expr.evaluate_text().unwrap(), Some("WIDGET".to_string()));

    assert_eq!(
        compile("lower(\"LOUD\")").evaluate_text().unwrap(),
        Some("loud".to_string())
    );
    assert_eq!(
        compile("trim(\"  pad  \")").evaluate_text().unwrap(),
        Some("pad".to_string())
    );
    assert_eq!(
        compile("concat(\"a\", \"b\", \"c\")").evaluate_text().unwrap(),
        Some("abc".to_string())
    );
}

#[test]
fn len_and_contains() {
    assert_eq!(eval_numeric("len(\"abcd\")"), 4.0);
    assert_eq!(
        compile("contains(\"haystack\", \"stack\")")
            .evaluate_boolean()
            .unwrap(),
        Some(true)
    );
    assert_eq!(
        compile("contains(\"haystack\", \"needle\")")
            .evaluate_boolean()
            .unwrap(),
        Some(false)
    );
}

#[test]
fn rand_returns_values_in_the_unit_interval() {
    let expr = compile("rand()");
    assert_eq!(expr.expression_type(), ExprType::Double);
    assert!(!expr.is_constant());
    for _ in 0..100 {
        let v = expr.evaluate_numerical().unwrap();
        assert!((0.0..1.0).contains(&v));
    }
}

#[test]
fn seeded_rand_is_reproducible() {
    let a = compile("rand(7)");
    let b = compile("rand(7)");
    let first: Vec<f64> = (0..10).map(|_| a.evaluate_numerical().unwrap()).collect();
    let second: Vec<f64> = (0..10).map(|_| b.evaluate_numerical().unwrap()).collect();
    assert_eq!(first, second);
    // The stream advances rather than repeating one value.
    assert!(first.windows(2).any(|w| w[0] != w[1]));
}
