use super::*;

#[derive(Debug)]
enum Chain {
    Leaf(f64),
    Add(Box<Chain>, f64),
}

fn build(depth: usize) -> Chain {
    let mut node = Chain::Leaf(0.0);
    for _ in 0..depth {
        node = Chain::Add(Box::new(node), 1.0);
    }
    node
}

fn sum(node: &Chain) -> f64 {
    ensure_sufficient_stack(|| match node {
        Chain::Leaf(v) => *v,
        Chain::Add(inner, v) => sum(inner) + v,
    })
}

#[test]
fn shallow_chain() {
    assert_eq!(sum(&build(10)), 10.0);
}

#[test]
fn deep_chain_does_not_overflow() {
    let chain = build(200_000);
    assert_eq!(sum(&chain), 200_000.0);
    // Iterative teardown; the recursive Drop of a 200k chain would overflow.
    let mut node = chain;
    while let Chain::Add(inner, _) = node {
        node = *inner;
    }
}

#[test]
fn passes_results_through() {
    let result: Result<u8, &str> = ensure_sufficient_stack(|| Err("nope"));
    assert_eq!(result, Err("nope"));
}

#[test]
#[cfg(not(target_arch = "wasm32"))]
fn reports_remaining_stack() {
    assert!(remaining_stack().is_some_and(|bytes| bytes > 0));
}
