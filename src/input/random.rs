use crate::core::{Algorithm, AlgorithmFamily, AlgorithmInput};
use rand::Rng;
use std::collections::HashSet;

const ARRAY_LEN: usize = 8;
const ARRAY_MIN: i64 = 10;
const ARRAY_MAX: i64 = 100;

const TREE_SLOTS: usize = 7;
const TREE_FILL: f64 = 0.8;

/// Random sort input: eight values in `10..=100`
pub fn random_array<R: Rng + ?Sized>(rng: &mut R) -> AlgorithmInput {
    let values = (0..ARRAY_LEN)
        .map(|_| rng.gen_range(ARRAY_MIN..=ARRAY_MAX))
        .collect();
    AlgorithmInput::Array(values)
}

/// Random level-order tree: seven slots, each filled with probability 0.8
pub fn random_tree<R: Rng + ?Sized>(rng: &mut R) -> AlgorithmInput {
    let nodes = (0..TREE_SLOTS)
        .map(|_| rng.gen_bool(TREE_FILL).then(|| rng.gen_range(1..=100)))
        .collect();
    AlgorithmInput::Tree(nodes)
}

/// Random connected graph on 4..=7 nodes starting at node 0
///
/// A random spanning tree keeps every node reachable; one to three extra
/// edges are then attempted, skipping loops and duplicates.
pub fn random_graph<R: Rng + ?Sized>(rng: &mut R) -> AlgorithmInput {
    let nodes = rng.gen_range(4..=7);
    let mut edges = Vec::new();
    let mut seen = HashSet::new();

    for child in 1..nodes {
        let parent = rng.gen_range(0..child);
        edges.push((parent, child));
        seen.insert((parent, child));
        seen.insert((child, parent));
    }

    for _ in 0..rng.gen_range(1..=3) {
        let u = rng.gen_range(0..nodes);
        let v = rng.gen_range(0..nodes);
        if u != v && seen.insert((u, v)) {
            seen.insert((v, u));
            edges.push((u, v));
        }
    }

    AlgorithmInput::Graph {
        nodes,
        edges,
        start: 0,
    }
}

/// Random input suitable for `algorithm`
pub fn random_input<R: Rng + ?Sized>(algorithm: Algorithm, rng: &mut R) -> AlgorithmInput {
    match algorithm.family() {
        AlgorithmFamily::Sorting => random_array(rng),
        AlgorithmFamily::Tree => random_tree(rng),
        AlgorithmFamily::Graph => random_graph(rng),
        AlgorithmFamily::Recursion => match algorithm {
            Algorithm::Reverse => {
                let len = rng.gen_range(3..=8);
                let text = (0..len).map(|_| rng.gen_range(b'a'..=b'z') as char).collect();
                AlgorithmInput::Text(text)
            }
            Algorithm::Tower => AlgorithmInput::Number(rng.gen_range(2..=4)),
            _ => AlgorithmInput::Number(rng.gen_range(3..=7)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_array_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let AlgorithmInput::Array(values) = random_array(&mut rng) else {
                panic!("expected an array");
            };
            assert_eq!(values.len(), 8);
            assert!(values.iter().all(|v| (10..=100).contains(v)));
        }
    }

    #[test]
    fn test_random_tree_shape() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut holes = 0;
        for _ in 0..100 {
            let AlgorithmInput::Tree(nodes) = random_tree(&mut rng) else {
                panic!("expected a tree");
            };
            assert_eq!(nodes.len(), 7);
            holes += nodes.iter().filter(|n| n.is_none()).count();
            assert!(nodes.iter().flatten().all(|v| (1..=100).contains(v)));
        }
        // about 140 of 700 slots expected empty
        assert!((70..=210).contains(&holes), "holes = {holes}");
    }

    #[test]
    fn test_random_graph_connected() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let AlgorithmInput::Graph { nodes, edges, start } = random_graph(&mut rng) else {
                panic!("expected a graph");
            };
            assert!((4..=7).contains(&nodes));
            assert_eq!(start, 0);
            assert!(edges.len() >= nodes - 1 && edges.len() <= nodes + 2);

            let mut reached = vec![false; nodes];
            reached[0] = true;
            // spanning tree edges always point from a smaller to a larger node
            for &(u, v) in edges.iter().take(nodes - 1) {
                assert!(u < v);
                assert!(reached[u]);
                reached[v] = true;
            }
            assert!(reached.iter().all(|&r| r));

            let mut unique = HashSet::new();
            for &(u, v) in &edges {
                assert_ne!(u, v);
                assert!(unique.insert((u.min(v), u.max(v))));
            }
        }
    }

    #[test]
    fn test_random_input_validates() {
        let mut rng = StdRng::seed_from_u64(42);
        for algorithm in Algorithm::ALL {
            let input = random_input(algorithm, &mut rng);
            assert_eq!(input.validate(algorithm), Ok(()), "{algorithm}");
        }
    }
}
