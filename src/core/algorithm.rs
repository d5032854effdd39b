use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest array the visualizer accepts
pub const MAX_ARRAY_LEN: usize = 20;

/// Largest `n` for numeric recursion inputs
pub const MAX_RECURSION_N: u32 = 10;

/// Largest disk count for Tower of Hanoi
pub const MAX_HANOI_DISKS: u32 = 5;

/// Graph size bounds
pub const MIN_GRAPH_NODES: usize = 3;
pub const MAX_GRAPH_NODES: usize = 8;

/// Rejected user input
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Invalid number: {0:?}")]
    InvalidNumber(String),

    #[error("Empty input")]
    Empty,

    #[error("Array too large (max {} elements)", MAX_ARRAY_LEN)]
    ArrayTooLarge,

    #[error("Parameter must be at least 1")]
    ParameterTooSmall,

    #[error("Parameter too large (max {0})")]
    ParameterTooLarge(u32),

    #[error("Start node must be less than number of nodes ({0})")]
    StartOutOfRange(usize),

    #[error("{algorithm} expects {expected} input")]
    WrongInput {
        algorithm: Algorithm,
        expected: &'static str,
    },
}

/// Algorithm family, one per visualizer page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmFamily {
    Sorting,
    Tree,
    Recursion,
    Graph,
}

/// Every algorithm the step service can produce steps for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Bubble,
    Selection,
    Insertion,
    Merge,
    Quick,
    Inorder,
    Preorder,
    Postorder,
    Factorial,
    Fibonacci,
    Tower,
    Reverse,
    Bfs,
    Dfs,
}

impl Algorithm {
    pub const ALL: [Algorithm; 14] = [
        Algorithm::Bubble,
        Algorithm::Selection,
        Algorithm::Insertion,
        Algorithm::Merge,
        Algorithm::Quick,
        Algorithm::Inorder,
        Algorithm::Preorder,
        Algorithm::Postorder,
        Algorithm::Factorial,
        Algorithm::Fibonacci,
        Algorithm::Tower,
        Algorithm::Reverse,
        Algorithm::Bfs,
        Algorithm::Dfs,
    ];

    pub fn family(self) -> AlgorithmFamily {
        match self {
            Self::Bubble | Self::Selection | Self::Insertion | Self::Merge | Self::Quick => {
                AlgorithmFamily::Sorting
            }
            Self::Inorder | Self::Preorder | Self::Postorder => AlgorithmFamily::Tree,
            Self::Factorial | Self::Fibonacci | Self::Tower | Self::Reverse => {
                AlgorithmFamily::Recursion
            }
            Self::Bfs | Self::Dfs => AlgorithmFamily::Graph,
        }
    }

    /// Identifier used on the command line and in service URLs
    pub fn slug(self) -> &'static str {
        match self {
            Self::Bubble => "bubble",
            Self::Selection => "selection",
            Self::Insertion => "insertion",
            Self::Merge => "merge",
            Self::Quick => "quick",
            Self::Inorder => "inorder",
            Self::Preorder => "preorder",
            Self::Postorder => "postorder",
            Self::Factorial => "factorial",
            Self::Fibonacci => "fibonacci",
            Self::Tower => "tower",
            Self::Reverse => "reverse",
            Self::Bfs => "bfs",
            Self::Dfs => "dfs",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Bubble => "Bubble Sort",
            Self::Selection => "Selection Sort",
            Self::Insertion => "Insertion Sort",
            Self::Merge => "Merge Sort",
            Self::Quick => "Quick Sort",
            Self::Inorder => "Inorder Traversal",
            Self::Preorder => "Preorder Traversal",
            Self::Postorder => "Postorder Traversal",
            Self::Factorial => "Factorial",
            Self::Fibonacci => "Fibonacci",
            Self::Tower => "Tower of Hanoi",
            Self::Reverse => "Reverse String",
            Self::Bfs => "Breadth-First Search",
            Self::Dfs => "Depth-First Search",
        }
    }

    /// Path of the step service endpoint, relative to its base URL
    pub fn endpoint(self) -> String {
        match self.family() {
            AlgorithmFamily::Sorting => format!("/api/sort/{}", self.slug()),
            AlgorithmFamily::Tree => format!("/api/tree/traversal/{}", self.slug()),
            AlgorithmFamily::Recursion => format!("/api/recursion/{}", self.slug()),
            AlgorithmFamily::Graph => format!("/api/graph/{}", self.slug()),
        }
    }

    /// Reference complexity, keyed the way the step service reports it
    pub fn complexity(self) -> Vec<(&'static str, &'static str)> {
        let sorting = |best, avg, worst, space| {
            vec![("time_best", best), ("time_avg", avg), ("time_worst", worst), ("space", space)]
        };
        match self {
            Self::Bubble => sorting("O(n)", "O(n²)", "O(n²)", "O(1)"),
            Self::Selection => sorting("O(n²)", "O(n²)", "O(n²)", "O(1)"),
            Self::Insertion => sorting("O(n)", "O(n²)", "O(n²)", "O(1)"),
            Self::Merge => sorting("O(n log n)", "O(n log n)", "O(n log n)", "O(n)"),
            Self::Quick => sorting("O(n log n)", "O(n log n)", "O(n²)", "O(log n)"),
            Self::Inorder | Self::Preorder | Self::Postorder => {
                vec![("time", "O(n)"), ("space", "O(h)")]
            }
            Self::Factorial | Self::Reverse => vec![("time", "O(n)"), ("space", "O(n)")],
            Self::Fibonacci | Self::Tower => vec![("time", "O(2^n)"), ("space", "O(n)")],
            Self::Bfs | Self::Dfs => vec![("time", "O(V + E)"), ("space", "O(V)")],
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Algorithm {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.slug() == wanted)
            .ok_or_else(|| InputError::UnknownAlgorithm(s.to_string()))
    }
}

/// Input parameters sent to the step service
#[derive(Debug, Clone, PartialEq)]
pub enum AlgorithmInput {
    /// Values to sort
    Array(Vec<i64>),
    /// Level-order node values, `None` for missing children
    Tree(Vec<Option<i64>>),
    /// `n` for factorial, fibonacci and Tower of Hanoi
    Number(u32),
    /// String to reverse
    Text(String),
    /// Undirected graph and traversal start node
    Graph {
        nodes: usize,
        edges: Vec<(usize, usize)>,
        start: usize,
    },
}

impl AlgorithmInput {
    /// Input the step service assumes when a parameter is omitted
    pub fn default_for(algorithm: Algorithm) -> Self {
        match algorithm.family() {
            AlgorithmFamily::Sorting => Self::Array(vec![64, 34, 25, 12, 22, 11, 90]),
            AlgorithmFamily::Tree => Self::Tree((1..=7).map(Some).collect()),
            AlgorithmFamily::Recursion => match algorithm {
                Algorithm::Reverse => Self::Text("hello".to_string()),
                Algorithm::Tower => Self::Number(3),
                _ => Self::Number(5),
            },
            AlgorithmFamily::Graph => Self::Graph {
                nodes: 4,
                edges: vec![(0, 1), (0, 2), (1, 3), (2, 3)],
                start: 0,
            },
        }
    }

    /// Parse comma-separated integers, e.g. `64,34,25,12`
    pub fn parse_array(input: &str) -> Result<Self, InputError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(InputError::Empty);
        }

        let values = input
            .split(',')
            .map(parse_int)
            .collect::<Result<Vec<_>, _>>()?;

        if values.len() > MAX_ARRAY_LEN {
            return Err(InputError::ArrayTooLarge);
        }
        Ok(Self::Array(values))
    }

    /// Parse level-order tree values, e.g. `1,2,3,null,5`
    pub fn parse_tree(input: &str) -> Result<Self, InputError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(InputError::Empty);
        }

        let nodes = input
            .split(',')
            .map(|part| match part.trim() {
                "null" => Ok(None),
                value => parse_int(value).map(Some),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::Tree(nodes))
    }

    /// Parse an edge list like `0-1,0-2,1-3`
    ///
    /// `nodes` is clamped to the supported graph size. Edges that reference
    /// unknown nodes, loop back to themselves, or do not parse are dropped.
    pub fn parse_graph(edges: &str, nodes: usize, start: usize) -> Result<Self, InputError> {
        let nodes = nodes.clamp(MIN_GRAPH_NODES, MAX_GRAPH_NODES);
        if start >= nodes {
            return Err(InputError::StartOutOfRange(nodes));
        }

        let edges = edges
            .split(',')
            .filter_map(|pair| {
                let (u, v) = pair.split_once('-')?;
                let u = u.trim().parse::<usize>().ok()?;
                let v = v.trim().parse::<usize>().ok()?;
                (u < nodes && v < nodes && u != v).then_some((u, v))
            })
            .collect();

        Ok(Self::Graph { nodes, edges, start })
    }

    /// Check that this input suits `algorithm` and is within display limits
    pub fn validate(&self, algorithm: Algorithm) -> Result<(), InputError> {
        let wrong = |expected| InputError::WrongInput { algorithm, expected };

        match (algorithm.family(), self) {
            (AlgorithmFamily::Sorting, Self::Array(values)) => {
                if values.is_empty() {
                    Err(InputError::Empty)
                } else if values.len() > MAX_ARRAY_LEN {
                    Err(InputError::ArrayTooLarge)
                } else {
                    Ok(())
                }
            }
            (AlgorithmFamily::Sorting, _) => Err(wrong("an array")),
            (AlgorithmFamily::Tree, Self::Tree(nodes)) => {
                if nodes.is_empty() {
                    Err(InputError::Empty)
                } else {
                    Ok(())
                }
            }
            (AlgorithmFamily::Tree, _) => Err(wrong("a tree")),
            (AlgorithmFamily::Recursion, Self::Text(text)) if algorithm == Algorithm::Reverse => {
                if text.is_empty() {
                    Err(InputError::Empty)
                } else {
                    Ok(())
                }
            }
            (AlgorithmFamily::Recursion, Self::Number(n)) if algorithm != Algorithm::Reverse => {
                let max = if algorithm == Algorithm::Tower {
                    MAX_HANOI_DISKS
                } else {
                    MAX_RECURSION_N
                };
                if *n < 1 {
                    Err(InputError::ParameterTooSmall)
                } else if *n > max {
                    Err(InputError::ParameterTooLarge(max))
                } else {
                    Ok(())
                }
            }
            (AlgorithmFamily::Recursion, _) if algorithm == Algorithm::Reverse => Err(wrong("a string")),
            (AlgorithmFamily::Recursion, _) => Err(wrong("a number")),
            (AlgorithmFamily::Graph, Self::Graph { nodes, start, .. }) => {
                if *start >= *nodes {
                    Err(InputError::StartOutOfRange(*nodes))
                } else {
                    Ok(())
                }
            }
            (AlgorithmFamily::Graph, _) => Err(wrong("a graph")),
        }
    }

    /// Query parameters understood by the step service
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Array(values) => vec![("data", join(values.iter()))],
            Self::Tree(nodes) => {
                let nodes = nodes.iter().map(|node| match node {
                    Some(value) => value.to_string(),
                    None => "null".to_string(),
                });
                vec![("tree", join(nodes))]
            }
            Self::Number(n) => vec![("n", n.to_string())],
            Self::Text(text) => vec![("text", text.clone())],
            Self::Graph { nodes, edges, start } => vec![
                ("edges", join(edges.iter().map(|(u, v)| format!("{u}-{v}")))),
                ("nodes", nodes.to_string()),
                ("start", start.to_string()),
            ],
        }
    }
}

fn parse_int(value: &str) -> Result<i64, InputError> {
    let value = value.trim();
    value
        .parse::<i64>()
        .map_err(|_| InputError::InvalidNumber(value.to_string()))
}

fn join<I>(items: I) -> String
where
    I: Iterator,
    I::Item: ToString,
{
    items.map(|item| item.to_string()).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        for algorithm in Algorithm::ALL {
            assert_eq!(AlgorithmInput::default_for(algorithm).validate(algorithm), Ok(()));
        }
        assert_eq!(
            AlgorithmInput::default_for(Algorithm::Dfs).query_pairs(),
            vec![
                ("edges", "0-1,0-2,1-3,2-3".to_string()),
                ("nodes", "4".to_string()),
                ("start", "0".to_string()),
            ]
        );
    }

    #[test]
    fn test_slug_round_trip() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.slug().parse::<Algorithm>().unwrap(), algorithm);
        }
        assert_eq!(" BFS ".parse::<Algorithm>().unwrap(), Algorithm::Bfs);
        assert!(matches!(
            "heap".parse::<Algorithm>(),
            Err(InputError::UnknownAlgorithm(_))
        ));
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(Algorithm::Bubble.endpoint(), "/api/sort/bubble");
        assert_eq!(Algorithm::Postorder.endpoint(), "/api/tree/traversal/postorder");
        assert_eq!(Algorithm::Tower.endpoint(), "/api/recursion/tower");
        assert_eq!(Algorithm::Dfs.endpoint(), "/api/graph/dfs");
    }

    #[test]
    fn test_parse_array() {
        assert_eq!(
            AlgorithmInput::parse_array("64, 34,25").unwrap(),
            AlgorithmInput::Array(vec![64, 34, 25])
        );
        assert_eq!(AlgorithmInput::parse_array("  "), Err(InputError::Empty));
        assert_eq!(
            AlgorithmInput::parse_array("1,x,3"),
            Err(InputError::InvalidNumber("x".to_string()))
        );

        let too_many = vec!["1"; MAX_ARRAY_LEN + 1].join(",");
        assert_eq!(
            AlgorithmInput::parse_array(&too_many),
            Err(InputError::ArrayTooLarge)
        );
    }

    #[test]
    fn test_parse_tree() {
        assert_eq!(
            AlgorithmInput::parse_tree("1,null, 3").unwrap(),
            AlgorithmInput::Tree(vec![Some(1), None, Some(3)])
        );
        assert!(AlgorithmInput::parse_tree("1,nil").is_err());
    }

    #[test]
    fn test_parse_graph_filters_edges() {
        let input = AlgorithmInput::parse_graph("0-1, 1-1, 2-9, x-2, 2-3,bad", 4, 0).unwrap();
        assert_eq!(
            input,
            AlgorithmInput::Graph {
                nodes: 4,
                edges: vec![(0, 1), (2, 3)],
                start: 0,
            }
        );

        match AlgorithmInput::parse_graph("", 20, 0).unwrap() {
            AlgorithmInput::Graph { nodes, edges, .. } => {
                assert_eq!(nodes, MAX_GRAPH_NODES);
                assert!(edges.is_empty());
            }
            other => panic!("unexpected input {other:?}"),
        }

        assert_eq!(
            AlgorithmInput::parse_graph("0-1", 3, 3),
            Err(InputError::StartOutOfRange(3))
        );
    }

    #[test]
    fn test_validate_recursion_limits() {
        let n = |n| AlgorithmInput::Number(n);
        assert!(n(5).validate(Algorithm::Factorial).is_ok());
        assert_eq!(n(0).validate(Algorithm::Fibonacci), Err(InputError::ParameterTooSmall));
        assert_eq!(
            n(11).validate(Algorithm::Fibonacci),
            Err(InputError::ParameterTooLarge(MAX_RECURSION_N))
        );
        assert_eq!(
            n(6).validate(Algorithm::Tower),
            Err(InputError::ParameterTooLarge(MAX_HANOI_DISKS))
        );
        assert!(AlgorithmInput::Text("hello".into()).validate(Algorithm::Reverse).is_ok());
        assert_eq!(
            AlgorithmInput::Text(String::new()).validate(Algorithm::Reverse),
            Err(InputError::Empty)
        );
        assert!(matches!(
            n(3).validate(Algorithm::Reverse),
            Err(InputError::WrongInput { expected: "a string", .. })
        ));
    }

    #[test]
    fn test_validate_family_mismatch() {
        let err = AlgorithmInput::Array(vec![1, 2]).validate(Algorithm::Bfs).unwrap_err();
        assert_eq!(err.to_string(), "bfs expects a graph input");
    }

    #[test]
    fn test_query_pairs() {
        assert_eq!(
            AlgorithmInput::Array(vec![3, 1, 2]).query_pairs(),
            vec![("data", "3,1,2".to_string())]
        );
        assert_eq!(
            AlgorithmInput::Tree(vec![Some(1), None, Some(2)]).query_pairs(),
            vec![("tree", "1,null,2".to_string())]
        );
        assert_eq!(
            AlgorithmInput::Graph {
                nodes: 4,
                edges: vec![(0, 1), (1, 3)],
                start: 1,
            }
            .query_pairs(),
            vec![
                ("edges", "0-1,1-3".to_string()),
                ("nodes", "4".to_string()),
                ("start", "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_complexity() {
        assert!(Algorithm::Quick.complexity().contains(&("time_worst", "O(n²)")));
        assert_eq!(
            Algorithm::Bfs.complexity(),
            vec![("time", "O(V + E)"), ("space", "O(V)")]
        );
    }
}
