use crate::core::algorithm::{Algorithm, AlgorithmFamily};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One step of an algorithm run, as produced by the step service
///
/// Only the fields every step carries are typed; family-specific data
/// (`array`, `queue`, `call_stack`, `rod_states`, ...) stays in `fields`
/// and is read through the accessors below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmStep {
    /// Step kind, e.g. `compare`, `swap`, `visit`, `base_case`
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub description: String,

    /// Pseudocode text this step corresponds to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pseudocode_line: Option<String>,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl AlgorithmStep {
    pub fn new(kind: &str, description: &str) -> Self {
        Self {
            kind: kind.to_string(),
            description: description.to_string(),
            pseudocode_line: None,
            fields: Map::new(),
        }
    }

    /// Builder-style field setter, mostly for tests and saved fixtures
    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn with_pseudocode(mut self, line: &str) -> Self {
        self.pseudocode_line = Some(line.to_string());
        self
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        self.fields.get(key).and_then(Value::as_i64)
    }

    /// Integer list field; `None` if missing or not all integers
    pub fn int_list(&self, key: &str) -> Option<Vec<i64>> {
        self.fields
            .get(key)?
            .as_array()?
            .iter()
            .map(Value::as_i64)
            .collect()
    }

    pub fn array(&self) -> Option<Vec<i64>> {
        self.int_list("array")
    }

    /// Indices being compared in a sorting step
    pub fn comparing(&self) -> Vec<i64> {
        self.int_list("comparing").unwrap_or_default()
    }

    /// Indices just swapped in a sorting step
    pub fn swapped(&self) -> Vec<i64> {
        self.int_list("swapped").unwrap_or_default()
    }

    pub fn queue(&self) -> Option<Vec<i64>> {
        self.int_list("queue")
    }

    pub fn stack(&self) -> Option<Vec<i64>> {
        self.int_list("stack")
    }

    pub fn visited(&self) -> Vec<i64> {
        self.int_list("visited").unwrap_or_default()
    }

    /// Node currently being processed (graph steps)
    pub fn current(&self) -> Option<i64> {
        self.int("current")
    }

    /// Tree node this step refers to
    pub fn node(&self) -> Option<i64> {
        self.int("node")
    }

    pub fn neighbor(&self) -> Option<i64> {
        self.int("neighbor")
    }

    pub fn depth(&self) -> Option<i64> {
        self.int("depth")
    }

    /// Recursive calls, outermost first
    pub fn call_stack(&self) -> Vec<String> {
        self.fields
            .get("call_stack")
            .and_then(Value::as_array)
            .map(|calls| {
                calls
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Tower of Hanoi rods, bottom disk first
    pub fn rod_states(&self) -> Option<BTreeMap<String, Vec<i64>>> {
        let rods = self.fields.get("rod_states")?;
        serde_json::from_value(rods.clone()).ok()
    }

    /// Result of a returning recursive call, rendered as text
    pub fn result(&self) -> Option<String> {
        match self.fields.get("result")? {
            Value::String(text) => Some(text.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// A decoded step-service response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepBatch {
    pub algorithm: Algorithm,
    pub steps: Vec<AlgorithmStep>,
    #[serde(default)]
    pub complexity: BTreeMap<String, String>,
    pub fetched_at: DateTime<Utc>,
}

impl StepBatch {
    pub fn new(algorithm: Algorithm, steps: Vec<AlgorithmStep>) -> Self {
        Self {
            algorithm,
            steps,
            complexity: BTreeMap::new(),
            fetched_at: Utc::now(),
        }
    }

    /// Annotate the steps for playback
    pub fn frames(&self) -> Vec<StepFrame> {
        annotate(self.algorithm, &self.steps)
    }
}

/// A step plus the display context a renderer needs
#[derive(Debug, Clone, PartialEq)]
pub struct StepFrame {
    pub algorithm: Algorithm,
    /// Zero-based index into the run
    pub index: usize,
    pub total: usize,
    pub step: AlgorithmStep,
    /// Traversal order up to and including this step
    pub traversal: Vec<i64>,
}

/// Precompute per-step context so rendering never depends on playback history
///
/// Tree traversals record the node of every `process` step; graph
/// traversals record each node the first time it is visited. Other
/// families have no traversal order.
pub fn annotate(algorithm: Algorithm, steps: &[AlgorithmStep]) -> Vec<StepFrame> {
    let family = algorithm.family();
    let mut traversal = Vec::new();

    steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            match (family, step.kind.as_str()) {
                // tree values may repeat, so every processed node counts
                (AlgorithmFamily::Tree, "process") => traversal.extend(step.node()),
                (AlgorithmFamily::Graph, "visit") => {
                    if let Some(node) = step.current().filter(|node| !traversal.contains(node)) {
                        traversal.push(node);
                    }
                }
                _ => {}
            }

            StepFrame {
                algorithm,
                index,
                total: steps.len(),
                step: step.clone(),
                traversal: traversal.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_sorting_step() {
        let step: AlgorithmStep = serde_json::from_value(json!({
            "type": "compare",
            "array": [64, 34, 25],
            "comparing": [0, 1],
            "pseudocode_line": "if arr[j] > arr[j+1]:",
            "description": "Comparing 64 and 34"
        }))
        .unwrap();

        assert_eq!(step.kind, "compare");
        assert_eq!(step.array(), Some(vec![64, 34, 25]));
        assert_eq!(step.comparing(), vec![0, 1]);
        assert!(step.swapped().is_empty());
        assert_eq!(step.pseudocode_line.as_deref(), Some("if arr[j] > arr[j+1]:"));
    }

    #[test]
    fn test_decode_recursion_step() {
        let step: AlgorithmStep = serde_json::from_value(json!({
            "type": "return",
            "n": 3,
            "result": 6,
            "call_stack": ["factorial(3)"],
            "depth": 0,
            "rod_states": {"A": [3, 2], "B": [], "C": [1]},
            "description": "Returning"
        }))
        .unwrap();

        assert_eq!(step.call_stack(), vec!["factorial(3)".to_string()]);
        assert_eq!(step.result().as_deref(), Some("6"));
        assert_eq!(step.depth(), Some(0));
        assert_eq!(step.rod_states().unwrap()["A"], vec![3, 2]);
        assert_eq!(step.pseudocode_line, None);
    }

    #[test]
    fn test_null_current_is_none() {
        let step = AlgorithmStep::new("initialize", "start").with("current", Value::Null);
        assert_eq!(step.current(), None);
        assert_eq!(step.int_list("queue"), None);
    }

    #[test]
    fn test_annotate_tree_traversal() {
        let steps = vec![
            AlgorithmStep::new("visit", "").with("node", json!(1)),
            AlgorithmStep::new("process", "").with("node", json!(2)),
            AlgorithmStep::new("return", "").with("node", json!(2)),
            AlgorithmStep::new("process", "").with("node", json!(1)),
        ];
        let frames = annotate(Algorithm::Inorder, &steps);

        assert_eq!(frames.len(), 4);
        assert!(frames[0].traversal.is_empty());
        assert_eq!(frames[1].traversal, vec![2]);
        assert_eq!(frames[2].traversal, vec![2]);
        assert_eq!(frames[3].traversal, vec![2, 1]);
        assert_eq!(frames[3].index, 3);
        assert_eq!(frames[3].total, 4);
    }

    #[test]
    fn test_annotate_tree_keeps_repeated_values() {
        let steps = vec![
            AlgorithmStep::new("process", "").with("node", json!(5)),
            AlgorithmStep::new("process", "").with("node", json!(5)),
        ];
        let frames = annotate(Algorithm::Postorder, &steps);
        assert_eq!(frames[1].traversal, vec![5, 5]);
    }

    #[test]
    fn test_annotate_graph_dedups_visits() {
        let steps = vec![
            AlgorithmStep::new("visit", "").with("current", json!(0)),
            AlgorithmStep::new("enqueue", "").with("current", json!(0)),
            AlgorithmStep::new("visit", "").with("current", json!(2)),
            AlgorithmStep::new("visit", "").with("current", json!(0)),
        ];
        let frames = annotate(Algorithm::Bfs, &steps);
        assert_eq!(frames[3].traversal, vec![0, 2]);
    }

    #[test]
    fn test_annotate_sorting_has_no_traversal() {
        let steps = vec![AlgorithmStep::new("process", "").with("node", json!(5))];
        let frames = annotate(Algorithm::Bubble, &steps);
        assert!(frames[0].traversal.is_empty());
    }

    #[test]
    fn test_batch_json_round_trip_keeps_extra_fields() {
        let batch = StepBatch::new(
            Algorithm::Dfs,
            vec![AlgorithmStep::new("push", "Push 2").with("stack", json!([2]))],
        );
        let json = serde_json::to_string(&batch).unwrap();
        let decoded: StepBatch = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded.algorithm, Algorithm::Dfs);
        assert_eq!(decoded.steps[0].stack(), Some(vec![2]));
    }
}
