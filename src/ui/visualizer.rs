use crate::core::pseudocode;
use crate::core::{Algorithm, AlgorithmFamily, AlgorithmStep, StepFrame};
use std::fmt::Write;

const BAR_WIDTH: usize = 40;
const HANOI_RODS: [&str; 3] = ["A", "B", "C"];

/// Renders step frames as plain text
pub struct Visualizer {
    algorithm: Algorithm,
    total: usize,
    show_pseudocode: bool,
}

impl Visualizer {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            total: 0,
            show_pseudocode: true,
        }
    }

    /// Prepare for a new run of `algorithm` with `total` steps
    pub fn load(&mut self, algorithm: Algorithm, total: usize) {
        self.algorithm = algorithm;
        self.total = total;
    }

    pub fn set_show_pseudocode(&mut self, show: bool) {
        self.show_pseudocode = show;
    }

    /// Full display for `frame`; `None` is the cleared display
    pub fn render(&self, frame: Option<&StepFrame>) -> String {
        let mut out = String::new();
        let algorithm = frame.map_or(self.algorithm, |f| f.algorithm);

        match frame {
            Some(frame) => {
                let _ = writeln!(
                    out,
                    "{}  Step {} of {}",
                    algorithm.display_name(),
                    frame.index + 1,
                    frame.total
                );
                let description = if frame.step.description.is_empty() {
                    "Processing..."
                } else {
                    frame.step.description.as_str()
                };
                let _ = writeln!(out, "{description}");
                out.push('\n');

                match algorithm.family() {
                    AlgorithmFamily::Sorting => render_array(&mut out, &frame.step),
                    AlgorithmFamily::Tree => render_tree(&mut out, frame),
                    AlgorithmFamily::Recursion => render_recursion(&mut out, algorithm, &frame.step),
                    AlgorithmFamily::Graph => render_graph(&mut out, algorithm, frame),
                }
            }
            None => {
                let _ = writeln!(
                    out,
                    "{}  Step 0 of {}",
                    algorithm.display_name(),
                    self.total
                );
                let _ = writeln!(out, "{}", idle_hint(algorithm.family()));
            }
        }

        if self.show_pseudocode {
            out.push('\n');
            for line in pseudocode::highlight(algorithm, frame.map(|f| &f.step)) {
                let marker = if line.highlighted { "▶ " } else { "  " };
                let _ = writeln!(out, "{marker}{}", line.text);
            }
        }

        out
    }
}

fn idle_hint(family: AlgorithmFamily) -> &'static str {
    match family {
        AlgorithmFamily::Sorting => "Press Space to start sorting",
        AlgorithmFamily::Tree => "Press Space to start the traversal",
        AlgorithmFamily::Recursion => "Press Space to start the recursion",
        AlgorithmFamily::Graph => "Press Space to start the traversal",
    }
}

fn join(values: &[i64], separator: &str) -> String {
    values
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Marker for the bar at `index`, most specific first
fn bar_marker(step: &AlgorithmStep, index: i64) -> Option<&'static str> {
    if step.comparing().contains(&index) {
        Some("comparing")
    } else if step.swapped().contains(&index) {
        Some("swapped")
    } else if step.kind == "complete" {
        Some("sorted")
    } else if step.int("current_min") == Some(index) {
        Some("min")
    } else if step.int("key_index") == Some(index) {
        Some("key")
    } else if step.int("pivot_index") == Some(index) {
        Some("pivot")
    } else if step.int("merged_index") == Some(index) {
        Some("merged")
    } else {
        None
    }
}

fn render_array(out: &mut String, step: &AlgorithmStep) {
    let Some(values) = step.array() else {
        return;
    };
    let max = values.iter().map(|v| v.unsigned_abs()).max().unwrap_or(0).max(1);

    for (index, value) in values.iter().enumerate() {
        let len = (value.unsigned_abs() * BAR_WIDTH as u64).div_ceil(max) as usize;
        let bar = "█".repeat(len);
        match bar_marker(step, index as i64) {
            Some(marker) => {
                let _ = writeln!(
                    out,
                    "{index:>3} {value:>5} {bar:<width$} <- {marker}",
                    width = BAR_WIDTH
                );
            }
            None => {
                let _ = writeln!(out, "{index:>3} {value:>5} {bar}");
            }
        }
    }

    if step.kind == "merge_start" {
        if let (Some(left), Some(right)) = (
            step.int_list("left_subarray"),
            step.int_list("right_subarray"),
        ) {
            let _ = writeln!(out, "Left: [{}]", join(&left, ", "));
            let _ = writeln!(out, "Right: [{}]", join(&right, ", "));
        }
    }
}

fn render_call_stack(out: &mut String, step: &AlgorithmStep) {
    let calls = step.call_stack();
    if calls.is_empty() {
        let _ = writeln!(out, "Call stack: empty");
        return;
    }

    let _ = writeln!(out, "Call stack:");
    for (depth, call) in calls.iter().enumerate().rev() {
        let marker = if depth + 1 == calls.len() { "▶" } else { " " };
        let _ = writeln!(out, "  {marker} {call}");
    }
}

fn render_traversal(out: &mut String, traversal: &[i64]) {
    if traversal.is_empty() {
        let _ = writeln!(out, "Traversal: (none yet)");
    } else {
        let _ = writeln!(out, "Traversal: {}", join(traversal, " → "));
    }
}

fn render_tree(out: &mut String, frame: &StepFrame) {
    if let Some(node) = frame.step.node() {
        let _ = writeln!(out, "Node: {node}");
    }
    render_call_stack(out, &frame.step);
    render_traversal(out, &frame.traversal);
}

fn render_recursion(out: &mut String, algorithm: Algorithm, step: &AlgorithmStep) {
    render_call_stack(out, step);

    if algorithm == Algorithm::Tower {
        if let Some(rods) = step.rod_states() {
            out.push('\n');
            for rod in HANOI_RODS {
                let disks = rods.get(rod).map(|disks| join(disks, " ")).unwrap_or_default();
                let _ = writeln!(out, "{rod} ┃ {disks}");
            }
        }
    }

    if step.kind == "return" {
        if let Some(result) = step.result() {
            match algorithm {
                Algorithm::Reverse => {
                    let _ = writeln!(out, "Result: \"{result}\"");
                }
                _ => {
                    let _ = writeln!(out, "Result: {result}");
                }
            }
        }
    }
}

fn render_graph(out: &mut String, algorithm: Algorithm, frame: &StepFrame) {
    let step = &frame.step;
    let (title, noun, contents) = if algorithm == Algorithm::Bfs {
        ("Queue (BFS)", "queue", step.queue())
    } else {
        ("Stack (DFS)", "stack", step.stack())
    };

    match contents.filter(|items| !items.is_empty()) {
        Some(items) => {
            let _ = writeln!(out, "{title}: [{}]", join(&items, ", "));
        }
        None => {
            let _ = writeln!(out, "{title}: empty {noun}");
        }
    }

    if let Some(current) = step.current() {
        let _ = writeln!(out, "Current: {current}");
    }
    let visited = step.visited();
    if !visited.is_empty() {
        let _ = writeln!(out, "Visited: {}", join(&visited, ", "));
    }
    render_traversal(out, &frame.traversal);
}
