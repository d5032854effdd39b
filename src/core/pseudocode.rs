use crate::core::algorithm::{Algorithm, AlgorithmFamily};
use crate::core::step::AlgorithmStep;

/// Pseudocode shown next to the visualization
pub fn template(algorithm: Algorithm) -> &'static str {
    match algorithm {
        Algorithm::Bubble => {
            "// Bubble Sort Algorithm
function bubbleSort(arr):
    n = length(arr)
    for i = 0 to n-1:
        for j = 0 to n-i-2:
            if arr[j] > arr[j+1]:
                swap(arr[j], arr[j+1])
    return arr"
        }
        Algorithm::Selection => {
            "// Selection Sort Algorithm
function selectionSort(arr):
    n = length(arr)
    for i = 0 to n-1:
        min_idx = i
        for j = i+1 to n-1:
            if arr[j] < arr[min_idx]:
                min_idx = j
        swap(arr[i], arr[min_idx])
    return arr"
        }
        Algorithm::Insertion => {
            "// Insertion Sort Algorithm
function insertionSort(arr):
    for i = 1 to length(arr)-1:
        key = arr[i]
        j = i - 1
        while j >= 0 and arr[j] > key:
            arr[j+1] = arr[j]
            j = j - 1
        arr[j+1] = key
    return arr"
        }
        Algorithm::Merge => {
            "// Merge Sort Algorithm
function mergeSort(arr, left, right):
    if left < right:
        mid = (left + right) / 2
        mergeSort(arr, left, mid)
        mergeSort(arr, mid+1, right)
        merge(arr, left, mid, right)

function merge(arr, left, mid, right):
    // Merge two sorted subarrays"
        }
        Algorithm::Quick => {
            "// Quick Sort Algorithm
function quickSort(arr, low, high):
    if low < high:
        pi = partition(arr, low, high)
        quickSort(arr, low, pi-1)
        quickSort(arr, pi+1, high)

function partition(arr, low, high):
    pivot = arr[high]
    i = low - 1
    for j = low to high-1:
        if arr[j] <= pivot:
            i = i + 1
            swap(arr[i], arr[j])
    swap(arr[i+1], arr[high])
    return i + 1"
        }
        Algorithm::Inorder => {
            "// Inorder Traversal
function inorder(node):
    if node is not null:
        inorder(node.left)
        process(node.val)
        inorder(node.right)"
        }
        Algorithm::Preorder => {
            "// Preorder Traversal
function preorder(node):
    if node is not null:
        process(node.val)
        preorder(node.left)
        preorder(node.right)"
        }
        Algorithm::Postorder => {
            "// Postorder Traversal
function postorder(node):
    if node is not null:
        postorder(node.left)
        postorder(node.right)
        process(node.val)"
        }
        Algorithm::Factorial => {
            "// Factorial Function
function factorial(n):
    if n <= 1:
        return 1
    else:
        return n * factorial(n-1)"
        }
        Algorithm::Fibonacci => {
            "// Fibonacci Function
function fibonacci(n):
    if n <= 1:
        return n
    else:
        return fibonacci(n-1) + fibonacci(n-2)"
        }
        Algorithm::Tower => {
            "// Tower of Hanoi
function hanoi(n, source, dest, aux):
    if n == 1:
        move disk from source to dest
    else:
        hanoi(n-1, source, aux, dest)
        move disk n from source to dest
        hanoi(n-1, aux, dest, source)"
        }
        Algorithm::Reverse => {
            "// Reverse String
function reverse(str):
    if length(str) <= 1:
        return str
    else:
        return reverse(str[1:]) + str[0]"
        }
        Algorithm::Bfs => {
            "// Breadth-First Search
function BFS(graph, start):
    queue = [start]
    visited = set()

    while queue is not empty:
        current = queue.dequeue()
        if current not in visited:
            visited.add(current)
            for neighbor in graph[current]:
                if neighbor not in visited:
                    queue.enqueue(neighbor)"
        }
        Algorithm::Dfs => {
            "// Depth-First Search
function DFS(graph, start):
    stack = [start]
    visited = set()

    while stack is not empty:
        current = stack.pop()
        if current not in visited:
            visited.add(current)
            for neighbor in graph[current]:
                if neighbor not in visited:
                    stack.push(neighbor)"
        }
    }
}

/// A pseudocode line and whether the current step points at it
#[derive(Debug, Clone, PartialEq)]
pub struct CodeLine<'a> {
    pub text: &'a str,
    pub highlighted: bool,
}

/// Split `algorithm`'s template into lines, marking those `step` refers to
///
/// Lines match when they contain the step's pseudocode text. Tree and
/// graph traversals emit per-node text (`inorder(4)`, `queue = [0, 2]`),
/// so their lines match on shared keywords instead. No step, or a step
/// without pseudocode, highlights nothing.
pub fn highlight(algorithm: Algorithm, step: Option<&AlgorithmStep>) -> Vec<CodeLine<'static>> {
    let wanted = step
        .and_then(|step| step.pseudocode_line.as_deref())
        .map(|line| line.replace(['<', '>'], ""))
        .filter(|line| !line.trim().is_empty());

    template(algorithm)
        .lines()
        .map(|text| CodeLine {
            text,
            highlighted: wanted
                .as_deref()
                .is_some_and(|wanted| line_matches(algorithm, text, wanted)),
        })
        .collect()
}

const TREE_KEYWORDS: [&str; 4] = ["process", "inorder", "preorder", "postorder"];
const GRAPH_KEYWORDS: [&str; 4] = ["queue", "stack", "visited", "current"];

fn line_matches(algorithm: Algorithm, line: &str, wanted: &str) -> bool {
    let keywords: &[&str] = match algorithm.family() {
        AlgorithmFamily::Tree => &TREE_KEYWORDS,
        AlgorithmFamily::Graph => &GRAPH_KEYWORDS,
        _ => return line.contains(wanted.trim()),
    };
    keywords
        .iter()
        .any(|keyword| line.contains(keyword) && wanted.contains(keyword))
}
