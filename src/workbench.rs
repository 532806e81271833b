//! The six controllers side by side, each seeded with its sample data.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::VizResult;
use crate::structures::array::ArrayOp;
use crate::structures::string::StringOp;
use crate::structures::{
    ArrayController, BinaryTreeController, Controller, LinkedListController, ListOp,
    QueueController, QueueOp, Scene, SearchOutcome, SeqOp, StackController, StackOp, Step,
    StringController, TraversalOrder, TreeOp,
};

/// Which container a command targets
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    Array,
    String,
    #[value(alias = "linked_list", alias = "list")]
    LinkedList,
    Stack,
    Queue,
    #[value(alias = "bst")]
    Tree,
}

impl StructureKind {
    pub const ALL: [StructureKind; 6] = [
        StructureKind::Array,
        StructureKind::String,
        StructureKind::LinkedList,
        StructureKind::Stack,
        StructureKind::Queue,
        StructureKind::Tree,
    ];

    pub fn title(self) -> &'static str {
        match self {
            StructureKind::Array => "Array",
            StructureKind::String => "String",
            StructureKind::LinkedList => "Linked List",
            StructureKind::Stack => "Stack",
            StructureKind::Queue => "Queue",
            StructureKind::Tree => "BST",
        }
    }

    pub fn index(self) -> usize {
        StructureKind::ALL
            .iter()
            .position(|k| *k == self)
            .unwrap_or_default()
    }

    pub fn next(self) -> Self {
        StructureKind::ALL[(self.index() + 1) % StructureKind::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let len = StructureKind::ALL.len();
        StructureKind::ALL[(self.index() + len - 1) % len]
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A parsed operation waiting to be stepped to completion
#[derive(Debug, Clone, PartialEq)]
pub enum PendingOp {
    Array(ArrayOp),
    String(StringOp),
    List(ListOp),
    Stack(StackOp),
    Queue(QueueOp),
    Tree(TreeOp),
}

impl fmt::Display for PendingOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingOp::Array(op) => fmt_seq(f, op),
            PendingOp::String(SeqOp::Insert { index, values }) => {
                let text: String = values.iter().collect();
                write!(f, "insert {index} \"{text}\"")
            }
            PendingOp::String(op) => fmt_seq(f, op),
            PendingOp::List(op) => match op {
                ListOp::InsertHead { value } => write!(f, "head {value}"),
                ListOp::InsertTail { value } => write!(f, "tail {value}"),
                ListOp::InsertAt { position, value } => write!(f, "at {position} {value}"),
                ListOp::Delete { position } => write!(f, "delete {position}"),
                ListOp::Update { position, value } => write!(f, "update {position} {value}"),
                ListOp::Search { value } => write!(f, "search {value}"),
            },
            PendingOp::Stack(op) => match op {
                StackOp::Push { value } => write!(f, "push {value}"),
                StackOp::Pop => f.write_str("pop"),
                StackOp::Peek => f.write_str("peek"),
            },
            PendingOp::Queue(op) => match op {
                QueueOp::Enqueue { value } => write!(f, "enqueue {value}"),
                QueueOp::Dequeue => f.write_str("dequeue"),
                QueueOp::Front => f.write_str("front"),
            },
            PendingOp::Tree(op) => match op {
                TreeOp::Insert { value } => write!(f, "insert {value}"),
                TreeOp::Delete { value } => write!(f, "delete {value}"),
                TreeOp::Search { value } => write!(f, "search {value}"),
                TreeOp::Traverse { order } => write!(f, "{order}"),
            },
        }
    }
}

fn fmt_seq<T: fmt::Display>(f: &mut fmt::Formatter<'_>, op: &SeqOp<T>) -> fmt::Result {
    match op {
        SeqOp::Insert { index, values } => {
            write!(f, "insert {index}")?;
            for value in values {
                write!(f, " {value}")?;
            }
            Ok(())
        }
        SeqOp::Remove { index } => write!(f, "remove {index}"),
        SeqOp::Search { value } => write!(f, "search {value}"),
        SeqOp::Update { index, value } => write!(f, "update {index} {value}"),
    }
}

/// Serializable picture of one container's logical value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "structure", rename_all = "snake_case")]
pub enum Snapshot {
    Array {
        values: Vec<i32>,
    },
    String {
        text: String,
    },
    LinkedList {
        values: Vec<i32>,
        head: Option<i32>,
        tail: Option<i32>,
    },
    Stack {
        /// Bottom to top
        values: Vec<i32>,
        top: Option<i32>,
    },
    Queue {
        /// Front to rear
        values: Vec<i32>,
        front: Option<i32>,
        rear: Option<i32>,
    },
    Tree {
        root: Option<i32>,
        inorder: Vec<i32>,
        preorder: Vec<i32>,
        height: usize,
    },
}

#[derive(Debug, Clone)]
pub struct Workbench {
    pub array: ArrayController,
    pub string: StringController,
    pub list: LinkedListController,
    pub stack: StackController,
    pub queue: QueueController,
    pub tree: BinaryTreeController,
}

impl Default for Workbench {
    fn default() -> Self {
        Self::seeded()
    }
}

impl Workbench {
    /// Every structure with its starting contents
    pub fn seeded() -> Self {
        Self {
            array: ArrayController::new(vec![10, 20, 30, 40, 50]),
            string: StringController::new("Hello"),
            list: LinkedListController::new(vec![10, 20, 30, 40]),
            stack: StackController::new(vec![10, 20, 30, 40, 50]),
            queue: QueueController::new(vec![10, 20, 30, 40]),
            tree: BinaryTreeController::from_values([60, 55, 65, 45, 57, 62, 70]),
        }
    }

    fn controller(&self, kind: StructureKind) -> &dyn Inspect {
        match kind {
            StructureKind::Array => &self.array,
            StructureKind::String => &self.string,
            StructureKind::LinkedList => &self.list,
            StructureKind::Stack => &self.stack,
            StructureKind::Queue => &self.queue,
            StructureKind::Tree => &self.tree,
        }
    }

    /// Advance `op` by one frame on the controller it targets
    pub fn step(&mut self, op: &PendingOp) -> VizResult<Step> {
        match op {
            PendingOp::Array(op) => self.array.step(op),
            PendingOp::String(op) => self.string.step(op),
            PendingOp::List(op) => self.list.step(op),
            PendingOp::Stack(op) => self.stack.step(op),
            PendingOp::Queue(op) => self.queue.step(op),
            PendingOp::Tree(op) => self.tree.step(op),
        }
    }

    pub fn is_animating(&self, kind: StructureKind) -> bool {
        self.controller(kind).is_animating()
    }

    pub fn any_animating(&self) -> bool {
        StructureKind::ALL.iter().any(|k| self.is_animating(*k))
    }

    pub fn progress(&self, kind: StructureKind) -> f32 {
        self.controller(kind).progress()
    }

    pub fn len(&self, kind: StructureKind) -> usize {
        self.controller(kind).len()
    }

    pub fn scene(&self, kind: StructureKind) -> Scene {
        self.controller(kind).scene()
    }

    pub fn speed(&self) -> f32 {
        self.array.speed()
    }

    /// Apply one speed to every controller
    pub fn set_speed(&mut self, speed: f32) {
        self.array.set_speed(speed);
        self.string.set_speed(speed);
        self.list.set_speed(speed);
        self.stack.set_speed(speed);
        self.queue.set_speed(speed);
        self.tree.set_speed(speed);
    }

    pub fn snapshot(&self, kind: StructureKind) -> Snapshot {
        match kind {
            StructureKind::Array => Snapshot::Array {
                values: self.array.items().to_vec(),
            },
            StructureKind::String => Snapshot::String {
                text: self.string.text(),
            },
            StructureKind::LinkedList => Snapshot::LinkedList {
                values: self.list.values(),
                head: self.list.head(),
                tail: self.list.tail(),
            },
            StructureKind::Stack => Snapshot::Stack {
                values: self.stack.items().to_vec(),
                top: self.stack.top(),
            },
            StructureKind::Queue => Snapshot::Queue {
                values: self.queue.items(),
                front: self.queue.front(),
                rear: self.queue.rear(),
            },
            StructureKind::Tree => Snapshot::Tree {
                root: self.tree.root_value(),
                inorder: self.tree.values(TraversalOrder::Inorder),
                preorder: self.tree.values(TraversalOrder::Preorder),
                height: self.tree.height(),
            },
        }
    }

    /// Human-readable result of a finished operation, when it has one
    pub fn report(&self, op: &PendingOp) -> Option<String> {
        match op {
            PendingOp::Array(SeqOp::Search { value }) => {
                Some(describe_search(value, self.array.last_search()?, "index"))
            }
            PendingOp::String(SeqOp::Search { value }) => {
                Some(describe_search(&format!("'{value}'"), self.string.last_search()?, "index"))
            }
            PendingOp::List(ListOp::Search { value }) => {
                Some(describe_search(value, self.list.last_search()?, "position"))
            }
            PendingOp::Stack(StackOp::Peek) => {
                self.stack.last_peek().map(|v| format!("top is {v}"))
            }
            PendingOp::Queue(QueueOp::Front) => {
                self.queue.last_front().map(|v| format!("front is {v}"))
            }
            PendingOp::Tree(TreeOp::Search { value }) => match self.tree.last_search()? {
                SearchOutcome::Found(_) => Some(format!("found {value}")),
                SearchOutcome::NotFound => Some(format!("{value} not found")),
            },
            PendingOp::Tree(TreeOp::Traverse { .. }) => {
                let (order, values) = self.tree.last_traversal()?;
                let joined: Vec<String> = values.iter().map(i32::to_string).collect();
                Some(format!("{order}: {}", joined.join(" ")))
            }
            _ => None,
        }
    }
}

fn describe_search(value: &impl fmt::Display, outcome: SearchOutcome<usize>, unit: &str) -> String {
    match outcome {
        SearchOutcome::Found(at) => format!("found {value} at {unit} {at}"),
        SearchOutcome::NotFound => format!("{value} not found"),
    }
}

/// Read-only view shared by every controller, usable as a trait object
trait Inspect {
    fn is_animating(&self) -> bool;
    fn progress(&self) -> f32;
    fn len(&self) -> usize;
    fn scene(&self) -> Scene;
}

impl<C: Controller> Inspect for C {
    fn is_animating(&self) -> bool {
        Controller::is_animating(self)
    }

    fn progress(&self) -> f32 {
        Controller::progress(self)
    }

    fn len(&self) -> usize {
        Controller::len(self)
    }

    fn scene(&self) -> Scene {
        Controller::scene(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_contents() {
        let bench = Workbench::seeded();
        assert_eq!(bench.len(StructureKind::Array), 5);
        assert_eq!(bench.len(StructureKind::String), 5);
        assert_eq!(bench.len(StructureKind::LinkedList), 4);
        assert_eq!(bench.len(StructureKind::Stack), 5);
        assert_eq!(bench.len(StructureKind::Queue), 4);
        assert_eq!(bench.len(StructureKind::Tree), 7);
        assert!(!bench.any_animating());
    }

    #[test]
    fn test_kind_cycles() {
        assert_eq!(StructureKind::Tree.next(), StructureKind::Array);
        assert_eq!(StructureKind::Array.prev(), StructureKind::Tree);
        assert_eq!(StructureKind::Queue.index(), 4);
    }

    #[test]
    fn test_snapshot_serializes_with_tag() {
        let bench = Workbench::seeded();
        let json = serde_json::to_value(bench.snapshot(StructureKind::Stack)).unwrap();
        assert_eq!(json["structure"], "stack");
        assert_eq!(json["top"], 50);
    }

    #[test]
    fn test_set_speed_reaches_every_controller() {
        let mut bench = Workbench::seeded();
        bench.set_speed(0.2);
        assert_eq!(bench.tree.speed(), 0.2);
        assert_eq!(bench.queue.speed(), 0.2);
        bench.set_speed(50.0);
        assert_eq!(bench.speed(), crate::animation::MAX_SPEED);
    }

    #[test]
    fn test_op_display() {
        let op = PendingOp::String(SeqOp::Insert {
            index: 1,
            values: vec!['a', 'b'],
        });
        assert_eq!(op.to_string(), "insert 1 \"ab\"");
        let op = PendingOp::Tree(TreeOp::Traverse {
            order: TraversalOrder::Preorder,
        });
        assert_eq!(op.to_string(), "preorder");
    }
}
