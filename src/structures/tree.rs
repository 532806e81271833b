//! Binary search tree controller.
//!
//! Smaller values go left and values greater than or equal to a node go
//! right. Node ownership is held by an [`Arena`]; each node is reachable from
//! exactly one parent link (or the root) and is released once, at the commit
//! point of the delete that removes it.
//!
//! Layout: the root sits at the top centre, each level is [`LEVEL_GAP`] rows
//! lower and a child is offset horizontally by `H_SPREAD / 2^depth` from its
//! parent, so siblings never overlap down to the maximum insert depth.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::Serialize;
use tracing::debug;

use super::arena::{Arena, NodeId};
use super::scene::{Link, Scene, Sprite, Tone};
use super::{ensure_same, Controller, SearchOutcome, Step, CELL_HEIGHT, CELL_WIDTH};
use crate::animation::{advance, clamp_speed, lerp_point, Highlights, Hold, DEFAULT_SPEED};
use crate::error::{VizError, VizResult};

/// Horizontal offset of the root's children; halves at every level
const H_SPREAD: f32 = 32.0;

/// Vertical distance between levels
pub const LEVEL_GAP: f32 = 5.0;

/// An insert whose walk reaches this many levels is refused
pub const MAX_DEPTH: usize = 4;

/// How long each node on an insert path is highlighted
pub const NODE_HIGHLIGHT_SECS: f32 = 0.3;

/// Pause on each node visited by a search
pub const SEARCH_STEP_SECS: f32 = 0.5;

/// Total blink time once a search hits, and the on/off interval
pub const BLINK_SECS: f32 = 4.0;
pub const BLINK_INTERVAL_SECS: f32 = 0.2;

/// How long each node is highlighted during a traversal
pub const TRAVERSAL_HOLD_SECS: f32 = 0.8;

/// Speed multiplier for the insert drop
const DROP_RATE: f32 = 0.5;

/// Fixed per-frame rate of the delete fade and move phases
const DELETE_RATE: f32 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalOrder {
    Inorder,
    Preorder,
    Postorder,
}

impl TraversalOrder {
    pub const ALL: [TraversalOrder; 3] = [
        TraversalOrder::Inorder,
        TraversalOrder::Preorder,
        TraversalOrder::Postorder,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TraversalOrder::Inorder => "inorder",
            TraversalOrder::Preorder => "preorder",
            TraversalOrder::Postorder => "postorder",
        }
    }
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TraversalOrder {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TraversalOrder::ALL
            .into_iter()
            .find(|order| order.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| VizError::InvalidInput(format!("unknown traversal order: {s}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeOp {
    Insert { value: i32 },
    Delete { value: i32 },
    Search { value: i32 },
    Traverse { order: TraversalOrder },
}

impl TreeOp {
    pub fn name(&self) -> &'static str {
        match self {
            TreeOp::Insert { .. } => "insert",
            TreeOp::Delete { .. } => "delete",
            TreeOp::Search { .. } => "search",
            TreeOp::Traverse { order } => order.name(),
        }
    }
}

#[derive(Debug, Clone)]
struct TreeNode {
    value: i32,
    left: Option<NodeId>,
    right: Option<NodeId>,
    pos: Vec2,
}

/// Which node takes the deleted node's place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Replacement {
    None,
    Child(NodeId),
    /// Leftmost node of the right subtree, with its parent
    Successor { succ: NodeId, succ_parent: NodeId },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DeletePhase {
    Fade { progress: f32 },
    Move { progress: f32 },
}

#[derive(Debug, Clone, Default)]
enum TreeAnim {
    #[default]
    Idle,
    InsertWalk {
        value: i32,
        path: Vec<NodeId>,
        step: usize,
        hold: Hold,
        go_left: bool,
    },
    InsertDrop {
        node: NodeId,
        parent: NodeId,
        go_left: bool,
        /// Number of walk steps already shown, for progress reporting
        walked: usize,
        from: Vec2,
        to: Vec2,
        progress: f32,
    },
    Delete {
        target: NodeId,
        parent: Option<NodeId>,
        replacement: Replacement,
        from: Vec2,
        phase: DeletePhase,
    },
    Search {
        value: i32,
        cursor: Option<NodeId>,
        visited: usize,
        delay: Hold,
        blink: Option<Hold>,
    },
    Traverse {
        order: TraversalOrder,
        path: Vec<NodeId>,
        cursor: usize,
        hold: Hold,
    },
}

/// Lazy depth-first walk over the tree in one of the three orders.
///
/// Uses an explicit stack of `(node, expanded)` pairs, so walking a
/// degenerate tree never recurses.
pub struct Walk<'a> {
    tree: &'a BinaryTreeController,
    order: TraversalOrder,
    stack: Vec<(NodeId, bool)>,
}

impl Iterator for Walk<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        while let Some((id, expanded)) = self.stack.pop() {
            if expanded {
                return Some(id);
            }
            let Some(node) = self.tree.nodes.get(id) else {
                continue;
            };
            let (left, right) = (node.left, node.right);
            // Pushed in reverse of the order they should be emitted
            match self.order {
                TraversalOrder::Preorder => {
                    self.stack.extend(right.map(|r| (r, false)));
                    self.stack.extend(left.map(|l| (l, false)));
                    self.stack.push((id, true));
                }
                TraversalOrder::Inorder => {
                    self.stack.extend(right.map(|r| (r, false)));
                    self.stack.push((id, true));
                    self.stack.extend(left.map(|l| (l, false)));
                }
                TraversalOrder::Postorder => {
                    self.stack.push((id, true));
                    self.stack.extend(right.map(|r| (r, false)));
                    self.stack.extend(left.map(|l| (l, false)));
                }
            }
        }
        None
    }
}

#[derive(Debug, Clone)]
pub struct BinaryTreeController {
    nodes: Arena<TreeNode>,
    root: Option<NodeId>,
    origin: Vec2,
    highlights: Highlights<NodeId>,
    speed: f32,
    anim: TreeAnim,
    active: Option<TreeOp>,
    last_search: Option<SearchOutcome<i32>>,
    last_traversal: Option<(TraversalOrder, Vec<i32>)>,
}

impl Default for BinaryTreeController {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryTreeController {
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            origin: Vec2::new(40.0, 2.0),
            highlights: Highlights::new(),
            speed: DEFAULT_SPEED,
            anim: TreeAnim::Idle,
            active: None,
            last_search: None,
            last_traversal: None,
        }
    }

    /// Build a tree by plain BST insertion, without animation or depth cap
    pub fn from_values(values: impl IntoIterator<Item = i32>) -> Self {
        let mut tree = Self::new();
        for value in values {
            let (parent, go_left, _) = tree.descend(value);
            let id = tree.nodes.alloc(TreeNode {
                value,
                left: None,
                right: None,
                pos: Vec2::ZERO,
            });
            tree.attach(parent, go_left, id);
        }
        tree.relayout();
        tree
    }

    pub fn root_value(&self) -> Option<i32> {
        self.root.and_then(|id| self.value_of(id))
    }

    /// Lazily walk the linked nodes in `order`
    pub fn walk(&self, order: TraversalOrder) -> Walk<'_> {
        Walk {
            tree: self,
            order,
            stack: self.root.map(|r| (r, false)).into_iter().collect(),
        }
    }

    /// Values in `order`, computed without animation
    pub fn values(&self, order: TraversalOrder) -> Vec<i32> {
        self.walk(order).filter_map(|id| self.value_of(id)).collect()
    }

    pub fn contains(&self, value: i32) -> bool {
        self.find(value).is_some()
    }

    /// Number of levels; 0 for an empty tree
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            height = height.max(depth);
            if let Some(node) = self.nodes.get(id) {
                stack.extend(node.left.map(|l| (l, depth + 1)));
                stack.extend(node.right.map(|r| (r, depth + 1)));
            }
        }
        height
    }

    /// Left and right child values of the node holding `value`
    pub fn children_of(&self, value: i32) -> Option<(Option<i32>, Option<i32>)> {
        let (id, _) = self.find(value)?;
        let node = self.nodes.get(id)?;
        Some((
            node.left.and_then(|l| self.value_of(l)),
            node.right.and_then(|r| self.value_of(r)),
        ))
    }

    /// Position of the node holding `value`
    pub fn position_of(&self, value: i32) -> Option<Vec2> {
        let (id, _) = self.find(value)?;
        self.nodes.get(id).map(|n| n.pos)
    }

    pub fn highlights(&self) -> &Highlights<NodeId> {
        &self.highlights
    }

    pub fn last_search(&self) -> Option<SearchOutcome<i32>> {
        self.last_search
    }

    /// Order and visited values of the last completed traversal
    pub fn last_traversal(&self) -> Option<(TraversalOrder, &[i32])> {
        self.last_traversal
            .as_ref()
            .map(|(order, values)| (*order, values.as_slice()))
    }

    /// Nodes held by the arena, including a new node still in flight
    pub fn allocated(&self) -> usize {
        self.nodes.live()
    }

    pub fn insert(&mut self, value: i32) -> VizResult<Step> {
        self.step(&TreeOp::Insert { value })
    }

    pub fn delete(&mut self, value: i32) -> VizResult<Step> {
        self.step(&TreeOp::Delete { value })
    }

    pub fn search(&mut self, value: i32) -> VizResult<Step> {
        self.step(&TreeOp::Search { value })
    }

    pub fn traverse(&mut self, order: TraversalOrder) -> VizResult<Step> {
        self.step(&TreeOp::Traverse { order })
    }

    fn value_of(&self, id: NodeId) -> Option<i32> {
        self.nodes.get(id).map(|n| n.value)
    }

    fn left_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.left)
    }

    fn right_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.right)
    }

    fn pos_of(&self, id: NodeId) -> Vec2 {
        self.nodes.get(id).map(|n| n.pos).unwrap_or(self.origin)
    }

    fn set_pos(&mut self, id: NodeId, pos: Vec2) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.pos = pos;
        }
    }

    /// Walk down by BST comparison. Returns the last node visited, whether
    /// `value` belongs on its left, and the visited path.
    fn descend(&self, value: i32) -> (Option<NodeId>, bool, Vec<NodeId>) {
        let mut path = Vec::new();
        let mut parent = None;
        let mut go_left = false;
        let mut cursor = self.root;
        while let Some(id) = cursor {
            path.push(id);
            parent = Some(id);
            let Some(node) = self.nodes.get(id) else {
                break;
            };
            go_left = value < node.value;
            cursor = if go_left { node.left } else { node.right };
        }
        (parent, go_left, path)
    }

    /// Locate `value` and its parent
    fn find(&self, value: i32) -> Option<(NodeId, Option<NodeId>)> {
        let mut parent = None;
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = self.nodes.get(id)?;
            if value == node.value {
                return Some((id, parent));
            }
            parent = Some(id);
            cursor = if value < node.value { node.left } else { node.right };
        }
        None
    }

    fn attach(&mut self, parent: Option<NodeId>, go_left: bool, id: NodeId) {
        match parent.and_then(|p| self.nodes.get_mut(p)) {
            Some(node) if go_left => node.left = Some(id),
            Some(node) => node.right = Some(id),
            None => self.root = Some(id),
        }
    }

    /// Point whichever link referenced `old` at `new` instead
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent.and_then(|p| self.nodes.get_mut(p)) {
            Some(node) if node.left == Some(old) => node.left = new,
            Some(node) => node.right = new,
            None => self.root = new,
        }
    }

    /// Horizontal offset of a child at `depth` from its parent
    fn spread(depth: usize) -> f32 {
        H_SPREAD / 2f32.powi(depth as i32)
    }

    fn child_position(parent_pos: Vec2, depth: usize, go_left: bool) -> Vec2 {
        let dx = Self::spread(depth);
        Vec2::new(
            if go_left {
                parent_pos.x - dx
            } else {
                parent_pos.x + dx
            },
            parent_pos.y + LEVEL_GAP,
        )
    }

    fn root_position(&self) -> Vec2 {
        self.origin - Vec2::new(CELL_WIDTH / 2.0, 0.0)
    }

    /// Snap every linked node to the slot its depth and side dictate
    fn relayout(&mut self) {
        let mut stack: Vec<(NodeId, usize, Vec2)> = self
            .root
            .map(|r| (r, 0, self.root_position()))
            .into_iter()
            .collect();
        while let Some((id, depth, pos)) = stack.pop() {
            self.set_pos(id, pos);
            if let Some(l) = self.left_of(id) {
                stack.push((l, depth + 1, Self::child_position(pos, depth + 1, true)));
            }
            if let Some(r) = self.right_of(id) {
                stack.push((r, depth + 1, Self::child_position(pos, depth + 1, false)));
            }
        }
    }

    fn begin(&mut self, op: &TreeOp) -> Step {
        self.highlights.clear();
        let anim = match *op {
            TreeOp::Insert { value } => self.begin_insert(value),
            TreeOp::Delete { value } => self.begin_delete(value),
            TreeOp::Search { value } => {
                self.last_search = None;
                if let Some(root) = self.root {
                    self.highlights.only(root, Tone::Searching);
                }
                Some(TreeAnim::Search {
                    value,
                    cursor: self.root,
                    visited: 0,
                    delay: Hold::new(SEARCH_STEP_SECS),
                    blink: None,
                })
            }
            TreeOp::Traverse { order } => {
                let path: Vec<NodeId> = self.walk(order).collect();
                match path.first() {
                    Some(&first) => {
                        self.highlights.only(first, Tone::Visiting);
                        Some(TreeAnim::Traverse {
                            order,
                            path,
                            cursor: 0,
                            hold: Hold::new(TRAVERSAL_HOLD_SECS),
                        })
                    }
                    None => {
                        self.last_traversal = Some((order, Vec::new()));
                        None
                    }
                }
            }
        };

        match anim {
            Some(anim) => {
                debug!(op = op.name(), "tree animation started");
                self.anim = anim;
                self.active = Some(*op);
                Step::Running
            }
            None => {
                debug!(op = op.name(), "tree operation finished without animation");
                Step::Complete
            }
        }
    }

    fn begin_insert(&mut self, value: i32) -> Option<TreeAnim> {
        if self.root.is_none() {
            // Commit point for an empty tree: the root appears at once
            let id = self.nodes.alloc(TreeNode {
                value,
                left: None,
                right: None,
                pos: self.root_position(),
            });
            self.root = Some(id);
            return None;
        }

        let (_, go_left, path) = self.descend(value);
        if path.len() >= MAX_DEPTH {
            debug!(value, depth = path.len(), "tree insert exceeds maximum depth");
            return None;
        }
        self.highlights.only(path[0], Tone::Searching);
        Some(TreeAnim::InsertWalk {
            value,
            path,
            step: 0,
            hold: Hold::new(NODE_HIGHLIGHT_SECS),
            go_left,
        })
    }

    fn begin_delete(&mut self, value: i32) -> Option<TreeAnim> {
        let (target, parent) = self.find(value)?;
        let replacement = match (self.left_of(target), self.right_of(target)) {
            (Some(_), Some(right)) => {
                let mut succ_parent = target;
                let mut succ = right;
                while let Some(left) = self.left_of(succ) {
                    succ_parent = succ;
                    succ = left;
                }
                Replacement::Successor { succ, succ_parent }
            }
            (Some(child), None) | (None, Some(child)) => Replacement::Child(child),
            (None, None) => Replacement::None,
        };
        self.highlights.mark(target, Tone::Removing);
        if let Replacement::Successor { succ, .. } | Replacement::Child(succ) = replacement {
            self.highlights.mark(succ, Tone::Inserting);
        }
        let from = match replacement {
            Replacement::Successor { succ, .. } | Replacement::Child(succ) => self.pos_of(succ),
            Replacement::None => self.pos_of(target),
        };
        Some(TreeAnim::Delete {
            target,
            parent,
            replacement,
            from,
            phase: DeletePhase::Fade { progress: 0.0 },
        })
    }

    fn tick(&mut self) -> Step {
        let next = match std::mem::take(&mut self.anim) {
            TreeAnim::Idle => None,
            TreeAnim::InsertWalk {
                value,
                path,
                step,
                hold,
                go_left,
            } => self.tick_walk(value, path, step, hold, go_left),
            TreeAnim::InsertDrop {
                node,
                parent,
                go_left,
                walked,
                from,
                to,
                progress,
            } => {
                let progress = advance(progress, self.speed * DROP_RATE);
                self.set_pos(node, lerp_point(from, to, progress));
                if progress >= 1.0 {
                    // Commit point: linked in once it reaches its slot
                    self.attach(Some(parent), go_left, node);
                    debug!(value = self.value_of(node), "tree insert committed");
                    None
                } else {
                    Some(TreeAnim::InsertDrop {
                        node,
                        parent,
                        go_left,
                        walked,
                        from,
                        to,
                        progress,
                    })
                }
            }
            TreeAnim::Delete {
                target,
                parent,
                replacement,
                from,
                phase,
            } => self.tick_delete(target, parent, replacement, from, phase),
            TreeAnim::Search {
                value,
                cursor,
                visited,
                delay,
                blink,
            } => self.tick_search(value, cursor, visited, delay, blink),
            TreeAnim::Traverse {
                order,
                path,
                mut cursor,
                mut hold,
            } => {
                if hold.tick() {
                    self.highlights.mark(path[cursor], Tone::Found);
                    cursor += 1;
                    hold.reset();
                }
                match path.get(cursor) {
                    Some(&id) => {
                        self.highlights.mark(id, Tone::Visiting);
                        Some(TreeAnim::Traverse {
                            order,
                            path,
                            cursor,
                            hold,
                        })
                    }
                    None => {
                        let values = path.iter().filter_map(|&id| self.value_of(id)).collect();
                        self.last_traversal = Some((order, values));
                        None
                    }
                }
            }
        };

        match next {
            Some(anim) => {
                self.anim = anim;
                Step::Running
            }
            None => {
                self.relayout();
                self.highlights.clear();
                self.active = None;
                Step::Complete
            }
        }
    }

    fn tick_walk(
        &mut self,
        value: i32,
        path: Vec<NodeId>,
        mut step: usize,
        mut hold: Hold,
        go_left: bool,
    ) -> Option<TreeAnim> {
        if hold.tick() {
            step += 1;
            hold.reset();
        }
        if let Some(&id) = path.get(step) {
            self.highlights.only(id, Tone::Searching);
            return Some(TreeAnim::InsertWalk {
                value,
                path,
                step,
                hold,
                go_left,
            });
        }

        // Walk shown; the new node now drops from its parent
        let parent = *path.last()?;
        let from = self.pos_of(parent);
        let to = Self::child_position(from, path.len(), go_left);
        let node = self.nodes.alloc(TreeNode {
            value,
            left: None,
            right: None,
            pos: from,
        });
        self.highlights.only(node, Tone::Inserting);
        Some(TreeAnim::InsertDrop {
            node,
            parent,
            go_left,
            walked: path.len(),
            from,
            to,
            progress: 0.0,
        })
    }

    fn tick_delete(
        &mut self,
        target: NodeId,
        parent: Option<NodeId>,
        replacement: Replacement,
        from: Vec2,
        phase: DeletePhase,
    ) -> Option<TreeAnim> {
        let phase = match phase {
            DeletePhase::Fade { progress } => {
                let progress = advance(progress, DELETE_RATE);
                self.highlights.set_effect(target, progress);
                if progress >= 1.0 {
                    DeletePhase::Move { progress: 0.0 }
                } else {
                    DeletePhase::Fade { progress }
                }
            }
            DeletePhase::Move { progress } => {
                let progress = advance(progress, DELETE_RATE);
                let slot = self.pos_of(target);
                if let Replacement::Successor { succ: mover, .. } | Replacement::Child(mover) =
                    replacement
                {
                    self.set_pos(mover, lerp_point(from, slot, progress));
                }
                if progress >= 1.0 {
                    self.commit_delete(target, parent, replacement);
                    return None;
                }
                DeletePhase::Move { progress }
            }
        };
        Some(TreeAnim::Delete {
            target,
            parent,
            replacement,
            from,
            phase,
        })
    }

    fn commit_delete(&mut self, target: NodeId, parent: Option<NodeId>, replacement: Replacement) {
        match replacement {
            Replacement::Successor { succ, succ_parent } => {
                // Copy the successor up, then unlink and free the successor
                let value = self.value_of(succ);
                let succ_right = self.right_of(succ);
                if let (Some(node), Some(value)) = (self.nodes.get_mut(target), value) {
                    node.value = value;
                }
                if succ_parent == target {
                    if let Some(node) = self.nodes.get_mut(target) {
                        node.right = succ_right;
                    }
                } else if let Some(node) = self.nodes.get_mut(succ_parent) {
                    node.left = succ_right;
                }
                self.nodes.release(succ);
            }
            Replacement::Child(child) => {
                self.replace_child(parent, target, Some(child));
                self.nodes.release(target);
            }
            Replacement::None => {
                self.replace_child(parent, target, None);
                self.nodes.release(target);
            }
        }
        debug!(live = self.nodes.live(), "tree delete committed");
    }

    fn tick_search(
        &mut self,
        value: i32,
        cursor: Option<NodeId>,
        mut visited: usize,
        mut delay: Hold,
        blink: Option<Hold>,
    ) -> Option<TreeAnim> {
        let Some(current) = cursor else {
            debug!(value, "tree search missed");
            self.last_search = Some(SearchOutcome::NotFound);
            return None;
        };

        if let Some(mut blink) = blink {
            let done = blink.tick();
            let lit = (blink.elapsed() / BLINK_INTERVAL_SECS) as usize % 2 == 0;
            if lit {
                self.highlights.only(current, Tone::Found);
            } else {
                self.highlights.clear();
            }
            if done {
                self.last_search = Some(SearchOutcome::Found(value));
                return None;
            }
            return Some(TreeAnim::Search {
                value,
                cursor,
                visited,
                delay,
                blink: Some(blink),
            });
        }

        self.highlights.only(current, Tone::Searching);
        let mut cursor = cursor;
        let mut blink = None;
        if delay.tick() {
            let node_value = self.value_of(current)?;
            if value == node_value {
                self.highlights.only(current, Tone::Found);
                blink = Some(Hold::new(BLINK_SECS));
            } else {
                cursor = if value < node_value {
                    self.left_of(current)
                } else {
                    self.right_of(current)
                };
                visited += 1;
                delay.reset();
            }
        }
        Some(TreeAnim::Search {
            value,
            cursor,
            visited,
            delay,
            blink,
        })
    }
}

impl Controller for BinaryTreeController {
    type Op = TreeOp;

    fn step(&mut self, op: &TreeOp) -> VizResult<Step> {
        ensure_same(&self.active, op)?;
        if self.active.is_none() {
            return Ok(self.begin(op));
        }
        Ok(self.tick())
    }

    fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    fn progress(&self) -> f32 {
        match &self.anim {
            TreeAnim::Idle => 0.0,
            TreeAnim::InsertWalk { path, step, hold, .. } => {
                (*step as f32 + hold.fraction()) / (path.len() + 1) as f32
            }
            TreeAnim::InsertDrop {
                walked, progress, ..
            } => (*walked as f32 + progress) / (*walked + 1) as f32,
            TreeAnim::Delete { phase, .. } => match phase {
                DeletePhase::Fade { progress } => progress / 2.0,
                DeletePhase::Move { progress } => 0.5 + progress / 2.0,
            },
            TreeAnim::Search {
                visited,
                delay,
                blink,
                ..
            } => {
                let levels = self.height().max(1) as f32;
                let walked = ((*visited as f32 + delay.fraction()) / levels).clamp(0.0, 1.0);
                match blink {
                    Some(blink) => walked + (1.0 - walked) * blink.fraction(),
                    None => walked,
                }
            }
            TreeAnim::Traverse {
                path, cursor, hold, ..
            } => ((*cursor as f32 + hold.fraction()) / path.len().max(1) as f32).min(1.0),
        }
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = clamp_speed(speed);
    }

    fn len(&self) -> usize {
        self.walk(TraversalOrder::Preorder).count()
    }

    fn scene(&self) -> Scene {
        let size = Vec2::new(CELL_WIDTH, CELL_HEIGHT);
        let half = size * 0.5;
        let mut scene = Scene::default();

        for id in self.walk(TraversalOrder::Preorder) {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            for child in [node.left, node.right].into_iter().flatten() {
                let child_pos = self.pos_of(child);
                scene.links.push(Link::line(
                    node.pos + Vec2::new(half.x, size.y),
                    child_pos + Vec2::new(half.x, 0.0),
                ));
            }
            let mark = self.highlights.get(id);
            let mut sprite = Sprite::new(node.value.to_string(), node.pos, size)
                .tone(mark.map(|m| m.tone).unwrap_or_default());
            if let Some(m) = mark.filter(|m| m.tone == Tone::Removing) {
                sprite = sprite.fade(m.effect);
            }
            scene.sprites.push(sprite);
        }

        if let TreeAnim::InsertDrop { node, parent, .. } = &self.anim {
            if let Some(n) = self.nodes.get(*node) {
                let parent_pos = self.pos_of(*parent);
                scene.links.push(Link::line(
                    parent_pos + Vec2::new(half.x, size.y),
                    n.pos + Vec2::new(half.x, 0.0),
                ));
                scene
                    .sprites
                    .push(Sprite::new(n.value.to_string(), n.pos, size).tone(Tone::Inserting));
            }
        }
        scene
    }
}
