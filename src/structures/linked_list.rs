//! Singly linked list of integers.
//!
//! Positions are 1-based, unlike every other controller. Nodes live in an
//! [`Arena`]; a new node is allocated before its animation starts but is only
//! linked into the chain when the animation finishes, and a deleted node stays
//! linked until its fall completes.

use glam::Vec2;
use tracing::debug;

use super::arena::{Arena, NodeId};
use super::scene::{Link, Scene, Sprite, Tone};
use super::sequence::SEARCH_HOLD_SECS;
use super::{
    ensure_same, Controller, SearchOutcome, Step, CELL_HEIGHT, CELL_WIDTH, DROP_HEIGHT,
};
use crate::animation::{
    advance, approach, bounce_offset, clamp_speed, lerp_point, Highlights, Hold, DEFAULT_SPEED,
};
use crate::error::VizResult;

/// Horizontal room left between two nodes for the arrow
const ARROW_GAP: f32 = 4.0;

/// Speed multiplier for inserts and deletes
const MOVE_RATE: f32 = 0.5;

/// Speed multiplier for the update crossfade
const UPDATE_RATE: f32 = 1.0;

/// Horizontal distance a tail insert travels in from
const TAIL_ENTRY: f32 = 3.0 * (CELL_WIDTH + ARROW_GAP);

const FOUND_LIFT: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOp {
    InsertHead { value: i32 },
    InsertTail { value: i32 },
    /// Insert so the new node ends up at `position` (1-based)
    InsertAt { position: usize, value: i32 },
    Delete { position: usize },
    Update { position: usize, value: i32 },
    Search { value: i32 },
}

impl ListOp {
    pub fn name(&self) -> &'static str {
        match self {
            ListOp::InsertHead { .. } => "insert_head",
            ListOp::InsertTail { .. } => "insert_tail",
            ListOp::InsertAt { .. } => "insert_at",
            ListOp::Delete { .. } => "delete",
            ListOp::Update { .. } => "update",
            ListOp::Search { .. } => "search",
        }
    }
}

#[derive(Debug, Clone)]
struct ListNode {
    value: i32,
    next: Option<NodeId>,
    pos: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    /// Falls into its slot from above
    Drop,
    /// Slides in from the right
    Slide,
}

#[derive(Debug, Clone, Default)]
enum ListAnim {
    #[default]
    Idle,
    Insert {
        node: NodeId,
        /// 0-based slot the new node will occupy
        index: usize,
        entry: Entry,
        progress: f32,
    },
    Delete {
        victim: NodeId,
        prev: Option<NodeId>,
        index: usize,
        progress: f32,
    },
    Update {
        node: NodeId,
        shadow: NodeId,
        value: i32,
        progress: f32,
    },
    Search {
        value: i32,
        cursor: Option<NodeId>,
        index: usize,
        dwell: f32,
        found: Option<Hold>,
    },
}

#[derive(Debug, Clone)]
pub struct LinkedListController {
    nodes: Arena<ListNode>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
    origin: Vec2,
    highlights: Highlights<NodeId>,
    speed: f32,
    anim: ListAnim,
    active: Option<ListOp>,
    last_search: Option<SearchOutcome<usize>>,
}

impl LinkedListController {
    pub fn new(values: Vec<i32>) -> Self {
        let mut list = Self {
            nodes: Arena::new(),
            head: None,
            tail: None,
            len: 0,
            origin: Vec2::new(2.0, 6.0),
            highlights: Highlights::new(),
            speed: DEFAULT_SPEED,
            anim: ListAnim::Idle,
            active: None,
            last_search: None,
        };
        for value in values {
            let id = list.nodes.alloc(ListNode {
                value,
                next: None,
                pos: Vec2::ZERO,
            });
            list.link_after(list.tail, id);
        }
        list.relayout();
        list
    }

    /// Values from head to tail
    pub fn values(&self) -> Vec<i32> {
        self.chain()
            .into_iter()
            .filter_map(|id| self.nodes.get(id).map(|n| n.value))
            .collect()
    }

    pub fn head(&self) -> Option<i32> {
        self.head.and_then(|id| self.value_of(id))
    }

    pub fn tail(&self) -> Option<i32> {
        self.tail.and_then(|id| self.value_of(id))
    }

    /// Current on-screen position of every linked node, head first
    pub fn positions(&self) -> Vec<Vec2> {
        self.chain()
            .into_iter()
            .filter_map(|id| self.nodes.get(id).map(|n| n.pos))
            .collect()
    }

    pub fn highlights(&self) -> &Highlights<NodeId> {
        &self.highlights
    }

    /// Outcome of the last search, with a 1-based position
    pub fn last_search(&self) -> Option<SearchOutcome<usize>> {
        self.last_search
    }

    /// Nodes held by the arena, including any detached node in flight
    pub fn allocated(&self) -> usize {
        self.nodes.live()
    }

    pub fn insert_head(&mut self, value: i32) -> VizResult<Step> {
        self.step(&ListOp::InsertHead { value })
    }

    pub fn insert_tail(&mut self, value: i32) -> VizResult<Step> {
        self.step(&ListOp::InsertTail { value })
    }

    pub fn insert_at(&mut self, position: usize, value: i32) -> VizResult<Step> {
        self.step(&ListOp::InsertAt { position, value })
    }

    pub fn delete(&mut self, position: usize) -> VizResult<Step> {
        self.step(&ListOp::Delete { position })
    }

    pub fn update(&mut self, position: usize, value: i32) -> VizResult<Step> {
        self.step(&ListOp::Update { position, value })
    }

    pub fn search(&mut self, value: i32) -> VizResult<Step> {
        self.step(&ListOp::Search { value })
    }

    pub fn slot_position(&self, index: usize) -> Vec2 {
        Vec2::new(
            self.origin.x + index as f32 * (CELL_WIDTH + ARROW_GAP),
            self.origin.y,
        )
    }

    fn value_of(&self, id: NodeId) -> Option<i32> {
        self.nodes.get(id).map(|n| n.value)
    }

    fn next_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.next)
    }

    fn set_pos(&mut self, id: NodeId, pos: Vec2) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.pos = pos;
        }
    }

    fn pos_of(&self, id: NodeId) -> Vec2 {
        self.nodes.get(id).map(|n| n.pos).unwrap_or_default()
    }

    /// Linked node ids from head to tail
    fn chain(&self) -> Vec<NodeId> {
        let mut ids = Vec::with_capacity(self.len);
        let mut cursor = self.head;
        while let Some(id) = cursor {
            ids.push(id);
            cursor = self.next_of(id);
        }
        ids
    }

    /// Node at 0-based `index`
    fn nth(&self, index: usize) -> Option<NodeId> {
        self.chain().get(index).copied()
    }

    /// Splice a detached node after `prev`, or at the head when `prev` is None
    fn link_after(&mut self, prev: Option<NodeId>, id: NodeId) {
        let next = match prev {
            Some(p) => self.next_of(p),
            None => self.head,
        };
        if let Some(node) = self.nodes.get_mut(id) {
            node.next = next;
        }
        match prev {
            Some(p) => {
                if let Some(node) = self.nodes.get_mut(p) {
                    node.next = Some(id);
                }
            }
            None => self.head = Some(id),
        }
        if next.is_none() {
            self.tail = Some(id);
        }
        self.len += 1;
    }

    /// Snap every linked node to its slot
    fn relayout(&mut self) {
        for (i, id) in self.chain().into_iter().enumerate() {
            let slot = self.slot_position(i);
            self.set_pos(id, slot);
        }
    }

    fn begin(&mut self, op: &ListOp) -> Step {
        let anim = match *op {
            ListOp::InsertHead { value } => Some(self.begin_insert(0, value, Entry::Drop)),
            ListOp::InsertTail { value } => {
                Some(self.begin_insert(self.len, value, Entry::Slide))
            }
            ListOp::InsertAt { position, value } => (1..=self.len + 1)
                .contains(&position)
                .then(|| self.begin_insert(position - 1, value, Entry::Drop)),
            ListOp::Delete { position } => self.begin_delete(position),
            ListOp::Update { position, value } => self.begin_update(position, value),
            ListOp::Search { value } => {
                self.relayout();
                self.highlights.clear();
                self.last_search = None;
                Some(ListAnim::Search {
                    value,
                    cursor: self.head,
                    index: 0,
                    dwell: 0.0,
                    found: None,
                })
            }
        };

        match anim {
            Some(anim) => {
                debug!(op = op.name(), len = self.len, "list animation started");
                self.anim = anim;
                self.active = Some(*op);
                Step::Running
            }
            None => {
                debug!(op = op.name(), len = self.len, "list operation ignored");
                Step::Complete
            }
        }
    }

    fn begin_insert(&mut self, index: usize, value: i32, entry: Entry) -> ListAnim {
        let slot = self.slot_position(index);
        let start = match entry {
            Entry::Drop => slot - Vec2::new(0.0, DROP_HEIGHT),
            Entry::Slide => slot + Vec2::new(TAIL_ENTRY, 0.0),
        };
        let node = self.nodes.alloc(ListNode {
            value,
            next: None,
            pos: start,
        });
        self.highlights.clear();
        self.highlights.mark(node, Tone::Inserting);
        ListAnim::Insert {
            node,
            index,
            entry,
            progress: 0.0,
        }
    }

    fn begin_delete(&mut self, position: usize) -> Option<ListAnim> {
        if position == 0 || position > self.len {
            return None;
        }
        let index = position - 1;
        let victim = self.nth(index)?;
        let prev = index.checked_sub(1).and_then(|i| self.nth(i));
        self.highlights.clear();
        self.highlights.mark(victim, Tone::Removing);
        Some(ListAnim::Delete {
            victim,
            prev,
            index,
            progress: 0.0,
        })
    }

    fn begin_update(&mut self, position: usize, value: i32) -> Option<ListAnim> {
        if position == 0 || position > self.len {
            return None;
        }
        let node = self.nth(position - 1)?;
        let old = self.nodes.get(node)?;
        let shadow = ListNode {
            value: old.value,
            next: None,
            pos: old.pos,
        };
        let shadow = self.nodes.alloc(shadow);
        self.highlights.only(node, Tone::Inserting);
        self.highlights.mark(shadow, Tone::Removing);
        Some(ListAnim::Update {
            node,
            shadow,
            value,
            progress: 0.0,
        })
    }

    fn tick(&mut self) -> Step {
        let next = match std::mem::take(&mut self.anim) {
            ListAnim::Idle => None,
            ListAnim::Insert {
                node,
                index,
                entry,
                progress,
            } => self.tick_insert(node, index, entry, progress),
            ListAnim::Delete {
                victim,
                prev,
                index,
                progress,
            } => self.tick_delete(victim, prev, index, progress),
            ListAnim::Update {
                node,
                shadow,
                value,
                progress,
            } => self.tick_update(node, shadow, value, progress),
            ListAnim::Search {
                value,
                cursor,
                index,
                dwell,
                found,
            } => self.tick_search(value, cursor, index, dwell, found),
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

    fn tick_insert(
        &mut self,
        node: NodeId,
        index: usize,
        entry: Entry,
        progress: f32,
    ) -> Option<ListAnim> {
        let progress = advance(progress, self.speed * MOVE_RATE);
        let target = self.slot_position(index);
        let pos = match entry {
            Entry::Drop => lerp_point(target - Vec2::new(0.0, DROP_HEIGHT), target, progress),
            Entry::Slide => approach(self.pos_of(node), target, progress),
        };
        self.set_pos(node, pos);
        for (i, id) in self.chain().into_iter().enumerate().skip(index) {
            let shifted = lerp_point(self.slot_position(i), self.slot_position(i + 1), progress);
            self.set_pos(id, shifted);
        }

        if progress < 1.0 {
            return Some(ListAnim::Insert {
                node,
                index,
                entry,
                progress,
            });
        }
        // Commit point: relink only once the node has landed
        let prev = index.checked_sub(1).and_then(|i| self.nth(i));
        self.link_after(prev, node);
        debug!(index, len = self.len, "list insert committed");
        None
    }

    fn tick_delete(
        &mut self,
        victim: NodeId,
        prev: Option<NodeId>,
        index: usize,
        progress: f32,
    ) -> Option<ListAnim> {
        let progress = advance(progress, self.speed * MOVE_RATE);
        let slot = self.slot_position(index);
        self.set_pos(victim, slot + Vec2::new(0.0, DROP_HEIGHT * progress));
        for (i, id) in self.chain().into_iter().enumerate().skip(index + 1) {
            let shifted = lerp_point(self.slot_position(i), self.slot_position(i - 1), progress);
            self.set_pos(id, shifted);
        }

        if progress < 1.0 {
            return Some(ListAnim::Delete {
                victim,
                prev,
                index,
                progress,
            });
        }
        // Commit point: bypass the victim, then release it exactly once
        let next = self.next_of(victim);
        match prev {
            Some(p) => {
                if let Some(node) = self.nodes.get_mut(p) {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        if self.tail == Some(victim) {
            self.tail = prev;
        }
        self.nodes.release(victim);
        self.len -= 1;
        debug!(index, len = self.len, "list delete committed");
        None
    }

    fn tick_update(
        &mut self,
        node: NodeId,
        shadow: NodeId,
        value: i32,
        progress: f32,
    ) -> Option<ListAnim> {
        let progress = advance(progress, self.speed * UPDATE_RATE);
        let slot = self.slot_of(node);
        self.set_pos(shadow, slot + Vec2::new(0.0, DROP_HEIGHT * progress));
        self.set_pos(node, slot - Vec2::new(0.0, DROP_HEIGHT * (1.0 - progress)));

        // Commit point: the value swaps halfway through the crossfade
        if progress >= 0.5 {
            if let Some(n) = self.nodes.get_mut(node) {
                n.value = value;
            }
        }

        if progress < 1.0 {
            return Some(ListAnim::Update {
                node,
                shadow,
                value,
                progress,
            });
        }
        self.nodes.release(shadow);
        None
    }

    /// Resting slot of a linked node
    fn slot_of(&self, id: NodeId) -> Vec2 {
        let index = self
            .chain()
            .iter()
            .position(|&linked| linked == id)
            .unwrap_or_default();
        self.slot_position(index)
    }

    fn tick_search(
        &mut self,
        value: i32,
        cursor: Option<NodeId>,
        mut index: usize,
        mut dwell: f32,
        found: Option<Hold>,
    ) -> Option<ListAnim> {
        let Some(current) = cursor else {
            debug!(value, "list search exhausted");
            self.last_search = Some(SearchOutcome::NotFound);
            return None;
        };

        if let Some(mut hold) = found {
            let done = hold.tick();
            self.highlights.decay(current, self.speed * 0.5);
            if done {
                self.last_search = Some(SearchOutcome::Found(index + 1));
                return None;
            }
            return Some(ListAnim::Search {
                value,
                cursor,
                index,
                dwell,
                found: Some(hold),
            });
        }

        self.highlights.only(current, Tone::Searching);
        dwell = advance(dwell, self.speed);
        let mut cursor = cursor;
        let mut found = None;
        if dwell >= 1.0 {
            if self.value_of(current) == Some(value) {
                self.highlights.only(current, Tone::Found);
                self.highlights.set_effect(current, 1.0);
                let lifted = self.slot_position(index) - Vec2::new(0.0, FOUND_LIFT);
                self.set_pos(current, lifted);
                found = Some(Hold::new(SEARCH_HOLD_SECS));
            } else {
                cursor = self.next_of(current);
                index += 1;
                dwell = 0.0;
            }
        }
        Some(ListAnim::Search {
            value,
            cursor,
            index,
            dwell,
            found,
        })
    }

    fn sprite(&self, id: NodeId, label: i32, caption: Option<String>) -> Option<Sprite> {
        let node = self.nodes.get(id)?;
        let mark = self.highlights.get(id);
        let lift = mark.map(|m| bounce_offset(m.effect)).unwrap_or(0.0);
        let mut sprite = Sprite::new(
            label.to_string(),
            node.pos + Vec2::new(0.0, lift),
            Vec2::new(CELL_WIDTH, CELL_HEIGHT),
        )
        .tone(mark.map(|m| m.tone).unwrap_or_default());
        if let Some(caption) = caption {
            sprite = sprite.caption(caption);
        }
        Some(sprite)
    }
}

impl Controller for LinkedListController {
    type Op = ListOp;

    fn step(&mut self, op: &ListOp) -> VizResult<Step> {
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
            ListAnim::Idle => 0.0,
            ListAnim::Insert { progress, .. }
            | ListAnim::Delete { progress, .. }
            | ListAnim::Update { progress, .. } => *progress,
            ListAnim::Search {
                index,
                dwell,
                found,
                ..
            } => {
                let len = self.len.max(1) as f32;
                let scanned = ((*index as f32 + dwell) / len).clamp(0.0, 1.0);
                match found {
                    Some(hold) => scanned + (1.0 - scanned) * hold.fraction(),
                    None => scanned,
                }
            }
        }
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = clamp_speed(speed);
    }

    fn len(&self) -> usize {
        self.len
    }

    fn scene(&self) -> Scene {
        let mut scene = Scene::default();
        let chain = self.chain();

        let incoming = match self.anim {
            ListAnim::Update { node, value, .. } => Some((node, value)),
            _ => None,
        };

        for (i, &id) in chain.iter().enumerate() {
            let label = match incoming {
                Some((node, value)) if node == id => value,
                _ => self.value_of(id).unwrap_or_default(),
            };
            scene
                .sprites
                .extend(self.sprite(id, label, Some((i + 1).to_string())));
        }

        for pair in chain.windows(2) {
            let (from, to) = (self.pos_of(pair[0]), self.pos_of(pair[1]));
            let mid = CELL_HEIGHT / 2.0;
            scene.links.push(Link::arrow(
                from + Vec2::new(CELL_WIDTH, mid),
                to + Vec2::new(0.0, mid),
            ));
        }

        match self.anim {
            ListAnim::Insert { node, .. } => {
                if let Some(sprite) = self
                    .value_of(node)
                    .and_then(|value| self.sprite(node, value, None))
                {
                    scene.sprites.push(sprite);
                }
            }
            ListAnim::Update { shadow, .. } => {
                if let Some(sprite) = self
                    .value_of(shadow)
                    .and_then(|value| self.sprite(shadow, value, None))
                {
                    scene.sprites.push(sprite);
                }
            }
            _ => {}
        }
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::drive;

    fn sample() -> LinkedListController {
        LinkedListController::new(vec![10, 20, 30, 40])
    }

    #[test]
    fn test_insert_head_relinks_at_completion() {
        let mut list = sample();
        list.insert_head(5).unwrap();
        list.insert_head(5).unwrap();
        assert_eq!(list.values(), vec![10, 20, 30, 40]);
        assert_eq!(list.allocated(), 5, "node is allocated before it is linked");
        drive(|| list.insert_head(5));
        assert_eq!(list.values(), vec![5, 10, 20, 30, 40]);
        assert_eq!(list.head(), Some(5));
        assert_eq!(list.tail(), Some(40));
    }

    #[test]
    fn test_insert_tail_updates_tail() {
        let mut list = sample();
        drive(|| list.insert_tail(50));
        assert_eq!(list.values(), vec![10, 20, 30, 40, 50]);
        assert_eq!(list.tail(), Some(50));
        assert_eq!(list.positions()[4], list.slot_position(4));
    }

    #[test]
    fn test_insert_at_is_one_based() {
        let mut list = sample();
        drive(|| list.insert_at(2, 15));
        assert_eq!(list.values(), vec![10, 15, 20, 30, 40]);
        drive(|| list.insert_at(6, 99));
        assert_eq!(list.tail(), Some(99));
    }

    #[test]
    fn test_insert_at_out_of_range_is_noop() {
        let mut list = sample();
        assert_eq!(list.insert_at(0, 1).unwrap(), Step::Complete);
        assert_eq!(list.insert_at(6, 1).unwrap(), Step::Complete);
        assert_eq!(list.allocated(), 4);
        assert!(!list.is_animating());
    }

    #[test]
    fn test_followers_shift_right_during_insert() {
        let mut list = sample();
        list.insert_head(1).unwrap();
        for _ in 0..5 {
            list.insert_head(1).unwrap();
        }
        let first = list.positions()[0];
        assert!(first.x > list.slot_position(0).x);
        assert!(first.x < list.slot_position(1).x);
    }

    #[test]
    fn test_delete_head_middle_and_tail() {
        let mut list = sample();
        drive(|| list.delete(1));
        assert_eq!(list.values(), vec![20, 30, 40]);
        assert_eq!(list.head(), Some(20));

        drive(|| list.delete(3));
        assert_eq!(list.values(), vec![20, 30]);
        assert_eq!(list.tail(), Some(30));

        drive(|| list.delete(1));
        drive(|| list.delete(1));
        assert!(list.values().is_empty());
        assert_eq!(list.head(), None);
        assert_eq!(list.tail(), None);
        assert_eq!(list.allocated(), 0);
    }

    #[test]
    fn test_delete_keeps_node_until_commit() {
        let mut list = sample();
        list.delete(2).unwrap();
        list.delete(2).unwrap();
        assert_eq!(list.len(), 4);
        assert_eq!(list.values(), vec![10, 20, 30, 40]);
        drive(|| list.delete(2));
        assert_eq!(list.values(), vec![10, 30, 40]);
        assert_eq!(list.allocated(), 3);
    }

    #[test]
    fn test_update_releases_shadow() {
        let mut list = sample();
        list.update(3, 33).unwrap();
        assert_eq!(list.allocated(), 5);
        assert_eq!(list.scene().sprites.len(), 5);
        drive(|| list.update(3, 33));
        assert_eq!(list.values(), vec![10, 20, 33, 40]);
        assert_eq!(list.allocated(), 4);
        assert_eq!(list.positions()[2], list.slot_position(2));
    }

    #[test]
    fn test_update_out_of_range_is_noop() {
        let mut list = sample();
        assert_eq!(list.update(0, 1).unwrap(), Step::Complete);
        assert_eq!(list.update(5, 1).unwrap(), Step::Complete);
        assert_eq!(list.values(), vec![10, 20, 30, 40]);
    }

    #[test]
    fn test_search_reports_one_based_position() {
        let mut list = sample();
        drive(|| list.search(30));
        assert_eq!(list.last_search(), Some(SearchOutcome::Found(3)));
        assert!(list.highlights().is_empty());

        drive(|| list.search(31));
        assert_eq!(list.last_search(), Some(SearchOutcome::NotFound));
        assert_eq!(list.values(), vec![10, 20, 30, 40]);
    }

    #[test]
    fn test_search_on_empty_list() {
        let mut list = LinkedListController::new(vec![]);
        drive(|| list.search(1));
        assert_eq!(list.last_search(), Some(SearchOutcome::NotFound));
    }

    #[test]
    fn test_scene_draws_arrows_between_nodes() {
        let list = sample();
        let scene = list.scene();
        assert_eq!(scene.sprites.len(), 4);
        assert_eq!(scene.links.len(), 3);
        assert!(scene.links.iter().all(|l| l.arrow));
    }
}
