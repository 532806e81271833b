use dsviz::headless::run_to_completion;
use dsviz::structures::{
    ArrayController, BinaryTreeController, Controller, LinkedListController, QueueController,
    SearchOutcome, StackController, Step, StringController, Tone, TraversalOrder,
};

const CAP: usize = 100_000;

fn seeded_array() -> ArrayController {
    ArrayController::new(vec![10, 20, 30, 40, 50])
}

fn seeded_tree() -> BinaryTreeController {
    BinaryTreeController::from_values([60, 55, 65, 45, 57, 62, 70])
}

#[test]
fn test_array_insert_remove_search_scenario() {
    let mut array = seeded_array();
    run_to_completion(|| array.insert(2, 99), CAP).expect("insert failed");
    assert_eq!(array.items(), &[10, 20, 99, 30, 40, 50]);

    run_to_completion(|| array.remove(0), CAP).expect("remove failed");
    assert_eq!(array.items(), &[20, 99, 30, 40, 50]);

    let mut array = seeded_array();
    run_to_completion(|| array.search(30), CAP).expect("search failed");
    assert_eq!(array.last_search(), Some(SearchOutcome::Found(2)));
    assert_eq!(array.items(), &[10, 20, 30, 40, 50]);
}

#[test]
fn test_bst_delete_root_takes_successor() {
    let mut tree = seeded_tree();
    run_to_completion(|| tree.delete(60), CAP).expect("delete failed");

    assert_eq!(tree.root_value(), Some(62));
    assert_eq!(tree.children_of(62), Some((Some(55), Some(65))));
    assert_eq!(tree.children_of(65), Some((None, Some(70))));
    assert_eq!(
        tree.values(TraversalOrder::Inorder),
        vec![45, 55, 57, 62, 65, 70]
    );
    assert_eq!(tree.allocated(), 6);
}

#[test]
fn test_insert_then_remove_restores_array() {
    for index in 0..=5 {
        let mut array = seeded_array();
        run_to_completion(|| array.insert(index, -1), CAP).unwrap();
        assert_eq!(array.len(), 6);
        assert_eq!(array.items()[index], -1);
        run_to_completion(|| array.remove(index), CAP).unwrap();
        assert_eq!(array.items(), &[10, 20, 30, 40, 50], "index {index}");
    }
}

#[test]
fn test_insert_shifts_without_changing_content() {
    let original = [10, 20, 30, 40, 50];
    for index in 0..=original.len() {
        let mut array = seeded_array();
        run_to_completion(|| array.insert(index, 7), CAP).unwrap();
        let mut expected = original.to_vec();
        expected.insert(index, 7);
        assert_eq!(array.items(), expected.as_slice());
    }
}

#[test]
fn test_remove_every_index() {
    let original = [10, 20, 30, 40, 50];
    for index in 0..original.len() {
        let mut array = seeded_array();
        run_to_completion(|| array.remove(index), CAP).unwrap();
        let mut expected = original.to_vec();
        expected.remove(index);
        assert_eq!(array.items(), expected.as_slice());
    }
}

#[test]
fn test_out_of_range_completes_without_change() {
    let mut array = seeded_array();
    assert_eq!(array.insert(6, 1).unwrap(), Step::Complete);
    assert_eq!(array.remove(5).unwrap(), Step::Complete);
    assert_eq!(array.update(9, 1).unwrap(), Step::Complete);
    assert_eq!(array.items(), &[10, 20, 30, 40, 50]);
    assert!(!array.is_animating());
}

#[test]
fn test_progress_is_monotonic_and_clamped() {
    let mut array = seeded_array();
    let mut last = 0.0;
    loop {
        let step = array.remove(1).unwrap();
        if step.is_complete() {
            break;
        }
        let progress = array.progress();
        assert!((0.0..=1.0).contains(&progress));
        assert!(progress >= last);
        last = progress;
    }
    assert!(last > 0.5);
}

#[test]
fn test_search_hit_highlights_exactly_one_cell() {
    let mut array = seeded_array();
    let mut seen_found = false;
    loop {
        let step = array.search(40).unwrap();
        let found = array.highlights().with_tone(Tone::Found);
        if !found.is_empty() {
            assert_eq!(found.len(), 1);
            assert_eq!(array.items()[found[0]], 40);
            seen_found = true;
        }
        if step.is_complete() {
            break;
        }
    }
    assert!(seen_found);
    assert_eq!(array.last_search(), Some(SearchOutcome::Found(3)));
    assert_eq!(array.items(), &[10, 20, 30, 40, 50]);
}

#[test]
fn test_search_miss_scans_everything() {
    let mut array = seeded_array();
    run_to_completion(|| array.search(99), CAP).unwrap();
    assert_eq!(array.last_search(), Some(SearchOutcome::NotFound));
    assert!(array.highlights().is_empty());
    assert_eq!(array.items(), &[10, 20, 30, 40, 50]);
}

#[test]
fn test_string_run_insert() {
    let mut string = StringController::new("Hello");
    run_to_completion(|| string.insert(5, " World"), CAP).unwrap();
    assert_eq!(string.text(), "Hello World");
    run_to_completion(|| string.update(0, 'J'), CAP).unwrap();
    assert_eq!(string.text(), "Jello World");
}

#[test]
fn test_list_positions_are_one_based() {
    let mut list = LinkedListController::new(vec![10, 20, 30, 40]);
    run_to_completion(|| list.delete(1), CAP).unwrap();
    assert_eq!(list.values(), vec![20, 30, 40]);
    assert_eq!(list.head(), Some(20));

    run_to_completion(|| list.delete(3), CAP).unwrap();
    assert_eq!(list.tail(), Some(30));

    run_to_completion(|| list.insert_at(2, 25), CAP).unwrap();
    assert_eq!(list.values(), vec![20, 25, 30]);

    run_to_completion(|| list.search(30), CAP).unwrap();
    assert_eq!(list.last_search(), Some(SearchOutcome::Found(3)));
    assert_eq!(list.allocated(), 3);
}

#[test]
fn test_stack_and_queue_ordering() {
    let mut stack = StackController::new(vec![1, 2]);
    run_to_completion(|| stack.push(3), CAP).unwrap();
    run_to_completion(|| stack.peek(), CAP).unwrap();
    assert_eq!(stack.last_peek(), Some(3));
    run_to_completion(|| stack.pop(), CAP).unwrap();
    assert_eq!(stack.items(), &[1, 2]);

    let mut queue = QueueController::new(vec![1, 2]);
    run_to_completion(|| queue.enqueue(3), CAP).unwrap();
    run_to_completion(|| queue.dequeue(), CAP).unwrap();
    run_to_completion(|| queue.peek_front(), CAP).unwrap();
    assert_eq!(queue.last_front(), Some(2));
    assert_eq!(queue.items(), vec![2, 3]);
}

#[test]
fn test_traversals_visit_every_node() {
    let mut tree = seeded_tree();
    run_to_completion(|| tree.traverse(TraversalOrder::Postorder), CAP).unwrap();
    let (order, values) = tree.last_traversal().unwrap();
    assert_eq!(order, TraversalOrder::Postorder);
    assert_eq!(values, &[45, 57, 55, 62, 70, 65, 60]);
    assert_eq!(
        tree.values(TraversalOrder::Preorder),
        vec![60, 55, 45, 57, 65, 62, 70]
    );
}
