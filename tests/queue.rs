use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use ring_queue::error::QueueError;
use ring_queue::RingQueue;
use std::collections::VecDeque;

#[test]
fn basic_push_pop() -> anyhow::Result<()> {
    let mut q = RingQueue::new();
    assert_eq!(q.len(), 0);
    assert_eq!(q.pop(), None);

    q.push("A");
    q.push("B");
    assert_eq!(q.len(), 2);
    assert_eq!(q.try_pop()?, "A");

    q.pop();
    assert_eq!(q.pop(), None);
    assert_eq!(q.len(), 0);

    q.push("A");
    q.push("B");
    q.pop();
    q.push("C");
    q.push("D");
    assert_eq!(q.to_string(), "B | C | D");
    assert_eq!(*q.try_peek()?, "B");

    Ok(())
}

#[test]
fn try_accessors_report_empty() {
    let mut q: RingQueue<u8> = RingQueue::new();

    assert_eq!(q.try_peek(), Err(QueueError::Empty));
    assert_eq!(q.try_pop(), Err(QueueError::Empty));
    assert_eq!(
        QueueError::Empty.to_string(),
        "queue is empty and no element can be removed"
    );
}

#[test]
fn fifo_order_survives_resizes() {
    let n = 1000;
    let mut q = RingQueue::new();

    for i in 0..n {
        q.push(i);
    }
    assert_eq!(q.len(), n);
    assert_eq!(q.capacity(), n.next_power_of_two());

    for i in 0..n {
        assert_eq!(q.pop(), Some(i));
        assert!(q.capacity().is_power_of_two());
    }

    assert_eq!(q.len(), 0);
    assert_eq!(q.pop(), None);
}

#[test]
fn optional_values_are_not_absence() {
    let mut q: RingQueue<Option<u32>> = RingQueue::new();

    q.push(None);
    q.push(Some(3));

    assert_eq!(q.peek(), Some(&None));
    assert_eq!(q.pop(), Some(None));
    assert_eq!(q.pop(), Some(Some(3)));
    assert_eq!(q.pop(), None);
}

#[test]
fn clear_then_reuse() {
    let mut q: RingQueue<String> = (0..100).map(|i| i.to_string()).collect();
    assert_eq!(q.len(), 100);

    q.clear();
    assert_eq!(q.len(), 0);
    assert_eq!(q.capacity(), 1);
    assert_eq!(q.peek(), None);
    assert_eq!(q.pop(), None);

    q.extend(["x".to_string(), "y".to_string()]);
    assert_eq!(q.render(), "x | y");
}

#[test]
fn random_interleaving_matches_vecdeque() {
    let mut rng = SmallRng::seed_from_u64(256);
    let mut q = RingQueue::new();
    let mut model = VecDeque::new();

    for i in 0..100_000u64 {
        // bias toward pushes early on so the ring grows, then drain
        let push_weight = if i < 50_000 { 0.6 } else { 0.4 };

        if rng.gen_bool(push_weight) {
            q.push(i);
            model.push_back(i);
        } else {
            assert_eq!(q.pop(), model.pop_front());
        }

        assert_eq!(q.len(), model.len());
        assert_eq!(q.peek(), model.front());
        assert!(q.capacity() >= q.len());
        assert!(q.capacity().is_power_of_two());
        if !q.is_empty() {
            assert!(q.len() * 4 >= q.capacity() || q.capacity() <= 4);
        }
    }
}
