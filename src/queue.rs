use std::{
    fmt::{self, Debug, Display},
    iter,
    ops::Range,
};

use log::trace;

use crate::error::QueueError;

const INITIAL_CAPACITY: usize = 1;
const GROWTH_FACTOR: usize = 2;
const SHRINK_FACTOR: usize = 2;
const SHRINK_THRESHOLD: usize = 4;

/// A FIFO queue stored in a ring buffer that doubles when full and halves
/// when less than a quarter of it is in use.
///
/// The capacity is always a power of two, so positions wrap with a mask
/// instead of a modulo. `push` doubles the capacity, `pop` halves it and
/// `clear` resets it to a single slot.
#[derive(Clone)]
pub struct RingQueue<T> {
    slots: Box<[Option<T>]>,
    head: usize,
    tail: usize,
    len: usize,
}

fn empty_slots<T>(capacity: usize) -> Box<[Option<T>]> {
    iter::repeat_with(|| None).take(capacity).collect()
}

impl<T> RingQueue<T> {
    pub fn new() -> Self {
        Self::with_slots(INITIAL_CAPACITY)
    }

    /// Preallocates room for at least `minimum_capacity` entries, rounded up
    /// to a power of two.
    ///
    /// # Panics
    ///
    /// Panics with "capacity overflow" if the rounded capacity does not fit
    /// in a `usize`.
    pub fn with_capacity(minimum_capacity: usize) -> Self {
        let capacity = minimum_capacity
            .max(INITIAL_CAPACITY)
            .checked_next_power_of_two()
            .unwrap_or_else(|| panic!("capacity overflow"));

        Self::with_slots(capacity)
    }

    fn with_slots(capacity: usize) -> Self {
        debug_assert!(capacity.is_power_of_two());

        Self {
            slots: empty_slots(capacity),
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    #[inline]
    fn mask(&self, val: usize) -> usize {
        val & (self.capacity() - 1)
    }

    #[inline]
    fn nextpos(&self, index: usize) -> usize {
        self.mask(index.wrapping_add(1))
    }

    #[inline]
    fn prevpos(&self, index: usize) -> usize {
        self.mask(index.wrapping_sub(1))
    }

    #[inline]
    fn has_excess_capacity(&self) -> bool {
        self.len > 0 && self.len < self.capacity() / SHRINK_THRESHOLD
    }

    pub fn push(&mut self, elem: T) {
        if self.is_full() {
            self.grow();
        }

        let index = self.tail;
        self.slots[index] = Some(elem);
        self.tail = self.nextpos(index);
        self.len += 1;

        debug_assert_eq!(self.prevpos(self.tail), index);
    }

    /// Removes the oldest entry, or returns `None` without touching the
    /// queue if it is empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let elem = self.slots[self.head].take();
        self.head = self.nextpos(self.head);
        self.len -= 1;

        if self.has_excess_capacity() {
            self.shrink();
        }

        elem
    }

    pub fn peek(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }

        self.slots[self.head].as_ref()
    }

    pub fn peek_mut(&mut self) -> Option<&mut T> {
        if self.is_empty() {
            return None;
        }

        self.slots[self.head].as_mut()
    }

    pub fn try_pop(&mut self) -> Result<T, QueueError> {
        self.pop().ok_or(QueueError::Empty)
    }

    pub fn try_peek(&self) -> Result<&T, QueueError> {
        self.peek().ok_or(QueueError::Empty)
    }

    /// Drops every entry and goes back to a single slot.
    pub fn clear(&mut self) {
        trace!("clearing ring queue of {} entries", self.len);
        *self = Self::new();
    }

    /// Entries from head to tail joined by `" | "`.
    pub fn render(&self) -> String
    where
        T: Display,
    {
        self.to_string()
    }

    fn grow(&mut self) {
        let capacity = self.capacity() * GROWTH_FACTOR;
        trace!("growing ring queue from {} to {} slots", self.capacity(), capacity);

        self.resize(capacity);
    }

    fn shrink(&mut self) {
        let capacity = self.capacity() / SHRINK_FACTOR;
        if capacity < INITIAL_CAPACITY {
            return;
        }

        trace!("shrinking ring queue from {} to {} slots", self.capacity(), capacity);
        self.resize(capacity);
    }

    /// The live slots as at most two ranges: head to tail when contiguous,
    /// otherwise head to the end followed by the start to tail.
    fn live_ranges(&self) -> (Range<usize>, Range<usize>) {
        if self.is_empty() {
            (0..0, 0..0)
        } else if self.head < self.tail {
            (self.head..self.tail, 0..0)
        } else {
            (self.head..self.capacity(), 0..self.tail)
        }
    }

    /// Moves the live entries to the front of a new buffer of `capacity`
    /// slots. An odd target, 1 included, is bumped to the next even number
    /// so the mask stays valid.
    fn resize(&mut self, mut capacity: usize) {
        if capacity % 2 != 0 {
            capacity += 1;
        }

        debug_assert!(capacity.is_power_of_two());
        debug_assert!(capacity >= self.len);

        let (front, back) = self.live_ranges();
        let mut slots = Vec::with_capacity(capacity);
        slots.extend(self.slots[front].iter_mut().map(Option::take));
        slots.extend(self.slots[back].iter_mut().map(Option::take));
        slots.resize_with(capacity, || None);

        self.slots = slots.into_boxed_slice();
        self.head = 0;
        // len is unchanged by a resize, so it is also the first free slot
        self.tail = self.mask(self.len);

        debug_assert_eq!(self.tail, self.mask(self.head + self.len));
    }

    fn live(&self) -> impl Iterator<Item = &T> + '_ {
        let mut index = self.head;

        (0..self.len).flat_map(move |_| {
            let elem = self.slots[index].as_ref();
            debug_assert!(elem.is_some(), "empty slot {} inside the live range", index);

            index = self.nextpos(index);
            elem
        })
    }
}

impl<T> Default for RingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Display for RingQueue<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, elem) in self.live().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }

            write!(f, "{}", elem)?;
        }

        Ok(())
    }
}

impl<T> Debug for RingQueue<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingQueue")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("entries", &self.live().collect::<Vec<_>>())
            .finish()
    }
}

impl<T> Extend<T> for RingQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for elem in iter {
            self.push(elem);
        }
    }
}

impl<T> FromIterator<T> for RingQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = Self::new();
        queue.extend(iter);
        queue
    }
}
