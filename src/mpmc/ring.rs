// Blocking bounded MPMC ring buffer.
//
// One mutex guards the ring state together with the claim counter; two
// condvars park writers ("not full") and readers ("not empty"). Every
// successful put or take frees exactly one unit of room or content, so each
// side wakes at most one waiter.

use std::sync::{Condvar, Mutex, MutexGuard};

use crate::mpmc::claim::{Claim, ClaimCounter};

struct Inner<T> {
   slots: Box<[Option<T>]>,
   head: usize, // next slot to take
   tail: usize, // next free slot
   len: usize,
   claims: ClaimCounter,
}

pub struct RingQueue<T> {
   inner: Mutex<Inner<T>>,
   not_full: Condvar,
   not_empty: Condvar,
   capacity: usize,
}

impl<T> RingQueue<T> {
   /// Build a ring with `capacity` slots. `total_claims` bounds the claim
   /// counter: the number of items the ring will ever hand out via
   /// [`RingQueue::claim`].
   pub fn new(capacity: usize, total_claims: usize) -> Self {
      assert!(capacity > 0, "ring capacity must be at least 1");

      let slots = (0..capacity)
         .map(|_| None)
         .collect::<Vec<_>>()
         .into_boxed_slice();

      Self {
         inner: Mutex::new(Inner {
            slots,
            head: 0,
            tail: 0,
            len: 0,
            claims: ClaimCounter::new(total_claims),
         }),
         not_full: Condvar::new(),
         not_empty: Condvar::new(),
         capacity,
      }
   }

   pub fn capacity(&self) -> usize {
      self.capacity
   }

   pub fn len(&self) -> usize {
      self.lock().len
   }

   pub fn is_empty(&self) -> bool {
      self.len() == 0
   }

   /// Claims handed out so far.
   pub fn claimed(&self) -> usize {
      self.lock().claims.claimed()
   }

   fn lock(&self) -> MutexGuard<'_, Inner<T>> {
      self.inner.lock().expect("ring mutex poisoned")
   }

   /// Block until a slot is free, then insert `item` at the tail.
   pub fn put(&self, item: T) {
      self.put_with(|| item);
   }

   /// Block until a slot is free, then insert the item built by `make`.
   ///
   /// `make` runs with the slot already reserved, so a timestamp taken
   /// inside it marks admission into the ring, not arrival at a full one.
   pub fn put_with<F: FnOnce() -> T>(&self, make: F) {
      let mut inner = self.lock();
      while inner.len == self.capacity {
         inner = self.not_full.wait(inner).expect("ring mutex poisoned");
      }

      let tail = inner.tail;
      debug_assert!(inner.slots[tail].is_none());
      inner.slots[tail] = Some(make());
      inner.tail = (tail + 1) % self.capacity;
      inner.len += 1;

      drop(inner);
      self.not_empty.notify_one();
   }

   /// Block until an item is present, then remove it from the head.
   pub fn take(&self) -> T {
      let mut inner = self.lock();
      while inner.len == 0 {
         inner = self.not_empty.wait(inner).expect("ring mutex poisoned");
      }

      let head = inner.head;
      let item = inner.slots[head].take().expect("occupied ring slot was empty");
      inner.head = (head + 1) % self.capacity;
      inner.len -= 1;

      drop(inner);
      self.not_full.notify_one();
      item
   }

   /// Reserve the next claim index, or observe that production is
   /// exhausted. Never blocks.
   ///
   /// Runs under the ring's own lock, so the exhaustion check and the
   /// reservation cannot interleave with another consumer's claim or with a
   /// concurrent put or take.
   pub fn claim(&self) -> Claim {
      self.lock().claims.reserve()
   }
}
