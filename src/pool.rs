use std::ptr;

use libc::{MAP_ANONYMOUS, MAP_FAILED, MAP_PRIVATE, PROT_READ, PROT_WRITE, c_void};
use log::{debug, trace};
use thiserror::Error;

use crate::align;
use crate::block::{Block, OVERHEAD};

/// The largest capacity a pool can be created with, bounded by the width of
/// the size field in each block's boundary tags.
pub const MAX_CAPACITY: usize = u32::MAX as usize;

/// The host environment could not supply the requested backing block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to acquire a {capacity} byte backing block from the host")]
pub struct AllocationFailure {
  pub capacity: usize,
}

/// Prints a one-line summary of the pool's accounting state.
/// Useful when stepping through the example with `pmap`/`gdb` or just
/// watching how alloc/free reshape the block sequence.
pub fn print_pool(pool: &Pool) {
  println!(
    "capacity = {}, available = {}, allocated = {}, blocks = {} free / {} used",
    pool.capacity(),
    pool.available(),
    pool.allocated(),
    pool.free_blocks(),
    pool.used_blocks(),
  );
}

/// A fixed-capacity pool allocator.
///
/// The pool maps one contiguous backing block at construction and services
/// every `alloc`/`free` inside it, never touching the system allocator again.
/// Internally the backing block is tiled by boundary-tagged blocks (see
/// [`crate::block`]); allocation is first-fit in address order with
/// split-on-excess, and freeing coalesces with both physical neighbors in
/// O(1).
///
/// Dropping the pool unmaps the backing block. Any pointer previously handed
/// out by [`Pool::alloc`] is invalid from that point on.
pub struct Pool {
  base: *mut u8,
  capacity: usize,
}

impl Pool {
  /// Acquires a `capacity` byte backing block from the host and sets it up
  /// as a single free block spanning the whole pool.
  ///
  /// Returns [`AllocationFailure`] when the host cannot supply the block.
  ///
  /// # Panics
  ///
  /// Panics if `capacity` cannot hold even one block's bookkeeping
  /// (16 bytes), or exceeds [`MAX_CAPACITY`]. Classic pool allocators leave
  /// both unchecked; failing loudly is a deliberate hardening.
  pub fn new(capacity: usize) -> Result<Self, AllocationFailure> {
    assert!(
      capacity >= OVERHEAD,
      "pool capacity must hold at least one block's bookkeeping ({OVERHEAD} bytes)",
    );
    assert!(capacity <= MAX_CAPACITY, "pool capacity exceeds MAX_CAPACITY");

    let addr = unsafe {
      libc::mmap(
        ptr::null_mut(),
        capacity,
        PROT_READ | PROT_WRITE,
        MAP_ANONYMOUS | MAP_PRIVATE,
        -1,
        0,
      )
    };

    if addr == MAP_FAILED || addr.is_null() {
      return Err(AllocationFailure { capacity });
    }

    let base = addr.cast::<u8>();
    unsafe { Block::init(base, capacity, false) };

    debug!("pool created: base = {base:?}, capacity = {capacity}");

    Ok(Self { base, capacity })
  }

  /// Total size of the backing block.
  pub fn capacity(&self) -> usize {
    self.capacity
  }

  /// Hands out `size` bytes from the pool, or a null pointer once no free
  /// block fits the request plus its bookkeeping. Exhaustion is an ordinary
  /// outcome to check for, not an error.
  ///
  /// The request is rounded up to the 8-byte payload unit (a zero-size
  /// request yields a minimal 8-byte payload), and the returned address is
  /// always 8-aligned. The pointer stays valid until the matching
  /// [`Pool::free`] or until the pool is dropped.
  pub fn alloc(
    &mut self,
    size: usize,
  ) -> *mut u8 {
    // A request the whole pool cannot hold can never be satisfied, and its
    // rounding arithmetic could overflow; treat it as plain exhaustion.
    if size > self.capacity {
      trace!("alloc({size}): request exceeds pool capacity {}", self.capacity);
      return ptr::null_mut();
    }

    // Every used block carries at least one payload unit.
    let needed = align!(size.max(1)) + OVERHEAD;

    let Some(block) = self.blocks().find(|b| !b.in_use() && b.size() >= needed) else {
      trace!("alloc({size}): exhausted, no free block fits {needed} bytes");
      return ptr::null_mut();
    };

    let excess = block.size() - needed;
    if excess > OVERHEAD {
      // Big enough to host a free block with a nonzero payload: split.
      unsafe {
        Block::init(block.addr(), needed, true);
        Block::init(block.addr().add(needed), excess, false);
      }
    } else {
      // Too small to split; the excess stays as padding inside the block.
      block.set_in_use(true);
    }

    trace!("alloc({size}) = {:?}, block size = {}", block.payload(), block.size());

    block.payload()
  }

  /// Returns a block previously handed out by [`Pool::alloc`] to the pool,
  /// merging it with any free physical neighbor so that no two adjacent
  /// blocks are ever both free. A null `ptr` is a no-op.
  ///
  /// # Safety
  ///
  /// `ptr` must be null or a pointer obtained from [`Pool::alloc`] on this
  /// pool that has not been freed since. The memory behind it must no longer
  /// be in use.
  pub unsafe fn free(
    &mut self,
    ptr: *mut u8,
  ) {
    if ptr.is_null() {
      return;
    }

    let block = unsafe { Block::from_payload(ptr) };
    block.set_in_use(false);

    let mut start = block.addr();
    let mut size = block.size();

    if let Some(next) = self.next_of(block)
      && !next.in_use()
    {
      size += next.size();
    }

    if let Some(prev) = self.prev_of(block)
      && !prev.in_use()
    {
      start = prev.addr();
      size += prev.size();
    }

    // One tag rewrite covers all three merge outcomes: the new header lands
    // on the lowest merged block and the new footer on the highest.
    unsafe { Block::init(start, size, false) };

    trace!("free({ptr:?}): free block of {size} bytes at {start:?}");
  }

  /// Sum of the sizes of all free blocks, bookkeeping included.
  pub fn available(&self) -> usize {
    self.blocks().filter(|b| !b.in_use()).map(Block::size).sum()
  }

  /// Sum of the sizes of all used blocks, bookkeeping included, so that
  /// `available() + allocated()` always equals `capacity()`.
  pub fn allocated(&self) -> usize {
    self.blocks().filter(|b| b.in_use()).map(Block::size).sum()
  }

  /// Number of free blocks.
  pub fn free_blocks(&self) -> usize {
    self.blocks().filter(|b| !b.in_use()).count()
  }

  /// Number of used blocks.
  pub fn used_blocks(&self) -> usize {
    self.blocks().filter(|b| b.in_use()).count()
  }

  fn first_block(&self) -> Block {
    unsafe { Block::from_raw(self.base) }
  }

  fn arena_end(&self) -> *mut u8 {
    self.base.wrapping_add(self.capacity)
  }

  /// Physical successor, or `None` for the last block.
  fn next_of(
    &self,
    block: Block,
  ) -> Option<Block> {
    let end = block.end();
    if end >= self.arena_end() {
      return None;
    }

    Some(unsafe { Block::from_raw(end) })
  }

  /// Physical predecessor, found through its footer, or `None` for the
  /// first block.
  fn prev_of(
    &self,
    block: Block,
  ) -> Option<Block> {
    if block.addr() == self.base {
      return None;
    }

    let prev_size = unsafe { block.prev_size() };
    Some(unsafe { Block::from_raw(block.addr().sub(prev_size)) })
  }

  /// Walks the block sequence in address order.
  fn blocks(&self) -> Blocks<'_> {
    Blocks {
      pool: self,
      current: Some(self.first_block()),
    }
  }
}

impl Drop for Pool {
  fn drop(&mut self) {
    debug!("pool dropped: base = {:?}, capacity = {}", self.base, self.capacity);

    unsafe {
      libc::munmap(self.base.cast::<c_void>(), self.capacity);
    }
  }
}

struct Blocks<'a> {
  pool: &'a Pool,
  current: Option<Block>,
}

impl Iterator for Blocks<'_> {
  type Item = Block;

  fn next(&mut self) -> Option<Block> {
    let block = self.current?;
    self.current = self.pool.next_of(block);
    Some(block)
  }
}
