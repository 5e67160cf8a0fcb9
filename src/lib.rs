//! # rpool - A Fixed-Capacity Pool Allocator Library
//!
//! This crate provides a **pool allocator** (also known as an arena allocator)
//! implementation in Rust that acquires one backing memory block up front via
//! `mmap` and services every allocation inside it.
//!
//! ## Overview
//!
//! The pool maps a single contiguous block once, at creation, and never asks
//! the system allocator for anything again. At all times the block is tiled
//! by sub-blocks tagged free or used:
//!
//! ```text
//!   Pool Concept:
//!
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                    BACKING BLOCK (fixed capacity)                    │
//!   │                                                                      │
//!   │   ┌────────┬────────┬──────────────┬────────┬──────────────────┐    │
//!   │   │ USED   │ FREE   │    USED      │ USED   │      FREE        │    │
//!   │   └────────┴────────┴──────────────┴────────┴──────────────────┘    │
//!   │            ▲                                 ▲                       │
//!   │            │                                 │                       │
//!   │     freed block, kept                  tail of the arena,            │
//!   │     for reuse (first-fit)              shrinks as blocks split       │
//!   │                                                                      │
//!   └──────────────────────────────────────────────────────────────────────┘
//!
//!   alloc: first-fit scan, splitting off the remainder when it is big
//!          enough to live as its own free block.
//!   free:  O(1) merge with both physical neighbors via boundary tags.
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   rpool
//!   ├── align      - Payload alignment unit and the align! rounding macro
//!   ├── block      - Boundary-tag block metadata (internal)
//!   └── pool       - The Pool allocator itself
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use rpool::Pool;
//!
//! let mut pool = Pool::new(420).expect("backing block unavailable");
//!
//! let ptr = pool.alloc(size_of::<u64>());
//! assert!(!ptr.is_null());
//!
//! unsafe {
//!     let value = ptr as *mut u64;
//!     value.write(42);
//!     assert_eq!(value.read(), 42);
//!
//!     pool.free(ptr);
//! }
//!
//! assert_eq!(pool.available(), 420);
//! ```
//!
//! ## How It Works
//!
//! Each block embeds its bookkeeping at both edges:
//!
//! ```text
//!   Single Block:
//!   ┌──────────────────┬──────────────────────────┬──────────────────┐
//!   │   Header (8 B)   │         Payload          │   Footer (8 B)   │
//!   │  size, in_use    │                          │  size            │
//!   └──────────────────┴──────────────────────────┴──────────────────┘
//!                      ▲
//!                      └── Pointer returned to the caller (8-aligned)
//! ```
//!
//! The footer is what makes `free` cheap: the 8 bytes right below any block's
//! header belong to its physical predecessor's footer, so both neighbors of a
//! freed block are reachable in O(1) and merged on the spot. No free list,
//! no search.
//!
//! ## Features
//!
//! - **Deterministic footprint**: one `mmap` at creation, one `munmap` at drop
//! - **First-fit with splitting**: low fragmentation for mixed-size workloads
//! - **O(1) coalescing**: boundary tags instead of free-list scans
//! - **Accounting queries**: `available`, `allocated`, `free_blocks`,
//!   `used_blocks` for watching the pool's state
//!
//! ## Limitations
//!
//! - **Single-threaded only**: no synchronization; callers wanting to share a
//!   pool across threads must wrap it in their own lock
//! - **Fixed capacity**: the pool never grows; exhaustion returns null
//! - **No compaction**: live allocations are never moved
//! - **Unix-only**: the backing block comes from `mmap` via `libc`
//!
//! ## Safety
//!
//! Handing out raw memory is inherently unsafe. `alloc` itself is safe (it
//! only returns a pointer), but `free` is `unsafe`: passing a pointer that did
//! not come from a live `alloc` on the same pool, or double-freeing, is
//! undefined behavior, exactly as in manual memory management.

pub mod align;
mod block;
mod pool;

pub use pool::{AllocationFailure, MAX_CAPACITY, Pool, print_pool};
