//! Boundary-tag block metadata.
//!
//! Every block in the pool carries an 8-byte [`Header`] at its low edge and an
//! 8-byte [`Footer`] at its high edge:
//!
//! ```text
//!   ┌──────────┬──────────────────────────────┬──────────┐
//!   │  Header  │           Payload            │  Footer  │
//!   │ size     │                              │ size     │
//!   │ in_use   │   (block.size - 16 bytes)    │          │
//!   └──────────┴──────────────────────────────┴──────────┘
//!   ▲          ▲                                         ▲
//!   block      pointer returned to the caller            block + size
//! ```
//!
//! The footer lets the physical predecessor be found in O(1): the 8 bytes
//! right below any block's header are the predecessor's footer, which records
//! the predecessor's size. The physical successor is simply `block + size`.
//!
//! Both tags are packed. Block *starts* are always 8-aligned, but a block
//! whose size is not a multiple of 8 (possible for the tail block when the
//! pool capacity itself is odd-sized) places its footer at an unaligned
//! address, so the tags must tolerate any alignment.

use std::mem;
use std::ptr;

#[derive(Clone, Copy)]
#[repr(C, packed)]
struct Header {
  size: u32,
  in_use: u32,
}

#[derive(Clone, Copy)]
#[repr(C, packed)]
struct Footer {
  size: u32,
  _reserved: u32,
}

pub(crate) const HEADER_SIZE: usize = mem::size_of::<Header>();
pub(crate) const FOOTER_SIZE: usize = mem::size_of::<Footer>();

/// Bookkeeping bytes embedded in every block.
pub(crate) const OVERHEAD: usize = HEADER_SIZE + FOOTER_SIZE;

/// A non-owning handle to a block's metadata inside a pool.
///
/// Navigation (first/next/prev) lives on `Pool`, which knows the arena
/// bounds; this type only reads and writes the tags it points at. All methods
/// assume the handle points at a live, correctly initialized block inside the
/// pool that created it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Block(*mut u8);

impl Block {
  /// Reinterprets a raw position inside the arena as a block.
  pub(crate) unsafe fn from_raw(addr: *mut u8) -> Self {
    Self(addr)
  }

  /// Recovers the block owning a payload pointer previously handed out by
  /// `Pool::alloc`. Constant-time: the header sits right below the payload.
  pub(crate) unsafe fn from_payload(payload: *mut u8) -> Self {
    Self(unsafe { payload.sub(HEADER_SIZE) })
  }

  /// Writes a fresh header/footer pair describing a block of `size` bytes
  /// starting at `addr`. Any tags previously inside that range are dead
  /// afterwards, which is exactly what splitting and coalescing want.
  pub(crate) unsafe fn init(
    addr: *mut u8,
    size: usize,
    in_use: bool,
  ) -> Self {
    let header = Header {
      size: size as u32,
      in_use: in_use as u32,
    };
    let footer = Footer {
      size: size as u32,
      _reserved: 0,
    };

    unsafe {
      ptr::write(addr.cast::<Header>(), header);
      ptr::write(addr.add(size - FOOTER_SIZE).cast::<Footer>(), footer);
    }

    Self(addr)
  }

  pub(crate) fn addr(self) -> *mut u8 {
    self.0
  }

  /// First byte past this block, i.e. the physical successor's header.
  pub(crate) fn end(self) -> *mut u8 {
    unsafe { self.0.add(self.size()) }
  }

  /// The address handed out to callers.
  pub(crate) fn payload(self) -> *mut u8 {
    unsafe { self.0.add(HEADER_SIZE) }
  }

  pub(crate) fn size(self) -> usize {
    let header = unsafe { ptr::read(self.0.cast::<Header>()) };
    header.size as usize
  }

  pub(crate) fn in_use(self) -> bool {
    let header = unsafe { ptr::read(self.0.cast::<Header>()) };
    header.in_use != 0
  }

  pub(crate) fn set_in_use(
    self,
    in_use: bool,
  ) {
    let mut header = unsafe { ptr::read(self.0.cast::<Header>()) };
    header.in_use = in_use as u32;
    unsafe { ptr::write(self.0.cast::<Header>(), header) };
  }

  /// Size of the physical predecessor, read from the footer right below this
  /// block's header. Only valid when a predecessor exists.
  pub(crate) unsafe fn prev_size(self) -> usize {
    let footer = unsafe { ptr::read(self.0.sub(FOOTER_SIZE).cast::<Footer>()) };
    footer.size as usize
  }
}
