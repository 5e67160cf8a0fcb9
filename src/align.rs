/// The payload alignment unit. Every pointer handed out by the pool is a
/// multiple of this, and every allocation request is rounded up to it so that
/// block starts never drift off alignment.
pub const PAYLOAD_ALIGN: usize = 8;

/// Rounds the given size up to the next multiple of [`PAYLOAD_ALIGN`].
///
/// # Examples
///
/// ```rust
/// use rpool::align;
///
/// assert_eq!(align!(13), 16);
/// assert_eq!(align!(16), 16);
/// assert_eq!(align!(1), 8);
/// ```
#[macro_export]
macro_rules! align {
  ($value:expr) => {
    ($value + $crate::align::PAYLOAD_ALIGN - 1) & !($crate::align::PAYLOAD_ALIGN - 1)
  };
}
