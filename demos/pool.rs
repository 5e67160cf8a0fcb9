use std::io::Read;

use rpool::{Pool, print_pool};

/// Waits until the user presses ENTER.
/// Useful when you want to inspect memory state with tools like `pmap`,
/// `htop`, `gdb`, or just visually track how the block sequence changes.
fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

fn main() {
  // A fixed-capacity pool. Everything below happens inside this one mapping;
  // the system allocator is never involved again.
  let mut pool = Pool::new(420).expect("failed to acquire the backing block");

  println!("[0] Fresh pool");
  print_pool(&pool);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 1) Allocate three small blocks. Each one splits the tail free block.
  // --------------------------------------------------------------------
  let top = pool.alloc(size_of::<u32>());
  let mid = pool.alloc(size_of::<u32>());
  let bot = pool.alloc(size_of::<u32>());
  println!("\n[1] Allocated top = {top:?}, mid = {mid:?}, bot = {bot:?}");
  print_pool(&pool);

  // Write something into the allocated memory to show it's usable.
  unsafe {
    (top as *mut u32).write(0xDEADBEEF);
    println!("[1] Value written to top = 0x{:X}", (top as *mut u32).read());
  }

  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 2) Free the middle block. It cannot merge with its used neighbors,
  //    so the pool now has two free blocks: the gap and the tail.
  // --------------------------------------------------------------------
  unsafe { pool.free(mid) };
  println!("\n[2] Freed mid");
  print_pool(&pool);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 3) Allocate the same size again. First-fit reuses the gap.
  // --------------------------------------------------------------------
  let again = pool.alloc(size_of::<u32>());
  println!("\n[3] Allocate the same size again");
  println!(
    "[3] again == mid? {}",
    if again == mid {
      "Yes, it reused the freed gap"
    } else {
      "No, it allocated somewhere else"
    }
  );
  print_pool(&pool);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 4) Free everything. Each free coalesces with its neighbors, so the
  //    pool collapses back into a single free block.
  // --------------------------------------------------------------------
  unsafe {
    pool.free(again);
    pool.free(top);
    pool.free(bot);
  }
  println!("\n[4] Freed everything (watch free blocks collapse to 1)");
  print_pool(&pool);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 5) Drive the pool to exhaustion. alloc returns null, not a panic;
  //    the caller decides what to do about it.
  // --------------------------------------------------------------------
  let mut count = 0;
  loop {
    let ptr = pool.alloc(64);
    if ptr.is_null() {
      break;
    }
    count += 1;
  }
  println!("\n[5] Exhaustion: {count} x 64-byte allocations fit, then alloc returned null");
  print_pool(&pool);

  // --------------------------------------------------------------------
  // 6) End of demo. Dropping the pool unmaps the backing block; every
  //    pointer handed out above is invalid from here on.
  // --------------------------------------------------------------------
  println!("\n[6] End of example. Dropping the pool releases the backing block.");
}
