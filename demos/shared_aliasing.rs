//! Ownership: Exclusive Copies vs Shared Aliases
//!
//! Key concepts demonstrated:
//! - Cloning an exclusive tensor copies its buffer
//! - Cloning a shared tensor aliases it and bumps the reference count
//! - Arithmetic results are always a fresh buffer
//!
//! Run with:
//! ```sh
//! cargo run --example shared_aliasing
//! ```

use densa::prelude::*;

fn main() -> Result<()> {
    // Exclusive: value semantics
    let mut owned = Tensor::<f32>::try_from_slice(&[1.0, 2.0, 3.0], &[3])?;
    let copy = owned.clone();
    owned.fill(0.0);
    println!("exclusive copy after fill: {:?}", copy.to_vec());

    // Shared: one buffer, many owners
    let mut shared = Tensor::<f32>::new_shared(&[3])?;
    let alias = shared.clone();
    shared.set_data(&[4.0, 5.0, 6.0])?;
    println!(
        "shared alias after set_data: {:?} (refs = {})",
        alias.to_vec(),
        alias.ref_count()
    );

    // Results never alias their operands
    let doubled = shared.add(&alias)?;
    println!(
        "result aliases operand: {} (refs = {})",
        doubled.shares_storage_with(&shared),
        doubled.ref_count()
    );
    println!("{doubled:.1}");

    drop(alias);
    println!("refs after dropping alias: {}", shared.ref_count());
    Ok(())
}
