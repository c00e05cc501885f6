//! Handles: Driving Tensors Through Opaque Ids
//!
//! This example plays the part of a host that only holds integer handles.
//!
//! Key concepts demonstrated:
//! - Tensors are created, combined and read back through `Handle`s
//! - Handles cross the boundary as `u64` via `to_raw` / `from_raw`
//! - Using a released handle is reported, never undefined
//! - Releasing twice is harmless
//!
//! Run with:
//! ```sh
//! RUST_LOG=densa=debug cargo run --example handle_roundtrip
//! ```

use densa::handle::{Handle, global};
use densa::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // -----------------------------------------------------------------------
    // 1. Create and fill through the global registry
    // -----------------------------------------------------------------------
    let a = global::create(&[2, 2])?.to_raw();
    let b = global::create(&[2, 2])?.to_raw();

    global::set_data(Handle::from_raw(a), &[1.0, 2.0, 3.0, 4.0])?;
    global::randomize(Handle::from_raw(b), &mut StdRng::seed_from_u64(0))?;

    // -----------------------------------------------------------------------
    // 2. Combine
    // -----------------------------------------------------------------------
    let c = global::add(Handle::from_raw(a), Handle::from_raw(b))?;
    let e = global::exp(c)?;
    println!("{}", global::render(c)?);
    println!("sum(exp(a + b)) = {:.4}", global::sum(e)?);

    // -----------------------------------------------------------------------
    // 3. Release, then misuse
    // -----------------------------------------------------------------------
    for raw in [a, b] {
        global::release(Handle::from_raw(raw));
    }
    global::release(c);
    global::release(c);

    match global::sum(c) {
        Err(err) => println!("rejected: {err}"),
        Ok(v) => println!("unexpected value {v}"),
    }

    global::release(e);
    println!("live handles: {}", global::live_count());
    Ok(())
}
