/// Concurrency management for Callatlas.
/// Extraction is embarrassingly parallel (one task per source file); the
/// global pool is sized once up front.

use anyhow::Result;

/// Initialize the global rayon thread pool.
/// Batch analysis owns the machine for its lifetime, so every core works.
pub fn init_thread_pool() -> Result<()> {
    let workers = std::cmp::max(1, num_cpus::get());

    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build_global()?;

    println!("[callatlas] Thread pool ready: {} workers", workers);

    Ok(())
}
