use crate::error::ResourceError;

/// Resolve a configured thread count, where 0 means "one per CPU core".
pub fn resolve_thread_count(configured: usize) -> usize {
    if configured > 0 {
        configured
    } else {
        std::cmp::max(1, num_cpus::get())
    }
}

/// Run `task` once per item, each on its own named scoped thread, and wait
/// for all of them.
///
/// No thread outlives the call. Results come back in item order; an item
/// whose thread could not be spawned or panicked yields a `ResourceError`
/// without affecting the others.
pub fn run_scoped<T, R, F>(label: &str, items: Vec<T>, task: F) -> Vec<Result<R, ResourceError>>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync,
{
    let count = items.len();
    let task = &task;

    // Use crossbeam::thread::scope so workers can borrow from the caller
    let joined = crossbeam::thread::scope(|s| {
        let handles: Vec<_> = items
            .into_iter()
            .enumerate()
            .map(|(worker, item)| {
                s.builder()
                    .name(format!("{label}-{worker}"))
                    .spawn(move |_| task(item))
                    .map_err(|source| ResourceError::Spawn { worker, source })
            })
            .collect();

        handles
            .into_iter()
            .enumerate()
            .map(|(worker, handle)| {
                handle.and_then(|h| h.join().map_err(|_| ResourceError::Join { worker }))
            })
            .collect::<Vec<_>>()
    });

    // Every handle is joined above, so the scope itself only fails if that
    // bookkeeping panicked; report it against every item.
    joined.unwrap_or_else(|_| {
        (0..count)
            .map(|worker| Err(ResourceError::Join { worker }))
            .collect()
    })
}
