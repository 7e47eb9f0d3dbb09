use rayon::prelude::*;

/// Maps `func` over `items` on a dedicated pool of `jobs` threads, keeping
/// input order. `None`, `Some(0)` or `Some(1)` run on the calling thread.
pub fn run_in_parallel<T, R, F>(items: Vec<T>, jobs: Option<usize>, func: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Send + Sync,
{
    match jobs {
        Some(count) if count > 1 && items.len() > 1 => {
            match rayon::ThreadPoolBuilder::new().num_threads(count).build() {
                Ok(pool) => pool.install(|| items.into_par_iter().map(func).collect()),
                Err(err) => {
                    log::warn!("falling back to sequential work: {err}");
                    items.into_iter().map(func).collect()
                }
            }
        }
        _ => items.into_iter().map(func).collect(),
    }
}

/// Like [`run_in_parallel`], failing with the error of the earliest item.
pub fn try_run_in_parallel<T, R, E, F>(
    items: Vec<T>,
    jobs: Option<usize>,
    func: F,
) -> Result<Vec<R>, E>
where
    T: Send,
    R: Send,
    E: Send,
    F: Fn(T) -> Result<R, E> + Send + Sync,
{
    run_in_parallel(items, jobs, func).into_iter().collect()
}
