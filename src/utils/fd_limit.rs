//! File descriptor limit detection for capping the worker pool (Unix).

/// Estimated descriptors held per worker: source and output files, a scratch file,
/// and the child process's pipes.
pub const FDS_PER_WORKER: usize = 8;

/// Fraction of the process FD limit to use (leave headroom for the rest of the process).
const FD_LIMIT_FRACTION: f64 = 0.8;

/// Soft limit for open file descriptors, or `None` if unavailable (e.g. Windows) or unlimited.
#[cfg(unix)]
pub fn max_open_fds() -> Option<u64> {
    use std::mem::MaybeUninit;
    let mut rlim = MaybeUninit::<libc::rlimit>::uninit();
    if unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, rlim.as_mut_ptr()) } != 0 {
        return None;
    }
    let rlim = unsafe { rlim.assume_init() };
    let cur = rlim.rlim_cur;
    if cur == libc::RLIM_INFINITY || cur > i64::MAX as u64 {
        return None;
    }
    Some(cur as u64)
}

#[cfg(not(unix))]
pub fn max_open_fds() -> Option<u64> {
    None
}

/// Largest worker count that stays under ~80% of the FD limit, or `None` when there is no limit.
pub fn max_workers_by_fd_limit() -> Option<usize> {
    let limit = max_open_fds()?;
    let usable = (limit as f64 * FD_LIMIT_FRACTION) as usize;
    Some((usable / FDS_PER_WORKER).max(1))
}

/// `requested` workers, lowered to the FD cap if one applies.
pub fn cap_workers(requested: usize) -> usize {
    match max_workers_by_fd_limit() {
        Some(cap) if cap < requested => {
            log::debug!("Capping workers {} -> {} (FD limit ~80%)", requested, cap);
            cap
        }
        _ => requested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cap_never_raises_or_zeroes() {
        assert!(cap_workers(3) <= 3);
        assert!(cap_workers(1) >= 1);
    }
}
