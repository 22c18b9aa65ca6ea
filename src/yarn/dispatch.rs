use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;

use log::debug;

use crate::error::Result;
use crate::yarn::config::StrandConfig;
use crate::yarn::grid::GridIterator;
use crate::yarn::output::StrandTargets;

/// Returning from `dispatch` is the end of the pass: every write made by
/// `kernel` is visible to the caller afterwards. Workgroups run in no
/// particular order.
pub fn dispatch<F>(num_workgroups: u32, workgroup_size: u32, kernel: F)
where
    F: Fn(u32) + Sync,
{
    assert!(
        num_workgroups.checked_mul(workgroup_size).is_some(),
        "{} x {} invocations overflow a 32-bit invocation index",
        num_workgroups,
        workgroup_size
    );

    let threads = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(num_workgroups as usize)
        .max(1);
    let cursor = &AtomicU32::new(0);
    let kernel = &kernel;

    let outcome = crossbeam::thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                s.spawn(move |_| {
                    loop {
                        let group = cursor.fetch_add(1, Ordering::Relaxed);
                        if group >= num_workgroups {
                            break;
                        }
                        let first = group * workgroup_size;
                        for invocation in first..first + workgroup_size {
                            kernel(invocation);
                        }
                    }
                })
            })
            .collect();

        let panics: Vec<_> = handles.into_iter().filter_map(|h| h.join().err()).collect();
        panics.into_iter().next()
    });

    match outcome {
        Ok(None) => {}
        Ok(Some(payload)) | Err(payload) => std::panic::resume_unwind(payload),
    }
}

/// `targets` must hold at least `config.vertex_capacity()` vertices and
/// `config.line_capacity()` lines.
pub fn run_pass(config: &StrandConfig, targets: &StrandTargets) {
    targets.reset();
    let grid = GridIterator::new(config, targets);
    dispatch(config.num_workgroups, config.workgroup_size, |worker| {
        grid.run(worker)
    });
    debug!(
        "cpu pass: {} workers, {} vertices, {} line vertices",
        config.total_workers(),
        targets.mesh.draw().load().vertex_count,
        targets.lines.draw().load().vertex_count
    );
}

pub fn generate(config: &StrandConfig) -> Result<StrandTargets> {
    config.validate()?;
    let targets = StrandTargets::for_config(config);
    run_pass(config, &targets);
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;

    #[test]
    fn test_every_invocation_runs_once() {
        let seen: Vec<AtomicBool> = (0..7 * 13).map(|_| AtomicBool::new(false)).collect();
        dispatch(7, 13, |i| {
            let was = seen[i as usize].swap(true, Ordering::Relaxed);
            assert!(!was, "invocation {i} ran twice");
        });
        assert!(seen.iter().all(|s| s.load(Ordering::Relaxed)));
    }

    #[test]
    fn test_single_workgroup() {
        let count = AtomicU32::new(0);
        dispatch(1, 32, |_| {
            count.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(count.load(Ordering::Relaxed), 32);
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn test_worker_panic_reaches_caller() {
        dispatch(4, 4, |i| {
            if i == 9 {
                panic!("boom");
            }
        });
    }

    #[test]
    #[should_panic(expected = "overflow")]
    fn test_oversized_dispatch_is_refused() {
        dispatch(1 << 16, 1 << 16, |_| {});
    }

    #[test]
    fn test_last_invocation_index() {
        let last = AtomicU32::new(0);
        dispatch(3, 5, |i| {
            last.fetch_max(i, Ordering::Relaxed);
        });
        assert_eq!(last.load(Ordering::Relaxed), 14);
    }

    #[test]
    fn test_generate_rejects_overflowing_config() {
        let config = StrandConfig {
            num_workgroups: 1 << 16,
            workgroup_size: 1 << 16,
            ..Default::default()
        };
        assert!(generate(&config).is_err());
    }

    #[test]
    fn test_generate_rejects_invalid_config() {
        let config = StrandConfig {
            sides: 0,
            ..Default::default()
        };
        assert!(generate(&config).is_err());
    }

    #[test]
    #[should_panic]
    fn test_undersized_targets_panic() {
        let config = StrandConfig::default();
        let targets = StrandTargets::with_capacity(config.vertex_capacity() / 2, 0);
        run_pass(&config, &targets);
    }
}
