//! Fork-join worker pipeline over corpus files
//!
//! Producer thread feeds file paths into a bounded channel, N workers
//! map each path to an optional result, and the caller's thread drains
//! the result channel. Per-file work is side-effect-free; the only
//! shared step is the final collection. Completion order is irrelevant.

use crossbeam_channel::bounded;
use std::path::{Path, PathBuf};
use std::thread;

/// Counts from one pipeline run.
#[derive(Debug, Default, Clone, Copy)]
pub struct PipelineStats {
    /// Files fed into the pipeline
    pub total_files: usize,
    /// Files that produced a result
    pub processed: usize,
    /// Files the worker declined (no genre, unreadable)
    pub skipped: usize,
}

/// Map `work` over `files` on `num_workers` threads and collect every
/// `Some` result. `None` counts as a skip, never a failure.
///
/// `progress`, when given, is called with (collected, total) as results
/// arrive.
pub fn map_files_parallel<T, F>(
    files: Vec<PathBuf>,
    num_workers: usize,
    progress: Option<&(dyn Fn(usize, usize) + Sync)>,
    work: F,
) -> (Vec<T>, PipelineStats)
where
    T: Send,
    F: Fn(&Path) -> Option<T> + Sync,
{
    let total_files = files.len();
    let num_workers = num_workers.max(1);
    let buffer = num_workers * 2;

    // paths: producer -> workers; results: workers -> collector
    let (file_tx, file_rx) = bounded::<PathBuf>(buffer);
    let (result_tx, result_rx) = bounded::<T>(buffer);

    let work = &work;
    let mut results = Vec::with_capacity(total_files);
    let mut skipped = 0usize;

    thread::scope(|s| {
        s.spawn(move || {
            for file in files {
                // Blocks when the channel is full (backpressure)
                if file_tx.send(file).is_err() {
                    break;
                }
            }
        });

        let mut worker_handles = Vec::with_capacity(num_workers);
        for _ in 0..num_workers {
            let rx = file_rx.clone();
            let tx = result_tx.clone();
            worker_handles.push(s.spawn(move || {
                let mut worker_skipped = 0usize;
                for path in rx {
                    match work(&path) {
                        Some(item) => {
                            if tx.send(item).is_err() {
                                break;
                            }
                        }
                        None => worker_skipped += 1,
                    }
                }
                worker_skipped
            }));
        }

        // Drop our copies so the channels close once producer/workers finish
        drop(file_rx);
        drop(result_tx);

        for item in result_rx {
            results.push(item);
            if let Some(cb) = progress {
                cb(results.len(), total_files);
            }
        }

        for handle in worker_handles {
            skipped += handle.join().unwrap_or(0);
        }
    });

    let stats = PipelineStats {
        total_files,
        processed: results.len(),
        skipped,
    };
    (results, stats)
}
