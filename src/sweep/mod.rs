// Synthesizing the design once per unroll factor.

pub mod artifact;
mod data;
mod report;

pub use data::{Metadata, SweepReport, SweepResult};
pub use report::{parse_latency, parse_resources, read_result};

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc;

use crossbeam::sync::WaitGroup;
use log::{error, info, warn};

use crate::backend::{AnyBackend, SynthInput, SynthOutput};
use crate::error::{Error, Result};
use crate::hotloop::LoopCandidate;

/// What to sweep & how wide.
#[derive(Clone, Debug)]
pub struct SweepParams {
    pub user_code: PathBuf,
    pub top_function: String,
    pub array_name: String,
    pub factors: Vec<u32>,
    pub work_dir: PathBuf,
    pub threads: usize,
}

// =============================================================================
// Namespaces
// =============================================================================

/// Project directory names, one per entry of FACTORS. A repeated factor gets a
/// numbered suffix so that no two invocations share a directory.
pub fn namespaces(factors: &[u32]) -> Vec<String> {
    let mut seen: HashMap<u32, usize> = HashMap::new();
    factors.iter()
           .map(|f| {
               let n = seen.entry(*f).or_insert(0);
               let name = match *n {
                   0 => format!("proj{}", f),
                   _ => format!("proj{}-{}", f, n),
               };
               *n += 1;
               name
           })
           .collect()
}

// =============================================================================
// Sweep
// =============================================================================

/// Synthesize the design for every factor on a bounded pool & parse the
/// reports. Any failing factor fails the whole sweep.
pub fn sweep(backend: AnyBackend, hotloop: &LoopCandidate, params: &SweepParams) -> Result<SweepReport> {
    let inputs: Vec<SynthInput> = params.factors.iter()
        .zip(namespaces(&params.factors))
        .map(|(factor, namespace)| SynthInput {
            work_dir: params.work_dir.clone(),
            namespace,
            user_code: params.user_code.clone(),
            top_function: params.top_function.clone(),
            loop_name: hotloop.name.clone(),
            factor: *factor,
            array_name: params.array_name.clone(),
        })
        .collect();

    let outcomes = run_all(backend, &inputs, params.threads)?;

    // Report every failure, then give up on the first one
    let failures = outcomes.iter().filter(|o| o.is_err()).count();
    if failures > 0 {
        warn!("{} of {} backend invocations failed", failures, outcomes.len());
    }

    // Parse the reports in sweep order
    let mut results = vec![];
    for (input, outcome) in inputs.iter().zip(outcomes) {
        let output = outcome?;
        let result = read_result(input.factor, &output, &params.top_function)?;
        info!(
            "Unroll factor {}: latency {}, FF {}, LUT {}",
            result.factor, result.latency, result.ff, result.lut
        );
        results.push(result);
    }

    let metadata = Metadata {
        user_code: params.user_code.clone(),
        top_function: params.top_function.clone(),
        unrolled_loop_name: hotloop.name.clone(),
        partitioned_array_name: params.array_name.clone(),
    };
    return Ok(SweepReport { metadata, results });
}

// =============================================================================
// Worker Pool
// =============================================================================

/// Run every invocation on a pool of THREADS workers & wait for all of them.
/// Outcomes are returned in the order of INPUTS.
fn run_all(backend: AnyBackend, inputs: &[SynthInput], threads: usize) -> Result<Vec<Result<SynthOutput>>> {
    info!("Creating sweep thread pool with {} workers", threads);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("sweep-{}", i))
        .panic_handler(|_| error!("A sweep worker panicked"))
        .build()
        .map_err(|e| Error::Config(format!("unable to create sweep thread pool: {}", e)))?;

    // The WaitGroup is the barrier: nothing is parsed until every invocation
    // has exited.
    let wg = WaitGroup::new();
    let (tx, rx) = mpsc::channel::<(usize, Result<SynthOutput>)>();

    for (i, input) in inputs.iter().enumerate() {
        let backend = backend.clone();
        let input = input.clone();
        let tx = tx.clone();
        let wg = wg.clone();
        pool.spawn(move || {
            let outcome = backend.synthesize(&input);
            if let Err(e) = &outcome {
                error!("{}", e);
            }
            let _ = tx.send((i, outcome));
            drop(wg);
        });
    }
    drop(tx);
    wg.wait();
    info!("All {} backend invocations finished", inputs.len());

    // Put the outcomes back in sweep order
    let mut slots: Vec<Option<Result<SynthOutput>>> = inputs.iter().map(|_| None).collect();
    for (i, outcome) in rx.iter() {
        slots[i] = Some(outcome);
    }

    let outcomes = slots.into_iter()
        .zip(inputs)
        .map(|(slot, input)| slot.unwrap_or_else(|| Err(Error::BackendInvocationFailed {
            factor: input.factor,
            reason: "worker exited without a result".to_string(),
        })))
        .collect();
    return Ok(outcomes);
}
