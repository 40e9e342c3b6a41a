// A backend that writes canned reports instead of running a tool.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use super::{Backend, CandidateInput, SynthInput, SynthOutput};
use crate::error::{Error, Result};

/// Records every call & the peak number of concurrent invocations.
#[derive(Default)]
pub struct StubBackend {
    pub metrics: HashMap<u32, (u64, u64, u64)>,
    pub fail: HashSet<u32>,
    pub no_reports: HashSet<u32>,
    pub panic: HashSet<u32>,
    pub delay: Duration,
    pub active: AtomicUsize,
    pub peak: AtomicUsize,
    pub calls: Mutex<Vec<String>>,
}

impl StubBackend {
    pub fn with_metrics(metrics: &[(u32, (u64, u64, u64))]) -> Self {
        Self { metrics: metrics.iter().cloned().collect(), ..Default::default() }
    }
}

impl Backend for StubBackend {
    fn find_candidates(&self, input: CandidateInput) -> Result<PathBuf> {
        Ok(input.work_dir.join("loop-analysis.txt"))
    }

    fn synthesize(&self, input: &SynthInput) -> Result<SynthOutput> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.calls.lock().unwrap().push(input.namespace.clone());
        thread::sleep(self.delay);
        self.active.fetch_sub(1, Ordering::SeqCst);

        if self.panic.contains(&input.factor) {
            panic!("stub panic");
        }
        if self.fail.contains(&input.factor) {
            return Err(Error::BackendInvocationFailed {
                factor: input.factor,
                reason: "exit status 1".to_string(),
            });
        }

        let output = input.expected_output();
        if self.no_reports.contains(&input.factor) {
            return Ok(output);
        }
        let (latency, ff, lut) = self.metrics[&input.factor];
        fs::create_dir_all(output.latency_report.parent().unwrap()).unwrap();
        fs::write(
            &output.latency_report,
            format!("$TOTAL_EXECUTE_TIME = \"{}\"\n", latency),
        ).unwrap();
        fs::write(
            &output.resource_report,
            format!(
                r#"{{"ModuleInfo": {{"Metrics": {{"{}": {{"Area": {{"FF": "{}", "LUT": "{}"}}}}}}}}}}"#,
                input.top_function, ff, lut
            ),
        ).unwrap();
        Ok(output)
    }
}
