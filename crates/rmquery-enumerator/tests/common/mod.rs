//! Shared mock transport for enumeration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rmquery_enumerator::{
    EnumerateRequest, EnumerateResponse, EnumerationContext, EnumerationError, EnumerationResult,
    EnumerationTransport, PullResponse,
};
use uuid::Uuid;

/// Pulls a page-size-honouring transport serves before giving up.
pub const PULL_LIMIT: usize = 1000;

/// Installs a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
struct CursorState {
    current_token: Option<String>,
    served: usize,
}

/// Serves a fixed list of pages and counts every protocol call.
///
/// Page 0 is returned by Enumerate, page N by the Nth Pull. Contexts are
/// fresh `urn:uuid:` tokens and a Pull with anything but the latest one
/// faults, as the real service does.
#[derive(Default)]
pub struct ScriptedTransport {
    pages: Vec<Vec<u32>>,
    total_count: Option<u64>,
    fail_enumerate: bool,
    fail_pull: Option<usize>,
    fail_release: bool,
    omit_enumerate_context: bool,
    omit_pull_context: Option<usize>,
    pull_delay: Option<Duration>,
    honour_page_size: bool,

    state: Mutex<CursorState>,
    enumerates: AtomicUsize,
    pulls: AtomicUsize,
    releases: AtomicUsize,
    last_request: Mutex<Option<EnumerateRequest>>,
    pull_sizes: Mutex<Vec<u32>>,
    released: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new(pages: Vec<Vec<u32>>) -> Self {
        let total = pages.iter().map(Vec::len).sum::<usize>() as u64;
        Self {
            pages,
            total_count: Some(total),
            ..Self::default()
        }
    }

    /// Six records in three pages of two.
    pub fn six_in_three() -> Self {
        Self::new(vec![vec![1, 2], vec![3, 4], vec![5, 6]])
    }

    pub fn without_total(mut self) -> Self {
        self.total_count = None;
        self
    }

    pub fn failing_enumerate(mut self) -> Self {
        self.fail_enumerate = true;
        self
    }

    /// The `n`th Pull (1-based) faults.
    pub fn failing_pull(mut self, n: usize) -> Self {
        self.fail_pull = Some(n);
        self
    }

    pub fn failing_release(mut self) -> Self {
        self.fail_release = true;
        self
    }

    pub fn omitting_enumerate_context(mut self) -> Self {
        self.omit_enumerate_context = true;
        self
    }

    /// The `n`th Pull (1-based) answers without a context.
    pub fn omitting_pull_context(mut self, n: usize) -> Self {
        self.omit_pull_context = Some(n);
        self
    }

    pub fn with_pull_delay(mut self, delay: Duration) -> Self {
        self.pull_delay = Some(delay);
        self
    }

    /// A Pull asking for zero elements returns an empty page and leaves the
    /// cursor where it was. Gives up after `PULL_LIMIT` Pulls.
    pub fn honouring_page_size(mut self) -> Self {
        self.honour_page_size = true;
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn enumerates(&self) -> usize {
        self.enumerates.load(Ordering::SeqCst)
    }

    pub fn pulls(&self) -> usize {
        self.pulls.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<EnumerateRequest> {
        self.last_request.lock().unwrap().clone()
    }

    pub fn pull_sizes(&self) -> Vec<u32> {
        self.pull_sizes.lock().unwrap().clone()
    }

    pub fn released_tokens(&self) -> Vec<String> {
        self.released.lock().unwrap().clone()
    }

    /// Latest token handed out and not yet superseded.
    pub fn current_token(&self) -> Option<String> {
        self.state.lock().unwrap().current_token.clone()
    }

    /// Waits up to two seconds for `releases()` to reach `expected`.
    pub fn wait_for_releases(&self, expected: usize) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if self.releases() >= expected {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        self.releases() >= expected
    }

    fn issue(state: &mut CursorState) -> EnumerationContext {
        let token = format!("urn:uuid:{}", Uuid::new_v4());
        state.current_token = Some(token.clone());
        EnumerationContext::new(token)
    }
}

impl EnumerationTransport for ScriptedTransport {
    type Item = u32;

    fn enumerate(
        &self,
        request: &EnumerateRequest,
    ) -> EnumerationResult<EnumerateResponse<u32>> {
        self.enumerates.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        if self.fail_enumerate {
            return Err(EnumerationError::fault(
                "a:CannotProcessFilter",
                "the filter could not be processed",
            ));
        }

        let total_count = if request.include_count {
            self.total_count
        } else {
            None
        };

        let mut state = self.state.lock().unwrap();
        if request.max_elements == 0 {
            return Ok(EnumerateResponse {
                context: Some(Self::issue(&mut state)),
                items: Vec::new(),
                total_count,
                end_of_sequence: self.pages.iter().all(Vec::is_empty),
            });
        }

        state.served = 1;
        let context = if self.omit_enumerate_context {
            None
        } else {
            Some(Self::issue(&mut state))
        };
        Ok(EnumerateResponse {
            context,
            items: self.pages.first().cloned().unwrap_or_default(),
            total_count,
            end_of_sequence: self.pages.len() <= 1,
        })
    }

    fn pull(
        &self,
        context: &EnumerationContext,
        max_elements: u32,
    ) -> EnumerationResult<PullResponse<u32>> {
        let n = self.pulls.fetch_add(1, Ordering::SeqCst) + 1;
        self.pull_sizes.lock().unwrap().push(max_elements);
        if let Some(delay) = self.pull_delay {
            std::thread::sleep(delay);
        }

        let mut state = self.state.lock().unwrap();
        if state.current_token.as_deref() != Some(context.as_str()) {
            return Err(EnumerationError::fault(
                "a:InvalidEnumerationContext",
                "stale or unknown enumeration context",
            ));
        }
        if self.fail_pull == Some(n) {
            return Err(EnumerationError::fault(
                "a:EndpointUnavailable",
                "service unavailable",
            ));
        }

        if self.honour_page_size {
            if n > PULL_LIMIT {
                return Err(EnumerationError::Transport(format!(
                    "gave up after {PULL_LIMIT} pulls"
                )));
            }
            if max_elements == 0 {
                return Ok(PullResponse {
                    context: Some(Self::issue(&mut state)),
                    items: Vec::new(),
                    end_of_sequence: false,
                });
            }
        }

        let index = state.served;
        state.served += 1;
        let context = if self.omit_pull_context == Some(n) {
            state.current_token = None;
            None
        } else {
            Some(Self::issue(&mut state))
        };
        Ok(PullResponse {
            context,
            items: self.pages.get(index).cloned().unwrap_or_default(),
            end_of_sequence: index + 1 >= self.pages.len(),
        })
    }

    fn release(&self, context: EnumerationContext) -> EnumerationResult<()> {
        self.releases.fetch_add(1, Ordering::SeqCst);
        self.released.lock().unwrap().push(context.into_inner());
        if self.fail_release {
            return Err(EnumerationError::Transport("connection reset".to_string()));
        }
        Ok(())
    }
}
