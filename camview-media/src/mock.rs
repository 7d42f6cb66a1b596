//! Scriptable host backends for tests and demos
//!
//! These mocks stand in for a real capture platform: a device list that can
//! be edited and hot-plug-notified, per-call failure injection, and a
//! hold/complete gate so tests can settle overlapping acquisitions in either
//! order. Every acquire and every track stop lands in a shared operation log
//! so ordering invariants can be asserted.

use async_trait::async_trait;
use camview_core::{
    CaptureStream, DeviceChange, FullscreenHost, HostError, MediaHost, StreamConstraints,
    StreamHandle, StreamSink, VideoDevice, VideoResolution, DEVICE_ID_CONSTRAINT,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, oneshot};
use uuid::Uuid;

/// One entry in the host operation log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOp {
    /// `acquire_stream` was called with these constraints
    Acquire(StreamConstraints),
    /// A stream's tracks were stopped
    Stop(Uuid),
}

/// Record of a stream the mock host handed out
#[derive(Debug, Clone)]
pub struct MockStreamRecord {
    /// Constraints the stream was acquired under
    pub constraints: StreamConstraints,
    /// Handle of the stream
    pub handle: StreamHandle,
    stopped: Arc<AtomicBool>,
}

impl MockStreamRecord {
    /// Whether the stream's tracks have been stopped
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
struct MockStream {
    handle: StreamHandle,
    stopped: Arc<AtomicBool>,
    ops: Arc<Mutex<Vec<HostOp>>>,
}

impl CaptureStream for MockStream {
    fn handle(&self) -> StreamHandle {
        self.handle.clone()
    }

    fn stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            self.ops.lock().push(HostOp::Stop(self.handle.id));
        }
    }
}

type AcquireResult = Result<Box<dyn CaptureStream>, HostError>;

struct PendingAcquire {
    result: Option<AcquireResult>,
    respond: oneshot::Sender<AcquireResult>,
}

struct MockHostState {
    devices: Vec<VideoDevice>,
    acquire_failures: VecDeque<HostError>,
    enumerate_failures: VecDeque<HostError>,
    hold_acquisitions: bool,
    pending: Vec<PendingAcquire>,
    streams: Vec<MockStreamRecord>,
}

/// Scriptable capture host
pub struct MockMediaHost {
    state: Mutex<MockHostState>,
    ops: Arc<Mutex<Vec<HostOp>>>,
    change_tx: broadcast::Sender<DeviceChange>,
}

impl MockMediaHost {
    /// Host with no devices attached
    pub fn new() -> Self {
        Self::with_devices(Vec::new())
    }

    /// Host with the given devices attached
    pub fn with_devices(devices: Vec<VideoDevice>) -> Self {
        let (change_tx, _) = broadcast::channel(16);
        Self {
            state: Mutex::new(MockHostState {
                devices,
                acquire_failures: VecDeque::new(),
                enumerate_failures: VecDeque::new(),
                hold_acquisitions: false,
                pending: Vec::new(),
                streams: Vec::new(),
            }),
            ops: Arc::new(Mutex::new(Vec::new())),
            change_tx,
        }
    }

    /// Replace the attached device set (does not notify by itself)
    pub fn set_devices(&self, devices: Vec<VideoDevice>) {
        self.state.lock().devices = devices;
    }

    /// Fire a device topology notification
    pub fn notify_device_change(&self) {
        let _ = self.change_tx.send(DeviceChange);
    }

    /// Make the next `acquire_stream` call fail with `err`
    pub fn fail_next_acquire(&self, err: HostError) {
        self.state.lock().acquire_failures.push_back(err);
    }

    /// Make the next `enumerate_devices` call fail with `err`
    pub fn fail_next_enumeration(&self, err: HostError) {
        self.state.lock().enumerate_failures.push_back(err);
    }

    /// Park every subsequent acquisition until completed via
    /// [`complete_acquire`](MockMediaHost::complete_acquire)
    pub fn hold_acquisitions(&self) {
        self.state.lock().hold_acquisitions = true;
    }

    /// Number of parked acquisitions
    pub fn pending_acquires(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Yield until `n` acquisitions are parked
    pub async fn wait_for_pending(&self, n: usize) {
        while self.pending_acquires() < n {
            tokio::task::yield_now().await;
        }
    }

    /// Complete the parked acquisition at `index` (in call order). Returns
    /// false if no such entry exists.
    pub fn complete_acquire(&self, index: usize) -> bool {
        let mut state = self.state.lock();
        if index >= state.pending.len() {
            return false;
        }
        let mut pending = state.pending.remove(index);
        if let Some(result) = pending.result.take() {
            let _ = pending.respond.send(result);
        }
        true
    }

    /// The full acquire/stop operation log, in order
    pub fn ops(&self) -> Vec<HostOp> {
        self.ops.lock().clone()
    }

    /// Constraints of every acquire call, in order
    pub fn acquire_requests(&self) -> Vec<StreamConstraints> {
        self.ops
            .lock()
            .iter()
            .filter_map(|op| match op {
                HostOp::Acquire(c) => Some(c.clone()),
                HostOp::Stop(_) => None,
            })
            .collect()
    }

    /// How many acquire calls were permission probes
    pub fn probe_count(&self) -> usize {
        self.acquire_requests().iter().filter(|c| c.is_probe()).count()
    }

    /// Records of every stream handed out, in acquisition order
    pub fn stream_records(&self) -> Vec<MockStreamRecord> {
        self.state.lock().streams.clone()
    }

    fn resolve(&self, state: &mut MockHostState, constraints: &StreamConstraints) -> AcquireResult {
        if let Some(err) = state.acquire_failures.pop_front() {
            return Err(err);
        }

        // Exact device ids must match an attached device, like a real host.
        if let Some(device_id) = &constraints.device_id {
            if !state.devices.iter().any(|d| &d.device_id == device_id) {
                return Err(HostError::overconstrained(
                    DEVICE_ID_CONSTRAINT,
                    format!("no device with id {}", device_id),
                ));
            }
        }

        let resolution = match (constraints.ideal_width, constraints.ideal_height) {
            (Some(width), Some(height)) => VideoResolution::new(width, height),
            _ => VideoResolution::new(640, 480),
        };
        let device_id = constraints
            .device_id
            .clone()
            .or_else(|| state.devices.first().map(|d| d.device_id.clone()))
            .unwrap_or_else(|| "probe".to_string());

        let handle = StreamHandle::new(device_id, resolution);
        let stopped = Arc::new(AtomicBool::new(false));
        state.streams.push(MockStreamRecord {
            constraints: constraints.clone(),
            handle: handle.clone(),
            stopped: stopped.clone(),
        });
        Ok(Box::new(MockStream {
            handle,
            stopped,
            ops: self.ops.clone(),
        }))
    }
}

impl Default for MockMediaHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaHost for MockMediaHost {
    async fn enumerate_devices(&self) -> Result<Vec<VideoDevice>, HostError> {
        let mut state = self.state.lock();
        if let Some(err) = state.enumerate_failures.pop_front() {
            return Err(err);
        }
        Ok(state.devices.clone())
    }

    async fn acquire_stream(&self, constraints: &StreamConstraints) -> AcquireResult {
        let wait = {
            let mut state = self.state.lock();
            self.ops.lock().push(HostOp::Acquire(constraints.clone()));
            let result = self.resolve(&mut state, constraints);
            if !state.hold_acquisitions {
                return result;
            }
            let (respond, wait) = oneshot::channel();
            state.pending.push(PendingAcquire {
                result: Some(result),
                respond,
            });
            wait
        };
        wait.await
            .unwrap_or_else(|_| Err(HostError::aborted("mock host dropped")))
    }

    fn device_changes(&self) -> broadcast::Receiver<DeviceChange> {
        self.change_tx.subscribe()
    }
}

/// Render sink that records what it was shown
pub struct MockStreamSink {
    surface_id: String,
    inner: Mutex<SinkState>,
}

struct SinkState {
    current: Option<StreamHandle>,
    attach_log: Vec<StreamHandle>,
    clear_count: usize,
}

impl MockStreamSink {
    /// Sink with the default surface id
    pub fn new() -> Self {
        Self::with_surface_id("mock-video-surface")
    }

    /// Sink with an explicit surface id
    pub fn with_surface_id(surface_id: impl Into<String>) -> Self {
        Self {
            surface_id: surface_id.into(),
            inner: Mutex::new(SinkState {
                current: None,
                attach_log: Vec::new(),
                clear_count: 0,
            }),
        }
    }

    /// The stream currently shown, if any
    pub fn current(&self) -> Option<StreamHandle> {
        self.inner.lock().current.clone()
    }

    /// Every handle ever attached, in order
    pub fn attach_log(&self) -> Vec<StreamHandle> {
        self.inner.lock().attach_log.clone()
    }

    /// How many times the sink was cleared
    pub fn clear_count(&self) -> usize {
        self.inner.lock().clear_count
    }
}

impl Default for MockStreamSink {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamSink for MockStreamSink {
    fn attach(&self, handle: StreamHandle) {
        let mut inner = self.inner.lock();
        inner.attach_log.push(handle.clone());
        inner.current = Some(handle);
    }

    fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.current = None;
        inner.clear_count += 1;
    }

    fn surface_id(&self) -> String {
        self.surface_id.clone()
    }
}

/// Fullscreen host with a scriptable failure
pub struct MockFullscreenHost {
    surface: Mutex<Option<String>>,
    failures: Mutex<VecDeque<HostError>>,
}

impl MockFullscreenHost {
    /// Host with nothing fullscreen
    pub fn new() -> Self {
        Self {
            surface: Mutex::new(None),
            failures: Mutex::new(VecDeque::new()),
        }
    }

    /// Make the next request or exit call fail with `err`
    pub fn fail_next(&self, err: HostError) {
        self.failures.lock().push_back(err);
    }
}

impl Default for MockFullscreenHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FullscreenHost for MockFullscreenHost {
    fn request_fullscreen(&self, surface_id: &str) -> Result<(), HostError> {
        if let Some(err) = self.failures.lock().pop_front() {
            return Err(err);
        }
        *self.surface.lock() = Some(surface_id.to_string());
        Ok(())
    }

    fn exit_fullscreen(&self) -> Result<(), HostError> {
        if let Some(err) = self.failures.lock().pop_front() {
            return Err(err);
        }
        *self.surface.lock() = None;
        Ok(())
    }

    fn fullscreen_surface(&self) -> Option<String> {
        self.surface.lock().clone()
    }
}
