//! The in-memory face implementation provided by InfoMax.

use bytes::Bytes;
use infomax_api::{builder::Builder, config::Config, face::*, *};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// The in-memory face implementation provided by InfoMax.
/// This is NOT a production module. It is for testing only.
/// It answers requests from data published into a [MemStore] within
/// the same process; a request nothing was published for times out.
#[derive(Debug)]
pub struct MemFaceFactory {
    store: MemStore,
}

impl MemFaceFactory {
    /// Construct a new MemFaceFactory over an empty store.
    pub fn create() -> DynFaceFactory {
        Self::with_store(MemStore::default())
    }

    /// Construct a new MemFaceFactory answering from the given store.
    /// Callers keep a clone of the handle to publish data and to
    /// inspect the request log afterwards.
    pub fn with_store(store: MemStore) -> DynFaceFactory {
        let out: DynFaceFactory = Arc::new(MemFaceFactory { store });
        out
    }
}

impl FaceFactory for MemFaceFactory {
    fn default_config(&self, _config: &mut Config) -> ImResult<()> {
        Ok(())
    }

    fn create(
        &self,
        _builder: Arc<Builder>,
        handler: DynFaceHandler,
    ) -> BoxFut<'static, ImResult<DynFace>> {
        let store = self.store.clone();
        Box::pin(async move {
            handler.on_open();
            let out: DynFace = Arc::new(MemFace {
                store,
                handler,
                closed: AtomicBool::new(false),
            });
            Ok(out)
        })
    }
}

/// Shared storage backing [MemFaceFactory] faces.
///
/// Besides the published data objects, the store keeps per-request
/// bookkeeping: the full request log in expression order, and the peak
/// number of simultaneously outstanding requests, so tests can assert
/// sequencing properties directly.
#[derive(Debug, Clone, Default)]
pub struct MemStore(Arc<Mutex<MemStoreInner>>);

#[derive(Debug, Default)]
struct MemStoreInner {
    /// Published (name, payload) pairs in publication order.
    /// The first match answers a request.
    data: Vec<(Name, Bytes)>,
    log: Vec<Name>,
    in_flight: usize,
    peak_in_flight: usize,
}

impl MemStore {
    /// Publish a data object under the given full name. A request is
    /// answered by this object if its name equals the request name or
    /// hierarchically extends it.
    pub fn publish(&self, name: Name, payload: Bytes) {
        self.0.lock().unwrap().data.push((name, payload));
    }

    /// Every request expressed over faces backed by this store, in
    /// expression order.
    pub fn request_log(&self) -> Vec<Name> {
        self.0.lock().unwrap().log.clone()
    }

    /// The maximum number of requests that were outstanding at the
    /// same instant.
    pub fn peak_in_flight(&self) -> usize {
        self.0.lock().unwrap().peak_in_flight
    }

    fn begin_request(&self, name: &Name) {
        let mut lock = self.0.lock().unwrap();
        lock.log.push(name.clone());
        lock.in_flight += 1;
        lock.peak_in_flight = lock.peak_in_flight.max(lock.in_flight);
    }

    fn end_request(&self) {
        self.0.lock().unwrap().in_flight -= 1;
    }

    fn resolve(&self, request: &Name) -> Option<(Name, Bytes)> {
        self.0
            .lock()
            .unwrap()
            .data
            .iter()
            .find(|(data, _)| is_name_prefix(request, data))
            .cloned()
    }
}

/// True if every component of `prefix` matches the leading components
/// of `name`, in order. A name is a prefix of itself.
fn is_name_prefix(prefix: &Name, name: &Name) -> bool {
    let mut components = name.components();
    for wanted in prefix.components() {
        match components.next() {
            Some(got) if got == wanted => {}
            _ => return false,
        }
    }
    true
}

#[derive(Debug)]
struct MemFace {
    store: MemStore,
    handler: DynFaceHandler,
    closed: AtomicBool,
}

impl Face for MemFace {
    fn express_request(
        &self,
        request: Request,
    ) -> BoxFut<'_, ImResult<FetchOutcome>> {
        Box::pin(async move {
            if self.closed.load(Ordering::SeqCst) {
                return Err(ImError::other("face closed"));
            }
            self.store.begin_request(&request.name);
            // yield while "on the wire" so overlapping requests are
            // observable in the in-flight bookkeeping
            tokio::task::yield_now().await;
            let outcome = match self.store.resolve(&request.name) {
                Some((name, payload)) => {
                    FetchOutcome::Data(Response { name, payload })
                }
                // an unanswerable request times out immediately rather
                // than consuming the full request lifetime
                None => FetchOutcome::Timeout,
            };
            self.store.end_request();
            Ok(outcome)
        })
    }

    fn close(&self) -> BoxFut<'_, ()> {
        Box::pin(async move {
            if !self.closed.swap(true, Ordering::SeqCst) {
                self.handler.on_close();
            }
        })
    }
}
