//! CoreConsumer is the InfoMax module for list-driven element retrieval.
//!
//! One discovery round trip yields an ordered list of candidate
//! identifiers; the consumer then walks that list strictly sequentially,
//! fetching one element per round trip and handing each result to the
//! registered handler with its name normalized against the origin prefix.
//!
//! It consists of multiple parts:
//! - A per-session walk state value tracking where the current round is
//! - A round task that expresses the discovery request and drains the
//!   decoded candidate list one element request at a time
//! - A face-event forwarder that relays session open/close/error
//!   notifications to the consumer handler
//!
//! ### Round task
//!
//! Each call to [Consumer::get] or [Consumer::get_nearest_neighbor]
//! replaces the live round (if any) with a freshly spawned task. The
//! task expresses the discovery request and awaits its single-slot
//! outcome. A data outcome is decoded into the candidate list; the task
//! then loops the candidates in order, and for each one expresses an
//! element request, advances the cursor, and awaits the outcome before
//! touching the next candidate. At most one request is therefore ever
//! outstanding, and element requests resolve strictly in list order.
//!
//! ### Timeouts
//!
//! A discovery timeout ends the round before the walk starts. An
//! element timeout is logged and the element skipped; the walk always
//! proceeds forward and never reissues a request.

use infomax_api::{builder::Builder, config::Config, consumer::*, face::*, *};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// Name component tag marking a count-based discovery request.
const DISCOVERY_TAG: &str = "InfoMax";

/// Name tag marking a nearest-neighbor discovery request.
const NEIGHBOR_TAG: &str = "InfoMaxNeighbor";

/// Module config key for [CoreConsumerConfig].
const MOD_NAME: &str = "coreConsumer";

/// CoreConsumer configuration types.
pub mod config {
    use infomax_api::config::ModConfig;

    /// Configuration parameters for [CoreConsumerFactory](super::CoreConsumerFactory).
    #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CoreConsumerConfig {
        /// Lifetime applied to every request this consumer expresses,
        /// in milliseconds. Default: 1000.
        pub interest_lifetime_ms: u32,

        /// Auxiliary character delimiting the count token in a
        /// count-based discovery name. Default: `#`.
        pub aux_char: char,
    }

    impl Default for CoreConsumerConfig {
        fn default() -> Self {
            Self {
                interest_lifetime_ms: 1000,
                aux_char: '#',
            }
        }
    }

    impl ModConfig for CoreConsumerConfig {}
}

use config::*;

/// A production-ready InfoMax consumer module.
#[derive(Debug)]
pub struct CoreConsumerFactory {}

impl CoreConsumerFactory {
    /// Construct a new CoreConsumerFactory.
    pub fn create() -> DynConsumerFactory {
        let out: DynConsumerFactory = Arc::new(CoreConsumerFactory {});
        out
    }
}

impl ConsumerFactory for CoreConsumerFactory {
    fn default_config(&self, config: &mut Config) -> ImResult<()> {
        config.add_default_module_config::<CoreConsumerConfig>(MOD_NAME.into())
    }

    fn create(
        &self,
        builder: Arc<Builder>,
        prefix: Name,
        handler: DynConsumerHandler,
    ) -> BoxFut<'static, ImResult<DynConsumer>> {
        Box::pin(async move {
            let config: CoreConsumerConfig =
                builder.config.get_module_config(MOD_NAME)?;
            let face_handler: DynFaceHandler = Arc::new(FaceEvents {
                prefix: prefix.clone(),
                handler: handler.clone(),
            });
            let face =
                builder.face.create(builder.clone(), face_handler).await?;
            let out: DynConsumer =
                Arc::new(CoreConsumer::new(config, prefix, face, handler));
            Ok(out)
        })
    }
}

/// Relays face session events to the registered consumer handler.
#[derive(Debug)]
struct FaceEvents {
    prefix: Name,
    handler: DynConsumerHandler,
}

impl FaceHandler for FaceEvents {
    fn on_open(&self) {
        tracing::info!(prefix = %self.prefix, "consumer session open");
        self.handler.on_open();
    }

    fn on_close(&self) {
        tracing::info!(prefix = %self.prefix, "consumer session closed");
        self.handler.on_close();
    }

    fn on_error(&self, reason: String) {
        tracing::error!(prefix = %self.prefix, %reason, "face error");
        self.handler.on_error(reason);
    }
}

/// Retrieval state of one consumer session.
///
/// Transitioned only by the round task (discovery handling and the
/// element step) and by [Consumer::close].
#[derive(Debug, Clone, PartialEq, Eq)]
enum WalkState {
    /// No discovery round is live.
    Idle,

    /// A discovery request is in flight.
    Listing,

    /// Elements are being fetched, one request at a time.
    Walking {
        /// The candidate identifiers decoded from the discovery
        /// response, in response order.
        candidates: Vec<String>,

        /// Index of the next candidate not yet requested. Advanced
        /// exactly once per candidate, immediately after its request
        /// is issued.
        cursor: usize,
    },
}

#[derive(Debug)]
struct CoreConsumer {
    config: CoreConsumerConfig,
    prefix: Name,
    face: DynFace,
    handler: DynConsumerHandler,
    state: Arc<Mutex<WalkState>>,
    round_task: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for CoreConsumer {
    fn drop(&mut self) {
        if let Some(task) = self.round_task.lock().unwrap().take() {
            task.abort();
        }
    }
}

impl CoreConsumer {
    fn new(
        config: CoreConsumerConfig,
        prefix: Name,
        face: DynFace,
        handler: DynConsumerHandler,
    ) -> Self {
        Self {
            config,
            prefix,
            face,
            handler,
            state: Arc::new(Mutex::new(WalkState::Idle)),
            round_task: Mutex::new(None),
        }
    }

    /// `<prefix>/InfoMax/<aux><count><aux>0`
    fn discovery_name(&self, count: u32) -> ImResult<Name> {
        let aux = self.config.aux_char;
        self.prefix
            .join(&format!("/{DISCOVERY_TAG}/{aux}{count}{aux}0"))
    }

    /// `<prefix>/InfoMaxNeighbor<suffix>`
    fn neighbor_name(&self, suffix: &str) -> ImResult<Name> {
        self.prefix.join(&format!("/{NEIGHBOR_TAG}{suffix}"))
    }

    /// Replace the live round (if any) with a new one rooted at the
    /// given discovery name. The replaced round's list and cursor are
    /// discarded with it.
    fn start_round(&self, discovery: Name) {
        let mut lock = self.round_task.lock().unwrap();
        if let Some(prev) = lock.take() {
            prev.abort();
        }
        *lock = Some(tokio::task::spawn(run_round(
            self.config.clone(),
            self.prefix.clone(),
            self.face.clone(),
            self.handler.clone(),
            self.state.clone(),
            discovery,
        )));
    }
}

impl Consumer for CoreConsumer {
    fn get(&self, count: u32) -> BoxFut<'_, ImResult<()>> {
        Box::pin(async move {
            let name = self.discovery_name(count)?;
            tracing::info!(name = %name, "expressing discovery interest");
            self.start_round(name);
            Ok(())
        })
    }

    fn get_nearest_neighbor(
        &self,
        suffix: String,
    ) -> BoxFut<'_, ImResult<()>> {
        Box::pin(async move {
            let name = self.neighbor_name(&suffix)?;
            tracing::info!(name = %name, "expressing nearest-neighbor interest");
            self.start_round(name);
            Ok(())
        })
    }

    fn close(&self) -> BoxFut<'_, ()> {
        Box::pin(async move {
            if let Some(task) = self.round_task.lock().unwrap().take() {
                task.abort();
            }
            *self.state.lock().unwrap() = WalkState::Idle;
            self.face.close().await;
        })
    }
}

/// One full discovery round: express the discovery request, decode the
/// candidate list, then fetch each candidate strictly in order.
async fn run_round(
    config: CoreConsumerConfig,
    prefix: Name,
    face: DynFace,
    handler: DynConsumerHandler,
    state: Arc<Mutex<WalkState>>,
    discovery: Name,
) {
    *state.lock().unwrap() = WalkState::Listing;

    let request = Request::fresh(discovery, config.interest_lifetime_ms);
    let candidates = match face.express_request(request.clone()).await {
        Err(err) => {
            tracing::warn!(name = %request.name, ?err, "discovery request failed");
            handler.on_error(err.to_string());
            *state.lock().unwrap() = WalkState::Idle;
            return;
        }
        Ok(FetchOutcome::Timeout) => {
            tracing::warn!(name = %request.name, "discovery request timed out");
            *state.lock().unwrap() = WalkState::Idle;
            return;
        }
        Ok(FetchOutcome::Data(response)) => {
            let candidates =
                protocol::decode_candidate_list(&response.payload);
            tracing::debug!(?candidates, "received candidate list");
            candidates
        }
    };

    if candidates.is_empty() {
        // nothing above the noise threshold; the walk never starts
        *state.lock().unwrap() = WalkState::Idle;
        return;
    }

    *state.lock().unwrap() = WalkState::Walking {
        candidates: candidates.clone(),
        cursor: 0,
    };

    for (index, candidate) in candidates.iter().enumerate() {
        let name = match prefix.join(candidate) {
            Ok(name) => name,
            Err(err) => {
                tracing::warn!(%candidate, ?err, "skipping malformed candidate");
                advance_cursor(&state, index + 1);
                continue;
            }
        };
        let request = Request::fresh(name, config.interest_lifetime_ms);
        tracing::info!(name = %request.name, "expressing element interest");

        // The cursor advances as soon as the request is out the door:
        // the walk moves forward whether the outcome is data or timeout.
        let pending = face.express_request(request.clone());
        advance_cursor(&state, index + 1);

        match pending.await {
            Err(err) => {
                tracing::warn!(name = %request.name, ?err, "element request failed");
                handler.on_error(err.to_string());
            }
            Ok(FetchOutcome::Timeout) => {
                tracing::warn!(name = %request.name, "element request timed out");
            }
            Ok(FetchOutcome::Data(response)) => {
                tracing::debug!(name = %response.name, "received element");
                let normalized = response
                    .name
                    .strip_components(prefix.component_count());
                handler.on_data(
                    request,
                    Response {
                        name: normalized,
                        payload: response.payload,
                    },
                );
            }
        }
    }

    *state.lock().unwrap() = WalkState::Idle;
}

fn advance_cursor(state: &Mutex<WalkState>, to: usize) {
    if let WalkState::Walking { cursor, .. } = &mut *state.lock().unwrap() {
        *cursor = to;
    }
}
