//! Producers of requests.
//!
//! Both the timer-driven generator and manual submission feed the same
//! unbounded channel that the simulation loop drains once per tick.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::FloorRange;
use crate::request::Request;

/// Shared counter handing out `R1`, `R2`, ... across every producer.
#[derive(Clone, Debug, Default)]
pub struct RequestIds(Arc<AtomicU64>);

impl RequestIds {
    pub fn next_id(&self) -> String {
        let n = self.0.fetch_add(1, Ordering::Relaxed) + 1;
        format!("R{}", n)
    }
}

pub struct RandomRequestGenerator {
    rng: StdRng,
    range: FloorRange,
    interval_ms: u64,
    ids: RequestIds,
    emitted: u64,
}

impl RandomRequestGenerator {
    pub fn new(
        range: FloorRange,
        interval_ms: u64,
        seed: Option<u64>,
        ids: RequestIds,
    ) -> Result<Self> {
        if interval_ms == 0 {
            return Err(Error::InvalidInterval("request interval"));
        }
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            rng,
            range,
            interval_ms,
            ids,
            emitted: 0,
        })
    }

    fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Draws a request with uniformly random floors. Source and destination
    /// may coincide.
    pub fn next_request(&mut self) -> Result<Request> {
        let source = self.rng.gen_range(self.range.min..=self.range.max);
        let destination = self.rng.gen_range(self.range.min..=self.range.max);
        self.emitted += 1;
        Request::new(self.ids.next_id(), source, destination, self.range)
    }

    /// Requests owed by a simulated clock reading of `elapsed_ms`: one per
    /// full interval, minus what was already produced.
    pub fn due(&mut self, elapsed_ms: u64) -> Result<Vec<Request>> {
        let target = elapsed_ms / self.interval_ms;
        let mut requests = Vec::new();
        while self.emitted < target {
            requests.push(self.next_request()?);
        }
        Ok(requests)
    }
}

/// Handle for injecting externally built requests into the simulation.
#[derive(Clone)]
pub struct RequestSubmitter {
    tx: mpsc::UnboundedSender<Request>,
    ids: RequestIds,
    range: FloorRange,
}

impl RequestSubmitter {
    pub fn new(tx: mpsc::UnboundedSender<Request>, ids: RequestIds, range: FloorRange) -> Self {
        Self { tx, ids, range }
    }

    /// Builds and sends a request, returning its id.
    pub fn submit(&self, source: i32, destination: i32) -> Result<String> {
        let request = Request::new(self.ids.next_id(), source, destination, self.range)?;
        let id = request.id().to_string();
        self.send(request)?;
        Ok(id)
    }

    pub fn send(&self, request: Request) -> Result<()> {
        self.tx.send(request).map_err(|_| Error::ChannelClosed)
    }
}

/// Background producer emitting one random request per interval.
pub struct RequestSource {
    generator: RandomRequestGenerator,
    submitter: RequestSubmitter,
}

impl RequestSource {
    pub fn new(generator: RandomRequestGenerator, submitter: RequestSubmitter) -> Self {
        Self {
            generator,
            submitter,
        }
    }

    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.generator.interval());
        // The first tick of a tokio interval fires immediately.
        interval.tick().await;
        info!(
            "random request source started (every {}ms)",
            self.generator.interval_ms
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let request = match self.generator.next_request() {
                        Ok(request) => request,
                        Err(err) => {
                            warn!("failed to generate request: {}", err);
                            continue;
                        }
                    };
                    debug!(
                        "generated request {} ({} -> {})",
                        request.id(),
                        request.source_floor(),
                        request.destination_floor()
                    );
                    if self.submitter.send(request).is_err() {
                        debug!("request channel closed, stopping source");
                        break;
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("random request source stopped");
    }
}
