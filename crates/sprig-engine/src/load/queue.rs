use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::pixels::PixelBuffer;
use crate::scene::SpriteId;

use super::{ImageLoader, LoadError};

/// Outcome of one load request.
#[derive(Debug)]
pub struct LoadCompletion {
    pub sprite: SpriteId,
    pub url: String,
    pub result: Result<PixelBuffer, LoadError>,
}

/// Runs load requests on worker threads and collects their completions.
///
/// Completions are only observed when the owner drains the queue, which the
/// scene does at tick boundaries. Once `cancel` is called, workers drop
/// their results instead of delivering them.
pub struct LoadQueue {
    loader: Arc<dyn ImageLoader>,
    tx: Sender<LoadCompletion>,
    rx: Receiver<LoadCompletion>,
    canceled: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
}

impl LoadQueue {
    pub fn new(loader: Arc<dyn ImageLoader>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            loader,
            tx,
            rx,
            canceled: Arc::new(AtomicBool::new(false)),
            workers: Vec::new(),
        }
    }

    /// Starts loading `url` for `sprite`. Ignored after cancellation.
    pub fn request(&mut self, sprite: SpriteId, url: &str) {
        if self.is_canceled() {
            log::debug!("load of {url} for {sprite:?} ignored: queue canceled");
            return;
        }

        let loader = Arc::clone(&self.loader);
        let canceled = Arc::clone(&self.canceled);
        let tx = self.tx.clone();
        let owned_url = url.to_string();

        let spawned = std::thread::Builder::new()
            .name(format!("sprig-load-{}", sprite.0))
            .spawn(move || {
                let result = loader.load(&owned_url);
                if canceled.load(Ordering::Acquire) {
                    log::debug!("dropping completion of {owned_url}: canceled");
                    return;
                }
                // The receiver is gone once the owning scene is dropped.
                let _ = tx.send(LoadCompletion { sprite, url: owned_url, result });
            });

        match spawned {
            Ok(handle) => self.workers.push(handle),
            Err(source) => {
                let _ = self.tx.send(LoadCompletion {
                    sprite,
                    url: url.to_string(),
                    result: Err(LoadError::Worker { url: url.to_string(), source }),
                });
            }
        }
    }

    /// Marks the queue canceled. In-flight workers finish but deliver nothing.
    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::Release);
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::Acquire)
    }

    /// Number of workers that have not finished yet.
    pub fn in_flight(&self) -> usize {
        self.workers.iter().filter(|w| !w.is_finished()).count()
    }

    /// Collects completions that have arrived, without blocking.
    pub fn drain(&mut self) -> Vec<LoadCompletion> {
        self.reap();
        if self.is_canceled() {
            while self.rx.try_recv().is_ok() {}
            return Vec::new();
        }
        self.rx.try_iter().collect()
    }

    /// Blocks until every in-flight worker finished or `timeout` elapsed,
    /// then collects whatever arrived.
    pub fn settle(&mut self, timeout: Duration) -> Vec<LoadCompletion> {
        let deadline = Instant::now() + timeout;
        let mut out = Vec::new();

        loop {
            self.reap();
            if self.workers.is_empty() {
                break;
            }
            let now = Instant::now();
            if now >= deadline {
                log::debug!("settle timed out with {} load(s) in flight", self.workers.len());
                break;
            }
            let wait = (deadline - now).min(Duration::from_millis(10));
            match self.rx.recv_timeout(wait) {
                Ok(c) => out.push(c),
                Err(RecvTimeoutError::Timeout) => {}
                // Unreachable while `self.tx` is alive.
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        out.extend(self.rx.try_iter());
        if self.is_canceled() {
            out.clear();
        }
        out
    }

    fn reap(&mut self) {
        let mut i = 0;
        while i < self.workers.len() {
            if self.workers[i].is_finished() {
                let handle = self.workers.swap_remove(i);
                if handle.join().is_err() {
                    log::error!("image load worker panicked");
                }
            } else {
                i += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixels::Rgba;

    fn ok_loader() -> Arc<dyn ImageLoader> {
        Arc::new(|url: &str| -> Result<PixelBuffer, LoadError> {
            let w = url.len() as u32;
            Ok(PixelBuffer::filled(w, 1, Rgba::WHITE))
        })
    }

    #[test]
    fn settle_collects_completions() {
        let mut q = LoadQueue::new(ok_loader());
        q.request(SpriteId(1), "abc");
        q.request(SpriteId(2), "abcdef");
        let mut done = q.settle(Duration::from_secs(5));
        done.sort_by_key(|c| c.sprite.0);

        assert_eq!(done.len(), 2);
        assert_eq!(done[0].result.as_ref().unwrap().width(), 3);
        assert_eq!(done[1].result.as_ref().unwrap().width(), 6);
        assert_eq!(q.in_flight(), 0);
    }

    #[test]
    fn failures_are_delivered_as_completions() {
        let loader: Arc<dyn ImageLoader> = Arc::new(|url: &str| -> Result<PixelBuffer, LoadError> {
            Err(LoadError::NotFound { url: url.to_string() })
        });
        let mut q = LoadQueue::new(loader);
        q.request(SpriteId(9), "missing.png");
        let done = q.settle(Duration::from_secs(5));
        assert_eq!(done.len(), 1);
        assert!(matches!(done[0].result, Err(LoadError::NotFound { .. })));
    }

    #[test]
    fn canceled_queue_delivers_nothing() {
        let mut q = LoadQueue::new(ok_loader());
        q.request(SpriteId(1), "abc");
        q.cancel();
        q.request(SpriteId(2), "ignored");
        assert!(q.settle(Duration::from_secs(5)).is_empty());
        assert!(q.drain().is_empty());
    }
}
