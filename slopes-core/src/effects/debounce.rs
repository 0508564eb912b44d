//! Trailing debounce on a dedicated worker thread.
//!
//! Calls are pushed onto a channel. The worker keeps one pending value per key
//! and resets that key's deadline on every new call; once a deadline passes
//! with no further call, the handler runs with the last value. Dropping the
//! debouncer closes the channel; anything still pending is discarded.

use std::collections::BTreeMap;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

pub struct Debouncer<K, V> {
    name: String,
    tx: Option<Sender<(K, V)>>,
    handle: Option<JoinHandle<()>>,
}

impl<K, V> Debouncer<K, V>
where
    K: Ord + Send + 'static,
    V: Send + 'static,
{
    pub fn spawn<F>(name: &str, delay: Duration, handler: F) -> std::io::Result<Self>
    where
        F: FnMut(K, V) + Send + 'static,
    {
        let (tx, rx) = crossbeam_channel::unbounded::<(K, V)>();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || worker_loop(rx, delay, handler))?;

        Ok(Self {
            name: name.to_string(),
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    /// Schedule `value` under `key`, replacing anything pending for that key.
    pub fn call(&self, key: K, value: V) {
        let Some(tx) = &self.tx else { return };
        if tx.send((key, value)).is_err() {
            log::warn!(target: "effects", "{} worker is gone, dropping call", self.name);
        }
    }
}

impl<K, V> Drop for Debouncer<K, V> {
    fn drop(&mut self) {
        // closing the channel ends the worker loop
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!(target: "effects", "{} worker panicked", self.name);
            }
        }
    }
}

fn worker_loop<K, V, F>(rx: Receiver<(K, V)>, delay: Duration, mut handler: F)
where
    K: Ord,
    F: FnMut(K, V),
{
    let mut pending: BTreeMap<K, (Instant, V)> = BTreeMap::new();
    loop {
        let next_deadline = pending.values().map(|(deadline, _)| *deadline).min();
        let received = match next_deadline {
            Some(deadline) => rx.recv_deadline(deadline),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Ok((key, value)) => {
                pending.insert(key, (Instant::now() + delay, value));
            }
            Err(RecvTimeoutError::Timeout) => {
                let now = Instant::now();
                let (due, waiting): (BTreeMap<_, _>, BTreeMap<_, _>) = std::mem::take(&mut pending)
                    .into_iter()
                    .partition(|(_, (deadline, _))| *deadline <= now);
                pending = waiting;
                for (key, (_, value)) in due {
                    handler(key, value);
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Arc<Mutex<Vec<(u8, u32)>>>, impl FnMut(u8, u32) + Send + 'static) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        (calls, move |k, v| sink.lock().unwrap().push((k, v)))
    }

    #[test]
    fn burst_runs_once_with_last_value() {
        let (calls, handler) = recorder();
        let debouncer = Debouncer::spawn("test-debounce", Duration::from_millis(40), handler).unwrap();
        for v in 0..10 {
            debouncer.call(0, v);
        }
        thread::sleep(Duration::from_millis(300));
        assert_eq!(*calls.lock().unwrap(), vec![(0, 9)]);
    }

    #[test]
    fn keys_are_debounced_independently() {
        let (calls, handler) = recorder();
        let debouncer = Debouncer::spawn("test-debounce", Duration::from_millis(40), handler).unwrap();
        debouncer.call(1, 10);
        debouncer.call(2, 20);
        debouncer.call(1, 11);
        thread::sleep(Duration::from_millis(300));
        let mut seen = calls.lock().unwrap().clone();
        seen.sort();
        assert_eq!(seen, vec![(1, 11), (2, 20)]);
    }

    #[test]
    fn separate_bursts_run_separately() {
        let (calls, handler) = recorder();
        let debouncer = Debouncer::spawn("test-debounce", Duration::from_millis(20), handler).unwrap();
        debouncer.call(0, 1);
        thread::sleep(Duration::from_millis(200));
        debouncer.call(0, 2);
        thread::sleep(Duration::from_millis(200));
        assert_eq!(*calls.lock().unwrap(), vec![(0, 1), (0, 2)]);
    }

    #[test]
    fn drop_discards_pending() {
        let (calls, handler) = recorder();
        let debouncer = Debouncer::spawn("test-debounce", Duration::from_secs(30), handler).unwrap();
        debouncer.call(0, 1);
        drop(debouncer);
        assert!(calls.lock().unwrap().is_empty());
    }
}
