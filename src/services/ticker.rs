// Author: Dustin Pilgrim
// License: MIT

use crate::core::events::Event;
use crate::core::manager_msg::ManagerMsg;
use crate::ddebug;

use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Owns at most one running sampler. Starting replaces, cancelling aborts.
#[derive(Debug, Default)]
pub struct Ticker {
    handle: Option<JoinHandle<()>>,
    epoch: Option<u64>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, tx: Sender<ManagerMsg>, period: Duration, epoch: u64) {
        self.cancel();
        ddebug!("Ticker", "start (epoch={epoch}, period={}ms)", period.as_millis());
        self.handle = Some(tokio::spawn(run_ticker(tx, period, epoch)));
        self.epoch = Some(epoch);
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            ddebug!("Ticker", "cancelled (epoch={:?})", self.epoch);
        }
        self.epoch = None;
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    #[cfg(test)]
    pub fn epoch(&self) -> Option<u64> {
        self.epoch
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run_ticker(tx: Sender<ManagerMsg>, period: Duration, epoch: u64) {
    let mut timer = interval(period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // First tick of `interval` completes immediately.
    timer.tick().await;

    loop {
        timer.tick().await;

        let now_ms = crate::core::utils::now_ms();
        // If the daemon is gone, stop.
        if tx.send(ManagerMsg::Event(Event::Tick { now_ms, epoch })).await.is_err() {
            ddebug!("Ticker", "stopping (receiver dropped)");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn sends_ticks_tagged_with_epoch() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut ticker = Ticker::new();
        ticker.start(tx, Duration::from_millis(5), 7);

        let msg = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();

        match msg {
            ManagerMsg::Event(Event::Tick { epoch, .. }) => assert_eq!(epoch, 7),
            other => panic!("unexpected message: {other:?}"),
        }
        assert_eq!(ticker.epoch(), Some(7));
    }

    #[tokio::test]
    async fn cancel_stops_the_task() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut ticker = Ticker::new();
        ticker.start(tx, Duration::from_millis(5), 1);
        ticker.cancel();

        assert!(!ticker.is_running());
        assert_eq!(ticker.epoch(), None);

        // The aborted task drops its sender, so the channel closes.
        let closed = tokio::time::timeout(Duration::from_secs(2), async {
            while rx.recv().await.is_some() {}
        })
        .await;
        assert!(closed.is_ok());
    }
}
