//! The clock that turns the globe.
//!
//! Runs as its own tokio task and reports how far through a revolution the
//! globe should be. The projector never keeps time itself.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationEvent {
    /// Fraction of a full revolution, `[0, 1)`.
    Frame { progress: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationCommand {
    Pause,
    Resume,
}

pub fn start_animation(
    frame_interval: Duration,
    rotation_period: Duration,
    mut cmd_receiver: mpsc::Receiver<AnimationCommand>,
    event_sender: mpsc::Sender<AnimationEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let period = rotation_period.as_secs_f64().max(f64::EPSILON);
        let mut elapsed = Duration::ZERO;
        let mut last = Instant::now();
        let mut running = true;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = Instant::now();
                    if running {
                        elapsed += now - last;
                    }
                    last = now;

                    let progress = (elapsed.as_secs_f64() / period).fract();
                    match event_sender.try_send(AnimationEvent::Frame { progress }) {
                        // a slow frame just drops this tick
                        Ok(()) | Err(mpsc::error::TrySendError::Full(_)) => {}
                        Err(mpsc::error::TrySendError::Closed(_)) => break,
                    }
                }
                cmd = cmd_receiver.recv() => match cmd {
                    Some(AnimationCommand::Pause) => running = false,
                    Some(AnimationCommand::Resume) => {
                        running = true;
                        last = Instant::now();
                    }
                    None => break,
                },
            }
        }
        debug!("animation driver stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_frames_report_progress_in_range() {
        let (_cmd_sender, cmd_receiver) = mpsc::channel(4);
        let (event_sender, mut event_receiver) = mpsc::channel(4);
        let handle = start_animation(
            Duration::from_millis(5),
            Duration::from_millis(1000),
            cmd_receiver,
            event_sender,
        );

        let mut last = -1.0;
        for _ in 0..3 {
            let Some(AnimationEvent::Frame { progress }) = event_receiver.recv().await else {
                panic!("driver stopped early");
            };
            assert!((0.0..1.0).contains(&progress));
            assert!(progress >= last);
            last = progress;
        }

        drop(event_receiver);
        time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("driver did not stop")
            .unwrap();
    }

    #[tokio::test]
    async fn test_driver_stops_when_commands_close() {
        let (cmd_sender, cmd_receiver) = mpsc::channel(4);
        let (event_sender, _event_receiver) = mpsc::channel(64);
        let handle = start_animation(
            Duration::from_millis(5),
            Duration::from_millis(1000),
            cmd_receiver,
            event_sender,
        );
        cmd_sender.send(AnimationCommand::Pause).await.unwrap();
        drop(cmd_sender);
        time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("driver did not stop")
            .unwrap();
    }
}
