//! Periodic update prompts posted to Slack channels.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::blocks;
use crate::client::SlackClient;

/// Posts the fixed two-button update prompt to the given channel.
pub async fn send_reminder(client: &SlackClient, channel: &str) -> anyhow::Result<()> {
    let message = blocks::reminder_message(channel);
    client.post_message(&message).await?;
    Ok(())
}

/// At most one running job per channel; starting a schedule for a channel
/// that already has one replaces it. Dropping the scheduler aborts all
/// jobs (process shutdown).
pub struct ReminderScheduler {
    client: SlackClient,
    interval: Duration,
    jobs: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl ReminderScheduler {
    pub fn new(client: SlackClient, interval: Duration) -> Self {
        Self {
            client,
            interval,
            jobs: Mutex::new(HashMap::new()),
        }
    }

    pub async fn start(&self, channel: &str) {
        let mut jobs = self.jobs.lock().await;
        if let Some(existing) = jobs.remove(channel) {
            existing.abort();
            info!(channel = %channel, "replacing existing reminder schedule");
        }

        let client = self.client.clone();
        let channel_name = channel.to_string();
        let period = self.interval;
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately; consume it so the
            // first reminder goes out one full period after start.
            interval.tick().await;
            loop {
                interval.tick().await;
                // A failed send never stops the schedule.
                if let Err(err) = send_reminder(&client, &channel_name).await {
                    warn!(channel = %channel_name, error = %err, "reminder send failed");
                } else {
                    info!(channel = %channel_name, "reminder sent");
                }
            }
        });

        jobs.insert(channel.to_string(), handle);
        info!(channel = %channel, interval_secs = period.as_secs(), "reminder schedule started");
    }

    pub async fn stop(&self, channel: &str) -> bool {
        let mut jobs = self.jobs.lock().await;
        match jobs.remove(channel) {
            Some(handle) => {
                handle.abort();
                info!(channel = %channel, "reminder schedule stopped");
                true
            }
            None => false,
        }
    }

    pub async fn active_channels(&self) -> Vec<String> {
        self.jobs.lock().await.keys().cloned().collect()
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        for handle in self.jobs.get_mut().values() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> ReminderScheduler {
        let client = SlackClient::new("xoxb-test").unwrap();
        ReminderScheduler::new(client, Duration::from_secs(3600))
    }

    #[tokio::test]
    async fn test_start_registers_channel() {
        let scheduler = scheduler();
        scheduler.start("#stow-kiosk").await;
        assert_eq!(scheduler.active_channels().await, vec!["#stow-kiosk"]);
    }

    #[tokio::test]
    async fn test_start_replaces_existing_schedule() {
        let scheduler = scheduler();
        scheduler.start("#stow-kiosk").await;
        scheduler.start("#stow-kiosk").await;
        assert_eq!(scheduler.active_channels().await.len(), 1);
    }

    #[tokio::test]
    async fn test_stop_removes_channel() {
        let scheduler = scheduler();
        scheduler.start("#stow-kiosk").await;
        assert!(scheduler.stop("#stow-kiosk").await);
        assert!(scheduler.active_channels().await.is_empty());
    }

    #[tokio::test]
    async fn test_stop_unknown_channel_is_false() {
        let scheduler = scheduler();
        assert!(!scheduler.stop("#nowhere").await);
    }
}
