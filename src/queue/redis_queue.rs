use crate::queue::jobs::{self, Job, JobPayload};
use anyhow::Result;
use chrono::Utc;
use redis::AsyncCommands;
use serde::Serialize;
use uuid::Uuid;

#[derive(Clone)]
pub struct JobQueue {
    pub client: redis::Client,
}

#[derive(Debug)]
pub struct Lease {
    pub queue: String,
    pub token: String,
    pub job: Job,
}

#[derive(Debug, Default, Serialize)]
pub struct QueueCounts {
    pub waiting: i64,
    pub active: i64,
    pub completed: i64,
    pub failed: i64,
}

impl JobQueue {
    pub fn new(redis_url: &str) -> Result<Self> {
        Ok(Self {
            client: redis::Client::open(redis_url)?,
        })
    }

    fn ready_key(queue: &str) -> String {
        format!("jobs:{}:ready", queue)
    }

    fn delayed_key(queue: &str) -> String {
        format!("jobs:{}:delayed", queue)
    }

    fn active_key(queue: &str) -> String {
        format!("jobs:{}:active", queue)
    }

    fn completed_key(queue: &str) -> String {
        format!("jobs:{}:completed", queue)
    }

    fn failed_key(queue: &str) -> String {
        format!("jobs:{}:failed", queue)
    }

    pub async fn enqueue(&self, queue: &str, payload: JobPayload, delay_ms: u64) -> Result<Uuid> {
        let job = Job {
            id: Uuid::new_v4(),
            attempts: 0,
            payload,
        };
        self.push(queue, &job, delay_ms).await?;
        Ok(job.id)
    }

    async fn push(&self, queue: &str, job: &Job, delay_ms: u64) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let body = serde_json::to_string(job)?;
        if delay_ms == 0 {
            let _: i64 = conn.lpush(Self::ready_key(queue), body).await?;
        } else {
            let visible_at = Utc::now().timestamp_millis() + delay_ms as i64;
            let _: i64 = conn.zadd(Self::delayed_key(queue), body, visible_at).await?;
        }
        Ok(())
    }

    /// Pops one job and records it under a fresh lease token. No two callers
    /// observe the same job: RPOP hands each body to exactly one consumer.
    pub async fn pull(&self, queue: &str) -> Result<Option<Lease>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let now = Utc::now().timestamp_millis();
        let due: Vec<String> = conn
            .zrangebyscore_limit(Self::delayed_key(queue), "-inf", now, 0, 100)
            .await?;
        for body in due {
            let removed: i64 = conn.zrem(Self::delayed_key(queue), &body).await?;
            if removed == 1 {
                let _: i64 = conn.lpush(Self::ready_key(queue), &body).await?;
            }
        }

        let body: Option<String> = conn.rpop(Self::ready_key(queue), None).await?;
        let Some(body) = body else {
            return Ok(None);
        };
        let job: Job = serde_json::from_str(&body)?;
        let token = Uuid::new_v4().to_string();
        let _: i64 = conn.hset(Self::active_key(queue), &token, &body).await?;

        Ok(Some(Lease {
            queue: queue.to_string(),
            token,
            job,
        }))
    }

    pub async fn complete(&self, lease: Lease) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: i64 = conn.hdel(Self::active_key(&lease.queue), &lease.token).await?;
        let _: i64 = conn.incr(Self::completed_key(&lease.queue), 1).await?;
        Ok(())
    }

    /// Terminates a lease after a worker error. Re-enqueues with exponential
    /// backoff while the queue's retry budget lasts, then dead-letters.
    pub async fn fail(&self, lease: Lease) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: i64 = conn.hdel(Self::active_key(&lease.queue), &lease.token).await?;

        let attempts = lease.job.attempts + 1;
        if attempts > jobs::max_worker_retries(&lease.queue) {
            let _: i64 = conn.incr(Self::failed_key(&lease.queue), 1).await?;
            tracing::warn!(
                "dead-lettering job {} on {} after {} failed attempts",
                lease.job.id,
                lease.queue,
                attempts
            );
            return Ok(());
        }

        let job = Job {
            attempts,
            ..lease.job
        };
        self.push(&lease.queue, &job, jobs::worker_retry_delay_ms(attempts)).await
    }

    pub async fn counts(&self, queue: &str) -> Result<QueueCounts> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let ready: i64 = conn.llen(Self::ready_key(queue)).await?;
        let delayed: i64 = conn.zcard(Self::delayed_key(queue)).await?;
        let active: i64 = conn.hlen(Self::active_key(queue)).await?;
        let completed: Option<i64> = conn.get(Self::completed_key(queue)).await?;
        let failed: Option<i64> = conn.get(Self::failed_key(queue)).await?;

        Ok(QueueCounts {
            waiting: ready + delayed,
            active,
            completed: completed.unwrap_or(0),
            failed: failed.unwrap_or(0),
        })
    }
}
