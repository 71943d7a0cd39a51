use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use super::error::Result;
use super::types::StatsSummary;

/// 按群组缓存统计结果的数据结构，过期时间和容量固定
#[derive(Debug, Clone)]
pub struct StatsCache(Arc<StatsCacheInner>);

#[derive(Debug)]
struct StatsCacheInner {
    ttl: Duration,
    capacity: usize,
    data: DashMap<i64, (StatsSummary, Instant)>,
}

impl StatsCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        assert_ne!(capacity, 0);
        Self(Arc::new(StatsCacheInner { ttl, capacity, data: Default::default() }))
    }

    /// 查询未过期的缓存
    pub fn get(&self, chat_id: i64) -> Option<StatsSummary> {
        let entry = self.0.data.get(&chat_id)?;
        let (summary, at) = entry.value();
        (at.elapsed() < self.0.ttl).then(|| summary.clone())
    }

    /// 命中未过期的缓存时直接返回，否则调用 compute 并缓存其结果。
    /// compute 失败时保留旧的缓存条目。
    pub async fn get_or_update<F, Fut>(&self, chat_id: i64, compute: F) -> Result<StatsSummary>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<StatsSummary>>,
    {
        if let Some(summary) = self.get(chat_id) {
            return Ok(summary);
        }
        let summary = compute().await?;
        self.store(chat_id, summary.clone());
        Ok(summary)
    }

    /// 无条件删除缓存，下一次查询必然重新计算
    pub fn invalidate(&self, chat_id: i64) {
        self.0.data.remove(&chat_id);
    }

    fn store(&self, chat_id: i64, summary: StatsSummary) {
        // 插入前先控制容量：先清理过期条目，仍然不够时淘汰最旧的
        if !self.0.data.contains_key(&chat_id) && self.0.data.len() >= self.0.capacity {
            self.0.data.retain(|_, (_, at)| at.elapsed() < self.0.ttl);
            while self.0.data.len() >= self.0.capacity {
                let oldest = self
                    .0
                    .data
                    .iter()
                    .min_by_key(|entry| entry.value().1)
                    .map(|entry| *entry.key());
                match oldest {
                    Some(key) => self.0.data.remove(&key),
                    None => break,
                };
            }
        }
        self.0.data.insert(chat_id, (summary, Instant::now()));
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.0.data.len()
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Utc;

    use super::*;
    use crate::stats::error::StatsError;

    fn summary(total: u32) -> StatsSummary {
        StatsSummary {
            total,
            deleted: 0,
            bots: 0,
            premium: 0,
            active: total,
            deleted_names: vec![],
            generated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn second_get_hits_cache() {
        let cache = StatsCache::new(Duration::from_secs(3600), 16);
        let calls = AtomicUsize::new(0);

        let first = cache
            .get_or_update(1, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(summary(10))
            })
            .await
            .unwrap();
        let second = cache
            .get_or_update(1, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(summary(99))
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn invalidate_forces_recompute() {
        let cache = StatsCache::new(Duration::from_secs(3600), 16);
        cache.get_or_update(1, || async { Ok(summary(10)) }).await.unwrap();
        cache.invalidate(1);
        let fresh = cache.get_or_update(1, || async { Ok(summary(20)) }).await.unwrap();
        assert_eq!(fresh.total, 20);
    }

    #[tokio::test]
    async fn expired_entry_recomputed() {
        let cache = StatsCache::new(Duration::ZERO, 16);
        cache.get_or_update(1, || async { Ok(summary(10)) }).await.unwrap();
        let fresh = cache.get_or_update(1, || async { Ok(summary(20)) }).await.unwrap();
        assert_eq!(fresh.total, 20);
    }

    #[tokio::test]
    async fn failed_compute_keeps_old_entry() {
        // 过期后重算失败，旧条目原样保留
        let cache = StatsCache::new(Duration::ZERO, 16);
        cache.get_or_update(1, || async { Ok(summary(10)) }).await.unwrap();
        let result = cache.get_or_update(1, || async { Err(StatsError::ChatNotFound(1)) }).await;
        assert!(result.is_err());
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn capacity_evicts_oldest() {
        let cache = StatsCache::new(Duration::from_secs(3600), 2);
        cache.get_or_update(1, || async { Ok(summary(1)) }).await.unwrap();
        cache.get_or_update(2, || async { Ok(summary(2)) }).await.unwrap();
        cache.get_or_update(3, || async { Ok(summary(3)) }).await.unwrap();
        assert_eq!(cache.len(), 2);
        assert!(cache.get(1).is_none());
        assert!(cache.get(2).is_some());
        assert!(cache.get(3).is_some());
    }
}
