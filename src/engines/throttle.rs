// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ThrottleSettings;
use crate::infrastructure::metrics::THROTTLE_DELAY;
use metrics::gauge;
use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// 自适应节流器
///
/// 根据响应延迟调整请求间隔，使平均并发接近目标值。
/// 所有请求共享同一个时间槽：每次请求开始前等待到下一个槽位。
pub struct AutoThrottle {
    enabled: bool,
    min_delay: Duration,
    max_delay: Duration,
    target_concurrency: f64,
    randomize: bool,
    state: Mutex<ThrottleState>,
}

#[derive(Debug)]
struct ThrottleState {
    delay: Duration,
    next_slot: Option<Instant>,
}

impl AutoThrottle {
    /// 根据配置创建节流器
    pub fn from_settings(settings: &ThrottleSettings) -> Self {
        let min_delay = Duration::from_secs_f64(settings.download_delay_secs);
        let max_delay = Duration::from_secs_f64(settings.max_delay_secs).max(min_delay);
        let delay = if settings.enabled {
            Duration::from_secs_f64(settings.start_delay_secs).max(min_delay)
        } else {
            min_delay
        };

        Self {
            enabled: settings.enabled,
            min_delay,
            max_delay,
            target_concurrency: settings.target_concurrency,
            randomize: settings.randomize_delay,
            state: Mutex::new(ThrottleState {
                delay: delay.min(max_delay),
                next_slot: None,
            }),
        }
    }

    /// 当前请求间隔
    pub fn current_delay(&self) -> Duration {
        self.state.lock().delay
    }

    /// 等待下一个请求槽位
    pub async fn acquire(&self) {
        let start = {
            let mut state = self.state.lock();
            let now = Instant::now();
            let start = match state.next_slot {
                Some(slot) if slot > now => slot,
                _ => now,
            };
            state.next_slot = Some(start + self.spacing(state.delay));
            start
        };
        tokio::time::sleep_until(start).await;
    }

    /// 记录一次响应并调整间隔
    pub fn record_response(&self, latency: Duration, status: u16) {
        if !self.enabled {
            return;
        }
        let mut state = self.state.lock();
        state.delay = self.next_delay(state.delay, latency, status);
        gauge!(THROTTLE_DELAY).set(state.delay.as_secs_f64());
    }

    /// 计算新的间隔：向 `latency / target_concurrency` 靠拢，非200响应不会缩短间隔
    fn next_delay(&self, current: Duration, latency: Duration, status: u16) -> Duration {
        let target = latency.div_f64(self.target_concurrency);
        let averaged = (current + target) / 2;
        let proposed = averaged.max(target).clamp(self.min_delay, self.max_delay);

        if status != 200 && proposed <= current {
            return current;
        }
        proposed
    }

    fn spacing(&self, delay: Duration) -> Duration {
        if self.randomize && !delay.is_zero() {
            delay.mul_f64(rand::random_range(0.5..1.5))
        } else {
            delay
        }
    }
}
