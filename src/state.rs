use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::store::PositionStore;

/// Source of "now" for a request. Tests pin it to avoid day-boundary flakes.
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(at) => *at,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn PositionStore>,
    clock: Clock,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn PositionStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            clock: Clock::System,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
