use std::time::Duration;
use tokio::time::sleep;

/// Result of a bounded poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    Found(T),
    TimedOut,
}

/// Internal state of a running poll
#[derive(Debug)]
enum PollState<T> {
    Searching { attempt: u32 },
    Found(T),
    TimedOut,
}

/// Fixed-interval poller with a hard cap on attempts
#[derive(Debug, Clone, Copy)]
pub struct Poller {
    interval: Duration,
    max_attempts: u32,
}

impl Poller {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Sleep one interval, then probe; repeat until the probe yields or the budget runs out
    pub async fn until<T, F>(&self, mut probe: F) -> PollOutcome<T>
    where
        F: FnMut() -> Option<T>,
    {
        let mut state = PollState::Searching { attempt: 0 };

        loop {
            state = match state {
                PollState::Searching { attempt } if attempt >= self.max_attempts => {
                    PollState::TimedOut
                }
                PollState::Searching { attempt } => {
                    sleep(self.interval).await;
                    match probe() {
                        Some(value) => PollState::Found(value),
                        None => {
                            tracing::debug!(
                                "Poll attempt {}/{} found nothing",
                                attempt + 1,
                                self.max_attempts
                            );
                            PollState::Searching { attempt: attempt + 1 }
                        }
                    }
                }
                PollState::Found(value) => return PollOutcome::Found(value),
                PollState::TimedOut => return PollOutcome::TimedOut,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick(max_attempts: u32) -> Poller {
        Poller::new(Duration::from_millis(1), max_attempts)
    }

    #[tokio::test]
    async fn test_found_on_later_attempt() {
        let mut calls = 0;
        let outcome = quick(5)
            .until(|| {
                calls += 1;
                (calls == 3).then_some("panel")
            })
            .await;

        assert_eq!(outcome, PollOutcome::Found("panel"));
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_times_out_after_budget() {
        let mut calls = 0;
        let outcome: PollOutcome<()> = quick(4)
            .until(|| {
                calls += 1;
                None
            })
            .await;

        assert_eq!(outcome, PollOutcome::TimedOut);
        assert_eq!(calls, 4);
    }

    #[test]
    fn test_zero_budget_never_probes() {
        let mut calls = 0;
        let outcome: PollOutcome<()> = tokio_test::block_on(quick(0).until(|| {
            calls += 1;
            None
        }));

        assert_eq!(outcome, PollOutcome::TimedOut);
        assert_eq!(calls, 0);
    }
}
