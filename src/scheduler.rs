use crate::app::AyahService;
use crate::config::ScheduleConfig;
use crate::selection::CategoryFallback;
use chrono::{Duration as ChronoDuration, Local, NaiveDateTime, Timelike};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub type JobFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
pub type JobFn = Arc<dyn Fn() -> JobFuture + Send + Sync>;

/// Wall-clock points at which a job fires, in local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Minute zero of every hour divisible by `n`.
    EveryHours(u32),
    /// Once a day at `hour:minute`.
    DailyAt { hour: u32, minute: u32 },
}

impl Trigger {
    /// First firing time strictly after `now`.
    pub fn next_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        let top_of_hour = now
            - ChronoDuration::minutes(i64::from(now.minute()))
            - ChronoDuration::seconds(i64::from(now.second()))
            - ChronoDuration::nanoseconds(i64::from(now.nanosecond()));
        match *self {
            Trigger::EveryHours(n) => {
                let n = n.max(1);
                let mut candidate = top_of_hour + ChronoDuration::hours(1);
                while candidate.hour() % n != 0 {
                    candidate += ChronoDuration::hours(1);
                }
                candidate
            }
            Trigger::DailyAt { hour, minute } => {
                let midnight = top_of_hour - ChronoDuration::hours(i64::from(now.hour()));
                let today = midnight
                    + ChronoDuration::hours(i64::from(hour))
                    + ChronoDuration::minutes(i64::from(minute));
                if today > now {
                    today
                } else {
                    today + ChronoDuration::days(1)
                }
            }
        }
    }
}

/// Next firing after both `now` and the previous firing. A wall clock that
/// lags behind the last boundary cannot make the same boundary fire twice.
pub fn next_fire(
    trigger: &Trigger,
    now: NaiveDateTime,
    last_fired: Option<NaiveDateTime>,
) -> NaiveDateTime {
    let from = match last_fired {
        Some(last) if last > now => last,
        _ => now,
    };
    trigger.next_after(from)
}

/// Registers callbacks against triggers. Production runs them on tokio
/// timers; tests fire them by hand.
pub trait Scheduler {
    fn register(&mut self, name: &str, trigger: Trigger, task: JobFn);
}

/// One tokio task per job. Each firing is spawned on its own so a stalled
/// refresh never delays the job's next tick.
#[derive(Default)]
pub struct TokioScheduler {
    handles: Vec<JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shutdown(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}

impl Scheduler for TokioScheduler {
    fn register(&mut self, name: &str, trigger: Trigger, task: JobFn) {
        let name = name.to_string();
        let handle = tokio::spawn(async move {
            let mut last_fired = None;
            loop {
                let now = Local::now().naive_local();
                let next = next_fire(&trigger, now, last_fired);
                let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
                debug!(job = %name, %next, "Next trigger scheduled");
                tokio::time::sleep(wait).await;

                last_fired = Some(next);
                info!(job = %name, "Scheduled trigger fired");
                tokio::spawn((task)());
            }
        });
        self.handles.push(handle);
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Holds registered jobs until a caller fires them explicitly.
#[derive(Default)]
pub struct ManualScheduler {
    jobs: HashMap<String, (Trigger, JobFn)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self, name: &str) -> Option<Trigger> {
        self.jobs.get(name).map(|(t, _)| *t)
    }

    pub fn job_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.jobs.keys().cloned().collect();
        names.sort();
        names
    }

    /// Runs the named job to completion. Returns false for unknown names.
    pub async fn fire(&self, name: &str) -> bool {
        match self.jobs.get(name) {
            Some((_, task)) => {
                (task)().await;
                true
            }
            None => false,
        }
    }
}

impl Scheduler for ManualScheduler {
    fn register(&mut self, name: &str, trigger: Trigger, task: JobFn) {
        self.jobs.insert(name.to_string(), (trigger, task));
    }
}

fn refresh_job(service: Arc<AyahService>, category: Option<String>) -> JobFn {
    Arc::new(move || -> JobFuture {
        let service = service.clone();
        let category = category.clone();
        Box::pin(async move {
            if let Err(e) = service
                .refresh(category.as_deref(), CategoryFallback::Strict)
                .await
            {
                warn!(error = %e, "Scheduled refresh failed; waiting for next trigger");
            }
        })
    })
}

/// Registers the rotation, morning and evening refresh jobs.
pub fn install_schedule(
    scheduler: &mut dyn Scheduler,
    service: Arc<AyahService>,
    schedule: &ScheduleConfig,
) {
    scheduler.register(
        "rotation",
        Trigger::EveryHours(schedule.refresh_every_hours),
        refresh_job(service.clone(), None),
    );
    scheduler.register(
        "morning",
        Trigger::DailyAt { hour: schedule.morning_hour, minute: 0 },
        refresh_job(service.clone(), Some(schedule.morning_category.clone())),
    );
    scheduler.register(
        "evening",
        Trigger::DailyAt { hour: schedule.evening_hour, minute: 0 },
        refresh_job(service, Some(schedule.evening_category.clone())),
    );
    info!(
        every_hours = schedule.refresh_every_hours,
        morning = %format!("{:02}:00 {}", schedule.morning_hour, schedule.morning_category),
        evening = %format!("{:02}:00 {}", schedule.evening_hour, schedule.evening_category),
        "Refresh schedule installed"
    );
}
