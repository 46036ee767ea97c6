mod common;

use ayah_widget::config::ScheduleConfig;
use ayah_widget::scheduler::{install_schedule, ManualScheduler, Trigger};
use common::{service_with, FakeVerses};
use std::sync::Arc;

#[tokio::test]
async fn default_schedule_registers_three_jobs() {
    let service = service_with(Arc::new(FakeVerses::default()), None);
    let mut scheduler = ManualScheduler::new();
    install_schedule(&mut scheduler, service, &ScheduleConfig::default());

    assert_eq!(scheduler.job_names(), vec!["evening", "morning", "rotation"]);
    assert_eq!(scheduler.trigger("rotation"), Some(Trigger::EveryHours(3)));
    assert_eq!(scheduler.trigger("morning"), Some(Trigger::DailyAt { hour: 6, minute: 0 }));
    assert_eq!(scheduler.trigger("evening"), Some(Trigger::DailyAt { hour: 20, minute: 0 }));
}

#[tokio::test]
async fn daily_triggers_request_their_category() {
    let verses = Arc::new(FakeVerses::default());
    let service = service_with(verses.clone(), None);
    let mut scheduler = ManualScheduler::new();
    install_schedule(&mut scheduler, service.clone(), &ScheduleConfig::default());

    assert!(scheduler.fire("morning").await);
    let current = service.current().await.unwrap();
    assert_eq!(current.record.category.as_deref(), Some("motivation"));

    assert!(scheduler.fire("evening").await);
    let current = service.current().await.unwrap();
    assert_eq!(current.record.category.as_deref(), Some("calmness"));
    assert_eq!(current.record.reference, "Surah 13:28");
}

#[tokio::test]
async fn last_completed_trigger_wins() {
    let verses = Arc::new(FakeVerses::default());
    let service = service_with(verses.clone(), None);
    let mut scheduler = ManualScheduler::new();
    install_schedule(&mut scheduler, service.clone(), &ScheduleConfig::default());

    scheduler.fire("evening").await;
    scheduler.fire("morning").await;

    let current = service.current().await.unwrap();
    assert_eq!(current.record.category.as_deref(), Some("motivation"));
    assert_eq!(verses.call_count(), 2);
}

#[tokio::test]
async fn failed_tick_keeps_previous_verse_and_next_tick_recovers() {
    let verses = Arc::new(FakeVerses::default());
    let service = service_with(verses.clone(), None);
    let mut scheduler = ManualScheduler::new();
    install_schedule(&mut scheduler, service.clone(), &ScheduleConfig::default());

    scheduler.fire("evening").await;
    let before = service.current().await.unwrap();

    verses.failing(true);
    scheduler.fire("rotation").await;
    assert_eq!(service.current().await.unwrap(), before);

    verses.failing(false);
    scheduler.fire("morning").await;
    assert_eq!(
        service.current().await.unwrap().record.category.as_deref(),
        Some("motivation")
    );
}
