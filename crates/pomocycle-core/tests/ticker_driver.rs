//! Drives a session with the real ticker on a paused tokio clock.

use std::time::Duration;

use pomocycle_core::{
    Anonymous, ClockTicker, CompletionKind, Mode, NotificationDispatcher, RestoreOptions, Session,
    SessionStore,
};

fn session() -> Session {
    Session::open(
        SessionStore::open_memory().unwrap(),
        NotificationDispatcher::silent(),
        Box::new(Anonymous),
        RestoreOptions::default(),
    )
}

#[tokio::test(start_paused = true)]
async fn one_minute_pomodoro_completes_after_sixty_ticks() {
    let mut session = session();
    session.update_duration(Mode::Pomodoro, 1).unwrap();
    session.start();

    let (mut ticker, mut ticks) = ClockTicker::channel(Duration::from_secs(1));
    let started = tokio::time::Instant::now();
    ticker.sync(session.machine().is_running(), session.machine().remaining_secs());

    let completion = loop {
        let tick = ticks.recv().await.unwrap();
        if !ticker.accept(tick) {
            continue;
        }
        let event = session.tick();
        ticker.sync(session.machine().is_running(), session.machine().remaining_secs());
        if let Some(c) = event.as_ref().and_then(|e| e.completion()) {
            break *c;
        }
    };

    assert_eq!(completion.kind, CompletionKind::PomodoroDone);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(60) && elapsed < Duration::from_secs(61));
    assert_eq!(session.status().mode, Mode::ShortBreak);
    // Auto-continue re-armed the ticker for the break.
    assert!(ticker.is_armed());
}

#[tokio::test(start_paused = true)]
async fn pausing_revokes_pending_tick() {
    let mut session = session();
    session.start();
    let (mut ticker, mut ticks) = ClockTicker::channel(Duration::from_secs(1));
    ticker.sync(true, session.machine().remaining_secs());

    tokio::time::sleep(Duration::from_millis(500)).await;
    session.pause();
    ticker.sync(session.machine().is_running(), session.machine().remaining_secs());
    assert!(!ticker.is_armed());

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(ticks.try_recv().is_err());
    assert_eq!(session.status().remaining_secs, 1500);
}

#[tokio::test(start_paused = true)]
async fn skip_while_running_gives_new_phase_a_full_first_second() {
    let mut session = session();
    session.start();
    let (mut ticker, mut ticks) = ClockTicker::channel(Duration::from_secs(1));
    ticker.sync(true, session.machine().remaining_secs());

    tokio::time::sleep(Duration::from_millis(950)).await;
    let event = session.skip();
    ticker.follow(
        Some(&event),
        session.machine().is_running(),
        session.machine().remaining_secs(),
    );
    let skipped_at = tokio::time::Instant::now();

    let tick = ticks.recv().await.unwrap();
    assert!(ticker.accept(tick));
    assert!(skipped_at.elapsed() >= Duration::from_secs(1));

    session.tick();
    assert_eq!(session.status().mode, Mode::ShortBreak);
    assert_eq!(session.status().remaining_secs, 299);
}
