//! Settings resolution against the SQLite store, feeding a fresh engine.

use tomatask_core::{
    duration_secs, CoreError, Database, Identity, PomodoroEngine, PomodoroMode, SettingsResolver,
    SettingsUpdate, UserId, DEFAULT_SETTINGS,
};

fn alice() -> Identity {
    Identity::from_option(UserId::new("alice"))
}

#[test]
fn saved_settings_drive_new_engines() {
    let resolver = SettingsResolver::new(Database::open_memory().unwrap());
    let saved = resolver
        .save(
            &alice(),
            &SettingsUpdate {
                work_duration: Some(90),
                short_break_duration: Some(0),
                sessions_before_long_break: Some(3),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(saved.work_duration, 60);
    assert_eq!(saved.short_break_duration, 1);
    assert_eq!(saved.long_break_duration, 15);

    let engine = PomodoroEngine::new(resolver.effective(&alice()));
    assert_eq!(engine.remaining_secs(), 3600);
    assert_eq!(
        duration_secs(PomodoroMode::ShortBreak, engine.settings()),
        60
    );
}

#[test]
fn anonymous_session_uses_defaults_and_cannot_save() {
    let resolver = SettingsResolver::new(Database::open_memory().unwrap());
    let engine = PomodoroEngine::new(resolver.effective(&Identity::Anonymous));
    assert_eq!(engine.settings(), &DEFAULT_SETTINGS);
    assert_eq!(engine.remaining_secs(), 1500);

    let err = resolver
        .save(
            &Identity::Anonymous,
            &SettingsUpdate {
                alarm_volume: Some(10),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, CoreError::Unauthenticated));
}

#[test]
fn settings_are_isolated_per_user() {
    let resolver = SettingsResolver::new(Database::open_memory().unwrap());
    resolver
        .save(
            &alice(),
            &SettingsUpdate {
                alarm_volume: Some(20),
                ..Default::default()
            },
        )
        .unwrap();
    let bob = Identity::from_option(UserId::new("bob"));
    assert_eq!(resolver.effective(&bob), DEFAULT_SETTINGS);
    assert_eq!(resolver.effective(&alice()).alarm_volume, 20);
}
