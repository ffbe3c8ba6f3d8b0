use std::io::Write;

use chrono::NaiveDate;
use lanewatch::{Session, TextReport, parse_script};
use lanewatch_config::{PeripheryRuleConfig, Settings, SoundRuleConfig};
use lanewatch_display::SessionClock;
use lanewatch_input::{RawInputEvent, SessionMessage, event_queue};
use lanewatch_types::{Colour, InputCode, MouseButton, PressKind};

fn clock() -> SessionClock {
    let origin = NaiveDate::from_ymd_opt(2024, 3, 9)
        .unwrap()
        .and_hms_opt(21, 15, 0)
        .unwrap();
    SessionClock::new(0, origin)
}

/// Runs `script` through a fresh session and returns the printed report.
fn replay(settings: &Settings, script: &str) -> (Session, String) {
    let mut session = Session::new(settings, clock()).unwrap();
    let messages = parse_script(script, session.bindings()).unwrap();
    let (tx, rx) = event_queue();
    for m in messages {
        tx.send(m);
    }
    tx.send(SessionMessage::Shutdown);
    let mut report = TextReport::new(Vec::new());
    session.run(&rx, &mut report);
    let out = String::from_utf8(report.finish().unwrap()).unwrap();
    (session, out)
}

#[test]
fn clean_rotations_report_nothing() {
    let script = "\
0    down a
90   up   a
100  down s
190  up   s
200  down d
290  up   d
300  down space
390  up   space
400  down a
490  up   a
";
    let (session, out) = replay(&Settings::default(), script);
    assert_eq!(out, "");
    assert!(session.mistake_log().is_empty());
}

#[test]
fn mistakes_are_printed_with_timestamps() {
    let script = "\
0    down a
100  down d      # a still held: keylock, and s skipped
150  up   a
200  up   d
300  down d      # same lane again
350  up   d
";
    let (session, out) = replay(&Settings::default(), script);
    assert_eq!(
        out.lines().collect::<Vec<_>>(),
        vec![
            "[21:15:00] keylocked 1-3",
            "[21:15:00] skipped 2",
            "[21:15:00] repeated 3",
        ]
    );
    assert_eq!(session.mistake_log().len(), 3);
}

#[test]
fn idle_gap_starts_fresh_sequence() {
    // all keys up for 2.5s, longer than the 2s grace window
    let script = "\
0     down a
50    up   a
2550  down d
";
    let (_, out) = replay(&Settings::default(), script);
    assert_eq!(out, "");
}

#[test]
fn clear_key_wipes_the_log() {
    let script = "\
0    down s
50   up   s
100  down s
120  down `
130  up   `
200  down a
";
    let (session, out) = replay(&Settings::default(), script);
    assert_eq!(
        out.lines().collect::<Vec<_>>(),
        vec!["[21:15:00] repeated 2", "-- cleared --"]
    );
    // after the clear there is no previous lane, so the press of a is clean
    assert!(session.mistake_log().is_empty());
}

#[test]
fn analysis_prints_bars_per_rotation() {
    let settings = Settings {
        analysis_enabled: true,
        ..Settings::default()
    };
    let script = "\
0    down a
100  down s
150  up   a
200  down d
250  up   s
300  down space
350  up   d
400  down a
450  up   space
500  down s
550  up   a
600  down d
650  up   s
700  down space
750  up   d
800  down a
850  up   space
";
    let (session, out) = replay(&settings, script);
    let bar_lines: Vec<&str> = out.lines().filter(|l| l.starts_with("odd")).collect();
    assert_eq!(bar_lines.len(), 2);
    assert!(out.contains("even | 1 150.0 | 1~ 50.0 | 3 150.0 | 3~ 50.0"));
    assert!(session.last_bars().is_some());
}

#[test]
fn script_rebind_takes_effect_between_events() {
    let settings = Settings {
        key_display_mode: lanewatch_types::KeyDisplayMode::KeyBinds,
        ..Settings::default()
    };
    let script = "\
0    down a
50   up   a
60   bind 2 key:16 q
100  down d
150  up   d
";
    let (_, out) = replay(&settings, script);
    assert_eq!(out.trim(), "[21:15:00] skipped q");
}

#[test]
fn feedback_rules_emit_flash_and_sound() {
    let settings = Settings {
        periphery_mode_enabled: true,
        periphery_rules: vec![PeripheryRuleConfig {
            regex: "keylocked".into(),
            colour: Colour::rgb(0xFF, 0x00, 0x00),
        }],
        sound_enabled: true,
        sound_rules: vec![SoundRuleConfig {
            regex: "skipped".into(),
            filename: "skip.wav".into(),
            delay_ms: 100,
        }],
        ..Settings::default()
    };
    let script = "0 down a\n100 down d\n";
    let (_, out) = replay(&settings, script);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "  flash #FF0000 (16 steps)");
    assert_eq!(lines[1], "[21:15:00] keylocked 1-3");
    assert_eq!(lines[2], "  sound sounds/skip.wav at 21:15:00.200");
    assert_eq!(lines[3], "[21:15:00] skipped 2");
}

#[test]
fn settings_file_drives_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let settings = Settings {
        lane_count: 3,
        ..Settings::default()
    };
    settings.write(&path).unwrap();
    let loaded = Settings::read(&path).unwrap();
    assert_eq!(loaded.lane_count, 3);

    // with three lanes, d is lane 3 and a is two lanes back from it
    let (_, out) = replay(&loaded, "0 down a\n100 down d\n");
    assert_eq!(
        out.lines().collect::<Vec<_>>(),
        vec!["[21:15:00] keylocked 1-3", "[21:15:00] skipped 2"]
    );
}

#[test]
fn script_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "0 down Button-1").unwrap();
    writeln!(file, "5 up Button-1").unwrap();
    let text = std::fs::read_to_string(file.path()).unwrap();
    let session = Session::new(&Settings::default(), clock()).unwrap();
    let messages = parse_script(&text, session.bindings()).unwrap();
    let left = InputCode::Mouse(MouseButton::Left);
    assert_eq!(
        messages,
        vec![
            SessionMessage::Input(RawInputEvent::new(left, PressKind::Press, 0)),
            SessionMessage::Input(RawInputEvent::new(left, PressKind::Release, 5_000)),
        ]
    );
}
