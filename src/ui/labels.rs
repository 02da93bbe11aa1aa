use klear::{GameSnapshot, Phase};
use ratatui::style::Color;

/// Heading text and colour for the current phase
pub fn title(phase: Phase) -> (&'static str, Option<Color>) {
    match phase {
        Phase::Won => ("ALL CLEARED!", Some(Color::Green)),
        Phase::Lost => ("GAME OVER", Some(Color::Red)),
        Phase::Idle | Phase::Playing => ("LET'S PLAY", None),
    }
}

pub fn start_button(playing: bool) -> &'static str {
    if playing {
        "Restart"
    } else {
        "Start"
    }
}

/// The button names the action it performs, not the current state
pub fn auto_play_button(enabled: bool) -> &'static str {
    if enabled {
        "Auto Play OFF"
    } else {
        "Auto Play ON"
    }
}

/// "Next: k" (1-based), only while a node is still expected
pub fn next_indicator(snapshot: &GameSnapshot) -> Option<String> {
    let expected = snapshot.next_expected_index + 1;
    (snapshot.phase == Phase::Playing && expected <= snapshot.nodes.len())
        .then(|| format!("Next: {expected}"))
}

pub fn seconds(t: f64) -> String {
    format!("{:.1} s", t.max(0.0))
}

pub fn countdown(remaining: f64) -> String {
    format!("{:.1}s", remaining.max(0.0))
}
