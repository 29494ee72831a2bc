use pagechase::direction::Direction;
use pagechase::events::{GameCommand, GameEvent, SummaryChoice};

#[test]
fn test_game_command_equality() {
    assert_eq!(GameCommand::Start, GameCommand::Start);
    assert_eq!(
        GameCommand::MovePlayer(Direction::Left),
        GameCommand::MovePlayer(Direction::Left)
    );
    assert_ne!(
        GameCommand::MovePlayer(Direction::Left),
        GameCommand::MovePlayer(Direction::Right)
    );
    assert_ne!(GameCommand::Restart, GameCommand::Quit);
}

#[test]
fn test_game_event_from_command() {
    let event: GameEvent = GameCommand::TogglePause.into();
    assert_eq!(event, GameEvent::Command(GameCommand::TogglePause));
}

#[test]
fn test_game_event_from_summary_choice() {
    let event: GameEvent = SummaryChoice::ShowLeaderboard.into();
    assert_eq!(event, GameEvent::Summary(SummaryChoice::ShowLeaderboard));
}

#[test]
fn test_game_event_variants_differ() {
    assert_ne!(GameEvent::IntroAudioEnded, GameEvent::VisibilityChanged { hidden: true });
    assert_ne!(
        GameEvent::VisibilityChanged { hidden: true },
        GameEvent::VisibilityChanged { hidden: false }
    );
}

#[test]
fn test_sound_names_are_distinct() {
    use pagechase::collaborators::Sound;
    use strum::IntoEnumIterator;

    let names: std::collections::HashSet<String> = Sound::iter().map(|sound| sound.as_ref().to_string()).collect();
    assert_eq!(names.len(), Sound::iter().count());
    assert!(names.contains("Victory"));
}
