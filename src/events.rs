use crate::direction::Direction;

/// Decoded player input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameCommand {
    Start,
    MovePlayer(Direction),
    TogglePause,
    Restart,
    Quit,
}

/// The buttons on the end-of-game summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SummaryChoice {
    Retry,
    Quit,
    ShowLeaderboard,
}

/// Everything the host can tell the engine, other than frames and elapsed time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Command(GameCommand),
    /// The intro sound finished playing.
    IntroAudioEnded,
    VisibilityChanged { hidden: bool },
    Summary(SummaryChoice),
}

impl From<GameCommand> for GameEvent {
    fn from(command: GameCommand) -> Self {
        GameEvent::Command(command)
    }
}

impl From<SummaryChoice> for GameEvent {
    fn from(choice: SummaryChoice) -> Self {
        GameEvent::Summary(choice)
    }
}
