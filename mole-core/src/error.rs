use core::fmt;

/// A controller rule broken by an observed tick.
///
/// These are design defects, not runtime conditions: the strict replay reports
/// the first one it sees and stops.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RuleCode {
    TargetOutOfRange,
    RoundTimerConsistency,
    LockoutRange,
    DecimalPointMismatch,
    PlaySegmentPattern,
    GameOverDigitPattern,
    ScoreStep,
    ScoreWhileLocked,
    FrozenAfterGameOver,
    TargetAdvanceWithoutHit,
    HitWithoutTargetPress,
    RestartWithoutButtonZero,
}

impl RuleCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TargetOutOfRange => "TARGET_OUT_OF_RANGE",
            Self::RoundTimerConsistency => "ROUND_TIMER_CONSISTENCY",
            Self::LockoutRange => "LOCKOUT_RANGE",
            Self::DecimalPointMismatch => "DECIMAL_POINT_MISMATCH",
            Self::PlaySegmentPattern => "PLAY_SEGMENT_PATTERN",
            Self::GameOverDigitPattern => "GAME_OVER_DIGIT_PATTERN",
            Self::ScoreStep => "SCORE_STEP",
            Self::ScoreWhileLocked => "SCORE_WHILE_LOCKED",
            Self::FrozenAfterGameOver => "FROZEN_AFTER_GAME_OVER",
            Self::TargetAdvanceWithoutHit => "TARGET_ADVANCE_WITHOUT_HIT",
            Self::HitWithoutTargetPress => "HIT_WITHOUT_TARGET_PRESS",
            Self::RestartWithoutButtonZero => "RESTART_WITHOUT_BUTTON_ZERO",
        }
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RuleCode {}
