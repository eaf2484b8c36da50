use crate::config::GameMode;
use serde::Serialize;

/// Point constants for one multiple-choice variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringRules {
    pub base: u32,
    pub time_bonus_cap: u32,
    pub streak_unit: u32,
    pub hint_penalty: u32,
    /// minimum award for a correct answer
    pub floor: u32,
    pub wrong_penalty: u32,
}

impl ScoringRules {
    pub const TRIVIA: ScoringRules = ScoringRules {
        base: 100,
        time_bonus_cap: 50,
        streak_unit: 10,
        hint_penalty: 25,
        floor: 10,
        wrong_penalty: 20,
    };

    pub const QUOTES: ScoringRules = ScoringRules {
        base: 50,
        time_bonus_cap: 25,
        streak_unit: 5,
        hint_penalty: 15,
        floor: 5,
        wrong_penalty: 10,
    };

    pub fn for_mode(mode: GameMode) -> Self {
        match mode {
            GameMode::Quotes => Self::QUOTES,
            // timeline scoring lives in the ordering module
            GameMode::Trivia | GameMode::Timeline => Self::TRIVIA,
        }
    }

    pub fn time_bonus(&self, time_remaining: u32, time_limit: u32) -> u32 {
        if time_limit == 0 {
            return 0;
        }
        let ratio = time_remaining.min(time_limit) as f64 / time_limit as f64;
        (ratio * self.time_bonus_cap as f64).round() as u32
    }

    /// Points for a correct answer, using the streak before it is incremented
    pub fn correct_points(
        &self,
        time_remaining: u32,
        time_limit: u32,
        streak: u32,
        hints_on_question: u32,
    ) -> u32 {
        let gross = self.base as i64
            + self.time_bonus(time_remaining, time_limit) as i64
            + streak as i64 * self.streak_unit as i64
            - hints_on_question as i64 * self.hint_penalty as i64;
        gross.max(self.floor as i64) as u32
    }
}

/// Running score of a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBoard {
    pub score: u32,
    pub streak: u32,
    pub max_streak: u32,
}

impl ScoreBoard {
    /// Apply a correct answer; returns the points awarded
    pub fn record_correct(
        &mut self,
        rules: &ScoringRules,
        time_remaining: u32,
        time_limit: u32,
        hints_on_question: u32,
    ) -> i64 {
        let points = rules.correct_points(time_remaining, time_limit, self.streak, hints_on_question);
        self.score = self.score.saturating_add(points);
        self.streak += 1;
        self.max_streak = self.max_streak.max(self.streak);
        points as i64
    }

    /// Apply a wrong answer, skip or timeout; returns the (non-positive)
    /// change actually applied after clamping at zero
    pub fn record_miss(&mut self, rules: &ScoringRules) -> i64 {
        let before = self.score;
        self.score = self.score.saturating_sub(rules.wrong_penalty);
        self.streak = 0;
        self.score as i64 - before as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_bonus_rounds() {
        let rules = ScoringRules::TRIVIA;
        assert_eq!(rules.time_bonus(15, 15), 50);
        assert_eq!(rules.time_bonus(0, 15), 0);
        // 7/15 * 50 = 23.33
        assert_eq!(rules.time_bonus(7, 15), 23);
        // 9/20 * 25 = 11.25 and 10/20 * 25 = 12.5
        assert_eq!(ScoringRules::QUOTES.time_bonus(9, 20), 11);
        assert_eq!(ScoringRules::QUOTES.time_bonus(10, 20), 13);
        assert_eq!(rules.time_bonus(5, 0), 0);
    }

    #[test]
    fn test_correct_points_formula() {
        let rules = ScoringRules::TRIVIA;
        // 100 + 50 + 2*10 - 1*25
        assert_eq!(rules.correct_points(15, 15, 2, 1), 145);
        // heavily penalised answers still earn the floor
        assert_eq!(rules.correct_points(0, 15, 0, 5), 10);
    }

    #[test]
    fn test_streak_bonus_uses_pre_increment_streak() {
        let rules = ScoringRules::TRIVIA;
        let mut board = ScoreBoard::default();
        assert_eq!(board.record_correct(&rules, 0, 15, 0), 100);
        assert_eq!(board.record_correct(&rules, 0, 15, 0), 110);
        assert_eq!(board.record_correct(&rules, 0, 15, 0), 120);
        assert_eq!(board.streak, 3);
        assert_eq!(board.max_streak, 3);
        assert_eq!(board.score, 330);
    }

    #[test]
    fn test_miss_resets_streak_and_clamps_score() {
        let rules = ScoringRules::QUOTES;
        let mut board = ScoreBoard::default();
        assert_eq!(board.record_miss(&rules), 0);
        assert_eq!(board.score, 0);

        board.record_correct(&rules, 20, 20, 0);
        board.record_correct(&rules, 20, 20, 0);
        assert_eq!(board.streak, 2);
        let before = board.score;
        assert_eq!(board.record_miss(&rules), -10);
        assert_eq!(board.score, before - 10);
        assert_eq!(board.streak, 0);
        assert_eq!(board.max_streak, 2);
    }

    #[test]
    fn test_rules_per_mode() {
        assert_eq!(ScoringRules::for_mode(GameMode::Quotes), ScoringRules::QUOTES);
        assert_eq!(ScoringRules::for_mode(GameMode::Trivia), ScoringRules::TRIVIA);
    }
}
