//! Letter grades and encouragement lines.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Letter grade for a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Grade for `correct` out of `total`. An empty session is an F.
    pub fn from_score(correct: u32, total: u32) -> Self {
        if total == 0 {
            return Grade::F;
        }
        Self::from_percent(percent(correct, total))
    }

    pub fn from_percent(percent: f64) -> Self {
        if percent >= 90.0 {
            Grade::A
        } else if percent >= 80.0 {
            Grade::B
        } else if percent >= 70.0 {
            Grade::C
        } else if percent >= 60.0 {
            Grade::D
        } else {
            Grade::F
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Percentage of correct answers, rounded to two decimals.
pub fn percent(correct: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (correct as f64 / total as f64 * 10_000.0).round() / 100.0
}

const CORRECT: &[&str] = &[
    "Spot on!",
    "Correct, nicely done!",
    "That's it! Numbers bow before you.",
    "Right answer. You're on a roll!",
    "Nailed it!",
    "Perfect. Keep it coming!",
    "Yes! Sharp thinking.",
    "Exactly right. Great work!",
];

const TRY_AGAIN: &[&str] = &[
    "Not quite. Have another go!",
    "Close, but not there yet. Try again.",
    "Hmm, check your working and try once more.",
    "Almost! Give it another shot.",
    "No worries, mistakes are how we learn. Try again!",
    "Keep going, you'll crack it.",
];

const FAILED: &[&str] = &[
    "That was a tricky one. On to the next!",
    "Out of tries on this one, but every mistake teaches something.",
    "Tough question! Shake it off and keep going.",
    "Not this time. The next one is yours.",
    "Good effort. Have a look at the answer and carry on.",
];

const GRADE_A: &[&str] = &[
    "Outstanding! Grade A, you're a maths wizard.",
    "Top marks! Grade A is thoroughly earned.",
    "Brilliant session. Grade A!",
];

const GRADE_B: &[&str] = &[
    "Great work! Grade B shows real skill.",
    "Impressive, Grade B. A little more and it's an A!",
    "Well done, Grade B. Keep it up!",
];

const GRADE_C: &[&str] = &[
    "Good going, Grade C. Steady progress!",
    "Grade C. You're getting the hang of this.",
    "Nice effort, Grade C. Practice will lift it higher.",
];

const GRADE_D: &[&str] = &[
    "Grade D. You're on the way, keep practising!",
    "Grade D shows progress. More practice will pay off.",
    "Keep at it! Grade D is a step forward.",
];

const GRADE_F: &[&str] = &[
    "Grade F this time, but every expert started somewhere.",
    "Don't be discouraged. Grade F is a starting point, not the end.",
    "Tough session, Grade F. Try again and watch your score climb.",
];

/// What kind of moment a message is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Moment {
    Correct,
    TryAgain,
    Failed,
    Finished(Grade),
}

impl Moment {
    fn lines(self) -> &'static [&'static str] {
        match self {
            Moment::Correct => CORRECT,
            Moment::TryAgain => TRY_AGAIN,
            Moment::Failed => FAILED,
            Moment::Finished(Grade::A) => GRADE_A,
            Moment::Finished(Grade::B) => GRADE_B,
            Moment::Finished(Grade::C) => GRADE_C,
            Moment::Finished(Grade::D) => GRADE_D,
            Moment::Finished(Grade::F) => GRADE_F,
        }
    }
}

/// A random encouragement line for `moment`.
pub fn encouragement<R: Rng + ?Sized>(moment: Moment, rng: &mut R) -> &'static str {
    moment.lines().choose(rng).copied().unwrap_or("Keep going!")
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn grade_boundaries() {
        assert_eq!(Grade::from_percent(100.0), Grade::A);
        assert_eq!(Grade::from_percent(90.0), Grade::A);
        assert_eq!(Grade::from_percent(89.99), Grade::B);
        assert_eq!(Grade::from_percent(80.0), Grade::B);
        assert_eq!(Grade::from_percent(70.0), Grade::C);
        assert_eq!(Grade::from_percent(60.0), Grade::D);
        assert_eq!(Grade::from_percent(59.9), Grade::F);
    }

    #[test]
    fn grade_from_counts() {
        assert_eq!(Grade::from_score(9, 10), Grade::A);
        assert_eq!(Grade::from_score(2, 3), Grade::D);
        assert_eq!(Grade::from_score(0, 0), Grade::F);
    }

    #[test]
    fn percent_rounds_to_two_places() {
        assert_eq!(percent(2, 3), 66.67);
        assert_eq!(percent(1, 1), 100.0);
        assert_eq!(percent(0, 0), 0.0);
    }

    #[test]
    fn every_moment_has_lines() {
        let mut rng = StdRng::seed_from_u64(1);
        let moments = [
            Moment::Correct,
            Moment::TryAgain,
            Moment::Failed,
            Moment::Finished(Grade::A),
            Moment::Finished(Grade::B),
            Moment::Finished(Grade::C),
            Moment::Finished(Grade::D),
            Moment::Finished(Grade::F),
        ];
        for moment in moments {
            let line = encouragement(moment, &mut rng);
            assert!(moment.lines().contains(&line));
        }
    }

    #[test]
    fn grade_lines_mention_the_grade() {
        for grade in [Grade::A, Grade::B, Grade::C, Grade::D, Grade::F] {
            for line in Moment::Finished(grade).lines() {
                assert!(line.contains(&format!("Grade {grade}")), "{line}");
            }
        }
    }
}
