//! Score and grade computation for a completed self-test.
//!
//! Quantitative answers weigh heavier than qualitative ones: a fulfilled
//! quantitative item earns a full point, while "needs consultation" earns a
//! partial credit on either track. Everything else earns nothing.

use crate::models::response::Answer;
use serde::Serialize;

const QUANTITATIVE_FULFILLED_POINTS: f64 = 1.0;
const CONSULT_NEEDED_POINTS: f64 = 0.3;

/// Letter grade over the summed score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }

    pub fn for_score(score: f64) -> Self {
        if score >= 80.0 {
            Grade::S
        } else if score >= 60.0 {
            Grade::A
        } else if score >= 40.0 {
            Grade::B
        } else if score >= 20.0 {
            Grade::C
        } else {
            Grade::D
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScoredAssessment {
    pub score: f64,
    pub grade: Grade,
}

fn quantitative_points(answer: &str) -> f64 {
    match Answer::parse(answer) {
        Some(Answer::Fulfilled) => QUANTITATIVE_FULFILLED_POINTS,
        Some(Answer::ConsultNeeded) => CONSULT_NEEDED_POINTS,
        _ => 0.0,
    }
}

fn qualitative_points(answer: &str) -> f64 {
    match Answer::parse(answer) {
        Some(Answer::ConsultNeeded) => CONSULT_NEEDED_POINTS,
        _ => 0.0,
    }
}

/// Sums the point value of every stored response and maps the total onto a
/// letter grade. Unknown answer strings contribute nothing.
pub fn evaluate<S: AsRef<str>>(quantitative: &[S], qualitative: &[S]) -> ScoredAssessment {
    let score: f64 = quantitative
        .iter()
        .map(|a| quantitative_points(a.as_ref()))
        .chain(qualitative.iter().map(|a| qualitative_points(a.as_ref())))
        .sum();

    ScoredAssessment {
        score,
        grade: Grade::for_score(score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fulfilled_quantitative_answers_earn_one_point_each() {
        let quantitative = vec!["이행"; 5];
        let result = evaluate(&quantitative, &Vec::<&str>::new());
        assert_eq!(result.score, 5.0);
    }

    #[test]
    fn consult_needed_earns_partial_credit_on_both_tracks() {
        let result = evaluate(&["자문필요"], &["자문필요"]);
        assert!((result.score - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn qualitative_fulfilled_earns_nothing() {
        let result = evaluate(&Vec::<&str>::new(), &["이행", "해당없음"]);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn unknown_answers_earn_nothing() {
        let result = evaluate(&["검토중"], &["보류"]);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.grade, Grade::D);
    }

    #[test]
    fn grade_thresholds() {
        assert_eq!(Grade::for_score(80.0), Grade::S);
        assert_eq!(Grade::for_score(79.9), Grade::A);
        assert_eq!(Grade::for_score(60.0), Grade::A);
        assert_eq!(Grade::for_score(59.9), Grade::B);
        assert_eq!(Grade::for_score(40.0), Grade::B);
        assert_eq!(Grade::for_score(39.9), Grade::C);
        assert_eq!(Grade::for_score(20.0), Grade::C);
        assert_eq!(Grade::for_score(19.9), Grade::D);
        assert_eq!(Grade::for_score(0.0), Grade::D);
    }

    #[test]
    fn all_fulfilled_scores_the_question_count() {
        // A full quantitative sheet of fulfilled answers scores exactly the
        // number of questions.
        let quantitative = vec!["이행"; 85];
        let result = evaluate(&quantitative, &Vec::<&str>::new());
        assert_eq!(result.score, 85.0);
        assert_eq!(result.grade, Grade::S);
    }
}
