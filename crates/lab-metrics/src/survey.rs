//! Survey response counting.
//!
//! A form's "response count" is the number of `Choice` leaves beneath it.
//! This measures form-schema cardinality, not distinct respondents.

use lab_core::entities::{Survey, SurveyForm};

/// Choice leaves under one form.
#[must_use]
pub fn form_responses(form: &SurveyForm) -> u64 {
    form.questions
        .iter()
        .map(|q| q.choices.len() as u64)
        .sum()
}

/// Choice leaves across every survey, form, and question of a research item.
///
/// No surveys yields zero.
#[must_use]
pub fn count_responses(surveys: &[Survey]) -> u64 {
    surveys
        .iter()
        .flat_map(|s| s.forms.iter())
        .map(form_responses)
        .sum()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use lab_core::entities::{Choice, Question};
    use lab_core::enums::SurveyStatus;

    use super::*;

    fn question(id: &str, choices: usize) -> Question {
        Question {
            id: id.into(),
            form_id: "frm-1".into(),
            prompt: format!("prompt {id}"),
            position: 0,
            choices: (0..choices)
                .map(|i| Choice {
                    id: format!("{id}-chc-{i}"),
                    question_id: id.into(),
                    label: format!("option {i}"),
                    position: u32::try_from(i).unwrap(),
                })
                .collect(),
        }
    }

    fn survey(forms: Vec<SurveyForm>) -> Survey {
        Survey {
            id: "srv-1".into(),
            research_id: "res-1".into(),
            creator_id: "usr-1".into(),
            title: "Feedback".into(),
            description: None,
            label: "feedback".into(),
            status: SurveyStatus::Active,
            created_at: Utc::now(),
            forms,
        }
    }

    fn form(questions: Vec<Question>) -> SurveyForm {
        SurveyForm {
            id: "frm-1".into(),
            survey_id: "srv-1".into(),
            title: "Form".into(),
            position: 0,
            created_at: Utc::now(),
            questions,
        }
    }

    #[test]
    fn two_questions_three_choices_each() {
        let surveys = vec![survey(vec![form(vec![question("q1", 3), question("q2", 3)])])];
        assert_eq!(count_responses(&surveys), 6);
    }

    #[test]
    fn sums_across_surveys_and_forms() {
        let surveys = vec![
            survey(vec![form(vec![question("q1", 2)]), form(vec![question("q2", 4)])]),
            survey(vec![form(vec![question("q3", 1)])]),
        ];
        assert_eq!(count_responses(&surveys), 7);
    }

    #[test]
    fn empty_levels_count_zero() {
        assert_eq!(count_responses(&[]), 0);
        assert_eq!(count_responses(&[survey(vec![])]), 0);
        assert_eq!(count_responses(&[survey(vec![form(vec![])])]), 0);
        assert_eq!(count_responses(&[survey(vec![form(vec![question("q", 0)])])]), 0);
    }
}
