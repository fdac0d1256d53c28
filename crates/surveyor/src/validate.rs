//! Pre-persistence checks for compiled surveys.
//!
//! The interpreter guarantees that every reference it resolved points at a
//! declared node. It does not judge content: an empty title, an operator no
//! evaluator understands, or a rule naming a condition that was never
//! declared all parse fine. Stores run [`validate_survey`] before accepting a
//! survey.

use surveyor_core::semantic::{
    Dependency, GroupId, Question, QuestionId, Survey, Validation,
};

const OPERATORS: [&str; 7] = ["==", "!=", "<", ">", "<=", ">=", "=~"];

// Longest first so `<=` is not read as `<` followed by `=`.
const COUNT_COMPARISONS: [&str; 6] = ["==", "!=", "<=", ">=", "<", ">"];

const RULE_WORDS: [&str; 3] = ["and", "or", "not"];

/// Check a survey for content problems, returning one message per problem.
///
/// An empty list means the survey is acceptable.
///
/// # Example
///
/// ```
/// # use surveyor::validate_survey;
/// # use surveyor_core::semantic::{Survey, SurveySection};
/// let mut survey = Survey::new("");
/// survey.add_section(SurveySection::new("Intro"));
/// assert_eq!(validate_survey(&survey), vec!["survey title is blank".to_string()]);
/// ```
pub fn validate_survey(survey: &Survey) -> Vec<String> {
    let mut messages = Vec::new();

    if is_blank(survey.title()) {
        messages.push("survey title is blank".to_string());
    }

    for (section_index, section) in survey.sections().iter().enumerate() {
        if is_blank(section.title()) {
            messages.push(format!("section {} title is blank", section_index + 1));
        }

        for (group_index, group) in section.groups().iter().enumerate() {
            if let Some(dependency) = group.dependency() {
                let owner = group_name(GroupId {
                    section: section_index,
                    index: group_index,
                });
                check_dependency(&owner, dependency, &mut messages);
            }
        }
    }

    for (id, question) in survey.questions() {
        check_question(id, question, &mut messages);
    }

    messages
}

fn check_question(id: QuestionId, question: &Question, messages: &mut Vec<String>) {
    let name = question_name(id, question);
    if is_blank(question.text()) {
        messages.push(format!("{name} text is blank"));
    }

    for (index, answer) in question.answers().iter().enumerate() {
        let answer_name = match answer.reference() {
            Some(reference) => format!("{name}, {}", reference.answer_reference()),
            None => format!("{name}, answer {}", index + 1),
        };
        if is_blank(answer.text()) {
            messages.push(format!("{answer_name} text is blank"));
        }
        for validation in answer.validations() {
            check_validation(&answer_name, validation, messages);
        }
    }

    if let Some(dependency) = question.dependency() {
        check_dependency(&name, dependency, messages);
    }
}

fn check_dependency(owner: &str, dependency: &Dependency, messages: &mut Vec<String>) {
    let conditions = dependency.conditions();
    for (index, condition) in conditions.iter().enumerate() {
        if !is_known_operator(condition.operator()) {
            messages.push(format!(
                "dependency of {owner}: unknown operator `{}`",
                condition.operator()
            ));
        }
        if condition.question().is_none() {
            messages.push(format!(
                "dependency of {owner}: condition {} is not linked to question `{}`",
                index + 1,
                condition.question_reference().question_reference()
            ));
        }
    }

    if let Some(rule) = dependency.rule() {
        let keys: Vec<&str> = conditions.iter().filter_map(|c| c.rule_key()).collect();
        check_rule(&format!("dependency of {owner}"), rule, &keys, messages);
    }
}

fn check_validation(owner: &str, validation: &Validation, messages: &mut Vec<String>) {
    let conditions = validation.conditions();
    for condition in conditions {
        if !is_known_operator(condition.operator()) {
            messages.push(format!(
                "validation of {owner}: unknown operator `{}`",
                condition.operator()
            ));
        }
    }

    let keys: Vec<&str> = conditions.iter().filter_map(|c| c.rule_key()).collect();
    check_rule(
        &format!("validation of {owner}"),
        validation.rule(),
        &keys,
        messages,
    );
}

fn check_rule(context: &str, rule: &str, keys: &[&str], messages: &mut Vec<String>) {
    for key in rule_keys(rule) {
        if !keys.contains(&key) {
            messages.push(format!("{context}: rule `{rule}` names unknown key `{key}`"));
        }
    }
}

/// The condition keys a rule expression mentions.
///
/// `"(A or B) and not C"` names `A`, `B` and `C`.
fn rule_keys(rule: &str) -> impl Iterator<Item = &str> {
    rule.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| !word.is_empty())
        .filter(|word| !RULE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(word)))
}

fn is_known_operator(operator: &str) -> bool {
    if OPERATORS.contains(&operator) {
        return true;
    }

    let Some(rest) = operator.strip_prefix("count") else {
        return false;
    };
    COUNT_COMPARISONS
        .iter()
        .find_map(|comparison| rest.strip_prefix(comparison))
        .is_some_and(|count| !count.is_empty() && count.chars().all(|c| c.is_ascii_digit()))
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

fn question_name(id: QuestionId, question: &Question) -> String {
    match question.reference() {
        Some(reference) => reference.question_reference(),
        None => format!("question {}.{}", id.section + 1, id.index + 1),
    }
}

fn group_name(id: GroupId) -> String {
    format!("group {}.{}", id.section + 1, id.index + 1)
}
