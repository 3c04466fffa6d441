//! Feedback message templates, bucketed by overall score

/// Maximum number of keywords interpolated into a message
pub const MAX_MENTIONED: usize = 3;

/// Build the feedback message for an overall score
pub fn compose(overall: u8, found: &[String], missing: &[String]) -> String {
    let found = join_keywords(found);
    let missing = join_keywords(missing);

    if overall >= 80 {
        match found {
            Some(found) => format!(
                "Excellent answer! You covered key concepts such as {}. Keep your examples this concrete.",
                found
            ),
            None => "Excellent answer! Keep your examples this concrete.".to_string(),
        }
    } else if overall >= 60 {
        match (found, missing) {
            (Some(found), Some(missing)) => format!(
                "Good answer. You mentioned {}, but consider also discussing {}.",
                found, missing
            ),
            (Some(found), None) => format!(
                "Good answer. You mentioned {}; a more detailed structure would strengthen it.",
                found
            ),
            (None, Some(missing)) => format!(
                "Good answer. Consider also discussing {}.",
                missing
            ),
            (None, None) => {
                "Good answer. A more detailed structure would strengthen it.".to_string()
            }
        }
    } else {
        match missing {
            Some(missing) => format!(
                "Your answer could be stronger. Try to address concepts like {} and add more detail.",
                missing
            ),
            None => "Your answer could be stronger. Add more detail and a clearer structure."
                .to_string(),
        }
    }
}

fn join_keywords(keywords: &[String]) -> Option<String> {
    let picked: Vec<&str> = keywords
        .iter()
        .take(MAX_MENTIONED)
        .map(String::as_str)
        .collect();

    match picked.as_slice() {
        [] => None,
        [one] => Some(one.to_string()),
        [init @ .., last] => Some(format!("{} and {}", init.join(", "), last)),
    }
}
