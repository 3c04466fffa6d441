use super::Category;

/// A single interview question
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Question {
    pub category: Category,
    /// Zero-based position within the category's list
    pub position: usize,
    pub text: &'static str,
    /// Keyword topic used for scoring
    pub topic: &'static str,
}

const fn question(
    category: Category,
    position: usize,
    topic: &'static str,
    text: &'static str,
) -> Question {
    Question {
        category,
        position,
        text,
        topic,
    }
}

pub(super) const TECHNICAL: &[Question] = &[
    question(
        Category::Technical,
        0,
        "rest_api",
        "Explain the concept of RESTful APIs and their key principles.",
    ),
    question(
        Category::Technical,
        1,
        "closures",
        "What are closures in JavaScript and how would you use them?",
    ),
    question(
        Category::Technical,
        2,
        "react_memoization",
        "Describe the difference between useMemo and useCallback in React.",
    ),
    question(
        Category::Technical,
        3,
        "caching",
        "How would you implement a basic caching mechanism?",
    ),
];

pub(super) const BEHAVIORAL: &[Question] = &[
    question(
        Category::Behavioral,
        0,
        "challenge",
        "Tell me about a time when you faced a significant challenge in a project. How did you handle it?",
    ),
    question(
        Category::Behavioral,
        1,
        "teamwork",
        "Describe a situation where you had to work with a difficult team member. How did you manage the relationship?",
    ),
    question(
        Category::Behavioral,
        2,
        "goal_achievement",
        "Give an example of a goal you achieved and what steps you took to reach it.",
    ),
    question(
        Category::Behavioral,
        3,
        "feedback",
        "How do you handle feedback, particularly constructive criticism?",
    ),
];

pub(super) const HR: &[Question] = &[
    question(
        Category::Hr,
        0,
        "motivation",
        "Why are you interested in this position?",
    ),
    question(
        Category::Hr,
        1,
        "career_goals",
        "Where do you see yourself in 5 years?",
    ),
    question(
        Category::Hr,
        2,
        "salary",
        "What are your salary expectations?",
    ),
    question(
        Category::Hr,
        3,
        "achievement",
        "What do you consider your greatest professional achievement?",
    ),
];
