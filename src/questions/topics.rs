//! Expected keywords per question topic
//!
//! Keywords are lowercase; scoring matches them as case-insensitive
//! substrings of the response.

use super::Category;

type TopicTable = &'static [(&'static str, &'static [&'static str])];

const TECHNICAL_TOPICS: TopicTable = &[
    (
        "rest_api",
        &[
            "stateless", "http", "get", "post", "put", "delete", "resource", "endpoint", "uri",
            "json",
        ],
    ),
    (
        "closures",
        &[
            "function", "scope", "variable", "lexical", "outer", "inner", "private", "callback",
        ],
    ),
    (
        "react_memoization",
        &[
            "usememo", "usecallback", "memoization", "value", "function", "dependency", "render",
            "performance",
        ],
    ),
    (
        "caching",
        &[
            "cache", "key", "eviction", "lru", "ttl", "expiration", "hit", "miss", "invalidation",
        ],
    ),
];

const BEHAVIORAL_TOPICS: TopicTable = &[
    (
        "challenge",
        &[
            "challenge", "situation", "task", "action", "result", "learn", "deadline", "team",
        ],
    ),
    (
        "teamwork",
        &[
            "team", "communication", "listen", "conflict", "resolve", "respect", "compromise",
            "relationship",
        ],
    ),
    (
        "goal_achievement",
        &[
            "goal", "plan", "step", "measure", "milestone", "achieve", "result", "progress",
        ],
    ),
    (
        "feedback",
        &[
            "feedback", "criticism", "improve", "listen", "learn", "growth", "apply", "reflect",
        ],
    ),
];

const HR_TOPICS: TopicTable = &[
    (
        "motivation",
        &[
            "interest", "company", "role", "skill", "mission", "growth", "contribute", "passion",
        ],
    ),
    (
        "career_goals",
        &[
            "years", "growth", "lead", "skill", "career", "goal", "learn", "responsibility",
        ],
    ),
    (
        "salary",
        &[
            "range", "research", "market", "experience", "negotiable", "benefits",
            "compensation", "flexible",
        ],
    ),
    (
        "achievement",
        &[
            "achievement", "project", "impact", "result", "team", "proud", "recognition",
            "deliver",
        ],
    ),
];

/// Look up the expected keywords for a topic within a category
pub fn keywords(category: Category, topic: &str) -> Option<&'static [&'static str]> {
    let table = match category {
        Category::Technical => TECHNICAL_TOPICS,
        Category::Behavioral => BEHAVIORAL_TOPICS,
        Category::Hr => HR_TOPICS,
    };

    table
        .iter()
        .find(|(name, _)| *name == topic)
        .map(|(_, keywords)| *keywords)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_topic_covers_verbs_and_statelessness() {
        let keywords = keywords(Category::Technical, "rest_api").unwrap();
        for expected in ["stateless", "get", "post"] {
            assert!(keywords.contains(&expected));
        }
    }

    #[test]
    fn test_topics_are_scoped_by_category() {
        assert!(keywords(Category::Technical, "closures").is_some());
        assert!(keywords(Category::Hr, "closures").is_none());
    }

    #[test]
    fn test_keywords_are_lowercase_and_distinct() {
        for table in [TECHNICAL_TOPICS, BEHAVIORAL_TOPICS, HR_TOPICS] {
            for (_, keywords) in table {
                for (i, keyword) in keywords.iter().enumerate() {
                    assert_eq!(*keyword, keyword.to_lowercase());
                    assert!(!keywords[i + 1..].contains(keyword));
                }
            }
        }
    }
}
