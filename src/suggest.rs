const RELATED_QUESTIONS: &[(&str, &[&str])] = &[
    (
        "jon snow",
        &[
            "Who are Jon Snow's real parents?",
            "What is the Night's Watch?",
            "What happened to Jon Snow at Castle Black?",
        ],
    ),
    (
        "ned stark",
        &[
            "Why was Ned Stark executed?",
            "Who are Ned Stark's children?",
            "What is Winterfell?",
        ],
    ),
    (
        "tyrion",
        &[
            "Who is Tywin Lannister?",
            "Whom did Tyrion serve as Hand of the King?",
            "What is Casterly Rock?",
        ],
    ),
    (
        "lannister",
        &[
            "What does \"A Lannister always pays his debts\" mean?",
            "Who is Tyrion Lannister?",
            "What is Casterly Rock?",
        ],
    ),
    (
        "targaryen",
        &[
            "Why are the Targaryens linked to dragons?",
            "Who is Daenerys Targaryen?",
            "Where is Valyria?",
        ],
    ),
    (
        "winterfell",
        &[
            "Who rules Winterfell?",
            "How is Winterfell kept warm?",
        ],
    ),
    (
        "stark",
        &[
            "Who is Ned Stark?",
            "What are the words of House Stark?",
            "What is Winterfell?",
        ],
    ),
];

/// Follow-up questions for the most recent question; empty when no topic matches.
pub fn suggest(last_question: &str) -> Vec<String> {
    let lower = last_question.to_lowercase();
    RELATED_QUESTIONS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, questions)| questions.iter().map(|q| q.to_string()).collect())
        .unwrap_or_default()
}
