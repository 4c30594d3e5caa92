//! Flashcard is a pair <question, answer>. Only text is used on either side

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

impl Flashcard {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}
