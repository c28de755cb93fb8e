/// Longest answer the box accepts, sign included. Wide enough for `i64::MIN`.
pub const MAX_ANSWER_LEN: usize = 20;

/// Text typed into an answer box. Only digits and a leading minus sign get in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnswerInput {
    text: String,
}

impl AnswerInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns true if the character was accepted.
    pub fn process_char(&mut self, ch: char) -> bool {
        if self.text.chars().count() >= MAX_ANSWER_LEN {
            return false;
        }
        let accepted = ch.is_ascii_digit() || (ch == '-' && self.text.is_empty());
        if accepted {
            self.text.push(ch);
        }
        accepted
    }

    pub fn process_backspace(&mut self) {
        self.text.pop();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    #[cfg(test)]
    pub fn set(&mut self, text: &str) {
        self.text = text.to_string();
    }

    pub fn parsed(&self) -> Option<i64> {
        parse_answer(&self.text)
    }
}

/// Integer value of a submitted answer, or None if it is not a whole number.
pub fn parse_answer(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}
