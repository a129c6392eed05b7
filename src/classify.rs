// Odd/even rule that decides which assessment question applies to a
// registration number. Informational only: the workflow prints it and moves on.

use std::fmt;

/// Question picked by the last two digits of the registration number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionLink {
    Odd,
    Even,
    /// Fewer than two digits in the registration number.
    Undetermined,
}

impl fmt::Display for QuestionLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionLink::Odd => f.write_str(
                "Question 1 (Odd): https://drive.google.com/file/d/1IeSI6l6KoSQAFfRihIT9tEDICtoz-G/view",
            ),
            QuestionLink::Even => f.write_str(
                "Question 2 (Even): https://drive.google.com/file/d/143MR5cLFrlNEuHzzWJ5RHnEWuijuM9X/view",
            ),
            QuestionLink::Undetermined => f.write_str("Cannot determine (regNo too short)"),
        }
    }
}

/// Strip everything but ASCII digits from `reg_no` and classify the
/// numeric value of the last two.
pub fn question_link_for_reg_no(reg_no: &str) -> QuestionLink {
    let digits: Vec<u8> = reg_no.bytes().filter(u8::is_ascii_digit).collect();
    let &[.., tens, ones] = digits.as_slice() else {
        return QuestionLink::Undetermined;
    };
    let value = (tens - b'0') * 10 + (ones - b'0');
    if value % 2 == 1 {
        QuestionLink::Odd
    } else {
        QuestionLink::Even
    }
}
