// Word tier (levels 1-10): single Hindi words with one- or two-word English answers.
use super::{Prompt, Tier};

const fn word(prompt_text: &'static str, expected_answer: &'static str) -> Prompt {
    Prompt { tier: Tier::Word, prompt_text, expected_answer }
}

pub static WORD_PROMPTS: [Prompt; 10] = [
    word("नमस्ते", "Hello"),
    word("धन्यवाद", "Thank you"),
    word("पानी", "Water"),
    word("घर", "House"),
    word("किताब", "Book"),
    word("स्कूल", "School"),
    word("दोस्त", "Friend"),
    word("भोजन", "Food"),
    word("सूरज", "Sun"),
    word("रात", "Night"),
];
