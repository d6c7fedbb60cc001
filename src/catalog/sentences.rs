// Sentence tier (levels 11-20).
use super::{Prompt, Tier};

const fn sentence(prompt_text: &'static str, expected_answer: &'static str) -> Prompt {
    Prompt { tier: Tier::Sentence, prompt_text, expected_answer }
}

pub static SENTENCE_PROMPTS: [Prompt; 10] = [
    sentence("मुझे एक कप चाय चाहिए।", "I need a cup of tea."),
    sentence("वह बाजार जा रहा है।", "He is going to the market."),
    sentence("क्या आप मेरी मदद कर सकते हैं?", "Can you help me?"),
    sentence("यह बहुत महंगा है।", "This is very expensive."),
    sentence("मुझे अंग्रेजी सीखनी है।", "I want to learn English."),
    sentence("कृपया दरवाजा बंद करो।", "Please close the door."),
    sentence("मैं कल दिल्ली जाऊंगा।", "I will go to Delhi tomorrow."),
    sentence("वह हिंदी बोलती है।", "She speaks Hindi."),
    sentence("मुझे समझ नहीं आया।", "I did not understand."),
    sentence("वे बहुत खुश हैं।", "They are very happy."),
];
