// Paragraph tier (levels 21-30): two short sentences or one long compound sentence.
use super::{Prompt, Tier};

const fn paragraph(prompt_text: &'static str, expected_answer: &'static str) -> Prompt {
    Prompt { tier: Tier::Paragraph, prompt_text, expected_answer }
}

pub static PARAGRAPH_PROMPTS: [Prompt; 10] = [
    paragraph(
        "मैं हर सुबह जल्दी उठता हूँ और सैर पर जाता हूँ। इससे मेरा स्वास्थ्य अच्छा रहता है।",
        "I wake up early every morning and go for a walk. It keeps my health good.",
    ),
    paragraph(
        "मेरी माँ अच्छी रसोइया हैं। वह हर दिन स्वादिष्ट भोजन बनाती हैं और हम सब उनका आभार महसूस करते हैं।",
        "My mother is a good cook. She prepares delicious food every day and we all feel grateful to her.",
    ),
    paragraph(
        "हमारे स्कूल में विज्ञान प्रयोगशाला बहुत अच्छी है। वहाँ प्रयोग करके छात्रों को सीखने में मज़ा आता है।",
        "Our school has a very good science laboratory. Doing experiments there makes learning enjoyable for students.",
    ),
    paragraph(
        "टिकट खरीदने के बाद हमें स्टेशन पर जल्दी पहुँचना चाहिए ताकि सीट सुरक्षित रहे।",
        "After buying the ticket we should reach the station early so that the seat remains secure.",
    ),
    paragraph(
        "प्रौद्योगिकी ने हमारे जीवन को सरल कर दिया है; हम दूर बैठे हुए भी बहुत काम कर सकते हैं।",
        "Technology has made our lives simple; we can do a lot of work while sitting far away.",
    ),
    paragraph(
        "पर्यावरण की रक्षा करना हम सबकी जिम्मेदारी है। पेड़ लगाना और पानी बचाना महत्वपूर्ण है।",
        "Protecting the environment is everyone’s responsibility. Planting trees and saving water are important.",
    ),
    paragraph(
        "एक अच्छी आदत धीरे-धीरे बनती है। छोटे-छोटे कदम उठाकर आप बड़ी सफलता पाते हैं।",
        "A good habit builds slowly. By taking small steps you achieve great success.",
    ),
    paragraph(
        "यात्रा करते समय हमें स्थानीय संस्कृति का सम्मान करना चाहिए और जगह को साफ रखना चाहिए।",
        "While traveling we should respect the local culture and keep the place clean.",
    ),
    paragraph(
        "कठिनाई के समय में धैर्य बनाए रखना और मेहनत करना ही सफलता की कुंजी है।",
        "In times of difficulty, keeping patience and working hard is the key to success.",
    ),
    paragraph(
        "एक अच्छा नेता वह है जो लोगों की सुनता है, समझता है और उन्हें आगे बढ़ने में मदद करता है।",
        "A good leader is one who listens to people, understands them, and helps them move forward.",
    ),
];
