const SPAM_KEYWORDS: [&str; 6] = [
    "gratis",
    "haz clic",
    "gana dinero",
    "comparte ya",
    "suscríbete",
    "oferta exclusiva",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected,
}

pub fn evaluate(text: &str) -> Verdict {
    // both checks run unconditionally; either one rejects on its own
    let negative = sentiment_score(text) < 0.0;
    let spam = is_spam(text);
    if negative || spam {
        Verdict::Rejected
    } else {
        Verdict::Accepted
    }
}

fn sentiment_score(text: &str) -> f32 {
    sentiment::analyze(text.to_string()).score
}

fn is_spam(text: &str) -> bool {
    let lower = text.to_lowercase();
    SPAM_KEYWORDS.iter().any(|phrase| lower.contains(phrase))
}
