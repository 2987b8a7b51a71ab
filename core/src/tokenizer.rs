use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;
use std::collections::HashSet;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)\p{L}+|[0-9]+").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","cannot","could",
            "d","did","do","does","doing","down","during",
            "each","few","for","from","further",
            "had","has","have","having","he","her","here","hers","herself","him","himself","his","how",
            "i","if","in","into","is","it","its","itself",
            "just",
            "ll","m","me","more","most","my","myself",
            "no","nor","not","now","o","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "re","s","same","she","should","so","some","such",
            "t","than","that","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
            "under","until","up","ve","very",
            "was","we","were","what","when","where","which","while","who","whom","why","will","with","would",
            "y","you","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

const ONES: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen", "nineteen",
];
const TENS: [&str; 10] = ["", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety"];
const SCALES: [&str; 7] = ["", "thousand", "million", "billion", "trillion", "quadrillion", "quintillion"];

fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Tokenize text into normalized terms: NFKC normalization, lowercase, numerals
/// spelled out in English, stopword removal and stemming. Only alphabetic
/// terms are returned, in document order.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    let mut tokens = Vec::new();
    for mat in RE.find_iter(&normalized) {
        let raw = mat.as_str();
        if raw.bytes().all(|b| b.is_ascii_digit()) {
            for word in spell_digits(raw) {
                push_term(&mut tokens, word);
            }
        } else {
            push_term(&mut tokens, raw);
        }
    }
    tokens
}

fn push_term(tokens: &mut Vec<String>, word: &str) {
    if is_stopword(word) { return; }
    tokens.push(STEMMER.stem(word).into_owned());
}

/// Spell an ASCII digit run as English words. Runs that overflow `u64` are
/// read out digit by digit.
pub fn spell_digits(digits: &str) -> Vec<&'static str> {
    match digits.parse::<u64>() {
        Ok(n) => spell_number(n),
        Err(_) => digits
            .bytes()
            .filter(|b| b.is_ascii_digit())
            .map(|b| ONES[(b - b'0') as usize])
            .collect(),
    }
}

pub fn spell_number(n: u64) -> Vec<&'static str> {
    if n == 0 {
        return vec![ONES[0]];
    }
    let mut groups = Vec::new();
    let mut rest = n;
    while rest > 0 {
        groups.push((rest % 1000) as usize);
        rest /= 1000;
    }
    let mut words = Vec::new();
    for (scale, &group) in groups.iter().enumerate().rev() {
        if group == 0 { continue; }
        spell_below_thousand(group, &mut words);
        if scale > 0 {
            words.push(SCALES[scale]);
        }
    }
    words
}

fn spell_below_thousand(n: usize, words: &mut Vec<&'static str>) {
    let hundreds = n / 100;
    let rest = n % 100;
    if hundreds > 0 {
        words.push(ONES[hundreds]);
        words.push("hundred");
    }
    if rest >= 20 {
        words.push(TENS[rest / 10]);
        if rest % 10 > 0 {
            words.push(ONES[rest % 10]);
        }
    } else if rest > 0 {
        words.push(ONES[rest]);
    }
}
